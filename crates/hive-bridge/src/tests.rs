//! Tests for hive-bridge.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use hive_core::{BeeKind, CoreError, Role};
use hive_sim::{Command, CommandError, ParamKey, SimBuilder, SimSettings, Simulation, WeatherOp};
use hive_world::WeatherMode;

use crate::protocol::{ClientMessage, DEFAULT_HZ, MAX_HZ, ServerMessage, ack_payload, parse_client};
use crate::{BridgeError, FanOut, Session, SimDriver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn colony() -> Simulation {
    SimBuilder::new(SimSettings::default()).default_colony().build().unwrap()
}

fn cmd(text: &str) -> Result<Command, BridgeError> {
    match parse_client(text)? {
        ClientMessage::Cmd(c) => Ok(c),
        other => panic!("expected a command, got {other:?}"),
    }
}

fn frame(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

/// Wait for the next frame of `kind`, skipping others.
async fn next_frame(rx: &mut mpsc::Receiver<String>, kind: &str) -> Value {
    timeout(Duration::from_secs(2), async {
        loop {
            let f = frame(&rx.recv().await.unwrap());
            if f["type"] == kind {
                return f;
            }
        }
    })
    .await
    .unwrap()
}

struct Harness {
    sim:     Simulation,
    fanout:  Arc<FanOut>,
    rx:      mpsc::Receiver<String>,
    session: Session<mpsc::Sender<String>>,
}

fn harness(capacity: usize) -> Harness {
    let sim = colony();
    let fanout = Arc::new(FanOut::new(sim.subscribe()));
    let (tx, rx) = mpsc::channel(capacity);
    let session = Session::new(7, Arc::new(tx), sim.command_sender(), Arc::clone(&fanout));
    Harness { sim, fanout, rx, session }
}

// ── Protocol ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod protocol_tests {
    use super::*;

    #[test]
    fn add_bees_defaults_to_worker() {
        let c = cmd(r#"{"type":"cmd","action":"add_bees","count":5}"#).unwrap();
        assert_eq!(c, Command::AddBees { count: 5, kind: BeeKind::Worker, role: None });

        let c = cmd(r#"{"type":"cmd","action":"add_bees","count":2,"kind":"worker","role":"receiver"}"#).unwrap();
        assert_eq!(c, Command::AddBees { count: 2, kind: BeeKind::Worker, role: Some(Role::Receiver) });
    }

    #[test]
    fn add_bees_count_defaults_to_one() {
        let c = cmd(r#"{"type":"cmd","action":"add_bees"}"#).unwrap();
        assert_eq!(c, Command::AddBees { count: 1, kind: BeeKind::Worker, role: None });

        let c = cmd(r#"{"type":"cmd","action":"add_bees","count":null,"kind":"drone"}"#).unwrap();
        assert_eq!(c, Command::AddBees { count: 1, kind: BeeKind::Drone, role: None });
    }

    #[test]
    fn weather_ops() {
        let op = |text: &str| match cmd(text).unwrap() {
            Command::Weather(op) => op,
            other => panic!("expected weather, got {other:?}"),
        };
        assert_eq!(
            op(r#"{"type":"cmd","action":"weather","op":"mode","value":"manual"}"#),
            WeatherOp::Mode(WeatherMode::Manual)
        );
        assert_eq!(op(r#"{"type":"cmd","action":"weather","op":"mode"}"#), WeatherOp::Mode(WeatherMode::Auto));
        assert_eq!(op(r#"{"type":"cmd","action":"weather","op":"flow","value":0.25}"#), WeatherOp::Flow(0.25));
        assert_eq!(op(r#"{"type":"cmd","action":"weather","op":"flow","value":"Good"}"#), WeatherOp::Flow(0.8));
        assert_eq!(op(r#"{"type":"cmd","action":"weather","op":"flow","value":"dearth"}"#), WeatherOp::Flow(0.2));
        assert_eq!(op(r#"{"type":"cmd","action":"weather","op":"flow"}"#), WeatherOp::Flow(0.7));
        assert_eq!(op(r#"{"type":"cmd","action":"weather","op":"rain","value":true}"#), WeatherOp::Rain(true));
        assert_eq!(op(r#"{"type":"cmd","action":"weather","op":"rain"}"#), WeatherOp::Rain(false));
    }

    #[test]
    fn bad_weather_ops_are_rejected() {
        for text in [
            r#"{"type":"cmd","action":"weather"}"#,
            r#"{"type":"cmd","action":"weather","op":"wind","value":3}"#,
            r#"{"type":"cmd","action":"weather","op":"mode","value":"sunny"}"#,
            r#"{"type":"cmd","action":"weather","op":"rain","value":"yes"}"#,
            r#"{"type":"cmd","action":"weather","op":"flow","value":[1]}"#,
        ] {
            let err = cmd(text).unwrap_err();
            assert!(matches!(err, BridgeError::Command(CommandError::Malformed(_))), "{text}: {err:?}");
        }
    }

    #[test]
    fn weather_ack_echoes_op_and_value() {
        let c = cmd(r#"{"type":"cmd","action":"weather","op":"flow","value":"high"}"#).unwrap();
        let ack = ack_payload(&c).unwrap();
        assert_eq!(ack["action"], "weather");
        assert_eq!(ack["op"], "flow");
        assert!((ack["value"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn flower_defaults() {
        let c = cmd(r#"{"type":"cmd","action":"add_flowers"}"#).unwrap();
        assert_eq!(c, Command::AddFlowers { count: 10 });

        let c = cmd(r#"{"type":"cmd","action":"add_flower_at","x":10,"y":20.5}"#).unwrap();
        assert_eq!(c, Command::AddFlowerAt { x: 10.0, y: 20.5, n: 1, capacity: None });
    }

    #[test]
    fn simple_actions() {
        assert_eq!(cmd(r#"{"type":"cmd","action":"toggle"}"#).unwrap(), Command::Toggle);
        assert_eq!(cmd(r#"{"type":"cmd","action":"play"}"#).unwrap(), Command::Play);
        assert_eq!(cmd(r#"{"type":"cmd","action":"pause"}"#).unwrap(), Command::Pause);
        assert_eq!(
            cmd(r#"{"type":"cmd","action":"speed","value":2}"#).unwrap(),
            Command::Speed { value: 2.0 }
        );
        assert_eq!(
            cmd(r#"{"type":"cmd","action":"set_param","key":"tremble_threshold","value":0.5}"#).unwrap(),
            Command::SetParam { key: ParamKey::TrembleThreshold, value: 0.5 }
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        let err = cmd(r#"{"type":"cmd","action":"add_bees","count":1,"role":"wizard"}"#).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Command(CommandError::Core(CoreError::UnknownRole(ref r))) if r == "wizard"
        ));

        let err = cmd(r#"{"type":"cmd","action":"add_bees","count":1,"kind":"wasp"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::Core(CoreError::UnknownKind(_)))));

        let err = cmd(r#"{"type":"cmd","action":"set_param","key":"honey","value":1}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::UnknownParam(_))));

        let err = cmd(r#"{"type":"cmd","action":"dance"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::UnknownAction(_))));
    }

    #[test]
    fn role_must_fit_kind() {
        let err = cmd(r#"{"type":"cmd","action":"add_bees","count":1,"kind":"queen","role":"forager"}"#)
            .unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::Core(CoreError::RoleMismatch { .. }))));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        let err = cmd(r#"{"type":"cmd","action":"add_bees","count":-3}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::InvalidCount { got: -3, .. })));

        let err = cmd(r#"{"type":"cmd","action":"add_bees","count":501}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::InvalidCount { got: 501, .. })));

        let err = cmd(r#"{"type":"cmd","action":"add_bees","count":"five"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::Malformed(_))));

        let err = cmd(r#"{"type":"cmd","action":"add_bees","count":0}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::InvalidCount { got: 0, .. })));

        let err = cmd(r#"{"type":"cmd","action":"set_param","key":"receiver_rate","value":-1}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::InvalidValue { .. })));

        let err = cmd(r#"{"type":"cmd","action":"speed"}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Command(CommandError::Malformed(_))));
    }

    #[test]
    fn envelope_errors() {
        assert!(matches!(parse_client("not json"), Err(BridgeError::Json(_))));
        assert!(matches!(parse_client("[1, 2]"), Err(BridgeError::Malformed(_))));
        assert!(matches!(parse_client(r#"{"action":"play"}"#), Err(BridgeError::Malformed(_))));
        assert!(matches!(parse_client(r#"{"type":"hello"}"#), Err(BridgeError::UnknownType(_))));
    }

    #[test]
    fn subscribe_rate_is_clamped() {
        let hz = |text: &str| match parse_client(text).unwrap() {
            ClientMessage::Subscribe { hz } => hz,
            other => panic!("expected subscribe, got {other:?}"),
        };
        assert_eq!(hz(r#"{"type":"subscribe","stream":"view"}"#), DEFAULT_HZ);
        assert_eq!(hz(r#"{"type":"subscribe","stream":"view","hz":0}"#), 1);
        assert_eq!(hz(r#"{"type":"subscribe","stream":"view","hz":-4}"#), 1);
        assert_eq!(hz(r#"{"type":"subscribe","stream":"view","hz":1000}"#), 120);
        assert_eq!(hz(r#"{"type":"subscribe","stream":"view","hz":45}"#), 45);

        assert!(matches!(
            parse_client(r#"{"type":"subscribe","stream":"view","hz":2.5}"#),
            Err(BridgeError::Malformed(_))
        ));
        assert!(matches!(
            parse_client(r#"{"type":"subscribe","stream":"bees"}"#),
            Err(BridgeError::UnknownStream(_))
        ));
    }

    #[test]
    fn server_frames_are_tagged() {
        let sim = colony();
        let view = sim.latest_view();
        let f = frame(&ServerMessage::View { payload: &view }.to_json().unwrap());
        assert_eq!(f["type"], "view");
        assert_eq!(f["payload"]["bees"].as_array().unwrap().len(), 20);

        let err = BridgeError::UnknownType("hello".into());
        let f = frame(&ServerMessage::error(&err).to_json().unwrap());
        assert_eq!(f, serde_json::json!({ "type": "error", "message": "unknown message type: hello" }));
    }
}

// ── Sessions and fan-out ──────────────────────────────────────────────────────

#[cfg(test)]
mod session_tests {
    use super::*;

    #[tokio::test]
    async fn command_is_acked_and_applied_next_tick() {
        let mut h = harness(16);
        let before = h.sim.agents().len();

        let reply = frame(&h.session.handle_text(r#"{"type":"cmd","action":"add_bees","count":5}"#));
        assert_eq!(reply["type"], "ack");
        assert_eq!(reply["payload"]["action"], "add_bees");
        assert_eq!(reply["payload"]["kind"], "worker");
        assert_eq!(frame(&h.rx.recv().await.unwrap()), reply);

        assert_eq!(h.sim.agents().len(), before);
        h.sim.step().unwrap();
        assert_eq!(h.sim.agents().len(), before + 5);
    }

    #[tokio::test]
    async fn rejected_command_never_reaches_the_simulation() {
        let mut h = harness(16);
        let reply = frame(&h.session.handle_text(r#"{"type":"cmd","action":"add_bees","count":5,"role":"wizard"}"#));
        assert_eq!(reply["type"], "error");
        assert_eq!(reply["message"], "unknown role: wizard");

        let report = h.sim.step().unwrap();
        assert_eq!(report.commands_applied + report.commands_rejected, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_view_frames() {
        let mut h = harness(16);
        let reply = frame(&h.session.handle_text(r#"{"type":"subscribe","stream":"view","hz":100}"#));
        assert_eq!(reply["payload"]["hz"], 100);
        assert!(h.fanout.is_subscribed(7));
        assert_eq!(h.fanout.hz(7), Some(100));

        let f = next_frame(&mut h.rx, "view").await;
        assert_eq!(f["payload"]["bees"].as_array().unwrap().len(), 20);

        // New state reaches the next frame.
        h.sim.submit(Command::AddBees { count: 3, kind: BeeKind::Drone, role: None }).unwrap();
        h.sim.step().unwrap();
        let f = timeout(Duration::from_secs(2), async {
            loop {
                let f = next_frame(&mut h.rx, "view").await;
                if f["payload"]["bees"].as_array().unwrap().len() == 23 {
                    return f;
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(f["payload"]["tick"], 1);
    }

    #[tokio::test]
    async fn unsubscribe_stops_frames() {
        let mut h = harness(64);
        h.session.handle_text(r#"{"type":"subscribe","stream":"view","hz":100}"#);
        next_frame(&mut h.rx, "view").await;

        let reply = frame(&h.session.handle_text(r#"{"type":"unsubscribe"}"#));
        assert_eq!(reply["payload"]["unsubscribed"], true);
        assert!(!h.fanout.is_subscribed(7));

        while h.rx.try_recv().is_ok() {}
        sleep(Duration::from_millis(60)).await;
        assert!(h.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dropping_session_unsubscribes() {
        let h = harness(16);
        h.session.handle_text(r#"{"type":"subscribe","stream":"view","hz":10}"#);
        assert_eq!(h.fanout.len(), 1);
        drop(h.session);
        assert!(h.fanout.is_empty());
    }

    #[tokio::test]
    async fn resubscribing_replaces_the_rate() {
        let h = harness(16);
        h.session.handle_text(r#"{"type":"subscribe","stream":"view","hz":10}"#);
        h.session.handle_text(r#"{"type":"subscribe","stream":"view","hz":60}"#);
        assert_eq!(h.fanout.len(), 1);
        assert_eq!(h.fanout.hz(7), Some(60));
    }

    #[tokio::test]
    async fn slow_consumer_is_not_buffered() {
        let sim = colony();
        let fanout = FanOut::new(sim.subscribe());
        let (tx, mut rx) = mpsc::channel::<String>(1);
        fanout.subscribe(1, Arc::new(tx), 120);

        sleep(Duration::from_millis(100)).await;
        let mut queued = 0;
        while rx.try_recv().is_ok() {
            queued += 1;
        }
        assert!((1..=2).contains(&queued), "queued {queued}");
        assert!(fanout.is_subscribed(1));
    }

    #[tokio::test]
    async fn closed_sink_ends_the_subscription() {
        let sim = colony();
        let fanout = FanOut::new(sim.subscribe());
        let (tx, rx) = mpsc::channel::<String>(4);
        drop(rx);
        fanout.subscribe(1, Arc::new(tx), 50);

        for _ in 0..100 {
            if !fanout.is_subscribed(1) {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert!(!fanout.is_subscribed(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn instantly_closed_sinks_leave_no_stale_entries() {
        let sim = colony();
        let fanout = FanOut::new(sim.subscribe());
        for session in 0..200 {
            let (tx, rx) = mpsc::channel::<String>(1);
            drop(rx);
            fanout.subscribe(session, Arc::new(tx), MAX_HZ);
        }

        for _ in 0..200 {
            if fanout.is_empty() {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(fanout.len(), 0);
        assert!((0..200).all(|session| !fanout.is_subscribed(session)));
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod driver_tests {
    use super::*;

    #[tokio::test]
    async fn driver_ticks_and_applies_commands() {
        let mut settings = SimSettings::default();
        settings.sim.tick_hz = 120;
        let sim = SimBuilder::new(settings).default_colony().build().unwrap();
        let handle = SimDriver::spawn(sim);

        let (tx, mut rx) = mpsc::channel(64);
        let session = handle.connect(Arc::new(tx));
        let reply = frame(&session.handle_text(r#"{"type":"cmd","action":"add_bees","count":5}"#));
        assert_eq!(reply["type"], "ack");
        session.handle_text(r#"{"type":"subscribe","stream":"view","hz":60}"#);

        let f = timeout(Duration::from_secs(2), async {
            loop {
                let f = next_frame(&mut rx, "view").await;
                if f["payload"]["bees"].as_array().unwrap().len() == 25 {
                    return f;
                }
            }
        })
        .await
        .unwrap();
        assert!(f["payload"]["tick"].as_u64().unwrap() >= 1);

        drop(session);
        let sim = handle.shutdown().await.unwrap();
        assert_eq!(sim.agents().len(), 25);
        assert!(sim.clock.current_tick.0 >= 1);
    }

    #[tokio::test]
    async fn pause_freezes_time_but_keeps_publishing() {
        let handle = SimDriver::spawn(colony());
        let commands = handle.commands();
        commands.submit(Command::Pause).unwrap();

        let mut views = handle.views();
        timeout(Duration::from_secs(2), async {
            loop {
                views.changed().await.unwrap();
                if views.borrow().paused {
                    break;
                }
            }
        })
        .await
        .unwrap();

        let t = handle.latest_view().t;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.latest_view().t, t);
        assert!(handle.latest_view().paused);

        let sim = handle.shutdown().await.unwrap();
        assert!(sim.is_paused());
    }
}
