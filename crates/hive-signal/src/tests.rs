//! Unit tests for hive-signal.

#[cfg(test)]
mod helpers {
    use hive_core::{AgentId, FlowerId, Tick, Vec2};

    use crate::{Signal, SignalKind, SignalPayload};

    pub fn signal(kind: SignalKind, emitter: u32, at: Tick, ttl: u32) -> Signal {
        Signal::new(kind, AgentId(emitter), Vec2::new(100.0, 100.0), 50.0, SignalPayload::None, at, ttl)
    }

    pub fn waggle(emitter: u32, flower: u32, at: Tick) -> Signal {
        Signal::new(
            SignalKind::Waggle,
            AgentId(emitter),
            Vec2::new(100.0, 100.0),
            50.0,
            SignalPayload::Flower { flower: FlowerId(flower), pos: Vec2::new(10.0, 10.0), quality: 0.8 },
            at,
            60,
        )
    }
}

#[cfg(test)]
mod kind_tests {
    use hive_core::Role;

    use crate::{RoleSet, Scope, SignalKind, subscribers, subscriptions};

    #[test]
    fn scope_table() {
        assert_eq!(SignalKind::QueenMandibular.scope(), Scope::Colony);
        assert_eq!(SignalKind::Nasonov.scope(), Scope::Colony);
        assert_eq!(SignalKind::Waggle.scope(), Scope::Local);
        assert_eq!(SignalKind::Tremble.scope(), Scope::Local);
        assert_eq!(SignalKind::Fanning.scope(), Scope::Local);
    }

    #[test]
    fn subscribers_invert_subscriptions() {
        for kind in SignalKind::ALL {
            for role in Role::ALL {
                assert_eq!(subscribers(kind).contains(role), subscriptions(role).contains(&kind));
            }
        }
        assert_eq!(
            subscribers(SignalKind::Waggle).iter().collect::<Vec<_>>(),
            vec![Role::Forager]
        );
        assert!(subscriptions(Role::Queen).is_empty());
    }

    #[test]
    fn role_set_ops() {
        let mut s = RoleSet::of(&[Role::Forager, Role::Fanner]);
        assert!(s.contains(Role::Fanner));
        s.remove(Role::Fanner);
        assert!(!s.contains(Role::Fanner));
        s.remove(Role::Forager);
        assert!(s.is_empty());
    }
}

#[cfg(test)]
mod bus_tests {
    use std::collections::BTreeMap;

    use hive_core::{Role, Tick};

    use super::helpers::{signal, waggle};
    use crate::{BusConfig, SignalBus, SignalError, SignalKind};

    fn bus(capacity: usize) -> SignalBus {
        SignalBus::new(BusConfig { capacity, ..BusConfig::default() }).unwrap()
    }

    #[test]
    fn emit_assigns_increasing_seq() {
        let mut b = bus(8);
        let a = b.emit(waggle(1, 0, Tick(0))).unwrap();
        let c = b.emit(signal(SignalKind::Tremble, 1, Tick(0), 10)).unwrap();
        assert!(c > a);
    }

    #[test]
    fn capacity_is_never_exceeded() {
        let mut b = bus(4);
        for i in 0..10 {
            b.emit(waggle(i, 0, Tick(0))).unwrap();
            assert!(b.len(SignalKind::Waggle) <= 4);
        }
        assert_eq!(b.len(SignalKind::Waggle), 4);
        assert_eq!(b.evicted(SignalKind::Waggle), 6);
        // Oldest were evicted: survivors are emitters 6..10.
        let emitters: Vec<u32> = b.iter(SignalKind::Waggle).map(|s| s.emitter.0).collect();
        assert_eq!(emitters, vec![6, 7, 8, 9]);
    }

    #[test]
    fn per_kind_capacity_override() {
        let mut caps = BTreeMap::new();
        caps.insert(SignalKind::Tremble, 2);
        let mut b = SignalBus::new(BusConfig { capacity: 8, kind_capacity: caps, ema_alpha: 0.5 }).unwrap();
        for i in 0..5 {
            b.emit(signal(SignalKind::Tremble, i, Tick(0), 10)).unwrap();
        }
        assert_eq!(b.len(SignalKind::Tremble), 2);
        assert_eq!(b.capacity(SignalKind::Waggle), 8);
    }

    #[test]
    fn invalid_signals_rejected() {
        let mut b = bus(4);
        let mut s = waggle(1, 0, Tick(0));
        s.origin.x = f32::NAN;
        assert_eq!(b.emit(s), Err(SignalError::NonFinite { kind: SignalKind::Waggle }));
        assert_eq!(
            b.emit(signal(SignalKind::Tremble, 1, Tick(0), 0)),
            Err(SignalError::ZeroTtl { kind: SignalKind::Tremble })
        );
        assert!(b.is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(SignalBus::new(BusConfig { capacity: 0, ..BusConfig::default() }).is_err());
        assert!(SignalBus::new(BusConfig { ema_alpha: 0.0, ..BusConfig::default() }).is_err());
    }

    #[test]
    fn drain_is_fifo_across_kinds() {
        let mut b = bus(8);
        b.emit(signal(SignalKind::Tremble, 1, Tick(0), 10)).unwrap();
        b.emit(waggle(2, 0, Tick(0))).unwrap();
        b.emit(signal(SignalKind::QueenMandibular, 3, Tick(0), 10)).unwrap();
        let got: Vec<SignalKind> = b.drain(Role::Forager).into_iter().map(|s| s.kind).collect();
        assert_eq!(
            got,
            vec![SignalKind::Tremble, SignalKind::Waggle, SignalKind::QueenMandibular]
        );
    }

    #[test]
    fn entry_leaves_once_all_subscribers_drained() {
        let mut b = bus(8);
        b.emit(signal(SignalKind::Tremble, 1, Tick(0), 10)).unwrap();
        assert_eq!(b.drain(Role::Forager).len(), 1);
        // Receiver still pending.
        assert_eq!(b.len(SignalKind::Tremble), 1);
        assert!(b.drain(Role::Forager).is_empty());
        assert_eq!(b.drain(Role::Receiver).len(), 1);
        assert_eq!(b.len(SignalKind::Tremble), 0);
    }

    #[test]
    fn unsubscribed_role_gets_nothing() {
        let mut b = bus(8);
        b.emit(waggle(1, 0, Tick(0))).unwrap();
        assert!(b.drain(Role::Queen).is_empty());
        assert!(b.drain(Role::Nurse).is_empty());
        assert_eq!(b.len(SignalKind::Waggle), 1);
    }

    #[test]
    fn purge_expired_uses_ttl_in_ticks() {
        let mut b = bus(8);
        b.emit(signal(SignalKind::Tremble, 1, Tick(10), 5)).unwrap();
        b.emit(signal(SignalKind::Tremble, 2, Tick(10), 20)).unwrap();
        assert_eq!(b.purge_expired(Tick(14)), 0);
        assert_eq!(b.purge_expired(Tick(15)), 1);
        assert_eq!(b.len(SignalKind::Tremble), 1);
        assert_eq!(b.purge_expired(Tick(30)), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn queue_avg_smooths_towards_occupancy() {
        let mut b = SignalBus::new(BusConfig { ema_alpha: 0.5, ..BusConfig::default() }).unwrap();
        for i in 0..4 {
            b.emit(signal(SignalKind::Tremble, i, Tick(0), 10)).unwrap();
        }
        let s1 = b.sample();
        assert_eq!(s1.total, 4);
        assert!((s1.queue_avg - 2.0).abs() < 1e-6);
        let s2 = b.sample();
        assert!((s2.queue_avg - 3.0).abs() < 1e-6);
        assert_eq!(s2.occupancy[&SignalKind::Tremble], 4);
        assert_eq!(s2.occupancy[&SignalKind::Waggle], 0);
    }

    #[test]
    fn dropped_combines_evictions_and_inbox_drops() {
        let mut b = bus(1);
        b.emit(waggle(1, 0, Tick(0))).unwrap();
        b.emit(waggle(2, 0, Tick(0))).unwrap();
        let stats = b.sample();
        assert_eq!(stats.dropped()[&SignalKind::Waggle], 1);
    }
}

#[cfg(test)]
mod inbox_tests {
    use hive_core::{AgentId, Tick, Vec2};

    use super::helpers::{signal, waggle};
    use crate::{BusConfig, Inbox, SignalBus, SignalKind};

    #[test]
    fn local_signals_need_range() {
        let sigs = vec![waggle(1, 0, Tick(0))];
        let near = Inbox::gather(&sigs, AgentId(9), Vec2::new(120.0, 100.0), 8);
        let far = Inbox::gather(&sigs, AgentId(9), Vec2::new(400.0, 100.0), 8);
        assert_eq!(near.len(), 1);
        assert!(far.is_empty());
    }

    #[test]
    fn colony_signals_ignore_range() {
        let sigs = vec![signal(SignalKind::QueenMandibular, 1, Tick(0), 10)];
        let far = Inbox::gather(&sigs, AgentId(9), Vec2::new(900.0, 900.0), 8);
        assert!(far.has(SignalKind::QueenMandibular));
    }

    #[test]
    fn own_signals_are_ignored() {
        let sigs = vec![waggle(1, 0, Tick(0))];
        assert!(Inbox::gather(&sigs, AgentId(1), Vec2::new(100.0, 100.0), 8).is_empty());
    }

    #[test]
    fn cap_keeps_newest_and_counts_drops() {
        let mut b = SignalBus::new(BusConfig::default()).unwrap();
        for i in 0..5 {
            b.emit(waggle(i, i, Tick(0))).unwrap();
        }
        b.emit(signal(SignalKind::Tremble, 7, Tick(0), 10)).unwrap();
        let sigs = b.drain(hive_core::Role::Forager);
        let inbox = Inbox::gather(&sigs, AgentId(99), Vec2::new(100.0, 100.0), 2);
        let flowers: Vec<u32> = inbox
            .of_kind(SignalKind::Waggle)
            .filter_map(|s| s.flower().map(|(f, _, _)| f.0))
            .collect();
        assert_eq!(flowers, vec![3, 4]);
        assert!(inbox.has(SignalKind::Tremble));
        assert_eq!(inbox.dropped(SignalKind::Waggle), 3);
        assert_eq!(inbox.total_dropped(), 3);

        b.record_inbox_drops(&inbox);
        assert_eq!(b.sample().inbox_dropped[&SignalKind::Waggle], 3);
    }
}
