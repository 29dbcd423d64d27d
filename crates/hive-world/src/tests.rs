//! Unit tests for hive-world.

#[cfg(test)]
mod helpers {
    use hive_core::SimRng;

    use crate::{World, WorldConfig};

    pub fn world() -> World {
        World::new(400.0, 300.0, WorldConfig::default())
    }

    pub fn rng() -> SimRng {
        SimRng::new(11)
    }
}

#[cfg(test)]
mod hive_tests {
    use hive_core::Vec2;

    use crate::Hive;

    #[test]
    fn placement_and_entrance() {
        let h = Hive::for_world(200.0, 100.0);
        assert_eq!(h.center, Vec2::new(100.0, 55.0));
        assert!((h.radius - 12.0).abs() < 1e-6);
        assert_eq!(h.entrance, Vec2::new(100.0, 43.0));
    }

    #[test]
    fn process_drains_at_most_capacity() {
        let mut h = Hive::new(Vec2::ZERO, 10.0);
        h.enqueue(1.0);
        h.enqueue(-5.0); // ignored
        assert!((h.process(0.4) - 0.4).abs() < 1e-6);
        assert!((h.process(5.0) - 0.6).abs() < 1e-6);
        assert_eq!(h.receiver_queue, 0.0);
        assert_eq!(h.process(1.0), 0.0);
    }
}

#[cfg(test)]
mod placement_tests {
    use hive_core::{FlowerId, Vec2};

    use super::helpers::{rng, world};
    use crate::WorldError;

    #[test]
    fn add_flower_at_places_first_exactly() {
        let mut w = world();
        let mut r = rng();
        let ids = w.add_flower_at(Vec2::new(50.0, 60.0), 3, Some(2.0), &mut r).unwrap();
        assert_eq!(ids, vec![FlowerId(0), FlowerId(1), FlowerId(2)]);
        assert_eq!(w.flower(FlowerId(0)).unwrap().pos, Vec2::new(50.0, 60.0));
        for f in w.flowers() {
            assert_eq!(f.capacity, 2.0);
            assert_eq!(f.remaining, 2.0);
            assert!(!f.visited);
            assert!(f.pos.distance(Vec2::new(50.0, 60.0)) <= w.config().cluster_spread + 1e-3);
        }
    }

    #[test]
    fn add_flower_at_clamps_into_bounds() {
        let mut w = world();
        let mut r = rng();
        w.add_flower_at(Vec2::new(-100.0, 1.0e6), 1, None, &mut r).unwrap();
        let f = &w.flowers()[0];
        assert!(w.bounds().contains(f.pos));
        assert!(f.capacity >= 1.0 && f.capacity <= 3.0);
    }

    #[test]
    fn add_flower_at_rejects_bad_input() {
        let mut w = world();
        let mut r = rng();
        assert!(matches!(
            w.add_flower_at(Vec2::new(f32::NAN, 0.0), 1, None, &mut r),
            Err(WorldError::InvalidPosition { .. })
        ));
        assert_eq!(
            w.add_flower_at(Vec2::new(1.0, 1.0), 1, Some(-1.0), &mut r),
            Err(WorldError::InvalidAmount(-1.0))
        );
        assert!(w.flowers().is_empty());
    }

    #[test]
    fn add_flowers_stays_in_bounds() {
        let mut w = world();
        let mut r = rng();
        let ids = w.add_flowers(40, &mut r);
        assert_eq!(ids.len(), 40);
        assert_eq!(w.flowers_remaining(), 40);
        for f in w.flowers() {
            assert!(w.bounds().contains(f.pos), "{} outside", f.pos);
        }
    }

    #[test]
    fn add_flowers_in_tiny_world() {
        let mut w = crate::World::new(20.0, 20.0, crate::WorldConfig::default());
        let mut r = rng();
        w.add_flowers(5, &mut r);
        assert_eq!(w.flowers().len(), 5);
    }
}

#[cfg(test)]
mod economy_tests {
    use hive_core::{FlowerId, Vec2};

    use super::helpers::{rng, world};
    use crate::WorldError;

    #[test]
    fn consume_clamps_at_zero_and_marks_visited() {
        let mut w = world();
        let mut r = rng();
        w.add_flower_at(Vec2::new(10.0, 10.0), 1, Some(5.0), &mut r).unwrap();
        assert_eq!(w.consume_flower(FlowerId(0), 3.0).unwrap(), 3.0);
        assert!(w.flowers()[0].visited);
        assert_eq!(w.consume_flower(FlowerId(0), 3.0).unwrap(), 2.0);
        assert_eq!(w.flowers()[0].remaining, 0.0);
        assert_eq!(w.consume_flower(FlowerId(0), 1.0).unwrap(), 0.0);
        assert_eq!(w.flowers_remaining(), 0);
    }

    #[test]
    fn consume_errors() {
        let mut w = world();
        let mut r = rng();
        w.add_flower_at(Vec2::new(10.0, 10.0), 1, Some(5.0), &mut r).unwrap();
        assert_eq!(
            w.consume_flower(FlowerId(9), 1.0),
            Err(WorldError::UnknownFlower(FlowerId(9)))
        );
        assert_eq!(w.consume_flower(FlowerId(0), -1.0), Err(WorldError::InvalidAmount(-1.0)));
        assert_eq!(w.flowers()[0].remaining, 5.0);
    }

    #[test]
    fn deposit_is_monotonic() {
        let mut w = world();
        w.deposit_nectar(1.5).unwrap();
        assert_eq!(w.deposit_nectar(-0.1), Err(WorldError::InvalidAmount(-0.1)));
        assert!(w.deposit_nectar(f32::NAN).is_err());
        assert_eq!(w.total_deposited(), 1.5);
    }

    #[test]
    fn receive_moves_queue_into_deposit() {
        let mut w = world();
        w.enqueue_delivery(2.0).unwrap();
        assert!(w.has_backlog());
        assert!((w.receive(0.5).unwrap() - 0.5).abs() < 1e-6);
        assert!((w.total_deposited() - 0.5).abs() < 1e-6);
        assert!((w.receive(10.0).unwrap() - 1.5).abs() < 1e-6);
        assert!(!w.has_backlog());
        assert!((w.total_deposited() - 2.0).abs() < 1e-6);
    }
}

#[cfg(test)]
mod query_tests {
    use hive_core::{FlowerId, Vec2};

    use super::helpers::{rng, world};

    #[test]
    fn nearest_within_radius() {
        let mut w = world();
        let mut r = rng();
        w.add_flower_at(Vec2::new(100.0, 100.0), 1, Some(1.0), &mut r).unwrap();
        w.add_flower_at(Vec2::new(130.0, 100.0), 1, Some(1.0), &mut r).unwrap();
        let p = Vec2::new(125.0, 100.0);
        assert_eq!(w.nearest_available_within(p, 50.0), Some(FlowerId(1)));
        assert_eq!(w.nearest_available_within(p, 2.0), None);
    }

    #[test]
    fn ties_break_on_lowest_id() {
        let mut w = world();
        let mut r = rng();
        w.add_flower_at(Vec2::new(120.0, 100.0), 1, Some(1.0), &mut r).unwrap();
        w.add_flower_at(Vec2::new(80.0, 100.0), 1, Some(1.0), &mut r).unwrap();
        assert_eq!(w.nearest_available_within(Vec2::new(100.0, 100.0), 30.0), Some(FlowerId(0)));
    }

    #[test]
    fn depleted_flowers_are_skipped() {
        let mut w = world();
        let mut r = rng();
        w.add_flower_at(Vec2::new(100.0, 100.0), 1, Some(1.0), &mut r).unwrap();
        w.add_flower_at(Vec2::new(140.0, 100.0), 1, Some(1.0), &mut r).unwrap();
        w.consume_flower(FlowerId(0), 1.0).unwrap();
        assert_eq!(w.nearest_available_within(Vec2::new(100.0, 100.0), 60.0), Some(FlowerId(1)));
    }
}

#[cfg(test)]
mod weather_tests {
    use crate::{Weather, WeatherConfig, WeatherMode, WorldConfig};

    fn at(tod: f32) -> Weather {
        Weather::new(&WeatherConfig { start_tod: tod, ..WeatherConfig::default() })
    }

    #[test]
    fn default_starts_at_open_midday() {
        let w = Weather::default();
        assert!((w.tod() - 0.5).abs() < 1e-6);
        assert!((w.nectar_flow() - 1.0).abs() < 1e-4);
        assert!(w.foraging_open());
        assert_eq!(w.mode(), WeatherMode::Auto);
    }

    #[test]
    fn auto_flow_follows_daylight() {
        let night = at(0.0);
        assert!((night.nectar_flow() - 0.15).abs() < 1e-4);
        assert!(!night.foraging_open());

        let morning = at(0.25);
        assert!((morning.nectar_flow() - 0.575).abs() < 1e-3);
        assert!(morning.foraging_open());

        assert!(!at(0.05).foraging_open());
        assert!(!at(0.95).foraging_open());
    }

    #[test]
    fn step_wraps_the_day() {
        let mut w = at(0.9);
        w.step(120.0);
        assert!((w.tod() - 0.1).abs() < 1e-4);
        assert!(w.foraging_open());
        w.step(f32::NAN);
        assert!((w.tod() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn rain_closes_foraging_immediately() {
        let mut w = Weather::default();
        w.set_rain(true);
        assert!(w.is_raining());
        assert!(!w.foraging_open());
        w.set_rain(false);
        assert!(w.foraging_open());
    }

    #[test]
    fn manual_flow_is_clamped_and_pinned() {
        let mut w = at(0.0);
        w.set_mode(WeatherMode::Manual);
        assert!((w.nectar_flow() - 0.7).abs() < 1e-6);
        w.set_flow(3.0);
        assert_eq!(w.nectar_flow(), 1.0);
        w.set_flow(f32::INFINITY);
        assert_eq!(w.manual_flow(), 1.0);
        w.set_flow(-1.0);
        assert_eq!(w.nectar_flow(), 0.0);
        // Manual mode does not move the window.
        assert!(!w.foraging_open());
    }

    #[test]
    fn config_validation() {
        assert!(WeatherConfig::default().validate().is_ok());
        let bad = [
            WeatherConfig { day_length_secs: 30.0, ..WeatherConfig::default() },
            WeatherConfig { start_tod: 1.0, ..WeatherConfig::default() },
            WeatherConfig { manual_flow: 1.5, ..WeatherConfig::default() },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?}");
        }
        let world = WorldConfig {
            weather: WeatherConfig { day_length_secs: 0.0, ..WeatherConfig::default() },
            ..WorldConfig::default()
        };
        assert!(world.validate().is_err());
    }

    #[test]
    fn mode_parses_by_name() {
        assert_eq!("manual".parse::<WeatherMode>(), Ok(WeatherMode::Manual));
        assert_eq!("auto".parse::<WeatherMode>().map(|m| m.to_string()), Ok("auto".to_string()));
        assert!("sunny".parse::<WeatherMode>().is_err());
    }
}
