//! Unit tests for grow-core primitives.

#[cfg(test)]
mod ids {
    use crate::ids::{is_identifier, IdGenerator};

    #[test]
    fn ids_are_prefixed_and_unique() {
        let ids = IdGenerator::new();
        let a = ids.next("zone");
        let b = ids.next("zone");
        assert!(a.starts_with("zone-"));
        assert!(b.starts_with("zone-"));
        assert_ne!(a, b);
    }

    #[test]
    fn serials_never_restart_within_a_process() {
        let ids = IdGenerator::new();
        let before = ids.peek();
        ids.next("device");
        ids.next("device");
        assert_eq!(ids.peek(), before + 2);
    }

    #[test]
    fn starting_at_resumes_past_persisted_serials() {
        let ids = IdGenerator::starting_at(0x100);
        assert_eq!(ids.next("room"), "room-00000100");
    }

    #[test]
    fn identifier_syntax() {
        assert!(is_identifier("zone-0000002a"));
        assert!(is_identifier("method_basic"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("zone 12"));
        assert!(!is_identifier("zone.12"));
    }
}

#[cfg(test)]
mod time {
    use crate::time::{SimClock, Tick, TickLength};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(10)), 5u64);
    }

    #[test]
    fn clock_advances_and_stamps() {
        let mut clock = SimClock::new(1_000);
        assert_eq!(clock.tick, Tick::ZERO);
        assert!(clock.is_paused);
        clock.advance(2_000);
        clock.advance(3_000);
        assert_eq!(clock.tick, Tick(2));
        assert_eq!(clock.last_updated_unix_ms, 3_000);
        assert_eq!(clock.started_at_unix_ms, 1_000);
    }

    #[test]
    fn tick_length_conversions() {
        let hourly = TickLength::HOUR;
        assert_eq!(hourly.as_hours(), 1.0);
        assert_eq!(hourly.interval_ms(), 60_000.0);
        assert_eq!(hourly.ticks_for_hours(24), 24);
        assert_eq!(hourly.ticks_for_days(7), 168);

        let quarter = TickLength(15.0);
        assert_eq!(quarter.ticks_for_hours(1), 4);
        // partial tick rounds up
        assert_eq!(TickLength(45.0).ticks_for_hours(1), 2);
    }

    #[test]
    fn degenerate_tick_length_stalls_rates() {
        assert_eq!(TickLength(0.0).as_hours(), 0.0);
        assert_eq!(TickLength(f64::NAN).as_hours(), 0.0);
    }

    #[test]
    fn display() {
        assert_eq!(Tick(7).to_string(), "T7");
    }
}

#[cfg(test)]
mod error {
    use crate::error::{CommandError, DomainError, ErrorCode};

    #[test]
    fn codes_render_canonically() {
        assert_eq!(ErrorCode::NotFound.to_string(), "ERR_NOT_FOUND");
        assert_eq!(ErrorCode::InsufficientFunds.to_string(), "ERR_INSUFFICIENT_FUNDS");
    }

    #[test]
    fn domain_error_converts_to_command_error() {
        let err = DomainError::conflict(
            "Adding the zone would exceed the room area.",
            vec!["world.createZone".into(), "zone".into(), "area".into()],
        );
        let wire: CommandError = err.into();
        assert_eq!(wire.code, ErrorCode::Conflict);
        assert_eq!(wire.path.last().map(String::as_str), Some("area"));
    }
}

#[cfg(test)]
mod rng {
    use crate::rng::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn text_seeds_are_deterministic() {
        let mut a = SimRng::from_text("spring-run");
        let mut b = SimRng::from_text("spring-run");
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn children_diverge_from_parent() {
        let mut parent = SimRng::new(7);
        let mut c1 = parent.child(1);
        let mut c2 = parent.child(2);
        assert_ne!(c1.random::<u64>(), c2.random::<u64>());
    }

    #[test]
    fn gen_range_respects_bounds() {
        let mut rng = SimRng::new(9);
        for _ in 0..100 {
            let v = rng.gen_range(0.0..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }
}
