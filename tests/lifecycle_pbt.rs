use ovel_core::containment::Containment;
use ovel_core::registry::phase_for_age;
use ovel_lib::{LifecyclePhase, Seed, Simulation, StagePreset, Vec2, DEFAULT_DELTA};
use proptest::prelude::*;

prop_compose! {
    fn arb_breakpoints()(
        bloom in 1u64..200,
        mature_gap in 1u64..200,
        elder_gap in 1u64..200
    ) -> [u64; 3] {
        [bloom, bloom + mature_gap, bloom + mature_gap + elder_gap]
    }
}

prop_compose! {
    fn arb_point()(
        x in -5.0f64..5.0,
        y in -5.0f64..5.0
    ) -> Vec2 {
        Vec2::new(x, y)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_phase_monotone_in_age(
        breakpoints in arb_breakpoints(),
        age in 0u64..800,
        step in 0u64..100
    ) {
        let earlier = phase_for_age(age, &breakpoints);
        let later = phase_for_age(age + step, &breakpoints);
        prop_assert!(later >= earlier, "{} -> {} after {} more ticks", earlier, later, step);
    }

    #[test]
    fn test_phase_boundaries(breakpoints in arb_breakpoints()) {
        prop_assert_eq!(phase_for_age(0, &breakpoints), LifecyclePhase::Spark);
        prop_assert_eq!(phase_for_age(breakpoints[0], &breakpoints), LifecyclePhase::Bloom);
        prop_assert_eq!(phase_for_age(breakpoints[1], &breakpoints), LifecyclePhase::Mature);
        prop_assert_eq!(phase_for_age(breakpoints[2], &breakpoints), LifecyclePhase::Elder);
    }

    #[test]
    fn test_clamp_lands_on_circle(
        candidate in arb_point(),
        velocity in arb_point(),
        radius in 0.5f64..2.0
    ) {
        let containment = Containment::new(radius, radius);
        match containment.clamp_probe(candidate, velocity) {
            Some((position, reflected)) => {
                prop_assert!((position.length() - radius).abs() < 1e-9);
                let normal = position * (1.0 / radius);
                prop_assert!(reflected.dot(normal) <= 1e-9);
                prop_assert!((reflected.length() - velocity.length()).abs() < 1e-9);
            }
            None => prop_assert!(candidate.length() <= radius),
        }
    }

    #[test]
    fn test_field_values_bounded(point in arb_point(), seed in any::<u64>()) {
        let sim = Simulation::new(seed);
        let density = sim.density(point);
        let energy = sim.energy(point);
        prop_assert!((0.0..=1.0).contains(&density));
        prop_assert!((-1.0..=1.0).contains(&energy));
    }

    #[test]
    fn test_integer_seeds_accepted(value in -9_007_199_254_740_991i64..9_007_199_254_740_991i64) {
        let seed = Seed::try_from(value as f64);
        prop_assert_eq!(seed, Ok(Seed::from(value)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn test_any_seed_is_reproducible(seed in any::<u64>()) {
        let preset = StagePreset::default();
        let mut first = Simulation::new(seed);
        let mut second = Simulation::new(seed);
        first.run(&preset, DEFAULT_DELTA, 30).unwrap();
        second.run(&preset, DEFAULT_DELTA, 30).unwrap();
        prop_assert_eq!(first.state_digest(), second.state_digest());
        prop_assert!(first.metrics().is_finite());
    }
}
