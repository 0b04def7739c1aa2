//! Property-based tests for design invariants using the `proptest` crate.

use std::f64::consts::PI;

use proptest::prelude::*;

use gear_core::calculations::{solve, DesignInput, DesignMode};
use gear_core::equations::throat_arc_angle_deg;
use gear_core::model::{DesignResult, Hand};
use gear_core::validation::validate;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_hand() -> impl Strategy<Value = Hand> {
    prop_oneof![Just(Hand::Right), Just(Hand::Left)]
}

fn arb_mode() -> impl Strategy<Value = DesignMode> {
    prop_oneof![
        (8.0f64..80.0, 20.0f64..400.0, any::<bool>()).prop_map(|(worm_od_mm, wheel_od_mm, od_as_maximum)| {
            DesignMode::Envelope {
                worm_od_mm,
                wheel_od_mm,
                od_as_maximum,
            }
        }),
        (20.0f64..400.0, proptest::option::of(2.0f64..30.0)).prop_map(
            |(wheel_od_mm, target_lead_angle_deg)| DesignMode::FromWheel {
                wheel_od_mm,
                target_lead_angle_deg,
            }
        ),
        (0.5f64..6.0, proptest::option::of(6.0f64..80.0)).prop_map(|(module_mm, worm_pitch_diameter_mm)| {
            DesignMode::FromModule {
                module_mm,
                worm_pitch_diameter_mm,
            }
        }),
        (20.0f64..300.0).prop_map(|centre_distance_mm| DesignMode::FromCentreDistance { centre_distance_mm }),
    ]
}

prop_compose! {
    fn arb_input()(
        mode in arb_mode(),
        ratio in 1u32..80,
        starts in 1u32..5,
        hand in arb_hand(),
        shift in -0.5f64..0.5,
        standard in any::<bool>(),
        globoid in any::<bool>(),
    ) -> DesignInput {
        let mut input = DesignInput::new(mode, ratio)
            .with_starts(starts)
            .with_hand(hand)
            .with_profile_shift(shift);
        input.use_standard_module = standard;
        if globoid {
            input = input.globoid();
        }
        input
    }
}

/// |a - b| within 1e-6 relative to the larger magnitude (absolute below 1)
fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

fn check_invariants(design: &DesignResult) -> Result<(), TestCaseError> {
    let worm = &design.worm;
    let wheel = &design.wheel;
    let assembly = &design.assembly;
    let m = worm.module_mm;

    prop_assert!(close(
        assembly.centre_distance_mm,
        (worm.pitch_diameter_mm + wheel.pitch_diameter_mm) / 2.0
    ));
    prop_assert_eq!(wheel.num_teeth, assembly.ratio * worm.num_starts);
    prop_assert!(close(wheel.pitch_diameter_mm, m * f64::from(wheel.num_teeth)));
    prop_assert!(close(worm.lead_mm, m * PI * f64::from(worm.num_starts)));
    prop_assert!(close(
        worm.lead_angle_deg.to_radians().tan(),
        worm.lead_mm / (PI * worm.pitch_diameter_mm)
    ));

    prop_assert_eq!(worm.profile_shift, 0.0);
    prop_assert!(close(worm.tip_diameter_mm, worm.pitch_diameter_mm + 2.0 * m));
    prop_assert!(close(worm.root_diameter_mm, worm.pitch_diameter_mm - 2.0 * m * 1.2));

    let x = wheel.profile_shift;
    prop_assert!(close(wheel.tip_diameter_mm, wheel.pitch_diameter_mm + 2.0 * m * (1.0 + x)));
    prop_assert!(close(wheel.root_diameter_mm, wheel.pitch_diameter_mm - 2.0 * m * (1.2 - x)));

    prop_assert_eq!(design.valid, design.errors().next().is_none());
    Ok(())
}

// ---------------------------------------------------------------------------
// 1. Geometric invariants hold for every mode and hand
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn solved_designs_are_self_consistent(input in arb_input()) {
        if let Ok(design) = solve(&input) {
            check_invariants(&design)?;
            prop_assert_eq!(design.worm.hand, input.hand);
            prop_assert_eq!(design.assembly.hand, input.hand);
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Idempotence: identical inputs give bit-identical designs
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn solve_is_idempotent(input in arb_input()) {
        let first = solve(&input);
        let second = solve(&input);
        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// 3. Round-trip through FROM_MODULE with a worm pitch diameter override
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn from_module_reproduces_centre_distance(input in arb_input()) {
        if let Ok(original) = solve(&input) {
            let mut reload = DesignInput::new(
                DesignMode::FromModule {
                    module_mm: original.worm.module_mm,
                    worm_pitch_diameter_mm: Some(original.worm.pitch_diameter_mm),
                },
                original.assembly.ratio,
            )
            .with_starts(original.worm.num_starts)
            .with_profile_shift(original.wheel.profile_shift);
            reload.worm_type = original.worm.worm_type;

            let reloaded = solve(&reload).unwrap();
            prop_assert!(
                (reloaded.assembly.centre_distance_mm - original.assembly.centre_distance_mm).abs() < 1e-6
            );
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Monotonicity in ratio
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn larger_ratio_grows_wheel_and_centre_distance(
        module_mm in 0.5f64..6.0,
        ratio in 1u32..100,
        starts in 1u32..5,
    ) {
        let small = solve(&DesignInput::from_module(module_mm, ratio).with_starts(starts)).unwrap();
        let large = solve(&DesignInput::from_module(module_mm, ratio + 1).with_starts(starts)).unwrap();
        prop_assert!(large.wheel.pitch_diameter_mm > small.wheel.pitch_diameter_mm);
        prop_assert!(large.assembly.centre_distance_mm > small.assembly.centre_distance_mm);
    }
}

// ---------------------------------------------------------------------------
// 5. Validator determinism
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn validator_is_deterministic(input in arb_input()) {
        if let Ok(design) = solve(&input) {
            let first = validate(&design);
            let second = validate(&design);
            prop_assert_eq!(first.codes(), second.codes());
            prop_assert_eq!(&first.messages, &design.diagnostics);
        }
    }
}

// ---------------------------------------------------------------------------
// 6. Envelope with od_as_maximum never exceeds the requested ODs
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn envelope_maximum_respects_ods(
        worm_od_mm in 8.0f64..80.0,
        wheel_od_mm in 20.0f64..400.0,
        ratio in 10u32..80,
    ) {
        let mut input = DesignInput::new(
            DesignMode::Envelope { worm_od_mm, wheel_od_mm, od_as_maximum: true },
            ratio,
        );
        input.use_standard_module = true;
        if let Ok(design) = solve(&input) {
            prop_assert!(design.worm.tip_diameter_mm <= worm_od_mm + 1e-6);
            prop_assert!(design.wheel.tip_diameter_mm <= wheel_od_mm + 1e-6);
        }
    }
}

// ---------------------------------------------------------------------------
// 7. Centre distance mode matches the request, snapped or not
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn centre_distance_mode_is_exact(
        centre_distance_mm in 20.0f64..300.0,
        ratio in 5u32..60,
        standard in any::<bool>(),
    ) {
        let mut input = DesignInput::from_centre_distance(centre_distance_mm, ratio);
        input.use_standard_module = standard;
        if let Ok(design) = solve(&input) {
            prop_assert!((design.assembly.centre_distance_mm - centre_distance_mm).abs() < 1e-6);
        }
    }
}

// ---------------------------------------------------------------------------
// 8. Throat arc angle is 2·asin(ra1 / r2), capped at 90°
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn globoid_throat_arc_formula(
        module_mm in 0.5f64..6.0,
        ratio in 1u32..80,
        worm_pitch_diameter_mm in 6.0f64..80.0,
    ) {
        let mut input = DesignInput::new(
            DesignMode::FromModule { module_mm, worm_pitch_diameter_mm: Some(worm_pitch_diameter_mm) },
            ratio,
        )
        .globoid();
        input.throat_reduction_mm = None;
        if let Ok(design) = solve(&input) {
            let throat = design.worm.throat.unwrap();
            let ratio = (design.worm.tip_diameter_mm / design.wheel.pitch_diameter_mm).min(1.0);
            let expected = (2.0 * ratio.asin().to_degrees()).min(90.0);
            prop_assert!((throat.arc_angle_deg - expected).abs() < 1e-9);
            prop_assert!(
                (throat.arc_angle_deg
                    - throat_arc_angle_deg(design.worm.tip_diameter_mm, design.wheel.pitch_diameter_mm))
                .abs()
                    < 1e-12
            );
            prop_assert!(throat.arc_angle_deg > 0.0 && throat.arc_angle_deg <= 90.0);
            prop_assert!(throat.reduction_mm >= 0.02 * design.worm.module_mm - 1e-12);
        }
    }
}
