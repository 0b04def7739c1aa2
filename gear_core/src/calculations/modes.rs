//! Mode algebra: each design mode reduces its constraints to a module and a
//! worm pitch diameter.
//!
//! | Mode | Module | Worm pitch diameter |
//! |------|--------|---------------------|
//! | Envelope | `da2 / (z2 + 2(1 + x))` | `da1 - 2m` |
//! | FromWheel | `da2 / (z2 + 2(1 + x))` | scan for the target lead angle |
//! | FromModule | given | override, else `m z1 / tan γ0` |
//! | FromCentreDistance | `2a / (z1 / tan γ0 + z2)` | `m z1 / tan γ0` |

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{require_positive, DesignInput, DesignMode};
use crate::config::DesignPolicy;
use crate::equations;
use crate::errors::InfeasibleDesign;
use crate::standards::StandardsTable;

/// The two numbers every other quantity follows from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub module_mm: f64,
    pub worm_pitch_diameter_mm: f64,
}

/// Reduce `input.mode` to a draft.
pub(crate) fn draft(
    input: &DesignInput,
    num_teeth: u32,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> Result<Draft, InfeasibleDesign> {
    match &input.mode {
        DesignMode::Envelope {
            worm_od_mm,
            wheel_od_mm,
            ..
        } => envelope(*worm_od_mm, *wheel_od_mm, num_teeth, input.profile_shift),
        DesignMode::FromWheel {
            wheel_od_mm,
            target_lead_angle_deg,
        } => {
            let target = target_lead_angle(*target_lead_angle_deg, standards, policy)?;
            from_wheel(*wheel_od_mm, num_teeth, input.num_starts, input.profile_shift, target, policy)
        }
        DesignMode::FromModule {
            module_mm,
            worm_pitch_diameter_mm,
        } => from_module(*module_mm, *worm_pitch_diameter_mm, input.num_starts, policy),
        DesignMode::FromCentreDistance { centre_distance_mm } => {
            from_centre_distance(*centre_distance_mm, num_teeth, input.num_starts, policy)
        }
    }
}

/// Target lead angle for `FROM_WHEEL`, defaulting to the policy value
pub(crate) fn target_lead_angle(
    requested: Option<f64>,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> Result<f64, InfeasibleDesign> {
    let target = requested.unwrap_or(policy.default_lead_angle_deg);
    let limits = standards.lead_angle_limits_deg;
    if target.is_finite() && target > limits.min && target < limits.max {
        Ok(target)
    } else {
        Err(InfeasibleDesign::new(
            "target_lead_angle_deg",
            target.to_string(),
            format!(
                "Target lead angle must lie strictly between {}° and {}°",
                limits.min, limits.max
            ),
        ))
    }
}

/// Module that makes the wheel tip diameter equal `wheel_od_mm`
fn module_for_wheel_od(wheel_od_mm: f64, num_teeth: u32, profile_shift: f64) -> Result<f64, InfeasibleDesign> {
    let wheel_od_mm = require_positive("wheel_od_mm", wheel_od_mm)?;
    let module_mm = equations::module_from_wheel_tip(wheel_od_mm, num_teeth, profile_shift);
    if module_mm.is_finite() && module_mm > 0.0 {
        Ok(module_mm)
    } else {
        Err(InfeasibleDesign::new(
            "profile_shift",
            profile_shift.to_string(),
            "No positive module reaches the wheel OD with this profile shift",
        ))
    }
}

fn envelope(
    worm_od_mm: f64,
    wheel_od_mm: f64,
    num_teeth: u32,
    profile_shift: f64,
) -> Result<Draft, InfeasibleDesign> {
    let worm_od_mm = require_positive("worm_od_mm", worm_od_mm)?;
    let module_mm = module_for_wheel_od(wheel_od_mm, num_teeth, profile_shift)?;
    let worm_pitch_diameter_mm = worm_od_mm - 2.0 * equations::addendum(module_mm, 0.0);
    if worm_pitch_diameter_mm <= 0.0 {
        return Err(InfeasibleDesign::new(
            "worm_od_mm",
            worm_od_mm.to_string(),
            format!(
                "Worm OD leaves no pitch diameter at module {:.3} mm (needs more than {:.3} mm)",
                module_mm,
                2.0 * module_mm
            ),
        ));
    }
    Ok(Draft {
        module_mm,
        worm_pitch_diameter_mm,
    })
}

fn from_wheel(
    wheel_od_mm: f64,
    num_teeth: u32,
    num_starts: u32,
    profile_shift: f64,
    target_lead_angle_deg: f64,
    policy: &DesignPolicy,
) -> Result<Draft, InfeasibleDesign> {
    let module_mm = module_for_wheel_od(wheel_od_mm, num_teeth, profile_shift)?;
    let worm_pitch_diameter_mm =
        scan_worm_pitch_diameter(module_mm, num_starts, target_lead_angle_deg, policy);
    Ok(Draft {
        module_mm,
        worm_pitch_diameter_mm,
    })
}

fn from_module(
    module_mm: f64,
    worm_pitch_diameter_mm: Option<f64>,
    num_starts: u32,
    policy: &DesignPolicy,
) -> Result<Draft, InfeasibleDesign> {
    let module_mm = require_positive("module_mm", module_mm)?;
    let worm_pitch_diameter_mm = match worm_pitch_diameter_mm {
        Some(d1) => require_positive("worm_pitch_diameter_mm", d1)?,
        None => equations::pitch_diameter_for_lead_angle(
            module_mm,
            num_starts,
            policy.default_lead_angle_deg,
        ),
    };
    Ok(Draft {
        module_mm,
        worm_pitch_diameter_mm,
    })
}

/// `a = (m z1 / tan γ0 + m z2) / 2` solved for `m`
fn from_centre_distance(
    centre_distance_mm: f64,
    num_teeth: u32,
    num_starts: u32,
    policy: &DesignPolicy,
) -> Result<Draft, InfeasibleDesign> {
    let a = require_positive("centre_distance_mm", centre_distance_mm)?;
    let tan_gamma = policy.default_lead_angle_deg.to_radians().tan();
    let z1 = f64::from(num_starts);
    let z2 = f64::from(num_teeth);
    let module_mm = 2.0 * a / (z1 / tan_gamma + z2);
    let module_mm = require_positive("module_mm", module_mm)?;
    Ok(Draft {
        module_mm,
        worm_pitch_diameter_mm: module_mm * z1 / tan_gamma,
    })
}

/// Worm pitch diameter whose lead angle is closest to the target.
///
/// Scans `[q_min·m, q_max·m]` at the policy step, coarsening the step so no
/// more than `scan_max_samples` diameters are tried. The first (smallest)
/// diameter wins a tie.
///
/// # Example
/// ```rust
/// use gear_core::calculations::scan_worm_pitch_diameter;
/// use gear_core::config::DesignPolicy;
/// use gear_core::equations::{lead, lead_angle_deg};
///
/// let d1 = scan_worm_pitch_diameter(2.0, 1, 10.0, &DesignPolicy::default());
/// let gamma = lead_angle_deg(lead(2.0, 1), d1);
/// assert!((gamma - 10.0).abs() < 0.1);
/// ```
pub fn scan_worm_pitch_diameter(
    module_mm: f64,
    num_starts: u32,
    target_lead_angle_deg: f64,
    policy: &DesignPolicy,
) -> f64 {
    let lead_mm = equations::lead(module_mm, num_starts);
    let lower = module_mm * policy.scan_min_quotient;
    let upper = (module_mm * policy.scan_max_quotient).max(lower);
    let span = upper - lower;

    let max_intervals = policy.scan_max_samples.max(2) - 1;
    let mut step = policy.scan_step_mm.max(f64::EPSILON);
    if span / step > max_intervals as f64 {
        step = span / max_intervals as f64;
    }
    let intervals = ((span / step).floor() as usize).min(max_intervals);

    let mut best_diameter = lower;
    let mut best_error = f64::INFINITY;
    for i in 0..=intervals {
        let diameter = lower + i as f64 * step;
        let error = (equations::lead_angle_deg(lead_mm, diameter) - target_lead_angle_deg).abs();
        if error < best_error {
            best_error = error;
            best_diameter = diameter;
        }
    }

    debug!(
        samples = intervals + 1,
        step_mm = step,
        worm_pitch_diameter_mm = best_diameter,
        lead_angle_error_deg = best_error,
        "worm pitch diameter scan"
    );
    best_diameter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> DesignPolicy {
        DesignPolicy::default()
    }

    #[test]
    fn test_envelope_draft() {
        // 65 / (30 + 2) = 2.03125; d1 = 20 - 2 × 2.03125 = 15.9375
        let draft = envelope(20.0, 65.0, 30, 0.0).unwrap();
        assert!((draft.module_mm - 2.03125).abs() < 1e-12);
        assert!((draft.worm_pitch_diameter_mm - 15.9375).abs() < 1e-12);
    }

    #[test]
    fn test_envelope_worm_too_small() {
        let err = envelope(4.0, 65.0, 30, 0.0).unwrap_err();
        assert_eq!(err.field, "worm_od_mm");
    }

    #[test]
    fn test_envelope_rejects_zero_od() {
        assert_eq!(envelope(0.0, 65.0, 30, 0.0).unwrap_err().field, "worm_od_mm");
        assert_eq!(envelope(20.0, -1.0, 30, 0.0).unwrap_err().field, "wheel_od_mm");
    }

    #[test]
    fn test_from_module_default_lead_angle() {
        let draft = from_module(2.0, None, 1, &policy()).unwrap();
        assert!((draft.worm_pitch_diameter_mm - 2.0 / 10f64.to_radians().tan()).abs() < 1e-12);
    }

    #[test]
    fn test_from_module_rejects_bad_override() {
        let err = from_module(2.0, Some(0.0), 1, &policy()).unwrap_err();
        assert_eq!(err.field, "worm_pitch_diameter_mm");
    }

    #[test]
    fn test_from_centre_distance_hits_target() {
        let draft = from_centre_distance(40.0, 30, 1, &policy()).unwrap();
        let a = equations::centre_distance(
            draft.worm_pitch_diameter_mm,
            equations::wheel_pitch_diameter(draft.module_mm, 30),
        );
        assert!((a - 40.0).abs() < 1e-9);
        let gamma = equations::lead_angle_deg(equations::lead(draft.module_mm, 1), draft.worm_pitch_diameter_mm);
        assert!((gamma - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_scan_respects_range() {
        let p = policy();
        // Target far steeper than any diameter in range: lower bound wins
        let d1 = scan_worm_pitch_diameter(2.0, 1, 80.0, &p);
        assert!((d1 - 2.0 * p.scan_min_quotient).abs() < 1e-12);
        // Target far shallower: ends near the upper bound
        let d1 = scan_worm_pitch_diameter(2.0, 1, 0.1, &p);
        assert!(d1 <= 2.0 * p.scan_max_quotient + 1e-9);
        assert!(d1 > 2.0 * p.scan_max_quotient - 0.1);
    }

    #[test]
    fn test_scan_sample_budget() {
        let p = policy();
        // Module 25 would need 13 500 samples at 0.05 mm; the step coarsens instead
        let d1 = scan_worm_pitch_diameter(25.0, 2, 10.0, &p);
        let gamma = equations::lead_angle_deg(equations::lead(25.0, 2), d1);
        assert!((gamma - 10.0).abs() < 0.1);
    }

    #[test]
    fn test_target_lead_angle_limits() {
        let table = StandardsTable::din();
        assert_eq!(target_lead_angle(None, table, &policy()).unwrap(), 10.0);
        assert!(target_lead_angle(Some(0.0), table, &policy()).is_err());
        assert!(target_lead_angle(Some(85.0), table, &policy()).is_err());
        assert!(target_lead_angle(Some(45.0), table, &policy()).is_ok());
    }
}
