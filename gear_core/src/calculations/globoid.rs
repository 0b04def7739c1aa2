//! Globoid (hourglass) worm throat.
//!
//! The throat is the waist of the worm where it wraps the wheel. Its depth
//! below the pitch radius defaults to how far the worm pitch circle overlaps
//! the wheel pitch circle at the centre distance, never less than a small
//! fraction of the module.

use super::DesignInput;
use crate::equations;
use crate::model::GloboidThroat;

/// Smallest auto-derived throat reduction, in modules
pub const THROAT_REDUCTION_MIN_FACTOR: f64 = 0.02;

/// Auto throat reduction `r1 - (a - r2)`, clamped to `0.02 m`.
///
/// With the standard centre distance `a = r1 + r2` the overlap is zero, so the
/// clamp applies unless the caller shortened the centre distance.
///
/// # Example
/// ```rust
/// use gear_core::calculations::globoid::auto_throat_reduction;
///
/// assert!((auto_throat_reduction(2.0, 8.0, 30.0, 38.0) - 0.04).abs() < 1e-12);
/// assert!((auto_throat_reduction(2.0, 8.0, 30.0, 37.0) - 1.0).abs() < 1e-12);
/// ```
pub fn auto_throat_reduction(
    module_mm: f64,
    worm_pitch_radius_mm: f64,
    wheel_pitch_radius_mm: f64,
    centre_distance_mm: f64,
) -> f64 {
    let overlap = worm_pitch_radius_mm - (centre_distance_mm - wheel_pitch_radius_mm);
    overlap.max(module_mm * THROAT_REDUCTION_MIN_FACTOR)
}

/// Throat geometry for a globoid design. Explicit inputs win over derived values.
pub(crate) fn derive_throat(
    input: &DesignInput,
    module_mm: f64,
    worm_pitch_diameter_mm: f64,
    wheel_pitch_diameter_mm: f64,
    worm_tip_diameter_mm: f64,
    centre_distance_mm: f64,
) -> GloboidThroat {
    let worm_radius = worm_pitch_diameter_mm / 2.0;
    let reduction_mm = input.throat_reduction_mm.unwrap_or_else(|| {
        auto_throat_reduction(
            module_mm,
            worm_radius,
            wheel_pitch_diameter_mm / 2.0,
            centre_distance_mm,
        )
    });
    let arc_angle_deg = input.throat_arc_angle_deg.unwrap_or_else(|| {
        equations::throat_arc_angle_deg(worm_tip_diameter_mm, wheel_pitch_diameter_mm)
    });

    GloboidThroat {
        curvature_radius_mm: worm_radius - reduction_mm,
        reduction_mm,
        arc_angle_deg,
    }
}
