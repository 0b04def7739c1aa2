//! # Worm Gear Equations
//!
//! Closed-form relations shared by the derivation engine and the validator.
//! Keeping them in one place makes it easy to check them against DIN 3975.
//!
//! ## Notation
//!
//! - `m` = module (axial module of the worm = transverse module of the wheel)
//! - `z1` = worm thread starts, `z2` = wheel teeth
//! - `d1`, `d2` = worm / wheel pitch diameters
//! - `x` = profile shift coefficient
//! - `γ` = lead angle, `φ` = friction angle
//! - `a` = centre distance
//!
//! ## Conventions
//!
//! - Addendum `ha = m(1 + x)`, dedendum `hf = m(1.2 - x)`. The 0.2 m bottom
//!   clearance is fixed.
//! - Angles are passed and returned in degrees.
//!
//! ## References
//!
//! - DIN 3975-1:2017 Terms and definitions for cylindrical worm gears
//! - DIN 3996:2019 Calculation of load capacity of cylindrical worm gears

use std::f64::consts::PI;

/// Bottom clearance factor: dedendum = module × (CLEARANCE_FACTOR - x)
pub const CLEARANCE_FACTOR: f64 = 1.2;

/// Tooth addendum `ha = m(1 + x)`
#[inline]
pub fn addendum(module_mm: f64, profile_shift: f64) -> f64 {
    module_mm * (1.0 + profile_shift)
}

/// Tooth dedendum `hf = m(1.2 - x)`
#[inline]
pub fn dedendum(module_mm: f64, profile_shift: f64) -> f64 {
    module_mm * (CLEARANCE_FACTOR - profile_shift)
}

/// Tip diameter `da = d + 2ha`
#[inline]
pub fn tip_diameter(pitch_diameter_mm: f64, module_mm: f64, profile_shift: f64) -> f64 {
    pitch_diameter_mm + 2.0 * addendum(module_mm, profile_shift)
}

/// Root diameter `df = d - 2hf`
#[inline]
pub fn root_diameter(pitch_diameter_mm: f64, module_mm: f64, profile_shift: f64) -> f64 {
    pitch_diameter_mm - 2.0 * dedendum(module_mm, profile_shift)
}

/// Worm lead `pz = π m z1`
///
/// # Example
/// ```rust
/// use gear_core::equations::lead;
///
/// // Module 2, single start: one axial pitch
/// assert!((lead(2.0, 1) - 6.2832).abs() < 1e-4);
/// ```
#[inline]
pub fn lead(module_mm: f64, num_starts: u32) -> f64 {
    module_mm * PI * f64::from(num_starts)
}

/// Axial pitch `px = π m`
#[inline]
pub fn axial_pitch(module_mm: f64) -> f64 {
    module_mm * PI
}

/// Lead angle `γ = atan(pz / (π d1))`
#[inline]
pub fn lead_angle_deg(lead_mm: f64, worm_pitch_diameter_mm: f64) -> f64 {
    (lead_mm / (PI * worm_pitch_diameter_mm)).atan().to_degrees()
}

/// Worm pitch diameter that gives lead angle `γ`: `d1 = m z1 / tan γ`
#[inline]
pub fn pitch_diameter_for_lead_angle(module_mm: f64, num_starts: u32, lead_angle_deg: f64) -> f64 {
    module_mm * f64::from(num_starts) / lead_angle_deg.to_radians().tan()
}

/// Wheel pitch diameter `d2 = m z2`
#[inline]
pub fn wheel_pitch_diameter(module_mm: f64, num_teeth: u32) -> f64 {
    module_mm * f64::from(num_teeth)
}

/// Centre distance `a = (d1 + d2) / 2`
#[inline]
pub fn centre_distance(worm_pitch_diameter_mm: f64, wheel_pitch_diameter_mm: f64) -> f64 {
    (worm_pitch_diameter_mm + wheel_pitch_diameter_mm) / 2.0
}

/// Module from a wheel tip diameter: `da2 = m z2 + 2m(1 + x)` solved for `m`
#[inline]
pub fn module_from_wheel_tip(wheel_tip_diameter_mm: f64, num_teeth: u32, profile_shift: f64) -> f64 {
    wheel_tip_diameter_mm / (f64::from(num_teeth) + 2.0 * (1.0 + profile_shift))
}

/// Efficiency of the worm driving the wheel, in percent
///
/// # Formula
/// η = 100 · tan γ / tan(γ + φ)
///
/// Returns 0 when γ ≤ 0 and caps at 100 when γ + φ reaches 90°.
///
/// # Example
/// ```rust
/// use gear_core::equations::efficiency_percent;
///
/// let phi = 0.05_f64.atan().to_degrees();
/// let eta = efficiency_percent(10.0, phi);
/// assert!(eta > 75.0 && eta < 80.0);
/// ```
pub fn efficiency_percent(lead_angle_deg: f64, friction_angle_deg: f64) -> f64 {
    if lead_angle_deg <= 0.0 {
        return 0.0;
    }
    if lead_angle_deg + friction_angle_deg >= 90.0 {
        return 100.0;
    }
    let gamma = lead_angle_deg.to_radians();
    let phi = friction_angle_deg.to_radians();
    100.0 * gamma.tan() / (gamma + phi).tan()
}

/// The wheel cannot back-drive the worm when γ < φ
#[inline]
pub fn is_self_locking(lead_angle_deg: f64, friction_angle_deg: f64) -> bool {
    lead_angle_deg < friction_angle_deg
}

/// Half-chord of a circle of `radius` cut by a line `offset` from its centre.
///
/// Zero when the line misses the circle.
#[inline]
pub fn half_chord(radius: f64, offset: f64) -> f64 {
    let squared = radius * radius - offset * offset;
    if squared > 0.0 {
        squared.sqrt()
    } else {
        0.0
    }
}

/// Worm length over which the wheel tip circle penetrates the worm tip cylinder
///
/// `L_min = 2 √(ra2² - (a - ra1)²)`
pub fn min_worm_length(centre_distance_mm: f64, worm_tip_diameter_mm: f64, wheel_tip_diameter_mm: f64) -> f64 {
    let offset = centre_distance_mm - worm_tip_diameter_mm / 2.0;
    2.0 * half_chord(wheel_tip_diameter_mm / 2.0, offset)
}

/// Wheel face width over which the wheel tip meets the worm pitch cylinder
///
/// `b_min = 2 √(r1² - (a - ra2)²)`
pub fn min_wheel_width(centre_distance_mm: f64, worm_pitch_diameter_mm: f64, wheel_tip_diameter_mm: f64) -> f64 {
    let offset = centre_distance_mm - wheel_tip_diameter_mm / 2.0;
    2.0 * half_chord(worm_pitch_diameter_mm / 2.0, offset)
}

/// Full-engagement wheel width: chord of the worm tip circle at the wheel tip
///
/// `b = 2 √(ra1² - (a - ra2)²)`
pub fn full_wheel_width(centre_distance_mm: f64, worm_tip_diameter_mm: f64, wheel_tip_diameter_mm: f64) -> f64 {
    let offset = centre_distance_mm - wheel_tip_diameter_mm / 2.0;
    2.0 * half_chord(worm_tip_diameter_mm / 2.0, offset)
}

/// Globoid wrap angle: the wheel pitch-circle arc spanned by the worm tip
/// radius either side of the centre line, capped at 90°
///
/// `θ = 2 asin(min(1, ra1 / r2))`
pub fn throat_arc_angle_deg(worm_tip_diameter_mm: f64, wheel_pitch_diameter_mm: f64) -> f64 {
    let ratio = (worm_tip_diameter_mm / wheel_pitch_diameter_mm).clamp(0.0, 1.0);
    (2.0 * ratio.asin().to_degrees()).min(90.0)
}

/// Round to `decimals` places, ties to even
///
/// ```rust
/// use gear_core::equations::round_to;
///
/// assert_eq!(round_to(5.25, 1), 5.2);
/// assert_eq!(round_to(35.6713, 2), 35.67);
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
