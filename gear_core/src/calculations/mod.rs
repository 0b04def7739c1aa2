//! # Derivation Engine
//!
//! Turns one of four partial constraint sets into a complete, self-consistent
//! worm/wheel design, optionally snaps the module to the preferred series,
//! and runs the validator on the result.
//!
//! ```text
//! DesignInput ──► draft (mode algebra) ──► snap (optional) ──► build ──► validate ──► DesignResult
//! ```
//!
//! Every quantity of the finished design follows from two numbers, the module
//! and the worm pitch diameter, so the modes only have to produce that pair.
//! The remaining relations are fixed:
//!
//! - `z2 = ratio × z1`, `d2 = m z2`, `a = (d1 + d2) / 2`
//! - `pz = π m z1`, `γ = atan(pz / (π d1))`
//! - tip/root from addendum `m(1 + x)` and dedendum `m(1.2 - x)`; the worm never
//!   carries profile shift
//!
//! ## Example
//!
//! ```rust
//! use gear_core::calculations::{solve, DesignInput};
//!
//! let input = DesignInput::from_module(2.0, 30);
//! let design = solve(&input).unwrap();
//!
//! assert_eq!(design.wheel.num_teeth, 30);
//! assert!((design.wheel.pitch_diameter_mm - 60.0).abs() < 1e-9);
//! assert!(design.valid);
//! ```

pub mod globoid;
pub mod modes;
pub mod snapping;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::bore::{recommend_bore_with, resolve_bore};
use crate::config::DesignPolicy;
use crate::equations;
use crate::errors::InfeasibleDesign;
use crate::model::{
    AntiRotation, AssemblySpec, BoreSpec, DesignResult, GenerationMethod, Hand, ManufacturingSpec,
    Profile, WheelSpec, WormSpec, WormType,
};
use crate::standards::StandardsTable;
use crate::validation::validate_with;

pub use modes::{scan_worm_pitch_diameter, Draft};

/// Which constraint set drives the design.
///
/// ## JSON Example
///
/// ```json
/// { "mode": "envelope", "worm_od_mm": 20.0, "wheel_od_mm": 65.0, "od_as_maximum": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DesignMode {
    /// Fit a worm and wheel into given outside diameters
    Envelope {
        worm_od_mm: f64,
        wheel_od_mm: f64,
        /// Treat the ODs as upper bounds when snapping the module
        #[serde(default)]
        od_as_maximum: bool,
    },
    /// Size from the wheel OD, aiming the worm at a lead angle
    FromWheel {
        wheel_od_mm: f64,
        #[serde(default)]
        target_lead_angle_deg: Option<f64>,
    },
    /// Module given; worm sized by the default lead angle or an explicit diameter
    FromModule {
        module_mm: f64,
        #[serde(default)]
        worm_pitch_diameter_mm: Option<f64>,
    },
    /// Match a centre distance exactly
    FromCentreDistance { centre_distance_mm: f64 },
}

impl DesignMode {
    /// Wire name of the mode
    pub fn name(&self) -> &'static str {
        match self {
            DesignMode::Envelope { .. } => "envelope",
            DesignMode::FromWheel { .. } => "from_wheel",
            DesignMode::FromModule { .. } => "from_module",
            DesignMode::FromCentreDistance { .. } => "from_centre_distance",
        }
    }
}

/// Manufacturing inputs passed through to the geometry generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ManufacturingInput {
    /// Explicit worm length; derived from the engagement zone when absent (mm)
    pub worm_length_mm: Option<f64>,
    /// Explicit wheel face width; derived when absent (mm)
    pub wheel_width_mm: Option<f64>,
    pub generation_method: GenerationMethod,
    pub virtual_hobbing: bool,
    /// Defaults to the policy value
    pub hobbing_steps: Option<u32>,
}

/// Caller overrides for the bore advisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BoreOverrides {
    pub worm_bore_mm: Option<f64>,
    pub wheel_bore_mm: Option<f64>,
    pub worm_anti_rotation: Option<AntiRotation>,
    pub wheel_anti_rotation: Option<AntiRotation>,
}

/// Everything the engine needs for one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignInput {
    #[serde(flatten)]
    pub mode: DesignMode,

    /// Wheel teeth per worm start
    pub ratio: u32,

    /// Worm thread starts
    pub num_starts: u32,

    pub pressure_angle_deg: f64,

    pub backlash_mm: f64,

    pub hand: Hand,

    /// Wheel profile shift coefficient (the worm is never shifted)
    pub profile_shift: f64,

    pub profile: Profile,

    pub worm_type: WormType,

    /// Snap the derived module to the DIN 780 series
    pub use_standard_module: bool,

    /// Globoid only; auto-derived when absent (mm)
    pub throat_reduction_mm: Option<f64>,

    /// Globoid only; auto-derived from the wrap geometry when absent (deg)
    pub throat_arc_angle_deg: Option<f64>,

    pub wheel_throated: bool,

    /// Stub-tooth tip reduction of the wheel (mm)
    pub wheel_tip_reduction_mm: Option<f64>,

    #[serde(default)]
    pub manufacturing: ManufacturingInput,

    #[serde(default)]
    pub bores: BoreOverrides,
}

impl DesignInput {
    /// Input with every common field at its default.
    pub fn new(mode: DesignMode, ratio: u32) -> Self {
        DesignInput {
            mode,
            ratio,
            num_starts: 1,
            pressure_angle_deg: 20.0,
            backlash_mm: 0.0,
            hand: Hand::Right,
            profile_shift: 0.0,
            profile: Profile::Za,
            worm_type: WormType::Cylindrical,
            use_standard_module: false,
            throat_reduction_mm: None,
            throat_arc_angle_deg: None,
            wheel_throated: false,
            wheel_tip_reduction_mm: None,
            manufacturing: ManufacturingInput::default(),
            bores: BoreOverrides::default(),
        }
    }

    pub fn envelope(worm_od_mm: f64, wheel_od_mm: f64, ratio: u32) -> Self {
        Self::new(
            DesignMode::Envelope {
                worm_od_mm,
                wheel_od_mm,
                od_as_maximum: false,
            },
            ratio,
        )
    }

    pub fn from_wheel(wheel_od_mm: f64, ratio: u32, target_lead_angle_deg: Option<f64>) -> Self {
        Self::new(
            DesignMode::FromWheel {
                wheel_od_mm,
                target_lead_angle_deg,
            },
            ratio,
        )
    }

    pub fn from_module(module_mm: f64, ratio: u32) -> Self {
        Self::new(
            DesignMode::FromModule {
                module_mm,
                worm_pitch_diameter_mm: None,
            },
            ratio,
        )
    }

    pub fn from_centre_distance(centre_distance_mm: f64, ratio: u32) -> Self {
        Self::new(DesignMode::FromCentreDistance { centre_distance_mm }, ratio)
    }

    pub fn with_starts(mut self, num_starts: u32) -> Self {
        self.num_starts = num_starts;
        self
    }

    pub fn with_hand(mut self, hand: Hand) -> Self {
        self.hand = hand;
        self
    }

    pub fn with_pressure_angle(mut self, pressure_angle_deg: f64) -> Self {
        self.pressure_angle_deg = pressure_angle_deg;
        self
    }

    pub fn with_profile_shift(mut self, profile_shift: f64) -> Self {
        self.profile_shift = profile_shift;
        self
    }

    pub fn with_standard_module(mut self) -> Self {
        self.use_standard_module = true;
        self
    }

    pub fn globoid(mut self) -> Self {
        self.worm_type = WormType::Globoid;
        self
    }

    /// Validate the mode-independent inputs.
    pub fn validate(&self, standards: &StandardsTable) -> Result<(), InfeasibleDesign> {
        if self.ratio < 1 {
            return Err(InfeasibleDesign::new(
                "ratio",
                self.ratio.to_string(),
                "Ratio must be at least 1",
            ));
        }
        if self.num_starts < 1 {
            return Err(InfeasibleDesign::new(
                "num_starts",
                self.num_starts.to_string(),
                "The worm needs at least one thread start",
            ));
        }
        let limits = standards.pressure_angle_limits_deg;
        if !self.pressure_angle_deg.is_finite() || !limits.contains(self.pressure_angle_deg) {
            return Err(InfeasibleDesign::new(
                "pressure_angle_deg",
                self.pressure_angle_deg.to_string(),
                format!("Pressure angle must be between {}° and {}°", limits.min, limits.max),
            ));
        }
        if !self.backlash_mm.is_finite() || self.backlash_mm < 0.0 {
            return Err(InfeasibleDesign::new(
                "backlash_mm",
                self.backlash_mm.to_string(),
                "Backlash cannot be negative",
            ));
        }
        if !self.profile_shift.is_finite() {
            return Err(InfeasibleDesign::new(
                "profile_shift",
                self.profile_shift.to_string(),
                "Profile shift must be a finite number",
            ));
        }
        if let Some(reduction) = self.throat_reduction_mm {
            if !reduction.is_finite() {
                return Err(InfeasibleDesign::new(
                    "throat_reduction_mm",
                    reduction.to_string(),
                    "Throat reduction must be a finite number",
                ));
            }
        }
        if let Some(arc) = self.throat_arc_angle_deg {
            if !arc.is_finite() || arc <= 0.0 || arc >= 180.0 {
                return Err(InfeasibleDesign::new(
                    "throat_arc_angle_deg",
                    arc.to_string(),
                    "Throat arc angle must be between 0° and 180°",
                ));
            }
        }
        if let Some(reduction) = self.wheel_tip_reduction_mm {
            if !reduction.is_finite() || reduction < 0.0 {
                return Err(InfeasibleDesign::new(
                    "wheel_tip_reduction_mm",
                    reduction.to_string(),
                    "Tip reduction cannot be negative",
                ));
            }
        }
        require_positive_opt("worm_length_mm", self.manufacturing.worm_length_mm)?;
        require_positive_opt("wheel_width_mm", self.manufacturing.wheel_width_mm)?;
        require_positive_opt("worm_bore_mm", self.bores.worm_bore_mm)?;
        require_positive_opt("wheel_bore_mm", self.bores.wheel_bore_mm)?;
        if self.manufacturing.hobbing_steps == Some(0) {
            return Err(InfeasibleDesign::new(
                "hobbing_steps",
                "0",
                "Virtual hobbing needs at least one step",
            ));
        }
        Ok(())
    }

    /// Wheel tooth count `ratio × num_starts`
    pub fn num_teeth(&self) -> Result<u32, InfeasibleDesign> {
        self.ratio.checked_mul(self.num_starts).ok_or_else(|| {
            InfeasibleDesign::new(
                "ratio",
                self.ratio.to_string(),
                "Ratio × starts exceeds the supported tooth count",
            )
        })
    }
}

/// Reject a value that is not a finite, strictly positive number
pub(crate) fn require_positive(field: &str, value: f64) -> Result<f64, InfeasibleDesign> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(InfeasibleDesign::new(field, value.to_string(), "Must be a positive number"))
    }
}

fn require_positive_opt(field: &str, value: Option<f64>) -> Result<(), InfeasibleDesign> {
    match value {
        Some(v) => require_positive(field, v).map(|_| ()),
        None => Ok(()),
    }
}

/// Solve with the DIN standards table and default policy.
pub fn solve(input: &DesignInput) -> Result<DesignResult, InfeasibleDesign> {
    solve_with(input, StandardsTable::din(), &DesignPolicy::default())
}

/// Solve a design.
///
/// # Returns
///
/// * `Ok(DesignResult)` - complete design with diagnostics attached
/// * `Err(InfeasibleDesign)` - no geometrically sane design exists for the inputs
#[instrument(skip_all, fields(mode = input.mode.name(), ratio = input.ratio, starts = input.num_starts))]
pub fn solve_with(
    input: &DesignInput,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> Result<DesignResult, InfeasibleDesign> {
    input.validate(standards)?;
    let num_teeth = input.num_teeth()?;

    let draft = modes::draft(input, num_teeth, standards, policy)?;
    debug!(
        module_mm = draft.module_mm,
        worm_pitch_diameter_mm = draft.worm_pitch_diameter_mm,
        "draft derived"
    );

    let draft = if input.use_standard_module {
        snapping::snap_to_standard(draft, input, num_teeth, standards, policy)?
    } else {
        draft
    };

    let mut design = build(draft, input, num_teeth, standards, policy)?;

    let report = validate_with(&design, standards, policy);
    design.valid = report.valid;
    design.diagnostics = report.messages;

    info!(
        module_mm = design.worm.module_mm,
        centre_distance_mm = design.assembly.centre_distance_mm,
        valid = design.valid,
        diagnostics = design.diagnostics.len(),
        "design solved"
    );
    Ok(design)
}

/// Derive every quantity from the (module, worm pitch diameter) pair.
fn build(
    draft: Draft,
    input: &DesignInput,
    num_teeth: u32,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> Result<DesignResult, InfeasibleDesign> {
    let module_mm = require_positive("module_mm", draft.module_mm)?;
    let worm_pd = draft.worm_pitch_diameter_mm;
    let shift = input.profile_shift;

    // === Worm ===
    let lead_mm = equations::lead(module_mm, input.num_starts);
    let worm_tip = equations::tip_diameter(worm_pd, module_mm, 0.0);
    let worm_root = equations::root_diameter(worm_pd, module_mm, 0.0);

    // === Wheel ===
    let wheel_pd = equations::wheel_pitch_diameter(module_mm, num_teeth);
    let wheel_tip = equations::tip_diameter(wheel_pd, module_mm, shift);
    let wheel_root = equations::root_diameter(wheel_pd, module_mm, shift);

    let centre_distance_mm = equations::centre_distance(worm_pd, wheel_pd);

    require_positive("worm.pitch_diameter_mm", worm_pd)?;
    require_positive("worm.tip_diameter_mm", worm_tip)?;
    require_positive("wheel.pitch_diameter_mm", wheel_pd)?;
    require_positive("wheel.tip_diameter_mm", wheel_tip)?;
    require_positive("assembly.centre_distance_mm", centre_distance_mm)?;

    let lead_angle_deg = equations::lead_angle_deg(lead_mm, worm_pd);
    let limits = standards.lead_angle_limits_deg;
    if !(lead_angle_deg > limits.min && lead_angle_deg < limits.max) {
        return Err(InfeasibleDesign::new(
            "worm.lead_angle_deg",
            format!("{:.3}", lead_angle_deg),
            format!(
                "Lead angle must lie strictly between {}° and {}°",
                limits.min, limits.max
            ),
        ));
    }

    let throat = match input.worm_type {
        WormType::Globoid => Some(globoid::derive_throat(
            input,
            module_mm,
            worm_pd,
            wheel_pd,
            worm_tip,
            centre_distance_mm,
        )),
        WormType::Cylindrical => None,
    };

    // === Efficiency ===
    let friction_angle = policy.friction_angle_deg();
    let efficiency_percent = equations::efficiency_percent(lead_angle_deg, friction_angle);
    let self_locking = equations::is_self_locking(lead_angle_deg, friction_angle);

    // === Manufacturing ===
    let worm_length_mm = input.manufacturing.worm_length_mm.unwrap_or_else(|| {
        equations::min_worm_length(centre_distance_mm, worm_tip, wheel_tip)
            + 2.0 * equations::axial_pitch(module_mm)
    });
    let wheel_width_mm = input
        .manufacturing
        .wheel_width_mm
        .unwrap_or_else(|| equations::full_wheel_width(centre_distance_mm, worm_tip, wheel_tip));

    // === Bores ===
    let worm_bore = resolve_bore(
        recommend_bore_with(worm_pd, standards, policy),
        input.bores.worm_bore_mm,
        input.bores.worm_anti_rotation,
        standards,
    );
    let wheel_bore = resolve_bore(
        recommend_bore_with(wheel_pd, standards, policy),
        input.bores.wheel_bore_mm,
        input.bores.wheel_anti_rotation,
        standards,
    );

    Ok(DesignResult {
        worm: WormSpec {
            module_mm,
            pitch_diameter_mm: worm_pd,
            tip_diameter_mm: worm_tip,
            root_diameter_mm: worm_root,
            num_starts: input.num_starts,
            lead_mm,
            lead_angle_deg,
            pressure_angle_deg: input.pressure_angle_deg,
            profile_shift: 0.0,
            hand: input.hand,
            profile: input.profile,
            worm_type: input.worm_type,
            throat,
        },
        wheel: WheelSpec {
            num_teeth,
            pitch_diameter_mm: wheel_pd,
            tip_diameter_mm: wheel_tip,
            root_diameter_mm: wheel_root,
            helix_angle_deg: lead_angle_deg,
            profile_shift: shift,
            tip_reduction_mm: input.wheel_tip_reduction_mm,
            throated: input.wheel_throated,
        },
        assembly: AssemblySpec {
            ratio: input.ratio,
            centre_distance_mm,
            pressure_angle_deg: input.pressure_angle_deg,
            backlash_mm: input.backlash_mm,
            hand: input.hand,
            efficiency_percent,
            self_locking,
        },
        manufacturing: ManufacturingSpec {
            profile: input.profile,
            worm_length_mm,
            wheel_width_mm,
            generation_method: input.manufacturing.generation_method,
            virtual_hobbing: input.manufacturing.virtual_hobbing,
            hobbing_steps: input.manufacturing.hobbing_steps.unwrap_or(policy.hobbing_steps),
        },
        bore: BoreSpec {
            worm: worm_bore,
            wheel: wheel_bore,
        },
        diagnostics: Vec::new(),
        valid: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticCode, Severity};

    const TOL: f64 = 1e-9;

    #[test]
    fn test_from_module_reference_design() {
        let design = solve(&DesignInput::from_module(2.0, 30)).unwrap();

        assert_eq!(design.wheel.num_teeth, 30);
        assert!((design.wheel.pitch_diameter_mm - 60.0).abs() < TOL);
        assert!((design.worm.lead_angle_deg - 10.0).abs() < 1e-9);
        // d1 = 2 / tan 10° = 11.343, a = (11.343 + 60) / 2 = 35.67
        assert!((design.assembly.centre_distance_mm - 35.671).abs() < 0.001);
        assert!(design.valid);
        assert_eq!(design.errors().count(), 0);
    }

    #[test]
    fn test_tip_and_root_relations() {
        let design = solve(&DesignInput::from_module(1.5, 40).with_profile_shift(0.1)).unwrap();
        let m = design.worm.module_mm;

        assert!((design.worm.tip_diameter_mm - (design.worm.pitch_diameter_mm + 2.0 * m)).abs() < TOL);
        assert!((design.worm.root_diameter_mm - (design.worm.pitch_diameter_mm - 2.4 * m)).abs() < TOL);
        assert!((design.wheel.tip_diameter_mm - (design.wheel.pitch_diameter_mm + 2.0 * m * 1.1)).abs() < TOL);
        assert!((design.wheel.root_diameter_mm - (design.wheel.pitch_diameter_mm - 2.0 * m * 1.1)).abs() < TOL);
        assert_eq!(design.worm.profile_shift, 0.0);
    }

    #[test]
    fn test_worm_pitch_override_wins() {
        let mut input = DesignInput::from_module(2.0, 30);
        input.mode = DesignMode::FromModule {
            module_mm: 2.0,
            worm_pitch_diameter_mm: Some(16.0),
        };
        let design = solve(&input).unwrap();
        assert!((design.worm.pitch_diameter_mm - 16.0).abs() < TOL);
        // atan(2 / 16) = 7.125°
        assert!((design.worm.lead_angle_deg - 7.125).abs() < 0.001);
    }

    #[test]
    fn test_ratio_zero_is_infeasible() {
        let err = solve(&DesignInput::from_module(2.0, 0)).unwrap_err();
        assert_eq!(err.field, "ratio");
    }

    #[test]
    fn test_zero_starts_is_infeasible() {
        let err = solve(&DesignInput::from_module(2.0, 30).with_starts(0)).unwrap_err();
        assert_eq!(err.field, "num_starts");
    }

    #[test]
    fn test_minimum_ratio_solves() {
        let design = solve(&DesignInput::from_module(2.0, 1)).unwrap();
        assert_eq!(design.wheel.num_teeth, 1);
        // Wheel root is negative, so the validator flags it instead of the engine
        assert!(design.has_diagnostic(DiagnosticCode::WheelRootExceedsBore));
        assert!(!design.valid);
    }

    #[test]
    fn test_pressure_angle_limits() {
        assert!(solve(&DesignInput::from_module(2.0, 30).with_pressure_angle(4.0)).is_err());
        assert!(solve(&DesignInput::from_module(2.0, 30).with_pressure_angle(36.0)).is_err());
        assert!(solve(&DesignInput::from_module(2.0, 30).with_pressure_angle(35.0)).is_ok());
    }

    #[test]
    fn test_negative_module_is_infeasible() {
        let err = solve(&DesignInput::from_module(-1.0, 30)).unwrap_err();
        assert_eq!(err.field, "module_mm");
    }

    #[test]
    fn test_steep_lead_angle_is_infeasible() {
        let mut input = DesignInput::from_module(2.0, 30);
        input.mode = DesignMode::FromModule {
            module_mm: 2.0,
            worm_pitch_diameter_mm: Some(0.1),
        };
        let err = solve(&input).unwrap_err();
        assert_eq!(err.field, "worm.lead_angle_deg");
    }

    #[test]
    fn test_few_teeth_warns_but_stays_valid() {
        let design = solve(&DesignInput::from_module(2.0, 10)).unwrap();
        assert_eq!(design.wheel.num_teeth, 10);
        assert!(design.has_diagnostic(DiagnosticCode::TeethTooFew));
        assert!(design.valid);
        assert!(design.diagnostics.iter().all(|d| d.severity != Severity::Error));
    }

    #[test]
    fn test_hand_propagates() {
        let design = solve(&DesignInput::from_module(2.0, 30).with_hand(Hand::Left)).unwrap();
        assert_eq!(design.worm.hand, Hand::Left);
        assert_eq!(design.assembly.hand, Hand::Left);
    }

    #[test]
    fn test_efficiency_and_self_locking() {
        let design = solve(&DesignInput::from_module(2.0, 30)).unwrap();
        assert!(design.assembly.efficiency_percent > 75.0);
        assert!(!design.assembly.self_locking);

        let mut input = DesignInput::from_module(1.0, 30);
        input.mode = DesignMode::FromModule {
            module_mm: 1.0,
            worm_pitch_diameter_mm: Some(25.0),
        };
        let design = solve(&input).unwrap();
        // atan(1/25) = 2.29° < φ = 2.86°
        assert!(design.assembly.self_locking);
        assert!(design.has_diagnostic(DiagnosticCode::EfficiencyLow));
    }

    #[test]
    fn test_manufacturing_defaults_cover_engagement() {
        let design = solve(&DesignInput::from_module(2.0, 30)).unwrap();
        let a = design.assembly.centre_distance_mm;
        let min_len = equations::min_worm_length(a, design.worm.tip_diameter_mm, design.wheel.tip_diameter_mm);
        let min_width = equations::min_wheel_width(a, design.worm.pitch_diameter_mm, design.wheel.tip_diameter_mm);
        assert!(design.manufacturing.worm_length_mm > min_len);
        assert!(design.manufacturing.wheel_width_mm >= min_width);
        assert_eq!(design.manufacturing.hobbing_steps, crate::config::DEFAULT_HOBBING_STEPS);
    }

    #[test]
    fn test_bore_defaults_and_overrides() {
        let design = solve(&DesignInput::from_module(2.0, 30)).unwrap();
        assert_eq!(design.bore.wheel.diameter_mm, 15.0);
        assert_eq!(design.bore.worm.diameter_mm, 3.0);

        let mut input = DesignInput::from_module(2.0, 30);
        input.bores.wheel_bore_mm = Some(56.0);
        let design = solve(&input).unwrap();
        assert!(design.has_diagnostic(DiagnosticCode::WheelRootExceedsBore));
        assert!(!design.valid);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let input = DesignInput::from_wheel(80.0, 40, Some(8.0));
        assert_eq!(solve(&input).unwrap(), solve(&input).unwrap());
    }

    #[test]
    fn test_input_serialization() {
        let input = DesignInput::envelope(20.0, 65.0, 30);
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"mode\":\"envelope\""));
        let roundtrip: DesignInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
