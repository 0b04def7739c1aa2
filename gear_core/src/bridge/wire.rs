//! Wire schema v2.0.
//!
//! Field names are a compatibility contract with the geometry generator and
//! the UI: every dimension carries its `_mm` / `_deg` suffix. Input accepts a
//! few legacy spellings (`worm_od`, `module`, `centre_distance`, ...) as
//! aliases; output always uses the canonical names.
//!
//! ## Rounding
//!
//! | Quantity | Decimals |
//! |----------|----------|
//! | mm dimensions | 2 |
//! | globoid throat reduction | 3, never below 0.001 when positive |
//! | module, lead | 3 |
//! | angles | 1 |
//! | efficiency | 1 |
//! | profile shift | 3 |
//!
//! Ties round to even. Module keeps 3 decimals rather than 2 so that a
//! reloaded design reproduces non-standard modules such as 2.03125.

use serde::{Deserialize, Serialize};

use crate::bore::BoreRecommendation;
use crate::calculations::{BoreOverrides, DesignInput, DesignMode, ManufacturingInput};
use crate::diagnostics::Diagnostic;
use crate::equations::round_to;
use crate::errors::{GearError, InfeasibleDesign, SchemaError};
use crate::model::{
    normalize, AntiRotation, Bore, BoreSpec, DesignResult, GenerationMethod, Hand, Profile,
    WormType,
};

/// Wire schema version written to every output
pub const SCHEMA_VERSION: &str = "2.0";

pub fn round_mm(value: f64) -> f64 {
    round_to(value, 2)
}

/// Throat reduction is 0.02 × module by default, so 2 decimals would zero it
/// for modules below 0.25 mm and a reload would fall back to auto.
pub fn round_throat_reduction(value: f64) -> f64 {
    let rounded = round_to(value, 3);
    if value > 0.0 {
        rounded.max(0.001)
    } else {
        rounded
    }
}

pub fn round_module(value: f64) -> f64 {
    round_to(value, 3)
}

pub fn round_lead(value: f64) -> f64 {
    round_to(value, 3)
}

pub fn round_deg(value: f64) -> f64 {
    round_to(value, 1)
}

pub fn round_percent(value: f64) -> f64 {
    round_to(value, 1)
}

pub fn round_shift(value: f64) -> f64 {
    round_to(value, 3)
}

/// Raw calculator input as sent by the UI.
///
/// Everything is optional at this stage so that a missing field becomes a
/// [`SchemaError::MissingField`] instead of an opaque parse error. Counts
/// arrive as JSON numbers and are checked for integrality on conversion.
///
/// ## JSON Example
///
/// ```json
/// {
///   "mode": "from_module",
///   "module": 2.0,
///   "ratio": 30,
///   "hand": "right",
///   "worm_type": "cylindrical"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WireInput {
    pub mode: Option<String>,
    pub ratio: Option<f64>,
    pub num_starts: Option<f64>,
    pub pressure_angle_deg: Option<f64>,
    pub backlash_mm: Option<f64>,
    pub hand: Option<String>,
    pub profile_shift: Option<f64>,
    pub profile: Option<String>,
    pub worm_type: Option<String>,
    pub use_standard_module: Option<bool>,

    #[serde(alias = "worm_od")]
    pub worm_od_mm: Option<f64>,
    #[serde(alias = "wheel_od")]
    pub wheel_od_mm: Option<f64>,
    pub od_as_maximum: Option<bool>,
    #[serde(alias = "module")]
    pub module_mm: Option<f64>,
    #[serde(alias = "centre_distance", alias = "center_distance", alias = "center_distance_mm")]
    pub centre_distance_mm: Option<f64>,
    #[serde(alias = "target_lead_angle")]
    pub target_lead_angle_deg: Option<f64>,
    #[serde(alias = "worm_pitch_diameter")]
    pub worm_pitch_diameter_mm: Option<f64>,

    pub throat_reduction_mm: Option<f64>,
    pub throat_arc_angle_deg: Option<f64>,
    pub wheel_throated: Option<bool>,
    pub wheel_tip_reduction_mm: Option<f64>,

    pub worm_length_mm: Option<f64>,
    pub wheel_width_mm: Option<f64>,
    pub generation_method: Option<String>,
    pub virtual_hobbing: Option<bool>,
    pub hobbing_steps: Option<f64>,

    pub worm_bore_mm: Option<f64>,
    pub wheel_bore_mm: Option<f64>,
    pub worm_anti_rotation: Option<String>,
    pub wheel_anti_rotation: Option<String>,
}

fn require(field: &str, value: Option<f64>) -> Result<f64, SchemaError> {
    value.ok_or_else(|| SchemaError::missing_field(field))
}

/// A whole-number count that must be at least 1.
///
/// Fractions are schema errors; whole numbers below 1 are infeasible designs.
fn count(field: &str, value: f64) -> Result<u32, GearError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(SchemaError::invalid_field(field, value.to_string(), "Expected a whole number").into());
    }
    if value < 1.0 {
        return Err(InfeasibleDesign::new(field, value.to_string(), "Must be at least 1").into());
    }
    if value > f64::from(u32::MAX) {
        return Err(SchemaError::invalid_field(field, value.to_string(), "Value is too large").into());
    }
    Ok(value as u32)
}

fn parse_mode(s: &str) -> Result<&'static str, SchemaError> {
    match normalize(s).as_str() {
        "ENVELOPE" => Ok("envelope"),
        "FROM_WHEEL" | "WHEEL" => Ok("from_wheel"),
        "FROM_MODULE" | "MODULE" => Ok("from_module"),
        "FROM_CENTRE_DISTANCE" | "FROM_CENTER_DISTANCE" | "CENTRE_DISTANCE" | "CENTER_DISTANCE" => {
            Ok("from_centre_distance")
        }
        _ => Err(SchemaError::invalid_field(
            "mode",
            s,
            "Expected envelope, from_wheel, from_module or from_centre_distance",
        )),
    }
}

fn parse_opt<T>(
    value: Option<&str>,
    parse: fn(&str) -> Result<T, SchemaError>,
) -> Result<Option<T>, SchemaError> {
    value.map(parse).transpose()
}

fn tag_field(err: SchemaError, field: &str) -> SchemaError {
    match err {
        SchemaError::InvalidField { value, reason, .. } => SchemaError::InvalidField {
            field: field.to_string(),
            value,
            reason,
        },
        other => other,
    }
}

impl WireInput {
    /// Parse a JSON payload.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::malformed(e.to_string()))
    }

    /// Check the payload and convert it into engine input.
    pub fn into_design_input(self) -> Result<DesignInput, GearError> {
        let mode_name = self.mode.as_deref().ok_or_else(|| SchemaError::missing_field("mode"))?;
        let mode = match parse_mode(mode_name)? {
            "envelope" => DesignMode::Envelope {
                worm_od_mm: require("worm_od_mm", self.worm_od_mm)?,
                wheel_od_mm: require("wheel_od_mm", self.wheel_od_mm)?,
                od_as_maximum: self.od_as_maximum.unwrap_or(false),
            },
            "from_wheel" => DesignMode::FromWheel {
                wheel_od_mm: require("wheel_od_mm", self.wheel_od_mm)?,
                target_lead_angle_deg: self.target_lead_angle_deg,
            },
            "from_module" => DesignMode::FromModule {
                module_mm: require("module_mm", self.module_mm)?,
                worm_pitch_diameter_mm: self.worm_pitch_diameter_mm,
            },
            _ => DesignMode::FromCentreDistance {
                centre_distance_mm: require("centre_distance_mm", self.centre_distance_mm)?,
            },
        };

        let ratio = count("ratio", require("ratio", self.ratio)?)?;
        let mut input = DesignInput::new(mode, ratio);
        if let Some(starts) = self.num_starts {
            input.num_starts = count("num_starts", starts)?;
        }
        if let Some(alpha) = self.pressure_angle_deg {
            input.pressure_angle_deg = alpha;
        }
        if let Some(backlash) = self.backlash_mm {
            input.backlash_mm = backlash;
        }
        if let Some(hand) = parse_opt(self.hand.as_deref(), Hand::from_str_flexible)? {
            input.hand = hand;
        }
        if let Some(shift) = self.profile_shift {
            input.profile_shift = shift;
        }
        if let Some(profile) = parse_opt(self.profile.as_deref(), Profile::from_str_flexible)? {
            input.profile = profile;
        }
        if let Some(worm_type) = parse_opt(self.worm_type.as_deref(), WormType::from_str_flexible)? {
            input.worm_type = worm_type;
        }
        input.use_standard_module = self.use_standard_module.unwrap_or(false);
        input.throat_reduction_mm = self.throat_reduction_mm;
        input.throat_arc_angle_deg = self.throat_arc_angle_deg;
        input.wheel_throated = self.wheel_throated.unwrap_or(false);
        input.wheel_tip_reduction_mm = self.wheel_tip_reduction_mm;

        let hobbing_steps = match self.hobbing_steps {
            Some(steps) if steps.is_finite() && steps.fract() == 0.0 && steps >= 1.0 && steps <= f64::from(u32::MAX) => {
                Some(steps as u32)
            }
            Some(steps) => {
                return Err(SchemaError::invalid_field(
                    "hobbing_steps",
                    steps.to_string(),
                    "Expected a whole number of at least 1",
                )
                .into())
            }
            None => None,
        };
        input.manufacturing = ManufacturingInput {
            worm_length_mm: self.worm_length_mm,
            wheel_width_mm: self.wheel_width_mm,
            generation_method: parse_opt(
                self.generation_method.as_deref(),
                GenerationMethod::from_str_flexible,
            )?
            .unwrap_or_default(),
            virtual_hobbing: self.virtual_hobbing.unwrap_or(false),
            hobbing_steps,
        };

        input.bores = BoreOverrides {
            worm_bore_mm: self.worm_bore_mm,
            wheel_bore_mm: self.wheel_bore_mm,
            worm_anti_rotation: parse_opt(self.worm_anti_rotation.as_deref(), AntiRotation::from_str_flexible)
                .map_err(|e| tag_field(e, "worm_anti_rotation"))?,
            wheel_anti_rotation: parse_opt(self.wheel_anti_rotation.as_deref(), AntiRotation::from_str_flexible)
                .map_err(|e| tag_field(e, "wheel_anti_rotation"))?,
        };

        Ok(input)
    }
}

/// Worm block of the output design; globoid throat fields are flattened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireWorm {
    pub module_mm: f64,
    pub pitch_diameter_mm: f64,
    pub tip_diameter_mm: f64,
    pub root_diameter_mm: f64,
    pub num_starts: u32,
    pub lead_mm: f64,
    pub lead_angle_deg: f64,
    pub pressure_angle_deg: f64,
    pub profile_shift: f64,
    pub hand: Hand,
    pub profile: Profile,
    #[serde(rename = "type")]
    pub worm_type: WormType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throat_curvature_radius_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throat_reduction_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throat_arc_angle_deg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireWheel {
    pub num_teeth: u32,
    pub pitch_diameter_mm: f64,
    pub tip_diameter_mm: f64,
    pub root_diameter_mm: f64,
    pub helix_angle_deg: f64,
    pub profile_shift: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_reduction_mm: Option<f64>,
    pub throated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAssembly {
    pub ratio: u32,
    pub centre_distance_mm: f64,
    pub pressure_angle_deg: f64,
    pub backlash_mm: f64,
    pub hand: Hand,
    pub efficiency_percent: f64,
    pub self_locking: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireManufacturing {
    pub profile: Profile,
    pub worm_length_mm: f64,
    pub wheel_width_mm: f64,
    pub generation_method: GenerationMethod,
    pub virtual_hobbing: bool,
    pub hobbing_steps: u32,
}

/// Rounded design as consumed by the geometry generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDesign {
    pub worm: WireWorm,
    pub wheel: WireWheel,
    pub assembly: WireAssembly,
    pub manufacturing: WireManufacturing,
    pub bore: BoreSpec,
}

fn round_bore(bore: Bore) -> Bore {
    Bore {
        diameter_mm: round_mm(bore.diameter_mm),
        anti_rotation: bore.anti_rotation,
    }
}

impl From<&DesignResult> for WireDesign {
    fn from(design: &DesignResult) -> Self {
        let worm = &design.worm;
        let wheel = &design.wheel;
        let assembly = &design.assembly;
        let manufacturing = &design.manufacturing;

        WireDesign {
            worm: WireWorm {
                module_mm: round_module(worm.module_mm),
                pitch_diameter_mm: round_mm(worm.pitch_diameter_mm),
                tip_diameter_mm: round_mm(worm.tip_diameter_mm),
                root_diameter_mm: round_mm(worm.root_diameter_mm),
                num_starts: worm.num_starts,
                lead_mm: round_lead(worm.lead_mm),
                lead_angle_deg: round_deg(worm.lead_angle_deg),
                pressure_angle_deg: round_deg(worm.pressure_angle_deg),
                profile_shift: round_shift(worm.profile_shift),
                hand: worm.hand,
                profile: worm.profile,
                worm_type: worm.worm_type,
                throat_curvature_radius_mm: worm.throat.map(|t| round_mm(t.curvature_radius_mm)),
                throat_reduction_mm: worm.throat.map(|t| round_throat_reduction(t.reduction_mm)),
                throat_arc_angle_deg: worm.throat.map(|t| round_deg(t.arc_angle_deg)),
            },
            wheel: WireWheel {
                num_teeth: wheel.num_teeth,
                pitch_diameter_mm: round_mm(wheel.pitch_diameter_mm),
                tip_diameter_mm: round_mm(wheel.tip_diameter_mm),
                root_diameter_mm: round_mm(wheel.root_diameter_mm),
                helix_angle_deg: round_deg(wheel.helix_angle_deg),
                profile_shift: round_shift(wheel.profile_shift),
                tip_reduction_mm: wheel.tip_reduction_mm.map(round_mm),
                throated: wheel.throated,
            },
            assembly: WireAssembly {
                ratio: assembly.ratio,
                centre_distance_mm: round_mm(assembly.centre_distance_mm),
                pressure_angle_deg: round_deg(assembly.pressure_angle_deg),
                backlash_mm: round_mm(assembly.backlash_mm),
                hand: assembly.hand,
                efficiency_percent: round_percent(assembly.efficiency_percent),
                self_locking: assembly.self_locking,
            },
            manufacturing: WireManufacturing {
                profile: manufacturing.profile,
                worm_length_mm: round_mm(manufacturing.worm_length_mm),
                wheel_width_mm: round_mm(manufacturing.wheel_width_mm),
                generation_method: manufacturing.generation_method,
                virtual_hobbing: manufacturing.virtual_hobbing,
                hobbing_steps: manufacturing.hobbing_steps,
            },
            bore: BoreSpec {
                worm: round_bore(design.bore.worm),
                wheel: round_bore(design.bore.wheel),
            },
        }
    }
}

/// Failure details carried by an unsuccessful [`WireOutput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    /// Stable code from [`GearError::error_code`]
    pub code: String,
    pub message: String,
    pub details: GearError,
}

/// Calculator response.
///
/// On failure `success` is false, `design` and the bore recommendations are
/// absent, and `error` explains why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOutput {
    pub schema_version: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<WireDesign>,
    pub valid: bool,
    pub messages: Vec<Diagnostic>,
    pub recommended_worm_bore: Option<BoreRecommendation>,
    pub recommended_wheel_bore: Option<BoreRecommendation>,
    pub summary: String,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

impl WireOutput {
    /// Response for a request that produced no design
    pub fn failure(error: &GearError) -> Self {
        WireOutput {
            schema_version: SCHEMA_VERSION.to_string(),
            success: false,
            design: None,
            valid: false,
            messages: Vec::new(),
            recommended_worm_bore: None,
            recommended_wheel_bore: None,
            summary: error.to_string(),
            markdown: format!("**Calculation failed** (`{}`): {}\n", error.error_code(), error),
            error: Some(WireError {
                code: error.error_code().to_string(),
                message: error.to_string(),
                details: error.clone(),
            }),
        }
    }
}
