//! # Design Data Model
//!
//! Worm, wheel, assembly and manufacturing parameters of one solved design.
//!
//! A [`DesignResult`] is produced once per solve and never edited; to change
//! anything, re-run the engine with new inputs. Every type serializes to JSON.
//!
//! ## Closed enums
//!
//! Hand, profile, worm type and the other categorical inputs are closed enums
//! parsed once at the API boundary (`from_str_flexible`). The algebra never
//! compares strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::errors::SchemaError;

/// Normalize a user-supplied enum string: uppercase, separators unified to `_`
pub(crate) fn normalize(s: &str) -> String {
    s.trim().to_uppercase().replace([' ', '-'], "_")
}

/// Thread hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    #[default]
    Right,
    Left,
}

impl Hand {
    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> Result<Self, SchemaError> {
        match normalize(s).as_str() {
            "RIGHT" | "R" | "RH" | "RIGHT_HAND" => Ok(Hand::Right),
            "LEFT" | "L" | "LH" | "LEFT_HAND" => Ok(Hand::Left),
            _ => Err(SchemaError::invalid_field("hand", s, "Expected 'right' or 'left'")),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Right => write!(f, "Right-hand"),
            Hand::Left => write!(f, "Left-hand"),
        }
    }
}

/// Worm flank profile per DIN 3975
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Profile {
    /// Straight flanks in the axial section
    #[default]
    #[serde(rename = "ZA")]
    Za,
    /// Straight flanks of the grinding wheel (convex axial section)
    #[serde(rename = "ZK")]
    Zk,
    /// Involute helicoid
    #[serde(rename = "ZI")]
    Zi,
}

impl Profile {
    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> Result<Self, SchemaError> {
        match normalize(s).as_str() {
            "ZA" => Ok(Profile::Za),
            "ZK" => Ok(Profile::Zk),
            "ZI" => Ok(Profile::Zi),
            _ => Err(SchemaError::invalid_field("profile", s, "Expected ZA, ZK or ZI")),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Profile::Za => "ZA",
            Profile::Zk => "ZK",
            Profile::Zi => "ZI",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Worm body shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WormType {
    #[default]
    Cylindrical,
    /// Hourglass worm wrapping the wheel
    Globoid,
}

impl WormType {
    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> Result<Self, SchemaError> {
        match normalize(s).as_str() {
            "CYLINDRICAL" | "CYLINDER" => Ok(WormType::Cylindrical),
            "GLOBOID" | "HOURGLASS" | "DOUBLE_ENVELOPING" => Ok(WormType::Globoid),
            _ => Err(SchemaError::invalid_field(
                "worm_type",
                s,
                "Expected 'cylindrical' or 'globoid'",
            )),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WormType::Cylindrical => "cylindrical",
            WormType::Globoid => "globoid",
        }
    }
}

/// How the downstream geometry generator builds the thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMethod {
    /// Profile swept along the helix
    #[default]
    Sweep,
    /// Cross-sections lofted along the axis
    Loft,
}

impl GenerationMethod {
    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> Result<Self, SchemaError> {
        match normalize(s).as_str() {
            "SWEEP" => Ok(GenerationMethod::Sweep),
            "LOFT" => Ok(GenerationMethod::Loft),
            _ => Err(SchemaError::invalid_field(
                "generation_method",
                s,
                "Expected 'sweep' or 'loft'",
            )),
        }
    }
}

/// Method that stops a gear spinning on its shaft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiRotation {
    /// Parallel key per DIN 6885
    KeywayDin6885,
    /// Double-D flats on the shaft
    DdCut,
}

impl AntiRotation {
    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> Result<Self, SchemaError> {
        match normalize(s).as_str() {
            "KEYWAY_DIN6885" | "KEYWAY" | "DIN6885" | "DIN_6885" => Ok(AntiRotation::KeywayDin6885),
            "DD_CUT" | "DD" | "DOUBLE_D" => Ok(AntiRotation::DdCut),
            _ => Err(SchemaError::invalid_field(
                "anti_rotation",
                s,
                "Expected 'keyway_din6885' or 'dd_cut'",
            )),
        }
    }
}

impl fmt::Display for AntiRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AntiRotation::KeywayDin6885 => write!(f, "Keyway (DIN 6885)"),
            AntiRotation::DdCut => write!(f, "Double-D cut"),
        }
    }
}

/// Throat geometry of a globoid worm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GloboidThroat {
    /// Radius of the concave throat (mm)
    pub curvature_radius_mm: f64,

    /// Depth by which the throat is reduced below the pitch radius (mm)
    pub reduction_mm: f64,

    /// Arc of the wheel wrapped by the worm (deg)
    pub arc_angle_deg: f64,
}

/// Worm parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WormSpec {
    /// Axial module (mm)
    pub module_mm: f64,
    pub pitch_diameter_mm: f64,
    pub tip_diameter_mm: f64,
    pub root_diameter_mm: f64,
    /// Thread starts z1
    pub num_starts: u32,
    /// Axial advance per revolution (mm)
    pub lead_mm: f64,
    pub lead_angle_deg: f64,
    pub pressure_angle_deg: f64,
    /// Always 0 for the worm
    pub profile_shift: f64,
    pub hand: Hand,
    pub profile: Profile,
    #[serde(rename = "type")]
    pub worm_type: WormType,
    /// Present for globoid worms only
    pub throat: Option<GloboidThroat>,
}

/// Wheel parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSpec {
    /// Tooth count z2
    pub num_teeth: u32,
    pub pitch_diameter_mm: f64,
    /// Full-addendum tip diameter
    pub tip_diameter_mm: f64,
    pub root_diameter_mm: f64,
    /// Equal to the worm lead angle for a matched pair
    pub helix_angle_deg: f64,
    pub profile_shift: f64,
    /// Stub-tooth reduction of the tip radius (mm)
    pub tip_reduction_mm: Option<f64>,
    /// Teeth cut with a concave throat to wrap the worm
    pub throated: bool,
}

impl WheelSpec {
    /// Tip diameter after the stub-tooth reduction
    pub fn effective_tip_diameter_mm(&self) -> f64 {
        self.tip_diameter_mm - 2.0 * self.tip_reduction_mm.unwrap_or(0.0)
    }
}

/// Mesh-level parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblySpec {
    /// Wheel teeth per worm start (z2 / z1)
    pub ratio: u32,
    pub centre_distance_mm: f64,
    pub pressure_angle_deg: f64,
    pub backlash_mm: f64,
    pub hand: Hand,
    /// Estimated efficiency with the worm driving (%)
    pub efficiency_percent: f64,
    /// Wheel cannot back-drive the worm
    pub self_locking: bool,
}

/// Parameters handed through to the geometry generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingSpec {
    pub profile: Profile,
    pub worm_length_mm: f64,
    pub wheel_width_mm: f64,
    pub generation_method: GenerationMethod,
    pub virtual_hobbing: bool,
    pub hobbing_steps: u32,
}

/// Bore and anti-rotation feature for one gear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bore {
    pub diameter_mm: f64,
    pub anti_rotation: AntiRotation,
}

/// Effective bores of both gears (advisor defaults or caller overrides).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoreSpec {
    pub worm: Bore,
    pub wheel: Bore,
}

/// One fully derived, self-consistent worm/wheel pair plus its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResult {
    pub worm: WormSpec,
    pub wheel: WheelSpec,
    pub assembly: AssemblySpec,
    pub manufacturing: ManufacturingSpec,
    pub bore: BoreSpec,
    pub diagnostics: Vec<Diagnostic>,
    /// False iff an error-severity diagnostic is present
    pub valid: bool,
}

impl DesignResult {
    /// Diagnostics with error severity
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// True when a diagnostic with this code is present
    pub fn has_diagnostic(&self, code: crate::diagnostics::DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_parsing() {
        assert_eq!(Hand::from_str_flexible("RIGHT").unwrap(), Hand::Right);
        assert_eq!(Hand::from_str_flexible("left").unwrap(), Hand::Left);
        assert_eq!(Hand::from_str_flexible("LH").unwrap(), Hand::Left);
        assert!(Hand::from_str_flexible("up").is_err());
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!(Profile::from_str_flexible("zk").unwrap(), Profile::Zk);
        assert!(Profile::from_str_flexible("ZN").is_err());
    }

    #[test]
    fn test_worm_type_parsing() {
        assert_eq!(WormType::from_str_flexible("Globoid").unwrap(), WormType::Globoid);
        assert_eq!(WormType::from_str_flexible("cylindrical").unwrap(), WormType::Cylindrical);
    }

    #[test]
    fn test_anti_rotation_parsing() {
        assert_eq!(
            AntiRotation::from_str_flexible("KEYWAY_DIN6885").unwrap(),
            AntiRotation::KeywayDin6885
        );
        assert_eq!(AntiRotation::from_str_flexible("dd-cut").unwrap(), AntiRotation::DdCut);
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(serde_json::to_string(&Hand::Left).unwrap(), "\"left\"");
        assert_eq!(serde_json::to_string(&Profile::Zi).unwrap(), "\"ZI\"");
        assert_eq!(serde_json::to_string(&WormType::Globoid).unwrap(), "\"globoid\"");
        assert_eq!(
            serde_json::to_string(&AntiRotation::KeywayDin6885).unwrap(),
            "\"keyway_din6885\""
        );
    }

    #[test]
    fn test_effective_tip_diameter() {
        let wheel = WheelSpec {
            num_teeth: 30,
            pitch_diameter_mm: 60.0,
            tip_diameter_mm: 64.0,
            root_diameter_mm: 55.2,
            helix_angle_deg: 10.0,
            profile_shift: 0.0,
            tip_reduction_mm: Some(0.5),
            throated: false,
        };
        assert!((wheel.effective_tip_diameter_mm() - 63.0).abs() < 1e-12);
    }
}
