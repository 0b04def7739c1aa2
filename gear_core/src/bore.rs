//! # Bore / Anti-rotation Advisor
//!
//! Recommends a shaft bore and the feature that keys the gear to it.
//!
//! ```text
//! diameter = round(pitch_diameter × 0.25, 1 dp, ties to even), at least 3 mm
//! anti_rotation = keyway (DIN 6885) if diameter ≥ 6 mm, else double-D cut
//! ```
//!
//! The advisor only supplies defaults; callers may override either value.
//!
//! ## Example
//!
//! ```rust
//! use gear_core::bore::recommend_bore;
//! use gear_core::model::AntiRotation;
//!
//! let rec = recommend_bore(60.0);
//! assert_eq!(rec.diameter_mm, 15.0);
//! assert_eq!(rec.anti_rotation, AntiRotation::KeywayDin6885);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::DesignPolicy;
use crate::equations::round_to;
use crate::model::{AntiRotation, Bore};
use crate::standards::StandardsTable;

/// Advisor output for one gear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoreRecommendation {
    pub diameter_mm: f64,
    pub anti_rotation: AntiRotation,
}

impl From<BoreRecommendation> for Bore {
    fn from(rec: BoreRecommendation) -> Self {
        Bore {
            diameter_mm: rec.diameter_mm,
            anti_rotation: rec.anti_rotation,
        }
    }
}

/// Recommend a bore using the DIN table and default policy.
pub fn recommend_bore(pitch_diameter_mm: f64) -> BoreRecommendation {
    recommend_bore_with(pitch_diameter_mm, StandardsTable::din(), &DesignPolicy::default())
}

/// Recommend a bore with explicit thresholds.
pub fn recommend_bore_with(
    pitch_diameter_mm: f64,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> BoreRecommendation {
    let raw = round_to(pitch_diameter_mm * policy.bore_ratio, 1);
    let diameter_mm = raw.max(standards.min_bore_mm);
    BoreRecommendation {
        diameter_mm,
        anti_rotation: anti_rotation_for(diameter_mm, standards),
    }
}

/// Anti-rotation feature suitable for a bore of the given diameter
pub fn anti_rotation_for(diameter_mm: f64, standards: &StandardsTable) -> AntiRotation {
    if diameter_mm >= standards.keyway_min_bore_mm {
        AntiRotation::KeywayDin6885
    } else {
        AntiRotation::DdCut
    }
}

/// Apply caller overrides on top of an advisor recommendation.
///
/// An overridden diameter without an explicit method picks the method that
/// suits the new diameter.
pub fn resolve_bore(
    recommended: BoreRecommendation,
    diameter_override_mm: Option<f64>,
    anti_rotation_override: Option<AntiRotation>,
    standards: &StandardsTable,
) -> Bore {
    let mut bore = Bore::from(recommended);
    if let Some(diameter_mm) = diameter_override_mm {
        bore.diameter_mm = diameter_mm;
        bore.anti_rotation = anti_rotation_for(diameter_mm, standards);
    }
    if let Some(method) = anti_rotation_override {
        bore.anti_rotation = method;
    }
    bore
}
