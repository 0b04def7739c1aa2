//! # Design Policy
//!
//! Engineering policy values that are choices rather than standards: the
//! default lead angle used to size the worm, the assumed friction, the bore
//! heuristic, and the bounded scan used by `FROM_WHEEL`.
//!
//! Every field has a named constant default. Policies deserialize from partial
//! JSON, so a file containing only `{"friction_coefficient": 0.08}` keeps the
//! remaining defaults. [`DesignPolicy::validate`] rejects values that would
//! stall the scan or make the formulas meaningless.

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// Target lead angle when the caller gives none (deg)
pub const DEFAULT_LEAD_ANGLE_DEG: f64 = 10.0;

/// Sliding friction coefficient, steel worm on bronze wheel
pub const DEFAULT_FRICTION_COEFFICIENT: f64 = 0.05;

/// Recommended bore as a fraction of the pitch diameter
pub const DEFAULT_BORE_RATIO: f64 = 0.25;

/// Worm pitch diameter scan step (mm)
pub const WORM_PD_SCAN_STEP_MM: f64 = 0.05;

/// Smallest worm pitch diameter scanned, in modules (root stays positive above 2.4)
pub const WORM_PD_SCAN_MIN_QUOTIENT: f64 = 3.0;

/// Largest worm pitch diameter scanned, in modules
pub const WORM_PD_SCAN_MAX_QUOTIENT: f64 = 30.0;

/// Upper bound on scan samples; the step is coarsened beyond this
pub const WORM_PD_SCAN_MAX_SAMPLES: usize = 4000;

/// Efficiency below which the validator reports `EFFICIENCY_LOW` (%)
pub const LOW_EFFICIENCY_PERCENT: f64 = 50.0;

/// Default number of virtual hobbing steps handed to the geometry generator
pub const DEFAULT_HOBBING_STEPS: u32 = 18;

/// Hard ceiling for `scan_max_samples` in a loaded policy
pub const SCAN_SAMPLES_LIMIT: usize = 100_000;

/// Policy values consumed by the engine, validator and bore advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignPolicy {
    /// Lead angle used to choose the worm pitch diameter (deg)
    pub default_lead_angle_deg: f64,

    /// Friction coefficient for efficiency and self-locking
    pub friction_coefficient: f64,

    /// Bore diameter as a fraction of pitch diameter
    pub bore_ratio: f64,

    /// Worm pitch diameter scan step (mm)
    pub scan_step_mm: f64,

    /// Scan range lower bound, in modules
    pub scan_min_quotient: f64,

    /// Scan range upper bound, in modules
    pub scan_max_quotient: f64,

    /// Maximum number of scan samples
    pub scan_max_samples: usize,

    /// Efficiency threshold for the low-efficiency notice (%)
    pub low_efficiency_percent: f64,

    /// Default virtual hobbing steps
    pub hobbing_steps: u32,
}

impl Default for DesignPolicy {
    fn default() -> Self {
        DesignPolicy {
            default_lead_angle_deg: DEFAULT_LEAD_ANGLE_DEG,
            friction_coefficient: DEFAULT_FRICTION_COEFFICIENT,
            bore_ratio: DEFAULT_BORE_RATIO,
            scan_step_mm: WORM_PD_SCAN_STEP_MM,
            scan_min_quotient: WORM_PD_SCAN_MIN_QUOTIENT,
            scan_max_quotient: WORM_PD_SCAN_MAX_QUOTIENT,
            scan_max_samples: WORM_PD_SCAN_MAX_SAMPLES,
            low_efficiency_percent: LOW_EFFICIENCY_PERCENT,
            hobbing_steps: DEFAULT_HOBBING_STEPS,
        }
    }
}

impl DesignPolicy {
    /// Friction angle φ = atan(μ) in degrees
    pub fn friction_angle_deg(&self) -> f64 {
        self.friction_coefficient.atan().to_degrees()
    }

    /// Check ranges; the first offending field is reported.
    pub fn validate(&self) -> Result<(), SchemaError> {
        fn check(field: &str, value: f64, ok: bool, reason: &str) -> Result<(), SchemaError> {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(SchemaError::invalid_field(field, value.to_string(), reason))
            }
        }

        let lead = self.default_lead_angle_deg;
        check("default_lead_angle_deg", lead, lead > 0.0 && lead < 90.0, "Expected an angle between 0 and 90 degrees")?;
        let mu = self.friction_coefficient;
        check("friction_coefficient", mu, (0.0..1.0).contains(&mu), "Expected a value in [0, 1)")?;
        let ratio = self.bore_ratio;
        check("bore_ratio", ratio, ratio > 0.0 && ratio < 1.0, "Expected a fraction between 0 and 1")?;
        check("scan_step_mm", self.scan_step_mm, self.scan_step_mm > 0.0, "Must be positive")?;
        check("scan_min_quotient", self.scan_min_quotient, self.scan_min_quotient > 0.0, "Must be positive")?;
        check(
            "scan_max_quotient",
            self.scan_max_quotient,
            self.scan_max_quotient > self.scan_min_quotient,
            "Must exceed scan_min_quotient",
        )?;
        if self.scan_max_samples == 0 || self.scan_max_samples > SCAN_SAMPLES_LIMIT {
            return Err(SchemaError::invalid_field(
                "scan_max_samples",
                self.scan_max_samples.to_string(),
                format!("Expected 1 to {}", SCAN_SAMPLES_LIMIT),
            ));
        }
        let low = self.low_efficiency_percent;
        check("low_efficiency_percent", low, (0.0..=100.0).contains(&low), "Expected a percentage")?;
        if self.hobbing_steps == 0 {
            return Err(SchemaError::invalid_field("hobbing_steps", "0", "Must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friction_angle() {
        let policy = DesignPolicy::default();
        // atan(0.05) = 2.862°
        assert!((policy.friction_angle_deg() - 2.862).abs() < 0.001);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let policy: DesignPolicy = serde_json::from_str(r#"{"friction_coefficient": 0.08}"#).unwrap();
        assert_eq!(policy.friction_coefficient, 0.08);
        assert_eq!(policy.default_lead_angle_deg, DEFAULT_LEAD_ANGLE_DEG);
        assert_eq!(policy.scan_step_mm, WORM_PD_SCAN_STEP_MM);
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert_eq!(DesignPolicy::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let policy = DesignPolicy {
            bore_ratio: -0.5,
            ..DesignPolicy::default()
        };
        match policy.validate() {
            Err(SchemaError::InvalidField { field, .. }) => assert_eq!(field, "bore_ratio"),
            other => panic!("expected bore_ratio rejection, got {:?}", other),
        }

        let policy = DesignPolicy {
            scan_max_samples: 1_000_000_000,
            ..DesignPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = DesignPolicy {
            scan_step_mm: f64::NAN,
            ..DesignPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = DesignPolicy {
            scan_min_quotient: 30.0,
            scan_max_quotient: 3.0,
            ..DesignPolicy::default()
        };
        match policy.validate() {
            Err(SchemaError::InvalidField { field, .. }) => assert_eq!(field, "scan_max_quotient"),
            other => panic!("expected scan_max_quotient rejection, got {:?}", other),
        }
    }
}
