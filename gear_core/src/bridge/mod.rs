//! # Bridge
//!
//! JSON in, JSON out. The bridge is the only layer that sees strings: it
//! validates the wire payload into a typed [`DesignInput`], runs the engine,
//! and renders the rounded [`WireOutput`] the UI and geometry generator
//! consume.
//!
//! ```text
//! JSON ──► WireInput ──► DesignInput ──► solve ──► DesignResult ──► WireOutput
//!              │               │
//!         SchemaError    InfeasibleDesign
//! ```
//!
//! ## Example
//!
//! ```rust
//! use gear_core::bridge::calculate;
//!
//! let output = calculate(r#"{"mode": "from_module", "module": 2.0, "ratio": 30}"#).unwrap();
//! assert!(output.success);
//! assert_eq!(output.design.unwrap().wheel.pitch_diameter_mm, 60.0);
//! ```

pub mod document;
pub mod report;
pub mod wire;

use tracing::warn;

use crate::bore::recommend_bore_with;
use crate::calculations::{
    solve_with, BoreOverrides, DesignInput, DesignMode, ManufacturingInput,
};
use crate::config::DesignPolicy;
use crate::errors::GearResult;
use crate::model::DesignResult;
use crate::standards::StandardsTable;

pub use document::DesignDocument;
pub use wire::{WireDesign, WireInput, WireOutput, SCHEMA_VERSION};

/// Parse and check a wire payload.
pub fn parse_input(json: &str) -> GearResult<DesignInput> {
    WireInput::from_json(json)?.into_design_input()
}

/// Calculate with the DIN standards table and default policy.
pub fn calculate(json: &str) -> GearResult<WireOutput> {
    calculate_with(json, StandardsTable::din(), &DesignPolicy::default())
}

pub fn calculate_with(
    json: &str,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> GearResult<WireOutput> {
    let input = parse_input(json)?;
    calculate_input(&input, standards, policy)
}

/// Solve an already-typed input and render the wire output.
pub fn calculate_input(
    input: &DesignInput,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> GearResult<WireOutput> {
    let design = solve_with(input, standards, policy)?;
    Ok(render(&design, standards, policy))
}

/// Like [`calculate`], but folds errors into an unsuccessful output.
pub fn respond(json: &str) -> WireOutput {
    match calculate(json) {
        Ok(output) => output,
        Err(err) => {
            warn!(code = err.error_code(), "calculation rejected: {}", err);
            WireOutput::failure(&err)
        }
    }
}

/// Wire output for a solved design.
pub fn render(design: &DesignResult, standards: &StandardsTable, policy: &DesignPolicy) -> WireOutput {
    let worm_bore = recommend_bore_with(design.worm.pitch_diameter_mm, standards, policy);
    let wheel_bore = recommend_bore_with(design.wheel.pitch_diameter_mm, standards, policy);

    WireOutput {
        schema_version: SCHEMA_VERSION.to_string(),
        success: true,
        design: Some(WireDesign::from(design)),
        valid: design.valid,
        messages: design.diagnostics.clone(),
        recommended_worm_bore: Some(worm_bore),
        recommended_wheel_bore: Some(wheel_bore),
        summary: report::summary(design),
        markdown: report::markdown(design, &worm_bore, &wheel_bore),
        error: None,
    }
}

/// Rebuild a `FROM_MODULE` input from a previously generated design.
///
/// The design's module, ratio, starts and worm pitch diameter (as an override)
/// are carried over with every flag, so re-solving reproduces the design up to
/// wire rounding.
pub fn input_from_design(design: &WireDesign) -> DesignInput {
    let worm = &design.worm;
    // A zero reduction would be flagged invalid; fall back to the auto value
    let throat_reduction_mm = worm.throat_reduction_mm.filter(|r| *r > 0.0);
    let throat_arc_angle_deg = worm.throat_arc_angle_deg;

    let mut input = DesignInput::new(
        DesignMode::FromModule {
            module_mm: worm.module_mm,
            worm_pitch_diameter_mm: Some(worm.pitch_diameter_mm),
        },
        design.assembly.ratio,
    );
    input.num_starts = worm.num_starts;
    input.pressure_angle_deg = design.assembly.pressure_angle_deg;
    input.backlash_mm = design.assembly.backlash_mm;
    input.hand = design.assembly.hand;
    input.profile_shift = design.wheel.profile_shift;
    input.profile = worm.profile;
    input.worm_type = worm.worm_type;
    input.throat_reduction_mm = throat_reduction_mm;
    input.throat_arc_angle_deg = throat_arc_angle_deg;
    input.wheel_throated = design.wheel.throated;
    input.wheel_tip_reduction_mm = design.wheel.tip_reduction_mm;
    input.manufacturing = ManufacturingInput {
        worm_length_mm: Some(design.manufacturing.worm_length_mm),
        wheel_width_mm: Some(design.manufacturing.wheel_width_mm),
        generation_method: design.manufacturing.generation_method,
        virtual_hobbing: design.manufacturing.virtual_hobbing,
        hobbing_steps: Some(design.manufacturing.hobbing_steps),
    };
    input.bores = BoreOverrides {
        worm_bore_mm: Some(design.bore.worm.diameter_mm),
        wheel_bore_mm: Some(design.bore.wheel.diameter_mm),
        worm_anti_rotation: Some(design.bore.worm.anti_rotation),
        wheel_anti_rotation: Some(design.bore.wheel.anti_rotation),
    };
    input
}
