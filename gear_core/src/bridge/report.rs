//! Human-readable renderings of a design: a one-line summary and a markdown
//! report with one parameter table per section.

use crate::bore::BoreRecommendation;
use crate::diagnostics::{Diagnostic, Section, Severity};
use crate::model::{DesignResult, WormType};

/// One-line summary of a design.
///
/// # Example
/// ```rust
/// use gear_core::bridge::report::summary;
/// use gear_core::calculations::{solve, DesignInput};
///
/// let design = solve(&DesignInput::from_module(2.0, 30)).unwrap();
/// assert!(summary(&design).starts_with("Cylindrical worm gear 30:1, module 2.000 mm"));
/// ```
pub fn summary(design: &DesignResult) -> String {
    let kind = match design.worm.worm_type {
        WormType::Cylindrical => "Cylindrical",
        WormType::Globoid => "Globoid",
    };
    let errors = design.diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warnings = design.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();
    format!(
        "{} worm gear {}:1, module {:.3} mm, centre distance {:.2} mm, lead angle {:.1}°, efficiency {:.1}%{} - {} ({} errors, {} warnings)",
        kind,
        design.assembly.ratio,
        design.worm.module_mm,
        design.assembly.centre_distance_mm,
        design.worm.lead_angle_deg,
        design.assembly.efficiency_percent,
        if design.assembly.self_locking { ", self-locking" } else { "" },
        if design.valid { "valid" } else { "INVALID" },
        errors,
        warnings,
    )
}

fn table_row(out: &mut String, name: &str, value: String) {
    out.push_str(&format!("| {} | {} |\n", name, value));
}

fn table_header(out: &mut String, title: &str) {
    out.push_str(&format!(
        "\n## {}\n\n| Parameter | Value |\n|-----------|-------|\n",
        title
    ));
}

fn diagnostic_line(out: &mut String, d: &Diagnostic) {
    out.push_str(&format!("- **{}** `{}`: {}", d.severity, d.code, d.message));
    if let Some(suggestion) = &d.suggestion {
        out.push_str(&format!(" _{}_", suggestion));
    }
    out.push('\n');
}

/// Markdown report: parameter tables, recommended bores and diagnostics by section.
pub fn markdown(
    design: &DesignResult,
    recommended_worm_bore: &BoreRecommendation,
    recommended_wheel_bore: &BoreRecommendation,
) -> String {
    let worm = &design.worm;
    let wheel = &design.wheel;
    let assembly = &design.assembly;
    let manufacturing = &design.manufacturing;

    let mut out = String::new();
    out.push_str("# Worm Gear Design\n\n");
    out.push_str(&summary(design));
    out.push('\n');

    table_header(&mut out, "Worm");
    table_row(&mut out, "Type", worm.worm_type.code().to_string());
    table_row(&mut out, "Module", format!("{:.3} mm", worm.module_mm));
    table_row(&mut out, "Starts", worm.num_starts.to_string());
    table_row(&mut out, "Pitch diameter", format!("{:.2} mm", worm.pitch_diameter_mm));
    table_row(&mut out, "Tip diameter", format!("{:.2} mm", worm.tip_diameter_mm));
    table_row(&mut out, "Root diameter", format!("{:.2} mm", worm.root_diameter_mm));
    table_row(&mut out, "Lead", format!("{:.3} mm", worm.lead_mm));
    table_row(&mut out, "Lead angle", format!("{:.1}°", worm.lead_angle_deg));
    table_row(&mut out, "Hand", worm.hand.to_string());
    table_row(&mut out, "Profile", worm.profile.to_string());
    if let Some(throat) = worm.throat {
        table_row(&mut out, "Throat curvature radius", format!("{:.2} mm", throat.curvature_radius_mm));
        table_row(&mut out, "Throat reduction", format!("{:.2} mm", throat.reduction_mm));
        table_row(&mut out, "Throat arc angle", format!("{:.1}°", throat.arc_angle_deg));
    }

    table_header(&mut out, "Wheel");
    table_row(&mut out, "Teeth", wheel.num_teeth.to_string());
    table_row(&mut out, "Pitch diameter", format!("{:.2} mm", wheel.pitch_diameter_mm));
    table_row(&mut out, "Tip diameter", format!("{:.2} mm", wheel.tip_diameter_mm));
    table_row(&mut out, "Root diameter", format!("{:.2} mm", wheel.root_diameter_mm));
    table_row(&mut out, "Helix angle", format!("{:.1}°", wheel.helix_angle_deg));
    table_row(&mut out, "Profile shift", format!("{:.3}", wheel.profile_shift));
    if let Some(reduction) = wheel.tip_reduction_mm {
        table_row(&mut out, "Tip reduction", format!("{:.2} mm", reduction));
    }
    table_row(&mut out, "Throated", wheel.throated.to_string());

    table_header(&mut out, "Assembly");
    table_row(&mut out, "Ratio", format!("{}:1", assembly.ratio));
    table_row(&mut out, "Centre distance", format!("{:.2} mm", assembly.centre_distance_mm));
    table_row(&mut out, "Pressure angle", format!("{:.1}°", assembly.pressure_angle_deg));
    table_row(&mut out, "Backlash", format!("{:.2} mm", assembly.backlash_mm));
    table_row(&mut out, "Efficiency", format!("{:.1}%", assembly.efficiency_percent));
    table_row(&mut out, "Self-locking", assembly.self_locking.to_string());

    table_header(&mut out, "Manufacturing");
    table_row(&mut out, "Worm length", format!("{:.2} mm", manufacturing.worm_length_mm));
    table_row(&mut out, "Wheel width", format!("{:.2} mm", manufacturing.wheel_width_mm));
    table_row(&mut out, "Virtual hobbing", manufacturing.virtual_hobbing.to_string());
    table_row(&mut out, "Hobbing steps", manufacturing.hobbing_steps.to_string());

    table_header(&mut out, "Shaft");
    table_row(
        &mut out,
        "Worm bore",
        format!("{:.1} mm, {}", design.bore.worm.diameter_mm, design.bore.worm.anti_rotation),
    );
    table_row(
        &mut out,
        "Wheel bore",
        format!("{:.1} mm, {}", design.bore.wheel.diameter_mm, design.bore.wheel.anti_rotation),
    );
    table_row(
        &mut out,
        "Recommended worm bore",
        format!("{:.1} mm, {}", recommended_worm_bore.diameter_mm, recommended_worm_bore.anti_rotation),
    );
    table_row(
        &mut out,
        "Recommended wheel bore",
        format!("{:.1} mm, {}", recommended_wheel_bore.diameter_mm, recommended_wheel_bore.anti_rotation),
    );

    out.push_str("\n## Diagnostics\n\n");
    if design.diagnostics.is_empty() {
        out.push_str("No issues found.\n");
    }
    for section in Section::ALL {
        let in_section: Vec<&Diagnostic> =
            design.diagnostics.iter().filter(|d| d.section() == section).collect();
        if in_section.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", section.display_name()));
        for d in in_section {
            diagnostic_line(&mut out, d);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bore::recommend_bore;
    use crate::calculations::{solve, DesignInput};

    #[test]
    fn test_summary_reference() {
        let design = solve(&DesignInput::from_module(2.0, 30)).unwrap();
        let text = summary(&design);
        assert!(text.contains("centre distance 35.67 mm"));
        assert!(text.contains("lead angle 10.0°"));
        assert!(text.ends_with("valid (0 errors, 0 warnings)"));
    }

    #[test]
    fn test_markdown_sections() {
        let design = solve(&DesignInput::from_module(2.0, 10)).unwrap();
        let md = markdown(&design, &recommend_bore(11.34), &recommend_bore(20.0));
        assert!(md.starts_with("# Worm Gear Design"));
        assert!(md.contains("## Worm"));
        assert!(md.contains("| Teeth | 10 |"));
        assert!(md.contains("### Wheel"));
        assert!(md.contains("`TEETH_TOO_FEW`"));
    }

    #[test]
    fn test_markdown_globoid_throat() {
        let design = solve(&DesignInput::from_module(2.0, 30).globoid()).unwrap();
        let md = markdown(&design, &recommend_bore(11.34), &recommend_bore(60.0));
        assert!(md.contains("Throat reduction"));
        assert!(md.contains("No issues found."));
    }

    #[test]
    fn test_fragment_layout() {
        let mut out = String::new();
        table_header(&mut out, "Wheel");
        table_row(&mut out, "Teeth", "30".to_string());
        assert_eq!(out, "\n## Wheel\n\n| Parameter | Value |\n|-----------|-------|\n| Teeth | 30 |\n");

        let mut out = String::new();
        let d = Diagnostic::new(crate::diagnostics::DiagnosticCode::TeethTooFew, "Only 10 teeth")
            .with_suggestion("Raise the ratio");
        diagnostic_line(&mut out, &d);
        assert_eq!(out, "- **WARNING** `TEETH_TOO_FEW`: Only 10 teeth _Raise the ratio_\n");
    }
}
