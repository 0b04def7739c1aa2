//! # Design Validator
//!
//! Checks a solved design against engineering rules and produces a
//! [`ValidationReport`]. The validator never changes the design.
//!
//! Rules live in a static table and run in declaration order; the resulting
//! messages are then stably grouped by UI section (overview, worm, wheel,
//! assembly, shaft), so two rules in the same section keep their table order.
//!
//! | Code | Severity | Fires when |
//! |------|----------|------------|
//! | `MODULE_OUT_OF_RANGE` | warning | module outside 0.3–25 mm |
//! | `PRESSURE_ANGLE_UNUSUAL` | warning | pressure angle outside 14.5°–25° |
//! | `LEAD_ANGLE_TOO_SHALLOW` | warning | lead angle < 1° |
//! | `LEAD_ANGLE_TOO_STEEP` | warning | lead angle > 45° |
//! | `WORM_IMPOSSIBLE` | error | worm root diameter ≤ 0 |
//! | `WHEEL_ROOT_EXCEEDS_BORE` | error | wheel root diameter ≤ wheel bore |
//! | `TEETH_TOO_FEW` | warning | wheel teeth < 18 |
//! | `CENTRE_DISTANCE_INVALID` | error | tip circles reach the mating root circles |
//! | `EFFICIENCY_LOW` | info | efficiency < 50 % |
//! | `WORM_LENGTH_TOO_SHORT` | warning | worm shorter than the engagement zone |
//! | `WHEEL_WIDTH_TOO_NARROW` | warning | wheel narrower than the contact zone |
//! | `THROAT_REDUCTION_INVALID` | error | globoid throat reduction ≤ 0 |
//!
//! ## Example
//!
//! ```rust
//! use gear_core::calculations::{solve, DesignInput};
//! use gear_core::validation::validate;
//!
//! let design = solve(&DesignInput::from_module(2.0, 10)).unwrap();
//! let report = validate(&design);
//! assert!(report.valid);
//! assert_eq!(report.codes().len(), 1); // TEETH_TOO_FEW
//! ```

use tracing::{debug, instrument};

use crate::config::DesignPolicy;
use crate::diagnostics::{Diagnostic, DiagnosticCode, ValidationReport};
use crate::equations;
use crate::model::DesignResult;
use crate::standards::StandardsTable;

/// Slack for comparing derived lengths against their minimums (mm)
const LENGTH_TOLERANCE_MM: f64 = 1e-9;

/// What a rule sees.
struct RuleContext<'a> {
    design: &'a DesignResult,
    standards: &'a StandardsTable,
    policy: &'a DesignPolicy,
}

type Check = fn(&RuleContext<'_>) -> Option<Diagnostic>;

struct Rule {
    code: DiagnosticCode,
    check: Check,
}

/// Rule table in declaration order
static RULES: [Rule; 12] = [
    Rule { code: DiagnosticCode::ModuleOutOfRange, check: check_module },
    Rule { code: DiagnosticCode::PressureAngleUnusual, check: check_pressure_angle },
    Rule { code: DiagnosticCode::LeadAngleTooShallow, check: check_lead_angle_shallow },
    Rule { code: DiagnosticCode::LeadAngleTooSteep, check: check_lead_angle_steep },
    Rule { code: DiagnosticCode::WormImpossible, check: check_worm_root },
    Rule { code: DiagnosticCode::WheelRootExceedsBore, check: check_wheel_root },
    Rule { code: DiagnosticCode::TeethTooFew, check: check_teeth },
    Rule { code: DiagnosticCode::CentreDistanceInvalid, check: check_centre_distance },
    Rule { code: DiagnosticCode::EfficiencyLow, check: check_efficiency },
    Rule { code: DiagnosticCode::WormLengthTooShort, check: check_worm_length },
    Rule { code: DiagnosticCode::WheelWidthTooNarrow, check: check_wheel_width },
    Rule { code: DiagnosticCode::ThroatReductionInvalid, check: check_throat },
];

/// Validate with the DIN standards table and default policy.
pub fn validate(design: &DesignResult) -> ValidationReport {
    validate_with(design, StandardsTable::din(), &DesignPolicy::default())
}

/// Run every rule and group the findings by section.
#[instrument(skip_all)]
pub fn validate_with(
    design: &DesignResult,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> ValidationReport {
    let ctx = RuleContext {
        design,
        standards,
        policy,
    };

    let mut messages = Vec::new();
    for rule in RULES.iter() {
        if let Some(diagnostic) = (rule.check)(&ctx) {
            debug!(code = rule.code.as_str(), "rule fired");
            messages.push(diagnostic);
        }
    }
    // sort_by_key is stable
    messages.sort_by_key(Diagnostic::section);

    ValidationReport::from_messages(messages)
}

fn check_module(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let m = ctx.design.worm.module_mm;
    let usual = ctx.standards.module_usual_mm;
    if usual.contains(m) {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::ModuleOutOfRange,
            format!(
                "Module {:.3} mm is outside the usual range {}–{} mm",
                m, usual.min, usual.max
            ),
        )
        .with_suggestion(format!("Choose a module between {} and {} mm", usual.min, usual.max)),
    )
}

fn check_pressure_angle(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let alpha = ctx.design.assembly.pressure_angle_deg;
    let usual = ctx.standards.pressure_angle_usual_deg;
    if usual.contains(alpha) {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::PressureAngleUnusual,
            format!(
                "Pressure angle {:.1}° is unusual (normal practice is {}°–{}°)",
                alpha, usual.min, usual.max
            ),
        )
        .with_suggestion("Use 20° unless the mating hob requires otherwise"),
    )
}

fn check_lead_angle_shallow(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let gamma = ctx.design.worm.lead_angle_deg;
    let min = ctx.standards.lead_angle_usual_deg.min;
    if gamma >= min {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::LeadAngleTooShallow,
            format!(
                "Lead angle {:.2}° is below {}°; the thread is difficult to manufacture",
                gamma, min
            ),
        )
        .with_suggestion("Reduce the worm pitch diameter or add thread starts"),
    )
}

fn check_lead_angle_steep(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let gamma = ctx.design.worm.lead_angle_deg;
    let max = ctx.standards.lead_angle_usual_deg.max;
    if gamma <= max {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::LeadAngleTooSteep,
            format!("Lead angle {:.1}° exceeds {}°; the thread is weak", gamma, max),
        )
        .with_suggestion("Increase the worm pitch diameter or reduce the number of starts"),
    )
}

fn check_worm_root(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let df1 = ctx.design.worm.root_diameter_mm;
    if df1 > 0.0 {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::WormImpossible,
            format!("Worm root diameter {:.2} mm is not positive; the worm cannot be made", df1),
        )
        .with_suggestion("Increase the worm pitch diameter or reduce the module"),
    )
}

fn check_wheel_root(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let df2 = ctx.design.wheel.root_diameter_mm;
    let bore = ctx.design.bore.wheel.diameter_mm;
    if df2 > bore {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::WheelRootExceedsBore,
            format!(
                "Wheel root diameter {:.2} mm does not clear the {:.1} mm bore",
                df2, bore
            ),
        )
        .with_suggestion("Increase the ratio or module, or choose a smaller wheel bore"),
    )
}

fn check_teeth(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let z2 = ctx.design.wheel.num_teeth;
    let min = ctx.standards.min_wheel_teeth;
    if z2 >= min {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::TeethTooFew,
            format!("Wheel has {} teeth; fewer than {} risks undercutting", z2, min),
        )
        .with_suggestion("Increase the ratio or the number of worm starts, or add profile shift"),
    )
}

/// Each tip circle must stay clear of the mating root circle: `ra + rf ≤ a`
fn check_centre_distance(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let design = ctx.design;
    let a = design.assembly.centre_distance_mm;
    if a <= 0.0 {
        return Some(
            Diagnostic::new(
                DiagnosticCode::CentreDistanceInvalid,
                format!("Centre distance {:.2} mm is not positive", a),
            )
            .with_suggestion("Check the module and pitch diameters"),
        );
    }

    let worm_tip = design.worm.tip_diameter_mm / 2.0;
    let worm_root = design.worm.root_diameter_mm / 2.0;
    let wheel_tip = design.wheel.effective_tip_diameter_mm() / 2.0;
    let wheel_root = design.wheel.root_diameter_mm / 2.0;
    let clearance = (a - (worm_tip + wheel_root)).min(a - (wheel_tip + worm_root));
    if clearance >= -LENGTH_TOLERANCE_MM {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::CentreDistanceInvalid,
            format!(
                "Tip circles interfere with the mating root circles at centre distance {:.2} mm ({:.3} mm overlap)",
                a, -clearance
            ),
        )
        .with_suggestion("Reduce the wheel profile shift or increase the centre distance"),
    )
}

fn check_efficiency(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let eta = ctx.design.assembly.efficiency_percent;
    let threshold = ctx.policy.low_efficiency_percent;
    if eta >= threshold {
        return None;
    }
    let locking = if ctx.design.assembly.self_locking {
        "; the drive is self-locking"
    } else {
        ""
    };
    Some(
        Diagnostic::new(
            DiagnosticCode::EfficiencyLow,
            format!("Estimated efficiency {:.1}% is below {:.0}%{}", eta, threshold, locking),
        )
        .with_suggestion("Increase the lead angle if back-driving does not need to be prevented"),
    )
}

fn check_worm_length(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let design = ctx.design;
    let min = equations::min_worm_length(
        design.assembly.centre_distance_mm,
        design.worm.tip_diameter_mm,
        design.wheel.tip_diameter_mm,
    );
    let length = design.manufacturing.worm_length_mm;
    if length >= min - LENGTH_TOLERANCE_MM {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::WormLengthTooShort,
            format!(
                "Worm length {:.2} mm is shorter than the {:.2} mm engagement zone",
                length, min
            ),
        )
        .with_suggestion(format!("Use a worm length of at least {:.2} mm", min)),
    )
}

fn check_wheel_width(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let design = ctx.design;
    let min = equations::min_wheel_width(
        design.assembly.centre_distance_mm,
        design.worm.pitch_diameter_mm,
        design.wheel.tip_diameter_mm,
    );
    let width = design.manufacturing.wheel_width_mm;
    if width >= min - LENGTH_TOLERANCE_MM {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::WheelWidthTooNarrow,
            format!(
                "Wheel width {:.2} mm is narrower than the {:.2} mm contact zone",
                width, min
            ),
        )
        .with_suggestion(format!("Use a wheel width of at least {:.2} mm", min)),
    )
}

fn check_throat(ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let throat = ctx.design.worm.throat?;
    if throat.reduction_mm > 0.0 {
        return None;
    }
    Some(
        Diagnostic::new(
            DiagnosticCode::ThroatReductionInvalid,
            format!("Throat reduction {:.3} mm must be positive", throat.reduction_mm),
        )
        .with_suggestion("Leave the throat reduction empty to derive it automatically"),
    )
}
