//! # Diagnostics
//!
//! Severity-tagged findings attached to a solved design. Codes are stable
//! identifiers: the UI routes each message to a form section by its code, so
//! renaming a variant's wire spelling is a breaking change.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a diagnostic is. Only `Error` makes a design invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// UI section a diagnostic belongs to, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Overview,
    Worm,
    Wheel,
    Assembly,
    Shaft,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Overview,
        Section::Worm,
        Section::Wheel,
        Section::Assembly,
        Section::Shaft,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Worm => "Worm",
            Section::Wheel => "Wheel",
            Section::Assembly => "Assembly",
            Section::Shaft => "Shaft",
        }
    }
}

/// Stable diagnostic identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    ModuleOutOfRange,
    PressureAngleUnusual,
    LeadAngleTooShallow,
    LeadAngleTooSteep,
    WormImpossible,
    WheelRootExceedsBore,
    TeethTooFew,
    CentreDistanceInvalid,
    EfficiencyLow,
    WormLengthTooShort,
    WheelWidthTooNarrow,
    ThroatReductionInvalid,
}

impl DiagnosticCode {
    /// Wire spelling of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::ModuleOutOfRange => "MODULE_OUT_OF_RANGE",
            DiagnosticCode::PressureAngleUnusual => "PRESSURE_ANGLE_UNUSUAL",
            DiagnosticCode::LeadAngleTooShallow => "LEAD_ANGLE_TOO_SHALLOW",
            DiagnosticCode::LeadAngleTooSteep => "LEAD_ANGLE_TOO_STEEP",
            DiagnosticCode::WormImpossible => "WORM_IMPOSSIBLE",
            DiagnosticCode::WheelRootExceedsBore => "WHEEL_ROOT_EXCEEDS_BORE",
            DiagnosticCode::TeethTooFew => "TEETH_TOO_FEW",
            DiagnosticCode::CentreDistanceInvalid => "CENTRE_DISTANCE_INVALID",
            DiagnosticCode::EfficiencyLow => "EFFICIENCY_LOW",
            DiagnosticCode::WormLengthTooShort => "WORM_LENGTH_TOO_SHORT",
            DiagnosticCode::WheelWidthTooNarrow => "WHEEL_WIDTH_TOO_NARROW",
            DiagnosticCode::ThroatReductionInvalid => "THROAT_REDUCTION_INVALID",
        }
    }

    /// Section the UI shows this code in
    pub fn section(&self) -> Section {
        match self {
            DiagnosticCode::ModuleOutOfRange | DiagnosticCode::PressureAngleUnusual => Section::Overview,
            DiagnosticCode::LeadAngleTooShallow
            | DiagnosticCode::LeadAngleTooSteep
            | DiagnosticCode::WormImpossible
            | DiagnosticCode::WormLengthTooShort
            | DiagnosticCode::ThroatReductionInvalid => Section::Worm,
            DiagnosticCode::TeethTooFew | DiagnosticCode::WheelWidthTooNarrow => Section::Wheel,
            DiagnosticCode::CentreDistanceInvalid | DiagnosticCode::EfficiencyLow => Section::Assembly,
            DiagnosticCode::WheelRootExceedsBore => Section::Shaft,
        }
    }

    /// Fixed severity of the rule behind this code
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticCode::WormImpossible
            | DiagnosticCode::WheelRootExceedsBore
            | DiagnosticCode::CentreDistanceInvalid
            | DiagnosticCode::ThroatReductionInvalid => Severity::Error,
            DiagnosticCode::EfficiencyLow => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding about a design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "severity": "warning",
///   "code": "TEETH_TOO_FEW",
///   "message": "Wheel has 10 teeth; fewer than 18 risks undercutting",
///   "suggestion": "Increase the ratio or the number of worm starts"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Build a diagnostic with the code's fixed severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: code.severity(),
            code,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn section(&self) -> Section {
        self.code.section()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Output of the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False iff `messages` contains an error
    pub valid: bool,
    pub messages: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Build a report; `valid` is derived from the messages
    pub fn from_messages(messages: Vec<Diagnostic>) -> Self {
        let valid = !messages.iter().any(Diagnostic::is_error);
        ValidationReport { valid, messages }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|d| d.severity == severity).count()
    }

    /// Codes in report order
    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.messages.iter().map(|d| d.code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_wire_spelling_matches_serde() {
        let codes = [
            DiagnosticCode::ModuleOutOfRange,
            DiagnosticCode::PressureAngleUnusual,
            DiagnosticCode::LeadAngleTooShallow,
            DiagnosticCode::LeadAngleTooSteep,
            DiagnosticCode::WormImpossible,
            DiagnosticCode::WheelRootExceedsBore,
            DiagnosticCode::TeethTooFew,
            DiagnosticCode::CentreDistanceInvalid,
            DiagnosticCode::EfficiencyLow,
            DiagnosticCode::WormLengthTooShort,
            DiagnosticCode::WheelWidthTooNarrow,
            DiagnosticCode::ThroatReductionInvalid,
        ];
        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_section_order() {
        assert!(Section::Overview < Section::Worm);
        assert!(Section::Assembly < Section::Shaft);
    }

    #[test]
    fn test_report_validity() {
        let warning = Diagnostic::new(DiagnosticCode::TeethTooFew, "few teeth");
        let report = ValidationReport::from_messages(vec![warning.clone()]);
        assert!(report.valid);

        let error = Diagnostic::new(DiagnosticCode::WormImpossible, "no worm");
        let report = ValidationReport::from_messages(vec![warning, error]);
        assert!(!report.valid);
        assert_eq!(report.count(Severity::Error), 1);
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(DiagnosticCode::EfficiencyLow, "Efficiency 40.0%")
            .with_suggestion("Use more starts");
        assert_eq!(d.to_string(), "[INFO] EFFICIENCY_LOW: Efficiency 40.0% (Use more starts)");
    }
}
