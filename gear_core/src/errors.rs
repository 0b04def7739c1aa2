//! # Error Types
//!
//! Structured error types for gear_core. There are three distinct classes:
//!
//! - [`InfeasibleDesign`] - the engine cannot produce any geometrically sane
//!   design from the inputs (ratio < 1, non-positive diameters, ...). Raised
//!   before a [`DesignResult`](crate::model::DesignResult) exists.
//! - [`SchemaError`] - the wire input is malformed or incomplete. Raised by the
//!   bridge before any solving is attempted.
//! - Soft problems with a computed design are *not* errors; they are
//!   [`Diagnostic`](crate::diagnostics::Diagnostic)s returned with the design.
//!
//! ## Example
//!
//! ```rust
//! use gear_core::errors::InfeasibleDesign;
//!
//! fn check_ratio(ratio: u32) -> Result<(), InfeasibleDesign> {
//!     if ratio < 1 {
//!         return Err(InfeasibleDesign::new("ratio", ratio.to_string(), "Ratio must be at least 1"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_ratio(0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for gear_core operations
pub type GearResult<T> = Result<T, GearError>;

/// Engine-level failure: the inputs cannot produce a design at all.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[error("Infeasible design: '{field}' = {value} - {reason}")]
pub struct InfeasibleDesign {
    /// Input or derived quantity that violated the constraint
    pub field: String,
    /// Offending value, formatted for display
    pub value: String,
    /// Human-readable explanation
    pub reason: String,
}

impl InfeasibleDesign {
    pub fn new(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        InfeasibleDesign {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Bridge-level failure: the wire input does not match the schema.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SchemaError {
    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A field is present but has the wrong shape or an unknown value
    #[error("Invalid value for '{field}': {value} - {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    /// The payload is not valid JSON or not an object
    #[error("Malformed input: {reason}")]
    Malformed { reason: String },

    /// Document schema version is not compatible with this build
    #[error("Version mismatch: document version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl SchemaError {
    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        SchemaError::MissingField { field: field.into() }
    }

    /// Create an InvalidField error
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidField {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Malformed error
    pub fn malformed(reason: impl Into<String>) -> Self {
        SchemaError::Malformed { reason: reason.into() }
    }
}

/// Umbrella error for callers that go through the bridge or touch files.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum GearError {
    /// The engine rejected the inputs
    #[error(transparent)]
    Infeasible(#[from] InfeasibleDesign),

    /// The wire payload was rejected before solving
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },
}

impl GearError {
    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        GearError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            GearError::Infeasible(_) => "INFEASIBLE_DESIGN",
            GearError::Schema(SchemaError::MissingField { .. }) => "MISSING_FIELD",
            GearError::Schema(SchemaError::InvalidField { .. }) => "INVALID_FIELD",
            GearError::Schema(SchemaError::Malformed { .. }) => "MALFORMED_INPUT",
            GearError::Schema(SchemaError::VersionMismatch { .. }) => "VERSION_MISMATCH",
            GearError::FileError { .. } => "FILE_ERROR",
        }
    }

    /// True when the failure is a property of the input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(self, GearError::Infeasible(_) | GearError::Schema(_))
    }
}
