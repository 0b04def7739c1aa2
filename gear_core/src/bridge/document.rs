//! # Design Documents
//!
//! A design document pairs the exact engine input with the wire output it
//! produced, so a saved design can be regenerated bit-for-bit later.
//!
//! ```text
//! DesignDocument
//! ├── schema_version: "2.0"
//! ├── meta: DocumentMeta (id, created, generator)
//! ├── input: DesignInput (unrounded)
//! └── output: WireOutput (rounded, as sent to the generator)
//! ```
//!
//! Only the major component of `schema_version` has to match on load.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::wire::{WireOutput, SCHEMA_VERSION};
use crate::calculations::DesignInput;
use crate::errors::{GearError, GearResult, SchemaError};

/// Generator string written into new documents
pub const GENERATOR: &str = concat!("gear_core ", env!("CARGO_PKG_VERSION"));

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub generator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Saved design: engine input plus the wire output it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub schema_version: String,
    pub meta: DocumentMeta,
    pub input: DesignInput,
    pub output: WireOutput,
}

impl DesignDocument {
    /// Create a document with a fresh id and the current time.
    pub fn new(input: DesignInput, output: WireOutput) -> Self {
        DesignDocument {
            schema_version: SCHEMA_VERSION.to_string(),
            meta: DocumentMeta {
                id: Uuid::new_v4(),
                created: Utc::now(),
                generator: GENERATOR.to_string(),
                label: None,
            },
            input,
            output,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.meta.label = Some(label.into());
        self
    }

    pub fn to_json(&self) -> GearResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GearError::from(SchemaError::malformed(e.to_string())))
    }

    /// Parse a document, checking the schema version before the body.
    pub fn from_json(json: &str) -> GearResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| SchemaError::malformed(e.to_string()))?;
        let version = value
            .get("schema_version")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| SchemaError::missing_field("schema_version"))?;
        check_schema_version(version)?;

        serde_json::from_value(value).map_err(|e| SchemaError::malformed(e.to_string()).into())
    }
}

/// Parse "2", "2.0" or "2.0.1" as a semantic version
fn parse_version(version: &str) -> Option<Version> {
    let parts = version.trim().split('.').count();
    let padded = match parts {
        1 => format!("{}.0.0", version.trim()),
        2 => format!("{}.0", version.trim()),
        _ => version.trim().to_string(),
    };
    Version::parse(&padded).ok()
}

/// Accept a document whose major schema version matches this build.
///
/// # Example
/// ```rust
/// use gear_core::bridge::document::check_schema_version;
///
/// assert!(check_schema_version("2.0").is_ok());
/// assert!(check_schema_version("2.3.1").is_ok());
/// assert!(check_schema_version("1.0").is_err());
/// ```
pub fn check_schema_version(file_version: &str) -> Result<(), SchemaError> {
    let mismatch = || SchemaError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let file = parse_version(file_version).ok_or_else(mismatch)?;
    let current = parse_version(SCHEMA_VERSION).ok_or_else(mismatch)?;
    if file.major == current.major {
        Ok(())
    } else {
        Err(mismatch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::calculate_input;
    use crate::config::DesignPolicy;
    use crate::standards::StandardsTable;

    fn document() -> DesignDocument {
        let input = DesignInput::from_module(2.0, 30);
        let output = calculate_input(&input, StandardsTable::din(), &DesignPolicy::default()).unwrap();
        DesignDocument::new(input, output)
    }

    #[test]
    fn test_document_roundtrip() {
        let doc = document().with_label("test rig");
        let json = doc.to_json().unwrap();
        let loaded = DesignDocument::from_json(&json).unwrap();
        assert_eq!(doc, loaded);
        assert_eq!(loaded.meta.label.as_deref(), Some("test rig"));
    }

    #[test]
    fn test_new_documents_get_unique_ids() {
        assert_ne!(document().meta.id, document().meta.id);
    }

    #[test]
    fn test_incompatible_version_rejected() {
        let mut value = serde_json::to_value(document()).unwrap();
        value["schema_version"] = serde_json::Value::from("1.4");
        let err = DesignDocument::from_json(&value.to_string()).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_missing_version_rejected() {
        let err = DesignDocument::from_json(r#"{"meta": {}}"#).unwrap_err();
        assert_eq!(err, GearError::Schema(SchemaError::missing_field("schema_version")));
    }

    #[test]
    fn test_version_parsing() {
        assert!(check_schema_version("2").is_ok());
        assert!(check_schema_version("3.0").is_err());
        assert!(check_schema_version("two").is_err());
    }
}
