//! File operations for the CLI.
//!
//! Design documents are saved atomically: write to `<name>.tmp`, sync, then
//! rename over the target, so an interrupted save never leaves a truncated
//! document behind.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use gear_core::bridge::DesignDocument;
use gear_core::errors::{GearError, GearResult, SchemaError};
use gear_core::DesignPolicy;

/// Read a whole file, or stdin when `path` is `-`.
pub fn read_source(path: &Path) -> GearResult<String> {
    let mut contents = String::new();
    if path.as_os_str() == "-" {
        io::stdin()
            .read_to_string(&mut contents)
            .map_err(|e| GearError::file_error("read", "<stdin>", e.to_string()))?;
        return Ok(contents);
    }

    let mut file = File::open(path)
        .map_err(|e| GearError::file_error("open", path.display().to_string(), e.to_string()))?;
    file.read_to_string(&mut contents)
        .map_err(|e| GearError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Load a policy file; missing keys keep their defaults, present ones are range-checked.
pub fn load_policy(path: &Path) -> GearResult<DesignPolicy> {
    let contents = read_source(path)?;
    let policy: DesignPolicy = serde_json::from_str(&contents).map_err(|e| {
        SchemaError::malformed(format!("Invalid policy in {}: {}", path.display(), e))
    })?;
    policy.validate()?;
    Ok(policy)
}

/// Save a design document with atomic write semantics.
pub fn save_document(document: &DesignDocument, path: &Path) -> GearResult<()> {
    let json = document.to_json()?;

    let tmp_path = path.with_extension("tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        GearError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        GearError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        GearError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        GearError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a design document, rejecting incompatible schema versions.
pub fn load_document(path: &Path) -> GearResult<DesignDocument> {
    let contents = read_source(path)?;
    DesignDocument::from_json(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gear_core::bridge::calculate_input;
    use gear_core::{DesignInput, StandardsTable};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gear_cli_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_save_and_load_document() {
        let input = DesignInput::from_module(2.0, 30);
        let output = calculate_input(&input, StandardsTable::din(), &DesignPolicy::default()).unwrap();
        let document = DesignDocument::new(input, output);

        let path = temp_path("roundtrip");
        save_document(&document, &path).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded, document);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_document(Path::new("/nonexistent/design.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_partial_policy() {
        let path = temp_path("policy");
        fs::write(&path, r#"{"default_lead_angle_deg": 12.5}"#).unwrap();
        let policy = load_policy(&path).unwrap();
        assert_eq!(policy.default_lead_angle_deg, 12.5);
        assert_eq!(policy.friction_coefficient, DesignPolicy::default().friction_coefficient);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_policy_out_of_range_is_rejected() {
        let path = temp_path("policy_range");
        fs::write(&path, r#"{"scan_max_samples": 1000000000}"#).unwrap();
        let err = load_policy(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FIELD");
        assert!(err.to_string().contains("scan_max_samples"));
        let _ = fs::remove_file(&path);
    }
}
