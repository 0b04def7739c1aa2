//! # gear_core - Worm Gear Design Engine
//!
//! `gear_core` designs matched worm/wheel pairs from partial engineering
//! constraints and checks the result against DIN 3975/3996-derived bounds.
//! Every input and output is JSON-serializable, so the same engine serves the
//! CLI, a browser UI or a geometry generator.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: `solve` and `validate` are pure functions of their inputs
//! - **Typed at the edge**: strings are parsed into closed enums once, in the bridge
//! - **Three kinds of failure**: [`InfeasibleDesign`] (no design exists),
//!   [`SchemaError`] (bad payload), and [`Diagnostic`]s (a design exists but has issues)
//! - **Injected standards**: the DIN table and policy values are passed by reference
//!
//! ## Quick Start
//!
//! ```rust
//! use gear_core::calculations::{solve, DesignInput};
//!
//! // Module 2, 30:1, single start
//! let design = solve(&DesignInput::from_module(2.0, 30)).unwrap();
//!
//! assert_eq!(design.wheel.num_teeth, 30);
//! assert!(design.valid);
//!
//! // Serialize for storage or transmission
//! let json = serde_json::to_string_pretty(&design).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Derivation engine: four design modes, module snapping, globoid throat
//! - [`validation`] - Rule-based validator
//! - [`bore`] - Bore and anti-rotation advisor
//! - [`bridge`] - Wire schema, rounding, reports and design documents
//! - [`model`] - Design data model
//! - [`diagnostics`] - Severity-tagged findings
//! - [`equations`] - Closed-form gear relations
//! - [`standards`] - DIN 780 module series and bounds
//! - [`config`] - Policy constants
//! - [`errors`] - Structured error types

pub mod bore;
pub mod bridge;
pub mod calculations;
pub mod config;
pub mod diagnostics;
pub mod equations;
pub mod errors;
pub mod model;
pub mod standards;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{solve, solve_with, DesignInput, DesignMode};
pub use config::DesignPolicy;
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity, ValidationReport};
pub use errors::{GearError, GearResult, InfeasibleDesign, SchemaError};
pub use model::DesignResult;
pub use standards::StandardsTable;
pub use validation::{validate, validate_with};
