//! # gear - Worm Gear Design CLI
//!
//! Solves and validates worm/wheel designs from wire-format JSON.
//!
//! ```text
//! gear solve design.json              # summary + diagnostics
//! gear solve - --json < design.json   # full wire output on stdout
//! gear solve design.json --out saved.json
//! gear reload saved.json              # re-solve a saved design
//! gear modules                        # DIN 780 preferred modules
//! gear bore 60                        # bore recommendation for a pitch diameter
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`);
//! `-v` switches to `debug`.

mod file_io;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gear_core::bore::recommend_bore_with;
use gear_core::bridge::{self, DesignDocument, WireOutput};
use gear_core::errors::{GearError, GearResult};
use gear_core::{solve_with, DesignPolicy, StandardsTable};

#[derive(Parser)]
#[command(name = "gear", version, about = "Worm gear design solver and validator", long_about = None)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Policy overrides (JSON, missing keys keep their defaults)
    #[arg(long, global = true, value_name = "FILE")]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a design from a wire-format JSON input (`-` reads stdin)
    Solve {
        input: PathBuf,

        /// Print the full wire output as JSON
        #[arg(long, conflicts_with = "markdown")]
        json: bool,

        /// Print the markdown report
        #[arg(long)]
        markdown: bool,

        /// Save a design document to this path
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Re-solve a saved design document and report drift
    Reload { document: PathBuf },
    /// List the preferred module series
    Modules,
    /// Recommend a bore for a pitch diameter
    Bore { pitch_diameter_mm: f64 },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = match &cli.policy {
        Some(path) => match file_io::load_policy(path) {
            Ok(policy) => policy,
            Err(err) => return report_error(&err),
        },
        None => DesignPolicy::default(),
    };
    let standards = StandardsTable::din();

    let result = match cli.command {
        Commands::Solve {
            input,
            json,
            markdown,
            out,
        } => run_solve(&input, json, markdown, out.as_deref(), standards, &policy),
        Commands::Reload { document } => run_reload(&document, standards, &policy),
        Commands::Modules => {
            run_modules(standards);
            Ok(true)
        }
        Commands::Bore { pitch_diameter_mm } => run_bore(pitch_diameter_mm, standards, &policy),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => report_error(&err),
    }
}

fn report_error(err: &GearError) -> ExitCode {
    eprintln!("error [{}]: {}", err.error_code(), err);
    if err.is_input_error() {
        ExitCode::from(2)
    } else {
        ExitCode::from(3)
    }
}

fn print_report(output: &WireOutput) {
    println!("{}", output.summary);
    if output.messages.is_empty() {
        return;
    }
    println!();
    for message in &output.messages {
        println!("  {}", message);
    }
}

/// Returns whether the design is valid.
fn run_solve(
    input: &std::path::Path,
    json: bool,
    markdown: bool,
    out: Option<&std::path::Path>,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> GearResult<bool> {
    let payload = file_io::read_source(input)?;
    let design_input = bridge::parse_input(&payload)?;
    debug!(mode = design_input.mode.name(), "input parsed");

    let output = bridge::calculate_input(&design_input, standards, policy)?;

    if json {
        let text = serde_json::to_string_pretty(&output).map_err(|e| {
            GearError::from(gear_core::SchemaError::malformed(e.to_string()))
        })?;
        println!("{}", text);
    } else if markdown {
        print!("{}", output.markdown);
    } else {
        print_report(&output);
    }

    if let Some(path) = out {
        let valid = output.valid;
        let document = DesignDocument::new(design_input, output);
        file_io::save_document(&document, path)?;
        info!(path = %path.display(), id = %document.meta.id, "design document saved");
        return Ok(valid);
    }
    Ok(output.valid)
}

fn run_reload(
    path: &std::path::Path,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> GearResult<bool> {
    let document = file_io::load_document(path)?;
    println!(
        "Document {} (created {}, {})",
        document.meta.id,
        document.meta.created.to_rfc3339(),
        document.meta.generator
    );

    let design = solve_with(&document.input, standards, policy)?;
    let output = bridge::render(&design, standards, policy);
    print_report(&output);

    if let Some(saved) = &document.output.design {
        let reloaded = bridge::calculate_input(&bridge::input_from_design(saved), standards, policy)?;
        if let Some(reloaded) = reloaded.design {
            let drift = reloaded.assembly.centre_distance_mm - saved.assembly.centre_distance_mm;
            println!();
            println!(
                "Centre distance: saved {:.2} mm, from saved design {:.2} mm (drift {:+.3} mm)",
                saved.assembly.centre_distance_mm,
                reloaded.assembly.centre_distance_mm,
                drift
            );
        }
    }
    Ok(output.valid)
}

fn run_modules(standards: &StandardsTable) {
    println!("Preferred modules (DIN 780), mm:");
    let modules: Vec<String> = standards.modules_mm.iter().map(|m| m.to_string()).collect();
    println!("  {}", modules.join(", "));
}

fn run_bore(pitch_diameter_mm: f64, standards: &StandardsTable, policy: &DesignPolicy) -> GearResult<bool> {
    if !pitch_diameter_mm.is_finite() || pitch_diameter_mm <= 0.0 {
        return Err(gear_core::InfeasibleDesign::new(
            "pitch_diameter_mm",
            pitch_diameter_mm.to_string(),
            "Must be a positive number",
        )
        .into());
    }
    let rec = recommend_bore_with(pitch_diameter_mm, standards, policy);
    println!("Bore {:.1} mm, {}", rec.diameter_mm, rec.anti_rotation);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_solve_flags() {
        let cli = Cli::try_parse_from(["gear", "solve", "in.json", "--json", "--out", "doc.json"]).unwrap();
        match cli.command {
            Commands::Solve { json, markdown, out, .. } => {
                assert!(json);
                assert!(!markdown);
                assert_eq!(out, Some(PathBuf::from("doc.json")));
            }
            _ => panic!("expected solve"),
        }
    }

    #[test]
    fn test_json_and_markdown_conflict() {
        assert!(Cli::try_parse_from(["gear", "solve", "in.json", "--json", "--markdown"]).is_err());
    }
}
