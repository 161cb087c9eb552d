//! apigen-schema CLI
//!
//! Command-line interface for generating and linting attribute schemas.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use apigen_schema::{
    assemble, load_config, load_document_auto, render, Assembly, Severity,
};

#[derive(Parser)]
#[command(name = "apigen-schema")]
#[command(about = "Generate normalized attribute schemas from HTTP API descriptions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate attribute schemas for the configured entities
    Generate {
        /// API description source: file path or URL (http:// or https://)
        document: String,

        /// Generator config file
        #[arg(long, short)]
        config: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress warnings on stderr
        #[arg(long, short)]
        quiet: bool,
    },

    /// Dry-run assembly and report diagnostics without writing output
    Lint {
        /// API description source: file path or URL (http:// or https://)
        document: String,

        /// Generator config file
        #[arg(long, short)]
        config: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat informational diagnostics as failures too
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            document,
            config,
            output,
            pretty,
            quiet,
        } => run_generate(&document, &config, output, pretty, quiet),

        Commands::Lint {
            document,
            config,
            format,
            strict,
        } => run_lint(&document, &config, &format, strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn load_inputs(
    document_source: &str,
    config_path: &std::path::Path,
) -> Result<Assembly, u8> {
    let config = load_config(config_path).map_err(|e| {
        eprintln!("Error: {}", e);
        if let apigen_schema::ConfigError::Invalid { violations } = &e {
            for violation in violations {
                eprintln!("  {}", violation);
            }
        }
        e.exit_code() as u8
    })?;

    let document = load_document_auto(document_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    Ok(assemble(&document, &config))
}

fn run_generate(
    document_source: &str,
    config_path: &std::path::Path,
    output: Option<PathBuf>,
    pretty: bool,
    quiet: bool,
) -> Result<(), u8> {
    let assembly = load_inputs(document_source, config_path)?;

    if !quiet {
        for warning in assembly.warnings() {
            eprintln!("warning: {}", warning);
        }
    }

    let rendered = render(&assembly);
    let json_output = if pretty {
        serde_json::to_string_pretty(&rendered)
    } else {
        serde_json::to_string(&rendered)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_lint(
    document_source: &str,
    config_path: &std::path::Path,
    format: &str,
    strict: bool,
) -> Result<(), u8> {
    let assembly = load_inputs(document_source, config_path)?;

    let entities_checked = assembly.resources.len() + assembly.data_sources.len();
    let warnings = assembly
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    let infos = assembly.diagnostics.len() - warnings;
    let failed = warnings > 0 || (strict && infos > 0);

    if format == "json" {
        let report = serde_json::json!({
            "entities_checked": entities_checked,
            "warnings": warnings,
            "infos": infos,
            "ok": !failed,
            "diagnostics": assembly.diagnostics,
        });
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        let entities = assembly
            .resources
            .iter()
            .map(|r| ("resource", r))
            .chain(assembly.data_sources.iter().map(|d| ("datasource", d)));

        for (kind, entity) in entities {
            let entity_diagnostics = assembly
                .diagnostics
                .iter()
                .filter(|d| d.entity == entity.name)
                .collect::<Vec<_>>();

            let status_icon = if entity_diagnostics
                .iter()
                .any(|d| d.severity == Severity::Warning)
            {
                "\x1b[31m✗\x1b[0m"
            } else if entity_diagnostics.is_empty() {
                "\x1b[32m✓\x1b[0m"
            } else {
                "\x1b[33m⚠\x1b[0m"
            };

            println!("  {} {} {}", status_icon, kind, entity.name);

            for diag in entity_diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Warning => ("\x1b[33m", "warning"),
                    Severity::Info => ("\x1b[36m", "info"),
                };
                println!("    {}{}\x1b[0m: {}", color, label, diag.message);
            }
        }

        println!();
        if failed {
            println!(
                "\x1b[31m✗ {} entities checked ({} warnings, {} infos)\x1b[0m",
                entities_checked, warnings, infos
            );
        } else if infos > 0 {
            println!(
                "\x1b[32m✓ {} entities checked ({} infos)\x1b[0m",
                entities_checked, infos
            );
        } else {
            println!(
                "\x1b[32m✓ {} entities checked, all clean\x1b[0m",
                entities_checked
            );
        }
    }

    if failed {
        Err(1)
    } else {
        Ok(())
    }
}
