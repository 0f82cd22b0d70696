//! # shape-rs
//!
//! Validate data files against shape definitions and project shapes to
//! JSON Schema.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a document against the User shape
//! shape-rs validate --shape User --input user.json
//!
//! # Accept "42" where an integer is expected
//! shape-rs validate --shape User --input user.json --coerce
//!
//! # Project User to ./schemas/User.schema.json
//! shape-rs project --shape User
//!
//! # Preview the projected document
//! shape-rs project --shape User --dry-run
//!
//! # Check that every reference resolves
//! shape-rs check
//!
//! # Initialize configuration
//! shape-rs init
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use shape_rs_cli::{
    commands::{run_check, run_init, run_project, run_validate},
    config::{CliArgs, Config, ConfigManager, CONFIG_FILENAME},
    error::CliError,
    writer::WriteResult,
};

#[derive(Parser)]
#[command(name = "shape-rs")]
#[command(author, version, about = "Validate data against shapes and project them to JSON Schema", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON or TOML document against a shape
    Validate {
        /// Shape definition file
        #[arg(short, long)]
        shapes: Option<PathBuf>,

        /// Shape identity to validate against
        #[arg(long)]
        shape: String,

        /// Input document
        #[arg(short, long)]
        input: PathBuf,

        /// Coerce representations before type checking
        #[arg(long)]
        coerce: bool,
    },

    /// Project a shape to a JSON Schema document
    Project {
        /// Shape definition file
        #[arg(short, long)]
        shapes: Option<PathBuf>,

        /// Shape identity to project
        #[arg(long)]
        shape: String,

        /// Output file (defaults to <output.dir>/<shape>.schema.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview the document without writing files
        #[arg(long)]
        dry_run: bool,

        /// Key under which referenced shapes are collected
        #[arg(long)]
        definitions_key: Option<String>,

        /// Emit the Draft-7 $schema URI
        #[arg(long)]
        schema_uri: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Check that every shape reference resolves
    Check {
        /// Shape definition file
        #[arg(short, long)]
        shapes: Option<PathBuf>,
    },

    /// Initialize a new shape-rs configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = CONFIG_FILENAME)]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config;

    match cli.command {
        Commands::Validate {
            shapes,
            shape,
            input,
            coerce,
        } => {
            let config = load_config(
                config_path,
                CliArgs {
                    shapes,
                    coerce: coerce.then_some(true),
                    ..Default::default()
                },
            )?;
            cmd_validate(&config, &shape, input)
        }

        Commands::Project {
            shapes,
            shape,
            output,
            dry_run,
            definitions_key,
            schema_uri,
            compact,
        } => {
            let config = load_config(
                config_path,
                CliArgs {
                    shapes,
                    definitions_key,
                    include_schema_uri: schema_uri.then_some(true),
                    pretty: compact.then_some(false),
                    ..Default::default()
                },
            )?;
            cmd_project(&config, &shape, output, dry_run)
        }

        Commands::Check { shapes } => {
            let config = load_config(
                config_path,
                CliArgs {
                    shapes,
                    ..Default::default()
                },
            )?;
            cmd_check(&config)
        }

        Commands::Init { output, force } => cmd_init(output, force),
    }
}

fn load_config(path: Option<PathBuf>, args: CliArgs) -> Result<Config, CliError> {
    let config = ConfigManager::load(path.as_deref())?;
    Ok(ConfigManager::merge_cli_args(config, &args))
}

/// Validate command implementation.
fn cmd_validate(config: &Config, shape: &str, input: PathBuf) -> Result<(), CliError> {
    let validated = run_validate(config, shape, &input)?;
    let json = serde_json::Value::from(validated);

    let rendered = if config.output.pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    }
    .map_err(shape_rs_cli::error::WriteError::from)?;

    eprintln!("{} {} matches {}", "✓".green(), input.display(), shape.cyan());
    println!("{}", rendered);
    Ok(())
}

/// Project command implementation.
fn cmd_project(
    config: &Config,
    shape: &str,
    output: Option<PathBuf>,
    dry_run: bool,
) -> Result<(), CliError> {
    match run_project(config, shape, output.as_deref(), dry_run)? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            print!("{}", content);
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    Ok(())
}

/// Check command implementation.
fn cmd_check(config: &Config) -> Result<(), CliError> {
    println!("{}", "Checking shape references...".cyan());

    let report = run_check(config)?;

    println!(
        "{} {} shape(s), all references resolve",
        "✓".green(),
        report.shapes.to_string().green()
    );
    if let Some(cycle) = report.cycle {
        println!("  Recursive: {}", cycle.join(" -> ").dimmed());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    let result = run_init(&output, force)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        result.path().display()
    );

    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
