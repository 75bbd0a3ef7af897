use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use peer_score::assessment::load_assessment;
use peer_score::config::{load_config, write_default_config, Config};
use peer_score::logging::{init_tracing, TracingObserver};
use peer_score::output::{render, should_use_colors, write_output, OutputFormat};
use peer_score::report::{run_qass, run_webavalia, Report};
use peer_score::scoring::{validate_qass_params, validate_webavalia_params, ScoringError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_SCORING: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug)]
struct RunArgs {
    /// Assessment file (YAML or JSON)
    file: PathBuf,

    /// Output format (defaults to the config file setting, then table)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a group with the QASS contribution model
    Qass(RunArgs),
    /// Score a group with the Webavalia self/peer average model
    Webavalia(RunArgs),
    /// Write a config file with the default parameters
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "peer-score")]
#[command(about = "Per-member scores from a group grade and peer ratings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging (shows intermediate values)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level filter (e.g. "debug", "peer_score=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to config file (defaults to ~/.config/peer-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let config_path = cli.config;

    let (args, webavalia) = match cli.command {
        Commands::Init { force } => match write_default_config(config_path.clone(), force) {
            Ok(path) => {
                println!("Config written to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Qass(args) => (args, false),
        Commands::Webavalia(args) => (args, true),
    };

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate configured defaults at startup
    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let assessment = match load_assessment(&args.file) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let result = if webavalia {
        run_webavalia(&assessment, &config)
    } else {
        run_qass(&assessment, &config, &mut TracingObserver)
    };

    let report = match result {
        Ok(r) => r,
        Err(e) => {
            let code = if e.downcast_ref::<ScoringError>().is_some() {
                EXIT_SCORING
            } else {
                EXIT_INPUT
            };
            eprintln!("Scoring failed: {:#}", e);
            std::process::exit(code);
        }
    };

    let format = args.format.or(config.format).unwrap_or_default();
    std::process::exit(emit(&report, format, args.output.as_deref()));
}

fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if let Some(settings) = &config.qass {
        if let Err(e) = validate_qass_params(&settings.apply(Default::default())) {
            errors.extend(e);
        }
    }
    if let Some(settings) = &config.webavalia {
        if let Err(e) = validate_webavalia_params(&settings.apply(Default::default())) {
            errors.extend(e);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Render and print or save the report, returning the exit code.
fn emit(report: &Report, format: OutputFormat, output: Option<&std::path::Path>) -> i32 {
    let use_colors = output.is_none() && should_use_colors();
    let rendered = match render(report, format, use_colors) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Output error: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = write_output(path, &rendered) {
                eprintln!("Output error: {:#}", e);
                return EXIT_FAILURE;
            }
            tracing::info!(path = %path.display(), students = report.students.len(), "wrote scores");
        }
        None => println!("{}", rendered),
    }

    EXIT_SUCCESS
}
