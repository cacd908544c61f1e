//! studytrack CLI: score mock tests and report study analytics.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "studytrack",
    version,
    about = "Mock-test scoring and study analytics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an answer sheet against a mock test
    Score {
        /// Path to the .toml test definition
        #[arg(long)]
        test: PathBuf,

        /// Path to the .toml answer sheet
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Aggregate study plans and test history into analytics
    Analyze {
        /// Study plans JSON (default: <data_dir>/study_plans.json)
        #[arg(long)]
        plans: Option<PathBuf>,

        /// Mock tests JSON, most recent first (default: <data_dir>/mock_tests.json)
        #[arg(long)]
        tests: Option<PathBuf>,

        /// Anchor instant for the monthly window, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,

        /// History window: all, 6months, 3months, 1month
        #[arg(long, default_value = "all")]
        period: String,

        /// Output format: text, json, markdown, html, all (comma-separated)
        #[arg(long)]
        format: Option<String>,

        /// Output directory for saved reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the dashboard summary
    Dashboard {
        /// Study plans JSON (default: <data_dir>/study_plans.json)
        #[arg(long)]
        plans: Option<PathBuf>,

        /// Mock tests JSON, most recent first (default: <data_dir>/mock_tests.json)
        #[arg(long)]
        tests: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate mock test TOML files
    Validate {
        /// Path to test file or directory
        #[arg(long)]
        test: PathBuf,
    },

    /// Create starter config and a sample mock test
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("studytrack=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            test,
            answers,
            format,
        } => commands::score::execute(test, answers, format),
        Commands::Analyze {
            plans,
            tests,
            now,
            period,
            format,
            output,
            config,
        } => commands::analyze::execute(plans, tests, now, period, format, output, config),
        Commands::Dashboard {
            plans,
            tests,
            format,
            config,
        } => commands::dashboard::execute(plans, tests, format, config),
        Commands::Validate { test } => commands::validate::execute(test),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
