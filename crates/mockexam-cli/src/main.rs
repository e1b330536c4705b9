//! mockexam CLI: timed practice exams in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mockexam", version, about = "Timed practice exams for medical entrance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a timed practice session
    Run {
        /// Subject to practice (physics, chemistry, botany, zoology)
        #[arg(long)]
        subject: String,

        /// Number of questions (default from config)
        #[arg(long)]
        count: Option<usize>,

        /// Only draw questions from this year
        #[arg(long)]
        year: Option<String>,

        /// Session length in seconds (default from config)
        #[arg(long)]
        duration: Option<u64>,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Keep bank order instead of shuffling
        #[arg(long)]
        no_shuffle: bool,

        /// Question bank directory
        #[arg(long)]
        bank_dir: Option<PathBuf>,

        /// Output directory for reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report formats: json, html, all, none
        #[arg(long, default_value = "json")]
        format: String,

        /// Record stats under this user
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List subjects available in the bank directory
    Subjects {
        /// Question bank directory
        #[arg(long)]
        bank_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show cumulative practice stats
    Stats {
        /// User to show (default from config)
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,mockexam=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            subject,
            count,
            year,
            duration,
            seed,
            no_shuffle,
            bank_dir,
            output,
            format,
            user,
            config,
        } => {
            commands::run::execute(commands::run::RunArgs {
                subject,
                count,
                year,
                duration,
                seed,
                no_shuffle,
                bank_dir,
                output,
                format,
                user,
                config,
            })
            .await
        }
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Subjects { bank_dir, config } => commands::subjects::execute(bank_dir, config),
        Commands::Stats { user, config } => commands::stats::execute(user, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
