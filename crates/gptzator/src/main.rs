//! GPTZator - command-line client for the GPTZator app platform.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{apps, auth, config, projects, threads};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// GPTZator - run platform apps and browse your projects
#[derive(Parser)]
#[command(name = "gptzator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL (overrides the selected context)
    #[arg(long, global = true, env = "GPTZATOR_SERVER_URL")]
    pub server: Option<String>,

    /// Named context from client.yaml
    #[arg(long, global = true)]
    pub context: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, sign out and show the session
    Auth(auth::AuthArgs),

    /// Manage connection contexts
    Config(config::ConfigArgs),

    /// Browse platform apps
    Apps(apps::AppsArgs),

    /// List projects and run apps
    Projects(projects::ProjectsArgs),

    /// Browse chat threads
    Threads(threads::ThreadsArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable, stderr) + rotating JSON file
    let filter = if cli.verbose {
        "gptzator=debug,gptzator_client=debug,gptzator_config=debug,info"
    } else {
        "gptzator=info,gptzator_client=info,warn"
    };

    let log_dir = gptzator_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "gptzator.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "gptzator=trace,gptzator_client=trace,gptzator_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context {
        server_url: cli.server,
        context_name: cli.context,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Auth(args) => auth::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
        Commands::Apps(args) => apps::run(args, &ctx).await,
        Commands::Projects(args) => projects::run(args, &ctx).await,
        Commands::Threads(args) => threads::run(args, &ctx).await,
    }
}
