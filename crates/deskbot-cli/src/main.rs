use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "deskbot")]
#[command(about = "Deskbot CLI - IT support assistant chat", long_about = None)]
struct Cli {
    /// Data directory holding state.json and config.toml (default: ~/.deskbot)
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive support chat
    Chat {
        /// Disable the simulated collaborator latency
        #[arg(long)]
        no_delay: bool,
    },
    /// Show the knowledge index status
    Status {
        /// Refresh one space before showing the status
        #[arg(long, value_name = "SPACE")]
        reindex: Option<String>,
    },
    /// Show the escalation retry queue
    Queue {
        /// Retry the queued escalations now
        #[arg(long)]
        drain: bool,
    },
    /// Print recent analytics events as JSON lines
    Events {
        /// Number of events to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    // Only the interactive chat wants the demo latency.
    let no_delay = match &cli.command {
        Commands::Chat { no_delay } => *no_delay,
        _ => true,
    };
    let context = commands::AppContext::bootstrap(cli.data_dir, no_delay).await?;

    match cli.command {
        Commands::Chat { .. } => commands::chat::run(&context).await?,
        Commands::Status { reindex } => commands::status::run(&context, reindex.as_deref()).await?,
        Commands::Queue { drain } => commands::queue::run(&context, drain).await?,
        Commands::Events { limit } => commands::events::run(&context, limit).await?,
    }

    Ok(())
}

fn init_tracing() {
    // Logs go to stderr so they never interleave with the chat output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
