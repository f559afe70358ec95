use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Kind, SourceArgs, ViewArgs};

#[derive(Parser)]
#[command(name = "ecco-view")]
#[command(about = "Filter, sort and summarize ECCO outreach dashboard lists", long_about = None)]
struct Cli {
    /// Backend base URL; overrides ECCO_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filtered, sorted list as JSON.
    List {
        kind: Kind,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Print summary statistics as JSON.
    Stats {
        kind: Kind,
        #[command(flatten)]
        source: SourceArgs,
        /// Days after sending before a message without reply needs a follow-up.
        #[arg(long, env = "ECCO_FOLLOW_UP_DAYS", default_value_t = ecco_view_core::constants::FOLLOW_UP_THRESHOLD_DAYS)]
        follow_up_days: i64,
    },
    /// Write the filtered, sorted list as CSV.
    Export {
        kind: Kind,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Delete one or more records through the API.
    Delete {
        kind: Kind,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Move a record to a new workflow status through the API.
    SetStatus { kind: Kind, id: String, status: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::new(cli.api_url)?;

    let result = match cli.command {
        Commands::List { kind, source, view } => commands::list::run_list(&ctx, kind, &source, &view).await,
        Commands::Stats { kind, source, follow_up_days } => {
            commands::stats::run_stats(&ctx, kind, &source, follow_up_days).await
        },
        Commands::Export { kind, output, source, view } => {
            commands::list::run_export(&ctx, kind, &source, &view, &output).await
        },
        Commands::Delete { kind, ids } => commands::mutate::run_delete(&ctx, kind, &ids).await,
        Commands::SetStatus { kind, id, status } => commands::mutate::run_set_status(&ctx, kind, &id, &status).await,
    };
    ctx.flush_notices();
    result
}
