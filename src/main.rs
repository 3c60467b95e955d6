use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use clipvote::{
    config::Config,
    database::Database,
    errors::AppError,
    models::{ListPairsQuery, PairSort, VideoClip, VoteChoice},
    services::Services,
    sources::YouTubeMetadataProvider,
};

#[derive(Parser)]
#[command(name = "clipvote")]
#[command(version)]
#[command(about = "Submit video clip pairs and vote on whether they look alike")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL", global = true)]
    database_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Submit a new pair of clips
    Submit {
        /// Name shown as the submitter
        #[arg(long)]
        label: String,
        /// First clip as ID[:START[:END]]
        #[arg(long)]
        video_a: VideoClip,
        /// Second clip as ID[:START[:END]]
        #[arg(long)]
        video_b: VideoClip,
    },
    /// Cast or change a vote on a pair
    Vote {
        #[arg(long)]
        pair: Uuid,
        /// Opaque token identifying the voter
        #[arg(long)]
        voter: String,
        /// similar or not_similar
        #[arg(long)]
        choice: VoteChoice,
    },
    /// Show one pair with resolved metadata
    Show {
        #[arg(long)]
        pair: Uuid,
    },
    /// List pairs with resolved metadata
    List {
        /// date or score
        #[arg(long, default_value = "date")]
        sort: PairSort,
        /// Case-insensitive filter on titles and submitter
        #[arg(long)]
        search: Option<String>,
    },
    /// Recompute every pair's counters from its vote records
    RebuildCounters,
    /// Print the effective configuration with secrets redacted
    PrintConfig,
}

/// Exit status for rejected requests (bad input, unknown pair)
const EXIT_CLIENT_ERROR: u8 = 2;
const EXIT_FAILURE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Caller mistakes exit with 2, everything else with 1
fn exit_status(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<AppError>() {
        Some(app_error) if app_error.is_client_error() => EXIT_CLIENT_ERROR,
        _ => EXIT_FAILURE,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let log_filter = format!("clipvote={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load_from_file(&cli.config)?;
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }

    if let Command::PrintConfig = cli.command {
        print!("{}", config.to_redacted_toml()?);
        return Ok(());
    }

    let database = Database::new(&config.database).await?;
    database.migrate().await?;
    info!("Database ready ({})", database.database_type());

    let provider = YouTubeMetadataProvider::new(&config.youtube, config.metadata.provider_timeout)
        .context("Failed to build metadata provider")?;
    // Background warm-up would be cut short when the process exits
    let mut metadata_config = config.metadata.clone();
    metadata_config.warm_up_on_submit = false;
    let services = Services::new(&database, Arc::new(provider), &metadata_config);

    match cli.command {
        Command::Migrate => info!("Migrations applied"),
        Command::Submit {
            label,
            video_a,
            video_b,
        } => {
            let pair_id = services.pairs.submit_pair(&label, video_a, video_b).await?;
            if config.metadata.warm_up_on_submit {
                print_json(&services.pairs.get_pair(pair_id).await?)?;
            } else {
                print_json(&serde_json::json!({ "id": pair_id }))?;
            }
        }
        Command::Vote {
            pair,
            voter,
            choice,
        } => {
            let outcome = services.votes.cast_vote(pair, &voter, choice).await?;
            print_json(&outcome)?;
        }
        Command::Show { pair } => {
            print_json(&services.pairs.get_pair(pair).await?)?;
        }
        Command::List { sort, search } => {
            let mut query = ListPairsQuery::new().sort(sort);
            if let Some(term) = search {
                query = query.search(term);
            }
            print_json(&services.pairs.list_pairs(&query).await?)?;
        }
        Command::RebuildCounters => {
            let repairs = services.votes.rebuild_counters().await?;
            print_json(&repairs)?;
        }
        Command::PrintConfig => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
