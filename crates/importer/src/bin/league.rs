use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use importer::sources::iracing::DEFAULT_BASE_URL;
use importer::{
    CsvPenaltyImporter, Credentials, IRacingClient, ImportContext, PenaltyImporter, apply_import,
};
use storage::models::PointsPreset;
use storage::services::championship::{
    ChampionshipRequest, LeagueDataSource, compute_championship,
};
use storage::{Database, Stores};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "league")]
#[command(about = "League championship standings and penalty tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Postgres connection string; in-memory stores are used when absent.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "IRACING_EMAIL")]
    iracing_email: Option<String>,

    #[arg(long, env = "IRACING_PASSWORD", hide_env_values = true)]
    iracing_password: Option<String>,

    #[arg(long, env = "IRACING_BASE_URL", default_value = DEFAULT_BASE_URL)]
    iracing_base_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print championship standings as JSON.
    Standings {
        #[arg(long)]
        league_id: i64,

        #[arg(long)]
        season_id: i64,

        #[arg(long)]
        division: Option<String>,

        #[arg(long)]
        cached: bool,
    },
    Penalties {
        #[command(subcommand)]
        command: PenaltyCommands,
    },
    PointsConfig {
        #[command(subcommand)]
        command: PointsConfigCommands,
    },
}

#[derive(Subcommand)]
enum PenaltyCommands {
    /// Import penalties from a steward decisions CSV.
    Import {
        #[arg(long)]
        league_id: i64,

        #[arg(long)]
        season_id: i64,

        #[arg(long)]
        file: PathBuf,

        /// Match rows and print the report without saving anything.
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum PointsConfigCommands {
    /// List the built-in scoring presets.
    Presets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("league={log_level},importer={log_level},storage={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &cli.command {
        Commands::Standings {
            league_id,
            season_id,
            division,
            cached,
        } => {
            let stores = open_stores(cli.database_url.as_deref()).await?;
            let client = racing_client(&cli)?;
            let request = ChampionshipRequest::new(*league_id, *season_id)
                .with_division(division.clone())
                .with_cached(*cached);

            let standings = compute_championship(&client, &stores, &request)
                .await
                .context("Failed to calculate championship standings")?;
            println!("{}", serde_json::to_string_pretty(&standings)?);
        }
        Commands::Penalties {
            command:
                PenaltyCommands::Import {
                    league_id,
                    season_id,
                    file,
                    dry_run,
                },
        } => {
            handle_penalty_import(&cli, *league_id, *season_id, file, *dry_run).await?;
        }
        Commands::PointsConfig {
            command: PointsConfigCommands::Presets,
        } => {
            println!("{}", serde_json::to_string_pretty(&PointsPreset::catalog())?);
        }
    }

    Ok(())
}

async fn open_stores(database_url: Option<&str>) -> anyhow::Result<Stores> {
    let Some(url) = database_url else {
        tracing::warn!("DATABASE_URL not set, using in-memory stores");
        return Ok(Stores::in_memory());
    };

    tracing::info!("Connecting to database...");
    let db = Database::new(url)
        .await
        .context("Failed to connect to database")?;
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;

    Ok(Stores::postgres(&db))
}

fn racing_client(cli: &Cli) -> anyhow::Result<IRacingClient> {
    let credentials = match (&cli.iracing_email, &cli.iracing_password) {
        (Some(email), Some(password)) => Some(Credentials::new(email, password)),
        _ => {
            tracing::warn!("IRACING_EMAIL or IRACING_PASSWORD not set, requests are unauthenticated");
            None
        }
    };

    IRacingClient::new(&cli.iracing_base_url, credentials).context("Failed to build HTTP client")
}

async fn handle_penalty_import(
    cli: &Cli,
    league_id: i64,
    season_id: i64,
    file: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    tracing::info!("Loading penalties from: {}", file.display());
    let input = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let client = racing_client(cli)?;
    let sessions = client
        .fetch_sessions(league_id, season_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch season sessions: {e}"))?;
    let roster = client
        .fetch_roster(league_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to fetch league roster: {e}"))?;

    let context = ImportContext {
        league_id,
        season_id,
        sessions,
        roster,
    };
    let importer = CsvPenaltyImporter::new();
    let import = importer
        .import(&input, &context)
        .await
        .with_context(|| format!("{} import failed", importer.name()))?;

    if dry_run {
        tracing::info!("Dry run, nothing saved");
    } else {
        let stores = open_stores(cli.database_url.as_deref()).await?;
        apply_import(&stores, league_id, season_id, &import).await?;
    }

    println!("{}", serde_json::to_string_pretty(&import)?);
    Ok(())
}
