use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use baseball_stats::api::format::{rate, two_places, MetricValue};
use baseball_stats::api::state::AppState;
use baseball_stats::calculate::{compare, profile, rank, Metric, Winner};
use baseball_stats::config::AppConfig;
use baseball_stats::describe::{self, AnthropicBackend};
use baseball_stats::ingest;
use baseball_stats::models::{CareerStats, PlayerId};
use baseball_stats::storage::{PlayerStore, StorageConfig};

#[derive(Parser)]
#[command(name = "baseball-stats")]
#[command(about = "Career baseball statistics: derived metrics, leaderboards and comparisons")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import players from a JSON feed
    Import {
        /// Read the feed from a local file
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,

        /// Fetch the feed from a URL (defaults to import.source_url)
        #[arg(long)]
        url: Option<String>,

        /// Remove all existing players first
        #[arg(long)]
        clear: bool,

        /// Parse the feed but don't store anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a leaderboard
    Leaderboard {
        /// Metric to rank by
        #[arg(long, default_value = "home_runs")]
        stat: String,

        /// Number of players to show
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<i64>,
    },

    /// Print one player's career line
    Show {
        /// Player id
        id: PlayerId,
    },

    /// Compare two players head to head
    Compare { player1: PlayerId, player2: PlayerId },

    /// Generate descriptions for players that have none
    Describe,
}

fn format_metric(metric: Metric, value: f64) -> String {
    MetricValue::of(metric, value).to_string()
}

async fn run_import(
    store: &PlayerStore,
    config: &AppConfig,
    file: Option<PathBuf>,
    url: Option<String>,
    clear: bool,
    dry_run: bool,
) -> Result<()> {
    let doc = match (file, url.or_else(|| config.import.source_url.clone())) {
        (Some(path), _) => {
            tracing::info!("Reading player feed from {:?}", path);
            ingest::read_feed_file(&path).with_context(|| format!("reading {:?}", path))?
        }
        (None, Some(url)) => {
            let timeout = Duration::from_secs(config.import.timeout_seconds);
            ingest::fetch_feed(&url, timeout).await?
        }
        (None, None) => bail!("Specify --file or --url (or set import.source_url)"),
    };

    if dry_run {
        let parsed = ingest::parse_feed(&doc)?;
        println!("\n=== Import Preview ===");
        println!("Readable:         {}", parsed.players.len());
        println!("Skipped:          {}", parsed.skipped);
        println!("Failed:           {}", parsed.failed);
        println!("\n(dry run - no data written to disk)");
        return Ok(());
    }

    let report = ingest::import_feed(store, &doc, clear).await?;
    println!("\n=== Import Results ===");
    if clear {
        println!("Cleared:          {}", report.cleared);
    }
    println!("Created:          {}", report.created);
    println!("Updated:          {}", report.updated);
    println!("Skipped:          {}", report.skipped);
    println!("Failed:           {}", report.failed);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting baseball-stats v{}", env!("CARGO_PKG_VERSION"));

    let store = PlayerStore::open(&StorageConfig::new(config.data_dir.clone()))?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let app = baseball_stats::api::build_router(AppState::new(store, config));
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}/api", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Import {
            file,
            url,
            clear,
            dry_run,
        } => {
            run_import(&store, &config, file, url, clear, dry_run).await?;
        }
        Commands::Leaderboard { stat, limit } => {
            let limit = limit.unwrap_or(config.api.default_leaderboard_limit);
            let players = store.list().await;
            let board = rank(&players, &stat, limit, |p| CareerStats::from_raw(p.stats))?;
            let metric = board.metric;

            println!("\n=== Leaderboard: {} ===", metric);
            for entry in board.entries {
                println!(
                    "{:>3}. {:<28} {:>10}",
                    entry.rank,
                    entry.item.to_string(),
                    format_metric(metric, entry.value)
                );
            }
        }
        Commands::Show { id } => {
            let Some(player) = store.get(id).await else {
                bail!("Player not found: {}", id);
            };
            let stats = CareerStats::from_raw(player.stats);
            let raw = &stats.raw;
            let d = &stats.derived;

            println!("\n=== {} ===", player);
            if let Some(description) = &player.description {
                println!("{}\n", description);
            }
            println!(
                "G {}  AB {}  R {}  H {}  2B {}  3B {}  HR {}  RBI {}",
                raw.games,
                raw.at_bats,
                raw.runs,
                raw.hits,
                raw.doubles,
                raw.triples,
                raw.home_runs,
                raw.rbis
            );
            println!(
                "BB {}  SO {}  SB {}  CS {}",
                raw.walks, raw.strikeouts, raw.stolen_bases, raw.caught_stealing
            );
            println!(
                "AVG {}  OBP {}  SLG {}  OPS {}",
                rate(d.batting_avg),
                rate(d.on_base_pct),
                rate(d.slugging_pct),
                rate(d.ops)
            );
            println!(
                "ISO {}  BB/K {}  SB% {}  HR/AB {}  PSN {}",
                rate(d.isolated_power),
                rate(d.walk_to_strikeout_ratio),
                rate(d.stolen_base_pct),
                rate(d.home_run_rate),
                two_places(d.power_speed_number)
            );

            let labels: Vec<&str> = profile(&stats)
                .classifications
                .iter()
                .map(|c| c.label())
                .collect();
            if !labels.is_empty() {
                println!("Profile: {}", labels.join(", "));
            }
        }
        Commands::Compare { player1, player2 } => {
            let (Some(a), Some(b)) = (store.get(player1).await, store.get(player2).await) else {
                bail!("Both players must exist ({} and {})", player1, player2);
            };
            let comparison = compare(
                &CareerStats::from_raw(a.stats),
                &CareerStats::from_raw(b.stats),
            );

            println!("\n=== {} vs {} ===", a.name, b.name);
            for result in comparison.iter() {
                let winner = match result.winner {
                    Winner::Player1 => a.name.as_str(),
                    Winner::Player2 => b.name.as_str(),
                    Winner::Tie => "tie",
                };
                println!(
                    "{:<22} {:>10} {:>10}   {}",
                    result.metric.comparison_key(),
                    format_metric(result.metric, result.player1),
                    format_metric(result.metric, result.player2),
                    winner
                );
            }
            let (wins1, wins2, ties) = comparison.tally();
            println!("\n{} {} - {} {} ({} tied)", a.name, wins1, wins2, b.name, ties);
        }
        Commands::Describe => {
            let backend = AnthropicBackend::from_config(&config.describe)?;
            let report = describe::describe_missing(
                &store,
                &backend,
                config.describe.max_tokens,
                Duration::from_millis(config.describe.delay_ms),
            )
            .await?;

            println!("\n=== Describe Results ===");
            println!("Described:        {}", report.described);
            println!("Failed:           {}", report.failed);
        }
    }

    Ok(())
}
