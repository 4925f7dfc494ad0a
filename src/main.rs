//! live-score - real-time basketball scores with durable action storage
//!
//! ```text
//! replay threads ──▶ crossbeam channel ──▶ pipeline thread ──▶ SqliteSink
//!                                               │
//!                                               ▼
//!                          Arc<ScoreCache> ◀── sweeper task
//!                                               ▲
//!                                               │
//!                                        axum handlers (tokio)
//! ```

mod config;
mod replay;
mod simulate;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use crossbeam_channel::bounded;
use pipeline::{ChannelSource, Pipeline, PipelineStats};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scoreboard::{ScoreCache, Sweeper, TouchPolicy};
use server::{ServerConfig, ServerState, create_app};
use storage::{PlayerStatistics, SqliteSink};
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use types::{Action, DEFAULT_SEPARATOR, Minute};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "live-score")]
#[command(about = "Aggregate live basketball scores and persist every action")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay games through the pipeline and serve live scores over HTTP
    Serve(ServeArgs),
    /// Write synthetic game files and a manifest
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "games")]
        out_dir: PathBuf,

        /// Game length in minutes
        #[arg(long, default_value_t = simulate::DEFAULT_MAX_MINUTE)]
        minutes: Minute,

        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Separator between team names in the game poster
        #[arg(long, env = "LIVE_SCORE_SEPARATOR", default_value_t = DEFAULT_SEPARATOR)]
        separator: char,
    },
    /// Print stored player statistics or a game's action history
    Stats {
        /// Path to the SQLite database
        #[arg(short, long, env = "LIVE_SCORE_DB", default_value = "live-score.db")]
        db: String,

        /// Only this player
        #[arg(long, conflicts_with = "game")]
        player: Option<String>,

        /// Print this game's action history instead
        #[arg(long)]
        game: Option<String>,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Manifest of recorded game files (synthetic games when omitted)
    #[arg(short, long, env = "LIVE_SCORE_MANIFEST")]
    manifest: Option<PathBuf>,

    /// Idle time before a game is evicted, in milliseconds
    #[arg(long, env = "LIVE_SCORE_TTL_MS", default_value_t = 60_000)]
    ttl_ms: u64,

    /// Sweep interval in milliseconds (default: half the TTL)
    #[arg(long, env = "LIVE_SCORE_SWEEP_MS")]
    sweep_ms: Option<u64>,

    /// Separator between team names in the game poster
    #[arg(long, env = "LIVE_SCORE_SEPARATOR", default_value_t = DEFAULT_SEPARATOR)]
    separator: char,

    /// Only writes keep a game alive (score reads do not)
    #[arg(long, env = "LIVE_SCORE_WRITE_ONLY_TOUCH")]
    write_only_touch: bool,

    /// Path to the SQLite database (`:memory:` for in-memory)
    #[arg(short, long, env = "LIVE_SCORE_DB", default_value = "live-score.db")]
    db: String,

    /// Real time per game minute during replay, in milliseconds
    #[arg(long, env = "LIVE_SCORE_PACE_MS", default_value_t = 500)]
    pace_ms: u64,

    /// Total sink attempts per action
    #[arg(long, env = "LIVE_SCORE_RETRY_ATTEMPTS", default_value_t = 5)]
    retry_attempts: u32,

    /// Default gap between SSE snapshots, in milliseconds
    #[arg(long, env = "LIVE_SCORE_STREAM_MS", default_value_t = 1000)]
    stream_ms: u64,

    /// Host to bind to (overrides LIVE_SCORE_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides LIVE_SCORE_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// RNG seed for synthetic games
    #[arg(long)]
    seed: Option<u64>,
}

impl ServeArgs {
    fn to_config(&self) -> AppConfig {
        let mut server = ServerConfig::from_env();
        if let Some(host) = &self.host {
            server.host = host.clone();
        }
        if let Some(port) = self.port {
            server.port = port;
        }

        let touch_policy = if self.write_only_touch {
            TouchPolicy::WriteOnly
        } else {
            TouchPolicy::ReadAndWrite
        };

        let mut config = AppConfig::new()
            .ttl(Duration::from_millis(self.ttl_ms))
            .separator(self.separator)
            .touch_policy(touch_policy)
            .db_path(self.db.as_str())
            .retry_attempts(self.retry_attempts)
            .pace(Duration::from_millis(self.pace_ms))
            .stream_interval(Duration::from_millis(self.stream_ms.max(1)))
            .server(server);
        if let Some(ms) = self.sweep_ms {
            config = config.sweep_interval(Duration::from_millis(ms.max(1)));
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = args.to_config();
            let games = match &args.manifest {
                Some(manifest) => replay::load_games(manifest)?,
                None => synthetic_games(config.separator, simulate::DEFAULT_MAX_MINUTE, args.seed),
            };
            serve(config, games).await?;
        }
        Commands::Generate {
            out_dir,
            minutes,
            seed,
            separator,
        } => generate(&out_dir, minutes, seed, separator)?,
        Commands::Stats { db, player, game } => stats(&db, player.as_deref(), game.as_deref())?,
    }

    Ok(())
}

// ============================================================================
// serve
// ============================================================================

async fn serve(config: AppConfig, games: Vec<Vec<Action>>) -> anyhow::Result<()> {
    info!(
        ttl = ?config.ttl,
        sweep = ?config.effective_sweep_interval(),
        db = %config.db_path,
        games = games.len(),
        "Starting live-score"
    );

    let cache = Arc::new(ScoreCache::new(config.cache_config()));
    let stats = Arc::new(PipelineStats::new());
    let sink = SqliteSink::new(config.storage_config())
        .with_context(|| format!("opening database {}", config.db_path))?;

    // Ingest: replay threads → channel → pipeline thread
    let (action_tx, action_rx) = bounded(config.channel_capacity);
    let (stop_tx, stop_rx) = bounded::<()>(1);
    let _replayers = replay::spawn_replay(games, config.pace, action_tx);

    let source = ChannelSource::new(action_rx).with_shutdown(stop_rx);
    let mut pipeline = Pipeline::new(Arc::clone(&cache), source, sink)
        .retry_policy(config.retry_policy())
        .with_stats(Arc::clone(&stats));
    let (failed_tx, failed_rx) = oneshot::channel();
    let pipeline_handle = thread::Builder::new()
        .name("pipeline".into())
        .spawn(move || {
            let outcome = pipeline.run();
            if outcome.is_err() {
                let _ = failed_tx.send(());
            }
            outcome
        })
        .context("spawning pipeline thread")?;

    let sweeper = Sweeper::new(Arc::clone(&cache))
        .interval(config.effective_sweep_interval())
        .spawn();

    // Readers
    let state = ServerState::new(cache, stats).with_stream_interval(config.stream_interval);
    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal(failed_rx))
        .await
        .context("HTTP server failed")?;

    // Shutdown: pipeline first so no new writes race the final sweep
    info!("Shutting down");
    let _ = stop_tx.send(());
    let outcome = pipeline_handle.join();
    let passes = sweeper.stop().await;
    info!(passes, "Sweeper stopped");

    match outcome {
        Ok(Ok(report)) => {
            info!(
                received = report.received,
                persisted = report.persisted,
                retries = report.retries,
                "Pipeline drained"
            );
            Ok(())
        }
        Ok(Err(e)) => Err(e).context("pipeline stopped on a sink failure"),
        Err(_) => bail!("pipeline thread panicked"),
    }
}

/// Resolves on Ctrl+C, or once the pipeline stops on a sink failure.
async fn shutdown_signal(pipeline_failed: oneshot::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let failed = async {
        // Sender dropped: the pipeline drained cleanly, keep serving
        if pipeline_failed.await.is_err() {
            std::future::pending::<()>().await;
        }
        error!("Pipeline can no longer persist actions, shutting down");
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = failed => {}
    }
}

fn synthetic_games(separator: char, minutes: Minute, seed: Option<u64>) -> Vec<Vec<Action>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    simulate::default_matchups()
        .iter()
        .map(|(a, b)| simulate::play_game(a, b, separator, minutes, &mut rng))
        .collect()
}

// ============================================================================
// generate
// ============================================================================

fn generate(out_dir: &Path, minutes: Minute, seed: Option<u64>, separator: char) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut files = Vec::new();
    let matchups = simulate::default_matchups();
    for ((a, b), actions) in matchups.iter().zip(synthetic_games(separator, minutes, seed)) {
        let file = format!("{}.json", simulate::poster(a, b, separator));
        let path = out_dir.join(&file);
        fs::write(&path, serde_json::to_string_pretty(&actions)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {} ({} actions)", path.display(), actions.len());
        files.push(file);
    }

    let manifest = out_dir.join("manifest.json");
    fs::write(&manifest, serde_json::to_string_pretty(&files)?)
        .with_context(|| format!("writing {}", manifest.display()))?;
    info!("Wrote {}", manifest.display());
    Ok(())
}

// ============================================================================
// stats
// ============================================================================

fn stats(db: &str, player: Option<&str>, game: Option<&str>) -> anyhow::Result<()> {
    if db != ":memory:" && !Path::new(db).exists() {
        bail!("database {db} does not exist");
    }
    let sink = SqliteSink::from_path(db).with_context(|| format!("opening database {db}"))?;

    if let Some(game) = game {
        let history = sink.game_history(game)?;
        if history.is_empty() {
            warn!("No actions stored for game {}", game);
        }
        for action in history {
            println!("{action}");
        }
        return Ok(());
    }

    let rows = match player {
        Some(name) => match sink.player_stats(name)? {
            Some(stats) => vec![stats],
            None => bail!("no statistics for player '{name}'"),
        },
        None => {
            println!("Games: {}", sink.game_names()?.join(", "));
            sink.all_player_stats()?
        }
    };
    print_player_table(&rows);
    Ok(())
}

fn print_player_table(rows: &[PlayerStatistics]) {
    println!(
        "{:<24} {:>7} {:>7} {:>7} {:>7} {:>4}",
        "Player", "2PT", "3PT", "FT", "Points", "PF"
    );
    for s in rows {
        println!(
            "{:<24} {:>7} {:>7} {:>7} {:>7} {:>4}",
            s.player_name,
            format!("{}/{}", s.two_point_success, s.two_point_try),
            format!("{}/{}", s.three_point_success, s.three_point_try),
            format!("{}/{}", s.free_throw_success, s.free_throw_try),
            s.points(),
            s.foul
        );
    }
}
