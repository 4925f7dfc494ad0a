//! Recorded game files and real-time replay.
//!
//! A game file is a JSON array of actions. A manifest is a JSON array of game
//! file paths, relative paths resolved against the manifest's directory.
//!
//! Replay runs one thread per game. Each thread sleeps for the minute gap
//! between consecutive actions (scaled by `pace`) before sending, so several
//! games interleave on the shared channel the way live feeds would.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::Sender;
use tracing::{debug, info};
use types::Action;

/// Read one game file.
pub fn load_game_file(path: &Path) -> anyhow::Result<Vec<Action>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading game file {}", path.display()))?;
    let actions: Vec<Action> = serde_json::from_str(&content)
        .with_context(|| format!("parsing game file {}", path.display()))?;
    debug!(path = %path.display(), actions = actions.len(), "Loaded game file");
    Ok(actions)
}

/// Read a manifest and return the game file paths it lists.
pub fn load_manifest(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading manifest {}", path.display()))?;
    let entries: Vec<PathBuf> = serde_json::from_str(&content)
        .with_context(|| format!("parsing manifest {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(entries
        .into_iter()
        .map(|entry| if entry.is_relative() { base.join(entry) } else { entry })
        .collect())
}

/// Load every game a manifest lists.
pub fn load_games(manifest: &Path) -> anyhow::Result<Vec<Vec<Action>>> {
    load_manifest(manifest)?
        .iter()
        .map(|path| load_game_file(path))
        .collect()
}

/// Replay each game on its own thread. Threads return the number of actions
/// sent and stop early once the receiving side is gone.
pub fn spawn_replay(
    games: Vec<Vec<Action>>,
    pace: Duration,
    tx: Sender<Action>,
) -> Vec<JoinHandle<usize>> {
    info!(games = games.len(), ?pace, "Starting replay");
    games
        .into_iter()
        .map(|actions| {
            let tx = tx.clone();
            thread::spawn(move || replay_game(actions, pace, &tx))
        })
        .collect()
}

fn replay_game(actions: Vec<Action>, pace: Duration, tx: &Sender<Action>) -> usize {
    let Some(first) = actions.first() else {
        return 0;
    };
    let game = first.game_poster.clone();
    let mut clock = first.minute;
    let mut sent = 0;

    for action in actions {
        let gap = action.minute.saturating_sub(clock).max(0) as u32;
        if gap > 0 {
            thread::sleep(pace.saturating_mul(gap));
        }
        clock = clock.max(action.minute);

        if tx.send(action).is_err() {
            debug!(%game, sent, "Receiver gone, stopping replay");
            return sent;
        }
        sent += 1;
    }

    debug!(%game, sent, "Replay finished");
    sent
}
