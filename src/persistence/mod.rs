//! Leaderboard and progress persistence
//!
//! The simulation never talks to platform storage directly; hosts inject a
//! [`ScoreStore`]. Writes are fire-and-forget: a store that drops them only
//! costs the player their leaderboard, never the run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Host-side storage for the score list and the best-wave watermark
/// (the watermark drives theme unlocks in the shipped app).
pub trait ScoreStore {
    fn load_top_scores(&self) -> Vec<u64>;
    fn save_top_scores(&mut self, scores: &[u64]);
    fn best_wave_reached(&self) -> u32;
    fn set_best_wave_reached(&mut self, wave: u32);
}

/// In-memory store for tests and hosts without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: Vec<u64>,
    best_wave: u32,
}

impl ScoreStore for MemoryStore {
    fn load_top_scores(&self) -> Vec<u64> {
        self.scores.clone()
    }

    fn save_top_scores(&mut self, scores: &[u64]) {
        self.scores = scores.to_vec();
    }

    fn best_wave_reached(&self) -> u32 {
        self.best_wave
    }

    fn set_best_wave_reached(&mut self, wave: u32) {
        self.best_wave = wave;
    }
}

/// On-disk JSON envelope written by [`FileStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredProgress {
    scores: Vec<u64>,
    best_wave: u32,
}

/// JSON-file store for native hosts. Each write rewrites the whole file;
/// read/parse failures fall back to empty state with a log line.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cached: StoredProgress,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(progress) => progress,
                Err(err) => {
                    log::warn!("ignoring corrupt progress file {path:?}: {err}");
                    StoredProgress::default()
                }
            },
            Err(_) => StoredProgress::default(),
        };
        Self { path, cached }
    }

    fn flush(&self) {
        match serde_json::to_string(&self.cached) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    log::warn!("failed to write progress file {:?}: {err}", self.path);
                }
            }
            Err(err) => log::warn!("failed to encode progress: {err}"),
        }
    }
}

impl ScoreStore for FileStore {
    fn load_top_scores(&self) -> Vec<u64> {
        self.cached.scores.clone()
    }

    fn save_top_scores(&mut self, scores: &[u64]) {
        self.cached.scores = scores.to_vec();
        self.flush();
    }

    fn best_wave_reached(&self) -> u32 {
        self.cached.best_wave
    }

    fn set_best_wave_reached(&mut self, wave: u32) {
        self.cached.best_wave = wave;
        self.flush();
    }
}
