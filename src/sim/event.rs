//! Engine-to-host event stream
//!
//! The engine is silent about *how* anything looks or sounds; it narrates
//! *what happened* through these events, in a fixed order the HUD relies on.
//! Hosts drain the queue once per frame via [`super::GameEngine::drain_events`].

use glam::Vec2;

use super::engine::GamePhase;
use super::smudge::{Smudge, SmudgeId, SmudgeReward};

/// Everything the simulation can tell the outside world.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged(GamePhase),
    ScoreChanged(u64),
    LivesChanged(u32),
    WaveStarted(u32),
    /// Carries a snapshot so the view can build its node without a query
    SmudgeSpawned(Smudge),
    SmudgeRevealed {
        id: SmudgeId,
        reward: SmudgeReward,
        points: u64,
    },
    /// Neutral wave-rollover expiry
    SmudgeExpired(SmudgeId),
    /// A gold smudge ran out its strict lifetime (a miss, not a rollover)
    GoldExpired(SmudgeId),
    ComboChanged {
        multiplier: u32,
    },
    StreakChanged(u32),
    FreezeActivated,
    FreezeEnded,
    /// Position of the bomb, for the life-lost effect
    LifeLost(Vec2),
    WaveDelayBonus,
    ChainProgress {
        group: u32,
        index: u32,
    },
    ChainCompleted {
        bonus: u64,
    },
    ChainBroken,
    BossSpawned,
    BossDefeated {
        bonus: u64,
    },
    ExtraLife,
    GameOver {
        score: u64,
        wave: u32,
        cleared: u32,
        best_streak: u32,
        is_new_highscore: bool,
    },
}

/// Outcome of one rub action, returned to the input layer so it can spawn
/// particles at the touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubResult {
    pub smudge_id: SmudgeId,
    pub was_revealed: bool,
    pub progress: f32,
    pub touch_point: Vec2,
}
