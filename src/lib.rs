//! Smudge Rush - simulation core of a touch-driven rub-to-reveal arcade game
//!
//! Players rub away dirt smudges to uncover rewards, clearing escalating
//! waves with combo scoring, bomb hazards, chain groups and boss smudges.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, scoring, game state)
//! - `config`: Data-driven game balance
//! - `highscores`: Top-N leaderboard
//! - `persistence`: Storage abstraction for scores and progress
//!
//! Rendering, sound and input capture are host concerns: the host feeds
//! touch points and a monotonic clock in, and drains typed [`sim::GameEvent`]s
//! out.

pub mod config;
pub mod highscores;
pub mod persistence;
pub mod sim;

pub use config::GameConfig;
pub use highscores::Leaderboard;
pub use sim::{
    GameEngine, GameEvent, GamePhase, RubResult, Smudge, SmudgeBehavior, SmudgeId, SmudgeReward,
};

/// Game constants that are part of the rules rather than tunable balance
pub mod consts {
    /// Default play-area size (points, portrait phone)
    pub const DEFAULT_SCENE_WIDTH: f32 = 390.0;
    pub const DEFAULT_SCENE_HEIGHT: f32 = 844.0;

    /// Pixels to clear for a standard smudge (boss uses its own config value)
    pub const SMUDGE_TOTAL_PIXELS: u32 = 100;

    /// Radius range for regular smudges
    pub const SMUDGE_RADIUS_MIN: f32 = 30.0;
    pub const SMUDGE_RADIUS_MAX: f32 = 55.0;
    /// Gold and chain smudges roll from a tighter range
    pub const SMALL_SMUDGE_RADIUS_MAX: f32 = 45.0;

    /// Placement margins (side edges; the vertical bands leave room for the HUD)
    pub const SPAWN_MARGIN_SIDE: f32 = 20.0;
    pub const SPAWN_MARGIN_LOW: f32 = 140.0;
    pub const SPAWN_MARGIN_HIGH: f32 = 120.0;
    /// Minimum center separation between smudges, as a multiple of radius
    pub const MIN_SEPARATION_FACTOR: f32 = 2.5;
    /// Rejection-sampling attempts before accepting an overlapping position
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 20;

    /// Rub effectiveness: pixels cleared per unit intensity
    pub const RUB_PIXELS_PER_INTENSITY: f32 = 3.0;
    /// Extra effectiveness when rubbing dead-center (up to +50%)
    pub const RUB_CENTER_BONUS: f32 = 0.5;
    /// Intensity derived from touch-move distance is clamped here
    pub const RUB_MAX_INTENSITY: f32 = 3.0;

    /// Moving-smudge drift: amplitude (points) and frequency (rad/s) per axis
    pub const DRIFT_AMPLITUDE_X: f32 = 25.0;
    pub const DRIFT_AMPLITUDE_Y: f32 = 20.0;
    pub const DRIFT_FREQUENCY_X: f32 = 0.8;
    pub const DRIFT_FREQUENCY_Y: f32 = 0.6;

    /// Growing-smudge scale: linear rate per second, capped
    pub const GROWTH_RATE: f32 = 0.0375;
    pub const GROWTH_MAX_SCALE: f32 = 1.3;
}

/// Derive rub intensity from touch-move distance (points since last sample).
///
/// This is the formula the input layer uses; the engine itself treats
/// intensity as an opaque positive scalar.
#[inline]
pub fn rub_intensity(distance_moved: f32) -> f32 {
    (distance_moved / 10.0).min(consts::RUB_MAX_INTENSITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rub_intensity_clamped() {
        assert!((rub_intensity(5.0) - 0.5).abs() < 1e-6);
        assert!((rub_intensity(30.0) - 3.0).abs() < 1e-6);
        assert!((rub_intensity(1000.0) - 3.0).abs() < 1e-6);
    }
}
