//! Data-driven game balance
//!
//! Every tunable the simulation consults lives here so that tests (and a
//! future difficulty editor) can override any of it. Defaults reproduce the
//! shipped balance.
//!
//! All chance values are integer percentages on a single 1..=100 roll with
//! cumulative thresholds, so the bands for one roll must sum to at most 100.

use serde::{Deserialize, Serialize};

/// Game configuration (immutable for the duration of a session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    // === Lives and wave pacing ===
    pub initial_lives: u32,
    /// Seconds before an uncleared wave rolls over
    pub initial_wave_delay: f64,
    pub initial_smudges_per_wave: u32,
    /// Wave delay never shrinks below this
    pub min_wave_delay: f64,
    /// Per-wave reduction of the wave delay
    pub wave_delay_reduction: f64,
    pub max_smudges_per_wave: u32,
    /// Every N waves the per-wave smudge budget grows by one
    pub smudges_per_wave_increase_interval: u32,
    /// Seconds a time-bonus reveal adds to the wave delay
    pub time_bonus_amount: f64,
    /// Seconds a freeze reveal suppresses wave rollover
    pub freeze_duration: f64,

    // === Combo ===
    /// Seconds between reveals before the combo lapses
    pub combo_timeout: f64,

    // === Reward roll (bomb band grows with the wave, rest are fixed widths) ===
    pub base_bomb_chance: u32,
    pub bomb_chance_per_wave: u32,
    pub max_bomb_chance: u32,

    // === Behavior roll (each band scales with waves since its unlock) ===
    pub moving_smudge_start_wave: u32,
    pub moving_chance_base: u32,
    pub moving_chance_per_wave: u32,
    pub moving_chance_max: u32,
    pub growing_smudge_start_wave: u32,
    pub growing_chance_base: u32,
    pub growing_chance_per_wave: u32,
    pub growing_chance_max: u32,

    // === Oil smudge ===
    pub oil_start_wave: u32,
    pub oil_chance_base: u32,
    pub oil_chance_per_wave: u32,
    pub oil_chance_max: u32,
    /// Scale growth per second while the player keeps up
    pub oil_base_growth_rate: f32,
    /// Scale growth per second once the smudge has been ignored too long
    pub oil_accelerated_rate: f32,
    /// Progress below which the accelerated rate kicks in
    pub oil_acceleration_threshold: f32,
    /// Seconds of neglect before acceleration
    pub oil_acceleration_delay: f64,
    pub oil_max_scale: f32,

    // === Gold smudge ===
    pub gold_start_wave: u32,
    pub gold_chance: u32,
    /// Seconds before an unclaimed gold smudge force-expires
    pub gold_duration: f64,
    /// Replaces the double-star base points for gold reveals
    pub gold_points_base: u64,

    // === Chain group ===
    pub chain_start_wave: u32,
    pub chain_chance: u32,
    /// Smudges per chain group (indices 1..=chain_size)
    pub chain_size: u32,
    /// Completion bonus, multiplied by the wave number
    pub chain_mega_bonus: u64,

    // === Boss wave ===
    pub boss_wave_interval: u32,
    pub boss_radius_min: f32,
    pub boss_radius_max: f32,
    pub boss_total_pixels: u32,
    /// Boss reveal points, multiplied by the wave number (no combo multiplier)
    pub boss_points_base: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            initial_wave_delay: 7.0,
            initial_smudges_per_wave: 3,
            min_wave_delay: 3.5,
            wave_delay_reduction: 0.05,
            max_smudges_per_wave: 8,
            smudges_per_wave_increase_interval: 5,
            time_bonus_amount: 2.0,
            freeze_duration: 3.0,

            combo_timeout: 2.0,

            base_bomb_chance: 10,
            bomb_chance_per_wave: 2,
            max_bomb_chance: 25,

            moving_smudge_start_wave: 3,
            moving_chance_base: 10,
            moving_chance_per_wave: 3,
            moving_chance_max: 30,
            growing_smudge_start_wave: 5,
            growing_chance_base: 8,
            growing_chance_per_wave: 2,
            growing_chance_max: 20,

            oil_start_wave: 4,
            oil_chance_base: 5,
            oil_chance_per_wave: 2,
            oil_chance_max: 15,
            oil_base_growth_rate: 0.06,
            oil_accelerated_rate: 0.12,
            oil_acceleration_threshold: 0.3,
            oil_acceleration_delay: 3.0,
            oil_max_scale: 1.8,

            gold_start_wave: 3,
            gold_chance: 5,
            gold_duration: 2.0,
            gold_points_base: 50,

            chain_start_wave: 6,
            chain_chance: 8,
            chain_size: 3,
            chain_mega_bonus: 100,

            boss_wave_interval: 10,
            boss_radius_min: 120.0,
            boss_radius_max: 150.0,
            boss_total_pixels: 400,
            boss_points_base: 500,
        }
    }
}

impl GameConfig {
    /// Sanity-check invariants the simulation relies on. Violations are
    /// programming errors, so this is only consulted via `debug_assert!`.
    pub fn is_valid(&self) -> bool {
        self.boss_wave_interval >= 1
            && self.chain_size >= 1
            && self.initial_smudges_per_wave >= 1
            && self.max_smudges_per_wave >= self.initial_smudges_per_wave
            && self.max_bomb_chance + 20 <= 100
            && self.moving_chance_max + self.growing_chance_max + self.oil_chance_max <= 100
            && self.gold_chance <= 100
            && self.chain_chance <= 100
            && self.min_wave_delay > 0.0
            && self.boss_radius_min <= self.boss_radius_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(GameConfig::default().is_valid());
    }

    #[test]
    fn test_roll_bands_fit_scale() {
        let cfg = GameConfig::default();
        // Reward roll: bomb band at its cap plus the fixed freeze/time/double
        // widths must still leave room for plain stars.
        assert!(cfg.max_bomb_chance + 5 + 5 + 10 < 100);
    }

    #[test]
    fn test_config_roundtrip() {
        let cfg = GameConfig {
            base_bomb_chance: 42,
            ..Default::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.base_bomb_chance, 42);
        assert_eq!(back.boss_total_pixels, cfg.boss_total_pixels);
    }
}
