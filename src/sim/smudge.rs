//! Smudge entities
//!
//! A smudge is one dirt patch: a circle the player rubs away to reveal the
//! reward underneath. Per-tick motion/scale behaviors live here; anything
//! that needs config access (oil acceleration) lives in the engine.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable entity id, allocated by the engine and never reused within a run.
pub type SmudgeId = u32;

/// What hides under a smudge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmudgeReward {
    Star,
    DoubleStar,
    Bomb,
    TimeBonus,
    Freeze,
    Chain,
    BossReward,
}

impl SmudgeReward {
    /// Bombs are the only hazard; everything else helps the player.
    pub fn is_positive(&self) -> bool {
        !matches!(self, SmudgeReward::Bomb)
    }
}

/// How a smudge behaves while on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmudgeBehavior {
    Normal,
    /// Bounded sinusoidal drift around the spawn point
    Moving,
    /// Linear scale growth, capped
    Growing,
    /// Spreads over time, faster once neglected (engine-driven)
    Oil,
    /// Strict lifetime; force-expires if not cleared in time
    Gold,
    /// Part of an ordered chain group
    Chain,
    /// Single high-durability smudge occupying a whole wave
    Boss,
}

/// One dirt patch instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Smudge {
    pub id: SmudgeId,
    pub reward: SmudgeReward,
    pub behavior: SmudgeBehavior,
    pub radius: f32,
    /// Anchor for drift; `position` is the live center
    pub base_position: Vec2,
    pub position: Vec2,
    pub spawn_time: f64,
    pub total_pixels: u32,
    pub rubbed_pixels: u32,
    pub scale_factor: f32,
    /// Random phase offsets fixed at creation so drift is deterministic after spawn
    pub drift_seed_x: f32,
    pub drift_seed_y: f32,
    /// Chain group membership (chain behavior only)
    pub chain_group: Option<u32>,
    /// 1-based position within the chain group
    pub chain_index: Option<u32>,
}

impl Smudge {
    pub fn new(
        id: SmudgeId,
        reward: SmudgeReward,
        behavior: SmudgeBehavior,
        radius: f32,
        position: Vec2,
        spawn_time: f64,
        rng: &mut impl Rng,
    ) -> Self {
        debug_assert!(radius > 0.0);
        Self {
            id,
            reward,
            behavior,
            radius,
            base_position: position,
            position,
            spawn_time,
            total_pixels: SMUDGE_TOTAL_PIXELS,
            rubbed_pixels: 0,
            scale_factor: 1.0,
            drift_seed_x: rng.random_range(0.0..std::f32::consts::TAU),
            drift_seed_y: rng.random_range(0.0..std::f32::consts::TAU),
            chain_group: None,
            chain_index: None,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.rubbed_pixels >= self.total_pixels
    }

    /// Clear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.rubbed_pixels as f32 / self.total_pixels as f32
    }

    /// Hit-test radius after scale behaviors
    pub fn effective_radius(&self) -> f32 {
        self.radius * self.scale_factor
    }

    /// Seconds since spawn
    pub fn age(&self, now: f64) -> f64 {
        now - self.spawn_time
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.distance(self.position) <= self.effective_radius()
    }

    /// Apply one rub action. Rubbing nearer the center clears more pixels
    /// (up to +50%). Returns true exactly on the action that transitions the
    /// smudge to revealed; a revealed smudge is a no-op.
    pub fn rub(&mut self, point: Vec2, intensity: f32) -> bool {
        if self.is_revealed() {
            return false;
        }

        let distance = point.distance(self.position);
        let reach = self.effective_radius();
        if distance > reach {
            return false;
        }

        let center_bonus = 1.0 + (1.0 - distance / reach) * RUB_CENTER_BONUS;
        let rub_amount = (intensity * center_bonus * RUB_PIXELS_PER_INTENSITY) as u32;
        self.rubbed_pixels = (self.rubbed_pixels + rub_amount).min(self.total_pixels);
        self.is_revealed()
    }

    /// Per-tick drift (moving behavior only)
    pub fn update_position(&mut self, now: f64) {
        if self.behavior != SmudgeBehavior::Moving {
            return;
        }
        let elapsed = self.age(now) as f32;
        let dx = (elapsed * DRIFT_FREQUENCY_X + self.drift_seed_x).sin() * DRIFT_AMPLITUDE_X;
        let dy = (elapsed * DRIFT_FREQUENCY_Y + self.drift_seed_y).cos() * DRIFT_AMPLITUDE_Y;
        self.position = self.base_position + Vec2::new(dx, dy);
    }

    /// Per-tick scale growth (growing behavior only; oil is engine-driven)
    pub fn update_scale(&mut self, now: f64) {
        if self.behavior != SmudgeBehavior::Growing {
            return;
        }
        let elapsed = self.age(now) as f32;
        self.scale_factor = (1.0 + elapsed * GROWTH_RATE).min(GROWTH_MAX_SCALE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_smudge(behavior: SmudgeBehavior) -> Smudge {
        let mut rng = Pcg32::seed_from_u64(7);
        Smudge::new(
            1,
            SmudgeReward::Star,
            behavior,
            40.0,
            Vec2::new(200.0, 300.0),
            0.0,
            &mut rng,
        )
    }

    #[test]
    fn test_rub_outside_radius_is_rejected() {
        let mut smudge = test_smudge(SmudgeBehavior::Normal);
        assert!(!smudge.rub(Vec2::new(200.0, 400.0), 3.0));
        assert_eq!(smudge.rubbed_pixels, 0);
    }

    #[test]
    fn test_rub_center_beats_edge() {
        let mut center = test_smudge(SmudgeBehavior::Normal);
        let mut edge = test_smudge(SmudgeBehavior::Normal);
        center.rub(Vec2::new(200.0, 300.0), 2.0);
        edge.rub(Vec2::new(239.0, 300.0), 2.0);
        assert!(center.rubbed_pixels > edge.rubbed_pixels);
    }

    #[test]
    fn test_reveal_fires_exactly_once() {
        let mut smudge = test_smudge(SmudgeBehavior::Normal);
        let center = smudge.position;

        // center_bonus at distance 0 is 1.5, so intensity 8 clears 36 px
        assert!(!smudge.rub(center, 8.0));
        assert!(!smudge.rub(center, 8.0));
        // Third rub crosses 100
        assert!(smudge.rub(center, 8.0));
        assert!(smudge.is_revealed());
        assert_eq!(smudge.rubbed_pixels, smudge.total_pixels);

        // Further rubs are no-ops and never re-fire
        assert!(!smudge.rub(center, 8.0));
        assert_eq!(smudge.rubbed_pixels, smudge.total_pixels);
    }

    #[test]
    fn test_moving_drift_is_bounded_and_deterministic() {
        let mut smudge = test_smudge(SmudgeBehavior::Moving);
        let anchor = smudge.base_position;
        for i in 0..200 {
            smudge.update_position(i as f64 * 0.1);
            let offset = smudge.position - anchor;
            assert!(offset.x.abs() <= DRIFT_AMPLITUDE_X + 1e-3);
            assert!(offset.y.abs() <= DRIFT_AMPLITUDE_Y + 1e-3);
        }
        // Same time, same position
        smudge.update_position(3.7);
        let first = smudge.position;
        smudge.update_position(3.7);
        assert_eq!(smudge.position, first);
    }

    #[test]
    fn test_normal_smudge_does_not_drift_or_grow() {
        let mut smudge = test_smudge(SmudgeBehavior::Normal);
        smudge.update_position(5.0);
        smudge.update_scale(5.0);
        assert_eq!(smudge.position, smudge.base_position);
        assert_eq!(smudge.scale_factor, 1.0);
    }

    #[test]
    fn test_growing_scale_caps() {
        let mut smudge = test_smudge(SmudgeBehavior::Growing);
        smudge.update_scale(2.0);
        assert!((smudge.scale_factor - 1.075).abs() < 1e-4);
        smudge.update_scale(60.0);
        assert!((smudge.scale_factor - GROWTH_MAX_SCALE).abs() < 1e-6);
        assert!((smudge.effective_radius() - 40.0 * GROWTH_MAX_SCALE).abs() < 1e-3);
    }

    proptest! {
        /// rubbed_pixels never decreases and never exceeds total_pixels, for
        /// any sequence of rub points and intensities.
        #[test]
        fn prop_rub_progress_monotone_and_capped(
            actions in prop::collection::vec((0.0f32..500.0, 0.0f32..500.0, 0.0f32..10.0), 0..50)
        ) {
            let mut smudge = test_smudge(SmudgeBehavior::Normal);
            let mut prev = 0;
            for (x, y, intensity) in actions {
                smudge.rub(Vec2::new(x, y), intensity);
                prop_assert!(smudge.rubbed_pixels >= prev);
                prop_assert!(smudge.rubbed_pixels <= smudge.total_pixels);
                prev = smudge.rubbed_pixels;
            }
        }
    }
}
