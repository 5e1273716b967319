//! Wave spawn planning
//!
//! Decides how many smudges a wave gets, what hides under each, how each
//! behaves, and where they go. Boss waves and chain groups bypass the normal
//! per-smudge selection.

use glam::Vec2;
use rand::Rng;

use super::engine::{GameEngine, GamePhase};
use super::event::GameEvent;
use super::smudge::{Smudge, SmudgeBehavior, SmudgeReward};
use crate::consts::*;

impl GameEngine {
    /// Populate the current wave. Guarded on the playing phase so a queued
    /// spawn can never fire after a game over.
    pub fn spawn_wave(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }

        let now = self.now;

        // Boss wave every N waves; nothing else spawns alongside
        if self.wave % self.config.boss_wave_interval == 0 {
            self.is_boss_wave = true;
            self.emit_wave_started();
            self.emit(GameEvent::BossSpawned);
            let boss = self.create_boss_smudge(now);
            log::info!(
                "wave {}: boss, radius {:.0}, {} px",
                self.wave,
                boss.radius,
                boss.total_pixels
            );
            self.push_smudge(boss);
            self.last_wave_time = now;
            return;
        }

        self.is_boss_wave = false;
        self.emit_wave_started();

        let count = self.smudges_for_current_wave();

        let spawn_chain = self.wave >= self.config.chain_start_wave
            && self.rng.random_range(1..=100u32) <= self.config.chain_chance;

        if spawn_chain {
            self.spawn_chain_group(now);
            let remaining = count.saturating_sub(self.config.chain_size);
            for _ in 0..remaining {
                let smudge = self.create_smudge(now);
                self.push_smudge(smudge);
            }
        } else {
            for _ in 0..count {
                let smudge = self.create_smudge(now);
                self.push_smudge(smudge);
            }
        }

        log::debug!("wave {}: {} smudges", self.wave, self.smudges.len());
        self.last_wave_time = now;
    }

    /// Capacity ramps by one every two waves, capped.
    pub fn smudges_for_current_wave(&self) -> u32 {
        (self.smudges_per_wave + (self.wave - 1) / 2).min(self.config.max_smudges_per_wave)
    }

    fn emit_wave_started(&mut self) {
        if self.wave > self.store.best_wave_reached() {
            self.store.set_best_wave_reached(self.wave);
        }
        self.emit(GameEvent::WaveStarted(self.wave));
    }

    fn push_smudge(&mut self, smudge: Smudge) {
        self.emit(GameEvent::SmudgeSpawned(smudge.clone()));
        self.smudges.push(smudge);
    }

    fn create_smudge(&mut self, now: f64) -> Smudge {
        // Gold roll first: rare, time-limited, amplified double-star
        if self.wave >= self.config.gold_start_wave
            && self.rng.random_range(1..=100u32) <= self.config.gold_chance
        {
            let radius = self
                .rng
                .random_range(SMUDGE_RADIUS_MIN..=SMALL_SMUDGE_RADIUS_MAX);
            let position = self.find_spawn_position(radius);
            let id = self.next_entity_id();
            return Smudge::new(
                id,
                SmudgeReward::DoubleStar,
                SmudgeBehavior::Gold,
                radius,
                position,
                now,
                &mut self.rng,
            );
        }

        let mut reward = self.roll_reward();
        let behavior = self.roll_behavior();

        // Oil is always a positive reward; its risk is the spreading
        if behavior == SmudgeBehavior::Oil {
            reward = if self.rng.random_bool(0.5) {
                SmudgeReward::Star
            } else {
                SmudgeReward::DoubleStar
            };
        }

        let radius = self.rng.random_range(SMUDGE_RADIUS_MIN..=SMUDGE_RADIUS_MAX);
        let position = self.find_spawn_position(radius);
        let id = self.next_entity_id();
        Smudge::new(id, reward, behavior, radius, position, now, &mut self.rng)
    }

    fn create_boss_smudge(&mut self, now: f64) -> Smudge {
        let radius = self
            .rng
            .random_range(self.config.boss_radius_min..=self.config.boss_radius_max);
        let position = self.scene_size / 2.0;
        let id = self.next_entity_id();
        let mut boss = Smudge::new(
            id,
            SmudgeReward::BossReward,
            SmudgeBehavior::Boss,
            radius,
            position,
            now,
            &mut self.rng,
        );
        boss.total_pixels = self.config.boss_total_pixels;
        boss
    }

    fn spawn_chain_group(&mut self, now: f64) {
        let group = self.next_entity_id();
        log::debug!(
            "wave {}: chain group {group} of {}",
            self.wave,
            self.config.chain_size
        );

        for index in 1..=self.config.chain_size {
            let radius = self
                .rng
                .random_range(SMUDGE_RADIUS_MIN..=SMALL_SMUDGE_RADIUS_MAX);
            let position = self.find_spawn_position(radius);
            let id = self.next_entity_id();
            let mut smudge = Smudge::new(
                id,
                SmudgeReward::Chain,
                SmudgeBehavior::Chain,
                radius,
                position,
                now,
                &mut self.rng,
            );
            smudge.chain_group = Some(group);
            smudge.chain_index = Some(index);
            self.push_smudge(smudge);
        }
    }

    /// Cumulative-threshold reward roll. The bomb band widens with the wave.
    fn roll_reward(&mut self) -> SmudgeReward {
        let roll = self.rng.random_range(1..=100u32);
        let bomb_chance = (self.config.base_bomb_chance
            + self.wave * self.config.bomb_chance_per_wave)
            .min(self.config.max_bomb_chance);

        if roll <= bomb_chance {
            SmudgeReward::Bomb
        } else if roll <= bomb_chance + 5 {
            SmudgeReward::Freeze
        } else if roll <= bomb_chance + 10 {
            SmudgeReward::TimeBonus
        } else if roll <= bomb_chance + 20 {
            SmudgeReward::DoubleStar
        } else {
            SmudgeReward::Star
        }
    }

    /// Cumulative-threshold behavior roll. Each band unlocks at its start
    /// wave and widens from there, capped.
    fn roll_behavior(&mut self) -> SmudgeBehavior {
        let cfg = &self.config;
        if self.wave < cfg.moving_smudge_start_wave {
            return SmudgeBehavior::Normal;
        }

        let band = |base: u32, per_wave: u32, max: u32, start: u32| -> u32 {
            if self.wave >= start {
                (base + (self.wave - start) * per_wave).min(max)
            } else {
                0
            }
        };
        let move_chance = band(
            cfg.moving_chance_base,
            cfg.moving_chance_per_wave,
            cfg.moving_chance_max,
            cfg.moving_smudge_start_wave,
        );
        let grow_chance = band(
            cfg.growing_chance_base,
            cfg.growing_chance_per_wave,
            cfg.growing_chance_max,
            cfg.growing_smudge_start_wave,
        );
        let oil_chance = band(
            cfg.oil_chance_base,
            cfg.oil_chance_per_wave,
            cfg.oil_chance_max,
            cfg.oil_start_wave,
        );

        let roll = self.rng.random_range(1..=100u32);
        if roll <= move_chance {
            SmudgeBehavior::Moving
        } else if roll <= move_chance + grow_chance {
            SmudgeBehavior::Growing
        } else if roll <= move_chance + grow_chance + oil_chance {
            SmudgeBehavior::Oil
        } else {
            SmudgeBehavior::Normal
        }
    }

    /// Rejection-sample a position inside the margins that keeps its distance
    /// from every unrevealed smudge. After the attempt budget the last
    /// candidate is accepted even if it overlaps (escape valve, not a bug).
    fn find_spawn_position(&mut self, radius: f32) -> Vec2 {
        let x_lo = radius + SPAWN_MARGIN_SIDE;
        let x_hi = self.scene_size.x - radius - SPAWN_MARGIN_SIDE;
        let y_lo = radius + SPAWN_MARGIN_LOW;
        let y_hi = self.scene_size.y - radius - SPAWN_MARGIN_HIGH;

        // Degenerate scene (tiny window): just center it
        if x_lo >= x_hi || y_lo >= y_hi {
            return self.scene_size / 2.0;
        }

        let mut position;
        let mut attempts = 0;
        loop {
            position = Vec2::new(
                self.rng.random_range(x_lo..=x_hi),
                self.rng.random_range(y_lo..=y_hi),
            );
            attempts += 1;
            let too_close = self.is_too_close(position, radius * MIN_SEPARATION_FACTOR);
            if !too_close || attempts >= MAX_PLACEMENT_ATTEMPTS {
                return position;
            }
        }
    }

    fn is_too_close(&self, point: Vec2, min_distance: f32) -> bool {
        self.smudges
            .iter()
            .filter(|s| !s.is_revealed())
            .any(|s| s.position.distance(point) < min_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::persistence::MemoryStore;

    fn engine_with(config: GameConfig, seed: u64) -> GameEngine {
        GameEngine::new(config, seed, Box::new(MemoryStore::default()))
    }

    #[test]
    fn test_boss_wave_composition() {
        // Scenario: wave 1 with boss interval 1 yields exactly one boss
        let config = GameConfig {
            boss_wave_interval: 1,
            ..Default::default()
        };
        let mut engine = engine_with(config, 11);
        engine.start_game();

        assert!(engine.is_boss_wave());
        assert_eq!(engine.smudges().len(), 1);
        let boss = &engine.smudges()[0];
        assert_eq!(boss.behavior, SmudgeBehavior::Boss);
        assert_eq!(boss.reward, SmudgeReward::BossReward);
        assert_eq!(boss.total_pixels, engine.config.boss_total_pixels);
        assert!(boss.radius >= engine.config.boss_radius_min);
        assert!(boss.radius <= engine.config.boss_radius_max);
        // Centered on the play area
        assert_eq!(boss.position, engine.scene_size / 2.0);

        let events = engine.drain_events();
        assert!(events.contains(&GameEvent::BossSpawned));
    }

    #[test]
    fn test_wave_count_ramp() {
        let mut engine = engine_with(GameConfig::default(), 1);
        // smudges_per_wave 3, +1 capacity every 2 waves, cap 8
        let expected = [(1, 3), (2, 3), (3, 4), (4, 4), (5, 5), (11, 8), (30, 8)];
        for (wave, count) in expected {
            engine.wave = wave;
            assert_eq!(engine.smudges_for_current_wave(), count, "wave {wave}");
        }
    }

    #[test]
    fn test_placement_respects_separation() {
        for seed in 0..20 {
            let mut engine = engine_with(GameConfig::default(), seed);
            engine.set_scene_size(Vec2::new(800.0, 1200.0));
            engine.start_game();

            let smudges = engine.smudges();
            for (j, b) in smudges.iter().enumerate() {
                for a in &smudges[..j] {
                    let dist = a.position.distance(b.position);
                    // b was placed against a's presence with b's radius
                    assert!(
                        dist >= b.radius * MIN_SEPARATION_FACTOR,
                        "seed {seed}: {dist} < {}",
                        b.radius * MIN_SEPARATION_FACTOR
                    );
                }
            }
        }
    }

    #[test]
    fn test_placement_stays_inside_margins() {
        for seed in 0..10 {
            let mut engine = engine_with(GameConfig::default(), seed);
            engine.start_game();
            for s in engine.smudges() {
                assert!(s.position.x >= s.radius + SPAWN_MARGIN_SIDE);
                assert!(s.position.x <= engine.scene_size.x - s.radius - SPAWN_MARGIN_SIDE);
                assert!(s.position.y >= s.radius + SPAWN_MARGIN_LOW);
                assert!(s.position.y <= engine.scene_size.y - s.radius - SPAWN_MARGIN_HIGH);
            }
        }
    }

    #[test]
    fn test_forced_bomb_reward() {
        let config = GameConfig {
            base_bomb_chance: 100,
            max_bomb_chance: 100,
            ..Default::default()
        };
        let mut engine = engine_with(config, 5);
        engine.start_game();
        assert!(engine
            .smudges()
            .iter()
            .all(|s| s.reward == SmudgeReward::Bomb));
    }

    #[test]
    fn test_behavior_locked_to_normal_before_unlock_wave() {
        let mut engine = engine_with(GameConfig::default(), 5);
        engine.wave = 2; // below moving_smudge_start_wave
        for _ in 0..50 {
            assert_eq!(engine.roll_behavior(), SmudgeBehavior::Normal);
        }
    }

    #[test]
    fn test_forced_chain_group() {
        let config = GameConfig {
            chain_start_wave: 1,
            chain_chance: 100,
            // Keep the filler slots predictable
            base_bomb_chance: 0,
            max_bomb_chance: 0,
            ..Default::default()
        };
        let mut engine = engine_with(config, 5);
        engine.start_game();

        let chain: Vec<_> = engine
            .smudges()
            .iter()
            .filter(|s| s.behavior == SmudgeBehavior::Chain)
            .collect();
        assert_eq!(chain.len(), 3);

        let group = chain[0].chain_group.unwrap();
        let mut indices: Vec<u32> = chain.iter().map(|s| s.chain_index.unwrap()).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(chain.iter().all(|s| s.chain_group == Some(group)));
        assert!(chain.iter().all(|s| s.reward == SmudgeReward::Chain));

        // Wave budget is 3, fully consumed by the chain group
        assert_eq!(engine.smudges().len(), 3);
    }

    #[test]
    fn test_oil_reward_is_always_positive() {
        // Oil unlocked and overwhelmingly likely; bombs maxed out. If the
        // oil override ever failed, a bomb would slip through.
        let config = GameConfig {
            moving_smudge_start_wave: 1,
            moving_chance_base: 0,
            moving_chance_max: 0,
            growing_chance_base: 0,
            growing_chance_max: 0,
            oil_start_wave: 1,
            oil_chance_base: 100,
            oil_chance_per_wave: 0,
            oil_chance_max: 100,
            base_bomb_chance: 100,
            max_bomb_chance: 100,
            gold_start_wave: 99,
            ..Default::default()
        };
        let mut engine = engine_with(config, 5);
        engine.start_game();

        for s in engine.smudges() {
            assert_eq!(s.behavior, SmudgeBehavior::Oil);
            assert!(matches!(
                s.reward,
                SmudgeReward::Star | SmudgeReward::DoubleStar
            ));
        }
    }

    #[test]
    fn test_gold_spawns_small_with_double_star() {
        let config = GameConfig {
            gold_start_wave: 1,
            gold_chance: 100,
            ..Default::default()
        };
        let mut engine = engine_with(config, 5);
        engine.start_game();

        for s in engine.smudges() {
            assert_eq!(s.behavior, SmudgeBehavior::Gold);
            assert_eq!(s.reward, SmudgeReward::DoubleStar);
            assert!(s.radius >= SMUDGE_RADIUS_MIN && s.radius <= SMALL_SMUDGE_RADIUS_MAX);
        }
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let mut a = engine_with(GameConfig::default(), 77);
        let mut b = engine_with(GameConfig::default(), 77);
        a.start_game();
        b.start_game();

        assert_eq!(a.smudges().len(), b.smudges().len());
        for (x, y) in a.smudges().iter().zip(b.smudges()) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.reward, y.reward);
            assert_eq!(x.behavior, y.behavior);
        }
    }

    #[test]
    fn test_spawn_noop_outside_playing() {
        let mut engine = engine_with(GameConfig::default(), 1);
        engine.spawn_wave();
        assert!(engine.smudges().is_empty());
        assert!(engine.drain_events().is_empty());
    }
}
