//! Game engine orchestrator
//!
//! Owns the menu/playing/paused/game-over state machine, the live smudge
//! set, scoring, combo/streak/chain tracking and the per-frame tick. Hosts
//! call `tick(now)` every rendered frame (in every phase - the engine keeps
//! its clock from the latest tick, so the other commands never consult
//! ambient time) and drain the event queue afterwards.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combo::ComboTracker;
use super::event::{GameEvent, RubResult};
use super::smudge::{Smudge, SmudgeBehavior, SmudgeId, SmudgeReward};
use crate::config::GameConfig;
use crate::consts::{DEFAULT_SCENE_HEIGHT, DEFAULT_SCENE_WIDTH};
use crate::highscores::Leaderboard;
use crate::persistence::ScoreStore;

/// Current phase of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// The whole simulation: state machine, entities, scoring, timers.
pub struct GameEngine {
    pub(crate) config: GameConfig,

    // State
    pub(crate) phase: GamePhase,
    pub(crate) score: u64,
    pub(crate) lives: u32,
    pub(crate) wave: u32,
    pub(crate) smudges_cleared: u32,
    pub(crate) smudges_per_wave: u32,
    pub(crate) wave_delay: f64,
    pub(crate) frozen: bool,
    pub(crate) frozen_until: f64,
    pub(crate) streak: u32,
    pub(crate) best_streak: u32,

    // Chain tracking (at most one active group)
    pub(crate) active_chain_group: Option<u32>,
    pub(crate) chain_progress: u32,

    // Boss tracking
    pub(crate) is_boss_wave: bool,

    // Sub-systems
    pub(crate) combo: ComboTracker,
    pub(crate) leaderboard: Leaderboard,
    pub(crate) store: Box<dyn ScoreStore>,

    /// Live smudges. Insertion order is the rub-resolution order: the first
    /// unrevealed hit-tested smudge wins when smudges overlap.
    pub(crate) smudges: Vec<Smudge>,

    // Timing (seconds, from the host clock fed into `tick`)
    pub(crate) now: f64,
    pub(crate) last_wave_time: f64,

    // Scene size for placement
    pub(crate) scene_size: Vec2,

    // Determinism
    pub(crate) rng: Pcg32,
    pub(crate) next_id: u32,

    // Outbound events, drained by the host once per frame
    pub(crate) events: VecDeque<GameEvent>,
}

impl GameEngine {
    pub fn new(config: GameConfig, seed: u64, store: Box<dyn ScoreStore>) -> Self {
        debug_assert!(config.boss_wave_interval >= 1);
        debug_assert!(config.chain_size >= 1);

        let leaderboard = Leaderboard::load_from(store.as_ref());
        let combo = ComboTracker::new(config.combo_timeout);
        Self {
            phase: GamePhase::Menu,
            score: 0,
            lives: config.initial_lives,
            wave: 1,
            smudges_cleared: 0,
            smudges_per_wave: config.initial_smudges_per_wave,
            wave_delay: config.initial_wave_delay,
            frozen: false,
            frozen_until: 0.0,
            streak: 0,
            best_streak: 0,
            active_chain_group: None,
            chain_progress: 0,
            is_boss_wave: false,
            combo,
            leaderboard,
            store,
            smudges: Vec::new(),
            now: 0.0,
            last_wave_time: 0.0,
            scene_size: Vec2::new(DEFAULT_SCENE_WIDTH, DEFAULT_SCENE_HEIGHT),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            events: VecDeque::new(),
            config,
        }
    }

    /// Set the play-area size used for placement (host window/screen)
    pub fn set_scene_size(&mut self, size: Vec2) {
        self.scene_size = size;
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn smudges_cleared(&self) -> u32 {
        self.smudges_cleared
    }

    /// Live smudge snapshot, in rub-resolution order
    pub fn smudges(&self) -> &[Smudge] {
        &self.smudges
    }

    pub fn combo_multiplier(&self) -> u32 {
        self.combo.multiplier()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_boss_wave(&self) -> bool {
        self.is_boss_wave
    }

    pub fn wave_delay(&self) -> f64 {
        self.wave_delay
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Drain all pending events, in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Lifecycle commands ===

    pub fn start_game(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = self.config.initial_lives;
        self.wave = 1;
        self.smudges_cleared = 0;
        self.smudges_per_wave = self.config.initial_smudges_per_wave;
        self.wave_delay = self.config.initial_wave_delay;
        self.frozen = false;
        self.combo = ComboTracker::new(self.config.combo_timeout);
        self.streak = 0;
        self.best_streak = 0;
        self.smudges.clear();
        self.active_chain_group = None;
        self.chain_progress = 0;
        self.is_boss_wave = false;

        self.emit(GameEvent::StateChanged(GamePhase::Playing));
        self.emit(GameEvent::ScoreChanged(0));
        self.emit(GameEvent::LivesChanged(self.lives));
        self.spawn_wave();
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.emit(GameEvent::StateChanged(GamePhase::Paused));
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                // Don't charge the paused time against the wave clock
                self.last_wave_time = self.now;
                self.emit(GameEvent::StateChanged(GamePhase::Playing));
            }
            _ => {}
        }
    }

    pub fn back_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.smudges.clear();
        self.active_chain_group = None;
        self.chain_progress = 0;
        self.is_boss_wave = false;
        self.emit(GameEvent::StateChanged(GamePhase::Menu));
    }

    // === Rub resolution ===

    /// Resolve one touch sample against the live smudges. At most one smudge
    /// is affected: the first unrevealed one (insertion order) containing the
    /// point. No-op outside the playing phase.
    pub fn handle_rub(&mut self, point: Vec2, intensity: f32) -> Option<RubResult> {
        if self.phase != GamePhase::Playing {
            return None;
        }

        for i in 0..self.smudges.len() {
            if self.smudges[i].is_revealed() || !self.smudges[i].contains_point(point) {
                continue;
            }

            let was_revealed = self.smudges[i].rub(point, intensity);
            let snapshot = self.smudges[i].clone();

            if was_revealed {
                self.handle_chain_logic(&snapshot);
                self.process_reward(&snapshot);
            }

            return Some(RubResult {
                smudge_id: snapshot.id,
                was_revealed,
                progress: snapshot.progress(),
                touch_point: point,
            });
        }
        None
    }

    /// Drop a smudge the view has finished animating away.
    pub fn remove_smudge(&mut self, id: SmudgeId) {
        self.smudges.retain(|s| s.id != id);
    }

    // === Chain logic ===

    fn handle_chain_logic(&mut self, smudge: &Smudge) {
        if smudge.reward != SmudgeReward::Chain {
            // Revealing anything else while a chain is live breaks it
            if self.active_chain_group.is_some() {
                self.break_chain();
            }
            return;
        }

        let (Some(group), Some(index)) = (smudge.chain_group, smudge.chain_index) else {
            debug_assert!(false, "chain smudge without group/index");
            return;
        };

        if self.active_chain_group == Some(group) && index == self.chain_progress + 1 {
            self.chain_progress += 1;
            self.emit(GameEvent::ChainProgress {
                group,
                index: self.chain_progress,
            });

            if self.chain_progress >= self.config.chain_size {
                let bonus = self.config.chain_mega_bonus * self.wave as u64;
                self.score += bonus;
                log::info!("chain {group} completed on wave {}: +{bonus}", self.wave);
                self.emit(GameEvent::ChainCompleted { bonus });
                self.emit(GameEvent::ScoreChanged(self.score));
                self.active_chain_group = None;
                self.chain_progress = 0;
            }
        } else if self.active_chain_group.is_none() && index == 1 {
            self.active_chain_group = Some(group);
            self.chain_progress = 1;
            self.emit(GameEvent::ChainProgress { group, index: 1 });
        } else {
            // Wrong group or out of order
            self.break_chain();
        }
    }

    fn break_chain(&mut self) {
        self.emit(GameEvent::ChainBroken);
        self.active_chain_group = None;
        self.chain_progress = 0;
    }

    // === Reward processing ===

    fn process_reward(&mut self, smudge: &Smudge) {
        let now = self.now;
        let wave = self.wave as u64;

        match smudge.reward {
            SmudgeReward::Star | SmudgeReward::Chain => {
                self.combo.register_hit(now);
                let points = 10 * wave * self.combo.multiplier() as u64;
                self.score += points;
                self.streak += 1;
                self.emit(GameEvent::SmudgeRevealed {
                    id: smudge.id,
                    reward: smudge.reward,
                    points,
                });
            }

            SmudgeReward::DoubleStar => {
                self.combo.register_hit(now);
                let base = if smudge.behavior == SmudgeBehavior::Gold {
                    self.config.gold_points_base
                } else {
                    25
                };
                let points = base * wave * self.combo.multiplier() as u64;
                self.score += points;
                self.streak += 1;
                self.emit(GameEvent::SmudgeRevealed {
                    id: smudge.id,
                    reward: SmudgeReward::DoubleStar,
                    points,
                });
            }

            SmudgeReward::Bomb => {
                self.lives = self.lives.saturating_sub(1);
                self.combo.reset();
                if self.streak > self.best_streak {
                    self.best_streak = self.streak;
                }
                self.streak = 0;
                self.emit(GameEvent::SmudgeRevealed {
                    id: smudge.id,
                    reward: SmudgeReward::Bomb,
                    points: 0,
                });
                self.emit(GameEvent::LifeLost(smudge.position));
                if self.lives == 0 {
                    self.trigger_game_over();
                    return;
                }
            }

            SmudgeReward::TimeBonus => {
                self.wave_delay += self.config.time_bonus_amount;
                self.streak += 1;
                self.emit(GameEvent::SmudgeRevealed {
                    id: smudge.id,
                    reward: SmudgeReward::TimeBonus,
                    points: 0,
                });
                self.emit(GameEvent::WaveDelayBonus);
            }

            SmudgeReward::Freeze => {
                self.frozen = true;
                self.frozen_until = now + self.config.freeze_duration;
                self.streak += 1;
                self.emit(GameEvent::SmudgeRevealed {
                    id: smudge.id,
                    reward: SmudgeReward::Freeze,
                    points: 0,
                });
                self.emit(GameEvent::FreezeActivated);
            }

            SmudgeReward::BossReward => {
                // Flat bonus, no combo multiplier
                let points = self.config.boss_points_base * wave;
                self.score += points;
                self.lives += 1;
                self.streak += 1;
                self.is_boss_wave = false;
                log::info!("boss defeated on wave {}: +{points}", self.wave);
                self.emit(GameEvent::SmudgeRevealed {
                    id: smudge.id,
                    reward: SmudgeReward::BossReward,
                    points,
                });
                self.emit(GameEvent::BossDefeated { bonus: points });
                self.emit(GameEvent::ExtraLife);
            }
        }

        self.smudges_cleared += 1;
        // Fixed trailing order; the HUD depends on it
        self.emit(GameEvent::ScoreChanged(self.score));
        self.emit(GameEvent::LivesChanged(self.lives));
        self.emit(GameEvent::ComboChanged {
            multiplier: self.combo.multiplier(),
        });
        self.emit(GameEvent::StreakChanged(self.streak));
    }

    // === Frame update ===

    /// Advance the simulation to `now` (seconds). Call once per rendered
    /// frame in every phase; only the playing phase does any work beyond
    /// updating the clock.
    pub fn tick(&mut self, now: f64) {
        self.now = now;
        if self.phase != GamePhase::Playing {
            return;
        }

        // Behavior updates
        let oil_base = self.config.oil_base_growth_rate;
        let oil_fast = self.config.oil_accelerated_rate;
        let oil_delay = self.config.oil_acceleration_delay;
        let oil_threshold = self.config.oil_acceleration_threshold;
        let oil_max = self.config.oil_max_scale;
        for smudge in &mut self.smudges {
            smudge.update_position(now);
            smudge.update_scale(now);

            // Oil growth needs config access, so it lives here
            if smudge.behavior == SmudgeBehavior::Oil {
                let elapsed = smudge.age(now);
                let rate = if elapsed > oil_delay && smudge.progress() < oil_threshold {
                    oil_fast
                } else {
                    oil_base
                };
                smudge.scale_factor = (1.0 + elapsed as f32 * rate).min(oil_max);
            }
        }

        // Gold smudges force-expire on their own clock
        let gold_duration = self.config.gold_duration;
        let mut gold_expired = Vec::new();
        self.smudges.retain(|s| {
            let expired = s.behavior == SmudgeBehavior::Gold
                && !s.is_revealed()
                && s.age(now) > gold_duration;
            if expired {
                gold_expired.push(s.id);
            }
            !expired
        });
        for id in gold_expired {
            self.emit(GameEvent::GoldExpired(id));
        }

        // Freeze timer
        if self.frozen && now > self.frozen_until {
            self.frozen = false;
            self.emit(GameEvent::FreezeEnded);
        }

        // Combo lapse
        if self.combo.check_timeout(now) {
            self.emit(GameEvent::ComboChanged { multiplier: 1 });
        }

        // Boss waves only end by defeat, never by timer (and ignore freeze)
        if self.is_boss_wave {
            let all_revealed =
                !self.smudges.is_empty() && self.smudges.iter().all(|s| s.is_revealed());
            if all_revealed {
                self.smudges.clear();
                self.advance_wave();
                self.spawn_wave();
            }
            return;
        }

        // Normal wave rollover: everything cleared, or the delay ran out
        let all_revealed = !self.smudges.is_empty() && self.smudges.iter().all(|s| s.is_revealed());
        let timed_out = now - self.last_wave_time > self.wave_delay;

        if !self.frozen && (all_revealed || (timed_out && !self.smudges.is_empty())) {
            let expired: Vec<SmudgeId> = self
                .smudges
                .iter()
                .filter(|s| !s.is_revealed())
                .map(|s| s.id)
                .collect();
            for id in expired {
                self.emit(GameEvent::SmudgeExpired(id));
            }
            // An unfinished chain dies with its wave
            if self.active_chain_group.is_some() {
                self.break_chain();
            }
            self.smudges.clear();
            self.advance_wave();
            self.spawn_wave();
        }
    }

    pub(crate) fn advance_wave(&mut self) {
        self.wave += 1;
        if self.wave % self.config.smudges_per_wave_increase_interval == 0 {
            self.smudges_per_wave += 1;
        }
        self.wave_delay =
            (self.wave_delay - self.config.wave_delay_reduction).max(self.config.min_wave_delay);
    }

    // === Game over ===

    fn trigger_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        if self.streak > self.best_streak {
            self.best_streak = self.streak;
        }

        let is_new_highscore = self.leaderboard.is_new_highscore(self.score);
        self.leaderboard.record(self.score);
        self.leaderboard.save_to(self.store.as_mut());

        log::info!(
            "game over: score={} wave={} cleared={} best_streak={}",
            self.score,
            self.wave,
            self.smudges_cleared,
            self.best_streak
        );

        self.emit(GameEvent::GameOver {
            score: self.score,
            wave: self.wave,
            cleared: self.smudges_cleared,
            best_streak: self.best_streak,
            is_new_highscore,
        });
        self.emit(GameEvent::StateChanged(GamePhase::GameOver));
    }
}
