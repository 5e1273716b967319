//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `tick(now)`, never from the ambient clock
//! - Seeded RNG only
//! - Stable smudge iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod combo;
pub mod engine;
pub mod event;
pub mod smudge;
pub mod spawn;

pub use combo::ComboTracker;
pub use engine::{GameEngine, GamePhase};
pub use event::{GameEvent, RubResult};
pub use smudge::{Smudge, SmudgeBehavior, SmudgeId, SmudgeReward};
