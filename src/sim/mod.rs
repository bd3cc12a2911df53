//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers measured against the simulation clock, never the wall clock
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod rect;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use entity::{
    Boss, BossPhase, Bullet, BulletOrigin, Enemy, EnemyKind, Field, MAX_HEALTH, Particle, Player,
    PowerUp, PowerUpKind, Tint,
};
pub use rect::{HIT_MARGIN, Rect, overlaps_with_margin};
pub use scoring::{KillAward, ScoreKeeper};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState, ScreenShake, push_capped};
pub use tick::{TickInput, tick};
