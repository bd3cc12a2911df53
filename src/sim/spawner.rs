//! Enemy pacing, boss triggers and power-up drops

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Boss, Enemy, PowerUp};
use super::state::{GameEvent, GameState, push_capped};
use crate::consts::MAX_POWERUPS;
use crate::tuning::Tuning;

/// Spawn timers and thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Time accumulated toward the next enemy
    pub timer_ms: f64,
    /// Current enemy interval
    pub interval_ms: f64,
    /// Score at which the next boss appears
    pub boss_threshold: u64,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            timer_ms: 0.0,
            interval_ms: tuning.spawn_interval_base_ms,
            boss_threshold: tuning.boss_first_threshold,
        }
    }

    /// Recompute the enemy interval after a level change
    pub fn on_level_up(&mut self, level: u32, tuning: &Tuning) {
        self.interval_ms = tuning.spawn_interval_ms(level);
    }

    /// Accumulate `dt_ms`; true when an enemy is due (timer restarts at zero)
    pub fn tick_enemy_timer(&mut self, dt_ms: f64) -> bool {
        self.timer_ms += dt_ms;
        if self.timer_ms > self.interval_ms {
            self.timer_ms = 0.0;
            true
        } else {
            false
        }
    }

    pub fn boss_due(&self, score: u64, boss_alive: bool) -> bool {
        !boss_alive && score >= self.boss_threshold
    }

    pub fn on_boss_defeated(&mut self, tuning: &Tuning) {
        self.boss_threshold = self.boss_threshold.saturating_add(tuning.boss_threshold_step);
    }
}

/// Run the spawn phase of a tick
pub fn step(state: &mut GameState, dt: f32) {
    let dt_ms = dt as f64 * 1000.0;
    if state.spawner.tick_enemy_timer(dt_ms) {
        let enemy = Enemy::spawn(state.scoring.level, &state.field, &state.tuning, &mut state.rng);
        log::debug!("Spawned {:?} enemy at x={:.0}", enemy.kind, enemy.pos.x);
        state.enemies.push(enemy);
    }

    if state.spawner.boss_due(state.scoring.score, state.boss.is_some()) {
        let boss = Boss::spawn(&state.field, state.scoring.level, &state.tuning);
        log::info!(
            "Boss incoming at score {} ({} hp)",
            state.scoring.score,
            boss.max_hp
        );
        state.boss = Some(boss);
        state.events.push(GameEvent::BossSpawned);
    }
}

/// Roll the per-kill drop chance and place a power-up at `at`
///
/// Returns true if a power-up was created.
pub fn roll_drop(state: &mut GameState, at: Vec2) -> bool {
    if !state.rng.random_bool(state.tuning.powerup_drop_chance.clamp(0.0, 1.0)) {
        return false;
    }
    let powerup = PowerUp::roll(at, &state.tuning, &mut state.rng);
    push_capped(&mut state.powerups, powerup, MAX_POWERUPS)
}
