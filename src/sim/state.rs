//! Game state and core simulation types
//!
//! Everything one run needs lives in `GameState`; the tick owns it for the
//! duration of a frame and nothing else mutates it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Boss, Bullet, Enemy, Field, Particle, Player, PowerUp, PowerUpKind, Tint};
use super::scoring::{KillAward, ScoreKeeper};
use super::spawner::Spawner;
use crate::consts::MAX_PARTICLES;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulates
    Idle,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Something that happened during a tick, for audio and UI consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Shoot,
    /// Non-fatal damage dealt or taken
    Hit,
    Explosion { large: bool },
    PowerUpCollected { kind: PowerUpKind },
    LevelUp { level: u32 },
    BossSpawned,
    BossFired,
    BossDefeated,
    GameOver {
        score: u64,
        high_score: u64,
        new_record: bool,
    },
}

/// Camera shake countdown (presentation reads it, the tick decays it)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    pub intensity: f32,
    pub ticks: u32,
}

impl ScreenShake {
    pub fn start(&mut self, intensity: f32, ticks: u32) {
        self.intensity = intensity;
        self.ticks = ticks;
    }

    pub fn decay(&mut self) {
        if self.ticks > 0 {
            self.ticks -= 1;
            if self.ticks == 0 {
                self.intensity = 0.0;
            }
        }
    }

    pub fn active(&self) -> bool {
        self.ticks > 0
    }
}

/// Push unless the container is already at `cap`; returns true if pushed
pub fn push_capped<T>(items: &mut Vec<T>, item: T, cap: usize) -> bool {
    if items.len() < cap {
        items.push(item);
        true
    } else {
        false
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub field: Field,
    pub phase: GamePhase,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<PowerUp>,
    pub boss: Option<Boss>,
    /// Explosion debris
    pub particles: Vec<Particle>,
    /// Bullet trails
    pub trails: Vec<Particle>,
    pub scoring: ScoreKeeper,
    pub spawner: Spawner,
    /// Best score before this run ended; raised once at game over
    pub high_score: u64,
    /// Simulation clock (all timers measure against this)
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub shake: ScreenShake,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run, ready to play
    pub fn new(seed: u64, field: Field, tuning: Tuning) -> Self {
        let player = Player::spawn(&field, &tuning);
        let spawner = Spawner::new(&tuning);
        Self {
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            field,
            phase: GamePhase::Playing,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            boss: None,
            particles: Vec::new(),
            trails: Vec::new(),
            scoring: ScoreKeeper::new(),
            spawner,
            high_score: 0,
            clock_ms: 0.0,
            time_ticks: 0,
            shake: ScreenShake::default(),
            events: Vec::new(),
        }
    }

    /// Same run with a known high score baseline
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    pub fn score(&self) -> u64 {
        self.scoring.score
    }

    pub fn level(&self) -> u32 {
        self.scoring.level
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Resize the play-field; the player is pulled back inside immediately
    pub fn resize(&mut self, field: Field) {
        self.field = field;
        self.player.clamp_to(&field);
    }

    /// Playing <-> Paused; returns true if the phase changed
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                true
            }
            _ => false,
        }
    }

    /// Enter game over; a second call is a no-op
    pub fn end_game(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        let score = self.scoring.score;
        let new_record = score > self.high_score;
        if new_record {
            self.high_score = score;
        }
        log::info!(
            "Game over: score {} level {} (best {})",
            score,
            self.scoring.level,
            self.high_score
        );
        self.events.push(GameEvent::GameOver {
            score,
            high_score: self.high_score,
            new_record,
        });
    }

    /// Score a kill worth `base` at the current clock; handles level-up side effects
    pub fn credit_kill(&mut self, base: u64) -> KillAward {
        let award = self.scoring.credit_kill(base, self.clock_ms, &self.tuning);
        if let Some(level) = award.level_up {
            self.on_level_up(level);
        }
        award
    }

    /// Level increased: faster spawns, celebration, sound
    pub fn on_level_up(&mut self, level: u32) {
        log::info!("Level up: {}", level);
        self.spawner.on_level_up(level, &self.tuning);
        self.celebrate();
        self.events.push(GameEvent::LevelUp { level });
    }

    /// Green burst from the middle of the field
    pub fn celebrate(&mut self) {
        let center = self.field.center();
        let count = self.tuning.celebration_particles;
        let speed = self.tuning.celebration_speed;
        self.burst(center, Tint::Celebration, count, speed, 3.0..9.0);
    }

    /// Standard explosion debris
    pub fn explode(&mut self, at: Vec2, tint: Tint, count: usize) {
        let speed = self.tuning.explosion_speed;
        self.burst(at, tint, count, speed, 2.0..6.0);
    }

    /// Emit up to `count` particles, stopping at the population cap
    pub fn burst(
        &mut self,
        at: Vec2,
        tint: Tint,
        count: usize,
        speed: f32,
        size: std::ops::Range<f32>,
    ) {
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let s = self.rng.random_range(size.clone());
            let particle = Particle::burst(at, tint, speed, s, &mut self.rng);
            self.particles.push(particle);
        }
    }
}
