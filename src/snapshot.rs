//! Read-only views handed to the presentation layer
//!
//! Built fresh each frame from `GameState`; renderers never hold on to or
//! write back into simulation state.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{BossPhase, EnemyKind, GamePhase, GameState, PowerUpKind, Tint};

/// A box to draw, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteView {
    pub pos: Vec2,
    pub size: Vec2,
    pub tint: Tint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    /// Center of the hull (drawing rotates around it)
    pub center: Vec2,
    pub size: f32,
    pub kind: EnemyKind,
    pub tint: Tint,
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerUpView {
    pub center: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BossView {
    pub pos: Vec2,
    pub size: Vec2,
    /// Remaining hp in `[0, 1]`
    pub hp_ratio: f32,
    pub entering: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub size: f32,
    pub tint: Tint,
    /// Opacity in `[0, 1]`
    pub alpha: f32,
}

/// Everything the renderer draws this frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub field: Vec2,
    pub player: SpriteView,
    pub player_health_ratio: f32,
    pub rapid_fire: bool,
    pub bullets: Vec<SpriteView>,
    pub enemies: Vec<EnemyView>,
    pub powerups: Vec<PowerUpView>,
    pub boss: Option<BossView>,
    pub particles: Vec<ParticleView>,
    pub trails: Vec<ParticleView>,
    /// Camera offset magnitude; 0 when still
    pub shake: f32,
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub level: u32,
    pub health: u8,
    /// Streak shown only once it passes 1
    pub combo: Option<u32>,
    pub high_score: u64,
    pub phase: GamePhase,
    pub rapid_fire: bool,
}

impl FrameSnapshot {
    /// Capture `state`; `shake` and `recoil` false flatten those effects
    pub fn capture(state: &GameState, shake: bool, recoil: bool) -> Self {
        let player = &state.player;
        let recoil = if recoil {
            player.recoil_offset(&state.tuning)
        } else {
            0.0
        };

        let particle_view = |p: &crate::sim::Particle| ParticleView {
            pos: p.pos,
            size: p.size.max(0.0),
            tint: p.tint,
            alpha: p.life.clamp(0.0, 1.0),
        };

        Self {
            field: Vec2::new(state.field.width, state.field.height),
            player: SpriteView {
                pos: player.pos + Vec2::new(0.0, recoil),
                size: player.size,
                tint: Tint::Player,
            },
            player_health_ratio: player.health as f32 / crate::sim::MAX_HEALTH as f32,
            rapid_fire: player.rapid_fire(),
            bullets: state
                .bullets
                .iter()
                .map(|b| SpriteView {
                    pos: b.pos - b.size / 2.0,
                    size: b.size,
                    tint: b.tint,
                })
                .collect(),
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    center: e.center(),
                    size: e.kind.size(),
                    kind: e.kind,
                    tint: e.kind.tint(),
                    rotation: e.rotation,
                })
                .collect(),
            powerups: state
                .powerups
                .iter()
                .map(|p| PowerUpView {
                    center: p.pos,
                    radius: p.radius,
                    kind: p.kind,
                })
                .collect(),
            boss: state.boss.as_ref().map(|b| BossView {
                pos: b.pos,
                size: b.size,
                hp_ratio: b.hp_ratio(),
                entering: b.phase == BossPhase::Entering,
            }),
            particles: state.particles.iter().map(particle_view).collect(),
            trails: state.trails.iter().map(particle_view).collect(),
            shake: if shake && state.shake.active() {
                state.shake.intensity
            } else {
                0.0
            },
        }
    }
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let combo = state.scoring.combo;
        Self {
            score: state.score(),
            level: state.level(),
            health: state.player.health,
            combo: (combo > 1).then_some(combo),
            high_score: state.high_score.max(state.score()),
            phase: state.phase,
            rapid_fire: state.player.rapid_fire(),
        }
    }
}
