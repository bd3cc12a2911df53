//! Sound hooks
//!
//! The simulation never plays audio itself; it emits `GameEvent`s and the
//! front end feeds them through `dispatch` into an `AudioHooks` sink.

use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Fire-and-forget sound triggers; every hook defaults to silence
pub trait AudioHooks {
    fn on_shoot(&mut self) {}
    fn on_hit(&mut self) {}
    fn on_explosion(&mut self) {}
    fn on_powerup(&mut self) {}
    fn on_level_up(&mut self) {}
    fn on_boss_spawn(&mut self) {}
    fn on_boss_fire(&mut self) {}
}

/// Sink that ignores everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioHooks for Silent {}

/// Route a batch of events to `hooks`
///
/// A boss kill also plays the celebration jingle, unless the same batch
/// already levelled up and played it.
pub fn dispatch(events: &[GameEvent], hooks: &mut impl AudioHooks) {
    let mut jingle = false;
    for event in events {
        match event {
            GameEvent::Shoot => hooks.on_shoot(),
            GameEvent::Hit => hooks.on_hit(),
            GameEvent::Explosion { .. } => hooks.on_explosion(),
            GameEvent::PowerUpCollected { .. } => hooks.on_powerup(),
            GameEvent::LevelUp { .. } => {
                if !jingle {
                    hooks.on_level_up();
                    jingle = true;
                }
            }
            GameEvent::BossSpawned => hooks.on_boss_spawn(),
            GameEvent::BossFired => hooks.on_boss_fire(),
            GameEvent::BossDefeated => {
                hooks.on_explosion();
                if !jingle && !events.iter().any(|e| matches!(e, GameEvent::LevelUp { .. })) {
                    hooks.on_level_up();
                    jingle = true;
                }
            }
            GameEvent::GameOver { .. } => {}
        }
    }
}
