//! Canvas 2D rendering module
//!
//! Draws a `FrameSnapshot` in neon outlines with glow. The palette is shared
//! with the DOM HUD so both use the same colors.

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::sim::Tint;
use crate::snapshot::FrameSnapshot;

/// CSS color for a tint
pub fn color(tint: Tint) -> &'static str {
    match tint {
        Tint::Player | Tint::PlayerShot => "#00ffff",
        Tint::EnemyShot | Tint::Boss => "#ff00ff",
        Tint::Basic => "#ff0055",
        Tint::Fast => "#ffaa00",
        Tint::Tank => "#aa00ff",
        Tint::PowerUp | Tint::Celebration => "#00ff00",
    }
}

/// Shadow blur radius used for a tint's glow
pub fn glow(tint: Tint) -> f64 {
    match tint {
        Tint::Player | Tint::Boss => 20.0,
        Tint::Basic | Tint::Fast | Tint::Tank => 15.0,
        Tint::PlayerShot | Tint::EnemyShot | Tint::PowerUp => 10.0,
        Tint::Celebration => 0.0,
    }
}

/// Boss health bar fill
pub const BOSS_BAR: &str = "#ff0055";

/// Health bar gradient stops: green when healthy, orange when hurt, red when critical
pub fn health_gradient(health: u8) -> (&'static str, &'static str) {
    if health > 50 {
        ("#00ff00", "#00aa00")
    } else if health > 25 {
        ("#ffaa00", "#ff5500")
    } else {
        ("#ff0055", "#aa0000")
    }
}

/// Ship outline color; rapid fire glows in the pickup color
pub fn ship_tint(frame: &FrameSnapshot) -> Tint {
    if frame.rapid_fire { Tint::PowerUp } else { frame.player.tint }
}

/// Ship flickers at or below a quarter health
pub fn low_health(ratio: f32) -> bool {
    ratio <= 0.25
}

/// Random camera offset for a shake of `intensity`, one roll per axis in `[0, 1)`
pub fn shake_offset(intensity: f32, roll_x: f32, roll_y: f32) -> (f32, f32) {
    ((roll_x - 0.5) * intensity, (roll_y - 0.5) * intensity)
}
