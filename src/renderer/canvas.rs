//! Canvas 2D drawing

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{BOSS_BAR, color, glow, low_health, shake_offset, ship_tint};
use crate::sim::{EnemyKind, PowerUpKind, Tint};
use crate::snapshot::{BossView, EnemyView, FrameSnapshot, ParticleView, PowerUpView, SpriteView};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    /// Draw one frame; `time_ms` only drives cosmetic flicker
    pub fn draw(&self, frame: &FrameSnapshot, time_ms: f64) {
        let ctx = &self.ctx;
        let (sx, sy) = if frame.shake > 0.0 {
            shake_offset(frame.shake, rand::random::<f32>(), rand::random::<f32>())
        } else {
            (0.0, 0.0)
        };

        ctx.save();
        ctx.translate(sx as f64, sy as f64).ok();

        // Motion-blur clear
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.3)");
        ctx.fill_rect(-20.0, -20.0, frame.field.x as f64 + 40.0, frame.field.y as f64 + 40.0);

        self.draw_player(frame, time_ms);
        for bullet in &frame.bullets {
            self.draw_bullet(bullet);
        }
        for trail in &frame.trails {
            self.draw_particle(trail);
        }
        for enemy in &frame.enemies {
            self.draw_enemy(enemy);
        }
        if let Some(boss) = &frame.boss {
            self.draw_boss(boss);
        }
        for particle in &frame.particles {
            self.draw_particle(particle);
        }
        for powerup in &frame.powerups {
            self.draw_powerup(powerup);
        }

        ctx.restore();
    }

    fn glow(&self, tint: Tint) {
        let c = color(tint);
        self.ctx.set_shadow_blur(glow(tint));
        self.ctx.set_shadow_color(c);
        self.ctx.set_stroke_style_str(c);
        self.ctx.set_fill_style_str(c);
    }

    fn draw_player(&self, frame: &FrameSnapshot, time_ms: f64) {
        let ctx = &self.ctx;
        let player = &frame.player;
        let (x, y) = (player.pos.x as f64, player.pos.y as f64);
        let (w, h) = (player.size.x as f64, player.size.y as f64);

        ctx.save();
        self.glow(ship_tint(frame));
        ctx.set_line_width(3.0);
        if low_health(frame.player_health_ratio) {
            ctx.set_global_alpha(0.6 + 0.4 * (time_ms * 0.015).sin().abs());
        }

        ctx.begin_path();
        ctx.move_to(x + w / 2.0, y);
        ctx.line_to(x + w, y + h);
        ctx.line_to(x + w / 2.0, y + h - 15.0);
        ctx.line_to(x, y + h);
        ctx.close_path();
        ctx.stroke();

        // Engine flame
        ctx.set_global_alpha(0.5 + 0.5 * (time_ms * 0.02).sin());
        ctx.begin_path();
        ctx.move_to(x + w / 2.0 - 10.0, y + h - 10.0);
        ctx.line_to(x + w / 2.0 + 10.0, y + h - 10.0);
        ctx.line_to(x + w / 2.0, y + h + 20.0 + rand::random::<f64>() * 10.0);
        ctx.fill();

        ctx.restore();
    }

    fn draw_bullet(&self, bullet: &SpriteView) {
        self.ctx.save();
        self.glow(bullet.tint);
        self.ctx.fill_rect(
            bullet.pos.x as f64,
            bullet.pos.y as f64,
            bullet.size.x as f64,
            bullet.size.y as f64,
        );
        self.ctx.restore();
    }

    fn draw_enemy(&self, enemy: &EnemyView) {
        let ctx = &self.ctx;
        let half = enemy.size as f64 / 2.0;

        ctx.save();
        ctx.translate(enemy.center.x as f64, enemy.center.y as f64).ok();
        ctx.rotate(enemy.rotation as f64).ok();
        self.glow(enemy.tint);
        ctx.set_line_width(3.0);

        ctx.begin_path();
        match enemy.kind {
            EnemyKind::Basic => {
                ctx.move_to(0.0, -half);
                ctx.line_to(half, half);
                ctx.line_to(-half, half);
                ctx.close_path();
            }
            EnemyKind::Fast => {
                ctx.move_to(0.0, -half);
                ctx.line_to(half, 0.0);
                ctx.line_to(0.0, half);
                ctx.line_to(-half, 0.0);
                ctx.close_path();
            }
            EnemyKind::Tank => ctx.rect(-half, -half, half * 2.0, half * 2.0),
        }
        ctx.stroke();

        ctx.set_global_alpha(0.3);
        ctx.fill();
        ctx.restore();
    }

    fn draw_boss(&self, boss: &BossView) {
        let ctx = &self.ctx;
        let (x, y) = (boss.pos.x as f64, boss.pos.y as f64);
        let (w, h) = (boss.size.x as f64, boss.size.y as f64);

        ctx.save();
        self.glow(Tint::Boss);
        ctx.set_line_width(4.0);

        ctx.begin_path();
        ctx.move_to(x + w / 2.0, y + h);
        ctx.line_to(x + w, y);
        ctx.line_to(x, y);
        ctx.close_path();
        ctx.stroke();

        // No health bar until it starts attacking
        if !boss.entering {
            ctx.set_fill_style_str(BOSS_BAR);
            ctx.fill_rect(x, y - 20.0, w * boss.hp_ratio.clamp(0.0, 1.0) as f64, 5.0);
        }
        ctx.restore();
    }

    fn draw_particle(&self, particle: &ParticleView) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(particle.alpha as f64);
        ctx.set_fill_style_str(color(particle.tint));
        ctx.begin_path();
        ctx.arc(
            particle.pos.x as f64,
            particle.pos.y as f64,
            particle.size as f64,
            0.0,
            TAU,
        )
        .ok();
        ctx.fill();
        ctx.restore();
    }

    fn draw_powerup(&self, powerup: &PowerUpView) {
        let ctx = &self.ctx;
        let (x, y) = (powerup.center.x as f64, powerup.center.y as f64);

        ctx.save();
        self.glow(Tint::PowerUp);
        ctx.begin_path();
        ctx.arc(x, y, powerup.radius as f64, 0.0, TAU).ok();
        ctx.fill();

        ctx.set_shadow_blur(0.0);
        ctx.set_fill_style_str("#000");
        ctx.set_font("bold 14px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let glyph = match powerup.kind {
            PowerUpKind::Health => "+",
            PowerUpKind::RapidFire => "\u{26a1}",
        };
        ctx.fill_text(glyph, x, y).ok();
        ctx.restore();
    }
}
