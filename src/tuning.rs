//! Data-driven game balance
//!
//! Every pacing number lives here so tests can bend the rules. Speeds are in
//! pixels per 60 Hz frame, timers in milliseconds of simulation clock.

use serde::{Deserialize, Serialize};

/// Level-gated odds for enemy variants.
///
/// A single roll in `[0, 1)` is drawn per spawn. Tank is checked first, then
/// fast, otherwise the enemy is basic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantOdds {
    /// Fast enemies appear from this level on
    pub fast_unlock_level: u32,
    /// Roll must exceed this for a fast enemy
    pub fast_threshold: f32,
    /// Tank enemies appear from this level on
    pub tank_unlock_level: u32,
    /// Roll must exceed this for a tank enemy
    pub tank_threshold: f32,
}

impl Default for VariantOdds {
    fn default() -> Self {
        Self {
            fast_unlock_level: 2,
            fast_threshold: 0.7,
            tank_unlock_level: 3,
            tank_threshold: 0.9,
        }
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    /// Distance of the spawn position above the bottom edge
    pub player_spawn_offset: f32,
    /// Inset of the player box when tested against enemy bullets
    pub player_bullet_inset: f32,
    pub fire_interval_ms: f64,
    pub rapid_fire_interval_ms: f64,
    pub rapid_fire_duration_ms: f64,
    pub recoil_px: f32,
    pub recoil_ms: f64,
    pub heal_amount: u8,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,

    // === Enemies ===
    pub enemy_base_speed: f32,
    pub enemy_speed_per_level: f32,
    pub enemy_speed_jitter: f32,
    /// Full range of the per-frame spin rate (centered on zero)
    pub enemy_spin_range: f32,
    pub variant_odds: VariantOdds,

    // === Spawning ===
    pub spawn_interval_base_ms: f64,
    pub spawn_interval_step_ms: f64,
    pub spawn_interval_floor_ms: f64,

    // === Power-ups ===
    pub powerup_drop_chance: f64,
    pub powerup_speed: f32,
    pub powerup_radius: f32,

    // === Damage ===
    pub enemy_bullet_damage: u8,
    pub enemy_contact_damage: u8,
    pub boss_contact_damage: u8,

    // === Scoring ===
    pub points_per_level: u64,
    pub combo_window_ms: f64,
    pub combo_bonus_step: u64,
    pub combo_bonus_cap: u32,

    // === Boss ===
    pub boss_first_threshold: u64,
    pub boss_threshold_step: u64,
    pub boss_kill_score: u64,
    pub boss_base_hp: u32,
    pub boss_hp_per_level: u32,
    pub boss_width: f32,
    pub boss_height: f32,
    pub boss_entry_speed: f32,
    pub boss_lateral_speed: f32,
    pub boss_hover_y: f32,
    pub boss_fire_cooldown_ms: f64,
    pub boss_bullet_speed: f32,
    pub boss_bullet_drift: f32,

    // === Effects ===
    pub explosion_particles: usize,
    pub explosion_speed: f32,
    pub celebration_particles: usize,
    pub celebration_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 50.0,
            player_speed: 7.0,
            player_spawn_offset: 100.0,
            player_bullet_inset: 10.0,
            fire_interval_ms: 150.0,
            rapid_fire_interval_ms: 80.0,
            rapid_fire_duration_ms: 5000.0,
            recoil_px: 3.0,
            recoil_ms: 50.0,
            heal_amount: 25,

            bullet_speed: 12.0,
            bullet_width: 4.0,
            bullet_height: 15.0,

            enemy_base_speed: 2.0,
            enemy_speed_per_level: 0.3,
            enemy_speed_jitter: 1.5,
            enemy_spin_range: 0.1,
            variant_odds: VariantOdds::default(),

            spawn_interval_base_ms: 1000.0,
            spawn_interval_step_ms: 100.0,
            spawn_interval_floor_ms: 200.0,

            powerup_drop_chance: 0.15,
            powerup_speed: 2.0,
            powerup_radius: 20.0,

            enemy_bullet_damage: 10,
            enemy_contact_damage: 20,
            boss_contact_damage: 30,

            points_per_level: 1000,
            combo_window_ms: 2000.0,
            combo_bonus_step: 50,
            combo_bonus_cap: 10,

            boss_first_threshold: 3000,
            boss_threshold_step: 5000,
            boss_kill_score: 5000,
            boss_base_hp: 50,
            boss_hp_per_level: 10,
            boss_width: 160.0,
            boss_height: 100.0,
            boss_entry_speed: 1.0,
            boss_lateral_speed: 2.0,
            boss_hover_y: 50.0,
            boss_fire_cooldown_ms: 800.0,
            boss_bullet_speed: 6.0,
            boss_bullet_drift: 2.0,

            explosion_particles: 15,
            explosion_speed: 5.0,
            celebration_particles: 50,
            celebration_speed: 8.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Enemy spawn interval for a level: `max(floor, base - level * step)`
    pub fn spawn_interval_ms(&self, level: u32) -> f64 {
        (self.spawn_interval_base_ms - level as f64 * self.spawn_interval_step_ms)
            .max(self.spawn_interval_floor_ms)
    }

    /// Boss hit points when it spawns at `level`
    pub fn boss_hp(&self, level: u32) -> u32 {
        self.boss_base_hp + level * self.boss_hp_per_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_interval_curve() {
        let t = Tuning::default();
        assert_eq!(t.spawn_interval_ms(1), 900.0);
        assert_eq!(t.spawn_interval_ms(2), 800.0);
        assert_eq!(t.spawn_interval_ms(8), 200.0);
        assert_eq!(t.spawn_interval_ms(40), 200.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "player_speed": 9.5, "variant_odds": { "tank_threshold": 0.5 } }"#;
        let t = Tuning::from_json(json).unwrap();
        assert_eq!(t.player_speed, 9.5);
        assert_eq!(t.variant_odds.tank_threshold, 0.5);
        assert_eq!(t.variant_odds.fast_threshold, 0.7);
        assert_eq!(t.bullet_speed, 12.0);
    }

    #[test]
    fn test_boss_hp_scales_with_level() {
        let t = Tuning::default();
        assert_eq!(t.boss_hp(3), 80);
    }
}
