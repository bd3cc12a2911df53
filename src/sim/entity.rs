//! Entity models and their per-tick update rules
//!
//! Each entity only touches its own kinematic state. Cross-entity effects
//! (damage, scoring, spawning) are the orchestrator's business.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::{Tuning, VariantOdds};
use crate::{decay_per_frame, per_frame};

/// Visible simulation bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Color tag for presentation lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Player,
    PlayerShot,
    EnemyShot,
    Basic,
    Fast,
    Tank,
    PowerUp,
    Boss,
    Celebration,
}

// === Player ===

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame
    pub speed: f32,
    pub health: u8,
    /// Remaining rapid-fire time (0 = inactive)
    pub rapid_fire_ms: f64,
    /// Clock time of the last shot
    pub last_shot_ms: Option<f64>,
    /// Remaining recoil kick time
    pub recoil_ms: f64,
}

/// Full health
pub const MAX_HEALTH: u8 = 100;

impl Player {
    /// Spawn centered horizontally, just above the bottom edge
    pub fn spawn(field: &Field, tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.player_size);
        let mut player = Self {
            pos: Vec2::new(
                field.width / 2.0 - size.x / 2.0,
                field.height - tuning.player_spawn_offset,
            ),
            size,
            speed: tuning.player_speed,
            health: MAX_HEALTH,
            rapid_fire_ms: 0.0,
            last_shot_ms: None,
            recoil_ms: 0.0,
        };
        player.clamp_to(field);
        player
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn rapid_fire(&self) -> bool {
        self.rapid_fire_ms > 0.0
    }

    /// Move by the directional intent, then clamp into the field
    ///
    /// `intent` components are expected in `[-1, 1]`; anything outside is
    /// clamped, and non-finite components are ignored.
    pub fn advance(&mut self, intent: Vec2, field: &Field, dt: f32) {
        let intent = Vec2::new(sanitize_axis(intent.x), sanitize_axis(intent.y));
        self.pos += intent * per_frame(self.speed, dt);
        self.clamp_to(field);

        let dt_ms = dt as f64 * 1000.0;
        if self.rapid_fire_ms > 0.0 {
            self.rapid_fire_ms -= dt_ms;
            if self.rapid_fire_ms <= 0.0 {
                self.rapid_fire_ms = 0.0;
            }
        }
        self.recoil_ms = (self.recoil_ms - dt_ms).max(0.0);
    }

    /// Keep the ship inside `[0, W - w] x [0, H - h]`
    pub fn clamp_to(&mut self, field: &Field) {
        let max_x = (field.width - self.size.x).max(0.0);
        let max_y = (field.height - self.size.y).max(0.0);
        self.pos.x = self.pos.x.min(max_x).max(0.0);
        self.pos.y = self.pos.y.min(max_y).max(0.0);
    }

    /// Whether the fire-rate cooldown has elapsed at `now_ms`
    pub fn can_fire(&self, now_ms: f64, tuning: &Tuning) -> bool {
        let interval = if self.rapid_fire() {
            tuning.rapid_fire_interval_ms
        } else {
            tuning.fire_interval_ms
        };
        match self.last_shot_ms {
            Some(last) => now_ms - last > interval,
            None => true,
        }
    }

    /// Top-center of the ship, where bullets leave
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    /// Record a shot and start the recoil kick
    pub fn mark_shot(&mut self, now_ms: f64, tuning: &Tuning) {
        self.last_shot_ms = Some(now_ms);
        self.recoil_ms = tuning.recoil_ms;
    }

    /// Vertical draw offset while recoiling
    pub fn recoil_offset(&self, tuning: &Tuning) -> f32 {
        if self.recoil_ms > 0.0 { tuning.recoil_px } else { 0.0 }
    }

    pub fn heal(&mut self, amount: u8) {
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
    }

    /// Apply damage; returns true if the ship is destroyed
    pub fn take_damage(&mut self, amount: u8) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    pub fn activate_rapid_fire(&mut self, duration_ms: f64) {
        self.rapid_fire_ms = duration_ms;
    }
}

fn sanitize_axis(v: f32) -> f32 {
    if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 }
}

// === Bullets ===

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOrigin {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Center
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub size: Vec2,
    pub origin: BulletOrigin,
    pub tint: Tint,
    pub alive: bool,
}

impl Bullet {
    /// Player shot leaving the muzzle, travelling straight up
    pub fn player_shot(muzzle: Vec2, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.bullet_width, tuning.bullet_height);
        Self {
            pos: Vec2::new(muzzle.x, muzzle.y + size.y / 2.0),
            vel: Vec2::new(0.0, -tuning.bullet_speed),
            size,
            origin: BulletOrigin::Player,
            tint: Tint::PlayerShot,
            alive: true,
        }
    }

    /// Enemy shot with its top edge at `from`, falling with sideways drift
    pub fn enemy_shot(from: Vec2, drift: f32, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.bullet_width, tuning.bullet_height);
        Self {
            pos: Vec2::new(from.x, from.y + size.y / 2.0),
            vel: Vec2::new(drift, tuning.boss_bullet_speed),
            size,
            origin: BulletOrigin::Enemy,
            tint: Tint::EnemyShot,
            alive: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    pub fn advance(&mut self, field: &Field, dt: f32) {
        self.pos += self.vel * per_frame(1.0, dt);
        let top = self.pos.y - self.size.y / 2.0;
        if top < -self.size.y || top > field.height + self.size.y {
            self.alive = false;
        }
    }

    /// Point trails are emitted from
    pub fn tail(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size.y / 2.0)
    }
}

// === Enemies ===

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
}

impl EnemyKind {
    /// Pick a variant from a single roll in `[0, 1)`, gated by level
    ///
    /// The rarer tank band sits on top of the fast band.
    pub fn choose(level: u32, roll: f32, odds: &VariantOdds) -> Self {
        if level >= odds.tank_unlock_level && roll > odds.tank_threshold {
            EnemyKind::Tank
        } else if level >= odds.fast_unlock_level && roll > odds.fast_threshold {
            EnemyKind::Fast
        } else {
            EnemyKind::Basic
        }
    }

    /// Edge length of the square hull
    pub fn size(&self) -> f32 {
        match self {
            EnemyKind::Basic => 40.0,
            EnemyKind::Fast => 30.0,
            EnemyKind::Tank => 60.0,
        }
    }

    pub fn hit_points(&self) -> u32 {
        match self {
            EnemyKind::Tank => 3,
            _ => 1,
        }
    }

    pub fn speed_multiplier(&self) -> f32 {
        match self {
            EnemyKind::Basic => 1.0,
            EnemyKind::Fast => 1.2,
            EnemyKind::Tank => 0.6,
        }
    }

    pub fn score_value(&self) -> u64 {
        match self {
            EnemyKind::Basic => 100,
            EnemyKind::Fast => 200,
            EnemyKind::Tank => 300,
        }
    }

    pub fn tint(&self) -> Tint {
        match self {
            EnemyKind::Basic => Tint::Basic,
            EnemyKind::Fast => Tint::Fast,
            EnemyKind::Tank => Tint::Tank,
        }
    }
}

/// A falling, spinning enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Top-left corner
    pub pos: Vec2,
    pub kind: EnemyKind,
    /// Pixels per frame
    pub speed: f32,
    pub hp: u32,
    /// Radians
    pub rotation: f32,
    /// Radians per frame
    pub spin: f32,
    pub alive: bool,
}

impl Enemy {
    /// Build an enemy of `kind` entering just above the top edge
    pub fn new(kind: EnemyKind, x: f32, base_speed: f32, spin: f32) -> Self {
        let size = kind.size();
        Self {
            pos: Vec2::new(x, -size),
            kind,
            speed: base_speed * kind.speed_multiplier(),
            hp: kind.hit_points(),
            rotation: 0.0,
            spin,
            alive: true,
        }
    }

    /// Roll a new enemy for the current level
    pub fn spawn(level: u32, field: &Field, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let jitter = rng.random::<f32>() * tuning.enemy_speed_jitter;
        let base_speed =
            tuning.enemy_base_speed + level as f32 * tuning.enemy_speed_per_level + jitter;
        let kind = EnemyKind::choose(level, rng.random::<f32>(), &tuning.variant_odds);
        let x = rng.random::<f32>() * (field.width - kind.size()).max(0.0);
        let spin = (rng.random::<f32>() - 0.5) * tuning.enemy_spin_range;
        Self::new(kind, x, base_speed, spin)
    }

    pub fn bounds(&self) -> Rect {
        let s = self.kind.size();
        Rect::new(self.pos.x, self.pos.y, s, s)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn advance(&mut self, field: &Field, dt: f32) {
        let frames = per_frame(1.0, dt);
        self.pos.y += self.speed * frames;
        self.rotation += self.spin * frames;
        // Slips past without hurting anyone
        if self.pos.y > field.height {
            self.alive = false;
        }
    }

    /// Take one hit; returns true when destroyed
    pub fn hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }
}

// === Power-ups ===

/// Power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    RapidFire,
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per frame
    pub speed: f32,
    pub kind: PowerUpKind,
    pub alive: bool,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, tuning: &Tuning) -> Self {
        Self {
            pos,
            radius: tuning.powerup_radius,
            speed: tuning.powerup_speed,
            kind,
            alive: true,
        }
    }

    /// Even odds between the two kinds
    pub fn roll(pos: Vec2, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let kind = if rng.random::<f32>() > 0.5 {
            PowerUpKind::Health
        } else {
            PowerUpKind::RapidFire
        };
        Self::new(pos, kind, tuning)
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.radius * 2.0))
    }

    pub fn advance(&mut self, field: &Field, dt: f32) {
        self.pos.y += per_frame(self.speed, dt);
        if self.pos.y > field.height {
            self.alive = false;
        }
    }
}

// === Boss ===

/// Boss movement phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Descending into view
    Entering,
    /// Strafing side to side and firing
    Attacking,
}

/// Number of bullets in one boss volley
pub const BOSS_VOLLEY: usize = 3;

/// The boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub phase: BossPhase,
    pub last_fire_ms: Option<f64>,
}

impl Boss {
    /// Spawn centered above the field
    pub fn spawn(field: &Field, level: u32, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.boss_width, tuning.boss_height);
        let hp = tuning.boss_hp(level);
        Self {
            pos: Vec2::new(field.width / 2.0 - size.x / 2.0, -size.y),
            size,
            hp,
            max_hp: hp,
            direction: 1.0,
            phase: BossPhase::Entering,
            last_fire_ms: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    pub fn advance(&mut self, field: &Field, tuning: &Tuning, dt: f32) {
        let frames = per_frame(1.0, dt);
        match self.phase {
            BossPhase::Entering => {
                self.pos.y += tuning.boss_entry_speed * frames;
                if self.pos.y >= tuning.boss_hover_y {
                    self.phase = BossPhase::Attacking;
                }
            }
            BossPhase::Attacking => {
                self.pos.x += tuning.boss_lateral_speed * self.direction * frames;
                if self.pos.x <= 0.0 {
                    self.direction = 1.0;
                } else if self.pos.x + self.size.x >= field.width {
                    self.direction = -1.0;
                }
            }
        }
    }

    /// Cooldown elapsed and room for a full volley under `bullet_cap`
    pub fn ready_to_fire(
        &self,
        now_ms: f64,
        tuning: &Tuning,
        bullets: usize,
        bullet_cap: usize,
    ) -> bool {
        let cooled = match self.last_fire_ms {
            Some(last) => now_ms - last > tuning.boss_fire_cooldown_ms,
            None => true,
        };
        cooled && bullets + BOSS_VOLLEY <= bullet_cap
    }

    /// Fire the spread from the bottom-center of the hull
    pub fn fire(&mut self, now_ms: f64, tuning: &Tuning) -> [Bullet; BOSS_VOLLEY] {
        self.last_fire_ms = Some(now_ms);
        let from = Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y);
        let drift = tuning.boss_bullet_drift;
        [
            Bullet::enemy_shot(from, -drift, tuning),
            Bullet::enemy_shot(from, 0.0, tuning),
            Bullet::enemy_shot(from, drift, tuning),
        ]
    }

    /// Take one hit; returns true when destroyed
    pub fn hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hp == 0
    }
}

// === Particles ===

/// A cosmetic particle (explosion debris or bullet trail)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub tint: Tint,
    /// 1 -> 0, removed at 0
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
    pub size: f32,
    /// Size multiplier per frame
    pub shrink: f32,
}

impl Particle {
    /// Debris flung in a random direction at up to `speed`
    pub fn burst(origin: Vec2, tint: Tint, speed: f32, size: f32, rng: &mut impl Rng) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let velocity = rng.random::<f32>() * speed;
        Self {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * velocity,
            tint,
            life: 1.0,
            decay: rng.random::<f32>() * 0.03 + 0.01,
            size,
            shrink: 0.95,
        }
    }

    /// Short-lived glow left behind a player bullet
    pub fn trail(origin: Vec2, tint: Tint, rng: &mut impl Rng) -> Self {
        Self {
            pos: origin,
            vel: Vec2::new(0.0, 2.0),
            tint,
            life: 1.0,
            decay: 0.05,
            size: rng.random::<f32>() * 5.0 + 2.0,
            shrink: 0.9,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        let frames = per_frame(1.0, dt);
        self.pos += self.vel * frames;
        self.life -= self.decay * frames;
        self.size *= decay_per_frame(self.shrink, dt);
    }

    pub fn alive(&self) -> bool {
        self.life > 0.0
    }
}
