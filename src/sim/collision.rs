//! Collision detection and response
//!
//! Six passes run in a fixed order every tick. Each pass mutates state
//! immediately and records events. A bullet is marked dead on its first hit
//! and every later pass skips dead bullets, so one bullet scores one hit.

use super::entity::{BulletOrigin, PowerUpKind, Tint};
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState};

/// Particles for a bullet striking the player
const HIT_SPARKS: usize = 10;
/// Particles for ramming the boss
const BOSS_CONTACT_DEBRIS: usize = 30;
/// Particles for the boss going down
const BOSS_DEATH_DEBRIS: usize = 100;

/// Resolve every collision for this tick
///
/// Stops early once the run ends.
pub fn resolve(state: &mut GameState) {
    let passes: [fn(&mut GameState); 6] = [
        enemy_bullets_vs_player,
        enemies_vs_player,
        player_bullets_vs_enemies,
        powerups_vs_player,
        boss_vs_player,
        player_bullets_vs_boss,
    ];
    for pass in passes {
        if state.phase != GamePhase::Playing {
            return;
        }
        pass(state);
    }
}

/// Damage the player; ends the run at zero health
fn damage_player(state: &mut GameState, amount: u8) {
    if state.player.take_damage(amount) {
        state.end_game();
    }
}

/// 1. Enemy bullets against the (inset) player hull
pub fn enemy_bullets_vs_player(state: &mut GameState) {
    let hull = state.player.bounds().inset(state.tuning.player_bullet_inset);
    for i in 0..state.bullets.len() {
        let bullet = &state.bullets[i];
        if !bullet.alive || bullet.origin != BulletOrigin::Enemy {
            continue;
        }
        if !bullet.bounds().overlaps(&hull) {
            continue;
        }
        let at = bullet.pos;
        state.bullets[i].alive = false;
        state.explode(at, Tint::EnemyShot, HIT_SPARKS);
        state.shake.start(10.0, 10);
        state.events.push(GameEvent::Hit);
        let damage = state.tuning.enemy_bullet_damage;
        damage_player(state, damage);
        if state.phase != GamePhase::Playing {
            return;
        }
    }
}

/// 2. Enemies ramming the player
pub fn enemies_vs_player(state: &mut GameState) {
    let hull = state.player.bounds();
    for i in 0..state.enemies.len() {
        let enemy = &state.enemies[i];
        if !enemy.alive || !enemy.bounds().overlaps(&hull) {
            continue;
        }
        let (at, tint) = (enemy.center(), enemy.kind.tint());
        state.enemies[i].alive = false;
        let count = state.tuning.explosion_particles;
        state.explode(at, tint, count);
        state.events.push(GameEvent::Hit);
        let damage = state.tuning.enemy_contact_damage;
        damage_player(state, damage);
        if state.phase != GamePhase::Playing {
            return;
        }
    }
}

/// 3. Player bullets against enemies
pub fn player_bullets_vs_enemies(state: &mut GameState) {
    for e in 0..state.enemies.len() {
        for b in 0..state.bullets.len() {
            if !state.enemies[e].alive {
                break;
            }
            let bullet = &state.bullets[b];
            if !bullet.alive || bullet.origin != BulletOrigin::Player {
                continue;
            }
            if !bullet.bounds().overlaps(&state.enemies[e].bounds()) {
                continue;
            }
            state.bullets[b].alive = false;
            if state.enemies[e].hit() {
                state.enemies[e].alive = false;
                let enemy = &state.enemies[e];
                let (at, kind) = (enemy.center(), enemy.kind);
                kill_enemy(state, at, kind);
            } else {
                state.events.push(GameEvent::Hit);
            }
        }
    }
}

fn kill_enemy(state: &mut GameState, at: glam::Vec2, kind: super::entity::EnemyKind) {
    let count = state.tuning.explosion_particles;
    state.explode(at, kind.tint(), count);
    state.events.push(GameEvent::Explosion { large: false });

    let award = state.credit_kill(kind.score_value());
    if award.combo > 1 {
        log::debug!("Combo x{} (+{})", award.combo, award.bonus);
    }

    spawner::roll_drop(state, at);
}

/// 4. Power-up pickups
pub fn powerups_vs_player(state: &mut GameState) {
    let hull = state.player.bounds();
    for i in 0..state.powerups.len() {
        let powerup = &state.powerups[i];
        if !powerup.alive || !powerup.bounds().overlaps(&hull) {
            continue;
        }
        let kind = powerup.kind;
        state.powerups[i].alive = false;
        match kind {
            PowerUpKind::Health => state.player.heal(state.tuning.heal_amount),
            PowerUpKind::RapidFire => state
                .player
                .activate_rapid_fire(state.tuning.rapid_fire_duration_ms),
        }
        state.events.push(GameEvent::PowerUpCollected { kind });
    }
}

/// 5. Player touching the boss hull (damages every tick of contact)
pub fn boss_vs_player(state: &mut GameState) {
    let Some(boss) = &state.boss else { return };
    if !boss.bounds().overlaps(&state.player.bounds()) {
        return;
    }
    let at = boss.center();
    state.explode(at, Tint::Boss, BOSS_CONTACT_DEBRIS);
    state.shake.start(20.0, 20);
    state.events.push(GameEvent::Explosion { large: true });
    let damage = state.tuning.boss_contact_damage;
    damage_player(state, damage);
}

/// 6. Player bullets against the boss
pub fn player_bullets_vs_boss(state: &mut GameState) {
    for b in 0..state.bullets.len() {
        let Some(boss) = &mut state.boss else { return };
        let bullet = &state.bullets[b];
        if !bullet.alive || bullet.origin != BulletOrigin::Player {
            continue;
        }
        if !bullet.bounds().overlaps(&boss.bounds()) {
            continue;
        }
        state.bullets[b].alive = false;
        if boss.hit() {
            let at = boss.center();
            state.boss = None;
            defeat_boss(state, at);
        } else {
            state.events.push(GameEvent::Hit);
        }
    }
}

fn defeat_boss(state: &mut GameState, at: glam::Vec2) {
    state.explode(at, Tint::Boss, BOSS_DEATH_DEBRIS);
    state.shake.start(30.0, 40);
    state.events.push(GameEvent::BossDefeated);
    state.spawner.on_boss_defeated(&state.tuning);

    let award = state.credit_kill(state.tuning.boss_kill_score);
    log::info!(
        "Boss defeated, next boss at {} (combo x{})",
        state.spawner.boss_threshold,
        award.combo
    );
    // A level-up already celebrated
    if award.level_up.is_none() {
        state.celebrate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Boss, Bullet, Enemy, EnemyKind, Field, PowerUp};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(5, Field::new(800.0, 600.0), Tuning::default())
    }

    /// Enemy whose hull is centered on `center`
    fn enemy_at(kind: EnemyKind, center: Vec2) -> Enemy {
        let mut e = Enemy::new(kind, 0.0, 0.0, 0.0);
        let half = kind.size() / 2.0;
        e.pos = center - Vec2::splat(half);
        e
    }

    fn player_shot_at(state: &GameState, center: Vec2) -> Bullet {
        let mut b = Bullet::player_shot(Vec2::ZERO, &state.tuning);
        b.pos = center;
        b
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut s = state();
        let center = s.player.bounds().center();
        let mut shot = Bullet::enemy_shot(Vec2::ZERO, 0.0, &s.tuning);
        shot.pos = center;
        s.bullets.push(shot);
        resolve(&mut s);
        assert_eq!(s.player.health, 90);
        assert!(!s.bullets[0].alive);
        assert!(s.shake.active());
        assert_eq!(s.particles.len(), HIT_SPARKS);
    }

    #[test]
    fn test_enemy_bullets_do_not_hurt_enemies() {
        let mut s = state();
        let target = Vec2::new(100.0, 100.0);
        s.enemies.push(enemy_at(EnemyKind::Basic, target));
        let mut shot = Bullet::enemy_shot(Vec2::ZERO, 0.0, &s.tuning);
        shot.pos = target;
        s.bullets.push(shot);
        resolve(&mut s);
        assert!(s.enemies[0].alive);
        assert!(s.bullets[0].alive);
    }

    #[test]
    fn test_ramming_enemy_costs_twenty() {
        let mut s = state();
        let center = s.player.bounds().center();
        s.enemies.push(enemy_at(EnemyKind::Basic, center));
        resolve(&mut s);
        assert_eq!(s.player.health, 80);
        assert!(!s.enemies[0].alive);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_kill_awards_score_and_combo() {
        let mut s = state();
        let target = Vec2::new(200.0, 100.0);
        s.enemies.push(enemy_at(EnemyKind::Fast, target));
        s.bullets.push(player_shot_at(&s, target));
        resolve(&mut s);
        assert!(!s.enemies[0].alive);
        // 200 base + 50 combo bonus
        assert_eq!(s.score(), 250);
        assert_eq!(s.scoring.combo, 1);
        assert!(s.events.contains(&GameEvent::Explosion { large: false }));
    }

    #[test]
    fn test_tank_takes_three_hits() {
        let mut s = state();
        let target = Vec2::new(300.0, 100.0);
        s.enemies.push(enemy_at(EnemyKind::Tank, target));
        for _ in 0..2 {
            s.bullets.push(player_shot_at(&s, target));
        }
        resolve(&mut s);
        assert!(s.enemies[0].alive);
        assert_eq!(s.enemies[0].hp, 1);
        assert_eq!(s.score(), 0);
        s.bullets.push(player_shot_at(&s, target));
        resolve(&mut s);
        assert!(!s.enemies[0].alive);
        assert_eq!(s.score(), 350);
    }

    #[test]
    fn test_bullet_hits_only_once() {
        let mut s = state();
        let target = Vec2::new(400.0, 100.0);
        // Two overlapping enemies and one bullet through both
        s.enemies.push(enemy_at(EnemyKind::Basic, target));
        s.enemies.push(enemy_at(EnemyKind::Basic, target));
        s.bullets.push(player_shot_at(&s, target));
        resolve(&mut s);
        let dead = s.enemies.iter().filter(|e| !e.alive).count();
        assert_eq!(dead, 1);
        assert_eq!(s.score(), 150);
    }

    #[test]
    fn test_bullet_spent_on_enemy_skips_boss() {
        let mut s = state();
        let mut boss = Boss::spawn(&s.field, 1, &s.tuning);
        boss.pos = Vec2::new(300.0, 50.0);
        let target = boss.center();
        s.boss = Some(boss);
        s.enemies.push(enemy_at(EnemyKind::Basic, target));
        s.bullets.push(player_shot_at(&s, target));
        resolve(&mut s);
        let boss = s.boss.as_ref().unwrap();
        assert_eq!(boss.hp, boss.max_hp);
    }

    #[test]
    fn test_pickups_apply_effects() {
        let mut s = state();
        s.player.health = 90;
        let center = s.player.bounds().center();
        s.powerups.push(PowerUp::new(center, PowerUpKind::Health, &s.tuning));
        s.powerups.push(PowerUp::new(center, PowerUpKind::RapidFire, &s.tuning));
        resolve(&mut s);
        assert_eq!(s.player.health, 100);
        assert!(s.player.rapid_fire());
        assert!(s.powerups.iter().all(|p| !p.alive));
    }

    #[test]
    fn test_boss_contact_damage() {
        let mut s = state();
        let mut boss = Boss::spawn(&s.field, 1, &s.tuning);
        boss.pos = s.player.pos - Vec2::new(50.0, 20.0);
        s.boss = Some(boss);
        resolve(&mut s);
        assert_eq!(s.player.health, 70);
        assert_eq!(s.shake.intensity, 20.0);
    }

    #[test]
    fn test_boss_defeat() {
        let mut s = state();
        s.scoring.score = 3200;
        s.scoring.level = 4;
        let mut boss = Boss::spawn(&s.field, 4, &s.tuning);
        boss.pos = Vec2::new(300.0, 50.0);
        boss.hp = 1;
        let target = boss.center();
        s.boss = Some(boss);
        s.bullets.push(player_shot_at(&s, target));
        resolve(&mut s);
        assert!(s.boss.is_none());
        assert_eq!(s.score(), 3200 + 5000 + 50);
        assert_eq!(s.spawner.boss_threshold, 8000);
        assert_eq!(s.level(), 9);
        assert!(s.events.contains(&GameEvent::BossDefeated));
    }

    #[test]
    fn test_game_over_stops_later_passes() {
        let mut s = state();
        s.player.health = 15;
        let center = s.player.bounds().center();
        s.enemies.push(enemy_at(EnemyKind::Basic, center));
        s.powerups.push(PowerUp::new(center, PowerUpKind::Health, &s.tuning));
        resolve(&mut s);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.player.health, 0);
        // Pickup pass never ran
        assert!(s.powerups[0].alive);
    }
}
