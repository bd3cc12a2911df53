//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision;
use super::entity::{Bullet, BulletOrigin, Particle, Tint};
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState, push_capped};
use crate::consts::{MAX_BULLETS, MAX_TRAILS};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional intent, each axis in `[-1, 1]` (+y is down)
    pub movement: Vec2,
    /// Fire button held
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - AI flies the ship
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        input.movement = autopilot_intent(state);
        input.fire = true;
    }

    state.time_ticks += 1;
    state.clock_ms += dt as f64 * 1000.0;
    state.shake.decay();

    // Player
    state.player.advance(input.movement, &state.field, dt);
    if input.fire
        && state.player.can_fire(state.clock_ms, &state.tuning)
        && state.bullets.len() < MAX_BULLETS
    {
        let shot = Bullet::player_shot(state.player.muzzle(), &state.tuning);
        state.bullets.push(shot);
        state.player.mark_shot(state.clock_ms, &state.tuning);
        state.events.push(GameEvent::Shoot);
    }

    spawner::step(state, dt);

    // Bullets and their trails
    for bullet in &mut state.bullets {
        bullet.advance(&state.field, dt);
        if bullet.alive && bullet.origin == BulletOrigin::Player {
            let trail = Particle::trail(bullet.tail(), Tint::PlayerShot, &mut state.rng);
            push_capped(&mut state.trails, trail, MAX_TRAILS);
        }
    }
    for trail in &mut state.trails {
        trail.advance(dt);
    }

    // Boss
    if let Some(boss) = &mut state.boss {
        boss.advance(&state.field, &state.tuning, dt);
        if boss.ready_to_fire(state.clock_ms, &state.tuning, state.bullets.len(), MAX_BULLETS) {
            let volley = boss.fire(state.clock_ms, &state.tuning);
            state.bullets.extend(volley);
            state.events.push(GameEvent::BossFired);
        }
    }

    for enemy in &mut state.enemies {
        enemy.advance(&state.field, dt);
    }
    for particle in &mut state.particles {
        particle.advance(dt);
    }
    for powerup in &mut state.powerups {
        powerup.advance(&state.field, dt);
    }

    collision::resolve(state);

    // Cleanup
    state.bullets.retain(|b| b.alive);
    state.enemies.retain(|e| e.alive);
    state.powerups.retain(|p| p.alive);
    state.particles.retain(|p| p.alive());
    state.trails.retain(|p| p.alive());
}

/// Steering for demo mode
///
/// Lines up under the lowest enemy (or the boss) and sidesteps any enemy
/// bullet about to land on the ship.
fn autopilot_intent(state: &GameState) -> Vec2 {
    let hull = state.player.bounds();
    let center = hull.center();

    let threat = state
        .bullets
        .iter()
        .filter(|b| b.alive && b.origin == BulletOrigin::Enemy)
        .filter(|b| b.pos.y < hull.bottom() && hull.y - b.pos.y < 150.0)
        .find(|b| (b.pos.x - center.x).abs() < hull.width);
    if let Some(bullet) = threat {
        let away = if bullet.pos.x > center.x { -1.0 } else { 1.0 };
        return Vec2::new(away, 0.0);
    }

    let target = state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.center().x)
        .or_else(|| state.boss.as_ref().map(|b| b.center().x));

    // Drift back toward the lower third when idle
    let dy = if center.y < state.field.height * 0.7 { 1.0 } else { 0.0 };
    let dx = match target {
        Some(x) if (x - center.x).abs() > 4.0 => (x - center.x).signum(),
        _ => 0.0,
    };
    Vec2::new(dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_PARTICLES, MAX_POWERUPS, SIM_DT};
    use crate::sim::entity::{Boss, Enemy, EnemyKind, Field};
    use crate::tuning::Tuning;

    fn state(seed: u64) -> GameState {
        GameState::new(seed, Field::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_tick_fires_with_cooldown() {
        let mut state = state(12345);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.drain_events().contains(&GameEvent::Shoot));

        // 150 ms cooldown spans nine more frames
        for _ in 0..8 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &input, SIM_DT);
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.bullets.len(), 2);
        assert!(!state.trails.is_empty());
    }

    #[test]
    fn test_tick_moves_player() {
        let mut state = state(1);
        let start = state.player.pos;
        let input = TickInput {
            movement: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!((state.player.pos.x - (start.x + 7.0)).abs() < 1e-3);
        assert_eq!(state.player.pos.y, start.y);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = state(12345);
        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let ticks = state.time_ticks;

        // Nothing advances while paused
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_tick_ignored_after_game_over() {
        let mut state = state(3);
        state.end_game();
        let before = state.clock_ms;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.clock_ms, before);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_enemies_spawn_over_time() {
        let mut state = state(8);
        for _ in 0..61 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_escaped_enemy_is_harmless() {
        let mut state = state(4);
        let mut enemy = Enemy::new(EnemyKind::Basic, 0.0, 5.0, 0.0);
        enemy.pos.y = 598.0;
        state.enemies.push(enemy);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.health, 100);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_boss_volley_needs_room() {
        let mut state = state(6);
        let mut boss = Boss::spawn(&state.field, 1, &state.tuning);
        boss.pos.y = 10.0;
        state.boss = Some(boss);
        for _ in 0..48 {
            let mut b = Bullet::player_shot(Vec2::new(10.0, 300.0), &state.tuning);
            b.vel = Vec2::ZERO;
            state.bullets.push(b);
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.bullets.len(), 48);
        assert!(!state.events.contains(&GameEvent::BossFired));

        state.bullets.truncate(47);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.bullets.len(), 50);
        assert!(state.events.contains(&GameEvent::BossFired));
    }

    #[test]
    fn test_autopilot_scores_within_caps() {
        let mut state = state(2024);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1800 {
            tick(&mut state, &input, SIM_DT);
            assert!(state.bullets.len() <= MAX_BULLETS);
            assert!(state.particles.len() <= MAX_PARTICLES);
            assert!(state.powerups.len() <= MAX_POWERUPS);
            assert!(state.trails.len() <= MAX_TRAILS);
        }
        assert!(state.score() > 0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = state(99999);
        let mut state2 = state(99999);

        let inputs = [
            TickInput {
                movement: Vec2::new(-1.0, 0.0),
                fire: true,
                ..Default::default()
            },
            TickInput {
                autopilot: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in inputs.iter().cycle().take(900) {
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score(), state2.score());
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.drain_events(), state2.drain_events());
    }
}
