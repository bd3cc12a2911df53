//! End-to-end gameplay scenarios driven through the public API

use glam::Vec2;
use neon_defender::consts::SIM_DT;
use neon_defender::highscores::HighScore;
use neon_defender::persistence::{KeyValueStore, MemoryStore};
use neon_defender::sim::collision::resolve;
use neon_defender::sim::{
    Boss, Bullet, Enemy, EnemyKind, Field, GameEvent, GamePhase, GameState, TickInput, tick,
};
use neon_defender::{Session, Tuning};

fn field() -> Field {
    Field::new(800.0, 600.0)
}

fn enemy_at(kind: EnemyKind, center: Vec2) -> Enemy {
    let mut e = Enemy::new(kind, 0.0, 0.0, 0.0);
    e.pos = center - Vec2::splat(kind.size() / 2.0);
    e
}

fn player_shot_at(state: &GameState, center: Vec2) -> Bullet {
    let mut b = Bullet::player_shot(Vec2::ZERO, &state.tuning);
    b.pos = center;
    b
}

#[test]
fn test_kill_crosses_level_boundary() {
    let mut s = GameState::new(1, field(), Tuning::default());
    s.scoring.score = 950;
    let center = Vec2::new(400.0, 200.0);
    s.enemies.push(enemy_at(EnemyKind::Basic, center));
    s.bullets.push(player_shot_at(&s, center));

    resolve(&mut s);

    // 100 for the kill plus the first combo step
    assert_eq!(s.score(), 1100);
    assert_eq!(s.level(), 2);
    assert_eq!(s.spawner.interval_ms, 800.0);
    assert!(s.events.contains(&GameEvent::LevelUp { level: 2 }));
}

#[test]
fn test_fatal_ram_ends_game_once() {
    let mut s = GameState::new(1, field(), Tuning::default());
    s.player.health = 15;
    let center = s.player.bounds().center();
    s.enemies.push(enemy_at(EnemyKind::Basic, center));
    s.enemies.push(enemy_at(EnemyKind::Fast, center));

    resolve(&mut s);
    tick(&mut s, &TickInput::default(), SIM_DT);

    let game_overs = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .count();
    assert_eq!(game_overs, 1);
    assert_eq!(s.phase, GamePhase::GameOver);
    assert_eq!(s.player.health, 0);
}

#[test]
fn test_boss_threshold_moves_after_kill() {
    let tuning = Tuning {
        boss_threshold_step: 20_000,
        ..Tuning::default()
    };
    let mut s = GameState::new(1, field(), tuning);
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
    assert_eq!(s.spawner.boss_threshold, 23_000);

    let idle = TickInput::default();
    for _ in 0..30 {
        tick(&mut s, &idle, SIM_DT);
    }
    assert!(s.boss.is_none());

    s.scoring.score = 23_000;
    tick(&mut s, &idle, SIM_DT);
    assert!(s.boss.is_some());
    assert!(s.drain_events().contains(&GameEvent::BossSpawned));
}

/// A one-lane field where enemies always line up with the ship
fn gauntlet_session(store: MemoryStore) -> Session<MemoryStore> {
    let tuning = Tuning {
        spawn_interval_base_ms: 100.0,
        spawn_interval_step_ms: 0.0,
        spawn_interval_floor_ms: 100.0,
        powerup_drop_chance: 0.0,
        ..Tuning::default()
    };
    Session::new(store, Field::new(60.0, 600.0), tuning)
}

#[test]
fn test_high_score_persists_across_sessions() {
    let mut session = gauntlet_session(MemoryStore::new());
    session.start_new_game(9);
    let input = TickInput {
        fire: true,
        ..Default::default()
    };

    let mut game_overs = 0;
    for _ in 0..3600 {
        for event in session.update(SIM_DT, &input) {
            if matches!(event, GameEvent::GameOver { .. }) {
                game_overs += 1;
            }
        }
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(game_overs, 1);
    let score = session.state().score();
    assert!(score > 0);
    assert_eq!(session.high_score(), score);
    assert_eq!(
        session.store().get_item(HighScore::STORAGE_KEY),
        Some(score.to_string())
    );

    // Later frames neither re-end the run nor touch the record
    assert!(session.update(SIM_DT, &input).is_empty());

    let mut store = MemoryStore::new();
    store.set_item(HighScore::STORAGE_KEY, &score.to_string());
    let reloaded = gauntlet_session(store);
    assert_eq!(reloaded.high_score(), score);
    assert_eq!(reloaded.hud_snapshot().high_score, score);
}

#[test]
fn test_lower_score_keeps_old_record() {
    let mut store = MemoryStore::new();
    store.set_item(HighScore::STORAGE_KEY, "999999");
    let mut session = gauntlet_session(store);
    session.start_new_game(9);

    let input = TickInput::default();
    for _ in 0..3600 {
        session.update(SIM_DT, &input);
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.high_score(), 999_999);
    assert_eq!(
        session.store().get_item(HighScore::STORAGE_KEY).as_deref(),
        Some("999999")
    );
}
