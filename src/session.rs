//! Game session: lifecycle, fixed-step accumulator and high score recording
//!
//! The session is the only thing front ends talk to. It owns the current
//! run, turns variable frame times into fixed ticks and writes the high score
//! back to storage when a run ends.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{Field, GameEvent, GamePhase, GameState, TickInput, tick};
use crate::snapshot::{FrameSnapshot, HudSnapshot};
use crate::tuning::Tuning;

/// Longest frame the accumulator will absorb (tab switches, debugger stops)
const MAX_FRAME_DT: f32 = 0.25;

pub struct Session<S: KeyValueStore> {
    state: GameState,
    store: S,
    high_score: HighScore,
    settings: Settings,
    tuning: Tuning,
    accumulator: f32,
}

impl<S: KeyValueStore> Session<S> {
    /// Load persisted values and sit on the title screen
    pub fn new(store: S, field: Field, tuning: Tuning) -> Self {
        let high_score = HighScore::load(&store);
        let settings = Settings::load(&store);
        let mut state = GameState::new(0, field, tuning.clone()).with_high_score(high_score.best);
        state.phase = GamePhase::Idle;
        Self {
            state,
            store,
            high_score,
            settings,
            tuning,
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace and persist the player's preferences
    pub fn set_settings(&mut self, settings: Settings) {
        settings.save(&mut self.store);
        self.settings = settings;
    }

    /// Throw away the current run and start a fresh one
    pub fn start_new_game(&mut self, seed: u64) {
        let field = self.state.field;
        self.state =
            GameState::new(seed, field, self.tuning.clone()).with_high_score(self.high_score.best);
        self.accumulator = 0.0;
        log::info!("New game (seed {}), best {}", seed, self.high_score.best);
    }

    /// Playing <-> Paused; ignored in any other phase
    pub fn toggle_pause(&mut self) -> bool {
        let changed = self.state.toggle_pause();
        if changed {
            self.accumulator = 0.0;
            log::info!("Phase -> {:?}", self.state.phase);
        }
        changed
    }

    /// Leave the game over screen for the title screen
    pub fn acknowledge_game_over(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            return false;
        }
        self.state.phase = GamePhase::Idle;
        true
    }

    /// Viewport changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            log::warn!("Ignoring bogus viewport {}x{}", width, height);
            return;
        }
        self.state.resize(Field::new(width, height));
    }

    /// Advance by a frame of `frame_dt` seconds
    ///
    /// Runs as many fixed ticks as the accumulator allows (capped), and
    /// returns the events they produced. A pause request is handled once,
    /// before any tick.
    pub fn update(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        let mut input = input.clone();
        if input.pause {
            self.toggle_pause();
            input.pause = false;
        }

        if self.state.phase == GamePhase::Playing {
            let dt = if frame_dt.is_finite() {
                frame_dt.clamp(0.0, MAX_FRAME_DT)
            } else {
                0.0
            };
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
                if self.state.phase != GamePhase::Playing {
                    self.accumulator = 0.0;
                    break;
                }
            }
            if substeps == MAX_SUBSTEPS {
                // Behind; drop the backlog rather than spiral
                self.accumulator = self.accumulator.min(SIM_DT);
            }
        }

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score, .. } = *event {
                self.high_score.record(score, &mut self.store);
            }
        }
        events
    }

    pub fn frame_snapshot(&self) -> FrameSnapshot {
        let mut frame = FrameSnapshot::capture(
            &self.state,
            self.settings.effective_screen_shake(),
            self.settings.effective_recoil(),
        );
        if !self.settings.particles {
            frame.particles.clear();
            frame.trails.clear();
        }
        frame
    }

    pub fn hud_snapshot(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::{Enemy, EnemyKind};
    use glam::Vec2;

    fn session() -> Session<MemoryStore> {
        Session::new(MemoryStore::new(), Field::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_starts_idle() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(s.update(1.0, &TickInput::default()).is_empty());
        assert_eq!(s.state().time_ticks, 0);
    }

    #[test]
    fn test_accumulator_runs_fixed_ticks() {
        let mut s = session();
        s.start_new_game(1);
        s.update(SIM_DT * 3.5, &TickInput::default());
        assert_eq!(s.state().time_ticks, 3);
        s.update(SIM_DT * 0.6, &TickInput::default());
        assert_eq!(s.state().time_ticks, 4);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut s = session();
        s.start_new_game(1);
        s.update(5.0, &TickInput::default());
        assert_eq!(s.state().time_ticks, MAX_SUBSTEPS as u64);
        s.update(f32::NAN, &TickInput::default());
        assert!(s.state().time_ticks <= MAX_SUBSTEPS as u64 + 1);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let mut s = session();
        s.start_new_game(1);
        assert!(s.toggle_pause());
        s.update(0.1, &TickInput::default());
        assert_eq!(s.state().time_ticks, 0);

        let resume = TickInput {
            pause: true,
            ..Default::default()
        };
        s.update(SIM_DT * 1.5, &resume);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.state().time_ticks, 1);
    }

    #[test]
    fn test_game_over_records_once() {
        let mut s = session();
        s.start_new_game(1);
        s.state.scoring.score = 2500;
        s.state.player.health = 15;
        let center = s.state.player.bounds().center();
        let mut enemy = Enemy::new(EnemyKind::Basic, 0.0, 0.0, 0.0);
        enemy.pos = center - Vec2::splat(20.0);
        s.state.enemies.push(enemy);

        let events = s.update(SIM_DT * 2.5, &TickInput::default());
        let overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.high_score(), 2500);
        assert_eq!(HighScore::load(s.store()).best, 2500);

        assert!(s.update(1.0, &TickInput::default()).is_empty());
        assert!(s.acknowledge_game_over());
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(!s.acknowledge_game_over());
    }

    #[test]
    fn test_new_game_uses_saved_best() {
        let mut store = MemoryStore::new();
        store.set_item(HighScore::STORAGE_KEY, "7000");
        let mut s = Session::new(store, Field::new(800.0, 600.0), Tuning::default());
        s.start_new_game(2);
        assert_eq!(s.hud_snapshot().high_score, 7000);
        assert_eq!(s.hud_snapshot().score, 0);
    }

    #[test]
    fn test_particles_setting_hides_debris() {
        let mut s = session();
        s.start_new_game(1);
        s.state.explode(Vec2::new(100.0, 100.0), crate::sim::Tint::Basic, 10);
        assert_eq!(s.frame_snapshot().particles.len(), 10);
        s.set_settings(Settings {
            particles: false,
            ..Default::default()
        });
        assert!(s.frame_snapshot().particles.is_empty());
        assert_eq!(Settings::load(s.store()), *s.settings());
    }

    #[test]
    fn test_shake_off_keeps_recoil() {
        let mut s = session();
        s.start_new_game(1);
        s.set_settings(Settings {
            screen_shake: false,
            reduced_motion: false,
            ..Default::default()
        });
        let tuning = s.state.tuning.clone();
        s.state.player.mark_shot(0.0, &tuning);
        s.state.shake.start(10.0, 10);
        let frame = s.frame_snapshot();
        assert_eq!(frame.shake, 0.0);
        assert_eq!(frame.player.pos.y, s.state().player.pos.y + 3.0);

        s.set_settings(Settings {
            reduced_motion: true,
            ..Default::default()
        });
        assert_eq!(s.frame_snapshot().player.pos, s.state().player.pos);
    }

    #[test]
    fn test_bogus_resize_ignored() {
        let mut s = session();
        s.resize(f32::NAN, 100.0);
        s.resize(0.0, 100.0);
        assert_eq!(s.state().field, Field::new(800.0, 600.0));
        s.resize(400.0, 300.0);
        assert_eq!(s.state().field, Field::new(400.0, 300.0));
    }
}
