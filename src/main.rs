//! Neon Defender entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use neon_defender::audio::{self, WebAudio};
    use neon_defender::consts::SIM_DT;
    use neon_defender::persistence::LocalStore;
    use neon_defender::platform::{Direction, InputState, Key};
    use neon_defender::renderer::{self, CanvasRenderer};
    use neon_defender::sim::{Field, GameEvent, GamePhase};
    use neon_defender::{Session, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStore>,
        renderer: CanvasRenderer,
        audio: WebAudio,
        input: InputState,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Phase shown by the DOM screens
        shown_phase: Option<GamePhase>,
    }

    impl Game {
        /// Run simulation ticks and play their sounds
        fn update(&mut self, dt: f32, time: f64) {
            let input = self.input.peek();
            self.input.clear_pause();

            let before = self.session.state().time_ticks;
            let events = self.session.update(dt, &input);
            if self.session.state().time_ticks != before {
                self.input.clear_fire();
            }

            audio::dispatch(&events, &mut self.audio);
            for event in &events {
                if let GameEvent::GameOver {
                    score,
                    new_record: true,
                    ..
                } = event
                {
                    log::info!("New high score: {}", score);
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            self.renderer.draw(&self.session.frame_snapshot(), time);
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let hud = self.session.hud_snapshot();

            set_text(document, "score-display", &hud.score.to_string());
            set_text(document, "level-display", &hud.level.to_string());
            set_text(document, "high-score-display", &hud.high_score.to_string());

            if let Some(el) = document.get_element_by_id("health-fill") {
                let (from, to) = renderer::health_gradient(hud.health);
                let style = format!(
                    "width: {}%; background: linear-gradient(90deg, {}, {})",
                    hud.health, from, to
                );
                let _ = el.set_attribute("style", &style);
            }

            // Combo only shows for a real streak
            if let Some(el) = document.get_element_by_id("combo-display") {
                match hud.combo {
                    Some(combo) => {
                        el.set_text_content(Some(&format!("x{} COMBO", combo)));
                        set_hidden(&el, false);
                    }
                    None => set_hidden(&el, true),
                }
            }

            if let Some(el) = document.get_element_by_id("fps-display") {
                if self.session.settings().show_fps {
                    el.set_text_content(Some(&format!("{} FPS", self.fps)));
                    set_hidden(&el, false);
                } else {
                    set_hidden(&el, true);
                }
            }

            // Screens only change on phase transitions
            if self.shown_phase == Some(hud.phase) {
                return;
            }
            self.shown_phase = Some(hud.phase);

            let screens = [
                ("start-screen", hud.phase == GamePhase::Idle),
                ("pause-screen", hud.phase == GamePhase::Paused),
                ("game-over-screen", hud.phase == GamePhase::GameOver),
                (
                    "game-ui",
                    matches!(hud.phase, GamePhase::Playing | GamePhase::Paused),
                ),
            ];
            for (id, visible) in screens {
                if let Some(el) = document.get_element_by_id(id) {
                    set_hidden(&el, !visible);
                }
            }
            if hud.phase == GamePhase::GameOver {
                set_text(document, "final-score-display", &hud.score.to_string());
            }
        }

        /// Pause and honor mute-on-blur when focus leaves; restore audio when it returns
        fn set_focused(&mut self, focused: bool, reason: &str) {
            let audio_settings = self.session.settings().for_focus(focused);
            self.audio.apply_settings(&audio_settings);
            if focused {
                return;
            }
            self.input.release_all();
            if self.session.phase() == GamePhase::Playing {
                self.session.toggle_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }

        fn start(&mut self) {
            self.audio.resume();
            self.input.release_all();
            let seed = js_sys::Date::now() as u64;
            self.session.start_new_game(seed);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(el: &Element, hidden: bool) {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
    }

    /// Viewport size in CSS pixels
    fn viewport() -> Option<(f32, f32)> {
        let window = web_sys::window()?;
        let w = window.inner_width().ok()?.as_f64()?;
        let h = window.inner_height().ok()?.as_f64()?;
        Some((w as f32, h as f32))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Defender starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let renderer = CanvasRenderer::new(&canvas).expect("no 2d context");

        let (width, height) = viewport().unwrap_or((
            neon_defender::consts::DEFAULT_FIELD_WIDTH,
            neon_defender::consts::DEFAULT_FIELD_HEIGHT,
        ));
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let session = Session::new(LocalStore::new(), Field::new(width, height), Tuning::default());
        let audio = WebAudio::new(session.settings());
        let game = Rc::new(RefCell::new(Game {
            session,
            renderer,
            audio,
            input: InputState::new(),
            last_time: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            shown_phase: None,
        }));

        setup_keyboard(game.clone());
        setup_touch_controls(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Neon Defender running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                if key == "i" || key == "I" {
                    g.input.autopilot = !g.input.autopilot;
                    log::info!("Autopilot: {}", g.input.autopilot);
                    return;
                }
                if key == "m" || key == "M" {
                    let mut settings = g.session.settings().clone();
                    settings.muted = !settings.muted;
                    g.audio.apply_settings(&settings);
                    g.session.set_settings(settings);
                    return;
                }
                if let Some(k) = Key::from_dom(&key) {
                    event.prevent_default();
                    g.input.key_down(k);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(k) = Key::from_dom(&event.key()) {
                    game.borrow_mut().input.key_up(k);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// On-screen buttons for touch devices (optional in the page)
    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            ("touch-left", Some(Direction::Left)),
            ("touch-right", Some(Direction::Right)),
            ("touch-up", Some(Direction::Up)),
            ("touch-down", Some(Direction::Down)),
            ("touch-fire", None),
        ];

        for (id, dir) in buttons {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            let phases = [("touchstart", true), ("touchend", false), ("touchcancel", false)];
            for (event_name, active) in phases {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    match dir {
                        Some(dir) => g.input.touch_direction(dir, active),
                        None => g.input.touch_fire(active),
                    }
                });
                let _ = el
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.session.acknowledge_game_over();
                    g.start();
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.toggle_pause();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some((w, h)) = viewport() {
                canvas.set_width(w as u32);
                canvas.set_height(h as u32);
                game.borrow_mut().session.resize(w, h);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible =
                    document_clone.visibility_state() != web_sys::VisibilityState::Hidden;
                game.borrow_mut().set_focused(visible, "tab hidden");
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside) and focus back
        for (event_name, focused) in [("blur", false), ("focus", true)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().set_focused(focused, "window blur");
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless demo: the autopilot plays one run and the best score is kept in
/// a JSON file next to the binary's working directory.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_defender::audio::{self, AudioHooks};
    use neon_defender::consts::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, FRAME_RATE, SIM_DT};
    use neon_defender::persistence::FileStore;
    use neon_defender::sim::{Field, GamePhase, TickInput};
    use neon_defender::{Session, Tuning};

    /// Counts what the sound system would have played
    #[derive(Default)]
    struct Tally {
        shots: u32,
        explosions: u32,
        powerups: u32,
        bosses: u32,
    }

    impl AudioHooks for Tally {
        fn on_shoot(&mut self) {
            self.shots += 1;
        }
        fn on_explosion(&mut self) {
            self.explosions += 1;
        }
        fn on_powerup(&mut self) {
            self.powerups += 1;
        }
        fn on_boss_spawn(&mut self) {
            self.bosses += 1;
        }
    }

    env_logger::init();
    log::info!("Neon Defender (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let minutes: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5.0);

    let tuning = match std::env::var("NEON_DEFENDER_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path).map(|json| Tuning::from_json(&json)) {
            Ok(Ok(tuning)) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Ok(Err(e)) => {
                log::warn!("Bad tuning file {}: {}", path, e);
                Tuning::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let save_path =
        std::env::var("NEON_DEFENDER_SAVE").unwrap_or_else(|_| "neon-defender-save.json".into());
    let store = FileStore::open(&save_path);
    let field = Field::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT);
    let mut session = Session::new(store, field, tuning);
    session.start_new_game(seed);

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut tally = Tally::default();
    let frames = (minutes.max(0.0) * 60.0 * FRAME_RATE) as u64;
    for _ in 0..frames {
        let events = session.update(SIM_DT, &input);
        audio::dispatch(&events, &mut tally);
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    if session.phase() == GamePhase::Playing {
        log::info!("Time limit reached, run not recorded");
    }

    let hud = session.hud_snapshot();
    println!(
        "seed {}: score {} level {} health {} (best {})",
        seed, hud.score, hud.level, hud.health, hud.high_score
    );
    println!(
        "{} shots, {} explosions, {} power-ups, {} bosses",
        tally.shots, tally.explosions, tally.powerups, tally.bosses
    );
    match serde_json::to_string(&hud) {
        Ok(json) => log::debug!("Final HUD: {}", json),
        Err(e) => log::warn!("Could not encode HUD: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
