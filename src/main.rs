//! Plankton Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, TouchEvent};

    use plankton_dash::Tuning;
    use plankton_dash::consts::*;
    use plankton_dash::platform::is_activate_key;
    use plankton_dash::renderer::DomRenderer;
    use plankton_dash::sim::{GameState, Metrics, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: DomRenderer,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        /// Run simulation ticks for the elapsed frame time
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.activate = false;
            }
        }

        /// Reconcile the page with the current frame
        fn render(&mut self) {
            if let Err(e) = self.renderer.render(&self.state) {
                log::warn!("Render error: {e:?}");
            }
        }

        /// Re-measure the playfield and recompute layout metrics
        fn resize_to_playfield(&mut self) {
            let width = self.renderer.playfield().client_width() as f32;
            let height = self.renderer.playfield().client_height() as f32;
            self.state.resize(width, height);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Plankton Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let renderer = DomRenderer::new(document)?;
        let width = renderer.playfield().client_width() as f32;
        let height = renderer.playfield().client_height() as f32;

        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        // write the knobs back so they are visible and editable in LocalStorage
        tuning.save();
        let state = GameState::new(seed, Metrics::new(width, height), tuning);
        log::info!("Session initialized with seed: {seed}");

        let game = Rc::new(RefCell::new(Game {
            state,
            renderer,
            accumulator: 0.0,
            last_time: 0.0,
            input: TickInput::default(),
        }));

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Plankton Dash running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Keyboard: the single activate action (jump, or restart after game over)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if is_activate_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().input.activate = true;
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch anywhere maps to the same action
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.activate = true;
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clicking the game-over indicator restarts as well
        if let Some(el) = document.get_element_by_id("game-over") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.activate = true;
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Viewport resize recomputes layout metrics
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize_to_playfield();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        web_sys::console::error_1(&e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Plankton Dash (native) starting...");
    log::info!("Native mode is a headless smoke run - use `trunk serve` for the web version");

    smoke_run();
}

/// Drive a short scripted session and report the outcome
#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use plankton_dash::Tuning;
    use plankton_dash::sim::{GamePhase, GameState, Metrics, TickInput, tick};

    let mut state = GameState::new(0xC0FFEE, Metrics::new(800.0, 400.0), Tuning::default());

    // hop roughly once a second until collision, capped at one simulated minute
    for i in 0..3750u32 {
        let input = TickInput {
            activate: i % 60 == 0,
        };
        tick(&mut state, &input);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "Smoke run: score {} after {} ticks ({:?})",
        state.score, state.time_ticks, state.phase
    );
}
