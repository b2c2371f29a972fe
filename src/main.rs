//! Tower of Flags entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use flag_tower::persistence::LocalStorage;
    use flag_tower::platform;
    use flag_tower::quiz::{QuizEvent, QuizInput, QuizPhase, QuizState, tick};
    use flag_tower::renderer::{BoardSnapshot, ColumnLabels, TextLabels};
    use flag_tower::Tuning;

    /// Game instance holding all state
    struct Game {
        state: QuizState,
        input: QuizInput,
        labels: ColumnLabels<TextLabels>,
        /// Last snapshot, served to the JS renderer
        snapshot_json: String,
    }

    thread_local! {
        static GAME: RefCell<Option<Game>> = const { RefCell::new(None) };
    }

    impl Game {
        fn new(tuning: Tuning) -> Self {
            let now = platform::now_ms();
            let state = QuizState::new(Box::new(LocalStorage::open()), tuning, now, platform::entropy());
            Self {
                state,
                input: QuizInput::default(),
                labels: ColumnLabels::new(TextLabels::default()),
                snapshot_json: String::new(),
            }
        }

        /// Run one engine step and refresh the HUD
        fn frame(&mut self) {
            let now = platform::now_ms();
            let events = tick(&mut self.state, &self.input, now, platform::entropy());
            // Clear one-shot inputs after processing
            self.input.clear();

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            for event in &events {
                self.on_event(&document, event);
            }

            let snapshot = BoardSnapshot::capture(&self.state, now);
            self.update_hud(&document, &snapshot);
            self.snapshot_json = snapshot.to_json();
        }

        fn on_event(&mut self, document: &Document, event: &QuizEvent) {
            match event {
                QuizEvent::LevelStarted { index, seed, degraded } => {
                    log::info!("Level {} dealt (seed {seed}, degraded: {degraded})", index + 1);
                    self.labels.invalidate();
                    set_class(document, "campaign-complete", "hidden");
                }
                QuizEvent::CampaignComplete => {
                    set_class(document, "campaign-complete", "");
                }
                QuizEvent::Penalty { seconds } => {
                    if let Some(el) = document.get_element_by_id("penalty") {
                        el.set_text_content(Some(&format!("-{seconds:.0}s")));
                        let _ = el.set_attribute("class", "pop");
                    }
                }
                _ => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document, snapshot: &BoardSnapshot) {
            set_text(document, "level-title", &format!("{}. {}", snapshot.level.number, snapshot.level.title));
            set_text(document, "level-subtitle", snapshot.level.subtitle);
            set_text(document, "level-hint", snapshot.level.hint.unwrap_or(""));

            match &snapshot.timer {
                Some(timer) => {
                    set_text(document, "timer", &timer.text);
                    set_class(document, "timer", if timer.over_threshold { "warning" } else { "" });
                }
                None => set_class(document, "timer", "hidden"),
            }

            for column in self.labels.update(&snapshot.columns) {
                if let Some(text) = self.labels.image(column) {
                    set_text(document, &format!("column-label-{column}"), text);
                }
            }

            let (cleared, time_up) = match snapshot.phase {
                QuizPhase::Playing => ("hidden", "hidden"),
                QuizPhase::Cleared { .. } => ("", "hidden"),
                QuizPhase::TimeUp => ("hidden", ""),
            };
            set_class(document, "level-cleared", cleared);
            set_class(document, "time-up", time_up);
            if let QuizPhase::Cleared { time_ms, new_record } = snapshot.phase {
                let suffix = if new_record { " - new best!" } else { "" };
                set_text(document, "cleared-time", &format!("{}{suffix}", flag_tower::quiz::format_clock(time_ms, false)));
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_class(document: &Document, id: &str, class: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    /// Tuning overrides from `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .map(|json| Tuning::from_json(&json))
            .unwrap_or_default()
    }

    /// Column pick from the external 3D layer (raycast hit)
    #[wasm_bindgen]
    pub fn pick_column(column: usize) {
        GAME.with(|game| {
            if let Some(g) = game.borrow_mut().as_mut() {
                g.input.pick_column = Some(column);
            }
        });
    }

    /// Latest board snapshot as JSON for the 3D layer
    #[wasm_bindgen]
    pub fn snapshot_json() -> String {
        GAME.with(|game| {
            game.borrow()
                .as_ref()
                .map(|g| g.snapshot_json.clone())
                .unwrap_or_default()
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tower of Flags starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let tuning = load_tuning(&document);
        GAME.with(|game| *game.borrow_mut() = Some(Game::new(tuning)));

        setup_keyboard(&document);
        request_animation_frame();

        log::info!("Tower of Flags running!");
    }

    fn setup_keyboard(document: &Document) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            GAME.with(|game| {
                let mut game = game.borrow_mut();
                let Some(g) = game.as_mut() else {
                    return;
                };
                let key = event.key();
                match key.as_str() {
                    "1" | "2" | "3" | "4" | "5" => {
                        if let Ok(n) = key.parse::<usize>() {
                            g.input.pick_column = Some(n - 1);
                        }
                    }
                    "Enter" | " " => g.input.continue_play = true,
                    "r" | "R" => g.input.restart = true,
                    // Debug level navigation
                    "[" | "]" => {
                        let count = g.state.levels().len();
                        let current = g.state.level_index();
                        let target = if key == "]" {
                            (current + 1) % count
                        } else {
                            (current + count - 1) % count
                        };
                        if confirm_jump(g, target) {
                            g.input.jump_to = Some(target);
                        }
                    }
                    _ => {}
                }
            });
        });
        let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn confirm_jump(game: &Game, target: usize) -> bool {
        if !game.state.settings().confirm_level_jump {
            return true;
        }
        web_sys::window()
            .and_then(|w| {
                w.confirm_with_message(&format!("Abandon this board and jump to level {}?", target + 1))
                    .ok()
            })
            .unwrap_or(false)
    }

    fn request_animation_frame() {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop();
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop() {
        GAME.with(|game| {
            if let Some(g) = game.borrow_mut().as_mut() {
                g.frame();
            }
        });
        request_animation_frame();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tower of Flags (native) starting...");
    log::info!("The 3D client runs in the browser - use `trunk serve`; running headless demo");

    let tuning = std::env::var("FLAG_TOWER_TUNING")
        .ok()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .map(|json| flag_tower::Tuning::from_json(&json))
        .unwrap_or_default();
    let level = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<usize>().ok())
        .unwrap_or(0);

    headless_demo(tuning, level);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Deal a level and let a naive player drop every held cube on its own tower
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(tuning: flag_tower::Tuning, level: usize) {
    use flag_tower::persistence::MemoryStorage;
    use flag_tower::quiz::{QuizEvent, QuizInput, QuizPhase, QuizState, tick};
    use flag_tower::renderer::{BoardSnapshot, ColumnLabels, TextLabels};

    const MAX_MOVES: usize = 400;

    let step_ms = tuning.animation_ms + 1.0;
    let mut state = QuizState::new(Box::new(MemoryStorage::new()), tuning, 0.0, 0);
    let mut now = 0.0;
    if level != 0 {
        state.jump_to(level, now, 0);
    }
    let mut labels = ColumnLabels::new(TextLabels::default());

    print_board(&BoardSnapshot::capture(&state, now));

    for moves in 0..MAX_MOVES {
        let Some(column) = state.grid().held().key.column() else {
            break;
        };
        now += step_ms;
        for event in tick(&mut state, &QuizInput::pick(column), now, 0) {
            match event {
                QuizEvent::LevelCleared { time_ms, .. } => {
                    println!("\nCleared after {} moves ({:.1}s)", moves + 1, time_ms / 1000.0);
                }
                QuizEvent::TimeUp { .. } => println!("\nTime's up after {} moves", moves + 1),
                _ => {}
            }
        }
        if state.phase() != QuizPhase::Playing {
            break;
        }
    }

    let snapshot = BoardSnapshot::capture(&state, now);
    labels.update(&snapshot.columns);
    print_board(&snapshot);
    let summary: Vec<&str> = (0..snapshot.columns.len())
        .filter_map(|i| labels.image(i).map(String::as_str))
        .collect();
    println!("{}", summary.join(" | "));
}

#[cfg(not(target_arch = "wasm32"))]
fn print_board(snapshot: &flag_tower::renderer::BoardSnapshot) {
    println!("\nLevel {}: {} - {}", snapshot.level.number, snapshot.level.title, snapshot.level.subtitle);
    println!("Held: {}", snapshot.held);
    let layers = snapshot.columns.first().map(|c| c.codes.len()).unwrap_or(0);
    for layer in (0..layers).rev() {
        let row: Vec<&str> = snapshot.columns.iter().map(|c| c.codes[layer]).collect();
        println!("  {}", row.join("   "));
    }
    let footer: Vec<&str> = snapshot.columns.iter().map(|c| &c.label[..2]).collect();
    println!("  {}", footer.join("   "));
}
