//! Spire Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use spire_flap::assets::{AssetRegistry, MANIFEST};
    use spire_flap::highscores::{self, BestScore};
    use spire_flap::persistence::{ApiClient, ClientConfig, Identity, Outbox};
    use spire_flap::platform::{InputEvent, map_key};
    use spire_flap::renderer::{CanvasRenderer, ImageBank, build_scene};
    use spire_flap::settings::Settings;
    use spire_flap::sim::{FrameDriver, GameEvent, GamePhase, GameState, TickInput};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        assets: AssetRegistry,
        renderer: CanvasRenderer,
        driver: FrameDriver,
        input: TickInput,
        settings: Settings,
        best: BestScore,
        outbox: Outbox,
        client: ApiClient,
        identity: Identity,
        /// An animation frame is already requested
        frame_pending: bool,
    }

    impl Game {
        /// Run simulation ticks owed for this frame
        fn update(&mut self, time: f64) {
            let Game {
                driver,
                state,
                input,
                assets,
                ..
            } = self;
            driver.frame(time, state, input, assets);
            self.handle_events();
        }

        /// Poll image loads into the registry; true while any is pending
        fn images_loading(&mut self) -> bool {
            self.renderer.images.poll(&mut self.assets)
        }

        fn render(&self) {
            let commands = build_scene(&self.state, &self.assets, &self.settings);
            self.renderer.draw(&commands);
        }

        /// React to what the simulation reported
        fn handle_events(&mut self) {
            let events = self.state.drain_events();
            if events.is_empty() {
                return;
            }
            self.outbox.collect(&events);

            for event in &events {
                match event {
                    GameEvent::RunStarted { .. } => {
                        set_text("score", "0");
                        set_visible("overlay", false);
                        set_visible("gameover", false);
                    }
                    GameEvent::Scored { score } => set_text("score", &score.to_string()),
                    GameEvent::SkinChanged { skin } => set_text("skin", skin),
                    GameEvent::RunEnded { score, .. } => {
                        if self.best.record(*score) {
                            self.best.save();
                        }
                        set_text("best", &format!("Best: {}", self.best.value()));
                        set_text("final-score", &score.to_string());
                        set_visible("gameover", true);
                    }
                    _ => {}
                }
            }

            while let Some(submission) = self.outbox.pop() {
                let client = self.client.clone();
                let device_id = self.identity.device_id.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    match submission.precheck() {
                        Ok(()) => match client
                            .submit_score(&submission.to_request(&device_id))
                            .await
                        {
                            Ok(_) => log::info!(
                                "Run {} submitted ({} pts)",
                                submission.run_id,
                                submission.score
                            ),
                            Err(e) => log::warn!("submit-score error: {e}"),
                        },
                        Err(e) => log::warn!("Run {} not submitted: {e}", submission.run_id),
                    }
                    refresh_leaderboard(client, device_id).await;
                });
            }
        }

        /// Next difficulty preset; ignored mid-run
        fn cycle_difficulty(&mut self) {
            if self.state.phase == GamePhase::Playing {
                return;
            }
            self.settings.difficulty = self.settings.difficulty.next();
            self.settings.save();
            self.state.set_tuning(self.settings.to_tuning());
            set_text("difficulty", self.settings.difficulty.as_str());
            log::info!("Difficulty: {}", self.settings.difficulty.as_str());
        }

        fn resize(&mut self, width: f32, height: f32, dpr: f64) {
            self.renderer.resize(width, height, dpr);
            self.state.resize(width, height);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    /// Fetch the leaderboard and this player's rank and show them.
    /// Failures keep whatever is currently displayed.
    async fn refresh_leaderboard(client: ApiClient, device_id: String) {
        match client.leaderboard(None).await {
            Ok(board) => render_leaderboard(&board.scores),
            Err(e) => log::warn!("leaderboard fetch error: {e}"),
        }
        match client.my_rank(&device_id).await {
            Ok(rank) => set_text("rank", &highscores::format_rank(&rank)),
            Err(e) => log::warn!("rank fetch error: {e}"),
        }
    }

    fn render_leaderboard(scores: &[spire_flap::persistence::ScoreRow]) {
        let Some(document) = document() else {
            return;
        };
        let Some(wrap) = document.get_element_by_id("leaderboard-rows") else {
            return;
        };
        wrap.set_inner_html("");
        let rows = highscores::leaderboard_rows(scores, js_sys::Date::now());
        if rows.is_empty() {
            wrap.set_text_content(Some("No scores yet."));
            return;
        }
        for row in rows {
            let Ok(line) = document.create_element("div") else {
                continue;
            };
            line.set_class_name("row");
            for (class, text) in [
                ("rank", format!("{}.", row.rank)),
                ("name", row.name),
                ("score", row.score.to_string()),
                ("when", row.when),
            ] {
                if let Ok(span) = document.create_element("span") {
                    span.set_class_name(class);
                    // Text content, never HTML: names are user supplied
                    span.set_text_content(Some(&text));
                    let _ = line.append_child(&span);
                }
            }
            let _ = wrap.append_child(&line);
        }
    }

    fn viewport(canvas: &HtmlCanvasElement) -> (f32, f32, f64) {
        let window = web_sys::window();
        let dpr = window.as_ref().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let (mut w, mut h) = (canvas.client_width() as f32, canvas.client_height() as f32);
        if w <= 0.0 || h <= 0.0 {
            if let Some(window) = window {
                w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
                h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
            }
        }
        (w, h, dpr)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Spire Flap starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_visible("loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::load();
        let best = BestScore::load();
        set_text("best", &format!("Best: {}", best.value()));
        set_text("difficulty", settings.difficulty.as_str());

        let identity = Identity::load_or_create(|| {
            web_sys::window()?
                .prompt_with_message("Choose a username (max 16):")
                .ok()
                .flatten()
        });
        let client = ApiClient::new(ClientConfig::default());

        // Register, then show the board; neither blocks startup
        {
            let client = client.clone();
            let identity = identity.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = client.register_identity(&identity.register_request()).await {
                    log::warn!("register-identity error: {e}");
                }
                refresh_leaderboard(client, identity.device_id).await;
            });
        }

        let (width, height, dpr) = viewport(&canvas);
        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, settings.to_tuning(), width, height)
            .with_best_score(best.value());
        let renderer = CanvasRenderer::new(canvas.clone(), ImageBank::load(MANIFEST))?;

        let game = Rc::new(RefCell::new(Game {
            state,
            assets: AssetRegistry::from_manifest(),
            renderer,
            driver: FrameDriver::new(),
            input: TickInput::default(),
            settings,
            best,
            outbox: Outbox::new(),
            client,
            identity,
            frame_pending: false,
        }));
        game.borrow_mut().resize(width, height, dpr);

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas, game.clone());

        set_visible("overlay", true);

        // Runs while images load, then stops until a run starts
        request_animation_frame(game);

        log::info!("Spire Flap running!");
        Ok(())
    }

    /// Feed an input event to the game and make sure a frame will process it
    fn dispatch(game: &Rc<RefCell<Game>>, event: InputEvent) -> bool {
        let prevent = {
            let mut g = game.borrow_mut();
            match event {
                InputEvent::ToggleHitboxes => {
                    g.settings.show_hitboxes = !g.settings.show_hitboxes;
                    g.settings.save();
                    g.render();
                }
                InputEvent::CycleDifficulty => {
                    g.cycle_difficulty();
                    g.render();
                }
                _ => {}
            }
            event.apply(&mut g.input)
        };
        request_animation_frame(game.clone());
        prevent
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let Some(input) = map_key(&event.code()) else {
                    return;
                };
                // Enter only starts runs
                if input == InputEvent::Start && game.borrow().state.phase == GamePhase::Playing {
                    return;
                }
                if dispatch(&game, input) {
                    event.prevent_default();
                }
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Pointer (mouse, touch, pen)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
                event.prevent_default();
                dispatch(&game, InputEvent::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };
        for id in ["btn-play", "btn-try"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                dispatch(&game, InputEvent::Start);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h, dpr) = viewport(&canvas);
            let mut g = game.borrow_mut();
            g.resize(w, h, dpr);
            g.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.frame_pending {
                return;
            }
            g.frame_pending = true;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.frame_pending = false;

            let loading = g.images_loading();
            g.update(time);
            g.render();
            set_text("skin", g.state.progression.active_skin().name);

            let playing = g.state.phase == GamePhase::Playing;
            if !playing && !loading {
                // Idle: the next run starts from a fresh clock
                g.driver.reset();
            }
            playing || loading
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
use spire_flap::settings::Difficulty;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spire Flap (native) starting...");
    log::info!("Native mode runs a headless autopilot demo; use `trunk serve` for the web build");

    // Optional preset name, e.g. `spire-flap hard`
    let difficulty = std::env::args().nth(1).and_then(|arg| {
        let parsed = Difficulty::from_str(&arg);
        if parsed.is_none() {
            log::warn!("Unknown difficulty {arg:?}, using saved settings");
        }
        parsed
    });
    demo::run(3, difficulty);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: the autopilot plays a few runs against the in-process
/// backend, then the leaderboard is printed
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use spire_flap::assets::{AssetRegistry, MANIFEST};
    use spire_flap::highscores::{self, BestScore};
    use spire_flap::persistence::{
        Identity, MemoryBackend, Outbox, RegisterRequest, SubmitScoreRequest,
    };
    use spire_flap::settings::{Difficulty, Settings};
    use spire_flap::sim::{FrameDriver, GamePhase, GameState, TickInput};

    /// Simulated time cap per run (ms)
    const RUN_LIMIT_MS: f64 = 60_000.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }

    pub fn run(runs: u32, difficulty: Option<Difficulty>) {
        let mut settings = Settings::load();
        if let Some(difficulty) = difficulty {
            settings.difficulty = difficulty;
        }
        log::info!("Difficulty: {}", settings.difficulty.as_str());
        let mut best = BestScore::load();

        // No images headless; treat every sprite as loaded at its nominal size
        let mut assets = AssetRegistry::from_manifest();
        for spec in MANIFEST {
            assets.mark_ready(spec.id, 100.0, 100.0);
        }

        let mut backend = MemoryBackend::new();
        let identity = Identity::load_or_create(|| Some("Autopilot".to_string()));
        // A rival so the rank means something
        let players = [
            (identity.device_id.clone(), identity.name.clone()),
            ("rival".to_string(), "Rival".to_string()),
        ];
        for (device_id, name) in players {
            if let Err(e) = backend.register_identity(&RegisterRequest { device_id, name }) {
                log::warn!("register-identity error: {e}");
            }
        }

        let seed = now_ms() as u64;
        let mut state = GameState::new(seed, settings.to_tuning(), 1280.0, 720.0)
            .with_best_score(best.value());
        let mut driver = FrameDriver::new();
        let mut outbox = Outbox::new();
        let mut input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        log::info!("Demo seed: {seed}");

        let mut clock = 0.0;
        for _ in 0..runs {
            let started = clock;
            loop {
                driver.frame(clock, &mut state, &mut input, &assets);
                clock += FRAME_MS;
                if state.phase == GamePhase::GameOver {
                    break;
                }
                if clock - started > RUN_LIMIT_MS {
                    state.end_run();
                    break;
                }
            }

            outbox.collect(&state.drain_events());
            if best.record(state.score) {
                best.save();
            }
            println!(
                "Run {}: {} points in {:.1}s (skin {})",
                state.run_id,
                state.score,
                state.elapsed,
                state.progression.active_skin().name
            );
            // Back to the ready screen, as after a game over in the browser
            driver.reset();
        }

        let submitted_at = now_ms();
        if let Err(e) = backend.submit_score(
            &SubmitScoreRequest {
                device_id: "rival".into(),
                score: 5,
                play_ms: Some(9000),
            },
            submitted_at - 60_000.0,
        ) {
            log::warn!("submit-score error: {e}");
        }
        while let Some(submission) = outbox.pop() {
            if let Err(e) = submission.precheck() {
                log::warn!("Run {} not submitted: {e}", submission.run_id);
                continue;
            }
            let request = submission.to_request(&identity.device_id);
            if let Err(e) = backend.submit_score(&request, submitted_at) {
                log::warn!("submit-score error: {e}");
            }
        }

        println!("\nLeaderboard");
        let board = backend.leaderboard(None);
        for row in highscores::leaderboard_rows(&board.scores, now_ms()) {
            println!("{:>3}. {:<16} {:>6}  {}", row.rank, row.name, row.score, row.when);
        }
        match backend.my_rank(&identity.device_id) {
            Ok(rank) => println!("\n{}: {}", identity.name, highscores::format_rank(&rank)),
            Err(e) => log::warn!("rank error: {e}"),
        }
        println!("Best: {}", best.value());
    }
}
