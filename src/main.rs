//! Astro Blaster entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, EventTarget, HtmlCanvasElement, HtmlInputElement, TouchEvent};

    use astro_blaster::audio::{AudioManager, SoundEffect};
    use astro_blaster::consts::*;
    use astro_blaster::platform::{
        BrowserStore, InputState, KeyAction, KvStore, MemoryStore, use_touch_controls,
    };
    use astro_blaster::renderer::{RenderState, Scene};
    use astro_blaster::services::{LocalBackend, ServiceError, SessionLink};
    use astro_blaster::sim::{GameEvent, GameLoop, GamePhase};
    use astro_blaster::{Hud, Settings};

    type Link = SessionLink<LocalBackend<Box<dyn KvStore>>>;

    /// LocalStorage, or an in-memory store when the page has none
    fn open_store() -> Box<dyn KvStore> {
        match BrowserStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; progress will not survive a reload", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameLoop,
        scene: Scene,
        render_state: Option<RenderState>,
        input: InputState,
        hud: Hud,
        link: Link,
        audio: AudioManager,
        settings: Settings,
        settings_store: Box<dyn KvStore>,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Toast list as last written to the DOM
        shown_toasts: Vec<(String, String)>,
        leaderboard_stale: bool,
    }

    impl Game {
        fn new(seed: u64, width: u32, height: u32) -> Self {
            let settings_store = open_store();
            let settings = Settings::load(&settings_store);
            Self {
                session: GameLoop::new(seed),
                scene: Scene::new(width, height, seed),
                render_state: None,
                input: InputState::new(),
                hud: Hud::new(),
                link: SessionLink::new(LocalBackend::open(open_store())),
                audio: AudioManager::new(&settings),
                settings,
                settings_store,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                shown_toasts: Vec::new(),
                leaderboard_stale: true,
            }
        }

        fn save_settings(&mut self) {
            self.audio.apply_settings(&self.settings);
            // Failures are logged inside save
            let _ = self.settings.save(&mut self.settings_store);
        }

        fn take_notices(&mut self) {
            for notice in self.link.drain_notices() {
                self.hud.apply_notice(&notice);
            }
        }

        /// Start or restart a play-through for `username`
        fn start_game(&mut self, username: &str) {
            self.audio.resume();
            self.settings.set_username(username);
            self.save_settings();

            if let Some(name) = self.settings.username.clone() {
                if let Err(ServiceError::InvalidUsername) = self.link.connect(&name) {
                    self.hud.message("Invalid Username", "Please enter a username");
                    return;
                }
            }
            // A restart cuts the running play-through short
            if self.session.phase() != GamePhase::Idle {
                self.link.abandon(&self.session.world().final_stats());
            }
            let started = self.link.begin();
            self.take_notices();
            if let Err(e) = started {
                self.hud.message("Cannot Start", &e.to_string());
                return;
            }

            let seed = js_sys::Date::now() as u64;
            let result = match self.session.phase() {
                GamePhase::Idle | GamePhase::GameOver => self.session.start(seed),
                GamePhase::Playing | GamePhase::Paused => self.session.restart(seed),
            };
            match result {
                Ok(()) => {
                    self.hud.reset();
                    self.hud.set_values(self.session.hud());
                    self.input = InputState::new();
                    log::info!("Game started with seed: {}", seed);
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        fn quit_to_menu(&mut self) {
            if let Err(e) = self.session.quit_to_menu() {
                log::warn!("{}", e);
                return;
            }
            // An abandoned play-through still counts
            self.link.abandon(&self.session.world().final_stats());
            self.take_notices();
            self.leaderboard_stale = true;
        }

        /// Pause from outside the input stream (tab hidden, focus lost)
        fn auto_pause(&mut self, why: &str) {
            self.input.release_all();
            if self.session.phase() == GamePhase::Playing && self.session.pause().is_ok() {
                log::info!("Auto-paused ({})", why);
            }
        }

        fn on_game_over(&mut self) {
            let stats = self.session.world().final_stats();
            if let Some(result) = self.link.finish(&stats) {
                log::info!(
                    "Results saved: rank {:?}, {} new achievement(s)",
                    result.player_rank,
                    result.new_achievements.len()
                );
            }
            self.take_notices();
            self.leaderboard_stale = true;
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, frame_ms: f32, time: f64) {
            let input = self.input.take();
            let events = self.session.advance(frame_ms, &input);

            self.hud.apply_events(&events);
            self.hud.set_values(self.session.hud());
            self.hud.update(frame_ms);
            for effect in SoundEffect::for_events(&events) {
                self.audio.play(effect);
            }
            if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
                self.on_game_over();
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

        /// Render the current frame; skipped until the GPU is ready
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = self
                .scene
                .build(self.session.world(), self.settings.reduced_motion);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.scene.resize(width, height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }

        /// Update HUD elements in DOM
        fn update_dom(&mut self, document: &Document) {
            let values = self.hud.values();
            set_text(document, "hud-score", &values.score.to_string());
            set_text(document, "hud-health", &values.health.to_string());
            set_text(document, "hud-wave", &values.wave.to_string());
            set_text(document, "hud-effects", &self.hud.effect_labels().join(" | "));
            if let Some(bar) = document.get_element_by_id("hud-health-bar") {
                let _ = bar.set_attribute("style", &format!("width: {}%", values.health));
            }

            set_hidden(document, "hud-fps", !self.settings.show_fps);
            if self.settings.show_fps {
                set_text(document, "hud-fps", &format!("{} FPS", self.fps));
            }

            let phase = self.session.phase();
            set_hidden(document, "menu", phase != GamePhase::Idle);
            set_hidden(document, "hud", phase == GamePhase::Idle);
            set_hidden(document, "pause-menu", phase != GamePhase::Paused);
            set_hidden(document, "game-over", phase != GamePhase::GameOver);
            set_hidden(document, "offline-badge", !self.link.is_offline());
            if let Some(score) = self.hud.final_score() {
                set_text(document, "final-score", &score.to_string());
            }
            if self.leaderboard_stale && matches!(phase, GamePhase::Idle | GamePhase::GameOver) {
                self.render_leaderboard(document);
            }
            self.render_toasts(document);
        }

        fn render_leaderboard(&mut self, document: &Document) {
            self.leaderboard_stale = false;
            let Some(list) = document.get_element_by_id("leaderboard-list") else {
                return;
            };
            list.set_inner_html("");
            let page = self.link.leaderboard(10, 0);
            for entry in &page.entries {
                if let Ok(item) = document.create_element("li") {
                    item.set_text_content(Some(&format!(
                        "#{} {} {} (wave {})",
                        entry.rank, entry.player_username, entry.score, entry.wave
                    )));
                    let _ = list.append_child(&item);
                }
            }
            if let Some(rank) = page.user_rank {
                set_text(document, "player-rank", &format!("Your rank: #{}", rank));
            }
        }

        fn render_toasts(&mut self, document: &Document) {
            let current: Vec<(String, String)> = self
                .hud
                .toasts()
                .map(|t| (t.title.clone(), t.body.clone()))
                .collect();
            if current == self.shown_toasts {
                return;
            }
            let Some(container) = document.get_element_by_id("toasts") else {
                return;
            };
            container.set_inner_html("");
            for toast in self.hud.toasts() {
                let Ok(el) = document.create_element("div") else {
                    continue;
                };
                el.set_class_name(if toast.alert { "toast alert" } else { "toast" });
                if let (Ok(title), Ok(body)) =
                    (document.create_element("strong"), document.create_element("p"))
                {
                    title.set_text_content(Some(&toast.title));
                    body.set_text_content(Some(&toast.body));
                    let _ = el.append_child(&title);
                    let _ = el.append_child(&body);
                }
                let _ = container.append_child(&el);
            }
            self.shown_toasts = current;
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    /// Attach an event handler for the page's lifetime
    fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            listen(&btn, "click", move |_: web_sys::MouseEvent| handler());
        }
    }

    /// Canvas backing size in device pixels
    fn canvas_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr).max(1.0) as u32;
        let height = (canvas.client_height() as f64 * dpr).max(1.0) as u32;
        (width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger unavailable: {}", e).into());
        }

        log::info!("Astro Blaster starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, width, height)));

        // Prefill the username field
        if let Some(input) = username_input(&document) {
            if let Some(name) = &game.borrow().settings.username {
                input.set_value(name);
            }
        }

        let touch = use_touch_controls(
            game.borrow().settings.touch_controls,
            window.inner_width()?.as_f64().unwrap_or(f64::MAX),
        );
        set_hidden(&document, "touch-controls", !touch);

        setup_keyboard(&window, game.clone());
        setup_touch(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());
        setup_resize(&window, &canvas, game.clone());

        // Simulation and HUD run even if the GPU never comes up
        request_animation_frame(game.clone());

        match init_gpu(canvas, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        log::info!("Astro Blaster running!");
        Ok(())
    }

    async fn init_gpu(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| e.to_string())
    }

    fn username_input(document: &Document) -> Option<HtmlInputElement> {
        document.get_element_by_id("username")?.dyn_into().ok()
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            listen(window, "keydown", move |event: web_sys::KeyboardEvent| {
                // Typing a username must not steer the ship
                if event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some()
                {
                    return;
                }
                let key = event.key();
                // Held Escape auto-repeats; only the first press toggles pause
                if event.repeat() && KeyAction::from_key(&key) == Some(KeyAction::Pause) {
                    event.prevent_default();
                    return;
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                if g.input.key_down(&key) {
                    event.prevent_default();
                }
            });
        }
        listen(window, "keyup", move |event: web_sys::KeyboardEvent| {
            if game.borrow_mut().input.key_up(&event.key()) {
                event.prevent_default();
            }
        });
    }

    fn setup_touch(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(pad) = document.get_element_by_id("joystick") {
            let pad_clone = pad.clone();
            let steer = {
                let game = game.clone();
                move |event: TouchEvent| {
                    event.prevent_default();
                    if let Some(touch) = event.target_touches().get(0) {
                        let rect = pad_clone.get_bounding_client_rect();
                        let cx = rect.left() + rect.width() / 2.0;
                        let cy = rect.top() + rect.height() / 2.0;
                        let dx = (touch.client_x() as f64 - cx) as f32;
                        let dy = (touch.client_y() as f64 - cy) as f32;
                        game.borrow_mut().input.set_joystick_offset(dx, dy);
                    }
                }
            };
            listen(&pad, "touchstart", steer.clone());
            listen(&pad, "touchmove", steer);
            let game = game.clone();
            listen(&pad, "touchend", move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.release_joystick();
            });
        }

        if let Some(fire) = document.get_element_by_id("fire-btn") {
            {
                let game = game.clone();
                listen(&fire, "touchstart", move |event: TouchEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.input.set_touch_fire(true);
                });
            }
            listen(&fire, "touchend", move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.set_touch_fire(false);
            });
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "play-again-btn"] {
            let game = game.clone();
            let document_clone = document.clone();
            on_click(document, id, move || {
                let name = username_input(&document_clone)
                    .map(|input| input.value())
                    .unwrap_or_default();
                game.borrow_mut().start_game(&name);
            });
        }
        {
            let game = game.clone();
            on_click(document, "resume-btn", move || {
                if let Err(e) = game.borrow_mut().session.resume() {
                    log::warn!("{}", e);
                }
            });
        }
        for id in ["quit-btn", "menu-btn"] {
            let game = game.clone();
            on_click(document, id, move || game.borrow_mut().quit_to_menu());
        }
        on_click(document, "mute-btn", move || {
            let mut g = game.borrow_mut();
            g.settings.muted = !g.settings.muted;
            log::info!("Muted: {}", g.settings.muted);
            g.save_settings();
        });
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |_: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
        }

        // Window blur (click outside)
        listen(window, "blur", move |_: web_sys::FocusEvent| {
            game.borrow_mut().auto_pause("window blur");
        });
    }

    fn setup_resize(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas = canvas.clone();
        let window_clone = window.clone();
        listen(window, "resize", move |_: web_sys::Event| {
            let (width, height) = canvas_size(&window_clone, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().resize(width, height);
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
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
        {
            let mut g = game.borrow_mut();

            let frame_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                TICK_MS
            };
            g.last_time = time;

            g.update(frame_ms, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_dom(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot: plays one seeded session against an in-memory backend
/// and prints the outcome.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use astro_blaster::consts::*;
    use astro_blaster::platform::MemoryStore;
    use astro_blaster::services::{LocalBackend, SessionLink};
    use astro_blaster::sim::{GameLoop, GamePhase, TickInput};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Astro Blaster (native autopilot) starting with seed {}", seed);

    let mut link = SessionLink::new(LocalBackend::open(MemoryStore::new()));
    if let Err(e) = link.connect("autopilot") {
        log::error!("Could not create player: {}", e);
        return;
    }
    if let Err(e) = link.begin() {
        log::error!("{}", e);
        return;
    }

    let mut game = GameLoop::new(seed);
    if let Err(e) = game.start(seed) {
        log::error!("{}", e);
        return;
    }

    let max_ticks = 5 * 60 * SIM_HZ;
    for tick in 0..max_ticks {
        // Sweep side to side while holding fire
        let phase = (tick as f32 / SIM_HZ as f32 * 0.5).sin();
        let input = TickInput {
            left: phase < -0.3,
            right: phase > 0.3,
            fire: true,
            ..Default::default()
        };
        for event in game.advance(TICK_MS, &input) {
            log::debug!("{:?}", event);
        }
        if game.phase() == GamePhase::GameOver {
            break;
        }
    }

    let stats = game.world().final_stats();
    println!(
        "Score {} | wave {} | {}s | enemies {} | asteroids {} | power-ups {}",
        stats.final_score,
        stats.max_wave,
        stats.duration_seconds,
        stats.enemies_destroyed,
        stats.asteroids_destroyed,
        stats.powerups_collected
    );

    if let Some(result) = link.finish(&stats) {
        if let Some(rank) = result.player_rank {
            println!("Rank #{}", rank);
        }
    }
    for notice in link.drain_notices() {
        println!("{}: {}", notice.title(), notice.body());
    }
}
