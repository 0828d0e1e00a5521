//! Midnight Heist entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Event, EventTarget, KeyboardEvent, PageTransitionEvent};

    use midnight_heist::audio::AudioManager;
    use midnight_heist::hud::DomHud;
    use midnight_heist::sim::{GameState, Key};
    use midnight_heist::{FrameDriver, FrameSnapshot, PageExit, RenderSink, Settings};

    // The 3D scene lives in JS; frames are handed over as JSON
    #[wasm_bindgen(inline_js = "
        export function present_frame(frame) {
            const r = globalThis.heistRenderer;
            if (r && r.present) r.present(JSON.parse(frame));
        }

        export function resize_view(width, height) {
            const r = globalThis.heistRenderer;
            if (r && r.resize) r.resize(width, height);
        }

        export function release_view() {
            const r = globalThis.heistRenderer;
            if (r && r.dispose) r.dispose();
        }
    ")]
    extern "C" {
        fn present_frame(frame: &str);
        fn resize_view(width: f64, height: f64);
        fn release_view();
    }

    /// Forwards frames to the page's scene renderer
    struct JsRenderer;

    impl RenderSink for JsRenderer {
        fn present(&mut self, frame: &FrameSnapshot<'_>) {
            match serde_json::to_string(frame) {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Frame not serialized: {}", e),
            }
        }

        fn resize(&mut self, width: f64, height: f64) {
            resize_view(width, height);
        }

        fn release(&mut self) {
            release_view();
        }
    }

    type WebDriver = FrameDriver<AudioManager, DomHud, JsRenderer>;

    /// A registered DOM listener, kept so teardown can remove it
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    }

    /// Everything the page holds on to while a run is live
    struct WebHost {
        driver: Rc<RefCell<WebDriver>>,
        raf_id: Rc<Cell<Option<i32>>>,
        raf_callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
        listeners: Vec<Listener>,
    }

    thread_local! {
        static HOST: RefCell<Option<WebHost>> = const { RefCell::new(None) };
    }

    fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Option<i32> {
        web_sys::window()?
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    }

    impl WebHost {
        fn new(driver: WebDriver) -> Self {
            Self {
                driver: Rc::new(RefCell::new(driver)),
                raf_id: Rc::new(Cell::new(None)),
                raf_callback: Rc::new(RefCell::new(None)),
                listeners: Vec::new(),
            }
        }

        fn listen(
            &mut self,
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(Event) + 'static,
        ) {
            let closure = Closure::<dyn FnMut(Event)>::new(handler);
            let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            self.listeners.push(Listener {
                target: target.clone(),
                kind,
                closure,
            });
        }

        /// Self-rescheduling animation frame loop
        fn start_loop(&self) {
            let driver = self.driver.clone();
            let raf_id = self.raf_id.clone();
            let reschedule = self.raf_callback.clone();

            *self.raf_callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                raf_id.set(None);
                if !driver.borrow_mut().frame(time) {
                    return;
                }
                if let Some(callback) = reschedule.borrow().as_ref() {
                    raf_id.set(request_frame(callback));
                }
            }));

            if let Some(callback) = self.raf_callback.borrow().as_ref() {
                self.raf_id.set(request_frame(callback));
            }
        }

        /// Stop the loop, drop listeners, release the renderer. Safe to repeat.
        fn teardown(&mut self) {
            if let Some(id) = self.raf_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            // Dropping the callback also breaks its Rc cycle
            self.raf_callback.borrow_mut().take();

            for listener in self.listeners.drain(..) {
                let _ = listener.target.remove_event_listener_with_callback(
                    listener.kind,
                    listener.closure.as_ref().unchecked_ref(),
                );
            }

            self.driver.borrow_mut().teardown();
        }
    }

    impl Drop for WebHost {
        fn drop(&mut self) {
            self.teardown();
        }
    }

    /// Tear the live run down, if there is one
    fn shutdown() {
        let host = HOST.with(|h| h.borrow_mut().take());
        if host.is_some() {
            log::info!("Midnight Heist shutting down");
        }
        // WebHost::drop does the work
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Midnight Heist starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let driver = FrameDriver::new(
            GameState::new(seed),
            AudioManager::new(&settings),
            DomHud,
            JsRenderer,
        );
        let mut host = WebHost::new(driver);

        setup_input_handlers(&mut host, settings, document.as_ref(), window.as_ref());
        host.start_loop();
        HOST.with(|h| *h.borrow_mut() = Some(host));

        setup_lifecycle(&window, &document);

        log::info!("Midnight Heist running (seed {})", seed);
    }

    fn setup_input_handlers(
        host: &mut WebHost,
        mut settings: Settings,
        document: &EventTarget,
        window: &EventTarget,
    ) {
        // Key down
        {
            let driver = host.driver.clone();
            host.listen(document, "keydown", move |event: Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                // Arrow keys would otherwise scroll the page
                if Key::from_identity(&key).is_some() {
                    event.prevent_default();
                }
                let mut driver = driver.borrow_mut();
                if !event.repeat() && settings.toggle_for_key(&key) {
                    settings.save();
                    driver.apply_settings(&settings);
                }
                driver.key_down(&key);
            });
        }

        // Key up
        {
            let driver = host.driver.clone();
            host.listen(document, "keyup", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    driver.borrow_mut().key_up(&event.key());
                }
            });
        }

        // Window blur: key-ups will not arrive
        {
            let driver = host.driver.clone();
            host.listen(window, "blur", move |_event: Event| {
                driver.borrow_mut().focus_lost();
            });
        }

        // Resize
        {
            let driver = host.driver.clone();
            host.listen(window, "resize", move |_event: Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let width = window.inner_width().ok().and_then(|v| v.as_f64());
                let height = window.inner_height().ok().and_then(|v| v.as_f64());
                if let (Some(w), Some(h)) = (width, height) {
                    driver.borrow_mut().resize(w, h);
                }
            });
        }
    }

    /// Page-level hooks that outlive the run: navigation and replay
    fn setup_lifecycle(window: &web_sys::Window, document: &web_sys::Document) {
        // Navigation away (also fires on reload). A page kept in the
        // back-forward cache stays live: the browser pauses its frames.
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let persisted = event
                    .dyn_ref::<PageTransitionEvent>()
                    .is_some_and(|e| e.persisted());
                if PageExit::from_persisted(persisted).tears_down() {
                    shutdown();
                }
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restored from the cache after a teardown: start over
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                let persisted = event
                    .dyn_ref::<PageTransitionEvent>()
                    .is_some_and(|e| e.persisted());
                let live = HOST.with(|h| h.borrow().is_some());
                if persisted && !live {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().reload();
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play again = fresh page
        if let Some(btn) = document.get_element_by_id("replay-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                shutdown();
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    //! Native run without a window: an autopilot chases jewels until caught.

    use midnight_heist::audio::{AudioCues, SoundEffect};
    use midnight_heist::hud::{DisplaySink, DisplayState};
    use midnight_heist::sim::{GameState, Tuning};
    use midnight_heist::{FrameDriver, FrameSnapshot, RenderSink};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Two minutes of play
    const MAX_FRAMES: u32 = 60 * 120;

    struct LogAudio;

    impl AudioCues for LogAudio {
        fn play(&self, effect: SoundEffect) {
            log::trace!("cue {:?}", effect);
        }

        fn resume(&self) {}
    }

    struct LogHud;

    impl DisplaySink for LogHud {
        fn publish(&mut self, state: DisplayState) {
            if state.is_game_over {
                log::info!("HUD: caught by security! jewels: {}", state.score);
            } else {
                log::info!("HUD: jewels: {}", state.score);
            }
        }
    }

    /// Counts frames instead of drawing them
    #[derive(Default)]
    struct NullRenderer {
        frames: u64,
    }

    impl RenderSink for NullRenderer {
        fn present(&mut self, frame: &FrameSnapshot<'_>) {
            self.frames += 1;
            if self.frames % 600 == 0 {
                log::debug!(
                    "frame {}: avatar at ({:.2}, {:.2})",
                    self.frames,
                    frame.avatar.pos.x,
                    frame.avatar.pos.z
                );
            }
        }

        fn release(&mut self) {
            log::debug!("renderer released after {} frames", self.frames);
        }
    }

    /// `HEIST_TUNING` names a JSON tuning file; anything wrong falls back to defaults
    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("HEIST_TUNING") else {
            return Tuning::default();
        };
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                return Tuning::default();
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Bad tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    fn load_seed() -> u64 {
        std::env::var("HEIST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_millis() as u64)
                    .unwrap_or(0)
            })
    }

    /// Hold the keys that lead toward the nearest jewel
    fn steer(driver: &mut FrameDriver<LogAudio, LogHud, NullRenderer>) {
        let state = driver.state();
        let me = state.avatar.pos;
        let target = state
            .registry
            .collectibles
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(me)
                    .partial_cmp(&b.pos.distance_squared(me))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.pos);

        let (dx, dz) = match target {
            Some(t) => (t.x - me.x, t.z - me.z),
            None => (0.0, 0.0),
        };
        let deadzone = 0.05;
        let wanted = [
            ("ArrowUp", dz < -deadzone),
            ("ArrowDown", dz > deadzone),
            ("ArrowLeft", dx < -deadzone),
            ("ArrowRight", dx > deadzone),
        ];
        for (key, down) in wanted {
            if down {
                driver.key_down(key);
            } else {
                driver.key_up(key);
            }
        }
    }

    pub fn run() {
        let seed = load_seed();
        let state = GameState::with_tuning(seed, load_tuning());
        let mut driver = FrameDriver::new(state, LogAudio, LogHud, NullRenderer::default());

        let mut now_ms = 0.0;
        for _ in 0..MAX_FRAMES {
            if driver.state().is_game_over() {
                break;
            }
            steer(&mut driver);
            driver.frame(now_ms);
            now_ms += FRAME_MS;
        }

        let state = driver.state();
        println!(
            "Seed {}: {} jewels in {:.1}s, {} alarms, {}",
            seed,
            state.score,
            state.elapsed,
            state.registry.hazards.len(),
            if state.is_game_over() { "caught" } else { "escaped" }
        );
        driver.teardown();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Midnight Heist (native) starting...");
    log::info!("Native mode runs a headless autopilot - use `trunk serve` for the web version");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
