//! Per-frame driver
//!
//! Owns the run and its collaborators. The host calls [`FrameDriver::frame`]
//! once per display refresh and forwards key events; the driver ticks the
//! simulation and fans events out to audio, HUD and renderer.

use serde::Serialize;

use crate::audio::{AudioCues, SoundEffect};
use crate::hud::{DisplaySink, DisplayState};
use crate::settings::Settings;
use crate::sim::{Avatar, Entity, GameEvent, GameState, InputSampler, TickInput, tick};

/// Frame time used before a previous timestamp exists (s)
const FIRST_FRAME_DT: f32 = 1.0 / 60.0;
/// Longest frame the sim will account for (s); covers tab switches
const MAX_FRAME_DT: f32 = 0.1;

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub avatar: Avatar,
    /// Avatar greys out once an alarm has gone off
    pub caught: bool,
    pub collectibles: &'a [Entity],
    pub hazards: &'a [Entity],
    /// Host timestamp (ms) for idle animations
    pub time_ms: f64,
    pub score: u64,
}

impl<'a> FrameSnapshot<'a> {
    pub fn of(state: &'a GameState, time_ms: f64) -> Self {
        Self {
            avatar: state.avatar,
            caught: state.is_game_over(),
            collectibles: &state.registry.collectibles,
            hazards: &state.registry.hazards,
            time_ms,
            score: state.score,
        }
    }
}

/// Synchronous scene output
pub trait RenderSink {
    fn present(&mut self, frame: &FrameSnapshot<'_>);

    /// Viewport changed size
    fn resize(&mut self, _width: f64, _height: f64) {}

    /// Free GPU/scene resources. Called at most once.
    fn release(&mut self) {}
}

/// How the page is going away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    /// Navigated away or reloaded; the run is gone for good
    Unloading,
    /// Parked in the back-forward cache and may be shown again as-is
    Cached,
}

impl PageExit {
    /// From a `pagehide` event's `persisted` flag
    pub fn from_persisted(persisted: bool) -> Self {
        if persisted { Self::Cached } else { Self::Unloading }
    }

    /// A cached page keeps its loop and listeners so a restore resumes the run
    pub fn tears_down(self) -> bool {
        self == Self::Unloading
    }
}

pub struct FrameDriver<A, D, R> {
    state: GameState,
    input: InputSampler,
    audio: A,
    display: D,
    renderer: Option<R>,
    last_time_ms: Option<f64>,
    torn_down: bool,
}

impl<A: AudioCues, D: DisplaySink, R: RenderSink> FrameDriver<A, D, R> {
    pub fn new(state: GameState, audio: A, mut display: D, renderer: R) -> Self {
        display.publish(DisplayState {
            score: state.score,
            is_game_over: state.is_game_over(),
        });
        log::info!(
            "Run started (seed {}): {} jewels, {} alarms",
            state.seed,
            state.registry.collectibles.len(),
            state.registry.hazards.len()
        );
        Self {
            state,
            input: InputSampler::new(),
            audio,
            display,
            renderer: Some(renderer),
            last_time_ms: None,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Key pressed. Any key press also wakes the audio output.
    pub fn key_down(&mut self, identity: &str) {
        if self.torn_down {
            return;
        }
        self.audio.resume();
        self.input.key_down(identity);
    }

    /// Hand changed preferences to the audio output
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.audio.apply_settings(settings);
    }

    pub fn key_up(&mut self, identity: &str) {
        self.input.key_up(identity);
    }

    /// Window lost focus; key-ups will not arrive
    pub fn focus_lost(&mut self) {
        self.input.release_all();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
    }

    /// Run one frame at host time `now_ms`.
    ///
    /// Returns false once torn down, telling the host to stop rescheduling.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.torn_down {
            return false;
        }

        let dt = match self.last_time_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => FIRST_FRAME_DT,
        };
        self.last_time_ms = Some(now_ms);

        if !self.state.is_game_over() {
            let input = TickInput {
                held: self.input.held(),
                now_ms,
            };
            for event in tick(&mut self.state, &input, dt) {
                self.dispatch(&event);
            }
        }

        // Keep presenting after game over so idle animations run
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.present(&FrameSnapshot::of(&self.state, now_ms));
        }

        true
    }

    fn dispatch(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Collected { score, .. } => self.display.publish(DisplayState {
                score,
                is_game_over: false,
            }),
            GameEvent::Caught { .. } => self.display.publish(DisplayState {
                score: self.state.score,
                is_game_over: true,
            }),
            _ => {}
        }

        if let Some(effect) = SoundEffect::for_event(event) {
            self.audio.play(effect);
        }
    }

    /// Stop the run and release the renderer.
    ///
    /// Returns true on the call that actually tore down; later calls do nothing.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;
        self.input.release_all();
        if let Some(mut renderer) = self.renderer.take() {
            renderer.release();
        }
        log::info!(
            "Run torn down after {} ticks (score {})",
            self.state.time_ticks,
            self.state.score
        );
        true
    }
}
