//! Audio cues
//!
//! The game only fires cues; nothing waits on them and failures are dropped.
//! On wasm the cues are synthesized with the Web Audio API - no external files.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jewel picked up
    Collect,
    /// Caught by an alarm
    GameOver,
    /// One step while walking
    Footstep,
}

impl SoundEffect {
    /// The cue a simulation event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Footstep => Some(SoundEffect::Footstep),
            GameEvent::Collected { .. } => Some(SoundEffect::Collect),
            GameEvent::Caught { .. } => Some(SoundEffect::GameOver),
            GameEvent::CollectibleSpawned { .. } | GameEvent::HazardSpawned { .. } => None,
        }
    }
}

/// Fire-and-forget audio output
pub trait AudioCues {
    fn play(&self, effect: SoundEffect);

    /// Un-suspend output (browsers require a user gesture first)
    fn resume(&self);

    /// Preferences changed mid-run
    fn apply_settings(&mut self, _settings: &Settings) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCues, Settings, SoundEffect};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
        footsteps: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: settings.master_volume.clamp(0.0, 1.0),
                sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
                muted: settings.muted,
                footsteps: settings.footsteps,
            }
        }

        /// Get effective volume
        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Collect - short sparkly drop
        fn play_collect(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Sine) else {
                return;
            };
            if osc.connect_with_audio_node(&gain).is_err() {
                return;
            }
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(880.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(440.0, t + 0.1)
                .ok();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.2, t + 0.02)
                .ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Game over - dramatic low sweep
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sine) else {
                return;
            };
            if osc.connect_with_audio_node(&gain).is_err() {
                return;
            }
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(55.0, t + 0.5)
                .ok();
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.3, t + 0.1)
                .ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.5).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        /// Footstep - muffled thud through a low-pass
        fn play_footstep(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Triangle) else {
                return;
            };
            let Ok(filter) = ctx.create_biquad_filter() else {
                return;
            };
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(200.0);
            if osc.connect_with_audio_node(&filter).is_err()
                || filter.connect_with_audio_node(&gain).is_err()
            {
                return;
            }
            let t = ctx.current_time();

            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.15, t + 0.02)
                .ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.08).ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }
    }

    impl AudioCues for AudioManager {
        fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            if effect == SoundEffect::Footstep && !self.footsteps {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            match effect {
                SoundEffect::Collect => self.play_collect(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::Footstep => self.play_footstep(ctx, vol),
            }
        }

        fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.muted = settings.muted;
            self.footsteps = settings.footsteps;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Footstep),
            Some(SoundEffect::Footstep)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Collected {
                collectible_id: 3,
                score: 1
            }),
            Some(SoundEffect::Collect)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Caught { hazard_id: 9 }),
            Some(SoundEffect::GameOver)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::HazardSpawned { hazard_id: 9 }),
            None
        );
    }
}
