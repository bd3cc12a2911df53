//! Web Audio synthesis
//!
//! Procedurally generated sound effects - no external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::AudioHooks;
use crate::settings::Settings;

/// Overall headroom so overlapping effects don't clip
const MASTER_GAIN: f32 = 0.3;

/// Audio backend for the browser
pub struct WebAudio {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl WebAudio {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Context ready to play, or None when silent
    fn live(&self) -> Option<(&AudioContext, f32)> {
        let vol = self.volume * MASTER_GAIN;
        if vol <= 0.0 {
            return None;
        }
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some((ctx, vol))
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
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single decaying tone starting `delay` seconds from now
    fn tone(&self, freq: f32, osc_type: OscillatorType, duration: f64, level: f32, delay: f64) {
        let Some((ctx, vol)) = self.live() else { return };
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(vol * level, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + duration).ok();
    }
}

impl AudioHooks for WebAudio {
    fn on_shoot(&mut self) {
        self.tone(800.0, OscillatorType::Sawtooth, 0.15, 0.5, 0.0);
        self.tone(600.0, OscillatorType::Square, 0.1, 0.3, 0.05);
    }

    fn on_hit(&mut self) {
        self.tone(200.0, OscillatorType::Sawtooth, 0.1, 0.4, 0.0);
    }

    /// Low rumble with a falling pitch plus a short crack
    fn on_explosion(&mut self) {
        let Some((ctx, vol)) = self.live() else { return };
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }
    }

    fn on_powerup(&mut self) {
        self.arpeggio();
    }

    fn on_level_up(&mut self) {
        self.arpeggio();
    }

    fn on_boss_spawn(&mut self) {
        self.tone(150.0, OscillatorType::Sawtooth, 1.0, 0.5, 0.0);
    }

    fn on_boss_fire(&mut self) {
        self.tone(300.0, OscillatorType::Square, 0.2, 0.3, 0.0);
    }
}

impl WebAudio {
    /// Rising three-note chime
    fn arpeggio(&self) {
        self.tone(400.0, OscillatorType::Sine, 0.1, 0.5, 0.0);
        self.tone(600.0, OscillatorType::Sine, 0.1, 0.5, 0.1);
        self.tone(800.0, OscillatorType::Sine, 0.2, 0.5, 0.2);
    }
}
