use web_sys::{AudioContext, OscillatorType};

use crate::audio::{Cue, Tone, Waveform};

/// Plays [`Cue`]s. Silent when audio is disabled or unsupported.
pub struct AudioCues {
    ctx: Option<AudioContext>,
}

impl AudioCues {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { ctx: None };
        }
        match AudioContext::new() {
            Ok(ctx) => Self { ctx: Some(ctx) },
            Err(e) => {
                log::warn!("audio context not supported, sound cues disabled: {e:?}");
                Self { ctx: None }
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ctx.is_some()
    }

    pub fn play(&self, cue: Cue) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let now = ctx.current_time();
        for (offset, tone) in cue.tones() {
            if let Err(e) = play_tone(ctx, now + offset.as_secs_f64(), &tone) {
                log::debug!("tone {cue:?} dropped: {e:?}");
            }
        }
    }
}

fn oscillator_type(w: Waveform) -> OscillatorType {
    match w {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

fn play_tone(ctx: &AudioContext, at: f64, tone: &Tone) -> Result<(), wasm_bindgen::JsValue> {
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    osc.set_type(oscillator_type(tone.waveform));
    osc.frequency().set_value_at_time(tone.frequency, at)?;

    let end = at + tone.duration.as_secs_f64();
    gain.gain().set_value_at_time(Tone::START_GAIN, at)?;
    gain.gain().exponential_ramp_to_value_at_time(Tone::END_GAIN, end)?;

    osc.start_with_when(at)?;
    osc.stop_with_when(end)?;
    Ok(())
}
