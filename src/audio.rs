//! Synthesised interface sounds.
//!
//! Only the tone descriptions live here; `wasm::audio` plays them through an
//! `AudioContext` when the browser provides one.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
    pub waveform: Waveform,
}

impl Tone {
    pub const START_GAIN: f32 = 0.1;
    pub const END_GAIN: f32 = 0.01;

    const fn new(frequency: f32, millis: u64, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration: Duration::from_millis(millis),
            waveform,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Hover,
    Click,
    Error,
    /// C major arpeggio.
    Success,
}

const ARPEGGIO: [f32; 3] = [523.25, 659.25, 783.99];
const ARPEGGIO_STEP_MS: u64 = 200;

impl Cue {
    /// Tones to play with their start offsets.
    pub fn tones(self) -> Vec<(Duration, Tone)> {
        match self {
            Cue::Hover => vec![(Duration::ZERO, Tone::new(800.0, 50, Waveform::Triangle))],
            Cue::Click => vec![(Duration::ZERO, Tone::new(1200.0, 100, Waveform::Sawtooth))],
            Cue::Error => vec![(Duration::ZERO, Tone::new(200.0, 300, Waveform::Sawtooth))],
            Cue::Success => ARPEGGIO
                .iter()
                .zip(0u64..)
                .map(|(&f, i)| {
                    (
                        Duration::from_millis(i * ARPEGGIO_STEP_MS),
                        Tone::new(f, 300, Waveform::Square),
                    )
                })
                .collect(),
        }
    }
}
