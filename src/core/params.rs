use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Glide time for filter parameter changes. Owned by the backend adapter.
pub const PARAM_GLIDE_SECS: f32 = 0.05;

/// Convert decibels to linear gain
pub fn db_to_gain(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    #[default]
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [Waveform::Sine, Waveform::Square, Waveform::Sawtooth, Waveform::Triangle];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Waveform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Waveform::ALL
            .into_iter()
            .find(|w| w.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("unknown waveform '{}'", s)))
    }
}

/// Amplitude envelope. Stage times in seconds, sustain is a 0-1 level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.02,
            decay: 0.2,
            sustain: 0.6,
            release: 0.8,
        }
    }
}

/// Live synth settings, owned by the audio backend adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthParams {
    pub waveform: Waveform,
    pub volume_db: f32,
    pub filter_cutoff_hz: f32,
    pub filter_resonance: f32,
    pub envelope: Envelope,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Triangle,
            volume_db: -12.0,
            filter_cutoff_hz: 2000.0,
            filter_resonance: 1.0,
            envelope: Envelope::default(),
        }
    }
}

impl SynthParams {
    pub fn gain(&self) -> f32 {
        db_to_gain(self.volume_db)
    }

    pub fn validate(&self) -> Result<()> {
        let env = &self.envelope;
        for (name, value) in [("attack", env.attack), ("decay", env.decay), ("release", env.release)] {
            if !(value >= 0.0) {
                return Err(Error::Config(format!("{} must be >= 0, got {}", name, value)));
            }
        }
        if !(0.0..=1.0).contains(&env.sustain) {
            return Err(Error::Config(format!("sustain must be within 0..=1, got {}", env.sustain)));
        }
        if !(self.filter_cutoff_hz > 0.0) {
            return Err(Error::Config(format!("filter cutoff must be > 0 Hz, got {}", self.filter_cutoff_hz)));
        }
        if !(self.filter_resonance > 0.0) {
            return Err(Error::Config(format!("filter resonance must be > 0, got {}", self.filter_resonance)));
        }
        if !self.volume_db.is_finite() {
            return Err(Error::Config("volume must be finite".to_string()));
        }
        Ok(())
    }
}
