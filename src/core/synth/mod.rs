//! Polyphonic synth engine
//!
//! Runs inside the audio callback. Everything here is driven by
//! [`EngineMessage`](crate::messaging::EngineMessage)s and produces one mono
//! sample at a time.

pub mod envelope;
pub mod filter;
pub mod smoothing;
pub mod voice;
mod waveform;

use crate::core::note::NoteId;
use crate::core::params::{Envelope, SynthParams, Waveform};

use filter::LowPassFilter;
use smoothing::LinearRamp;
use voice::Voice;

pub const DEFAULT_POLYPHONY: usize = 8;
pub const MAX_POLYPHONY: usize = 64;

pub struct SynthEngine {
    sample_rate: f32,
    max_polyphony: usize,
    voices: Vec<Voice>,
    voice_counter: u64,
    waveform: Waveform,
    envelope: Envelope,
    cutoff: LinearRamp,
    resonance: LinearRamp,
    filter: LowPassFilter,
    gain: f32,
}

impl SynthEngine {
    pub fn new(sample_rate: f32, params: &SynthParams, max_polyphony: usize) -> Self {
        let max_polyphony = max_polyphony.clamp(1, MAX_POLYPHONY);
        Self {
            sample_rate,
            max_polyphony,
            voices: Vec::with_capacity(max_polyphony),
            voice_counter: 0,
            waveform: params.waveform,
            envelope: params.envelope,
            cutoff: LinearRamp::new(params.filter_cutoff_hz),
            resonance: LinearRamp::new(params.filter_resonance),
            filter: LowPassFilter::new(sample_rate, params.filter_cutoff_hz, params.filter_resonance),
            gain: params.gain(),
        }
    }

    /// Start a new voice for `note`, stealing one if the pool is full
    pub fn note_on(&mut self, note: NoteId) {
        if self.voices.len() >= self.max_polyphony {
            let victim = self
                .voices
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| (!v.is_releasing(), v.started))
                .map(|(i, _)| i);
            if let Some(index) = victim {
                let stolen = self.voices.remove(index);
                log::debug!("voice limit reached, stealing {}", stolen.note);
            }
        }

        self.voice_counter += 1;
        self.voices.push(Voice::new(note, self.voice_counter, self.envelope, self.sample_rate));
    }

    pub fn note_off(&mut self, note: NoteId) {
        for voice in self.voices.iter_mut().filter(|v| v.note == note && !v.is_releasing()) {
            voice.release();
        }
    }

    pub fn all_notes_off(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Applies to new voices and to the ones already sounding
    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.envelope = envelope;
        for voice in &mut self.voices {
            voice.set_envelope(envelope);
        }
    }

    pub fn set_filter_cutoff(&mut self, hz: f32, glide_secs: f32) {
        let samples = self.glide_samples(glide_secs);
        self.cutoff.set_target(hz, samples);
    }

    pub fn set_filter_resonance(&mut self, q: f32, glide_secs: f32) {
        let samples = self.glide_samples(glide_secs);
        self.resonance.set_target(q, samples);
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.max(0.0);
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn sounding_notes(&self) -> Vec<NoteId> {
        self.voices.iter().filter(|v| !v.is_releasing()).map(|v| v.note).collect()
    }

    pub fn filter(&self) -> &LowPassFilter {
        &self.filter
    }

    /// Generate one output sample
    pub fn next_sample(&mut self) -> f32 {
        let waveform = self.waveform;
        let mut sum = 0.0;
        for voice in &mut self.voices {
            sum += voice.next_sample(waveform);
        }
        self.voices.retain(|v| !v.is_finished());

        let cutoff = self.cutoff.next();
        let resonance = self.resonance.next();
        self.filter.set(cutoff, resonance);

        (self.filter.process(sum) * self.gain).clamp(-1.0, 1.0)
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    fn glide_samples(&self, secs: f32) -> usize {
        (secs.max(0.0) * self.sample_rate).round() as usize
    }
}
