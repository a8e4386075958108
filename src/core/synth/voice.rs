use crate::core::note::NoteId;
use crate::core::params::{Envelope, Waveform};
use crate::core::synth::envelope::EnvelopeGenerator;

/// One sounding note inside the engine
#[derive(Debug, Clone)]
pub struct Voice {
    pub note: NoteId,
    /// Start order, used to pick the oldest voice when stealing
    pub started: u64,
    phase: f32,
    phase_increment: f32,
    envelope: EnvelopeGenerator,
}

impl Voice {
    pub fn new(note: NoteId, started: u64, envelope: Envelope, sample_rate: f32) -> Self {
        Self {
            note,
            started,
            phase: 0.0,
            phase_increment: note.frequency() / sample_rate,
            envelope: EnvelopeGenerator::new(envelope, sample_rate),
        }
    }

    pub fn release(&mut self) {
        self.envelope.note_off();
    }

    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.envelope.set_settings(envelope);
    }

    pub fn is_releasing(&self) -> bool {
        self.envelope.is_releasing()
    }

    pub fn is_finished(&self) -> bool {
        self.envelope.is_finished()
    }

    pub fn next_sample(&mut self, waveform: Waveform) -> f32 {
        let value = waveform.sample(self.phase) * self.envelope.next();
        self.phase = (self.phase + self.phase_increment) % 1.0;
        value
    }
}
