use crate::core::note::NoteId;
use crate::core::params::{Envelope, Waveform};

/// Commands from the UI thread to the audio engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    NoteOn(NoteId),
    NoteOff(NoteId),
    AllNotesOff,
    SetWaveform(Waveform),
    SetEnvelope(Envelope),
    SetFilterCutoff { hz: f32, glide_secs: f32 },
    SetFilterResonance { q: f32, glide_secs: f32 },
    /// Linear gain, already converted from decibels
    SetGain(f32),
}
