//! Recording doubles for the backend and visual seams

use std::collections::BTreeSet;

use crate::core::backend::{Activation, ActivationResolver, AudioBackend, VisualFeedback};
use crate::core::note::NoteId;
use crate::core::params::{Envelope, SynthParams, Waveform};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Activate,
    Attack(NoteId),
    Release(NoteId),
    ReleaseAll,
    Waveform(Waveform),
    FilterCutoff(f32),
    FilterResonance(f32),
    Envelope(Envelope),
    GainDb(f32),
}

/// How `activate` behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationMode {
    Immediate,
    Deferred,
    Failing,
}

pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
    pub params: SynthParams,
    mode: ActivationMode,
    activation: Option<Activation>,
    resolver: Option<ActivationResolver>,
}

impl RecordingBackend {
    pub fn new(mode: ActivationMode) -> Self {
        Self {
            calls: Vec::new(),
            params: SynthParams::default(),
            mode,
            activation: None,
            resolver: None,
        }
    }

    pub fn set_mode(&mut self, mode: ActivationMode) {
        self.mode = mode;
    }

    /// Finish a deferred activation
    pub fn resolve(&mut self, result: Result<(), String>) {
        if let Some(resolver) = self.resolver.take() {
            resolver.resolve(result);
        }
    }

    /// Drop a deferred activation without resolving it
    pub fn abandon(&mut self) {
        self.resolver = None;
    }

    pub fn attacks(&self, note: NoteId) -> usize {
        self.calls.iter().filter(|c| **c == BackendCall::Attack(note)).count()
    }

    pub fn releases(&self, note: NoteId) -> usize {
        self.calls.iter().filter(|c| **c == BackendCall::Release(note)).count()
    }

    pub fn count(&self, call: &BackendCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    /// Calls that make or stop sound, without activation bookkeeping
    pub fn note_calls(&self) -> Vec<BackendCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Attack(_) | BackendCall::Release(_) | BackendCall::ReleaseAll))
            .cloned()
            .collect()
    }
}

impl AudioBackend for RecordingBackend {
    fn activate(&mut self) -> Activation {
        self.calls.push(BackendCall::Activate);
        if let Some(activation) = &self.activation {
            if !matches!(activation.state(), crate::core::backend::ActivationState::Failed(_)) {
                return activation.clone();
            }
        }
        let activation = match self.mode {
            ActivationMode::Immediate => Activation::ready(),
            ActivationMode::Failing => Activation::failed("audio device denied"),
            ActivationMode::Deferred => {
                let (activation, resolver) = Activation::pending();
                self.resolver = Some(resolver);
                activation
            }
        };
        self.activation = Some(activation.clone());
        activation
    }

    fn trigger_attack(&mut self, note: NoteId) {
        self.calls.push(BackendCall::Attack(note));
    }

    fn trigger_release(&mut self, note: NoteId) {
        self.calls.push(BackendCall::Release(note));
    }

    fn release_all(&mut self) {
        self.calls.push(BackendCall::ReleaseAll);
    }

    fn params(&self) -> &SynthParams {
        &self.params
    }

    fn set_waveform(&mut self, waveform: Waveform) {
        self.params.waveform = waveform;
        self.calls.push(BackendCall::Waveform(waveform));
    }

    fn set_filter_cutoff(&mut self, hz: f32) {
        self.params.filter_cutoff_hz = hz;
        self.calls.push(BackendCall::FilterCutoff(hz));
    }

    fn set_filter_resonance(&mut self, q: f32) {
        self.params.filter_resonance = q;
        self.calls.push(BackendCall::FilterResonance(q));
    }

    fn set_envelope(&mut self, envelope: Envelope) {
        self.params.envelope = envelope;
        self.calls.push(BackendCall::Envelope(envelope));
    }

    fn set_gain_db(&mut self, db: f32) {
        self.params.volume_db = db;
        self.calls.push(BackendCall::GainDb(db));
    }
}

#[derive(Debug, Default)]
pub struct RecordingVisual {
    pub lit: BTreeSet<NoteId>,
    pub changes: Vec<(NoteId, bool)>,
    pub clears: usize,
}

impl VisualFeedback for RecordingVisual {
    fn set_active(&mut self, note: NoteId, active: bool) {
        if active {
            self.lit.insert(note);
        } else {
            self.lit.remove(&note);
        }
        self.changes.push((note, active));
    }

    fn clear_all(&mut self) {
        self.lit.clear();
        self.clears += 1;
    }
}
