//! Seams between the note core and the outside world: the sound engine
//! and whatever draws the keys.

use std::sync::{Arc, OnceLock};

use crate::core::note::NoteId;
use crate::core::params::{Envelope, SynthParams, Waveform};

const ABANDONED: &str = "activation abandoned";

/// Where an activation currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationState {
    Pending,
    Ready,
    Failed(String),
}

/// Single-shot handle for the one-time backend startup.
///
/// Cloning shares the same outcome; once resolved the result never changes.
#[derive(Debug, Clone)]
pub struct Activation {
    outcome: Arc<OnceLock<Result<(), String>>>,
}

/// Write side of a pending [`Activation`]
#[derive(Debug)]
pub struct ActivationResolver {
    outcome: Arc<OnceLock<Result<(), String>>>,
}

impl Activation {
    pub fn pending() -> (Self, ActivationResolver) {
        let outcome = Arc::new(OnceLock::new());
        (
            Activation { outcome: Arc::clone(&outcome) },
            ActivationResolver { outcome },
        )
    }

    pub fn ready() -> Self {
        Self::resolved(Ok(()))
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::resolved(Err(reason.into()))
    }

    fn resolved(result: Result<(), String>) -> Self {
        let (activation, resolver) = Self::pending();
        resolver.resolve(result);
        activation
    }

    pub fn state(&self) -> ActivationState {
        match self.outcome.get() {
            None => ActivationState::Pending,
            Some(Ok(())) => ActivationState::Ready,
            Some(Err(reason)) => ActivationState::Failed(reason.clone()),
        }
    }
}

impl ActivationResolver {
    pub fn resolve(self, result: Result<(), String>) {
        // Only one resolver exists per activation, so the cell is always empty here
        let _ = self.outcome.set(result);
    }
}

impl Drop for ActivationResolver {
    /// A resolver that goes away unresolved (e.g. its thread panicked) fails
    /// the activation, so waiters can retry instead of staying pending.
    fn drop(&mut self) {
        if self.outcome.set(Err(ABANDONED.to_string())).is_ok() {
            log::warn!("audio activation abandoned before it resolved");
        }
    }
}

/// The synthesis engine as seen by the note core
pub trait AudioBackend {
    /// Start the engine. The first call does the real work; later calls hand
    /// back the same activation.
    fn activate(&mut self) -> Activation;

    fn trigger_attack(&mut self, note: NoteId);
    fn trigger_release(&mut self, note: NoteId);
    fn release_all(&mut self);

    fn params(&self) -> &SynthParams;

    fn set_waveform(&mut self, waveform: Waveform);
    /// Glides to the new cutoff over [`PARAM_GLIDE_SECS`](crate::core::params::PARAM_GLIDE_SECS)
    fn set_filter_cutoff(&mut self, hz: f32);
    /// Glides to the new Q over [`PARAM_GLIDE_SECS`](crate::core::params::PARAM_GLIDE_SECS)
    fn set_filter_resonance(&mut self, q: f32);
    fn set_envelope(&mut self, envelope: Envelope);
    fn set_gain_db(&mut self, db: f32);
}

/// Receives highlight changes for on-screen keys
pub trait VisualFeedback {
    fn set_active(&mut self, note: NoteId, active: bool);
    fn clear_all(&mut self);
}
