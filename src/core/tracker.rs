//! Note lifecycle tracking
//!
//! The tracker is the only place that talks to the audio backend about
//! notes. Membership in the active set decides every attack and release, so
//! callers may send duplicate or unmatched intents freely.

use std::collections::BTreeSet;

use crate::core::backend::{Activation, ActivationState, AudioBackend, VisualFeedback};
use crate::core::note::NoteId;
use crate::error::{Error, Result};

/// Cached state of the one-time backend activation
#[derive(Debug)]
enum Gate {
    Idle,
    Pending(Activation),
    Ready,
}

pub struct NoteTracker<B, V> {
    backend: B,
    visual: V,
    active: BTreeSet<NoteId>,
    // Attacks held back until activation resolves, in press order
    deferred: Vec<NoteId>,
    gate: Gate,
}

impl<B: AudioBackend, V: VisualFeedback> NoteTracker<B, V> {
    pub fn new(backend: B, visual: V) -> Self {
        Self {
            backend,
            visual,
            active: BTreeSet::new(),
            deferred: Vec::new(),
            gate: Gate::Idle,
        }
    }

    /// Start a note. Returns `Ok(false)` if it was already sounding.
    ///
    /// The note becomes active and highlighted right away; the attack itself
    /// waits for the backend activation if that is still in flight. An error
    /// means the activation failed and the note was dropped again.
    pub fn handle_start(&mut self, note: NoteId) -> Result<bool> {
        if !self.active.insert(note) {
            log::trace!("{} already active", note);
            return Ok(false);
        }
        self.visual.set_active(note, true);

        if matches!(self.gate, Gate::Ready) {
            log::debug!("attack {}", note);
            self.backend.trigger_attack(note);
            return Ok(true);
        }

        self.deferred.push(note);
        if matches!(self.gate, Gate::Idle) {
            log::info!("activating audio backend");
            self.gate = Gate::Pending(self.backend.activate());
        }
        self.poll_activation()?;
        Ok(true)
    }

    /// Stop a note. Returns `false` if it was not sounding.
    pub fn handle_stop(&mut self, note: NoteId) -> bool {
        if !self.active.remove(&note) {
            log::trace!("{} not active", note);
            return false;
        }
        self.visual.set_active(note, false);

        if let Some(pos) = self.deferred.iter().position(|n| *n == note) {
            // The backend never heard of this note, so there is nothing to release
            self.deferred.remove(pos);
            log::debug!("cancelled deferred attack of {}", note);
        } else {
            log::debug!("release {}", note);
            self.backend.trigger_release(note);
        }
        true
    }

    /// All notes off. Safe to call at any time, any number of times.
    pub fn panic(&mut self) {
        if !self.active.is_empty() {
            log::debug!("panic with {} active notes", self.active.len());
        }
        self.active.clear();
        self.deferred.clear();
        self.visual.clear_all();
        self.backend.release_all();
    }

    /// Advance a pending activation.
    ///
    /// On success every deferred note is attacked. On failure the deferred
    /// notes are dropped from the active set and un-highlighted, and the next
    /// start will try to activate again.
    pub fn poll_activation(&mut self) -> Result<()> {
        let Gate::Pending(activation) = &self.gate else {
            return Ok(());
        };

        match activation.state() {
            ActivationState::Pending => Ok(()),
            ActivationState::Ready => {
                log::info!("audio backend ready");
                self.gate = Gate::Ready;
                for note in self.deferred.drain(..) {
                    log::debug!("attack {} (deferred)", note);
                    self.backend.trigger_attack(note);
                }
                Ok(())
            }
            ActivationState::Failed(reason) => {
                log::warn!("audio activation failed: {}", reason);
                self.gate = Gate::Idle;
                for note in self.deferred.drain(..) {
                    self.active.remove(&note);
                    self.visual.set_active(note, false);
                }
                Err(Error::Activation(reason))
            }
        }
    }

    pub fn is_active(&self, note: NoteId) -> bool {
        self.active.contains(&note)
    }

    pub fn active_notes(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.active.iter().copied()
    }

    pub fn is_activation_pending(&self) -> bool {
        matches!(self.gate, Gate::Pending(_))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn visual(&self) -> &V {
        &self.visual
    }
}
