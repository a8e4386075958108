use crate::core::backend::{AudioBackend, VisualFeedback};
use crate::core::controls::{apply_control, ControlEvent};
use crate::core::input::{InputArbitrator, InputEvent, NoteIntent};
use crate::core::layout::KeyLayout;
use crate::core::note::NoteId;
use crate::core::params::SynthParams;
use crate::core::tracker::NoteTracker;
use crate::error::Result;

/// A playable keyboard: input arbitration feeding the note tracker
pub struct KeyboardSession<B, V> {
    arbitrator: InputArbitrator,
    tracker: NoteTracker<B, V>,
}

impl<B: AudioBackend, V: VisualFeedback> KeyboardSession<B, V> {
    pub fn new(layout: KeyLayout, backend: B, visual: V) -> Self {
        Self {
            arbitrator: InputArbitrator::new(layout),
            tracker: NoteTracker::new(backend, visual),
        }
    }

    /// Feed one input event through arbitration and into the tracker.
    ///
    /// Every intent is applied even if an earlier one reports an activation
    /// failure; the first such error is returned.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        let mut outcome = Ok(());
        for intent in self.arbitrator.handle(&event) {
            let result = match intent {
                NoteIntent::Start(note) => self.tracker.handle_start(note).map(|_| ()),
                NoteIntent::Stop(note) => {
                    self.tracker.handle_stop(note);
                    Ok(())
                }
                NoteIntent::ReleaseAll => {
                    self.tracker.panic();
                    Ok(())
                }
            };
            if outcome.is_ok() {
                outcome = result;
            }
        }
        outcome
    }

    pub fn handle_control(&mut self, event: ControlEvent) {
        apply_control(self.tracker.backend_mut(), event);
    }

    /// Drive the pending activation, if any. Call once per frame.
    pub fn poll(&mut self) -> Result<()> {
        self.tracker.poll_activation()
    }

    pub fn layout(&self) -> &KeyLayout {
        self.arbitrator.layout()
    }

    pub fn params(&self) -> &SynthParams {
        self.tracker.backend().params()
    }

    pub fn visual(&self) -> &V {
        self.tracker.visual()
    }

    pub fn is_active(&self, note: NoteId) -> bool {
        self.tracker.is_active(note)
    }

    pub fn active_notes(&self) -> Vec<NoteId> {
        self.tracker.active_notes().collect()
    }

    pub fn is_activation_pending(&self) -> bool {
        self.tracker.is_activation_pending()
    }

    pub fn arbitrator(&self) -> &InputArbitrator {
        &self.arbitrator
    }

    pub fn backend(&self) -> &B {
        self.tracker.backend()
    }
}
