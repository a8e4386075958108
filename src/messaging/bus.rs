use crossbeam_channel::{unbounded, Receiver, Sender};

use super::EngineMessage;
use crate::core::synth::SynthEngine;

/// MessageBus carries commands from the UI thread into the audio callback.
///
/// Both ends are cheap to clone; the callback keeps its own copy and drains
/// it once per buffer.
#[derive(Clone)]
pub struct MessageBus {
    sender: Sender<EngineMessage>,
    receiver: Receiver<EngineMessage>,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        MessageBus { sender, receiver }
    }

    pub fn send(&self, msg: EngineMessage) {
        // The bus holds a receiver itself, so sending cannot fail while it lives
        if let Err(err) = self.sender.send(msg) {
            log::warn!("engine message dropped: {:?}", err.into_inner());
        }
    }

    pub fn try_receive(&self) -> Option<EngineMessage> {
        self.receiver.try_recv().ok()
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Drop everything queued; returns how many messages were discarded
    pub fn clear(&self) -> usize {
        self.receiver.try_iter().count()
    }

    /// Apply up to `max_messages` pending messages to the engine
    pub fn process_messages(&self, engine: &mut SynthEngine, max_messages: usize) -> usize {
        let mut count = 0;
        while count < max_messages {
            let Ok(msg) = self.receiver.try_recv() else {
                break;
            };
            count += 1;
            handle_message(engine, msg);
        }
        count
    }
}

fn handle_message(engine: &mut SynthEngine, msg: EngineMessage) {
    match msg {
        EngineMessage::NoteOn(note) => engine.note_on(note),
        EngineMessage::NoteOff(note) => engine.note_off(note),
        EngineMessage::AllNotesOff => engine.all_notes_off(),
        EngineMessage::SetWaveform(waveform) => engine.set_waveform(waveform),
        EngineMessage::SetEnvelope(envelope) => engine.set_envelope(envelope),
        EngineMessage::SetFilterCutoff { hz, glide_secs } => engine.set_filter_cutoff(hz, glide_secs),
        EngineMessage::SetFilterResonance { q, glide_secs } => engine.set_filter_resonance(q, glide_secs),
        EngineMessage::SetGain(gain) => engine.set_gain(gain),
    }
}
