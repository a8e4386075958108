//! Routing of control-panel changes to backend setters

use crate::core::backend::AudioBackend;
use crate::core::params::Waveform;

/// A single change coming from the control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    Waveform(Waveform),
    VolumeDb(f32),
    FilterCutoff(f32),
    FilterResonance(f32),
    Attack(f32),
    Decay(f32),
    Sustain(f32),
    Release(f32),
}

/// Apply one control change as exactly one setter call.
///
/// Envelope stages are merged into the backend's current envelope so the
/// backend always receives a complete envelope.
pub fn apply_control<B: AudioBackend + ?Sized>(backend: &mut B, event: ControlEvent) {
    log::debug!("control {:?}", event);
    match event {
        ControlEvent::Waveform(waveform) => backend.set_waveform(waveform),
        ControlEvent::VolumeDb(db) => backend.set_gain_db(db),
        ControlEvent::FilterCutoff(hz) => backend.set_filter_cutoff(hz),
        ControlEvent::FilterResonance(q) => backend.set_filter_resonance(q),
        ControlEvent::Attack(_) | ControlEvent::Decay(_) | ControlEvent::Sustain(_) | ControlEvent::Release(_) => {
            let mut envelope = backend.params().envelope;
            match event {
                ControlEvent::Attack(secs) => envelope.attack = secs.max(0.0),
                ControlEvent::Decay(secs) => envelope.decay = secs.max(0.0),
                ControlEvent::Sustain(level) => envelope.sustain = level.clamp(0.0, 1.0),
                ControlEvent::Release(secs) => envelope.release = secs.max(0.0),
                _ => unreachable!(),
            }
            backend.set_envelope(envelope);
        }
    }
}
