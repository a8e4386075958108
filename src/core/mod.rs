pub mod audio;
pub mod backend;
pub mod controls;
pub mod input;
pub mod layout;
pub mod note;
pub mod params;
pub mod session;
pub mod synth;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use audio::CpalBackend;
pub use backend::{Activation, ActivationState, AudioBackend, VisualFeedback};
pub use controls::ControlEvent;
pub use input::{InputArbitrator, InputEvent, NoteIntent};
pub use layout::{KeyBinding, KeyLayout};
pub use note::NoteId;
pub use params::{Envelope, SynthParams, Waveform};
pub use session::KeyboardSession;
pub use synth::SynthEngine;
pub use tracker::NoteTracker;
