mod envelope_editor;
mod keyboard;
mod waveform_plot;

pub use envelope_editor::EnvelopeEditor;
pub use keyboard::{key_at, key_rects, KeyHighlights, KeyRect, KeyboardWidget};
pub use waveform_plot::WaveformPlot;
