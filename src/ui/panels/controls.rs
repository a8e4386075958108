use egui::Ui;

use crate::core::controls::ControlEvent;
use crate::core::params::{SynthParams, Waveform};
use crate::ui::components::{EnvelopeEditor, WaveformPlot};

/// Sound controls. Reads the live parameters and reports what the user
/// changed; nothing here touches the synth directly.
#[derive(Default)]
pub struct ControlPanel;

impl ControlPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&self, ui: &mut Ui, params: &SynthParams) -> Vec<ControlEvent> {
        let mut events = Vec::new();

        ui.heading("Sound");

        let mut waveform = params.waveform;
        ui.horizontal(|ui| {
            ui.label("Waveform:");
            egui::ComboBox::new("waveform_selector", "")
                .selected_text(waveform.name())
                .show_ui(ui, |ui| {
                    for option in Waveform::ALL {
                        ui.selectable_value(&mut waveform, option, option.name());
                    }
                });
        });
        if waveform != params.waveform {
            events.push(ControlEvent::Waveform(waveform));
        }

        WaveformPlot::new(waveform).height(80.0).show(ui, "waveform_preview");

        let mut volume_db = params.volume_db;
        if ui
            .add(egui::Slider::new(&mut volume_db, -40.0..=0.0).text("Volume").suffix(" dB"))
            .changed()
        {
            events.push(ControlEvent::VolumeDb(volume_db));
        }

        ui.collapsing("Filter", |ui| {
            let mut cutoff = params.filter_cutoff_hz;
            if ui
                .add(
                    egui::Slider::new(&mut cutoff, 20.0..=20_000.0)
                        .logarithmic(true)
                        .text("Cutoff")
                        .suffix(" Hz"),
                )
                .changed()
            {
                events.push(ControlEvent::FilterCutoff(cutoff));
            }

            let mut resonance = params.filter_resonance;
            if ui
                .add(egui::Slider::new(&mut resonance, 0.1..=20.0).logarithmic(true).text("Q"))
                .changed()
            {
                events.push(ControlEvent::FilterResonance(resonance));
            }
        });

        ui.collapsing("Envelope (ADSR)", |ui| {
            events.extend(EnvelopeEditor::new(&params.envelope).show(ui));
        });

        events
    }
}
