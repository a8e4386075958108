use egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::core::params::Waveform;

const PREVIEW_POINTS: usize = 128;

/// Fixed plot of one period of the selected waveform
pub struct WaveformPlot {
    waveform: Waveform,
    height: f32,
    color: Color32,
}

impl WaveformPlot {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            height: 100.0,
            color: Color32::from_rgb(0, 188, 212),
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut Ui, id_source: impl std::hash::Hash) {
        let points: PlotPoints = self
            .waveform
            .preview(PREVIEW_POINTS)
            .into_iter()
            .map(|[x, y]| [x as f64, y as f64])
            .collect();

        Plot::new(id_source)
            .height(self.height)
            .show_x(false)
            .show_y(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(-1.1)
            .include_y(1.1)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(points).color(self.color).fill(0.0));
            });
    }
}
