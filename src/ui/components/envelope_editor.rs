use egui::{Color32, Pos2, Rect, Stroke, Ui, Vec2};

use crate::core::controls::ControlEvent;
use crate::core::params::Envelope;

pub struct EnvelopeEditor {
    envelope: Envelope,
    width: f32,
    height: f32,
}

impl EnvelopeEditor {
    pub fn new(envelope: &Envelope) -> Self {
        Self {
            envelope: *envelope,
            width: 200.0,
            height: 80.0,
        }
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// One event per stage the user moved this frame
    pub fn show(&self, ui: &mut Ui) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        let mut env = self.envelope;

        ui.vertical(|ui| {
            if ui.add(egui::Slider::new(&mut env.attack, 0.0..=2.0).text("Attack").suffix(" s")).changed() {
                events.push(ControlEvent::Attack(env.attack));
            }
            if ui.add(egui::Slider::new(&mut env.decay, 0.0..=2.0).text("Decay").suffix(" s")).changed() {
                events.push(ControlEvent::Decay(env.decay));
            }
            if ui.add(egui::Slider::new(&mut env.sustain, 0.0..=1.0).text("Sustain")).changed() {
                events.push(ControlEvent::Sustain(env.sustain));
            }
            if ui.add(egui::Slider::new(&mut env.release, 0.0..=3.0).text("Release").suffix(" s")).changed() {
                events.push(ControlEvent::Release(env.release));
            }
        });

        let desired_size = Vec2::new(self.width, self.height);
        let (rect, _response) = ui.allocate_exact_size(desired_size, egui::Sense::hover());

        if ui.is_rect_visible(rect) {
            let stroke = Stroke::new(1.5, Color32::from_rgb(0, 200, 200));
            ui.painter().add(egui::Shape::line(envelope_points(&env, rect), stroke));
        }

        events
    }
}

/// Polyline of the ADSR shape; sustain gets a fixed share of the width
pub fn envelope_points(env: &Envelope, rect: Rect) -> Vec<Pos2> {
    let total = (env.attack + env.decay + env.release).max(f32::EPSILON);
    let attack_width = (env.attack / total).min(0.33);
    let decay_width = (env.decay / total).min(0.33);
    let sustain_width = 0.2;
    let release_width = (env.release / total).min(0.33);

    let total_width = attack_width + decay_width + sustain_width + release_width;

    let left = rect.left();
    let bottom = rect.bottom() - 2.0;
    let width = rect.width();
    let height = rect.height() - 4.0;

    let x2 = left + width * attack_width / total_width;
    let x3 = x2 + width * decay_width / total_width;
    let x4 = x3 + width * sustain_width / total_width;
    let x5 = x4 + width * release_width / total_width;
    let sustain_y = bottom - height * env.sustain;

    vec![
        Pos2::new(left, bottom),
        Pos2::new(x2, bottom - height),
        Pos2::new(x3, sustain_y),
        Pos2::new(x4, sustain_y),
        Pos2::new(x5, bottom),
    ]
}
