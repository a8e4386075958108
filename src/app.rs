use eframe::egui;

use crate::config::AppConfig;
use crate::core::audio::CpalBackend;
use crate::core::input::InputEvent;
use crate::core::layout::KeyLayout;
use crate::core::session::KeyboardSession;
use crate::error::Result;
use crate::ui::components::{KeyHighlights, KeyboardWidget};
use crate::ui::panels::ControlPanel;

// Main app state
pub struct KeyboardApp {
    session: KeyboardSession<CpalBackend, KeyHighlights>,
    keyboard: KeyboardWidget,
    controls: ControlPanel,
    status: Option<String>,
}

impl KeyboardApp {
    pub fn new(config: AppConfig) -> Self {
        let backend = CpalBackend::new(config.params, config.max_polyphony);
        Self {
            session: KeyboardSession::new(KeyLayout::home_row(), backend, KeyHighlights::default()),
            keyboard: KeyboardWidget::new(),
            controls: ControlPanel::new(),
            status: None,
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        let result = self.session.handle_input(event);
        self.report(result);
    }

    fn report(&mut self, result: Result<()>) {
        match result {
            Ok(()) => {
                if !self.session.active_notes().is_empty() {
                    self.status = None;
                }
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }
}

fn render_status(ui: &mut egui::Ui, session: &KeyboardSession<CpalBackend, KeyHighlights>, status: Option<&str>) {
    ui.horizontal(|ui| {
        if session.is_activation_pending() {
            ui.spinner();
            ui.label("Starting audio...");
        } else if let Some(status) = status {
            ui.colored_label(egui::Color32::from_rgb(230, 80, 80), status);
        } else {
            let held: Vec<String> = session.active_notes().iter().map(|n| n.to_string()).collect();
            ui.label(if held.is_empty() { "-".to_string() } else { held.join(" ") });
        }
    });
}

/// Keyboard and focus events egui collected this frame
fn window_events(ctx: &egui::Context) -> Vec<InputEvent> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key { key, pressed: true, repeat, .. } => Some(InputEvent::KeyDown {
                    key: key.name().to_string(),
                    repeat: *repeat,
                }),
                egui::Event::Key { key, pressed: false, .. } => Some(InputEvent::KeyUp {
                    key: key.name().to_string(),
                }),
                egui::Event::WindowFocused(false) => Some(InputEvent::FocusLost),
                _ => None,
            })
            .collect()
    })
}

impl eframe::App for KeyboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for event in window_events(ctx) {
            self.handle_input(event);
        }

        let polled = self.session.poll();
        self.report(polled);

        let mut pointer_events = Vec::new();
        let mut control_events = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Poly Keys");
            ui.label("Play with the mouse or the A W S E D F T G Y H U J keys.");
            ui.add_space(8.0);

            pointer_events = self.keyboard.show(ui, self.session.layout(), self.session.visual());
            render_status(ui, &self.session, self.status.as_deref());

            ui.separator();
            control_events = self.controls.show(ui, self.session.params());
        });

        for event in pointer_events {
            self.handle_input(event);
        }
        for event in control_events {
            self.session.handle_control(event);
        }

        // Activation is polled per frame, keep frames coming
        ctx.request_repaint();
    }
}
