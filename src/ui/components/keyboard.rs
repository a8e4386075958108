use std::collections::HashSet;

use egui::{Align2, Color32, FontId, PointerButton, Pos2, Rect, Sense, Ui, Vec2};

use crate::core::backend::VisualFeedback;
use crate::core::input::InputEvent;
use crate::core::layout::KeyLayout;
use crate::core::note::NoteId;

const ACCENT: Color32 = Color32::from_rgb(0, 188, 212);
const ACCENT_DARK: Color32 = Color32::from_rgb(0, 140, 160);
const KEYBOARD_HEIGHT: f32 = 180.0;

/// Which on-screen keys are lit
#[derive(Debug, Default)]
pub struct KeyHighlights {
    lit: HashSet<NoteId>,
}

impl KeyHighlights {
    pub fn is_lit(&self, note: NoteId) -> bool {
        self.lit.contains(&note)
    }

    pub fn count(&self) -> usize {
        self.lit.len()
    }
}

impl VisualFeedback for KeyHighlights {
    fn set_active(&mut self, note: NoteId, active: bool) {
        if active {
            self.lit.insert(note);
        } else {
            self.lit.remove(&note);
        }
    }

    fn clear_all(&mut self) {
        self.lit.clear();
    }
}

/// Screen area of one key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRect {
    pub note: NoteId,
    pub rect: Rect,
    pub is_sharp: bool,
    pub label: String,
}

/// Lay the keys out inside `area`: naturals side by side, sharps on top,
/// centred on the gap before the next natural.
pub fn key_rects(layout: &KeyLayout, area: Rect) -> Vec<KeyRect> {
    let white_width = area.width() / layout.naturals().max(1) as f32;
    let black_size = Vec2::new(white_width * 0.6, area.height() * 0.6);

    let mut whites_so_far = 0;
    let mut keys = Vec::with_capacity(layout.bindings().len());
    for binding in layout.bindings() {
        let rect = if binding.is_sharp {
            let center_x = area.left() + whites_so_far as f32 * white_width;
            Rect::from_min_size(Pos2::new(center_x - black_size.x / 2.0, area.top()), black_size)
        } else {
            let left = area.left() + whites_so_far as f32 * white_width;
            whites_so_far += 1;
            Rect::from_min_size(Pos2::new(left, area.top()), Vec2::new(white_width, area.height()))
        };
        keys.push(KeyRect {
            note: binding.note,
            rect,
            is_sharp: binding.is_sharp,
            label: binding.label.clone(),
        });
    }
    keys
}

/// Key under `pos`; sharps are drawn on top so they win
pub fn key_at(keys: &[KeyRect], pos: Pos2) -> Option<NoteId> {
    keys.iter()
        .filter(|k| k.is_sharp)
        .chain(keys.iter().filter(|k| !k.is_sharp))
        .find(|k| k.rect.contains(pos))
        .map(|k| k.note)
}

/// Clickable piano keyboard.
///
/// A primary-button press captures the pointer to the pressed key until the
/// button is released, so dragging off the key does not end the note. Other
/// buttons are ignored, so a right click never opens anything mid-hold.
pub struct KeyboardWidget {
    captured: Option<NoteId>,
}

impl Default for KeyboardWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardWidget {
    pub fn new() -> Self {
        Self { captured: None }
    }

    pub fn show(&mut self, ui: &mut Ui, layout: &KeyLayout, highlights: &KeyHighlights) -> Vec<InputEvent> {
        let desired_size = Vec2::new(ui.available_width(), KEYBOARD_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::drag());
        let keys = key_rects(layout, rect);
        let mut events = Vec::new();

        if response.drag_started_by(PointerButton::Primary) {
            if let Some(note) = response.interact_pointer_pos().and_then(|pos| key_at(&keys, pos)) {
                if let Some(previous) = self.captured.replace(note) {
                    events.push(InputEvent::LostPointerCapture(previous));
                }
                events.push(InputEvent::PointerDown(note));
            }
        }

        if let Some(note) = self.captured {
            let pointer_gone = ui.input(|i| i.events.iter().any(|e| matches!(e, egui::Event::PointerGone)));
            if pointer_gone {
                events.push(InputEvent::PointerCancel(note));
                self.captured = None;
            } else if response.drag_stopped() {
                events.push(InputEvent::PointerUp(note));
                self.captured = None;
            } else if !ui.input(|i| i.pointer.primary_down()) {
                // Release happened somewhere we never heard about
                events.push(InputEvent::LostPointerCapture(note));
                self.captured = None;
            }
        }

        if ui.is_rect_visible(rect) {
            paint_keys(ui, rect, &keys, highlights);
        }

        events
    }
}

fn paint_keys(ui: &Ui, rect: Rect, keys: &[KeyRect], highlights: &KeyHighlights) {
    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, Color32::from_gray(20));

    for key in keys.iter().filter(|k| !k.is_sharp) {
        let fill = if highlights.is_lit(key.note) { ACCENT } else { Color32::from_gray(235) };
        painter.rect_filled(key.rect.shrink(1.0), 3.0, fill);
        painter.text(
            key.rect.center_bottom() - Vec2::new(0.0, 8.0),
            Align2::CENTER_BOTTOM,
            &key.label,
            FontId::proportional(14.0),
            Color32::from_gray(60),
        );
    }

    for key in keys.iter().filter(|k| k.is_sharp) {
        let fill = if highlights.is_lit(key.note) { ACCENT_DARK } else { Color32::from_gray(30) };
        painter.rect_filled(key.rect, 3.0, fill);
        painter.text(
            key.rect.center_bottom() - Vec2::new(0.0, 6.0),
            Align2::CENTER_BOTTOM,
            &key.label,
            FontId::proportional(12.0),
            Color32::from_gray(200),
        );
    }
}
