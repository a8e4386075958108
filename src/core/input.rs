//! Input arbitration
//!
//! Turns raw pointer, key and focus events into note intents. Key-repeat and
//! stray key-up events are filtered here so the tracker only ever sees one
//! start per physical press.

use std::collections::BTreeSet;

use crate::core::layout::KeyLayout;
use crate::core::note::NoteId;

/// Raw input as delivered by the windowing layer
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed on an on-screen key; the key captures the pointer
    PointerDown(NoteId),
    PointerUp(NoteId),
    PointerCancel(NoteId),
    LostPointerCapture(NoteId),
    /// Physical key pressed. `key` is the key name as reported by the window
    KeyDown { key: String, repeat: bool },
    KeyUp { key: String },
    /// The window lost keyboard focus
    FocusLost,
}

/// What the tracker should do in response to an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteIntent {
    Start(NoteId),
    Stop(NoteId),
    /// Silence everything, used after focus loss
    ReleaseAll,
}

/// Single authority translating input events into note intents.
///
/// Owns the set of physical keys currently held down.
#[derive(Debug, Clone)]
pub struct InputArbitrator {
    layout: KeyLayout,
    held_keys: BTreeSet<char>,
}

impl InputArbitrator {
    pub fn new(layout: KeyLayout) -> Self {
        Self {
            layout,
            held_keys: BTreeSet::new(),
        }
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn is_key_held(&self, key: char) -> bool {
        self.held_keys.contains(&key.to_ascii_lowercase())
    }

    pub fn held_keys(&self) -> impl Iterator<Item = char> + '_ {
        self.held_keys.iter().copied()
    }

    pub fn handle(&mut self, event: &InputEvent) -> Vec<NoteIntent> {
        match event {
            InputEvent::PointerDown(note) => vec![NoteIntent::Start(*note)],
            InputEvent::PointerUp(note)
            | InputEvent::PointerCancel(note)
            | InputEvent::LostPointerCapture(note) => vec![NoteIntent::Stop(*note)],
            InputEvent::KeyDown { key, repeat } => self.key_down(key, *repeat).into_iter().collect(),
            InputEvent::KeyUp { key } => self.key_up(key).into_iter().collect(),
            InputEvent::FocusLost => self.focus_lost(),
        }
    }

    pub fn key_down(&mut self, key: &str, repeat: bool) -> Option<NoteIntent> {
        let (key, note) = self.resolve(key)?;
        if repeat || self.held_keys.contains(&key) {
            log::trace!("suppressed repeat of '{}'", key);
            return None;
        }
        self.held_keys.insert(key);
        Some(NoteIntent::Start(note))
    }

    pub fn key_up(&mut self, key: &str) -> Option<NoteIntent> {
        let (key, note) = self.resolve(key)?;
        if !self.held_keys.remove(&key) {
            log::trace!("ignored release of '{}' which was not held", key);
            return None;
        }
        Some(NoteIntent::Stop(note))
    }

    /// Stops every held key, forgets them, and asks for a global release
    pub fn focus_lost(&mut self) -> Vec<NoteIntent> {
        let mut intents: Vec<NoteIntent> = self
            .held_keys
            .iter()
            .filter_map(|&key| self.layout.note_for(key))
            .map(NoteIntent::Stop)
            .collect();
        self.held_keys.clear();
        intents.push(NoteIntent::ReleaseAll);
        intents
    }

    /// Key name -> (lowercase char, note). Only single characters are musical keys.
    fn resolve(&self, key: &str) -> Option<(char, NoteId)> {
        let mut chars = key.chars();
        let key = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        self.layout.note_for(key).map(|note| (key, note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: &str) -> NoteId {
        name.parse().unwrap()
    }

    fn arbitrator() -> InputArbitrator {
        InputArbitrator::new(KeyLayout::default())
    }

    fn down(key: &str) -> InputEvent {
        InputEvent::KeyDown { key: key.to_string(), repeat: false }
    }

    fn up(key: &str) -> InputEvent {
        InputEvent::KeyUp { key: key.to_string() }
    }

    #[test]
    fn test_key_down_up() {
        let mut arb = arbitrator();

        assert_eq!(arb.handle(&down("a")), vec![NoteIntent::Start(note("C4"))]);
        assert!(arb.is_key_held('a'));

        assert_eq!(arb.handle(&up("a")), vec![NoteIntent::Stop(note("C4"))]);
        assert!(!arb.is_key_held('a'));
    }

    #[test]
    fn test_repeat_flag_is_suppressed() {
        let mut arb = arbitrator();
        arb.handle(&down("a"));

        for _ in 0..5 {
            let repeat = InputEvent::KeyDown { key: "a".to_string(), repeat: true };
            assert!(arb.handle(&repeat).is_empty());
        }
        assert_eq!(arb.held_keys().collect::<Vec<_>>(), vec!['a']);
    }

    #[test]
    fn test_second_down_without_repeat_flag_is_suppressed() {
        let mut arb = arbitrator();
        arb.handle(&down("a"));
        assert!(arb.handle(&down("A")).is_empty());
    }

    #[test]
    fn test_stray_key_up_is_ignored() {
        let mut arb = arbitrator();
        assert!(arb.handle(&up("s")).is_empty());
        assert_eq!(arb.held_keys().count(), 0);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut arb = arbitrator();
        assert!(arb.handle(&down("z")).is_empty());
        assert!(arb.handle(&down("Shift")).is_empty());
        assert!(arb.handle(&down("")).is_empty());
        assert!(arb.handle(&up("z")).is_empty());
        assert_eq!(arb.held_keys().count(), 0);
    }

    #[test]
    fn test_uppercase_key_names_match() {
        let mut arb = arbitrator();
        assert_eq!(arb.handle(&down("S")), vec![NoteIntent::Start(note("D4"))]);
        assert_eq!(arb.handle(&up("s")), vec![NoteIntent::Stop(note("D4"))]);
    }

    #[test]
    fn test_pointer_events_always_emit() {
        let mut arb = arbitrator();
        let c4 = note("C4");

        assert_eq!(arb.handle(&InputEvent::PointerDown(c4)), vec![NoteIntent::Start(c4)]);
        assert_eq!(arb.handle(&InputEvent::PointerDown(c4)), vec![NoteIntent::Start(c4)]);
        assert_eq!(arb.handle(&InputEvent::PointerUp(c4)), vec![NoteIntent::Stop(c4)]);
        assert_eq!(arb.handle(&InputEvent::PointerCancel(c4)), vec![NoteIntent::Stop(c4)]);
        assert_eq!(arb.handle(&InputEvent::LostPointerCapture(c4)), vec![NoteIntent::Stop(c4)]);
    }

    #[test]
    fn test_pointer_does_not_touch_held_keys() {
        let mut arb = arbitrator();
        arb.handle(&InputEvent::PointerDown(note("C4")));
        arb.handle(&InputEvent::PointerUp(note("C4")));
        assert_eq!(arb.held_keys().count(), 0);
    }

    #[test]
    fn test_focus_lost_stops_held_keys() {
        let mut arb = arbitrator();
        arb.handle(&down("a"));
        arb.handle(&down("s"));

        let intents = arb.handle(&InputEvent::FocusLost);
        assert_eq!(
            intents,
            vec![
                NoteIntent::Stop(note("C4")),
                NoteIntent::Stop(note("D4")),
                NoteIntent::ReleaseAll,
            ]
        );
        assert_eq!(arb.held_keys().count(), 0);

        // The real key-up arrives later and must not produce a second stop
        assert!(arb.handle(&up("a")).is_empty());
    }

    #[test]
    fn test_focus_lost_with_nothing_held() {
        let mut arb = arbitrator();
        assert_eq!(arb.handle(&InputEvent::FocusLost), vec![NoteIntent::ReleaseAll]);
    }
}
