//! Key layout table
//!
//! The fixed mapping between notes, physical keys and on-screen keys.

use std::collections::HashSet;

use crate::core::note::NoteId;
use crate::error::{Error, Result};

/// One playable key: computer key character -> note
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBinding {
    pub note: NoteId,
    /// The character representing this key (lowercase)
    pub key: char,
    /// The text drawn on the on-screen key
    pub label: String,
    /// Whether this is a black key (sharp)
    pub is_sharp: bool,
}

impl KeyBinding {
    pub fn new(note: NoteId, key: char, is_sharp: bool) -> Self {
        Self {
            note,
            key: key.to_ascii_lowercase(),
            label: key.to_ascii_uppercase().to_string(),
            is_sharp,
        }
    }
}

/// Ordered, read-only set of key bindings.
///
/// Each physical key triggers exactly one note and each note has exactly one
/// on-screen key.
#[derive(Debug, Clone)]
pub struct KeyLayout {
    bindings: Vec<KeyBinding>,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::home_row()
    }
}

impl KeyLayout {
    pub fn new(bindings: Vec<KeyBinding>) -> Result<Self> {
        if bindings.is_empty() {
            return Err(Error::Layout("layout has no keys".to_string()));
        }

        let mut keys = HashSet::new();
        let mut notes = HashSet::new();
        for binding in &bindings {
            let key = binding.key.to_ascii_lowercase();
            if !keys.insert(key) {
                return Err(Error::Layout(format!("key '{}' is bound twice", key)));
            }
            if !notes.insert(binding.note) {
                return Err(Error::Layout(format!("note {} is bound twice", binding.note)));
            }
        }

        let bindings = bindings
            .into_iter()
            .map(|b| KeyBinding { key: b.key.to_ascii_lowercase(), ..b })
            .collect();
        Ok(Self { bindings })
    }

    /// One octave from C4 on the home row, sharps on the row above
    ///
    /// ```text
    ///    W   E       T   Y   U
    ///  A   S   D   F   G   H   J
    ///  C4  D4  E4  F4  G4  A4  B4
    /// ```
    pub fn home_row() -> Self {
        const C4: u8 = 60;
        let keys = ['a', 'w', 's', 'e', 'd', 'f', 't', 'g', 'y', 'h', 'u', 'j'];
        let bindings = keys
            .iter()
            .enumerate()
            .map(|(offset, &key)| {
                let note = NoteId::from_midi(C4 + offset as u8);
                KeyBinding::new(note, key, note.is_accidental())
            })
            .collect();
        Self { bindings }
    }

    /// Note bound to a key, case-insensitive
    pub fn note_for(&self, key: char) -> Option<NoteId> {
        let key = key.to_ascii_lowercase();
        self.bindings.iter().find(|b| b.key == key).map(|b| b.note)
    }

    pub fn binding_for_note(&self, note: NoteId) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| b.note == note)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// Number of white keys, i.e. visual slots on the keyboard
    pub fn naturals(&self) -> usize {
        self.bindings.iter().filter(|b| !b.is_sharp).count()
    }
}
