use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Convert MIDI note number to frequency in Hz
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0f32.powf((note as f32 - 69.0) / 12.0)
}

/// Identity of a pitch and octave, e.g. `C#4`.
///
/// Stored as a MIDI note number so that equality, hashing and ordering follow
/// pitch. `C4` is MIDI 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(u8);

impl NoteId {
    pub const fn from_midi(note: u8) -> Self {
        NoteId(note)
    }

    pub fn midi(self) -> u8 {
        self.0
    }

    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    /// Whether the pitch class is a sharp (a black key on a piano)
    pub fn is_accidental(self) -> bool {
        NOTE_NAMES[(self.0 % 12) as usize].len() == 2
    }

    pub fn frequency(self) -> f32 {
        midi_note_to_freq(self.0)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", NOTE_NAMES[(self.0 % 12) as usize], self.octave())
    }
}

impl FromStr for NoteId {
    type Err = Error;

    /// Parses scientific pitch notation. Flats are accepted (`Db4` == `C#4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNote(s.to_string());
        let mut chars = s.chars();

        let letter = chars.next().ok_or_else(invalid)?;
        let mut pitch_class: i16 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let octave_str = match rest.chars().next() {
            Some('#') => {
                pitch_class += 1;
                &rest[1..]
            }
            Some('b') => {
                pitch_class -= 1;
                &rest[1..]
            }
            _ => rest,
        };

        let octave: i16 = octave_str.parse().map_err(|_| invalid())?;
        if !(-1..=9).contains(&octave) {
            return Err(invalid());
        }
        let midi = (octave + 1) * 12 + pitch_class;
        if !(0..=127).contains(&midi) {
            return Err(invalid());
        }
        Ok(NoteId(midi as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_sharps() {
        assert_eq!(NoteId::from_midi(60).to_string(), "C4");
        assert_eq!(NoteId::from_midi(61).to_string(), "C#4");
        assert_eq!(NoteId::from_midi(69).to_string(), "A4");
        assert_eq!(NoteId::from_midi(47).to_string(), "B2");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("C4".parse::<NoteId>().unwrap().midi(), 60);
        assert_eq!("C#4".parse::<NoteId>().unwrap().midi(), 61);
        assert_eq!("Db4".parse::<NoteId>().unwrap().midi(), 61);
        assert_eq!("a4".parse::<NoteId>().unwrap().midi(), 69);
        assert_eq!("C-1".parse::<NoteId>().unwrap().midi(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("H4".parse::<NoteId>().is_err());
        assert!("C".parse::<NoteId>().is_err());
        assert!("".parse::<NoteId>().is_err());
        assert!("G9x".parse::<NoteId>().is_err());
        assert!("G#9".parse::<NoteId>().is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_octaves() {
        assert!(matches!("C3000".parse::<NoteId>(), Err(Error::InvalidNote(_))));
        assert!(matches!("C-3000".parse::<NoteId>(), Err(Error::InvalidNote(_))));
        assert!(matches!("A10".parse::<NoteId>(), Err(Error::InvalidNote(_))));
        assert!(matches!("Cb-1".parse::<NoteId>(), Err(Error::InvalidNote(_))));
        assert_eq!("G9".parse::<NoteId>().unwrap().midi(), 127);
    }

    #[test]
    fn test_frequency() {
        assert!((NoteId::from_midi(69).frequency() - 440.0).abs() < 1e-3);
        assert!((NoteId::from_midi(60).frequency() - 261.626).abs() < 1e-2);
    }

    #[test]
    fn test_accidentals() {
        assert!(!"C4".parse::<NoteId>().unwrap().is_accidental());
        assert!("F#4".parse::<NoteId>().unwrap().is_accidental());
    }
}
