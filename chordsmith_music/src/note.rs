// Note spelling and pitch arithmetic.
//
// A `Note` is a letter (C through B), an accidental (at most one sharp or
// flat), and an octave in scientific pitch notation (C4 = MIDI 60). Pitch
// arithmetic goes through MIDI numbers; spelling is kept separately so that
// scales and chords read the way a musician would write them.
//
// Two kinds of movement:
// - chromatic (`up`, `down`, `transpose`): move by semitones, result spelled
//   canonically with sharps;
// - diatonic (`shift_degrees`): move the letter by N steps and the pitch by a
//   given number of semitones, keeping the letter when one accidental is enough.
//
// `degree_distance` compares roots by letter only. The mixer uses it to decide
// how many degrees to move one piece toward another's key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Octave assigned to notes parsed from a bare key name like `"F#"`.
pub const DEFAULT_OCTAVE: i8 = 4;

/// Note letters in alphabetical pitch order starting from C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Position in C D E F G A B (0-6).
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Letter at `index`, wrapping in both directions.
    pub fn from_index(index: i32) -> Letter {
        Letter::ALL[index.rem_euclid(7) as usize]
    }

    /// Semitones above C of the natural (unaltered) letter.
    pub fn natural_semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn parse(c: char) -> Result<Letter, InputError> {
        match c {
            'C' => Ok(Letter::C),
            'D' => Ok(Letter::D),
            'E' => Ok(Letter::E),
            'F' => Ok(Letter::F),
            'G' => Ok(Letter::G),
            'A' => Ok(Letter::A),
            'B' => Ok(Letter::B),
            other => Err(InputError::InvalidLetter(other)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    Flat,
    Natural,
    Sharp,
}

impl Accidental {
    /// Semitone offset applied to the natural letter.
    pub fn offset(self) -> i32 {
        match self {
            Accidental::Flat => -1,
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }

    fn from_offset(offset: i32) -> Option<Accidental> {
        match offset {
            -1 => Some(Accidental::Flat),
            0 => Some(Accidental::Natural),
            1 => Some(Accidental::Sharp),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Accidental::Flat => "b",
            Accidental::Natural => "",
            Accidental::Sharp => "#",
        }
    }
}

/// A spelled pitch.
///
/// Derived equality compares spelling and octave exactly (`Db4 != C#4`). Use
/// [`Note::same_pitch_class`] for the octave- and spelling-blind comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub letter: Letter,
    pub accidental: Accidental,
    pub octave: i8,
}

/// Canonical spellings by pitch class, sharps only.
const CANONICAL: [(Letter, Accidental); 12] = [
    (Letter::C, Accidental::Natural),
    (Letter::C, Accidental::Sharp),
    (Letter::D, Accidental::Natural),
    (Letter::D, Accidental::Sharp),
    (Letter::E, Accidental::Natural),
    (Letter::F, Accidental::Natural),
    (Letter::F, Accidental::Sharp),
    (Letter::G, Accidental::Natural),
    (Letter::G, Accidental::Sharp),
    (Letter::A, Accidental::Natural),
    (Letter::A, Accidental::Sharp),
    (Letter::B, Accidental::Natural),
];

impl Note {
    pub fn new(letter: Letter, accidental: Accidental, octave: i8) -> Self {
        Note {
            letter,
            accidental,
            octave,
        }
    }

    /// Parse a key name: one letter `A`-`G` plus an optional single `#` or `b`.
    /// The octave is [`DEFAULT_OCTAVE`].
    pub fn parse(text: &str) -> Result<Note, InputError> {
        let text = text.trim();
        let mut chars = text.chars();
        let first = chars.next().ok_or(InputError::EmptyNote)?;
        let letter = Letter::parse(first)?;
        let accidental = match chars.as_str() {
            "" => Accidental::Natural,
            "#" => Accidental::Sharp,
            "b" => Accidental::Flat,
            other => return Err(InputError::InvalidInflection(other.to_string())),
        };
        Ok(Note::new(letter, accidental, DEFAULT_OCTAVE))
    }

    /// Canonically spelled note for a MIDI number.
    pub fn from_midi(midi: i32) -> Note {
        let (letter, accidental) = CANONICAL[midi.rem_euclid(12) as usize];
        Note::new(letter, accidental, (midi.div_euclid(12) - 1) as i8)
    }

    /// Spell `midi` with `letter` if a single accidental reaches it, otherwise
    /// fall back to the canonical spelling.
    pub fn spelled(letter: Letter, midi: i32) -> Note {
        let natural = letter.natural_semitone();
        let offset = match (midi - natural).rem_euclid(12) {
            0 => 0,
            1 => 1,
            11 => -1,
            _ => return Note::from_midi(midi),
        };
        let accidental = Accidental::from_offset(offset).unwrap_or(Accidental::Natural);
        let octave = (midi - natural - offset).div_euclid(12) - 1;
        Note::new(letter, accidental, octave as i8)
    }

    /// MIDI number (C4 = 60). Can fall outside 0-127 for extreme octaves.
    pub fn midi(self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.letter.natural_semitone() + self.accidental.offset()
    }

    /// Pitch class 0-11 with C = 0.
    pub fn pitch_class(self) -> u8 {
        self.midi().rem_euclid(12) as u8
    }

    /// Canonical sharp spelling of the same pitch (`Db4` -> `C#4`, `Cb4` -> `B3`).
    pub fn standardize(self) -> Note {
        Note::from_midi(self.midi())
    }

    /// Same spelling, different octave.
    pub fn with_octave(self, octave: i8) -> Note {
        Note { octave, ..self }
    }

    pub fn transpose(self, semitones: i32) -> Note {
        Note::from_midi(self.midi() + semitones)
    }

    pub fn up(self, semitones: u32) -> Note {
        self.transpose(semitones as i32)
    }

    pub fn down(self, semitones: u32) -> Note {
        self.transpose(-(semitones as i32))
    }

    /// Move the letter by `steps` and the pitch by `semitones`.
    pub fn shift_degrees(self, steps: i32, semitones: i32) -> Note {
        let letter = Letter::from_index(self.letter.index() + steps);
        Note::spelled(letter, self.midi() + semitones)
    }

    /// Equal after standardizing and discarding the octave.
    pub fn same_pitch_class(self, other: Note) -> bool {
        self.pitch_class() == other.pitch_class()
    }

    /// Letter and accidental without the octave, e.g. `"Bb"`.
    pub fn name(self) -> String {
        format!("{}{}", self.letter.as_char(), self.accidental.symbol())
    }
}

/// Signed letter distance `index(a) - index(b)` on C D E F G A B.
///
/// `degree_distance(C, E) == -2`: C sits two letters below E.
pub fn degree_distance(a: Note, b: Note) -> i32 {
    a.letter.index() - b.letter.index()
}

impl FromStr for Note {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(text: &str) -> Note {
        Note::parse(text).unwrap()
    }

    #[test]
    fn parse_accepts_naturals_and_single_inflections() {
        assert_eq!(n("C"), Note::new(Letter::C, Accidental::Natural, 4));
        assert_eq!(n("F#"), Note::new(Letter::F, Accidental::Sharp, 4));
        assert_eq!(n("Db"), Note::new(Letter::D, Accidental::Flat, 4));
        assert_eq!(n(" G "), Note::new(Letter::G, Accidental::Natural, 4));
    }

    #[test]
    fn parse_rejects_bad_letters_and_inflections() {
        assert_eq!(Note::parse("H"), Err(InputError::InvalidLetter('H')));
        assert_eq!(Note::parse("c"), Err(InputError::InvalidLetter('c')));
        assert_eq!(Note::parse(""), Err(InputError::EmptyNote));
        assert_eq!(
            Note::parse("C##"),
            Err(InputError::InvalidInflection("##".into()))
        );
        assert_eq!(
            Note::parse("Ebb"),
            Err(InputError::InvalidInflection("bb".into()))
        );
        assert_eq!(
            Note::parse("Cx"),
            Err(InputError::InvalidInflection("x".into()))
        );
    }

    #[test]
    fn midi_numbers() {
        assert_eq!(n("C").midi(), 60);
        assert_eq!(n("A").midi(), 69);
        assert_eq!(n("Cb").midi(), 59);
        assert_eq!(n("B#").midi(), 72);
    }

    #[test]
    fn standardize_respells_with_sharps() {
        assert_eq!(n("Db").standardize(), n("C#"));
        assert_eq!(n("E#").standardize(), n("F"));
        assert_eq!(n("Cb").standardize(), Note::new(Letter::B, Accidental::Natural, 3));
        assert_eq!(n("G").standardize(), n("G"));
    }

    #[test]
    fn chromatic_moves_cross_octaves() {
        let b3 = Note::new(Letter::B, Accidental::Natural, 3);
        assert_eq!(b3.up(1), n("C"));
        assert_eq!(n("C").down(1), b3);
        assert_eq!(n("C").up(12).octave, 5);
    }

    #[test]
    fn spelled_keeps_letter_when_possible() {
        // Eb as the third of C minor.
        assert_eq!(Note::spelled(Letter::E, 63), n("Eb"));
        // F# needs a sharp on F.
        assert_eq!(Note::spelled(Letter::F, 66), n("F#"));
        // Cb is B-natural's pitch in the octave above.
        assert_eq!(Note::spelled(Letter::C, 59), n("Cb"));
        // Two semitones off the letter: falls back to canonical.
        assert_eq!(Note::spelled(Letter::C, 62), n("D"));
    }

    #[test]
    fn shift_degrees_moves_letter_and_pitch() {
        // E major chord root down two degrees toward C major: E -> C.
        assert_eq!(n("E").shift_degrees(-2, -4), n("C"));
        // F# down two degrees and four semitones: D.
        assert_eq!(n("F#").shift_degrees(-2, -4), n("D"));
        // G up one degree and two semitones: A.
        assert_eq!(n("G").shift_degrees(1, 2), n("A"));
    }

    #[test]
    fn degree_distance_is_signed_letter_difference() {
        assert_eq!(degree_distance(n("C"), n("E")), -2);
        assert_eq!(degree_distance(n("E"), n("C")), 2);
        assert_eq!(degree_distance(n("C#"), n("Cb")), 0);
        assert_eq!(degree_distance(n("B"), n("C")), 6);
    }

    #[test]
    fn pitch_class_equality_ignores_octave_and_spelling() {
        assert!(n("C#").same_pitch_class(n("Db").with_octave(2)));
        assert!(!n("C").same_pitch_class(n("C#")));
    }

    #[test]
    fn display_includes_octave() {
        assert_eq!(n("Bb").to_string(), "Bb4");
        assert_eq!(n("Bb").name(), "Bb");
    }
}
