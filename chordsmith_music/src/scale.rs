// Seven-degree major and minor scales.
//
// A `Scale` is a root note plus a mode. Degree notes are computed on demand:
// degree n (1-indexed) takes the letter n-1 steps above the root's letter and
// the pitch given by the mode's interval table, so C minor spells its third
// as Eb rather than D#. Degrees past 7 wrap with octave continuation (degree
// 8 is the root an octave up).
//
// Shifting a scale by N degrees re-roots it on the note N degrees away and
// keeps the mode. The Jazz strategy uses this for its late key change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::note::{Letter, Note};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Semitones above the root for degrees 1-7.
    pub fn intervals(self) -> [i32; 7] {
        match self {
            Mode::Major => [0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    pub fn parse(text: &str) -> Result<Mode, InputError> {
        match text.trim() {
            "major" => Ok(Mode::Major),
            "minor" => Ok(Mode::Minor),
            other => Err(InputError::InvalidMode(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }
}

impl FromStr for Mode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::parse(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    pub root: Note,
    pub mode: Mode,
}

impl Scale {
    pub fn new(root: Note, mode: Mode) -> Self {
        Scale { root, mode }
    }

    /// Note at a 1-indexed degree. Degrees above 7 continue into higher
    /// octaves; degree 0 is rejected.
    pub fn note_from_degree(&self, degree: u32) -> Result<Note, InputError> {
        if degree == 0 {
            return Err(InputError::DegreeOutOfRange(degree));
        }
        Ok(self.note_at_offset(degree as i32 - 1))
    }

    /// The seven degree notes, root first.
    pub fn degrees(&self) -> [Note; 7] {
        std::array::from_fn(|i| self.note_at_offset(i as i32))
    }

    /// New scale rooted `steps` degrees away in `direction`, same mode.
    pub fn shift(&self, steps: u32, direction: Direction) -> Scale {
        let offset = match direction {
            Direction::Up => steps as i32,
            Direction::Down => -(steps as i32),
        };
        Scale::new(self.note_at_offset(offset), self.mode)
    }

    pub fn up(&self, steps: u32) -> Scale {
        self.shift(steps, Direction::Up)
    }

    pub fn down(&self, steps: u32) -> Scale {
        self.shift(steps, Direction::Down)
    }

    /// Note `offset` scale steps from the root (0 = root, negative = below).
    fn note_at_offset(&self, offset: i32) -> Note {
        let step = offset.rem_euclid(7);
        let octaves = offset.div_euclid(7);
        let midi = self.root.midi() + self.mode.intervals()[step as usize] + 12 * octaves;
        Note::spelled(Letter::from_index(self.root.letter.index() + step), midi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(root: &str, mode: Mode) -> Scale {
        Scale::new(Note::parse(root).unwrap(), mode)
    }

    fn names(notes: &[Note]) -> Vec<String> {
        notes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn c_major_degrees() {
        let s = scale("C", Mode::Major);
        assert_eq!(names(&s.degrees()), ["C", "D", "E", "F", "G", "A", "B"]);
    }

    #[test]
    fn c_minor_uses_flats() {
        let s = scale("C", Mode::Minor);
        assert_eq!(names(&s.degrees()), ["C", "D", "Eb", "F", "G", "Ab", "Bb"]);
    }

    #[test]
    fn f_sharp_major_spelling() {
        let s = scale("F#", Mode::Major);
        assert_eq!(names(&s.degrees()), ["F#", "G#", "A#", "B", "C#", "D#", "E#"]);
    }

    #[test]
    fn degree_wraps_with_octave() {
        let s = scale("D", Mode::Major);
        let root = s.note_from_degree(1).unwrap();
        let octave_up = s.note_from_degree(8).unwrap();
        assert_eq!(octave_up.midi(), root.midi() + 12);
        assert_eq!(s.note_from_degree(9).unwrap().name(), "E");
        assert_eq!(s.note_from_degree(0), Err(InputError::DegreeOutOfRange(0)));
    }

    #[test]
    fn shifting_reroots_and_keeps_mode() {
        let s = scale("C", Mode::Major);
        let down = s.down(2);
        assert_eq!(down.root.name(), "A");
        assert_eq!(down.root.octave, 3);
        assert_eq!(down.mode, Mode::Major);
        let up = s.up(4);
        assert_eq!(up.root.name(), "G");
        assert_eq!(s.shift(2, Direction::Down), down);
        // The original scale is untouched.
        assert_eq!(s.root.name(), "C");
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(Mode::parse("major"), Ok(Mode::Major));
        assert_eq!("minor".parse::<Mode>(), Ok(Mode::Minor));
        assert_eq!(
            Mode::parse("dorian"),
            Err(InputError::InvalidMode("dorian".into()))
        );
    }
}
