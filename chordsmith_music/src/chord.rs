// Chord construction, qualities and inversions.
//
// A `Chord` is a root note, a quality, an optional alteration and an
// inversion index. Its pitches are derived, never stored: each quality is a
// table of (semitones, letter steps) pairs above the root, so chord tones get
// proper spellings (the seventh of Dm7 is C, not B#).
//
// `build_chord` holds the degree -> quality policy for every genre:
//
// | genre   | rule                                                         |
// |---------|--------------------------------------------------------------|
// | Jazz    | 5 -> M7 (+b9 in minor), 2 -> m7 (+b5 in minor), 1 minor -> m6 |
// | Pop     | 6 -> minor                                                   |
// | Country | 6 -> minor, 2 -> minor                                       |
// | all     | anything else -> triad of the mode                           |
//
// Inversion rotates the lowest notes up an octave; the pitch-class set is
// unchanged.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::genre::Genre;
use crate::note::{Letter, Note};
use crate::scale::{Mode, Scale};

/// Highest inversion index a chord accepts.
pub const MAX_INVERSION: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Major7,
    Minor7,
    Minor6,
    Diminished7,
}

impl ChordQuality {
    /// (semitones, letter steps) above the root for each chord tone.
    fn tones(self) -> &'static [(i32, i32)] {
        match self {
            ChordQuality::Major => &[(0, 0), (4, 2), (7, 4)],
            ChordQuality::Minor => &[(0, 0), (3, 2), (7, 4)],
            ChordQuality::Major7 => &[(0, 0), (4, 2), (7, 4), (11, 6)],
            ChordQuality::Minor7 => &[(0, 0), (3, 2), (7, 4), (10, 6)],
            ChordQuality::Minor6 => &[(0, 0), (3, 2), (7, 4), (9, 5)],
            ChordQuality::Diminished7 => &[(0, 0), (3, 2), (6, 4), (9, 6)],
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Major7 => "M7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Minor6 => "m6",
            ChordQuality::Diminished7 => "dim7",
        }
    }

    pub fn parse(token: &str) -> Result<ChordQuality, InputError> {
        match token {
            "major" => Ok(ChordQuality::Major),
            "minor" => Ok(ChordQuality::Minor),
            "M7" => Ok(ChordQuality::Major7),
            "m7" => Ok(ChordQuality::Minor7),
            "m6" => Ok(ChordQuality::Minor6),
            "dim7" => Ok(ChordQuality::Diminished7),
            other => Err(InputError::UnknownQuality(other.to_string())),
        }
    }

    /// Plain triad for a mode.
    pub fn triad(mode: Mode) -> ChordQuality {
        match mode {
            Mode::Major => ChordQuality::Major,
            Mode::Minor => ChordQuality::Minor,
        }
    }
}

impl FromStr for ChordQuality {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordQuality::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alteration {
    /// Adds a minor ninth above the root.
    FlatNine,
    /// Lowers the fifth by a semitone.
    FlatFive,
}

impl Alteration {
    pub fn token(self) -> &'static str {
        match self {
            Alteration::FlatNine => "b9",
            Alteration::FlatFive => "b5",
        }
    }

    pub fn parse(token: &str) -> Result<Alteration, InputError> {
        match token {
            "b9" => Ok(Alteration::FlatNine),
            "b5" => Ok(Alteration::FlatFive),
            other => Err(InputError::UnknownQuality(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub root: Note,
    pub quality: ChordQuality,
    pub alteration: Option<Alteration>,
    pub inversion: u8,
}

impl Chord {
    /// Root-position chord without alteration.
    pub fn new(root: Note, quality: ChordQuality) -> Self {
        Chord {
            root,
            quality,
            alteration: None,
            inversion: 0,
        }
    }

    pub fn altered(self, alteration: Alteration) -> Self {
        Chord {
            alteration: Some(alteration),
            ..self
        }
    }

    /// Same chord with its lowest `k` notes raised an octave.
    pub fn invert(self, k: u8) -> Result<Chord, InputError> {
        if k > MAX_INVERSION {
            return Err(InputError::InversionOutOfRange(k));
        }
        Ok(Chord {
            inversion: k,
            ..self
        })
    }

    /// Chord tones in root position as (semitones, letter steps).
    fn tones(&self) -> Vec<(i32, i32)> {
        let mut tones: Vec<(i32, i32)> = self.quality.tones().to_vec();
        match self.alteration {
            Some(Alteration::FlatFive) => {
                for tone in tones.iter_mut().filter(|t| t.1 == 4) {
                    tone.0 -= 1;
                }
            }
            Some(Alteration::FlatNine) => tones.push((13, 1)),
            None => {}
        }
        tones
    }

    /// Voiced notes, lowest first, with the inversion applied.
    pub fn notes(&self) -> Vec<Note> {
        let root_midi = self.root.midi();
        let root_index = self.root.letter.index();
        let mut notes: Vec<Note> = self
            .tones()
            .into_iter()
            .map(|(semis, steps)| {
                Note::spelled(Letter::from_index(root_index + steps), root_midi + semis)
            })
            .collect();
        let rotations = (self.inversion as usize).min(notes.len());
        for _ in 0..rotations {
            let lowest = notes.remove(0);
            notes.push(lowest.with_octave(lowest.octave + 1));
        }
        // A raised tone can pass an upper extension (the b9).
        notes.sort_by_key(|n| n.midi());
        notes
    }

    /// MIDI numbers of [`Chord::notes`].
    pub fn pitches(&self) -> Vec<i32> {
        self.notes().into_iter().map(Note::midi).collect()
    }

    pub fn pitch_classes(&self) -> BTreeSet<u8> {
        self.notes().into_iter().map(Note::pitch_class).collect()
    }

    /// Same pitch classes, regardless of octave, spelling or inversion.
    pub fn equivalent(&self, other: &Chord) -> bool {
        self.pitch_classes() == other.pitch_classes()
    }

    /// Move the root `steps` letters and `semitones` semitones; quality,
    /// alteration and inversion are kept.
    pub fn shift_degrees(self, steps: i32, semitones: i32) -> Chord {
        Chord {
            root: self.root.shift_degrees(steps, semitones),
            ..self
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.quality.token())?;
        if let Some(alteration) = self.alteration {
            write!(f, "({})", alteration.token())?;
        }
        if self.inversion > 0 {
            write!(f, " inv{}", self.inversion)?;
        }
        Ok(())
    }
}

/// Quality and alteration a genre gives to `degree` under `mode`.
pub fn quality_for_degree(
    genre: Genre,
    degree: u32,
    mode: Mode,
) -> (ChordQuality, Option<Alteration>) {
    let minor = mode == Mode::Minor;
    match (genre, degree) {
        (Genre::Jazz, 5) => (
            ChordQuality::Major7,
            minor.then_some(Alteration::FlatNine),
        ),
        (Genre::Jazz, 2) => (
            ChordQuality::Minor7,
            minor.then_some(Alteration::FlatFive),
        ),
        (Genre::Jazz, 1) if minor => (ChordQuality::Minor6, None),
        (Genre::Pop | Genre::Country, 6) | (Genre::Country, 2) => (ChordQuality::Minor, None),
        _ => (ChordQuality::triad(mode), None),
    }
}

/// Build the root-position chord on `degree` (1-7) of `scale`.
///
/// `mode` is the harmonic context, which may differ from the scale's own
/// mode while a Jazz progression has flipped.
pub fn build_chord(
    scale: &Scale,
    degree: u32,
    mode: Mode,
    genre: Genre,
) -> Result<Chord, InputError> {
    if !(1..=7).contains(&degree) {
        return Err(InputError::DegreeOutOfRange(degree));
    }
    let root = scale.note_from_degree(degree)?;
    let (quality, alteration) = quality_for_degree(genre, degree, mode);
    let chord = Chord::new(root, quality);
    Ok(match alteration {
        Some(alteration) => chord.altered(alteration),
        None => chord,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_major() -> Scale {
        Scale::new(Note::parse("C").unwrap(), Mode::Major)
    }

    fn names(chord: &Chord) -> Vec<String> {
        chord.notes().iter().map(|n| n.name()).collect()
    }

    #[test]
    fn jazz_policy_in_major() {
        let s = c_major();
        let five = build_chord(&s, 5, Mode::Major, Genre::Jazz).unwrap();
        assert_eq!(five.quality, ChordQuality::Major7);
        assert_eq!(five.alteration, None);
        assert_eq!(names(&five), ["G", "B", "D", "F#"]);

        let two = build_chord(&s, 2, Mode::Major, Genre::Jazz).unwrap();
        assert_eq!(two.quality, ChordQuality::Minor7);
        assert_eq!(names(&two), ["D", "F", "A", "C"]);

        let one = build_chord(&s, 1, Mode::Major, Genre::Jazz).unwrap();
        assert_eq!(one.quality, ChordQuality::Major);
    }

    #[test]
    fn jazz_policy_in_minor_alters() {
        let s = Scale::new(Note::parse("C").unwrap(), Mode::Minor);
        let five = build_chord(&s, 5, Mode::Minor, Genre::Jazz).unwrap();
        assert_eq!(five.alteration, Some(Alteration::FlatNine));
        assert_eq!(five.pitches().len(), 5);

        let two = build_chord(&s, 2, Mode::Minor, Genre::Jazz).unwrap();
        assert_eq!(two.alteration, Some(Alteration::FlatFive));
        assert_eq!(names(&two), ["D", "F", "Ab", "C"]);

        let one = build_chord(&s, 1, Mode::Minor, Genre::Jazz).unwrap();
        assert_eq!(one.quality, ChordQuality::Minor6);
        assert_eq!(names(&one), ["C", "Eb", "G", "A"]);
    }

    #[test]
    fn pop_and_country_force_minor_sixth() {
        let s = c_major();
        for genre in [Genre::Pop, Genre::Country] {
            let six = build_chord(&s, 6, Mode::Major, genre).unwrap();
            assert_eq!(six.quality, ChordQuality::Minor);
            assert_eq!(names(&six), ["A", "C", "E"]);
        }
        // Jazz keeps the mode's triad on 6.
        let six = build_chord(&s, 6, Mode::Major, Genre::Jazz).unwrap();
        assert_eq!(six.quality, ChordQuality::Major);
    }

    #[test]
    fn country_two_is_minor_pop_two_is_not() {
        let s = c_major();
        let country = build_chord(&s, 2, Mode::Major, Genre::Country).unwrap();
        assert_eq!(country.quality, ChordQuality::Minor);
        let pop = build_chord(&s, 2, Mode::Major, Genre::Pop).unwrap();
        assert_eq!(pop.quality, ChordQuality::Major);
    }

    #[test]
    fn degree_out_of_range() {
        let s = c_major();
        assert_eq!(
            build_chord(&s, 0, Mode::Major, Genre::Pop),
            Err(InputError::DegreeOutOfRange(0))
        );
        assert_eq!(
            build_chord(&s, 8, Mode::Major, Genre::Jazz),
            Err(InputError::DegreeOutOfRange(8))
        );
    }

    #[test]
    fn inversion_keeps_pitch_classes() {
        let chord = build_chord(&c_major(), 5, Mode::Major, Genre::Jazz).unwrap();
        for k in 1..=MAX_INVERSION {
            let inverted = chord.invert(k).unwrap();
            assert!(inverted.equivalent(&chord));
            let pitches = inverted.pitches();
            assert_eq!(pitches.len(), chord.pitches().len());
        }
        let first = chord.invert(1).unwrap().pitches();
        assert_eq!(first, vec![71, 74, 78, 79]);
        assert_eq!(chord.invert(3), Err(InputError::InversionOutOfRange(3)));
    }

    #[test]
    fn inverted_flat_nine_stays_ordered() {
        let s = Scale::new(Note::parse("C").unwrap(), Mode::Minor);
        let five = build_chord(&s, 5, Mode::Minor, Genre::Jazz).unwrap();
        assert_eq!(five.pitches(), vec![67, 71, 74, 78, 80]);
        let second = five.invert(2).unwrap();
        assert_eq!(second.pitches(), vec![74, 78, 79, 80, 83]);
        assert!(second.equivalent(&five));
    }

    #[test]
    fn diminished_seventh_spelling() {
        let chord = Chord::new(Note::parse("C#").unwrap(), ChordQuality::Diminished7);
        assert_eq!(names(&chord), ["C#", "E", "G", "Bb"]);
    }

    #[test]
    fn quality_tokens() {
        for token in ["major", "minor", "M7", "m7", "m6", "dim7"] {
            assert_eq!(ChordQuality::parse(token).unwrap().token(), token);
        }
        assert_eq!(
            "sus4".parse::<ChordQuality>(),
            Err(InputError::UnknownQuality("sus4".into()))
        );
        assert_eq!(Alteration::parse("b9"), Ok(Alteration::FlatNine));
    }

    #[test]
    fn shift_degrees_keeps_quality() {
        let chord = Chord::new(Note::parse("F#").unwrap(), ChordQuality::Minor)
            .invert(1)
            .unwrap();
        let moved = chord.shift_degrees(-2, -4);
        assert_eq!(moved.root.name(), "D");
        assert_eq!(moved.quality, ChordQuality::Minor);
        assert_eq!(moved.inversion, 1);
    }
}
