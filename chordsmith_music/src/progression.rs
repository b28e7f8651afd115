// Per-genre chord progression strategies.
//
// Each genre draws progression templates (sequences of scale degrees) from
// a fixed library and turns them into chords through chord.rs, voicing each
// chord as it goes. The three strategies share one contract,
// `ProgressionStrategy::generate`, and differ only in how they walk the
// templates:
//
// - Jazz: `variation + 1` rounds, one random template per round (minor keys
//   use only the first three). A running local mode can flip in rounds whose
//   index is a multiple of the flip period; each flip is announced by a
//   degree-4 chord in the old mode. With a key change requested, the scale
//   drops two degrees when two rounds remain.
// - Pop: one template, voiced once, repeated `variation` times verbatim.
// - Country: `variation + 1` rounds; every degree-2 chord is preceded by a
//   diminished seventh a semitone below it.
//
// Main chords in Jazz and Country get a random first or second inversion.
// Inserted chords (transitions, passing chords) stay in root position.
//
// Generation is a pure function of its inputs and the RNG stream: the same
// seed yields the same progression.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::chord::{Chord, ChordQuality, MAX_INVERSION, build_chord};
use crate::config::ComposerConfig;
use crate::error::InputError;
use crate::genre::Genre;
use crate::rng::RandomSource;
use crate::scale::{Mode, Scale};
use crate::voicing::{VoicedChord, arpeggiate};

pub static JAZZ_TEMPLATES: [&[u32]; 5] = [&[5, 1], &[2, 5], &[2, 5, 1], &[4, 5, 1], &[1, 6, 2, 5]];

/// Minor-key Jazz only uses this many templates from the front of the library.
pub const JAZZ_MINOR_TEMPLATES: usize = 3;

pub static POP_TEMPLATES: [&[u32]; 6] = [
    &[1, 5, 6, 4],
    &[1, 6, 4, 5],
    &[1, 4, 5],
    &[1, 4, 6, 5],
    &[6, 4, 1, 5],
    &[1, 4, 1],
];

pub static COUNTRY_TEMPLATES: [&[u32]; 5] =
    [&[1, 4, 5], &[1, 5, 4], &[1, 5, 4, 6], &[1, 4, 6, 5], &[1, 2, 4]];

/// Degree of the chord announcing a Jazz mode flip.
const TRANSITION_DEGREE: u32 = 4;

/// Degree preceded by a passing diminished seventh in Country.
const COUNTRY_PASSING_TARGET: u32 = 2;

/// Why a chord is in the progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChordRole {
    /// Built from a template token.
    Degree(u32),
    /// Jazz chord announcing a mode flip.
    Transition,
    /// Country diminished seventh leading into degree 2.
    Passing,
}

/// Generated chords and their voicings. A generated progression keeps
/// `raw_chords`, `chord_tracks` and `roles` the same length; a mixed piece
/// carries tracks only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub raw_chords: Vec<Chord>,
    pub chord_tracks: Vec<VoicedChord>,
    pub roles: Vec<ChordRole>,
    /// Template index picked for each round.
    pub templates: Vec<usize>,
}

impl Progression {
    pub fn len(&self) -> usize {
        self.raw_chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_chords.is_empty()
    }

    fn push(&mut self, chord: Chord, role: ChordRole, track: VoicedChord) {
        self.raw_chords.push(chord);
        self.chord_tracks.push(track);
        self.roles.push(role);
    }

    /// The whole progression played `times` times in a row.
    fn repeated(&self, times: usize) -> Progression {
        Progression {
            raw_chords: self.raw_chords.repeat(times),
            chord_tracks: std::iter::repeat_n(&self.chord_tracks, times)
                .flatten()
                .cloned()
                .collect(),
            roles: self.roles.repeat(times),
            templates: self.templates.clone(),
        }
    }
}

/// Options for one `sequence` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOptions {
    /// Replace an existing progression instead of returning it.
    pub rerun: bool,
    /// Jazz only: drop the key near the end of the piece.
    pub change_key: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressionStrategy {
    Jazz,
    Pop,
    Country,
}

impl ProgressionStrategy {
    /// Strategy for a genre. Generic pieces have none.
    pub fn for_genre(genre: Genre) -> Option<ProgressionStrategy> {
        match genre {
            Genre::Jazz => Some(ProgressionStrategy::Jazz),
            Genre::Pop => Some(ProgressionStrategy::Pop),
            Genre::Country => Some(ProgressionStrategy::Country),
            Genre::Generic => None,
        }
    }

    /// Template library the strategy picks from in `mode`.
    pub fn templates(self, mode: Mode) -> &'static [&'static [u32]] {
        match (self, mode) {
            (ProgressionStrategy::Jazz, Mode::Minor) => &JAZZ_TEMPLATES[..JAZZ_MINOR_TEMPLATES],
            (ProgressionStrategy::Jazz, Mode::Major) => &JAZZ_TEMPLATES,
            (ProgressionStrategy::Pop, _) => &POP_TEMPLATES,
            (ProgressionStrategy::Country, _) => &COUNTRY_TEMPLATES,
        }
    }

    pub fn generate(
        self,
        scale: &Scale,
        variation: u32,
        options: SequenceOptions,
        config: &ComposerConfig,
        rng: &mut impl RandomSource,
    ) -> Result<Progression, InputError> {
        match self {
            ProgressionStrategy::Jazz => jazz(scale, variation, options, config, rng),
            ProgressionStrategy::Pop => pop(scale, variation, config, rng),
            ProgressionStrategy::Country => country(scale, variation, config, rng),
        }
    }
}

fn random_inversion(rng: &mut impl RandomSource) -> u8 {
    rng.uniform_int(1, MAX_INVERSION as i64 + 1) as u8
}

fn pick_template(
    library: &'static [&'static [u32]],
    rng: &mut impl RandomSource,
) -> (usize, &'static [u32]) {
    let index = rng.index(library.len()).unwrap_or(0);
    (index, library[index])
}

fn jazz(
    scale: &Scale,
    variation: u32,
    options: SequenceOptions,
    config: &ComposerConfig,
    rng: &mut impl RandomSource,
) -> Result<Progression, InputError> {
    let profile = &config.jazz;
    let library = ProgressionStrategy::Jazz.templates(scale.mode);
    let period = config.mode_flip_period;
    let mut active = *scale;
    let mut local_mode = scale.mode;
    let mut out = Progression::default();

    for round in 0..=variation {
        let (index, template) = pick_template(library, rng);
        out.templates.push(index);

        if options.change_key && variation - round == config.key_change.rounds_left {
            active = active.down(config.key_change.degrees);
            debug!("jazz round {round}: key change to {}", active.root.name());
        }
        debug!("jazz round {round}: template {template:?} in {local_mode}");

        for &degree in template {
            if period > 0 && round % period == 0 {
                let drawn = if rng.coin_flip() { Mode::Major } else { Mode::Minor };
                if drawn != local_mode {
                    let transition = build_chord(&active, TRANSITION_DEGREE, local_mode, Genre::Jazz)?;
                    let track = arpeggiate(&transition, &profile.transition_voicing, rng);
                    out.push(transition, ChordRole::Transition, track);
                    local_mode = drawn;
                }
            }

            let chord = build_chord(&active, degree, local_mode, Genre::Jazz)?
                .invert(random_inversion(rng))?;
            let track = arpeggiate(&chord, &profile.chord_voicing, rng);
            out.push(chord, ChordRole::Degree(degree), track);
        }
    }
    Ok(out)
}

fn pop(
    scale: &Scale,
    variation: u32,
    config: &ComposerConfig,
    rng: &mut impl RandomSource,
) -> Result<Progression, InputError> {
    let profile = &config.pop;
    let (index, template) = pick_template(ProgressionStrategy::Pop.templates(scale.mode), rng);
    debug!("pop: template {template:?}, repeated {variation}x");

    let mut pass = Progression::default();
    pass.templates.push(index);
    for &degree in template {
        let chord = build_chord(scale, degree, scale.mode, Genre::Pop)?;
        let track = arpeggiate(&chord, &profile.chord_voicing, rng);
        pass.push(chord, ChordRole::Degree(degree), track);
    }
    // A piece always plays its progression at least once.
    Ok(pass.repeated(variation.max(1) as usize))
}

fn country(
    scale: &Scale,
    variation: u32,
    config: &ComposerConfig,
    rng: &mut impl RandomSource,
) -> Result<Progression, InputError> {
    let profile = &config.country;
    let library = ProgressionStrategy::Country.templates(scale.mode);
    let mut out = Progression::default();

    for round in 0..=variation {
        let (index, template) = pick_template(library, rng);
        out.templates.push(index);
        debug!("country round {round}: template {template:?}");

        for &degree in template {
            if degree == COUNTRY_PASSING_TARGET {
                let root = scale.note_from_degree(degree)?.down(1);
                let passing = Chord::new(root, ChordQuality::Diminished7);
                let track = arpeggiate(&passing, &profile.transition_voicing, rng);
                out.push(passing, ChordRole::Passing, track);
            }
            let chord = build_chord(scale, degree, scale.mode, Genre::Country)?
                .invert(random_inversion(rng))?;
            let track = arpeggiate(&chord, &profile.chord_voicing, rng);
            out.push(chord, ChordRole::Degree(degree), track);
        }
    }
    Ok(out)
}
