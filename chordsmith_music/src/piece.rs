// A named piece of music and its lifecycle.
//
// A `Piece` starts empty: a genre, a key, a mode and a variation count. The
// first `sequence` call runs the genre's progression strategy and stores the
// result; later calls hand back the stored tracks unchanged unless `rerun` is
// set, in which case a complete new `Progression` is generated and swapped in.
//
// Pop and Country only write major-key progressions. Creating one of them in
// minor logs a warning and keeps the piece in major.
//
// Mixed pieces (see mix.rs) are Generic, carry voiced tracks only, and have
// no strategy to regenerate them with.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::chord::Chord;
use crate::config::ComposerConfig;
use crate::error::{InputError, PreconditionError, Result};
use crate::genre::Genre;
use crate::note::Note;
use crate::progression::{Progression, ProgressionStrategy, SequenceOptions};
use crate::rng::RandomSource;
use crate::scale::{Mode, Scale};
use crate::voicing::VoicedChord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    name: String,
    genre: Genre,
    key: Note,
    mode: Mode,
    variation: u32,
    progression: Progression,
}

impl Piece {
    pub fn new(genre: Genre, name: &str, key: Note, mode: Mode, variation: u32) -> Piece {
        let mode = if genre.major_only() && mode == Mode::Minor {
            warn!("{genre} piece '{name}' only supports major keys; using {} major", key.name());
            Mode::Major
        } else {
            mode
        };
        Piece {
            name: name.to_string(),
            genre,
            key,
            mode,
            variation,
            progression: Progression::default(),
        }
    }

    /// Validate textual inputs and build an empty piece.
    pub fn create(genre: Genre, name: &str, key: &str, mode: &str, variation: i64) -> Result<Piece> {
        let key = Note::parse(key)?;
        let mode = Mode::parse(mode)?;
        if variation < 0 {
            return Err(InputError::NegativeVariation(variation).into());
        }
        let variation = u32::try_from(variation).unwrap_or(u32::MAX);
        Ok(Piece::new(genre, name, key, mode, variation))
    }

    /// A voicing-only piece produced by mixing two others.
    pub(crate) fn mixed(name: String, key: Note, variation: u32, tracks: Vec<VoicedChord>) -> Piece {
        Piece {
            name,
            genre: Genre::Generic,
            key,
            mode: Mode::Major,
            variation,
            progression: Progression {
                chord_tracks: tracks,
                ..Progression::default()
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn key(&self) -> Note {
        self.key
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn variation(&self) -> u32 {
        self.variation
    }

    pub fn scale(&self) -> Scale {
        Scale::new(self.key, self.mode)
    }

    pub fn raw_chords(&self) -> &[Chord] {
        &self.progression.raw_chords
    }

    pub fn chord_tracks(&self) -> &[VoicedChord] {
        &self.progression.chord_tracks
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// True once the piece has playable tracks.
    pub fn is_sequenced(&self) -> bool {
        !self.progression.chord_tracks.is_empty()
    }

    /// Generate the progression, or return the stored one.
    ///
    /// With `rerun` false and tracks already present, no random numbers are
    /// drawn. Pieces without a strategy (Generic) return whatever tracks they
    /// have, or `PreconditionError::NoStrategy` when they have none.
    pub fn sequence(
        &mut self,
        options: SequenceOptions,
        config: &ComposerConfig,
        rng: &mut impl RandomSource,
    ) -> Result<&[VoicedChord]> {
        if self.is_sequenced() && !options.rerun {
            return Ok(&self.progression.chord_tracks);
        }
        let Some(strategy) = ProgressionStrategy::for_genre(self.genre) else {
            if self.is_sequenced() {
                return Ok(&self.progression.chord_tracks);
            }
            return Err(PreconditionError::NoStrategy(self.name.clone()).into());
        };

        let next = strategy.generate(&self.scale(), self.variation, options, config, rng)?;
        info!(
            "sequenced '{}' ({} {} {}): {} chords over {} rounds",
            self.name,
            self.genre,
            self.key.name(),
            self.mode,
            next.len(),
            next.templates.len()
        );
        self.progression = next;
        Ok(&self.progression.chord_tracks)
    }
}
