// Entry point for callers: a config plus the one random source every
// generation call draws from.
//
// `Composer` owns the `ComposerConfig` and a `RandomSource` and threads both
// through piece creation, sequencing, symphony building and mixing, so a
// caller never handles the RNG directly. Seeding a composer (or reseeding it)
// makes every subsequent result reproducible.

use log::info;
use serde::{Deserialize, Serialize};

use chordsmith_prng::SeededRng;

use crate::config::ComposerConfig;
use crate::error::{PreconditionError, Result};
use crate::genre::Genre;
use crate::mix;
use crate::piece::Piece;
use crate::progression::SequenceOptions;
use crate::render::RenderSettings;
use crate::rng::RandomSource;
use crate::symphony::{MultiTrackArrangement, PARTS, build_symphony};
use crate::voicing::VoicedChord;

/// Overrides for one symphony. `None` takes the genre's defaults; an empty
/// pool samples from the config's fallback range.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymphonyRequest {
    pub lead_pool: Option<Vec<u8>>,
    pub rhythm_pool: Option<Vec<u8>>,
    pub volumes: Option<[u8; PARTS]>,
}

pub struct Composer<R: RandomSource = SeededRng> {
    config: ComposerConfig,
    rng: R,
}

impl Composer<SeededRng> {
    pub fn seeded(config: ComposerConfig, seed: u64) -> Self {
        Composer {
            config,
            rng: SeededRng::new(seed),
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SeededRng::new(seed);
    }
}

impl<R: RandomSource> Composer<R> {
    pub fn with_rng(config: ComposerConfig, rng: R) -> Self {
        Composer { config, rng }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn create_piece(
        &self,
        genre: Genre,
        name: &str,
        key: &str,
        mode: &str,
        variation: i64,
    ) -> Result<Piece> {
        Piece::create(genre, name, key, mode, variation)
    }

    pub fn sequence<'p>(
        &mut self,
        piece: &'p mut Piece,
        options: SequenceOptions,
    ) -> Result<&'p [VoicedChord]> {
        piece.sequence(options, &self.config, &mut self.rng)
    }

    pub fn generate_symphony(
        &mut self,
        piece: &Piece,
        request: SymphonyRequest,
    ) -> Result<MultiTrackArrangement> {
        if piece.chord_tracks().is_empty() {
            return Err(PreconditionError::NoTracks(piece.name().to_string()).into());
        }
        let defaults = &self.config.profile(piece.genre()).symphony;
        let lead = request.lead_pool.unwrap_or_else(|| defaults.lead_pool.clone());
        let rhythm = request
            .rhythm_pool
            .unwrap_or_else(|| defaults.rhythm_pool.clone());
        let volumes = request.volumes.unwrap_or(defaults.volumes);

        let lead = fill_pool(lead, &self.config, &mut self.rng);
        let rhythm = fill_pool(rhythm, &self.config, &mut self.rng);
        let arrangement = build_symphony(
            piece.chord_tracks(),
            &lead,
            &rhythm,
            volumes,
            self.config.symphony_tempo_bpm,
            &mut self.rng,
        )?;
        info!(
            "symphony for '{}': instruments {:?}",
            piece.name(),
            arrangement.instruments()
        );
        Ok(arrangement)
    }

    pub fn mix(&mut self, a: &Piece, b: &Piece, harmonize: bool) -> Result<Piece> {
        mix::mix(a, b, harmonize, &self.config.mix_voicing, &mut self.rng)
    }

    /// Tempo and instrument for playing a piece of `genre` on its own.
    pub fn render_settings(&self, genre: Genre) -> RenderSettings {
        let profile = self.config.profile(genre);
        RenderSettings {
            tempo_bpm: profile.tempo_bpm,
            instrument: profile.instrument,
        }
    }
}

/// An empty pool is replaced by instruments sampled from the fallback range.
fn fill_pool(pool: Vec<u8>, config: &ComposerConfig, rng: &mut impl RandomSource) -> Vec<u8> {
    if !pool.is_empty() {
        return pool;
    }
    let (lo, hi) = config.fallback_pool;
    let range: Vec<u8> = (lo..hi).collect();
    rng.sample_without_replacement(&range, config.fallback_pool_size.min(range.len()))
        .unwrap_or_default()
}
