// Data-driven composer configuration.
//
// Every empirically tuned constant of the engine lives here instead of in the
// generation code: arpeggio ranges and spacing per genre, the Jazz mode-flip
// period and key-change timing, symphony instrument pools and volumes, and
// playback tempo/instrument defaults. `ComposerConfig::default()` carries the
// stock values; a JSON file can override any subset of them.
//
// Instrument numbers are General MIDI program numbers counted from 1.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::genre::Genre;

/// How a chord is spread into an arpeggio (see voicing.rs).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoicingProfile {
    /// Octave the sweep starts from, drawn uniformly from `[lo, hi)`.
    pub strokes: (u8, u8),
    /// Octave the sweep stops below, drawn uniformly from `[lo, hi)`.
    pub spread: (u8, u8),
    /// Length of each note event, in bars.
    pub duration: f64,
    /// Gap between consecutive note onsets, in bars.
    pub interval: f64,
    /// Sweep back down after the peak.
    pub double_back: bool,
}

impl VoicingProfile {
    pub fn jazz() -> Self {
        VoicingProfile {
            strokes: (2, 4),
            spread: (4, 7),
            duration: 0.5,
            interval: 0.0625,
            double_back: true,
        }
    }

    /// Jazz chords inserted ahead of a mode flip.
    pub fn jazz_transition() -> Self {
        VoicingProfile {
            spread: (5, 7),
            ..VoicingProfile::jazz()
        }
    }

    pub fn pop() -> Self {
        VoicingProfile {
            strokes: (2, 4),
            spread: (5, 7),
            duration: 0.5,
            interval: 0.125,
            double_back: false,
        }
    }

    pub fn country() -> Self {
        VoicingProfile {
            spread: (4, 7),
            ..VoicingProfile::pop()
        }
    }

    /// Voicing used when interleaving two pieces.
    pub fn mix() -> Self {
        VoicingProfile {
            spread: (5, 7),
            ..VoicingProfile::jazz()
        }
    }
}

/// Instrument pools and volumes a symphony draws from. An empty pool means
/// "sample one from the fallback range" (see `ComposerConfig::fallback_pool`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymphonyDefaults {
    pub lead_pool: Vec<u8>,
    pub rhythm_pool: Vec<u8>,
    /// Volume percentage per part: two leads, then three rhythm parts.
    pub volumes: [u8; 5],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenreProfile {
    /// Voicing for regular progression chords.
    pub chord_voicing: VoicingProfile,
    /// Voicing for inserted chords (Jazz transitions, Country passing chords).
    pub transition_voicing: VoicingProfile,
    pub symphony: SymphonyDefaults,
    /// Single-track playback tempo.
    pub tempo_bpm: u16,
    /// Single-track playback instrument.
    pub instrument: u8,
}

impl GenreProfile {
    pub fn jazz() -> Self {
        GenreProfile {
            chord_voicing: VoicingProfile::jazz(),
            transition_voicing: VoicingProfile::jazz_transition(),
            symphony: SymphonyDefaults {
                lead_pool: vec![1, 2, 3, 12, 26, 52],
                rhythm_pool: vec![27, 32, 40, 56, 57, 64, 65, 66],
                volumes: [85, 75, 70, 65, 55],
            },
            tempo_bpm: 100,
            instrument: 1,
        }
    }

    pub fn pop() -> Self {
        GenreProfile {
            chord_voicing: VoicingProfile::pop(),
            transition_voicing: VoicingProfile::pop(),
            symphony: SymphonyDefaults {
                lead_pool: vec![
                    1, 2, 3, 24, 25, 12, 26, 40, 54, 56, 57, 72, 73, 78, 80, 81, 85, 106, 107, 110,
                ],
                rhythm_pool: vec![
                    5, 9, 27, 28, 32, 33, 34, 35, 41, 42, 52, 53, 64, 65, 66, 67, 91, 92, 95, 104,
                ],
                volumes: [90, 75, 65, 55, 55],
            },
            tempo_bpm: 100,
            instrument: 1,
        }
    }

    pub fn country() -> Self {
        GenreProfile {
            chord_voicing: VoicingProfile::country(),
            transition_voicing: VoicingProfile::country(),
            symphony: SymphonyDefaults {
                lead_pool: vec![1, 2, 21, 22, 24, 25, 72, 73, 78, 79, 105, 106, 107, 110],
                rhythm_pool: vec![9, 19, 27, 31, 32, 35, 36, 37, 64, 65, 66, 67],
                volumes: [90, 80, 65, 55, 55],
            },
            tempo_bpm: 100,
            instrument: 25,
        }
    }

    pub fn generic() -> Self {
        GenreProfile {
            chord_voicing: VoicingProfile::mix(),
            transition_voicing: VoicingProfile::mix(),
            symphony: SymphonyDefaults {
                lead_pool: Vec::new(),
                rhythm_pool: Vec::new(),
                volumes: [80, 80, 70, 70, 70],
            },
            tempo_bpm: 100,
            instrument: 1,
        }
    }
}

/// When and how far the Jazz strategy changes key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChange {
    /// The change happens when this many rounds remain after the current one.
    pub rounds_left: u32,
    /// Degrees the scale moves down.
    pub degrees: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub jazz: GenreProfile,
    pub pop: GenreProfile,
    pub country: GenreProfile,
    pub generic: GenreProfile,
    pub mix_voicing: VoicingProfile,
    /// Jazz rounds whose index is a multiple of this may flip mode.
    /// Zero disables flipping.
    pub mode_flip_period: u32,
    pub key_change: KeyChange,
    /// Instruments `[lo, hi)` sampled from when a genre has an empty pool.
    pub fallback_pool: (u8, u8),
    /// How many instruments to sample for each empty pool.
    pub fallback_pool_size: usize,
    pub symphony_tempo_bpm: u16,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        ComposerConfig {
            jazz: GenreProfile::jazz(),
            pop: GenreProfile::pop(),
            country: GenreProfile::country(),
            generic: GenreProfile::generic(),
            mix_voicing: VoicingProfile::mix(),
            mode_flip_period: 3,
            key_change: KeyChange {
                rounds_left: 2,
                degrees: 2,
            },
            fallback_pool: (1, 70),
            fallback_pool_size: 5,
            symphony_tempo_bpm: 120,
        }
    }
}

impl ComposerConfig {
    pub fn profile(&self, genre: Genre) -> &GenreProfile {
        match genre {
            Genre::Jazz => &self.jazz,
            Genre::Pop => &self.pop,
            Genre::Country => &self.country,
            Genre::Generic => &self.generic,
        }
    }

    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&data)?)
    }
}
