// Error taxonomy for the composition engine.
//
// Two families: `InputError` for values rejected at the boundary (bad note
// spellings, modes, degrees, pool sizes) and `PreconditionError` for
// operations called on a piece in the wrong lifecycle state. Both are wrapped
// by `MusicError`, which is what every fallible public function returns.
//
// Validation happens when values enter the engine. Generation code past that
// point works on validated types and does not produce errors.

use thiserror::Error;

/// A value supplied by the caller is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("note is empty")]
    EmptyNote,
    #[error("'{0}' is not a note letter (expected A-G)")]
    InvalidLetter(char),
    #[error("unsupported inflection '{0}' (expected a single '#' or 'b')")]
    InvalidInflection(String),
    #[error("unknown mode '{0}' (expected 'major' or 'minor')")]
    InvalidMode(String),
    #[error("unknown genre '{0}'")]
    InvalidGenre(String),
    #[error("variation must be zero or more, got {0}")]
    NegativeVariation(i64),
    #[error("scale degree {0} is out of range")]
    DegreeOutOfRange(u32),
    #[error("unknown chord quality '{0}'")]
    UnknownQuality(String),
    #[error("inversion {0} is out of range (expected 0, 1 or 2)")]
    InversionOutOfRange(u8),
    #[error("{pool} pool has {available} instruments, needs at least {needed}")]
    PoolTooSmall {
        pool: &'static str,
        available: usize,
        needed: usize,
    },
    #[error("volume {0}% is above 100%")]
    VolumeOutOfRange(u8),
}

/// The piece is not in a state where the operation makes sense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("piece '{0}' has not been sequenced")]
    Unsequenced(String),
    #[error("piece '{0}' has no tracks to arrange")]
    NoTracks(String),
    #[error("piece '{0}' has no progression strategy and no tracks")]
    NoStrategy(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MusicError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
}

pub type Result<T> = std::result::Result<T, MusicError>;
