// Chordsmith: genre-driven chord progression engine.
//
// Given a key, a mode, a genre and a variation count, Chordsmith writes a
// chord progression, voices every chord as an arpeggio, and can interleave
// two pieces into one or spread a piece across a five-part arrangement.
// Rendering to sound is left to a `Renderer`; a MIDI renderer is included.
//
// Architecture:
// - note.rs: Letters, accidentals, MIDI arithmetic, degree distance
// - scale.rs: Major/minor scales, degree lookup, shifting the root by degrees
// - chord.rs: Chord qualities and alterations, inversion, the degree -> quality
//   policy per genre
// - genre.rs: The four genres and their names
// - progression.rs: Jazz, Pop and Country progression strategies
// - voicing.rs: Arpeggiation of chords into timed note events
// - piece.rs: A named piece and its empty -> sequenced lifecycle
// - mix.rs: Interleaving two pieces, with optional key harmonization
// - symphony.rs: Five-part instrumentation of a sequenced piece
// - composer.rs: Facade owning the config and the random source
// - config.rs: Tunable constants per genre, loadable from JSON
// - rng.rs: The `RandomSource` port and its `SeededRng` implementation
// - render.rs: The `Renderer` port
// - midi.rs: SMF output through midly
// - error.rs: Input and precondition errors
//
// Output is deterministic given a seed.

pub mod chord;
pub mod composer;
pub mod config;
pub mod error;
pub mod genre;
pub mod midi;
pub mod mix;
pub mod note;
pub mod piece;
pub mod progression;
pub mod render;
pub mod rng;
pub mod scale;
pub mod symphony;
pub mod voicing;

pub use composer::{Composer, SymphonyRequest};
pub use config::ComposerConfig;
pub use error::{InputError, MusicError, PreconditionError};
pub use genre::Genre;
pub use piece::Piece;
pub use progression::SequenceOptions;
pub use render::{RenderSettings, Renderer};
