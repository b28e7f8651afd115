// Arpeggiation: turning a chord into timed note events.
//
// A chord is swept across octaves. Two draws pick the register: the start
// octave from the profile's `strokes` range and the stop octave from its
// `spread` range. For every octave from start up to (not including) stop the
// chord's voiced notes are placed with the lowest note in that octave, so
// inversions carry through each stroke. With `double_back` the sweep
// reverses after the peak without repeating the top note.
//
// Events are spaced by the profile interval and all share the profile
// duration, both measured in bars. A `VoicedChord` keeps times relative to
// its own start; `concat` lays a sequence of them end to end.

use serde::{Deserialize, Serialize};

use crate::chord::Chord;
use crate::config::VoicingProfile;
use crate::rng::RandomSource;

/// One sounding note.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch.
    pub pitch: u8,
    /// Onset in bars.
    pub start: f64,
    /// Length in bars.
    pub duration: f64,
}

/// An arpeggiated chord: note events relative to the chord's own start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoicedChord {
    pub events: Vec<NoteEvent>,
    /// Time until the next chord begins, in bars.
    pub length: f64,
}

impl VoicedChord {
    pub fn pitches(&self) -> Vec<u8> {
        self.events.iter().map(|e| e.pitch).collect()
    }
}

/// Draw from `[lo, hi)`, or take `lo` when the range is empty.
fn draw(range: (u8, u8), rng: &mut impl RandomSource) -> i32 {
    rng.uniform_int(range.0 as i64, range.1 as i64) as i32
}

pub fn arpeggiate(chord: &Chord, profile: &VoicingProfile, rng: &mut impl RandomSource) -> VoicedChord {
    let start_octave = draw(profile.strokes, rng);
    let stop_octave = draw(profile.spread, rng).max(start_octave + 1);

    let pitches = chord.pitches();
    let base_octave = pitches.first().map_or(0, |p| p.div_euclid(12) - 1);

    let mut sweep: Vec<u8> = Vec::new();
    for octave in start_octave..stop_octave {
        let shift = (octave - base_octave) * 12;
        sweep.extend(pitches.iter().map(|p| (p + shift).clamp(0, 127) as u8));
    }
    if profile.double_back && sweep.len() > 1 {
        let descent: Vec<u8> = sweep[..sweep.len() - 1].iter().rev().copied().collect();
        sweep.extend(descent);
    }

    let events: Vec<NoteEvent> = sweep
        .into_iter()
        .enumerate()
        .map(|(i, pitch)| NoteEvent {
            pitch,
            start: i as f64 * profile.interval,
            duration: profile.duration,
        })
        .collect();
    let length = events.len() as f64 * profile.interval;
    VoicedChord { events, length }
}

/// Lay voiced chords end to end, returning events with absolute onsets.
pub fn concat(tracks: &[VoicedChord]) -> Vec<NoteEvent> {
    let mut offset = 0.0;
    let mut out = Vec::with_capacity(tracks.iter().map(|t| t.events.len()).sum());
    for track in tracks {
        out.extend(track.events.iter().map(|e| NoteEvent {
            start: e.start + offset,
            ..*e
        }));
        offset += track.length;
    }
    out
}
