// The renderer port.
//
// The engine never produces audio or files itself. It hands finished tracks
// to a `Renderer`, which turns them into whatever artifact it deals in (a
// MIDI byte buffer in midi.rs, a handle to a playback job elsewhere).
// Renderer failures go back to the caller; nothing in the core depends on a
// render succeeding.

use serde::{Deserialize, Serialize};

use crate::symphony::{ArrangedTrack, MultiTrackArrangement};
use crate::voicing::{VoicedChord, concat};

/// Playback parameters for a single-part render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub tempo_bpm: u16,
    /// General MIDI program number, counted from 1.
    pub instrument: u8,
}

pub trait Renderer {
    type Output;
    type Error: std::error::Error;

    fn render_arrangement(
        &mut self,
        arrangement: &MultiTrackArrangement,
    ) -> Result<Self::Output, Self::Error>;

    /// Render one part played by one instrument at full volume.
    fn render_tracks(
        &mut self,
        tracks: &[VoicedChord],
        settings: &RenderSettings,
    ) -> Result<Self::Output, Self::Error> {
        self.render_arrangement(&single_part(tracks, settings))
    }
}

pub fn single_part(tracks: &[VoicedChord], settings: &RenderSettings) -> MultiTrackArrangement {
    MultiTrackArrangement {
        tempo_bpm: settings.tempo_bpm,
        tracks: vec![ArrangedTrack {
            instrument: settings.instrument,
            volume_percent: 100,
            start_time: 0.0,
            events: concat(tracks),
        }],
    }
}
