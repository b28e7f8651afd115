// Five-part arrangement of an existing voiced progression.
//
// The same note sequence is doubled across two lead parts and three rhythm
// parts. Instruments are sampled without replacement from a lead pool and a
// rhythm pool, and each part gets its own volume. All parts start together.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::rng::RandomSource;
use crate::voicing::{NoteEvent, VoicedChord, concat};

pub const LEAD_PARTS: usize = 2;
pub const RHYTHM_PARTS: usize = 3;
pub const PARTS: usize = LEAD_PARTS + RHYTHM_PARTS;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrangedTrack {
    /// General MIDI program number, counted from 1.
    pub instrument: u8,
    pub volume_percent: u8,
    /// Offset of the part's first event, in bars.
    pub start_time: f64,
    pub events: Vec<NoteEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiTrackArrangement {
    pub tempo_bpm: u16,
    /// Lead parts first, then rhythm parts.
    pub tracks: Vec<ArrangedTrack>,
}

impl MultiTrackArrangement {
    pub fn instruments(&self) -> Vec<u8> {
        self.tracks.iter().map(|t| t.instrument).collect()
    }
}

fn sample_pool(
    pool: &[u8],
    needed: usize,
    name: &'static str,
    rng: &mut impl RandomSource,
) -> Result<Vec<u8>, InputError> {
    rng.sample_without_replacement(pool, needed)
        .ok_or(InputError::PoolTooSmall {
            pool: name,
            available: pool.len(),
            needed,
        })
}

pub fn build_symphony(
    chord_tracks: &[VoicedChord],
    lead_pool: &[u8],
    rhythm_pool: &[u8],
    volumes: [u8; PARTS],
    tempo_bpm: u16,
    rng: &mut impl RandomSource,
) -> Result<MultiTrackArrangement, InputError> {
    if let Some(&loud) = volumes.iter().find(|&&v| v > 100) {
        return Err(InputError::VolumeOutOfRange(loud));
    }
    let mut instruments = sample_pool(lead_pool, LEAD_PARTS, "lead", rng)?;
    instruments.extend(sample_pool(rhythm_pool, RHYTHM_PARTS, "rhythm", rng)?);

    let events = concat(chord_tracks);
    let tracks = instruments
        .into_iter()
        .zip(volumes)
        .map(|(instrument, volume_percent)| ArrangedTrack {
            instrument,
            volume_percent,
            start_time: 0.0,
            events: events.clone(),
        })
        .collect();
    Ok(MultiTrackArrangement { tempo_bpm, tracks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordsmith_prng::SeededRng;

    fn track() -> VoicedChord {
        VoicedChord {
            events: vec![
                NoteEvent {
                    pitch: 60,
                    start: 0.0,
                    duration: 0.5,
                },
                NoteEvent {
                    pitch: 64,
                    start: 0.125,
                    duration: 0.5,
                },
            ],
            length: 0.25,
        }
    }

    #[test]
    fn five_parts_share_events() {
        let mut rng = SeededRng::new(4);
        let tracks = vec![track(), track()];
        let lead = [1, 2, 3, 12, 26, 52];
        let rhythm = [27, 32, 40, 56, 57, 64, 65, 66];
        let arrangement =
            build_symphony(&tracks, &lead, &rhythm, [85, 75, 70, 65, 55], 120, &mut rng).unwrap();

        assert_eq!(arrangement.tracks.len(), PARTS);
        assert_eq!(arrangement.tempo_bpm, 120);
        let volumes: Vec<u8> = arrangement.tracks.iter().map(|t| t.volume_percent).collect();
        assert_eq!(volumes, vec![85, 75, 70, 65, 55]);
        for part in &arrangement.tracks {
            assert_eq!(part.events.len(), 4);
            assert_eq!(part.start_time, 0.0);
            assert_eq!(part.events[2].start, 0.25);
        }

        let instruments = arrangement.instruments();
        assert!(instruments[..2].iter().all(|i| lead.contains(i)));
        assert!(instruments[2..].iter().all(|i| rhythm.contains(i)));
        assert_ne!(instruments[0], instruments[1]);
        assert_ne!(instruments[2], instruments[3]);
        assert_ne!(instruments[3], instruments[4]);
        assert_ne!(instruments[2], instruments[4]);
    }

    #[test]
    fn small_pools_are_rejected() {
        let mut rng = SeededRng::new(4);
        let err = build_symphony(&[track()], &[1], &[2, 3, 4], [80; 5], 120, &mut rng);
        assert_eq!(
            err,
            Err(InputError::PoolTooSmall {
                pool: "lead",
                available: 1,
                needed: 2
            })
        );
        let err = build_symphony(&[track()], &[1, 2], &[3, 4], [80; 5], 120, &mut rng);
        assert!(matches!(
            err,
            Err(InputError::PoolTooSmall { pool: "rhythm", .. })
        ));
    }

    #[test]
    fn volume_above_full_is_rejected() {
        let mut rng = SeededRng::new(4);
        let err = build_symphony(&[track()], &[1, 2], &[3, 4, 5], [80, 80, 101, 70, 70], 120, &mut rng);
        assert_eq!(err, Err(InputError::VolumeOutOfRange(101)));
    }
}
