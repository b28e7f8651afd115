// MIDI output for arrangements.
//
// Converts a MultiTrackArrangement into a Standard MIDI File (SMF Format 1).
// Track 0 carries the tempo; each arranged part gets its own track and
// channel, opened with a program change for its instrument and a channel
// volume for its volume percentage. Note events are measured in bars of four
// quarter notes.
//
// Uses the `midly` crate for MIDI writing.

use std::path::Path;

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

use crate::render::Renderer;
use crate::symphony::{ArrangedTrack, MultiTrackArrangement};

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

const QUARTERS_PER_BAR: f64 = 4.0;

/// Channel 10 is reserved for percussion in General MIDI.
const PERCUSSION_CHANNEL: u8 = 9;

const VELOCITY: u8 = 80;

/// Controller number for channel volume.
const CHANNEL_VOLUME: u8 = 7;

/// Renders arrangements to in-memory SMF bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct MidiRenderer;

impl Renderer for MidiRenderer {
    type Output = Vec<u8>;
    type Error = std::io::Error;

    fn render_arrangement(
        &mut self,
        arrangement: &MultiTrackArrangement,
    ) -> Result<Vec<u8>, std::io::Error> {
        let smf = arrangement_to_smf(arrangement);
        let mut buf = Vec::new();
        smf.write_std(&mut buf)?;
        Ok(buf)
    }
}

/// Write rendered MIDI bytes to a file.
pub fn write_midi(bytes: &[u8], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, bytes)?;
    Ok(())
}

fn bars_to_ticks(bars: f64) -> u32 {
    (bars * QUARTERS_PER_BAR * TICKS_PER_QUARTER as f64).round().max(0.0) as u32
}

/// Skip the percussion channel so parts always sound pitched.
fn channel_for_part(part: usize) -> u4 {
    let channel = part as u8 % 15;
    u4::new(if channel >= PERCUSSION_CHANNEL { channel + 1 } else { channel })
}

fn arrangement_to_smf(arrangement: &MultiTrackArrangement) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let tempo_microseconds = 60_000_000 / arrangement.tempo_bpm.max(1) as u32;
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]);

    for (part, arranged) in arrangement.tracks.iter().enumerate() {
        smf.tracks.push(part_track(arranged, channel_for_part(part)));
    }
    smf
}

fn part_track(part: &ArrangedTrack, channel: u4) -> Track<'static> {
    let mut track: Track<'static> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(part.instrument.saturating_sub(1).min(127)),
            },
        },
    });
    let volume = (part.volume_percent.min(100) as u32 * 127 / 100) as u8;
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::Controller {
                controller: u7::new(CHANNEL_VOLUME),
                value: u7::new(volume),
            },
        },
    });

    // (tick, is_on, pitch). Offs sort before ons at the same tick so a
    // note ending as the same pitch starts is released first.
    let offset = part.start_time;
    let mut events: Vec<(u32, bool, u8)> = Vec::with_capacity(part.events.len() * 2);
    for note in &part.events {
        let pitch = note.pitch.min(127);
        events.push((bars_to_ticks(offset + note.start), true, pitch));
        events.push((bars_to_ticks(offset + note.start + note.duration), false, pitch));
    }
    events.sort();

    // Overlapping strikes of one pitch share a single key: it is released
    // only when the last of them ends.
    let mut sounding = [0u32; 128];
    let mut last_tick = 0;
    for (tick, is_on, pitch) in events {
        let held = &mut sounding[pitch as usize];
        if is_on {
            *held += 1;
        } else {
            *held = held.saturating_sub(1);
            if *held > 0 {
                continue;
            }
        }
        let message = if is_on {
            MidiMessage::NoteOn {
                key: u7::new(pitch),
                vel: u7::new(VELOCITY),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(pitch),
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}
