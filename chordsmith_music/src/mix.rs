// Interleaving two sequenced pieces into one.
//
// The chords of piece A and piece B are walked in lockstep up to the shorter
// length. A flag selects which side is played at each position, starting
// with A; whenever the two chords at a position share the same pitch classes
// the flag flips, so the mix hands over between the pieces on common ground.
//
// With `harmonize`, B is first moved into A's key: each of B's chords moves
// by the letter distance between the two keys, and by the matching semitone
// interval so the letter names stay diatonic to the new key. When the keys
// share a letter there is nothing to move and B's existing tracks are used,
// just as without harmonizing.
//
// The result is a voicing-only Generic piece in A's key.

use log::info;

use crate::chord::Chord;
use crate::config::VoicingProfile;
use crate::error::{PreconditionError, Result};
use crate::note::{Note, degree_distance};
use crate::piece::Piece;
use crate::rng::RandomSource;
use crate::voicing::arpeggiate;

/// Semitones that carry `from` onto `to`, going the way `letters` points.
fn key_interval(to: Note, from: Note, letters: i32) -> i32 {
    let up = (to.pitch_class() as i32 - from.pitch_class() as i32).rem_euclid(12);
    if letters < 0 && up != 0 { up - 12 } else { up }
}

/// B's chords moved into A's key, or `None` when no move is needed.
fn harmonized(a: &Piece, b: &Piece) -> Option<Vec<Chord>> {
    let letters = degree_distance(a.key(), b.key());
    if letters == 0 {
        return None;
    }
    let semitones = key_interval(a.key(), b.key(), letters);
    Some(
        b.raw_chords()
            .iter()
            .map(|chord| chord.shift_degrees(letters, semitones))
            .collect(),
    )
}

pub fn mix(
    a: &Piece,
    b: &Piece,
    harmonize: bool,
    voicing: &VoicingProfile,
    rng: &mut impl RandomSource,
) -> Result<Piece> {
    for piece in [a, b] {
        if piece.raw_chords().is_empty() {
            return Err(PreconditionError::Unsequenced(piece.name().to_string()).into());
        }
    }

    let moved = if harmonize { harmonized(a, b) } else { None };
    let b_chords = moved.as_deref().unwrap_or(b.raw_chords());
    let len = a.raw_chords().len().min(b_chords.len());

    let mut use_a = true;
    let mut handovers = 0;
    let mut tracks = Vec::with_capacity(len);
    for (i, (chord_a, chord_b)) in a.raw_chords().iter().zip(b_chords).enumerate() {
        let track = if use_a {
            arpeggiate(chord_a, voicing, rng)
        } else if moved.is_some() {
            arpeggiate(chord_b, voicing, rng)
        } else {
            b.chord_tracks()[i].clone()
        };
        tracks.push(track);

        if chord_a.equivalent(chord_b) {
            use_a = !use_a;
            handovers += 1;
        }
    }

    let name = format!("{} + {}", a.name(), b.name());
    info!(
        "mixed '{name}': {len} chords, {handovers} handovers{}",
        if moved.is_some() { ", harmonized" } else { "" }
    );
    Ok(Piece::mixed(name, a.key(), a.variation(), tracks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::ChordQuality;
    use crate::config::ComposerConfig;
    use crate::error::MusicError;
    use crate::genre::Genre;
    use crate::progression::SequenceOptions;
    use crate::scale::Mode;
    use chordsmith_prng::SeededRng;

    fn sequenced(genre: Genre, key: &str, variation: i64, seed: u64) -> Piece {
        let mut piece = Piece::create(genre, key, key, "major", variation).unwrap();
        let mut rng = SeededRng::new(seed);
        piece
            .sequence(SequenceOptions::default(), &ComposerConfig::default(), &mut rng)
            .unwrap();
        piece
    }

    #[test]
    fn unsequenced_input_is_rejected() {
        let a = sequenced(Genre::Pop, "C", 1, 1);
        let b = Piece::create(Genre::Pop, "B", "D", "major", 1).unwrap();
        let mut rng = SeededRng::new(0);
        let err = mix(&a, &b, false, &VoicingProfile::mix(), &mut rng);
        assert_eq!(
            err,
            Err(MusicError::Precondition(PreconditionError::Unsequenced("B".into())))
        );
    }

    #[test]
    fn length_is_shorter_input() {
        let a = sequenced(Genre::Jazz, "C", 4, 2);
        let b = sequenced(Genre::Pop, "G", 1, 3);
        let mut rng = SeededRng::new(0);
        let mixed = mix(&a, &b, true, &VoicingProfile::mix(), &mut rng).unwrap();
        let expected = a.raw_chords().len().min(b.raw_chords().len());
        assert_eq!(mixed.chord_tracks().len(), expected);
        assert!(mixed.raw_chords().is_empty());
        assert_eq!(mixed.name(), "C + G");
        assert_eq!(mixed.key(), a.key());
        assert_eq!(mixed.mode(), Mode::Major);
        assert_eq!(mixed.variation(), 4);
        assert_eq!(mixed.genre(), Genre::Generic);
    }

    #[test]
    fn harmonize_moves_down_from_e_to_c() {
        let a = sequenced(Genre::Pop, "C", 1, 5);
        let b = sequenced(Genre::Country, "E", 2, 6);
        assert_eq!(degree_distance(a.key(), b.key()), -2);
        let moved = harmonized(&a, &b).unwrap();
        for (before, after) in b.raw_chords().iter().zip(&moved) {
            let letters = before.root.letter.index() - after.root.letter.index();
            assert_eq!(letters.rem_euclid(7), 2, "{before} -> {after}");
            assert_eq!(
                (before.root.midi() - after.root.midi()).rem_euclid(12),
                4,
                "{before} -> {after}"
            );
            assert_eq!(before.quality, after.quality);
            assert_eq!(before.inversion, after.inversion);
        }
        // E major's tonic lands on C major.
        let tonic = b
            .raw_chords()
            .iter()
            .position(|c| c.root.name() == "E" && c.quality == ChordQuality::Major);
        if let Some(i) = tonic {
            assert_eq!(moved[i].root.name(), "C");
        }
    }

    #[test]
    fn harmonize_moves_up() {
        let a = sequenced(Genre::Pop, "G", 1, 5);
        let b = sequenced(Genre::Pop, "D", 1, 6);
        let moved = harmonized(&a, &b).unwrap();
        for (before, after) in b.raw_chords().iter().zip(&moved) {
            assert_eq!(after.root.midi() - before.root.midi(), 5);
        }
    }

    #[test]
    fn same_letter_harmonize_matches_plain_mix() {
        let a = sequenced(Genre::Jazz, "C", 3, 8);
        let b = sequenced(Genre::Country, "C", 3, 9);
        let plain = mix(&a, &b, false, &VoicingProfile::mix(), &mut SeededRng::new(4)).unwrap();
        let harmonized = mix(&a, &b, true, &VoicingProfile::mix(), &mut SeededRng::new(4)).unwrap();
        assert_eq!(plain, harmonized);
    }

    #[test]
    fn flag_flips_on_equivalent_chords() {
        // Mixing a piece with itself: every position is equivalent, so the
        // sources alternate A, B, A, B...
        let a = sequenced(Genre::Country, "F", 1, 12);
        let mut rng = SeededRng::new(0);
        let mixed = mix(&a, &a, false, &VoicingProfile::mix(), &mut rng).unwrap();
        for (i, track) in mixed.chord_tracks().iter().enumerate() {
            if i % 2 == 1 {
                assert_eq!(track, &a.chord_tracks()[i]);
            }
        }
    }
}
