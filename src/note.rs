//! # Note Mapping Module
//!
//! This module maps detected frequencies to musical pitch classes using
//! equal temperament with A4 = 440 Hz as the reference. Labels carry no
//! octave: every A (110, 220, 440, 880 Hz, ...) maps to the same `"A"`.
//!
//! ## Features
//! - Octave-free pitch-class labels for any positive frequency
//! - Equal temperament semitone math relative to A440
//! - Signed cent offset from the nearest pitch-class center

/// The twelve pitch-class labels, rooted at A.
///
/// Index 0 is `"A"` so the A440 reference maps to index 0 directly; the
/// table then ascends chromatically. The other historical orientation roots
/// the table at C and needs an offset before indexing, which this crate
/// deliberately avoids.
pub const NOTE_NAMES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

/// Reference frequency for the note table, concert pitch A4.
pub const A4_HZ: f32 = 440.0;

/// Signed distance from A440 in semitones, or `None` when the frequency
/// cannot carry a note (zero, negative, or non-finite).
fn note_number(hz: f32) -> Option<f32> {
    if !hz.is_finite() || hz <= 0.0 {
        return None;
    }
    let semitones = 12.0 * (hz / A4_HZ).log2();
    semitones.is_finite().then_some(semitones)
}

/// Maps a frequency to its pitch-class label.
///
/// The frequency's distance from A440 is measured in semitones
/// (`12 · log2(hz / 440)`), rounded to the nearest whole semitone and
/// wrapped into `[0, 12)` with a floored modulo so octaves collapse onto
/// one label and frequencies below the reference wrap correctly.
///
/// # Arguments
/// * `hz` - Frequency in Hz
///
/// # Returns
/// * `Some(label)` - Pitch-class label from [`NOTE_NAMES`]
/// * `None` - No note: `hz` is zero, negative, or non-finite
pub fn frequency_to_note(hz: f32) -> Option<&'static str> {
    let semitones = note_number(hz)?;
    let index = (semitones.round() as i32).rem_euclid(12) as usize;
    Some(NOTE_NAMES[index])
}

/// Signed offset from the nearest pitch-class center, in cents.
///
/// Positive values are sharp, negative values are flat; the magnitude never
/// exceeds 50 cents. Octave-free, like the note labels: 445 Hz and 890 Hz
/// report the same offset from A.
///
/// # Arguments
/// * `hz` - Frequency in Hz
///
/// # Returns
/// * `Some(cents)` - Offset in cents, within ±50
/// * `None` - No note: `hz` is zero, negative, or non-finite
pub fn cents_offset(hz: f32) -> Option<f32> {
    let semitones = note_number(hz)?;
    Some((semitones - semitones.round()) * 100.0)
}
