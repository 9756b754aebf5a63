//! Note names and their pitch classes

use crate::error::Result;
use crate::macros::err;

// Every spelling the filename grammar can produce that maps to a pitch class
const NOTE_OFFSETS: [(&str, u8); 18] = [
	("C", 0),
	("C#", 1),
	("Db", 1),
	("D", 2),
	("D#", 3),
	("Eb", 3),
	("E", 4),
	("F", 5),
	("F#", 6),
	("Gb", 6),
	("G", 7),
	("G#", 8),
	("Ab", 8),
	("A", 9),
	("A#", 10),
	("Bb", 10),
	("B", 11),
	("Cb", 11),
];

/// The note names [`semitone_offset`] accepts, in their canonical spelling
pub fn note_names() -> impl Iterator<Item = &'static str> {
	NOTE_OFFSETS.iter().map(|(name, _)| *name)
}

/// Get the number of semitones `name` lies above C
///
/// The lookup is case-insensitive. Enharmonic spellings (`C#`/`Db`) share an offset.
///
/// # Errors
///
/// `name` is not one of [`note_names`] ([`ErrorKind::UnknownNoteName`](crate::error::ErrorKind::UnknownNoteName))
///
/// # Examples
///
/// ```rust
/// use acidtag::note::semitone_offset;
///
/// # fn main() -> acidtag::error::Result<()> {
/// assert_eq!(semitone_offset("C")?, 0);
/// assert_eq!(semitone_offset("f#")?, 6);
/// assert_eq!(semitone_offset("GB")?, 6);
/// assert!(semitone_offset("E#").is_err());
/// # Ok(()) }
/// ```
pub fn semitone_offset(name: &str) -> Result<u8> {
	match NOTE_OFFSETS
		.iter()
		.find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
	{
		Some((_, offset)) => Ok(*offset),
		None => err!(UnknownNoteName(name.to_owned())),
	}
}
