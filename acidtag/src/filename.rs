//! Tempo and root note tokens in sample filenames
//!
//! Sample packs commonly name their files along the lines of `Bass - 90 BPM C# Min.wav`.
//! Two independent grammars pick the tokens out of the filename (extension removed):
//!
//! * Tempo: an ASCII decimal number preceded by a space or hyphen, followed by an optional
//!   space and `bpm`
//! * Root note: a note letter (`A` to `G`, optionally followed by `#` or `b`) preceded by a
//!   space or hyphen, then either ` Maj`/` Min`, a separator, or the end of the name. A note
//!   in parentheses (`Lead (D#)`) is also accepted.
//!
//! Both grammars are case-insensitive.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

const TEMPO_PATTERN: &str = r"(?i)[\s-]((?:[0-9]+\.)?[0-9]+)\s?bpm";
const ROOT_NOTE_PATTERN: &str = concat!(
	r"(?i)",
	// "Bass - 90 BPM C# Min", "Bass - 90 BPM C#", "Bass - C# - 90 BPM"
	r"([\s-](?P<trailing>[A-G][#b]?)((\s(Maj|Min))|([^A-Za-z0-9#][^#-]*)|$))",
	r"|",
	// "Lead (D#)"
	r"([\s-]\((?P<enclosed>[A-G][#b]?)\))",
);

static TEMPO_REGEX: OnceLock<Regex> = OnceLock::new();
static ROOT_NOTE_REGEX: OnceLock<Regex> = OnceLock::new();

fn tempo_regex() -> &'static Regex {
	TEMPO_REGEX.get_or_init(|| Regex::new(TEMPO_PATTERN).expect("invalid regex pattern"))
}

fn root_note_regex() -> &'static Regex {
	ROOT_NOTE_REGEX.get_or_init(|| Regex::new(ROOT_NOTE_PATTERN).expect("invalid regex pattern"))
}

/// Find the tempo token in `stem`
///
/// A tempo of zero is treated as absent.
///
/// # Examples
///
/// ```rust
/// use acidtag::filename::parse_tempo;
///
/// assert_eq!(parse_tempo("Kick - 128 BPM"), Some(128.0));
/// assert_eq!(parse_tempo("Pad 87.5bpm"), Some(87.5));
/// assert_eq!(parse_tempo("Kick"), None);
/// ```
pub fn parse_tempo(stem: &str) -> Option<f64> {
	let captures = tempo_regex().captures(stem)?;
	let tempo = captures.get(1)?.as_str().parse::<f64>().ok()?;

	(tempo > 0.0).then_some(tempo)
}

/// Find the root note token in `stem`
///
/// The note is returned as written in the filename.
///
/// # Examples
///
/// ```rust
/// use acidtag::filename::parse_root_note;
///
/// assert_eq!(parse_root_note("Bass - 90 BPM C# Min"), Some("C#"));
/// assert_eq!(parse_root_note("Lead (D#)"), Some("D#"));
/// assert_eq!(parse_root_note("Perc"), None);
/// ```
pub fn parse_root_note(stem: &str) -> Option<&str> {
	let captures = root_note_regex().captures(stem)?;
	captures
		.name("trailing")
		.or_else(|| captures.name("enclosed"))
		.map(|note| note.as_str())
}

/// The tokens found in a sample's filename
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilenameMetadata {
	/// The tempo in BPM, always positive
	pub tempo: Option<f64>,
	/// The root note's name, as written in the filename
	pub root_note: Option<String>,
}

impl FilenameMetadata {
	/// Parse a filename with its extension already removed
	pub fn from_stem(stem: &str) -> Self {
		Self {
			tempo: parse_tempo(stem),
			root_note: parse_root_note(stem).map(str::to_owned),
		}
	}

	/// Parse the file name of `path`
	///
	/// Only the final component is considered, minus its extension. Names that aren't valid
	/// UTF-8 are converted lossily.
	///
	/// # Examples
	///
	/// ```rust
	/// use acidtag::filename::FilenameMetadata;
	///
	/// let metadata = FilenameMetadata::from_path("Loops/120 BPM/Bass - 90 BPM C# Min.wav");
	/// assert_eq!(metadata.tempo, Some(90.0));
	/// assert_eq!(metadata.root_note.as_deref(), Some("C#"));
	/// ```
	pub fn from_path(path: impl AsRef<Path>) -> Self {
		match path.as_ref().file_stem() {
			Some(stem) => Self::from_stem(&stem.to_string_lossy()),
			None => Self::default(),
		}
	}

	/// Whether neither token was found
	pub fn is_empty(&self) -> bool {
		self.tempo.is_none() && self.root_note.is_none()
	}
}
