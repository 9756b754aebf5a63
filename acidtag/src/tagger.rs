//! Tag samples from the tokens in their filenames
//!
//! A tempo token turns the sample into a tempo-synced loop (see
//! [`TempoLoopRecord::set_tempo_sync`](crate::riff::TempoLoopRecord::set_tempo_sync)), a root
//! note token sets the `inst` chunk's unshifted note.

use crate::config::{ParseOptions, WriteOptions};
use crate::editor::{ChunkOrigin, RiffEditor, edit_path};
use crate::error::{AcidError, Result};
use crate::filename::FilenameMetadata;
use crate::io::{FileLike, Truncate};
use crate::note::semitone_offset;

use std::path::Path;

/// A tempo written to the `acid` chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoUpdate {
	/// The tempo taken from the filename
	pub bpm: f64,
	/// The computed beat count
	pub n_beats: u32,
	/// Whether the `acid` chunk was already present
	pub origin: ChunkOrigin,
}

/// A root note written to the `inst` chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootNoteUpdate {
	/// The note name taken from the filename
	pub note: String,
	/// The new unshifted note
	pub unshifted_note: u8,
	/// Whether the `inst` chunk was already present
	pub origin: ChunkOrigin,
}

/// The outcome of tagging one file
///
/// The two fields are applied independently, a failure in one leaves its chunk untouched
/// and doesn't affect the other. `None` means the filename had no such token.
#[derive(Debug)]
pub struct TagReport {
	/// The tempo update, if the filename had a tempo
	pub tempo: Option<Result<TempoUpdate>>,
	/// The root note update, if the filename had a root note
	pub root_note: Option<Result<RootNoteUpdate>>,
}

impl TagReport {
	/// Whether every attempted update succeeded
	pub fn is_complete(&self) -> bool {
		!matches!(self.tempo, Some(Err(_))) && !matches!(self.root_note, Some(Err(_)))
	}
}

fn apply_tempo<F>(editor: &mut RiffEditor<F>, bpm: f64) -> Result<TempoUpdate>
where
	F: FileLike,
	AcidError: From<<F as Truncate>::Error>,
{
	// The beat count is computed first so a file without `fmt `/`data` gets no `acid` chunk
	let n_beats = editor.compute_beat_count(bpm)?;

	let (record, origin) = editor.get_or_create_tempo_chunk()?;
	record.set_tempo_sync(bpm, n_beats);

	Ok(TempoUpdate {
		bpm,
		n_beats,
		origin,
	})
}

fn apply_root_note<F>(editor: &mut RiffEditor<F>, note: &str) -> Result<RootNoteUpdate>
where
	F: FileLike,
	AcidError: From<<F as Truncate>::Error>,
{
	let offset = semitone_offset(note)?;

	let (record, origin) = editor.get_or_create_instrument_chunk()?;
	record.set_root_note(offset);

	Ok(RootNoteUpdate {
		note: note.to_owned(),
		unshifted_note: record.unshifted_note,
		origin,
	})
}

/// Apply `metadata` within an editing session
///
/// Fields missing from `metadata` are skipped, their chunks are never fetched.
pub fn apply_metadata<F>(editor: &mut RiffEditor<F>, metadata: &FilenameMetadata) -> TagReport
where
	F: FileLike,
	AcidError: From<<F as Truncate>::Error>,
{
	let tempo = metadata.tempo.map(|bpm| apply_tempo(editor, bpm));
	let root_note = metadata
		.root_note
		.as_deref()
		.map(|note| apply_root_note(editor, note));

	TagReport { tempo, root_note }
}

/// Whether `path` has a `wav` extension (case-insensitive)
pub fn is_wav(path: &Path) -> bool {
	path.extension()
		.is_some_and(|extension| extension.eq_ignore_ascii_case("wav"))
}

/// Tag the file at `path` from its filename
///
/// Returns `None` when the file is skipped without being opened. That is when it isn't a
/// WAV file, or when its filename has neither a tempo nor a root note.
///
/// # Errors
///
/// The file can't be parsed or written, see [`edit_path`]. Failures of the individual
/// updates are reported in the [`TagReport`] instead.
///
/// # Examples
///
/// ```rust,no_run
/// use acidtag::config::{ParseOptions, WriteOptions};
/// use acidtag::tagger::tag_from_filename;
///
/// # fn main() -> acidtag::error::Result<()> {
/// let report = tag_from_filename(
/// 	"Bass - 90 BPM C# Min.wav",
/// 	ParseOptions::new(),
/// 	WriteOptions::new(),
/// )?;
///
/// if let Some(report) = report {
/// 	assert!(report.tempo.is_some());
/// 	assert!(report.root_note.is_some());
/// }
/// # Ok(()) }
/// ```
pub fn tag_from_filename(
	path: impl AsRef<Path>,
	parse_options: ParseOptions,
	write_options: WriteOptions,
) -> Result<Option<TagReport>> {
	let path = path.as_ref();
	if !is_wav(path) {
		log::debug!("Skipping non-WAV file: {}", path.display());
		return Ok(None);
	}

	let metadata = FilenameMetadata::from_path(path);
	if metadata.is_empty() {
		log::debug!("No tokens in filename: {}", path.display());
		return Ok(None);
	}

	log::info!(
		"Tagging {} (tempo: {:?}, root note: {:?})",
		path.display(),
		metadata.tempo,
		metadata.root_note
	);

	let report = edit_path(path, parse_options, write_options, |editor| {
		Ok(apply_metadata(editor, &metadata))
	})?;

	Ok(Some(report))
}
