//! Read-modify-write sessions over a single WAV file
//!
//! An editing session parses the whole container up front, hands out cached copies of the
//! `acid` and `inst` records, and writes everything back exactly once at the end.
//!
//! ```rust,no_run
//! use acidtag::config::{ParseOptions, WriteOptions};
//! use acidtag::editor::edit_path;
//!
//! # fn main() -> acidtag::error::Result<()> {
//! edit_path(
//! 	"loop - 120 BPM.wav",
//! 	ParseOptions::new(),
//! 	WriteOptions::new(),
//! 	|editor| {
//! 		let n_beats = editor.compute_beat_count(120.0)?;
//! 		let (record, _origin) = editor.get_or_create_tempo_chunk()?;
//! 		record.set_tempo_sync(120.0, n_beats);
//! 		Ok(())
//! 	},
//! )?;
//! # Ok(()) }
//! ```

use crate::config::{ParseOptions, WriteOptions, WritePolicy};
use crate::error::{AcidError, Result};
use crate::io::{FileLike, Truncate};
use crate::riff::{
	ACID_ID, ChunkId, FixedChunk, INST_ID, InstrumentRecord, RiffChunk, RiffContainer,
	TempoLoopRecord,
};

use std::fs::{File, OpenOptions};
use std::path::Path;

/// Where a record handed out by a [`RiffEditor`] came from
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChunkOrigin {
	/// The chunk was present in the file
	Existing,
	/// The chunk was absent, the record was created with its defaults
	Created,
}

impl ChunkOrigin {
	/// Whether the chunk was present in the file
	pub fn existed(self) -> bool {
		self == Self::Existing
	}
}

/// Compute the number of beats in `duration_seconds` at `tempo` BPM
///
/// Ties are rounded to the nearest even number.
///
/// # Examples
///
/// ```rust
/// use acidtag::editor::beat_count;
///
/// assert_eq!(beat_count(120.0, 2.0), 4);
/// assert_eq!(beat_count(90.0, 1.0), 2);
/// ```
pub fn beat_count(tempo: f64, duration_seconds: f64) -> u32 {
	(tempo / 60.0 * duration_seconds).round_ties_even() as u32
}

/// An editing session over one file
///
/// Created with [`RiffEditor::open`], consumed by [`RiffEditor::commit`]. Most callers will
/// want [`edit`] or [`edit_path`], which take care of the commit.
pub struct RiffEditor<F>
where
	F: FileLike,
	AcidError: From<<F as Truncate>::Error>,
{
	file: F,
	container: RiffContainer,
	tempo_loop: Option<(TempoLoopRecord, ChunkOrigin)>,
	instrument: Option<(InstrumentRecord, ChunkOrigin)>,
	touch_order: Vec<ChunkId>,
}

fn fetch_or_default<T>(container: &RiffContainer) -> Result<(T, ChunkOrigin)>
where
	T: FixedChunk + Default,
{
	match container.get(T::ID) {
		Some(chunk) => Ok((T::parse(chunk.content())?, ChunkOrigin::Existing)),
		None => {
			log::debug!("No \"{}\" chunk found, creating one", T::ID.escape_ascii());
			Ok((T::default(), ChunkOrigin::Created))
		},
	}
}

impl<F> RiffEditor<F>
where
	F: FileLike,
	AcidError: From<<F as Truncate>::Error>,
{
	/// Parse `file` and start a session
	///
	/// `file` is read from its current position.
	///
	/// # Errors
	///
	/// See [`RiffContainer::read_from`]
	pub fn open(mut file: F, parse_options: ParseOptions) -> Result<Self> {
		let container = RiffContainer::read_from(&mut file, parse_options)?;

		Ok(Self {
			file,
			container,
			tempo_loop: None,
			instrument: None,
			touch_order: Vec::with_capacity(2),
		})
	}

	/// The container as it was read
	///
	/// Records handed out by the session are not reflected here until the session is committed.
	pub fn container(&self) -> &RiffContainer {
		&self.container
	}

	/// Get the `acid` record, creating a default one if the file has none
	///
	/// The record is only read on the first call, later calls return the same record along
	/// with its original [`ChunkOrigin`]. Once fetched, the record will be written by
	/// [`RiffEditor::commit`], even if it is never modified.
	///
	/// # Errors
	///
	/// The existing chunk is too small ([`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch))
	pub fn get_or_create_tempo_chunk(&mut self) -> Result<(&mut TempoLoopRecord, ChunkOrigin)> {
		let (record, origin) = match &mut self.tempo_loop {
			Some(entry) => entry,
			slot @ None => {
				let entry = fetch_or_default::<TempoLoopRecord>(&self.container)?;
				self.touch_order.push(ACID_ID);
				slot.insert(entry)
			},
		};

		Ok((record, *origin))
	}

	/// Get the `inst` record, creating a default one if the file has none
	///
	/// See [`RiffEditor::get_or_create_tempo_chunk`].
	///
	/// # Errors
	///
	/// The existing chunk is too small ([`ErrorKind::SizeMismatch`](crate::error::ErrorKind::SizeMismatch))
	pub fn get_or_create_instrument_chunk(
		&mut self,
	) -> Result<(&mut InstrumentRecord, ChunkOrigin)> {
		let (record, origin) = match &mut self.instrument {
			Some(entry) => entry,
			slot @ None => {
				let entry = fetch_or_default::<InstrumentRecord>(&self.container)?;
				self.touch_order.push(INST_ID);
				slot.insert(entry)
			},
		};

		Ok((record, *origin))
	}

	/// Compute the number of beats the stream spans at `tempo` BPM
	///
	/// See [`beat_count`].
	///
	/// # Errors
	///
	/// See [`RiffContainer::stream_info`]
	pub fn compute_beat_count(&self, tempo: f64) -> Result<u32> {
		let info = self.container.stream_info()?;
		let n_beats = beat_count(tempo, info.duration_seconds());

		log::debug!(
			"{} frames at {} Hz, {tempo} BPM: {n_beats} beats",
			info.sample_frames(),
			info.sample_rate()
		);

		Ok(n_beats)
	}

	fn encode_touched(&self) -> Result<Vec<RiffChunk>> {
		let mut chunks = Vec::with_capacity(self.touch_order.len());
		for id in &self.touch_order {
			let chunk = match (*id, &self.tempo_loop, &self.instrument) {
				(ACID_ID, Some((record, _)), _) => record.to_chunk()?,
				(INST_ID, _, Some((record, _))) => record.to_chunk()?,
				_ => continue,
			};

			chunks.push(chunk);
		}

		Ok(chunks)
	}

	/// End the session, writing the container back to the file
	///
	/// Fetched records replace the first chunk with the same identifier, records for chunks
	/// that weren't present are appended in the order they were first fetched. Every other
	/// chunk is written back untouched, in its original position.
	///
	/// The file is overwritten from its start and truncated to the new length.
	///
	/// # Errors
	///
	/// * See [`RiffContainer::to_bytes`]
	/// * The file fails to be written or truncated
	pub fn commit(self) -> Result<F> {
		let touched = self.encode_touched()?;

		let Self {
			mut file,
			mut container,
			..
		} = self;

		container.replace_or_append(touched);
		let bytes = container.to_bytes()?;

		file.rewind()?;
		file.truncate(0)?;
		file.write_all(&bytes)?;
		file.flush()?;

		log::debug!("Wrote {} bytes", bytes.len());
		Ok(file)
	}
}

/// Run an editing session over `file`
///
/// `scope` is given the session, and its result is returned. Whether the file is written
/// when `scope` fails is decided by the [`WritePolicy`]. A panic in `scope` never writes.
///
/// # Errors
///
/// * See [`RiffEditor::open`]
/// * `scope` fails
/// * See [`RiffEditor::commit`]
///
/// # Examples
///
/// ```rust
/// use acidtag::config::{ParseOptions, WriteOptions};
/// use acidtag::editor::edit;
///
/// # fn main() -> acidtag::error::Result<()> {
/// # let mut file = std::io::Cursor::new(b"RIFF\x04\x00\x00\x00WAVE".to_vec());
/// edit(&mut file, ParseOptions::new(), WriteOptions::new(), |editor| {
/// 	let (inst, _) = editor.get_or_create_instrument_chunk()?;
/// 	inst.set_root_note(2);
/// 	Ok(())
/// })?;
///
/// assert_eq!(file.get_ref().len(), 12 + 16);
/// # Ok(()) }
/// ```
pub fn edit<F, T, S>(
	file: F,
	parse_options: ParseOptions,
	write_options: WriteOptions,
	scope: S,
) -> Result<T>
where
	F: FileLike,
	AcidError: From<<F as Truncate>::Error>,
	S: FnOnce(&mut RiffEditor<F>) -> Result<T>,
{
	let mut editor = RiffEditor::open(file, parse_options)?;

	match (scope(&mut editor), write_options.write_policy) {
		(Ok(value), _) => {
			editor.commit()?;
			Ok(value)
		},
		(Err(e), WritePolicy::OnSuccess) => {
			log::debug!("Editing scope failed, leaving the file untouched");
			Err(e)
		},
		(Err(e), WritePolicy::Always) => {
			log::debug!("Editing scope failed, writing anyway");
			if let Err(commit_err) = editor.commit() {
				log::error!("Failed to write the file after a failed edit: {commit_err}");
			}

			Err(e)
		},
	}
}

/// Run an editing session over the file at `path`
///
/// See [`edit`].
///
/// # Errors
///
/// * `path` can't be opened for reading and writing
/// * See [`edit`]
pub fn edit_path<P, T, S>(
	path: P,
	parse_options: ParseOptions,
	write_options: WriteOptions,
	scope: S,
) -> Result<T>
where
	P: AsRef<Path>,
	S: FnOnce(&mut RiffEditor<File>) -> Result<T>,
{
	let file = OpenOptions::new().read(true).write(true).open(path)?;
	edit(file, parse_options, write_options, scope)
}

#[cfg(test)]
mod tests {
	use super::{ChunkOrigin, RiffEditor, beat_count, edit};
	use crate::config::{ParseOptions, WriteOptions, WritePolicy};
	use crate::error::{AcidError, ErrorKind, Result};
	use crate::io::{FileLike, Truncate};
	use crate::riff::{FixedChunk, RiffChunk, RiffContainer, TempoLoopRecord};

	use std::io::Cursor;

	// 8 kHz, mono, 8-bit, 1 second
	fn wav(extra: Vec<RiffChunk>) -> Vec<u8> {
		let mut fmt = Vec::new();
		fmt.extend(1_u16.to_le_bytes());
		fmt.extend(1_u16.to_le_bytes());
		fmt.extend(8000_u32.to_le_bytes());
		fmt.extend(8000_u32.to_le_bytes());
		fmt.extend(1_u16.to_le_bytes());
		fmt.extend(8_u16.to_le_bytes());

		let mut chunks = vec![
			RiffChunk::new(*b"fmt ", fmt),
			RiffChunk::new(*b"data", vec![0x80; 8000]),
		];
		chunks.extend(extra);

		RiffContainer::new(chunks).to_bytes().unwrap()
	}

	fn ids(bytes: Vec<u8>) -> Vec<[u8; 4]> {
		RiffContainer::read_from(&mut Cursor::new(bytes), ParseOptions::new())
			.unwrap()
			.iter()
			.map(RiffChunk::id)
			.collect()
	}

	#[test_log::test]
	fn ties_round_to_even() {
		assert_eq!(beat_count(120.0, 2.0), 4);
		assert_eq!(beat_count(60.0, 2.5), 2);
		assert_eq!(beat_count(60.0, 3.5), 4);
		assert_eq!(beat_count(60.0, 2.6), 3);
	}

	#[test_log::test]
	fn untouched_session_is_identity() {
		let original = wav(vec![RiffChunk::new(*b"LIST", vec![7; 10])]);
		let mut file = Cursor::new(original.clone());

		let editor = RiffEditor::open(&mut file, ParseOptions::new()).unwrap();
		editor.commit().unwrap();

		assert_eq!(file.into_inner(), original);
	}

	#[test_log::test]
	fn records_are_cached() {
		let mut file = Cursor::new(wav(Vec::new()));
		let mut editor = RiffEditor::open(&mut file, ParseOptions::new()).unwrap();

		let (record, origin) = editor.get_or_create_tempo_chunk().unwrap();
		assert_eq!(origin, ChunkOrigin::Created);
		record.tempo = 99.0;

		let (record, origin) = editor.get_or_create_tempo_chunk().unwrap();
		assert_eq!(origin, ChunkOrigin::Created);
		assert_eq!(record.tempo, 99.0);
	}

	#[test_log::test]
	fn fetched_default_is_still_written() {
		let mut file = Cursor::new(wav(Vec::new()));

		let mut editor = RiffEditor::open(&mut file, ParseOptions::new()).unwrap();
		editor.get_or_create_tempo_chunk().unwrap();
		editor.commit().unwrap();

		let container =
			RiffContainer::read_from(&mut Cursor::new(file.into_inner()), ParseOptions::new())
				.unwrap();
		let acid = container.get(*b"acid").unwrap();
		assert_eq!(
			TempoLoopRecord::parse(acid.content()).unwrap(),
			TempoLoopRecord::default()
		);
	}

	#[test_log::test]
	fn new_chunks_appended_in_fetch_order() {
		let mut file = Cursor::new(wav(vec![RiffChunk::new(*b"smpl", vec![0; 36])]));

		let mut editor = RiffEditor::open(&mut file, ParseOptions::new()).unwrap();
		editor.get_or_create_instrument_chunk().unwrap();
		editor.get_or_create_tempo_chunk().unwrap();
		editor.commit().unwrap();

		assert_eq!(
			ids(file.into_inner()),
			vec![*b"fmt ", *b"data", *b"smpl", *b"inst", *b"acid"]
		);
	}

	#[test_log::test]
	fn existing_chunk_replaced_in_place() {
		let acid = TempoLoopRecord::default().to_chunk().unwrap();
		let mut file = Cursor::new(wav(vec![acid, RiffChunk::new(*b"smpl", vec![0; 36])]));

		let mut editor = RiffEditor::open(&mut file, ParseOptions::new()).unwrap();
		let (record, origin) = editor.get_or_create_tempo_chunk().unwrap();
		assert!(origin.existed());
		record.set_tempo_sync(120.0, 2);
		editor.commit().unwrap();

		let bytes = file.into_inner();
		assert_eq!(
			ids(bytes.clone()),
			vec![*b"fmt ", *b"data", *b"acid", *b"smpl"]
		);

		let container =
			RiffContainer::read_from(&mut Cursor::new(bytes), ParseOptions::new()).unwrap();
		let record = TempoLoopRecord::parse(container.get(*b"acid").unwrap().content()).unwrap();
		assert_eq!(record.n_beats, 2);
		assert!(!record.is_one_shot());
		assert!(record.stretch());
	}

	#[test_log::test]
	fn beat_count_needs_fmt_and_data() {
		let bytes = RiffContainer::new(vec![RiffChunk::new(*b"data", vec![0; 100])])
			.to_bytes()
			.unwrap();
		let mut file = Cursor::new(bytes);

		let editor = RiffEditor::open(&mut file, ParseOptions::new()).unwrap();
		let err = editor.compute_beat_count(120.0).unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::MissingRequiredChunk(_)));
	}

	#[test_log::test]
	fn shrinking_output_is_truncated() {
		// The oversized chunk is written back at 24 bytes
		let oversized_acid = {
			let mut content = TempoLoopRecord::default().to_chunk().unwrap().content().to_vec();
			content.extend([0; 16]);
			RiffChunk::new(*b"acid", content)
		};
		let original = wav(vec![oversized_acid]);
		let original_len = original.len();
		let mut file = Cursor::new(original);

		edit(&mut file, ParseOptions::new(), WriteOptions::new(), |editor| {
			editor.get_or_create_tempo_chunk().map(|_| ())
		})
		.unwrap();

		assert_eq!(file.into_inner().len(), original_len - 16);
	}

	fn failing_scope<F>(editor: &mut RiffEditor<F>) -> Result<()>
	where
		F: FileLike,
		AcidError: From<<F as Truncate>::Error>,
	{
		editor.get_or_create_tempo_chunk()?;
		Err(AcidError::new(ErrorKind::UnknownNoteName(String::from("H"))))
	}

	#[test_log::test]
	fn failed_scope_respects_write_policy() {
		let original = wav(Vec::new());

		let mut file = Cursor::new(original.clone());
		let err = edit(&mut file, ParseOptions::new(), WriteOptions::new(), failing_scope)
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::UnknownNoteName(_)));
		assert_eq!(file.into_inner(), original);

		let mut file = Cursor::new(original.clone());
		let err = edit(
			&mut file,
			ParseOptions::new(),
			WriteOptions::new().write_policy(WritePolicy::Always),
			failing_scope,
		)
		.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::UnknownNoteName(_)));
		assert_eq!(ids(file.into_inner()), vec![*b"fmt ", *b"data", *b"acid"]);
	}

	#[test_log::test]
	fn malformed_file_is_not_written() {
		let mut file = Cursor::new(b"RIFX\x04\x00\x00\x00WAVE".to_vec());

		let err = edit(&mut file, ParseOptions::new(), WriteOptions::new(), |_| Ok(()))
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::MalformedHeader(_)));
		assert_eq!(file.into_inner(), b"RIFX\x04\x00\x00\x00WAVE".to_vec());
	}
}
