use super::chunk::{ChunkId, Chunks, RiffChunk};
use super::fmt::{DataChunk, FormatChunk, StreamInfo};
use super::{DATA_ID, FMT_ID};
use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::{err, malformed_err};
use crate::util::alloc::fallible_zeroed_vec;
use crate::util::io::SeekStreamLen;

use std::io::{Read, Seek, Write};

use byteorder::{LittleEndian, WriteBytesExt};

const RIFF_ID: ChunkId = *b"RIFF";
const WAVE_FORM: [u8; 4] = *b"WAVE";

// "RIFF" + size + "WAVE"
const RIFF_PREAMBLE_SIZE: u64 = 12;
const FORM_TYPE_SIZE: u64 = 4;

// Verifies that the stream is a RIFF/WAVE stream and returns the RIFF chunk size
fn verify_wav<R>(data: &mut R) -> Result<u32>
where
	R: Read + Seek,
{
	let available = data
		.stream_len_hack()?
		.saturating_sub(data.stream_position()?);
	if available < RIFF_PREAMBLE_SIZE {
		malformed_err!(@BAIL "File is too short to contain a RIFF header");
	}

	let mut id = [0; 12];
	data.read_exact(&mut id)?;

	if id[..4] != RIFF_ID {
		malformed_err!(@BAIL "File doesn't contain a RIFF chunk");
	}

	if id[8..] != WAVE_FORM {
		malformed_err!(@BAIL "Found RIFF file, format is not WAVE");
	}

	log::debug!("File verified to be WAV");
	Ok(u32::from_le_bytes([id[4], id[5], id[6], id[7]]))
}

/// The ordered chunks of a RIFF/WAVE file
///
/// Chunks keep the order and content they were read with. Anything following the `RIFF`
/// chunk in the stream is kept as well and written back after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiffContainer {
	chunks: Vec<RiffChunk>,
	trailing: Vec<u8>,
}

impl RiffContainer {
	/// Create a container from a list of chunks
	pub fn new(chunks: Vec<RiffChunk>) -> Self {
		Self {
			chunks,
			trailing: Vec::new(),
		}
	}

	/// Read a container from `data`
	///
	/// `data` is expected to be positioned at the start of the `RIFF` chunk.
	///
	/// # Errors
	///
	/// * The stream is not a RIFF/WAVE stream, or a chunk header can't be read
	///   ([`ErrorKind::MalformedHeader`](crate::error::ErrorKind::MalformedHeader))
	/// * The `RIFF` chunk, or a chunk inside it, is larger than the remaining data
	///   ([`ErrorKind::TruncatedChunk`](crate::error::ErrorKind::TruncatedChunk))
	/// * A chunk exceeds the [allocation limit](ParseOptions::allocation_limit)
	/// * `data` fails to read
	pub fn read_from<R>(data: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		let riff_size = u64::from(verify_wav(data)?);
		if riff_size < FORM_TYPE_SIZE {
			malformed_err!(@BAIL "RIFF chunk is too small to hold a form type");
		}

		let stream_len = data.stream_len_hack()?;
		let available = stream_len.saturating_sub(data.stream_position()?);

		let content_len = riff_size - FORM_TYPE_SIZE;
		if content_len > available {
			err!(TruncatedChunk {
				id: RIFF_ID,
				declared: content_len,
				available,
			});
		}

		let mut chunks = Chunks::new(content_len, parse_options.allocation_limit);
		let mut list = Vec::new();
		while let Some(chunk) = chunks.next(data)? {
			list.push(chunk);
		}

		let trailing_len = stream_len.saturating_sub(data.stream_position()?);
		let mut trailing = fallible_zeroed_vec(
			trailing_len as usize,
			parse_options.allocation_limit,
		)?;
		data.read_exact(&mut trailing)?;

		if chunks.unpadded_end() {
			if trailing.first() == Some(&0) {
				log::debug!("Found the final pad byte after the RIFF chunk");
				trailing.remove(0);
			} else {
				log::warn!("Final chunk is missing its pad byte, it will be restored on write");
			}
		}

		if !trailing.is_empty() {
			log::warn!(
				"Found {} bytes after the RIFF chunk, keeping them as-is",
				trailing.len()
			);
		}

		log::debug!("Read {} chunks", list.len());

		Ok(Self {
			chunks: list,
			trailing,
		})
	}

	/// The chunks, in file order
	pub fn chunks(&self) -> &[RiffChunk] {
		&self.chunks
	}

	/// An iterator over the chunks, in file order
	pub fn iter(&self) -> impl Iterator<Item = &RiffChunk> {
		self.chunks.iter()
	}

	/// The number of chunks
	pub fn len(&self) -> usize {
		self.chunks.len()
	}

	/// The first chunk with the identifier `id`
	pub fn get(&self, id: ChunkId) -> Option<&RiffChunk> {
		self.chunks.iter().find(|chunk| chunk.id() == id)
	}

	/// Whether a chunk with the identifier `id` exists
	pub fn contains(&self, id: ChunkId) -> bool {
		self.get(id).is_some()
	}

	/// Bytes found after the `RIFF` chunk
	pub fn trailing(&self) -> &[u8] {
		&self.trailing
	}

	/// Decode the `fmt ` and `data` chunks into a [`StreamInfo`]
	///
	/// # Errors
	///
	/// * Either chunk is missing ([`ErrorKind::MissingRequiredChunk`](crate::error::ErrorKind::MissingRequiredChunk))
	/// * The `fmt ` chunk is too small
	/// * See [`StreamInfo::new`]
	pub fn stream_info(&self) -> Result<StreamInfo> {
		let Some(fmt) = self.get(FMT_ID) else {
			err!(MissingRequiredChunk(FMT_ID));
		};

		let Some(data) = self.get(DATA_ID) else {
			err!(MissingRequiredChunk(DATA_ID));
		};

		let format = FormatChunk::parse(fmt.content())?;
		let data = DataChunk::from_len(data.declared_len());

		StreamInfo::new(&format, data)
	}

	/// Substitute and append chunks
	///
	/// Walking the chunks in order, the first chunk sharing an identifier with one of
	/// `replacements` is swapped for it. Replacements that found no match are appended in
	/// the order given.
	pub fn replace_or_append(&mut self, replacements: Vec<RiffChunk>) {
		let mut pending = replacements;

		for chunk in &mut self.chunks {
			if pending.is_empty() {
				break;
			}

			if let Some(pos) = pending.iter().position(|c| c.id() == chunk.id()) {
				log::debug!("Replacing chunk \"{}\"", chunk.id().escape_ascii());
				*chunk = pending.remove(pos);
			}
		}

		for chunk in &pending {
			log::debug!("Appending chunk \"{}\"", chunk.id().escape_ascii());
		}

		self.chunks.extend(pending);
	}

	/// The size written in the `RIFF` chunk header
	///
	/// # Errors
	///
	/// The chunks don't fit in a RIFF file ([`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData))
	pub fn riff_size(&self) -> Result<u32> {
		let size = self
			.chunks
			.iter()
			.map(RiffChunk::serialized_len)
			.sum::<u64>()
			+ FORM_TYPE_SIZE;

		match u32::try_from(size) {
			Ok(size) => Ok(size),
			Err(_) => err!(TooMuchData),
		}
	}

	/// Serialize the container
	///
	/// # Errors
	///
	/// See [`RiffContainer::riff_size`]
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		let riff_size = self.riff_size()?;

		let mut bytes = Vec::new();
		bytes.try_reserve_exact(riff_size as usize + 8 + self.trailing.len())?;
		self.write_to(&mut bytes)?;

		Ok(bytes)
	}

	/// Write the serialized container to `writer`
	///
	/// # Errors
	///
	/// * See [`RiffContainer::riff_size`]
	/// * `writer` fails to write
	pub fn write_to<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		let riff_size = self.riff_size()?;

		writer.write_all(&RIFF_ID)?;
		writer.write_u32::<LittleEndian>(riff_size)?;
		writer.write_all(&WAVE_FORM)?;

		for chunk in &self.chunks {
			chunk.write_to(writer)?;
		}

		writer.write_all(&self.trailing)?;

		Ok(())
	}
}

impl<'a> IntoIterator for &'a RiffContainer {
	type Item = &'a RiffChunk;
	type IntoIter = std::slice::Iter<'a, RiffChunk>;

	fn into_iter(self) -> Self::IntoIter {
		self.chunks.iter()
	}
}
