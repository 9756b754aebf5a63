use super::acid::TempoLoopRecord;
use super::fmt::{DataChunk, FormatChunk};
use super::inst::InstrumentRecord;
use super::{ACID_ID, DATA_ID, FMT_ID, INST_ID};
use crate::error::Result;
use crate::macros::{err, malformed_err};
use crate::util::alloc::fallible_zeroed_vec;
use crate::util::io::SeekStreamLen;

use std::io::{ErrorKind as IoErrorKind, Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// A four character chunk identifier
pub type ChunkId = [u8; 4];

/// The size of a chunk header (identifier + length)
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// The identifier and declared content length of a chunk
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
	/// The chunk's identifier
	pub id: ChunkId,
	/// The content length, excluding the header and any pad byte
	pub size: u32,
}

impl ChunkHeader {
	/// Whether a pad byte follows the content
	pub fn is_padded(self) -> bool {
		self.size % 2 != 0
	}
}

/// Read the chunk header at `offset`
///
/// # Errors
///
/// * Fewer than 8 bytes are available at `offset` ([`ErrorKind::MalformedHeader`](crate::error::ErrorKind::MalformedHeader))
/// * `data` fails to read
pub fn read_header<R>(data: &mut R, offset: u64) -> Result<ChunkHeader>
where
	R: Read + Seek,
{
	let len = data.stream_len_hack()?;
	if len.saturating_sub(offset) < CHUNK_HEADER_SIZE {
		malformed_err!(@BAIL "Not enough data remaining for a chunk header");
	}

	data.seek(SeekFrom::Start(offset))?;
	parse_header(data)
}

pub(crate) fn parse_header<R>(data: &mut R) -> Result<ChunkHeader>
where
	R: Read,
{
	let mut id = [0; 4];
	match data.read_exact(&mut id) {
		Ok(()) => {},
		Err(e) if e.kind() == IoErrorKind::UnexpectedEof => {
			malformed_err!(@BAIL "Unable to read chunk identifier")
		},
		Err(e) => return Err(e.into()),
	}

	let size = match data.read_u32::<LittleEndian>() {
		Ok(size) => size,
		Err(e) if e.kind() == IoErrorKind::UnexpectedEof => {
			malformed_err!(@BAIL "Unable to read chunk length")
		},
		Err(e) => return Err(e.into()),
	};

	Ok(ChunkHeader { id, size })
}

/// Read exactly `header.size` content bytes starting at `offset`
///
/// # Errors
///
/// * Fewer than `header.size` bytes remain ([`ErrorKind::TruncatedChunk`](crate::error::ErrorKind::TruncatedChunk))
/// * `data` fails to read
pub fn read_payload<R>(data: &mut R, offset: u64, header: ChunkHeader) -> Result<Vec<u8>>
where
	R: Read + Seek,
{
	let declared = u64::from(header.size);
	let available = data.stream_len_hack()?.saturating_sub(offset);
	if declared > available {
		err!(TruncatedChunk {
			id: header.id,
			declared,
			available,
		});
	}

	data.seek(SeekFrom::Start(offset))?;

	let mut content = fallible_zeroed_vec(header.size as usize, usize::MAX)?;
	data.read_exact(&mut content)?;

	Ok(content)
}

/// Pad `bytes` to an even length
///
/// One zero byte is appended when the length is odd, otherwise `bytes` is returned untouched.
///
/// # Examples
///
/// ```rust
/// use acidtag::riff::word_align;
///
/// assert_eq!(word_align(vec![1, 2, 3]), vec![1, 2, 3, 0]);
/// assert_eq!(word_align(vec![1, 2]), vec![1, 2]);
/// ```
pub fn word_align(mut bytes: Vec<u8>) -> Vec<u8> {
	if bytes.len() % 2 != 0 {
		bytes.push(0);
	}

	bytes
}

/// A single chunk, as it appears in a container
///
/// The content is held verbatim, chunks that are never decoded and replaced are written back
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiffChunk {
	id: ChunkId,
	content: Vec<u8>,
}

impl RiffChunk {
	/// Create a chunk from its identifier and content
	pub fn new(id: ChunkId, content: Vec<u8>) -> Self {
		Self { id, content }
	}

	/// The chunk's identifier
	pub fn id(&self) -> ChunkId {
		self.id
	}

	/// The chunk's content, excluding the header and pad byte
	pub fn content(&self) -> &[u8] {
		&self.content
	}

	/// The length written in the chunk header
	pub fn declared_len(&self) -> u32 {
		self.content.len() as u32
	}

	/// The number of bytes the chunk occupies once serialized (header, content and pad byte)
	pub fn serialized_len(&self) -> u64 {
		let content_len = self.content.len() as u64;
		CHUNK_HEADER_SIZE + content_len + (content_len % 2)
	}

	/// Decode the chunk into one of the types acidtag understands
	///
	/// Anything other than `fmt `, `data`, `acid`, and `inst` is [`ChunkData::Opaque`].
	///
	/// # Errors
	///
	/// The content of a known chunk is too small for its layout
	pub fn decode(&self) -> Result<ChunkData<'_>> {
		let content = self.content.as_slice();
		Ok(match self.id {
			FMT_ID => ChunkData::Format(FormatChunk::parse(content)?),
			DATA_ID => ChunkData::Data(DataChunk::from_len(self.declared_len())),
			ACID_ID => ChunkData::TempoLoop(TempoLoopRecord::parse(content)?),
			INST_ID => ChunkData::Instrument(InstrumentRecord::parse(content)?),
			_ => ChunkData::Opaque {
				id: self.id,
				content,
			},
		})
	}

	/// Serialize the chunk (header, content and pad byte)
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut bytes = Vec::with_capacity(self.serialized_len() as usize);
		bytes.extend_from_slice(&self.id);
		bytes.extend_from_slice(&self.declared_len().to_le_bytes());
		bytes.extend_from_slice(&self.content);

		word_align(bytes)
	}

	/// Write the serialized chunk to `writer`
	///
	/// # Errors
	///
	/// `writer` fails to write
	pub fn write_to<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		writer.write_all(&self.id)?;
		writer.write_u32::<LittleEndian>(self.declared_len())?;
		writer.write_all(&self.content)?;
		if self.content.len() % 2 != 0 {
			writer.write_u8(0)?;
		}

		Ok(())
	}
}

/// A decoded chunk
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkData<'a> {
	/// `fmt `
	Format(FormatChunk),
	/// `data`
	Data(DataChunk),
	/// `acid`
	TempoLoop(TempoLoopRecord),
	/// `inst`
	Instrument(InstrumentRecord),
	/// Anything else, passed through untouched
	Opaque {
		/// The chunk's identifier
		id: ChunkId,
		/// The chunk's content
		content: &'a [u8],
	},
}

/// A record with a fixed content layout, stored in a chunk of its own
pub trait FixedChunk: Sized {
	/// The chunk identifier
	const ID: ChunkId;
	/// The length of the content
	const CONTENT_SIZE: usize;

	/// Decode the record from chunk content
	///
	/// Trailing content beyond [`Self::CONTENT_SIZE`] is ignored.
	///
	/// # Errors
	///
	/// `content` is shorter than [`Self::CONTENT_SIZE`]
	fn parse(content: &[u8]) -> Result<Self> {
		if content.len() < Self::CONTENT_SIZE {
			err!(SizeMismatch {
				id: Self::ID,
				expected: Self::CONTENT_SIZE,
				found: content.len(),
			});
		}

		if content.len() > Self::CONTENT_SIZE {
			log::warn!(
				"\"{}\" chunk has {} trailing bytes, ignoring",
				Self::ID.escape_ascii(),
				content.len() - Self::CONTENT_SIZE
			);
		}

		Self::parse_content(&mut &content[..Self::CONTENT_SIZE])
	}

	/// Decode exactly [`Self::CONTENT_SIZE`] bytes of content
	///
	/// # Errors
	///
	/// `reader` fails to read
	fn parse_content(reader: &mut &[u8]) -> Result<Self>;

	/// Encode exactly [`Self::CONTENT_SIZE`] bytes of content
	///
	/// # Errors
	///
	/// `writer` fails to write
	fn write_content<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write;

	/// Encode the record as a complete chunk
	///
	/// # Errors
	///
	/// See [`FixedChunk::write_content`]
	fn to_chunk(&self) -> Result<RiffChunk> {
		let mut content = Vec::with_capacity(Self::CONTENT_SIZE);
		self.write_content(&mut content)?;

		Ok(RiffChunk::new(Self::ID, content))
	}
}

/// Walks the chunks of a container, keeping track of the bytes left in it
pub(crate) struct Chunks {
	remaining_size: u64,
	allocation_limit: usize,
	unpadded_end: bool,
}

impl Chunks {
	#[must_use]
	pub(crate) const fn new(container_size: u64, allocation_limit: usize) -> Self {
		Self {
			remaining_size: container_size,
			allocation_limit,
			unpadded_end: false,
		}
	}

	/// Whether the final chunk is odd-sized and its pad byte lies outside the container
	///
	/// Some writers leave the pad out of the RIFF size, in which case it is the first
	/// byte following the container.
	pub(crate) fn unpadded_end(&self) -> bool {
		self.unpadded_end
	}

	/// Read the next chunk, or `None` once the container is exhausted
	pub(crate) fn next<R>(&mut self, data: &mut R) -> Result<Option<RiffChunk>>
	where
		R: Read,
	{
		if self.remaining_size == 0 {
			return Ok(None);
		}

		if self.remaining_size < CHUNK_HEADER_SIZE {
			log::debug!(
				"{} bytes left in container, not enough for a chunk header",
				self.remaining_size
			);
			malformed_err!(@BAIL "Not enough data remaining for a chunk header");
		}

		let header = parse_header(data)?;
		self.remaining_size -= CHUNK_HEADER_SIZE;

		let declared = u64::from(header.size);
		if declared > self.remaining_size {
			err!(TruncatedChunk {
				id: header.id,
				declared,
				available: self.remaining_size,
			});
		}

		let mut content = fallible_zeroed_vec(header.size as usize, self.allocation_limit)?;
		data.read_exact(&mut content)?;
		self.remaining_size -= declared;

		log::debug!(
			"Found chunk \"{}\", size: {} bytes",
			header.id.escape_ascii(),
			header.size
		);

		self.correct_position(data, header)?;

		Ok(Some(RiffChunk::new(header.id, content)))
	}

	fn correct_position<R>(&mut self, data: &mut R, header: ChunkHeader) -> Result<()>
	where
		R: Read,
	{
		// Chunks are expected to start on even boundaries, and are padded
		// with a 0 if necessary. The pad is NOT included in the chunk's size
		if !header.is_padded() {
			return Ok(());
		}

		if self.remaining_size == 0 {
			log::debug!(
				"Chunk \"{}\" has no pad byte within the container",
				header.id.escape_ascii()
			);
			self.unpadded_end = true;
			return Ok(());
		}

		let pad = data.read_u8()?;
		if pad != 0 {
			log::debug!("Found non-zero pad byte ({pad:#04x}), it will be zeroed on write");
		}

		self.remaining_size -= 1;
		Ok(())
	}
}
