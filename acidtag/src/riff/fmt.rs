use super::FMT_ID;
use crate::error::Result;
use crate::macros::err;

use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};

const PCM: u16 = 0x0001;
const IEEE_FLOAT: u16 = 0x0003;
const EXTENSIBLE: u16 = 0xFFFE;

const MIN_FMT_SIZE: usize = 16;
const EXTENSIBLE_FMT_SIZE: usize = 40;

/// A WAV file's format
#[allow(missing_docs, non_camel_case_types)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WavFormat {
	PCM,
	IEEE_FLOAT,
	Other(u16),
}

impl From<u16> for WavFormat {
	fn from(format_tag: u16) -> Self {
		match format_tag {
			PCM => Self::PCM,
			IEEE_FLOAT => Self::IEEE_FLOAT,
			other => Self::Other(other),
		}
	}
}

/// A decoded `fmt ` chunk
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FormatChunk {
	pub(crate) format_tag: u16,
	pub(crate) channels: u16,
	pub(crate) sample_rate: u32,
	pub(crate) bytes_per_second: u32,
	pub(crate) block_align: u16,
	pub(crate) bits_per_sample: u16,
}

impl FormatChunk {
	/// Decode a `fmt ` chunk's content
	///
	/// For `WAVE_FORMAT_EXTENSIBLE` streams, the format tag is taken from the sub-format.
	///
	/// # Errors
	///
	/// * `content` is shorter than 16 bytes
	/// * An extensible format is shorter than 40 bytes
	pub fn parse(content: &[u8]) -> Result<Self> {
		if content.len() < MIN_FMT_SIZE {
			err!(SizeMismatch {
				id: FMT_ID,
				expected: MIN_FMT_SIZE,
				found: content.len(),
			});
		}

		let reader = &mut &content[..];

		let mut format_tag = reader.read_u16::<LittleEndian>()?;
		let channels = reader.read_u16::<LittleEndian>()?;
		let sample_rate = reader.read_u32::<LittleEndian>()?;
		let bytes_per_second = reader.read_u32::<LittleEndian>()?;
		let block_align = reader.read_u16::<LittleEndian>()?;
		let bits_per_sample = reader.read_u16::<LittleEndian>()?;

		if format_tag == EXTENSIBLE {
			if content.len() < EXTENSIBLE_FMT_SIZE {
				err!(SizeMismatch {
					id: FMT_ID,
					expected: EXTENSIBLE_FMT_SIZE,
					found: content.len(),
				});
			}

			// cbSize (2), valid bits per sample (2), channel mask (4)
			let extension: &[u8] = *reader;
			*reader = &extension[8..];

			// The first two bytes of the sub-format GUID hold the actual format tag
			format_tag = reader.read_u16::<LittleEndian>()?;
		}

		Ok(Self {
			format_tag,
			channels,
			sample_rate,
			bytes_per_second,
			block_align,
			bits_per_sample,
		})
	}

	/// The stream's format
	pub fn format(&self) -> WavFormat {
		WavFormat::from(self.format_tag)
	}

	/// Channel count
	pub fn channels(&self) -> u16 {
		self.channels
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Average bytes per second
	pub fn bytes_per_second(&self) -> u32 {
		self.bytes_per_second
	}

	/// Bits per sample
	pub fn bits_per_sample(&self) -> u16 {
		self.bits_per_sample
	}

	/// The size of one sample frame (one sample for every channel) in bytes
	///
	/// Falls back to computing it from the channel count and bit depth when the block
	/// alignment is zero.
	pub fn frame_size(&self) -> u32 {
		if self.block_align > 0 {
			return u32::from(self.block_align);
		}

		u32::from(self.channels) * u32::from(self.bits_per_sample).div_ceil(8)
	}
}

/// A decoded `data` chunk
///
/// Only the length of the sample data is of interest.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DataChunk {
	len: u32,
}

impl DataChunk {
	/// Create a `DataChunk` from the length of its content
	pub fn from_len(len: u32) -> Self {
		Self { len }
	}

	/// The length of the sample data in bytes
	pub fn len(self) -> u32 {
		self.len
	}
}

/// The properties of an audio stream needed to derive its duration
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StreamInfo {
	sample_rate: u32,
	sample_frames: u32,
}

impl StreamInfo {
	/// Combine the `fmt ` and `data` chunks
	///
	/// # Errors
	///
	/// The format has a sample rate or frame size of zero
	/// ([`ErrorKind::InvalidStreamFormat`](crate::error::ErrorKind::InvalidStreamFormat))
	pub fn new(format: &FormatChunk, data: DataChunk) -> Result<Self> {
		if format.sample_rate == 0 {
			err!(InvalidStreamFormat("Sample rate is 0"));
		}

		let frame_size = format.frame_size();
		if frame_size == 0 {
			err!(InvalidStreamFormat("Sample frames are 0 bytes long"));
		}

		if data.len % frame_size != 0 {
			log::warn!(
				"Data length ({}) is not a multiple of the frame size ({frame_size})",
				data.len
			);
		}

		Ok(Self {
			sample_rate: format.sample_rate,
			sample_frames: data.len / frame_size,
		})
	}

	/// Sample rate (Hz)
	pub fn sample_rate(self) -> u32 {
		self.sample_rate
	}

	/// The number of sample frames in the stream
	pub fn sample_frames(self) -> u32 {
		self.sample_frames
	}

	/// The stream's duration in seconds
	pub fn duration_seconds(self) -> f64 {
		f64::from(self.sample_frames) / f64::from(self.sample_rate)
	}

	/// The stream's duration
	pub fn duration(self) -> Duration {
		Duration::from_secs_f64(self.duration_seconds())
	}
}
