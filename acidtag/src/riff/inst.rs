use super::INST_ID;
use super::chunk::{ChunkId, FixedChunk};
use crate::error::Result;

use std::io::Write;

use byteorder::{ReadBytesExt, WriteBytesExt};

/// The contents of an `inst` chunk
///
/// Layout (7 bytes):
///
/// | Offset | Size | Field          | Range     |
/// |--------|------|----------------|-----------|
/// | 0x00   | 1    | Unshifted note | 0 - 127   |
/// | 0x01   | 1    | Fine tune (dB) | -50 - +50 |
/// | 0x02   | 1    | Gain           | -64 - +64 |
/// | 0x03   | 1    | Low note       | 0 - 127   |
/// | 0x04   | 1    | High note      | 0 - 127   |
/// | 0x05   | 1    | Low velocity   | 1 - 127   |
/// | 0x06   | 1    | High velocity  | 1 - 127   |
///
/// The chunk length is odd, so it is always followed by a pad byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentRecord {
	/// The MIDI note the sample is pitched at
	pub unshifted_note: u8,
	/// Pitch shift to apply on playback
	pub fine_tune: i8,
	/// Gain to apply on playback
	pub gain: i8,
	/// The lowest note the sample should be played for
	pub low_note: u8,
	/// The highest note the sample should be played for
	pub high_note: u8,
	/// The lowest velocity the sample should be played for
	pub low_velocity: u8,
	/// The highest velocity the sample should be played for
	pub high_velocity: u8,
}

impl InstrumentRecord {
	/// MIDI note 60, the reference C all root notes are relative to
	pub const UNSHIFTED_NOTE_C5: u8 = 0x3C;

	/// Set the unshifted note to the pitch class `semitone_offset` semitones above
	/// [`Self::UNSHIFTED_NOTE_C5`]
	pub fn set_root_note(&mut self, semitone_offset: u8) {
		self.unshifted_note = Self::UNSHIFTED_NOTE_C5 + (semitone_offset % 12);
	}
}

impl Default for InstrumentRecord {
	fn default() -> Self {
		Self {
			unshifted_note: Self::UNSHIFTED_NOTE_C5,
			fine_tune: 0,
			gain: 0,
			low_note: 0,
			high_note: 0x7F,
			low_velocity: 0,
			high_velocity: 0x7F,
		}
	}
}

impl FixedChunk for InstrumentRecord {
	const ID: ChunkId = INST_ID;
	const CONTENT_SIZE: usize = 7;

	fn parse_content(reader: &mut &[u8]) -> Result<Self> {
		Ok(Self {
			unshifted_note: reader.read_u8()?,
			fine_tune: reader.read_i8()?,
			gain: reader.read_i8()?,
			low_note: reader.read_u8()?,
			high_note: reader.read_u8()?,
			low_velocity: reader.read_u8()?,
			high_velocity: reader.read_u8()?,
		})
	}

	fn write_content<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		writer.write_u8(self.unshifted_note)?;
		writer.write_i8(self.fine_tune)?;
		writer.write_i8(self.gain)?;
		writer.write_u8(self.low_note)?;
		writer.write_u8(self.high_note)?;
		writer.write_u8(self.low_velocity)?;
		writer.write_u8(self.high_velocity)?;

		Ok(())
	}
}
