use super::ACID_ID;
use super::chunk::{ChunkId, FixedChunk};
use crate::error::Result;

use std::io::Write;
use std::ops::{BitAnd, BitOr, Not};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

// Fields with no known meaning, always written with these values
const RESERVED_SHORT: u16 = 0x8000;
const RESERVED_FLOAT: f32 = 0.0;

// Only 4/4 is ever written
const METER_DENOMINATOR: u16 = 4;
const METER_NUMERATOR: u16 = 4;

macro_rules! define_flags {
	([
		$(
			$(#[$meta:meta])*
			$name:ident => $shift:literal
		),+
	]) => {
		impl TempoLoopFlags {
			$(
				$(#[$meta])*
				pub const $name: Self = Self(1 << $shift);
			)+
		}
	};
}

/// The type bitmask of an `acid` chunk
///
/// Bits without a known meaning (ACIDizer sets `0x10`, for example) are kept as-is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
#[repr(transparent)]
pub struct TempoLoopFlags(pub(crate) u32);

define_flags! {
	[
		/// Set: one-shot, unset: loop
		ONE_SHOT  => 0,
		/// Set: the root note is set
		ROOT_NOTE => 1,
		/// Set: stretching is enabled
		STRETCH   => 2,
		/// Set: disk based, unset: RAM based
		DISK      => 3
	]
}

impl TempoLoopFlags {
	/// Create flags from a raw bitmask
	#[must_use]
	pub const fn from_bits(bits: u32) -> Self {
		Self(bits)
	}

	/// The bit mask
	#[must_use]
	pub const fn bits(self) -> u32 {
		self.0
	}

	/// Whether every bit of `other` is set
	#[must_use]
	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	/// Set or clear the bits of `other`
	pub fn set(&mut self, other: Self, value: bool) {
		if value {
			self.0 |= other.0;
		} else {
			self.0 &= !other.0;
		}
	}
}

impl BitOr for TempoLoopFlags {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		Self(self.0 | rhs.0)
	}
}

impl BitAnd for TempoLoopFlags {
	type Output = Self;

	fn bitand(self, rhs: Self) -> Self {
		Self(self.0 & rhs.0)
	}
}

impl Not for TempoLoopFlags {
	type Output = Self;

	fn not(self) -> Self {
		Self(!self.0)
	}
}

/// The contents of an `acid` chunk
///
/// Layout (24 bytes, little endian):
///
/// | Offset | Size | Field                      |
/// |--------|------|----------------------------|
/// | 0x00   | 4    | Type flags                 |
/// | 0x04   | 2    | Root note                  |
/// | 0x06   | 2    | Reserved, always `0x8000`  |
/// | 0x08   | 4    | Reserved float, always `0` |
/// | 0x0C   | 4    | Number of beats            |
/// | 0x10   | 2    | Meter denominator          |
/// | 0x12   | 2    | Meter numerator            |
/// | 0x14   | 4    | Tempo (float)              |
///
/// The reserved fields and the meter are not kept, they are always written as above and 4/4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoLoopRecord {
	/// See [`TempoLoopFlags`]
	pub type_flags: TempoLoopFlags,
	/// The root note, as a MIDI note number
	pub root_note: u16,
	/// The length of the loop in beats
	pub n_beats: u32,
	/// The tempo in beats per minute
	pub tempo: f32,
}

impl Default for TempoLoopRecord {
	/// The record used for files without an `acid` chunk
	///
	/// ```rust,ignore
	/// TempoLoopRecord {
	/// 	type_flags: TempoLoopFlags::ONE_SHOT,
	/// 	root_note: 0x3C,
	/// 	n_beats: 0,
	/// 	tempo: 0.0,
	/// }
	/// ```
	fn default() -> Self {
		Self {
			type_flags: TempoLoopFlags::ONE_SHOT,
			root_note: 0x3C,
			n_beats: 0,
			tempo: 0.0,
		}
	}
}

impl TempoLoopRecord {
	/// Whether the sample is a one-shot (as opposed to a loop)
	pub fn is_one_shot(&self) -> bool {
		self.type_flags.contains(TempoLoopFlags::ONE_SHOT)
	}

	/// Whether the root note is set
	pub fn root_note_set(&self) -> bool {
		self.type_flags.contains(TempoLoopFlags::ROOT_NOTE)
	}

	/// Whether stretching is enabled
	pub fn stretch(&self) -> bool {
		self.type_flags.contains(TempoLoopFlags::STRETCH)
	}

	/// Whether the sample is disk based (as opposed to RAM based)
	pub fn disk_based(&self) -> bool {
		self.type_flags.contains(TempoLoopFlags::DISK)
	}

	/// Mark the sample as a one-shot or a loop
	pub fn set_one_shot(&mut self, one_shot: bool) {
		self.type_flags.set(TempoLoopFlags::ONE_SHOT, one_shot);
	}

	/// Enable or disable stretching
	pub fn set_stretch(&mut self, stretch: bool) {
		self.type_flags.set(TempoLoopFlags::STRETCH, stretch);
	}

	/// Make the sample a tempo-synced loop
	///
	/// Clears the one-shot bit, enables stretching, and stores the tempo and beat count.
	/// All other bits and the root note are left untouched.
	pub fn set_tempo_sync(&mut self, tempo: f64, n_beats: u32) {
		self.type_flags = (self.type_flags & !TempoLoopFlags::ONE_SHOT) | TempoLoopFlags::STRETCH;
		self.n_beats = n_beats;
		self.tempo = tempo as f32;
	}
}

impl FixedChunk for TempoLoopRecord {
	const ID: ChunkId = ACID_ID;
	const CONTENT_SIZE: usize = 24;

	fn parse_content(reader: &mut &[u8]) -> Result<Self> {
		let type_flags = TempoLoopFlags(reader.read_u32::<LittleEndian>()?);
		let root_note = reader.read_u16::<LittleEndian>()?;

		let _reserved_short = reader.read_u16::<LittleEndian>()?;
		let _reserved_float = reader.read_f32::<LittleEndian>()?;

		let n_beats = reader.read_u32::<LittleEndian>()?;

		let _meter_denominator = reader.read_u16::<LittleEndian>()?;
		let _meter_numerator = reader.read_u16::<LittleEndian>()?;

		let tempo = reader.read_f32::<LittleEndian>()?;

		Ok(Self {
			type_flags,
			root_note,
			n_beats,
			tempo,
		})
	}

	fn write_content<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		writer.write_u32::<LittleEndian>(self.type_flags.bits())?;
		writer.write_u16::<LittleEndian>(self.root_note)?;
		writer.write_u16::<LittleEndian>(RESERVED_SHORT)?;
		writer.write_f32::<LittleEndian>(RESERVED_FLOAT)?;
		writer.write_u32::<LittleEndian>(self.n_beats)?;
		writer.write_u16::<LittleEndian>(METER_DENOMINATOR)?;
		writer.write_u16::<LittleEndian>(METER_NUMERATOR)?;
		writer.write_f32::<LittleEndian>(self.tempo)?;

		Ok(())
	}
}
