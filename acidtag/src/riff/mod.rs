//! RIFF/WAVE chunk handling
//!
//! A WAVE file is a single `RIFF` chunk holding the form type `WAVE` followed by a flat
//! sequence of chunks. acidtag decodes four of them:
//!
//! * `fmt ` - read-only, provides the sample rate and frame size
//! * `data` - read-only, only its length is used
//! * `acid` - tempo/loop information, see [`TempoLoopRecord`]
//! * `inst` - instrument/key information, see [`InstrumentRecord`]
//!
//! Every other chunk is carried through verbatim.

mod acid;
mod chunk;
mod container;
mod fmt;
mod inst;

pub use acid::{TempoLoopFlags, TempoLoopRecord};
pub use chunk::{
	CHUNK_HEADER_SIZE, ChunkData, ChunkHeader, ChunkId, FixedChunk, RiffChunk, read_header,
	read_payload, word_align,
};
pub use container::RiffContainer;
pub use fmt::{DataChunk, FormatChunk, StreamInfo, WavFormat};
pub use inst::InstrumentRecord;

/// `fmt `
pub const FMT_ID: ChunkId = *b"fmt ";
/// `data`
pub const DATA_ID: ChunkId = *b"data";
/// `acid`
pub const ACID_ID: ChunkId = *b"acid";
/// `inst`
pub const INST_ID: ChunkId = *b"inst";
