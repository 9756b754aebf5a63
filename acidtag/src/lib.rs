//! Tempo and root note tagging for RIFF/WAVE samples.
//!
//! Samplers and DAWs read a sample's tempo from its `acid` chunk and its pitch from its `inst`
//! chunk. Sample packs rarely fill either in, but usually put both in the filename:
//! `Bass - 90 BPM C# Min.wav`. acidtag moves the filename tokens into the chunks.
//!
//! # Examples
//!
//! ## Tagging from the filename
//!
//! ```rust,no_run
//! # fn main() -> acidtag::error::Result<()> {
//! use acidtag::config::{ParseOptions, WriteOptions};
//! use acidtag::tagger::tag_from_filename;
//!
//! let report = tag_from_filename(
//! 	"Bass - 90 BPM C# Min.wav",
//! 	ParseOptions::new(),
//! 	WriteOptions::new(),
//! )?;
//!
//! if let Some(report) = report {
//! 	println!("{report:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Editing the chunks directly
//!
//! ```rust,no_run
//! # fn main() -> acidtag::error::Result<()> {
//! use acidtag::config::{ParseOptions, WriteOptions};
//! use acidtag::editor::edit_path;
//! use acidtag::note::semitone_offset;
//!
//! edit_path(
//! 	"Pad.wav",
//! 	ParseOptions::new(),
//! 	WriteOptions::new(),
//! 	|editor| {
//! 		let n_beats = editor.compute_beat_count(128.0)?;
//! 		let (acid, _) = editor.get_or_create_tempo_chunk()?;
//! 		acid.set_tempo_sync(128.0, n_beats);
//!
//! 		let (inst, _) = editor.get_or_create_instrument_chunk()?;
//! 		inst.set_root_note(semitone_offset("Eb")?);
//!
//! 		Ok(())
//! 	},
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Notes
//!
//! Files are rewritten in place. If writing fails midway, the file is left corrupted, so keep
//! a copy of anything you can't replace.

pub mod config;
pub mod editor;
pub mod error;
pub mod filename;
pub(crate) mod macros;
pub mod note;
pub mod rename;
pub mod riff;
pub mod tagger;
mod util;

pub use util::io;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use acidtag::prelude::*;
	//! ```

	pub use crate::editor::{ChunkOrigin, RiffEditor};
	pub use crate::riff::{FixedChunk, InstrumentRecord, TempoLoopRecord};
}
