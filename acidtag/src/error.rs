//! Contains the errors that can arise within acidtag
//!
//! The primary error is [`AcidError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

use crate::riff::ChunkId;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

/// Alias for `Result<T, AcidError>`
pub type Result<T> = std::result::Result<T, AcidError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Container structure
	/// A chunk header (or the RIFF preamble) could not be read, or carried an unexpected tag
	MalformedHeader(&'static str),
	/// A chunk declares more content than remains in the stream
	TruncatedChunk {
		/// The chunk's identifier
		id: ChunkId,
		/// The declared content length
		declared: u64,
		/// The number of bytes actually remaining
		available: u64,
	},
	/// A fixed-layout chunk is too small to hold its record
	SizeMismatch {
		/// The chunk's identifier
		id: ChunkId,
		/// The minimum content length for the record
		expected: usize,
		/// The content length found
		found: usize,
	},
	/// A chunk required for a computation is not present in the container
	MissingRequiredChunk(ChunkId),
	/// The `fmt ` chunk describes a stream that durations can't be derived from
	InvalidStreamFormat(&'static str),
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,

	// Metadata
	/// A note name outside of the twelve pitch class table
	UnknownNoteName(String),

	// Restructuring
	/// Two or more source paths resolve to the same target path
	DuplicateTargets(Vec<DuplicateTarget>),

	// Conversions for external errors
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// A target path claimed by more than one source path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTarget {
	/// The colliding target path
	pub target: PathBuf,
	/// Every source path that maps onto `target`, in input order
	pub sources: Vec<PathBuf>,
}

impl Display for DuplicateTarget {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.target.display())?;
		for source in &self.sources {
			write!(f, "\n  <- {}", source.display())?;
		}

		Ok(())
	}
}

/// Errors that could occur within acidtag
pub struct AcidError {
	pub(crate) kind: ErrorKind,
}

impl AcidError {
	/// Create an `AcidError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use acidtag::error::{AcidError, ErrorKind};
	///
	/// let missing_fmt = AcidError::new(ErrorKind::MissingRequiredChunk(*b"fmt "));
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use acidtag::error::{AcidError, ErrorKind};
	///
	/// let unknown = AcidError::new(ErrorKind::UnknownNoteName(String::from("H")));
	/// if let ErrorKind::UnknownNoteName(name) = unknown.kind() {
	/// 	println!("What note is {name}?");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for AcidError {}

impl Debug for AcidError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<std::io::Error> for AcidError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<TryReserveError> for AcidError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for AcidError {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for AcidError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::MalformedHeader(message) => write!(f, "Malformed header: {message}"),
			ErrorKind::TruncatedChunk {
				id,
				declared,
				available,
			} => write!(
				f,
				"Chunk \"{}\" declares {declared} bytes, but only {available} remain",
				id.escape_ascii()
			),
			ErrorKind::SizeMismatch {
				id,
				expected,
				found,
			} => write!(
				f,
				"Chunk \"{}\" is too small (expected at least {expected} bytes, found {found})",
				id.escape_ascii()
			),
			ErrorKind::MissingRequiredChunk(id) => {
				write!(f, "File does not contain a \"{}\" chunk", id.escape_ascii())
			},
			ErrorKind::InvalidStreamFormat(message) => write!(f, "Invalid stream format: {message}"),
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::UnknownNoteName(ref name) => write!(f, "Unknown note name \"{name}\""),
			ErrorKind::DuplicateTargets(ref duplicates) => {
				write!(f, "Multiple files map to the same target path:")?;
				for duplicate in duplicates {
					write!(f, "\n{duplicate}")?;
				}

				Ok(())
			},

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}
