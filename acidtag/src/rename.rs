//! Restructuring of sample library folders
//!
//! Sample libraries tend to be laid out by pack:
//!
//! ```text
//! Type/Pack/Instrument/.../sample.wav
//! ```
//!
//! A [`RenamePlan`] drops the pack level, and normalizes the instrument folder names so that
//! the same instrument from different packs ends up in one place:
//!
//! ```text
//! Type/MappedInstrument/.../sample.wav
//! ```

use crate::error::{AcidError, DuplicateTarget, ErrorKind, Result};

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

// Instrument folder names and what they are renamed to. A `/` in the new name creates a subfolder.
const INSTRUMENT_NAMES: [(&str, &str); 10] = [
	("808", "808s"),
	("808s & Basses", "808s & Bass"),
	("Basses", "Bass"),
	("Full Loops", "Drum Loops"),
	("Guitars", "Guitar Loops"),
	("Hi-Hats", "Hihat Loops"),
	("Hihat MIDI", "Hihat Loops/MIDI"),
	("Melodies", "Melody Loops"),
	("MIDI", "Melody Loops/MIDI"),
	("Top Loops", "Percussion Loops"),
];

/// Get the normalized name of an instrument folder
///
/// Names without a mapping are returned unchanged.
///
/// # Examples
///
/// ```rust
/// use acidtag::rename::map_instrument;
///
/// assert_eq!(map_instrument("Hi-Hats"), "Hihat Loops");
/// assert_eq!(map_instrument("Pads"), "Pads");
/// ```
pub fn map_instrument(name: &str) -> &str {
	INSTRUMENT_NAMES
		.iter()
		.find(|(from, _)| *from == name)
		.map_or(name, |(_, to)| *to)
}

/// A single copy in a [`RenamePlan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
	/// The path the plan was given
	pub source: PathBuf,
	/// The restructured path
	pub target: PathBuf,
}

/// Source to target path mappings for a batch of files
///
/// Every target is unique, see [`RenamePlan::new`].
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
	entries: Vec<PlannedCopy>,
	types: BTreeSet<String>,
	instruments: BTreeSet<Option<String>>,
}

// The instrument may expand to several components ("Hihat Loops/MIDI")
fn restructure(source: &Path) -> Result<(PathBuf, Option<String>, Option<String>)> {
	let Some(file_name) = source.file_name() else {
		return Err(AcidError::from(std::io::Error::new(
			std::io::ErrorKind::InvalidInput,
			format!("Path has no file name: {}", source.display()),
		)));
	};

	let parts = source
		.parent()
		.into_iter()
		.flat_map(Path::components)
		.filter_map(|component| match component {
			Component::Normal(part) => Some(part),
			_ => None,
		})
		.collect::<Vec<&OsStr>>();

	let mut target = PathBuf::new();

	let ty = parts.first().map(|ty| ty.to_string_lossy().into_owned());
	if let Some(ty) = parts.first() {
		target.push(ty);
	}

	let mut instrument = None;
	if let Some(folder) = parts.get(2) {
		let folder = folder.to_string_lossy();
		let mapped = map_instrument(&folder);

		for component in mapped.split('/') {
			target.push(component);
		}

		instrument = mapped.split('/').next().map(str::to_owned);
	}

	for part in parts.iter().skip(3) {
		target.push(part);
	}

	target.push(file_name);

	Ok((target, ty, instrument))
}

impl RenamePlan {
	/// Plan the restructuring of `sources`
	///
	/// `sources` are expected to be relative to the library root. Folders below the
	/// instrument folder are kept, as is the file name. Paths with fewer than three folders
	/// lose whatever levels they have past the type.
	///
	/// # Errors
	///
	/// * Two or more sources map to the same target
	///   ([`ErrorKind::DuplicateTargets`](crate::error::ErrorKind::DuplicateTargets)), every
	///   colliding target is listed with all of its sources
	/// * A source has no file name
	pub fn new<P>(sources: &[P]) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let mut plan = Self::default();
		let mut claims: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

		for source in sources {
			let source = source.as_ref();
			let (target, ty, instrument) = restructure(source)?;

			log::debug!("{} -> {}", source.display(), target.display());

			if let Some(ty) = ty {
				plan.types.insert(ty);
			}
			plan.instruments.insert(instrument);

			claims
				.entry(target.clone())
				.or_default()
				.push(source.to_path_buf());
			plan.entries.push(PlannedCopy {
				source: source.to_path_buf(),
				target,
			});
		}

		let duplicates = claims
			.into_iter()
			.filter(|(_, sources)| sources.len() > 1)
			.map(|(target, sources)| DuplicateTarget { target, sources })
			.collect::<Vec<_>>();

		if !duplicates.is_empty() {
			log::error!("{} targets are claimed by multiple sources", duplicates.len());
			return Err(AcidError::new(ErrorKind::DuplicateTargets(duplicates)));
		}

		log::info!("Types: {:?}", plan.types);
		log::info!("Instruments: {:?}", plan.instruments);

		Ok(plan)
	}

	/// The planned copies, in the order the sources were given
	pub fn entries(&self) -> &[PlannedCopy] {
		&self.entries
	}

	/// The restructured path of `source`, if it is part of the plan
	pub fn target_of(&self, source: impl AsRef<Path>) -> Option<&Path> {
		let source = source.as_ref();
		self.entries
			.iter()
			.find(|entry| entry.source == source)
			.map(|entry| entry.target.as_path())
	}

	/// The distinct type folders seen
	pub fn types(&self) -> &BTreeSet<String> {
		&self.types
	}

	/// The distinct instrument folders seen, after mapping
	///
	/// Only the first component of a mapped name is listed. `None` stands for sources without
	/// an instrument folder.
	pub fn instruments(&self) -> &BTreeSet<Option<String>> {
		&self.instruments
	}

	/// Copy `source` to its restructured path under `target_root`
	///
	/// `source` is resolved against `source_root`. Missing folders are created. Returns the
	/// path of the copy.
	///
	/// # Errors
	///
	/// * `source` isn't part of the plan
	/// * The folders can't be created, or the file can't be copied
	pub fn copy_into(
		&self,
		source_root: impl AsRef<Path>,
		target_root: impl AsRef<Path>,
		source: impl AsRef<Path>,
	) -> Result<PathBuf> {
		let source = source.as_ref();
		let Some(target) = self.target_of(source) else {
			return Err(AcidError::from(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Path is not part of the plan: {}", source.display()),
			)));
		};

		let destination = target_root.as_ref().join(target);
		if let Some(parent) = destination.parent() {
			fs::create_dir_all(parent)?;
		}

		fs::copy(source_root.as_ref().join(source), &destination)?;

		Ok(destination)
	}
}
