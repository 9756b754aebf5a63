//! Restructure sample libraries and tag their WAV files with tempo and root note.
//!
//! ```text
//! acidtag <SOURCE_DIR> [--restructure <TARGET_DIR>] [--add-metadata]
//! ```

use acidtag::config::{ParseOptions, WriteOptions};
use acidtag::editor::ChunkOrigin;
use acidtag::error::Result;
use acidtag::rename::RenamePlan;
use acidtag::tagger::{TagReport, tag_from_filename};

use structopt::StructOpt;
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

#[derive(Debug, StructOpt)]
#[structopt(
	name = "acidtag",
	about = "Restructure sample libraries and tag WAV files with tempo and root note"
)]
struct Opt {
	/// The library to process
	#[structopt(name = "SOURCE_DIR", parse(from_os_str))]
	source: PathBuf,

	/// Copy files to a new folder structure inside the target directory
	#[structopt(long, value_name = "TARGET_DIR", parse(from_os_str))]
	restructure: Option<PathBuf>,

	/// Add BPM and root note metadata to WAV files (in-place, or to the copies when
	/// restructuring)
	#[structopt(long)]
	add_metadata: bool,
}

// Every non-hidden file under `root`, relative to it
fn collect_sources(root: &Path) -> Result<Vec<PathBuf>> {
	let mut sources = Vec::new();

	for entry in WalkDir::new(root).sort_by_file_name() {
		let entry = entry.map_err(std::io::Error::from)?;
		if !entry.file_type().is_file() || entry.file_name().to_string_lossy().starts_with('.') {
			continue;
		}

		if let Ok(relative) = entry.path().strip_prefix(root) {
			sources.push(relative.to_path_buf());
		}
	}

	log::debug!("Found {} files in {}", sources.len(), root.display());
	Ok(sources)
}

fn marker(origin: ChunkOrigin) -> char {
	if origin.existed() { '!' } else { '+' }
}

fn print_report(report: &TagReport) {
	match &report.tempo {
		Some(Ok(update)) => println!("  {} BPM: {} + Tempo-sync", marker(update.origin), update.bpm),
		Some(Err(e)) => eprintln!("  ERROR: BPM: {e}"),
		None => {},
	}

	match &report.root_note {
		Some(Ok(update)) => println!("  {} Root: {}", marker(update.origin), update.note),
		Some(Err(e)) => eprintln!("  ERROR: Root: {e}"),
		None => {},
	}
}

fn run(opt: &Opt) -> Result<()> {
	let sources = collect_sources(&opt.source)?;

	let plan = match &opt.restructure {
		Some(_) => {
			let plan = RenamePlan::new(&sources)?;
			println!("Types: {:?}", plan.types());
			println!("Instruments: {:?}", plan.instruments());
			Some(plan)
		},
		None => None,
	};

	for source in &sources {
		let mut path = opt.source.join(source);
		println!(
			"--- {}",
			std::path::absolute(&path).unwrap_or_else(|_| path.clone()).display()
		);

		if let (Some(plan), Some(target_root)) = (&plan, &opt.restructure) {
			path = plan.copy_into(&opt.source, target_root, source)?;
			println!(
				"  > {}",
				std::path::absolute(&path).unwrap_or_else(|_| path.clone()).display()
			);
		}

		if opt.add_metadata {
			match tag_from_filename(&path, ParseOptions::new(), WriteOptions::new()) {
				Ok(Some(report)) => print_report(&report),
				Ok(None) => {},
				Err(e) => eprintln!("  ERROR: {e}"),
			}
		}
	}

	Ok(())
}

fn main() {
	env_logger::init();

	let opt = Opt::from_args();

	if opt.restructure.is_none() && !opt.add_metadata {
		eprintln!("WARN: Neither --restructure nor --add-metadata given, nothing will change");
	}

	if let Err(e) = run(&opt) {
		eprintln!("ERROR: {e}");
		std::process::exit(1);
	}

	println!("DONE");
}
