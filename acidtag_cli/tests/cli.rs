#![allow(missing_docs)]

use acidtag::config::ParseOptions;
use acidtag::riff::{FixedChunk, InstrumentRecord, RiffContainer, TempoLoopRecord};

use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Output};

fn write_wav(path: &Path, seconds: u32) {
	fs::create_dir_all(path.parent().unwrap()).unwrap();

	let spec = hound::WavSpec {
		channels: 1,
		sample_rate: 8000,
		bits_per_sample: 16,
		sample_format: hound::SampleFormat::Int,
	};

	let mut writer = hound::WavWriter::create(path, spec).unwrap();
	for _ in 0..8000 * seconds {
		writer.write_sample(0_i16).unwrap();
	}
	writer.finalize().unwrap();
}

fn read_container(path: &Path) -> RiffContainer {
	let mut file = File::open(path).unwrap();
	RiffContainer::read_from(&mut file, ParseOptions::new()).unwrap()
}

fn acidtag(args: &[&std::ffi::OsStr]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_acidtag"))
		.args(args)
		.output()
		.unwrap()
}

#[test]
fn restructure_then_tag_copies() {
	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join("library");
	let target = dir.path().join("sorted");

	let sample = source.join("Loops/Pack A/Basses/Sub - 120 BPM C.wav");
	write_wav(&sample, 2);
	fs::write(source.join("Loops/Pack A/Basses/notes.txt"), "hello").unwrap();
	fs::write(source.join("Loops/Pack A/Basses/.DS_Store"), "").unwrap();
	let original = fs::read(&sample).unwrap();

	let output = acidtag(&[
		source.as_os_str(),
		"--restructure".as_ref(),
		target.as_os_str(),
		"--add-metadata".as_ref(),
	]);
	assert!(output.status.success());

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("+ BPM: 120 + Tempo-sync"), "{stdout}");
	assert!(stdout.contains("+ Root: C"), "{stdout}");
	assert!(stdout.trim_end().ends_with("DONE"), "{stdout}");

	// The source is left alone
	assert_eq!(fs::read(&sample).unwrap(), original);

	let copy = target.join("Loops/Bass/Sub - 120 BPM C.wav");
	let container = read_container(&copy);

	let acid = TempoLoopRecord::parse(container.get(*b"acid").unwrap().content()).unwrap();
	assert_eq!(acid.tempo, 120.0);
	assert_eq!(acid.n_beats, 4);

	let inst = InstrumentRecord::parse(container.get(*b"inst").unwrap().content()).unwrap();
	assert_eq!(inst.unshifted_note, 0x3C);

	assert_eq!(
		fs::read_to_string(target.join("Loops/Bass/notes.txt")).unwrap(),
		"hello"
	);
	assert!(!target.join("Loops/Bass/.DS_Store").exists());
}

#[test]
fn tag_in_place() {
	let dir = tempfile::tempdir().unwrap();
	let sample = dir.path().join("Keys - 90 BPM (F#).wav");
	write_wav(&sample, 4);

	let output = acidtag(&[dir.path().as_os_str(), "--add-metadata".as_ref()]);
	assert!(output.status.success());

	let container = read_container(&sample);

	let acid = TempoLoopRecord::parse(container.get(*b"acid").unwrap().content()).unwrap();
	assert_eq!(acid.n_beats, 6);

	let inst = InstrumentRecord::parse(container.get(*b"inst").unwrap().content()).unwrap();
	assert_eq!(inst.unshifted_note, 0x42);

	// Still a valid WAV file
	let reader = hound::WavReader::open(&sample).unwrap();
	assert_eq!(reader.duration(), 8000 * 4);
}

#[test]
fn duplicates_abort_before_copying() {
	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join("library");
	let target = dir.path().join("sorted");

	write_wav(&source.join("Loops/Pack A/Basses/Sub.wav"), 1);
	write_wav(&source.join("Loops/Pack B/Bass/Sub.wav"), 1);
	write_wav(&source.join("Loops/Pack B/Bass/Unique.wav"), 1);

	let output = acidtag(&[
		source.as_os_str(),
		"--restructure".as_ref(),
		target.as_os_str(),
	]);
	assert!(!output.status.success());

	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("Pack A"), "{stderr}");
	assert!(stderr.contains("Pack B"), "{stderr}");

	assert!(!target.exists());
}
