#![allow(missing_docs)]

use acidtag::config::{ParseOptions, WriteOptions, WritePolicy};
use acidtag::editor::{ChunkOrigin, edit_path};
use acidtag::error::{AcidError, ErrorKind};
use acidtag::riff::{FixedChunk, InstrumentRecord, RiffChunk, RiffContainer, TempoLoopRecord};
use acidtag::tagger::tag_from_filename;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

// A mono 16-bit stream of `frames` frames, with a ramp so the samples can be verified
fn hound_wav(sample_rate: u32, frames: u32) -> Vec<u8> {
	let spec = hound::WavSpec {
		channels: 1,
		sample_rate,
		bits_per_sample: 16,
		sample_format: hound::SampleFormat::Int,
	};

	let mut bytes = Cursor::new(Vec::new());
	let mut writer = hound::WavWriter::new(&mut bytes, spec).unwrap();
	for i in 0..frames {
		writer.write_sample((i % 1000) as i16).unwrap();
	}
	writer.finalize().unwrap();

	bytes.into_inner()
}

fn write_sample(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
	let path = dir.path().join(name);
	fs::write(&path, content).unwrap();
	path
}

fn read_container(path: &Path) -> RiffContainer {
	let mut file = fs::File::open(path).unwrap();
	RiffContainer::read_from(&mut file, ParseOptions::new()).unwrap()
}

fn ids(container: &RiffContainer) -> Vec<[u8; 4]> {
	container.iter().map(RiffChunk::id).collect()
}

#[test_log::test]
fn two_seconds_at_120_bpm() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_sample(&dir, "Loop - 120 BPM.wav", &hound_wav(44100, 44100 * 2));

	let report = tag_from_filename(&path, ParseOptions::new(), WriteOptions::new())
		.unwrap()
		.unwrap();
	assert!(report.root_note.is_none());

	let tempo = report.tempo.unwrap().unwrap();
	assert_eq!(tempo.n_beats, 4);
	assert_eq!(tempo.origin, ChunkOrigin::Created);

	let container = read_container(&path);
	assert_eq!(ids(&container), vec![*b"fmt ", *b"data", *b"acid"]);

	let acid = TempoLoopRecord::parse(container.get(*b"acid").unwrap().content()).unwrap();
	assert_eq!(acid.n_beats, 4);
	assert_eq!(acid.tempo, 120.0);
	assert!(!acid.is_one_shot());
	assert!(acid.stretch());
}

#[test_log::test]
fn tagged_file_is_still_valid() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_sample(&dir, "Keys - 95 BPM Bb Min.wav", &hound_wav(22050, 22050 * 3));

	tag_from_filename(&path, ParseOptions::new(), WriteOptions::new())
		.unwrap()
		.unwrap();

	let mut reader = hound::WavReader::open(&path).unwrap();
	assert_eq!(reader.spec().sample_rate, 22050);
	assert_eq!(reader.duration(), 22050 * 3);

	let samples = reader.samples::<i16>().map(Result::unwrap);
	assert!(samples.enumerate().all(|(i, s)| s == (i % 1000) as i16));
}

#[test_log::test]
fn unknown_chunk_keeps_its_position() {
	let stream = RiffContainer::read_from(
		&mut Cursor::new(hound_wav(8000, 8000)),
		ParseOptions::new(),
	)
	.unwrap();

	// fmt, LIST, data
	let mut chunks = stream.chunks().to_vec();
	let list = RiffChunk::new(*b"LIST", b"INFOISFT\x07\x00\x00\x00acidtag\x00".to_vec());
	chunks.insert(1, list.clone());
	let original = RiffContainer::new(chunks).to_bytes().unwrap();

	let dir = tempfile::tempdir().unwrap();
	let path = write_sample(&dir, "Hat - 140 BPM.wav", &original);

	tag_from_filename(&path, ParseOptions::new(), WriteOptions::new())
		.unwrap()
		.unwrap();

	let container = read_container(&path);
	assert_eq!(
		ids(&container),
		vec![*b"fmt ", *b"LIST", *b"data", *b"acid"]
	);
	assert_eq!(container.chunks()[1], list);

	// Everything before the appended chunk is untouched, aside from the RIFF size
	let tagged = fs::read(&path).unwrap();
	assert_eq!(&tagged[8..original.len()], &original[8..]);
}

#[test_log::test]
fn tagging_twice_is_idempotent() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_sample(&dir, "Bass - 128 BPM (G#).wav", &hound_wav(48000, 48000 * 2));

	tag_from_filename(&path, ParseOptions::new(), WriteOptions::new())
		.unwrap()
		.unwrap();
	let once = fs::read(&path).unwrap();

	let report = tag_from_filename(&path, ParseOptions::new(), WriteOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(report.tempo.unwrap().unwrap().origin, ChunkOrigin::Existing);
	assert_eq!(report.root_note.unwrap().unwrap().origin, ChunkOrigin::Existing);

	assert_eq!(fs::read(&path).unwrap(), once);
}

#[test_log::test]
fn existing_chunks_are_updated_in_place() {
	let stream = RiffContainer::read_from(
		&mut Cursor::new(hound_wav(8000, 8000 * 2)),
		ParseOptions::new(),
	)
	.unwrap();

	// inst, acid, fmt, data
	let inst = InstrumentRecord {
		gain: 3,
		..InstrumentRecord::default()
	};
	let mut chunks = vec![
		inst.to_chunk().unwrap(),
		TempoLoopRecord::default().to_chunk().unwrap(),
	];
	chunks.extend_from_slice(stream.chunks());

	let dir = tempfile::tempdir().unwrap();
	let path = write_sample(
		&dir,
		"Lead - 90 BPM A Maj.wav",
		&RiffContainer::new(chunks).to_bytes().unwrap(),
	);

	tag_from_filename(&path, ParseOptions::new(), WriteOptions::new())
		.unwrap()
		.unwrap();

	let container = read_container(&path);
	assert_eq!(
		ids(&container),
		vec![*b"inst", *b"acid", *b"fmt ", *b"data"]
	);

	let inst = InstrumentRecord::parse(container.chunks()[0].content()).unwrap();
	assert_eq!(inst.unshifted_note, 0x45);
	assert_eq!(inst.gain, 3);

	let acid = TempoLoopRecord::parse(container.chunks()[1].content()).unwrap();
	assert_eq!(acid.n_beats, 3);
}

#[test_log::test]
fn skipped_files_are_not_opened() {
	let dir = tempfile::tempdir().unwrap();

	// Neither of these are valid WAV files, opening them would fail
	let not_wav = write_sample(&dir, "Loop - 120 BPM.mid", b"MThd");
	let no_tokens = write_sample(&dir, "Kick.wav", b"garbage");

	assert!(
		tag_from_filename(&not_wav, ParseOptions::new(), WriteOptions::new())
			.unwrap()
			.is_none()
	);
	assert!(
		tag_from_filename(&no_tokens, ParseOptions::new(), WriteOptions::new())
			.unwrap()
			.is_none()
	);

	assert_eq!(fs::read(&not_wav).unwrap(), b"MThd");
	assert_eq!(fs::read(&no_tokens).unwrap(), b"garbage");
}

#[test_log::test]
fn uppercase_extension() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_sample(&dir, "Pad - E.WAV", &hound_wav(8000, 8000));

	let report = tag_from_filename(&path, ParseOptions::new(), WriteOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(report.root_note.unwrap().unwrap().unshifted_note, 0x40);
}

#[test_log::test]
fn malformed_file_is_left_alone() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_sample(&dir, "Loop - 120 BPM.wav", b"RIFF\x08\x00\x00\x00WAVEfmt ");

	let err = tag_from_filename(&path, ParseOptions::new(), WriteOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::MalformedHeader(_)));

	assert_eq!(fs::read(&path).unwrap(), b"RIFF\x08\x00\x00\x00WAVEfmt ");
}

#[test_log::test]
fn truncated_file_is_left_alone() {
	let mut bytes = hound_wav(8000, 8000);
	bytes.truncate(bytes.len() - 100);

	let dir = tempfile::tempdir().unwrap();
	let path = write_sample(&dir, "Loop - 120 BPM.wav", &bytes);

	let err = tag_from_filename(&path, ParseOptions::new(), WriteOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::TruncatedChunk { .. }));

	assert_eq!(fs::read(&path).unwrap(), bytes);
}

#[test_log::test]
fn write_policy_on_disk() {
	let dir = tempfile::tempdir().unwrap();
	let original = hound_wav(8000, 8000);

	let fail = |policy| {
		let path = write_sample(&dir, "Sample.wav", &original);
		let result = edit_path(
			&path,
			ParseOptions::new(),
			WriteOptions::new().write_policy(policy),
			|editor| {
				let (inst, _) = editor.get_or_create_instrument_chunk()?;
				inst.set_root_note(4);
				Err::<(), _>(AcidError::new(ErrorKind::UnknownNoteName(String::from("X"))))
			},
		);
		assert!(result.is_err());

		read_container(&path)
	};

	assert!(!fail(WritePolicy::OnSuccess).contains(*b"inst"));

	let container = fail(WritePolicy::Always);
	let inst = InstrumentRecord::parse(container.get(*b"inst").unwrap().content()).unwrap();
	assert_eq!(inst.unshifted_note, 0x40);
}
