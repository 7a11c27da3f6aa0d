//! End-to-end merge tests
//!
//! Each test lays out a scratch corpus:
//! 1. `essays/*.txt` human files
//! 2. `metadata.csv` author table
//! 3. `ai.jsonl` secondary dataset
//!
//! and runs the full merge into `out/merged.jsonl`.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use authoraware_merge::merge::{MergeConfig, MergeSummary, Merger};
use authoraware_merge::report::{MergeEvent, Reporter};
use authoraware_merge::Error;
use serde_json::Value;
use tempfile::TempDir;

const HEADER: &str = "human_code,cefr,sex,genre,language_env\n";

/// Records event names for assertions.
#[derive(Default)]
struct RecordingReporter {
    events: RefCell<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &MergeEvent<'_>) {
        let debug = format!("{event:?}");
        let name = debug.split_whitespace().next().unwrap_or_default();
        self.events.borrow_mut().push(name.to_string());
    }
}

impl RecordingReporter {
    fn names(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(metadata: &str, ai: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("essays")).unwrap();
        fs::write(dir.path().join("metadata.csv"), metadata).unwrap();
        fs::write(dir.path().join("ai.jsonl"), ai).unwrap();
        Self { dir }
    }

    fn essay(&self, name: &str, content: impl AsRef<[u8]>) -> &Self {
        fs::write(self.dir.path().join("essays").join(name), content).unwrap();
        self
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("out").join("merged.jsonl")
    }

    fn config(&self) -> MergeConfig {
        MergeConfig::builder()
            .human_input_dir(self.dir.path().join("essays"))
            .metadata_file(self.dir.path().join("metadata.csv"))
            .ai_file(self.dir.path().join("ai.jsonl"))
            .output(self.output())
            .build()
    }

    fn run(&self, reporter: &dyn Reporter) -> authoraware_merge::Result<MergeSummary> {
        Merger::new(self.config()).with_reporter(reporter).run()
    }

    fn lines(&self) -> Vec<String> {
        read_lines(&self.output())
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_example_scenario_output_line() {
    let fixture = Fixture::new(&format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"), "");
    fixture.essay("WE_CHN_PTJ0_001_1_1.txt", "Hello world");

    let summary = fixture.run(&RecordingReporter::default()).unwrap();

    assert_eq!(summary.human_records, 1);
    assert_eq!(
        fixture.lines(),
        vec![
            r#"{"text": "Hello world", "model": "human", "prompt_type": "PTJ", "human_code": "WE_CHN_001", "cefr": "B1", "sex": "M", "genre": "arg", "language_env": "EFL"}"#
        ]
    );
}

#[test]
fn test_record_count_is_human_plus_secondary() {
    let metadata = format!(
        "{HEADER}WE_CHN_001,B1,M,arg,EFL\nWE_JPN_002,A2,F,arg,EFL\nWE_TWEN_003,B2,F,arg,EFL\n"
    );
    let ai = "{\"text\": \"gen 1\", \"model\": \"gpt-4o\"}\n{\"text\": \"gen 2\", \"model\": \"llama-3\"}\n";
    let fixture = Fixture::new(&metadata, ai);
    fixture
        .essay("WE_CHN_PTJ0_001_1.txt", "one")
        .essay("WE_JPN_SMK0_002_1.txt", "two")
        .essay("WE_TWN_PTJ0_003_1.txt", "three")
        .essay("WE_KOR_PTJ0_004_1.txt", "no metadata");

    let summary = fixture.run(&RecordingReporter::default()).unwrap();

    assert_eq!(summary.input_files, 4);
    assert_eq!(summary.human_records, 3);
    assert_eq!(summary.skipped_files, 1);
    assert_eq!(summary.secondary_records, 2);
    assert_eq!(summary.total_records(), 5);
    assert_eq!(fixture.lines().len(), 5);
}

#[test]
fn test_human_records_precede_secondary_records() {
    let ai = "{\"model\": \"gpt-4o\", \"text\": \"first\"}\n{\"model\": \"gpt-4o\", \"text\": \"second\"}\n";
    let fixture = Fixture::new(&format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"), ai);
    fixture.essay("WE_CHN_PTJ0_001_1.txt", "human");

    fixture.run(&RecordingReporter::default()).unwrap();

    let lines = fixture.lines();
    let models: Vec<Value> = lines
        .iter()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["model"].clone())
        .collect();
    assert_eq!(models, vec!["human", "gpt-4o", "gpt-4o"]);
    // Secondary key order survives the round trip
    assert_eq!(lines[1], r#"{"model": "gpt-4o", "text": "first"}"#);
    assert_eq!(lines[2], r#"{"model": "gpt-4o", "text": "second"}"#);
}

#[test]
fn test_unknown_codes_are_excluded() {
    let fixture = Fixture::new(&format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"), "");
    fixture
        .essay("WE_CHN_PTJ0_001_1.txt", "kept")
        .essay("WE_CHN_PTJ0_999_1.txt", "dropped")
        .essay("WE_TWEN_PTJ0_001_1.txt", "dropped: TWEN code is not in the table");

    fixture.run(&RecordingReporter::default()).unwrap();

    let lines = fixture.lines();
    assert_eq!(lines.len(), 1);
    assert!(!lines[0].contains("999"));
    assert!(!lines[0].contains("dropped"));
}

#[test]
fn test_taiwan_files_join_on_normalized_code() {
    let fixture = Fixture::new(&format!("{HEADER}WE_TWEN_010,A2,F,arg,EFL\n"), "");
    fixture.essay("WE_TWN_SMK0_010_1.txt", "Taiwan essay");

    fixture.run(&RecordingReporter::default()).unwrap();

    let record: Value = serde_json::from_str(&fixture.lines()[0]).unwrap();
    assert_eq!(record["human_code"], "WE_TWEN_010");
    assert_eq!(record["prompt_type"], "SMK");
    assert_eq!(record["cefr"], "A2");
}

#[test]
fn test_bom_and_whitespace_and_non_ascii() {
    let fixture = Fixture::new(&format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"), "");
    let mut content = b"\xEF\xBB\xBF\n  ".to_vec();
    content.extend_from_slice("Part-time jobs — “useful” for café staff.".as_bytes());
    content.extend_from_slice(b"\r\n\n");
    fixture.essay("WE_CHN_PTJ0_001_1.txt", content);

    fixture.run(&RecordingReporter::default()).unwrap();

    let lines = fixture.lines();
    let line = &lines[0];
    assert!(line.contains("“useful” for café"));
    let record: Value = serde_json::from_str(line).unwrap();
    assert_eq!(record["text"], "Part-time jobs — “useful” for café staff.");
}

#[test]
fn test_output_lines_reencode_identically() {
    let ai = "{\"text\": \"生成されたテキスト\", \"model\": \"gpt-4o\", \"score\": 0.5, \"tags\": [\"a\", \"b\"]}\n";
    let fixture = Fixture::new(&format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"), ai);
    fixture.essay("WE_CHN_PTJ0_001_1.txt", "私は賛成です。");

    fixture.run(&RecordingReporter::default()).unwrap();

    for line in fixture.lines() {
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(authoraware_merge::writer::to_json_line(&value).unwrap(), line);
    }
}

#[test]
fn test_secondary_numbers_pass_through_verbatim() {
    let ai = concat!(
        "{\"id\": 12345678901234567890123, \"x\": 1e400, \"big\": 18446744073709551615, ",
        "\"neg\": -9223372036854775808, \"p\": 0.10, \"f\": 0.30000000000000004}\n",
    );
    let fixture = Fixture::new(HEADER, ai);
    fixture.essay("WE_CHN_PTJ0_001_1.txt", "no metadata");

    fixture.run(&RecordingReporter::default()).unwrap();

    assert_eq!(fixture.lines(), vec![ai.trim_end().to_string()]);
}

#[test]
fn test_existing_output_is_overwritten() {
    let fixture = Fixture::new(&format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"), "");
    fixture.essay("WE_CHN_PTJ0_001_1.txt", "fresh");
    fs::create_dir_all(fixture.output().parent().unwrap()).unwrap();
    fs::write(fixture.output(), "stale 1\nstale 2\nstale 3\n").unwrap();

    fixture.run(&RecordingReporter::default()).unwrap();

    let lines = fixture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("fresh"));
}

#[test]
fn test_empty_input_dir_leaves_output_untouched() {
    let fixture = Fixture::new(
        &format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"),
        "{\"text\": \"ai\"}\n",
    );
    fixture.essay("README.md", "not an essay");
    fs::create_dir_all(fixture.output().parent().unwrap()).unwrap();
    fs::write(fixture.output(), "previous\n").unwrap();
    let reporter = RecordingReporter::default();

    let summary = fixture.run(&reporter).unwrap();

    assert_eq!(summary.input_files, 0);
    assert_eq!(summary.human_records, 0);
    assert!(summary.output.is_none());
    assert_eq!(fixture.lines(), vec!["previous"]);
    assert!(reporter.names().contains(&"NoInputFiles".to_string()));
}

#[test]
fn test_empty_input_dir_does_not_create_output() {
    let fixture = Fixture::new(HEADER, "");

    fixture.run(&RecordingReporter::default()).unwrap();

    assert!(!fixture.output().exists());
}

#[test]
fn test_reporter_sees_every_stage() {
    let fixture = Fixture::new(
        &format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"),
        "{\"text\": \"ai\"}\n",
    );
    fixture
        .essay("WE_CHN_PTJ0_001_1.txt", "kept")
        .essay("WE_KOR_PTJ0_002_1.txt", "skipped");
    let reporter = RecordingReporter::default();

    let summary = fixture.run(&reporter).unwrap();

    assert_eq!(
        reporter.names(),
        vec![
            "MetadataLoaded",
            "SecondaryLoaded",
            "InputFilesFound",
            "FileProcessed",
            "FileSkipped",
            "FileProcessed",
            "HumanProcessed",
            "Merged",
            "RecordWritten",
            "RecordWritten",
            "Written",
        ]
    );
    assert!(summary.output.unwrap().is_absolute());
}

#[test]
fn test_malformed_filename_aborts_without_output() {
    let fixture = Fixture::new(&format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"), "");
    fixture
        .essay("WE_CHN_PTJ0_001_1.txt", "fine")
        .essay("broken_name.txt", "bad");

    let err = fixture.run(&RecordingReporter::default()).unwrap_err();

    match err {
        Error::MalformedFilename { name, tokens } => {
            assert_eq!(name, "broken_name.txt");
            assert_eq!(tokens, 2);
        }
        other => panic!("expected malformed filename, got {other:?}"),
    }
    assert!(!fixture.output().exists());
}

#[test]
fn test_schema_error_aborts_before_output() {
    let fixture = Fixture::new("human_code,cefr,sex,genre\nWE_CHN_001,B1,M,arg\n", "");
    fixture.essay("WE_CHN_PTJ0_001_1.txt", "text");
    fs::create_dir_all(fixture.output().parent().unwrap()).unwrap();
    fs::write(fixture.output(), "previous\n").unwrap();

    let err = fixture.run(&RecordingReporter::default()).unwrap_err();

    assert!(matches!(err, Error::Schema { ref missing, .. } if missing == &["language_env"]));
    assert_eq!(fixture.lines(), vec!["previous"]);
}

#[test]
fn test_secondary_parse_error_aborts_before_output() {
    let fixture = Fixture::new(
        &format!("{HEADER}WE_CHN_001,B1,M,arg,EFL\n"),
        "{\"text\": \"ok\"}\nnot json\n",
    );
    fixture.essay("WE_CHN_PTJ0_001_1.txt", "text");

    let err = fixture.run(&RecordingReporter::default()).unwrap_err();

    assert!(matches!(err, Error::Parse { line: 2, .. }));
    assert!(err.to_string().contains("ai.jsonl"));
    assert!(!fixture.output().exists());
}

#[test]
fn test_missing_metadata_file() {
    let fixture = Fixture::new(HEADER, "");
    fs::remove_file(fixture.dir.path().join("metadata.csv")).unwrap();

    let err = fixture.run(&RecordingReporter::default()).unwrap_err();

    assert!(matches!(err, Error::PathIo { ref path, .. } if path.ends_with("metadata.csv")));
}
