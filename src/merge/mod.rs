//! Merge driver
//!
//! Runs the whole pipeline once:
//!
//! ```text
//! metadata.csv ──> MetadataIndex ─┐
//!                                 ├─> filter + join ─> HumanRecord* ─┐
//! input_dir/*.txt ────────────────┘                                  ├─> output.jsonl
//! ai.jsonl ──> SecondaryRecord* ─────────────────────────────────────┘
//! ```
//!
//! Both inputs are fully loaded and every essay is processed before the
//! output file is opened, so a failed run never truncates an existing output.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use authoraware_merge::merge::{MergeConfig, Merger};
//!
//! let config = MergeConfig::builder()
//!     .human_input_dir("corpus/essays")
//!     .output("out/merged.jsonl")
//!     .build();
//!
//! let summary = Merger::new(config).run()?;
//! println!("{} records", summary.total_records());
//! # Ok::<(), authoraware_merge::Error>(())
//! ```

mod config;

pub use config::{
    MergeConfig, MergeConfigBuilder, DEFAULT_AI_FILE, DEFAULT_HUMAN_INPUT_DIR,
    DEFAULT_METADATA_FILE, DEFAULT_OUTPUT,
};

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::filename::{parse_filename, TEXT_EXTENSION};
use crate::metadata::MetadataIndex;
use crate::record::{HumanRecord, OutputRecord};
use crate::report::{MergeEvent, Reporter, TracingReporter};
use crate::secondary::{load_secondary, SecondaryRecord};
use crate::writer::JsonlWriter;
use crate::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Counts from one merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// `*.txt` files found in the input directory
    pub input_files: usize,
    /// Human records emitted
    pub human_records: usize,
    /// Files dropped for lack of metadata
    pub skipped_files: usize,
    /// Secondary records emitted
    pub secondary_records: usize,
    /// Output file, if one was written
    pub output: Option<PathBuf>,
}

impl MergeSummary {
    /// Total lines in the merged output.
    #[must_use]
    pub const fn total_records(&self) -> usize {
        self.human_records + self.secondary_records
    }
}

/// Runs a merge for one [`MergeConfig`].
pub struct Merger<'r> {
    config: MergeConfig,
    reporter: &'r dyn Reporter,
}

impl Merger<'static> {
    /// Create a merger that reports through `tracing`.
    #[must_use]
    pub fn new(config: MergeConfig) -> Self {
        Self {
            config,
            reporter: &TracingReporter,
        }
    }
}

impl<'r> Merger<'r> {
    /// Replace the reporter.
    #[must_use]
    pub fn with_reporter<'n>(self, reporter: &'n dyn Reporter) -> Merger<'n> {
        Merger {
            config: self.config,
            reporter,
        }
    }

    /// Paths this merger reads and writes.
    #[must_use]
    pub const fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Run the merge.
    ///
    /// If the input directory holds no `*.txt` files, nothing is written and
    /// the returned summary has `output: None`.
    ///
    /// # Errors
    ///
    /// Fails on the first loader, filename, decode or IO error. No output is
    /// written unless every input was read successfully.
    pub fn run(&self) -> Result<MergeSummary> {
        let metadata = MetadataIndex::load(self.config.metadata_file(), self.reporter)?;
        let secondary = load_secondary(self.config.ai_file(), self.reporter)?;

        let input_dir = self.config.human_input_dir();
        let files = list_text_files(input_dir)?;
        let mut summary = MergeSummary {
            input_files: files.len(),
            secondary_records: secondary.len(),
            ..MergeSummary::default()
        };

        if files.is_empty() {
            self.reporter.report(&MergeEvent::NoInputFiles { dir: input_dir });
            return Ok(summary);
        }
        self.reporter
            .report(&MergeEvent::InputFilesFound { count: files.len() });

        let human = self.human_records(&files, &metadata)?;
        summary.human_records = human.len();
        summary.skipped_files = files.len() - human.len();
        self.reporter.report(&MergeEvent::HumanProcessed {
            records: human.len(),
        });
        self.reporter.report(&MergeEvent::Merged {
            human: summary.human_records,
            secondary: summary.secondary_records,
        });

        let output = self.config.output();
        let written = self.write_output(output, merge_records(human, secondary))?;
        let output = fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf());
        self.reporter.report(&MergeEvent::Written {
            path: &output,
            records: written,
        });

        summary.output = Some(output);
        Ok(summary)
    }

    /// Parse, filter and join every essay file, in the given order.
    ///
    /// # Errors
    ///
    /// Fails on a malformed filename, an unreadable or non-UTF-8 file, or a
    /// code that passes the filter without metadata.
    pub fn human_records(
        &self,
        files: &[PathBuf],
        metadata: &MetadataIndex,
    ) -> Result<Vec<HumanRecord>> {
        let mut records = Vec::with_capacity(files.len());
        for path in files {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            let parsed = parse_filename(&name)?;

            if metadata.contains(parsed.human_code.as_str()) {
                let text = read_essay(path)?;
                let author = metadata.get(parsed.human_code.as_str())?;
                records.push(HumanRecord::new(text, parsed, author));
            } else {
                self.reporter.report(&MergeEvent::FileSkipped {
                    path,
                    human_code: &parsed.human_code,
                });
            }
            self.reporter.report(&MergeEvent::FileProcessed { path });
        }
        Ok(records)
    }

    fn write_output(&self, path: &Path, records: Vec<OutputRecord>) -> Result<usize> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(Error::io_at(parent))?;
        }
        let file = File::create(path).map_err(Error::io_at(path))?;

        let total = records.len();
        let mut writer = JsonlWriter::new(BufWriter::new(file));
        for record in &records {
            writer.write_record(record)?;
            self.reporter.report(&MergeEvent::RecordWritten {
                written: writer.count(),
                total,
            });
        }
        writer.finish()
    }
}

/// Human records first, then secondary records, each in their given order.
#[must_use]
pub fn merge_records(human: Vec<HumanRecord>, secondary: Vec<SecondaryRecord>) -> Vec<OutputRecord> {
    human
        .into_iter()
        .map(OutputRecord::Human)
        .chain(secondary.into_iter().map(OutputRecord::Passthrough))
        .collect()
}

/// Regular `*.txt` files directly inside `dir`, sorted by path.
///
/// Symlinks are resolved only for `*.txt` names, so a dangling link with any
/// other name is ignored.
///
/// # Errors
///
/// Returns [`Error::PathIo`] if `dir` cannot be listed or a `*.txt` link
/// cannot be resolved.
pub fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| Error::PathIo {
            path: dir.to_path_buf(),
            source: err.into(),
        })?;
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == TEXT_EXTENSION) {
            continue;
        }
        let is_file = if entry.path_is_symlink() {
            fs::metadata(path).map_err(Error::io_at(path))?.is_file()
        } else {
            entry.file_type().is_file()
        };
        if is_file {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Read an essay as UTF-8, dropping a leading BOM and surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file is not valid UTF-8.
pub fn read_essay(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(Error::io_at(path))?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    let text = std::str::from_utf8(body).map_err(|_| Error::Decode {
        path: path.to_path_buf(),
    })?;
    Ok(text.trim().to_string())
}
