//! Progress reporting
//!
//! Components never log directly. They hand [`MergeEvent`]s to an injected
//! [`Reporter`], so tests can observe a run without a global subscriber.

use std::path::Path;

use crate::filename::HumanCode;

/// Progress points of a merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent<'a> {
    /// Metadata table loaded
    MetadataLoaded {
        /// Distinct human codes
        codes: usize,
    },
    /// Secondary dataset loaded
    SecondaryLoaded {
        /// Records read
        records: usize,
    },
    /// Input directory holds no essay files
    NoInputFiles {
        /// Directory scanned
        dir: &'a Path,
    },
    /// Essay files found in the input directory
    InputFilesFound {
        /// File count
        count: usize,
    },
    /// Essay file dropped because its code has no metadata
    FileSkipped {
        /// Dropped file
        path: &'a Path,
        /// Code parsed from its name
        human_code: &'a HumanCode,
    },
    /// One essay file handled, whether kept or skipped
    FileProcessed {
        /// File handled
        path: &'a Path,
    },
    /// Human records built
    HumanProcessed {
        /// Records retained
        records: usize,
    },
    /// Both populations concatenated
    Merged {
        /// Human records
        human: usize,
        /// Secondary records
        secondary: usize,
    },
    /// One output line written
    RecordWritten {
        /// Lines written so far
        written: usize,
        /// Lines to write in total
        total: usize,
    },
    /// Output file written
    Written {
        /// Output location
        path: &'a Path,
        /// Lines written
        records: usize,
    },
}

/// Sink for [`MergeEvent`]s.
pub trait Reporter {
    /// Record one event.
    fn report(&self, event: &MergeEvent<'_>);
}

/// Default reporter: forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &MergeEvent<'_>) {
        match event {
            MergeEvent::MetadataLoaded { codes } => {
                tracing::info!("Loaded metadata for {codes} human codes");
            }
            MergeEvent::SecondaryLoaded { records } => {
                tracing::info!("Loaded {records} AI-generated samples");
            }
            MergeEvent::NoInputFiles { dir } => {
                tracing::warn!("No .txt files found in {}", dir.display());
            }
            MergeEvent::InputFilesFound { count } => {
                tracing::info!("Found {count} human text files. Starting processing...");
            }
            MergeEvent::FileSkipped { path, human_code } => {
                tracing::debug!(%human_code, "Skipping {}: no metadata", path.display());
            }
            MergeEvent::FileProcessed { path } => {
                tracing::trace!("Processed {}", path.display());
            }
            MergeEvent::HumanProcessed { records } => {
                tracing::info!("Processed {records} human entries");
            }
            MergeEvent::Merged { human, secondary } => {
                tracing::info!(
                    "Total entries after merging: {} ({human} human + {secondary} AI)",
                    human + secondary
                );
            }
            MergeEvent::RecordWritten { written, total } => {
                tracing::trace!("Wrote {written}/{total} entries");
            }
            MergeEvent::Written { path, records } => {
                tracing::info!(
                    "Merge complete. {records} entries written to: {}",
                    path.display()
                );
            }
        }
    }
}

/// Reporter that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &MergeEvent<'_>) {}
}
