//! authoraware-merge CLI
//!
//! ```bash
//! authoraware-merge \
//!     --human_input_dir "data/human_data/ICNALE_WE_2.6/WE_0_Unclassified_Unmerged" \
//!     --metadata_file "data/metadata/human_metadata.csv" \
//!     --ai_file "data/ai_data/ai_generated_dataset.jsonl" \
//!     --output "data/authorawarebench.jsonl"
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::cell::RefCell;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

use authoraware_merge::merge::{
    MergeConfig, Merger, DEFAULT_AI_FILE, DEFAULT_HUMAN_INPUT_DIR, DEFAULT_METADATA_FILE,
    DEFAULT_OUTPUT,
};
use authoraware_merge::report::{MergeEvent, Reporter, TracingReporter};

const PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta} @ {per_sec}) {msg}";

/// Merge ICNALE human and AI data into JSONL format.
#[derive(Debug, Parser)]
#[command(name = "authoraware-merge", version, about)]
struct Cli {
    /// Path to the folder containing raw human text files.
    #[arg(long = "human_input_dir", alias = "human-input-dir", default_value = DEFAULT_HUMAN_INPUT_DIR)]
    human_input_dir: PathBuf,

    /// Path to the CSV file containing human metadata and valid codes.
    #[arg(long = "metadata_file", alias = "metadata-file", default_value = DEFAULT_METADATA_FILE)]
    metadata_file: PathBuf,

    /// Path to the JSONL file containing AI-generated data.
    #[arg(long = "ai_file", alias = "ai-file", default_value = DEFAULT_AI_FILE)]
    ai_file: PathBuf,

    /// Path for the output merged JSONL file.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

impl From<Cli> for MergeConfig {
    fn from(cli: Cli) -> Self {
        Self::builder()
            .human_input_dir(cli.human_input_dir)
            .metadata_file(cli.metadata_file)
            .ai_file(cli.ai_file)
            .output(cli.output)
            .build()
    }
}

/// Draws a bar over the essay loop and another over the write loop.
/// Log lines still go to `tracing`, printed above the active bar.
struct ProgressReporter {
    inner: TracingReporter,
    style: ProgressStyle,
    hidden: bool,
    bar: RefCell<Option<ProgressBar>>,
}

impl ProgressReporter {
    fn new() -> anyhow::Result<Self> {
        let style = ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)
            .context("invalid progress bar template")?
            .progress_chars("=> ");
        Ok(Self {
            inner: TracingReporter,
            style,
            hidden: false,
            bar: RefCell::new(None),
        })
    }

    #[cfg(test)]
    fn hidden() -> anyhow::Result<Self> {
        Ok(Self {
            hidden: true,
            ..Self::new()?
        })
    }

    fn start(&self, len: usize, message: &'static str) {
        let len = u64::try_from(len).unwrap_or(u64::MAX);
        let bar = if self.hidden {
            ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden())
        } else {
            ProgressBar::new(len)
        };
        bar.set_style(self.style.clone());
        bar.set_message(message);
        *self.bar.borrow_mut() = Some(bar);
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            f(bar);
        }
    }

    #[cfg(test)]
    fn position(&self) -> Option<(u64, bool)> {
        self.bar
            .borrow()
            .as_ref()
            .map(|bar| (bar.position(), bar.is_finished()))
    }
}

impl Reporter for ProgressReporter {
    fn report(&self, event: &MergeEvent<'_>) {
        match event {
            MergeEvent::InputFilesFound { count } => self.start(*count, "Reading essays..."),
            MergeEvent::FileProcessed { path } => self.with_bar(|bar| {
                bar.inc(1);
                if let Some(name) = path.file_name() {
                    bar.set_message(name.to_string_lossy().into_owned());
                }
            }),
            MergeEvent::HumanProcessed { records } => {
                self.with_bar(|bar| bar.finish_with_message(format!("{records} human entries")));
            }
            MergeEvent::Merged { human, secondary } => {
                self.start(human + secondary, "Writing...");
            }
            MergeEvent::RecordWritten { written, .. } => self.with_bar(|bar| {
                bar.set_position(u64::try_from(*written).unwrap_or(u64::MAX));
            }),
            MergeEvent::Written { records, .. } => {
                self.with_bar(|bar| bar.finish_with_message(format!("{records} entries written")));
            }
            _ => {}
        }

        match self.bar.borrow().as_ref() {
            Some(bar) => bar.suspend(|| self.inner.report(event)),
            None => self.inner.report(event),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new("%H:%M:%S".to_string()))
        .with_target(false)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = MergeConfig::from(Cli::parse());
    tracing::debug!(?config, "Starting merge");

    let reporter = ProgressReporter::new()?;
    Merger::new(config.clone())
        .with_reporter(&reporter)
        .run()
        .with_context(|| format!("merge into {} failed", config.output().display()))?;

    Ok(())
}
