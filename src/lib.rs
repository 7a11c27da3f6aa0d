//! # authoraware-merge: Human + AI Benchmark Dataset Builder
//!
//! Merges ICNALE written essays (one raw `.txt` per essay) with an
//! AI-generated JSONL dataset into a single JSONL benchmark file for
//! authorship-detection experiments.
//!
//! ## Pipeline
//!
//! - **Filename parsing**: `WE_CHN_PTJ0_001_1_1.txt` -> human code `WE_CHN_001`, prompt `PTJ`
//! - **Metadata join**: author attributes come from a CSV keyed by human code
//! - **Filtering**: essays without a metadata row are dropped, never padded
//! - **Passthrough**: AI records are copied verbatim after the human records
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use authoraware_merge::merge::{MergeConfig, Merger};
//!
//! let config = MergeConfig::builder()
//!     .human_input_dir("data/human_data/essays")
//!     .metadata_file("data/metadata/human_metadata.csv")
//!     .ai_file("data/ai_data/ai_generated_dataset.jsonl")
//!     .output("data/authorawarebench.jsonl")
//!     .build();
//!
//! let summary = Merger::new(config).run()?;
//! println!("{} human + {} AI", summary.human_records, summary.secondary_records);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod filename;
pub mod merge;
pub mod metadata;
pub mod record;
pub mod report;
pub mod secondary;
pub mod writer;

pub use error::{Error, Result};
