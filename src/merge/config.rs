//! Merge Config - the four paths a run reads from and writes to

use std::path::{Path, PathBuf};

/// Default directory of raw ICNALE essay files.
pub const DEFAULT_HUMAN_INPUT_DIR: &str = "data/human_data/ICNALE_WE_2.6/WE_0_Unclassified_Unmerged";
/// Default human metadata CSV.
pub const DEFAULT_METADATA_FILE: &str = "data/metadata/human_metadata.csv";
/// Default AI-generated JSONL dataset.
pub const DEFAULT_AI_FILE: &str = "data/ai_data/ai_generated_dataset.jsonl";
/// Default merged output.
pub const DEFAULT_OUTPUT: &str = "data/authorawarebench.jsonl";

/// Paths for one merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    human_input_dir: PathBuf,
    metadata_file: PathBuf,
    ai_file: PathBuf,
    output: PathBuf,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            human_input_dir: PathBuf::from(DEFAULT_HUMAN_INPUT_DIR),
            metadata_file: PathBuf::from(DEFAULT_METADATA_FILE),
            ai_file: PathBuf::from(DEFAULT_AI_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl MergeConfig {
    /// Create a builder starting from the default paths.
    #[must_use]
    pub fn builder() -> MergeConfigBuilder {
        MergeConfigBuilder::default()
    }

    /// Directory scanned for `*.txt` essays.
    #[must_use]
    pub fn human_input_dir(&self) -> &Path {
        &self.human_input_dir
    }

    /// Metadata CSV.
    #[must_use]
    pub fn metadata_file(&self) -> &Path {
        &self.metadata_file
    }

    /// Secondary JSONL dataset.
    #[must_use]
    pub fn ai_file(&self) -> &Path {
        &self.ai_file
    }

    /// Output JSONL file.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// Builder for `MergeConfig`.
#[derive(Debug, Default)]
pub struct MergeConfigBuilder {
    config: MergeConfig,
}

impl MergeConfigBuilder {
    /// Set the essay directory.
    #[must_use]
    pub fn human_input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.human_input_dir = path.into();
        self
    }

    /// Set the metadata CSV.
    #[must_use]
    pub fn metadata_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.metadata_file = path.into();
        self
    }

    /// Set the secondary JSONL dataset.
    #[must_use]
    pub fn ai_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ai_file = path.into();
        self
    }

    /// Set the output JSONL file.
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }

    /// Build the `MergeConfig`.
    #[must_use]
    pub fn build(self) -> MergeConfig {
        self.config
    }
}
