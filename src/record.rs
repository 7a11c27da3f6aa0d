//! Output record schema
//!
//! The merged dataset mixes two record shapes on consecutive lines:
//!
//! ```text
//! {"text": ..., "model": "human", "prompt_type": ..., "human_code": ..., "cefr": ..., ...}
//! {...secondary record, fields untouched...}
//! ```

use serde::Serialize;

use crate::filename::{HumanCode, ParsedFilename};
use crate::metadata::HumanMetadata;
use crate::secondary::SecondaryRecord;

/// `model` value marking human-authored text.
pub const HUMAN_MODEL: &str = "human";

/// One human essay joined with its author metadata.
///
/// Field order here is the field order on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumanRecord {
    text: String,
    model: String,
    prompt_type: String,
    human_code: HumanCode,
    cefr: String,
    sex: String,
    genre: String,
    language_env: String,
}

impl HumanRecord {
    /// Build a record from essay text, its parsed filename and its metadata.
    #[must_use]
    pub fn new(text: impl Into<String>, parsed: ParsedFilename, metadata: &HumanMetadata) -> Self {
        Self {
            text: text.into(),
            model: HUMAN_MODEL.to_string(),
            prompt_type: parsed.prompt_type,
            human_code: parsed.human_code,
            cefr: metadata.cefr.clone(),
            sex: metadata.sex.clone(),
            genre: metadata.genre.clone(),
            language_env: metadata.language_env.clone(),
        }
    }

    /// Essay text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Prompt category tag.
    #[must_use]
    pub fn prompt_type(&self) -> &str {
        &self.prompt_type
    }

    /// Metadata join key.
    #[must_use]
    pub const fn human_code(&self) -> &HumanCode {
        &self.human_code
    }

    /// Author metadata attached to this essay.
    #[must_use]
    pub fn metadata(&self) -> HumanMetadata {
        HumanMetadata {
            cefr: self.cefr.clone(),
            sex: self.sex.clone(),
            genre: self.genre.clone(),
            language_env: self.language_env.clone(),
        }
    }
}

/// A line of the merged dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputRecord {
    /// Human essay with metadata
    Human(HumanRecord),
    /// Secondary-dataset record, emitted verbatim
    Passthrough(SecondaryRecord),
}

impl OutputRecord {
    /// Whether this record came from the human corpus.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        matches!(self, Self::Human(_))
    }
}

impl From<HumanRecord> for OutputRecord {
    fn from(record: HumanRecord) -> Self {
        Self::Human(record)
    }
}

impl From<SecondaryRecord> for OutputRecord {
    fn from(record: SecondaryRecord) -> Self {
        Self::Passthrough(record)
    }
}
