//! ICNALE filename parsing
//!
//! Written-essay files are named `WE_CHN_PTJ0_001_1_1.txt`:
//!
//! ```text
//! WE   _ CHN    _ PTJ0     _ 001      _ 1_1 ...
//! corpus region   category   sequence   ignored
//! ```
//!
//! The human code joins corpus, region and sequence (`WE_CHN_001`), and the
//! prompt type is the first three characters of the category (`PTJ`).

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// Extension carried by every essay file.
pub const TEXT_EXTENSION: &str = "txt";

/// Length of the prompt-type prefix taken from the category token.
const PROMPT_TYPE_LEN: usize = 3;

/// Region codes whose metadata spelling differs from the filename spelling.
const REGION_ALIASES: &[(&str, &str)] = &[("TWN", "TWEN")];

/// Identifier joining an essay file to its metadata row, e.g. `WE_CHN_001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HumanCode(String);

impl HumanCode {
    /// Build a code from its three components.
    #[must_use]
    pub fn new(corpus: &str, region: &str, sequence: &str) -> Self {
        Self(format!("{corpus}_{}_{sequence}", normalize_region(region)))
    }

    /// Borrow the code as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HumanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HumanCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Result of parsing an essay filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Metadata join key
    pub human_code: HumanCode,
    /// Prompt category tag (`PTJ`, `SMK`)
    pub prompt_type: String,
}

/// Map a region token through the known aliases.
#[must_use]
pub fn normalize_region(region: &str) -> &str {
    REGION_ALIASES
        .iter()
        .find(|&&(alias, _)| alias == region)
        .map_or(region, |&(_, canonical)| canonical)
}

/// Parse an essay filename into its human code and prompt type.
///
/// A trailing `.txt` is ignored. Tokens beyond the fourth are ignored.
///
/// # Errors
///
/// Returns [`Error::MalformedFilename`] if the name has fewer than four
/// `_`-separated tokens.
///
/// # Example
///
/// ```rust
/// use authoraware_merge::filename::parse_filename;
///
/// let parsed = parse_filename("WE_TWN_SMK0_042_1.txt")?;
/// assert_eq!(parsed.human_code.as_str(), "WE_TWEN_042");
/// assert_eq!(parsed.prompt_type, "SMK");
/// # Ok::<(), authoraware_merge::Error>(())
/// ```
pub fn parse_filename(name: &str) -> Result<ParsedFilename> {
    let stem = name
        .strip_suffix(TEXT_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(name);

    let tokens: Vec<&str> = stem.split('_').collect();
    let [corpus, region, category, sequence, ..] = tokens.as_slice() else {
        return Err(Error::MalformedFilename {
            name: name.to_string(),
            tokens: tokens.len(),
        });
    };

    Ok(ParsedFilename {
        human_code: HumanCode::new(corpus, region, sequence),
        prompt_type: category.chars().take(PROMPT_TYPE_LEN).collect(),
    })
}
