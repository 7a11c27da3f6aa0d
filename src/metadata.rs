//! Human metadata table
//!
//! One CSV row per essay author, keyed by `human_code`. The set of codes in
//! this table decides which essay files make it into the merged dataset.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::report::{MergeEvent, Reporter};
use crate::{Error, Result};

/// Columns every metadata file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["human_code", "cefr", "sex", "genre", "language_env"];

/// Descriptive attributes of one essay author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanMetadata {
    /// CEFR proficiency level (`A2_0`, `B1_1`, ...)
    pub cefr: String,
    /// Sex
    pub sex: String,
    /// Genre
    pub genre: String,
    /// Language-exposure environment (`EFL`, `ESL`, `NS`)
    pub language_env: String,
}

#[derive(Debug, Deserialize)]
struct MetadataRow {
    human_code: String,
    cefr: String,
    sex: String,
    genre: String,
    language_env: String,
}

impl MetadataRow {
    fn split(self) -> (String, HumanMetadata) {
        let metadata = HumanMetadata {
            cefr: self.cefr,
            sex: self.sex,
            genre: self.genre,
            language_env: self.language_env,
        };
        (self.human_code, metadata)
    }
}

/// Lookup from human code to metadata, plus the set of valid codes.
#[derive(Debug, Default, Clone)]
pub struct MetadataIndex {
    records: HashMap<String, HumanMetadata>,
    codes: HashSet<String>,
}

impl MetadataIndex {
    /// Load a metadata CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a required column is missing,
    /// [`Error::Csv`] if a row cannot be read, or [`Error::PathIo`] if the
    /// file cannot be opened.
    pub fn load<P: AsRef<Path>>(path: P, reporter: &dyn Reporter) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::io_at(path))?;
        let index = Self::read_from(file, path)?;

        reporter.report(&MergeEvent::MetadataLoaded { codes: index.len() });
        Ok(index)
    }

    /// Read metadata CSV from any reader.
    ///
    /// # Errors
    ///
    /// Same as [`MetadataIndex::load`], reported against `<reader>`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::read_from(reader, Path::new("<reader>"))
    }

    fn read_from<R: Read>(reader: R, path: &Path) -> Result<Self> {
        let csv_error = |source| Error::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers().map_err(csv_error)?;
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|header| header == **column))
            .map(|column| (*column).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Schema {
                path: PathBuf::from(path),
                missing,
            });
        }

        let mut index = Self::default();
        for row in reader.deserialize::<MetadataRow>() {
            let (human_code, metadata) = row.map_err(csv_error)?.split();
            index.insert(human_code, metadata);
        }
        Ok(index)
    }

    /// Insert or replace the metadata for `human_code`.
    pub fn insert(&mut self, human_code: impl Into<String>, metadata: HumanMetadata) {
        let human_code = human_code.into();
        self.codes.insert(human_code.clone());
        self.records.insert(human_code, metadata);
    }

    /// Whether `human_code` is a valid code.
    #[must_use]
    pub fn contains(&self, human_code: &str) -> bool {
        self.codes.contains(human_code)
    }

    /// Metadata for `human_code`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMetadata`] if the code is unknown.
    pub fn get(&self, human_code: &str) -> Result<&HumanMetadata> {
        self.records
            .get(human_code)
            .ok_or_else(|| Error::MissingMetadata(human_code.to_string()))
    }

    /// All valid codes.
    #[must_use]
    pub const fn codes(&self) -> &HashSet<String> {
        &self.codes
    }

    /// Number of distinct codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
