//! AI-generated dataset loader
//!
//! The secondary dataset is already JSONL. Each line holds one object, which
//! is passed through to the output without looking at its fields.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};

use crate::report::{MergeEvent, Reporter};
use crate::{Error, Result};

/// One opaque secondary-dataset record.
pub type SecondaryRecord = Map<String, Value>;

/// Load a JSONL file of objects, preserving line order.
///
/// # Errors
///
/// Returns [`Error::Parse`] on the first line that is not a JSON object, or
/// [`Error::PathIo`] if the file cannot be read. Nothing is returned on failure.
pub fn load_secondary<P: AsRef<Path>>(
    path: P,
    reporter: &dyn Reporter,
) -> Result<Vec<SecondaryRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(Error::io_at(path))?;
    let records = read_from(file, path)?;

    reporter.report(&MergeEvent::SecondaryLoaded {
        records: records.len(),
    });
    Ok(records)
}

/// Read JSONL objects from any reader.
///
/// # Errors
///
/// Same as [`load_secondary`], reported against `<reader>`.
pub fn read_secondary<R: Read>(reader: R) -> Result<Vec<SecondaryRecord>> {
    read_from(reader, Path::new("<reader>"))
}

fn read_from<R: Read>(reader: R, path: &Path) -> Result<Vec<SecondaryRecord>> {
    let mut reader = BufReader::new(reader);
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(Error::io_at(path))? == 0 {
            break;
        }
        line += 1;
        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        // invalid UTF-8 fails here with this line number
        let record = serde_json::from_slice(&buf).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            line,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
