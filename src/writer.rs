//! JSONL output
//!
//! Lines use `", "` and `": "` separators so the output matches what
//! Python's `json.dumps(..., ensure_ascii=False)` produces for the same data.
//! Non-ASCII text is written as-is.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::Result;

/// Compact formatter with a space after `,` and `:`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize `value` as one JSON line (no trailing newline).
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if `value` cannot be serialized.
pub fn to_json_line<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    write_line(&mut buf, value)?;
    let line =
        String::from_utf8(buf).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(line)
}

fn write_line<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    let mut serializer = Serializer::with_formatter(&mut *writer, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

/// Line-at-a-time JSONL sink.
#[derive(Debug)]
pub struct JsonlWriter<W: Write> {
    writer: W,
    count: usize,
}

impl<W: Write> JsonlWriter<W> {
    /// Wrap `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }

    /// Write `record` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if `record` cannot be serialized or the writer fails.
    pub fn write_record<T: Serialize + ?Sized>(&mut self, record: &T) -> Result<()> {
        write_line(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.count += 1;
        Ok(())
    }

    /// Lines written so far.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Flush and return the number of lines written.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.count)
    }
}

/// Write each record as one line, returning the number of lines written.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized or the writer fails.
pub fn write_jsonl<W, T, I>(writer: W, records: I) -> Result<usize>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = JsonlWriter::new(writer);
    for record in records {
        writer.write_record(&record)?;
    }
    writer.finish()
}
