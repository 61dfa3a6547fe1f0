use crate::error::{DcmMergeError, Result};
use crate::types::{FieldSpec, Record};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column delimiter of the output table
pub const DELIMITER: char = ';';

/// Replacement for delimiter characters found inside cell values
pub const DELIMITER_SUBSTITUTE: char = ',';

/// Extension of the output table file
pub const TABLE_EXTENSION: &str = "csv";

/// Makes a value safe to place in a single table cell
///
/// Replaces `;` with `,` so the column count cannot change, and line breaks
/// with spaces so every record stays on one line.
pub fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains([DELIMITER, '\r', '\n']) {
        Cow::Owned(
            value
                .chars()
                .map(|c| match c {
                    DELIMITER => DELIMITER_SUBSTITUTE,
                    '\r' | '\n' => ' ',
                    other => other,
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(value)
    }
}

/// Streaming writer for the `;`-delimited output table
///
/// Each record is serialized and flushed before the call returns, so memory
/// use does not grow with the number of files.
pub struct TableWriter<W: Write> {
    inner: W,
    columns: usize,
    rows: usize,
}

impl TableWriter<BufWriter<File>> {
    /// Creates (or truncates) the destination file and writes the header row
    ///
    /// The parent directory must already exist.
    pub fn create<P: AsRef<Path>>(path: P, spec: &FieldSpec) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::new(file), spec)
    }
}

impl<W: Write> TableWriter<W> {
    /// Wraps a writer and emits the header row for `spec`
    pub fn new(inner: W, spec: &FieldSpec) -> Result<Self> {
        let mut writer = Self {
            inner,
            columns: spec.column_count(),
            rows: 0,
        };
        writer.write_line(spec.header().into_iter().map(sanitize_cell))?;
        Ok(writer)
    }

    /// Appends one record as a line and flushes it
    ///
    /// # Errors
    ///
    /// Returns an error if the record's column count differs from the header
    /// or if writing fails.
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        if record.column_count() != self.columns {
            return Err(DcmMergeError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "record for {} has {} columns, expected {}",
                    record.file_path.display(),
                    record.column_count(),
                    self.columns
                ),
            )));
        }

        let path = record.file_path.to_string_lossy();
        let cells = record
            .values
            .iter()
            .map(|v| Cow::Borrowed(v.as_cell()))
            .chain(std::iter::once(sanitize_cell(&path)));
        self.write_line(cells)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns per row
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Flushes and returns the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn write_line<'a, I>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = Cow<'a, str>>,
    {
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                write!(self.inner, "{}", DELIMITER)?;
            }
            self.inner.write_all(cell.as_bytes())?;
        }
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        Ok(())
    }
}
