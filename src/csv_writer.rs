use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use serde::Serialize;

use crate::traits::CSVWrite;

/// CSV sink over any `io::Write`. Rows end in `\n` and fields are quoted
/// only when they contain a comma, a quote, or a line break.
pub struct CSVWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CSVWriter<W> {
    pub fn new(inner: W) -> Self {
        CSVWriter {
            writer: WriterBuilder::new()
                .has_headers(false)
                .quote_style(QuoteStyle::Necessary)
                .terminator(Terminator::Any(b'\n'))
                .from_writer(inner),
        }
    }

    /// Flushes and hands back the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl CSVWriter<File> {
    /// Creates or truncates the file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(CSVWriter::new(File::create(path)?))
    }
}

impl<W: Write> CSVWrite for CSVWriter<W> {
    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        Ok(self.writer.serialize(record)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.writer.flush()?)
    }
}
