use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    csv_writer::CSVWriter, errors::DashboardError, filter::FilteredView, traits::CSVWrite,
    traits::Exporter,
};

pub const EXPORT_HEADER: [&str; 3] = ["month", "category", "amount"];
pub const EXPORT_COMPLETED: &str = "export completed";

/// Outcome of one export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportResult {
    pub success: bool,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl ExportResult {
    fn completed(path: &Path) -> Self {
        ExportResult {
            success: true,
            message: EXPORT_COMPLETED.to_string(),
            path: Some(path.to_path_buf()),
        }
    }

    fn failed(err: &anyhow::Error) -> Self {
        ExportResult {
            success: false,
            message: err.to_string(),
            path: None,
        }
    }
}

/// Writes the header and every record of the view, then flushes.
pub fn write_view<W: CSVWrite>(writer: &mut W, view: &FilteredView<'_>) -> Result<()> {
    writer.write_record(&EXPORT_HEADER)?;
    for rec in view.iter() {
        writer.write_record(rec)?;
    }
    writer.flush()
}

/// Renders the view to CSV bytes in memory.
pub fn render_csv(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut writer = CSVWriter::new(Vec::new());
    write_view(&mut writer, view)?;
    writer.into_inner()
}

/// Writes the view to `destination` as UTF-8 CSV with `\n` line endings.
/// I/O failures are folded into a failed `ExportResult`; this never returns an error.
pub fn export_csv(view: &FilteredView<'_>, destination: &Path) -> ExportResult {
    match write_file(view, destination) {
        Ok(()) => {
            info!(
                "exported {} records to {}",
                view.len(),
                destination.display()
            );
            ExportResult::completed(destination)
        }
        Err(e) => {
            warn!("export failed: {e}");
            ExportResult::failed(&e)
        }
    }
}

fn write_file(view: &FilteredView<'_>, destination: &Path) -> Result<()> {
    let io_error = |e: anyhow::Error| DashboardError::ExportIo {
        path: destination.to_path_buf(),
        reason: format!("{e:#}"),
    };
    // The file handle lives in `writer` and is closed when it drops, on every path.
    let mut writer = CSVWriter::create(destination).map_err(io_error)?;
    write_view(&mut writer, view).map_err(io_error)?;
    let file = writer.into_inner().map_err(io_error)?;
    file.sync_all().map_err(|e| io_error(e.into()))?;
    Ok(())
}

/// Exports to a fixed file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFileExporter {
    destination: PathBuf,
}

impl CsvFileExporter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        CsvFileExporter {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

impl Exporter for CsvFileExporter {
    fn export(&self, view: &FilteredView<'_>) -> ExportResult {
        export_csv(view, &self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dataset::Dataset, filter::filter, models::Selector};
    use std::io;
    use tempfile::TempDir;

    /// Accepts `capacity` bytes, then fails every write with `StorageFull`.
    struct ShortWriter {
        written: Vec<u8>,
        capacity: usize,
    }

    impl io::Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.capacity - self.written.len();
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::StorageFull, "sink is full"));
            }
            let n = room.min(buf.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct MockCSVWriter {
        records: Vec<String>,
        flushed: bool,
    }

    impl MockCSVWriter {
        fn new() -> Self {
            Self {
                records: Vec::new(),
                flushed: false,
            }
        }
    }

    impl CSVWrite for MockCSVWriter {
        fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
            let line = serde_json::to_string(record)?;
            self.records.push(line);
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            self.flushed = true;
            Ok(())
        }
    }

    fn dataset() -> Result<Dataset> {
        Dataset::from_reader(
            "test",
            "month,category,amount\nJan,Electronics,100\nFeb,Electronics,150.50\nJan,\"Home, Garden\",50\nMar,\"The \"\"Best\"\" Shop\",7\n"
                .as_bytes(),
        )
    }

    #[test]
    fn test_write_view_writes_header_then_records() -> Result<()> {
        let dataset = dataset()?;
        let view = filter(&dataset, &Selector::from("Electronics"))?;

        let mut mock_writer = MockCSVWriter::new();
        write_view(&mut mock_writer, &view)?;

        assert_eq!(mock_writer.records.len(), 3);
        assert_eq!(mock_writer.records[0], r#"["month","category","amount"]"#);
        assert_eq!(
            mock_writer.records[2],
            r#"{"month":"Feb","category":"Electronics","amount":"150.5"}"#
        );
        assert!(mock_writer.flushed);
        Ok(())
    }

    #[test]
    fn test_render_csv_quotes_special_fields() -> Result<()> {
        let dataset = dataset()?;
        let body = String::from_utf8(render_csv(&FilteredView::full(&dataset))?)?;
        assert_eq!(
            body,
            "month,category,amount\n\
             Jan,Electronics,100\n\
             Feb,Electronics,150.5\n\
             Jan,\"Home, Garden\",50\n\
             Mar,\"The \"\"Best\"\" Shop\",7\n"
        );
        Ok(())
    }

    #[test]
    fn test_render_empty_view_has_header_only() -> Result<()> {
        let dataset = Dataset::new(Vec::new())?;
        let body = render_csv(&FilteredView::full(&dataset))?;
        assert_eq!(body, b"month,category,amount\n");
        Ok(())
    }

    #[test]
    fn test_export_writes_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("sales.csv");
        let dataset = dataset()?;
        let view = filter(&dataset, &Selector::from("Electronics"))?;

        let result = export_csv(&view, &path);

        assert!(result.success);
        assert_eq!(result.message, EXPORT_COMPLETED);
        assert_eq!(result.path.as_deref(), Some(path.as_path()));
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "month,category,amount\nJan,Electronics,100\nFeb,Electronics,150.5\n"
        );
        Ok(())
    }

    #[test]
    fn test_export_twice_is_byte_identical() -> Result<()> {
        let dir = TempDir::new()?;
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        let dataset = Dataset::sample()?;
        let view = filter(&dataset, &Selector::All)?;

        assert!(export_csv(&view, &first).success);
        assert!(export_csv(&view, &second).success);
        assert_eq!(std::fs::read(&first)?, std::fs::read(&second)?);
        Ok(())
    }

    #[test]
    fn test_export_to_unwritable_destination_reports_failure() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("missing").join("sales.csv");
        let dataset = dataset()?;

        let result = export_csv(&FilteredView::full(&dataset), &path);

        assert!(!result.success);
        assert!(result.path.is_none());
        assert!(result.message.contains("sales.csv"));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_file_exporter_uses_its_destination() -> Result<()> {
        let dir = TempDir::new()?;
        let exporter = CsvFileExporter::new(dir.path().join("out.csv"));
        let dataset = dataset()?;

        let result = exporter.export(&FilteredView::full(&dataset));

        assert!(result.success);
        assert!(exporter.destination().exists());
        Ok(())
    }

    #[test]
    fn test_write_view_reports_failure_mid_stream() -> Result<()> {
        let dataset = Dataset::sample()?;
        let view = filter(&dataset, &Selector::All)?;
        let mut writer = CSVWriter::new(ShortWriter {
            written: Vec::new(),
            capacity: 40,
        });

        let res = write_view(&mut writer, &view);

        let err = res.unwrap_err();
        assert!(err.to_string().contains("sink is full"));
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_export_to_full_device_reports_failure() -> Result<()> {
        let dataset = Dataset::sample()?;
        let view = filter(&dataset, &Selector::All)?;

        let result = export_csv(&view, Path::new("/dev/full"));

        assert!(!result.success);
        assert!(result.path.is_none());
        assert!(result.message.contains("/dev/full"));
        Ok(())
    }
}
