//! Batch report output in JSON or JSONL.
//!
//! JSON writes the whole [`BatchResult`] as one document; JSONL writes one
//! [`FileRecord`] per line so reports can be streamed into other tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::{BatchResult, FileRecord};

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Single JSON document with totals and the outcome map
    Json,
    /// One JSON object per file (newline-delimited JSON)
    JsonLines,
}

impl ReportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }

    /// Pick a format from a report path's extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
            .unwrap_or(Self::Json)
    }
}

/// Serializes batch results to a writer.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W, format: ReportFormat) -> Self {
        Self { writer, format }
    }

    /// Write a batch result in the configured format.
    pub fn write_result(&mut self, result: &BatchResult) -> Result<()> {
        match self.format {
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, result)?;
                writeln!(self.writer)?;
            }
            ReportFormat::JsonLines => {
                for record in result.records() {
                    self.write_record(&record)?;
                }
            }
        }
        Ok(())
    }

    /// Write a single record as one line.
    pub fn write_record(&mut self, record: &FileRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Write a report file, picking the format from its extension.
pub fn write_report(path: &Path, result: &BatchResult) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = ReportWriter::new(BufWriter::new(file), ReportFormat::from_path(path));
    writer.write_result(result)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LumaBatchError;
    use crate::types::FileOutcome;
    use std::io;
    use std::path::PathBuf;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample_result() -> BatchResult {
        let mut result = BatchResult::new(2);
        result.record(
            "a.png".into(),
            FileOutcome::Succeeded {
                output: PathBuf::from("out/a.png"),
            },
        );
        result.record(
            "b.jpg".into(),
            FileOutcome::Failed {
                stage: "load".into(),
                message: "truncated".into(),
            },
        );
        result
    }

    #[test]
    fn test_write_json_document() {
        let mut writer = ReportWriter::new(Vec::new(), ReportFormat::Json);
        writer.write_result(&sample_result()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let parsed: BatchResult = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.completed, 2);
        assert_eq!(parsed.failed(), 1);
    }

    #[test]
    fn test_write_jsonl_rows() {
        let mut writer = ReportWriter::new(Vec::new(), ReportFormat::JsonLines);
        writer.write_result(&sample_result()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"file_name\":\"a.png\""));
        assert!(lines[1].contains("\"status\":\"failed\""));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ReportFormat::parse("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("JSONL"), Some(ReportFormat::JsonLines));
        assert_eq!(ReportFormat::parse("invalid"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ReportFormat::from_path(Path::new("report.jsonl")),
            ReportFormat::JsonLines
        );
        assert_eq!(
            ReportFormat::from_path(Path::new("report.json")),
            ReportFormat::Json
        );
        assert_eq!(ReportFormat::from_path(Path::new("report")), ReportFormat::Json);
    }

    #[test]
    fn test_write_report_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.jsonl");
        write_report(&path, &sample_result()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_write_report_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let err = write_report(&path, &sample_result()).unwrap_err();
        assert!(matches!(err, LumaBatchError::Io(_)));
    }

    #[test]
    fn test_writer_failure_is_reported() {
        let mut json = ReportWriter::new(BrokenPipe, ReportFormat::Json);
        let err = json.write_result(&sample_result()).unwrap_err();
        assert!(matches!(err, LumaBatchError::Json(_)));

        let mut lines = ReportWriter::new(BrokenPipe, ReportFormat::JsonLines);
        assert!(lines.write_result(&sample_result()).is_err());
    }
}
