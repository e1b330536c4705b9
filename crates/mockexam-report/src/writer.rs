//! Results display that saves each report to disk.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use mockexam_core::report::SessionReport;
use mockexam_core::traits::ResultsDisplay;

use crate::html::write_html_report;

/// Output formats for saved reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Html,
}

/// Writes every shown report into `output_dir`, one file per format.
pub struct ReportWriter {
    output_dir: PathBuf,
    formats: Vec<ReportFormat>,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, formats: Vec<ReportFormat>) -> Self {
        Self {
            output_dir: output_dir.into(),
            formats,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the report synchronously, returning the paths written.
    pub fn write(&self, report: &SessionReport) -> Result<Vec<PathBuf>> {
        let stem = report.file_stem();
        let mut written = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            let path = match format {
                ReportFormat::Json => {
                    let path = self.output_dir.join(format!("{stem}.json"));
                    report.save_json(&path)?;
                    path
                }
                ReportFormat::Html => {
                    let path = self.output_dir.join(format!("{stem}.html"));
                    write_html_report(report, &path)?;
                    path
                }
            };
            tracing::info!("report written to {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

#[async_trait]
impl ResultsDisplay for ReportWriter {
    async fn show(&self, report: &SessionReport) -> Result<()> {
        self.write(report).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[tokio::test]
    async fn writes_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(
            dir.path().join("reports"),
            vec![ReportFormat::Json, ReportFormat::Html],
        );
        let report = sample_report();
        writer.show(&report).await.unwrap();

        let stem = report.file_stem();
        assert!(stem.starts_with("chemistry-20231114-221320-"));
        let json = dir.path().join("reports").join(format!("{stem}.json"));
        let html = dir.path().join("reports").join(format!("{stem}.html"));
        assert!(json.exists());
        assert!(html.exists());
        assert_eq!(SessionReport::load_json(&json).unwrap().id, report.id);
    }

    #[test]
    fn reports_from_the_same_second_get_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), vec![ReportFormat::Json]);
        let first = sample_report();
        let second = sample_report();
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(first.source.subject, second.source.subject);

        let a = writer.write(&first).unwrap();
        let b = writer.write(&second).unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
        assert_eq!(SessionReport::load_json(&a[0]).unwrap().id, first.id);
        assert_eq!(SessionReport::load_json(&b[0]).unwrap().id, second.id);
    }

    #[test]
    fn no_formats_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path(), vec![]);
        assert!(writer.write(&sample_report()).unwrap().is_empty());
    }
}
