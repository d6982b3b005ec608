// packages/mock-transport/src/recording/exporter.rs
//! Export audit records
//!
//! Supports:
//! - Text (the audit log trace)
//! - JSON (for tooling)
//! - JUnit XML (unmatched requests reported as CI failures)

use crate::recording::audit_log::AuditRecord;
use crate::utils::errors::{Result, TransportError};
use serde::Serialize;
use tracing::debug;

/// Export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `n: METHOD url` lines
    Text,
    Json,
    JUnit,
}

/// Exporter for audit records
pub struct Exporter {
    format: ExportFormat,
}

impl Exporter {
    /// Create a new exporter
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    /// Render `records` in the configured format
    pub fn export(&self, records: &[AuditRecord]) -> Result<String> {
        debug!("Exporting {} audit records to {:?} format", records.len(), self.format);

        match self.format {
            ExportFormat::Text => Ok(self.export_text(records)),
            ExportFormat::Json => self.export_json(records),
            ExportFormat::JUnit => Ok(self.export_junit(records)),
        }
    }

    /// Export to the audit log trace, one line per record
    fn export_text(&self, records: &[AuditRecord]) -> String {
        records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Export to JSON format
    fn export_json(&self, records: &[AuditRecord]) -> Result<String> {
        let entries: Vec<_> = records.iter().map(JsonRecord::from).collect();

        serde_json::to_string_pretty(&entries).map_err(|e| {
            TransportError::ExportFailed(format!("JSON serialization error: {}", e))
        })
    }

    /// Export to JUnit XML format (for CI integration)
    fn export_junit(&self, records: &[AuditRecord]) -> String {
        let failures = records.iter().filter(|r| !r.matched).count();

        let cases = records
            .iter()
            .map(|r| {
                let name = xml_escape(&format!("{} {}", r.method(), r.url()));
                if r.matched {
                    format!(r#"  <testcase name="{}" classname="mock_transport"/>"#, name)
                } else {
                    format!(
                        r#"  <testcase name="{}" classname="mock_transport">
    <failure message="mock is not registered">request {} was not matched by any queue</failure>
  </testcase>"#,
                        name, r.sequence
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="Sentra Lab Mock Transport" tests="{}" failures="{}" time="0">
{}
</testsuite>"#,
            records.len(),
            failures,
            cases
        )
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    sequence: u64,
    method: &'a str,
    url: &'a str,
    matched: bool,
    served_by: Option<String>,
    recorded_at: String,
    body_len: usize,
}

impl<'a> From<&'a AuditRecord> for JsonRecord<'a> {
    fn from(record: &'a AuditRecord) -> Self {
        Self {
            sequence: record.sequence,
            method: record.request.method.as_str(),
            url: &record.request.url,
            matched: record.matched,
            served_by: record.served_by.map(|id| id.to_string()),
            recorded_at: record.recorded_at.to_rfc3339(),
            body_len: record.request.body.len(),
        }
    }
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
