// packages/mock-transport/src/recording/mod.rs
//! Request history
//!
//! - **Audit Log**: append-only record of every intercepted request
//! - **Exporter**: text, JSON and JUnit renderings of the log
//!
//! # Record format
//!
//! ```text
//! 1: GET http://example.com/1/sample
//! 2: GET http://example.com/1/sample (not matched)
//! ```

pub mod audit_log;
pub mod exporter;

// Re-export commonly used types
pub use audit_log::{AuditLog, AuditRecord, AuditStats, RecordedRequest};
pub use exporter::{ExportFormat, Exporter};
