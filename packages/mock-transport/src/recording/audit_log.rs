// packages/mock-transport/src/recording/audit_log.rs
//! Append-only audit log of intercepted requests
//!
//! One record per intercept call, in lock-acquisition order. Records are
//! never removed individually; [`AuditLog::reset`] clears the log between
//! phases of a test.

use crate::interception::registry::{request_url, TransportRegistry};
use crate::queue::QueueId;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use hyper::{HeaderMap, Method, Request};
use std::fmt;

/// Snapshot of an intercepted request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Capture method, URL and headers; the body only when `capture_body` is set
    pub fn capture(request: &Request<Bytes>, capture_body: bool) -> Self {
        Self {
            method: request.method().clone(),
            url: request_url(request),
            headers: request.headers().clone(),
            body: if capture_body {
                request.body().clone()
            } else {
                Bytes::new()
            },
        }
    }

    /// Rebuild a request carrying the recorded data
    pub fn to_request(&self) -> Request<Bytes> {
        let mut request = Request::new(self.body.clone());
        *request.method_mut() = self.method.clone();
        *request.headers_mut() = self.headers.clone();
        if let Ok(uri) = self.url.parse() {
            *request.uri_mut() = uri;
        }
        request
    }
}

/// One intercepted request and its outcome
#[derive(Debug, Clone)]
pub struct AuditRecord {
    /// 1-based arrival position
    pub sequence: u64,
    pub request: RecordedRequest,
    pub matched: bool,
    /// Queue that served the request
    pub served_by: Option<QueueId>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn method(&self) -> &Method {
        &self.request.method
    }

    pub fn url(&self) -> &str {
        &self.request.url
    }
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.sequence, self.request.method, self.request.url)?;
        if !self.matched {
            write!(f, " (not matched)")?;
        }
        Ok(())
    }
}

/// Audit log statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
}

impl AuditStats {
    /// Percentage of intercepted requests that matched
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.matched as f64 / self.total as f64) * 100.0
        }
    }
}

#[derive(Debug, Default)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
    next_sequence: u64,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its sequence number
    pub fn append(&mut self, request: RecordedRequest, matched: bool, served_by: Option<QueueId>) -> u64 {
        self.next_sequence += 1;
        let sequence = self.next_sequence;

        self.records.push(AuditRecord {
            sequence,
            request,
            matched,
            served_by,
            recorded_at: Utc::now(),
        });

        sequence
    }

    pub fn all(&self) -> &[AuditRecord] {
        &self.records
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &AuditRecord> {
        self.records.iter().filter(|r| !r.matched)
    }

    pub fn has_unmatched(&self) -> bool {
        self.unmatched().next().is_some()
    }

    /// Every queue exhausted and no stray request recorded
    pub fn is_drained(&self, registry: &TransportRegistry) -> bool {
        registry.is_exhausted() && !self.has_unmatched()
    }

    /// Drop all records; numbering restarts at 1
    pub fn reset(&mut self) {
        self.records.clear();
        self.next_sequence = 0;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> AuditStats {
        let unmatched = self.unmatched().count();
        AuditStats {
            total: self.records.len(),
            matched: self.records.len() - unmatched,
            unmatched,
        }
    }

    /// `"<n>: <METHOD> <url>[ (not matched)]"`, one line per record
    pub fn render(&self) -> String {
        self.records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
