// packages/mock-transport/src/interception/transport.rs
//! Mock HTTP transport
//!
//! Serves requests from registered response queues instead of the network.
//! Selecting a queue, popping its head producer and appending the audit
//! record happen under one lock; the producer runs after the lock is
//! released.

use crate::interception::registry::TransportRegistry;
use crate::interception::round_trip::RoundTrip;
use crate::queue::{Responder, ResponseQueue};
use crate::recording::{AuditLog, AuditRecord, AuditStats, ExportFormat, Exporter, RecordedRequest};
use crate::utils::config::{TransportConfig, UnregisteredOriginPolicy};
use crate::utils::errors::{Result, TransportError};
use bytes::Bytes;
use futures::future::BoxFuture;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::{Request, Response};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;
use tracing::{debug, error, warn};

/// Mutable state guarded by the transport lock
#[derive(Debug, Default)]
struct TransportState {
    registry: TransportRegistry,
    audit: AuditLog,
}

/// Programmable HTTP transport double
///
/// Clones share the same queues and audit log, so one handle can be given
/// to the client under test while the test keeps another for assertions.
#[derive(Clone)]
pub struct MockTransport {
    config: Arc<TransportConfig>,
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    /// Transport serving `queues` for `origin`
    pub fn new<I>(origin: &str, queues: I) -> Self
    where
        I: IntoIterator<Item = ResponseQueue>,
    {
        let transport = Self::default();
        transport.register_origin(origin, queues);
        transport
    }

    /// Transport with no origins
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(TransportState::default())),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Bind `queues` to `origin`, replacing any previous list
    pub fn register_origin<I>(&self, origin: &str, queues: I)
    where
        I: IntoIterator<Item = ResponseQueue>,
    {
        self.state.lock().registry.register_origin(origin, queues);
    }

    /// Serve a request from the first eligible queue
    pub fn intercept(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        if self.config.log_requests {
            self.log_request(&request);
        }

        let responder = self.dequeue(&request)?;

        let response = responder.respond(&request).map_err(|e| {
            error!("Producer failed for {} {}: {:#}", request.method(), request.uri(), e);
            TransportError::ProducerFailed(e)
        })?;

        debug!("Response: {}", response.status());
        Ok(response)
    }

    /// Critical section: lookup, pop and audit under one lock
    fn dequeue(&self, request: &Request<Bytes>) -> Result<Responder> {
        let mut state = self.state.lock();
        let TransportState { registry, audit } = &mut *state;
        let snapshot = || RecordedRequest::capture(request, self.config.capture_request_bodies);

        match registry.lookup(request) {
            Ok(Some(queue)) => {
                let queue_id = queue.id();
                // lookup never returns an exhausted queue
                let Some(responder) = queue.dequeue_head() else {
                    audit.append(snapshot(), false, None);
                    return Err(TransportError::MockNotRegistered);
                };

                let sequence = audit.append(snapshot(), true, Some(queue_id));
                debug!(
                    "{}: {} {} served by {} ({} left)",
                    sequence,
                    request.method(),
                    request.uri(),
                    queue_id,
                    queue.len()
                );
                metrics::counter!("mock_transport_intercepts_total", "outcome" => "matched").increment(1);
                Ok(responder)
            }
            Ok(None) => {
                let sequence = audit.append(snapshot(), false, None);
                warn!("{}: no mock matched {} {}", sequence, request.method(), request.uri());
                metrics::counter!("mock_transport_intercepts_total", "outcome" => "unmatched").increment(1);
                Err(TransportError::MockNotRegistered)
            }
            Err(err @ (TransportError::OriginNotRegistered { .. } | TransportError::MissingOrigin { .. })) => {
                warn!("Rejected {} {}: {}", request.method(), request.uri(), err);
                if self.config.unregistered_origin == UnregisteredOriginPolicy::RecordUnmatched {
                    audit.append(snapshot(), false, None);
                }
                metrics::counter!("mock_transport_intercepts_total", "outcome" => "unregistered_origin").increment(1);
                Err(err)
            }
            Err(err) => {
                let sequence = audit.append(snapshot(), false, None);
                error!("{}: lookup failed for {} {}: {}", sequence, request.method(), request.uri(), err);
                metrics::counter!("mock_transport_intercepts_total", "outcome" => "error").increment(1);
                Err(err)
            }
        }
    }

    /// All queues drained and no unmatched request recorded
    pub fn completed(&self) -> bool {
        let state = self.state.lock();
        state.audit.is_drained(&state.registry)
    }

    /// Requests that matched no queue, in arrival order
    pub fn unmatched_requests(&self) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .audit
            .unmatched()
            .map(|r| r.request.clone())
            .collect()
    }

    /// One line per intercepted request: `"<n>: <METHOD> <url>[ (not matched)]"`
    pub fn audit_log_string(&self) -> String {
        self.state.lock().audit.render()
    }

    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.state.lock().audit.all().to_vec()
    }

    /// Clear the audit log between phases of a test
    pub fn reset_audit_log(&self) {
        self.state.lock().audit.reset();
    }

    /// Responses left across every origin
    pub fn remaining(&self) -> usize {
        self.state.lock().registry.remaining()
    }

    pub fn stats(&self) -> AuditStats {
        self.state.lock().audit.stats()
    }

    pub fn export(&self, format: ExportFormat) -> Result<String> {
        let records = self.audit_records();
        Exporter::new(format).export(&records)
    }

    /// Pending queues followed by the audit trail, for assertion messages
    pub fn summary(&self) -> String {
        let state = self.state.lock();
        format!(
            "pending queues:\n{}requests:\n{}",
            state.registry.summary(),
            state.audit.render()
        )
    }

    fn log_request(&self, request: &Request<Bytes>) {
        debug!("Request: {} {}", request.method(), request.uri());
        for (name, value) in request.headers() {
            if let Ok(val_str) = value.to_str() {
                debug!("  {}: {}", name, val_str);
            }
        }

        let body = request.body();
        if !body.is_empty() {
            let preview = &body[..body.len().min(self.config.max_log_body_size)];
            debug!("  body ({} bytes): {}", body.len(), String::from_utf8_lossy(preview));
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::with_config(TransportConfig::default())
    }
}

impl RoundTrip for MockTransport {
    fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.intercept(request)
    }
}

impl<B> Service<Request<B>> for MockTransport
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = Response<Full<Bytes>>;
    type Error = TransportError;
    type Future = BoxFuture<'static, Result<Self::Response>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let transport = self.clone();

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| {
                    let err: Box<dyn std::error::Error + Send + Sync> = e.into();
                    TransportError::BodyRead(err.to_string())
                })?
                .to_bytes();

            let response = transport.intercept(Request::from_parts(parts, body))?;
            Ok(response.map(Full::new))
        })
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockTransport")
            .field("config", &self.config)
            .field("registry", &state.registry)
            .field("audit_records", &state.audit.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::{Method, StatusCode};

    fn get(uri: &str) -> Request<Bytes> {
        Request::builder().method(Method::GET).uri(uri).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_successive_responses() {
        let transport = MockTransport::new(
            "http://example.com",
            vec![ResponseQueue::new()
                .then_respond(StatusCode::OK, r#"{"count":1}"#)
                .then_respond(StatusCode::OK, r#"{"count":2}"#)],
        );

        let first = transport.intercept(get("http://example.com/")).unwrap();
        let second = transport.intercept(get("http://example.com/")).unwrap();
        let third = transport.intercept(get("http://example.com/"));

        assert_eq!(first.body().as_ref(), br#"{"count":1}"#);
        assert_eq!(second.body().as_ref(), br#"{"count":2}"#);
        assert!(matches!(third, Err(TransportError::MockNotRegistered)));
        assert_eq!(transport.stats(), AuditStats { total: 3, matched: 2, unmatched: 1 });
    }

    #[test]
    fn test_unregistered_origin_is_not_audited_by_default() {
        let transport = MockTransport::new("http://example.com", Vec::new());

        let result = transport.intercept(get("http://other.com/"));
        assert!(matches!(result, Err(TransportError::OriginNotRegistered { .. })));
        assert!(transport.audit_records().is_empty());
        assert!(transport.completed());
    }

    #[test]
    fn test_origin_without_queues_is_a_setup_error() {
        let transport = MockTransport::new("http://h", Vec::new());

        let result = transport.intercept(get("http://h/a"));
        assert!(matches!(
            result,
            Err(TransportError::OriginNotRegistered { ref origin }) if origin == "http://h"
        ));
        assert!(transport.audit_records().is_empty());
    }

    #[test]
    fn test_unregistered_origin_recorded_when_configured() {
        let transport = MockTransport::with_config(TransportConfig {
            unregistered_origin: UnregisteredOriginPolicy::RecordUnmatched,
            ..TransportConfig::default()
        });

        let result = transport.intercept(get("http://other.com/x"));
        assert!(matches!(result, Err(TransportError::OriginNotRegistered { .. })));
        assert_eq!(transport.audit_log_string(), "1: GET http://other.com/x (not matched)");
        assert!(!transport.completed());
    }

    #[test]
    fn test_producer_failure_consumes_entry() {
        let transport = MockTransport::new(
            "http://example.com",
            vec![ResponseQueue::new()
                .then_respond_fn(|_| Err(anyhow::anyhow!("connection reset by peer")))],
        );

        let result = transport.intercept(get("http://example.com/"));
        assert!(matches!(result, Err(TransportError::ProducerFailed(_))));
        assert_eq!(transport.remaining(), 0);
        assert_eq!(transport.audit_log_string(), "1: GET http://example.com/");
    }

    #[test]
    fn test_matcher_failure_is_audited() {
        let transport = MockTransport::new(
            "http://example.com",
            vec![ResponseQueue::new()
                .with_predicate_fn(|_| Err(anyhow::anyhow!("unreadable")))
                .then_respond(StatusCode::OK, "")],
        );

        let result = transport.intercept(get("http://example.com/"));
        assert!(matches!(result, Err(TransportError::MatcherFailed(_))));
        assert_eq!(transport.remaining(), 1);
        assert_eq!(transport.unmatched_requests().len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let transport = MockTransport::new(
            "http://example.com",
            vec![ResponseQueue::new().then_respond(StatusCode::NO_CONTENT, "")],
        );
        let client_side = transport.clone();

        client_side.round_trip(get("http://example.com/")).unwrap();
        assert!(transport.completed());
        assert_eq!(transport.audit_records().len(), 1);
    }

    #[test]
    fn test_summary_lists_pending_queues() {
        let transport = MockTransport::new(
            "http://example.com",
            vec![ResponseQueue::new().get("/pending").then_respond(StatusCode::OK, "")],
        );
        let _ = transport.intercept(get("http://example.com/other"));

        let summary = transport.summary();
        assert!(summary.contains("http://example.com"));
        assert!(summary.contains("remaining=1"));
        assert!(summary.contains("1: GET http://example.com/other (not matched)"));
    }
}
