// packages/mock-transport/src/lib.rs
//! Sentra Lab Mock Transport
//!
//! A programmable HTTP transport double for tests. Instead of touching the
//! network, the transport answers each request from pre-registered response
//! queues and records every request it saw for later assertions.
//!
//! # Architecture
//!
//! - **matching**: request criteria (method, path, query, header, body, custom)
//! - **queue**: response queues and their producers
//! - **interception**: origin registry and the interception engine
//! - **recording**: audit log and exporters
//! - **observability**: tracing setup for tests
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use hyper::{Request, StatusCode};
//! use sentra_lab_mock_transport::{MockTransport, ResponseQueue, RoundTrip};
//!
//! let transport = MockTransport::new(
//!     "http://example.com",
//!     vec![ResponseQueue::new()
//!         .get("/items")
//!         .then_respond(StatusCode::OK, r#"{"count":1}"#)
//!         .then_respond(StatusCode::TOO_MANY_REQUESTS, "")],
//! );
//!
//! let request = || Request::get("http://example.com/items").body(Bytes::new()).unwrap();
//! assert_eq!(transport.round_trip(request()).unwrap().status(), StatusCode::OK);
//! assert_eq!(transport.round_trip(request()).unwrap().status(), StatusCode::TOO_MANY_REQUESTS);
//! assert!(transport.completed());
//! ```

pub mod interception;
pub mod matching;
pub mod observability;
pub mod queue;
pub mod recording;
pub mod utils;

// Re-export commonly used types
pub use interception::{MockTransport, RoundTrip, TransportRegistry};
pub use matching::{Match, MatchCriterion};
pub use queue::{ActiveQueue, CannedResponse, QueueId, Respond, ResponseQueue};
pub use recording::{AuditRecord, AuditStats, ExportFormat, RecordedRequest};
pub use utils::config::{TransportConfig, UnregisteredOriginPolicy};
pub use utils::errors::{Result, TransportError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
