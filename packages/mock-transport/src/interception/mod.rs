// packages/mock-transport/src/interception/mod.rs
//! Request interception layer
//!
//! - **Transport**: the concurrency-safe interception engine
//! - **Registry**: origin to response-queue mapping
//! - **Round Trip**: the synchronous transport contract clients consume
//!
//! # Architecture
//!
//! ```text
//! Client under test
//!     │
//!     └─ Request → MockTransport ─┬─ lock ─ Registry.lookup(origin, criteria)
//!                                 │           └─ ActiveQueue.dequeue_head()
//!                                 │         AuditLog.append()
//!                                 └─ unlock ─ producer(request) → Response
//! ```

pub mod registry;
pub mod round_trip;
pub mod transport;

// Re-export commonly used types
pub use registry::{origin_of, request_url, TransportRegistry};
pub use round_trip::RoundTrip;
pub use transport::MockTransport;
