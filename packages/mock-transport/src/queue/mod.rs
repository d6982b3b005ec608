// packages/mock-transport/src/queue/mod.rs
//! Response queues
//!
//! - **Response Queue**: immutable builder value (criteria + responses)
//! - **Active Queue**: the registered form, owning the response FIFO
//! - **Responder**: producers that build the canned response
//!
//! # Lifecycle
//!
//! ```text
//! ResponseQueue::new().get("/a").then_respond(..)   (setup, value semantics)
//!            │
//!            ▼ register_origin
//!      ActiveQueue { id, criteria, fifo }           (serving, FIFO pops only)
//! ```

pub mod active_queue;
pub mod responder;
pub mod response_queue;

pub use active_queue::{ActiveQueue, QueueId};
pub use responder::{CannedResponse, Respond};
pub use response_queue::{Responder, ResponseQueue};
