// packages/mock-transport/src/queue/active_queue.rs
//! Registered response queue
//!
//! Criteria are frozen at registration; the response FIFO is the only state
//! that changes while serving.

use crate::matching::{matches_all, MatchCriterion};
use crate::queue::response_queue::{Responder, ResponseQueue};
use bytes::Bytes;
use hyper::Request;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use ulid::Ulid;

/// Identity of a registered queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueId(Ulid);

impl QueueId {
    fn new() -> Self {
        Self(Ulid::new())
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q_{}", self.0)
    }
}

/// A queue bound to an origin
pub struct ActiveQueue {
    id: QueueId,
    criteria: Arc<[MatchCriterion]>,
    fifo: VecDeque<Responder>,
}

impl ActiveQueue {
    pub fn new(queue: ResponseQueue) -> Self {
        let (criteria, responders) = queue.into_parts();
        Self {
            id: QueueId::new(),
            criteria: criteria.into(),
            fifo: responders.into(),
        }
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn criteria(&self) -> &[MatchCriterion] {
        &self.criteria
    }

    /// Append a producer at the tail
    pub fn enqueue(&mut self, responder: Responder) {
        self.fifo.push_back(responder);
    }

    /// Remove the head producer; `None` when exhausted
    pub fn dequeue_head(&mut self) -> Option<Responder> {
        self.fifo.pop_front()
    }

    /// An exhausted queue is never selected
    pub fn is_exhausted(&self) -> bool {
        self.fifo.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    /// Composite match of the frozen criteria
    pub fn matches(&self, request: &Request<Bytes>) -> anyhow::Result<bool> {
        matches_all(&self.criteria, request)
    }
}

impl From<ResponseQueue> for ActiveQueue {
    fn from(queue: ResponseQueue) -> Self {
        Self::new(queue)
    }
}

impl fmt::Debug for ActiveQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveQueue")
            .field("id", &self.id)
            .field("criteria", &self.criteria)
            .field("remaining", &self.fifo.len())
            .finish()
    }
}
