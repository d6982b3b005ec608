// packages/mock-transport/src/queue/response_queue.rs
//! Response queue builder
//!
//! A [`ResponseQueue`] describes one logical request pattern: the criteria a
//! request must satisfy and the ordered responses it receives on successive
//! matching calls. Builder methods consume `self` and hand back the updated
//! value, so a partially built queue is never shared. The queue only
//! becomes mutable once registered on a transport.

use crate::matching::{matches_all, Match, MatchCriterion};
use crate::queue::responder::{CannedResponse, Respond};
use crate::utils::errors::Result;
use bytes::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a response producer
pub type Responder = Arc<dyn Respond>;

/// Match criteria plus an ordered list of responses
#[derive(Clone, Default)]
pub struct ResponseQueue {
    criteria: Vec<MatchCriterion>,
    responders: Vec<Responder>,
}

impl ResponseQueue {
    /// Queue with no criteria (matches every request at its origin) and no responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a criterion
    pub fn matching(mut self, criterion: MatchCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn with_method(self, method: Method) -> Self {
        self.matching(MatchCriterion::Method(method))
    }

    pub fn with_path(self, path: impl Into<String>) -> Self {
        self.matching(MatchCriterion::Path(path.into()))
    }

    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.matching(MatchCriterion::Header {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn with_query(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.matching(MatchCriterion::Query {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn with_body(self, body: impl Into<Bytes>) -> Self {
        self.matching(MatchCriterion::Body(body.into()))
    }

    /// Gate the queue on a caller-supplied [`Match`] implementation
    pub fn with_custom_predicate<M: Match + 'static>(self, predicate: M) -> Self {
        self.matching(MatchCriterion::Custom(Arc::new(predicate)))
    }

    /// Closure form of [`with_custom_predicate`](Self::with_custom_predicate)
    pub fn with_predicate_fn<F>(self, predicate: F) -> Self
    where
        F: Fn(&Request<Bytes>) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.with_custom_predicate(predicate)
    }

    pub fn get(self, path: impl Into<String>) -> Self {
        self.with_method(Method::GET).with_path(path)
    }

    pub fn post(self, path: impl Into<String>) -> Self {
        self.with_method(Method::POST).with_path(path)
    }

    pub fn put(self, path: impl Into<String>) -> Self {
        self.with_method(Method::PUT).with_path(path)
    }

    pub fn delete(self, path: impl Into<String>) -> Self {
        self.with_method(Method::DELETE).with_path(path)
    }

    /// Append a response with a raw body
    pub fn then_respond(self, status: StatusCode, body: impl Into<Bytes>) -> Self {
        self.then_respond_with(CannedResponse::text(status, body))
    }

    /// Append a JSON response
    ///
    /// The value is encoded immediately; an unserializable value fails here
    /// with `MalformedProducerConfiguration` instead of at request time.
    pub fn then_respond_json<T: Serialize + ?Sized>(self, status: StatusCode, value: &T) -> Result<Self> {
        Ok(self.then_respond_with(CannedResponse::json(status, value)?))
    }

    /// Append an arbitrary producer
    pub fn then_respond_with<R: Respond + 'static>(mut self, responder: R) -> Self {
        self.responders.push(Arc::new(responder));
        self
    }

    /// Closure form of [`then_respond_with`](Self::then_respond_with)
    pub fn then_respond_fn<F>(self, producer: F) -> Self
    where
        F: Fn(&Request<Bytes>) -> anyhow::Result<Response<Bytes>> + Send + Sync + 'static,
    {
        self.then_respond_with(producer)
    }

    pub fn criteria(&self) -> &[MatchCriterion] {
        &self.criteria
    }

    /// Number of queued responses
    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }

    /// Composite match of all criteria
    pub fn matches(&self, request: &Request<Bytes>) -> anyhow::Result<bool> {
        matches_all(&self.criteria, request)
    }

    pub(crate) fn into_parts(self) -> (Vec<MatchCriterion>, Vec<Responder>) {
        (self.criteria, self.responders)
    }
}

impl fmt::Debug for ResponseQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseQueue")
            .field("criteria", &self.criteria)
            .field("responses", &self.responders.len())
            .finish()
    }
}
