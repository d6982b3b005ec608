// packages/mock-transport/src/matching/matchers.rs
//! Request match criteria
//!
//! Every criterion is a pure predicate over a buffered request. Bodies are
//! owned `Bytes` borrowed immutably, so evaluating a criterion never drains
//! the body seen by later criteria or by the response producer.

use bytes::Bytes;
use hyper::{Method, Request};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Caller-supplied request predicate
///
/// Implemented for any `Fn(&Request<Bytes>) -> anyhow::Result<bool>`, so a
/// closure is usually enough. Returning `Err` aborts the lookup and surfaces
/// as [`TransportError::MatcherFailed`](crate::TransportError::MatcherFailed).
pub trait Match: Send + Sync {
    fn matches(&self, request: &Request<Bytes>) -> anyhow::Result<bool>;
}

impl<F> Match for F
where
    F: Fn(&Request<Bytes>) -> anyhow::Result<bool> + Send + Sync,
{
    fn matches(&self, request: &Request<Bytes>) -> anyhow::Result<bool> {
        self(request)
    }
}

/// One matching criterion of a response queue
#[derive(Clone)]
pub enum MatchCriterion {
    /// Request method equals
    Method(Method),

    /// Request path equals, compared literally
    Path(String),

    /// First value of a query parameter equals (absent reads as "")
    Query { name: String, value: String },

    /// First value of a header equals (absent reads as "")
    Header { name: String, value: String },

    /// Whole request body equals
    Body(Bytes),

    /// Arbitrary predicate
    Custom(Arc<dyn Match>),
}

impl MatchCriterion {
    /// Evaluate the criterion against a request
    pub fn matches(&self, request: &Request<Bytes>) -> anyhow::Result<bool> {
        let matched = match self {
            Self::Method(method) => request.method() == method,
            Self::Path(path) => request.uri().path() == path,
            Self::Query { name, value } => {
                query_value(request, name).as_deref().unwrap_or("") == value
            }
            Self::Header { name, value } => {
                let actual = request
                    .headers()
                    .get(name.as_str())
                    .map(|v| v.as_bytes())
                    .unwrap_or_default();
                actual == value.as_bytes()
            }
            Self::Body(body) => request.body() == body,
            Self::Custom(predicate) => predicate.matches(request)?,
        };

        Ok(matched)
    }
}

impl fmt::Debug for MatchCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(method) => write!(f, "method == {}", method),
            Self::Path(path) => write!(f, "path == {:?}", path),
            Self::Query { name, value } => write!(f, "query[{}] == {:?}", name, value),
            Self::Header { name, value } => write!(f, "header[{}] == {:?}", name, value),
            Self::Body(body) => write!(f, "body == {:?}", String::from_utf8_lossy(body)),
            Self::Custom(_) => write!(f, "custom predicate"),
        }
    }
}

/// Logical AND of `criteria`; an empty slice matches everything
pub fn matches_all(criteria: &[MatchCriterion], request: &Request<Bytes>) -> anyhow::Result<bool> {
    for criterion in criteria {
        if !criterion.matches(request)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// First decoded value of the query parameter `name`
fn query_value<B>(request: &Request<B>, name: &str) -> Option<String> {
    let query = request.uri().query()?;

    match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
        Ok(pairs) => pairs.into_iter().find(|(k, _)| k == name).map(|(_, v)| v),
        Err(e) => {
            debug!("Ignoring malformed query string {:?}: {}", query, e);
            None
        }
    }
}
