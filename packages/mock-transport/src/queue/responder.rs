// packages/mock-transport/src/queue/responder.rs
//! Response producers
//!
//! A producer turns a matched request into the canned response handed back
//! to the client. Producers run outside the transport lock.

use crate::utils::errors::{Result, TransportError};
use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, Request, Response, StatusCode};
use serde::Serialize;
use std::fmt;

/// Produces the response for a matched request
pub trait Respond: Send + Sync {
    fn respond(&self, request: &Request<Bytes>) -> anyhow::Result<Response<Bytes>>;
}

impl<F> Respond for F
where
    F: Fn(&Request<Bytes>) -> anyhow::Result<Response<Bytes>> + Send + Sync,
{
    fn respond(&self, request: &Request<Bytes>) -> anyhow::Result<Response<Bytes>> {
        self(request)
    }
}

/// A fixed response: status, headers and body
#[derive(Clone)]
pub struct CannedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl CannedResponse {
    /// Empty-bodied response with the given status
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Response with a raw body
    pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status).with_body(body)
    }

    /// JSON response; the value is serialized now so a bad value fails at setup
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value).map_err(|e| {
            TransportError::MalformedProducerConfiguration(format!(
                "JSON serialization error: {}",
                e
            ))
        })?;

        Ok(Self::new(status)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(body))
    }

    /// Add a header; repeated names keep every value
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replace the body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Get status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Build a fresh `Response` from the template
    pub fn to_response(&self) -> Response<Bytes> {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

impl Respond for CannedResponse {
    fn respond(&self, _request: &Request<Bytes>) -> anyhow::Result<Response<Bytes>> {
        Ok(self.to_response())
    }
}

impl fmt::Debug for CannedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CannedResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}
