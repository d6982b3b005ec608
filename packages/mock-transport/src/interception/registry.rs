// packages/mock-transport/src/interception/registry.rs
//! Origin registry
//!
//! Groups registered queues by origin (`scheme://host[:port]`) and picks the
//! queue that serves a request.

use crate::queue::{ActiveQueue, ResponseQueue};
use crate::utils::errors::{Result, TransportError};
use bytes::Bytes;
use hyper::header::HOST;
use hyper::Request;
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::{debug, info};

/// Origin → queues, in registration order
#[derive(Debug, Default)]
pub struct TransportRegistry {
    origins: HashMap<String, Vec<ActiveQueue>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `queues` to `origin`, replacing any previous list
    pub fn register_origin<I>(&mut self, origin: &str, queues: I)
    where
        I: IntoIterator<Item = ResponseQueue>,
    {
        let origin = normalize_origin(origin);
        let queues: Vec<ActiveQueue> = queues.into_iter().map(ActiveQueue::new).collect();

        info!(
            "Registering {} queue(s) with {} response(s) for {}",
            queues.len(),
            queues.iter().map(ActiveQueue::len).sum::<usize>(),
            origin
        );

        if self.origins.insert(origin.clone(), queues).is_some() {
            debug!("Replaced previous queues for {}", origin);
        }
    }

    /// Remove an origin and its queues
    pub fn remove_origin(&mut self, origin: &str) -> Result<()> {
        let origin = normalize_origin(origin);

        if self.origins.remove(&origin).is_some() {
            info!("Removed queues for {}", origin);
            Ok(())
        } else {
            Err(TransportError::OriginNotRegistered { origin })
        }
    }

    /// Find the queue that serves `request`
    ///
    /// Queues of the request's origin are scanned in registration order;
    /// exhausted queues are skipped so a later queue with the same criteria
    /// can still serve. An origin bound to an empty list counts as not
    /// registered. `Ok(None)` means the origin has queues but none matched.
    pub fn lookup(&mut self, request: &Request<Bytes>) -> Result<Option<&mut ActiveQueue>> {
        let origin = origin_of(request).ok_or_else(|| TransportError::MissingOrigin {
            uri: request.uri().to_string(),
        })?;

        let queues = self
            .origins
            .get_mut(&origin)
            .filter(|queues| !queues.is_empty())
            .ok_or(TransportError::OriginNotRegistered { origin })?;

        for queue in queues.iter_mut() {
            if queue.is_exhausted() {
                continue;
            }
            if queue.matches(request).map_err(TransportError::MatcherFailed)? {
                debug!("Request {} {} matched {}", request.method(), request.uri(), queue.id());
                return Ok(Some(queue));
            }
        }

        Ok(None)
    }

    pub fn queues(&self, origin: &str) -> Option<&[ActiveQueue]> {
        self.origins.get(&normalize_origin(origin)).map(Vec::as_slice)
    }

    /// Registered origins, sorted
    pub fn origins(&self) -> Vec<String> {
        let mut origins: Vec<_> = self.origins.keys().cloned().collect();
        origins.sort();
        origins
    }

    /// Responses left across every queue
    pub fn remaining(&self) -> usize {
        self.origins.values().flatten().map(ActiveQueue::len).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.origins.values().flatten().all(ActiveQueue::is_exhausted)
    }

    /// Clear all origins
    pub fn clear(&mut self) {
        self.origins.clear();
        info!("Cleared all origins");
    }

    /// One line per queue with its criteria and remaining responses
    pub fn summary(&self) -> String {
        let mut output = String::new();

        for origin in self.origins() {
            let _ = writeln!(output, "{}", origin);
            for queue in &self.origins[&origin] {
                let _ = writeln!(
                    output,
                    "  {} {:?} remaining={}",
                    queue.id(),
                    queue.criteria(),
                    queue.len()
                );
            }
        }

        output
    }
}

/// `scheme://host[:port]` of a request
///
/// Absolute URIs are used as-is; relative ones fall back to the `Host`
/// header over plain http.
pub fn origin_of<B>(request: &Request<B>) -> Option<String> {
    let uri = request.uri();

    if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
        return Some(match authority.port_u16() {
            Some(port) => format!("{}://{}:{}", scheme, authority.host(), port),
            None => format!("{}://{}", scheme, authority.host()),
        });
    }

    request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .map(|host| format!("http://{}", host))
}

/// Full URL of a request, rebuilt from the `Host` header for relative URIs
pub fn request_url<B>(request: &Request<B>) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() {
        return uri.to_string();
    }

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    match origin_of(request) {
        Some(origin) => format!("{}{}", origin, path_and_query),
        None => path_and_query.to_string(),
    }
}

fn normalize_origin(origin: &str) -> String {
    origin.trim_end_matches('/').to_string()
}
