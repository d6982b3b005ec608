// packages/mock-transport/src/interception/round_trip.rs
//! Round-tripper contract
//!
//! HTTP clients under test take any [`RoundTrip`] implementation as their
//! transport; given a request they get back a response or an error, with no
//! other side channel.

use crate::utils::errors::Result;
use bytes::Bytes;
use hyper::{Request, Response};
use std::sync::Arc;

pub trait RoundTrip: Send + Sync {
    fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>>;
}

impl<T: RoundTrip + ?Sized> RoundTrip for Arc<T> {
    fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        (**self).round_trip(request)
    }
}

impl<T: RoundTrip + ?Sized> RoundTrip for &T {
    fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        (**self).round_trip(request)
    }
}
