// packages/mock-transport/src/matching/mod.rs
//! Request matching
//!
//! A response queue is gated by a list of [`MatchCriterion`] values that are
//! ANDed together. Built-in criteria cover method, path, query parameter,
//! header and body equality; anything else goes through the [`Match`]
//! capability trait.

pub mod matchers;

pub use matchers::{matches_all, Match, MatchCriterion};
