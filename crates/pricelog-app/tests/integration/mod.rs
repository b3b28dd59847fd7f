//! Integration tests for pricelog-app.
//!
//! These tests run whole cycles against a local mock price endpoint:
//! - fetch and persist on success
//! - no writes on upstream failure
//! - shutdown via cancellation

pub mod common;
