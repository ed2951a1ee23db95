//! Test doubles and fixtures for the cluster handler.
//!
//! - [`FakeClusterApi`]: in-memory cluster API that records every call
//! - [`fixtures`]: envelopes and configurations shared across test suites

mod fake;
pub mod fixtures;

pub use fake::{ApiCall, FakeClusterApi, InjectedError};
