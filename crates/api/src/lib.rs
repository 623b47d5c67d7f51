//! Typed HTTP gateway to the quartermaster backend.
//!
//! Thin by intent: one method per endpoint, decoding split out from
//! transport so status-code branching (immediate vs queued assignment,
//! soft delete confirmation) is covered by plain unit tests. No retries
//! and no caching; callers decide what a failure means for their state.

#![cfg_attr(test, allow(unused_crate_dependencies))]

/// Endpoint methods and request plumbing.
pub mod client;
/// Gateway error taxonomy.
pub mod error;
/// Status+body decoding into typed outcomes.
pub mod wire;

pub use client::{ApiClient, NewAccount};
pub use error::{ApiError, ApiResult};
pub use wire::{AssignOutcome, DeleteOutcome, SignIn};
