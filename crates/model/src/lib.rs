#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Domain types for the quartermaster inventory client.
//!
//! Everything here mirrors the wire contract of the inventory service:
//! camelCase field names (with the one historical `location_detail`
//! exception), tolerant decoding for fields older records may lack, and
//! enums for every closed set the backend exposes.
//!
//! Role-conditioned behavior lives in [`role`] as pure functions of
//! [`Role`]; callers re-derive visibility on every render instead of
//! caching it.

/// Pagination metadata returned by collection endpoints.
pub mod page;
/// Property records, the details extension, and edit drafts.
pub mod property;
/// Reassignment requests and review verdicts.
pub mod reassignment;
/// Roles and the capability rules derived from them.
pub mod role;
/// User accounts.
pub mod user;

pub use page::PageMeta;
pub use property::{
	Category, DraftError, Property, PropertyDetails, PropertyDraft, PropertyPayload,
	PropertyWithDetails, ReassignmentStatus,
};
pub use reassignment::{ReassignmentRequest, ReviewStatus};
pub use role::Role;
pub use user::User;
