//! Audit logging for budgetwise
//!
//! Every create, update and delete performed by the record store is appended
//! to `audit.log` as one JSON line with before/after values.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
