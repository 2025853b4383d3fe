//! Audit event records and the verb classification they are built from.

pub mod audit_event;
pub mod method;

pub use audit_event::{AuditEvent, EventTarget, EventVariant};
pub use method::HttpAction;
