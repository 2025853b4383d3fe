//! Audit logging middleware for axum.
//!
//! Completed requests that pass the configured eligibility policy are turned
//! into an [`AuditEvent`](models::AuditEvent) ("User created bookings", actor,
//! resource id and type) and handed to a [`Publisher`](services::Publisher)
//! without holding up the response.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
