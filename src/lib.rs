//! skeylo backend — lead capture and meeting booking for the agency site.
//!
//! The crate is split along the site's three concerns: a pure field
//! validation core shared by every surface ([`fields`]), the multi-step
//! free-analysis wizard state machine ([`wizard`]), and the thin HTTP API
//! that relays submissions to externally configured webhooks ([`api`]).

pub mod api;
pub mod config;
pub mod error;
pub mod fields;
pub mod forward;
pub mod schedule;
pub mod wizard;
