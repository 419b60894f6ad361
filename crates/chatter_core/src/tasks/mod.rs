//! Scheduled maintenance tasks.
//!
//! # Responsibility
//! - Provide task entry points for an external scheduler to invoke.
//! - Keep schedule/trigger policy outside the core; tasks only know how to
//!   run once.

pub mod event_log_cleanup;
