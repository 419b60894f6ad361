//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep outer layers decoupled from storage details.

pub mod message_service;
pub mod user_service;
