//! Notification use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into request-scoped operations.
//! - Keep the calling web layer decoupled from storage details.

pub mod notice_service;
pub mod overview;
pub mod settings_service;
