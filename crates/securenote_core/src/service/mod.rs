//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and attachment intake into use-case level
//!   APIs, keeping calling layers decoupled from storage details.

pub mod note_service;
