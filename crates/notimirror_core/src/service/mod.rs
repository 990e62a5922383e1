//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate cache, fetcher and sync into load/refresh/action APIs.
//! - Keep the CLI decoupled from storage details.

pub mod notification_service;
