//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Liveness check.
pub mod health;
/// Index page and bundled front-end assets.
pub mod index;
/// Question answering over a stored document.
pub mod query;
/// Document upload.
pub mod upload;
