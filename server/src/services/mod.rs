//! Domain services used by the HTTP and websocket routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and persistence so route handlers stay
//! focused on protocol translation and status mapping.

pub mod comment;
pub mod feed;
pub mod gallery;
pub mod position;
