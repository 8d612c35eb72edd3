//! URL shortener service implementation.
//!
//! This crate ties a [`Repository`](portal_core::Repository) and a
//! [`Codec`](portal_core::Codec) together into the encode and decode flows.
//! Core types are re-exported from `portal_core`.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use service::ShortenerService;
pub use shortener::Shortener;
