//! Core types and traits for the Portal URL shortener.
//!
//! This crate provides the pieces shared by the storage backends, the
//! shortener service and the HTTP gateway: the persisted [`UrlRecord`],
//! the repository contract, the identifier codecs and the URL validator.

pub mod codec;
pub mod error;
pub mod repository;
pub mod shortcode;
pub mod validate;

pub use codec::{Codec, HashidsCodec, ObfuscatedCodec, Obfuscator};
pub use error::{CoreError, StorageError};
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use validate::is_valid_url;
