use crate::error::Result;
use async_trait::async_trait;
use portal_core::{ShortCode, UrlRecord};

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code for `url`, creating a record on first use.
    ///
    /// Shortening the same URL again yields the same code.
    async fn shorten(&self, url: &str) -> Result<ShortCode>;

    /// Resolves a short code to its stored URL record.
    async fn expand(&self, code: &str) -> Result<UrlRecord>;
}
