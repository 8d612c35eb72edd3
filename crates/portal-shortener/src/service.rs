use crate::error::{Result, ShortenerError};
use crate::shortener::Shortener;
use async_trait::async_trait;
use portal_core::{is_valid_url, Codec, Repository, ShortCode, StorageError, UrlRecord};
use std::sync::Arc;
use tracing::{debug, trace};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Codec` to handle:
/// - URL validation
/// - Find-or-create of the record for a URL
/// - Translating between record ids and short codes
///
/// A concurrent request may create the record between the lookup and the
/// insert. The repository then reports a conflict and the service reads
/// back the winning record instead.
#[derive(Debug)]
pub struct ShortenerService<R, C> {
    repository: Arc<R>,
    codec: Arc<C>,
}

impl<R, C> Clone for ShortenerService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<R: Repository, C: Codec> ShortenerService<R, C> {
    pub fn new(repository: R, codec: C) -> Self {
        Self {
            repository: Arc::new(repository),
            codec: Arc::new(codec),
        }
    }

    /// Returns the existing record for `url`, or creates one.
    async fn find_or_create(&self, url: &str) -> Result<UrlRecord> {
        if let Some(existing) = self.repository.find_by_url(url).await? {
            trace!(url = %url, id = existing.id, "reusing existing record");
            return Ok(existing);
        }

        match self.repository.create(url).await {
            Ok(created) => {
                debug!(url = %url, id = created.id, "created record");
                Ok(created)
            }
            Err(StorageError::Conflict(_)) => {
                debug!(url = %url, "lost create race, reading back the existing record");
                self.repository.find_by_url(url).await?.ok_or_else(|| {
                    StorageError::Operation(format!(
                        "record for '{url}' reported as duplicate but not found"
                    ))
                    .into()
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl<R: Repository, C: Codec> Shortener for ShortenerService<R, C> {
    async fn shorten(&self, url: &str) -> Result<ShortCode> {
        if !is_valid_url(url) {
            return Err(ShortenerError::InvalidUrl(url.to_owned()));
        }

        let record = self.find_or_create(url).await?;
        Ok(self.codec.encode(record.id))
    }

    async fn expand(&self, code: &str) -> Result<UrlRecord> {
        let not_found = || ShortenerError::NotFound(code.to_owned());

        let short_code = ShortCode::new(code).map_err(|_| not_found())?;
        let Some(id) = self.codec.decode(&short_code) else {
            trace!(code = %code, "short code does not decode");
            return Err(not_found());
        };

        match self.repository.find_by_id(id).await? {
            Some(record) => {
                debug!(code = %code, id, url = %record.url, "resolved short code");
                Ok(record)
            }
            None => {
                trace!(code = %code, id, "decoded id has no record");
                Err(not_found())
            }
        }
    }
}
