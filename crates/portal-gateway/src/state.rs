use std::sync::Arc;

use portal_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    shorten_prefix: Arc<str>,
}

impl AppState {
    /// `shorten_prefix` is prepended verbatim to every issued short code.
    pub fn new(shortener: Arc<dyn Shortener>, shorten_prefix: impl Into<String>) -> Self {
        Self {
            shortener,
            shorten_prefix: shorten_prefix.into().into(),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn shorten_prefix(&self) -> &str {
        &self.shorten_prefix
    }
}
