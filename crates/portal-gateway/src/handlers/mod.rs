mod health;
mod url;

pub use health::health_handler;
pub use url::{decode_url_handler, encode_url_handler, UrlParam};
