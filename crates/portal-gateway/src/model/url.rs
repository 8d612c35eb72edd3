use serde::{Deserialize, Serialize};

/// The `url` field of an encode request, read from the query string or a
/// urlencoded form body.
#[derive(Debug, Default, Deserialize)]
pub struct EncodeUrlParams {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EncodeUrlResponse {
    pub shorten_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecodeUrlResponse {
    pub url: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
