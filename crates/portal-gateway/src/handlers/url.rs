use crate::error::{AppError, Result};
use crate::model::{DecodeUrlResponse, EncodeUrlParams, EncodeUrlResponse};
use crate::state::AppState;
use axum::extract::rejection::PathRejection;
use axum::extract::{Form, FromRequest, Multipart, Path, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use std::convert::Infallible;
use tracing::debug;

/// The `url` parameter of an encode request.
///
/// Taken from the query string if present there, otherwise from the form
/// body, either urlencoded or multipart. A missing or unreadable parameter
/// yields `None`.
#[derive(Debug)]
pub struct UrlParam(pub Option<String>);

impl<S> FromRequest<S> for UrlParam
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        if let Ok(Query(EncodeUrlParams { url: Some(url) })) =
            Query::<EncodeUrlParams>::try_from_uri(req.uri())
        {
            return Ok(Self(Some(url)));
        }

        let url = if is_multipart(&req) {
            multipart_url(req, state).await
        } else {
            Form::<EncodeUrlParams>::from_request(req, state)
                .await
                .ok()
                .and_then(|Form(params)| params.url)
        };
        Ok(Self(url))
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// Returns the first `url` field of a multipart body.
async fn multipart_url<S>(req: Request, state: &S) -> Option<String>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state).await.ok()?;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("url") => return field.text().await.ok(),
            Ok(Some(_)) => continue,
            Ok(None) => return None,
            Err(err) => {
                debug!(error = %err, "unreadable multipart body");
                return None;
            }
        }
    }
}

pub async fn encode_url_handler(
    State(state): State<AppState>,
    UrlParam(url): UrlParam,
) -> Result<Json<EncodeUrlResponse>> {
    let url = url.unwrap_or_default();
    let code = state.shortener().shorten(&url).await?;

    Ok(Json(EncodeUrlResponse {
        shorten_url: code.to_url(state.shorten_prefix()),
    }))
}

pub async fn decode_url_handler(
    State(state): State<AppState>,
    identifier: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<DecodeUrlResponse>> {
    let Path(identifier) = identifier
        .map_err(|rejection| AppError::Rejected(rejection.status(), rejection.body_text()))?;
    let record = state.shortener().expand(&identifier).await?;

    Ok(Json(DecodeUrlResponse { url: record.url }))
}
