//! CORS relay handler
//! Handles /corsfriendly?url=<base64 target>

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue},
    response::Response,
};
use tracing::{debug, info};

use crate::overlay::chunked::rechunk;
use crate::overlay::encoding::decode_target_url;
use crate::overlay::error::RelayError;
use crate::overlay::server::AppState;

fn trace_id() -> String {
    use rand::Rng;
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Fetch the decoded target and stream it back with a permissive CORS header.
///
/// Status and content type are mirrored from the target. Every other target
/// header is dropped; `Access-Control-Allow-Origin: *` is always set.
pub async fn handle_cors_friendly(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, RelayError> {
    let encoded = params
        .get("url")
        .filter(|v| !v.is_empty())
        .ok_or(RelayError::MissingUrl)?;

    let trace_id = trace_id();
    let target = decode_target_url(encoded).map_err(|e| {
        info!("[{}] Rejected relay parameter: {}", trace_id, e);
        e
    })?;

    debug!("[{}] Relaying {}", trace_id, target);

    let upstream = state.upstream.open(&target).await.map_err(|e| {
        info!("[{}] Upstream request failed: {}", trace_id, e);
        e
    })?;

    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();

    debug!(
        "[{}] Upstream answered {} ({})",
        trace_id,
        status,
        content_type
            .as_ref()
            .and_then(|v| v.to_str().ok())
            .unwrap_or("no content type")
    );

    let body = Body::from_stream(rechunk(upstream.bytes_stream(), state.chunk_size));

    let mut response = Response::new(body);
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    Ok(response)
}
