//! Request handlers for the ingestion API and the access-gated viewer.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use screen_relay_core::SessionId;

use crate::{error::ApiError, html, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub session_id: String,
    #[serde(default)]
    pub meta: HashMap<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: &'static str,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub session_id: String,
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
}

/// Session entry as reported by `GET /sessions`.
///
/// `has_image` is derived from the frame store on every request rather than
/// cached, so it always reflects current disk state.
#[derive(Debug, Serialize)]
pub struct SessionEntry {
    pub last_seen: i64,
    pub has_image: bool,
    pub meta: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub password: String,
}

/// `GET /` and `GET /admin`.
pub async fn admin_page() -> Html<&'static str> {
    Html(html::ADMIN_PAGE)
}

/// `POST /register`.
///
/// Creates or updates the session, then dispatches the registration notice
/// on a detached task so a slow or unreachable notification endpoint can
/// never stall the response.
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RegisterResponse>, ApiError> {
    let request: RegisterRequest = parse_body(&body)?;
    let id = SessionId::parse(&request.session_id)?;

    state.registry.register(&id, request.meta)?;
    tracing::info!(session_id = %id, "registered session");

    let notifier = Arc::clone(&state.notifier);
    let password = state.config.password.clone();
    let session_id = id.to_string();
    tokio::spawn(async move {
        if let Err(e) = notifier.notify_registered(&session_id, &password).await {
            tracing::warn!(session_id, "registration notice failed: {e}");
        }
    });

    Ok(Json(RegisterResponse {
        status: "ok",
        session_id: id.to_string(),
    }))
}

/// `POST /upload`.
///
/// Validation runs in a fixed order: body shape, identifier syntax, an
/// approximate size check on the encoded length (base64 inflates by 4/3, so
/// the encoded length bounds the decoded size before any decode work),
/// strict decode, then an exact size check on the decoded bytes.
pub async fn upload_frame(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    let request: UploadRequest = parse_body(&body)?;
    let id = SessionId::parse(&request.session_id)?;

    let max = state.config.max_image_bytes;
    if request.image.len() * 3 / 4 > max {
        return Err(ApiError::PayloadTooLarge);
    }

    let image = BASE64
        .decode(request.image.as_bytes())
        .map_err(|_| ApiError::DecodeError)?;
    if image.len() > max {
        return Err(ApiError::PayloadTooLarge);
    }

    state.registry.touch(&id)?;
    let size = image.len();
    state.store.write(&id, Bytes::from(image)).await?;
    tracing::debug!(session_id = %id, size, "frame stored");

    Ok(Json(UploadResponse { status: "ok" }))
}

/// `GET /sessions`.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<HashMap<String, SessionEntry>>, ApiError> {
    let records = state.registry.snapshot()?;

    let sessions = records
        .into_iter()
        .map(|record| {
            let has_image = state.store.exists(&record.session_id);
            (
                record.session_id.to_string(),
                SessionEntry {
                    last_seen: record.last_seen,
                    has_image,
                    meta: record.meta,
                },
            )
        })
        .collect();

    Ok(Json(sessions))
}

/// `GET /view/{session_id}`.
///
/// The password gate comes first: a wrong secret is 403 whether or not the
/// session exists. A syntactically invalid or unregistered id is 404.
pub async fn view_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Html<String>, ApiError> {
    if query.password != state.config.password {
        return Err(ApiError::Forbidden);
    }

    let id = SessionId::parse(&session_id).map_err(|_| ApiError::NotFound)?;
    let record = state.registry.get(&id)?.ok_or(ApiError::NotFound)?;

    Ok(Html(html::viewer_page(&record.session_id)))
}

/// `GET /screens/{file}`.
///
/// The route parameter must name exactly `<session-id>.jpg`. Anything else,
/// traversal-shaped paths included, is a 404 before the filesystem is
/// touched.
pub async fn serve_frame(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_id_from_file(&file).ok_or(ApiError::NotFound)?;
    let bytes = state.store.read(&id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        bytes,
    ))
}

/// `GET /admin-list`.
pub async fn admin_list(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let records = state.registry.snapshot()?;
    Ok(Html(html::admin_list(&records, &state.config.password)))
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

fn session_id_from_file(file: &str) -> Option<SessionId> {
    let stem = file.strip_suffix(".jpg")?;
    SessionId::parse(stem).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_file_names_resolve_to_session_ids() {
        assert_eq!(
            session_id_from_file("sess_a1.jpg").unwrap().as_str(),
            "sess_a1"
        );
    }

    #[test]
    fn traversal_shaped_file_names_are_rejected() {
        for file in [
            "../../etc/passwd",
            "../secret.jpg",
            "..%2Fsecret.jpg",
            "sess_a1.png",
            "sess_a1",
            ".jpg",
            "a/b.jpg",
        ] {
            assert!(session_id_from_file(file).is_none(), "accepted {file:?}");
        }
    }
}
