use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use frameline_store::ContentStore;
use frameline_types::{ContentHash, PhotoRecord};

use crate::error::ServerError;

/// `GET /photos/list`: snapshot of the full inventory, unspecified order.
pub async fn list_photos(State(store): State<Arc<ContentStore>>) -> Json<Vec<PhotoRecord>> {
    Json(store.list())
}

/// `GET /photos/{hash}`: the photo bytes, or 404 for an unknown hash.
pub async fn download_photo(
    State(store): State<Arc<ContentStore>>,
    UrlPath(hash): UrlPath<String>,
) -> Result<Response, ServerError> {
    let hash = parse_hash(&hash)?;
    let path = store.get(&hash)?;
    // The index is trusted between rescans; a read failure here is an
    // invariant violation and surfaces as a 500.
    let body = tokio::fs::read(&path).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&path))], body).into_response())
}

/// `POST /photos/{ignored}`: store the multipart `photo` field. The path
/// segment is ignored; identity comes from the uploaded content itself.
pub async fn upload_photo(
    State(store): State<Arc<ContentStore>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PhotoRecord>), ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::MalformedUpload(e.to_string()))?
    {
        if field.name() != Some("photo") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ServerError::MalformedUpload("photo field has no filename".into()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::MalformedUpload(e.to_string()))?;
        let record = store.add(&filename, data.as_ref()).await?;
        return Ok((StatusCode::CREATED, Json(record)));
    }
    Err(ServerError::MalformedUpload(
        "missing multipart field `photo`".into(),
    ))
}

/// `DELETE /photos/{hash}`: remove the photo, or 404 for an unknown hash.
pub async fn delete_photo(
    State(store): State<Arc<ContentStore>>,
    UrlPath(hash): UrlPath<String>,
) -> Result<StatusCode, ServerError> {
    let hash = parse_hash(&hash)?;
    store.delete(&hash)?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_hash(raw: &str) -> Result<ContentHash, ServerError> {
    ContentHash::from_hex(raw).map_err(|_| ServerError::UnknownHash(raw.to_string()))
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        _ => "image/jpeg",
    }
}
