//! Image Upload Endpoint
//! Mission: Accept admin image uploads and hand back their public path

use crate::audit::models::AuditAction;
use crate::auth::models::Claims;
use crate::routes::{ApiError, AppState};
use axum::{
    extract::{ConnectInfo, Multipart, State},
    Extension, Json,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Upload size cap, enforced as the request body limit on the route.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Store an uploaded image - POST /api/upload (guarded)
///
/// The file is written as-is under the upload directory; conversion to
/// webp happens in the separate image pipeline.
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(|n| n.to_string())
            .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

        let ext = allowed_extension(&original_name)
            .ok_or_else(|| ApiError::BadRequest("Only image files are allowed".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        if bytes.is_empty() {
            return Err(ApiError::BadRequest("No file uploaded".to_string()));
        }

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let dest = state.config.upload_dir.join(&filename);

        tokio::fs::create_dir_all(&state.config.upload_dir)
            .await
            .map_err(anyhow::Error::from)?;
        tokio::fs::write(&dest, &bytes)
            .await
            .map_err(anyhow::Error::from)?;

        info!(
            "🖼️  Stored upload {} ({} bytes) from {}",
            filename,
            bytes.len(),
            claims.username
        );

        state.audit.record(
            AuditAction::Upload,
            format!("Image uploaded: {}", filename),
            claims.username,
            Some(addr.ip()),
        );

        return Ok(Json(json!({
            "success": true,
            "filename": filename,
            "path": format!("/uploads/{}", filename),
        })));
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert_eq!(allowed_extension("photo.jpg").as_deref(), Some("jpg"));
        assert_eq!(allowed_extension("photo.JPEG").as_deref(), Some("jpeg"));
        assert_eq!(allowed_extension("banner.webp").as_deref(), Some("webp"));
    }

    #[test]
    fn test_rejected_extensions() {
        assert_eq!(allowed_extension("script.exe"), None);
        assert_eq!(allowed_extension("page.html"), None);
        assert_eq!(allowed_extension("noextension"), None);
        // Only the final extension counts
        assert_eq!(allowed_extension("double.jpg.exe"), None);
    }
}
