//! Photo catalog routes.

use axum::extract::Path;
use axum::response::Json;

use crate::services::gallery::{self, Photo};

/// `GET /api/photos`: every photo in exhibit order.
pub async fn list_photos() -> Json<Vec<Photo>> {
    Json(gallery::catalog())
}

/// `GET /api/photos/:photo_id`: one photo; unknown ids get the default image.
pub async fn get_photo(Path(photo_id): Path<String>) -> Json<Photo> {
    Json(gallery::photo_or_fallback(&photo_id))
}
