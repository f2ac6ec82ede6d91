//! HTML pages for browser use.

use axum::response::Html;

const UPLOAD_PAGE: &str = include_str!("../../../views/upload.html");
const FILES_PAGE: &str = include_str!("../../../views/files.html");

/// GET /upload - Upload form.
pub async fn upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE)
}

/// GET /files - File listing table.
pub async fn files_page() -> Html<&'static str> {
    Html(FILES_PAGE)
}
