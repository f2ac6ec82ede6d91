//! Upload type gate.
//!
//! The check only looks at client-declared metadata (file name and
//! `Content-Type`). It is not content validation and must not be relied on
//! as a security boundary.

use std::path::Path;

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    // images
    "jpeg", "jpg", "png", "gif", "bmp", "webp", "svg", "ico", "tiff",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "rtf", "odt", "ods", "odp",
    // audio
    "mp3", "wav", "aac", "flac", "ogg", "m4a",
    // video
    "mp4", "avi", "mkv", "mov", "wmv", "webm", "flv",
    // archives
    "zip", "rar", "7z", "tar", "gz",
    // text formats
    "html", "htm", "css", "js", "json", "xml", "csv", "yaml", "yml", "md",
];

/// Extract the lower-cased extension from a file name.
///
/// Returns `None` for names without one, including dotfiles such as `.hidden`.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_lowercase())
}

/// Check whether an extension is on the allow-list.
pub fn is_allowed_extension(ext: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&ext)
}

/// Check whether a declared media type is plausible for the extension.
///
/// `ext` must already be lower-cased.
pub fn is_allowed_media_type(content_type: Option<&str>, ext: &str) -> bool {
    let essence = match content_type {
        Some(ct) => ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase(),
        None => return true,
    };

    if essence.is_empty() || essence == "application/octet-stream" {
        return true;
    }

    let (top, sub) = match essence.split_once('/') {
        Some(parts) => parts,
        None => return false,
    };

    if matches!(top, "image" | "audio" | "video" | "text") {
        return true;
    }

    if mime_guess::from_ext(ext)
        .iter()
        .any(|m| m.essence_str() == essence)
    {
        return true;
    }

    // e.g. application/x-zip-compressed, application/x-7z-compressed
    sub.contains(ext)
}

/// Validate declared metadata for an upload.
///
/// Returns the lower-cased extension on success, or a human-readable reason.
pub fn check(original_name: &str, content_type: Option<&str>) -> Result<String, String> {
    let ext = extension_of(original_name)
        .filter(|ext| is_allowed_extension(ext))
        .ok_or_else(rejection_message)?;

    if !is_allowed_media_type(content_type, &ext) {
        return Err(rejection_message());
    }

    Ok(ext)
}

fn rejection_message() -> String {
    format!(
        "Invalid file type. Allowed types are: {}",
        ALLOWED_EXTENSIONS.join(", ")
    )
}
