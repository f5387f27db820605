//! Lesson video upload rules.
//!
//! The only business rule enforced on the client: a file is checked for
//! type and size before any bytes are transmitted to
//! `POST /admin/videos/upload`.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted video size in bytes (500 MB).
pub const MAX_VIDEO_SIZE_BYTES: u64 = 500 * 1024 * 1024;

/// MIME types accepted by the upload endpoint.
pub const ALLOWED_VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
];

/// File extensions and the MIME type each maps to.
const EXTENSION_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Match a `Content-Type` value (parameters ignored) against the allow-list.
fn allowed_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_VIDEO_TYPES
        .iter()
        .copied()
        .find(|allowed| *allowed == essence)
}

/// Returns `true` if the MIME type is one the backend accepts.
pub fn is_allowed_video_type(content_type: &str) -> bool {
    allowed_type(content_type).is_some()
}

/// Guess the MIME type of a video from its file name.
pub fn video_type_from_file_name(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    EXTENSION_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Validate a candidate upload. Returns the MIME type to send.
///
/// An explicit `content_type` wins over the extension guess.
pub fn validate_video_upload(
    file_name: &str,
    content_type: Option<&str>,
    size_bytes: u64,
) -> Result<&'static str, CoreError> {
    let mime = match content_type {
        Some(ct) => match allowed_type(ct) {
            Some(mime) => Some(mime),
            None => {
                return Err(CoreError::Validation(format!(
                    "Unsupported video type '{ct}'. Allowed: MP4, WebM, MOV, AVI, MKV"
                )));
            }
        },
        None => video_type_from_file_name(file_name),
    };

    let Some(mime) = mime else {
        return Err(CoreError::Validation(format!(
            "Unsupported video file '{file_name}'. Allowed: MP4, WebM, MOV, AVI, MKV"
        )));
    };

    if size_bytes == 0 {
        return Err(CoreError::Validation("Video file is empty".to_string()));
    }

    if size_bytes > MAX_VIDEO_SIZE_BYTES {
        return Err(CoreError::Validation(format!(
            "Video is {}MB, maximum is {}MB",
            size_bytes.div_ceil(1024 * 1024),
            MAX_VIDEO_SIZE_BYTES / (1024 * 1024),
        )));
    }

    Ok(mime)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
