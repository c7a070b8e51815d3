//! Image encoding: poster file → base64 `ImageData`.
//!
//! VLM APIs (OpenAI, Anthropic, Gemini) accept images as base64 data
//! embedded in the JSON request body. The original bytes are forwarded
//! unchanged — posters are usually multi-megabyte JPEG photos, and
//! re-encoding them would either balloon the payload (PNG) or degrade the
//! fine print the model has to read (another JPEG pass).
//!
//! PNG and JPEG files are decoded once before upload so a truncated or
//! mislabeled file fails here, as a per-image error, instead of as a
//! confusing provider-side rejection after tokens were spent. HEIC is
//! opaque to the `image` crate, so those bytes go up unvalidated and the
//! provider gets the final say.

use crate::error::PosterError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use std::path::Path;
use tracing::debug;

/// MIME type for an accepted poster filename.
fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "image/heic"
    }
}

/// Read a poster image and wrap it as base64 `ImageData` for the API.
///
/// `detail: "high"` instructs GPT-4-class models to use the full image tile
/// budget; a conference poster is dense with small text, and the overview
/// tile alone loses the methods and results panels.
pub fn encode_poster(path: &Path, file_name: &str) -> Result<ImageData, PosterError> {
    let bytes = std::fs::read(path).map_err(|e| PosterError::ReadFailed {
        file: file_name.to_string(),
        detail: e.to_string(),
    })?;

    let mime = mime_for(file_name);
    if mime != "image/heic" {
        image::load_from_memory(&bytes).map_err(|e| PosterError::ReadFailed {
            file: file_name.to_string(),
            detail: format!("not a valid image: {e}"),
        })?;
    }

    let b64 = STANDARD.encode(&bytes);
    debug!("{file_name}: encoded {} bytes base64 ({mime})", b64.len());

    Ok(ImageData::new(b64, mime).with_detail("high"))
}
