//! Folder scanning: find the poster images to process.
//!
//! The folder must exist before anything else happens — a missing input
//! directory is the one error that aborts a run outright, before any model
//! call is made. Everything after the scan degrades per-file instead.

use crate::error::Poster2HtmlError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image filename suffixes we accept, matched case-insensitively.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "heic"];

/// One image file discovered in the input folder.
#[derive(Debug, Clone)]
pub struct ScannedPoster {
    /// Full path, used to read the file and as the thumbnail link target.
    pub path: PathBuf,
    /// Bare filename, e.g. `poster1.png`.
    pub file_name: String,
    /// Filename with the extension stripped, e.g. `poster1`. Used as the
    /// fallback title when the response cannot be decoded.
    pub stem: String,
}

/// Does this filename carry one of the accepted image suffixes?
pub fn is_image_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|e| *e == ext)
        }
        None => false,
    }
}

/// List the image files in `folder`, sorted lexicographically by filename.
///
/// Non-image files and subdirectories are skipped silently. Returns an
/// empty list (not an error) for a folder with no images — the run then
/// produces a report with only the header and footer.
pub fn scan_folder(folder: &Path) -> Result<Vec<ScannedPoster>, Poster2HtmlError> {
    if !folder.exists() {
        return Err(Poster2HtmlError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }
    if !folder.is_dir() {
        return Err(Poster2HtmlError::NotAFolder {
            path: folder.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(folder).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Poster2HtmlError::PermissionDenied {
            path: folder.to_path_buf(),
        },
        _ => Poster2HtmlError::Internal(format!("reading '{}': {e}", folder.display())),
    })?;

    let mut posters: Vec<ScannedPoster> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !is_image_file(file_name) {
            continue;
        }
        let stem = file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem.to_string())
            .unwrap_or_else(|| file_name.to_string());
        posters.push(ScannedPoster {
            file_name: file_name.to_string(),
            stem,
            path,
        });
    }

    // Report order is filename order, independent of how the OS lists the
    // directory.
    posters.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    debug!(
        "Found {} poster images in '{}'",
        posters.len(),
        folder.display()
    );
    Ok(posters)
}
