//! Error types for the poster2html library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Poster2HtmlError`] — **Fatal**: the run cannot proceed at all
//!   (input folder missing, provider not configured, output not writable).
//!   Returned as `Err(Poster2HtmlError)` from the top-level `summarise*`
//!   functions.
//!
//! * [`PosterError`] — **Non-fatal**: a single poster failed (unreadable
//!   image, model call error) but the rest of the batch is fine. Stored as
//!   the `Failed` variant of [`crate::output::PosterSummary`] so the report
//!   still gets an entry for that image rather than losing the whole run to
//!   one bad photo.
//!
//! A response that parses as nothing useful is *not* an error at either
//! level — it degrades to the raw-text fallback entry instead.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the poster2html library.
///
/// Per-poster failures use [`PosterError`] and are stored in
/// [`crate::output::PosterSummary::Failed`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Poster2HtmlError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The poster folder was not found at the given path.
    #[error("Poster folder not found: '{path}'\nCheck the path exists and is readable.")]
    FolderNotFound { path: PathBuf },

    /// The path exists but is not a directory.
    #[error("'{path}' is not a directory")]
    NotAFolder { path: PathBuf },

    /// Process does not have read permission on the folder.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single poster image.
///
/// Stored inside [`crate::output::PosterSummary::Failed`] when an image
/// fails. The overall run continues with the next file.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PosterError {
    /// The image file could not be read or is not a usable image.
    #[error("{file}: could not read image: {detail}")]
    ReadFailed { file: String, detail: String },

    /// The model call failed (network, quota, rejected image).
    #[error("{file}: model call failed: {detail}")]
    LlmFailed { file: String, detail: String },
}

impl PosterError {
    /// The filename this error is attached to.
    pub fn file(&self) -> &str {
        match self {
            PosterError::ReadFailed { file, .. } => file,
            PosterError::LlmFailed { file, .. } => file,
        }
    }
}
