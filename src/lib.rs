//! # poster2html
//!
//! Summarise a folder of conference poster photos into a single static HTML
//! report using Vision Language Models (VLMs).
//!
//! ## Why this crate?
//!
//! A conference leaves you with a camera roll of poster photos and no
//! memory of which was which. OCR alone produces a wall of unordered text.
//! Instead this crate sends each photo to a VLM with a fixed extraction
//! prompt, recovers a structured record (title, authors, research question,
//! methods, results, conclusions) from whatever the model returns, and
//! renders everything into one browsable HTML page with clickable
//! thumbnails.
//!
//! ## Pipeline Overview
//!
//! ```text
//! folder
//!  │
//!  ├─ 1. Scan     list image files (.png .jpg .jpeg .heic), filename order
//!  ├─ 2. Encode   file bytes → base64 ImageData
//!  ├─ 3. VLM      one call per poster to gpt-4.1-nano / claude / gemini / …
//!  ├─ 4. Extract  fenced/embedded JSON → PosterRecord, else raw-text fallback
//!  └─ 5. Render   assembled HTML report + per-run stats
//! ```
//!
//! Processing is deliberately sequential — one poster at a time, each to
//! completion — and a failure on one image degrades to an error entry in
//! the report instead of aborting the batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poster2html::{summarise, SummaryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / GEMINI_API_KEY
//!     let config = SummaryConfig::default();
//!     let output = summarise("./poster_photos", &config).await?;
//!     std::fs::write("conference_summary.html", &output.html)?;
//!     eprintln!(
//!         "{} structured, {} fallback, {} failed",
//!         output.stats.structured, output.stats.fallback, output.stats.failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `poster2html` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! poster2html = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod summarise;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SummaryConfig, SummaryConfigBuilder, DEFAULT_REPORT_TITLE};
pub use error::{Poster2HtmlError, PosterError};
pub use output::{PosterEntry, PosterRecord, PosterSummary, RawFallback, RunStats, SummaryOutput};
pub use progress::{NoopProgressCallback, ProgressCallback, SummaryProgressCallback};
pub use summarise::{summarise, summarise_sync, summarise_to_file};
