//! Top-level summarisation entry points.
//!
//! [`summarise`] runs the whole pipeline and returns the assembled report
//! in memory; [`summarise_to_file`] additionally writes it to disk with an
//! atomic temp-file + rename so a crash mid-run never leaves a truncated
//! report behind. Posters are processed strictly one at a time: each image
//! is read, sent to the model, and normalised before the next one starts.

use crate::config::SummaryConfig;
use crate::error::Poster2HtmlError;
use crate::output::{PosterEntry, PosterSummary, RunStats, SummaryOutput};
use crate::pipeline::{encode, extract, llm, render, scan};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Default model when a provider is named without one.
const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Summarise a folder of poster images into an HTML report.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `folder` — directory containing the poster images
/// * `config` — summarisation configuration
///
/// # Returns
/// `Ok(SummaryOutput)` on success, even if some posters failed
/// (check `output.stats.failed`).
///
/// # Errors
/// Returns `Err(Poster2HtmlError)` only for fatal errors:
/// - Folder missing / not a directory / unreadable
/// - No LLM provider could be resolved
pub async fn summarise(
    folder: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<SummaryOutput, Poster2HtmlError> {
    let total_start = Instant::now();
    let folder = folder.as_ref();
    info!("Summarising posters in: {}", folder.display());

    // ── Step 1: Scan the folder ──────────────────────────────────────────
    let posters = scan::scan_folder(folder)?;
    let total_files = posters.len();
    info!("Found {total_files} poster images");

    // A folder with no images still yields a well-formed (empty) report,
    // and needs no provider to do it.
    if posters.is_empty() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_run_start(0);
            cb.on_run_complete(0, 0);
        }
        return Ok(SummaryOutput {
            html: render::assemble_report(&[], &config.report_title),
            entries: Vec::new(),
            stats: RunStats {
                total_duration_ms: total_start.elapsed().as_millis() as u64,
                ..RunStats::default()
            },
        });
    }

    // ── Step 2: Resolve the provider ─────────────────────────────────────
    let provider = resolve_provider(config)?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total_files);
    }

    // ── Step 3: Process each poster, in filename order ───────────────────
    let llm_start = Instant::now();
    let mut entries: Vec<PosterEntry> = Vec::with_capacity(total_files);
    for (i, poster) in posters.iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_poster_start(index, total_files, &poster.file_name);
        }

        let entry = process_poster(&provider, poster, config).await;

        if let Some(ref cb) = config.progress_callback {
            match &entry.summary {
                PosterSummary::Failed(e) => {
                    cb.on_poster_error(index, total_files, &poster.file_name, e.to_string())
                }
                summary => cb.on_poster_complete(
                    index,
                    total_files,
                    &poster.file_name,
                    summary.is_structured(),
                ),
            }
        }
        entries.push(entry);
    }
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Step 4: Assemble the report ──────────────────────────────────────
    let html = render::assemble_report(&entries, &config.report_title);

    // ── Step 5: Compute stats ────────────────────────────────────────────
    let structured = entries.iter().filter(|e| e.summary.is_structured()).count();
    let failed = entries.iter().filter(|e| e.summary.is_failed()).count();
    let stats = RunStats {
        total_files,
        structured,
        fallback: total_files - structured - failed,
        failed,
        total_input_tokens: entries.iter().map(|e| e.input_tokens).sum(),
        total_output_tokens: entries.iter().map(|e| e.output_tokens).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        llm_duration_ms,
    };

    info!(
        "Run complete: {}/{} posters summarised, {}ms total",
        total_files - failed,
        total_files,
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total_files, total_files - failed);
    }

    Ok(SummaryOutput {
        html,
        entries,
        stats,
    })
}

/// Summarise a folder and write the report directly to a file.
///
/// Uses an atomic write (temp file + rename) so the output path only ever
/// holds a complete document.
pub async fn summarise_to_file(
    folder: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<RunStats, Poster2HtmlError> {
    let output = summarise(folder, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Poster2HtmlError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, &output.html)
        .await
        .map_err(|e| Poster2HtmlError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Poster2HtmlError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`summarise`].
///
/// Creates a temporary tokio runtime internally.
pub fn summarise_sync(
    folder: impl AsRef<Path>,
    config: &SummaryConfig,
) -> Result<SummaryOutput, Poster2HtmlError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Poster2HtmlError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(summarise(folder, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run the per-image pipeline: read + encode → model call → normalise.
///
/// Always returns a `PosterEntry` — a failure at any step becomes the
/// `Failed` variant for this image only, never an error for the run.
async fn process_poster(
    provider: &Arc<dyn LLMProvider>,
    poster: &scan::ScannedPoster,
    config: &SummaryConfig,
) -> PosterEntry {
    let start = Instant::now();

    let image_data = match encode::encode_poster(&poster.path, &poster.file_name) {
        Ok(data) => data,
        Err(e) => {
            warn!("{e}");
            return failed_entry(poster, e, start);
        }
    };

    match llm::describe_poster(provider, &poster.file_name, image_data, config).await {
        Ok(reply) => {
            let summary = extract::normalise_response(&poster.stem, &reply.text);
            PosterEntry {
                image_path: poster.path.clone(),
                file_name: poster.file_name.clone(),
                summary,
                input_tokens: reply.input_tokens,
                output_tokens: reply.output_tokens,
                duration_ms: start.elapsed().as_millis() as u64,
            }
        }
        Err(e) => {
            warn!("{e}");
            failed_entry(poster, e, start)
        }
    }
}

fn failed_entry(
    poster: &scan::ScannedPoster,
    error: crate::error::PosterError,
    start: Instant,
) -> PosterEntry {
    PosterEntry {
        image_path: poster.path.clone(),
        file_name: poster.file_name.clone(),
        summary: PosterSummary::Failed(error),
        input_tokens: 0,
        output_tokens: 0,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Instantiate a named provider with the given model.
fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, Poster2HtmlError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        Poster2HtmlError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// The four-level fallback chain lets library users and CLI users each set
/// exactly as much or as little as they need:
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    and configured the provider entirely; we use it as-is.
///
/// 2. **Named provider + model** (`config.provider_name`) — the caller
///    named a provider (e.g. `"openai"`) and optional model; the factory
///    reads the matching API key from the environment.
///
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    both set means the execution environment (Makefile, CI) chose, so the
///    model choice is honoured even when multiple API keys are present.
///
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — the factory
///    scans the known API key variables and picks the first available
///    provider, with OpenAI preferred when its key is set.
fn resolve_provider(config: &SummaryConfig) -> Result<Arc<dyn LLMProvider>, Poster2HtmlError> {
    // 1) User-provided provider takes priority
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    // 2) Provider name + model
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_vision_provider(name, model);
    }

    // 3) Environment pair
    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_provider(&prov, &model);
        }
    }

    // Prefer OpenAI explicitly when an OpenAI API key is present, so users
    // with multiple provider keys get a deterministic default.
    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_vision_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| Poster2HtmlError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {e}"
            ),
        })?;

    Ok(llm_provider)
}
