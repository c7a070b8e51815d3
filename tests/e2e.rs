//! End-to-end tests for poster2html.
//!
//! The report pipeline downstream of the model call is deterministic, so
//! most scenarios here run offline: they feed canned model responses
//! through the normaliser and assembler and check the resulting document.
//!
//! Tests that make live VLM API calls are gated behind the `E2E_ENABLED`
//! environment variable so they do not run in CI unless explicitly
//! requested:
//!
//!   E2E_ENABLED=1 OPENAI_API_KEY=sk-... cargo test --test e2e -- --nocapture

use poster2html::pipeline::{extract, render, scan};
use poster2html::{summarise, Poster2HtmlError, PosterEntry, PosterSummary, SummaryConfig};
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Write a tiny but valid PNG so the encode stage accepts the file.
fn write_poster_png(dir: &Path, name: &str) -> PathBuf {
    use image::{DynamicImage, Rgba, RgbaImage};
    use std::io::Cursor;

    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([200, 200, 255, 255])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let path = dir.join(name);
    std::fs::write(&path, &buf).unwrap();
    path
}

/// Build the entry the pipeline would produce for `file_name` given a
/// canned model response.
fn entry_for_response(dir: &Path, file_name: &str, response: &str) -> PosterEntry {
    let stem = file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(file_name);
    PosterEntry {
        image_path: dir.join(file_name),
        file_name: file_name.to_string(),
        summary: extract::normalise_response(stem, response),
        input_tokens: 0,
        output_tokens: 0,
        duration_ms: 0,
    }
}

const STRUCTURED_RESPONSE: &str = r#"```json
{
  "title": "Gut Microbiome Diversity in Alpine Marmots",
  "authors": "L. Marmota, R. Alpina (Institute of Alpine Biology)",
  "research_question": "Does hibernation reshape the gut microbiome?",
  "methods": "16S rRNA sequencing across three seasons.",
  "results": "Diversity drops 40% during hibernation.",
  "conclusions": "Seasonal sampling is essential for microbiome studies."
}
```"#;

// ── Scenario: structured response ────────────────────────────────────────────

#[test]
fn structured_response_produces_full_entry_block() {
    let dir = tempfile::tempdir().unwrap();
    write_poster_png(dir.path(), "poster1.png");

    let entry = entry_for_response(dir.path(), "poster1.png", STRUCTURED_RESPONSE);
    assert!(entry.summary.is_structured());

    let html = render::assemble_report(std::slice::from_ref(&entry), "Conference Poster Summaries");
    assert!(html.contains("<h2>Gut Microbiome Diversity in Alpine Marmots</h2>"));
    assert!(html.contains("L. Marmota, R. Alpina"));
    for section in ["Research Question / Objective", "Methods", "Results", "Conclusions"] {
        assert!(html.contains(section), "missing section: {section}");
    }
    assert!(html.contains("Diversity drops 40% during hibernation."));
}

// ── Scenario: prose-only response ────────────────────────────────────────────

#[test]
fn prose_response_falls_back_to_summary_section() {
    let dir = tempfile::tempdir().unwrap();
    let prose = "The poster appears to discuss marmots but no structured data is visible.";
    let entry = entry_for_response(dir.path(), "poster1.png", prose);

    match &entry.summary {
        PosterSummary::Raw(raw) => {
            assert_eq!(raw.title, "poster1");
            assert_eq!(raw.body_text, prose);
        }
        other => panic!("expected raw fallback, got {other:?}"),
    }

    let html = render::assemble_report(&[entry], "Conference Poster Summaries");
    assert!(html.contains("<h2>poster1</h2>"));
    assert!(html.contains(">Summary</div>"));
    assert!(html.contains(prose));
    assert!(!html.contains("Research Question / Objective"));
}

// ── Scenario: per-poster failure does not lose the rest of the batch ─────────

#[test]
fn failed_poster_is_reported_and_batch_continues() {
    let dir = tempfile::tempdir().unwrap();
    let ok = entry_for_response(dir.path(), "a.jpg", STRUCTURED_RESPONSE);
    let failed = PosterEntry {
        image_path: dir.path().join("b.png"),
        file_name: "b.png".to_string(),
        summary: PosterSummary::Failed(poster2html::PosterError::LlmFailed {
            file: "b.png".to_string(),
            detail: "simulated network error".to_string(),
        }),
        input_tokens: 0,
        output_tokens: 0,
        duration_ms: 0,
    };

    let html = render::assemble_report(&[ok, failed], "Conference Poster Summaries");
    assert!(html.contains("<h2>Error processing b.png</h2>"));
    assert!(html.contains("simulated network error"));
    // The healthy entry is still fully present.
    assert!(html.contains("<h2>Gut Microbiome Diversity in Alpine Marmots</h2>"));
}

// ── Scenario: report order follows filename order ────────────────────────────

#[test]
fn entries_render_in_lexicographic_filename_order() {
    let dir = tempfile::tempdir().unwrap();
    // Created out of order on purpose; the scan sorts.
    write_poster_png(dir.path(), "b.png");
    write_poster_png(dir.path(), "a.jpg");

    let posters = scan::scan_folder(dir.path()).unwrap();
    let names: Vec<&str> = posters.iter().map(|p| p.file_name.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "b.png"]);

    let entries: Vec<PosterEntry> = posters
        .iter()
        .map(|p| {
            entry_for_response(
                dir.path(),
                &p.file_name,
                &format!("{{\"title\": \"Poster {}\"}}", p.stem),
            )
        })
        .collect();

    let html = render::assemble_report(&entries, "Conference Poster Summaries");
    let first = html.find("<h2>Poster a</h2>").expect("a.jpg entry missing");
    let second = html.find("<h2>Poster b</h2>").expect("b.png entry missing");
    assert!(first < second, "a.jpg must render before b.png");
}

// ── Escaping: model text can never inject markup ─────────────────────────────

#[test]
fn model_markup_never_reaches_the_report_raw() {
    let dir = tempfile::tempdir().unwrap();
    let hostile = r#"{"title": "<img src=x onerror=alert(1)>", "methods": "a & b < c"}"#;
    let entry = entry_for_response(dir.path(), "poster1.png", hostile);

    let html = render::assemble_report(&[entry], "Conference Poster Summaries");
    assert!(!html.contains("<img src=x"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    assert!(html.contains("a &amp; b &lt; c"));
}

// ── Fatal precondition: missing folder ───────────────────────────────────────

#[tokio::test]
async fn missing_folder_aborts_before_any_processing() {
    // The scan runs before provider resolution, so no API key is needed to
    // observe the fatal error.
    let err = summarise("/definitely/not/a/real/folder", &SummaryConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Poster2HtmlError::FolderNotFound { .. }));
}

#[tokio::test]
async fn empty_folder_yields_header_only_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = summarise(dir.path(), &SummaryConfig::default())
        .await
        .expect("empty folder must not be fatal");

    assert_eq!(output.stats.total_files, 0);
    assert!(output.entries.is_empty());
    assert!(output.html.starts_with("<!DOCTYPE html>"));
    assert!(output.html.ends_with("</html>"));
    assert!(!output.html.contains("poster-entry\">"));
}

// ── Live e2e (needs an API key) ──────────────────────────────────────────────

fn e2e_enabled() -> bool {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run live e2e tests");
        return false;
    }
    true
}

/// Summarise one real (tiny, synthetic) image through a live provider.
///
/// Whatever the model says about a 16×16 blue square, the pipeline must
/// produce exactly one non-failed entry and a well-formed document.
#[tokio::test]
async fn live_summarise_single_image() {
    if !e2e_enabled() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    write_poster_png(dir.path(), "poster1.png");

    let config = SummaryConfig::builder()
        .max_tokens(512)
        .build()
        .expect("valid config");

    let output = summarise(dir.path(), &config)
        .await
        .expect("live summarisation should succeed");

    assert_eq!(output.stats.total_files, 1);
    assert_eq!(output.stats.failed, 0, "a readable PNG must not fail");
    assert_eq!(output.entries.len(), 1);
    assert!(output.stats.total_input_tokens > 0, "should have consumed tokens");
    assert!(output.html.contains("poster-entry"));

    println!(
        "[live] structured={} fallback={} ({} in / {} out tokens)",
        output.stats.structured,
        output.stats.fallback,
        output.stats.total_input_tokens,
        output.stats.total_output_tokens
    );
}

/// Live check of the file-writing entry point and its atomic rename.
#[tokio::test]
async fn live_summarise_to_file_writes_complete_document() {
    if !e2e_enabled() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    write_poster_png(dir.path(), "poster1.png");
    let out_path = dir.path().join("report.html");

    let config = SummaryConfig::builder()
        .max_tokens(512)
        .report_title("E2E Test Report")
        .build()
        .expect("valid config");

    let stats = poster2html::summarise_to_file(dir.path(), &out_path, &config)
        .await
        .expect("live summarise_to_file should succeed");

    assert_eq!(stats.total_files, 1);
    let html = std::fs::read_to_string(&out_path).expect("output file must exist");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.ends_with("</html>"));
    assert!(html.contains("E2E Test Report"));
    assert!(
        !out_path.with_extension("html.tmp").exists(),
        "temp file must be renamed away"
    );

    println!("[live] report written to {}", out_path.display());
}
