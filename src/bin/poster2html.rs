//! CLI binary for poster2html.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SummaryConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use poster2html::{
    summarise, summarise_to_file, SummaryConfig, SummaryProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a progress bar anchored at the bottom plus a
/// log line per poster. Posters are processed one at a time, so lines
/// always arrive in file order.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Wall-clock start of the poster currently in flight.
    current_start: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Scanning folder…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            current_start: Mutex::new(None),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.current_start
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl SummaryProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_files: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} posters  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_files as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Summarising");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_files} poster images…"))
        ));
    }

    fn on_poster_start(&self, _index: usize, _total: usize, file_name: &str) {
        *self.current_start.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(file_name.to_string());
    }

    fn on_poster_complete(&self, index: usize, total: usize, file_name: &str, structured: bool) {
        let note = if structured {
            dim("structured")
        } else {
            yellow("raw text")
        };
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<32}  {}  {}",
            green("✓"),
            index,
            total,
            file_name,
            note,
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_poster_error(&self, index: usize, total: usize, file_name: &str, error: String) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<32}  {}  {}",
            red("✗"),
            index,
            total,
            file_name,
            red(&msg),
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_files: usize, succeeded: usize) {
        let failed = total_files.saturating_sub(succeeded);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} posters summarised successfully",
                green("✔"),
                bold(&succeeded.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} posters summarised  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&succeeded.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise a folder into the default poster_summary.html
  poster2html ./conference_photos

  # Name the output file (".html" is appended if missing)
  poster2html ./conference_photos -o neurips2025

  # Use a specific model
  poster2html --provider openai --model gpt-4.1-mini ./photos -o report.html

  # Custom report heading
  poster2html --title "NeurIPS 2025 — Poster Session B" ./photos

  # Full structured result as JSON on stdout
  poster2html --json ./photos > run.json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID

SETUP:
  1. Set API key:     export OPENAI_API_KEY=sk-...
  2. Summarise:       poster2html ./poster_photos -o summary.html

Accepted image files: .png .jpg .jpeg .heic (case-insensitive). Files are
processed one at a time in filename order; a poster the model cannot handle
gets an error entry in the report and the run continues.
"#;

/// Summarise folders of conference poster photos into a static HTML report.
#[derive(Parser, Debug)]
#[command(
    name = "poster2html",
    version,
    about = "Summarise conference poster photos into a static HTML report using Vision LLMs",
    long_about = "Scan a folder of poster photographs, extract title, authors, research \
question, methods, results, and conclusions from each via a Vision Language Model, and \
assemble everything into one browsable HTML page with clickable thumbnails.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the poster photos.
    folder: PathBuf,

    /// Output HTML file. ".html" is appended when missing.
    #[arg(short, long, env = "POSTER2HTML_OUTPUT", default_value = "poster_summary.html")]
    output: PathBuf,

    /// LLM model ID (e.g. gpt-4.1-nano, gemini-2.0-flash).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// Report heading and <title>.
    #[arg(long, env = "POSTER2HTML_TITLE")]
    title: Option<String>,

    /// Path to a text file containing a custom instruction prompt.
    #[arg(long, env = "POSTER2HTML_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Max LLM output tokens per poster.
    #[arg(long, env = "POSTER2HTML_MAX_TOKENS", default_value_t = 1024)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "POSTER2HTML_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Print the structured run result (SummaryOutput) as JSON to stdout
    /// instead of writing the HTML file.
    #[arg(long, env = "POSTER2HTML_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "POSTER2HTML_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "POSTER2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "POSTER2HTML_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli, show_progress).await?;

    // ── Run ──────────────────────────────────────────────────────────────
    if cli.json {
        let output = summarise(&cli.folder, &config)
            .await
            .context("Summarisation failed")?;
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    let output_path = ensure_html_extension(cli.output.clone());
    let stats = summarise_to_file(&cli.folder, &output_path, &config)
        .await
        .context("Summarisation failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} posters  {}ms  →  {}",
            if stats.failed == 0 { green("✔") } else { cyan("⚠") },
            stats.total_files - stats.failed,
            stats.total_files,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        if stats.fallback > 0 {
            eprintln!(
                "   {} responses kept as raw text (no structured data found)",
                yellow(&stats.fallback.to_string())
            );
        }
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&stats.total_input_tokens.to_string()),
            dim(&stats.total_output_tokens.to_string()),
        );
        eprintln!("Open {} in your browser to view the summaries.", output_path.display());
    }

    Ok(())
}

/// Map CLI args to `SummaryConfig`.
async fn build_config(cli: &Cli, show_progress: bool) -> Result<SummaryConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {path:?}"))?,
        )
    } else {
        None
    };

    let mut builder = SummaryConfig::builder()
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature);

    if let Some(ref title) = cli.title {
        builder = builder.report_title(title.clone());
    }
    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as Arc<dyn SummaryProgressCallback>);
    }

    let mut config = builder.build().context("Invalid configuration")?;

    // Fields the builder doesn't need dedicated handling for.
    config.model = cli.model.clone();
    config.provider_name = cli.provider.clone();
    config.system_prompt = system_prompt;

    Ok(config)
}

/// Append ".html" when the user-supplied name lacks it (case-insensitive).
fn ensure_html_extension(path: PathBuf) -> PathBuf {
    let has_html = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_ascii_lowercase().ends_with(".html"))
        .unwrap_or(false);
    if has_html {
        path
    } else {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".html");
        path.with_file_name(name)
    }
}
