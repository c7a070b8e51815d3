//! Configuration types for poster summarisation.
//!
//! All behaviour is controlled through [`SummaryConfig`], built via its
//! [`SummaryConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config between the library and the CLI, serialise it
//! for logging, and diff two runs to understand why their reports differ.

use crate::error::Poster2HtmlError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Title used for the report when none is configured.
pub const DEFAULT_REPORT_TITLE: &str = "Conference Poster Summaries";

/// Configuration for a poster-folder summarisation run.
///
/// Built via [`SummaryConfig::builder()`] or using
/// [`SummaryConfig::default()`].
///
/// # Example
/// ```rust
/// use poster2html::SummaryConfig;
///
/// let config = SummaryConfig::builder()
///     .model("gpt-4.1-nano")
///     .max_tokens(1024)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// LLM model identifier, e.g. "gpt-4.1-nano", "gemini-2.0-flash".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "gemini").
    /// If None along with `provider`, the provider is auto-detected from
    /// the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature for the model completion. Default: 0.2.
    ///
    /// Low temperature keeps the model faithful to what is printed on the
    /// poster rather than inventive about it.
    pub temperature: f32,

    /// Maximum tokens the model may generate per poster. Default: 1024.
    ///
    /// Six concise fields fit comfortably; setting this too low truncates
    /// the JSON object mid-string, which forces the raw-text fallback.
    pub max_tokens: usize,

    /// Custom instruction prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Heading and `<title>` of the generated report.
    /// Default: [`DEFAULT_REPORT_TITLE`].
    pub report_title: String,

    /// Per-file progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.2,
            max_tokens: 1024,
            system_prompt: None,
            report_title: DEFAULT_REPORT_TITLE.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("system_prompt", &self.system_prompt.as_ref().map(|_| "<custom>"))
            .field("report_title", &self.report_title)
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummaryConfig`].
#[derive(Debug)]
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn report_title(mut self, title: impl Into<String>) -> Self {
        self.config.report_title = title.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, Poster2HtmlError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(Poster2HtmlError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.report_title.trim().is_empty() {
            return Err(Poster2HtmlError::InvalidConfig(
                "report_title must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = SummaryConfig::default();
        assert_eq!(c.temperature, 0.2);
        assert_eq!(c.max_tokens, 1024);
        assert_eq!(c.report_title, DEFAULT_REPORT_TITLE);
        assert!(c.model.is_none());
        assert!(c.provider.is_none());
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = SummaryConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = SummaryConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn builder_rejects_zero_max_tokens() {
        let err = SummaryConfig::builder().max_tokens(0).build().unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn builder_rejects_blank_title() {
        let err = SummaryConfig::builder()
            .report_title("   ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("report_title"));
    }

    #[test]
    fn debug_does_not_leak_prompt() {
        let c = SummaryConfig::builder()
            .system_prompt("secret instructions")
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret instructions"));
        assert!(dbg.contains("<custom>"));
    }
}
