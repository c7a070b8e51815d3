//! VLM interaction: build the vision message and call the provider.
//!
//! This module converts an encoded poster image into one model call and
//! returns the raw response text. It is intentionally thin — the prompt
//! lives in [`crate::prompts`] and response interpretation lives in
//! [`crate::pipeline::extract`], so this stage owns only the wire call.
//!
//! Each poster gets exactly one call. A failure is mapped to a per-image
//! [`PosterError`] and the batch moves on; nothing here can abort the run.

use crate::config::SummaryConfig;
use crate::error::PosterError;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// What one model call produced.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// The model's free-form response text.
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub duration_ms: u64,
}

/// Ask the model to describe one poster.
///
/// ## Message Layout
///
/// The request contains (in order):
/// 1. **System message** — the six-field extraction prompt (or the
///    user-supplied override)
/// 2. **User message** — the poster image as a base64 attachment (empty
///    text)
///
/// The empty user text is intentional: VLM APIs require at least one user
/// turn to respond to, but the image carries all the actual content.
pub async fn describe_poster(
    provider: &Arc<dyn LLMProvider>,
    file_name: &str,
    image_data: ImageData,
    config: &SummaryConfig,
) -> Result<ModelReply, PosterError> {
    let start = Instant::now();
    let system_prompt = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let messages = vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user_with_images("", vec![image_data]),
    ];

    let options = build_options(config);

    match provider.chat(&messages, Some(&options)).await {
        Ok(response) => {
            let duration = start.elapsed();
            debug!(
                "{file_name}: {} input tokens, {} output tokens, {:?}",
                response.prompt_tokens, response.completion_tokens, duration
            );
            Ok(ModelReply {
                text: response.content,
                input_tokens: response.prompt_tokens as u64,
                output_tokens: response.completion_tokens as u64,
                duration_ms: duration.as_millis() as u64,
            })
        }
        Err(e) => Err(PosterError::LlmFailed {
            file: file_name.to_string(),
            detail: format!("{e}"),
        }),
    }
}

/// Build `CompletionOptions` from the summary config.
fn build_options(config: &SummaryConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}
