//! The instruction prompt sent with each poster image.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking the requested fields or the
//!    output rules means editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompt directly without
//!    calling a real model, so prompt regressions are easy to catch.
//!
//! Callers can override it via [`crate::config::SummaryConfig::system_prompt`];
//! the constant here is used only when no override is provided.

/// Default instruction prompt for extracting structured poster information.
///
/// The model is asked for a bare JSON object; the normaliser in
/// [`crate::pipeline::extract`] copes with models that wrap it in fences or
/// prose anyway.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert reader of academic conference posters. Extract the following information from the poster image and return it as a single JSON object:

{
  "title": "The main title of the poster",
  "authors": "List of authors and their affiliations",
  "research_question": "The key research question or objective",
  "methods": "The methodologies used in the research",
  "results": "The key findings of the research",
  "conclusions": "The main conclusions and implications"
}

Rules:
- Keep each field concise but informative.
- If a field is not clearly visible on the poster, write "Not specified in poster".
- Output ONLY the JSON object. Do not wrap it in ```json fences and do not add commentary."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_all_six_fields() {
        for key in [
            "title",
            "authors",
            "research_question",
            "methods",
            "results",
            "conclusions",
        ] {
            assert!(
                DEFAULT_SYSTEM_PROMPT.contains(&format!("\"{key}\"")),
                "prompt is missing field {key}"
            );
        }
    }

    #[test]
    fn prompt_asks_for_bare_json() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("ONLY the JSON object"));
    }
}
