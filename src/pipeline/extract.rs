//! Response normalisation: free-form model text → structured record.
//!
//! ## Why is this stage necessary?
//!
//! Even well-prompted VLMs are not guaranteed to return the bare JSON
//! object they were asked for. In practice the object arrives:
//!
//! - wrapped in a ` ```json ... ``` ` fence despite the prompt saying not to
//! - wrapped in an untagged ` ``` ... ``` ` fence
//! - buried in surrounding prose ("Here is the extracted information: {…}")
//! - or, on a good day, as the bare object
//!
//! The normaliser tries those shapes in order and the first candidate that
//! decodes to a JSON **object** wins — even when the object carries none of
//! the expected keys. A parsed-but-sparse record beats an unparsed one:
//! missing keys just become sentinel values. Only when every attempt fails
//! does the entry degrade to [`RawFallback`], which keeps the full response
//! text so nothing the model said is lost.
//!
//! This is a pure transformation. Decode errors are swallowed here and
//! surface only as the fallback variant, never as a run failure.

use crate::output::{PosterRecord, PosterSummary, RawFallback};
use crate::pipeline::render::escape_html;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

/// Sentinel title when the decoded object has no `title` key.
pub const UNTITLED_POSTER: &str = "Untitled Poster";
/// Placeholder authors line, also used by the raw fallback.
pub const UNKNOWN_AUTHORS: &str = "Unknown Authors";

static RE_TAGGED_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());
static RE_ANY_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```\s*(.*?)\s*```").unwrap());
// Greedy: first `{` to last `}`. A response holding two objects produces a
// candidate spanning both, which fails to decode and cascades onward.
static RE_BRACE_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Convert one model response into a structured record, or fall back to the
/// raw text.
///
/// `stem` is the image filename without its extension; it becomes the entry
/// title when no decode attempt succeeds.
pub fn normalise_response(stem: &str, response_text: &str) -> PosterSummary {
    for candidate in candidates(response_text) {
        if let Some(object) = decode_object(candidate) {
            return PosterSummary::Structured(record_from_object(&object));
        }
    }

    debug!("no decodable object in response, keeping raw text");
    PosterSummary::Raw(RawFallback {
        title: escape_html(stem),
        authors: UNKNOWN_AUTHORS.to_string(),
        body_text: escape_html(response_text),
    })
}

/// Candidate substrings to decode, in priority order: tagged fence, any
/// fence, greedy brace span, the trimmed whole input.
fn candidates(text: &str) -> Vec<&str> {
    let mut out = Vec::with_capacity(4);
    if let Some(m) = RE_TAGGED_FENCE.captures(text).and_then(|c| c.get(1)) {
        out.push(m.as_str());
    }
    if let Some(m) = RE_ANY_FENCE.captures(text).and_then(|c| c.get(1)) {
        out.push(m.as_str());
    }
    if let Some(m) = RE_BRACE_OBJECT.find(text) {
        out.push(m.as_str());
    }
    out.push(text.trim());
    out
}

/// Decode a candidate, keeping it only if it is a JSON object.
///
/// Arrays, strings, and numbers are valid JSON but carry no named fields,
/// so they do not count as a successful decode.
fn decode_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Build the record from a decoded object. Missing or null keys become
/// sentinels; every field is escaped for embedding in the report.
fn record_from_object(object: &Map<String, Value>) -> PosterRecord {
    PosterRecord {
        title: field(object, "title", UNTITLED_POSTER),
        authors: field(object, "authors", UNKNOWN_AUTHORS),
        research_question: field(object, "research_question", ""),
        methods: field(object, "methods", ""),
        results: field(object, "results", ""),
        conclusions: field(object, "conclusions", ""),
    }
}

fn field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => escape_html(s),
        // A model occasionally returns a number or a nested list (e.g.
        // authors as an array); keep it as compact JSON text.
        Some(other) => escape_html(&other.to_string()),
    }
}
