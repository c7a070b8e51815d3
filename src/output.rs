//! Output types: what one run of the summariser produces.
//!
//! The central type is [`PosterSummary`], a tagged union over the three
//! things that can come out of processing one image: a structured record,
//! a raw-text fallback, or a per-image failure. Making the three outcomes
//! one enum keeps the report renderer's dispatch total — every entry is
//! exactly one of the variants, and the compiler checks that each is
//! handled.
//!
//! All types serialise with serde so the CLI's `--json` mode can dump the
//! full run result for downstream tooling.

use crate::error::PosterError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Structured information extracted from one poster.
///
/// Every field is always present. When the decoded object is missing a key,
/// the field holds a sentinel (`"Untitled Poster"`, `"Unknown Authors"`) or
/// the empty string — never an absent value. Field text is HTML-escaped at
/// construction time, so it can be embedded in the report verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterRecord {
    pub title: String,
    pub authors: String,
    pub research_question: String,
    pub methods: String,
    pub results: String,
    pub conclusions: String,
}

/// Fallback when the model response contained no decodable object.
///
/// The full response text is kept so nothing the model said is lost; the
/// report shows it as a single "Summary" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFallback {
    /// Derived from the image filename (extension stripped), escaped.
    pub title: String,
    /// Fixed placeholder.
    pub authors: String,
    /// The whole model response, escaped but otherwise verbatim.
    pub body_text: String,
}

/// The outcome of processing one poster image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PosterSummary {
    /// The response decoded to a JSON object; fields were extracted.
    Structured(PosterRecord),
    /// No decode attempt succeeded; the raw response is carried instead.
    Raw(RawFallback),
    /// The image read or the model call itself failed.
    Failed(PosterError),
}

impl PosterSummary {
    pub fn is_structured(&self) -> bool {
        matches!(self, PosterSummary::Structured(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PosterSummary::Failed(_))
    }
}

/// One report entry: an input image plus its processing outcome.
///
/// Built once per file in directory-listing order and never mutated; the
/// assembler renders each entry exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterEntry {
    /// Path used for the thumbnail link in the report.
    pub image_path: PathBuf,
    /// Bare filename, used in log lines and error headings.
    pub file_name: String,
    pub summary: PosterSummary,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Wall-clock time spent on this image (read + model call + normalise).
    pub duration_ms: u64,
}

/// Aggregate statistics for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Image files found in the folder.
    pub total_files: usize,
    /// Entries that decoded to a structured record.
    pub structured: usize,
    /// Entries that fell back to raw response text.
    pub fallback: usize,
    /// Entries whose image read or model call failed.
    pub failed: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_duration_ms: u64,
    /// Portion of the total spent inside model calls.
    pub llm_duration_ms: u64,
}

/// Complete result of one summarisation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// The assembled report document.
    pub html: String,
    /// Per-image entries in report order.
    pub entries: Vec<PosterEntry>,
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_variant_predicates() {
        let s = PosterSummary::Structured(PosterRecord {
            title: "T".into(),
            authors: "A".into(),
            research_question: String::new(),
            methods: String::new(),
            results: String::new(),
            conclusions: String::new(),
        });
        assert!(s.is_structured());
        assert!(!s.is_failed());

        let f = PosterSummary::Failed(PosterError::ReadFailed {
            file: "x.png".into(),
            detail: "gone".into(),
        });
        assert!(f.is_failed());
    }

    #[test]
    fn summary_json_tagging() {
        let raw = PosterSummary::Raw(RawFallback {
            title: "poster1".into(),
            authors: "Unknown Authors".into(),
            body_text: "free text".into(),
        });
        let json = serde_json::to_string(&raw).unwrap();
        assert!(json.contains("\"kind\":\"raw\""), "got: {json}");

        let back: PosterSummary = serde_json::from_str(&json).unwrap();
        match back {
            PosterSummary::Raw(r) => assert_eq!(r.title, "poster1"),
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn output_round_trips_through_json() {
        let out = SummaryOutput {
            html: "<html></html>".into(),
            entries: vec![PosterEntry {
                image_path: PathBuf::from("/p/a.jpg"),
                file_name: "a.jpg".into(),
                summary: PosterSummary::Raw(RawFallback {
                    title: "a".into(),
                    authors: "Unknown Authors".into(),
                    body_text: "text".into(),
                }),
                input_tokens: 10,
                output_tokens: 20,
                duration_ms: 5,
            }],
            stats: RunStats {
                total_files: 1,
                fallback: 1,
                total_input_tokens: 10,
                total_output_tokens: 20,
                ..RunStats::default()
            },
        };
        let json = serde_json::to_string_pretty(&out).unwrap();
        let back: SummaryOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries.len(), 1);
        assert_eq!(back.stats.total_files, 1);
    }
}
