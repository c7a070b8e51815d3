//! Report assembly: entries → one static HTML document.
//!
//! The document is a fixed header (title, inline styles, a small script
//! that adds a hover hint to the thumbnails), one block per poster in input
//! order, and a fixed footer. All three entry variants emit the same
//! `poster-entry` wrapper and thumbnail markup so the styling is uniform
//! regardless of how well a given poster was processed.
//!
//! Rendering is deterministic: the same entry always produces the same
//! bytes. Nothing model-derived reaches the document unescaped — record
//! and fallback text is escaped at extraction time, and everything this
//! module derives itself (paths, filenames, error messages) is escaped
//! here.

use crate::output::{PosterEntry, PosterSummary};

/// Escape text for embedding in HTML, neutralising `&`, `<`, `>`, and both
/// quote characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// The static document header, with the report title in `<title>` and `<h1>`.
pub fn html_header(report_title: &str) -> String {
    let title = escape_html(report_title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script>
        // Add a hover hint so users know thumbnails open full size.
        document.addEventListener('DOMContentLoaded', function() {{
            const thumbnails = document.querySelectorAll('.thumbnail');
            thumbnails.forEach(img => {{
                img.title = "Click to view full size image in a new tab";
            }});
        }});
    </script>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 960px;
            margin: 20px auto;
            padding: 0 20px;
            background-color: #f9f9f9;
        }}
        h1, h2, h3 {{
            color: #2c3e50;
        }}
        h1 {{
            text-align: center;
            border-bottom: 2px solid #eaeaea;
            padding-bottom: 10px;
        }}
        .poster-entry {{
            background-color: #ffffff;
            border: 1px solid #dddddd;
            border-radius: 8px;
            padding: 25px;
            margin-bottom: 30px;
            box-shadow: 0 4px 8px rgba(0,0,0,0.05);
        }}
        .thumbnail {{
            max-width: 300px;
            height: auto;
            border-radius: 4px;
            margin-bottom: 15px;
            cursor: pointer;
            transition: transform 0.3s;
        }}
        .thumbnail:hover {{
            transform: scale(1.05);
        }}
        .authors {{
            color: #666;
            font-style: italic;
            margin-bottom: 15px;
        }}
        .section {{
            margin-top: 20px;
        }}
        .section-title {{
            font-weight: bold;
            color: #2c3e50;
            margin-bottom: 5px;
        }}
        p {{
            white-space: pre-wrap;
        }}
    </style>
</head>
<body>
    <h1>{title}</h1>
"#
    )
}

/// The static document footer.
pub const HTML_FOOTER: &str = "\n</body>\n</html>";

/// Render one report entry.
///
/// All variants share the outer wrapper and thumbnail; they differ only in
/// heading, authors line, and body sections.
pub fn render_entry(entry: &PosterEntry) -> String {
    let path = escape_html(&entry.image_path.display().to_string());
    let mut html = String::with_capacity(1024);
    html.push_str("    <div class=\"poster-entry\">\n");

    match &entry.summary {
        PosterSummary::Structured(rec) => {
            push_heading(&mut html, &rec.title, &rec.authors);
            push_thumbnail(&mut html, &path, &format!("Poster image: {}", rec.title));
            push_section(&mut html, "Research Question / Objective", &rec.research_question);
            push_section(&mut html, "Methods", &rec.methods);
            push_section(&mut html, "Results", &rec.results);
            push_section(&mut html, "Conclusions", &rec.conclusions);
        }
        PosterSummary::Raw(raw) => {
            push_heading(&mut html, &raw.title, &raw.authors);
            push_thumbnail(&mut html, &path, &format!("Poster image: {}", raw.title));
            push_section(&mut html, "Summary", &raw.body_text);
        }
        PosterSummary::Failed(err) => {
            let heading = format!("Error processing {}", escape_html(&entry.file_name));
            push_heading(&mut html, &heading, "Could not process this poster");
            push_thumbnail(&mut html, &path, "Error processing poster");
            html.push_str(&format!("        <p>{}</p>\n", escape_html(&err.to_string())));
        }
    }

    html.push_str("    </div>\n");
    html
}

/// Assemble the complete report from header, entries, and footer.
pub fn assemble_report(entries: &[PosterEntry], report_title: &str) -> String {
    let mut html = html_header(report_title);
    for entry in entries {
        html.push_str(&render_entry(entry));
    }
    html.push_str(HTML_FOOTER);
    html
}

// ── Block helpers ────────────────────────────────────────────────────────

fn push_heading(html: &mut String, title: &str, authors: &str) {
    html.push_str(&format!("        <h2>{title}</h2>\n"));
    html.push_str(&format!("        <div class=\"authors\">{authors}</div>\n"));
}

fn push_thumbnail(html: &mut String, escaped_path: &str, alt: &str) {
    html.push_str(&format!(
        "        <a href=\"{escaped_path}\" target=\"_blank\">\n"
    ));
    html.push_str(&format!(
        "            <img class=\"thumbnail\" src=\"{escaped_path}\" alt=\"{alt}\">\n"
    ));
    html.push_str("        </a>\n");
}

fn push_section(html: &mut String, section_title: &str, body: &str) {
    html.push_str("        <div class=\"section\">\n");
    html.push_str(&format!(
        "            <div class=\"section-title\">{section_title}</div>\n"
    ));
    html.push_str(&format!("            <p>{body}</p>\n"));
    html.push_str("        </div>\n");
}
