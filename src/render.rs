//! Print-document assembly.
//!
//! The admin UI opens a popup window, hands us the hrefs of the
//! stylesheets it wants cloned into it, and writes the returned document
//! before invoking the platform print dialog. The daemon only builds the
//! HTML; window management stays with the UI.

use crate::report::ReportPayload;

pub const FALLBACK_STYLESHEET: &str = "https://cdn.tailwindcss.com";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn fmt_points(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

/// Builds the full HTML document for one printable report. Stylesheet
/// hrefs are emitted in order, followed by the fallback reference so the
/// popup still renders when the cloned styles fail to load.
pub fn print_document(
    payload: &ReportPayload,
    stylesheets: &[String],
    fallback_stylesheet: &str,
) -> String {
    let mut html = String::new();
    html.push_str("<html><head><title>Print Result</title>");
    for href in stylesheets {
        html.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape(href)
        ));
    }
    html.push_str(&format!(
        "<script src=\"{}\"></script>",
        escape(fallback_stylesheet)
    ));
    html.push_str("</head><body><div id=\"print-root\">");

    html.push_str("<div class=\"report-header\">");
    html.push_str(&format!(
        "<img src=\"{}\" alt=\"{}\">",
        escape(&payload.school_logo_url),
        escape(&payload.school_name)
    ));
    html.push_str(&format!("<h1>{}</h1>", escape(&payload.school_name)));
    html.push_str(&format!("<h2>{}</h2>", escape(&payload.exam_title)));
    html.push_str("</div>");

    let c = &payload.candidate;
    html.push_str("<dl class=\"candidate\">");
    html.push_str(&format!("<dt>Name</dt><dd>{}</dd>", escape(&c.name)));
    html.push_str(&format!(
        "<dt>Student ID</dt><dd>{}</dd>",
        escape(&c.student_id)
    ));
    html.push_str(&format!(
        "<dt>Class</dt><dd>{}</dd>",
        escape(&c.grade_level)
    ));
    html.push_str(&format!("<dt>Date</dt><dd>{}</dd>", escape(&c.date)));
    html.push_str("</dl>");

    let o = &payload.overall_result;
    html.push_str(&format!(
        "<p class=\"overall\">Score: {}/{} ({:.1}%) &mdash; Time: {} min &mdash; <strong class=\"status-{}\">{}</strong></p>",
        fmt_points(o.score),
        fmt_points(o.total),
        o.percentage,
        o.time_taken_minutes,
        o.status.to_lowercase(),
        escape(&o.status)
    ));

    html.push_str("<table class=\"breakdown\"><thead><tr><th>Subject</th><th>Questions</th><th>Correct</th><th>Percentage</th></tr></thead><tbody>");
    for row in &payload.subject_breakdown {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td></tr>",
            escape(&row.subject),
            row.questions,
            row.correct,
            row.percentage
        ));
    }
    html.push_str("</tbody></table>");

    html.push_str("</div></body></html>");
    html
}
