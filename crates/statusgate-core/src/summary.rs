//! Markdown summary tables for a source evaluation.

use crate::evaluate::SourceEvaluation;
use crate::status::SourceKind;

/// Render one source as a Markdown section with a `Name | Status` table.
pub fn render_summary(evaluation: &SourceEvaluation) -> String {
    let mut md = format!(
        "### {} ({})\n\n",
        heading(evaluation),
        evaluation.aggregate
    );

    if evaluation.entries.is_empty() {
        md.push_str("_No reports._\n");
        return md;
    }

    md.push_str("| Name | Status |\n");
    md.push_str("| --- | --- |\n");
    for entry in &evaluation.entries {
        let name = escape_cell(entry.key.name());
        let status = match &entry.url {
            Some(url) if !url.is_empty() => format!("[{}]({})", entry.status, url),
            _ => entry.status.to_string(),
        };
        md.push_str(&format!("| {} | {} |\n", name, status));
    }

    md
}

fn heading(evaluation: &SourceEvaluation) -> &'static str {
    match evaluation.source {
        SourceKind::Statuses => "Commit statuses",
        SourceKind::Checks => "Check runs",
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
