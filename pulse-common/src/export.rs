//! CSV export
//!
//! Percentages are recomputed from the raw triad coordinates rather than read
//! from the stored `analysis` block, so every row reflects the current
//! transform even for records written by an older version.

use chrono::NaiveDate;

use crate::submission::Submission;
use crate::triad;

/// Header row, in column order
pub const CSV_HEADERS: [&str; 14] = [
    "Timestamp",
    "Name",
    "Narrative",
    "Value X",
    "Value Y",
    "Container %",
    "Network %",
    "Launchpad %",
    "Identity X",
    "Identity Y",
    "Sanctuary %",
    "Laboratory %",
    "Guild %",
    "Slider",
];

/// Render submissions (already oldest-first) as CSV text
///
/// Lines are joined with `\n` and there is no trailing newline.
pub fn to_csv(submissions: &[Submission]) -> String {
    let mut lines = Vec::with_capacity(submissions.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    lines.extend(submissions.iter().map(csv_row));
    lines.join("\n")
}

fn csv_row(s: &Submission) -> String {
    let [container, network, launchpad] = triad::standard_percentages(s.value_triad);
    let [sanctuary, laboratory, guild] = triad::standard_percentages(s.identity_triad);

    [
        plain_field(&s.timestamp),
        plain_field(&s.name),
        quoted(&s.narrative),
        s.value_triad.x.to_string(),
        s.value_triad.y.to_string(),
        container.to_string(),
        network.to_string(),
        launchpad.to_string(),
        s.identity_triad.x.to_string(),
        s.identity_triad.y.to_string(),
        sanctuary.to_string(),
        laboratory.to_string(),
        guild.to_string(),
        s.university_startup_slider.to_string(),
    ]
    .join(",")
}

/// Always quote, doubling internal quotes
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Leave simple values bare; quote anything that would break the row
fn plain_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        quoted(text)
    } else {
        text.to_string()
    }
}

/// Download file name for an export taken on `day`
pub fn export_filename(day: NaiveDate) -> String {
    format!("residency-pulse-data-{}.csv", day.format("%Y-%m-%d"))
}
