use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};

use crate::aggregate;
use crate::models::{AttentionTrend, Record};
use crate::suggest;

pub const NO_CONCERNS: &str = "No major concerns. Students appear engaged.";

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Build the attention series for a record set, or None when no record
/// carries an attention reading at all. Keeps the suggestion engine from
/// seeing an all-zero series fabricated out of emotion-only submissions.
pub fn attention_series(records: &[Record]) -> Option<AttentionTrend> {
    if records.iter().any(|record| record.attention.is_some()) {
        Some(aggregate::attention_trend(records))
    } else {
        None
    }
}

/// Render the full markdown report: distribution, trends, suggestions.
pub fn build_report(source_label: &str, records: &[Record]) -> String {
    let summary = aggregate::summarize_emotions(records);
    let trend = aggregate::emotion_trend(records);
    let attention = attention_series(records);
    let suggestions = suggest::suggest_actions(&summary, attention.as_ref());

    let mut output = String::new();

    let _ = writeln!(output, "# Class Emotion Report");
    let _ = writeln!(
        output,
        "Generated from {} ({} submissions)",
        source_label,
        records.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Emotion Distribution");

    if summary.is_empty() {
        let _ = writeln!(output, "No emotions recorded.");
    } else {
        let mut entries: Vec<(&String, &u64)> = summary.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (label, count) in entries {
            let _ = writeln!(output, "- {label}: {count}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Emotion Trend Over Time");

    if trend.is_empty() {
        let _ = writeln!(output, "No submissions recorded.");
    } else {
        for key in sort_timestamp_keys(trend.keys().map(String::as_str)) {
            let summary = &trend[key];
            let line = summary
                .iter()
                .map(|(label, count)| format!("{label} {count}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(output, "- {key}: {line}");
        }
    }

    if let Some(attention) = attention.as_ref() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Class Attention Over Time");
        for key in sort_timestamp_keys(attention.keys().map(String::as_str)) {
            let _ = writeln!(output, "- {key}: {:.2}", attention[key]);
        }
        if let Some(mean) = suggest::mean_attention(attention) {
            let _ = writeln!(output, "Average attention: {mean:.2}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Teaching Suggestions");

    if suggestions.is_empty() {
        let _ = writeln!(output, "{NO_CONCERNS}");
    } else {
        for suggestion in suggestions.iter() {
            let _ = writeln!(output, "- {}", suggestion.message);
        }
    }

    output
}

/// Order raw timestamp keys chronologically; keys that do not parse
/// (including the "unknown" sentinel) sort last, by raw string.
pub fn sort_timestamp_keys<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut keys: Vec<&str> = keys.collect();
    keys.sort_by(|a, b| {
        let (pa, pb) = (parse_timestamp(a), parse_timestamp(b));
        pa.is_none()
            .cmp(&pb.is_none())
            .then_with(|| pa.cmp(&pb))
            .then_with(|| a.cmp(b))
    });
    keys
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
