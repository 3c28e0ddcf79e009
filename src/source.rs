use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::models::Record;

#[derive(Debug, Deserialize)]
struct ApiPayload {
    #[serde(default)]
    data: Vec<Record>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    Envelope(ApiPayload),
    Bare(Vec<Record>),
}

impl RecordDocument {
    fn into_records(self) -> Vec<Record> {
        match self {
            RecordDocument::Envelope(payload) => payload.data,
            RecordDocument::Bare(records) => records,
        }
    }
}

/// Fetch all submissions from the emotion API. Transport and parse failures
/// are absorbed into an empty list so that downstream aggregation always
/// runs over valid input.
pub async fn fetch_records(client: &reqwest::Client, url: &str) -> Vec<Record> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(%url, error = %err, "failed to reach emotion API");
            return Vec::new();
        }
    };

    if !response.status().is_success() {
        tracing::warn!(%url, status = %response.status(), "emotion API returned an error");
        return Vec::new();
    }

    match response.json::<ApiPayload>().await {
        Ok(payload) => payload.data,
        Err(err) => {
            tracing::warn!(%url, error = %err, "emotion API payload did not parse");
            Vec::new()
        }
    }
}

/// Load submissions from a local JSON file, accepting either a bare array
/// of records or the API's `{"data": [...]}` envelope.
pub fn load_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: RecordDocument = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse records from {}", path.display()))?;
    Ok(document.into_records())
}
