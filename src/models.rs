use std::collections::BTreeMap;

use serde::de::{Deserialize, Deserializer};
use serde_json::Value;

/// Timestamp key used when a record carries no timestamp at all.
pub const UNKNOWN_TIMESTAMP: &str = "unknown";

/// Total occurrence count per emotion label across a record set.
pub type EmotionSummary = BTreeMap<String, u64>;

/// Emotion summary scoped per timestamp key. Keys stay raw strings here;
/// chronological ordering happens in the report layer.
pub type Trend = BTreeMap<String, EmotionSummary>;

/// Mean attention reading per timestamp key.
pub type AttentionTrend = BTreeMap<String, f64>;

/// One raw student submission as returned by the emotion API.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Record {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub emotions: EmotionsField,
    #[serde(default)]
    pub attention: Option<f64>,
}

impl Record {
    pub fn timestamp_key(&self) -> &str {
        self.timestamp.as_deref().unwrap_or(UNKNOWN_TIMESTAMP)
    }
}

/// The API serves two shapes for `emotions`: a list of labels (one
/// occurrence each) or a mapping from label to a pre-aggregated count.
/// Anything else is treated as an empty contribution, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EmotionsField {
    #[default]
    Missing,
    Labels(Vec<String>),
    Counts(BTreeMap<String, u64>),
}

impl<'de> Deserialize<'de> for EmotionsField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(EmotionsField::from(value))
    }
}

impl From<Value> for EmotionsField {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                let labels: Vec<String> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(label) => Some(label),
                        _ => None,
                    })
                    .collect();
                EmotionsField::Labels(labels)
            }
            Value::Object(entries) => {
                let counts: BTreeMap<String, u64> = entries
                    .into_iter()
                    .filter_map(|(label, count)| count.as_u64().map(|n| (label, n)))
                    .collect();
                EmotionsField::Counts(counts)
            }
            _ => EmotionsField::Missing,
        }
    }
}

/// A rule-triggered teaching recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub rule: &'static str,
    pub message: &'static str,
}
