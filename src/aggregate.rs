use std::collections::BTreeMap;

use crate::models::{AttentionTrend, EmotionSummary, EmotionsField, Record, Trend};

/// Reduce all records into one emotion-frequency mapping. Labels that never
/// occur are absent from the result rather than zero-filled.
pub fn summarize_emotions(records: &[Record]) -> EmotionSummary {
    let mut summary = EmotionSummary::new();
    for record in records {
        add_emotions(&mut summary, &record.emotions);
    }
    summary
}

/// Reduce records into per-timestamp emotion summaries. Records sharing a
/// timestamp key accumulate into the same nested summary.
pub fn emotion_trend(records: &[Record]) -> Trend {
    let mut trend = Trend::new();
    for record in records {
        let summary = trend
            .entry(record.timestamp_key().to_string())
            .or_default();
        add_emotions(summary, &record.emotions);
    }
    trend
}

/// Mean attention reading per timestamp key. A record without an attention
/// value contributes 0. The upstream dashboard let the last record on a
/// timestamp silently overwrite earlier ones; here every reading on a key
/// is kept and averaged instead.
pub fn attention_trend(records: &[Record]) -> AttentionTrend {
    let mut readings: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for record in records {
        let entry = readings
            .entry(record.timestamp_key().to_string())
            .or_insert((0.0, 0));
        entry.0 += record.attention.unwrap_or(0.0);
        entry.1 += 1;
    }

    readings
        .into_iter()
        .map(|(ts, (total, count))| (ts, total / count as f64))
        .collect()
}

fn add_emotions(summary: &mut EmotionSummary, emotions: &EmotionsField) {
    match emotions {
        EmotionsField::Labels(labels) => {
            for label in labels {
                *summary.entry(label.clone()).or_insert(0) += 1;
            }
        }
        EmotionsField::Counts(counts) => {
            for (label, count) in counts {
                *summary.entry(label.clone()).or_insert(0) += count;
            }
        }
        EmotionsField::Missing => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(timestamp: &str, labels: &[&str]) -> Record {
        Record {
            timestamp: Some(timestamp.to_string()),
            emotions: EmotionsField::Labels(labels.iter().map(|l| l.to_string()).collect()),
            attention: None,
        }
    }

    fn counted(timestamp: &str, counts: &[(&str, u64)]) -> Record {
        Record {
            timestamp: Some(timestamp.to_string()),
            emotions: EmotionsField::Counts(
                counts.iter().map(|(l, n)| (l.to_string(), *n)).collect(),
            ),
            attention: None,
        }
    }

    #[test]
    fn empty_input_yields_empty_outputs() {
        assert!(summarize_emotions(&[]).is_empty());
        assert!(emotion_trend(&[]).is_empty());
        assert!(attention_trend(&[]).is_empty());
    }

    #[test]
    fn label_duplicates_in_one_record_each_count() {
        let summary = summarize_emotions(&[labeled("t1", &["happy", "happy", "sad"])]);
        assert_eq!(summary.get("happy"), Some(&2));
        assert_eq!(summary.get("sad"), Some(&1));
    }

    #[test]
    fn both_emotion_shapes_aggregate_identically() {
        let from_labels = summarize_emotions(&[labeled("t1", &["happy", "happy", "sad"])]);
        let from_counts = summarize_emotions(&[counted("t1", &[("happy", 2), ("sad", 1)])]);
        assert_eq!(from_labels, from_counts);
    }

    #[test]
    fn missing_emotions_contribute_nothing() {
        let records = vec![
            labeled("t1", &["happy"]),
            Record {
                timestamp: Some("t1".to_string()),
                emotions: EmotionsField::Missing,
                attention: None,
            },
        ];
        let summary = summarize_emotions(&records);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.get("happy"), Some(&1));
    }

    #[test]
    fn total_count_matches_sum_of_contributions() {
        let records = vec![
            labeled("t1", &["happy", "sad", "fear"]),
            counted("t2", &[("happy", 4), ("angry", 2)]),
        ];
        let total: u64 = summarize_emotions(&records).values().sum();
        assert_eq!(total, 3 + 6);
    }

    #[test]
    fn trend_accumulates_records_on_the_same_timestamp() {
        let records = vec![
            labeled("2024-01-01T10:00", &["happy", "sad"]),
            counted("2024-01-01T10:00", &[("happy", 2)]),
            labeled("2024-01-01T11:00", &["fear"]),
        ];
        let trend = emotion_trend(&records);
        assert_eq!(trend.len(), 2);
        let ten = &trend["2024-01-01T10:00"];
        assert_eq!(ten.get("happy"), Some(&3));
        assert_eq!(ten.get("sad"), Some(&1));
        assert_eq!(trend["2024-01-01T11:00"].get("fear"), Some(&1));
    }

    #[test]
    fn trend_decomposition_sums_back_to_the_flat_aggregate() {
        let records = vec![
            labeled("t1", &["happy", "happy"]),
            counted("t2", &[("sad", 3)]),
            labeled("t1", &["sad"]),
        ];
        let mut recombined = EmotionSummary::new();
        for summary in emotion_trend(&records).values() {
            for (label, count) in summary {
                *recombined.entry(label.clone()).or_insert(0) += count;
            }
        }
        assert_eq!(recombined, summarize_emotions(&records));
    }

    #[test]
    fn missing_timestamp_maps_to_the_unknown_key() {
        let record = Record {
            timestamp: None,
            emotions: EmotionsField::Labels(vec!["happy".to_string()]),
            attention: Some(0.4),
        };
        let trend = emotion_trend(std::slice::from_ref(&record));
        assert!(trend.contains_key("unknown"));
        let attention = attention_trend(&[record]);
        assert_eq!(attention.get("unknown"), Some(&0.4));
    }

    #[test]
    fn attention_readings_on_one_timestamp_are_averaged() {
        let mut first = labeled("2024-01-01T10:00", &["happy"]);
        first.attention = Some(0.2);
        let mut second = labeled("2024-01-01T10:00", &["sad"]);
        second.attention = Some(0.8);

        let records = vec![first, second];
        let attention = attention_trend(&records);
        let value = attention["2024-01-01T10:00"];
        assert!((value - 0.5).abs() < 1e-9);

        // The emotion trend on that key still sums both records.
        let trend = emotion_trend(&records);
        let summary = &trend["2024-01-01T10:00"];
        assert_eq!(summary.get("happy"), Some(&1));
        assert_eq!(summary.get("sad"), Some(&1));
    }

    #[test]
    fn absent_attention_defaults_to_zero() {
        let records = vec![labeled("t1", &["happy"])];
        let attention = attention_trend(&records);
        assert_eq!(attention.get("t1"), Some(&0.0));
    }
}
