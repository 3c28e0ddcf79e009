use crate::models::{AttentionTrend, EmotionSummary, Suggestion};

struct SummaryRule {
    name: &'static str,
    message: &'static str,
    applies: fn(&EmotionSummary) -> bool,
}

// Evaluated in declaration order; any subset may fire.
const SUMMARY_RULES: &[SummaryRule] = &[
    SummaryRule {
        name: "distress",
        message: "Several students appeared sad or afraid. Start next class with encouragement.",
        applies: |summary| count(summary, "sad") + count(summary, "fear") >= 3,
    },
    SummaryRule {
        name: "disengagement",
        message: "Many students felt neutral. Try more interaction or visual aids.",
        applies: |summary| count(summary, "neutral") > count(summary, "happy").max(2),
    },
    SummaryRule {
        name: "engagement",
        message: "Students were highly engaged. Continue this with discussions.",
        applies: |summary| count(summary, "happy") >= 5,
    },
    SummaryRule {
        name: "friction",
        message: "Anger detected. Clarify confusing topics and request feedback.",
        applies: |summary| count(summary, "angry") >= 2,
    },
];

struct AttentionTier {
    name: &'static str,
    message: &'static str,
    applies: fn(f64) -> bool,
}

// First matching tier wins; exactly one fires for any mean.
const ATTENTION_TIERS: &[AttentionTier] = &[
    AttentionTier {
        name: "low-attention",
        message: "Low attention detected. Consider short breaks or small groups.",
        applies: |mean| mean < 0.5,
    },
    AttentionTier {
        name: "high-attention",
        message: "Excellent attention levels. Use this for deep dives or harder tasks.",
        applies: |mean| mean >= 0.8,
    },
    AttentionTier {
        name: "moderate-attention",
        message: "Moderate attention. Use real-life examples to boost engagement.",
        applies: |_| true,
    },
];

/// Run the fixed rule table over the aggregate summary, then the attention
/// tiers over the mean attention when attention data is present. Returns an
/// empty list when nothing fires; the "no concerns" wording belongs to the
/// report layer, not here.
pub fn suggest_actions(
    summary: &EmotionSummary,
    attention: Option<&AttentionTrend>,
) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = SUMMARY_RULES
        .iter()
        .filter(|rule| (rule.applies)(summary))
        .map(|rule| Suggestion {
            rule: rule.name,
            message: rule.message,
        })
        .collect();

    if let Some(mean) = attention.and_then(mean_attention) {
        if let Some(tier) = ATTENTION_TIERS.iter().find(|tier| (tier.applies)(mean)) {
            suggestions.push(Suggestion {
                rule: tier.name,
                message: tier.message,
            });
        }
    }

    suggestions
}

/// Mean of all per-timestamp attention values, or None for an empty trend.
pub fn mean_attention(attention: &AttentionTrend) -> Option<f64> {
    if attention.is_empty() {
        return None;
    }
    Some(attention.values().sum::<f64>() / attention.len() as f64)
}

fn count(summary: &EmotionSummary, label: &str) -> u64 {
    summary.get(label).copied().unwrap_or(0)
}
