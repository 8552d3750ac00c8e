//! Bundled lexicon-based sentiment backend.
//!
//! Deterministic stand-in for a learned classifier: tokens are matched
//! against fixed polarity word lists, with simple negation flipping. The
//! score is the normalized margin between polarity hits, mapped into
//! [0.5, 1.0] so it always reads as a confidence for the winning label.

use std::collections::HashSet;

use crate::error::Result;

use super::{Prediction, Sentiment, SentimentModel};

pub const MODEL_ID: &str = "lexicon-sst2-en";

const POSITIVE_WORDS: &[&str] = &[
    "love", "loved", "loves", "great", "good", "excellent", "amazing", "awesome", "wonderful",
    "fantastic", "best", "happy", "delight", "delightful", "perfect", "brilliant", "enjoy",
    "enjoyed", "superb", "nice", "pleasant", "impressive", "beautiful", "favorite", "fun",
    "charming", "satisfying", "outstanding", "masterpiece", "gem",
];

const NEGATIVE_WORDS: &[&str] = &[
    "hate", "hated", "hates", "bad", "terrible", "awful", "horrible", "worst", "poor", "boring",
    "disappointing", "disappointment", "waste", "dull", "annoying", "unpleasant", "mediocre",
    "ugly", "broken", "mess", "failure", "fail", "flawed", "painful", "dreadful", "lousy",
    "pathetic", "garbage", "tedious", "miserable",
];

/// Negators flip the polarity of the next sentiment-bearing token.
const NEGATORS: &[&str] = &["not", "no", "never", "nothing", "hardly", "barely"];

pub struct LexiconModel {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl LexiconModel {
    /// Build the backend from the bundled word lists.
    pub fn bundled() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
        }
    }
}

impl SentimentModel for LexiconModel {
    fn id(&self) -> &str {
        MODEL_ID
    }

    fn classify(&self, text: &str) -> Result<Prediction> {
        let mut pos = 0u32;
        let mut neg = 0u32;
        let mut negated = false;

        for raw in text.split(|c: char| !c.is_alphanumeric()) {
            if raw.is_empty() {
                continue;
            }
            let token = raw.to_lowercase();
            if NEGATORS.contains(&token.as_str()) {
                negated = true;
                continue;
            }

            let hit = if self.positive.contains(token.as_str()) {
                Some(Sentiment::Positive)
            } else if self.negative.contains(token.as_str()) {
                Some(Sentiment::Negative)
            } else {
                None
            };

            if let Some(label) = hit {
                let label = match (label, negated) {
                    (l, false) => l,
                    (Sentiment::Positive, true) => Sentiment::Negative,
                    (Sentiment::Negative, true) => Sentiment::Positive,
                };
                match label {
                    Sentiment::Positive => pos += 1,
                    Sentiment::Negative => neg += 1,
                }
                negated = false;
            }
        }

        let total = pos + neg;
        let (label, score) = if total == 0 {
            // No signal at all, including the empty string: neutral prior.
            (Sentiment::Positive, 0.5)
        } else {
            let margin = f64::from(pos.abs_diff(neg)) / f64::from(total);
            let label = if pos >= neg {
                Sentiment::Positive
            } else {
                Sentiment::Negative
            };
            (label, 0.5 + 0.5 * margin)
        };

        Ok(Prediction { label, score })
    }
}
