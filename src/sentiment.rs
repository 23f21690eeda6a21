//! Review comment sentiment classification
//!
//! A lexicon/rule-based polarity scorer sits behind the `SentimentScorer`
//! trait so the scoring backend can be swapped without touching the
//! classifier's control flow.

use crate::data::OrderRecord;
use crate::error::AnalyticsError;
use std::fmt;

/// Scores free text to a polarity in `[-1, 1]`: negative is unfavorable,
/// positive is favorable, zero is neutral.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> f64;
}

/// Sentiment label derived from a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a polarity score onto a label. Exactly zero is neutral, which also
/// covers comments with no sentiment-bearing words at all.
pub fn classify(polarity: f64) -> Sentiment {
    if polarity > 0.0 {
        Sentiment::Positive
    } else if polarity < 0.0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Label counts over the non-null-comment population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentCounts {
    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }

    pub fn get(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }
}

/// Classify every non-null review comment and tally the labels.
///
/// The three counts partition the non-null-comment population exactly.
pub fn review_sentiment(
    records: &[OrderRecord],
    scorer: &dyn SentimentScorer,
) -> Result<SentimentCounts, AnalyticsError> {
    let mut counts = SentimentCounts::default();

    for record in records {
        let Some(comment) = record.review_comment.as_deref() else {
            continue;
        };
        match classify(scorer.score(comment)) {
            Sentiment::Positive => counts.positive += 1,
            Sentiment::Negative => counts.negative += 1,
            Sentiment::Neutral => counts.neutral += 1,
        }
    }

    if counts.total() == 0 {
        return Err(AnalyticsError::EmptyResult {
            analytic: "review sentiment",
        });
    }
    Ok(counts)
}

/// Fixed-lexicon polarity scorer.
///
/// Tokens are lowercased and matched against small positive/negative word
/// lists (English plus the Portuguese terms common in e-commerce reviews);
/// a preceding negator flips a hit's sign. The score is the signed hit sum
/// over the number of hits, so it always lands in `[-1, 1]` and texts with
/// no recognized words score exactly zero. Languages outside the lexicon
/// therefore drift to neutral.
#[derive(Debug, Default, Clone)]
pub struct LexiconScorer;

const POSITIVE_WORDS: [&str; 22] = [
    "good", "great", "excellent", "amazing", "awesome", "love", "loved", "perfect", "nice",
    "fast", "happy", "recommend", "wonderful", "best", "beautiful", "bom", "boa", "otimo",
    "excelente", "perfeito", "rapido", "recomendo",
];

const NEGATIVE_WORDS: [&str; 22] = [
    "bad", "terrible", "awful", "horrible", "broken", "poor", "slow", "late", "worst", "hate",
    "hated", "defective", "disappointed", "damaged", "wrong", "ruim", "pessimo", "horrivel",
    "atrasado", "quebrado", "defeito", "nunca",
];

const NEGATORS: [&str; 5] = ["not", "no", "never", "nao", "dont"];

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        let mut signed_sum = 0i64;
        let mut hits = 0u64;
        for (i, token) in tokens.iter().enumerate() {
            let polarity = if POSITIVE_WORDS.contains(token) {
                1i64
            } else if NEGATIVE_WORDS.contains(token) {
                -1i64
            } else {
                continue;
            };
            let negated = i > 0 && NEGATORS.contains(&tokens[i - 1]);
            signed_sum += if negated { -polarity } else { polarity };
            hits += 1;
        }

        if hits == 0 {
            0.0
        } else {
            signed_sum as f64 / hits as f64
        }
    }
}
