//! Sentiment scoring for free-text comments.
//!
//! [`SentimentScorer`] is the seam: anything that maps text to a compound
//! polarity in `[-1, 1]` can be plugged in. [`LexiconScorer`] is the
//! implementation shipped with the crate. [`SentimentBucket`] turns a compound
//! score into one of seven ordinal labels.

mod lexicon;

pub use lexicon::LexiconScorer;

use serde::Serialize;
use std::fmt;

/// Maps free text to a compound polarity score in `[-1, 1]`.
///
/// Implementations are built once per run and shared across workers.
pub trait SentimentScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// Seven-step ordinal sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SentimentBucket {
    #[serde(rename = "Highly Negative")]
    HighlyNegative,
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Slightly Negative")]
    SlightlyNegative,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Slightly Positive")]
    SlightlyPositive,
    #[serde(rename = "Positive")]
    Positive,
    #[serde(rename = "Highly Positive")]
    HighlyPositive,
}

impl SentimentBucket {
    /// Buckets a compound score.
    ///
    /// | Range          | Bucket            |
    /// |----------------|-------------------|
    /// | >= 0.75        | Highly Positive   |
    /// | >= 0.50        | Positive          |
    /// | >= 0.10        | Slightly Positive |
    /// | > -0.10        | Neutral           |
    /// | > -0.50        | Slightly Negative |
    /// | > -0.75        | Negative          |
    /// | otherwise      | Highly Negative   |
    pub fn from_compound(s: f64) -> Self {
        match s {
            s if s >= 0.75 => SentimentBucket::HighlyPositive,
            s if s >= 0.50 => SentimentBucket::Positive,
            s if s >= 0.10 => SentimentBucket::SlightlyPositive,
            s if s > -0.10 => SentimentBucket::Neutral,
            s if s > -0.50 => SentimentBucket::SlightlyNegative,
            s if s > -0.75 => SentimentBucket::Negative,
            _ => SentimentBucket::HighlyNegative,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentBucket::HighlyNegative => "Highly Negative",
            SentimentBucket::Negative => "Negative",
            SentimentBucket::SlightlyNegative => "Slightly Negative",
            SentimentBucket::Neutral => "Neutral",
            SentimentBucket::SlightlyPositive => "Slightly Positive",
            SentimentBucket::Positive => "Positive",
            SentimentBucket::HighlyPositive => "Highly Positive",
        }
    }
}

impl fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
