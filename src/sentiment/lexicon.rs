//! Valence-lexicon sentiment scorer.
//!
//! Scores text the way VADER does, in simplified form: each word found in the
//! lexicon contributes its valence, adjusted by nearby boosters and negators
//! and by a contrastive "but"; the sum is normalized into `[-1, 1]`.
//!
//! The lexicon format is the one VADER distributes: one entry per line,
//! `token<TAB>mean valence[<TAB>anything else]`. Blank lines and lines
//! starting with `#` are ignored.

use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::SentimentScorer;

static BUILTIN_LEXICON: &str = include_str!("lexicon.txt");

/// Normalization constant for `x / sqrt(x^2 + alpha)`.
const ALPHA: f64 = 15.0;
/// Added to (or subtracted from) a valence per preceding booster word.
const BOOST: f64 = 0.293;
/// Multiplier applied to a negated valence.
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// How many tokens back a booster or negator still applies.
const LOOKBACK: usize = 3;

static INCREMENTS: &[&str] = &[
    "absolutely", "amazingly", "completely", "considerably", "decidedly", "deeply",
    "enormously", "entirely", "especially", "exceptionally", "extremely", "fully",
    "greatly", "highly", "hugely", "incredibly", "intensely", "majorly", "more",
    "most", "particularly", "purely", "quite", "really", "remarkably", "so",
    "substantially", "thoroughly", "totally", "tremendously", "truly", "unbelievably",
    "utterly", "very",
];

static DECREMENTS: &[&str] = &[
    "almost", "barely", "hardly", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat",
];

static NEGATORS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
    "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither",
    "never", "no", "nobody", "none", "nope", "nor", "not", "nothing", "nowhere",
    "rarely", "seldom", "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
];

pub struct LexiconScorer {
    valences: HashMap<String, f64>,
}

impl LexiconScorer {
    /// Scorer backed by the small lexicon embedded in the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_lexicon_text(BUILTIN_LEXICON).context("parsing built-in sentiment lexicon")
    }

    /// Loads a VADER-format lexicon file, replacing the built-in table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading sentiment lexicon {}", path.display()))?;
        let scorer = Self::from_lexicon_text(&text)
            .with_context(|| format!("parsing sentiment lexicon {}", path.display()))?;
        debug!(path = %path.display(), entries = scorer.len(), "Sentiment lexicon loaded");
        Ok(scorer)
    }

    pub fn from_lexicon_text(text: &str) -> Result<Self> {
        let valences = text
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| parse_line(idx, line))
            .collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { valences })
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    fn valence(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }
}

impl SentimentScorer for LexiconScorer {
    fn compound(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let but_at = tokens.iter().position(|t| t == "but");

        let mut total = 0.0;
        let mut scored = false;

        for (i, token) in tokens.iter().enumerate() {
            if is_booster(token) {
                continue;
            }
            let Some(mut valence) = self.valence(token) else {
                continue;
            };
            scored = true;

            let window = &tokens[i.saturating_sub(LOOKBACK)..i];
            for (distance, prior) in window.iter().rev().enumerate() {
                let scalar = booster_scalar(prior) * (1.0 - 0.05 * distance as f64);
                if valence < 0.0 {
                    valence -= scalar;
                } else {
                    valence += scalar;
                }
            }
            if window.iter().any(|t| is_negator(t)) {
                valence *= NEGATION_SCALAR;
            }

            match but_at {
                Some(b) if i < b => valence *= 0.5,
                Some(b) if i > b => valence *= 1.5,
                _ => {}
            }

            total += valence;
        }

        if !scored {
            return 0.0;
        }

        let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
        if total > 0.0 {
            total += exclamations * EXCLAMATION_BOOST;
        } else if total < 0.0 {
            total -= exclamations * EXCLAMATION_BOOST;
        }

        normalize(total)
    }
}

/// `None` for blank and comment lines.
fn parse_line(idx: usize, line: &str) -> Option<Result<(String, f64)>> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }
    Some(parse_entry(idx + 1, line))
}

fn parse_entry(line_no: usize, line: &str) -> Result<(String, f64)> {
    let fields: Vec<&str> = if line.contains('\t') {
        line.split('\t').collect()
    } else {
        line.split_whitespace().collect()
    };

    let token = fields
        .first()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("line {line_no}: missing token"))?;
    let valence: f64 = fields
        .get(1)
        .ok_or_else(|| anyhow!("line {line_no}: missing valence for {token:?}"))?
        .trim()
        .parse()
        .with_context(|| format!("line {line_no}: invalid valence for {token:?}"))?;

    Ok((token.to_lowercase(), valence))
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Lowercased words with surrounding punctuation removed. Apostrophes are
/// dropped so "didn't" and "didnt" look the same.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            raw.trim_matches(|c: char| !c.is_alphanumeric())
                .chars()
                .filter(|c| *c != '\'' && *c != '\u{2019}')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_booster(token: &str) -> bool {
    INCREMENTS.contains(&token) || DECREMENTS.contains(&token)
}

fn booster_scalar(token: &str) -> f64 {
    if INCREMENTS.contains(&token) {
        BOOST
    } else if DECREMENTS.contains(&token) {
        -BOOST
    } else {
        0.0
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token)
}
