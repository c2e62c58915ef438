//! The survey instrument: known question numbers and their canonical text.
//!
//! The catalog is an ordinary immutable value. It is built once (the default
//! instrument, or a JSON file) and handed to the parser; nothing reads it
//! through global state.
//!
//! A custom catalog is a JSON object keyed by question number:
//! ```json
//! {
//!   "21": "Overall effectiveness of instructor's teaching technique",
//!   "23": "Instructor created an environment conducive to learning"
//! }
//! ```

use anyhow::{Context, Result, bail};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Question number whose mean becomes `Avg (21)` in the summary table.
pub const TEACHING_EFFECTIVENESS: u8 = 21;
/// Question number whose mean becomes `Avg (23)` in the summary table.
pub const LEARNING_ENVIRONMENT: u8 = 23;

static DEFAULT_QUESTIONS: &[(u8, &str)] = &[
    (1, "Course organized to help learning"),
    (2, "Course developed abilities/skills for subject"),
    (3, "Course developed ability to think critically"),
    (4, "Material organized around learning outcomes"),
    (5, "Course improved problem-solving skills"),
    (7, "Satisfaction with effort in course"),
    (14, "Instructor presented organized content"),
    (15, "Instructor increased understanding of material"),
    (16, "Instructor helpful to student individually"),
    (17, "Instructor provided meaningful feedback"),
    (18, "Instructor provided timely feedback"),
    (19, "Instructor encouraged participation"),
    (20, "Instructor conduct professional"),
    (21, "Overall effectiveness of instructor's teaching technique"),
    (22, "Overall demonstration of the significance of subject matter"),
    (23, "Instructor created an environment conducive to learning"),
];

#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    by_number: BTreeMap<u8, String>,
    by_text: HashMap<String, u8>,
}

impl QuestionCatalog {
    /// Builds a catalog, rejecting empty texts and texts that collide
    /// case-insensitively.
    pub fn new(entries: impl IntoIterator<Item = (u8, String)>) -> Result<Self> {
        let mut by_number = BTreeMap::new();
        let mut by_text = HashMap::new();

        for (number, text) in entries {
            let text = text.trim().to_string();
            if text.is_empty() {
                bail!("question {number} has empty text");
            }
            if let Some(previous) = by_text.insert(text.to_lowercase(), number) {
                bail!("questions {previous} and {number} share the text {text:?}");
            }
            by_number.insert(number, text);
        }

        Ok(Self { by_number, by_text })
    }

    /// Loads a catalog from a JSON object mapping numbers to text.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading question catalog {}", path.display()))?;
        let entries: BTreeMap<u8, String> = serde_json::from_str(&content)
            .with_context(|| format!("parsing question catalog {}", path.display()))?;
        Self::new(entries)
    }

    /// Case-insensitive exact match against the canonical texts.
    pub fn number_for(&self, text: &str) -> Option<u8> {
        self.by_text.get(&text.to_lowercase()).copied()
    }

    pub fn text_for(&self, number: u8) -> Option<&str> {
        self.by_number.get(&number).map(String::as_str)
    }

    pub fn contains(&self, number: u8) -> bool {
        self.by_number.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }

    /// Iterates `(number, text)` in ascending question order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.by_number.iter().map(|(n, t)| (*n, t.as_str()))
    }
}

impl Default for QuestionCatalog {
    fn default() -> Self {
        let mut by_number = BTreeMap::new();
        let mut by_text = HashMap::new();
        for (number, text) in DEFAULT_QUESTIONS {
            by_number.insert(*number, text.to_string());
            by_text.insert(text.to_lowercase(), *number);
        }
        Self { by_number, by_text }
    }
}
