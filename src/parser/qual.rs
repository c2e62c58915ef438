//! Free-text region: question headers followed by answer rows.
//!
//! The region is read by a two-state machine folded over the rows. The state
//! remembers the most recent `Question:` header; answers are only emitted
//! once a header has been seen, and the state never outlives one file.

use std::sync::Arc;

use super::cells::clean_cell;
use super::rows::Row;
use crate::model::{OfferingMetadata, QualComment};
use crate::sentiment::{SentimentBucket, SentimentScorer};

const HEADER_PREFIX: &str = "question:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BlockState {
    /// No header seen yet; rows are discarded.
    #[default]
    AwaitingQuestion,
    /// Answers belong to this question text.
    Answering(String),
}

/// A comment emitted by [`BlockState::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub question: String,
    pub text: String,
}

impl BlockState {
    /// Consumes one row and returns the next state plus the comment the row
    /// produced, if any.
    pub fn step(self, row: &Row) -> (BlockState, Option<Answer>) {
        let Some(cell) = row.first_cell().map(clean_cell).filter(|c| !c.is_empty()) else {
            return (self, None);
        };

        if let Some(question) = question_header(&cell) {
            return (BlockState::Answering(question), None);
        }

        match self {
            BlockState::AwaitingQuestion => (self, None),
            BlockState::Answering(_) if is_placeholder(&cell) => (self, None),
            BlockState::Answering(question) => {
                let answer = Answer {
                    question: question.clone(),
                    text: cell,
                };
                (BlockState::Answering(question), Some(answer))
            }
        }
    }
}

/// Walks the qualitative region and labels every answer with a sentiment
/// bucket.
pub fn parse_qualitative(
    rows: &[Row],
    metadata: &Arc<OfferingMetadata>,
    scorer: &dyn SentimentScorer,
) -> Vec<QualComment> {
    let (_, comments) = rows.iter().fold(
        (BlockState::default(), Vec::new()),
        |(state, mut comments), row| {
            let (next, answer) = state.step(row);
            if let Some(Answer { question, text }) = answer {
                let sentiment = SentimentBucket::from_compound(scorer.compound(&text));
                comments.push(QualComment {
                    metadata: Arc::clone(metadata),
                    question_text: question,
                    answer_text: text,
                    sentiment,
                });
            }
            (next, comments)
        },
    );
    comments
}

/// Question text of a `Question:` header cell (prefix matched in any case).
fn question_header(cell: &str) -> Option<String> {
    let prefix = cell.get(..HEADER_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(HEADER_PREFIX) {
        return None;
    }
    let rest = &cell[HEADER_PREFIX.len()..];
    Some(
        rest.trim_matches(|c: char| c == ':' || c.is_whitespace())
            .to_string(),
    )
}

fn is_placeholder(cell: &str) -> bool {
    cell.eq_ignore_ascii_case("n/a") || cell.eq_ignore_ascii_case("na")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;
    use std::collections::HashSet;

    /// Scores by a fixed table so bucket assignment is predictable.
    struct FixedScorer;

    impl SentimentScorer for FixedScorer {
        fn compound(&self, text: &str) -> f64 {
            if text.contains("Great") {
                0.8
            } else if text.contains("late") {
                -0.6
            } else {
                0.0
            }
        }
    }

    fn meta() -> Arc<OfferingMetadata> {
        Arc::new(OfferingMetadata {
            course_title: "Intro to Systems".to_string(),
            term: Term::Fall,
            year: 2023,
            possible_respondents: 42,
        })
    }

    fn row(cell: &str) -> Row {
        Row::from(vec![cell])
    }

    #[test]
    fn test_header_answer_and_placeholder() {
        let rows = vec![
            row("Question: Instructor conduct professional"),
            row("Great mentor, always on time."),
            row("n/a"),
        ];
        let comments = parse_qualitative(&rows, &meta(), &FixedScorer);

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].question_text, "Instructor conduct professional");
        assert_eq!(comments[0].answer_text, "Great mentor, always on time.");
        assert_eq!(comments[0].sentiment, SentimentBucket::HighlyPositive);
        assert_eq!(comments[0].metadata.year, 2023);
    }

    #[test]
    fn test_rows_before_first_header_are_dropped() {
        let rows = vec![
            row("Text Responses"),
            row("Orphaned comment"),
            row("QUESTION:: Instructor provided timely feedback :"),
            row("Feedback came late"),
        ];
        let comments = parse_qualitative(&rows, &meta(), &FixedScorer);

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].question_text, "Instructor provided timely feedback");
        assert_eq!(comments[0].sentiment, SentimentBucket::Negative);
    }

    #[test]
    fn test_placeholders_in_any_case_are_dropped() {
        let rows = vec![
            row("Question: Anything else?"),
            row("N/A"),
            row("NA"),
            row("na"),
            row("  n/A\u{a0}"),
            row("Nah"),
        ];
        let comments = parse_qualitative(&rows, &meta(), &FixedScorer);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].answer_text, "Nah");
    }

    #[test]
    fn test_blank_rows_do_not_change_state() {
        let rows = vec![
            row("Question: First"),
            Row::default(),
            row("   "),
            Row::from(vec!["", "stray second cell"]),
            row("Still about first"),
            row("Question: Second"),
            row("About second"),
        ];
        let comments = parse_qualitative(&rows, &meta(), &FixedScorer);

        let pairs: Vec<(&str, &str)> = comments
            .iter()
            .map(|c| (c.question_text.as_str(), c.answer_text.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("First", "Still about first"), ("Second", "About second")]
        );
    }

    #[test]
    fn test_answer_text_is_normalized() {
        let rows = vec![row("Question: Q"), row("\u{a0} spaced out \u{a0}")];
        let comments = parse_qualitative(&rows, &meta(), &FixedScorer);
        assert_eq!(comments[0].answer_text, "spaced out");
        assert_eq!(comments[0].sentiment, SentimentBucket::Neutral);
    }

    #[test]
    fn test_reordering_answers_keeps_the_same_set() {
        let forward = vec![
            row("Question: Q"),
            row("alpha"),
            row("beta"),
            row("gamma"),
        ];
        let reversed = vec![
            row("Question: Q"),
            row("gamma"),
            row("beta"),
            row("alpha"),
        ];

        let collect = |rows: &[Row]| -> HashSet<(String, String)> {
            parse_qualitative(rows, &meta(), &FixedScorer)
                .into_iter()
                .map(|c| (c.question_text, c.answer_text))
                .collect()
        };
        assert_eq!(collect(&forward), collect(&reversed));
    }

    #[test]
    fn test_step_transitions() {
        let (state, answer) = BlockState::AwaitingQuestion.step(&row("hello"));
        assert_eq!(state, BlockState::AwaitingQuestion);
        assert!(answer.is_none());

        let (state, answer) = state.step(&row("question: Pace"));
        assert_eq!(state, BlockState::Answering("Pace".to_string()));
        assert!(answer.is_none());

        let (state, answer) = state.step(&row("Too fast"));
        assert_eq!(state, BlockState::Answering("Pace".to_string()));
        assert_eq!(
            answer,
            Some(Answer {
                question: "Pace".to_string(),
                text: "Too fast".to_string(),
            })
        );
    }

    #[test]
    fn test_question_header_parsing() {
        assert_eq!(question_header("Question: Pace"), Some("Pace".to_string()));
        assert_eq!(question_header("question:Pace"), Some("Pace".to_string()));
        assert_eq!(question_header("Question:"), Some(String::new()));
        assert_eq!(question_header("Questions asked"), None);
        assert_eq!(question_header("Quéstion: x"), None);
    }
}
