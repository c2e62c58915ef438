//! Offering metadata from the export banner.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConvertError;
use crate::model::{OfferingMetadata, Term};

/// Number of leading lines searched for the banner.
pub const METADATA_WINDOW: usize = 4;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Spring|Summer|Fall|Winter)\s+([0-9]{4}),\s+(.+?)\s+Section").unwrap()
});
static RESPONDENTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)There were:\s+([0-9]+)\s+possible respondents").unwrap()
});

/// Extracts term, year, course title and possible respondents from the first
/// [`METADATA_WINDOW`] lines.
///
/// The course line and the respondents line may be different lines; when a
/// pattern matches more than once the later line wins.
///
/// # Errors
///
/// [`ConvertError::MetadataParse`] naming every field still unresolved after
/// the window has been scanned.
pub fn extract_metadata<S: AsRef<str>>(lines: &[S]) -> Result<OfferingMetadata, ConvertError> {
    let mut term = None;
    let mut year = None;
    let mut course_title = None;
    let mut possible_respondents = None;

    for line in lines.iter().take(METADATA_WINDOW) {
        let line = line.as_ref();

        if let Some(caps) = HEADER_RE.captures(line) {
            term = caps[1].parse::<Term>().ok();
            year = caps[2].parse::<i32>().ok();
            course_title = Some(caps[3].trim().to_string());
        }
        if let Some(caps) = RESPONDENTS_RE.captures(line) {
            possible_respondents = caps[1].parse::<u32>().ok();
        }
    }

    match (term, year, course_title, possible_respondents) {
        (Some(term), Some(year), Some(course_title), Some(possible_respondents)) => {
            Ok(OfferingMetadata {
                course_title,
                term,
                year,
                possible_respondents,
            })
        }
        (term, year, course_title, possible_respondents) => {
            let mut missing = Vec::new();
            if term.is_none() {
                missing.push("term");
            }
            if year.is_none() {
                missing.push("year");
            }
            if course_title.is_none() {
                missing.push("course title");
            }
            if possible_respondents.is_none() {
                missing.push("possible respondents");
            }
            Err(ConvertError::MetadataParse { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_metadata_from_separate_lines() {
        let lines = [
            "Fall 2023, Intro to Systems Section 1",
            "Instructor: Dr. Example",
            "There were: 42 possible respondents",
        ];
        let meta = extract_metadata(&lines).unwrap();
        assert_eq!(
            meta,
            OfferingMetadata {
                course_title: "Intro to Systems".to_string(),
                term: Term::Fall,
                year: 2023,
                possible_respondents: 42,
            }
        );
    }

    #[test]
    fn test_extract_metadata_title_cases_term() {
        let lines = [
            "SPRING 2024, Data Structures Section 02",
            "there were: 7 possible respondents",
        ];
        let meta = extract_metadata(&lines).unwrap();
        assert_eq!(meta.term, Term::Spring);
        assert_eq!(meta.term.to_string(), "Spring");
        assert_eq!(meta.possible_respondents, 7);
    }

    #[test]
    fn test_title_stops_at_section_literal() {
        let lines = [
            "Winter 2022, C++ & Rust: A (Mostly) Safe Tour, Part II Section A",
            "There were: 12 possible respondents",
        ];
        let meta = extract_metadata(&lines).unwrap();
        assert_eq!(meta.course_title, "C++ & Rust: A (Mostly) Safe Tour, Part II");
    }

    #[test]
    fn test_respondents_can_precede_header() {
        let lines = [
            "Report generated for the department",
            "There were: 30 possible respondents",
            "Summer 2021, Field Methods Section 3",
        ];
        let meta = extract_metadata(&lines).unwrap();
        assert_eq!(meta.term, Term::Summer);
        assert_eq!(meta.possible_respondents, 30);
    }

    #[test]
    fn test_lines_beyond_window_are_ignored() {
        let lines = [
            "Fall 2023, Intro to Systems Section 1",
            "",
            "",
            "",
            "There were: 42 possible respondents",
        ];
        let err = extract_metadata(&lines).unwrap_err();
        match err {
            ConvertError::MetadataParse { missing } => {
                assert_eq!(missing, vec!["possible respondents"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_ascii_digits_do_not_form_a_year() {
        let lines = [
            "Fall \u{ff12}\u{ff10}\u{ff12}\u{ff13}, Intro to Systems Section 1",
            "There were: 42 possible respondents",
        ];
        let err = extract_metadata(&lines).unwrap_err();
        match err {
            ConvertError::MetadataParse { missing } => {
                assert_eq!(missing, vec!["term", "year", "course title"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_header_reports_all_banner_fields() {
        let lines = ["Course Evaluation Report", "There were: 42 possible respondents"];
        let err = extract_metadata(&lines).unwrap_err();
        match err {
            ConvertError::MetadataParse { missing } => {
                assert_eq!(missing, vec!["term", "year", "course title"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_must_start_the_line() {
        let lines = [
            "Report: Fall 2023, Intro to Systems Section 1",
            "There were: 42 possible respondents",
        ];
        assert!(extract_metadata(&lines).is_err());
    }

    #[test]
    fn test_unknown_season_is_rejected() {
        let lines = [
            "Autumn 2023, Intro to Systems Section 1",
            "There were: 42 possible respondents",
        ];
        assert!(extract_metadata(&lines).is_err());
    }
}
