use std::sync::Arc;

use crate::catalog::{LEARNING_ENVIRONMENT, TEACHING_EFFECTIVENESS};
use crate::model::{MainRecord, OfferingMetadata, QuantMeasurement};

/// Builds the summary row for one file from its measurements.
pub fn assemble_main_record(
    metadata: &Arc<OfferingMetadata>,
    measurements: &[QuantMeasurement],
) -> MainRecord {
    MainRecord {
        metadata: Arc::clone(metadata),
        avg_q21: first_mean(measurements, TEACHING_EFFECTIVENESS),
        avg_q23: first_mean(measurements, LEARNING_ENVIRONMENT),
    }
}

/// Mean of the first measurement for `number`; later duplicates are ignored
/// even when the first one has no mean.
fn first_mean(measurements: &[QuantMeasurement], number: u8) -> Option<f64> {
    measurements
        .iter()
        .find(|m| m.question_number == Some(number))
        .and_then(|m| m.mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;

    fn meta() -> Arc<OfferingMetadata> {
        Arc::new(OfferingMetadata {
            course_title: "Intro to Systems".to_string(),
            term: Term::Fall,
            year: 2023,
            possible_respondents: 42,
        })
    }

    fn measurement(number: Option<u8>, mean: Option<f64>) -> QuantMeasurement {
        QuantMeasurement {
            metadata: meta(),
            question_number: number,
            question_text: format!("Q{number:?}"),
            sample_size: Some(10),
            mean,
            stddev: None,
        }
    }

    #[test]
    fn test_both_averages_found() {
        let rows = vec![
            measurement(Some(20), Some(3.0)),
            measurement(Some(23), Some(4.5)),
            measurement(Some(21), Some(4.2)),
        ];
        let record = assemble_main_record(&meta(), &rows);
        assert_eq!(record.avg_q21, Some(4.2));
        assert_eq!(record.avg_q23, Some(4.5));
    }

    #[test]
    fn test_missing_questions_are_absent() {
        let rows = vec![measurement(None, Some(1.0)), measurement(Some(21), Some(4.2))];
        let record = assemble_main_record(&meta(), &rows);
        assert_eq!(record.avg_q21, Some(4.2));
        assert_eq!(record.avg_q23, None);

        let empty = assemble_main_record(&meta(), &[]);
        assert_eq!(empty.avg_q21, None);
        assert_eq!(empty.avg_q23, None);
    }

    #[test]
    fn test_first_match_wins() {
        let rows = vec![
            measurement(Some(21), None),
            measurement(Some(21), Some(4.9)),
        ];
        let record = assemble_main_record(&meta(), &rows);
        assert_eq!(record.avg_q21, None);
    }
}
