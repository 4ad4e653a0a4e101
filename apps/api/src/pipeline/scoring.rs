use crate::models::application::InterviewRow;

/// Arithmetic mean of an application's interview scores.
///
/// An interview without a score contributes 0 to the sum but still counts
/// in the denominator — an ungraded interview drags the average down
/// rather than being ignored. Empty input yields 0.
pub fn average_score(interviews: &[InterviewRow]) -> f64 {
    if interviews.is_empty() {
        return 0.0;
    }
    let total: i64 = interviews
        .iter()
        .map(|interview| i64::from(interview.score.unwrap_or(0)))
        .sum();
    total as f64 / interviews.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn interview(score: Option<i32>) -> InterviewRow {
        InterviewRow {
            id: 1,
            application_id: 1,
            interview_step_id: 1,
            employee_id: 1,
            interview_date: Utc::now(),
            result: None,
            score,
            notes: None,
        }
    }

    #[test]
    fn test_average_of_two_scores() {
        let interviews = vec![interview(Some(5)), interview(Some(3))];
        assert_eq!(average_score(&interviews), 4.0);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(average_score(&[]), 0.0);
    }

    #[test]
    fn test_missing_score_counts_in_denominator() {
        // [5, null] averages to 2.5, not 5: the ungraded interview is not
        // excluded from the denominator.
        let interviews = vec![interview(Some(5)), interview(None)];
        assert_eq!(average_score(&interviews), 2.5);
    }

    #[test]
    fn test_single_interview() {
        assert_eq!(average_score(&[interview(Some(4))]), 4.0);
    }
}
