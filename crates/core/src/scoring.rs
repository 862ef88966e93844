use thiserror::Error;

use crate::model::{AnswerSelection, Question};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("cannot score an empty question list")]
    NoQuestions,

    #[error("expected {expected} answers, got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },

    #[error("answer at position {position} is for question index {found}")]
    MisalignedAnswer { position: usize, found: usize },
}

//
// ─── SCORING ───────────────────────────────────────────────────────────────────
//

/// Points deducted for a wrong answer that was actually attempted.
/// Unanswered questions are neither rewarded nor penalized.
pub const WRONG_ANSWER_PENALTY: u32 = 10;

/// Outcome of scoring one sitting against its question key.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub correct_count: u32,
    pub total_questions: u32,
    pub points_earned: u32,
    pub percentage: f64,
}

/// Score an ordered answer list against its question key.
///
/// A match earns the question's point value; a wrong attempted answer costs
/// [`WRONG_ANSWER_PENALTY`]; an unanswered question changes nothing. The
/// running total may dip below zero mid-pass, but the final result is clamped
/// to zero. Pure: no side effects, deterministic for identical input.
///
/// # Errors
///
/// Returns `ScoringError::NoQuestions` for an empty question list,
/// `AnswerCountMismatch` when the lists differ in length, and
/// `MisalignedAnswer` when an answer's question index does not match its
/// position.
pub fn score(
    questions: &[Question],
    answers: &[AnswerSelection],
) -> Result<ScoreBreakdown, ScoringError> {
    if questions.is_empty() {
        return Err(ScoringError::NoQuestions);
    }
    if answers.len() != questions.len() {
        return Err(ScoringError::AnswerCountMismatch {
            expected: questions.len(),
            got: answers.len(),
        });
    }

    let mut correct_count = 0_u32;
    let mut points = 0_i64;

    for (position, (question, answer)) in questions.iter().zip(answers).enumerate() {
        if answer.question_index() != position {
            return Err(ScoringError::MisalignedAnswer {
                position,
                found: answer.question_index(),
            });
        }

        match answer.selected() {
            Some(choice) if question.is_correct(choice) => {
                correct_count = correct_count.saturating_add(1);
                points += i64::from(question.points());
            }
            Some(_) => points -= i64::from(WRONG_ANSWER_PENALTY),
            None => {}
        }
    }

    let points_earned = u32::try_from(points.max(0)).unwrap_or(u32::MAX);
    let total_questions = u32::try_from(questions.len()).unwrap_or(u32::MAX);
    let percentage = f64::from(correct_count) / f64::from(total_questions) * 100.0;

    Ok(ScoreBreakdown {
        correct_count,
        total_questions,
        points_earned,
        percentage,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionId, TestId};

    fn question(id: u64, correct: usize, points: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            TestId::new(1),
            format!("Q{id}"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct,
            points,
        )
        .unwrap()
    }

    fn key(correct_indices: &[usize]) -> Vec<Question> {
        correct_indices
            .iter()
            .enumerate()
            .map(|(i, &c)| question(i as u64 + 1, c, Question::DEFAULT_POINTS))
            .collect()
    }

    #[test]
    fn eight_of_ten_with_two_wrong_attempts() {
        let questions = key(&[0; 10]);
        let answers: Vec<AnswerSelection> = (0..10)
            .map(|i| {
                if i < 8 {
                    AnswerSelection::answered(i, 0)
                } else {
                    AnswerSelection::answered(i, 1)
                }
            })
            .collect();

        let breakdown = score(&questions, &answers).unwrap();

        assert_eq!(breakdown.correct_count, 8);
        assert_eq!(breakdown.points_earned, 8 * 30 - 2 * 10);
        assert_eq!(breakdown.percentage, 80.0);
    }

    #[test]
    fn all_unanswered_scores_zero() {
        let questions = key(&[0; 5]);
        let answers: Vec<AnswerSelection> =
            (0..5).map(AnswerSelection::unanswered).collect();

        let breakdown = score(&questions, &answers).unwrap();

        assert_eq!(breakdown.correct_count, 0);
        assert_eq!(breakdown.points_earned, 0);
        assert_eq!(breakdown.percentage, 0.0);
    }

    #[test]
    fn points_clamp_at_zero() {
        // Two wrong attempts against one 10-point correct answer would be
        // negative without the clamp.
        let questions = key(&[0, 0, 0]);
        let answers = vec![
            AnswerSelection::answered(0, 1),
            AnswerSelection::answered(1, 2),
            AnswerSelection::answered(2, 3),
        ];

        let breakdown = score(&questions, &answers).unwrap();

        assert_eq!(breakdown.correct_count, 0);
        assert_eq!(breakdown.points_earned, 0);
        assert_eq!(breakdown.percentage, 0.0);
    }

    #[test]
    fn unanswered_is_not_penalized() {
        let questions = key(&[0, 0]);
        let attempted_wrong = vec![
            AnswerSelection::answered(0, 0),
            AnswerSelection::answered(1, 1),
        ];
        let left_blank = vec![
            AnswerSelection::answered(0, 0),
            AnswerSelection::unanswered(1),
        ];

        let wrong = score(&questions, &attempted_wrong).unwrap();
        let blank = score(&questions, &left_blank).unwrap();

        assert_eq!(wrong.points_earned, 30 - 10);
        assert_eq!(blank.points_earned, 30);
        assert_eq!(wrong.correct_count, blank.correct_count);
    }

    #[test]
    fn honors_per_question_point_values() {
        let questions = vec![question(1, 0, 50), question(2, 1, 5)];
        let answers = vec![
            AnswerSelection::answered(0, 0),
            AnswerSelection::answered(1, 1),
        ];

        let breakdown = score(&questions, &answers).unwrap();

        assert_eq!(breakdown.points_earned, 55);
        assert_eq!(breakdown.percentage, 100.0);
    }

    #[test]
    fn empty_question_list_fails() {
        let err = score(&[], &[]).unwrap_err();
        assert_eq!(err, ScoringError::NoQuestions);
    }

    #[test]
    fn length_mismatch_fails() {
        let questions = key(&[0, 0]);
        let answers = vec![AnswerSelection::answered(0, 0)];

        let err = score(&questions, &answers).unwrap_err();
        assert_eq!(err, ScoringError::AnswerCountMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn misaligned_answer_fails() {
        let questions = key(&[0, 0]);
        let answers = vec![
            AnswerSelection::answered(1, 0),
            AnswerSelection::answered(0, 0),
        ];

        let err = score(&questions, &answers).unwrap_err();
        assert_eq!(err, ScoringError::MisalignedAnswer { position: 0, found: 1 });
    }

    #[test]
    fn scoring_is_deterministic() {
        let questions = key(&[2, 1, 3, 0]);
        let answers = vec![
            AnswerSelection::answered(0, 2),
            AnswerSelection::answered(1, 0),
            AnswerSelection::unanswered(2),
            AnswerSelection::answered(3, 0),
        ];

        let first = score(&questions, &answers).unwrap();
        let second = score(&questions, &answers).unwrap();
        assert_eq!(first, second);
    }
}
