//! Answer matching and the five-point grade scale.
//!
//! Option A of a question is its canonical correct answer; a submitted value
//! matches when it equals option A's text or its image reference. Unanswered
//! questions count against the student, so the percentage denominator is the
//! quiz's configured question count, not the number of answers sent.

use std::collections::HashMap;

use crate::db::models::Question;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GradeSummary {
    pub(crate) total_answered: i32,
    pub(crate) correct: i32,
    pub(crate) incorrect: i32,
    pub(crate) percentage: f64,
    pub(crate) grade: i32,
}

pub(crate) fn is_correct(question: &Question, submitted: &str) -> bool {
    question.option_a.as_deref() == Some(submitted)
        || question.option_a_image.as_deref() == Some(submitted)
}

pub(crate) fn grade_for_percentage(percentage: f64) -> i32 {
    if percentage >= 86.0 {
        5
    } else if percentage >= 72.0 {
        4
    } else if percentage >= 56.0 {
        3
    } else {
        2
    }
}

/// Grades one attempt. `answers` must already be validated against the pool
/// (known question ids, no duplicates); `question_count` is the quiz's
/// configured size and bounds `correct` from above.
pub(crate) fn grade<'a, I>(
    pool: &HashMap<i64, Question>,
    answers: I,
    question_count: i32,
) -> GradeSummary
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    let mut total_answered = 0i32;
    let mut correct = 0i32;

    for (question_id, submitted) in answers {
        total_answered += 1;
        if let Some(question) = pool.get(&question_id) {
            if is_correct(question, submitted) {
                correct += 1;
            }
        }
    }

    let incorrect = question_count - correct;
    let percentage = if question_count > 0 {
        100.0 * f64::from(correct) / f64::from(question_count)
    } else {
        0.0
    };

    GradeSummary {
        total_answered,
        correct,
        incorrect,
        percentage,
        grade: grade_for_percentage(percentage),
    }
}
