pub(crate) mod access;
pub(crate) mod grading;
pub(crate) mod sampler;
pub(crate) mod schedule;

use thiserror::Error;

/// Domain failures of the quiz lifecycle. The API layer maps each variant
/// to a status code; services stay HTTP-free.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum QuizError {
    #[error("Quiz not found")]
    QuizNotFound,
    #[error("Question not found")]
    QuestionNotFound,
    #[error("Result not found")]
    ResultNotFound,
    #[error("Access denied")]
    AccessDenied,
    #[error("Invalid quiz PIN")]
    WrongPin,
    #[error("Test is not activated.")]
    NotActivated,
    #[error("Test has not started yet.")]
    NotStarted,
    #[error("Test has already finished.")]
    Finished,
    #[error("{0}")]
    InvalidSchedule(String),
    #[error("Not enough questions for this subject: requested {requested}, available {available}")]
    InsufficientQuestionPool { requested: i32, available: i64 },
    #[error("Quiz has no assigned questions")]
    EmptyPool,
    #[error("Submission contains no answers")]
    EmptySubmission,
    #[error("Duplicate answer for question {0}")]
    DuplicateAnswer(i64),
    #[error("Question {0} is not assigned to this quiz")]
    UnknownQuestion(i64),
    #[error("Result already recorded for this quiz")]
    DuplicateSubmission,
    #[error("Question is assigned to a quiz and cannot be changed")]
    QuestionReferenced,
    #[error("Quiz already has an assigned question pool")]
    PoolAlreadyAssigned,
}
