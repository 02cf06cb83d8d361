use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StartAttemptRequest {
    #[validate(length(min = 1, message = "pin must not be empty"))]
    pub(crate) pin: String,
    /// Admins name the group they act for; everyone else must omit it.
    #[serde(default)]
    #[serde(alias = "groupId")]
    pub(crate) group_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AnswerItem {
    #[serde(alias = "questionId")]
    pub(crate) question_id: i64,
    #[serde(alias = "optionValue")]
    #[validate(length(min = 1, message = "option_value must not be empty"))]
    pub(crate) option_value: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmitAttemptRequest {
    #[serde(default)]
    #[serde(alias = "groupId")]
    pub(crate) group_id: Option<i64>,
    #[validate(nested)]
    pub(crate) answers: Vec<AnswerItem>,
}

/// One answer choice as shown to the student. Text, image, or both; the
/// ordering is shuffled per request so option A is not identifiable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AttemptOption {
    pub(crate) text: Option<String>,
    pub(crate) image: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptQuestion {
    pub(crate) id: i64,
    pub(crate) text: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) options: Vec<AttemptOption>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizSummary {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) subject_id: i64,
    pub(crate) question_count: i32,
    pub(crate) duration_minutes: i32,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    pub(crate) status: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartAttemptResponse {
    pub(crate) quiz: QuizSummary,
    pub(crate) questions: Vec<AttemptQuestion>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptResultResponse {
    pub(crate) quiz_id: i64,
    pub(crate) total_answered: i32,
    pub(crate) correct_answers: i32,
    pub(crate) incorrect_answers: i32,
    pub(crate) percentage: f64,
    pub(crate) grade: i32,
}
