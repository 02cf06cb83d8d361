use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

/// A bank question. The prompt is `text` and/or `image`; options B-D are
/// distractors. Option A (text or image) is the canonical correct answer
/// and is never revealed in attempt payloads except shuffled among the
/// other options.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: i64,
    pub(crate) subject_id: i64,
    pub(crate) teacher_id: i64,
    pub(crate) text: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) option_a: Option<String>,
    pub(crate) option_a_image: Option<String>,
    pub(crate) option_b: Option<String>,
    pub(crate) option_b_image: Option<String>,
    pub(crate) option_c: Option<String>,
    pub(crate) option_c_image: Option<String>,
    pub(crate) option_d: Option<String>,
    pub(crate) option_d_image: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// A scheduled quiz. The end of the window is derived from `start_time`
/// plus `duration_minutes`; it is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) teacher_id: i64,
    pub(crate) group_id: i64,
    pub(crate) subject_id: i64,
    pub(crate) question_count: i32,
    pub(crate) duration_minutes: i32,
    pub(crate) start_time: PrimitiveDateTime,
    pub(crate) pin: String,
    pub(crate) is_activated: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Graded outcome of a student's single attempt at a quiz. Teacher, group
/// and subject ids are denormalized from the quiz at grading time so result
/// listings survive quiz edits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuizResult {
    pub(crate) id: i64,
    pub(crate) student_id: i64,
    pub(crate) teacher_id: i64,
    pub(crate) group_id: i64,
    pub(crate) subject_id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) correct_count: i32,
    pub(crate) incorrect_count: i32,
    pub(crate) grade: i32,
    pub(crate) created_at: PrimitiveDateTime,
}
