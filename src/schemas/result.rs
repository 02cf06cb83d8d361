use serde::Serialize;

pub(crate) use crate::core::time::format_primitive;
use crate::db::models::QuizResult;
use crate::repositories::answers::StudentAnswerRow;

#[derive(Debug, Serialize)]
pub(crate) struct ResultResponse {
    pub(crate) id: i64,
    pub(crate) student_id: i64,
    pub(crate) teacher_id: i64,
    pub(crate) group_id: i64,
    pub(crate) subject_id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) correct: i32,
    pub(crate) incorrect: i32,
    pub(crate) grade: i32,
    pub(crate) created_at: String,
}

impl From<QuizResult> for ResultResponse {
    fn from(result: QuizResult) -> Self {
        Self {
            id: result.id,
            student_id: result.student_id,
            teacher_id: result.teacher_id,
            group_id: result.group_id,
            subject_id: result.subject_id,
            quiz_id: result.quiz_id,
            correct: result.correct_count,
            incorrect: result.incorrect_count,
            grade: result.grade,
            created_at: format_primitive(result.created_at),
        }
    }
}

/// A student's own answer with the question it belongs to, for reviewing a
/// graded attempt.
#[derive(Debug, Serialize)]
pub(crate) struct StudentAnswerResponse {
    pub(crate) quiz_id: i64,
    pub(crate) question_id: i64,
    pub(crate) question_text: Option<String>,
    pub(crate) correct_answer: Option<String>,
    pub(crate) correct_answer_image: Option<String>,
    pub(crate) selected_option: String,
    pub(crate) option_a: Option<String>,
    pub(crate) option_b: Option<String>,
    pub(crate) option_c: Option<String>,
    pub(crate) option_d: Option<String>,
    pub(crate) created_at: String,
}

impl From<StudentAnswerRow> for StudentAnswerResponse {
    fn from(row: StudentAnswerRow) -> Self {
        Self {
            quiz_id: row.quiz_id,
            question_id: row.question_id,
            question_text: row.question_text,
            correct_answer: row.canonical_answer,
            correct_answer_image: row.canonical_answer_image,
            selected_option: row.selected_option,
            option_a: row.option_a,
            option_b: row.option_b,
            option_c: row.option_c,
            option_d: row.option_d,
            created_at: format_primitive(row.created_at),
        }
    }
}
