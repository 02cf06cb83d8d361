use serde::{Deserialize, Serialize};
use validator::Validate;

pub(crate) use crate::core::time::format_primitive;
use crate::db::models::Question;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: i64,
    #[serde(default)]
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub(crate) text: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "image must not be empty"))]
    pub(crate) image: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionA")]
    #[validate(length(min = 1, message = "option_a must not be empty"))]
    pub(crate) option_a: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionAImage")]
    #[validate(length(min = 1, message = "option_a_image must not be empty"))]
    pub(crate) option_a_image: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionB")]
    pub(crate) option_b: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionBImage")]
    pub(crate) option_b_image: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionC")]
    pub(crate) option_c: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionCImage")]
    pub(crate) option_c_image: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionD")]
    pub(crate) option_d: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionDImage")]
    pub(crate) option_d_image: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct QuestionUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub(crate) text: Option<String>,
    #[serde(default)]
    pub(crate) image: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionA")]
    #[validate(length(min = 1, message = "option_a must not be empty"))]
    pub(crate) option_a: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionAImage")]
    pub(crate) option_a_image: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionB")]
    pub(crate) option_b: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionBImage")]
    pub(crate) option_b_image: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionC")]
    pub(crate) option_c: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionCImage")]
    pub(crate) option_c_image: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionD")]
    pub(crate) option_d: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionDImage")]
    pub(crate) option_d_image: Option<String>,
}

/// One row of a bulk import. The importer checks rows itself so it can point
/// at the offending row number instead of a generic validation error.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct QuestionImportRow {
    #[serde(default)]
    pub(crate) text: String,
    #[serde(default)]
    #[serde(alias = "optionA")]
    pub(crate) option_a: String,
    #[serde(default)]
    #[serde(alias = "optionB")]
    pub(crate) option_b: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionC")]
    pub(crate) option_c: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionD")]
    pub(crate) option_d: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionBulkCreate {
    #[serde(alias = "subjectId")]
    pub(crate) subject_id: i64,
    #[validate(length(min = 1, message = "questions must not be empty"))]
    pub(crate) questions: Vec<QuestionImportRow>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
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
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            subject_id: question.subject_id,
            teacher_id: question.teacher_id,
            text: question.text,
            image: question.image,
            option_a: question.option_a,
            option_a_image: question.option_a_image,
            option_b: question.option_b,
            option_b_image: question.option_b_image,
            option_c: question.option_c,
            option_c_image: question.option_c_image,
            option_d: question.option_d,
            option_d_image: question.option_d_image,
            created_at: format_primitive(question.created_at),
            updated_at: format_primitive(question.updated_at),
        }
    }
}
