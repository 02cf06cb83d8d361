use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

pub(crate) struct CreateAnswer<'a> {
    pub(crate) quiz_id: i64,
    pub(crate) student_id: i64,
    pub(crate) question_id: i64,
    pub(crate) option_value: &'a str,
    pub(crate) created_at: PrimitiveDateTime,
}

/// One submitted answer joined with its question, for the student's review
/// view. `canonical_answer` mirrors option A, the stored correct choice.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StudentAnswerRow {
    pub(crate) quiz_id: i64,
    pub(crate) question_id: i64,
    pub(crate) question_text: Option<String>,
    pub(crate) canonical_answer: Option<String>,
    pub(crate) canonical_answer_image: Option<String>,
    pub(crate) selected_option: String,
    pub(crate) option_a: Option<String>,
    pub(crate) option_b: Option<String>,
    pub(crate) option_c: Option<String>,
    pub(crate) option_d: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn insert_many(
    executor: impl sqlx::PgExecutor<'_>,
    answers: &[CreateAnswer<'_>],
) -> Result<u64, sqlx::Error> {
    if answers.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO attempt_answers (quiz_id, student_id, question_id, option_value, created_at) ",
    );
    builder.push_values(answers, |mut row, answer| {
        row.push_bind(answer.quiz_id)
            .push_bind(answer.student_id)
            .push_bind(answer.question_id)
            .push_bind(answer.option_value)
            .push_bind(answer.created_at);
    });

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: i64,
    quiz_id: Option<i64>,
    skip: i64,
    limit: i64,
) -> Result<Vec<StudentAnswerRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT aa.quiz_id, aa.question_id, q.text AS question_text,
                q.option_a AS canonical_answer, q.option_a_image AS canonical_answer_image,
                aa.option_value AS selected_option,
                q.option_a, q.option_b, q.option_c, q.option_d,
                aa.created_at
         FROM attempt_answers aa
         JOIN questions q ON q.id = aa.question_id
         WHERE aa.student_id = ",
    );
    builder.push_bind(student_id);

    if let Some(quiz_id) = quiz_id {
        builder.push(" AND aa.quiz_id = ");
        builder.push_bind(quiz_id);
    }

    builder.push(" ORDER BY aa.created_at DESC, aa.id DESC OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<StudentAnswerRow>().fetch_all(pool).await
}

pub(crate) async fn count_for_student(
    pool: &PgPool,
    student_id: i64,
    quiz_id: Option<i64>,
) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*) FROM attempt_answers WHERE student_id = ",
    );
    builder.push_bind(student_id);

    if let Some(quiz_id) = quiz_id {
        builder.push(" AND quiz_id = ");
        builder.push_bind(quiz_id);
    }

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}
