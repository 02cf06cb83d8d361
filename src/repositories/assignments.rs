use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::Question;
use crate::repositories::questions;

/// Freezes the sampled pool for a quiz. The UNIQUE (quiz_id, question_id)
/// constraint makes accidental double-assignment a hard failure.
pub(crate) async fn insert_for_quiz(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: i64,
    question_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    if question_ids.is_empty() {
        return Ok(0);
    }

    let mut builder =
        QueryBuilder::<Postgres>::new("INSERT INTO quiz_questions (quiz_id, question_id) ");
    builder.push_values(question_ids.iter().copied(), |mut row, question_id| {
        row.push_bind(quiz_id).push_bind(question_id);
    });

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn count_for_quiz(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM quiz_questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .fetch_one(executor)
        .await
}

/// How many quizzes still reference a question. Non-zero blocks question
/// edits and deletes.
pub(crate) async fn count_for_question(
    executor: impl sqlx::PgExecutor<'_>,
    question_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM quiz_questions WHERE question_id = $1")
        .bind(question_id)
        .fetch_one(executor)
        .await
}

pub(crate) async fn question_ids_for_quiz(
    executor: impl sqlx::PgExecutor<'_>,
    quiz_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT question_id FROM quiz_questions WHERE quiz_id = $1 ORDER BY id")
        .bind(quiz_id)
        .fetch_all(executor)
        .await
}

/// Full question rows of a quiz's frozen pool, in assignment order.
pub(crate) async fn questions_for_quiz(
    pool: &PgPool,
    quiz_id: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {} FROM questions q
         JOIN quiz_questions qq ON qq.question_id = q.id
         WHERE qq.quiz_id = $1
         ORDER BY qq.id",
        qualified_columns()
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

fn qualified_columns() -> String {
    questions::COLUMNS
        .split(',')
        .map(|column| format!("q.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
