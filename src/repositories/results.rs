use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::QuizResult;

pub(crate) const COLUMNS: &str = "\
    id, student_id, teacher_id, group_id, subject_id, quiz_id, \
    correct_count, incorrect_count, grade, created_at";

pub(crate) struct CreateResult {
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

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ResultFilter {
    pub(crate) teacher_id: Option<i64>,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
}

/// Inserts the graded result, relying on UNIQUE (student_id, quiz_id) to
/// serialize concurrent submissions. Returns None when a result already
/// exists for the pair.
pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    result: CreateResult,
) -> Result<Option<QuizResult>, sqlx::Error> {
    sqlx::query_as::<_, QuizResult>(&format!(
        "INSERT INTO results (
            student_id, teacher_id, group_id, subject_id, quiz_id,
            correct_count, incorrect_count, grade, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
        ON CONFLICT (student_id, quiz_id) DO NOTHING
        RETURNING {COLUMNS}"
    ))
    .bind(result.student_id)
    .bind(result.teacher_id)
    .bind(result.group_id)
    .bind(result.subject_id)
    .bind(result.quiz_id)
    .bind(result.correct_count)
    .bind(result.incorrect_count)
    .bind(result.grade)
    .bind(result.created_at)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<QuizResult>, sqlx::Error> {
    sqlx::query_as::<_, QuizResult>(&format!("SELECT {COLUMNS} FROM results WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: ResultFilter,
    skip: i64,
    limit: i64,
) -> Result<Vec<QuizResult>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM results"));
    push_filter(&mut builder, filter);

    builder.push(" ORDER BY created_at DESC, id DESC OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<QuizResult>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &PgPool, filter: ResultFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM results");
    push_filter(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: ResultFilter) {
    let mut has_where = false;

    if let Some(teacher_id) = filter.teacher_id {
        if !has_where {
            builder.push(" WHERE ");
            has_where = true;
        } else {
            builder.push(" AND ");
        }
        builder.push("teacher_id = ");
        builder.push_bind(teacher_id);
    }
    if let Some(quiz_id) = filter.quiz_id {
        if !has_where {
            builder.push(" WHERE ");
            has_where = true;
        } else {
            builder.push(" AND ");
        }
        builder.push("quiz_id = ");
        builder.push_bind(quiz_id);
    }
    if let Some(group_id) = filter.group_id {
        if !has_where {
            builder.push(" WHERE ");
        } else {
            builder.push(" AND ");
        }
        builder.push("group_id = ");
        builder.push_bind(group_id);
    }
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<QuizResult>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM results WHERE student_id = "
    ));
    builder.push_bind(student_id);

    builder.push(" ORDER BY created_at DESC, id DESC OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<QuizResult>().fetch_all(pool).await
}

pub(crate) async fn count_for_student(
    pool: &PgPool,
    student_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM results WHERE student_id = $1")
        .bind(student_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM results WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}
