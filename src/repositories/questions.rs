use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Question;

pub(crate) const COLUMNS: &str = "\
    id, subject_id, teacher_id, text, image, \
    option_a, option_a_image, option_b, option_b_image, \
    option_c, option_c_image, option_d, option_d_image, \
    created_at, updated_at";

pub(crate) struct CreateQuestion<'a> {
    pub(crate) subject_id: i64,
    pub(crate) teacher_id: i64,
    pub(crate) text: Option<&'a str>,
    pub(crate) image: Option<&'a str>,
    pub(crate) option_a: Option<&'a str>,
    pub(crate) option_a_image: Option<&'a str>,
    pub(crate) option_b: Option<&'a str>,
    pub(crate) option_b_image: Option<&'a str>,
    pub(crate) option_c: Option<&'a str>,
    pub(crate) option_c_image: Option<&'a str>,
    pub(crate) option_d: Option<&'a str>,
    pub(crate) option_d_image: Option<&'a str>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Default)]
pub(crate) struct UpdateQuestion {
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
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct QuestionFilter {
    pub(crate) teacher_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
}

pub(crate) async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    question: CreateQuestion<'_>,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (
            subject_id, teacher_id, text, image,
            option_a, option_a_image, option_b, option_b_image,
            option_c, option_c_image, option_d, option_d_image,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14)
        RETURNING {COLUMNS}"
    ))
    .bind(question.subject_id)
    .bind(question.teacher_id)
    .bind(question.text)
    .bind(question.image)
    .bind(question.option_a)
    .bind(question.option_a_image)
    .bind(question.option_b)
    .bind(question.option_b_image)
    .bind(question.option_c)
    .bind(question.option_c_image)
    .bind(question.option_d)
    .bind(question.option_d_image)
    .bind(question.created_at)
    .bind(question.updated_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn create_many(
    executor: impl sqlx::PgExecutor<'_>,
    questions: &[CreateQuestion<'_>],
) -> Result<u64, sqlx::Error> {
    if questions.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO questions (
            subject_id, teacher_id, text, image,
            option_a, option_a_image, option_b, option_b_image,
            option_c, option_c_image, option_d, option_d_image,
            created_at, updated_at
        ) ",
    );
    builder.push_values(questions, |mut row, question| {
        row.push_bind(question.subject_id)
            .push_bind(question.teacher_id)
            .push_bind(question.text)
            .push_bind(question.image)
            .push_bind(question.option_a)
            .push_bind(question.option_a_image)
            .push_bind(question.option_b)
            .push_bind(question.option_b_image)
            .push_bind(question.option_c)
            .push_bind(question.option_c_image)
            .push_bind(question.option_d)
            .push_bind(question.option_d_image)
            .push_bind(question.created_at)
            .push_bind(question.updated_at);
    });

    let result = builder.build().execute(executor).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: QuestionFilter,
    skip: i64,
    limit: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM questions"));
    push_filter(&mut builder, filter);

    builder.push(" ORDER BY id OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<Question>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &PgPool, filter: QuestionFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM questions");
    push_filter(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: QuestionFilter) {
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
    if let Some(subject_id) = filter.subject_id {
        if !has_where {
            builder.push(" WHERE ");
        } else {
            builder.push(" AND ");
        }
        builder.push("subject_id = ");
        builder.push_bind(subject_id);
    }
}

/// Ids of every question a teacher has authored for a subject, the sampling
/// universe for new quizzes.
pub(crate) async fn ids_for_teacher_subject(
    executor: impl sqlx::PgExecutor<'_>,
    teacher_id: i64,
    subject_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT id FROM questions WHERE teacher_id = $1 AND subject_id = $2 ORDER BY id",
    )
    .bind(teacher_id)
    .bind(subject_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: i64,
    update: UpdateQuestion,
    updated_at: PrimitiveDateTime,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions SET
            text = COALESCE($2, text),
            image = COALESCE($3, image),
            option_a = COALESCE($4, option_a),
            option_a_image = COALESCE($5, option_a_image),
            option_b = COALESCE($6, option_b),
            option_b_image = COALESCE($7, option_b_image),
            option_c = COALESCE($8, option_c),
            option_c_image = COALESCE($9, option_c_image),
            option_d = COALESCE($10, option_d),
            option_d_image = COALESCE($11, option_d_image),
            updated_at = $12
        WHERE id = $1
        RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(update.text)
    .bind(update.image)
    .bind(update.option_a)
    .bind(update.option_a_image)
    .bind(update.option_b)
    .bind(update.option_b_image)
    .bind(update.option_c)
    .bind(update.option_c_image)
    .bind(update.option_d)
    .bind(update.option_d_image)
    .bind(updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM questions WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}
