use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::PgPool;
use time::{Duration, PrimitiveDateTime};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, security, state::AppState, time::primitive_now_utc};
use crate::db::models::{Question, Quiz};
use crate::repositories;

const TEST_SECRET_KEY: &str = "test-secret";

pub(crate) const TEST_PIN: &str = "4242";

pub(crate) const TEACHER_PERMISSIONS: &[&str] = &[
    "create:question",
    "read:question",
    "update:question",
    "delete:question",
    "create:quiz",
    "read:quiz",
    "update:quiz",
    "delete:quiz",
    "read:result",
    "delete:result",
];

pub(crate) const STUDENT_PERMISSIONS: &[&str] = &["read:attempt", "create:attempt", "read:result"];

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

fn env_mutex() -> Arc<Mutex<()>> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone()
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    env_mutex().lock_owned().await
}

/// Same lock as [`env_lock`], for synchronous unit tests. Must not be called
/// from inside a runtime.
pub(crate) fn env_lock_blocking() -> OwnedMutexGuard<()> {
    env_mutex().blocking_lock_owned()
}

pub(crate) fn set_test_env() {
    dotenvy::dotenv().ok();

    std::env::set_var("UNIQUIZ_ENV", "test");
    std::env::set_var("UNIQUIZ_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::remove_var("ALGORITHM");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
}

/// Builds a context against the database named by UNIQUIZ_TEST_DATABASE_URL,
/// or returns None (skipping the test) when no test database is configured.
pub(crate) async fn try_setup() -> Option<TestContext> {
    let guard = env_lock().await;
    set_test_env();

    let url = match std::env::var("UNIQUIZ_TEST_DATABASE_URL") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            eprintln!("skipping: UNIQUIZ_TEST_DATABASE_URL is not set");
            return None;
        }
    };
    std::env::set_var("DATABASE_URL", &url);

    let settings = Settings::load().expect("settings");
    let db = prepare_db(&settings).await;

    let state = AppState::new(settings, db);
    let app = api::router::router(state.clone());

    Some(TestContext { state, app, _guard: guard })
}

async fn prepare_db(settings: &Settings) -> PgPool {
    let db = crate::db::init_pool(settings).await.expect("db pool");
    let current_db: String = sqlx::query_scalar("SELECT current_database()")
        .fetch_one(&db)
        .await
        .expect("current database");
    assert!(current_db.ends_with("_test"), "refusing to reset non-test database {current_db}");

    reset_public_schema(&db).await.expect("reset schema");
    ensure_schema(&db).await.expect("schema");
    let has_id: Option<i32> = sqlx::query_scalar(
        "SELECT 1 FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = 'questions' AND column_name = 'id'",
    )
    .fetch_optional(&db)
    .await
    .expect("questions schema");
    assert!(has_id.is_some(), "questions.id missing");

    reset_db(&db).await.expect("reset db");
    db
}

async fn reset_public_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("DROP SCHEMA IF EXISTS public CASCADE").execute(pool).await?;
    sqlx::query("CREATE SCHEMA public").execute(pool).await?;
    Ok(())
}

pub(crate) async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir =
        std::env::var("UNIQUIZ_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    let mut migrator = sqlx::migrate::Migrator::new(std::path::Path::new(&migrations_dir))
        .await
        .map_err(|error| sqlx::Error::Migrate(Box::new(error)))?;
    migrator.set_ignore_missing(true);
    migrator.run(pool).await.map_err(|error| sqlx::Error::Migrate(Box::new(error)))?;
    Ok(())
}

pub(crate) async fn reset_db(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "TRUNCATE attempt_answers, results, quiz_questions, quizzes, questions \
         RESTART IDENTITY CASCADE",
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn insert_question(
    pool: &PgPool,
    teacher_id: i64,
    subject_id: i64,
    text: &str,
    correct_answer: &str,
) -> Question {
    let now = primitive_now_utc();
    repositories::questions::create(
        pool,
        repositories::questions::CreateQuestion {
            subject_id,
            teacher_id,
            text: Some(text),
            image: None,
            option_a: Some(correct_answer),
            option_a_image: None,
            option_b: Some("Distractor B"),
            option_b_image: None,
            option_c: Some("Distractor C"),
            option_c_image: None,
            option_d: Some("Distractor D"),
            option_d_image: None,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert question")
}

/// `count` questions for one teacher and subject, all with the same correct
/// answer "Right answer".
pub(crate) async fn insert_question_pool(
    pool: &PgPool,
    teacher_id: i64,
    subject_id: i64,
    count: usize,
) -> Vec<Question> {
    let mut questions = Vec::with_capacity(count);
    for index in 1..=count {
        let text = format!("Question {index}");
        questions.push(insert_question(pool, teacher_id, subject_id, &text, "Right answer").await);
    }
    questions
}

pub(crate) async fn insert_quiz(
    pool: &PgPool,
    teacher_id: i64,
    group_id: i64,
    subject_id: i64,
    question_count: i32,
    start_time: PrimitiveDateTime,
) -> Quiz {
    let now = primitive_now_utc();
    repositories::quizzes::create(
        pool,
        repositories::quizzes::CreateQuiz {
            name: "Algebra quiz",
            teacher_id,
            group_id,
            subject_id,
            question_count,
            duration_minutes: 60,
            start_time,
            pin: TEST_PIN,
            is_activated: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert quiz")
}

pub(crate) async fn assign_questions(pool: &PgPool, quiz_id: i64, question_ids: &[i64]) {
    repositories::assignments::insert_for_quiz(pool, quiz_id, question_ids)
        .await
        .expect("assign questions");
}

/// A quiz five minutes into its window with its full pool already assigned.
pub(crate) async fn insert_open_quiz(
    pool: &PgPool,
    teacher_id: i64,
    group_id: i64,
    subject_id: i64,
    question_count: usize,
) -> (Quiz, Vec<Question>) {
    let questions = insert_question_pool(pool, teacher_id, subject_id, question_count).await;
    let start_time = primitive_now_utc() - Duration::minutes(5);
    let quiz = insert_quiz(
        pool,
        teacher_id,
        group_id,
        subject_id,
        question_count as i32,
        start_time,
    )
    .await;

    let ids: Vec<i64> = questions.iter().map(|question| question.id).collect();
    assign_questions(pool, quiz.id, &ids).await;

    (quiz, questions)
}

pub(crate) fn bearer_token(
    user_id: i64,
    role: &str,
    group_id: Option<i64>,
    permissions: &[&str],
    settings: &Settings,
) -> String {
    security::create_identity_token(
        security::IdentityTokenParams {
            subject: &user_id.to_string(),
            role,
            group_id,
            permissions: permissions.iter().map(|permission| permission.to_string()).collect(),
        },
        settings,
        None,
    )
    .expect("token")
}

pub(crate) fn teacher_token(user_id: i64, settings: &Settings) -> String {
    bearer_token(user_id, "teacher", None, TEACHER_PERMISSIONS, settings)
}

pub(crate) fn student_token(user_id: i64, group_id: i64, settings: &Settings) -> String {
    bearer_token(user_id, "student", Some(group_id), STUDENT_PERMISSIONS, settings)
}

pub(crate) fn admin_token(user_id: i64, settings: &Settings) -> String {
    let permissions: Vec<&str> =
        TEACHER_PERMISSIONS.iter().chain(STUDENT_PERMISSIONS).copied().collect();
    bearer_token(user_id, "admin", None, &permissions, settings)
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
