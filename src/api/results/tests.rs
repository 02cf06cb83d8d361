use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::models::Question;
use crate::test_support;

async fn submit_answers(
    ctx: &test_support::TestContext,
    token: &str,
    quiz_id: i64,
    answers: Vec<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/attempts/{quiz_id}/submit"),
            Some(token),
            Some(json!({ "answers": answers })),
        ))
        .await
        .expect("submit attempt");
    let status = response.status();
    let body = test_support::read_json(response).await;
    (status, body)
}

fn all_correct(questions: &[Question]) -> Vec<serde_json::Value> {
    questions
        .iter()
        .map(|q| json!({ "questionId": q.id, "optionValue": "Right answer" }))
        .collect()
}

#[tokio::test]
async fn teachers_see_own_results_admins_see_all() {
    let Some(ctx) = test_support::try_setup().await else { return };

    let db = ctx.state.db();
    let (quiz_a, questions_a) = test_support::insert_open_quiz(db, 101, 5, 3, 3).await;
    let (quiz_b, questions_b) = test_support::insert_open_quiz(db, 102, 6, 3, 3).await;

    let student_a = test_support::student_token(201, 5, ctx.state.settings());
    let student_b = test_support::student_token(202, 6, ctx.state.settings());

    let (status, body) = submit_answers(&ctx, &student_a, quiz_a.id, all_correct(&questions_a)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    let (status, body) = submit_answers(&ctx, &student_b, quiz_b.id, all_correct(&questions_b)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let teacher = test_support::teacher_token(101, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/results", Some(&teacher), None))
        .await
        .expect("teacher list");
    let list = test_support::read_json(response).await;
    assert_eq!(list["total_count"], 1, "response: {list}");
    assert_eq!(list["items"][0]["teacher_id"], 101);
    assert_eq!(list["items"][0]["student_id"], 201);
    assert_eq!(list["items"][0]["correct"], 3);
    assert_eq!(list["items"][0]["incorrect"], 0);
    assert_eq!(list["items"][0]["grade"], 5);

    let admin = test_support::admin_token(1, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/results", Some(&admin), None))
        .await
        .expect("admin list");
    let list = test_support::read_json(response).await;
    assert_eq!(list["total_count"], 2, "response: {list}");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/results?quizId={}", quiz_a.id),
            Some(&admin),
            None,
        ))
        .await
        .expect("admin list by quiz");
    let list = test_support::read_json(response).await;
    assert_eq!(list["total_count"], 1, "response: {list}");
    assert_eq!(list["items"][0]["quiz_id"], quiz_a.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/results?groupId=6",
            Some(&admin),
            None,
        ))
        .await
        .expect("admin list by group");
    let list = test_support::read_json(response).await;
    assert_eq!(list["total_count"], 1, "response: {list}");
    assert_eq!(list["items"][0]["group_id"], 6);
}

#[tokio::test]
async fn student_reviews_own_results_and_answers() {
    let Some(ctx) = test_support::try_setup().await else { return };

    let (quiz, questions) = test_support::insert_open_quiz(ctx.state.db(), 101, 5, 3, 3).await;
    let token = test_support::student_token(201, 5, ctx.state.settings());

    let mut answers = all_correct(&questions[..2]);
    answers.push(json!({ "questionId": questions[2].id, "optionValue": "Distractor C" }));
    let (status, body) = submit_answers(&ctx, &token, quiz.id, answers).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/results/my", Some(&token), None))
        .await
        .expect("my results");
    let list = test_support::read_json(response).await;
    assert_eq!(list["total_count"], 1, "response: {list}");
    assert_eq!(list["items"][0]["student_id"], 201);
    assert_eq!(list["items"][0]["correct"], 2);
    assert_eq!(list["items"][0]["incorrect"], 1);
    assert_eq!(list["items"][0]["grade"], 3);

    // A classmate who never submitted has nothing to review.
    let classmate = test_support::student_token(202, 5, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/results/my",
            Some(&classmate),
            None,
        ))
        .await
        .expect("classmate results");
    let list = test_support::read_json(response).await;
    assert_eq!(list["total_count"], 0, "response: {list}");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/results/my/answers",
            Some(&token),
            None,
        ))
        .await
        .expect("my answers");
    let list = test_support::read_json(response).await;
    assert_eq!(list["total_count"], 3, "response: {list}");

    let items = list["items"].as_array().expect("items array");
    for item in items {
        assert_eq!(item["quiz_id"], quiz.id);
        assert_eq!(item["correct_answer"], "Right answer");
        assert!(item["question_text"].as_str().is_some());
    }
    let wrong = items.iter().filter(|item| item["selected_option"] == "Distractor C").count();
    assert_eq!(wrong, 1);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/results/my/answers?quizId=999999",
            Some(&token),
            None,
        ))
        .await
        .expect("my answers filtered");
    let list = test_support::read_json(response).await;
    assert_eq!(list["total_count"], 0, "response: {list}");
}

#[tokio::test]
async fn result_lookup_is_owner_or_admin_and_delete_works() {
    let Some(ctx) = test_support::try_setup().await else { return };

    let (quiz, questions) = test_support::insert_open_quiz(ctx.state.db(), 101, 5, 3, 3).await;
    let student = test_support::student_token(201, 5, ctx.state.settings());
    let (status, body) = submit_answers(&ctx, &student, quiz.id, all_correct(&questions)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let teacher = test_support::teacher_token(101, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/results", Some(&teacher), None))
        .await
        .expect("teacher list");
    let list = test_support::read_json(response).await;
    let result_id = list["items"][0]["id"].as_i64().expect("result id");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/results/{result_id}"),
            Some(&student),
            None,
        ))
        .await
        .expect("student get by id");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let foreign = test_support::teacher_token(102, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/results/{result_id}"),
            Some(&foreign),
            None,
        ))
        .await
        .expect("foreign teacher get");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/results/{result_id}"),
            Some(&teacher),
            None,
        ))
        .await
        .expect("owner get");
    let status = response.status();
    let fetched = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {fetched}");
    assert_eq!(fetched["student_id"], 201);
    assert_eq!(fetched["quiz_id"], quiz.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/results/{result_id}"),
            Some(&teacher),
            None,
        ))
        .await
        .expect("owner delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/results/{result_id}"),
            Some(&teacher),
            None,
        ))
        .await
        .expect("get deleted");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
