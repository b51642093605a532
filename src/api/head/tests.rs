use axum::http::{Method, StatusCode};
use serde_json::Value;
use time::macros::datetime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::db::models::{Class, User};
use crate::db::types::UserRole;
use crate::test_support::{self, TestContext};

struct Gradebook {
    ctx: TestContext,
    token: String,
    algebra: Class,
    biology: Class,
    ann: User,
    ben: User,
    cal: User,
}

/// Ann climbs 40 → 100 over four days, Ben drops 90 → 40, Cal sits in another class.
async fn gradebook() -> Gradebook {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let head =
        test_support::insert_user(db, "Hal Head", "hal@school.test", UserRole::Head, "pass-1234")
            .await;
    let token = test_support::bearer_token(&head, ctx.state.settings());

    let ann =
        test_support::insert_user(db, "Ann", "ann@school.test", UserRole::Student, "pass-1234").await;
    let ben =
        test_support::insert_user(db, "Ben", "ben@school.test", UserRole::Student, "pass-1234").await;
    let cal =
        test_support::insert_user(db, "Cal", "cal@school.test", UserRole::Student, "pass-1234").await;

    let algebra = test_support::insert_class(db, "Algebra").await;
    let biology = test_support::insert_class(db, "Biology").await;
    test_support::enroll(db, &algebra.id, &[&ann.id, &ben.id]).await;
    test_support::enroll(db, &biology.id, &[&cal.id]).await;

    test_support::insert_mark_at(db, &ann.id, &algebra.id, 40.0, datetime!(2024-01-01 08:00)).await;
    test_support::insert_mark_at(db, &ann.id, &algebra.id, 60.0, datetime!(2024-01-02 08:00)).await;
    test_support::insert_mark_at(db, &ann.id, &algebra.id, 80.0, datetime!(2024-01-03 08:00)).await;
    test_support::insert_mark_at(db, &ann.id, &algebra.id, 100.0, datetime!(2024-01-04 08:00)).await;
    test_support::insert_mark_at(db, &ben.id, &algebra.id, 90.0, datetime!(2024-01-01 09:00)).await;
    test_support::insert_mark_at(db, &ben.id, &algebra.id, 40.0, datetime!(2024-01-03 09:00)).await;
    test_support::insert_mark_at(db, &cal.id, &biology.id, 70.0, datetime!(2024-01-02 10:00)).await;

    Gradebook { ctx, token, algebra, biology, ann, ben, cal }
}

async fn get(ctx: &TestContext, token: &str, uri: &str) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, uri, Some(token), None))
        .await
        .expect("response");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

fn approx(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap_or_else(|| panic!("not a number: {value}"));
    assert!((actual - expected).abs() < 0.01, "expected {expected}, got {actual}");
}

#[tokio::test]
async fn class_results_aggregate_enrolled_students() {
    let gb = gradebook().await;

    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/results/class/{}", gb.algebra.id)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["classname"], "Algebra");
    assert!(body.get("className").is_none());

    let stats = &body["classStats"];
    assert_eq!(stats["totalStudents"], 2);
    assert_eq!(stats["totalMarkEntries"], 6);
    approx(&stats["highestMark"], 100.0);
    approx(&stats["lowestMark"], 40.0);
    approx(&stats["averageMark"], 410.0 / 6.0);

    let students = body["students"].as_array().expect("students");
    let ann = students.iter().find(|s| s["studentId"] == gb.ann.id.as_str()).expect("ann");
    approx(&ann["totalMarks"], 280.0);
    approx(&ann["averageMarks"], 70.0);
    assert_eq!(ann["subjectsCount"], 4);
    assert_eq!(ann["marks"][0]["className"], "Algebra");

    let (status, body) = get(
        &gb.ctx,
        &gb.token,
        &format!("/api/head/results/class/{}", gb.algebra.id.to_uppercase()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["classId"], gb.algebra.id);
}

#[tokio::test]
async fn class_results_report_missing_data() {
    let gb = gradebook().await;
    let db = gb.ctx.state.db();

    let empty = test_support::insert_class(db, "Empty").await;
    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/results/class/{}", empty.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No students enrolled in this class");

    let unmarked = test_support::insert_class(db, "Unmarked").await;
    let dee =
        test_support::insert_user(db, "Dee", "dee@school.test", UserRole::Student, "pass-1234").await;
    test_support::enroll(db, &unmarked.id, &[&dee.id]).await;
    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/results/class/{}", unmarked.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No marks found for this class");

    let (status, _) = get(&gb.ctx, &gb.token, "/api/head/results/class/12345").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/results/class/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Class not found");
}

#[tokio::test]
async fn student_graph_reports_trend_and_spread() {
    let gb = gradebook().await;

    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/graph/student/{}", gb.ann.id)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["student"]["name"], "Ann");
    assert_eq!(body["trend"], "improving");
    approx(&body["trendPercentage"], 80.0);
    assert_eq!(body["stats"]["totalEntries"], 4);
    approx(&body["stats"]["averageMarks"], 70.0);
    approx(&body["stats"]["standardDeviation"], 22.36);

    let labels = body["chartData"]["labels"].as_array().expect("labels");
    assert_eq!(labels.len(), 4);
    assert_eq!(labels[0], "2024-01-01");
    assert_eq!(body["chartData"]["datasets"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["graphConfig"]["type"], "line");

    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/graph/student/{}", gb.ben.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trend"], "declining");
    approx(&body["trendPercentage"], -55.56);
}

#[tokio::test]
async fn student_graph_distinguishes_unknown_and_unmarked_students() {
    let gb = gradebook().await;
    let quiet = test_support::insert_user(
        gb.ctx.state.db(),
        "Quinn",
        "quinn@school.test",
        UserRole::Student,
        "pass-1234",
    )
    .await;

    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/graph/student/{}", quiet.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No marks found for this student");

    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/graph/student/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Student not found");
}

#[tokio::test]
async fn class_graph_aligns_students_on_a_shared_axis() {
    let gb = gradebook().await;

    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/graph?classId={}", gb.algebra.id)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let overall = &body["overallStats"];
    assert_eq!(overall["totalStudents"], 2);
    assert_eq!(overall["studentsImproving"], 1);
    assert_eq!(overall["studentsDeclining"], 1);
    assert_eq!(overall["studentsStable"], 0);
    approx(&overall["highestOverall"], 100.0);
    approx(&overall["lowestOverall"], 40.0);

    let labels = body["chartData"]["labels"].as_array().expect("labels");
    assert_eq!(labels.len(), 4);
    let datasets = body["chartData"]["datasets"].as_array().expect("datasets");
    assert_eq!(datasets[0]["label"], "Ann");
    assert_eq!(datasets[1]["label"], "Ben");
    let ben_data = datasets[1]["data"].as_array().expect("data");
    assert_eq!(ben_data.len(), 4);
    approx(&ben_data[0], 90.0);
    assert!(ben_data[1].is_null());
    approx(&ben_data[2], 40.0);
    assert!(ben_data[3].is_null());

    let (status, body) = get(&gb.ctx, &gb.token, "/api/head/graph").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallStats"]["totalStudents"], 3);
}

#[tokio::test]
async fn class_graph_honours_date_range_and_filters() {
    let gb = gradebook().await;

    let (status, body) = get(
        &gb.ctx,
        &gb.token,
        &format!(
            "/api/head/graph?classId={}&startDate=2024-01-02&endDate=2024-01-03",
            gb.algebra.id
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    let details = body["studentDetails"].as_array().expect("details");
    assert_eq!(details.len(), 2);
    let ann = details.iter().find(|d| d["studentId"] == gb.ann.id.as_str()).expect("ann");
    assert_eq!(ann["progressData"].as_array().map(Vec::len), Some(2));
    approx(&ann["trendPercentage"], 33.33);
    let ben = details.iter().find(|d| d["studentId"] == gb.ben.id.as_str()).expect("ben");
    assert_eq!(ben["trend"], "stable");

    let (status, body) = get(
        &gb.ctx,
        &gb.token,
        &format!("/api/head/graph?classId={}&studentId={}", gb.algebra.id, gb.cal.id),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No marks data found for the given criteria");

    let (status, body) =
        get(&gb.ctx, &gb.token, &format!("/api/head/graph?studentId={}", gb.cal.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["studentDetails"][0]["progressData"][0]["subjectId"], gb.biology.id);

    let (status, _) =
        get(&gb.ctx, &gb.token, "/api/head/graph?startDate=2024-02-01&endDate=2024-01-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&gb.ctx, &gb.token, "/api/head/graph?startDate=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analytics_are_limited_to_heads_and_admins() {
    let gb = gradebook().await;
    let db = gb.ctx.state.db();
    let uri = format!("/api/head/results/class/{}", gb.algebra.id);

    let admin =
        test_support::insert_user(db, "Ada", "ada@school.test", UserRole::Admin, "pass-1234").await;
    let admin_token = test_support::bearer_token(&admin, gb.ctx.state.settings());
    let (status, _) = get(&gb.ctx, &admin_token, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let teacher =
        test_support::insert_user(db, "Tia", "tia@school.test", UserRole::Teacher, "pass-1234")
            .await;
    let teacher_token = test_support::bearer_token(&teacher, gb.ctx.state.settings());
    let (status, body) = get(&gb.ctx, &teacher_token, &uri).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Head access required");
}
