use axum::http::{Method, StatusCode};
use time::macros::datetime;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

#[tokio::test]
async fn student_sees_own_classes_and_marks_in_order() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let sam =
        test_support::insert_user(db, "Sam", "sam@school.test", UserRole::Student, "pass-1234").await;
    let other =
        test_support::insert_user(db, "Oli", "oli@school.test", UserRole::Student, "pass-1234").await;
    let algebra = test_support::insert_class(db, "Algebra").await;
    let biology = test_support::insert_class(db, "Biology").await;
    test_support::insert_class(db, "Chemistry").await;
    test_support::enroll(db, &algebra.id, &[&sam.id, &other.id]).await;
    test_support::enroll(db, &biology.id, &[&sam.id]).await;

    test_support::insert_mark_at(db, &sam.id, &biology.id, 75.0, datetime!(2024-03-02 10:00)).await;
    test_support::insert_mark_at(db, &sam.id, &algebra.id, 60.0, datetime!(2024-03-01 10:00)).await;
    test_support::insert_mark_at(db, &other.id, &algebra.id, 99.0, datetime!(2024-03-01 11:00))
        .await;

    let token = test_support::bearer_token(&sam, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/student/classes", Some(&token), None))
        .await
        .expect("classes");
    assert_eq!(response.status(), StatusCode::OK);
    let classes = test_support::read_json(response).await;
    let names: Vec<&str> = classes
        .as_array()
        .expect("classes")
        .iter()
        .filter_map(|class| class["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Algebra", "Biology"]);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/student/marks", Some(&token), None))
        .await
        .expect("marks");
    assert_eq!(response.status(), StatusCode::OK);
    let marks = test_support::read_json(response).await;
    let marks = marks.as_array().expect("marks");
    assert_eq!(marks.len(), 2);
    assert_eq!(marks[0]["className"], "Algebra");
    assert_eq!(marks[0]["marks"], 60.0);
    assert_eq!(marks[1]["className"], "Biology");
}

#[tokio::test]
async fn unassigned_student_loses_the_class() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();

    let sam =
        test_support::insert_user(db, "Sam", "sam@school.test", UserRole::Student, "pass-1234").await;
    let algebra = test_support::insert_class(db, "Algebra").await;
    test_support::enroll(db, &algebra.id, &[&sam.id]).await;
    crate::services::roster::unassign_students(db, &algebra.id, &[sam.id.clone()])
        .await
        .expect("unassign");

    let token = test_support::bearer_token(&sam, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/student/classes", Some(&token), None))
        .await
        .expect("classes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(test_support::read_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn teachers_cannot_read_student_marks() {
    let ctx = test_support::setup_test_context().await;
    let teacher = test_support::insert_user(
        ctx.state.db(),
        "Tia",
        "tia@school.test",
        UserRole::Teacher,
        "pass-1234",
    )
    .await;
    let token = test_support::bearer_token(&teacher, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/student/marks", Some(&token), None))
        .await
        .expect("marks");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
