mod common;

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{
    Action, Flow, create_course_action, create_lesson_action, create_module_action, message_of,
    setup_server, setup_test_db,
};

#[tokio::test]
async fn route_course_create_and_get_test() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("create_course", "POST", "/courses")
                .with_body(json!({"title": "Go Basics", "description": "intro"}))
                .with_expect(StatusCode::CREATED)
                .assert_body(|body| {
                    assert_eq!(body["title"], "Go Basics");
                    assert_eq!(body["status"], "IN_PROGRESS");
                    assert_eq!(body["courseLevel"], "BEGINNER");
                    assert!(body["courseId"].is_string());
                    assert!(body["creationDate"].is_string());
                    assert_eq!(body["creationDate"], body["updateDate"]);
                })
                .with_save_as("course"),
        )
        .step(
            Action::new("get_course", "GET", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .assert_with_ctx(|ctx, body| assert_eq!(body, ctx.get("course"))),
        )
        .run(&server)
        .await;

    assert_eq!(db.count_rows("courses").await, 1);
}

#[tokio::test]
async fn route_course_validation_test() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("empty_title", "POST", "/courses")
                .with_body(json!({"title": "", "description": "intro"}))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert_eq!(message_of(body), "Resource error, validation failed.");
                    assert_eq!(body["status_code"], "400");
                    assert!(body["errors"].is_object());
                }),
        )
        .step(
            Action::new("long_description", "POST", "/courses")
                .with_body(json!({"title": "Go", "description": "x".repeat(251)}))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("bad_image", "POST", "/courses")
                .with_body(json!({
                    "title": "Go",
                    "description": "intro",
                    "imageUrl": "not a url",
                }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .run(&server)
        .await;

    assert_eq!(db.count_rows("courses").await, 0);
}

#[tokio::test]
async fn route_course_update_test() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("create_course", "POST", "/courses")
                .with_body(json!({
                    "title": "Go Basics",
                    "description": "intro",
                    "imageUrl": "https://img.example.com/go.png",
                    "courseLevel": "INTERMEDIATE",
                }))
                .with_expect(StatusCode::CREATED)
                .with_save_as("course"),
        )
        .step(
            Action::new("update_course", "PUT", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .with_body(json!({
                    "title": "Go Advanced",
                    "description": "deeper",
                    "status": "CONCLUDED",
                }))
                .assert_with_ctx(|ctx, body| {
                    let before = ctx.get("course");
                    assert_eq!(body["courseId"], before["courseId"]);
                    assert_eq!(body["creationDate"], before["creationDate"]);
                    assert_eq!(body["title"], "Go Advanced");
                    assert_eq!(body["status"], "CONCLUDED");
                    // absent status and level keep their stored values
                    assert_eq!(body["courseLevel"], "INTERMEDIATE");
                    assert!(body.get("imageUrl").is_none());
                }),
        )
        .step(
            Action::new("set_image", "PUT", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .with_body(json!({
                    "title": "Go Advanced",
                    "description": "deeper",
                    "imageUrl": "https://img.example.com/go2.png",
                }))
                .assert_body(|body| {
                    assert_eq!(body["imageUrl"], "https://img.example.com/go2.png")
                }),
        )
        .step(
            Action::new("clear_image", "PUT", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .with_body(json!({
                    "title": "Go Advanced",
                    "description": "deeper",
                    "imageUrl": null,
                }))
                .assert_body(|body| assert!(body.get("imageUrl").is_none())),
        )
        .step(
            Action::new("get_cleared", "GET", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .assert_body(|body| {
                    assert!(body.get("imageUrl").is_none());
                    assert_eq!(body["status"], "CONCLUDED");
                }),
        )
        .step(
            Action::new("update_missing", "PUT", &format!("/courses/{}", uuid::Uuid::new_v4()))
                .with_body(json!({"title": "Go", "description": "intro"}))
                .with_expect(StatusCode::NOT_FOUND)
                .assert_body(|body| assert_eq!(message_of(body), "Course Not Found.")),
        )
        .run(&server)
        .await;
}

#[tokio::test]
async fn route_course_list_test() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    let mut flow = Flow::new();
    for title in ["Go Basics", "Rust Basics", "Advanced Rust"] {
        flow = flow.step(create_course_action(title));
    }

    let today = chrono::Utc::now().format("%d-%m-%Y").to_string();
    let tomorrow = (chrono::Utc::now() + chrono::Duration::days(1))
        .format("%d-%m-%Y")
        .to_string();

    flow.step(
        Action::new("list_all", "GET", "/courses").assert_body(|body| {
            assert_eq!(body["total"], 3);
            assert_eq!(body["items"].as_array().unwrap().len(), 3);
            assert_eq!(body["page"], 0);
            assert_eq!(body["size"], 10);
            assert_eq!(body["totalPages"], 1);
        }),
    )
    .step(
        Action::new("list_by_title", "GET", "/courses")
            .with_param("title", "rust")
            .assert_body(|body| assert_eq!(body["total"], 2)),
    )
    .step(
        Action::new("list_no_match", "GET", "/courses")
            .with_param("title", "cobol")
            .assert_body(|body| {
                assert_eq!(body["total"], 0);
                assert!(body["items"].as_array().unwrap().is_empty());
            }),
    )
    .step(
        Action::new("list_by_level", "GET", "/courses")
            .with_param("courseLevel", "ADVANCED")
            .assert_body(|body| assert_eq!(body["total"], 0)),
    )
    .step(
        Action::new("list_by_day", "GET", "/courses")
            .with_param("creationDate", &today)
            .assert_body(|body| assert_eq!(body["total"], 3)),
    )
    .step(
        Action::new("list_from_tomorrow", "GET", "/courses")
            .with_param("creationDateFrom", &tomorrow)
            .assert_body(|body| assert_eq!(body["total"], 0)),
    )
    .step(
        Action::new("list_sorted_paged", "GET", "/courses")
            .with_param("sort", "title,desc")
            .with_param("size", "2")
            .with_param("page", "0")
            .assert_body(|body| {
                let items = body["items"].as_array().unwrap();
                assert_eq!(items.len(), 2);
                assert_eq!(items[0]["title"], "Rust Basics");
                assert_eq!(items[1]["title"], "Go Basics");
                assert_eq!(body["totalPages"], 2);
            }),
    )
    .step(
        Action::new("list_last_page", "GET", "/courses")
            .with_param("sort", "title,desc")
            .with_param("size", "2")
            .with_param("page", "1")
            .assert_body(|body| {
                let items = body["items"].as_array().unwrap();
                assert_eq!(items.len(), 1);
                assert_eq!(items[0]["title"], "Advanced Rust");
            }),
    )
    .step(
        Action::new("list_bad_sort", "GET", "/courses")
            .with_param("sort", "password")
            .with_expect(StatusCode::BAD_REQUEST),
    )
    .step(
        Action::new("list_bad_size", "GET", "/courses")
            .with_param("size", "0")
            .with_expect(StatusCode::BAD_REQUEST),
    )
    .step(
        Action::new("list_bad_date", "GET", "/courses")
            .with_param("creationDate", "2026-10-17")
            .with_expect(StatusCode::BAD_REQUEST)
            .assert_body(|body| {
                assert!(message_of(body).starts_with("Resource error, bad request: "));
                assert_eq!(body["status_code"], "400");
            }),
    )
    .step(
        Action::new("list_bad_status", "GET", "/courses")
            .with_param("status", "foo")
            .with_expect(StatusCode::BAD_REQUEST)
            .assert_body(|body| {
                assert!(message_of(body).starts_with("Resource error, bad request: "))
            }),
    )
    .step(
        Action::new("list_bad_page", "GET", "/courses")
            .with_param("page", "-1")
            .with_expect(StatusCode::BAD_REQUEST)
            .assert_body(|body| assert_eq!(body["status_code"], "400")),
    )
    .run(&server)
    .await;
}

#[tokio::test]
async fn route_course_eager_fetch_test() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    Flow::new()
        .step(create_course_action("Go Basics").with_save_as("course"))
        .step(create_module_action("course", "Syntax"))
        .step(create_module_action("course", "Concurrency"))
        .step(
            Action::new("get_lazy", "GET", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .assert_body(|body| assert!(body.get("modules").is_none())),
        )
        .step(
            Action::new("get_bad_fetch", "GET", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .with_param("fetch", "sideways")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    assert!(message_of(body).starts_with("Resource error, bad request: "))
                }),
        )
        .step(
            Action::new("get_eager", "GET", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .with_param("fetch", "eager")
                .assert_with_ctx(|ctx, body| {
                    assert_eq!(body["courseId"], ctx.get("course")["courseId"]);
                    let modules = body["modules"].as_array().unwrap();
                    assert_eq!(modules.len(), 2);
                    assert!(modules.iter().all(|m| m["courseId"] == body["courseId"]));
                }),
        )
        .run(&server)
        .await;
}

#[tokio::test]
async fn route_course_delete_test() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    Flow::new()
        .step(create_course_action("Go Basics").with_save_as("course"))
        .step(create_course_action("Rust Basics"))
        .step(create_module_action("course", "Syntax").with_save_as("module"))
        .step(create_lesson_action("module", "Variables"))
        .step(create_lesson_action("module", "Loops"))
        .step(
            Action::new("delete_course", "DELETE", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .assert_body(|body| assert_eq!(message_of(body), "Course deleted successfully.")),
        )
        .step(
            Action::new("get_deleted", "GET", "")
                .with_dyn_path(|ctx| format!("/courses/{}", ctx.field("course", "courseId")))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("delete_missing", "DELETE", &format!("/courses/{}", uuid::Uuid::new_v4()))
                .with_expect(StatusCode::NOT_FOUND)
                .assert_body(|body| assert_eq!(message_of(body), "Course Not Found.")),
        )
        .run(&server)
        .await;

    assert_eq!(db.count_rows("courses").await, 1);
    assert_eq!(db.count_rows("modules").await, 0);
    assert_eq!(db.count_rows("lessons").await, 0);
}
