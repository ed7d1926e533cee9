use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use uuid::Uuid;

use recipebox_schema::{auth_tokens, tags, users};
use recipebox_server::router::build_router;
use recipebox_server::state::AppState;
use recipebox_testing::auth::TestToken;

use crate::helpers::test_hasher;

/// Router over a disconnected database. Only behavior decided before the
/// first query can be observed; anything reaching the database is a 500.
fn server() -> TestServer {
    server_with(DatabaseConnection::Disconnected)
}

/// Router over a scripted database. Each query consumes the next result set.
fn server_with(db: DatabaseConnection) -> TestServer {
    let state = AppState {
        db,
        hasher: test_hasher(),
        media_root: std::env::temp_dir().join("recipebox-router-test"),
        media_url: "/media/".to_owned(),
        max_upload_bytes: 1024 * 1024,
    };
    TestServer::new(build_router(state)).unwrap()
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_healthz() {
    let server = server();

    let response = server.get("/healthz").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn should_fail_readyz_without_database() {
    let server = server();

    let response = server.get("/readyz").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["kind"], "INTERNAL");
}

#[tokio::test]
async fn should_set_request_id_header() {
    let server = server();

    let response = server.get("/healthz").await;

    assert!(response.headers().contains_key("x-request-id"));
}

// ── /users/me ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_token_for_me() {
    let server = server();

    let response = server.get("/users/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_reject_malformed_token() {
    let server = server();
    let token = TestToken::new("not-a-real-token");
    let (name, value) = token.header();

    let response = server.get("/users/me").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_unknown_auth_scheme() {
    let server = server();

    let response = server
        .get("/users/me")
        .add_header("Authorization", format!("Basic {}", "a".repeat(40)))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_require_token_for_patch_me() {
    let server = server();

    let response = server
        .patch("/users/me")
        .json(&json!({"name": "Updated name"}))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_not_allow_post_on_me() {
    let server = server();

    let response = server.post("/users/me").json(&json!({})).await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.json::<Value>()["kind"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn should_not_allow_delete_on_me() {
    let server = server();

    let response = server.delete("/users/me").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

// ── POST /users/create ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_short_password_on_create() {
    let server = server();

    let response = server
        .post("/users/create")
        .json(&json!({"email": "test@example.com", "password": "pw", "name": "Test"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "VALIDATION");
    assert!(body["fields"]["password"].is_array());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn should_report_missing_fields_on_create() {
    let server = server();

    let response = server
        .post("/users/create")
        .json(&json!({"email": "test@example.com"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["fields"]["password"][0], "this field is required");
    assert_eq!(body["fields"]["name"][0], "this field is required");
}

#[tokio::test]
async fn should_reject_non_json_body() {
    let server = server();

    let response = server.post("/users/create").text("{").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "MALFORMED_REQUEST");
}

// ── POST /users/token ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_blank_token_credentials() {
    let server = server();

    let response = server
        .post("/users/token")
        .json(&json!({"email": "test@example.com", "password": ""}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body.get("token").is_none());
    assert_eq!(body["kind"], "VALIDATION");
}

// ── /recipe/* ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_token_for_recipe_endpoints() {
    let server = server();

    for path in ["/recipe/tags", "/recipe/ingredients", "/recipe/recipes"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
    let response = server.delete("/recipe/recipes/1").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_require_token_for_image_upload() {
    let server = server();

    let response = server
        .post("/recipe/recipes/1/upload-image")
        .text("notimage")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ── Scripted database ────────────────────────────────────────────────────────

fn user_model(email: &str, password: &str, is_staff: bool) -> users::Model {
    let now = Utc::now();
    users::Model {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        password: test_hasher().hash(password).unwrap(),
        name: "Test Name".to_owned(),
        is_active: true,
        is_staff,
        is_superuser: false,
        created_at: now,
        updated_at: now,
    }
}

fn token_model(token: &TestToken, user: &users::Model) -> auth_tokens::Model {
    auth_tokens::Model {
        key: token.key.clone(),
        user_id: user.id,
        created_at: Utc::now(),
    }
}

/// Script the two lookups every authenticated request makes.
fn authenticated(token: &TestToken, user: &users::Model) -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![token_model(token, user)]])
        .append_query_results([vec![user.clone()]])
}

#[tokio::test]
async fn should_create_user_and_return_created() {
    let created = user_model("test@example.com", "testpass123", false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .append_query_results([vec![created]])
        .into_connection();
    let server = server_with(db);

    let response = server
        .post("/users/create")
        .json(&json!({
            "email": "test@example.com",
            "password": "testpass123",
            "name": "Test Name",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({"email": "test@example.com", "name": "Test Name"})
    );
}

#[tokio::test]
async fn should_issue_token_for_valid_credentials() {
    let user = user_model("test@example.com", "test123", false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user]])
        .append_query_results([Vec::<auth_tokens::Model>::new()])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let server = server_with(db);

    let response = server
        .post("/users/token")
        .json(&json!({"email": "test@example.com", "password": "test123"}))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["token"].as_str().unwrap().len(), 40);
}

#[tokio::test]
async fn should_create_tag_and_return_created() {
    let token = TestToken::random();
    let user = user_model("test@example.com", "testpass123", false);
    let tag = tags::Model {
        id: 1,
        user_id: user.id,
        name: "Vegan".to_owned(),
    };
    let db = authenticated(&token, &user)
        .append_query_results([vec![tag]])
        .into_connection();
    let server = server_with(db);
    let (name, value) = token.header();

    let response = server
        .post("/recipe/tags")
        .add_header(name, value)
        .json(&json!({"name": "Vegan"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>(), json!({"id": 1, "name": "Vegan"}));
}

#[tokio::test]
async fn should_reject_non_integer_filter_id_as_malformed() {
    let token = TestToken::random();
    let user = user_model("test@example.com", "testpass123", false);
    let server = server_with(authenticated(&token, &user).into_connection());
    let (name, value) = token.header();

    let response = server
        .get("/recipe/recipes?tags=1,abc")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "MALFORMED_REQUEST");
    assert!(body.get("fields").is_none());
}

#[tokio::test]
async fn should_reject_unparseable_assigned_only_as_malformed() {
    let token = TestToken::random();
    let user = user_model("test@example.com", "testpass123", false);
    let server = server_with(authenticated(&token, &user).into_connection());
    let (name, value) = token.header();

    let response = server
        .get("/recipe/tags?assigned_only=maybe")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn should_delete_tag_and_return_no_content() {
    let token = TestToken::random();
    let user = user_model("test@example.com", "testpass123", false);
    let db = authenticated(&token, &user)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let server = server_with(db);
    let (name, value) = token.header();

    let response = server.delete("/recipe/tags/1").add_header(name, value).await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.as_bytes().is_empty());
}

// ── /admin/users ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_user_list_for_non_staff() {
    let token = TestToken::random();
    let user = user_model("test@example.com", "testpass123", false);
    let server = server_with(authenticated(&token, &user).into_connection());
    let (name, value) = token.header();

    let response = server.get("/admin/users").add_header(name, value).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_list_users_for_staff() {
    let token = TestToken::random();
    let admin = user_model("admin@example.com", "testpass123", true);
    let other = user_model("user@example.com", "testpass123", false);
    let db = authenticated(&token, &admin)
        .append_query_results([vec![admin.clone(), other]])
        .into_connection();
    let server = server_with(db);
    let (name, value) = token.header();

    let response = server.get("/admin/users").add_header(name, value).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["email"], "user@example.com");
    assert_eq!(body[0]["is_staff"], true);
    assert!(body[0].get("password").is_none());
}

#[tokio::test]
async fn should_reject_non_uuid_user_id() {
    let token = TestToken::random();
    let admin = user_model("admin@example.com", "testpass123", true);
    let server = server_with(authenticated(&token, &admin).into_connection());
    let (name, value) = token.header();

    let response = server.get("/admin/users/abc").add_header(name, value).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "MALFORMED_REQUEST");
}
