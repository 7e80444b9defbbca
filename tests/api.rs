//! End-to-end tests against the assembled router. Each test drives the
//! service through `tower::ServiceExt::oneshot`, the same surface a real
//! client sees: bearer auth, JSON bodies, the error envelope, and the
//! idempotency and version semantics.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use corkboard::backend::routes::create_router;
use corkboard::backend::server::AppState;

fn app() -> Router {
    create_router(AppState::new(), "web")
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(path: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(user) = user {
        builder = builder.header("Authorization", format!("Bearer {user}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(path: &str, user: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("Authorization", format!("Bearer {user}"))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_idempotent(path: &str, user: &str, body: &Value, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("Authorization", format!("Bearer {user}"))
        .header("Content-Type", "application/json")
        .header("Idempotency-Key", token)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_board(app: &Router, user: &str, name: &str) -> String {
    let response = send(app, post_json("/v1/boards", user, &json!({ "name": name }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let board = body_json(response).await;
    board["id"].as_str().unwrap().to_string()
}

async fn create_column(app: &Router, user: &str, board: &str, body: Value) -> Value {
    let response = send(app, post_json(&format!("/v1/boards/{board}/columns"), user, &body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn create_card(app: &Router, user: &str, board: &str, column: &str, body: Value) -> Value {
    let response = send(
        app,
        post_json(
            &format!("/v1/boards/{board}/columns/{column}/cards"),
            user,
            &body,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn probes_are_unauthenticated() {
    let app = app();

    let response = send(&app, get("/v1/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));

    let response = send(&app, get("/v1/version", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let version = body_json(response).await;
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn missing_bearer_is_rejected_with_envelope() {
    let app = app();
    let response = send(&app, get("/v1/boards", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "unauthorized");
    assert_eq!(body["error"]["message"], "Authorization required");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = app();
    let request = Request::builder()
        .method("GET")
        .uri("/v1/health")
        .header("X-Request-Id", "req-abc123")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.headers()["x-request-id"], "req-abc123");

    // Without a client id one is minted.
    let response = send(&app, get("/v1/health", None)).await;
    let minted = response.headers()["x-request-id"].to_str().unwrap();
    assert!(minted.starts_with("req-"));
}

#[tokio::test]
async fn board_lifecycle_and_listing() {
    let app = app();
    let board = create_board(&app, "alice", "Sprint 12").await;

    let response = send(&app, get("/v1/boards", Some("alice"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["boards"].as_array().unwrap().len(), 1);
    assert_eq!(listing["boards"][0]["id"], board.as_str());
    assert_eq!(listing["boards"][0]["myRole"], "admin");
    assert_eq!(listing["boards"][0]["membersCount"], 1);
    assert_eq!(listing["nextCursor"], Value::Null);

    // Another user sees nothing.
    let response = send(&app, get("/v1/boards", Some("carol"))).await;
    let listing = body_json(response).await;
    assert!(listing["boards"].as_array().unwrap().is_empty());

    // And cannot open the board.
    let response = send(&app, get(&format!("/v1/boards/{board}"), Some("carol"))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "forbidden");
    assert_eq!(body["error"]["message"], "Not a member");
}

#[tokio::test]
async fn board_name_validation() {
    let app = app();
    let response = send(&app, post_json("/v1/boards", "alice", &json!({ "name": "   " }))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["message"], "name must be 1..140");
    assert_eq!(body["error"]["details"]["name"], "required_non_empty");

    let long = "x".repeat(141);
    let response = send(&app, post_json("/v1/boards", "alice", &json!({ "name": long }))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn column_reordering_scenario() {
    let app = app();
    let board = create_board(&app, "alice", "Sprint").await;

    let a = create_column(&app, "alice", &board, json!({ "name": "A" })).await;
    let b = create_column(
        &app,
        "alice",
        &board,
        json!({ "name": "B", "afterColumnId": a["id"] }),
    )
    .await;
    let _c = create_column(
        &app,
        "alice",
        &board,
        json!({ "name": "C", "beforeColumnId": b["id"], "afterColumnId": a["id"] }),
    )
    .await;

    // Move A after B.
    let response = send(
        &app,
        post_json(
            &format!("/v1/boards/{board}/columns/{}:move", a["id"].as_str().unwrap()),
            "alice",
            &json!({ "afterColumnId": b["id"] }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));

    let response = send(&app, get(&format!("/v1/boards/{board}"), Some("alice"))).await;
    let view = body_json(response).await;
    let names: Vec<&str> = view["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["C", "B", "A"]);
}

#[tokio::test]
async fn move_without_action_suffix_is_unknown_route() {
    let app = app();
    let board = create_board(&app, "alice", "Sprint").await;
    let column = create_column(&app, "alice", &board, json!({ "name": "Todo" })).await;

    let response = send(
        &app,
        post_json(
            &format!("/v1/boards/{board}/columns/{}", column["id"].as_str().unwrap()),
            "alice",
            &json!({}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn idempotent_retry_replays_identical_bytes() {
    let app = app();

    let request = || {
        post_json_idempotent(
            "/v1/boards",
            "alice",
            &json!({ "name": "Release" }),
            "tok-1",
        )
    };
    let first = send(&app, request()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first_bytes = to_bytes(first.into_body(), usize::MAX).await.unwrap();

    let second = send(&app, request()).await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second_bytes = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    assert_eq!(first_bytes, second_bytes);

    // Exactly one board was persisted.
    let listing = body_json(send(&app, get("/v1/boards", Some("alice"))).await).await;
    assert_eq!(listing["boards"].as_array().unwrap().len(), 1);

    // A different token creates a second one.
    let third = send(
        &app,
        post_json_idempotent("/v1/boards", "alice", &json!({ "name": "Release" }), "tok-2"),
    )
    .await;
    assert_eq!(third.status(), StatusCode::CREATED);
    let listing = body_json(send(&app, get("/v1/boards", Some("alice"))).await).await;
    assert_eq!(listing["boards"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn idempotent_retry_replays_error_outcomes() {
    let app = app();
    let board = create_board(&app, "alice", "Sprint").await;
    let column = create_column(&app, "alice", &board, json!({ "name": "Todo" })).await;

    // Anchor that resolves to nothing fails, and the failure is cached.
    let request = || {
        post_json_idempotent(
            &format!(
                "/v1/boards/{board}/columns/{}/cards",
                column["id"].as_str().unwrap()
            ),
            "alice",
            &json!({
                "title": "task",
                "beforeCardId": "00000000-0000-0000-0000-000000000000"
            }),
            "tok-err",
        )
    };
    let first = send(&app, request()).await;
    assert_eq!(first.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let first_bytes = to_bytes(first.into_body(), usize::MAX).await.unwrap();

    let second = send(&app, request()).await;
    assert_eq!(second.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let second_bytes = to_bytes(second.into_body(), usize::MAX).await.unwrap();
    assert_eq!(first_bytes, second_bytes);

    let view = body_json(send(&app, get(&format!("/v1/boards/{board}"), Some("alice"))).await).await;
    assert!(view["cards"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn card_moves_bump_versions_and_reject_stale_ones() {
    let app = app();
    let board = create_board(&app, "alice", "Sprint").await;
    let column = create_column(&app, "alice", &board, json!({ "name": "Todo" })).await;
    let card = create_card(
        &app,
        "alice",
        &board,
        column["id"].as_str().unwrap(),
        json!({ "title": "task" }),
    )
    .await;
    assert_eq!(card["version"], 0);

    let move_path = format!("/v1/boards/{board}/cards/{}:move", card["id"].as_str().unwrap());
    let response = send(
        &app,
        post_json(&move_path, "alice", &json!({ "expectedVersion": 0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "status": "ok", "version": 1 }));

    // Replay of the old version loses.
    let response = send(
        &app,
        post_json(&move_path, "alice", &json!({ "expectedVersion": 0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "precondition_failed");
    assert_eq!(body["error"]["message"], "Stale version");

    let view = body_json(send(&app, get(&format!("/v1/boards/{board}"), Some("alice"))).await).await;
    assert_eq!(view["cards"][0]["version"], 1);

    // Unconditional move still increments.
    let response = send(&app, post_json(&move_path, "alice", &json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["version"], 2);
}

#[tokio::test]
async fn cards_move_across_columns_but_not_across_boards() {
    let app = app();
    let board = create_board(&app, "alice", "Sprint").await;
    let other_board = create_board(&app, "alice", "Other").await;
    let todo = create_column(&app, "alice", &board, json!({ "name": "Todo" })).await;
    let done = create_column(&app, "alice", &board, json!({ "name": "Done" })).await;
    let foreign = create_column(&app, "alice", &other_board, json!({ "name": "Elsewhere" })).await;
    let card = create_card(
        &app,
        "alice",
        &board,
        todo["id"].as_str().unwrap(),
        json!({ "title": "task" }),
    )
    .await;

    let move_path = format!("/v1/boards/{board}/cards/{}:move", card["id"].as_str().unwrap());

    // Within-board column change is fine.
    let response = send(
        &app,
        post_json(&move_path, "alice", &json!({ "toColumnId": done["id"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // A column on another board is a conflict.
    let response = send(
        &app,
        post_json(&move_path, "alice", &json!({ "toColumnId": foreign["id"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "invalid_move");
    assert_eq!(
        body["error"]["message"],
        "Card can be moved only within the same board."
    );

    // A column that exists nowhere is a validation-class move error.
    let response = send(
        &app,
        post_json(
            &move_path,
            "alice",
            &json!({ "toColumnId": "00000000-0000-0000-0000-000000000000" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "invalid_move");
    assert_eq!(body["error"]["message"], "Target column not found");
}

#[tokio::test]
async fn readers_cannot_write() {
    let app = app();
    let board = create_board(&app, "alice", "Sprint").await;

    let response = send(
        &app,
        post_json(
            &format!("/v1/boards/{board}/members"),
            "alice",
            &json!({ "userId": "bob", "role": "reader" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["membership"]["role"], "reader");
    assert_eq!(body["membership"]["status"], "pending");

    // Bob can look.
    let response = send(&app, get(&format!("/v1/boards/{board}"), Some("bob"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    // But not touch.
    let response = send(
        &app,
        post_json(
            &format!("/v1/boards/{board}/columns"),
            "bob",
            &json!({ "name": "Todo" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Insufficient permissions");
}

#[tokio::test]
async fn only_the_owner_invites_and_invites_are_validated() {
    let app = app();
    let board = create_board(&app, "alice", "Sprint").await;
    let members_path = format!("/v1/boards/{board}/members");

    // Writers are members, not owners.
    send(
        &app,
        post_json(&members_path, "alice", &json!({ "userId": "bob", "role": "writer" })),
    )
    .await;
    let response = send(
        &app,
        post_json(&members_path, "bob", &json!({ "userId": "carol", "role": "writer" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        post_json(&members_path, "alice", &json!({ "userId": "carol", "role": "owner" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Invalid role");
    assert_eq!(body["error"]["details"]["role"], "invalid");

    let response = send(&app, post_json(&members_path, "alice", &json!({ "role": "writer" }))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "email or userId required");
    assert_eq!(body["error"]["details"]["target"], "required");

    // Email-only invites record just the invitation.
    let response = send(
        &app,
        post_json(
            &members_path,
            "alice",
            &json!({ "email": "dora@example.com", "role": "reader" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["invitation"]["email"], "dora@example.com");
    assert_eq!(body["invitation"]["status"], "pending");
}

#[tokio::test]
async fn unknown_board_is_not_found() {
    let app = app();
    let response = send(
        &app,
        get(
            "/v1/boards/00000000-0000-0000-0000-000000000000",
            Some("alice"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "Board not found");
}
