//! End-to-end tests of the REST surface over the in-memory store.

#![allow(clippy::panic, clippy::indexing_slicing, missing_docs)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use arena_booking::api;
use arena_booking::api::auth::{Claims, JwtKeys};
use arena_booking::app_state::AppState;
use arena_booking::domain::{UserId, VenueClock};
use arena_booking::persistence::InMemoryBookingStore;
use arena_booking::service::BookingService;

const SECRET: &str = "integration-secret";
const CATALOG: &str = include_str!("../seed/catalog.example.json");

fn app() -> Router {
    let Ok(store) = InMemoryBookingStore::from_catalog_json(CATALOG) else {
        panic!("seed catalog does not parse");
    };
    let service = BookingService::new(
        Arc::new(store),
        VenueClock::new(chrono_tz::America::Sao_Paulo),
    );
    api::build_router().with_state(AppState::new(service, JwtKeys::new(SECRET)))
}

fn token_for(user: i64) -> String {
    let Ok(token) = JwtKeys::new(SECRET).sign(&Claims::for_user(UserId::new(user), 3600)) else {
        panic!("signing failed");
    };
    token
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("invalid request");
    };
    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});
    let status = response.status();
    let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body read failed");
    };
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn booking(field: i64, time: &str) -> Value {
    json!({
        "campo_id": field,
        "horario": time,
        "jogadores": 10,
        "pagamento": "pix",
        "pago": true,
    })
}

async fn create(app: &Router, token: &str, field: i64, time: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/v1/agendamentos",
        Some(token),
        Some(booking(field, time)),
    )
    .await
}

#[tokio::test]
async fn booking_then_listing_shows_venue_time() {
    let app = app();
    let token = token_for(3);

    let (status, body) = create(&app, &token, 7, "2025-11-26T20:00").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Agendamento realizado com sucesso");
    assert!(body["id"].is_i64());

    let (status, body) = send(&app, Method::GET, "/api/v1/agendamentos", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let Some(rows) = body.as_array() else {
        panic!("listing is not an array: {body}");
    };
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["horario"], "2025-11-26T20:00:00-03:00");
    assert_eq!(row["status"], "scheduled");
    assert_eq!(row["id_campo"], 7);
    assert_eq!(row["id_usuario"], 3);
    assert_eq!(row["nome_campo"], "Society 1");
    assert_eq!(row["nome_arena"], "Arena Beira Rio");
    assert_eq!(row["pago"], true);
}

#[tokio::test]
async fn repeated_slot_conflicts_for_any_user() {
    let app = app();
    let (status, _) = create(&app, &token_for(3), 7, "2025-11-26T20:00").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create(&app, &token_for(4), 7, "2025-11-26T20:00").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 2009);

    let (status, _) = create(&app, &token_for(4), 8, "2025-11-26T20:00").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn cancelling_frees_the_slot() {
    let app = app();
    let token = token_for(3);
    let (_, body) = create(&app, &token, 7, "2025-11-26T20:00").await;
    let Some(id) = body["id"].as_i64() else {
        panic!("no id in {body}");
    };

    let uri = format!("/api/v1/agendamentos/status?id={id}");
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Status atualizado com sucesso");

    let (status, _) = create(&app, &token, 7, "2025-11-26T20:00").await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, "/api/v1/agendamentos", Some(&token), None).await;
    let Some(rows) = body.as_array() else {
        panic!("listing is not an array: {body}");
    };
    let statuses: Vec<&str> = rows.iter().filter_map(|r| r["status"].as_str()).collect();
    assert_eq!(statuses.len(), 2);
    assert!(statuses.contains(&"cancelled"));
    assert!(statuses.contains(&"scheduled"));
}

#[tokio::test]
async fn terminal_status_cannot_change() {
    let app = app();
    let token = token_for(3);
    let (_, body) = create(&app, &token, 7, "2025-11-26T21:00").await;
    let Some(id) = body["id"].as_i64() else {
        panic!("no id in {body}");
    };
    let uri = format!("/api/v1/agendamentos/status?id={id}");

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({"status": "scheduled"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 2010);
}

#[tokio::test]
async fn only_booker_or_arena_owner_may_change_status() {
    let app = app();
    let (_, body) = create(&app, &token_for(3), 7, "2025-11-26T22:00").await;
    let Some(id) = body["id"].as_i64() else {
        panic!("no id in {body}");
    };
    let uri = format!("/api/v1/agendamentos/status?id={id}");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token_for(4)),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], 1403);

    // User 1 owns the arena of field 7.
    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token_for(1)),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_update_input_errors() {
    let app = app();
    let token = token_for(3);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/agendamentos/status",
        Some(&token),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/agendamentos/status?id=999",
        Some(&token),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/agendamentos/status?id=1",
        Some(&token),
        Some(json!({"status": "archived"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1003);
}

#[tokio::test]
async fn malformed_time_is_rejected() {
    let app = app();
    let (status, body) = create(&app, &token_for(3), 7, "26/11/2025 20:00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1002);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/agendamentos",
        Some(&token_for(3)),
        Some(json!({"campo_id": "sete"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);
}

#[tokio::test]
async fn unknown_field_is_not_found() {
    let app = app();
    let (status, body) = create(&app, &token_for(3), 99, "2025-11-26T20:00").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn requests_without_valid_token_are_unauthorized() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/agendamentos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], 1401);

    let (status, _) = send(&app, Method::GET, "/api/v1/agendamentos", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/agendamentos",
        None,
        Some(booking(7, "2025-11-26T20:00")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_listing_is_an_empty_array() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/agendamentos",
        Some(&token_for(5)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn listing_is_scoped_to_the_caller() {
    let app = app();
    let (status, _) = create(&app, &token_for(3), 7, "2025-11-26T20:00").await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v1/agendamentos",
        Some(&token_for(4)),
        None,
    )
    .await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn arena_catalog_is_public() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/arenas", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let Some(arenas) = body.as_array() else {
        panic!("catalog is not an array: {body}");
    };
    assert_eq!(arenas.len(), 3);
    assert_eq!(arenas[0]["nome"], "Arena Beira Rio");
    assert_eq!(arenas[0]["qtd_campos"], 2);
    assert_eq!(arenas[0]["campos"][0]["id_campo"], 7);
    assert_eq!(arenas[2]["campos"], json!([]));
}

#[tokio::test]
async fn health_reports_version() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let (status, body) = send(&app, Method::GET, api::OPENAPI_PATH, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/agendamentos"].is_object());
}
