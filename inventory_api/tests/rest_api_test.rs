//! Routing, serialization, and status-code coverage for the REST surface,
//! driven directly through the router (no bound socket) via
//! `tower::ServiceExt::oneshot` against a freshly migrated database.

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use shared_events::LoggingEventSink;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

fn app(pool: PgPool) -> axum::Router {
    inventory_api::create_app(pool, std::sync::Arc::new(LoggingEventSink))
}

fn post(uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[sqlx::test(migrations = "../migrations")]
async fn create_then_get_round_trips_through_the_router(pool: PgPool) {
    let app = app(pool);

    let create_response = app
        .clone()
        .oneshot(post(
            "/api/v1/inventory",
            json!({"sku": "WIDGET-1", "location": "main", "quantity_on_hand": 10}),
        ))
        .await
        .unwrap();
    assert_eq!(create_response.status(), StatusCode::CREATED);
    let created = body_json(create_response).await;
    assert_eq!(created["data"]["sku"], "WIDGET-1");
    assert_eq!(created["data"]["quantity_on_hand"], 10);

    let get_response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/inventory/WIDGET-1?location=main")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);
    let fetched = body_json(get_response).await;
    assert_eq!(fetched["data"]["quantity_on_hand"], 10);
}

#[sqlx::test(migrations = "../migrations")]
async fn get_missing_item_returns_404(pool: PgPool) {
    let app = app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/inventory/NO-SUCH-SKU")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../migrations")]
async fn create_with_a_blank_sku_returns_422(pool: PgPool) {
    let app = app(pool);

    let response = app
        .oneshot(post(
            "/api/v1/inventory",
            json!({"sku": "", "quantity_on_hand": 0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../migrations")]
async fn receive_then_reserve_then_commit_follows_the_counter_algebra(pool: PgPool) {
    let app = app(pool);

    app.clone()
        .oneshot(post(
            "/api/v1/inventory",
            json!({"sku": "GADGET-1", "location": "main", "quantity_on_hand": 0}),
        ))
        .await
        .unwrap();

    let receive = app
        .clone()
        .oneshot(post(
            "/api/v1/inventory/GADGET-1/receive?location=main",
            json!({"quantity": 20}),
        ))
        .await
        .unwrap();
    assert_eq!(receive.status(), StatusCode::OK);
    let received = body_json(receive).await;
    assert_eq!(received["data"]["quantity_on_hand"], 20);

    let reserve = app
        .clone()
        .oneshot(post(
            "/api/v1/inventory/GADGET-1/reserve?location=main",
            json!({"quantity": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(reserve.status(), StatusCode::OK);
    let reserved = body_json(reserve).await;
    assert_eq!(reserved["data"]["quantity_reserved"], 5);
    assert!(reserved["reservation_id"].as_str().unwrap().starts_with("RES-"));

    let commit = app
        .oneshot(post(
            "/api/v1/inventory/GADGET-1/commit?location=main",
            json!({"quantity": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(commit.status(), StatusCode::OK);
    let committed = body_json(commit).await;
    assert_eq!(committed["data"]["quantity_on_hand"], 15);
    assert_eq!(committed["data"]["quantity_reserved"], 0);
}

#[sqlx::test(migrations = "../migrations")]
async fn reserve_beyond_available_returns_422(pool: PgPool) {
    let app = app(pool);

    app.clone()
        .oneshot(post(
            "/api/v1/inventory",
            json!({"sku": "SCARCE-1", "location": "main", "quantity_on_hand": 2}),
        ))
        .await
        .unwrap();

    let reserve = app
        .oneshot(post(
            "/api/v1/inventory/SCARCE-1/reserve?location=main",
            json!({"quantity": 5}),
        ))
        .await
        .unwrap();

    assert_eq!(reserve.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(reserve).await;
    assert_eq!(body["error"], "INSUFFICIENT_STOCK");
}

#[sqlx::test(migrations = "../migrations")]
async fn transfer_moves_on_hand_between_locations(pool: PgPool) {
    let app = app(pool);

    app.clone()
        .oneshot(post(
            "/api/v1/inventory",
            json!({"sku": "MOVER-1", "location": "east", "quantity_on_hand": 10}),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post(
            "/api/v1/inventory",
            json!({"sku": "MOVER-1", "location": "west", "quantity_on_hand": 0}),
        ))
        .await
        .unwrap();

    let transfer = app
        .oneshot(post(
            "/api/v1/inventory/MOVER-1/transfer",
            json!({"source_location": "east", "destination_location": "west", "quantity": 4}),
        ))
        .await
        .unwrap();

    assert_eq!(transfer.status(), StatusCode::OK);
    let body = body_json(transfer).await;
    assert_eq!(body["source"]["quantity_on_hand"], 6);
    assert_eq!(body["destination"]["quantity_on_hand"], 4);
}

#[sqlx::test(migrations = "../migrations")]
async fn count_adjustment_with_no_difference_omits_the_movement(pool: PgPool) {
    let app = app(pool);

    app.clone()
        .oneshot(post(
            "/api/v1/inventory",
            json!({"sku": "COUNTED-1", "location": "main", "quantity_on_hand": 7}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post(
            "/api/v1/inventory/COUNTED-1/count_adjustment?location=main",
            json!({"actual": 7}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["difference"], 0);
    assert!(body["movement"].is_null());
}

#[sqlx::test(migrations = "../migrations")]
async fn health_ready_reports_ok_against_a_live_pool(pool: PgPool) {
    let app = app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/ready")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
