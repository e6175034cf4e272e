//! HTTP surface tests for the order API.
//!
//! Requests are driven through the router with `tower::ServiceExt`; no
//! listening socket is involved. Workflow behavior itself is covered in
//! `place_order.rs` and `cancel_order.rs`; these tests pin down status
//! codes, bodies, and authentication.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use inkleaf_integration_tests::{api_router, fixture, tokens};

const BODY_LIMIT: usize = 64 * 1024;

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn place(router: &Router, token: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, "/api/orders", Some(token), Some(body)).await
}

fn cart_body() -> Value {
    json!({ "cart_id": fixture::CART, "address_id": fixture::ADDRESS })
}

// =============================================================================
// Placement
// =============================================================================

#[tokio::test]
async fn test_place_order_created() {
    let (router, shop) = api_router().await;

    let (status, body) = place(&router, tokens::CUSTOMER, cart_body()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "order placed");
    assert_eq!(body["book_name"], "The Dispossessed");
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["unit_price"], "20.00");
    assert_eq!(body["total_price"], "60.00");
    assert_eq!(body["order_id"].as_str().unwrap().len(), 9);

    let left = shop
        .stores
        .catalog
        .quantity_of(fixture::BOOK)
        .await
        .unwrap();
    assert_eq!(left, fixture::STOCK - fixture::CART_QUANTITY);
}

#[tokio::test]
async fn test_place_direct_order_created() {
    let (router, _shop) = api_router().await;

    let (status, body) = place(
        &router,
        tokens::CUSTOMER,
        json!({
            "book_name": fixture::BOOK_TITLE,
            "quantity": 2,
            "idempotency_token": Uuid::new_v4(),
            "address_id": fixture::ADDRESS,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["quantity"], 2);
    assert_eq!(body["total_price"], "40.00");
}

#[tokio::test]
async fn test_duplicate_checkout_conflict() {
    let (router, _shop) = api_router().await;

    place(&router, tokens::CUSTOMER, cart_body()).await;
    let (status, body) = place(&router, tokens::CUSTOMER, cart_body()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "an order was already placed for this cart or token"
    );
}

#[tokio::test]
async fn test_insufficient_stock_not_acceptable() {
    let (router, _shop) = api_router().await;

    let (status, body) = place(
        &router,
        tokens::CUSTOMER,
        json!({
            "book_name": fixture::BOOK_TITLE,
            "quantity": fixture::STOCK + 1,
            "idempotency_token": Uuid::new_v4(),
            "address_id": fixture::ADDRESS,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(
        body["message"],
        "insufficient stock: requested 11, available 10"
    );
}

#[tokio::test]
async fn test_zero_quantity_bad_request() {
    let (router, _shop) = api_router().await;

    let (status, body) = place(
        &router,
        tokens::CUSTOMER,
        json!({
            "book_name": fixture::BOOK_TITLE,
            "quantity": 0,
            "idempotency_token": Uuid::new_v4(),
            "address_id": fixture::ADDRESS,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "quantity must be at least 1");
}

#[tokio::test]
async fn test_unknown_cart_not_found() {
    let (router, _shop) = api_router().await;

    let (status, _body) = place(
        &router,
        tokens::CUSTOMER,
        json!({ "cart_id": 404, "address_id": fixture::ADDRESS }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unverified_user_not_found() {
    let (router, _shop) = api_router().await;

    let (status, body) = place(&router, tokens::UNVERIFIED, cart_body()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found or not verified");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_token_unauthorized() {
    let (router, _shop) = api_router().await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/api/orders",
        None,
        Some(cart_body()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "missing or invalid bearer token");
}

#[tokio::test]
async fn test_unknown_token_unauthorized() {
    let (router, _shop) = api_router().await;

    let (status, _body) = send(
        &router,
        Method::POST,
        "/api/orders",
        Some("who-is-this"),
        Some(cart_body()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_cancel_then_repeat() {
    let (router, shop) = api_router().await;
    let (_, placed) = place(&router, tokens::CUSTOMER, cart_body()).await;
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        Method::DELETE,
        &format!("/api/orders/{order_id}"),
        Some(tokens::CUSTOMER),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "order cancelled");
    assert_eq!(body["order_id"], order_id.as_str());
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["total_price"], "60.00");

    let left = shop
        .stores
        .catalog
        .quantity_of(fixture::BOOK)
        .await
        .unwrap();
    assert_eq!(left, fixture::STOCK);

    // Gone now.
    let (status, _body) = send(
        &router,
        Method::DELETE,
        &format!("/api/orders/{order_id}"),
        Some(tokens::CUSTOMER),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_malformed_id_not_acceptable() {
    let (router, _shop) = api_router().await;

    let (status, _body) = send(
        &router,
        Method::DELETE,
        "/api/orders/abc",
        Some(tokens::CUSTOMER),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn test_show_order() {
    let (router, _shop) = api_router().await;
    let (_, placed) = place(&router, tokens::CUSTOMER, cart_body()).await;
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        Method::GET,
        &format!("/api/orders/{order_id}"),
        Some(tokens::CUSTOMER),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_id"], order_id.as_str());
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["total_price"], "60.00");
    assert!(body.get("user_id").is_none());
}

#[tokio::test]
async fn test_show_unknown_order_not_found() {
    let (router, _shop) = api_router().await;

    let (status, _body) = send(
        &router,
        Method::GET,
        "/api/orders/ZZZZZZZZ9",
        Some(tokens::CUSTOMER),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_show_someone_elses_order_not_found() {
    let (router, _shop) = api_router().await;
    let (_, placed) = place(&router, tokens::CUSTOMER, cart_body()).await;
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let (status, _body) = send(
        &router,
        Method::GET,
        &format!("/api/orders/{order_id}"),
        Some(tokens::RIVAL),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
