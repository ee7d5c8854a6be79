use axum::body::Body;
use axum::http::{Request, StatusCode};
use farm_rental_ddd::api::handlers::AppState;
use farm_rental_ddd::api::router::create_router;
use farm_rental_ddd::domain::{AdminId, Equipment, FarmerId};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::TestContext;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// インメモリアダプターで組み立てたルーターを返す
fn setup_app() -> (TestContext, axum::Router) {
    let ctx = TestContext::new();
    let app = create_router(Arc::new(AppState {
        service_deps: ctx.deps.clone(),
    }));
    (ctx, app)
}

/// リクエストを送り、ステータスとJSONボディを返す
async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn rental_body(equipment: &Equipment, farmer: FarmerId, quantity: u32, start: &str, end: &str) -> Value {
    json!({
        "equipment_id": equipment.equipment_id.value(),
        "requester_id": farmer.value(),
        "quantity": quantity,
        "start_date": start,
        "end_date": end,
        "payment": {
            "card_number": "4111111111111111",
            "cardholder_name": "Hana Tanaka",
            "expiry": "12/28",
            "cvv": "123"
        }
    })
}

fn admin_body() -> Value {
    json!({ "admin_id": AdminId::new().value() })
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (_ctx, app) = setup_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_e2e_full_rental_flow() {
    let (ctx, app) = setup_app();
    let tractor = ctx.add_equipment("Tractor", "150.00", 2);
    let farmer = ctx.approved_farmer();

    // Step 1: 見積もり（POST /rentals/quote）
    let (status, quote) = send(
        &app,
        "POST",
        "/rentals/quote",
        Some(json!({
            "equipment_id": tractor.equipment_id.value(),
            "quantity": 2,
            "start_date": "2024-06-06",
            "end_date": "2024-06-08"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["duration_days"], 3);
    assert_eq!(quote["total_cost"], "900.00");

    // Step 2: 申請（POST /rentals）
    let (status, created) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&tractor, farmer, 2, "2024-06-06", "2024-06-08")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["total_cost"], "900.00");
    let rental_id = created["rental_id"].as_str().unwrap().to_string();

    // Step 3: 詳細取得（GET /rentals/:id）
    let (status, fetched) = send(&app, "GET", &format!("/rentals/{}", rental_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["start_date"], "2024-06-06");
    assert_eq!(fetched["end_date"], "2024-06-08");

    // Step 4: 承認（POST /rentals/:id/approve）
    let (status, approved) = send(
        &app,
        "POST",
        &format!("/rentals/{}/approve", rental_id),
        Some(admin_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");

    // Step 5: 完了（POST /rentals/:id/complete）
    let (status, completed) = send(
        &app,
        "POST",
        &format!("/rentals/{}/complete", rental_id),
        Some(admin_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "completed");

    // Step 6: 一覧（GET /rentals?requester_id=）
    let (status, list) = send(
        &app,
        "GET",
        &format!("/rentals?requester_id={}", farmer.value()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Step 7: 集計（GET /rentals/stats）
    let (status, stats) = send(&app, "GET", "/rentals/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["completed"], 1);
    let approval_rate: Decimal = stats["approval_rate"].as_str().unwrap().parse().unwrap();
    assert_eq!(approval_rate, Decimal::ONE_HUNDRED);
}

#[tokio::test]
async fn test_e2e_reject_and_filter_by_status() {
    let (ctx, app) = setup_app();
    let tractor = ctx.add_equipment("Tractor", "150.00", 1);
    let farmer = ctx.approved_farmer();

    let (_, first) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&tractor, farmer, 1, "2024-06-01", "2024-06-02")),
    )
    .await;
    let (_, second) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&tractor, farmer, 1, "2024-06-10", "2024-06-11")),
    )
    .await;

    let (status, rejected) = send(
        &app,
        "POST",
        &format!("/rentals/{}/reject", first["rental_id"].as_str().unwrap()),
        Some(json!({ "admin_id": AdminId::new().value(), "reason": "Unit in repair" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "rejected");

    let (_, pending) = send(&app, "GET", "/rentals?status=pending", None).await;
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["rental_id"], second["rental_id"]);

    let (status, _) = send(&app, "GET", "/rentals?status=cancelled", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_e2e_blocked_dates() {
    let (ctx, app) = setup_app();
    let tractor = ctx.add_equipment("Tractor", "150.00", 1);
    let farmer = ctx.approved_farmer();

    send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&tractor, farmer, 1, "2024-06-05", "2024-06-06")),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!(
            "/equipment/{}/blocked-dates?from=2024-06-04&to=2024-06-07",
            tractor.equipment_id.value()
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blocked_dates"], json!(["2024-06-05", "2024-06-06"]));
}

// ============================================================================
// E2Eテスト: 異常系
// ============================================================================

#[tokio::test]
async fn test_e2e_date_conflict() {
    let (ctx, app) = setup_app();
    let tractor = ctx.add_equipment("Tractor", "150.00", 3);
    let farmer = ctx.approved_farmer();

    let (status, _) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&tractor, farmer, 1, "2024-06-05", "2024-06-10")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, error) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&tractor, farmer, 1, "2024-06-06", "2024-06-08")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "DATE_CONFLICT");
}

#[tokio::test]
async fn test_e2e_rejection_codes() {
    let (ctx, app) = setup_app();
    let baler = ctx.add_equipment("Baler", "80.00", 2);
    let farmer = ctx.approved_farmer();

    let (status, error) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&baler, farmer, 3, "2024-06-01", "2024-06-02")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "INSUFFICIENT_QUANTITY");

    let (status, error) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&baler, farmer, 1, "2024-06-05", "2024-06-01")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "INVALID_DATE_RANGE");

    let (status, error) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&baler, farmer, 0, "2024-06-01", "2024-06-02")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "INVALID_QUANTITY");

    let mut no_payment = rental_body(&baler, farmer, 1, "2024-06-01", "2024-06-02");
    no_payment["payment"]["cvv"] = json!("");
    let (status, error) = send(&app, "POST", "/rentals", Some(no_payment)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "PAYMENT_INVALID");

    let fleet = ctx.add_equipment("Harvester fleet", "10000000000000000000000", 100_000);
    let (status, error) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&fleet, farmer, 100_000, "2024-01-01", "2024-12-31")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "AMOUNT_OUT_OF_RANGE");

    let newcomer = FarmerId::new();
    ctx.farmer_directory.add_farmer(newcomer);
    let (status, error) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&baler, newcomer, 1, "2024-06-01", "2024-06-02")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "FARMER_NOT_APPROVED");
}

#[tokio::test]
async fn test_e2e_not_found() {
    let (_ctx, app) = setup_app();
    let missing = uuid::Uuid::new_v4();

    let (status, _) = send(&app, "GET", &format!("/rentals/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, error) = send(
        &app,
        "POST",
        &format!("/rentals/{}/approve", missing),
        Some(admin_body()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "RENTAL_NOT_FOUND");
}

#[tokio::test]
async fn test_e2e_complete_pending_is_invalid_state() {
    let (ctx, app) = setup_app();
    let tractor = ctx.add_equipment("Tractor", "150.00", 1);
    let farmer = ctx.approved_farmer();

    let (_, created) = send(
        &app,
        "POST",
        "/rentals",
        Some(rental_body(&tractor, farmer, 1, "2024-06-01", "2024-06-02")),
    )
    .await;

    let (status, error) = send(
        &app,
        "POST",
        &format!("/rentals/{}/complete", created["rental_id"].as_str().unwrap()),
        Some(admin_body()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "INVALID_RENTAL_STATE");
}

// ============================================================================
// E2Eテスト: 機材・農家の管理
// ============================================================================

#[tokio::test]
async fn test_e2e_admin_registers_equipment_and_farmer_then_rents() {
    let (_ctx, app) = setup_app();

    // 機材の登録（POST /equipment）
    let (status, tractor) = send(
        &app,
        "POST",
        "/equipment",
        Some(json!({ "name": "Tractor", "daily_rate": "150.00", "quantity_available": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tractor["daily_rate"], "150.00");
    let equipment_id = tractor["equipment_id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, "GET", &format!("/equipment/{}", equipment_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Tractor");

    // 在庫を増やす（PUT /equipment/:id）
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/equipment/{}", equipment_id),
        Some(json!({ "name": "Tractor", "daily_rate": "150.00", "quantity_available": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["quantity_available"], 2);

    let (status, listed) = send(&app, "GET", "/equipment", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // 農家の登録と承認（POST /farmers, POST /farmers/:id/approve）
    let (status, farmer) = send(&app, "POST", "/farmers", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(farmer["approved"], false);
    let farmer_id = farmer["farmer_id"].as_str().unwrap().to_string();

    let body = json!({
        "equipment_id": equipment_id,
        "requester_id": farmer_id,
        "quantity": 2,
        "start_date": "2024-06-06",
        "end_date": "2024-06-08",
        "payment": {
            "card_number": "4111111111111111",
            "cardholder_name": "Hana Tanaka",
            "expiry": "12/28",
            "cvv": "123"
        }
    });

    let (status, error) = send(&app, "POST", "/rentals", Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "FARMER_NOT_APPROVED");

    let (status, approved) = send(
        &app,
        "POST",
        &format!("/farmers/{}/approve", farmer_id),
        Some(admin_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["approved"], true);

    let (status, created) = send(&app, "POST", "/rentals", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["total_cost"], "900.00");
}

#[tokio::test]
async fn test_e2e_equipment_validation_and_lookup_errors() {
    let (_ctx, app) = setup_app();

    let (status, error) = send(
        &app,
        "POST",
        "/equipment",
        Some(json!({ "name": "  ", "daily_rate": "10.00", "quantity_available": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "INVALID_EQUIPMENT");

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, "GET", &format!("/equipment/{}", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, error) = send(
        &app,
        "PUT",
        &format!("/equipment/{}", missing),
        Some(json!({ "name": "Ghost", "daily_rate": "1", "quantity_available": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "EQUIPMENT_NOT_FOUND");

    let (status, error) = send(
        &app,
        "POST",
        &format!("/farmers/{}/approve", missing),
        Some(admin_body()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["error"], "FARMER_NOT_FOUND");
}
