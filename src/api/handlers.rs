use crate::application::rental::{
    RentalApplicationError, RentalStatistics, ServiceDependencies,
    approve_farmer as execute_approve_farmer, approve_rental as execute_approve_rental,
    blocked_dates as execute_blocked_dates, complete_rental as execute_complete_rental,
    quote_rental as execute_quote_rental, register_equipment as execute_register_equipment,
    register_farmer as execute_register_farmer, reject_rental as execute_reject_rental,
    rental_statistics as execute_rental_statistics, request_rental as execute_request_rental,
    update_equipment as execute_update_equipment,
};
use crate::domain::value_objects::{EquipmentId, FarmerId, RentalId};
use crate::ports::rental_read_model::RentalView;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        AdminActionRequest, BlockedDatesQuery, BlockedDatesResponse, EquipmentRequest,
        EquipmentResponse, ErrorResponse, FarmerResponse, ListRentalsQuery, QuoteRentalRequest,
        QuoteResponse, RejectRentalRequest, RentalResponse, RequestRentalRequest,
        parse_status_filter,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// コマンド実行後の最新状態をRead Modelから取得する
async fn fetch_rental(state: &AppState, rental_id: RentalId) -> Result<RentalView, ApiError> {
    state
        .service_deps
        .rental_read_model
        .get_by_id(rental_id)
        .await
        .map_err(RentalApplicationError::ReadModelError)?
        .ok_or_else(|| ApiError::from(RentalApplicationError::RentalNotFound))
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /rentals/quote - 日数と料金の見積もり
///
/// 申請と同じ空き判定を行うが、何も保存しない。
pub async fn quote_rental(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRentalRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let cmd = req.to_command()?;
    let quote = execute_quote_rental(&state.service_deps, cmd).await?;
    Ok(Json(QuoteResponse::from(quote)))
}

/// POST /rentals - レンタルを申請
///
/// 強制されるビジネスルール:
/// - 農家が存在し、管理者に承認されていること
/// - 機材が存在し、数量が在庫総数以下であること
/// - 日付がそろっていて、既存の予約と重ならないこと
/// - 支払い情報がそろっていること
pub async fn create_rental(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RequestRentalRequest>,
) -> Result<(StatusCode, Json<RentalResponse>), ApiError> {
    let cmd = req.to_command(Utc::now())?;
    let rental_id = execute_request_rental(&state.service_deps, cmd).await?;

    let view = fetch_rental(&state, rental_id).await?;
    Ok((StatusCode::CREATED, Json(RentalResponse::from(view))))
}

/// POST /rentals/:id/approve - レンタルを承認
///
/// 承認済みの予約と衝突する場合は APPROVAL_CONFLICT を返す。
pub async fn approve_rental(
    State(state): State<Arc<AppState>>,
    Path(rental_id): Path<Uuid>,
    Json(req): Json<AdminActionRequest>,
) -> Result<Json<RentalResponse>, ApiError> {
    let rental_id = RentalId::from_uuid(rental_id);
    execute_approve_rental(
        &state.service_deps,
        req.to_approve_command(rental_id, Utc::now()),
    )
    .await?;

    let view = fetch_rental(&state, rental_id).await?;
    Ok(Json(RentalResponse::from(view)))
}

/// POST /rentals/:id/reject - レンタルを却下
pub async fn reject_rental(
    State(state): State<Arc<AppState>>,
    Path(rental_id): Path<Uuid>,
    Json(req): Json<RejectRentalRequest>,
) -> Result<Json<RentalResponse>, ApiError> {
    let rental_id = RentalId::from_uuid(rental_id);
    execute_reject_rental(&state.service_deps, req.to_command(rental_id, Utc::now())).await?;

    let view = fetch_rental(&state, rental_id).await?;
    Ok(Json(RentalResponse::from(view)))
}

/// POST /rentals/:id/complete - 返却を確認してレンタルを完了
pub async fn complete_rental(
    State(state): State<Arc<AppState>>,
    Path(rental_id): Path<Uuid>,
    Json(req): Json<AdminActionRequest>,
) -> Result<Json<RentalResponse>, ApiError> {
    let rental_id = RentalId::from_uuid(rental_id);
    execute_complete_rental(
        &state.service_deps,
        req.to_complete_command(rental_id, Utc::now()),
    )
    .await?;

    let view = fetch_rental(&state, rental_id).await?;
    Ok(Json(RentalResponse::from(view)))
}

/// POST /equipment - 機材を登録（管理者）
pub async fn register_equipment(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EquipmentRequest>,
) -> Result<(StatusCode, Json<EquipmentResponse>), ApiError> {
    let equipment =
        execute_register_equipment(&state.service_deps, req.to_register_command()).await?;
    Ok((StatusCode::CREATED, Json(EquipmentResponse::from(equipment))))
}

/// PUT /equipment/:id - 機材の名前・日額・在庫総数を変更（管理者）
pub async fn update_equipment(
    State(state): State<Arc<AppState>>,
    Path(equipment_id): Path<Uuid>,
    Json(req): Json<EquipmentRequest>,
) -> Result<Json<EquipmentResponse>, ApiError> {
    let cmd = req.to_update_command(EquipmentId::from_uuid(equipment_id));
    let equipment = execute_update_equipment(&state.service_deps, cmd).await?;
    Ok(Json(EquipmentResponse::from(equipment)))
}

/// POST /farmers - 農家を登録（承認待ち）
pub async fn register_farmer(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<FarmerResponse>), ApiError> {
    let farmer_id = execute_register_farmer(&state.service_deps).await?;
    Ok((
        StatusCode::CREATED,
        Json(FarmerResponse {
            farmer_id: farmer_id.value(),
            approved: false,
        }),
    ))
}

/// POST /farmers/:id/approve - 農家アカウントを承認（管理者）
pub async fn approve_farmer(
    State(state): State<Arc<AppState>>,
    Path(farmer_id): Path<Uuid>,
    Json(req): Json<AdminActionRequest>,
) -> Result<Json<FarmerResponse>, ApiError> {
    let cmd = req.to_approve_farmer_command(FarmerId::from_uuid(farmer_id));
    execute_approve_farmer(&state.service_deps, cmd).await?;
    Ok(Json(FarmerResponse {
        farmer_id,
        approved: true,
    }))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /equipment - 機材一覧（名前順）
pub async fn list_equipment(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EquipmentResponse>>, QueryError> {
    let items = state
        .service_deps
        .equipment_catalog
        .list()
        .await
        .map_err(|e| QueryError::InternalError(e.to_string()))?;

    Ok(Json(items.into_iter().map(EquipmentResponse::from).collect()))
}

/// GET /equipment/:id - 機材をIDで取得
pub async fn get_equipment_by_id(
    State(state): State<Arc<AppState>>,
    Path(equipment_id): Path<Uuid>,
) -> Result<Json<EquipmentResponse>, QueryError> {
    let equipment_id = EquipmentId::from_uuid(equipment_id);

    match state.service_deps.equipment_catalog.find_by_id(equipment_id).await {
        Ok(Some(equipment)) => Ok(Json(EquipmentResponse::from(equipment))),
        Ok(None) => Err(QueryError::NotFound(format!(
            "Equipment {} not found",
            equipment_id.value()
        ))),
        Err(e) => Err(QueryError::InternalError(e.to_string())),
    }
}

/// GET /rentals/:id - レンタル詳細をIDで取得
pub async fn get_rental_by_id(
    State(state): State<Arc<AppState>>,
    Path(rental_id): Path<Uuid>,
) -> Result<Json<RentalResponse>, QueryError> {
    let rental_id = RentalId::from_uuid(rental_id);

    match state.service_deps.rental_read_model.get_by_id(rental_id).await {
        Ok(Some(view)) => Ok(Json(RentalResponse::from(view))),
        Ok(None) => Err(QueryError::NotFound(format!(
            "Rental {} not found",
            rental_id.value()
        ))),
        Err(e) => Err(QueryError::InternalError(e.to_string())),
    }
}

/// GET /rentals - レンタル一覧（新しい順）
///
/// クエリパラメータ:
/// - requester_id: 申請者で絞り込む（農家の「自分のレンタル」画面）
/// - status: pending, approved, rejected, completed のいずれか
pub async fn list_rentals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRentalsQuery>,
) -> Result<Json<Vec<RentalResponse>>, QueryError> {
    let status = query
        .status
        .as_deref()
        .map(parse_status_filter)
        .transpose()
        .map_err(QueryError::BadRequest)?;

    let read_model = &state.service_deps.rental_read_model;
    let rentals = match query.requester_id {
        Some(requester_id) => read_model
            .find_by_requester(FarmerId::from_uuid(requester_id))
            .await
            .map(|views| {
                views
                    .into_iter()
                    .filter(|view| status.is_none_or(|s| view.status == s))
                    .collect::<Vec<_>>()
            }),
        None => read_model.list(status).await,
    }
    .map_err(|e| QueryError::InternalError(e.to_string()))?;

    Ok(Json(rentals.into_iter().map(RentalResponse::from).collect()))
}

/// GET /rentals/stats - 管理者ダッシュボード用の集計
pub async fn rental_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RentalStatistics>, ApiError> {
    let stats = execute_rental_statistics(&state.service_deps).await?;
    Ok(Json(stats))
}

/// GET /equipment/:id/blocked-dates?from=&to= - 予約で塞がっている日
pub async fn blocked_dates(
    State(state): State<Arc<AppState>>,
    Path(equipment_id): Path<Uuid>,
    Query(query): Query<BlockedDatesQuery>,
) -> Result<Json<BlockedDatesResponse>, ApiError> {
    let dates = execute_blocked_dates(
        &state.service_deps,
        EquipmentId::from_uuid(equipment_id),
        query.from,
        query.to,
    )
    .await?;

    Ok(Json(BlockedDatesResponse {
        equipment_id,
        from: query.from,
        to: query.to,
        blocked_dates: dates,
    }))
}

// ============================================================================
// Error types
// ============================================================================

/// クエリハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    NotFound(String),
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            QueryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            QueryError::InternalError(msg) => {
                tracing::error!("Internal error in query handler: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
