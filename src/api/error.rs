use crate::application::rental::RentalApplicationError;
use crate::domain::{QuantityError, RejectionReason};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと、コマンド組み立て時の入力エラーを
/// HTTPレスポンスにマッピングする。
#[derive(Debug)]
pub enum ApiError {
    Application(RentalApplicationError),
    InvalidQuantity(QuantityError),
}

impl From<RentalApplicationError> for ApiError {
    fn from(err: RentalApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<QuantityError> for ApiError {
    fn from(err: QuantityError) -> Self {
        ApiError::InvalidQuantity(err)
    }
}

fn rejection_code(reason: RejectionReason) -> &'static str {
    match reason {
        RejectionReason::InsufficientQuantity => "INSUFFICIENT_QUANTITY",
        RejectionReason::InvalidDateRange => "INVALID_DATE_RANGE",
        RejectionReason::DateConflict => "DATE_CONFLICT",
        RejectionReason::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
    }
}

fn internal(code: &'static str, message: &'static str) -> (StatusCode, &'static str, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, code, message.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let unprocessable = StatusCode::UNPROCESSABLE_ENTITY;

        let (status, error_type, message) = match self {
            ApiError::InvalidQuantity(e) => (unprocessable, "INVALID_QUANTITY", e.to_string()),
            ApiError::Application(err) => match err {
                // 404 Not Found - リクエストされたリソースが存在しない
                RentalApplicationError::RentalNotFound => {
                    (StatusCode::NOT_FOUND, "RENTAL_NOT_FOUND", err.to_string())
                }
                RentalApplicationError::EquipmentNotFound => {
                    (StatusCode::NOT_FOUND, "EQUIPMENT_NOT_FOUND", err.to_string())
                }

                // 422 Unprocessable Entity - ビジネスルール違反（利用者が直せる）
                RentalApplicationError::Rejected(reason) => {
                    (unprocessable, rejection_code(reason), reason.to_string())
                }
                RentalApplicationError::FarmerNotFound => {
                    (unprocessable, "FARMER_NOT_FOUND", err.to_string())
                }
                RentalApplicationError::FarmerNotApproved => {
                    (unprocessable, "FARMER_NOT_APPROVED", err.to_string())
                }
                RentalApplicationError::PaymentInvalid => {
                    (unprocessable, "PAYMENT_INVALID", err.to_string())
                }
                RentalApplicationError::InvalidRentalState(ref e) => {
                    (unprocessable, "INVALID_RENTAL_STATE", e.to_string())
                }
                RentalApplicationError::ApprovalConflict => {
                    (unprocessable, "APPROVAL_CONFLICT", err.to_string())
                }
                RentalApplicationError::InvalidEquipment(ref e) => {
                    (unprocessable, "INVALID_EQUIPMENT", e.to_string())
                }

                // 409 Conflict - 同じレンタルへの更新が競合した（読み直して再実行できる）
                RentalApplicationError::ConcurrentModification => {
                    (StatusCode::CONFLICT, "CONCURRENT_MODIFICATION", err.to_string())
                }

                // 500 Internal Server Error - システム障害
                // 詳細はログにのみ記録し、クライアントには一般的なメッセージを返す
                RentalApplicationError::CorruptedHistory(ref e) => {
                    tracing::error!("Corrupted rental history: {}", e);
                    internal("CORRUPTED_HISTORY", "Rental history could not be replayed")
                }
                RentalApplicationError::EventStoreError(ref e) => {
                    tracing::error!("Event store error: {}", e);
                    internal("EVENT_STORE_ERROR", "Failed to store event")
                }
                RentalApplicationError::ReadModelError(ref e) => {
                    tracing::error!("Read model error: {}", e);
                    internal("READ_MODEL_ERROR", "Failed to access rental records")
                }
                RentalApplicationError::EquipmentCatalogError(ref e) => {
                    tracing::error!("Equipment catalog error: {}", e);
                    internal("EQUIPMENT_CATALOG_ERROR", "Equipment catalog error")
                }
                RentalApplicationError::FarmerDirectoryError(ref e) => {
                    tracing::error!("Farmer directory error: {}", e);
                    internal("FARMER_DIRECTORY_ERROR", "Farmer directory error")
                }
            },
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
