use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::rental::RentalQuote;
use crate::domain::{
    AdminId, Equipment, EquipmentId, FarmerId, Quantity, QuantityError, RentalId,
    commands::{
        ApproveFarmer, ApproveRental, CompleteRental, QuoteRental, RegisterEquipment,
        RejectRental, RequestRental, UpdateEquipment,
    },
    payment::PaymentDetails,
};
use crate::ports::rental_read_model::{RentalStatus, RentalView};

// ============================================================================
// Requests
// ============================================================================

/// 見積もりリクエスト（POST /rentals/quote）
#[derive(Debug, Deserialize)]
pub struct QuoteRentalRequest {
    pub equipment_id: Uuid,
    pub quantity: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl QuoteRentalRequest {
    pub fn to_command(&self) -> Result<QuoteRental, QuantityError> {
        Ok(QuoteRental {
            equipment_id: EquipmentId::from_uuid(self.equipment_id),
            quantity: Quantity::new(self.quantity)?,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// 支払い情報（入力されたままの値）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaymentRequest {
    pub card_number: String,
    pub cardholder_name: String,
    pub expiry: String,
    pub cvv: String,
}

/// レンタル申請リクエスト（POST /rentals）
#[derive(Debug, Deserialize)]
pub struct RequestRentalRequest {
    pub equipment_id: Uuid,
    pub requester_id: Uuid,
    pub quantity: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment: PaymentRequest,
}

impl RequestRentalRequest {
    /// 支払い情報は整形してからコマンドに載せる
    pub fn to_command(&self, requested_at: DateTime<Utc>) -> Result<RequestRental, QuantityError> {
        Ok(RequestRental {
            equipment_id: EquipmentId::from_uuid(self.equipment_id),
            requester_id: FarmerId::from_uuid(self.requester_id),
            quantity: Quantity::new(self.quantity)?,
            start_date: self.start_date,
            end_date: self.end_date,
            payment: PaymentDetails::from_raw(
                &self.payment.card_number,
                &self.payment.cardholder_name,
                &self.payment.expiry,
                &self.payment.cvv,
            ),
            requested_at,
        })
    }
}

/// 承認・完了リクエスト
#[derive(Debug, Deserialize)]
pub struct AdminActionRequest {
    pub admin_id: Uuid,
}

impl AdminActionRequest {
    pub fn to_approve_command(&self, rental_id: RentalId, at: DateTime<Utc>) -> ApproveRental {
        ApproveRental {
            rental_id,
            admin_id: AdminId::from_uuid(self.admin_id),
            approved_at: at,
        }
    }

    pub fn to_complete_command(&self, rental_id: RentalId, at: DateTime<Utc>) -> CompleteRental {
        CompleteRental {
            rental_id,
            admin_id: AdminId::from_uuid(self.admin_id),
            completed_at: at,
        }
    }

    pub fn to_approve_farmer_command(&self, farmer_id: FarmerId) -> ApproveFarmer {
        ApproveFarmer {
            farmer_id,
            admin_id: AdminId::from_uuid(self.admin_id),
        }
    }
}

/// 却下リクエスト
#[derive(Debug, Deserialize)]
pub struct RejectRentalRequest {
    pub admin_id: Uuid,
    pub reason: Option<String>,
}

impl RejectRentalRequest {
    pub fn to_command(&self, rental_id: RentalId, at: DateTime<Utc>) -> RejectRental {
        RejectRental {
            rental_id,
            admin_id: AdminId::from_uuid(self.admin_id),
            reason: self.reason.clone(),
            rejected_at: at,
        }
    }
}

/// 機材の登録・更新リクエスト（POST /equipment, PUT /equipment/:id）
///
/// daily_rateは文字列・数値どちらの10進数でも受け付ける。
#[derive(Debug, Deserialize)]
pub struct EquipmentRequest {
    pub name: String,
    pub daily_rate: Decimal,
    pub quantity_available: u32,
}

impl EquipmentRequest {
    pub fn to_register_command(&self) -> RegisterEquipment {
        RegisterEquipment {
            name: self.name.clone(),
            daily_rate: self.daily_rate,
            quantity_available: self.quantity_available,
        }
    }

    pub fn to_update_command(&self, equipment_id: EquipmentId) -> UpdateEquipment {
        UpdateEquipment {
            equipment_id,
            name: self.name.clone(),
            daily_rate: self.daily_rate,
            quantity_available: self.quantity_available,
        }
    }
}

/// レンタル一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListRentalsQuery {
    /// 申請者でフィルタリング
    pub requester_id: Option<Uuid>,
    /// ステータスでフィルタリング
    pub status: Option<String>,
}

/// カレンダー表示用のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct BlockedDatesQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

// ============================================================================
// Responses
// ============================================================================

/// 見積もりレスポンス（金額は文字列の10進数）
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub equipment_id: Uuid,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    pub daily_rate: Decimal,
    pub total_cost: Decimal,
}

impl From<RentalQuote> for QuoteResponse {
    fn from(quote: RentalQuote) -> Self {
        Self {
            equipment_id: quote.equipment_id.value(),
            quantity: quote.quantity,
            start_date: quote.start_date,
            end_date: quote.end_date,
            duration_days: quote.duration_days,
            daily_rate: quote.daily_rate,
            total_cost: quote.total_cost,
        }
    }
}

/// レンタルレスポンス（GET /rentals/:id など）
#[derive(Debug, Serialize)]
pub struct RentalResponse {
    pub rental_id: Uuid,
    pub equipment_id: Uuid,
    pub requester_id: Uuid,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RentalView> for RentalResponse {
    fn from(view: RentalView) -> Self {
        Self {
            rental_id: view.rental_id.value(),
            equipment_id: view.equipment_id.value(),
            requester_id: view.requester_id.value(),
            quantity: view.quantity,
            start_date: view.start_date,
            end_date: view.end_date,
            total_cost: view.total_cost,
            status: view.status,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

/// 機材レスポンス
#[derive(Debug, Serialize)]
pub struct EquipmentResponse {
    pub equipment_id: Uuid,
    pub name: String,
    pub daily_rate: Decimal,
    pub quantity_available: u32,
}

impl From<Equipment> for EquipmentResponse {
    fn from(equipment: Equipment) -> Self {
        Self {
            equipment_id: equipment.equipment_id.value(),
            name: equipment.name,
            daily_rate: equipment.daily_rate,
            quantity_available: equipment.quantity_available,
        }
    }
}

/// 農家アカウントの状態
#[derive(Debug, Serialize)]
pub struct FarmerResponse {
    pub farmer_id: Uuid,
    pub approved: bool,
}

#[derive(Debug, Serialize)]
pub struct BlockedDatesResponse {
    pub equipment_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub blocked_dates: Vec<NaiveDate>,
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// ステータスクエリパラメータのパースとバリデーション
pub fn parse_status_filter(status: &str) -> Result<RentalStatus, String> {
    status.parse::<RentalStatus>()
}
