use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::{AdminId, EquipmentId, FarmerId, Quantity, RentalId, payment::PaymentDetails};

/// コマンド：料金と空きを確認する（保存しない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRental {
    pub equipment_id: EquipmentId,
    pub quantity: Quantity,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// コマンド：レンタルを申請する
#[derive(Debug, Clone)]
pub struct RequestRental {
    pub equipment_id: EquipmentId,
    pub requester_id: FarmerId,
    pub quantity: Quantity,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment: PaymentDetails,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：レンタルを承認する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveRental {
    pub rental_id: RentalId,
    pub admin_id: AdminId,
    pub approved_at: DateTime<Utc>,
}

/// コマンド：レンタルを却下する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectRental {
    pub rental_id: RentalId,
    pub admin_id: AdminId,
    pub reason: Option<String>,
    pub rejected_at: DateTime<Utc>,
}

/// コマンド：レンタルを完了する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteRental {
    pub rental_id: RentalId,
    pub admin_id: AdminId,
    pub completed_at: DateTime<Utc>,
}

/// コマンド：機材を登録する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterEquipment {
    pub name: String,
    pub daily_rate: Decimal,
    pub quantity_available: u32,
}

/// コマンド：機材の名前・日額・在庫総数を変更する
///
/// 申請済みのレンタルの料金は変わらない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEquipment {
    pub equipment_id: EquipmentId,
    pub name: String,
    pub daily_rate: Decimal,
    pub quantity_available: u32,
}

/// コマンド：農家アカウントを承認する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveFarmer {
    pub farmer_id: FarmerId,
    pub admin_id: AdminId,
}
