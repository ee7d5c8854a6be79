use crate::domain::availability::{ReservationInterval, ReservationStatus};
use crate::domain::rental::Rental;
use crate::domain::value_objects::{EquipmentId, FarmerId, RentalId};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

pub use crate::domain::value_objects::RentalStatus;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// レンタルビュー（Read Model）
///
/// クエリに最適化された非正規化ビュー（CQRSパターン）。
/// 永続化されるレンタル記録の項目（equipment_id, requester_id, quantity,
/// start_date, end_date, total_cost, status）をそのまま持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalView {
    pub rental_id: RentalId,
    pub equipment_id: EquipmentId,
    pub requester_id: FarmerId,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RentalView {
    /// 空きを塞ぐレンタル（承認待ち・承認済み）のみ予約区間に変換できる
    pub fn to_reservation_interval(&self) -> Option<ReservationInterval> {
        Some(ReservationInterval {
            start: self.start_date,
            end: self.end_date,
            status: ReservationStatus::from_rental_status(self.status)?,
            quantity: self.quantity,
        })
    }
}

impl From<&Rental> for RentalView {
    /// 集約の完全な状態をビューに変換する
    fn from(rental: &Rental) -> Self {
        let core = rental.core();
        RentalView {
            rental_id: core.rental_id,
            equipment_id: core.equipment_id,
            requester_id: core.requester_id,
            quantity: core.quantity.value(),
            start_date: core.period.start(),
            end_date: core.period.end(),
            total_cost: core.total_cost,
            status: rental.status(),
            created_at: core.created_at,
            updated_at: core.updated_at,
        }
    }
}

/// レンタルRead Modelポート
#[async_trait]
pub trait RentalReadModel: Send + Sync {
    /// レンタルの現在状態を保存する（upsert）
    ///
    /// Read Modelは常にイベントから復元した集約の完全な状態を反映し、
    /// 部分更新は行わない。
    async fn save(&self, view: RentalView) -> Result<()>;

    /// IDでレンタルを取得する
    async fn get_by_id(&self, rental_id: RentalId) -> Result<Option<RentalView>>;

    /// 農家の全レンタルを新しい順に取得する
    async fn find_by_requester(&self, requester_id: FarmerId) -> Result<Vec<RentalView>>;

    /// 機材の有効な予約（承認待ち・承認済み）を取得する
    ///
    /// 空き判定の直前に呼ばれ、その時点のスナップショットを返す。
    async fn find_active_for_equipment(&self, equipment_id: EquipmentId)
    -> Result<Vec<RentalView>>;

    /// 全レンタルを新しい順に取得する（ステータスで絞り込み可能）
    async fn list(&self, status: Option<RentalStatus>) -> Result<Vec<RentalView>>;
}
