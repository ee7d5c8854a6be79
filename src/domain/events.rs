use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AdminId, EquipmentId, FarmerId, Quantity, RentalId};

/// イベント：レンタルが申請された（承認待ち）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRequested {
    pub rental_id: RentalId,
    pub equipment_id: EquipmentId,
    pub requester_id: FarmerId,
    pub quantity: Quantity,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 小数2桁に丸め済みの合計金額
    pub total_cost: Decimal,
    pub requested_at: DateTime<Utc>,
}

/// イベント：レンタルが承認された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalApproved {
    pub rental_id: RentalId,
    pub approved_by: AdminId,
    pub approved_at: DateTime<Utc>,
}

/// イベント：レンタルが却下された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRejected {
    pub rental_id: RentalId,
    pub rejected_by: AdminId,
    pub reason: Option<String>,
    pub rejected_at: DateTime<Utc>,
}

/// イベント：レンタルが完了した（機材返却済み）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalCompleted {
    pub rental_id: RentalId,
    pub completed_by: AdminId,
    pub completed_at: DateTime<Utc>,
}

/// ドメインイベント統合型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainEvent {
    RentalRequested(RentalRequested),
    RentalApproved(RentalApproved),
    RentalRejected(RentalRejected),
    RentalCompleted(RentalCompleted),
}

impl DomainEvent {
    /// イベント種別名（永続化時の識別子）
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::RentalRequested(_) => "RentalRequested",
            DomainEvent::RentalApproved(_) => "RentalApproved",
            DomainEvent::RentalRejected(_) => "RentalRejected",
            DomainEvent::RentalCompleted(_) => "RentalCompleted",
        }
    }

    pub fn rental_id(&self) -> RentalId {
        match self {
            DomainEvent::RentalRequested(e) => e.rental_id,
            DomainEvent::RentalApproved(e) => e.rental_id,
            DomainEvent::RentalRejected(e) => e.rental_id,
            DomainEvent::RentalCompleted(e) => e.rental_id,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::RentalRequested(e) => e.requested_at,
            DomainEvent::RentalApproved(e) => e.approved_at,
            DomainEvent::RentalRejected(e) => e.rejected_at,
            DomainEvent::RentalCompleted(e) => e.completed_at,
        }
    }
}
