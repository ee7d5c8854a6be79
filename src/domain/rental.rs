use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::availability::{self, AvailabilityPolicy, RentalRequest, ReservationInterval};
use super::{
    AdminId, DomainEvent, Equipment, EquipmentId, FarmerId, Quantity, RejectionReason,
    RentalApproved, RentalCompleted, RentalId, RentalPeriod, RentalRejected, RentalRequested,
    RentalStatus, RentalTransitionError, ReplayError,
};

// ============================================================================
// 型安全な状態パターン
// ============================================================================

/// Rental集約の共通フィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalCore {
    pub rental_id: RentalId,

    // 他の集約への参照（IDのみ）
    pub equipment_id: EquipmentId,
    pub requester_id: FarmerId,

    pub quantity: Quantity,
    pub period: RentalPeriod,
    /// 小数2桁に丸め済み
    pub total_cost: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 承認待ち状態
///
/// 管理者の判断待ち。空き判定では予約として数える。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRental {
    pub core: RentalCore,
}

/// 承認済み状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedRental {
    pub core: RentalCore,
    pub approved_by: AdminId,
    pub approved_at: DateTime<Utc>,
}

/// 却下状態（終端）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRental {
    pub core: RentalCore,
    pub rejected_by: AdminId,
    pub reason: Option<String>,
    pub rejected_at: DateTime<Utc>,
}

/// 完了状態（終端）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRental {
    pub core: RentalCore,
    pub approved_by: AdminId,
    pub approved_at: DateTime<Utc>,
    pub completed_by: AdminId,
    pub completed_at: DateTime<Utc>,
}

macro_rules! deref_to_core {
    ($($state:ty),*) => {
        $(
            impl std::ops::Deref for $state {
                type Target = RentalCore;

                fn deref(&self) -> &Self::Target {
                    &self.core
                }
            }
        )*
    };
}

deref_to_core!(PendingRental, ApprovedRental, RejectedRental, CompletedRental);

/// Rental集約の統合型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rental {
    Pending(PendingRental),
    Approved(ApprovedRental),
    Rejected(RejectedRental),
    Completed(CompletedRental),
}

impl Rental {
    pub fn core(&self) -> &RentalCore {
        match self {
            Rental::Pending(r) => &r.core,
            Rental::Approved(r) => &r.core,
            Rental::Rejected(r) => &r.core,
            Rental::Completed(r) => &r.core,
        }
    }

    pub fn status(&self) -> RentalStatus {
        match self {
            Rental::Pending(_) => RentalStatus::Pending,
            Rental::Approved(_) => RentalStatus::Approved,
            Rental::Rejected(_) => RentalStatus::Rejected,
            Rental::Completed(_) => RentalStatus::Completed,
        }
    }

    /// 承認待ちであれば取り出す
    pub fn into_pending(self) -> Result<PendingRental, RentalTransitionError> {
        match self {
            Rental::Pending(pending) => Ok(pending),
            other => Err(RentalTransitionError::NotPending(other.status())),
        }
    }

    /// 承認済みであれば取り出す
    pub fn into_approved(self) -> Result<ApprovedRental, RentalTransitionError> {
        match self {
            Rental::Approved(approved) => Ok(approved),
            other => Err(RentalTransitionError::NotApproved(other.status())),
        }
    }
}

// ============================================================================
// 純粋関数による状態遷移
// ============================================================================

/// 純粋関数：レンタルを申請する
///
/// 空き判定と料金計算を行い、通過すれば承認待ちのレンタルを生成する。
/// 合計金額はここで一度だけ小数2桁に丸める。
///
/// 副作用なし。新しいPendingRentalとイベントを返す。
pub fn request_rental(
    request: &RentalRequest,
    requester_id: FarmerId,
    equipment: &Equipment,
    existing: &[ReservationInterval],
    policy: AvailabilityPolicy,
    requested_at: DateTime<Utc>,
) -> Result<(PendingRental, RentalRequested), RejectionReason> {
    let accepted = availability::validate_request(request, equipment, existing, policy)?;
    let total_cost = availability::round_to_cents(accepted.total_cost);
    let rental_id = RentalId::new();

    let rental = PendingRental {
        core: RentalCore {
            rental_id,
            equipment_id: equipment.equipment_id,
            requester_id,
            quantity: request.quantity,
            period: accepted.period,
            total_cost,
            created_at: requested_at,
            updated_at: requested_at,
        },
    };

    let event = RentalRequested {
        rental_id,
        equipment_id: equipment.equipment_id,
        requester_id,
        quantity: request.quantity,
        start_date: accepted.period.start(),
        end_date: accepted.period.end(),
        total_cost,
        requested_at,
    };

    Ok((rental, event))
}

/// 純粋関数：レンタルを承認する
///
/// 承認待ちのみ受け付ける（型で保証）。
pub fn approve_rental(
    rental: PendingRental,
    approved_by: AdminId,
    approved_at: DateTime<Utc>,
) -> (ApprovedRental, RentalApproved) {
    let event = RentalApproved {
        rental_id: rental.rental_id,
        approved_by,
        approved_at,
    };

    let approved = ApprovedRental {
        core: RentalCore {
            updated_at: approved_at,
            ..rental.core
        },
        approved_by,
        approved_at,
    };

    (approved, event)
}

/// 純粋関数：レンタルを却下する
///
/// 申請時に空き判定を通過していても、管理者はいつでも却下できる。
pub fn reject_rental(
    rental: PendingRental,
    rejected_by: AdminId,
    reason: Option<String>,
    rejected_at: DateTime<Utc>,
) -> (RejectedRental, RentalRejected) {
    let event = RentalRejected {
        rental_id: rental.rental_id,
        rejected_by,
        reason: reason.clone(),
        rejected_at,
    };

    let rejected = RejectedRental {
        core: RentalCore {
            updated_at: rejected_at,
            ..rental.core
        },
        rejected_by,
        reason,
        rejected_at,
    };

    (rejected, event)
}

/// 純粋関数：レンタルを完了する
///
/// 承認済みのみ受け付ける（型で保証）。
pub fn complete_rental(
    rental: ApprovedRental,
    completed_by: AdminId,
    completed_at: DateTime<Utc>,
) -> (CompletedRental, RentalCompleted) {
    let event = RentalCompleted {
        rental_id: rental.rental_id,
        completed_by,
        completed_at,
    };

    let completed = CompletedRental {
        core: RentalCore {
            updated_at: completed_at,
            ..rental.core
        },
        approved_by: rental.approved_by,
        approved_at: rental.approved_at,
        completed_by,
        completed_at,
    };

    (completed, event)
}

// ============================================================================
// イベントソーシング
// ============================================================================

fn ensure_same_rental(current: RentalId, event: RentalId) -> Result<(), ReplayError> {
    if current != event {
        return Err(ReplayError::MismatchedRental { current, event });
    }
    Ok(())
}

/// イベントを適用して新しい状態を生成する純粋関数
///
/// 状態機械に反する履歴は`ReplayError`として返す。
pub fn apply_event(rental: Option<Rental>, event: &DomainEvent) -> Result<Rental, ReplayError> {
    match (rental, event) {
        (None, DomainEvent::RentalRequested(e)) => {
            let period = RentalPeriod::new(e.start_date, e.end_date).ok_or_else(|| {
                ReplayError::InvalidTransition {
                    state: "none".to_string(),
                    event: event.event_type(),
                }
            })?;

            Ok(Rental::Pending(PendingRental {
                core: RentalCore {
                    rental_id: e.rental_id,
                    equipment_id: e.equipment_id,
                    requester_id: e.requester_id,
                    quantity: e.quantity,
                    period,
                    total_cost: e.total_cost,
                    created_at: e.requested_at,
                    updated_at: e.requested_at,
                },
            }))
        }
        (Some(current), DomainEvent::RentalRequested(_)) => Err(ReplayError::DuplicateRequest(
            current.core().rental_id,
        )),

        (Some(Rental::Pending(pending)), DomainEvent::RentalApproved(e)) => {
            ensure_same_rental(pending.rental_id, e.rental_id)?;
            Ok(Rental::Approved(approve_rental(pending, e.approved_by, e.approved_at).0))
        }

        (Some(Rental::Pending(pending)), DomainEvent::RentalRejected(e)) => {
            ensure_same_rental(pending.rental_id, e.rental_id)?;
            Ok(Rental::Rejected(
                reject_rental(pending, e.rejected_by, e.reason.clone(), e.rejected_at).0,
            ))
        }

        (Some(Rental::Approved(approved)), DomainEvent::RentalCompleted(e)) => {
            ensure_same_rental(approved.rental_id, e.rental_id)?;
            Ok(Rental::Completed(
                complete_rental(approved, e.completed_by, e.completed_at).0,
            ))
        }

        (rental, event) => Err(ReplayError::InvalidTransition {
            state: rental
                .map(|r| r.status().to_string())
                .unwrap_or_else(|| "none".to_string()),
            event: event.event_type(),
        }),
    }
}

/// イベント列から現在の状態を復元する
///
/// * イベントが空の場合は`Ok(None)`
/// * それ以外は復元されたRentalを`Some`で返す
pub fn replay_events(events: &[DomainEvent]) -> Result<Option<Rental>, ReplayError> {
    events
        .iter()
        .try_fold(None, |rental, event| apply_event(rental, event).map(Some))
}
