use crate::domain::{
    self, DomainEvent, Equipment, EquipmentId, RejectionReason, RentalId,
    availability::{self, AvailabilityPolicy, RentalRequest, ReservationInterval},
    commands::*,
    rental::Rental,
};
use crate::ports::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::errors::{RentalApplicationError, Result};

/// カレンダー表示で一度に問い合わせられる最大日数
const MAX_CALENDAR_WINDOW_DAYS: i64 = 366;

/// サービスの依存関係
///
/// 振る舞いを持たないデータ構造として定義し、各関数に明示的に渡す。
/// ログイン中のユーザーなどのセッション状態はここに含めず、
/// コマンドの引数として受け取る。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub event_store: Arc<dyn EventStore>,
    pub rental_read_model: Arc<dyn RentalReadModel>,
    pub equipment_catalog: Arc<dyn EquipmentCatalog>,
    pub farmer_directory: Arc<dyn FarmerDirectory>,
    pub notifier: Arc<dyn RentalNotifier>,
    pub availability_policy: AvailabilityPolicy,
}

/// 見積もり結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalQuote {
    pub equipment_id: EquipmentId,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    pub daily_rate: Decimal,
    /// 小数2桁に丸め済み
    pub total_cost: Decimal,
}

/// バージョン不一致は`ConcurrentModification`、それ以外は`EventStoreError`
fn event_store_error(err: Box<dyn std::error::Error + Send + Sync>) -> RentalApplicationError {
    match err.downcast_ref::<VersionConflict>() {
        Some(conflict) => {
            tracing::warn!("{}", conflict);
            RentalApplicationError::ConcurrentModification
        }
        None => RentalApplicationError::EventStoreError(err),
    }
}

/// イベントストアからレンタル集約を復元する
///
/// 復元に使ったイベント数を集約のバージョンとして併せて返す。
async fn load_rental(
    event_store: &Arc<dyn EventStore>,
    rental_id: RentalId,
) -> Result<(Rental, usize)> {
    let events = event_store
        .load(rental_id)
        .await
        .map_err(RentalApplicationError::EventStoreError)?;

    let rental = domain::rental::replay_events(&events)
        .map_err(RentalApplicationError::CorruptedHistory)?
        .ok_or(RentalApplicationError::RentalNotFound)?;

    Ok((rental, events.len()))
}

async fn find_equipment(deps: &ServiceDependencies, equipment_id: EquipmentId) -> Result<Equipment> {
    deps.equipment_catalog
        .find_by_id(equipment_id)
        .await
        .map_err(RentalApplicationError::EquipmentCatalogError)?
        .ok_or(RentalApplicationError::EquipmentNotFound)
}

/// 機材の有効な予約区間を取得する（この時点のスナップショット）
async fn active_reservations(
    deps: &ServiceDependencies,
    equipment_id: EquipmentId,
) -> Result<Vec<(RentalId, ReservationInterval)>> {
    let views = deps
        .rental_read_model
        .find_active_for_equipment(equipment_id)
        .await
        .map_err(RentalApplicationError::ReadModelError)?;

    Ok(views
        .iter()
        .filter_map(|view| Some((view.rental_id, view.to_reservation_interval()?)))
        .collect())
}

/// イベント保存・Read Model更新・通知をまとめて行う
///
/// `expected_version`は読み込み時のバージョン。その後に別のイベントが
/// 追加されていれば何も保存せず`ConcurrentModification`を返す。
///
/// 結果整合性：EventStore保存後にRead Model更新が失敗すると一時的に不整合になる。
/// 通知の失敗はログに残すのみでコマンドは成功とする。
async fn persist(
    deps: &ServiceDependencies,
    rental: &Rental,
    expected_version: usize,
    event: DomainEvent,
) -> Result<()> {
    let rental_id = rental.core().rental_id;

    deps.event_store
        .append(rental_id, expected_version, vec![event])
        .await
        .map_err(event_store_error)?;

    deps.rental_read_model
        .save(RentalView::from(rental))
        .await
        .map_err(RentalApplicationError::ReadModelError)?;

    let notification = RentalNotification {
        rental_id,
        equipment_id: rental.core().equipment_id,
        requester_id: rental.core().requester_id,
        status: rental.status(),
    };
    if let Err(e) = deps.notifier.notify(notification).await {
        tracing::warn!(rental_id = %rental_id.value(), "Failed to deliver rental notification: {}", e);
    }

    Ok(())
}

/// 見積もりを行う（保存しない）
///
/// 申請と同じ空き判定を行い、日数と丸め済みの合計金額を返す。
pub async fn quote_rental(deps: &ServiceDependencies, cmd: QuoteRental) -> Result<RentalQuote> {
    let equipment = find_equipment(deps, cmd.equipment_id).await?;
    let existing: Vec<ReservationInterval> = active_reservations(deps, cmd.equipment_id)
        .await?
        .into_iter()
        .map(|(_, interval)| interval)
        .collect();

    let request = RentalRequest {
        equipment_id: cmd.equipment_id,
        quantity: cmd.quantity,
        start_date: cmd.start_date,
        end_date: cmd.end_date,
    };

    let accepted = availability::validate_request(
        &request,
        &equipment,
        &existing,
        deps.availability_policy,
    )?;

    Ok(RentalQuote {
        equipment_id: equipment.equipment_id,
        quantity: cmd.quantity.value(),
        start_date: accepted.period.start(),
        end_date: accepted.period.end(),
        duration_days: accepted.duration_days,
        daily_rate: equipment.daily_rate,
        total_cost: availability::round_to_cents(accepted.total_cost),
    })
}

/// レンタルを申請する
///
/// ビジネスルール（この順に確認）：
/// - 農家が存在すること
/// - 農家が管理者に承認済みであること
/// - 機材が存在すること
/// - 数量・日付・既存予約との衝突（空き判定）
/// - 支払い情報がそろっていること
///
/// # 一貫性保証
///
/// 空き判定は直前に取得した予約のスナップショットに対して行うため、
/// 同時に申請された重複予約を排除できない。最終的な判断は承認時の再確認と
/// 管理者による却下に委ねる。
pub async fn request_rental(deps: &ServiceDependencies, cmd: RequestRental) -> Result<RentalId> {
    let farmer_exists = deps
        .farmer_directory
        .exists(cmd.requester_id)
        .await
        .map_err(RentalApplicationError::FarmerDirectoryError)?;

    if !farmer_exists {
        return Err(RentalApplicationError::FarmerNotFound);
    }

    let farmer_approved = deps
        .farmer_directory
        .is_approved(cmd.requester_id)
        .await
        .map_err(RentalApplicationError::FarmerDirectoryError)?;

    if !farmer_approved {
        return Err(RentalApplicationError::FarmerNotApproved);
    }

    let equipment = find_equipment(deps, cmd.equipment_id).await?;
    let existing: Vec<ReservationInterval> = active_reservations(deps, cmd.equipment_id)
        .await?
        .into_iter()
        .map(|(_, interval)| interval)
        .collect();

    let request = RentalRequest {
        equipment_id: cmd.equipment_id,
        quantity: cmd.quantity,
        start_date: cmd.start_date,
        end_date: cmd.end_date,
    };

    let (pending, event) = domain::rental::request_rental(
        &request,
        cmd.requester_id,
        &equipment,
        &existing,
        deps.availability_policy,
        cmd.requested_at,
    )?;

    if !cmd.payment.is_complete() {
        return Err(RentalApplicationError::PaymentInvalid);
    }

    let rental_id = pending.rental_id;
    persist(
        deps,
        &Rental::Pending(pending),
        0,
        DomainEvent::RentalRequested(event),
    )
    .await?;

    tracing::info!(
        rental_id = %rental_id.value(),
        equipment_id = %cmd.equipment_id.value(),
        "Rental requested, pending admin approval"
    );

    Ok(rental_id)
}

/// レンタルを承認する
///
/// ビジネスルール：
/// - レンタルが存在し、承認待ちであること
/// - 他の承認済み予約と衝突しないこと（申請後に割り込まれた場合の再確認）
pub async fn approve_rental(deps: &ServiceDependencies, cmd: ApproveRental) -> Result<()> {
    let (rental, version) = load_rental(&deps.event_store, cmd.rental_id).await?;
    let pending = rental.into_pending()?;

    let equipment = find_equipment(deps, pending.equipment_id).await?;
    let approved_elsewhere: Vec<ReservationInterval> =
        active_reservations(deps, pending.equipment_id)
            .await?
            .into_iter()
            .filter(|(id, interval)| {
                *id != cmd.rental_id
                    && interval.status == availability::ReservationStatus::Approved
            })
            .map(|(_, interval)| interval)
            .collect();

    let recheck = RentalRequest {
        equipment_id: pending.equipment_id,
        quantity: pending.quantity,
        start_date: Some(pending.period.start()),
        end_date: Some(pending.period.end()),
    };

    match availability::validate_request(
        &recheck,
        &equipment,
        &approved_elsewhere,
        deps.availability_policy,
    ) {
        Ok(_) => {}
        Err(RejectionReason::DateConflict) => {
            tracing::warn!(
                rental_id = %cmd.rental_id.value(),
                "Approval blocked by an already approved reservation"
            );
            return Err(RentalApplicationError::ApprovalConflict);
        }
        Err(reason) => return Err(RentalApplicationError::Rejected(reason)),
    }

    let (approved, event) = domain::rental::approve_rental(pending, cmd.admin_id, cmd.approved_at);
    persist(
        deps,
        &Rental::Approved(approved),
        version,
        DomainEvent::RentalApproved(event),
    )
    .await?;

    tracing::info!(rental_id = %cmd.rental_id.value(), "Rental approved");
    Ok(())
}

/// レンタルを却下する
///
/// 承認待ちであれば、申請時の判定結果にかかわらず却下できる。
pub async fn reject_rental(deps: &ServiceDependencies, cmd: RejectRental) -> Result<()> {
    let (rental, version) = load_rental(&deps.event_store, cmd.rental_id).await?;
    let pending = rental.into_pending()?;

    let (rejected, event) =
        domain::rental::reject_rental(pending, cmd.admin_id, cmd.reason, cmd.rejected_at);
    persist(
        deps,
        &Rental::Rejected(rejected),
        version,
        DomainEvent::RentalRejected(event),
    )
    .await?;

    tracing::info!(rental_id = %cmd.rental_id.value(), "Rental rejected");
    Ok(())
}

/// レンタルを完了する（機材の返却確認）
pub async fn complete_rental(deps: &ServiceDependencies, cmd: CompleteRental) -> Result<()> {
    let (rental, version) = load_rental(&deps.event_store, cmd.rental_id).await?;
    let approved = rental.into_approved()?;

    let (completed, event) =
        domain::rental::complete_rental(approved, cmd.admin_id, cmd.completed_at);
    persist(
        deps,
        &Rental::Completed(completed),
        version,
        DomainEvent::RentalCompleted(event),
    )
    .await?;

    tracing::info!(rental_id = %cmd.rental_id.value(), "Rental completed");
    Ok(())
}

/// 機材の予約済みの日を期間内で列挙する（カレンダー表示用）
pub async fn blocked_dates(
    deps: &ServiceDependencies,
    equipment_id: EquipmentId,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    if to < from || (to - from).num_days() >= MAX_CALENDAR_WINDOW_DAYS {
        return Err(RejectionReason::InvalidDateRange.into());
    }

    find_equipment(deps, equipment_id).await?;
    let existing: Vec<ReservationInterval> = active_reservations(deps, equipment_id)
        .await?
        .into_iter()
        .map(|(_, interval)| interval)
        .collect();

    Ok(availability::blocked_dates(from, to, &existing))
}
