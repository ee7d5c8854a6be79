//! レンタルの空き判定と料金計算
//!
//! I/Oを一切行わない純粋関数の集まり。既存予約の取得は呼び出し側
//! （アプリケーション層）の責務であり、ここでは渡されたスナップショットのみを見る。
//! 取得から保存までの間に他の申請が割り込む可能性があるため、
//! ここでの受理は暫定的な判断に過ぎない。

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{Equipment, EquipmentId, Quantity, RejectionReason, RentalPeriod, RentalStatus};

/// 予約区間のステータス
///
/// 却下・完了のレンタルは空きを塞がないため、この型では表現できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Approved,
}

impl ReservationStatus {
    /// 空きを塞ぐステータスのみ変換できる
    pub fn from_rental_status(status: RentalStatus) -> Option<Self> {
        match status {
            RentalStatus::Pending => Some(ReservationStatus::Pending),
            RentalStatus::Approved => Some(ReservationStatus::Approved),
            RentalStatus::Rejected | RentalStatus::Completed => None,
        }
    }
}

/// 既存予約の区間（同一機材のもの）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: ReservationStatus,
    pub quantity: u32,
}

impl ReservationInterval {
    fn covers(&self, date: NaiveDate) -> bool {
        ranges_overlap(date, date, self.start, self.end)
    }
}

/// 利用者から受け取ったレンタル申請（未検証）
///
/// 日付は入力途中で欠けていることがあるため`Option`で受け取る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalRequest {
    pub equipment_id: EquipmentId,
    pub quantity: Quantity,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// 検証を通過した申請
///
/// total_costは丸め前の正確な値。通貨単位への丸めは提出時に一度だけ行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub period: RentalPeriod,
    pub duration_days: i64,
    pub total_cost: Decimal,
}

/// 日程の衝突をどう判定するか
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityPolicy {
    /// 重なる予約が1件でもあれば却下する（数量は見ない）
    #[default]
    ExclusiveOverlap,
    /// 日ごとの予約数量の合計が在庫総数を超える場合のみ却下する
    PerDayCapacity,
}

impl std::str::FromStr for AvailabilityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclusive" | "exclusive_overlap" => Ok(AvailabilityPolicy::ExclusiveOverlap),
            "per_day_capacity" => Ok(AvailabilityPolicy::PerDayCapacity),
            _ => Err(format!("Invalid availability policy: {}", s)),
        }
    }
}

/// 両端を含む2つの日付区間が1日でも重なるか
///
/// requested_start <= existing_end かつ requested_end >= existing_start
pub fn ranges_overlap(
    requested_start: NaiveDate,
    requested_end: NaiveDate,
    existing_start: NaiveDate,
    existing_end: NaiveDate,
) -> bool {
    requested_start <= existing_end && requested_end >= existing_start
}

/// 指定日がいずれかの予約区間に含まれるか
///
/// カレンダーで選択不可の日を判定するために使う。
/// 1日だけの区間に対する`ranges_overlap`と常に一致する。
pub fn check_date_blocked(date: NaiveDate, existing: &[ReservationInterval]) -> bool {
    existing.iter().any(|interval| interval.covers(date))
}

/// レンタル日数（開始日・終了日の両方を含む）
///
/// どちらかの日付が欠けている場合は0を返す。
/// 終了日が開始日より前の場合の値は意味を持たないため、呼び出し側で弾くこと。
pub fn compute_duration_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> i64 {
    match (start, end) {
        (Some(start), Some(end)) => (end - start).num_days() + 1,
        _ => 0,
    }
}

/// 保存できる料金の上限（NUMERIC(12,2)の最大値）
pub const MAX_TOTAL_COST: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// 料金 = 日額 × 日数 × 数量
///
/// 十進固定小数点で計算し、途中での丸めは行わない。
/// `Decimal`の表現範囲を超える場合は`None`を返す。
pub fn compute_cost(daily_rate: Decimal, duration_days: i64, quantity: u32) -> Option<Decimal> {
    daily_rate
        .checked_mul(Decimal::from(duration_days))?
        .checked_mul(Decimal::from(quantity))
}

/// 最小通貨単位（小数2桁）に丸める
///
/// 四捨五入（0.5はゼロから遠い方へ）。表示・提出時にのみ適用する。
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// レンタル申請を検証する
///
/// 判定順（最初に失敗したものを返し、以降は評価しない）：
/// 1. 申請数量 <= 在庫総数
/// 2. 開始日・終了日がそろっていて、終了日 >= 開始日
/// 3. 既存予約と衝突しない（判定方法は`policy`による）
/// 4. 丸めた料金が`MAX_TOTAL_COST`以下
pub fn validate_request(
    request: &RentalRequest,
    equipment: &Equipment,
    existing: &[ReservationInterval],
    policy: AvailabilityPolicy,
) -> Result<Accepted, RejectionReason> {
    let quantity = request.quantity.value();

    if quantity > equipment.quantity_available {
        return Err(RejectionReason::InsufficientQuantity);
    }

    let period = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => {
            RentalPeriod::new(start, end).ok_or(RejectionReason::InvalidDateRange)?
        }
        _ => return Err(RejectionReason::InvalidDateRange),
    };

    let conflicts = match policy {
        AvailabilityPolicy::ExclusiveOverlap => existing.iter().any(|interval| {
            ranges_overlap(period.start(), period.end(), interval.start, interval.end)
        }),
        AvailabilityPolicy::PerDayCapacity => {
            exceeds_daily_capacity(&period, quantity, equipment.quantity_available, existing)
        }
    };

    if conflicts {
        return Err(RejectionReason::DateConflict);
    }

    let duration_days = period.duration_days();
    let total_cost = compute_cost(equipment.daily_rate, duration_days, quantity)
        .filter(|cost| round_to_cents(*cost) <= MAX_TOTAL_COST)
        .ok_or(RejectionReason::AmountOutOfRange)?;

    Ok(Accepted {
        period,
        duration_days,
        total_cost,
    })
}

/// 期間内で予約に塞がれている日を列挙する
pub fn blocked_dates(
    from: NaiveDate,
    to: NaiveDate,
    existing: &[ReservationInterval],
) -> Vec<NaiveDate> {
    match RentalPeriod::new(from, to) {
        Some(range) => range
            .days()
            .filter(|day| check_date_blocked(*day, existing))
            .collect(),
        None => Vec::new(),
    }
}

fn exceeds_daily_capacity(
    period: &RentalPeriod,
    requested: u32,
    capacity: u32,
    existing: &[ReservationInterval],
) -> bool {
    let overlapping: Vec<&ReservationInterval> = existing
        .iter()
        .filter(|interval| {
            ranges_overlap(period.start(), period.end(), interval.start, interval.end)
        })
        .collect();

    if overlapping.is_empty() {
        return false;
    }

    period.days().any(|day| {
        let booked: u64 = overlapping
            .iter()
            .filter(|interval| interval.covers(day))
            .map(|interval| u64::from(interval.quantity))
            .sum();
        booked + u64::from(requested) > u64::from(capacity)
    })
}
