use thiserror::Error;

use super::{RentalId, RentalStatus};

/// レンタル申請の却下理由
///
/// いずれも利用者が入力を直せば解消できるエラーであり、致命的ではない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// 申請数量が在庫総数を超えている
    #[error("Requested quantity exceeds available units")]
    InsufficientQuantity,
    /// 開始日・終了日の欠落、または終了日が開始日より前
    #[error("Start and end dates are required and end must not precede start")]
    InvalidDateRange,
    /// 既存の予約（承認待ち・承認済み）と日程が重なる
    #[error("Requested dates conflict with an existing reservation")]
    DateConflict,
    /// 料金が記録できる上限を超える
    #[error("Total cost exceeds the maximum amount that can be recorded")]
    AmountOutOfRange,
}

/// 状態遷移のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RentalTransitionError {
    /// 承認・却下は承認待ちのレンタルのみ
    #[error("Rental is {0}, expected pending")]
    NotPending(RentalStatus),
    /// 完了は承認済みのレンタルのみ
    #[error("Rental is {0}, expected approved")]
    NotApproved(RentalStatus),
}

/// イベント列からの復元エラー
///
/// 永続化されたイベント履歴が状態機械と矛盾している場合に発生する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("RentalRequested applied to existing rental {0:?}")]
    DuplicateRequest(RentalId),
    #[error("Event for rental {event:?} applied to rental {current:?}")]
    MismatchedRental { current: RentalId, event: RentalId },
    #[error("Invalid transition: {event} on {state}")]
    InvalidTransition { state: String, event: &'static str },
}
