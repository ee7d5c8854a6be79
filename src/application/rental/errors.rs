use crate::domain::{EquipmentError, RejectionReason, ReplayError, RentalTransitionError};
use thiserror::Error;

/// レンタル管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum RentalApplicationError {
    /// 農家が存在しない
    #[error("Farmer not found")]
    FarmerNotFound,

    /// 農家が管理者に未承認
    #[error("Farmer account is awaiting admin approval")]
    FarmerNotApproved,

    /// 機材が存在しない
    #[error("Equipment not found")]
    EquipmentNotFound,

    /// 機材の定義が不正（名前が空、日額が負など）
    #[error("Invalid equipment: {0}")]
    InvalidEquipment(#[from] EquipmentError),

    /// 空き判定・料金計算で却下された
    #[error("Rental request rejected: {0}")]
    Rejected(#[from] RejectionReason),

    /// 支払い情報が不完全
    #[error("Payment information is incomplete")]
    PaymentInvalid,

    /// レンタルが見つからない
    #[error("Rental not found")]
    RentalNotFound,

    /// レンタルの状態が不正（例: 承認待ちを期待したが却下済みだった）
    #[error("Invalid rental state: {0}")]
    InvalidRentalState(#[from] RentalTransitionError),

    /// 承認時の再確認で、承認済みの予約と衝突した
    ///
    /// 申請時の確認と保存の間に別の申請が割り込んだ場合に発生する。
    #[error("Rental conflicts with an approved reservation")]
    ApprovalConflict,

    /// 読み込み後に別のコマンドが同じレンタルを更新した
    ///
    /// 承認と却下が同時に実行された場合など。最新の状態を読み直して再実行する。
    #[error("Rental was modified concurrently")]
    ConcurrentModification,

    /// イベント履歴が状態機械と矛盾している
    #[error("Corrupted rental history")]
    CorruptedHistory(#[source] ReplayError),

    /// EventStoreのエラー
    #[error("Event store error")]
    EventStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ReadModelのエラー
    #[error("Read model error")]
    ReadModelError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// EquipmentCatalogのエラー
    #[error("Equipment catalog error")]
    EquipmentCatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// FarmerDirectoryのエラー
    #[error("Farmer directory error")]
    FarmerDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, RentalApplicationError>;
