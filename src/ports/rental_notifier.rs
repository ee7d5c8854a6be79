use crate::domain::value_objects::{EquipmentId, FarmerId, RentalId, RentalStatus};
use async_trait::async_trait;
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// レンタルの状態変化通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentalNotification {
    pub rental_id: RentalId,
    pub equipment_id: EquipmentId,
    pub requester_id: FarmerId,
    pub status: RentalStatus,
}

/// 通知ポート
///
/// 申請者・管理者画面へのリアルタイム配信を抽象化する。
/// 配信の失敗はコマンドの成否に影響させない。
#[async_trait]
pub trait RentalNotifier: Send + Sync {
    async fn notify(&self, notification: RentalNotification) -> Result<()>;
}
