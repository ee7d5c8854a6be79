use crate::domain::{Equipment, EquipmentId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 機材カタログポート
///
/// レンタルコンテキストから見た在庫品目の一覧。
/// 管理者による登録・編集もこのポートを通して行う。
#[async_trait]
pub trait EquipmentCatalog: Send + Sync {
    /// IDで機材を取得する（存在しなければ`None`）
    async fn find_by_id(&self, equipment_id: EquipmentId) -> Result<Option<Equipment>>;

    /// 機材を保存する（同じIDがあれば置き換える）
    async fn save(&self, equipment: Equipment) -> Result<()>;

    /// すべての機材を名前順に返す
    async fn list(&self) -> Result<Vec<Equipment>>;
}
