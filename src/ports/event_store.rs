use crate::domain::{events::DomainEvent, value_objects::RentalId};
use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 楽観的排他制御の失敗
///
/// 読み込んだ時点のバージョンと保存時のバージョンが一致しなかった。
/// 他のコマンドが先に同じ集約へイベントを追加している。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rental {aggregate_id:?} was modified after version {expected}")]
pub struct VersionConflict {
    pub aggregate_id: RentalId,
    pub expected: usize,
}

/// イベントストアポート
///
/// ドメインイベントの永続化と取得を抽象化する。
/// イベントは追記専用ログに保存される不変の事実。
#[async_trait]
pub trait EventStore: Send + Sync {
    /// 集約のイベントを追加する
    ///
    /// `expected_version`は読み込んだ時点のイベント数（新規集約は0）。
    /// 保存済みのイベント数と異なる場合は何も書き込まず`VersionConflict`を返す。
    /// イベントの順序は保持される。
    async fn append(
        &self,
        aggregate_id: RentalId,
        expected_version: usize,
        events: Vec<DomainEvent>,
    ) -> Result<()>;

    /// 集約のすべてのイベントを追加順に読み込む
    async fn load(&self, aggregate_id: RentalId) -> Result<Vec<DomainEvent>>;

    /// すべての集約のイベントを挿入順にストリーム配信する
    ///
    /// Read Modelの再構築に使用される。
    fn stream_all(&self) -> BoxStream<'_, Result<DomainEvent>>;
}
