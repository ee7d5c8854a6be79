use crate::domain::value_objects::FarmerId;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 農家ディレクトリポート
///
/// レンタルコンテキストとユーザー管理コンテキストの境界を維持する。
/// 農家は未承認で登録され、管理者の承認後にレンタルを申請できる。
#[async_trait]
pub trait FarmerDirectory: Send + Sync {
    /// 農家が登録されているか
    async fn exists(&self, farmer_id: FarmerId) -> Result<bool>;

    /// 農家が管理者に承認済みか
    ///
    /// ビジネスルール: 未承認の農家はレンタルを申請できない。
    async fn is_approved(&self, farmer_id: FarmerId) -> Result<bool>;

    /// 農家を未承認の状態で登録する（登録済みなら何もしない）
    async fn register(&self, farmer_id: FarmerId) -> Result<()>;

    /// 農家を承認する
    ///
    /// 未登録の農家であれば`false`を返す。承認済みでも`true`。
    async fn approve(&self, farmer_id: FarmerId) -> Result<bool>;
}
