use crate::domain::value_objects::{EquipmentId, FarmerId, RentalId};
use crate::ports::rental_read_model::{
    RentalReadModel as RentalReadModelTrait, RentalStatus, RentalView, Result,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

const SELECT_COLUMNS: &str = r#"
    SELECT
        rental_id,
        equipment_id,
        requester_id,
        quantity,
        start_date,
        end_date,
        total_cost,
        status,
        created_at,
        updated_at
    FROM rentals_view
"#;

fn invalid_data(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// PostgreSQLの行データをRentalViewに変換する
///
/// quantityのi32からu32への変換とステータス文字列の解析でエラーを返しうる。
fn map_row_to_rental_view(row: &PgRow) -> Result<RentalView> {
    let quantity_i32: i32 = row.try_get("quantity")?;
    let quantity: u32 = quantity_i32
        .try_into()
        .map_err(|_| invalid_data(format!("quantity out of range: {}", quantity_i32)))?;

    let status_str: &str = row.try_get("status")?;
    let status = RentalStatus::from_str(status_str).map_err(invalid_data)?;

    Ok(RentalView {
        rental_id: RentalId::from_uuid(row.try_get("rental_id")?),
        equipment_id: EquipmentId::from_uuid(row.try_get("equipment_id")?),
        requester_id: FarmerId::from_uuid(row.try_get("requester_id")?),
        quantity,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        total_cost: row.try_get("total_cost")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// RentalReadModelのPostgreSQL実装
///
/// CQRSの読み取り側として、rentals_viewテーブルに非正規化ビューを保持する。
pub struct RentalReadModel {
    pool: PgPool,
}

impl RentalReadModel {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalReadModelTrait for RentalReadModel {
    /// INSERT ... ON CONFLICT UPDATE による冪等な保存
    async fn save(&self, view: RentalView) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rentals_view (
                rental_id,
                equipment_id,
                requester_id,
                quantity,
                start_date,
                end_date,
                total_cost,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (rental_id)
            DO UPDATE SET
                equipment_id = EXCLUDED.equipment_id,
                requester_id = EXCLUDED.requester_id,
                quantity = EXCLUDED.quantity,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                total_cost = EXCLUDED.total_cost,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(view.rental_id.value())
        .bind(view.equipment_id.value())
        .bind(view.requester_id.value())
        .bind(i32::try_from(view.quantity)?)
        .bind(view.start_date)
        .bind(view.end_date)
        .bind(view.total_cost)
        .bind(view.status.as_str())
        .bind(view.created_at)
        .bind(view.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, rental_id: RentalId) -> Result<Option<RentalView>> {
        let row = sqlx::query(&format!("{} WHERE rental_id = $1", SELECT_COLUMNS))
            .bind(rental_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_rental_view).transpose()
    }

    async fn find_by_requester(&self, requester_id: FarmerId) -> Result<Vec<RentalView>> {
        let rows = sqlx::query(&format!(
            "{} WHERE requester_id = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(requester_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_rental_view).collect()
    }

    /// 部分インデックス (equipment_id, start_date) WHERE status IN ('pending', 'approved') を使う
    async fn find_active_for_equipment(
        &self,
        equipment_id: EquipmentId,
    ) -> Result<Vec<RentalView>> {
        let rows = sqlx::query(&format!(
            "{} WHERE equipment_id = $1 AND status IN ('pending', 'approved') ORDER BY start_date ASC",
            SELECT_COLUMNS
        ))
        .bind(equipment_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_rental_view).collect()
    }

    async fn list(&self, status: Option<RentalStatus>) -> Result<Vec<RentalView>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "{} WHERE status = $1 ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("{} ORDER BY created_at DESC", SELECT_COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(map_row_to_rental_view).collect()
    }
}
