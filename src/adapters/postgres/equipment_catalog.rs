use crate::domain::{Equipment, EquipmentId};
use crate::ports::equipment_catalog::{EquipmentCatalog as EquipmentCatalogTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

const SELECT_COLUMNS: &str = r#"
    SELECT
        equipment_id,
        name,
        daily_rate,
        quantity_available
    FROM equipment
"#;

/// Convert a row back into a validated Equipment
///
/// quantity_available is stored as BIGINT so every u32 fits.
fn map_row_to_equipment(row: &PgRow) -> Result<Equipment> {
    let quantity_i64: i64 = row.try_get("quantity_available")?;
    let name: String = row.try_get("name")?;

    Ok(Equipment::new(
        EquipmentId::from_uuid(row.try_get("equipment_id")?),
        name,
        row.try_get("daily_rate")?,
        u32::try_from(quantity_i64)?,
    )?)
}

/// PostgreSQL implementation of EquipmentCatalog backed by the equipment table
pub struct EquipmentCatalog {
    pool: PgPool,
}

impl EquipmentCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentCatalogTrait for EquipmentCatalog {
    async fn find_by_id(&self, equipment_id: EquipmentId) -> Result<Option<Equipment>> {
        let row = sqlx::query(&format!("{} WHERE equipment_id = $1", SELECT_COLUMNS))
            .bind(equipment_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_equipment).transpose()
    }

    /// Upsert keyed by equipment_id; created_at is kept on update
    async fn save(&self, equipment: Equipment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO equipment (equipment_id, name, daily_rate, quantity_available)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (equipment_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                daily_rate = EXCLUDED.daily_rate,
                quantity_available = EXCLUDED.quantity_available,
                updated_at = NOW()
            "#,
        )
        .bind(equipment.equipment_id.value())
        .bind(&equipment.name)
        .bind(equipment.daily_rate)
        .bind(i64::from(equipment.quantity_available))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Equipment>> {
        let rows = sqlx::query(&format!("{} ORDER BY name ASC", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_row_to_equipment).collect()
    }
}
