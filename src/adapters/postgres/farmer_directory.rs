use crate::domain::value_objects::FarmerId;
use crate::ports::farmer_directory::{FarmerDirectory as FarmerDirectoryTrait, Result};
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL implementation of FarmerDirectory backed by the farmers table
pub struct FarmerDirectory {
    pool: PgPool,
}

impl FarmerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FarmerDirectoryTrait for FarmerDirectory {
    async fn exists(&self, farmer_id: FarmerId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM farmers WHERE farmer_id = $1)")
                .bind(farmer_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn is_approved(&self, farmer_id: FarmerId) -> Result<bool> {
        let approved: Option<bool> =
            sqlx::query_scalar("SELECT approved FROM farmers WHERE farmer_id = $1")
                .bind(farmer_id.value())
                .fetch_optional(&self.pool)
                .await?;

        Ok(approved.unwrap_or(false))
    }

    async fn register(&self, farmer_id: FarmerId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO farmers (farmer_id)
            VALUES ($1)
            ON CONFLICT (farmer_id) DO NOTHING
            "#,
        )
        .bind(farmer_id.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The first approval time is kept when an approved farmer is approved again
    async fn approve(&self, farmer_id: FarmerId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE farmers
            SET approved = TRUE,
                approved_at = COALESCE(approved_at, NOW())
            WHERE farmer_id = $1
            "#,
        )
        .bind(farmer_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
