use crate::domain::{events::DomainEvent, value_objects::RentalId};
use crate::ports::event_store::{EventStore as EventStoreTrait, Result, VersionConflict};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sqlx::{PgPool, Row};

const AGGREGATE_TYPE: &str = "Rental";

/// PostgreSQL implementation of EventStore
///
/// Stores rental events in an append-only log, serialized as JSONB.
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_event(row: &sqlx::postgres::PgRow) -> Result<DomainEvent> {
    let event_data: serde_json::Value = row.try_get("event_data")?;
    Ok(serde_json::from_value(event_data)?)
}

#[async_trait]
impl EventStoreTrait for EventStore {
    /// Append events for one rental atomically
    ///
    /// New versions start right after `expected_version`. The append is refused
    /// with `VersionConflict` when the stored head differs, or when a concurrent
    /// writer inserts the same aggregate_version first and trips the
    /// (aggregate_id, aggregate_version) unique constraint.
    async fn append(
        &self,
        aggregate_id: RentalId,
        expected_version: usize,
        events: Vec<DomainEvent>,
    ) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let conflict = VersionConflict {
            aggregate_id,
            expected: expected_version,
        };
        let expected = i32::try_from(expected_version)?;

        let mut tx = self.pool.begin().await?;

        let current_version: i32 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(aggregate_version), 0)
            FROM events
            WHERE aggregate_id = $1
            "#,
        )
        .bind(aggregate_id.value())
        .fetch_one(&mut *tx)
        .await?;

        if current_version != expected {
            return Err(Box::new(conflict));
        }

        let mut versions = Vec::with_capacity(events.len());
        let mut event_types = Vec::with_capacity(events.len());
        let mut event_data_list = Vec::with_capacity(events.len());
        let mut occurred_at_list = Vec::with_capacity(events.len());

        for (i, event) in events.iter().enumerate() {
            versions.push(expected + (i as i32) + 1);
            event_types.push(event.event_type());
            event_data_list.push(serde_json::to_value(event)?);
            occurred_at_list.push(event.occurred_at());
        }

        let aggregate_types = vec![AGGREGATE_TYPE; events.len()];

        let inserted = sqlx::query(
            r#"
            INSERT INTO events (
                aggregate_id,
                aggregate_version,
                aggregate_type,
                event_type,
                event_data,
                occurred_at
            )
            SELECT $1, * FROM UNNEST($2::int[], $3::varchar[], $4::varchar[], $5::jsonb[], $6::timestamptz[])
            "#,
        )
        .bind(aggregate_id.value())
        .bind(&versions)
        .bind(&aggregate_types)
        .bind(&event_types)
        .bind(&event_data_list)
        .bind(&occurred_at_list)
        .execute(&mut *tx)
        .await;

        if let Err(sqlx::Error::Database(db)) = &inserted {
            if db.is_unique_violation() {
                return Err(Box::new(conflict));
            }
        }
        inserted?;

        tx.commit().await?;
        Ok(())
    }

    /// Load all events for a rental ordered by aggregate_version
    async fn load(&self, aggregate_id: RentalId) -> Result<Vec<DomainEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT event_data
            FROM events
            WHERE aggregate_id = $1
            ORDER BY aggregate_version ASC
            "#,
        )
        .bind(aggregate_id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_event).collect()
    }

    /// Stream every rental event ordered by sequence_number
    ///
    /// Used to rebuild rentals_view from scratch.
    fn stream_all(&self) -> BoxStream<'_, Result<DomainEvent>> {
        sqlx::query(
            r#"
            SELECT event_data
            FROM events
            WHERE aggregate_type = $1
            ORDER BY sequence_number ASC
            "#,
        )
        .bind(AGGREGATE_TYPE)
        .fetch(&self.pool)
        .map(|row_result| decode_event(&row_result?))
        .boxed()
    }
}
