use crate::domain::{events::DomainEvent, value_objects::RentalId};
use crate::ports::event_store::{EventStore as EventStoreTrait, Result, VersionConflict};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of EventStore
///
/// Keeps a per-aggregate log plus a global log preserving insertion order.
/// The version check and the write happen under the same lock.
pub struct EventStore {
    by_aggregate: Mutex<HashMap<RentalId, Vec<DomainEvent>>>,
    all: Mutex<Vec<DomainEvent>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            by_aggregate: Mutex::new(HashMap::new()),
            all: Mutex::new(Vec::new()),
        }
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStoreTrait for EventStore {
    async fn append(
        &self,
        aggregate_id: RentalId,
        expected_version: usize,
        events: Vec<DomainEvent>,
    ) -> Result<()> {
        let mut by_aggregate = self.by_aggregate.lock().unwrap();
        let stored = by_aggregate.entry(aggregate_id).or_default();

        if stored.len() != expected_version {
            return Err(Box::new(VersionConflict {
                aggregate_id,
                expected: expected_version,
            }));
        }

        self.all.lock().unwrap().extend(events.iter().cloned());
        stored.extend(events);
        Ok(())
    }

    async fn load(&self, aggregate_id: RentalId) -> Result<Vec<DomainEvent>> {
        Ok(self
            .by_aggregate
            .lock()
            .unwrap()
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default())
    }

    fn stream_all(&self) -> BoxStream<'_, Result<DomainEvent>> {
        let events = self.all.lock().unwrap().clone();
        stream::iter(events.into_iter().map(Ok)).boxed()
    }
}
