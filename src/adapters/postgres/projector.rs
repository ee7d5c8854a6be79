use crate::domain::events::DomainEvent;
use crate::domain::rental;
use crate::ports::event_store::EventStore;
use crate::ports::rental_read_model::{RentalReadModel, RentalView};
use futures::stream::StreamExt;
use std::collections::HashMap;

type ProjectionResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ドメインイベントをRead Modelに投影する
///
/// 集約の全イベントから状態を再構築し、rentals_viewに完全な状態で反映する。
/// イベントが真実の情報源であり、Read Modelはそこから導出される。
///
/// # 引数
/// * `read_model` - 更新するRead Model
/// * `events` - 1件のレンタルの全イベント（時系列順）
pub async fn project_rental_events(
    read_model: &dyn RentalReadModel,
    events: &[DomainEvent],
) -> ProjectionResult<()> {
    let Some(rental) = rental::replay_events(events)? else {
        return Ok(());
    };

    read_model.save(RentalView::from(&rental)).await?;
    Ok(())
}

/// イベントストア全体からRead Modelを再構築する
///
/// イベントをレンタルごとにまとめてから投影する。戻り値は投影したレンタル数。
pub async fn rebuild_read_model(
    event_store: &dyn EventStore,
    read_model: &dyn RentalReadModel,
) -> ProjectionResult<usize> {
    let mut by_rental: HashMap<_, Vec<DomainEvent>> = HashMap::new();
    let mut order = Vec::new();

    let mut stream = event_store.stream_all();
    while let Some(event) = stream.next().await {
        let event = event?;
        let rental_id = event.rental_id();
        by_rental
            .entry(rental_id)
            .or_insert_with(|| {
                order.push(rental_id);
                Vec::new()
            })
            .push(event);
    }

    for rental_id in &order {
        project_rental_events(read_model, &by_rental[rental_id]).await?;
    }

    tracing::info!(rentals = order.len(), "Rebuilt rentals read model");
    Ok(order.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock;
    use crate::domain::events::{
        RentalApproved, RentalCompleted, RentalRejected, RentalRequested,
    };
    use crate::domain::value_objects::{
        AdminId, EquipmentId, FarmerId, Quantity, RentalId, RentalStatus,
    };
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn requested(rental_id: RentalId) -> DomainEvent {
        DomainEvent::RentalRequested(RentalRequested {
            rental_id,
            equipment_id: EquipmentId::new(),
            requester_id: FarmerId::new(),
            quantity: Quantity::new(1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
            total_cost: Decimal::new(150, 0),
            requested_at: Utc::now(),
        })
    }

    fn approved(rental_id: RentalId) -> DomainEvent {
        DomainEvent::RentalApproved(RentalApproved {
            rental_id,
            approved_by: AdminId::new(),
            approved_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_project_rental_requested_event() {
        let read_model = mock::RentalReadModel::new();
        let rental_id = RentalId::new();

        project_rental_events(&read_model, &[requested(rental_id)])
            .await
            .unwrap();

        let view = read_model.get_by_id(rental_id).await.unwrap().unwrap();
        assert_eq!(view.status, RentalStatus::Pending);
        assert_eq!(view.quantity, 1);
        assert_eq!(view.total_cost, Decimal::new(150, 0));
    }

    #[tokio::test]
    async fn test_project_approved_then_completed() {
        let read_model = mock::RentalReadModel::new();
        let rental_id = RentalId::new();
        let completed_at = Utc::now();

        let events = vec![
            requested(rental_id),
            approved(rental_id),
            DomainEvent::RentalCompleted(RentalCompleted {
                rental_id,
                completed_by: AdminId::new(),
                completed_at,
            }),
        ];
        project_rental_events(&read_model, &events).await.unwrap();

        let view = read_model.get_by_id(rental_id).await.unwrap().unwrap();
        assert_eq!(view.status, RentalStatus::Completed);
        assert_eq!(view.updated_at, completed_at);
    }

    #[tokio::test]
    async fn test_project_rejected_event() {
        let read_model = mock::RentalReadModel::new();
        let rental_id = RentalId::new();

        let events = vec![
            requested(rental_id),
            DomainEvent::RentalRejected(RentalRejected {
                rental_id,
                rejected_by: AdminId::new(),
                reason: Some("maintenance".to_string()),
                rejected_at: Utc::now(),
            }),
        ];
        project_rental_events(&read_model, &events).await.unwrap();

        let view = read_model.get_by_id(rental_id).await.unwrap().unwrap();
        assert_eq!(view.status, RentalStatus::Rejected);
        assert!(view.to_reservation_interval().is_none());
    }

    #[tokio::test]
    async fn test_project_empty_events() {
        let read_model = mock::RentalReadModel::new();
        assert!(project_rental_events(&read_model, &[]).await.is_ok());
        assert!(read_model.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_project_corrupted_history_fails() {
        let read_model = mock::RentalReadModel::new();
        let rental_id = RentalId::new();

        let result = project_rental_events(&read_model, &[approved(rental_id)]).await;
        assert!(result.is_err());
        assert!(read_model.get_by_id(rental_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rebuild_read_model_from_event_store() {
        let event_store = mock::EventStore::new();
        let read_model = mock::RentalReadModel::new();
        let first = RentalId::new();
        let second = RentalId::new();

        event_store.append(first, 0, vec![requested(first)]).await.unwrap();
        event_store.append(second, 0, vec![requested(second)]).await.unwrap();
        event_store.append(first, 1, vec![approved(first)]).await.unwrap();

        let projected = rebuild_read_model(&event_store, &read_model).await.unwrap();
        assert_eq!(projected, 2);

        let first_view = read_model.get_by_id(first).await.unwrap().unwrap();
        let second_view = read_model.get_by_id(second).await.unwrap().unwrap();
        assert_eq!(first_view.status, RentalStatus::Approved);
        assert_eq!(second_view.status, RentalStatus::Pending);
    }
}
