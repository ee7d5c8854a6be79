use crate::ports::rental_notifier::{
    RentalNotification, RentalNotifier as RentalNotifierTrait, Result,
};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Channel-based implementation of RentalNotifier
///
/// Publishes rental status changes to every live subscriber. Subscribers that
/// fall behind by more than `capacity` messages observe `RecvError::Lagged`.
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<RentalNotification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RentalNotification> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl RentalNotifierTrait for BroadcastNotifier {
    async fn notify(&self, notification: RentalNotification) -> Result<()> {
        let rental_id = notification.rental_id;
        // No subscribers is not a failure; the change is already persisted
        match self.sender.send(notification) {
            Ok(receivers) => {
                tracing::debug!(rental_id = %rental_id.value(), receivers, "Published rental notification");
            }
            Err(_) => {
                tracing::debug!(rental_id = %rental_id.value(), "No subscribers for rental notification");
            }
        }
        Ok(())
    }
}
