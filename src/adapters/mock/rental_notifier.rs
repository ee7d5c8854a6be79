use crate::ports::rental_notifier::{
    RentalNotification, RentalNotifier as RentalNotifierTrait, Result,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock implementation of RentalNotifier
///
/// Records every notification instead of delivering it.
pub struct RentalNotifier {
    sent: Mutex<Vec<RentalNotification>>,
}

impl RentalNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Notifications recorded so far, oldest first
    pub fn sent(&self) -> Vec<RentalNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RentalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RentalNotifierTrait for RentalNotifier {
    async fn notify(&self, notification: RentalNotification) -> Result<()> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}
