use crate::domain::value_objects::{EquipmentId, FarmerId, RentalId};
use crate::ports::rental_read_model::{
    RentalReadModel as RentalReadModelTrait, RentalStatus, RentalView, Result,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of RentalReadModel
pub struct RentalReadModel {
    rentals: Mutex<HashMap<RentalId, RentalView>>,
}

impl RentalReadModel {
    pub fn new() -> Self {
        Self {
            rentals: Mutex::new(HashMap::new()),
        }
    }

    fn collect_newest_first(&self, filter: impl Fn(&RentalView) -> bool) -> Vec<RentalView> {
        let mut views: Vec<RentalView> = self
            .rentals
            .lock()
            .unwrap()
            .values()
            .filter(|view| filter(view))
            .cloned()
            .collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        views
    }
}

impl Default for RentalReadModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RentalReadModelTrait for RentalReadModel {
    async fn save(&self, view: RentalView) -> Result<()> {
        self.rentals.lock().unwrap().insert(view.rental_id, view);
        Ok(())
    }

    async fn get_by_id(&self, rental_id: RentalId) -> Result<Option<RentalView>> {
        Ok(self.rentals.lock().unwrap().get(&rental_id).cloned())
    }

    async fn find_by_requester(&self, requester_id: FarmerId) -> Result<Vec<RentalView>> {
        Ok(self.collect_newest_first(|view| view.requester_id == requester_id))
    }

    async fn find_active_for_equipment(
        &self,
        equipment_id: EquipmentId,
    ) -> Result<Vec<RentalView>> {
        Ok(self.collect_newest_first(|view| {
            view.equipment_id == equipment_id && view.status.blocks_availability()
        }))
    }

    async fn list(&self, status: Option<RentalStatus>) -> Result<Vec<RentalView>> {
        Ok(self.collect_newest_first(|view| status.is_none_or(|s| view.status == s)))
    }
}
