use crate::domain::{Equipment, EquipmentId};
use crate::ports::equipment_catalog::{EquipmentCatalog as EquipmentCatalogTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of EquipmentCatalog
pub struct EquipmentCatalog {
    equipment: Mutex<HashMap<EquipmentId, Equipment>>,
}

impl EquipmentCatalog {
    pub fn new() -> Self {
        Self {
            equipment: Mutex::new(HashMap::new()),
        }
    }

    /// Register or replace an equipment item without going through the port
    pub fn add_equipment(&self, equipment: Equipment) {
        self.equipment
            .lock()
            .unwrap()
            .insert(equipment.equipment_id, equipment);
    }
}

impl Default for EquipmentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EquipmentCatalogTrait for EquipmentCatalog {
    async fn find_by_id(&self, equipment_id: EquipmentId) -> Result<Option<Equipment>> {
        Ok(self.equipment.lock().unwrap().get(&equipment_id).cloned())
    }

    async fn save(&self, equipment: Equipment) -> Result<()> {
        self.add_equipment(equipment);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Equipment>> {
        let mut items: Vec<Equipment> = self.equipment.lock().unwrap().values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}
