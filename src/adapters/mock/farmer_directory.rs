use crate::domain::value_objects::FarmerId;
use crate::ports::farmer_directory::{FarmerDirectory as FarmerDirectoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// Mock implementation of FarmerDirectory
///
/// Farmers are registered unapproved, mirroring the sign-up flow where an
/// admin has to approve the account before it can rent equipment.
pub struct FarmerDirectory {
    registered: Mutex<HashSet<FarmerId>>,
    approved: Mutex<HashSet<FarmerId>>,
}

impl FarmerDirectory {
    pub fn new() -> Self {
        Self {
            registered: Mutex::new(HashSet::new()),
            approved: Mutex::new(HashSet::new()),
        }
    }

    /// Register a farmer awaiting approval
    pub fn add_farmer(&self, farmer_id: FarmerId) {
        self.registered.lock().unwrap().insert(farmer_id);
    }

    /// Register a farmer and approve the account in one step
    pub fn add_approved_farmer(&self, farmer_id: FarmerId) {
        self.add_farmer(farmer_id);
        self.approved.lock().unwrap().insert(farmer_id);
    }
}

impl Default for FarmerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FarmerDirectoryTrait for FarmerDirectory {
    async fn exists(&self, farmer_id: FarmerId) -> Result<bool> {
        Ok(self.registered.lock().unwrap().contains(&farmer_id))
    }

    async fn is_approved(&self, farmer_id: FarmerId) -> Result<bool> {
        Ok(self.approved.lock().unwrap().contains(&farmer_id))
    }

    async fn register(&self, farmer_id: FarmerId) -> Result<()> {
        self.add_farmer(farmer_id);
        Ok(())
    }

    async fn approve(&self, farmer_id: FarmerId) -> Result<bool> {
        if !self.registered.lock().unwrap().contains(&farmer_id) {
            return Ok(false);
        }
        self.approved.lock().unwrap().insert(farmer_id);
        Ok(true)
    }
}
