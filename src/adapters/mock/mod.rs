pub mod equipment_catalog;
pub mod event_store;
pub mod farmer_directory;
pub mod rental_notifier;
pub mod rental_read_model;

pub use equipment_catalog::EquipmentCatalog;
pub use event_store::EventStore;
pub use farmer_directory::FarmerDirectory;
pub use rental_notifier::RentalNotifier;
pub use rental_read_model::RentalReadModel;
