pub mod equipment_catalog;
pub mod event_store;
pub mod farmer_directory;
pub mod projector;
pub mod rental_read_model;

// パブリックに型を再エクスポート
pub use equipment_catalog::EquipmentCatalog as PostgresEquipmentCatalog;
pub use event_store::EventStore as PostgresEventStore;
pub use farmer_directory::FarmerDirectory as PostgresFarmerDirectory;
pub use projector::{project_rental_events, rebuild_read_model};
pub use rental_read_model::RentalReadModel as PostgresRentalReadModel;
