pub mod availability;
pub mod commands;
pub mod equipment;
pub mod errors;
pub mod events;
pub mod payment;
pub mod rental;
pub mod value_objects;

pub use equipment::*;
pub use errors::*;
pub use events::*;
pub use value_objects::*;
