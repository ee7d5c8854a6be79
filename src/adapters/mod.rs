pub mod broadcast;
pub mod mock;
pub mod postgres;
