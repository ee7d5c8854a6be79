mod catalog;
mod errors;
mod rental_service;
mod statistics;

pub use catalog::{approve_farmer, register_equipment, register_farmer, update_equipment};
pub use errors::{RentalApplicationError, Result};
pub use rental_service::{
    RentalQuote, ServiceDependencies, approve_rental, blocked_dates, complete_rental,
    quote_rental, reject_rental, request_rental,
};
pub use statistics::{RentalStatistics, rental_statistics};
