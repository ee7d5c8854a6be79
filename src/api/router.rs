use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, approve_farmer, approve_rental, blocked_dates, complete_rental, create_rental,
    get_equipment_by_id, get_rental_by_id, list_equipment, list_rentals, quote_rental,
    register_equipment, register_farmer, reject_rental, rental_stats, update_equipment,
};

/// Creates the API router with all rental endpoints
///
/// Commands:
/// - POST /rentals/quote
/// - POST /rentals
/// - POST /rentals/:id/approve, /reject, /complete
/// - POST /equipment, PUT /equipment/:id
/// - POST /farmers, POST /farmers/:id/approve
///
/// Queries:
/// - GET /rentals, /rentals/stats, /rentals/:id
/// - GET /equipment, /equipment/:id, /equipment/:id/blocked-dates
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/rentals", post(create_rental).get(list_rentals))
        .route("/rentals/quote", post(quote_rental))
        .route("/rentals/stats", get(rental_stats))
        .route("/rentals/:id", get(get_rental_by_id))
        .route("/rentals/:id/approve", post(approve_rental))
        .route("/rentals/:id/reject", post(reject_rental))
        .route("/rentals/:id/complete", post(complete_rental))
        .route("/equipment", post(register_equipment).get(list_equipment))
        .route("/equipment/:id", get(get_equipment_by_id).put(update_equipment))
        .route("/equipment/:id/blocked-dates", get(blocked_dates))
        .route("/farmers", post(register_farmer))
        .route("/farmers/:id/approve", post(approve_farmer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
