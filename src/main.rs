use farm_rental_ddd::{
    adapters::broadcast::BroadcastNotifier,
    adapters::postgres::{
        PostgresEquipmentCatalog, PostgresEventStore, PostgresFarmerDirectory,
        PostgresRentalReadModel, rebuild_read_model,
    },
    api::{handlers::AppState, router::create_router},
    application::rental::ServiceDependencies,
    config::AppConfig,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farm_rental_ddd=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        policy = ?config.availability_policy,
        max_connections = config.db_max_connections,
        "Loaded configuration"
    );

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    let event_store = Arc::new(PostgresEventStore::new(pool.clone()));
    let rental_read_model = Arc::new(PostgresRentalReadModel::new(pool.clone()));

    if config.rebuild_read_model {
        rebuild_read_model(event_store.as_ref(), rental_read_model.as_ref())
            .await
            .map_err(|e| e.to_string())?;
    }

    let equipment_catalog = Arc::new(PostgresEquipmentCatalog::new(pool.clone()));
    let farmer_directory = Arc::new(PostgresFarmerDirectory::new(pool.clone()));

    let notifier = BroadcastNotifier::new(config.notification_capacity);
    let mut notifications = notifier.subscribe();
    tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                Ok(notification) => tracing::info!(
                    rental_id = %notification.rental_id.value(),
                    status = %notification.status,
                    "Rental status changed"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification listener lagged behind")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let service_deps = ServiceDependencies {
        event_store,
        rental_read_model,
        equipment_catalog,
        farmer_directory,
        notifier: Arc::new(notifier),
        availability_policy: config.availability_policy,
    };

    let app = create_router(Arc::new(AppState { service_deps }));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
