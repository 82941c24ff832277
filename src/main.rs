//! Sigo maintenance entry point
//!
//! Connects to storage, runs migrations, backfills missing venue points and
//! reports the upcoming-event count for the configured window.

use tracing::{info, warn};

use sigo::{
    config::Settings,
    database::{connection::create_pool, DatabaseService},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive until exit
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", sigo::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = sigo::database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..Default::default()
    };
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    sigo::database::run_migrations(&db_pool).await?;

    // Initialize database service
    let database_service = DatabaseService::new(db_pool.clone());

    // Initialize services; the geocode cache is optional
    info!("Initializing services...");
    let redis_client = match redis::Client::open(settings.redis.url.clone()) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "Redis unavailable, geocode caching disabled");
            None
        }
    };
    let services = ServiceFactory::new(settings.clone(), database_service, redis_client)?;

    let health = services.health_check(&db_pool).await;
    info!(
        database = health.database,
        geocode_cache = health.geocode_cache,
        "Service health"
    );

    // Backfill points for venues saved while the geocoder was unavailable
    if services.geocoding_service.is_enabled() {
        let updated = services.venue_service.geocode_missing().await?;
        info!(updated = updated, "Venue geocode backfill complete");
    }

    // Report the upcoming window so operators can sanity-check recurrence data
    let upcoming = services.event_service.upcoming_events(None).await?;
    info!(
        count = upcoming.len(),
        window_days = settings.events.default_window_days,
        "Upcoming events in default window"
    );

    Ok(())
}
