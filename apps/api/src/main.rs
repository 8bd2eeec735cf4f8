use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{error, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use auth_cell::services::AuthService;
use shared_config::AppConfig;
use shared_database::{AppState, MongoStore, MongoTokenLedger};

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GP Portal API server");

    // Load configuration and connect the store
    let config = AppConfig::from_env();

    let store = match MongoStore::connect(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to MongoDB: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = store.ensure_indexes().await {
        error!("Failed to ensure indexes: {}", e);
    }

    let ledger = Arc::new(MongoTokenLedger::new(&store));

    let state = Arc::new(AppState {
        config,
        store,
        ledger,
    });

    // Make sure a fresh deployment has a reachable admin login
    if let Err(e) = AuthService::new(&state).seed_default_admin().await {
        error!("Failed to seed default admin user: {}", e);
    }

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server; ConnectInfo feeds the per-client rate limiter
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
