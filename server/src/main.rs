use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eventyako_server::config::Config;
use eventyako_server::routes::create_routes;
use eventyako_server::state::AppState;
use eventyako_server::store::SnapshotStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("eventyako_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let store = match &config.catalog_path {
        Some(path) => SnapshotStore::load(path).expect("Failed to load catalog snapshot"),
        None => {
            tracing::warn!("CATALOG_PATH not set, serving an empty catalog");
            SnapshotStore::empty()
        }
    };

    let app: Router = create_routes(AppState::new(store), &config);

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
