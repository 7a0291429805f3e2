//! Restaurant scheduling service.
//!
//! Computes weekly staff-to-shift assignments under hard staffing rules
//! while minimising a prioritised set of soft objectives.
//!
//! Run with: cargo run
//! Then POST a request to: http://localhost:5000/api/schedule

use restaurant_scheduling::api;

use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing (logs from restaurant_scheduling at INFO level)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("restaurant_scheduling=info".parse().unwrap()),
        )
        .init();

    // CORS for browser frontends
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router().layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], 5000));
    info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
