use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use admin_api::{build_router, AppState};
use admin_infrastructure::BackendClient;
use admin_shared::config::AppConfig;

/// Room for the multipart framing around the uploaded file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Telemetry needs the log section, so configuration comes first
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let _log_guard = admin_shared::telemetry::init_telemetry(&config.log);

    info!(env = %config.app.env, "{} starting...", config.app.name);

    let backend = Arc::new(BackendClient::new(&config.backend)?);
    info!("Backend client ready for {}", config.backend.url);

    let state = AppState::new(&config, backend);

    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.import.max_file_bytes + MULTIPART_OVERHEAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.app.cors_origins));

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
