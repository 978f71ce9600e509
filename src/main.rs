mod auth;
mod clients;
mod config;
mod docs;
mod handlers;
mod models;
mod routes;
mod services;
mod state;

use auth::session::JwtSessionVerifier;
use axum::{http::HeaderValue, Router};
use clients::mega_client::MegaClient;
use config::Config;
use docs::ApiDoc;
use routes::create_api_routes;
use state::AppState;
use std::panic;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "mr_comment_proxy=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let state = match build_state(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Cannot start without a usable configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut app_routes = Router::new()
        .nest("/api", create_api_routes(state))
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()));
    if let Some(cors) = cors_layer(&config) {
        app_routes = app_routes.layer(cors);
    }
    let app_routes = app_routes.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("🚀 Server running on http://{}", config.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", config.server_address());

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}

fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let mega_host = config.require_mega_internal_host()?;
    let secret = config.require_auth_jwt_secret()?;

    let mega_client = MegaClient::new(mega_host, config.backend_timeout())?;
    info!("Forwarding comment deletions to {}", mega_host);

    let verifier = JwtSessionVerifier::new(secret, config.session_cookie_name.as_str());
    Ok(AppState::new(mega_client, verifier))
}

fn cors_layer(config: &Config) -> Option<CorsLayer> {
    let origins = config.cors_origin_list();
    if origins.is_empty() {
        return config.is_development().then(|| {
            warn!("No CORS origins configured, allowing any origin in development");
            CorsLayer::permissive()
        });
    }

    let origins = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect::<Vec<_>>();
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
