use axum::{
    extract::Path,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audit_log::{
    config::Config,
    middleware::audit_log as audit_middleware,
    services::{HttpPublisher, Publisher, TracingPublisher},
    state::AuditState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audit_log=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        route_types = config.route_types.len(),
        eligibility_policy = %config.eligibility_policy,
        event_variant = %config.event_variant,
        dispatch_mode = ?config.dispatch_mode,
        trust_proxy_headers = config.trust_proxy_headers,
        jwt_session = config.jwt_secret.is_some(),
        publish_url = ?config.publish_url,
        "Loaded configuration from environment/.env"
    );

    let publisher: Arc<dyn Publisher> = match &config.publish_url {
        Some(url) => {
            let publisher = HttpPublisher::new(url.clone(), config.publish_timeout)?;
            tracing::info!(endpoint = publisher.endpoint(), "Publishing audit events over HTTP");
            Arc::new(publisher)
        }
        None => Arc::new(TracingPublisher),
    };
    let state = AuditState::from_config(&config, publisher);

    let app = Router::new()
        .route("/bookings", post(create_booking))
        .route(
            "/bookings/{id}",
            get(show_booking).put(update_booking).delete(delete_booking),
        )
        .route_layer(axum_middleware::from_fn_with_state(state, audit_middleware))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn create_booking(Json(payload): Json<Value>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "id": 1, "booking": payload })))
}

async fn show_booking(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "id": id }))
}

async fn update_booking(Path(id): Path<String>, Json(payload): Json<Value>) -> Json<Value> {
    Json(json!({ "id": id, "booking": payload }))
}

async fn delete_booking(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "id": id, "deleted": true }))
}
