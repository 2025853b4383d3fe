#![allow(dead_code)]
use async_trait::async_trait;
use audit_log::{
    error::PublishError,
    middleware::audit_log as audit_middleware,
    models::AuditEvent,
    services::{ProfileId, Publisher},
    state::AuditState,
};
use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, time::Duration};
use tokio::sync::mpsc;

pub const PROFILE_HEADER: &str = "x-test-profile";
pub const PEER_IP: &str = "192.0.2.10";

#[derive(Debug, Clone)]
pub struct Published {
    pub routing_key: String,
    pub event: AuditEvent,
    pub priority: u8,
}

/// Forwards every published event to a channel the test can await.
pub struct RecordingPublisher {
    tx: mpsc::UnboundedSender<Published>,
}

impl RecordingPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Published>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(
        &self,
        routing_key: &str,
        event: &AuditEvent,
        priority: u8,
    ) -> Result<(), PublishError> {
        self.tx
            .send(Published {
                routing_key: routing_key.to_string(),
                event: event.clone(),
                priority,
            })
            .map_err(|_| PublishError::Unavailable("receiver dropped".to_string()))
    }
}

pub struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
    async fn publish(&self, _: &str, _: &AuditEvent, _: u8) -> Result<(), PublishError> {
        Err(PublishError::Unavailable("broker down".to_string()))
    }
}

/// Never completes, like a sink that has stopped responding.
pub struct StalledPublisher;

#[async_trait]
impl Publisher for StalledPublisher {
    async fn publish(&self, _: &str, _: &AuditEvent, _: u8) -> Result<(), PublishError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

async fn inject_profile(mut request: Request, next: Next) -> Response {
    let profile = request
        .headers()
        .get(PROFILE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok());
    if let Some(profile) = profile {
        request.extensions_mut().insert(ProfileId(profile));
    }
    next.run(request).await
}

pub fn app(state: AuditState) -> Router {
    Router::new()
        .route(
            "/bookings",
            get(|| async { StatusCode::OK }).post(|| async { StatusCode::CREATED }),
        )
        .route(
            "/bookings/{id}",
            get(|| async { "booking" })
                .post(|| async { (StatusCode::CREATED, "created") })
                .put(|| async { StatusCode::OK })
                .patch(|| async { StatusCode::OK })
                .delete(|| async { StatusCode::OK }),
        )
        .route("/user-bookings/{id}", post(|| async { StatusCode::CREATED }))
        .route("/missing/{id}", post(|| async { StatusCode::NOT_FOUND }))
        .route_layer(middleware::from_fn_with_state(state, audit_middleware))
        .layer(middleware::from_fn(inject_profile))
}

pub fn request(method: Method, uri: &str, profile: Option<i64>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(profile) = profile {
        builder = builder.header(PROFILE_HEADER, profile.to_string());
    }
    let mut request = builder.body(Body::empty()).unwrap();
    let peer: SocketAddr = format!("{}:51000", PEER_IP).parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

pub async fn next_published(rx: &mut mpsc::UnboundedReceiver<Published>) -> Published {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("audit event should be published")
        .expect("publisher channel open")
}

pub async fn assert_nothing_published(rx: &mut mpsc::UnboundedReceiver<Published>) {
    let outcome = tokio::time::timeout(Duration::from_millis(150), rx.recv()).await;
    assert!(outcome.is_err(), "unexpected audit event: {:?}", outcome);
}
