use axum::{
    extract::{ConnectInfo, MatchedPath, RawPathParams, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    RequestExt,
};
use std::net::SocketAddr;

use crate::{
    services::{session::resolve_profile_id, RequestFacts},
    state::AuditState,
};

/// Records an audit event for every eligible completed request.
///
/// Install with `Router::route_layer` so the matched route template and its
/// path parameters are available. The inner handler always runs first and
/// its response is returned unchanged; publishing happens off the request
/// path.
pub async fn audit_log(
    State(state): State<AuditState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    if !state.eligibility.admits_method(&method) {
        return next.run(request).await;
    }

    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let path_params = match request.extract_parts::<RawPathParams>().await {
        Ok(params) => params
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        Err(_) => Vec::new(),
    };
    // The handler consumes the request, so the session is resolved from a
    // snapshot. Verbs the filter rules out never reach this point.
    let headers = request.headers().clone();
    let extensions = request.extensions().clone();
    let ip_address = client_ip(&headers, extensions.get(), state.trust_proxy_headers);

    let response = next.run(request).await;

    let status = response.status();
    if !state.eligibility.is_eligible(status, &method) {
        return response;
    }

    let profile_id = resolve_profile_id(state.session.as_ref(), &headers, &extensions);
    let facts = RequestFacts {
        method,
        route,
        path_params,
        ip_address,
    };
    let event = state.service.build_event(profile_id, &facts);
    tracing::debug!(
        status = status.as_u16(),
        route = %facts.route,
        profile_id,
        "Dispatching audit event"
    );
    state.service.record_event(event);

    response
}

fn client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_proxy_headers: bool,
) -> String {
    if trust_proxy_headers {
        if let Some(ip) = extract_forwarded_ip(headers) {
            return ip;
        }
    }
    connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

fn extract_forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|value| value.to_str().ok())
        .map(|value| value.split(',').next().unwrap_or(value).trim().to_string())
        .filter(|value| !value.is_empty())
}
