use anyhow::{anyhow, Context};
use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::{
    models::EventVariant,
    services::{DispatchMode, EligibilityPolicy, RouteTypeMap},
};

const DEFAULT_QUEUE_CAPACITY: usize = 1024;
const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub route_types: RouteTypeMap,
    pub eligibility_policy: EligibilityPolicy,
    pub event_variant: EventVariant,
    pub dispatch_mode: DispatchMode,
    pub trust_proxy_headers: bool,
    pub jwt_secret: Option<String>,
    pub publish_url: Option<String>,
    pub publish_timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a test map.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let route_types = match non_empty("AUDIT_ROUTE_TYPE_MAP") {
            Some(raw) => parse_route_type_map(&raw)?,
            None => RouteTypeMap::new(),
        };

        let eligibility_policy = match non_empty("AUDIT_ELIGIBILITY_POLICY") {
            Some(raw) => raw.parse::<EligibilityPolicy>()?,
            None => EligibilityPolicy::default(),
        };

        let event_variant = match non_empty("AUDIT_EVENT_VARIANT") {
            Some(raw) => raw.parse::<EventVariant>()?,
            None => EventVariant::default(),
        };

        let capacity = match non_empty("AUDIT_DISPATCH_QUEUE_CAPACITY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid AUDIT_DISPATCH_QUEUE_CAPACITY value: {}", raw))?,
            None => DEFAULT_QUEUE_CAPACITY,
        };
        let workers = non_empty("AUDIT_DISPATCH_WORKERS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_WORKERS);
        let dispatch_mode = if capacity == 0 {
            DispatchMode::Detached
        } else {
            DispatchMode::Bounded { capacity, workers }
        };

        let trust_proxy_headers = non_empty("AUDIT_TRUST_PROXY_HEADERS")
            .map(|raw| parse_bool(&raw))
            .transpose()?
            .unwrap_or(false);

        let publish_timeout_ms = non_empty("AUDIT_PUBLISH_TIMEOUT_MS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(5_000);

        let bind_addr_raw =
            non_empty("AUDIT_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_addr: SocketAddr = bind_addr_raw
            .parse()
            .map_err(|_| anyhow!("Invalid AUDIT_BIND_ADDR value: {}", bind_addr_raw))?;

        Ok(Config {
            route_types,
            eligibility_policy,
            event_variant,
            dispatch_mode,
            trust_proxy_headers,
            jwt_secret: non_empty("AUDIT_JWT_SECRET"),
            publish_url: non_empty("AUDIT_PUBLISH_URL"),
            publish_timeout: Duration::from_millis(publish_timeout_ms),
            bind_addr,
        })
    }
}

/// Accepts `/bookings=reservation,/users=user` or a JSON object.
pub fn parse_route_type_map(raw: &str) -> anyhow::Result<RouteTypeMap> {
    let raw = raw.trim();
    if raw.starts_with('{') {
        let map: HashMap<String, String> =
            serde_json::from_str(raw).context("Invalid AUDIT_ROUTE_TYPE_MAP JSON")?;
        return Ok(map.into_iter().collect());
    }

    let mut route_types = RouteTypeMap::new();
    for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
        let (route, resource_type) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid AUDIT_ROUTE_TYPE_MAP entry: {}", pair))?;
        let (route, resource_type) = (route.trim(), resource_type.trim());
        if route.is_empty() || resource_type.is_empty() {
            return Err(anyhow!("Invalid AUDIT_ROUTE_TYPE_MAP entry: {}", pair));
        }
        route_types.insert(route, resource_type);
    }
    Ok(route_types)
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("Invalid boolean value: {}", other)),
    }
}
