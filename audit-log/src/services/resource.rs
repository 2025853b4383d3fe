use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::route::{base_path, first_segment_label};

const RESOURCE_ID_PARAM: &str = "id";

/// Operator supplied mapping from a base route (`/bookings`) to a resource
/// type label (`reservation`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTypeMap(HashMap<String, String>);

impl RouteTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, base_route: impl Into<String>, resource_type: impl Into<String>) {
        self.0.insert(base_route.into(), resource_type.into());
    }

    pub fn get(&self, base_route: &str) -> Option<&str> {
        self.0.get(base_route).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteTypeMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub resource_type: String,
    pub resource_id: i64,
}

/// Resolves which resource a request acted on from its route.
#[derive(Debug, Clone, Default)]
pub struct ResourceResolver {
    route_types: RouteTypeMap,
}

impl ResourceResolver {
    pub fn new(route_types: RouteTypeMap) -> Self {
        Self { route_types }
    }

    pub fn resolve<'a, I>(&self, route: &str, params: I) -> ResolvedResource
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        ResolvedResource {
            resource_type: self.resource_type(route),
            resource_id: extract_resource_id(params),
        }
    }

    /// Mapped label for the route's base path, else its first segment.
    pub fn resource_type(&self, route: &str) -> String {
        match self.route_types.get(base_path(route)) {
            Some(mapped) => mapped.to_string(),
            None => first_segment_label(route),
        }
    }
}

/// Parses the `id` route parameter. Missing or non-numeric ids resolve to 0.
pub fn extract_resource_id<'a, I>(params: I) -> i64
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let Some((_, raw)) = params
        .into_iter()
        .find(|(name, _)| *name == RESOURCE_ID_PARAM)
    else {
        return 0;
    };
    if raw.is_empty() {
        return 0;
    }

    match raw.parse::<i64>() {
        Ok(id) => id,
        Err(err) => {
            tracing::debug!(resource_id = raw, error = %err, "Failed to parse resource ID");
            0
        }
    }
}
