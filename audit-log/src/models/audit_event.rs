use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One audited user action, as handed to the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub profile_id: i64,
    pub description: String,
    pub method: i16,
    pub resource_id: i64,
    pub ip_address: String,
    #[serde(flatten)]
    pub target: EventTarget,
}

/// What the event records about the affected resource besides its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTarget {
    /// The raw route template, e.g. `/bookings/{id}`.
    Route { route: String },
    /// A resource label derived from the route.
    ResourceType { resource_type: String },
}

/// Selects which [`EventTarget`] shape events are built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventVariant {
    Route,
    #[default]
    ResourceType,
}

impl FromStr for EventVariant {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "route" => Ok(EventVariant::Route),
            "resource_type" | "resource-type" => Ok(EventVariant::ResourceType),
            other => Err(anyhow::anyhow!("Invalid audit event variant: {}", other)),
        }
    }
}

impl fmt::Display for EventVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventVariant::Route => f.write_str("route"),
            EventVariant::ResourceType => f.write_str("resource_type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(target: EventTarget) -> AuditEvent {
        AuditEvent {
            profile_id: 99,
            description: "User created bookings".to_string(),
            method: 2,
            resource_id: 7,
            ip_address: "203.0.113.9".to_string(),
            target,
        }
    }

    #[test]
    fn route_variant_serializes_route_field() {
        let value = serde_json::to_value(event(EventTarget::Route {
            route: "/bookings/{id}".to_string(),
        }))
        .unwrap();
        assert_eq!(
            value,
            json!({
                "profile_id": 99,
                "description": "User created bookings",
                "method": 2,
                "resource_id": 7,
                "ip_address": "203.0.113.9",
                "route": "/bookings/{id}",
            })
        );
    }

    #[test]
    fn resource_type_variant_serializes_resource_type_field() {
        let value = serde_json::to_value(event(EventTarget::ResourceType {
            resource_type: "reservation".to_string(),
        }))
        .unwrap();
        assert_eq!(value["resource_type"], "reservation");
        assert!(value.get("route").is_none());
    }

    #[test]
    fn event_variant_parses_known_values() {
        assert_eq!("route".parse::<EventVariant>().unwrap(), EventVariant::Route);
        assert_eq!(
            " Resource_Type ".parse::<EventVariant>().unwrap(),
            EventVariant::ResourceType
        );
        assert!("both".parse::<EventVariant>().is_err());
    }
}
