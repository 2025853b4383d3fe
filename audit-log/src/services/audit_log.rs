use axum::http::Method;

use crate::{
    models::{AuditEvent, EventTarget, EventVariant, HttpAction},
    services::{dispatcher::AuditDispatcher, resource::ResourceResolver},
    utils::route::describe_action,
};

/// What the middleware captured about a request before it ran.
#[derive(Debug, Clone)]
pub struct RequestFacts {
    pub method: Method,
    /// Matched route template, e.g. `/bookings/{id}`.
    pub route: String,
    pub path_params: Vec<(String, String)>,
    pub ip_address: String,
}

/// Builds audit events and passes them to the dispatcher.
#[derive(Clone)]
pub struct AuditLogService {
    resolver: ResourceResolver,
    variant: EventVariant,
    dispatcher: AuditDispatcher,
}

impl AuditLogService {
    pub fn new(
        resolver: ResourceResolver,
        variant: EventVariant,
        dispatcher: AuditDispatcher,
    ) -> Self {
        Self {
            resolver,
            variant,
            dispatcher,
        }
    }

    pub fn build_event(&self, profile_id: i64, facts: &RequestFacts) -> AuditEvent {
        let action = HttpAction::from_method(&facts.method);
        let params = facts
            .path_params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()));
        let resolved = self.resolver.resolve(&facts.route, params);

        let target = match self.variant {
            EventVariant::Route => EventTarget::Route {
                route: facts.route.clone(),
            },
            EventVariant::ResourceType => EventTarget::ResourceType {
                resource_type: resolved.resource_type,
            },
        };

        AuditEvent {
            profile_id,
            description: describe_action(action, &facts.route),
            method: action.code(),
            resource_id: resolved.resource_id,
            ip_address: facts.ip_address.clone(),
            target,
        }
    }

    pub fn record_event(&self, event: AuditEvent) {
        self.dispatcher.dispatch(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::method::METHOD_POST,
        services::{publisher::TracingPublisher, resource::RouteTypeMap},
    };
    use std::sync::Arc;

    fn facts(method: Method, route: &str, id: Option<&str>) -> RequestFacts {
        RequestFacts {
            method,
            route: route.to_string(),
            path_params: id
                .map(|value| vec![("id".to_string(), value.to_string())])
                .unwrap_or_default(),
            ip_address: "198.51.100.4".to_string(),
        }
    }

    fn service(variant: EventVariant, route_types: RouteTypeMap) -> AuditLogService {
        AuditLogService::new(
            ResourceResolver::new(route_types),
            variant,
            AuditDispatcher::detached(Arc::new(TracingPublisher)),
        )
    }

    #[test]
    fn build_event_resource_type_variant() {
        let service = service(
            EventVariant::ResourceType,
            RouteTypeMap::from_iter([("/bookings", "reservation")]),
        );
        let event = service.build_event(99, &facts(Method::POST, "/bookings/{id}", Some("7")));

        assert_eq!(event.profile_id, 99);
        assert_eq!(event.description, "User created bookings");
        assert_eq!(event.method, METHOD_POST);
        assert_eq!(event.resource_id, 7);
        assert_eq!(event.ip_address, "198.51.100.4");
        assert_eq!(
            event.target,
            EventTarget::ResourceType {
                resource_type: "reservation".to_string()
            }
        );
    }

    #[test]
    fn build_event_route_variant_keeps_template() {
        let service = service(EventVariant::Route, RouteTypeMap::new());
        let event = service.build_event(0, &facts(Method::DELETE, "/user-bookings/:id", Some("x")));

        assert_eq!(event.description, "User deleted user bookings");
        assert_eq!(event.resource_id, 0);
        assert_eq!(
            event.target,
            EventTarget::Route {
                route: "/user-bookings/:id".to_string()
            }
        );
    }

    #[test]
    fn code_and_action_word_agree() {
        let service = service(EventVariant::Route, RouteTypeMap::new());
        for method in [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
        ] {
            let event = service.build_event(1, &facts(method.clone(), "/items", None));
            let action = HttpAction::from_method(&method);
            assert_eq!(event.method, action.code());
            assert_eq!(
                event.description,
                format!("User {} items", action.action_word())
            );
        }
    }
}
