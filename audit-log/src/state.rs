use std::sync::Arc;

use crate::{
    config::Config,
    models::EventVariant,
    services::{
        AuditDispatcher, AuditLogService, DispatchMode, EligibilityFilter, EligibilityPolicy,
        ExtensionSession, JwtSession, Publisher, ResourceResolver, RouteTypeMap, SessionResolver,
    },
};

/// Shared state of the audit middleware.
#[derive(Clone)]
pub struct AuditState {
    pub service: AuditLogService,
    pub eligibility: Arc<dyn EligibilityFilter>,
    pub session: Arc<dyn SessionResolver>,
    pub trust_proxy_headers: bool,
}

impl AuditState {
    pub fn builder(publisher: Arc<dyn Publisher>) -> AuditStateBuilder {
        AuditStateBuilder::new(publisher)
    }

    /// Wires the state from loaded configuration. Spawns the dispatch
    /// workers, so it must run inside a Tokio runtime.
    pub fn from_config(config: &Config, publisher: Arc<dyn Publisher>) -> Self {
        let mut builder = Self::builder(publisher)
            .route_types(config.route_types.clone())
            .eligibility(config.eligibility_policy)
            .variant(config.event_variant)
            .dispatch_mode(config.dispatch_mode)
            .trust_proxy_headers(config.trust_proxy_headers);
        if let Some(secret) = &config.jwt_secret {
            builder = builder.session(JwtSession::new(secret));
        }
        builder.build()
    }
}

pub struct AuditStateBuilder {
    publisher: Arc<dyn Publisher>,
    route_types: RouteTypeMap,
    eligibility: Arc<dyn EligibilityFilter>,
    session: Arc<dyn SessionResolver>,
    variant: EventVariant,
    dispatch_mode: DispatchMode,
    trust_proxy_headers: bool,
}

impl AuditStateBuilder {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            route_types: RouteTypeMap::new(),
            eligibility: Arc::new(EligibilityPolicy::default()),
            session: Arc::new(ExtensionSession),
            variant: EventVariant::default(),
            dispatch_mode: DispatchMode::default(),
            trust_proxy_headers: false,
        }
    }

    pub fn route_types(mut self, route_types: RouteTypeMap) -> Self {
        self.route_types = route_types;
        self
    }

    pub fn eligibility(mut self, filter: impl EligibilityFilter + 'static) -> Self {
        self.eligibility = Arc::new(filter);
        self
    }

    pub fn session(mut self, resolver: impl SessionResolver + 'static) -> Self {
        self.session = Arc::new(resolver);
        self
    }

    pub fn variant(mut self, variant: EventVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    pub fn trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    pub fn build(self) -> AuditState {
        let dispatcher = AuditDispatcher::new(self.dispatch_mode, self.publisher);
        AuditState {
            service: AuditLogService::new(
                ResourceResolver::new(self.route_types),
                self.variant,
                dispatcher,
            ),
            eligibility: self.eligibility,
            session: self.session,
            trust_proxy_headers: self.trust_proxy_headers,
        }
    }
}
