pub mod audit_log;
pub mod dispatcher;
pub mod eligibility;
pub mod publisher;
pub mod resource;
pub mod session;

pub use audit_log::{AuditLogService, RequestFacts};
pub use dispatcher::{AuditDispatcher, DispatchMode};
pub use eligibility::{EligibilityFilter, EligibilityPolicy};
pub use publisher::{HttpPublisher, Publisher, TracingPublisher, LOG_PRIORITY, LOG_ROUTING_KEY};
pub use resource::{ResourceResolver, RouteTypeMap};
pub use session::{ExtensionSession, JwtSession, ProfileId, SessionResolver};
