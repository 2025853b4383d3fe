use axum::http::{Method, StatusCode};
use std::fmt;
use std::str::FromStr;

use crate::models::HttpAction;

/// Decides whether a completed request produces an audit event.
pub trait EligibilityFilter: Send + Sync {
    fn is_eligible(&self, status: StatusCode, method: &Method) -> bool;

    /// Whether any status could make a request with this verb eligible.
    ///
    /// Returning false lets the middleware skip capturing request state
    /// for the request entirely.
    fn admits_method(&self, _method: &Method) -> bool {
        true
    }
}

impl<F> EligibilityFilter for F
where
    F: Fn(StatusCode, &Method) -> bool + Send + Sync,
{
    fn is_eligible(&self, status: StatusCode, method: &Method) -> bool {
        self(status, method)
    }
}

/// The two built-in eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EligibilityPolicy {
    /// 200 or 201 from POST, PUT, PATCH or DELETE. Reads are never audited.
    #[default]
    Mutations,
    /// Any status below 300, whatever the verb.
    Successful,
}

impl EligibilityFilter for EligibilityPolicy {
    fn is_eligible(&self, status: StatusCode, method: &Method) -> bool {
        match self {
            EligibilityPolicy::Mutations => {
                matches!(status, StatusCode::OK | StatusCode::CREATED) && is_mutating(method)
            }
            EligibilityPolicy::Successful => status.as_u16() < 300,
        }
    }

    fn admits_method(&self, method: &Method) -> bool {
        match self {
            EligibilityPolicy::Mutations => is_mutating(method),
            EligibilityPolicy::Successful => true,
        }
    }
}

/// POST, PUT, PATCH or DELETE in any letter case.
fn is_mutating(method: &Method) -> bool {
    HttpAction::from_method(method) != HttpAction::Accessed
}

impl FromStr for EligibilityPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mutations" => Ok(EligibilityPolicy::Mutations),
            "successful" => Ok(EligibilityPolicy::Successful),
            other => Err(anyhow::anyhow!("Invalid audit eligibility policy: {}", other)),
        }
    }
}

impl fmt::Display for EligibilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityPolicy::Mutations => f.write_str("mutations"),
            EligibilityPolicy::Successful => f.write_str("successful"),
        }
    }
}
