//! Route guard
//!
//! Decides whether a navigable route renders, redirects to login, or is
//! forbidden for the current session.

use crate::access_control::{AccessDecision, PermissionChecker};
use crate::guard::routes::RouteTable;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// What a route should do for the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// Render the protected content
    Render,
    /// Nobody is signed in
    RedirectToLogin,
    /// Signed in, but lacking the route's permission
    Forbidden { permission: String, reason: String },
}

impl RouteOutcome {
    pub fn is_render(&self) -> bool {
        matches!(self, RouteOutcome::Render)
    }

    /// Process exit status: 0 when the route renders, 1 otherwise
    pub fn exit_status(&self) -> u8 {
        if self.is_render() { 0 } else { 1 }
    }
}

/// Route guard over any permission checker
pub struct RouteGuard<C> {
    checker: C,
    routes: Arc<RouteTable>,
}

impl<C: PermissionChecker> RouteGuard<C> {
    pub fn new(checker: C, routes: Arc<RouteTable>) -> Self {
        Self { checker, routes }
    }

    /// Evaluate a request path against the route table
    pub fn evaluate(&self, path: &str, authenticated: bool) -> RouteOutcome {
        let requirement = self.routes.requirement_for(path);
        debug!(path, requirement = ?requirement, "Guarding route");
        self.guard(requirement, authenticated)
    }

    /// Evaluate an explicit requirement, as declared on a single route.
    ///
    /// An absent or empty requirement only needs a signed-in user.
    pub fn guard(&self, requirement: Option<&str>, authenticated: bool) -> RouteOutcome {
        if !authenticated {
            return RouteOutcome::RedirectToLogin;
        }

        let Some(permission) = requirement.filter(|p| !p.is_empty()) else {
            return RouteOutcome::Render;
        };

        match self.checker.check(permission, true) {
            AccessDecision::Allowed { .. } => RouteOutcome::Render,
            AccessDecision::Denied { reason } => {
                info!(permission, %reason, "Route forbidden");
                RouteOutcome::Forbidden {
                    permission: permission.to_string(),
                    reason,
                }
            }
        }
    }
}
