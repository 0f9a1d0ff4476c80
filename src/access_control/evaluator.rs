//! Permission evaluator
//!
//! Decides whether a permission query is granted, checking in order:
//! 1. Context bypass (non-production environment or super-admin)
//! 2. Presence of permission data
//! 3. Route-view shortcut (`<module>:ver`) for bare-module route queries
//! 4. Exact match of the normalized query (`<module>` becomes `<module>:*`)
//! 5. Wildcard ancestors (`a:*`, `a:b:*`, ...) unless the query is itself a wildcard

use crate::access_control::permission_set::PermissionSet;
use crate::access_control::types::{
    Grant, ROUTE_VIEW_ACTION, SEGMENT_SEPARATOR, UserContext, is_bare_module, is_wildcard_query,
    wildcard_of,
};
use crate::error::{AccessDeniedError, EvaluationAnomaly};
use serde::Serialize;
use tracing::{debug, trace, warn};

/// Result of a permission check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Access is allowed by the given rule
    Allowed { grant: Grant },
    /// Access is denied with a reason
    Denied { reason: String },
}

impl AccessDecision {
    pub fn allowed(grant: Grant) -> Self {
        AccessDecision::Allowed { grant }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        AccessDecision::Denied {
            reason: reason.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied { .. })
    }

    /// Process exit status for this decision: 0 allowed, 1 denied
    pub fn exit_status(&self) -> u8 {
        if self.is_allowed() { 0 } else { 1 }
    }

    /// The rule that granted access, if any
    pub fn grant(&self) -> Option<&Grant> {
        match self {
            AccessDecision::Allowed { grant } => Some(grant),
            AccessDecision::Denied { .. } => None,
        }
    }
}

/// Anything that can answer permission queries for the current user.
///
/// Route and component guards depend on this rather than on a concrete
/// evaluator so they can be driven by any source of decisions.
pub trait PermissionChecker {
    /// Evaluate a query, returning the full decision
    fn check(&self, query: &str, is_route: bool) -> AccessDecision;

    /// Evaluate a query, returning only whether it is granted
    fn is_allowed(&self, query: &str, is_route: bool) -> bool {
        self.check(query, is_route).is_allowed()
    }
}

/// Check a query against a raw permission source.
///
/// This is the whole contract in one call: the source is only parsed when
/// the context does not bypass checks, and every anomaly resolves to `false`.
pub fn has_permission(
    query: &str,
    is_route: bool,
    context: &UserContext,
    permission_source: Option<&str>,
) -> bool {
    evaluate(query, is_route, context, permission_source).is_allowed()
}

/// Like [`has_permission`], but returns the decision with its reason
pub fn evaluate(
    query: &str,
    is_route: bool,
    context: &UserContext,
    permission_source: Option<&str>,
) -> AccessDecision {
    PermissionEvaluator::from_source(*context, permission_source).check(query, is_route)
}

/// Per-request snapshot of a user's context and parsed permissions
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    context: UserContext,
    /// `None` when the session carried no permission data
    permissions: Option<PermissionSet>,
}

impl PermissionEvaluator {
    /// Create an evaluator from an already parsed set
    pub fn new(context: UserContext, permissions: Option<PermissionSet>) -> Self {
        Self {
            context,
            permissions,
        }
    }

    /// Create an evaluator from a raw permission string.
    ///
    /// Bypassing contexts never parse the source.
    pub fn from_source(context: UserContext, permission_source: Option<&str>) -> Self {
        let permissions = match context.bypass() {
            Some(_) => None,
            None => permission_source.map(PermissionSet::parse),
        };
        Self::new(context, permissions)
    }

    /// The context this evaluator was built for
    pub fn context(&self) -> UserContext {
        self.context
    }

    /// The parsed permissions, if any were supplied
    pub fn permissions(&self) -> Option<&PermissionSet> {
        self.permissions.as_ref()
    }

    /// Check a query
    pub fn check(&self, query: &str, is_route: bool) -> AccessDecision {
        debug!(query, is_route, "Checking permission");

        if let Some(reason) = self.context.bypass() {
            trace!(%reason, "Context bypasses permission checks");
            return AccessDecision::allowed(Grant::Bypass(reason));
        }

        let Some(permissions) = &self.permissions else {
            let anomaly = EvaluationAnomaly::MissingPermissionSource;
            warn!(query, %anomaly, "Denying permission");
            return AccessDecision::denied(anomaly.to_string());
        };

        check_set(permissions, query, is_route)
    }

    /// Check a query, returning an error if denied
    pub fn require(&self, query: &str, is_route: bool) -> Result<(), AccessDeniedError> {
        match self.check(query, is_route) {
            AccessDecision::Allowed { .. } => Ok(()),
            AccessDecision::Denied { .. } if self.permissions.is_none() => {
                Err(AccessDeniedError::missing_source(query))
            }
            AccessDecision::Denied { reason } => Err(AccessDeniedError::new(query, reason)),
        }
    }

    /// Create a permissive evaluator that allows everything (for testing)
    pub fn allow_all() -> Self {
        Self::new(UserContext::new(false, false), None)
    }

    /// Create a restrictive evaluator that denies everything
    pub fn deny_all() -> Self {
        Self::new(UserContext::production_user(), Some(PermissionSet::empty()))
    }
}

impl PermissionChecker for PermissionEvaluator {
    fn check(&self, query: &str, is_route: bool) -> AccessDecision {
        PermissionEvaluator::check(self, query, is_route)
    }
}

impl<T: PermissionChecker + ?Sized> PermissionChecker for &T {
    fn check(&self, query: &str, is_route: bool) -> AccessDecision {
        (**self).check(query, is_route)
    }
}

/// Evaluate a query against a set, for contexts without a bypass
fn check_set(permissions: &PermissionSet, query: &str, is_route: bool) -> AccessDecision {
    if query.is_empty() {
        let anomaly = EvaluationAnomaly::EmptyQuery;
        warn!(%anomaly, "Denying permission");
        return AccessDecision::denied(anomaly.to_string());
    }

    for anomaly in permissions.anomalies() {
        warn!(query, %anomaly, "Ignoring permission token");
    }

    let bare = is_bare_module(query);

    // 1. Route-view shortcut
    if is_route && bare {
        let view = format!("{query}{SEGMENT_SEPARATOR}{ROUTE_VIEW_ACTION}");
        if permissions.contains(&view) {
            trace!(token = %view, "Matched route view permission");
            return AccessDecision::allowed(Grant::RouteView(view));
        }
    }

    let normalized = if bare {
        wildcard_of(query)
    } else {
        query.to_string()
    };

    // 2. Exact match
    if permissions.contains(&normalized) {
        trace!(token = %normalized, "Matched exact permission");
        return AccessDecision::allowed(Grant::Exact(normalized));
    }

    // 3. Wildcard ancestors
    if !is_wildcard_query(&normalized) {
        let candidates = wildcard_ancestors(&normalized);
        if let Some(token) = permissions.find_any(candidates.iter().map(String::as_str)) {
            trace!(%token, "Matched wildcard permission");
            return AccessDecision::allowed(Grant::Wildcard(token));
        }
    }

    AccessDecision::denied(format!("no permission or wildcard grants '{normalized}'"))
}

/// Wildcards for every proper prefix of `query`, shortest first.
///
/// `a:b:c` yields `a:*` and `a:b:*`.
pub fn wildcard_ancestors(query: &str) -> Vec<String> {
    let separator = SEGMENT_SEPARATOR.to_string();
    let segments: Vec<&str> = query.split(SEGMENT_SEPARATOR).collect();

    (1..segments.len())
        .map(|len| wildcard_of(&segments[..len].join(separator.as_str())))
        .collect()
}
