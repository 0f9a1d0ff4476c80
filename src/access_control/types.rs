//! Access control types
//!
//! Core types used by the permission evaluator and its callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between segments of a permission path
pub const SEGMENT_SEPARATOR: char = ':';

/// Final segment granting every action below its prefix
pub const WILDCARD: &str = "*";

/// Action checked first when a route asks for a bare module
pub const ROUTE_VIEW_ACTION: &str = "ver";

/// Who is asking, and where
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Super-administrators bypass every check
    pub is_super_admin: bool,
    /// Outside production every check is granted
    pub is_production: bool,
}

impl UserContext {
    pub const fn new(is_super_admin: bool, is_production: bool) -> Self {
        Self {
            is_super_admin,
            is_production,
        }
    }

    /// Regular user in production: the only context where permissions are enforced
    pub const fn production_user() -> Self {
        Self::new(false, true)
    }

    /// Returns the bypass that applies to this context, if any.
    ///
    /// A non-production environment wins over super-admin when both hold.
    pub const fn bypass(&self) -> Option<BypassReason> {
        if !self.is_production {
            Some(BypassReason::NonProduction)
        } else if self.is_super_admin {
            Some(BypassReason::SuperAdmin)
        } else {
            None
        }
    }
}

/// Why a context skips permission checks entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BypassReason {
    NonProduction,
    SuperAdmin,
}

impl BypassReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BypassReason::NonProduction => "non_production",
            BypassReason::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for BypassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The rule that granted access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "token", rename_all = "snake_case")]
pub enum Grant {
    /// Context bypass, permission data was not consulted
    Bypass(BypassReason),
    /// `<module>:ver` matched for a bare-module route query
    RouteView(String),
    /// The (normalized) query was present verbatim
    Exact(String),
    /// A wildcard ancestor of the query was present
    Wildcard(String),
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grant::Bypass(reason) => write!(f, "bypass ({})", reason),
            Grant::RouteView(t) => write!(f, "route view '{}'", t),
            Grant::Exact(t) => write!(f, "exact '{}'", t),
            Grant::Wildcard(t) => write!(f, "wildcard '{}'", t),
        }
    }
}

/// Returns true if `query` names a module without any action
pub fn is_bare_module(query: &str) -> bool {
    !query.contains(SEGMENT_SEPARATOR)
}

/// Joins a prefix and the wildcard segment: `personas` -> `personas:*`
pub fn wildcard_of(prefix: &str) -> String {
    format!("{prefix}{SEGMENT_SEPARATOR}{WILDCARD}")
}

/// Returns true if the query already asks for a wildcard grant
pub fn is_wildcard_query(query: &str) -> bool {
    query
        .strip_suffix(WILDCARD)
        .is_some_and(|rest| rest.ends_with(SEGMENT_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_reasons() {
        assert_eq!(
            UserContext::new(false, false).bypass(),
            Some(BypassReason::NonProduction)
        );
        assert_eq!(
            UserContext::new(true, true).bypass(),
            Some(BypassReason::SuperAdmin)
        );
        assert_eq!(
            UserContext::new(true, false).bypass(),
            Some(BypassReason::NonProduction)
        );
        assert_eq!(UserContext::production_user().bypass(), None);
    }

    #[test]
    fn test_query_helpers() {
        assert!(is_bare_module("personas"));
        assert!(!is_bare_module("personas:ver"));
        assert_eq!(wildcard_of("academica:materias"), "academica:materias:*");
        assert!(is_wildcard_query("personas:*"));
        assert!(!is_wildcard_query("personas*"));
        assert!(!is_wildcard_query("*"));
        assert!(!is_wildcard_query("personas:ver"));
    }

    #[test]
    fn test_grant_serializes_with_rule_tag() {
        let json = serde_json::to_string(&Grant::Exact("personas:*".into())).unwrap();
        assert_eq!(json, r#"{"rule":"exact","token":"personas:*"}"#);
    }
}
