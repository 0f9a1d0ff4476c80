//! Session snapshot
//!
//! The signed-in user as handed over by the external auth store. Only the
//! fields permission checks need are modelled.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot of the current user's session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Whether anyone is signed in
    pub authenticated: bool,

    /// Super-administrators bypass permission checks
    #[serde(alias = "superadmin", alias = "is_super_admin")]
    pub super_admin: bool,

    /// Raw comma-separated permission string
    #[serde(alias = "permisos")]
    pub permissions: Option<String>,
}

impl Session {
    /// A session with nobody signed in
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in regular user with the given permission string
    pub fn user(permissions: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            super_admin: false,
            permissions: Some(permissions.into()),
        }
    }

    /// A signed-in regular user with no permission data
    pub fn signed_in() -> Self {
        Self {
            authenticated: true,
            ..Self::default()
        }
    }

    /// Apply command-line overrides on top of a loaded session.
    ///
    /// `permissions` replaces the stored string, the flags only ever switch
    /// their field on (super-admin) or the user off (anonymous).
    pub fn with_overrides(
        mut self,
        permissions: Option<String>,
        super_admin: bool,
        anonymous: bool,
    ) -> Self {
        if let Some(permissions) = permissions {
            self.permissions = Some(permissions);
        }
        if super_admin {
            self.super_admin = true;
        }
        if anonymous {
            self.authenticated = false;
        }
        self
    }

    /// Parse a session from JSON
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a session from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SessionError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let session = Session::from_json(
            r#"{"authenticated": true, "super_admin": false, "permissions": "personas:*"}"#,
        )
        .unwrap();
        assert_eq!(session, Session::user("personas:*"));
    }

    #[test]
    fn test_from_json_aliases() {
        let session =
            Session::from_json(r#"{"authenticated": true, "superadmin": true, "permisos": "a:*"}"#)
                .unwrap();
        assert!(session.super_admin);
        assert_eq!(session.permissions.as_deref(), Some("a:*"));
    }

    #[test]
    fn test_missing_fields_default() {
        let session = Session::from_json("{}").unwrap();
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Session::from_json("not json"),
            Err(SessionError::Parse(_))
        ));
    }

    #[test]
    fn test_signed_in_is_regular_user() {
        let session = Session::signed_in();
        assert!(session.authenticated);
        assert!(!session.super_admin);
        assert_eq!(session.permissions, None);
    }

    #[test]
    fn test_no_overrides_keeps_session() {
        let session = Session::user("personas:ver").with_overrides(None, false, false);
        assert_eq!(session, Session::user("personas:ver"));
    }

    #[test]
    fn test_permissions_override_replaces_stored() {
        let session = Session::user("personas:ver").with_overrides(
            Some("reportes:*".into()),
            false,
            false,
        );
        assert_eq!(session.permissions.as_deref(), Some("reportes:*"));
        assert!(session.authenticated);
    }

    #[test]
    fn test_flag_overrides() {
        let session = Session::signed_in().with_overrides(None, true, false);
        assert!(session.super_admin);
        assert!(session.authenticated);

        let session = Session::user("personas:*").with_overrides(None, false, true);
        assert!(!session.authenticated);
        assert_eq!(session.permissions.as_deref(), Some("personas:*"));
    }

    #[test]
    fn test_flags_never_clear_loaded_values() {
        let loaded = Session::from_json(r#"{"authenticated": true, "super_admin": true}"#).unwrap();
        let session = loaded.with_overrides(None, false, false);
        assert!(session.super_admin);
    }

    #[test]
    fn test_load_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"authenticated": true, "permisos": "personas:ver"}"#,
        )
        .unwrap();

        let session = Session::load(&path)
            .unwrap()
            .with_overrides(Some("academica:*".into()), false, false);
        assert_eq!(session, Session::user("academica:*"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Session::load("/nonexistent/session.json").unwrap_err();
        assert!(matches!(err, SessionError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/session.json"));
    }
}
