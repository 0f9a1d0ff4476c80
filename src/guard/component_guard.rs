//! Component visibility guard

use crate::access_control::PermissionChecker;

/// Decides whether a piece of UI is shown for the current session
pub struct ComponentGuard<C> {
    checker: C,
}

impl<C: PermissionChecker> ComponentGuard<C> {
    pub fn new(checker: C) -> Self {
        Self { checker }
    }

    /// An absent or empty requirement is always visible
    pub fn is_visible(&self, requirement: Option<&str>) -> bool {
        match requirement {
            None | Some("") => true,
            Some(permission) => self.checker.is_allowed(permission, false),
        }
    }

    /// Pick `content` when visible, otherwise `fallback`
    pub fn select<T>(&self, requirement: Option<&str>, content: T, fallback: T) -> T {
        if self.is_visible(requirement) {
            content
        } else {
            fallback
        }
    }

    /// Build the content only when visible
    pub fn render_with<T, F>(&self, requirement: Option<&str>, render: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        self.is_visible(requirement).then(render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::{PermissionEvaluator, UserContext};

    fn guard(permissions: &str) -> ComponentGuard<PermissionEvaluator> {
        ComponentGuard::new(PermissionEvaluator::from_source(
            UserContext::production_user(),
            Some(permissions),
        ))
    }

    #[test]
    fn test_no_requirement_is_visible() {
        let guard = guard("");
        assert!(guard.is_visible(None));
        assert!(guard.is_visible(Some("")));
    }

    #[test]
    fn test_component_checks_are_not_route_checks() {
        // `personas:ver` only satisfies bare `personas` for routes
        let guard = guard("personas:ver");
        assert!(!guard.is_visible(Some("personas")));
        assert!(guard.is_visible(Some("personas:ver")));
    }

    #[test]
    fn test_select_and_render_with() {
        let guard = guard("academica:*");
        assert_eq!(
            guard.select(Some("academica:materias:editar"), "edit", "none"),
            "edit"
        );
        assert_eq!(guard.select(Some("reportes"), "edit", "none"), "none");
        assert_eq!(guard.render_with(Some("reportes"), || 1), None);
        assert_eq!(guard.render_with(Some("academica"), || 1), Some(1));
    }
}
