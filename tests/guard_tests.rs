//! Route and component guard tests

use std::sync::Arc;

use permguard::access_control::{AccessDecision, Grant, PermissionChecker};
use permguard::config::{AppConfig, Environment, load_config_from_str};
use permguard::guard::{ComponentGuard, RouteGuard, RouteOutcome, RouteTable};
use permguard::session::Session;
use rstest::rstest;

const ROUTES: &str = r#"
environment = "production"

[[routes]]
pattern = "^/personas(/.*)?$"
permission = "personas"

[[routes]]
pattern = "^/academica/materias/\\d+/editar$"
permission = "academica:materias:editar"

[[routes]]
pattern = "^/reportes/ventas$"
permission = "reportes:ventas:ver"
"#;

fn setup() -> (AppConfig, Arc<RouteTable>) {
    let config = load_config_from_str(ROUTES).unwrap();
    let routes = Arc::new(RouteTable::new(&config.routes).unwrap());
    (config, routes)
}

/// Checker that denies everything
struct DenyEverything;

impl PermissionChecker for DenyEverything {
    fn check(&self, _query: &str, _is_route: bool) -> AccessDecision {
        AccessDecision::denied("denied by test checker")
    }
}

/// Checker that only grants route checks
struct RoutesOnly;

impl PermissionChecker for RoutesOnly {
    fn check(&self, query: &str, is_route: bool) -> AccessDecision {
        if is_route {
            AccessDecision::allowed(Grant::Exact(query.to_string()))
        } else {
            AccessDecision::denied("component checks disabled")
        }
    }
}

#[rstest]
#[case("/personas", "personas:ver", true)]
#[case("/personas/12", "personas:*", true)]
#[case("/personas", "reportes:*", false)]
#[case("/academica/materias/3/editar", "academica:*", true)]
#[case("/academica/materias/3/editar", "academica:materias:ver", false)]
#[case("/reportes/ventas", "reportes:ventas:ver", true)]
#[case("/reportes/ventas", "reportes:compras:*", false)]
#[case("/inicio", "", true)]
fn test_route_guard_with_session(
    #[case] path: &str,
    #[case] permissions: &str,
    #[case] renders: bool,
) {
    let (config, routes) = setup();
    let session = Session::user(permissions);
    let guard = RouteGuard::new(config.evaluator_for(&session), routes);

    assert_eq!(guard.evaluate(path, session.authenticated).is_render(), renders);
}

#[test]
fn test_anonymous_session_redirects() {
    let (config, routes) = setup();
    let session = Session::anonymous();
    let guard = RouteGuard::new(config.evaluator_for(&session), routes);

    assert_eq!(
        guard.evaluate("/inicio", session.authenticated),
        RouteOutcome::RedirectToLogin
    );
}

#[test]
fn test_super_admin_renders_everything() {
    let (config, routes) = setup();
    let session = Session {
        authenticated: true,
        super_admin: true,
        permissions: None,
    };
    let guard = RouteGuard::new(config.evaluator_for(&session), routes);

    for path in ["/personas", "/academica/materias/1/editar", "/reportes/ventas"] {
        assert!(guard.evaluate(path, true).is_render());
    }
}

#[test]
fn test_development_renders_everything() {
    let (mut config, routes) = setup();
    config.environment = Environment::Development;
    let session = Session::user("");
    let guard = RouteGuard::new(config.evaluator_for(&session), routes);

    assert!(guard.evaluate("/reportes/ventas", true).is_render());
}

#[test]
fn test_forbidden_outcome_names_permission() {
    let (_, routes) = setup();
    let guard = RouteGuard::new(DenyEverything, routes);

    assert_eq!(
        guard.evaluate("/reportes/ventas", true),
        RouteOutcome::Forbidden {
            permission: "reportes:ventas:ver".to_string(),
            reason: "denied by test checker".to_string(),
        }
    );
}

#[test]
fn test_guards_share_one_evaluator() {
    let (config, routes) = setup();
    let evaluator = config.evaluator_for(&Session::user("personas:ver"));

    let route_guard = RouteGuard::new(&evaluator, routes);
    let component_guard = ComponentGuard::new(&evaluator);

    assert!(route_guard.evaluate("/personas", true).is_render());
    assert!(!component_guard.is_visible(Some("personas")));
    assert!(component_guard.is_visible(Some("personas:ver")));
}

#[test]
fn test_guards_pass_route_flag() {
    let (_, routes) = setup();

    assert!(RouteGuard::new(RoutesOnly, routes).evaluate("/personas", true).is_render());
    assert!(!ComponentGuard::new(RoutesOnly).is_visible(Some("personas")));
}

#[test]
fn test_route_outcome_serialization() {
    let json = serde_json::to_value(RouteOutcome::Forbidden {
        permission: "personas".into(),
        reason: "nope".into(),
    })
    .unwrap();

    assert_eq!(json["outcome"], "forbidden");
    assert_eq!(json["permission"], "personas");
    assert_eq!(
        serde_json::to_value(RouteOutcome::RedirectToLogin).unwrap()["outcome"],
        "redirect_to_login"
    );
}
