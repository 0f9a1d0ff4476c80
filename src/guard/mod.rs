//! Guards consuming permission decisions
//!
//! Both guards take a [`PermissionChecker`](crate::access_control::PermissionChecker)
//! by value, so a request-scoped evaluator (or a reference to one) is
//! injected rather than read from ambient state.
//!
//! - [`RouteGuard`]: evaluates navigable routes, with bare-module
//!   requirements checked as routes (`<module>:ver` accepted).
//! - [`ComponentGuard`]: evaluates UI visibility, never as routes.

pub mod component_guard;
pub mod route_guard;
pub mod routes;

pub use component_guard::ComponentGuard;
pub use route_guard::{RouteGuard, RouteOutcome};
pub use routes::{RouteMatch, RouteTable};
