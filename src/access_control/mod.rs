//! Access control module
//!
//! Evaluates hierarchical wildcard permissions for the signed-in user.
//!
//! ## Permission Model
//!
//! A user's permissions arrive as one comma-separated string of
//! colon-separated paths. The final segment of a path may be `*`, which
//! grants every action below that prefix:
//!
//! ```text
//! personas:*, academica:materias:ver, reportes:ventas:*
//! ```
//!
//! A query is either a qualified path (`academica:materias:editar`) or a
//! bare module (`personas`). A bare module means "any action in this
//! module" and is checked as `personas:*`; when a route asks for it,
//! `personas:ver` is accepted first.
//!
//! Outside production, and for super-administrators, every query is
//! granted without looking at the permission data.
//!
//! ## Example
//!
//! ```
//! use permguard::access_control::{UserContext, has_permission};
//!
//! let user = UserContext::production_user();
//! let perms = Some("academica:*, personas:ver");
//!
//! assert!(has_permission("academica:materias:editar", false, &user, perms));
//! assert!(has_permission("personas", true, &user, perms));
//! assert!(!has_permission("personas", false, &user, perms));
//! ```

pub mod evaluator;
pub mod permission_set;
pub mod types;

pub use evaluator::{
    AccessDecision, PermissionChecker, PermissionEvaluator, evaluate, has_permission,
};
pub use permission_set::PermissionSet;
pub use types::{BypassReason, Grant, UserContext};
