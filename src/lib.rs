//! Hierarchical wildcard permissions
//!
//! Evaluates a user's comma-separated permission string against requested
//! permissions for route and component guards.
//!
//! ## Features
//!
//! - **Wildcard grants** at any depth: `academica:*` covers `academica:materias:editar`
//! - **Route-view shortcut**: routes asking for `personas` accept `personas:ver`
//! - **Context bypass** for super-administrators and non-production environments
//! - **Injected checkers** shared by route and component guards
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Evaluation Order
//!
//! ```text
//! bypass → permission data present → route view → exact → wildcard ancestors → deny
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [[routes]]
//! pattern = "^/personas(/.*)?$"
//! permission = "personas"
//!
//! [[routes]]
//! pattern = "^/reportes/ventas$"
//! permission = "reportes:ventas:ver"
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;

// Re-export main types
pub use access_control::{
    AccessDecision, PermissionChecker, PermissionEvaluator, PermissionSet, UserContext,
    has_permission,
};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use guard::{ComponentGuard, RouteGuard, RouteOutcome, RouteTable};
pub use session::Session;
