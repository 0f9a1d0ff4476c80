//! permguard command line
//!
//! Evaluates permission queries and guarded routes for a session.

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use permguard::{
    access_control::AccessDecision,
    config::{AppConfig, Environment, LogFormat, load_config},
    guard::{RouteGuard, RouteTable},
    session::Session,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// permguard - Hierarchical wildcard permission checks
#[derive(Parser, Debug)]
#[command(name = "permguard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "PERMGUARD_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the configured level
    #[arg(long, env = "PERMGUARD_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Environment (production, development); overrides the configured environment
    #[arg(long, global = true)]
    environment: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a single permission query
    Check {
        /// Permission query, e.g. `personas` or `academica:materias:editar`
        query: String,

        /// Evaluate as a route (accepts `<module>:ver` for bare modules)
        #[arg(long)]
        route: bool,

        #[command(flatten)]
        session: SessionArgs,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a request path through the configured route table
    Route {
        /// Request path, e.g. `/personas/42`
        path: String,

        #[command(flatten)]
        session: SessionArgs,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct SessionArgs {
    /// Session snapshot (JSON with authenticated, super_admin, permissions)
    #[arg(long, env = "PERMGUARD_SESSION")]
    session: Option<PathBuf>,

    /// Comma-separated permission string; overrides the session's permissions
    #[arg(short, long)]
    permissions: Option<String>,

    /// Treat the user as a super-administrator
    #[arg(long)]
    super_admin: bool,

    /// Treat the request as coming from nobody signed in
    #[arg(long)]
    anonymous: bool,
}

impl SessionArgs {
    fn resolve(&self) -> permguard::Result<Session> {
        let session = match &self.session {
            Some(path) => Session::load(path)
                .inspect_err(|e| error!(error = %e, "Failed to load session"))?,
            None => Session::signed_in(),
        };

        Ok(session.with_overrides(self.permissions.clone(), self.super_admin, self.anonymous))
    }
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn print_decision(query: &str, decision: &AccessDecision, json: bool) -> permguard::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(decision)?);
        return Ok(());
    }

    match decision {
        AccessDecision::Allowed { grant } => println!("allowed: {query} ({grant})"),
        AccessDecision::Denied { reason } => println!("denied: {query} ({reason})"),
    }
    Ok(())
}

fn run(args: Args, config: AppConfig) -> permguard::Result<ExitCode> {
    match args.command {
        Command::Check {
            query,
            route,
            session,
            json,
        } => {
            let session = session.resolve()?;
            let evaluator = config.evaluator_for(&session);
            let decision = evaluator.check(&query, route);
            print_decision(&query, &decision, json)?;
            Ok(ExitCode::from(decision.exit_status()))
        }
        Command::Route {
            path,
            session,
            json,
        } => {
            let session = session.resolve()?;
            let routes = Arc::new(
                RouteTable::new(&config.routes)
                    .inspect_err(|e| error!(error = %e, "Failed to compile route table"))?,
            );
            if routes.is_empty() {
                warn!("No routes configured, every signed-in request renders");
            } else {
                debug!(routes = routes.len(), "Route table compiled");
            }
            let requirement = routes.find_match(&path).map(|m| m.permission.to_string());
            let guard = RouteGuard::new(config.evaluator_for(&session), routes);
            let outcome = guard.evaluate(&path, session.authenticated);

            if json {
                let report = serde_json::json!({
                    "path": path,
                    "requirement": requirement,
                    "result": outcome,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{path}: {outcome:?}");
            }
            Ok(ExitCode::from(outcome.exit_status()))
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // Pick up PERMGUARD_* and APP_ENV from a local .env, if any
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(name) = &args.environment {
        config.environment = Environment::try_parse(name)
            .with_context(|| format!("Unknown environment '{}'", name))?;
    }

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level, config.logging.format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.environment.as_str(),
        "Starting permguard"
    );
    debug!(routes = config.routes.len(), "Configuration loaded");

    Ok(run(args, config)?)
}
