//! Route requirement table
//!
//! Maps request paths to the permission they require, using regex patterns
//! from configuration.

use crate::config::RouteRule;
use crate::error::ConfigError;
use regex::Regex;

/// Compiled route requirements, checked in order
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

#[derive(Debug)]
struct CompiledRoute {
    source: String,
    regex: Regex,
    permission: String,
}

/// A matched route requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// Pattern that matched, as written in configuration
    pub pattern: &'a str,
    /// Permission the route requires
    pub permission: &'a str,
}

impl RouteTable {
    /// Compile a table from configured rules
    pub fn new(rules: &[RouteRule]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let regex = Regex::new(&rule.pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: rule.pattern.clone(),
                reason: e.to_string(),
            })?;

            compiled.push(CompiledRoute {
                source: rule.pattern.clone(),
                regex,
                permission: rule.permission.trim().to_string(),
            });
        }

        Ok(Self { routes: compiled })
    }

    /// Find the first route matching `path`
    pub fn find_match(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .find(|r| r.regex.is_match(path))
            .map(|r| RouteMatch {
                pattern: r.source.as_str(),
                permission: r.permission.as_str(),
            })
    }

    /// Permission required by `path`, if any route matches
    pub fn requirement_for(&self, path: &str) -> Option<&str> {
        self.find_match(path).map(|m| m.permission)
    }

    /// Check if this table has any routes
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Get the number of routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }
}
