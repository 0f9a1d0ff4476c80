//! Permission set parsing
//!
//! Turns the comma-separated permission string handed over by the session
//! store into an immutable set of tokens.

use crate::access_control::types::{SEGMENT_SEPARATOR, WILDCARD};
use crate::error::EvaluationAnomaly;
use std::collections::HashSet;
use std::convert::Infallible;
use std::str::FromStr;

/// Token separator in the raw permission string
pub const TOKEN_SEPARATOR: char = ',';

/// Parsed permission tokens
///
/// Parsing never fails. Blank tokens are skipped, malformed tokens are
/// skipped and remembered so callers can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    tokens: HashSet<String>,
    malformed: Vec<String>,
}

impl PermissionSet {
    /// Parse a raw permission string such as `"personas:*, reportes:ventas:ver"`
    pub fn parse(source: &str) -> Self {
        let mut tokens = HashSet::new();
        let mut malformed = Vec::new();

        for raw in source.split(TOKEN_SEPARATOR) {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }

            if is_well_formed(token) {
                tokens.insert(token.to_string());
            } else {
                malformed.push(token.to_string());
            }
        }

        Self { tokens, malformed }
    }

    /// Create an empty set (grants nothing)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check whether a token is present verbatim
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Return the first of `candidates` present in the set
    pub fn find_any<'a, I>(&self, candidates: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .find(|c| self.contains(c))
            .map(str::to_string)
    }

    /// Check if this set grants nothing
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get the number of distinct tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Tokens that were skipped while parsing
    pub fn malformed(&self) -> &[String] {
        &self.malformed
    }

    /// Anomalies found while parsing
    pub fn anomalies(&self) -> impl Iterator<Item = EvaluationAnomaly> + '_ {
        self.malformed
            .iter()
            .map(|token| EvaluationAnomaly::MalformedToken {
                token: token.clone(),
            })
    }
}

impl FromStr for PermissionSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// A token is `segment(:segment)*` with no empty segment and `*` only last
pub fn is_well_formed(token: &str) -> bool {
    let segments: Vec<&str> = token.split(SEGMENT_SEPARATOR).collect();
    let last = segments.len() - 1;

    segments
        .iter()
        .enumerate()
        .all(|(i, segment)| !segment.is_empty() && (i == last || *segment != WILDCARD))
}
