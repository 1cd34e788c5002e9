// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Naming with Derivation Invariants
//!
//! Every provider-facing resource name in a topology is derived from a single
//! [`BaseName`] (the uniqueness scope) plus the resource kind and, for
//! repeated kinds, a [`NameLabel`]. Derivation is pure and total: the same
//! inputs always produce the same string, with no lookups and no side
//! effects.
//!
//! # Naming Patterns
//!
//! - Router: `{base}-router`
//! - Network: `{base}-net`
//! - Subnet: `{base}-subnet-{label}`
//! - Port: `{base}-port-{label}`
//! - Route: `{base}-route-{label}`
//! - Router interface: `{parent}-if`
//!
//! Labels come from the caller's logical name when present, otherwise from
//! the 1-based position within the resource's own kind (subnet numbering and
//! route numbering never collide). Positional labels shift when the input
//! sequence is re-ordered between runs; callers that depend on stable
//! provider names should always supply logical names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Name is empty")]
    Empty,

    #[error("Name exceeds maximum length of 64 characters: {0}")]
    TooLong(usize),

    #[error("Invalid character in name: {0}")]
    InvalidCharacter(char),

    #[error("Name cannot start or end with a separator: {0}")]
    InvalidFormat(String),
}

fn validate_segment(value: &str) -> Result<(), NameError> {
    if value.is_empty() {
        return Err(NameError::Empty);
    }

    if value.len() > BaseName::MAX_LENGTH {
        return Err(NameError::TooLong(value.len()));
    }

    for c in value.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
            return Err(NameError::InvalidCharacter(c));
        }
    }

    if value.starts_with(&['-', '.'][..]) || value.ends_with(&['-', '.'][..]) {
        return Err(NameError::InvalidFormat(value.to_string()));
    }

    Ok(())
}

/// The kind of resource a declaration brings into existence.
///
/// The kind contributes the middle token of derived names and scopes
/// positional numbering: the first anonymous subnet and the first anonymous
/// route both take label `1` without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// The single router owned by the topology
    Router,
    /// The single network owned by the topology
    Network,
    /// A subnet inside the topology network
    Subnet,
    /// An additional router port
    Port,
    /// The child resource joining a subnet or port to the router
    RouterInterface,
    /// A static route on the router
    RouterRoute,
}

impl ResourceKind {
    /// Token used inside derived resource names
    pub fn token(&self) -> &'static str {
        match self {
            ResourceKind::Router => "router",
            ResourceKind::Network => "net",
            ResourceKind::Subnet => "subnet",
            ResourceKind::Port => "port",
            ResourceKind::RouterInterface => "if",
            ResourceKind::RouterRoute => "route",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Router => write!(f, "router"),
            ResourceKind::Network => write!(f, "network"),
            ResourceKind::Subnet => write!(f, "subnet"),
            ResourceKind::Port => write!(f, "port"),
            ResourceKind::RouterInterface => write!(f, "router-interface"),
            ResourceKind::RouterRoute => write!(f, "route"),
        }
    }
}

/// Uniqueness scope for all names derived within one topology
///
/// # Invariants
/// - Non-empty
/// - Length ≤ 64 characters
/// - ASCII alphanumeric plus `-`, `_`, `.`
/// - No leading or trailing separator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseName(String);

impl BaseName {
    /// Maximum length for a base name
    pub const MAX_LENGTH: usize = 64;

    /// Create a new base name with validation
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate_segment(&name)?;
        Ok(Self(name))
    }

    /// Derive the name of a once-per-topology resource: `{base}-{token}`
    pub fn singleton(&self, kind: ResourceKind) -> ResourceName {
        ResourceName(format!("{}-{}", self.0, kind.token()))
    }

    /// Derive the name of a repeated resource: `{base}-{token}-{label}`
    pub fn member(&self, kind: ResourceKind, label: &NameLabel) -> ResourceName {
        ResourceName(format!("{}-{}-{}", self.0, kind.token(), label.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaseName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Label distinguishing sibling resources of one kind
///
/// Either the caller's logical name, validated like a base name, or the
/// 1-based position of an anonymous entry within its own kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameLabel(String);

impl NameLabel {
    /// Create a label from an explicit logical name
    pub fn explicit(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate_segment(&name)?;
        Ok(Self(name))
    }

    /// Create a positional label from a zero-based position
    pub fn positional(position: usize) -> Self {
        Self((position + 1).to_string())
    }

    /// Resolve the effective label for an entry: explicit when supplied,
    /// positional otherwise
    pub fn from_parts(logical_name: Option<&str>, position: usize) -> Result<Self, NameError> {
        match logical_name {
            Some(name) => Self::explicit(name),
            None => Ok(Self::positional(position)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A derived, provider-facing resource name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Derive the name of this resource's router-interface child:
    /// `{name}-if`
    pub fn interface(&self) -> ResourceName {
        ResourceName(format!("{}-{}", self.0, ResourceKind::RouterInterface.token()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
