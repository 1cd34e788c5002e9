// Copyright (c) 2025 - Cowboy AI, Inc.
//! External Provisioning Seam
//!
//! The topology core never talks to a cloud API. It declares resources
//! through the [`Provisioner`] trait, an async primitive the caller injects:
//! hand it a kind, a derived name, fully concrete properties and the
//! identifiers the declaration depends on; receive a [`ResourceHandle`] once
//! the underlying resource exists.
//!
//! # Architecture
//!
//! ```text
//! TopologyPlan → TopologyAssembler → Provisioner::declare → ResourceHandle
//!                                         ↓
//!                                  cloud API (external)
//! ```
//!
//! Requirements on implementations:
//!
//! 1. **Resolution**: a returned handle's identifier refers to a live
//!    resource
//! 2. **Isolation**: `declare` has no topology-level knowledge; everything it
//!    needs is in the request
//! 3. **Lifecycle grouping**: `parent` is an ownership annotation for cascade
//!    deletion only and has no bearing on ordering

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::{IpVersion, ResourceKind, ResourceName};
use crate::spec::{NetworkProperties, PortProperties, RouteProperties, RouterSpec, SubnetProperties};

/// Errors raised by or about the provisioning engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisioningError {
    /// Provider identifier failed validation
    #[error("Invalid provider id: {0}")]
    InvalidProviderId(String),

    /// The engine refused the declaration outright
    #[error("Declaration \"{name}\" rejected by the provisioning engine: {reason}")]
    Rejected { name: String, reason: String },

    /// The engine accepted the declaration but the resource never resolved
    #[error("Declaration \"{name}\" failed to resolve: {reason}")]
    Unresolved { name: String, reason: String },

    /// Engine-side failure not tied to a single declaration
    #[error("Provisioning backend error: {0}")]
    Backend(String),
}

/// Provider-assigned identifier of a provisioned resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Result<Self, ProvisioningError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ProvisioningError::InvalidProviderId(
                "Provider id cannot be empty".into(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProviderId {
    type Err = ProvisioningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Result of a successful declaration
///
/// Read-only once registered; the identifier refers to a live resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHandle {
    /// Provider-assigned identifier
    pub id: ProviderId,
    /// Kind of the underlying resource
    pub kind: ResourceKind,
    /// Derived name the resource was declared under
    pub name: ResourceName,
    /// When the engine confirmed the resource
    pub resolved_at: DateTime<Utc>,
}

impl ResourceHandle {
    /// Create a handle resolved now
    pub fn new(id: ProviderId, kind: ResourceKind, name: ResourceName) -> Self {
        Self {
            id,
            kind,
            name,
            resolved_at: Utc::now(),
        }
    }
}

/// Concrete subnet shape sent to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetResource {
    /// Network the subnet is allocated in
    pub network_id: ProviderId,
    /// Derived from the subnet CIDR
    pub ip_version: IpVersion,
    pub properties: SubnetProperties,
}

/// Concrete port shape sent to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortResource {
    /// Resolved target network of the port
    pub network_id: ProviderId,
    pub properties: PortProperties,
}

/// What a router interface attaches to the router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachedInterface {
    Subnet(ProviderId),
    Port(ProviderId),
}

/// Concrete router-interface shape sent to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceResource {
    pub router_id: ProviderId,
    pub attachment: AttachedInterface,
}

/// Concrete static-route shape sent to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResource {
    pub router_id: ProviderId,
    pub properties: RouteProperties,
}

/// Wire-shape properties of one declaration
///
/// Fully concrete: every computed identifier has been substituted, and the
/// graph-only configuration fields (subnet lists, route lists, logical names)
/// do not exist in this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceProperties {
    Router(RouterSpec),
    Network(NetworkProperties),
    Subnet(SubnetResource),
    Port(PortResource),
    RouterInterface(InterfaceResource),
    RouterRoute(RouteResource),
}

/// One declaration submitted to the provisioning engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclareRequest {
    pub kind: ResourceKind,
    pub name: ResourceName,
    pub properties: ResourceProperties,
    /// Identifiers of already-resolved resources this declaration must
    /// follow
    pub depends_on: Vec<ProviderId>,
    /// Ownership annotation for lifecycle grouping, by resource name
    pub parent: Option<ResourceName>,
}

/// Async declaration primitive exposed by the external provisioning engine
///
/// Implementations should ensure:
///
/// - **Ordering**: the caller guarantees every identifier in `depends_on`
///   refers to a resolved resource; the engine never has to wait
/// - **Diagnostics**: failures name the declaration they belong to
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Declare one resource and wait for its identifier to resolve
    ///
    /// # Errors
    ///
    /// - [`ProvisioningError::Rejected`] if the engine refuses the request
    /// - [`ProvisioningError::Unresolved`] if the resource never materializes
    async fn declare(&self, request: DeclareRequest) -> Result<ResourceHandle, ProvisioningError>;
}
