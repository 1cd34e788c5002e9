// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Registry
//!
//! Maps the logical names of subnets and ports to their provisioned
//! [`ResourceHandle`]s. The registry is populated incrementally while a
//! topology assembles (one write per logical name, enforced by duplicate
//! rejection) and is read-only afterwards.
//!
//! Lookups fail loudly: a missing name is a typed [`RegistryError::NotFound`],
//! never an empty identifier that a provisioning engine would reject far
//! downstream.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::domain::{NameLabel, ResourceKind};
use crate::provision::ResourceHandle;

/// Registry errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A second handle was registered under an already-taken logical name
    #[error("Duplicate {kind} registration for logical name \"{name}\"")]
    DuplicateName { kind: ResourceKind, name: String },

    /// No handle is registered under the requested logical name
    #[error("No {kind} registered under logical name \"{name}\"")]
    NotFound { kind: ResourceKind, name: String },
}

/// Logical name → handle mapping for one topology
///
/// Subnet and port names live in separate namespaces, matching the
/// per-kind scoping of derived resource names.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    subnets: HashMap<String, ResourceHandle>,
    ports: HashMap<String, ResourceHandle>,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subnet handle under its logical name
    pub fn register_subnet(
        &mut self,
        label: &NameLabel,
        handle: ResourceHandle,
    ) -> Result<(), RegistryError> {
        if self.subnets.contains_key(label.as_str()) {
            return Err(RegistryError::DuplicateName {
                kind: ResourceKind::Subnet,
                name: label.to_string(),
            });
        }

        debug!("Registered subnet \"{}\" as {}", label, handle.id);
        self.subnets.insert(label.as_str().to_string(), handle);
        Ok(())
    }

    /// Register a port handle under its logical name
    pub fn register_port(
        &mut self,
        label: &NameLabel,
        handle: ResourceHandle,
    ) -> Result<(), RegistryError> {
        if self.ports.contains_key(label.as_str()) {
            return Err(RegistryError::DuplicateName {
                kind: ResourceKind::Port,
                name: label.to_string(),
            });
        }

        debug!("Registered port \"{}\" as {}", label, handle.id);
        self.ports.insert(label.as_str().to_string(), handle);
        Ok(())
    }

    /// Look up a subnet handle by logical name
    pub fn subnet(&self, name: &str) -> Result<&ResourceHandle, RegistryError> {
        self.subnets
            .get(name)
            .ok_or_else(|| RegistryError::NotFound {
                kind: ResourceKind::Subnet,
                name: name.to_string(),
            })
    }

    /// Look up a port handle by logical name
    pub fn port(&self, name: &str) -> Result<&ResourceHandle, RegistryError> {
        self.ports.get(name).ok_or_else(|| RegistryError::NotFound {
            kind: ResourceKind::Port,
            name: name.to_string(),
        })
    }

    /// Number of registered subnets
    pub fn subnet_count(&self) -> usize {
        self.subnets.len()
    }

    /// Number of registered ports
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }
}
