// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Value Objects
//!
//! Validated, immutable building blocks shared by the configuration surface,
//! the dependency graph builder and the provisioning seam.
//!
//! # Value Objects with Invariants
//!
//! - [`BaseName`] - uniqueness scope for every derived resource name
//! - [`NameLabel`] - explicit logical name or 1-based positional label
//! - [`ResourceName`] - derived provider-facing name
//! - [`ResourceKind`] - resource taxonomy (router, network, subnet, ...)
//! - [`CidrBlock`] - IPv4/IPv6 address block with mandatory prefix
//! - [`Mtu`] - Maximum Transmission Unit (68-9000 bytes)

pub mod name;
pub mod network;

pub use name::{BaseName, NameError, NameLabel, ResourceKind, ResourceName};
pub use network::{CidrBlock, IpVersion, Mtu, NetworkError};
