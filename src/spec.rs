// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Configuration Surface
//!
//! The [`NetworkTopologySpec`] is the single input to a topology build: one
//! router, one network, plus ordered subnet, port and route entries. Property
//! structs carry exactly the caller-supplied fields; identifiers computed
//! during assembly (`network_id`, `router_id`, derived names) never appear
//! here, so nothing has to be stripped before a declaration reaches the
//! provisioning engine.
//!
//! Validation is a pre-flight step: every configuration error is detected
//! before a single resource is declared, and a failed validation has zero
//! side effects.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::IpAddr;
use thiserror::Error;

use crate::domain::{BaseName, CidrBlock, Mtu, NameError, NameLabel, ResourceKind};
use crate::provision::ProviderId;

/// Configuration validation error
///
/// Always raised before any declaration is submitted; a spec that fails
/// validation produces no resources at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A base name, logical name or route description failed name validation
    #[error("Invalid name: {0}")]
    Name(#[from] NameError),

    /// Two entries of the same kind resolved to the same effective label
    #[error("Duplicate {kind} logical name: {name}")]
    DuplicateLogicalName { kind: ResourceKind, name: String },

    /// A port with `self_network` disabled supplied no target network
    #[error("Port \"{name}\" must specify a network id when self_network is false")]
    PortNetworkUnresolvable { name: String },
}

/// Properties of the single router owned by the topology
///
/// The router is the dependency root for every interface and every route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterSpec {
    /// Administrative state of the router
    pub admin_state_up: Option<bool>,
    /// Network id of the external gateway, if any
    pub external_network_id: Option<ProviderId>,
    pub description: Option<String>,
    /// Provider-specific options forwarded verbatim to the engine
    pub value_specs: Option<serde_json::Value>,
}

/// Properties of the single network owned by the topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProperties {
    pub admin_state_up: Option<bool>,
    pub shared: Option<bool>,
    pub port_security_enabled: Option<bool>,
    pub mtu: Option<Mtu>,
    pub description: Option<String>,
    /// Provider-specific options forwarded verbatim to the engine
    pub value_specs: Option<serde_json::Value>,
}

/// Caller-supplied subnet properties
///
/// `network_id` and `name` are computed during assembly and deliberately
/// absent. The IP version is derived from the CIDR block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetProperties {
    pub cidr: CidrBlock,
    pub gateway_ip: Option<IpAddr>,
    pub enable_dhcp: Option<bool>,
    pub dns_nameservers: Vec<IpAddr>,
    pub description: Option<String>,
    /// Provider-specific options forwarded verbatim to the engine
    pub value_specs: Option<serde_json::Value>,
}

impl SubnetProperties {
    pub fn new(cidr: CidrBlock) -> Self {
        Self {
            cidr,
            gateway_ip: None,
            enable_dhcp: None,
            dns_nameservers: Vec::new(),
            description: None,
            value_specs: None,
        }
    }
}

/// One subnet entry in the topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetSpec {
    /// Stable identifier for naming and registry lookup, unique among
    /// subnets. Anonymous subnets are labeled by position, which shifts when
    /// the list is re-ordered between runs; prefer explicit names.
    pub logical_name: Option<String>,
    pub properties: SubnetProperties,
}

impl SubnetSpec {
    /// A subnet with an explicit logical name
    pub fn named(logical_name: impl Into<String>, cidr: CidrBlock) -> Self {
        Self {
            logical_name: Some(logical_name.into()),
            properties: SubnetProperties::new(cidr),
        }
    }

    /// A subnet labeled by its position in the subnet list
    pub fn anonymous(cidr: CidrBlock) -> Self {
        Self {
            logical_name: None,
            properties: SubnetProperties::new(cidr),
        }
    }
}

/// A fixed IP assignment on an additional port
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIp {
    pub subnet_id: Option<ProviderId>,
    pub ip_address: Option<IpAddr>,
}

/// Caller-supplied port properties, excluding the target network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortProperties {
    pub admin_state_up: Option<bool>,
    pub fixed_ips: Vec<FixedIp>,
    pub description: Option<String>,
    /// Provider-specific options forwarded verbatim to the engine
    pub value_specs: Option<serde_json::Value>,
}

/// Resolved target network of an additional port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortTarget {
    /// The network owned by this topology
    TopologyNetwork,
    /// An externally provisioned network
    External(ProviderId),
}

/// One additional router port in the topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Stable identifier for naming and registry lookup, unique among ports
    pub logical_name: Option<String>,
    /// When set, the port lands on the topology's own network and
    /// `network_id` is ignored
    pub self_network: bool,
    /// Target network for the port when `self_network` is false
    pub network_id: Option<ProviderId>,
    pub properties: PortProperties,
}

impl PortSpec {
    /// A port on the topology's own network
    pub fn on_topology_network(logical_name: impl Into<String>) -> Self {
        Self {
            logical_name: Some(logical_name.into()),
            self_network: true,
            network_id: None,
            properties: PortProperties::default(),
        }
    }

    /// A port on an externally provisioned network
    pub fn on_external_network(logical_name: impl Into<String>, network_id: ProviderId) -> Self {
        Self {
            logical_name: Some(logical_name.into()),
            self_network: false,
            network_id: Some(network_id),
            properties: PortProperties::default(),
        }
    }

    /// Resolve the port's target network
    ///
    /// `self_network` wins when both are supplied; a port with neither is a
    /// configuration error raised before anything is declared.
    pub(crate) fn resolved_target(&self, label: &NameLabel) -> Result<PortTarget, ConfigurationError> {
        if self.self_network {
            return Ok(PortTarget::TopologyNetwork);
        }

        self.network_id
            .clone()
            .map(PortTarget::External)
            .ok_or_else(|| ConfigurationError::PortNetworkUnresolvable {
                name: label.to_string(),
            })
    }
}

/// Caller-supplied static route properties
///
/// `router_id` is computed during assembly and deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteProperties {
    pub destination: CidrBlock,
    pub next_hop: IpAddr,
}

/// One static route entry in the topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Label used only for naming, never forwarded to the engine. Anonymous
    /// routes are labeled by position.
    pub description: Option<String>,
    pub properties: RouteProperties,
}

impl RouteSpec {
    /// A route with an explicit naming label
    pub fn described(
        description: impl Into<String>,
        destination: CidrBlock,
        next_hop: IpAddr,
    ) -> Self {
        Self {
            description: Some(description.into()),
            properties: RouteProperties {
                destination,
                next_hop,
            },
        }
    }

    /// A route labeled by its position in the route list
    pub fn anonymous(destination: CidrBlock, next_hop: IpAddr) -> Self {
        Self {
            description: None,
            properties: RouteProperties {
                destination,
                next_hop,
            },
        }
    }
}

/// Root configuration for one network topology
///
/// Consumed exactly once at construction time and immutable thereafter.
/// Built with [`NetworkTopologySpec::new`] plus the `with_*` methods:
///
/// ```rust
/// use network_topology::spec::{NetworkProperties, NetworkTopologySpec, RouterSpec, SubnetSpec};
/// use network_topology::domain::BaseName;
///
/// let spec = NetworkTopologySpec::new(
///     BaseName::new("prod").unwrap(),
///     RouterSpec::default(),
///     NetworkProperties::default(),
/// )
/// .with_subnet(SubnetSpec::named("web", "10.0.0.0/24".parse().unwrap()));
///
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTopologySpec {
    base_name: BaseName,
    router: RouterSpec,
    network: NetworkProperties,
    subnets: Vec<SubnetSpec>,
    additional_ports: Vec<PortSpec>,
    routes: Vec<RouteSpec>,
}

impl NetworkTopologySpec {
    /// Create a topology spec with no subnets, ports or routes
    pub fn new(base_name: BaseName, router: RouterSpec, network: NetworkProperties) -> Self {
        Self {
            base_name,
            router,
            network,
            subnets: Vec::new(),
            additional_ports: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Append a subnet, preserving configuration order
    pub fn with_subnet(mut self, subnet: SubnetSpec) -> Self {
        self.subnets.push(subnet);
        self
    }

    /// Append an additional router port, preserving configuration order
    pub fn with_port(mut self, port: PortSpec) -> Self {
        self.additional_ports.push(port);
        self
    }

    /// Append a static route, preserving configuration order
    pub fn with_route(mut self, route: RouteSpec) -> Self {
        self.routes.push(route);
        self
    }

    pub fn base_name(&self) -> &BaseName {
        &self.base_name
    }

    pub fn router(&self) -> &RouterSpec {
        &self.router
    }

    pub fn network(&self) -> &NetworkProperties {
        &self.network
    }

    pub fn subnets(&self) -> &[SubnetSpec] {
        &self.subnets
    }

    pub fn additional_ports(&self) -> &[PortSpec] {
        &self.additional_ports
    }

    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }

    /// Effective labels for all subnets, rejecting duplicates
    pub(crate) fn subnet_labels(&self) -> Result<Vec<NameLabel>, ConfigurationError> {
        effective_labels(
            ResourceKind::Subnet,
            self.subnets.iter().map(|s| s.logical_name.as_deref()),
        )
    }

    /// Effective labels for all additional ports, rejecting duplicates
    pub(crate) fn port_labels(&self) -> Result<Vec<NameLabel>, ConfigurationError> {
        effective_labels(
            ResourceKind::Port,
            self.additional_ports
                .iter()
                .map(|p| p.logical_name.as_deref()),
        )
    }

    /// Effective labels for all routes, rejecting duplicates
    pub(crate) fn route_labels(&self) -> Result<Vec<NameLabel>, ConfigurationError> {
        effective_labels(
            ResourceKind::RouterRoute,
            self.routes.iter().map(|r| r.description.as_deref()),
        )
    }

    /// Validate the complete configuration
    ///
    /// Checks label uniqueness per resource kind and the resolvability of
    /// every port's target network. Runs before any declaration is emitted.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.subnet_labels()?;

        let port_labels = self.port_labels()?;
        for (port, label) in self.additional_ports.iter().zip(&port_labels) {
            port.resolved_target(label)?;
        }

        self.route_labels()?;

        Ok(())
    }
}

/// Resolve effective labels for one resource kind, rejecting any collision
///
/// Explicit labels collide with equal explicit labels, but also with
/// positional ones: an anonymous second entry takes label `2`, so an explicit
/// `"2"` next to it is rejected like any other duplicate.
fn effective_labels<'a>(
    kind: ResourceKind,
    logical_names: impl Iterator<Item = Option<&'a str>>,
) -> Result<Vec<NameLabel>, ConfigurationError> {
    let mut seen = HashSet::new();
    let mut labels = Vec::new();

    for (position, logical_name) in logical_names.enumerate() {
        let label = NameLabel::from_parts(logical_name, position)?;

        if !seen.insert(label.as_str().to_string()) {
            return Err(ConfigurationError::DuplicateLogicalName {
                kind,
                name: label.to_string(),
            });
        }

        labels.push(label);
    }

    Ok(labels)
}
