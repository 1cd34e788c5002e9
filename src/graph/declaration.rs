// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declarations and the Topology Plan
//!
//! A [`Declaration`] is one planned resource: its derived name, its
//! graph-shape properties (with symbolic references to other declarations in
//! place of not-yet-known provider identifiers), its dependency edges and its
//! lifecycle parent. The [`TopologyPlan`] holds all declarations of one
//! topology in a fixed partial order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{NameLabel, ResourceKind, ResourceName};
use crate::provision::ProviderId;
use crate::spec::{NetworkProperties, PortProperties, RouteProperties, RouterSpec, SubnetProperties};

/// Position of a declaration within its plan
///
/// Identifiers are assigned in emission order, so every dependency edge
/// points at a strictly smaller id: the plan is topologically sorted by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationId(usize);

impl DeclarationId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Target network of a planned port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortNetworkRef {
    /// The topology's own network declaration
    Declared(DeclarationId),
    /// An externally provisioned network, already identified
    External(ProviderId),
}

/// What a planned router interface attaches to the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceAttachment {
    Subnet(DeclarationId),
    Port(DeclarationId),
}

/// Graph-shape properties of one declaration
///
/// Computed identifiers appear as [`DeclarationId`] references; the
/// assembler substitutes resolved provider ids when it materializes the wire
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceRequest {
    Router(RouterSpec),
    Network(NetworkProperties),
    Subnet {
        network: DeclarationId,
        properties: SubnetProperties,
    },
    Port {
        network: PortNetworkRef,
        properties: PortProperties,
    },
    RouterInterface {
        router: DeclarationId,
        attachment: InterfaceAttachment,
    },
    RouterRoute {
        router: DeclarationId,
        properties: RouteProperties,
    },
}

impl ResourceRequest {
    /// Kind of the resource this request declares
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRequest::Router(_) => ResourceKind::Router,
            ResourceRequest::Network(_) => ResourceKind::Network,
            ResourceRequest::Subnet { .. } => ResourceKind::Subnet,
            ResourceRequest::Port { .. } => ResourceKind::Port,
            ResourceRequest::RouterInterface { .. } => ResourceKind::RouterInterface,
            ResourceRequest::RouterRoute { .. } => ResourceKind::RouterRoute,
        }
    }
}

/// One planned resource declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub id: DeclarationId,
    /// Derived provider-facing name
    pub name: ResourceName,
    /// Effective logical label for registry registration (subnets and ports)
    pub logical_name: Option<NameLabel>,
    pub request: ResourceRequest,
    /// Declarations that must resolve before this one is submitted
    pub depends_on: Vec<DeclarationId>,
    /// Lifecycle parent for ownership grouping; no bearing on ordering
    pub parent: Option<DeclarationId>,
}

impl Declaration {
    pub fn kind(&self) -> ResourceKind {
        self.request.kind()
    }
}

/// All declarations of one topology, topologically ordered
///
/// The role indexes (`router`, `network`, `subnets`, `ports`) preserve
/// configuration order so output sequences correspond positionally to the
/// input lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyPlan {
    declarations: Vec<Declaration>,
    router: DeclarationId,
    network: DeclarationId,
    subnets: Vec<DeclarationId>,
    ports: Vec<DeclarationId>,
}

impl TopologyPlan {
    pub(crate) fn new(
        declarations: Vec<Declaration>,
        router: DeclarationId,
        network: DeclarationId,
        subnets: Vec<DeclarationId>,
        ports: Vec<DeclarationId>,
    ) -> Self {
        Self {
            declarations,
            router,
            network,
            subnets,
            ports,
        }
    }

    /// All declarations in emission (topological) order
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Look up a declaration by id
    pub fn get(&self, id: DeclarationId) -> Option<&Declaration> {
        self.declarations.get(id.index())
    }

    /// The router declaration
    pub fn router(&self) -> DeclarationId {
        self.router
    }

    /// The network declaration
    pub fn network(&self) -> DeclarationId {
        self.network
    }

    /// Subnet declarations in configuration order
    pub fn subnets(&self) -> &[DeclarationId] {
        &self.subnets
    }

    /// Port declarations in configuration order
    pub fn ports(&self) -> &[DeclarationId] {
        &self.ports
    }
}
