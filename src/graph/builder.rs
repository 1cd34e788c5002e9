// Copyright (c) 2025 - Cowboy AI, Inc.
//! Dependency Graph Builder
//!
//! Turns a validated [`NetworkTopologySpec`] into a [`TopologyPlan`]: an
//! ordered list of declarations annotated with explicit must-follow edges
//! and lifecycle parents.
//!
//! # Emission Order
//!
//! 1. Router (no dependencies)
//! 2. Network (no dependencies - routers and networks are independent in the
//!    underlying model; interfaces join them later)
//! 3. Per subnet, in configuration order: the subnet (after the network),
//!    then its router interface (after router and subnet)
//! 4. Per port, in configuration order: the port (after its resolved target
//!    network, if that network is the topology's own), then its router
//!    interface (after router and port)
//! 5. Per route, in configuration order: the route, after the router and
//!    every interface declared in steps 3-4
//!
//! Routes wait on the interfaces rather than the bare subnets and ports: a
//! static route references a next-hop that is only reachable once an
//! interface is attached. The builder guarantees ordering, not semantic
//! reachability - a route pointing at an unreachable next-hop fails in the
//! engine, not here.

use tracing::debug;

use crate::domain::{NameLabel, ResourceKind, ResourceName};
use crate::spec::{ConfigurationError, NetworkTopologySpec, PortTarget};

use super::declaration::{
    Declaration, DeclarationId, InterfaceAttachment, PortNetworkRef, ResourceRequest, TopologyPlan,
};

fn push_declaration(
    declarations: &mut Vec<Declaration>,
    name: ResourceName,
    logical_name: Option<NameLabel>,
    request: ResourceRequest,
    depends_on: Vec<DeclarationId>,
    parent: Option<DeclarationId>,
) -> DeclarationId {
    let id = DeclarationId::new(declarations.len());
    debug!("Planned {} declaration \"{}\"", request.kind(), &name);
    declarations.push(Declaration {
        id,
        name,
        logical_name,
        request,
        depends_on,
        parent,
    });
    id
}

/// Build the topology plan for a configuration
///
/// Validation runs first: any [`ConfigurationError`] is returned before a
/// single declaration exists, with zero side effects.
pub fn build(spec: &NetworkTopologySpec) -> Result<TopologyPlan, ConfigurationError> {
    spec.validate()?;

    let base = spec.base_name();
    let mut declarations: Vec<Declaration> = Vec::new();

    let router = push_declaration(
        &mut declarations,
        base.singleton(ResourceKind::Router),
        None,
        ResourceRequest::Router(spec.router().clone()),
        vec![],
        None,
    );

    let network = push_declaration(
        &mut declarations,
        base.singleton(ResourceKind::Network),
        None,
        ResourceRequest::Network(spec.network().clone()),
        vec![],
        None,
    );

    let mut subnets = Vec::with_capacity(spec.subnets().len());
    let mut interfaces = Vec::new();

    for (subnet, label) in spec.subnets().iter().zip(spec.subnet_labels()?) {
        let name = base.member(ResourceKind::Subnet, &label);
        let subnet_id = push_declaration(
            &mut declarations,
            name.clone(),
            Some(label),
            ResourceRequest::Subnet {
                network,
                properties: subnet.properties.clone(),
            },
            vec![network],
            Some(network),
        );
        subnets.push(subnet_id);

        let interface_id = push_declaration(
            &mut declarations,
            name.interface(),
            None,
            ResourceRequest::RouterInterface {
                router,
                attachment: InterfaceAttachment::Subnet(subnet_id),
            },
            vec![router, subnet_id],
            Some(subnet_id),
        );
        interfaces.push(interface_id);
    }

    let mut ports = Vec::with_capacity(spec.additional_ports().len());

    for (port, label) in spec.additional_ports().iter().zip(spec.port_labels()?) {
        let (network_ref, port_deps) = match port.resolved_target(&label)? {
            PortTarget::TopologyNetwork => (PortNetworkRef::Declared(network), vec![network]),
            PortTarget::External(id) => (PortNetworkRef::External(id), vec![]),
        };

        let name = base.member(ResourceKind::Port, &label);
        let port_id = push_declaration(
            &mut declarations,
            name.clone(),
            Some(label),
            ResourceRequest::Port {
                network: network_ref,
                properties: port.properties.clone(),
            },
            port_deps,
            Some(network),
        );
        ports.push(port_id);

        let interface_id = push_declaration(
            &mut declarations,
            name.interface(),
            None,
            ResourceRequest::RouterInterface {
                router,
                attachment: InterfaceAttachment::Port(port_id),
            },
            vec![router, port_id],
            Some(port_id),
        );
        interfaces.push(interface_id);
    }

    for (route, label) in spec.routes().iter().zip(spec.route_labels()?) {
        let mut depends_on = Vec::with_capacity(1 + interfaces.len());
        depends_on.push(router);
        depends_on.extend(interfaces.iter().copied());

        push_declaration(
            &mut declarations,
            base.member(ResourceKind::RouterRoute, &label),
            None,
            ResourceRequest::RouterRoute {
                router,
                properties: route.properties.clone(),
            },
            depends_on,
            Some(router),
        );
    }

    debug!(
        "Planned {} declarations for base \"{}\"",
        declarations.len(),
        base
    );

    Ok(TopologyPlan::new(declarations, router, network, subnets, ports))
}
