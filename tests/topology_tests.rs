// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for end-to-end topology assembly
//!
//! These tests verify the complete flow:
//! 1. Spec → dependency graph plan
//! 2. Concurrent execution against the provisioning seam
//! 3. Registry population and output aggregation
//!
//! Ordering assertions rely on the recording engine's arrival log: a
//! declaration is only submitted after its dependencies resolve, so a
//! dependency always appears earlier in the log than its dependent.

mod fixtures;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use network_topology::{
    ConfigurationError, DeclarationError, PortSpec, ProviderId, ProvisioningError, RegistryError,
    ResourceKind, ResourceProperties, RouteSpec, SubnetSpec, TopologyAssembler, TopologyError,
};

use fixtures::{base_spec, init_tracing, RecordingProvisioner};

#[tokio::test]
async fn test_minimal_topology_assembles_router_and_network() -> anyhow::Result<()> {
    let provisioner = Arc::new(RecordingProvisioner::new());
    let assembler = TopologyAssembler::new(provisioner.clone());

    let topology = assembler.assemble(&base_spec("mini")).await?;

    let mut names = provisioner.declared_names();
    names.sort();
    assert_eq!(names, vec!["mini-net", "mini-router"]);
    assert!(topology.subnet_ids().is_empty());
    assert!(topology.port_ids().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_demo_scenario_order_and_outputs() -> anyhow::Result<()> {
    init_tracing();
    let provisioner = Arc::new(RecordingProvisioner::new());
    let assembler = TopologyAssembler::new(provisioner.clone());

    let spec = base_spec("demo")
        .with_subnet(SubnetSpec::named("a", "10.0.0.0/24".parse()?))
        .with_route(RouteSpec::described(
            "default",
            "0.0.0.0/0".parse()?,
            "10.0.0.7".parse()?,
        ));

    let topology = assembler.assemble(&spec).await?;

    let position = |name: &str| provisioner.position(name).unwrap_or(usize::MAX);
    assert!(position("demo-net") < position("demo-subnet-a"));
    assert!(position("demo-router") < position("demo-subnet-a-if"));
    assert!(position("demo-subnet-a") < position("demo-subnet-a-if"));
    assert!(position("demo-subnet-a-if") < position("demo-route-default"));

    assert_eq!(provisioner.requests().len(), 5);
    assert_eq!(topology.subnet_ids().len(), 1);
    assert_eq!(topology.subnet_id("a")?, &topology.subnet_ids()[0]);

    // The route reaches the engine with the concrete router id and an edge
    // per dependency (router + the subnet interface).
    let route = provisioner
        .request_named("demo-route-default")
        .expect("route submitted");
    match &route.properties {
        ResourceProperties::RouterRoute(properties) => {
            assert_eq!(&properties.router_id, topology.router_id());
        }
        other => panic!("unexpected route properties: {other:?}"),
    }
    assert_eq!(route.depends_on.len(), 2);
    assert!(route.depends_on.contains(topology.router_id()));

    // Subnet reaches the engine stripped to its wire shape, inside the
    // topology network.
    let subnet = provisioner
        .request_named("demo-subnet-a")
        .expect("subnet submitted");
    match &subnet.properties {
        ResourceProperties::Subnet(properties) => {
            assert_eq!(&properties.network_id, topology.network_id());
            assert_eq!(properties.ip_version.value(), 4);
        }
        other => panic!("unexpected subnet properties: {other:?}"),
    }
    assert_eq!(subnet.parent.as_ref().map(|p| p.as_str()), Some("demo-net"));

    Ok(())
}

#[tokio::test]
async fn test_registry_contains_every_named_subnet() -> anyhow::Result<()> {
    let provisioner = Arc::new(RecordingProvisioner::new());
    let assembler = TopologyAssembler::new(provisioner.clone());

    let names = ["a", "b", "c", "d"];
    let mut spec = base_spec("reg");
    for (i, name) in names.iter().enumerate() {
        spec = spec.with_subnet(SubnetSpec::named(*name, format!("10.0.{i}.0/24").parse()?));
    }

    let topology = assembler.assemble(&spec).await?;

    assert_eq!(topology.registry().subnet_count(), names.len());
    for (i, name) in names.iter().enumerate() {
        // Outputs follow configuration order, and lookup agrees with them.
        assert_eq!(topology.subnet_id(name)?, &topology.subnet_ids()[i]);
    }

    assert!(matches!(
        topology.subnet_id("missing"),
        Err(RegistryError::NotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_subnet_name_declares_nothing() {
    let provisioner = Arc::new(RecordingProvisioner::new());
    let assembler = TopologyAssembler::new(provisioner.clone());

    let spec = base_spec("dup")
        .with_subnet(SubnetSpec::named("web", "10.0.0.0/24".parse().unwrap()))
        .with_subnet(SubnetSpec::named("web", "10.0.1.0/24".parse().unwrap()));

    let result = assembler.assemble(&spec).await;

    assert!(matches!(
        result,
        Err(TopologyError::Configuration(
            ConfigurationError::DuplicateLogicalName { .. }
        ))
    ));
    assert!(provisioner.requests().is_empty());
}

#[tokio::test]
async fn test_unresolvable_port_declares_nothing() {
    let provisioner = Arc::new(RecordingProvisioner::new());
    let assembler = TopologyAssembler::new(provisioner.clone());

    let spec = base_spec("badport").with_port(PortSpec {
        logical_name: Some("dangling".to_string()),
        self_network: false,
        network_id: None,
        properties: Default::default(),
    });

    let result = assembler.assemble(&spec).await;

    assert!(matches!(
        result,
        Err(TopologyError::Configuration(
            ConfigurationError::PortNetworkUnresolvable { .. }
        ))
    ));
    assert!(provisioner.requests().is_empty());
}

#[tokio::test]
async fn test_port_targets_resolve_independently() -> anyhow::Result<()> {
    let provisioner = Arc::new(RecordingProvisioner::new());
    let assembler = TopologyAssembler::new(provisioner.clone());

    let external = ProviderId::new("ext-net-7")?;
    let spec = base_spec("edge")
        .with_port(PortSpec::on_topology_network("inner"))
        .with_port(PortSpec::on_external_network("outer", external.clone()));

    let topology = assembler.assemble(&spec).await?;

    let inner = provisioner
        .request_named("edge-port-inner")
        .expect("inner port submitted");
    match &inner.properties {
        ResourceProperties::Port(properties) => {
            assert_eq!(&properties.network_id, topology.network_id());
        }
        other => panic!("unexpected port properties: {other:?}"),
    }

    let outer = provisioner
        .request_named("edge-port-outer")
        .expect("outer port submitted");
    match &outer.properties {
        ResourceProperties::Port(properties) => {
            assert_eq!(properties.network_id, external);
        }
        other => panic!("unexpected port properties: {other:?}"),
    }
    // The external port waits on nothing inside the topology.
    assert!(outer.depends_on.is_empty());

    assert_eq!(topology.port_ids().len(), 2);
    assert_eq!(topology.port_id("inner")?, &topology.port_ids()[0]);
    assert_eq!(topology.port_id("outer")?, &topology.port_ids()[1]);

    // Both ports group under the topology network for lifecycle purposes.
    assert_eq!(inner.parent.as_ref().map(|p| p.as_str()), Some("edge-net"));
    assert_eq!(outer.parent.as_ref().map(|p| p.as_str()), Some("edge-net"));
    Ok(())
}

#[tokio::test]
async fn test_route_without_interfaces_still_declares() -> anyhow::Result<()> {
    let provisioner = Arc::new(RecordingProvisioner::new());
    let assembler = TopologyAssembler::new(provisioner.clone());

    let spec = base_spec("lonely").with_route(RouteSpec::anonymous(
        "0.0.0.0/0".parse()?,
        "192.0.2.1".parse()?,
    ));

    let topology = assembler.assemble(&spec).await?;

    let route = provisioner
        .request_named("lonely-route-1")
        .expect("route submitted");
    assert_eq!(route.depends_on, vec![topology.router_id().clone()]);
    Ok(())
}

#[tokio::test]
async fn test_failed_subnet_cancels_dependents_only() {
    init_tracing();
    let provisioner = Arc::new(RecordingProvisioner::failing_on(["part-subnet-bad"]));
    let assembler = TopologyAssembler::new(provisioner.clone());

    let spec = base_spec("part")
        .with_subnet(SubnetSpec::named("bad", "10.0.0.0/24".parse().unwrap()))
        .with_subnet(SubnetSpec::named("good", "10.0.1.0/24".parse().unwrap()))
        .with_route(RouteSpec::described(
            "default",
            "0.0.0.0/0".parse().unwrap(),
            "10.0.1.1".parse().unwrap(),
        ));

    let error = assembler.assemble(&spec).await.unwrap_err();
    let failure = match error {
        TopologyError::Assembly(failure) => failure,
        other => panic!("unexpected error: {other}"),
    };

    // The failed declaration is reported with its cause and chain.
    assert_eq!(failure.failed.len(), 1);
    let failed = &failure.failed[0];
    assert_eq!(failed.name.as_str(), "part-subnet-bad");
    assert_eq!(failed.kind, ResourceKind::Subnet);
    assert_eq!(failed.logical_name.as_deref(), Some("bad"));
    assert!(matches!(
        failed.error,
        DeclarationError::Provisioning(ProvisioningError::Rejected { .. })
    ));
    assert!(failed
        .dependency_chain
        .iter()
        .any(|name| name.as_str() == "part-net"));

    // Its interface and the route are cancelled; the sibling subnet's
    // interface is not.
    let cancelled: Vec<&str> = failure.cancelled.iter().map(|n| n.as_str()).collect();
    assert!(cancelled.contains(&"part-subnet-bad-if"));
    assert!(cancelled.contains(&"part-route-default"));
    assert!(!cancelled.contains(&"part-subnet-good-if"));

    let resolved: Vec<&str> = failure.resolved.iter().map(|h| h.name.as_str()).collect();
    assert!(resolved.contains(&"part-router"));
    assert!(resolved.contains(&"part-subnet-good"));
    assert!(resolved.contains(&"part-subnet-good-if"));

    // The partial registry still answers for what resolved.
    assert!(failure.registry.subnet("good").is_ok());
    assert!(matches!(
        failure.registry.subnet("bad"),
        Err(RegistryError::NotFound { .. })
    ));

    // Cancelled declarations were never submitted to the engine.
    assert!(provisioner.position("part-subnet-bad").is_some());
    assert!(provisioner.position("part-subnet-bad-if").is_none());
    assert!(provisioner.position("part-route-default").is_none());
}

#[tokio::test]
async fn test_rerun_derives_identical_names() -> anyhow::Result<()> {
    let spec = base_spec("prod").with_subnet(SubnetSpec::named("web", "10.0.0.0/24".parse()?));

    let first = Arc::new(RecordingProvisioner::new());
    TopologyAssembler::new(first.clone()).assemble(&spec).await?;

    let second = Arc::new(RecordingProvisioner::new());
    TopologyAssembler::new(second.clone())
        .assemble(&spec)
        .await?;

    let mut first_names = first.declared_names();
    let mut second_names = second.declared_names();
    first_names.sort();
    second_names.sort();
    assert_eq!(first_names, second_names);
    assert!(first_names.iter().any(|n| n == "prod-subnet-web"));
    Ok(())
}
