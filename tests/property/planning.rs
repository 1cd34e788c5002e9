// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Plan Construction and the Registry
//!
//! For every valid configuration the emitted plan must be topologically
//! sorted, carry one interface per subnet, and order every route after
//! every interface. The registry must hold exactly one entry per registered
//! logical name.

use network_topology::{
    build, BaseName, NameLabel, NetworkProperties, NetworkTopologySpec, ProviderId,
    ResourceHandle, ResourceKind, ResourceRegistry, RouteSpec, RouterSpec, SubnetSpec,
};
use proptest::prelude::*;

fn unique_labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z][a-z0-9]{0,8}", 0..6)
        .prop_map(|set| set.into_iter().collect())
}

fn subnet_spec_with(labels: &[String]) -> NetworkTopologySpec {
    let mut spec = NetworkTopologySpec::new(
        BaseName::new("prop").unwrap(),
        RouterSpec::default(),
        NetworkProperties::default(),
    );
    for (i, label) in labels.iter().enumerate() {
        spec = spec.with_subnet(SubnetSpec::named(
            label.as_str(),
            format!("10.0.{i}.0/24").parse().unwrap(),
        ));
    }
    spec
}

proptest! {
    #[test]
    fn plan_is_topologically_sorted(labels in unique_labels()) {
        let plan = build(&subnet_spec_with(&labels)).unwrap();

        prop_assert_eq!(plan.subnets().len(), labels.len());
        for declaration in plan.declarations() {
            for dep in &declaration.depends_on {
                prop_assert!(dep.index() < declaration.id.index());
            }
        }

        let interfaces = plan
            .declarations()
            .iter()
            .filter(|d| d.kind() == ResourceKind::RouterInterface)
            .count();
        prop_assert_eq!(interfaces, labels.len());
    }

    #[test]
    fn routes_follow_every_interface(labels in unique_labels(), route_count in 1usize..4) {
        let mut spec = subnet_spec_with(&labels);
        for i in 0..route_count {
            spec = spec.with_route(RouteSpec::anonymous(
                format!("203.0.{i}.0/24").parse().unwrap(),
                "10.0.0.1".parse().unwrap(),
            ));
        }

        let plan = build(&spec).unwrap();

        let interface_ids: Vec<_> = plan
            .declarations()
            .iter()
            .filter(|d| d.kind() == ResourceKind::RouterInterface)
            .map(|d| d.id)
            .collect();

        for route in plan
            .declarations()
            .iter()
            .filter(|d| d.kind() == ResourceKind::RouterRoute)
        {
            prop_assert!(route.depends_on.contains(&plan.router()));
            for interface in &interface_ids {
                prop_assert!(route.depends_on.contains(interface));
            }
        }
    }

    #[test]
    fn duplicate_labels_always_rejected(label in "[a-z][a-z0-9]{0,8}") {
        let spec = NetworkTopologySpec::new(
            BaseName::new("prop").unwrap(),
            RouterSpec::default(),
            NetworkProperties::default(),
        )
        .with_subnet(SubnetSpec::named(label.as_str(), "10.0.0.0/24".parse().unwrap()))
        .with_subnet(SubnetSpec::named(label.as_str(), "10.0.1.0/24".parse().unwrap()));

        prop_assert!(build(&spec).is_err());
    }

    #[test]
    fn registry_holds_one_entry_per_name(labels in unique_labels()) {
        let base = BaseName::new("prop").unwrap();
        let mut registry = ResourceRegistry::new();

        for label in &labels {
            let name_label = NameLabel::explicit(label).unwrap();
            let handle = ResourceHandle::new(
                ProviderId::new(format!("id-{label}")).unwrap(),
                ResourceKind::Subnet,
                base.member(ResourceKind::Subnet, &name_label),
            );
            registry.register_subnet(&name_label, handle).unwrap();
        }

        prop_assert_eq!(registry.subnet_count(), labels.len());
        for label in &labels {
            let found = registry.subnet(label).unwrap();
            let expected = format!("id-{label}");
            prop_assert_eq!(found.id.as_str(), expected.as_str());
        }
    }
}
