// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Name Derivation
//!
//! Name derivation must be a pure function: identical inputs always yield
//! byte-identical strings, and distinct kinds or labels never collide.

use network_topology::{BaseName, NameLabel, ResourceKind};
use proptest::prelude::*;

prop_compose! {
    fn name_segment()(s in "[a-z][a-z0-9]{0,15}") -> String {
        s
    }
}

proptest! {
    #[test]
    fn derivation_is_pure(base in name_segment(), label in name_segment()) {
        let base = BaseName::new(base.as_str()).unwrap();
        let label = NameLabel::explicit(label.as_str()).unwrap();

        let first = base.member(ResourceKind::Subnet, &label);
        let second = base.member(ResourceKind::Subnet, &label);

        prop_assert_eq!(first.as_str(), second.as_str());
        let expected = format!("{}-subnet-{}", base, label);
        prop_assert_eq!(
            first.as_str(),
            expected.as_str()
        );
    }

    #[test]
    fn kinds_never_collide(base in name_segment(), label in name_segment()) {
        let base = BaseName::new(base.as_str()).unwrap();
        let label = NameLabel::explicit(label.as_str()).unwrap();

        let subnet = base.member(ResourceKind::Subnet, &label);
        let port = base.member(ResourceKind::Port, &label);
        let route = base.member(ResourceKind::RouterRoute, &label);

        prop_assert_ne!(subnet.as_str(), port.as_str());
        prop_assert_ne!(subnet.as_str(), route.as_str());
        prop_assert_ne!(port.as_str(), route.as_str());
    }

    #[test]
    fn interface_names_follow_their_parent(base in name_segment(), label in name_segment()) {
        let base = BaseName::new(base.as_str()).unwrap();
        let label = NameLabel::explicit(label.as_str()).unwrap();

        let subnet = base.member(ResourceKind::Subnet, &label);
        let expected = format!("{}-if", subnet);
        let interface = subnet.interface();
        prop_assert_eq!(
            interface.as_str(),
            expected.as_str()
        );
    }

    #[test]
    fn positional_labels_are_distinct(count in 1usize..32) {
        let labels: Vec<String> = (0..count)
            .map(|position| NameLabel::positional(position).as_str().to_string())
            .collect();

        let mut deduped = labels.clone();
        deduped.dedup();
        prop_assert_eq!(labels.len(), deduped.len());
        prop_assert_eq!(labels[0].as_str(), "1");
    }
}
