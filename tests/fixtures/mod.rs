// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for network-topology
//!
//! Provides deterministic topology specs and an in-memory provisioning
//! engine that records every submission in arrival order. Tests construct
//! specs through these helpers and assert against the recorded log.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use network_topology::{
    BaseName, DeclareRequest, NetworkProperties, NetworkTopologySpec, Provisioner, ProviderId,
    ProvisioningError, ResourceHandle, RouterSpec,
};

/// Install a fmt subscriber honoring `RUST_LOG`, once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A topology spec with the given base and no subnets, ports or routes
pub fn base_spec(base: &str) -> NetworkTopologySpec {
    NetworkTopologySpec::new(
        BaseName::new(base).expect("valid base name"),
        RouterSpec::default(),
        NetworkProperties::default(),
    )
}

/// In-memory provisioning engine
///
/// Resolves every declaration with a sequenced identifier unless the
/// resource name is scripted to fail. The submission log preserves arrival
/// order, which tests use to verify dependency ordering.
pub struct RecordingProvisioner {
    log: Mutex<Vec<DeclareRequest>>,
    fail_names: HashSet<String>,
    sequence: AtomicU64,
}

impl RecordingProvisioner {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            fail_names: HashSet::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Reject the declarations with the given resource names
    pub fn failing_on<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_names: names.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    /// Every submission, in the order the engine received them
    pub fn requests(&self) -> Vec<DeclareRequest> {
        self.log.lock().expect("fixture lock").clone()
    }

    /// Resource names of every submission, in arrival order
    pub fn declared_names(&self) -> Vec<String> {
        self.requests().iter().map(|r| r.name.to_string()).collect()
    }

    /// Arrival position of a resource name, if it was ever submitted
    pub fn position(&self, name: &str) -> Option<usize> {
        self.declared_names().iter().position(|n| n == name)
    }

    /// The submission carrying the given resource name
    pub fn request_named(&self, name: &str) -> Option<DeclareRequest> {
        self.requests()
            .into_iter()
            .find(|r| r.name.as_str() == name)
    }
}

impl Default for RecordingProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provisioner for RecordingProvisioner {
    async fn declare(&self, request: DeclareRequest) -> Result<ResourceHandle, ProvisioningError> {
        let name = request.name.clone();
        let kind = request.kind;
        self.log.lock().expect("fixture lock").push(request);

        if self.fail_names.contains(name.as_str()) {
            return Err(ProvisioningError::Rejected {
                name: name.to_string(),
                reason: "scripted failure".to_string(),
            });
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        let id = ProviderId::new(format!("os-{sequence}-{name}"))?;
        Ok(ResourceHandle::new(id, kind, name))
    }
}
