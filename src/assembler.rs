// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Assembler
//!
//! Executes a [`TopologyPlan`] against an injected [`Provisioner`]. This is
//! the only component that talks to the engine, the only writer of the
//! [`ResourceRegistry`], and the owner of every declaration's lifecycle.
//!
//! # Execution Model
//!
//! One task per declaration. Each task waits on the outcome channels of its
//! dependency set, substitutes the resolved identifiers into the wire
//! request, submits, and broadcasts its own outcome. Declarations with no
//! unresolved mutual dependencies run concurrently - the router and the
//! network submit in parallel, as do sibling subnets. Nothing blocks on
//! anything outside its declared dependency set.
//!
//! Subnet and port handles are registered under their logical names before
//! the outcome broadcast, so a dependent interface can only be submitted
//! after its parent is in the registry.
//!
//! # Failure Semantics
//!
//! A failed declaration cancels its transitive dependents before they are
//! submitted; unreachable siblings continue independently. Nothing is rolled
//! back. The resulting [`AssemblyFailure`] names what failed, what was
//! cancelled and what resolved, and keeps the partial registry inspectable.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{ResourceKind, ResourceName};
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{
    self, Declaration, DeclarationId, InterfaceAttachment, PortNetworkRef, ResourceRequest,
};
use crate::provision::{
    AttachedInterface, DeclareRequest, InterfaceResource, PortResource, ProviderId, Provisioner,
    ProvisioningError, ResourceHandle, ResourceProperties, RouteResource, SubnetResource,
};
use crate::registry::{RegistryError, ResourceRegistry};
use crate::spec::NetworkTopologySpec;
use crate::state_machine::declaration_lifecycle::{DeclarationStatus, LifecycleEvent};
use crate::state_machine::StateMachine;

/// Failure cause attached to a single declaration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("Provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Aggregated identifiers of a fully assembled topology
///
/// `subnet_ids` and `port_ids` follow the configuration order of the input
/// lists, not graph-traversal order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TopologyOutputs {
    pub router_id: ProviderId,
    pub network_id: ProviderId,
    pub subnet_ids: Vec<ProviderId>,
    pub port_ids: Vec<ProviderId>,
}

/// A successfully assembled topology
///
/// Carries the aggregated outputs plus the populated registry for
/// logical-name lookups.
#[derive(Debug, Clone)]
pub struct NetworkTopology {
    outputs: TopologyOutputs,
    registry: ResourceRegistry,
}

impl NetworkTopology {
    pub fn outputs(&self) -> &TopologyOutputs {
        &self.outputs
    }

    pub fn router_id(&self) -> &ProviderId {
        &self.outputs.router_id
    }

    pub fn network_id(&self) -> &ProviderId {
        &self.outputs.network_id
    }

    /// Subnet identifiers in configuration order
    pub fn subnet_ids(&self) -> &[ProviderId] {
        &self.outputs.subnet_ids
    }

    /// Port identifiers in configuration order
    pub fn port_ids(&self) -> &[ProviderId] {
        &self.outputs.port_ids
    }

    /// Resolve a subnet's provisioned identifier by logical name
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] for an unknown name - never an empty
    /// identifier.
    pub fn subnet_id(&self, logical_name: &str) -> Result<&ProviderId, RegistryError> {
        self.registry.subnet(logical_name).map(|handle| &handle.id)
    }

    /// Resolve a port's provisioned identifier by logical name
    pub fn port_id(&self, logical_name: &str) -> Result<&ProviderId, RegistryError> {
        self.registry.port(logical_name).map(|handle| &handle.id)
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }
}

/// One declaration that reached the `Failed` state
#[derive(Debug, Clone)]
pub struct FailedDeclaration {
    pub name: ResourceName,
    pub kind: ResourceKind,
    /// Logical name, when the declaration had one
    pub logical_name: Option<String>,
    /// Names of the declarations this one waited on
    pub dependency_chain: Vec<ResourceName>,
    pub error: DeclarationError,
}

/// Report of a partially assembled topology
///
/// The resolved portion is left intact and inspectable; nothing is rolled
/// back.
#[derive(Debug, Clone)]
pub struct AssemblyFailure {
    /// Correlation id of the assembly run
    pub assembly_id: Uuid,
    /// Declarations the engine failed
    pub failed: Vec<FailedDeclaration>,
    /// Declarations cancelled before submission, by name
    pub cancelled: Vec<ResourceName>,
    /// Handles that did resolve
    pub resolved: Vec<ResourceHandle>,
    /// Registry entries for the resolved subnets and ports
    pub registry: ResourceRegistry,
}

impl fmt::Display for AssemblyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed: Vec<&str> = self.failed.iter().map(|d| d.name.as_str()).collect();
        write!(
            f,
            "{} declaration(s) failed ({}), {} cancelled, {} resolved",
            self.failed.len(),
            failed.join(", "),
            self.cancelled.len(),
            self.resolved.len()
        )
    }
}

/// Outcome of one declaration, broadcast to its dependents
#[derive(Debug, Clone)]
enum NodeOutcome {
    Resolved(ProviderId),
    Failed,
    Cancelled,
}

/// Terminal record of one declaration's execution
#[derive(Debug)]
struct DeclarationReport {
    declaration: Declaration,
    status: DeclarationStatus,
    handle: Option<ResourceHandle>,
    error: Option<DeclarationError>,
}

/// Drives topology assembly through an injected provisioning engine
pub struct TopologyAssembler {
    provisioner: Arc<dyn Provisioner>,
}

impl TopologyAssembler {
    pub fn new(provisioner: Arc<dyn Provisioner>) -> Self {
        Self { provisioner }
    }

    /// Assemble the topology described by `spec`
    ///
    /// Validates, plans, then executes the plan concurrently while
    /// respecting every dependency edge.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::Configuration`] before anything is declared
    /// - [`TopologyError::Assembly`] when the engine fails a declaration;
    ///   the report carries the resolved portion
    pub async fn assemble(&self, spec: &NetworkTopologySpec) -> TopologyResult<NetworkTopology> {
        let assembly_id = Uuid::now_v7();
        let plan = graph::build(spec)?;
        info!(
            "Assembly {} planned {} declarations for base \"{}\"",
            assembly_id,
            plan.len(),
            spec.base_name()
        );

        let registry = Arc::new(Mutex::new(ResourceRegistry::new()));
        let mut join_set: JoinSet<TopologyResult<DeclarationReport>> = JoinSet::new();
        let mut receivers: Vec<watch::Receiver<Option<NodeOutcome>>> =
            Vec::with_capacity(plan.len());

        for declaration in plan.declarations() {
            let (outcome_tx, outcome_rx) = watch::channel(None);
            let dep_rxs: Vec<(DeclarationId, watch::Receiver<Option<NodeOutcome>>)> = declaration
                .depends_on
                .iter()
                .map(|dep| (*dep, receivers[dep.index()].clone()))
                .collect();
            receivers.push(outcome_rx);

            let parent_name = declaration
                .parent
                .and_then(|parent| plan.get(parent))
                .map(|parent| parent.name.clone());

            join_set.spawn(run_declaration(
                declaration.clone(),
                parent_name,
                dep_rxs,
                outcome_tx,
                Arc::clone(&self.provisioner),
                Arc::clone(&registry),
            ));
        }
        drop(receivers);

        let mut slots: Vec<Option<DeclarationReport>> = (0..plan.len()).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            let report = joined
                .map_err(|e| TopologyError::Internal(format!("assembly task join error: {e}")))??;
            let index = report.declaration.id.index();
            slots[index] = Some(report);
        }
        let reports: Vec<DeclarationReport> = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                TopologyError::Internal("assembly finished with missing declaration reports".into())
            })?;

        let registry = match Arc::try_unwrap(registry) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(|p| p.into_inner()),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .clone(),
        };

        if reports
            .iter()
            .all(|r| r.status == DeclarationStatus::Resolved)
        {
            let outputs = TopologyOutputs {
                router_id: resolved_id(&reports, plan.router())?,
                network_id: resolved_id(&reports, plan.network())?,
                subnet_ids: plan
                    .subnets()
                    .iter()
                    .map(|id| resolved_id(&reports, *id))
                    .collect::<TopologyResult<Vec<_>>>()?,
                port_ids: plan
                    .ports()
                    .iter()
                    .map(|id| resolved_id(&reports, *id))
                    .collect::<TopologyResult<Vec<_>>>()?,
            };

            info!(
                "Assembly {} complete: router {}, network {}, {} subnet(s), {} port(s)",
                assembly_id,
                outputs.router_id,
                outputs.network_id,
                outputs.subnet_ids.len(),
                outputs.port_ids.len()
            );

            return Ok(NetworkTopology { outputs, registry });
        }

        let mut failed = Vec::new();
        let mut cancelled = Vec::new();
        let mut resolved = Vec::new();

        for report in &reports {
            match report.status {
                DeclarationStatus::Failed => failed.push(FailedDeclaration {
                    name: report.declaration.name.clone(),
                    kind: report.declaration.kind(),
                    logical_name: report
                        .declaration
                        .logical_name
                        .as_ref()
                        .map(|label| label.to_string()),
                    dependency_chain: report
                        .declaration
                        .depends_on
                        .iter()
                        .filter_map(|dep| plan.get(*dep))
                        .map(|dep| dep.name.clone())
                        .collect(),
                    error: report.error.clone().unwrap_or_else(|| {
                        DeclarationError::Provisioning(ProvisioningError::Backend(
                            "failure cause not recorded".into(),
                        ))
                    }),
                }),
                DeclarationStatus::Cancelled => cancelled.push(report.declaration.name.clone()),
                DeclarationStatus::Resolved => {
                    if let Some(handle) = &report.handle {
                        resolved.push(handle.clone());
                    }
                }
                DeclarationStatus::Pending | DeclarationStatus::Submitted => {}
            }
        }

        let failure = AssemblyFailure {
            assembly_id,
            failed,
            cancelled,
            resolved,
            registry,
        };
        error!("Assembly {} failed: {}", assembly_id, failure);

        Err(TopologyError::Assembly(failure))
    }
}

fn resolved_id(reports: &[DeclarationReport], id: DeclarationId) -> TopologyResult<ProviderId> {
    reports
        .get(id.index())
        .and_then(|report| report.handle.as_ref())
        .map(|handle| handle.id.clone())
        .ok_or_else(|| {
            TopologyError::Internal(format!("declaration {id} resolved without a handle"))
        })
}

/// Execute one declaration: wait, materialize, submit, broadcast
async fn run_declaration(
    declaration: Declaration,
    parent_name: Option<ResourceName>,
    dep_rxs: Vec<(DeclarationId, watch::Receiver<Option<NodeOutcome>>)>,
    outcome_tx: watch::Sender<Option<NodeOutcome>>,
    provisioner: Arc<dyn Provisioner>,
    registry: Arc<Mutex<ResourceRegistry>>,
) -> TopologyResult<DeclarationReport> {
    let mut status = DeclarationStatus::Pending;

    let waits = dep_rxs.into_iter().map(|(dep, mut rx)| async move {
        let outcome = match rx.wait_for(|value| value.is_some()).await {
            Ok(value) => match &*value {
                Some(outcome) => outcome.clone(),
                None => NodeOutcome::Cancelled,
            },
            Err(_) => NodeOutcome::Cancelled,
        };
        (dep, outcome)
    });
    let outcomes = join_all(waits).await;

    let mut resolved_deps: HashMap<DeclarationId, ProviderId> = HashMap::new();
    let mut blocked = false;
    for (dep, outcome) in outcomes {
        match outcome {
            NodeOutcome::Resolved(id) => {
                resolved_deps.insert(dep, id);
            }
            NodeOutcome::Failed | NodeOutcome::Cancelled => blocked = true,
        }
    }

    if blocked {
        let (next, ()) = status.transition(&LifecycleEvent::Cancel)?;
        status = next;
        warn!(
            "Cancelled \"{}\": a dependency did not resolve",
            declaration.name
        );
        let _ = outcome_tx.send(Some(NodeOutcome::Cancelled));
        return Ok(DeclarationReport {
            declaration,
            status,
            handle: None,
            error: None,
        });
    }

    let request = materialize(&declaration, parent_name, &resolved_deps)?;

    let (next, ()) = status.transition(&LifecycleEvent::Submit)?;
    status = next;
    debug!("Submitting {} \"{}\"", declaration.kind(), declaration.name);

    match provisioner.declare(request).await {
        Ok(handle) => {
            if let Some(label) = &declaration.logical_name {
                let registered = {
                    let mut guard = registry
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    match declaration.kind() {
                        ResourceKind::Subnet => guard.register_subnet(label, handle.clone()),
                        ResourceKind::Port => guard.register_port(label, handle.clone()),
                        _ => Ok(()),
                    }
                };

                if let Err(cause) = registered {
                    let (next, ()) = status.transition(&LifecycleEvent::Fail)?;
                    status = next;
                    error!("Declaration \"{}\" failed: {}", declaration.name, cause);
                    let _ = outcome_tx.send(Some(NodeOutcome::Failed));
                    return Ok(DeclarationReport {
                        declaration,
                        status,
                        handle: Some(handle),
                        error: Some(cause.into()),
                    });
                }
            }

            let (next, ()) = status.transition(&LifecycleEvent::Resolve)?;
            status = next;
            debug!(
                "Resolved {} \"{}\" as {}",
                declaration.kind(),
                declaration.name,
                handle.id
            );
            let _ = outcome_tx.send(Some(NodeOutcome::Resolved(handle.id.clone())));
            Ok(DeclarationReport {
                declaration,
                status,
                handle: Some(handle),
                error: None,
            })
        }
        Err(cause) => {
            let (next, ()) = status.transition(&LifecycleEvent::Fail)?;
            status = next;
            error!("Declaration \"{}\" failed: {}", declaration.name, cause);
            let _ = outcome_tx.send(Some(NodeOutcome::Failed));
            Ok(DeclarationReport {
                declaration,
                status,
                handle: None,
                error: Some(cause.into()),
            })
        }
    }
}

/// Substitute resolved identifiers into the wire-shape request
fn materialize(
    declaration: &Declaration,
    parent_name: Option<ResourceName>,
    resolved_deps: &HashMap<DeclarationId, ProviderId>,
) -> TopologyResult<DeclareRequest> {
    let resolve = |id: DeclarationId| -> TopologyResult<ProviderId> {
        resolved_deps.get(&id).cloned().ok_or_else(|| {
            TopologyError::Internal(format!(
                "dependency {} of \"{}\" has no resolved identifier",
                id, declaration.name
            ))
        })
    };

    let properties = match &declaration.request {
        ResourceRequest::Router(spec) => ResourceProperties::Router(spec.clone()),
        ResourceRequest::Network(properties) => ResourceProperties::Network(properties.clone()),
        ResourceRequest::Subnet {
            network,
            properties,
        } => ResourceProperties::Subnet(SubnetResource {
            network_id: resolve(*network)?,
            ip_version: properties.cidr.version(),
            properties: properties.clone(),
        }),
        ResourceRequest::Port {
            network,
            properties,
        } => {
            let network_id = match network {
                PortNetworkRef::Declared(id) => resolve(*id)?,
                PortNetworkRef::External(id) => id.clone(),
            };
            ResourceProperties::Port(PortResource {
                network_id,
                properties: properties.clone(),
            })
        }
        ResourceRequest::RouterInterface { router, attachment } => {
            let attachment = match attachment {
                InterfaceAttachment::Subnet(id) => AttachedInterface::Subnet(resolve(*id)?),
                InterfaceAttachment::Port(id) => AttachedInterface::Port(resolve(*id)?),
            };
            ResourceProperties::RouterInterface(InterfaceResource {
                router_id: resolve(*router)?,
                attachment,
            })
        }
        ResourceRequest::RouterRoute { router, properties } => {
            ResourceProperties::RouterRoute(RouteResource {
                router_id: resolve(*router)?,
                properties: properties.clone(),
            })
        }
    };

    let depends_on = declaration
        .depends_on
        .iter()
        .map(|dep| resolve(*dep))
        .collect::<TopologyResult<Vec<_>>>()?;

    Ok(DeclareRequest {
        kind: declaration.kind(),
        name: declaration.name.clone(),
        properties,
        depends_on,
        parent: parent_name,
    })
}
