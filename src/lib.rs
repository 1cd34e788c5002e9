//! Declarative network topology builder
//!
//! This crate builds a small, fixed-topology cloud network - one router, one
//! network, plus configured subnets, additional router ports and static
//! routes - by deriving collision-free resource names, planning the creation
//! order as an explicit dependency graph, and driving an external
//! provisioning engine in that order.
//!
//! ## Architecture
//!
//! ```text
//! NetworkTopologySpec → graph::build → TopologyPlan
//!                                          ↓
//!                                  TopologyAssembler → Provisioner (external)
//!                                          ↓
//!                          ResourceRegistry + TopologyOutputs
//! ```
//!
//! The provisioning engine itself is out of scope: callers inject anything
//! implementing [`Provisioner`], whose `declare` primitive turns one named,
//! typed declaration into a live resource and resolves its identifier.
//!
//! ## Key Guarantees
//!
//! - **Deterministic naming**: the same spec always derives byte-identical
//!   resource names
//! - **Fail-fast configuration**: duplicate logical names, unresolvable port
//!   targets and invalid base names abort before anything is declared
//! - **Ordering**: a declaration is never submitted before every declaration
//!   it depends on has resolved; independent declarations run concurrently
//! - **Typed lookups**: resolving an unknown logical name is an explicit
//!   error, never an empty identifier
//! - **Visible partial failure**: a failed declaration cancels only its
//!   transitive dependents and the resolved portion stays inspectable
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use network_topology::{
//!     BaseName, NetworkProperties, NetworkTopologySpec, RouteSpec, RouterSpec,
//!     SubnetSpec, TopologyAssembler,
//! };
//! # use network_topology::{DeclareRequest, Provisioner, ProviderId, ProvisioningError, ResourceHandle};
//! # struct NullProvisioner;
//! # #[async_trait::async_trait]
//! # impl Provisioner for NullProvisioner {
//! #     async fn declare(&self, request: DeclareRequest) -> Result<ResourceHandle, ProvisioningError> {
//! #         Ok(ResourceHandle::new(ProviderId::new("id-0")?, request.kind, request.name))
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let spec = NetworkTopologySpec::new(
//!         BaseName::new("demo")?,
//!         RouterSpec::default(),
//!         NetworkProperties::default(),
//!     )
//!     .with_subnet(SubnetSpec::named("a", "10.0.0.0/24".parse()?))
//!     .with_route(RouteSpec::described(
//!         "default",
//!         "0.0.0.0/0".parse()?,
//!         "10.0.0.1".parse()?,
//!     ));
//!
//!     let assembler = TopologyAssembler::new(Arc::new(NullProvisioner));
//!     let topology = assembler.assemble(&spec).await?;
//!
//!     println!("router: {}", topology.router_id());
//!     println!("subnet a: {}", topology.subnet_id("a")?);
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod provision;
pub mod registry;
pub mod spec;
pub mod state_machine;

// Re-export commonly used types
pub use assembler::{
    AssemblyFailure, DeclarationError, FailedDeclaration, NetworkTopology, TopologyAssembler,
    TopologyOutputs,
};
pub use domain::{
    BaseName, CidrBlock, IpVersion, Mtu, NameError, NameLabel, NetworkError, ResourceKind,
    ResourceName,
};
pub use errors::{TopologyError, TopologyResult};
pub use graph::{build, Declaration, DeclarationId, ResourceRequest, TopologyPlan};
pub use provision::{
    AttachedInterface, DeclareRequest, InterfaceResource, PortResource, ProviderId, Provisioner,
    ProvisioningError, ResourceHandle, ResourceProperties, RouteResource, SubnetResource,
};
pub use registry::{RegistryError, ResourceRegistry};
pub use spec::{
    ConfigurationError, FixedIp, NetworkProperties, NetworkTopologySpec, PortProperties, PortSpec,
    PortTarget, RouteProperties, RouteSpec, RouterSpec, SubnetProperties, SubnetSpec,
};
pub use state_machine::declaration_lifecycle::{DeclarationStatus, LifecycleEvent};
pub use state_machine::{StateMachine, TransitionError, TransitionResult};
