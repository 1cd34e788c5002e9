//! Error types for topology construction
//!
//! Each concern owns a typed error enum; this module aggregates them into
//! the crate-wide [`TopologyError`]. Configuration errors are fatal and
//! local (nothing declared); assembly failures carry the partial result.

use thiserror::Error;

use crate::assembler::AssemblyFailure;
use crate::domain::{NameError, NetworkError};
use crate::provision::ProvisioningError;
use crate::registry::RegistryError;
use crate::spec::ConfigurationError;
use crate::state_machine::TransitionError;

/// Errors that can occur while building a topology
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Invalid configuration, detected before anything is declared
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Name derivation or validation error
    #[error("Name error: {0}")]
    Name(#[from] NameError),

    /// Network value validation error
    #[error("Network value error: {0}")]
    Network(#[from] NetworkError),

    /// Registry registration or lookup error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Provisioning engine error outside an assembly run
    #[error("Provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),

    /// Illegal declaration lifecycle transition
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] TransitionError),

    /// One or more declarations failed; the report carries the partial
    /// topology
    #[error("Assembly failed: {0}")]
    Assembly(AssemblyFailure),

    /// Invariant violation inside the assembler
    #[error("Internal topology error: {0}")]
    Internal(String),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;
