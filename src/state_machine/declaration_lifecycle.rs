// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declaration Lifecycle State Machine
//!
//! Formal FSM for the lifecycle of a single resource declaration as the
//! topology assembler drives it.
//!
//! # States
//!
//! - Pending: waiting on dependencies
//! - Submitted: handed to the provisioning engine
//! - Resolved: engine confirmed the resource (terminal)
//! - Failed: engine rejected or lost the resource (terminal)
//! - Cancelled: a dependency failed before submission (terminal)
//!
//! # Inputs
//!
//! - Submit: Pending → Submitted
//! - Resolve: Submitted → Resolved
//! - Fail: Submitted → Failed
//! - Cancel: Pending → Cancelled
//!
//! Cancellation exists only before submission: a declaration already handed
//! to the engine runs to Resolved or Failed.

use super::{StateMachine, TransitionError, TransitionResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationStatus {
    /// Waiting for dependencies to resolve
    Pending,
    /// Submitted to the provisioning engine
    Submitted,
    /// Resource exists; handle resolved (terminal)
    Resolved,
    /// Engine rejected or failed the declaration (terminal)
    Failed,
    /// Never submitted; a dependency failed first (terminal)
    Cancelled,
}

impl DeclarationStatus {
    /// Whether this state admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeclarationStatus::Resolved | DeclarationStatus::Failed | DeclarationStatus::Cancelled
        )
    }
}

impl fmt::Display for DeclarationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationStatus::Pending => write!(f, "pending"),
            DeclarationStatus::Submitted => write!(f, "submitted"),
            DeclarationStatus::Resolved => write!(f, "resolved"),
            DeclarationStatus::Failed => write!(f, "failed"),
            DeclarationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Lifecycle input (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// All dependencies resolved; hand to the engine
    Submit,
    /// Engine confirmed the resource
    Resolve,
    /// Engine rejected or lost the resource
    Fail,
    /// A dependency failed before submission
    Cancel,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Submit => write!(f, "submit"),
            LifecycleEvent::Resolve => write!(f, "resolve"),
            LifecycleEvent::Fail => write!(f, "fail"),
            LifecycleEvent::Cancel => write!(f, "cancel"),
        }
    }
}

impl StateMachine for DeclarationStatus {
    type Input = LifecycleEvent;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use DeclarationStatus::*;
        use LifecycleEvent::*;

        match (self, input) {
            (Pending, Submit) => Ok((Submitted, ())),
            (Pending, Cancel) => Ok((Cancelled, ())),
            (Submitted, Resolve) => Ok((Resolved, ())),
            (Submitted, Fail) => Ok((Failed, ())),

            (state, input) => Err(TransitionError::InvalidTransition {
                from: state.to_string(),
                input: input.to_string(),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        use DeclarationStatus::*;
        use LifecycleEvent::*;

        match self {
            Pending => vec![Submit, Cancel],
            Submitted => vec![Resolve, Fail],
            Resolved | Failed | Cancelled => vec![],
        }
    }
}
