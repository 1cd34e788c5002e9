// Copyright (c) 2025 - Cowboy AI, Inc.
//! Dependency Graph Construction
//!
//! This module turns a topology configuration into an ordered set of
//! resource declarations with explicit must-follow edges. It never talks to
//! the provisioning engine; the [`TopologyPlan`] it produces is pure data
//! the assembler executes.

pub mod builder;
pub mod declaration;

pub use builder::build;
pub use declaration::{
    Declaration, DeclarationId, InterfaceAttachment, PortNetworkRef, ResourceRequest, TopologyPlan,
};
