//! State module for tracking run-wide progress
//!
//! This module provides the state shared by every link worker during a run.
//!
//! # Components
//!
//! - `DomainRegistry`: the set of domains already claimed for fetching

mod domain_registry;

// Re-export main types
pub use domain_registry::DomainRegistry;
