//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod auth;
pub mod content_repository;
pub mod feedback;
pub mod generation_gateway;
