//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the clients and adapters for the object storage service.

pub mod storage;
