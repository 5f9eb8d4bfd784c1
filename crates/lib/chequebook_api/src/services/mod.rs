//! Flows that combine several core operations.

pub mod auth;
