//! # chequebook_core
//!
//! Core domain logic for the cheque book reorder service: credential checks,
//! session tokens, account eligibility, the subscription lifecycle and the
//! storage port they all run against.

pub mod auth;
pub mod customers;
pub mod envelope;
pub mod migrate;
pub mod models;
pub mod pagination;
pub mod store;
pub mod subscriptions;
pub mod uuid;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
