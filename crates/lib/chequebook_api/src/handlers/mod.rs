//! Request handlers.

pub mod auth;
pub mod customers;
pub mod fallback;
pub mod health;
pub mod subscriptions;
pub mod users;
