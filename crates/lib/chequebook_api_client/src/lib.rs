//! # chequebook_api_client
//!
//! Typed HTTP client for the cheque book reorder API, with the login session
//! kept on disk between runs.

pub mod client;
pub mod session;

pub use client::{ApiClient, ClientError};
pub use session::{SessionError, SessionStore};
