//! Domain models.
//!
//! Wire names follow the banking schema: account and user projections keep the
//! upper-case column names the branch front end reads, subscription rows use
//! the lower-case column names the subscribe form posts.

pub mod account;
pub mod auth;
pub mod flag;
pub mod subscription;

pub use account::Account;
pub use auth::{LoginResponse, TokenClaims, User, UserRecord};
pub use flag::Flag;
pub use subscription::{NewSubscription, Subscription, SubscriptionPatch};
