//! Stowgate identity store
//!
//! Read-only access to account records keyed by subject identifier. The
//! `AccountRepository` trait is the seam; `DynamoAccountRepository` is the
//! production implementation.

pub mod db;

pub use db::account::AccountRepository;
#[cfg(feature = "dynamodb")]
pub use db::account::DynamoAccountRepository;
