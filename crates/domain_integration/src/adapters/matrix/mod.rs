//! Matrix clinic-management API adapter
//!
//! [`MatrixApi`] exposes one typed method per upstream endpoint. All of
//! them share the call template in [`client`]; what differs per endpoint
//! is the HTTP method and path, the auth family ([`auth::AuthMode`]),
//! whether the call is audited as mutating, and how known upstream errors
//! are treated ([`recovery::Recovery`]).

pub mod auth;
pub mod client;
pub mod known_errors;
pub mod payload;
pub mod recovery;
pub mod session;
pub mod types;

pub use client::{MatrixApi, MatrixApiBuilder, MatrixSettings};
pub use recovery::Recovery;
pub use types::*;
