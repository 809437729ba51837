//! Adapters for the integration domain
//!
//! - **memory**: in-memory repositories, credential store and request counter
//! - **matrix**: the Matrix clinic-management API adapter
//!
//! Upstream adapters are built once at start-up and shared behind `Arc`:
//!
//! ```rust,ignore
//! use domain_integration::adapters::matrix::MatrixApi;
//! use domain_integration::adapters::memory::InMemoryCredentialsStore;
//! use std::sync::Arc;
//!
//! let matrix = MatrixApi::builder()
//!     .credentials(Arc::new(InMemoryCredentialsStore::new()))
//!     .build()?;
//! let units = matrix.list_units(&integration).await?;
//! ```

pub mod matrix;
pub mod memory;

pub use matrix::{MatrixApi, MatrixApiBuilder, MatrixSettings};
pub use memory::{InMemoryCredentialsStore, InMemoryIntegrationRepository, InMemoryRequestCounter};
