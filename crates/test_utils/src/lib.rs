//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! clinic integrations test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built integration records, credential bundles and payloads
//! - `builders`: Builder patterns for test data construction
//! - `recording`: Recording sinks, counters and a scripted HTTP transport
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod recording;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use recording::*;
pub use assertions::*;
pub use generators::*;
