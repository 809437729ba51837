//! Request DTOs
//!
//! Request bodies are validated with `validator` before being converted into
//! upstream payloads. Responses are the adapter's typed results, serialized
//! as-is.

pub mod matrix;
