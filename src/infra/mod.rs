//! Infrastructure adapters and runtime bootstrap.

pub mod cache;
pub mod content;
pub mod error;
pub mod http;
pub(crate) mod lock;
pub mod telemetry;
