//! Folio: month-aware cursor pagination for blog archives.

pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod infra;

pub use folio_api_types as api_types;
