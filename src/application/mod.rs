//! Application services: pagination core and the posts service built on it.

pub mod error;
pub mod pagination;
pub mod posts;
pub mod repos;
