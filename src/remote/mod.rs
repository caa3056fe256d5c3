//! The remote boundary: host trait, handles, ambient defaults and the in-memory host.

pub mod ambient;
pub mod host;
pub mod memory;
