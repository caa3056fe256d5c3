//! Reference-to-type resolution.

pub mod kind;
pub mod resolver;
