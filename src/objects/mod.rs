//! Typed wrappers over remote handles.
//!
//! Every wrapper owns exactly one [`crate::RemoteHandle`]; methods forward to the host and
//! route returned objects back through the resolver.

pub mod application;
pub mod composition;
pub mod flow;
pub mod image;
pub mod link;
pub mod node;
pub mod registry;
pub mod render_opts;
pub mod tool;
