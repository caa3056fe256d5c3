//! fuwrap is a typed object model over a compositing host's remote scripting interface.
//!
//! The host hands out one untyped handle type for every object it exposes. fuwrap turns those
//! handles into typed wrappers:
//!
//! - Implement (or pick) a [`RemoteHost`]; [`InMemoryHost`] ships for tests and offline use
//! - Build a [`Resolver`], optionally with [`AmbientDefaults`] for the current composition and
//!   application
//! - Resolve handles into [`Composition`], [`Tool`], [`Input`], [`Output`], [`FlowView`],
//!   [`Image`], [`Application`] or [`Registry`], or into the open [`Node`] / [`Link`] views
#![forbid(unsafe_code)]

pub mod coerce;
pub mod connect;
pub mod context;
mod foundation;
pub mod objects;
pub mod remote;
pub mod resolve;

pub use crate::foundation::core::{Attrs, Color, FlowPos, HandleId, Value};
pub use crate::foundation::error::{FuError, FuResult};

pub use crate::connect::{ConnectOpts, ScriptAppConnector, connect};
pub use crate::context::{CompLock, LockAndUndo, UndoChunk};
pub use crate::objects::application::Application;
pub use crate::objects::composition::Composition;
pub use crate::objects::flow::FlowView;
pub use crate::objects::image::Image;
pub use crate::objects::link::{Input, Link, Output};
pub use crate::objects::node::{Node, Object};
pub use crate::objects::registry::Registry;
pub use crate::objects::render_opts::{RenderOpts, SizeType};
pub use crate::objects::tool::Tool;
pub use crate::remote::ambient::{AmbientDefaults, AmbientSlots, DefaultSlot};
pub use crate::remote::host::{RemoteHandle, RemoteHost};
pub use crate::remote::memory::{CallRecord, HostSnapshot, InMemoryHost, ObjectRecord};
pub use crate::resolve::kind::Kind;
pub use crate::resolve::resolver::{Candidate, Resolver, Wrapper};
