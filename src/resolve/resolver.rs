use std::sync::Arc;

use crate::{
    foundation::core::{HandleId, Value},
    foundation::error::{FuError, FuResult},
    objects::node::{Node, Object},
    remote::ambient::AmbientDefaults,
    remote::host::{RemoteHandle, RemoteHost},
    resolve::kind::Kind,
};

/// Typed view the resolver can produce.
///
/// `KIND` is the requested kind; `from_node` extracts the typed value from a resolved [`Node`]
/// and hands the node back untouched when the variant does not fit.
pub trait Wrapper: Sized {
    /// Kind requested when resolving into `Self`.
    const KIND: Kind;

    /// Narrow a resolved node into `Self`.
    fn from_node(node: Node) -> Result<Self, Node>;
}

#[derive(Clone, Debug, Default)]
/// What a caller hands to the resolver.
pub enum Candidate {
    /// Nothing given: use the requested kind's ambient default.
    #[default]
    Absent,
    /// An already-built wrapper.
    Wrapped(Node),
    /// A raw remote handle.
    Handle(HandleId),
    /// A dynamic value returned by the host; must be a handle or `nil`.
    Value(Value),
}

impl Candidate {
    fn describe(&self) -> String {
        match self {
            Candidate::Absent => "absent".to_string(),
            Candidate::Wrapped(node) => format!("wrapped {} {}", node.kind(), node.handle().id()),
            Candidate::Handle(id) => format!("handle {id}"),
            Candidate::Value(v) => format!("value ({})", v.type_name()),
        }
    }
}

impl From<HandleId> for Candidate {
    fn from(id: HandleId) -> Self {
        Candidate::Handle(id)
    }
}

impl From<Option<HandleId>> for Candidate {
    fn from(id: Option<HandleId>) -> Self {
        id.map_or(Candidate::Absent, Candidate::Handle)
    }
}

impl From<Value> for Candidate {
    fn from(v: Value) -> Self {
        Candidate::Value(v)
    }
}

impl From<Node> for Candidate {
    fn from(node: Node) -> Self {
        Candidate::Wrapped(node)
    }
}

/// Maps `(requested kind, candidate)` to a typed wrapper bound to one remote handle.
///
/// Resolution is a pure function of its inputs plus two read-only lookups: the handle's
/// attribute names (or debug label) and, for absent candidates, the ambient default slot.
#[derive(Clone)]
pub struct Resolver {
    host: Arc<dyn RemoteHost>,
    defaults: Option<Arc<dyn AmbientDefaults>>,
}

impl Resolver {
    /// Resolver without ambient defaults; absent candidates fail with `NoDefaultAvailable`.
    pub fn new(host: Arc<dyn RemoteHost>) -> Self {
        Self {
            host,
            defaults: None,
        }
    }

    /// Install the provider consulted for absent candidates.
    pub fn with_defaults(mut self, defaults: Arc<dyn AmbientDefaults>) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn host(&self) -> &Arc<dyn RemoteHost> {
        &self.host
    }

    /// Resolve into the wrapper type `T`, using `T::KIND` as the requested kind.
    pub fn resolve<T: Wrapper>(&self, candidate: impl Into<Candidate>) -> FuResult<T> {
        let node = self.resolve_node(T::KIND, candidate.into())?;
        T::from_node(node).map_err(|node| FuError::type_mismatch(T::KIND, node.kind()))
    }

    /// Resolve with an explicit requested kind ([`Kind::Object`] infers freely).
    #[tracing::instrument(level = "debug", skip(self, candidate), fields(candidate = %candidate.describe()))]
    pub fn resolve_node(&self, requested: Kind, candidate: Candidate) -> FuResult<Node> {
        let id = match candidate {
            Candidate::Wrapped(node) => {
                let kind = node.kind();
                if kind.is_subtype_of(requested) {
                    return Ok(node);
                }
                return Err(FuError::type_mismatch(requested, kind));
            }
            Candidate::Absent | Candidate::Value(Value::Nil) => self.default_for(requested)?,
            Candidate::Handle(id) | Candidate::Value(Value::Handle(id)) => id,
            Candidate::Value(other) => {
                return Err(FuError::invalid_handle(format!(
                    "{} value",
                    other.type_name()
                )));
            }
        };

        if !self.host.is_remote_handle(id) {
            return Err(FuError::invalid_handle(format!(
                "{id}, which is not a handle of this host"
            )));
        }

        let resolved = self.infer_kind(id)?;
        if !resolved.is_subtype_of(requested) {
            return Err(FuError::type_mismatch(requested, resolved));
        }

        tracing::debug!(handle = %id, %resolved, "resolved reference");
        Node::bind(resolved, RemoteHandle::new(self.host.clone(), id))
            .ok_or_else(|| FuError::unresolvable(id, resolved.name()))
    }

    /// Concrete kind of a raw handle, from attribute prefixes or, failing that, its debug label.
    pub fn infer_kind(&self, id: HandleId) -> FuResult<Kind> {
        let names = self.host.attribute_names(id)?;
        if !names.is_empty() {
            if let Some(kind) = Kind::from_attr_names(names.iter().map(String::as_str)) {
                return Ok(kind);
            }
        }

        let label = self.host.debug_label(id)?;
        if names.is_empty() {
            if let Some(kind) = Kind::from_label(&label) {
                return Ok(kind);
            }
        }

        Err(FuError::unresolvable(id, label))
    }

    fn default_for(&self, requested: Kind) -> FuResult<HandleId> {
        let slot = requested
            .default_slot()
            .ok_or_else(|| FuError::missing_reference(requested))?;
        self.defaults
            .as_ref()
            .and_then(|d| d.default_handle(slot))
            .ok_or_else(|| FuError::no_default(requested))
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("has_defaults", &self.defaults.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/resolver.rs"]
mod tests;
