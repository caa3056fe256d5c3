use std::{collections::BTreeSet, sync::Arc};

use crate::{
    foundation::core::{Attrs, HandleId, Value},
    foundation::error::FuResult,
    resolve::resolver::{Candidate, Resolver, Wrapper},
};

/// The remote scripting interface of the host application.
///
/// Every object the host exposes is addressed by a [`HandleId`]. The host reports attributes and
/// a debug label per handle, and dispatches property access, indexing and method calls by name.
pub trait RemoteHost: Send + Sync {
    /// Whether `id` denotes one of this host's generic remote objects.
    fn is_remote_handle(&self, id: HandleId) -> bool;

    /// Attribute dictionary (`GetAttrs`). Value handles such as images report an empty one.
    fn get_attrs(&self, id: HandleId) -> FuResult<Attrs>;

    /// Merge `attrs` into the object's attributes (`SetAttrs`).
    fn set_attrs(&self, id: HandleId, attrs: Attrs) -> FuResult<()>;

    /// Best-effort printable label of the object (what `str()` would show on the host).
    fn debug_label(&self, id: HandleId) -> FuResult<String>;

    /// Read a named property (`obj.Name`).
    fn get_prop(&self, id: HandleId, name: &str) -> FuResult<Value>;

    /// Write a named property (`obj.TileColor = ...`).
    fn set_prop(&self, id: HandleId, name: &str, value: Value) -> FuResult<()>;

    /// Index read (`tool["Blend"]`, `input[time]`).
    fn index_get(&self, id: HandleId, key: &Value) -> FuResult<Value>;

    /// Index write (`input[time] = value`).
    fn index_set(&self, id: HandleId, key: Value, value: Value) -> FuResult<()>;

    /// Invoke a named method (`comp.AddTool("Merge")`).
    fn call(&self, id: HandleId, method: &str, args: Vec<Value>) -> FuResult<Value>;

    /// Attribute names only; the resolver needs nothing else for inference.
    fn attribute_names(&self, id: HandleId) -> FuResult<BTreeSet<String>> {
        Ok(self.get_attrs(id)?.into_keys().collect())
    }
}

#[derive(Clone)]
/// One remote object: its id plus the host it lives in.
pub struct RemoteHandle {
    host: Arc<dyn RemoteHost>,
    id: HandleId,
}

impl RemoteHandle {
    pub fn new(host: Arc<dyn RemoteHost>, id: HandleId) -> Self {
        Self { host, id }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn host(&self) -> &Arc<dyn RemoteHost> {
        &self.host
    }

    /// Same object on the same host.
    pub fn same_object(&self, other: &RemoteHandle) -> bool {
        self.id == other.id && std::ptr::addr_eq(Arc::as_ptr(&self.host), Arc::as_ptr(&other.host))
    }

    /// Handle to another object on the same host.
    pub fn sibling(&self, id: HandleId) -> RemoteHandle {
        RemoteHandle::new(self.host.clone(), id)
    }

    /// Replace the bound id, e.g. after a host call that reissues handles.
    pub(crate) fn rebind(&mut self, id: HandleId) {
        self.id = id;
    }

    pub fn attrs(&self) -> FuResult<Attrs> {
        self.host.get_attrs(self.id)
    }

    pub fn set_attrs(&self, attrs: Attrs) -> FuResult<()> {
        self.host.set_attrs(self.id, attrs)
    }

    pub fn label(&self) -> FuResult<String> {
        self.host.debug_label(self.id)
    }

    pub fn get(&self, name: &str) -> FuResult<Value> {
        self.host.get_prop(self.id, name)
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> FuResult<()> {
        self.host.set_prop(self.id, name, value.into())
    }

    pub fn index(&self, key: impl Into<Value>) -> FuResult<Value> {
        self.host.index_get(self.id, &key.into())
    }

    pub fn set_index(&self, key: impl Into<Value>, value: impl Into<Value>) -> FuResult<()> {
        self.host.index_set(self.id, key.into(), value.into())
    }

    pub fn call(&self, method: &str, args: Vec<Value>) -> FuResult<Value> {
        self.host.call(self.id, method, args)
    }

    /// Resolve a value returned by this host into a typed wrapper.
    pub fn resolve<T: Wrapper>(&self, value: Value) -> FuResult<T> {
        Resolver::new(self.host.clone()).resolve(Candidate::Value(value))
    }

    /// Like [`RemoteHandle::resolve`], but `nil` becomes `None` instead of an error.
    pub fn resolve_opt<T: Wrapper>(&self, value: Value) -> FuResult<Option<T>> {
        if value.is_nil() {
            return Ok(None);
        }
        self.resolve(value).map(Some)
    }

    /// Resolve every entry of a host array, in array order.
    pub fn resolve_all<T: Wrapper>(&self, list: Value) -> FuResult<Vec<T>> {
        list.seq_values()
            .into_iter()
            .map(|v| self.resolve(v.clone()))
            .collect()
    }
}

impl std::fmt::Debug for RemoteHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteHandle")
            .field("id", &self.id)
            .field("host_ptr", &Arc::as_ptr(&self.host).cast::<()>())
            .finish()
    }
}
