use crate::{
    objects::node::{concrete_wrapper, fmt_named},
    remote::host::RemoteHandle,
};

#[derive(Clone, Debug)]
/// Registry entry describing one class of host object.
pub struct Registry {
    handle: RemoteHandle,
}

concrete_wrapper!(Registry);

impl std::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, f)
    }
}
