use crate::{
    foundation::error::FuResult,
    objects::{composition::Composition, node::concrete_wrapper},
    remote::host::RemoteHandle,
};

#[derive(Clone, Debug)]
/// The host application session.
///
/// Resolving an absent candidate into an `Application` yields the current application.
pub struct Application {
    handle: RemoteHandle,
}

concrete_wrapper!(Application);

impl Application {
    /// Create a composition, make it current and return it.
    pub fn new_comp(&self) -> FuResult<Composition> {
        self.handle.call("NewComp", vec![])?;
        self.current_comp()
    }

    pub fn current_comp(&self) -> FuResult<Composition> {
        self.handle
            .resolve(self.handle.call("GetCurrentComp", vec![])?)
    }

    /// Build number of the running host.
    pub fn build(&self) -> FuResult<f64> {
        self.handle.get("Build")?.expect_f64("Build")
    }

    pub fn version(&self) -> FuResult<f64> {
        self.handle.get("Version")?.expect_f64("Version")
    }
}

impl std::fmt::Display for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.handle.label() {
            Ok(label) => write!(f, "Application(\"{label}\")"),
            Err(_) => write!(f, "Application({})", self.handle.id()),
        }
    }
}
