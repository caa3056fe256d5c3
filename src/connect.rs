//! Standalone connection to a running host application.

use std::sync::Arc;

use crate::{
    foundation::core::HandleId,
    foundation::error::{FuError, FuResult},
    objects::application::Application,
    remote::host::RemoteHost,
    resolve::resolver::Resolver,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Where and how to look for a scriptable application.
pub struct ConnectOpts {
    /// Application name to connect to.
    pub app: String,
    /// Address of the machine running it.
    pub ip: String,
    /// Seconds to wait for an answer.
    pub timeout_secs: f64,
    /// Session uuid when several instances run; `None` takes the first.
    pub uuid: Option<String>,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            app: "Fusion".to_string(),
            ip: "127.0.0.1".to_string(),
            timeout_secs: 0.1,
            uuid: None,
        }
    }
}

/// Transport able to reach a host application from outside of it.
pub trait ScriptAppConnector {
    /// Host plus the application's handle, or `None` when nothing answered.
    fn script_app(&self, opts: &ConnectOpts) -> FuResult<Option<(Arc<dyn RemoteHost>, HandleId)>>;

    /// Session uuid of the application the calling script runs in, usable as
    /// [`ConnectOpts::uuid`]. `None` when not running inside an application.
    fn current_uuid(&self) -> FuResult<Option<String>> {
        Ok(None)
    }
}

/// Connect through `connector` and wrap the application.
#[tracing::instrument(level = "debug", skip(connector), fields(app = %opts.app, ip = %opts.ip))]
pub fn connect(connector: &dyn ScriptAppConnector, opts: &ConnectOpts) -> FuResult<Application> {
    let Some((host, app)) = connector.script_app(opts)? else {
        return Err(FuError::remote("couldn't connect to application"));
    };
    tracing::debug!(handle = %app, "connected");
    Resolver::new(host).resolve(app)
}

#[cfg(test)]
#[path = "../tests/unit/connect.rs"]
mod tests;
