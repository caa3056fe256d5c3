use crate::{
    foundation::core::{Attrs, Value},
    foundation::error::{FuError, FuResult},
    objects::{
        flow::FlowView,
        node::{Object, concrete_wrapper},
        render_opts::RenderOpts,
        tool::Tool,
    },
    remote::host::RemoteHandle,
};

/// Magic `AddTool` position that makes the host insert and connect the new tool after the
/// active one.
const INSERT_POS: i32 = -32768;

#[derive(Clone, Debug)]
/// A composition: the document holding tools, their connections and playback state.
///
/// Resolving an absent candidate into a `Composition` yields the current composition.
pub struct Composition {
    handle: RemoteHandle,
}

concrete_wrapper!(Composition);

impl Composition {
    /// Current time of the composition's time slider.
    pub fn current_time(&self) -> FuResult<f64> {
        self.handle.get("CurrentTime")?.expect_f64("CurrentTime")
    }

    /// Tools of this composition, optionally only the selected ones and/or one registry id.
    ///
    /// The host does not report selected tools in selection order.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn tool_list(&self, selected: bool, node_type: Option<&str>) -> FuResult<Vec<Tool>> {
        let mut args = vec![Value::Bool(selected)];
        if let Some(t) = node_type {
            args.push(Value::from(t));
        }
        let list = self.handle.call("GetToolList", args)?;
        self.handle.resolve_all(list)
    }

    pub fn selected_tools(&self, node_type: Option<&str>) -> FuResult<Vec<Tool>> {
        self.tool_list(true, node_type)
    }

    /// The active child frame (a UI element, not a time).
    pub fn current_frame(&self) -> FuResult<Value> {
        self.handle.get("CurrentFrame")
    }

    /// Flow view of the current frame.
    pub fn flow_view(&self) -> FuResult<FlowView> {
        let frame = self.current_frame()?;
        let frame = frame.as_handle().ok_or_else(|| {
            FuError::remote(format!(
                "CurrentFrame: expected handle, got {}",
                frame.type_name()
            ))
        })?;
        let frame = self.handle.sibling(frame);
        self.handle.resolve(frame.get("FlowView")?)
    }

    pub fn active_tool(&self) -> FuResult<Option<Tool>> {
        self.handle.resolve_opt(self.handle.get("ActiveTool")?)
    }

    /// Make `tool` active; `None` deselects.
    pub fn set_active_tool(&self, tool: Option<&Tool>) -> FuResult<()> {
        let arg = tool.map_or(Value::Nil, |t| Value::Handle(t.handle().id()));
        self.handle.call("SetActiveTool", vec![arg]).map(|_| ())
    }

    /// Add a tool of registry id `node_type`.
    ///
    /// With `insert` the host connects the new tool after the active one. `attrs` and `name`
    /// are applied to the new tool right away.
    #[tracing::instrument(level = "debug", skip(self, attrs))]
    pub fn create_tool(
        &self,
        node_type: &str,
        attrs: Option<Attrs>,
        insert: bool,
        name: Option<&str>,
    ) -> FuResult<Tool> {
        let mut args = vec![Value::from(node_type)];
        if insert {
            args.extend([Value::from(INSERT_POS), Value::from(INSERT_POS)]);
        }
        let tool: Tool = self.handle.resolve(self.handle.call("AddTool", args)?)?;

        if let Some(attrs) = attrs.filter(|a| !a.is_empty()) {
            tool.set_attrs(attrs)?;
        }
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            tool.rename(name)?;
        }
        Ok(tool)
    }

    /// Copy tools to the clipboard.
    pub fn copy(&self, tools: &[Tool]) -> FuResult<bool> {
        let list = Value::list(tools.iter().map(|t| Value::Handle(t.handle().id())));
        Ok(self.handle.call("Copy", vec![list])?.is_truthy())
    }

    /// Paste the clipboard, or `settings` when given.
    pub fn paste(&self, settings: Option<Value>) -> FuResult<bool> {
        let args = settings.into_iter().collect();
        Ok(self.handle.call("Paste", args)?.is_truthy())
    }

    /// Put the composition in non-interactive (batch) mode.
    ///
    /// See [`crate::context::CompLock`] for the scoped form.
    pub fn lock(&self) -> FuResult<()> {
        self.handle.call("Lock", vec![]).map(|_| ())
    }

    pub fn unlock(&self) -> FuResult<()> {
        self.handle.call("Unlock", vec![]).map(|_| ())
    }

    pub fn redo(&self, num: u32) -> FuResult<()> {
        self.handle.call("Redo", vec![Value::from(num)]).map(|_| ())
    }

    pub fn undo(&self, num: u32) -> FuResult<()> {
        self.handle.call("Undo", vec![Value::from(num)]).map(|_| ())
    }

    /// Open an undo block; must be paired with [`Composition::end_undo`].
    pub fn start_undo(&self, name: &str) -> FuResult<()> {
        self.handle
            .call("StartUndo", vec![Value::from(name)])
            .map(|_| ())
    }

    /// Close the undo block, keeping or discarding the captured event.
    pub fn end_undo(&self, keep: bool) -> FuResult<()> {
        self.handle
            .call("EndUndo", vec![Value::Bool(keep)])
            .map(|_| ())
    }

    pub fn clear_undo(&self) -> FuResult<()> {
        self.handle.call("ClearUndo", vec![]).map(|_| ())
    }

    pub fn save(&self) -> FuResult<()> {
        self.handle.call("Save", vec![]).map(|_| ())
    }

    pub fn play(&self) -> FuResult<()> {
        self.handle.call("Play", vec![]).map(|_| ())
    }

    pub fn stop(&self) -> FuResult<()> {
        self.handle.call("Stop", vec![]).map(|_| ())
    }

    /// Toggle looping of interactive playback.
    pub fn set_loop(&self, enabled: bool) -> FuResult<()> {
        self.handle
            .call("Loop", vec![Value::Bool(enabled)])
            .map(|_| ())
    }

    /// Render the composition; `true` when the render started (and, with `wait`, finished).
    #[tracing::instrument(level = "debug", skip(self, opts))]
    pub fn render(&self, wait: bool, opts: &RenderOpts) -> FuResult<bool> {
        let args = Value::from(opts.to_host_args(wait));
        Ok(self.handle.call("Render", vec![args])?.is_truthy())
    }

    /// [`Composition::render`] over an explicit frame range.
    pub fn render_range(
        &self,
        wait: bool,
        start: f64,
        end: f64,
        steps: u32,
        opts: &RenderOpts,
    ) -> FuResult<bool> {
        let opts = RenderOpts {
            start: Some(start),
            end: Some(end),
            steps: Some(steps),
            ..opts.clone()
        };
        self.render(wait, &opts)
    }

    /// Run a script file in the composition's script context.
    pub fn run_script(&self, path: &str) -> FuResult<()> {
        self.handle
            .call("RunScript", vec![Value::from(path)])
            .map(|_| ())
    }

    /// Busy playing, rendering, or rendering a tool for a view.
    pub fn is_rendering(&self) -> FuResult<bool> {
        self.handle
            .call("IsRendering", vec![])?
            .expect_bool("IsRendering")
    }

    pub fn is_playing(&self) -> FuResult<bool> {
        self.handle.call("IsPlaying", vec![])?.expect_bool("IsPlaying")
    }

    pub fn is_locked(&self) -> FuResult<bool> {
        self.handle.call("IsLocked", vec![])?.expect_bool("IsLocked")
    }

    /// File name from `COMPS_FileName`; empty for unsaved compositions.
    pub fn file_name(&self) -> FuResult<String> {
        match self.handle.attrs()?.remove("COMPS_FileName") {
            Some(v) => v.expect_text("COMPS_FileName"),
            None => Ok(String::new()),
        }
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.file_name() {
            Ok(name) => write!(f, "Composition(\"{name}\")"),
            Err(_) => write!(f, "Composition({})", self.handle.id()),
        }
    }
}
