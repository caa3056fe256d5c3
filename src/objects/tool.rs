use crate::{
    foundation::core::{Attrs, Color, FlowPos, Value},
    foundation::error::FuResult,
    objects::{
        composition::Composition,
        link::{Input, Output},
        node::{Object, concrete_wrapper, fmt_named},
    },
    remote::host::RemoteHandle,
};

#[derive(Clone, Debug)]
/// A single operator (node) of a composition.
///
/// Two tools compare equal when they carry the same name.
pub struct Tool {
    handle: RemoteHandle,
}

concrete_wrapper!(Tool);

impl Tool {
    /// Owning composition, read from the tool's `Composition` property.
    pub fn comp(&self) -> FuResult<Composition> {
        self.handle.resolve(self.handle.get("Composition")?)
    }

    /// Tile position in the owning composition's flow view.
    pub fn pos(&self) -> FuResult<FlowPos> {
        self.comp()?.flow_view()?.pos(self)
    }

    pub fn set_pos(&self, pos: FlowPos) -> FuResult<()> {
        self.comp()?.flow_view()?.set_pos(self, pos)
    }

    /// Main (visible) input by 1-based index.
    pub fn main_input(&self, index: u32) -> FuResult<Input> {
        let found = self.handle.call("FindMainInput", vec![Value::from(index)])?;
        self.handle.resolve(found)
    }

    /// Input by id (`tool["Blend"]`); `None` when the tool has no such input.
    pub fn input(&self, id: &str) -> FuResult<Option<Input>> {
        self.handle.resolve_opt(self.handle.index(id)?)
    }

    pub fn inputs(&self) -> FuResult<Vec<Input>> {
        self.handle
            .resolve_all(self.handle.call("GetInputList", vec![])?)
    }

    /// Main (visible) output by 1-based index.
    pub fn main_output(&self, index: u32) -> FuResult<Output> {
        let found = self.handle.call("FindMainOutput", vec![Value::from(index)])?;
        self.handle.resolve(found)
    }

    /// Output whose `ID` property is `id`; `None` when no output carries that id.
    pub fn output(&self, id: &str) -> FuResult<Option<Output>> {
        for output in self.outputs()? {
            if output.handle().get("ID")?.as_str() == Some(id) {
                return Ok(Some(output));
            }
        }
        Ok(None)
    }

    pub fn outputs(&self) -> FuResult<Vec<Output>> {
        self.handle
            .resolve_all(self.handle.call("GetOutputList", vec![])?)
    }

    /// Connect main output `from` of this tool into main input `to` of `other` (1-based).
    #[tracing::instrument(level = "debug", skip(self, other), fields(from_tool = %self.handle.id(), to_tool = %other.handle.id()))]
    pub fn connect_main(&self, other: &Tool, from: u32, to: u32) -> FuResult<()> {
        let output = self.main_output(from)?;
        let input = other.main_input(to)?;
        input.connect_to(Some(&output))
    }

    /// Drop every incoming and/or outgoing connection of this tool.
    pub fn disconnect(&self, inputs: bool, outputs: bool) -> FuResult<()> {
        if inputs {
            for input in self.inputs()? {
                input.disconnect()?;
            }
        }
        if outputs {
            for output in self.outputs()? {
                output.disconnect(None)?;
            }
        }
        Ok(())
    }

    /// Connections to and/or from this tool as `(Output, Input)` pairs.
    ///
    /// Incoming connections come first, in input order; then outgoing ones per output.
    pub fn connections(&self, inputs: bool, outputs: bool) -> FuResult<Vec<(Output, Input)>> {
        let mut out = Vec::new();
        if inputs {
            for input in self.inputs()? {
                if let Some(output) = input.connected_output()? {
                    out.push((output, input));
                }
            }
        }
        if outputs {
            for output in self.outputs()? {
                for input in output.connected_inputs()? {
                    out.push((output.clone(), input));
                }
            }
        }
        Ok(out)
    }

    pub fn rename(&self, name: &str) -> FuResult<()> {
        self.set_attrs(Attrs::from([
            ("TOOLB_NameSet".to_string(), Value::Bool(true)),
            ("TOOLS_Name".to_string(), Value::from(name)),
        ]))
    }

    /// Revert to the automatic internal name.
    pub fn clear_name(&self) -> FuResult<()> {
        self.set_attrs(Attrs::from([
            ("TOOLB_NameSet".to_string(), Value::Bool(false)),
            ("TOOLS_Name".to_string(), Value::from("")),
        ]))
    }

    /// Remove the tool from its composition. The host releases the handle, so the wrapper is
    /// consumed; other wrappers of the same tool become stale.
    pub fn delete(self) -> FuResult<()> {
        self.handle.call("Delete", vec![]).map(|_| ())
    }

    /// Refresh the tool's user controls.
    ///
    /// The host reissues the tool's handle on refresh; this wrapper is rebound to the new one,
    /// while other wrappers of the same tool keep the stale handle.
    pub fn refresh(&mut self) -> FuResult<()> {
        let new = self.handle.call("Refresh", vec![])?;
        if let Some(id) = new.as_handle() {
            tracing::debug!(old = %self.handle.id(), new = %id, "tool handle reissued");
            self.handle.rebind(id);
        }
        Ok(())
    }

    /// Group this tool belongs to, if any.
    pub fn parent(&self) -> FuResult<Option<Tool>> {
        self.handle.resolve_opt(self.handle.get("ParentTool")?)
    }

    /// Save settings to a `.setting` file (returns success) or, without a path, return them.
    pub fn save_settings(&self, path: Option<&str>) -> FuResult<Value> {
        let args = path.map(Value::from).into_iter().collect();
        self.handle.call("SaveSettings", args)
    }

    /// Load a `.setting` file path or a settings table.
    pub fn load_settings(&self, settings: impl Into<Value>) -> FuResult<()> {
        self.handle
            .call("LoadSettings", vec![settings.into()])
            .map(|_| ())
    }

    pub fn text_color(&self) -> FuResult<Option<Color>> {
        Color::from_value(&self.handle.get("TextColor")?)
    }

    /// `None` resets to the default color.
    pub fn set_text_color(&self, color: Option<Color>) -> FuResult<()> {
        self.handle
            .set("TextColor", color.map_or(Value::Nil, Color::to_value))
    }

    pub fn tile_color(&self) -> FuResult<Option<Color>> {
        Color::from_value(&self.handle.get("TileColor")?)
    }

    /// `None` resets to the default color.
    pub fn set_tile_color(&self, color: Option<Color>) -> FuResult<()> {
        self.handle
            .set("TileColor", color.map_or(Value::Nil, Color::to_value))
    }

    /// Keyframe times of the tool itself (not of its inputs), in order.
    ///
    /// Most tools only report the start and end of their valid region.
    pub fn keyframes(&self) -> FuResult<Option<Vec<f64>>> {
        let keys = self.handle.call("GetKeyFrames", vec![])?;
        if !keys.is_truthy() {
            return Ok(None);
        }
        keys.number_seq("GetKeyFrames").map(Some)
    }
}

impl PartialEq for Tool {
    fn eq(&self, other: &Self) -> bool {
        match (self.name(), other.name()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, f)
    }
}
