use crate::{
    foundation::core::{FlowPos, Value},
    foundation::error::FuResult,
    objects::{
        node::{Object, concrete_wrapper, fmt_named},
        tool::Tool,
    },
    remote::host::RemoteHandle,
};

#[derive(Clone, Debug)]
/// Node-graph view of a composition (`FlowView`).
pub struct FlowView {
    handle: RemoteHandle,
}

concrete_wrapper!(FlowView);

fn tool_arg(tool: &Tool) -> Value {
    Value::Handle(tool.handle().id())
}

impl FlowView {
    pub fn set_pos(&self, tool: &Tool, pos: FlowPos) -> FuResult<()> {
        self.handle
            .call(
                "SetPos",
                vec![tool_arg(tool), Value::Number(pos.x), Value::Number(pos.y)],
            )
            .map(|_| ())
    }

    pub fn pos(&self, tool: &Tool) -> FuResult<FlowPos> {
        FlowPos::from_value(&self.handle.call("GetPosTable", vec![tool_arg(tool)])?)
    }

    /// Queue a move; nothing happens until [`FlowView::flush_set_pos_queue`].
    ///
    /// Cheaper than repeated [`FlowView::set_pos`] when moving many tools.
    pub fn queue_set_pos(&self, tool: &Tool, pos: FlowPos) -> FuResult<()> {
        self.handle
            .call(
                "QueueSetPos",
                vec![tool_arg(tool), Value::Number(pos.x), Value::Number(pos.y)],
            )
            .map(|_| ())
    }

    /// Apply every queued move.
    pub fn flush_set_pos_queue(&self) -> FuResult<()> {
        self.handle.call("FlushSetPosQueue", vec![]).map(|_| ())
    }

    /// Current zoom; 1.0 is 100%.
    pub fn scale(&self) -> FuResult<f64> {
        self.handle.call("GetScale", vec![])?.expect_f64("GetScale")
    }

    pub fn set_scale(&self, scale: f64) -> FuResult<()> {
        self.handle
            .call("SetScale", vec![Value::Number(scale)])
            .map(|_| ())
    }

    /// Rescale and reposition so every tool is visible.
    pub fn frame_all(&self) -> FuResult<()> {
        self.handle.call("FrameAll", vec![]).map(|_| ())
    }

    /// Add `tool` to (or with `state == false` remove it from) the selection.
    /// `None` clears the selection.
    pub fn select(&self, tool: Option<&Tool>, state: bool) -> FuResult<()> {
        let args = match tool {
            None => vec![],
            Some(t) => vec![tool_arg(t), Value::Bool(state)],
        };
        self.handle.call("Select", args).map(|_| ())
    }
}

impl std::fmt::Display for FlowView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, f)
    }
}
