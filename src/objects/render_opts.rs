use crate::foundation::core::{Attrs, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Output resize mode for a render (`SizeType`).
pub enum SizeType {
    /// Custom size; only honored by preview savers during preview renders.
    Custom,
    /// Use the preferences setting.
    Prefs,
    /// Full size.
    Full,
    /// Half size.
    Half,
    /// Third size.
    Third,
    /// Quarter size.
    Quarter,
}

impl SizeType {
    fn code(self) -> i32 {
        match self {
            SizeType::Custom => -1,
            SizeType::Prefs => 0,
            SizeType::Full => 1,
            SizeType::Half => 2,
            SizeType::Third => 3,
            SizeType::Quarter => 4,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Optional render settings; `None` fields fall back to the composition's own settings.
pub struct RenderOpts {
    /// First frame to render.
    pub start: Option<f64>,
    /// Last frame to render.
    pub end: Option<f64>,
    /// High quality (HiQ).
    pub high_quality: Option<bool>,
    /// Render all tools, even those not required by a saver.
    pub render_all: Option<bool>,
    /// Motion blur where tools request it.
    pub motion_blur: Option<bool>,
    /// Output resize mode.
    pub size_type: Option<SizeType>,
    /// Width for custom preview sizes.
    pub width: Option<u32>,
    /// Height for custom preview sizes.
    pub height: Option<u32>,
    /// Keep frame aspect for custom preview sizes.
    pub keep_aspect: Option<bool>,
    /// Render one out of every `steps` frames.
    pub step_render: Option<bool>,
    /// Step size when `step_render` is on.
    pub steps: Option<u32>,
    /// Render on the network.
    pub use_network: Option<bool>,
    /// Network slave groups (e.g. `"all"`).
    pub groups: Option<String>,
    /// Raw render flags (262144 is used for preview renders).
    pub flags: Option<f64>,
    /// Name of a single tool to render.
    pub tool: Option<String>,
    /// Frame range string, e.g. `"1..10,20"`.
    pub frame_range: Option<String>,
}

impl RenderOpts {
    /// Host argument table, including the mandatory `Wait` key.
    pub fn to_host_args(&self, wait: bool) -> Attrs {
        let mut out = Attrs::new();
        let mut put = |key: &str, v: Option<Value>| {
            if let Some(v) = v {
                out.insert(key.to_string(), v);
            }
        };
        put("Start", self.start.map(Value::Number));
        put("End", self.end.map(Value::Number));
        put("HiQ", self.high_quality.map(Value::Bool));
        put("RenderAll", self.render_all.map(Value::Bool));
        put("MotionBlur", self.motion_blur.map(Value::Bool));
        put("SizeType", self.size_type.map(|s| Value::from(s.code())));
        put("Width", self.width.map(Value::from));
        put("Height", self.height.map(Value::from));
        put("KeepAspect", self.keep_aspect.map(Value::Bool));
        put("StepRender", self.step_render.map(Value::Bool));
        put("Steps", self.steps.map(Value::from));
        put("UseNetwork", self.use_network.map(Value::Bool));
        put("Groups", self.groups.clone().map(Value::Text));
        put("Flags", self.flags.map(Value::Number));
        put("Tool", self.tool.clone().map(Value::Text));
        put("FrameRange", self.frame_range.clone().map(Value::Text));
        put("Wait", Some(Value::Bool(wait)));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/objects/render_opts.rs"]
mod tests;
