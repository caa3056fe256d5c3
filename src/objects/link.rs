use crate::{
    coerce::coerce_input_value,
    foundation::core::{Attrs, Value},
    foundation::error::{FuError, FuResult},
    objects::{
        node::{Node, Object, concrete_wrapper, fmt_named},
        tool::Tool,
    },
    remote::host::RemoteHandle,
    resolve::{kind::Kind, resolver::Wrapper},
};

fn owning_tool(handle: &RemoteHandle) -> FuResult<Tool> {
    handle.resolve(handle.call("GetTool", vec![])?)
}

fn time_or_current(handle: &RemoteHandle, time: Option<f64>) -> FuResult<f64> {
    match time {
        Some(t) => Ok(t),
        None => owning_tool(handle)?.comp()?.current_time(),
    }
}

fn data_type(obj: &dyn Object, key: &str) -> FuResult<String> {
    obj.get_attr(key)?.expect_text(key)
}

#[derive(Clone, Debug)]
/// Incoming side of a tool: a connectable knob or a control value.
pub struct Input {
    handle: RemoteHandle,
}

concrete_wrapper!(Input);

impl Input {
    pub fn tool(&self) -> FuResult<Tool> {
        owning_tool(&self.handle)
    }

    /// Value at `time` (`None` = the composition's current time).
    pub fn value(&self, time: Option<f64>) -> FuResult<Value> {
        let time = time_or_current(&self.handle, time)?;
        self.handle.index(time)
    }

    /// Set the value at `time`, translating booleans and enum names/indices to what the
    /// input's controls expect.
    #[tracing::instrument(level = "debug", skip(self, value), fields(input = %self.handle.id()))]
    pub fn set_value(&self, value: impl Into<Value>, time: Option<f64>) -> FuResult<()> {
        let time = time_or_current(&self.handle, time)?;
        let attrs = self.get_attrs()?;
        let value = coerce_input_value(&attrs, value.into());
        self.handle.set_index(time, value)
    }

    /// Make `output` the incoming connection; `None` disconnects.
    ///
    /// The host silently ignores connections between incompatible data types.
    pub fn connect_to(&self, output: Option<&Output>) -> FuResult<()> {
        let arg = output.map_or(Value::Nil, |o| Value::Handle(o.handle.id()));
        self.handle.call("ConnectTo", vec![arg]).map(|_| ())
    }

    pub fn disconnect(&self) -> FuResult<()> {
        self.connect_to(None)
    }

    pub fn connected_output(&self) -> FuResult<Option<Output>> {
        self.handle
            .resolve_opt(self.handle.call("GetConnectedOutput", vec![])?)
    }

    /// Simple expression string; empty when none is set.
    pub fn expression(&self) -> FuResult<String> {
        match self.handle.call("GetExpression", vec![])? {
            Value::Nil => Ok(String::new()),
            v => v.expect_text("GetExpression"),
        }
    }

    pub fn set_expression(&self, expression: &str) -> FuResult<()> {
        self.handle
            .call("SetExpression", vec![Value::from(expression)])
            .map(|_| ())
    }

    /// Times at which this input has keys.
    pub fn keyframes(&self) -> FuResult<Option<Vec<f64>>> {
        let keys = self.handle.call("GetKeyFrames", vec![])?;
        if !keys.is_truthy() {
            return Ok(None);
        }
        keys.number_seq("GetKeyFrames").map(Some)
    }

    pub fn is_connected(&self) -> FuResult<bool> {
        Ok(self
            .handle
            .call("GetConnectedOutput", vec![])?
            .is_truthy())
    }

    /// Parameter type accepted (`Number`, `Point`, `Text`, `Image`, `FuID`, ...).
    pub fn data_type(&self) -> FuResult<String> {
        data_type(self, "INPS_DataType")
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, f)
    }
}

#[derive(Clone, Debug)]
/// Outgoing side of a tool; connects into any number of inputs.
pub struct Output {
    handle: RemoteHandle,
}

concrete_wrapper!(Output);

impl Output {
    pub fn tool(&self) -> FuResult<Tool> {
        owning_tool(&self.handle)
    }

    /// Evaluated value at `time`.
    pub fn value(&self, time: Option<f64>) -> FuResult<Value> {
        self.value_attrs(time).map(|(v, _)| v)
    }

    /// Evaluated value plus its attributes (`Valid`, `DataType`, `TimeCost`).
    ///
    /// Evaluating an output may render; this can be expensive.
    pub fn value_attrs(&self, time: Option<f64>) -> FuResult<(Value, Attrs)> {
        let time = time_or_current(&self.handle, time)?;
        let res = self.handle.call("GetValue", vec![Value::Number(time)])?;
        let mut parts = res.seq_values().into_iter().cloned();
        let value = parts.next().unwrap_or_default();
        let attrs = match parts.next() {
            Some(Value::Table(t)) => t,
            Some(Value::Nil) | None => Attrs::new(),
            Some(other) => {
                return Err(FuError::remote(format!(
                    "GetValue: expected attribute table, got {}",
                    other.type_name()
                )));
            }
        };
        Ok((value, attrs))
    }

    /// Time taken to evaluate this output at `time`.
    pub fn time_cost(&self, time: Option<f64>) -> FuResult<f64> {
        let (_, attrs) = self.value_attrs(time)?;
        attrs
            .get("TimeCost")
            .unwrap_or(&Value::Nil)
            .expect_f64("TimeCost")
    }

    /// Disconnect every connected input, or only those of `inputs` actually fed by this output.
    pub fn disconnect(&self, inputs: Option<&[Input]>) -> FuResult<()> {
        let connected = self.connected_inputs()?;
        let targets: Vec<&Input> = match inputs {
            None => connected.iter().collect(),
            Some(subset) => subset
                .iter()
                .filter(|i| connected.iter().any(|c| c.handle.same_object(&i.handle)))
                .collect(),
        };
        for input in targets {
            input.connect_to(None)?;
        }
        Ok(())
    }

    pub fn connected_inputs(&self) -> FuResult<Vec<Input>> {
        self.handle
            .resolve_all(self.handle.call("GetConnectedInputs", vec![])?)
    }

    /// Domain of definition: left, bottom, right, top.
    pub fn dod(&self) -> FuResult<[f64; 4]> {
        let nums = self.handle.call("GetDoD", vec![])?.number_seq("GetDoD")?;
        match nums.as_slice() {
            [l, b, r, t] => Ok([*l, *b, *r, *t]),
            _ => Err(FuError::remote(format!(
                "GetDoD: expected 4 numbers, got {}",
                nums.len()
            ))),
        }
    }

    pub fn connect_to(&self, input: &Input) -> FuResult<()> {
        input.connect_to(Some(self))
    }

    pub fn is_connected(&self) -> FuResult<bool> {
        let list = self.handle.call("GetConnectedInputs", vec![])?;
        Ok(list.seq_values().iter().any(|v| v.is_truthy()))
    }

    pub fn data_type(&self) -> FuResult<String> {
        data_type(self, "OUTS_DataType")
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, f)
    }
}

#[derive(Clone, Debug)]
/// Either side of a connection, for code that only needs the owning tool.
pub enum Link {
    /// An input.
    Input(Input),
    /// An output.
    Output(Output),
}

impl Link {
    pub fn tool(&self) -> FuResult<Tool> {
        owning_tool(self.handle())
    }
}

impl Object for Link {
    fn handle(&self) -> &RemoteHandle {
        match self {
            Link::Input(i) => &i.handle,
            Link::Output(o) => &o.handle,
        }
    }

    fn kind(&self) -> Kind {
        match self {
            Link::Input(_) => Kind::Input,
            Link::Output(_) => Kind::Output,
        }
    }
}

impl Wrapper for Link {
    const KIND: Kind = Kind::Link;

    fn from_node(node: Node) -> Result<Self, Node> {
        match node {
            Node::Input(i) => Ok(Link::Input(i)),
            Node::Output(o) => Ok(Link::Output(o)),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt_named(self, f)
    }
}
