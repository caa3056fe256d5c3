use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    connect::{ConnectOpts, ScriptAppConnector},
    foundation::core::{Attrs, HandleId, Value},
    foundation::error::{FuError, FuResult},
    remote::ambient::{AmbientDefaults, AmbientSlots, DefaultSlot},
    remote::host::RemoteHost,
    resolve::resolver::Resolver,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// State of one object of an [`InMemoryHost`].
pub struct ObjectRecord {
    /// Debug label (`str()` of the handle on a real host).
    pub label: String,
    /// Attribute dictionary returned by `GetAttrs`.
    pub attrs: Attrs,
    /// Named properties (`Composition`, `TileColor`, `Inputs`, ...).
    pub props: BTreeMap<String, Value>,
    /// Index table: input ids on tools, times on inputs, tool ids on flow views.
    pub items: BTreeMap<String, Value>,
    /// Persistent data written with `SetData`.
    pub data: BTreeMap<String, Value>,
    /// Canned method results; these take precedence over built-in behavior.
    pub methods: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Serializable content of an [`InMemoryHost`].
pub struct HostSnapshot {
    /// Every live object by handle id.
    pub objects: BTreeMap<HandleId, ObjectRecord>,
    /// Ambient current composition.
    pub current_composition: Option<HandleId>,
    /// Ambient current application.
    pub current_application: Option<HandleId>,
}

impl HostSnapshot {
    pub fn from_json(json: &str) -> FuResult<Self> {
        serde_json::from_str(json).map_err(|e| FuError::serde(format!("host snapshot: {e}")))
    }

    /// Pretty JSON form.
    ///
    /// JSON has no NaN or infinity, so a snapshot holding a non-finite number is rejected
    /// rather than written as `null`.
    pub fn to_json_pretty(&self) -> FuResult<String> {
        for (id, rec) in &self.objects {
            let values = rec
                .attrs
                .iter()
                .chain(&rec.props)
                .chain(&rec.items)
                .chain(&rec.data)
                .chain(&rec.methods);
            for (key, value) in values {
                if has_non_finite(value) {
                    return Err(FuError::serde(format!(
                        "host snapshot: {id} '{key}' holds a non-finite number"
                    )));
                }
            }
        }
        serde_json::to_string_pretty(self).map_err(|e| FuError::serde(e.to_string()))
    }
}

fn has_non_finite(v: &Value) -> bool {
    match v {
        Value::Number(n) => !n.is_finite(),
        Value::Table(t) => t.values().any(has_non_finite),
        _ => false,
    }
}

#[derive(Clone, Debug, PartialEq)]
/// One method invocation observed by an [`InMemoryHost`].
pub struct CallRecord {
    pub handle: HandleId,
    pub method: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Default)]
struct HostState {
    objects: BTreeMap<HandleId, ObjectRecord>,
    ambient: AmbientSlots,
    next_id: u64,
    queued_pos: Vec<(HandleId, Value, Value)>,
    calls: Vec<CallRecord>,
}

fn key_string(key: &Value) -> FuResult<String> {
    match key {
        Value::Text(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Handle(h) => Ok(h.0.to_string()),
        other => Err(FuError::remote(format!(
            "cannot index with a {} key",
            other.type_name()
        ))),
    }
}

fn list_push(list: &mut Value, item: Value) {
    let mut items: Vec<Value> = list.seq_values().into_iter().cloned().collect();
    items.push(item);
    *list = Value::list(items);
}

fn list_remove(list: &mut Value, item: &Value) {
    let items: Vec<Value> = list
        .seq_values()
        .into_iter()
        .filter(|v| *v != item)
        .cloned()
        .collect();
    *list = Value::list(items);
}

fn replace_handle(v: &mut Value, old: HandleId, new: HandleId) {
    match v {
        Value::Handle(h) if *h == old => *h = new,
        Value::Table(t) => t.values_mut().for_each(|v| replace_handle(v, old, new)),
        _ => {}
    }
}

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or_default()
}

fn handle_arg(args: &[Value], i: usize, method: &str) -> FuResult<HandleId> {
    arg(args, i)
        .as_handle()
        .ok_or_else(|| FuError::remote(format!("{method}: argument {} must be a handle", i + 1)))
}

impl HostState {
    fn record(&self, id: HandleId) -> FuResult<&ObjectRecord> {
        self.objects
            .get(&id)
            .ok_or_else(|| FuError::remote(format!("{id} is not a live object")))
    }

    fn record_mut(&mut self, id: HandleId) -> FuResult<&mut ObjectRecord> {
        self.objects
            .get_mut(&id)
            .ok_or_else(|| FuError::remote(format!("{id} is not a live object")))
    }

    fn alloc(&mut self, record: ObjectRecord) -> HandleId {
        self.next_id += 1;
        let id = HandleId(self.next_id);
        self.objects.insert(id, record);
        id
    }

    fn prop(&self, id: HandleId, name: &str) -> FuResult<Value> {
        Ok(self.record(id)?.props.get(name).cloned().unwrap_or_default())
    }

    fn push_prop(&mut self, id: HandleId, prop: &str, item: Value) -> FuResult<()> {
        let list = self.record_mut(id)?.props.entry(prop.to_string()).or_default();
        list_push(list, item);
        Ok(())
    }

    fn display_name(rec: &ObjectRecord) -> Value {
        if let Some(name) = rec.props.get("Name") {
            return name.clone();
        }
        rec.attrs
            .iter()
            .find(|(k, _)| k.ends_with("S_Name"))
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    /// Registry entry for `reg_id`, created on first use.
    fn registry(&mut self, reg_id: &str, name: &str) -> HandleId {
        let wanted = Value::from(reg_id);
        let existing = self
            .objects
            .iter()
            .find(|(_, r)| r.attrs.get("REGS_ID") == Some(&wanted))
            .map(|(id, _)| *id);
        if let Some(id) = existing {
            return id;
        }

        let mut rec = ObjectRecord {
            label: format!("Registry ({reg_id})"),
            ..ObjectRecord::default()
        };
        rec.attrs.extend([
            ("REGS_ID".to_string(), wanted),
            ("REGS_Name".to_string(), Value::from(name)),
        ]);
        rec.props.insert("ID".to_string(), Value::from(reg_id));
        self.alloc(rec)
    }

    fn new_tool(&mut self, comp: HandleId, name: &str, reg_id: &str) -> FuResult<HandleId> {
        let reg = self.registry(reg_id, reg_id);
        let mut rec = ObjectRecord {
            label: format!("{name} ({reg_id})"),
            ..ObjectRecord::default()
        };
        rec.attrs.extend([
            ("TOOLS_Name".to_string(), Value::from(name)),
            ("TOOLS_RegID".to_string(), Value::from(reg_id)),
            ("TOOLB_NameSet".to_string(), Value::Bool(false)),
            ("TOOLB_Selected".to_string(), Value::Bool(false)),
            ("TOOLB_Visible".to_string(), Value::Bool(true)),
        ]);
        rec.props.extend([
            ("Composition".to_string(), Value::Handle(comp)),
            ("ID".to_string(), Value::from(reg_id)),
            ("Registry".to_string(), Value::Handle(reg)),
            ("Inputs".to_string(), Value::list([])),
            ("Outputs".to_string(), Value::list([])),
            ("MainInputs".to_string(), Value::list([])),
            ("MainOutputs".to_string(), Value::list([])),
        ]);
        let id = self.alloc(rec);
        self.push_prop(comp, "Tools", Value::Handle(id))?;
        Ok(id)
    }

    fn new_link(
        &mut self,
        tool: HandleId,
        side: &str,
        link_id: &str,
        data_type: &str,
    ) -> FuResult<HandleId> {
        let (prefix, list, main, class) = match side {
            "input" => ("INP", "Inputs", "MainInputs", "Input"),
            _ => ("OUT", "Outputs", "MainOutputs", "Output"),
        };
        let reg = self.registry(class, class);
        let tool_name = self.prop_name(tool)?;
        let mut rec = ObjectRecord {
            label: format!("{side} {tool_name}.{link_id}"),
            ..ObjectRecord::default()
        };
        rec.attrs.extend([
            (format!("{prefix}S_ID"), Value::from(link_id)),
            (format!("{prefix}S_Name"), Value::from(link_id)),
            (format!("{prefix}S_DataType"), Value::from(data_type)),
        ]);
        rec.props.extend([
            ("Tool".to_string(), Value::Handle(tool)),
            ("ID".to_string(), Value::from(link_id)),
            ("Registry".to_string(), Value::Handle(reg)),
        ]);
        let id = self.alloc(rec);

        self.push_prop(tool, list, Value::Handle(id))?;
        if data_type == "Image" {
            self.push_prop(tool, main, Value::Handle(id))?;
        }
        if side == "input" {
            self.record_mut(tool)?
                .items
                .insert(link_id.to_string(), Value::Handle(id));
        }
        Ok(id)
    }

    fn prop_name(&self, id: HandleId) -> FuResult<String> {
        Ok(Self::display_name(self.record(id)?)
            .as_str()
            .unwrap_or_default()
            .to_string())
    }

    fn comp_of(&self, id: HandleId) -> FuResult<Value> {
        let rec = self.record(id)?;
        if let Some(comp) = rec.props.get("Composition") {
            return Ok(comp.clone());
        }
        if rec.attrs.keys().any(|k| k.starts_with("COMP")) {
            return Ok(Value::Handle(id));
        }
        match rec.props.get("Tool").and_then(Value::as_handle) {
            Some(tool) => self.comp_of(tool),
            None => Ok(Value::Nil),
        }
    }

    fn connected_inputs(&self, output: HandleId) -> Value {
        Value::list(
            self.objects
                .iter()
                .filter(|(_, r)| r.props.get("ConnectedOutput") == Some(&Value::Handle(output)))
                .map(|(id, _)| Value::Handle(*id)),
        )
    }

    fn nth(&self, id: HandleId, prop: &str, index: &Value) -> FuResult<Value> {
        let list = self.prop(id, prop)?;
        let key = key_string(index)?;
        Ok(list
            .as_table()
            .and_then(|t| t.get(&key))
            .cloned()
            .unwrap_or_default())
    }

    fn set_tool_selected(&mut self, tool: HandleId, state: bool) -> FuResult<()> {
        self.record_mut(tool)?
            .attrs
            .insert("TOOLB_Selected".to_string(), Value::Bool(state));
        Ok(())
    }

    fn new_composition(&mut self, file_name: &str) -> FuResult<HandleId> {
        let reg = self.registry("Composition", "Composition");
        let mut rec = ObjectRecord {
            label: format!("Composition ({file_name})"),
            ..ObjectRecord::default()
        };
        rec.attrs.extend([
            ("COMPS_FileName".to_string(), Value::from(file_name)),
            ("COMPS_Name".to_string(), Value::from(file_name)),
            ("COMPB_Locked".to_string(), Value::Bool(false)),
        ]);
        rec.props.extend([
            ("CurrentTime".to_string(), Value::Number(0.0)),
            ("Tools".to_string(), Value::list([])),
            ("Registry".to_string(), Value::Handle(reg)),
        ]);
        let comp = self.alloc(rec);

        let mut flow = ObjectRecord {
            label: "FlowView".to_string(),
            ..ObjectRecord::default()
        };
        flow.attrs
            .insert("VIEWS_Name".to_string(), Value::from("FlowView"));
        flow.props
            .insert("Composition".to_string(), Value::Handle(comp));
        flow.props.insert("Scale".to_string(), Value::Number(1.0));
        let flow = self.alloc(flow);

        let mut frame = ObjectRecord {
            label: "ChildFrame".to_string(),
            ..ObjectRecord::default()
        };
        frame.props.insert("FlowView".to_string(), Value::Handle(flow));
        let frame = self.alloc(frame);

        self.record_mut(comp)?
            .props
            .insert("CurrentFrame".to_string(), Value::Handle(frame));
        Ok(comp)
    }

    fn call(&mut self, id: HandleId, method: &str, args: &[Value]) -> FuResult<Value> {
        let rec = self.record(id)?;
        if let Some(canned) = rec.methods.get(method) {
            return Ok(canned.clone());
        }

        let out = match method {
            "SetData" => {
                let name = arg(args, 0).expect_text("SetData name")?;
                let value = arg(args, 1);
                self.record_mut(id)?.data.insert(name, value);
                Value::Nil
            }
            "GetData" => {
                let name = arg(args, 0).expect_text("GetData name")?;
                rec.data.get(&name).cloned().unwrap_or_default()
            }
            "GetID" => rec.props.get("ID").cloned().unwrap_or_default(),
            "GetHelp" => rec
                .props
                .get("Help")
                .cloned()
                .unwrap_or_else(|| Value::from("")),
            "GetReg" => rec.props.get("Registry").cloned().unwrap_or_default(),
            "Comp" => self.comp_of(id)?,
            "GetTool" => rec.props.get("Tool").cloned().unwrap_or_default(),

            "ConnectTo" => {
                let target = arg(args, 0);
                let props = &mut self.record_mut(id)?.props;
                if target.is_nil() {
                    props.remove("ConnectedOutput");
                } else {
                    props.insert("ConnectedOutput".to_string(), target);
                }
                Value::Bool(true)
            }
            "GetConnectedOutput" => rec
                .props
                .get("ConnectedOutput")
                .cloned()
                .unwrap_or_default(),
            "GetConnectedInputs" => self.connected_inputs(id),

            "FindMainInput" => self.nth(id, "MainInputs", &arg(args, 0))?,
            "FindMainOutput" => self.nth(id, "MainOutputs", &arg(args, 0))?,
            "GetInputList" => self.prop(id, "Inputs")?,
            "GetOutputList" => self.prop(id, "Outputs")?,
            "GetKeyFrames" => rec.props.get("KeyFrames").cloned().unwrap_or_default(),
            "GetExpression" => rec.props.get("Expression").cloned().unwrap_or_default(),
            "SetExpression" => {
                let expr = arg(args, 0);
                self.record_mut(id)?
                    .props
                    .insert("Expression".to_string(), expr);
                Value::Nil
            }
            "GetValue" => {
                let key = key_string(&arg(args, 0))?;
                let value = rec
                    .items
                    .get(&key)
                    .or_else(|| rec.props.get("Value"))
                    .cloned()
                    .unwrap_or_default();
                let attrs = rec
                    .props
                    .get("ValueAttrs")
                    .cloned()
                    .unwrap_or_else(|| Value::Table(Attrs::new()));
                Value::list([value, attrs])
            }
            "GetDoD" => rec.props.get("DoD").cloned().unwrap_or_default(),

            "GetToolList" => {
                let selected = arg(args, 0).is_truthy();
                let reg_id = arg(args, 1);
                let tools = self.prop(id, "Tools")?;
                let picked: Vec<Value> = tools
                    .seq_values()
                    .into_iter()
                    .filter(|t| {
                        let Some(attrs) = t
                            .as_handle()
                            .and_then(|h| self.objects.get(&h))
                            .map(|r| &r.attrs)
                        else {
                            return false;
                        };
                        let sel_ok = !selected
                            || attrs.get("TOOLB_Selected").is_some_and(Value::is_truthy);
                        let type_ok =
                            reg_id.is_nil() || attrs.get("TOOLS_RegID") == Some(&reg_id);
                        sel_ok && type_ok
                    })
                    .cloned()
                    .collect();
                Value::list(picked)
            }
            "AddTool" => {
                let reg_id = arg(args, 0).expect_text("AddTool type")?;
                let count = self
                    .prop(id, "Tools")?
                    .seq_values()
                    .into_iter()
                    .filter_map(|t| t.as_handle())
                    .filter_map(|h| self.objects.get(&h))
                    .filter(|r| r.attrs.get("TOOLS_RegID") == Some(&Value::from(reg_id.as_str())))
                    .count();
                let name = format!("{reg_id}{}", count + 1);
                let active = rec.props.get("ActiveTool").and_then(Value::as_handle);
                let insert = args.len() >= 3
                    && arg(args, 1).as_f64() == Some(-32768.0)
                    && arg(args, 2).as_f64() == Some(-32768.0);

                let tool = self.new_tool(id, &name, &reg_id)?;
                let input = self.new_link(tool, "input", "Input", "Image")?;
                self.new_link(tool, "output", "Output", "Image")?;

                if let (true, Some(active)) = (insert, active) {
                    let out = self.nth(active, "MainOutputs", &Value::Number(1.0))?;
                    if !out.is_nil() {
                        self.record_mut(input)?
                            .props
                            .insert("ConnectedOutput".to_string(), out);
                    }
                }
                self.record_mut(id)?
                    .props
                    .insert("ActiveTool".to_string(), Value::Handle(tool));
                Value::Handle(tool)
            }
            "SetActiveTool" => {
                let tool = arg(args, 0);
                let props = &mut self.record_mut(id)?.props;
                if tool.is_nil() {
                    props.remove("ActiveTool");
                } else {
                    props.insert("ActiveTool".to_string(), tool);
                }
                Value::Nil
            }
            "Delete" => {
                let comp = self.comp_of(id)?;
                if let Some(comp) = comp.as_handle() {
                    let props = &mut self.record_mut(comp)?.props;
                    if let Some(tools) = props.get_mut("Tools") {
                        list_remove(tools, &Value::Handle(id));
                    }
                    if props.get("ActiveTool") == Some(&Value::Handle(id)) {
                        props.remove("ActiveTool");
                    }
                }
                self.objects.remove(&id);
                Value::Nil
            }
            "Refresh" => {
                let moved = self.objects.remove(&id).unwrap_or_default();
                let new = self.alloc(moved);
                for r in self.objects.values_mut() {
                    r.props
                        .values_mut()
                        .chain(r.items.values_mut())
                        .for_each(|v| replace_handle(v, id, new));
                }
                Value::Handle(new)
            }
            "Lock" | "Unlock" => {
                let locked = method == "Lock";
                self.record_mut(id)?
                    .attrs
                    .insert("COMPB_Locked".to_string(), Value::Bool(locked));
                Value::Nil
            }
            "IsLocked" => Value::Bool(
                rec.attrs
                    .get("COMPB_Locked")
                    .is_some_and(Value::is_truthy),
            ),
            "Play" | "Stop" => {
                let playing = method == "Play";
                self.record_mut(id)?
                    .props
                    .insert("Playing".to_string(), Value::Bool(playing));
                Value::Nil
            }
            "IsPlaying" => Value::Bool(rec.props.get("Playing").is_some_and(Value::is_truthy)),
            "IsRendering" => Value::Bool(rec.props.get("Rendering").is_some_and(Value::is_truthy)),
            "Render" | "Copy" | "Paste" => Value::Bool(true),
            "SaveSettings" if args.is_empty() => Value::Table(rec.attrs.clone()),
            "SaveSettings" => Value::Bool(true),
            "LoadSettings" => {
                if let Value::Table(settings) = arg(args, 0) {
                    self.record_mut(id)?.attrs.extend(settings);
                }
                Value::Nil
            }

            "SetPos" => {
                let tool = handle_arg(args, 0, method)?;
                let pos = Value::list([arg(args, 1), arg(args, 2)]);
                self.record_mut(id)?.items.insert(tool.0.to_string(), pos);
                Value::Nil
            }
            "GetPos" | "GetPosTable" => {
                let tool = handle_arg(args, 0, method)?;
                rec.items
                    .get(&tool.0.to_string())
                    .cloned()
                    .unwrap_or_else(|| Value::list([Value::Number(0.0), Value::Number(0.0)]))
            }
            "QueueSetPos" => {
                handle_arg(args, 0, method)?;
                self.queued_pos.push((
                    id,
                    arg(args, 0),
                    Value::list([arg(args, 1), arg(args, 2)]),
                ));
                Value::Bool(true)
            }
            "FlushSetPosQueue" => {
                let (mine, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queued_pos)
                    .into_iter()
                    .partition(|(flow, _, _)| *flow == id);
                self.queued_pos = rest;
                for (_, tool, pos) in mine {
                    let key = key_string(&tool)?;
                    self.record_mut(id)?.items.insert(key, pos);
                }
                Value::Bool(true)
            }
            "GetScale" => rec
                .props
                .get("Scale")
                .cloned()
                .unwrap_or(Value::Number(1.0)),
            "SetScale" => {
                let scale = arg(args, 0);
                self.record_mut(id)?.props.insert("Scale".to_string(), scale);
                Value::Nil
            }
            "Select" => {
                if args.is_empty() {
                    let comp = self.comp_of(id)?;
                    let tools = match comp.as_handle() {
                        Some(c) => self.prop(c, "Tools")?,
                        None => Value::Nil,
                    };
                    for tool in tools.seq_values().into_iter().filter_map(Value::as_handle) {
                        self.set_tool_selected(tool, false)?;
                    }
                } else {
                    let tool = handle_arg(args, 0, method)?;
                    let state = args.get(1).is_none_or(Value::is_truthy);
                    self.set_tool_selected(tool, state)?;
                }
                Value::Nil
            }

            "GetCurrentComp" => self.ambient.composition.into(),
            "NewComp" => {
                let n = self
                    .objects
                    .values()
                    .filter(|r| r.attrs.contains_key("COMPS_FileName"))
                    .count();
                let comp = self.new_composition(&format!("Composition{}", n + 1))?;
                self.ambient.composition = Some(comp);
                Value::Handle(comp)
            }

            _ => {
                tracing::debug!(handle = %id, method, "no built-in behavior; returning nil");
                Value::Nil
            }
        };
        Ok(out)
    }
}

/// [`RemoteHost`] backed by plain in-process records.
///
/// It mimics the host's observable behavior closely enough to drive every wrapper: tools,
/// inputs, outputs and flow views keep their relationships in properties, and the common
/// methods (`AddTool`, `ConnectTo`, `GetToolList`, `SetPos`, ...) update them. Every method
/// call is recorded; see [`InMemoryHost::calls`].
#[derive(Debug, Default)]
pub struct InMemoryHost {
    state: Mutex<HostState>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: HostSnapshot) -> Self {
        let next_id = snapshot.objects.keys().map(|h| h.0).max().unwrap_or(0);
        Self {
            state: Mutex::new(HostState {
                objects: snapshot.objects,
                ambient: AmbientSlots {
                    composition: snapshot.current_composition,
                    application: snapshot.current_application,
                },
                next_id,
                ..HostState::default()
            }),
        }
    }

    /// Load a JSON [`HostSnapshot`].
    pub fn from_json(json: &str) -> FuResult<Self> {
        HostSnapshot::from_json(json).map(Self::from_snapshot)
    }

    pub fn snapshot(&self) -> FuResult<HostSnapshot> {
        let st = self.lock()?;
        Ok(HostSnapshot {
            objects: st.objects.clone(),
            current_composition: st.ambient.composition,
            current_application: st.ambient.application,
        })
    }

    /// Resolver over this host with its ambient slots installed as defaults.
    pub fn resolver(self: &Arc<Self>) -> Resolver {
        Resolver::new(self.clone()).with_defaults(self.clone())
    }

    fn lock(&self) -> FuResult<MutexGuard<'_, HostState>> {
        self.state
            .lock()
            .map_err(|_| FuError::remote("in-memory host state poisoned"))
    }

    /// Insert a raw record.
    pub fn insert(&self, record: ObjectRecord) -> FuResult<HandleId> {
        Ok(self.lock()?.alloc(record))
    }

    /// Mutate a record in place.
    pub fn update<R>(&self, id: HandleId, f: impl FnOnce(&mut ObjectRecord) -> R) -> FuResult<R> {
        let mut st = self.lock()?;
        Ok(f(st.record_mut(id)?))
    }

    /// Application object with session uuid `in-memory-<id>`; becomes the current application.
    pub fn add_application(&self, version: f64, build: f64) -> FuResult<HandleId> {
        let mut rec = ObjectRecord {
            label: "Fusion (in-memory)".to_string(),
            ..ObjectRecord::default()
        };
        rec.attrs.extend([
            ("FUSIONS_Version".to_string(), Value::from(version.to_string())),
            ("FUSIONI_NumProcessors".to_string(), Value::Number(1.0)),
        ]);
        rec.props.extend([
            ("Version".to_string(), Value::Number(version)),
            ("Build".to_string(), Value::Number(build)),
        ]);
        let mut st = self.lock()?;
        let reg = st.registry("Fusion", "Fusion");
        rec.props.insert("Registry".to_string(), Value::Handle(reg));
        let id = st.alloc(rec);
        st.record_mut(id)?
            .props
            .insert("UUID".to_string(), Value::from(format!("in-memory-{}", id.0)));
        st.ambient.application = Some(id);
        Ok(id)
    }

    /// Composition with its flow view; does not change the current composition.
    pub fn add_composition(&self, file_name: &str) -> FuResult<HandleId> {
        self.lock()?.new_composition(file_name)
    }

    /// Tool without inputs or outputs.
    pub fn add_tool(&self, comp: HandleId, name: &str, reg_id: &str) -> FuResult<HandleId> {
        self.lock()?.new_tool(comp, name, reg_id)
    }

    /// Input `id` on `tool`; image inputs also become main inputs.
    pub fn add_input(&self, tool: HandleId, id: &str, data_type: &str) -> FuResult<HandleId> {
        self.lock()?.new_link(tool, "input", id, data_type)
    }

    /// Output `id` on `tool`; image outputs also become main outputs.
    pub fn add_output(&self, tool: HandleId, id: &str, data_type: &str) -> FuResult<HandleId> {
        self.lock()?.new_link(tool, "output", id, data_type)
    }

    /// Attribute-less image value labelled `Image WxH`.
    pub fn add_image(&self, width: u32, height: u32) -> FuResult<HandleId> {
        let mut rec = ObjectRecord {
            label: format!("Image {width}x{height}"),
            ..ObjectRecord::default()
        };
        for (k, v) in [
            ("Width", f64::from(width)),
            ("Height", f64::from(height)),
            ("OriginalWidth", f64::from(width)),
            ("OriginalHeight", f64::from(height)),
            ("Depth", 3.0),
            ("XScale", 1.0),
            ("YScale", 1.0),
            ("XOffset", 0.0),
            ("YOffset", 0.0),
            ("Field", 0.0),
            ("ProxyScale", 1.0),
        ] {
            rec.props.insert(k.to_string(), Value::Number(v));
        }
        self.insert(rec)
    }

    /// Registry entry for registry id `reg_id`; an existing entry with that id is reused.
    pub fn add_registry(&self, reg_id: &str, name: &str) -> FuResult<HandleId> {
        Ok(self.lock()?.registry(reg_id, name))
    }

    pub fn set_current_composition(&self, comp: Option<HandleId>) -> FuResult<()> {
        self.lock()?.ambient.composition = comp;
        Ok(())
    }

    pub fn set_current_application(&self, app: Option<HandleId>) -> FuResult<()> {
        self.lock()?.ambient.application = app;
        Ok(())
    }

    /// Every method call so far, oldest first.
    pub fn calls(&self) -> FuResult<Vec<CallRecord>> {
        Ok(self.lock()?.calls.clone())
    }

    /// Calls of one method name, oldest first.
    pub fn calls_to(&self, method: &str) -> FuResult<Vec<CallRecord>> {
        Ok(self
            .lock()?
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect())
    }
}

impl RemoteHost for InMemoryHost {
    fn is_remote_handle(&self, id: HandleId) -> bool {
        match self.lock() {
            Ok(st) => st.objects.contains_key(&id),
            Err(e) => {
                tracing::warn!(handle = %id, error = %e, "cannot check handle");
                false
            }
        }
    }

    fn get_attrs(&self, id: HandleId) -> FuResult<Attrs> {
        Ok(self.lock()?.record(id)?.attrs.clone())
    }

    fn set_attrs(&self, id: HandleId, attrs: Attrs) -> FuResult<()> {
        self.lock()?.record_mut(id)?.attrs.extend(attrs);
        Ok(())
    }

    fn debug_label(&self, id: HandleId) -> FuResult<String> {
        Ok(self.lock()?.record(id)?.label.clone())
    }

    fn get_prop(&self, id: HandleId, name: &str) -> FuResult<Value> {
        let st = self.lock()?;
        let rec = st.record(id)?;
        match name {
            "Name" => Ok(HostState::display_name(rec)),
            _ => Ok(rec.props.get(name).cloned().unwrap_or_default()),
        }
    }

    fn set_prop(&self, id: HandleId, name: &str, value: Value) -> FuResult<()> {
        let mut st = self.lock()?;
        let props = &mut st.record_mut(id)?.props;
        if value.is_nil() {
            props.remove(name);
        } else {
            props.insert(name.to_string(), value);
        }
        Ok(())
    }

    fn index_get(&self, id: HandleId, key: &Value) -> FuResult<Value> {
        let st = self.lock()?;
        let key = key_string(key)?;
        Ok(st.record(id)?.items.get(&key).cloned().unwrap_or_default())
    }

    fn index_set(&self, id: HandleId, key: Value, value: Value) -> FuResult<()> {
        let mut st = self.lock()?;
        let key = key_string(&key)?;
        st.record_mut(id)?.items.insert(key, value);
        Ok(())
    }

    fn call(&self, id: HandleId, method: &str, args: Vec<Value>) -> FuResult<Value> {
        let mut st = self.lock()?;
        st.calls.push(CallRecord {
            handle: id,
            method: method.to_string(),
            args: args.clone(),
        });
        st.call(id, method, &args)
    }
}

impl AmbientDefaults for InMemoryHost {
    fn default_handle(&self, slot: DefaultSlot) -> Option<HandleId> {
        self.lock().ok()?.ambient.default_handle(slot)
    }
}

impl ScriptAppConnector for Arc<InMemoryHost> {
    fn script_app(&self, opts: &ConnectOpts) -> FuResult<Option<(Arc<dyn RemoteHost>, HandleId)>> {
        let st = self.lock()?;
        let Some(app) = st.ambient.application else {
            return Ok(None);
        };
        let rec = st.record(app)?;
        let label = &rec.label;
        if label.split_whitespace().next() != Some(opts.app.as_str()) {
            tracing::debug!(wanted = %opts.app, %label, "application name does not match");
            return Ok(None);
        }
        if let Some(wanted) = &opts.uuid {
            if rec.props.get("UUID").and_then(Value::as_str) != Some(wanted.as_str()) {
                tracing::debug!(%wanted, "application uuid does not match");
                return Ok(None);
            }
        }
        drop(st);
        Ok(Some((self.clone() as Arc<dyn RemoteHost>, app)))
    }

    fn current_uuid(&self) -> FuResult<Option<String>> {
        let st = self.lock()?;
        let Some(app) = st.ambient.application else {
            return Ok(None);
        };
        Ok(st
            .record(app)?
            .props
            .get("UUID")
            .and_then(Value::as_str)
            .map(str::to_owned))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/remote/memory.rs"]
mod tests;
