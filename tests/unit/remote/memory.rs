use super::*;

#[test]
fn snapshot_json_uses_string_ids_and_handle_objects() {
    let json = r#"{
        "objects": {
            "1": { "label": "Comp", "attrs": { "COMPS_FileName": "a.comp" },
                   "props": { "ActiveTool": { "$handle": 2 } } },
            "2": { "label": "Blur1", "attrs": { "TOOLS_Name": "Blur1" } }
        },
        "current_composition": 1
    }"#;
    let snap = HostSnapshot::from_json(json).unwrap();
    assert_eq!(snap.current_composition, Some(HandleId(1)));
    assert_eq!(snap.current_application, None);
    let comp = &snap.objects[&HandleId(1)];
    assert_eq!(
        comp.props.get("ActiveTool"),
        Some(&Value::Handle(HandleId(2)))
    );

    let host = InMemoryHost::from_snapshot(snap);
    let next = host.insert(ObjectRecord::default()).unwrap();
    assert_eq!(next, HandleId(3));
}

#[test]
fn malformed_snapshot_is_a_serde_error() {
    let err = HostSnapshot::from_json("{ \"objects\": 3 }").unwrap_err();
    assert!(matches!(err, FuError::Serde(_)));
}

#[test]
fn canned_methods_take_precedence() {
    let host = InMemoryHost::new();
    let mut rec = ObjectRecord::default();
    rec.methods
        .insert("GetID".to_string(), Value::from("Canned"));
    rec.props.insert("ID".to_string(), Value::from("Prop"));
    let id = host.insert(rec).unwrap();
    assert_eq!(host.call(id, "GetID", vec![]).unwrap(), Value::from("Canned"));
}

#[test]
fn calls_are_recorded_in_order() {
    let host = InMemoryHost::new();
    let id = host.insert(ObjectRecord::default()).unwrap();
    host.call(id, "Foo", vec![Value::Number(1.0)]).unwrap();
    host.call(id, "Bar", vec![]).unwrap();
    let calls = host.calls().unwrap();
    assert_eq!(
        calls.iter().map(|c| c.method.as_str()).collect::<Vec<_>>(),
        vec!["Foo", "Bar"]
    );
    assert_eq!(calls[0].args, vec![Value::Number(1.0)]);
    assert_eq!(host.calls_to("Bar").unwrap().len(), 1);
}

#[test]
fn dead_handles_fail_as_remote_errors() {
    let host = InMemoryHost::new();
    assert!(!host.is_remote_handle(HandleId(42)));
    let err = host.get_attrs(HandleId(42)).unwrap_err();
    assert!(matches!(err, FuError::Remote(_)));
}

#[test]
fn name_prop_falls_back_to_name_attribute() {
    let host = InMemoryHost::new();
    let comp = host.add_composition("shot.comp").unwrap();
    let tool = host.add_tool(comp, "Merge1", "Merge").unwrap();
    assert_eq!(host.get_prop(tool, "Name").unwrap(), Value::from("Merge1"));
}

#[test]
fn index_keys_accept_numbers_and_text() {
    let host = InMemoryHost::new();
    let id = host.insert(ObjectRecord::default()).unwrap();
    host.index_set(id, Value::Number(12.0), Value::from("x"))
        .unwrap();
    assert_eq!(
        host.index_get(id, &Value::from("12")).unwrap(),
        Value::from("x")
    );
    assert!(host.index_get(id, &Value::Bool(true)).is_err());
}

#[test]
fn refresh_reissues_the_handle_and_updates_references() {
    let host = InMemoryHost::new();
    let comp = host.add_composition("shot.comp").unwrap();
    let tool = host.add_tool(comp, "Blur1", "Blur").unwrap();
    let new = host.call(tool, "Refresh", vec![]).unwrap();
    let new = new.as_handle().unwrap();
    assert_ne!(new, tool);
    assert!(!host.is_remote_handle(tool));
    let tools = host.get_prop(comp, "Tools").unwrap();
    assert_eq!(tools.seq_values(), vec![&Value::Handle(new)]);
}

#[test]
fn ambient_slots_feed_default_lookup() {
    let host = InMemoryHost::new();
    let app = host.add_application(18.0, 100.0).unwrap();
    let comp = host.add_composition("a.comp").unwrap();
    assert_eq!(
        host.default_handle(DefaultSlot::CurrentApplication),
        Some(app)
    );
    assert_eq!(host.default_handle(DefaultSlot::CurrentComposition), None);
    host.set_current_composition(Some(comp)).unwrap();
    assert_eq!(
        host.default_handle(DefaultSlot::CurrentComposition),
        Some(comp)
    );
}

#[test]
fn snapshot_round_trips_through_json() {
    let host = InMemoryHost::new();
    let comp = host.add_composition("a.comp").unwrap();
    host.set_current_composition(Some(comp)).unwrap();
    let snap = host.snapshot().unwrap();
    let back = HostSnapshot::from_json(&snap.to_json_pretty().unwrap()).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn non_finite_numbers_are_not_written_as_null() {
    let host = InMemoryHost::new();
    let id = host.insert(ObjectRecord::default()).unwrap();
    host.update(id, |r| {
        r.props.insert(
            "Range".to_string(),
            Value::list([Value::Number(0.0), Value::Number(f64::NAN)]),
        );
    })
    .unwrap();
    let err = host.snapshot().unwrap().to_json_pretty().unwrap_err();
    assert!(matches!(err, FuError::Serde(ref msg) if msg.contains("Range")), "{err}");

    host.update(id, |r| {
        r.props
            .insert("Range".to_string(), Value::Number(f64::INFINITY));
    })
    .unwrap();
    assert!(host.snapshot().unwrap().to_json_pretty().is_err());
}

#[test]
fn poisoned_state_reports_remote_errors() {
    let host = InMemoryHost::new();
    let id = host.insert(ObjectRecord::default()).unwrap();
    let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = host.update::<()>(id, |_| panic!("poison the state"));
    }));
    assert!(panicked.is_err());

    assert!(!host.is_remote_handle(id));
    assert!(matches!(host.get_attrs(id), Err(FuError::Remote(_))));
    assert!(matches!(host.calls(), Err(FuError::Remote(_))));
}

#[test]
fn builders_share_one_registry_entry_per_class() {
    let host = InMemoryHost::new();
    let comp = host.add_composition("a.comp").unwrap();
    let blur1 = host.add_tool(comp, "Blur1", "Blur").unwrap();
    let blur2 = host.add_tool(comp, "Blur2", "Blur").unwrap();
    let merge = host.add_tool(comp, "Merge1", "Merge").unwrap();

    let reg = |id| host.call(id, "GetReg", vec![]).unwrap().as_handle().unwrap();
    assert_eq!(reg(blur1), reg(blur2));
    assert_ne!(reg(blur1), reg(merge));
    assert_eq!(host.add_registry("Blur", "Blur").unwrap(), reg(blur1));
    assert_eq!(
        host.get_attrs(reg(merge)).unwrap()["REGS_ID"],
        Value::from("Merge")
    );
}
