use super::*;

#[test]
fn list_values_come_back_in_numeric_order() {
    let items: Vec<Value> = (1..=11).map(|i| Value::Number(f64::from(i))).collect();
    let list = Value::list(items);
    let nums = list.number_seq("test").unwrap();
    assert_eq!(nums.len(), 11);
    assert_eq!(nums[1], 2.0);
    assert_eq!(nums[10], 11.0);
}

#[test]
fn json_shape_keeps_handles_distinct_from_tables() {
    let v = Value::table([
        ("tool", Value::Handle(HandleId(4))),
        ("name", Value::from("Merge1")),
        ("flag", Value::Bool(true)),
        ("none", Value::Nil),
    ]);
    let json = serde_json::to_string(&v).unwrap();
    assert!(json.contains("\"$handle\":4"));

    let back: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(back, v);

    let plain: Value = serde_json::from_str(r#"{"$handle": 2, "extra": 1}"#).unwrap();
    assert!(plain.as_table().is_some());
}

#[test]
fn integers_parse_as_numbers() {
    let v: Value = serde_json::from_str("1920").unwrap();
    assert_eq!(v, Value::Number(1920.0));
}

#[test]
fn color_uses_host_channel_keys() {
    let c = Color::new(0.5, 0.1, 0.0);
    let v = c.to_value();
    assert_eq!(v.as_table().unwrap().get("R"), Some(&Value::Number(0.5)));
    assert_eq!(Color::from_value(&v).unwrap(), Some(c));
    assert_eq!(Color::from_value(&Value::Nil).unwrap(), None);
    assert!(Color::from_value(&Value::from("red")).is_err());
}

#[test]
fn flow_pos_requires_two_numbers() {
    let v = Value::list([Value::Number(10.0), Value::Number(-3.0)]);
    assert_eq!(FlowPos::from_value(&v).unwrap(), FlowPos::new(10.0, -3.0));
    assert!(FlowPos::from_value(&Value::list([Value::Number(1.0)])).is_err());
}

#[test]
fn truthiness_follows_host_rules() {
    assert!(!Value::Nil.is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(!Value::Table(Default::default()).is_truthy());
    assert!(Value::Number(0.0).is_truthy());
    assert!(Value::Handle(HandleId(1)).is_truthy());
}
