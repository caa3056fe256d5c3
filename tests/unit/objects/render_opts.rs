use super::*;

#[test]
fn unset_fields_are_omitted() {
    let args = RenderOpts::default().to_host_args(false);
    assert_eq!(args.len(), 1);
    assert_eq!(args.get("Wait"), Some(&Value::Bool(false)));
}

#[test]
fn fields_use_host_key_names() {
    let opts = RenderOpts {
        start: Some(1.0),
        end: Some(10.0),
        high_quality: Some(true),
        size_type: Some(SizeType::Half),
        steps: Some(5),
        flags: Some(262144.0),
        tool: Some("Saver1".to_string()),
        ..RenderOpts::default()
    };
    let args = opts.to_host_args(true);
    assert_eq!(args.get("Start"), Some(&Value::Number(1.0)));
    assert_eq!(args.get("End"), Some(&Value::Number(10.0)));
    assert_eq!(args.get("HiQ"), Some(&Value::Bool(true)));
    assert_eq!(args.get("SizeType"), Some(&Value::Number(2.0)));
    assert_eq!(args.get("Steps"), Some(&Value::Number(5.0)));
    assert_eq!(args.get("Flags"), Some(&Value::Number(262144.0)));
    assert_eq!(args.get("Tool"), Some(&Value::from("Saver1")));
    assert_eq!(args.get("Wait"), Some(&Value::Bool(true)));
    assert!(!args.contains_key("start"));
    assert!(!args.keys().any(|k| k.ends_with(' ')));
}

#[test]
fn custom_size_maps_to_negative_code() {
    let opts = RenderOpts {
        size_type: Some(SizeType::Custom),
        ..RenderOpts::default()
    };
    assert_eq!(
        opts.to_host_args(false).get("SizeType"),
        Some(&Value::Number(-1.0))
    );
}

#[test]
fn opts_deserialize_from_partial_json() {
    let opts: RenderOpts =
        serde_json::from_str(r#"{"start": 1, "end": 5, "size_type": "Quarter"}"#).unwrap();
    assert_eq!(opts.start, Some(1.0));
    assert_eq!(opts.size_type, Some(SizeType::Quarter));
    assert_eq!(opts.width, None);
}
