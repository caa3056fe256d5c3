use super::*;

fn attrs(data_type: &str) -> Attrs {
    let mut a = Attrs::new();
    a.insert("INPS_DataType".to_string(), Value::from(data_type));
    a
}

fn with_table(mut a: Attrs, key: &str, entries: &[&str]) -> Attrs {
    a.insert(
        key.to_string(),
        Value::list(entries.iter().map(|e| Value::from(*e))),
    );
    a
}

#[test]
fn bools_become_numbers() {
    let a = attrs("Number");
    assert_eq!(coerce_input_value(&a, Value::Bool(true)), Value::Number(1.0));
    assert_eq!(
        coerce_input_value(&a, Value::Bool(false)),
        Value::Number(0.0)
    );
}

#[test]
fn index_on_fuid_input_becomes_id() {
    let a = with_table(
        attrs("FuID"),
        "INPIDT_ComboControl_ID",
        &["Over", "In", "Atop"],
    );
    assert_eq!(coerce_input_value(&a, Value::Number(0.0)), Value::from("Over"));
    assert_eq!(coerce_input_value(&a, Value::Number(2.0)), Value::from("Atop"));
}

#[test]
fn multibutton_table_wins_over_combo() {
    let a = with_table(attrs("FuID"), "INPIDT_ComboControl_ID", &["ComboA"]);
    let a = with_table(a, "INPIDT_MultiButtonControl_ID", &["ButtonA"]);
    assert_eq!(
        coerce_input_value(&a, Value::Number(0.0)),
        Value::from("ButtonA")
    );
}

#[test]
fn out_of_range_index_passes_through() {
    let a = with_table(attrs("FuID"), "INPIDT_ComboControl_ID", &["Over"]);
    assert_eq!(coerce_input_value(&a, Value::Number(7.0)), Value::Number(7.0));
}

#[test]
fn name_on_numeric_input_becomes_index() {
    let a = with_table(
        attrs("Number"),
        "INPST_MultiButtonControl_String",
        &["Red", "Green", "Blue"],
    );
    assert_eq!(coerce_input_value(&a, Value::from("Blue")), Value::Number(2.0));
    assert_eq!(coerce_input_value(&a, Value::from("Red")), Value::Number(0.0));
}

#[test]
fn unknown_name_passes_through() {
    let a = with_table(attrs("Number"), "INPST_MultiButtonControl_String", &["Red"]);
    assert_eq!(
        coerce_input_value(&a, Value::from("Purple")),
        Value::from("Purple")
    );
}

#[test]
fn text_and_fuid_inputs_keep_strings() {
    for dt in ["Text", "FuID"] {
        let a = with_table(attrs(dt), "INPIDT_ComboControl_ID", &["Over"]);
        assert_eq!(coerce_input_value(&a, Value::from("Over")), Value::from("Over"));
    }
}

#[test]
fn plain_numbers_pass_through() {
    let a = attrs("Number");
    assert_eq!(coerce_input_value(&a, Value::Number(0.5)), Value::Number(0.5));
}
