//! Translation of script-friendly values into what an input's controls accept.

use crate::foundation::core::{Attrs, Value};

/// Enum tables searched when a number is written to a `FuID` input.
const ID_ENUM_KEYS: [&str; 2] = ["INPIDT_MultiButtonControl_ID", "INPIDT_ComboControl_ID"];

/// Enum tables searched when a string is written to a numeric input.
const NAME_ENUM_KEYS: [&str; 3] = [
    "INPST_MultiButtonControl_String",
    "INPIDT_MultiButtonControl_ID",
    "INPIDT_ComboControl_ID",
];

fn key_number(key: &str) -> Option<f64> {
    key.trim().parse::<f64>().ok()
}

/// Coerce `value` for an input described by `attrs`.
///
/// - booleans become `0`/`1` (the host rejects raw booleans);
/// - a number written to a `FuID` input is a 0-based index into the button/combo id tables
///   and becomes the id string;
/// - a string written to an input that is neither `Text` nor `FuID` is looked up by name in
///   those tables and becomes the 0-based index.
///
/// Values that match nothing pass through unchanged.
pub fn coerce_input_value(attrs: &Attrs, value: Value) -> Value {
    let data_type = attrs.get("INPS_DataType").and_then(Value::as_str);

    match value {
        Value::Bool(b) => Value::Number(if b { 1.0 } else { 0.0 }),
        Value::Number(n) if data_type == Some("FuID") => {
            let wanted = n + 1.0;
            ID_ENUM_KEYS
                .iter()
                .filter_map(|k| attrs.get(*k).and_then(Value::as_table))
                .find_map(|table| {
                    table
                        .iter()
                        .find(|(k, _)| key_number(k) == Some(wanted))
                        .map(|(_, v)| v.clone())
                })
                .unwrap_or(Value::Number(n))
        }
        Value::Text(s) if !matches!(data_type, Some("Text") | Some("FuID")) => NAME_ENUM_KEYS
            .iter()
            .filter_map(|k| attrs.get(*k).and_then(Value::as_table))
            .find_map(|table| {
                table
                    .iter()
                    .find(|(_, v)| v.as_str() == Some(s.as_str()))
                    .and_then(|(k, _)| key_number(k))
            })
            .map_or(Value::Text(s), |key| Value::Number(key - 1.0)),
        other => other,
    }
}

#[cfg(test)]
#[path = "../tests/unit/coerce.rs"]
mod tests;
