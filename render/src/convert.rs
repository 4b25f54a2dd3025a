use templatelib::{Conversion, Value};

/// Apply a conversion to a value. `None` passes the value through unchanged;
/// the three letter conversions always produce a string value.
pub fn convert(value: &Value, conversion: Option<Conversion>) -> Value {
    match conversion {
        Some(Conversion::Ascii) => Value::Str(value.ascii()),
        Some(Conversion::Repr) => Value::Str(value.repr()),
        Some(Conversion::Str) => Value::Str(value.to_string()),
        None => value.clone(),
    }
}
