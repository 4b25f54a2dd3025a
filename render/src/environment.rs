use std::collections::HashMap;

use templatelib::parser::Resolver;
use templatelib::Value;

/// Name→value bindings used to resolve interpolation expressions.
///
/// Besides bound names, simple literal expressions resolve directly: quoted
/// strings, numbers, `true`/`false`, and `()`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Builder form of `set`.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// Coerce a literal expression to a value: numbers become `Number`,
/// `true`/`false` become `Bool`, quoted text becomes `Str`.
pub fn literal_value(expression: &str) -> Option<Value> {
    let numeric_start = expression
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+' || c == '.');
    if numeric_start && let Ok(n) = expression.parse::<f64>() {
        return Some(Value::Number(n));
    }
    match expression {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        "()" => return Some(Value::Unit),
        _ => {}
    }
    for quote in ['"', '\''] {
        if expression.len() >= 2 && expression.starts_with(quote) && expression.ends_with(quote) {
            return Some(Value::Str(expression[1..expression.len() - 1].to_string()));
        }
    }
    None
}

impl Resolver for Environment {
    fn resolve(&self, expression: &str) -> Option<Value> {
        literal_value(expression).or_else(|| self.variables.get(expression).cloned())
    }
}
