use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::template::{Template, TemplatePart};

/// A deferred computation stored as an interpolation value.
///
/// Eager consumers display a thunk without running it; consumers that opt in
/// (see the lazy renderer in the render crate) call `force` to obtain the
/// result.
#[derive(Clone)]
pub struct Thunk(Arc<dyn Fn() -> Value + Send + Sync>);

impl Thunk {
    pub fn new(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Thunk(Arc::new(f))
    }

    /// Run the deferred computation.
    pub fn force(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk(..)")
    }
}

impl PartialEq for Thunk {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A value carried by an interpolation.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Str(String),
    Unit,
    /// A nested template (templates may interpolate other templates).
    Template(Arc<Template>),
    /// A deferred computation; forced only by consumers that opt in.
    Thunk(Thunk),
}

/// Error produced when hashing reaches a value with no hash semantics.
///
/// Surfaces only when hashing is actually attempted; construction never
/// checks hashability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhashableValue {
    pub type_name: &'static str,
}

impl fmt::Display for UnhashableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unhashable value of type {}", self.type_name)
    }
}

impl std::error::Error for UnhashableValue {}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "Str",
            Value::Unit => "Unit",
            Value::Template(_) => "Template",
            Value::Thunk(_) => "Thunk",
        }
    }

    /// Repr-style conversion: strings come back quoted and escaped, nested
    /// templates render their interpolation values in repr form, everything
    /// else matches `Display`.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('\'');
                for c in s.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '\'' => out.push_str("\\'"),
                        '\n' => out.push_str("\\n"),
                        '\t' => out.push_str("\\t"),
                        '\r' => out.push_str("\\r"),
                        _ => out.push(c),
                    }
                }
                out.push('\'');
                out
            }
            Value::Template(template) => {
                let mut out = String::new();
                for part in template.parts() {
                    match part {
                        TemplatePart::Literal(text) => out.push_str(text),
                        TemplatePart::Interpolation(record) => out.push_str(&record.value.repr()),
                    }
                }
                out
            }
            _ => self.to_string(),
        }
    }

    /// Repr-style conversion with non-ASCII characters escaped as `\u{..}`.
    pub fn ascii(&self) -> String {
        let mut out = String::new();
        for c in self.repr().chars() {
            if c.is_ascii() {
                out.push(c);
            } else {
                out.push_str(&format!("\\u{{{:x}}}", c as u32));
            }
        }
        out
    }

    /// Feed this value into a hasher; fails if the value (or anything nested
    /// inside it) is a thunk.
    pub fn hash_into<H: Hasher>(&self, state: &mut H) -> Result<(), UnhashableValue> {
        match self {
            Value::Number(n) => {
                state.write_u8(0);
                // -0.0 == 0.0, so they must hash alike
                let bits = if *n == 0.0 { 0 } else { n.to_bits() };
                state.write_u64(bits);
            }
            Value::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            }
            Value::Str(s) => {
                state.write_u8(2);
                s.hash(state);
            }
            Value::Unit => state.write_u8(3),
            Value::Template(template) => {
                state.write_u8(4);
                state.write_u64(template.try_hash()?);
            }
            Value::Thunk(_) => {
                return Err(UnhashableValue {
                    type_name: self.type_name(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.is_finite() && *n == n.floor() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Unit => f.write_str("()"),
            Value::Template(template) => {
                for part in template.parts() {
                    match part {
                        TemplatePart::Literal(text) => f.write_str(text)?,
                        TemplatePart::Interpolation(record) => write!(f, "{}", record.value)?,
                    }
                }
                Ok(())
            }
            Value::Thunk(_) => f.write_str("<thunk>"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b, // NaN != NaN per IEEE 754
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Unit, Value::Unit) => true,
            (Value::Template(a), Value::Template(b)) => a == b,
            (Value::Thunk(a), Value::Thunk(b)) => a == b,
            _ => false,
        }
    }
}
