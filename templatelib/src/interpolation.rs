use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::{UnhashableValue, Value};

/// Conversion applied to an interpolation's value before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// `!a`: repr-style with non-ASCII characters escaped.
    Ascii,
    /// `!r`: repr-style.
    Repr,
    /// `!s`: str-style.
    Str,
}

/// Error produced by a conversion letter outside `a`, `r`, `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidConversion(pub char);

impl fmt::Display for InvalidConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid conversion character '{}': expected 'a', 'r', or 's'",
            self.0
        )
    }
}

impl std::error::Error for InvalidConversion {}

impl Conversion {
    pub fn as_char(self) -> char {
        match self {
            Conversion::Ascii => 'a',
            Conversion::Repr => 'r',
            Conversion::Str => 's',
        }
    }
}

impl TryFrom<char> for Conversion {
    type Error = InvalidConversion;

    fn try_from(c: char) -> Result<Self, InvalidConversion> {
        match c {
            'a' => Ok(Conversion::Ascii),
            'r' => Ok(Conversion::Repr),
            's' => Ok(Conversion::Str),
            other => Err(InvalidConversion(other)),
        }
    }
}

/// One embedded expression occurrence: its evaluated value plus metadata.
///
/// Records are immutable once stored in a template. Consumers that need a
/// variant build a new record (see the binder in the render crate); templates
/// produced by concatenation share the originals.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    /// The evaluated result of the expression.
    pub value: Value,
    /// Source text of the expression.
    pub expression: String,
    /// Optional conversion letter.
    pub conversion: Option<Conversion>,
    /// Format spec, fully resolved (nested expressions already substituted).
    pub format_spec: String,
}

impl Interpolation {
    pub fn new(value: Value, expression: impl Into<String>) -> Self {
        Interpolation {
            value,
            expression: expression.into(),
            conversion: None,
            format_spec: String::new(),
        }
    }

    pub fn with_conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = Some(conversion);
        self
    }

    pub fn with_format_spec(mut self, format_spec: impl Into<String>) -> Self {
        self.format_spec = format_spec.into();
        self
    }

    /// Hash over the four attributes as a tuple; fails if `value` is
    /// unhashable.
    pub fn try_hash(&self) -> Result<u64, UnhashableValue> {
        let mut state = DefaultHasher::new();
        self.value.hash_into(&mut state)?;
        self.expression.hash(&mut state);
        self.conversion.hash(&mut state);
        self.format_spec.hash(&mut state);
        Ok(state.finish())
    }
}
