use std::fmt;

/// Errors produced while rendering a template to text.
#[derive(Debug)]
pub enum RenderError {
    TypeError { expected: String, got: String },
    UnknownFormatType(char),
    InvalidFormatSpec(String),
    MissingKey(String),
    NonStringKey(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::TypeError { expected, got } => {
                write!(f, "type error: expected {}, got {}", expected, got)
            }
            RenderError::UnknownFormatType(kind) => {
                write!(f, "unknown format type '{}'", kind)
            }
            RenderError::InvalidFormatSpec(spec) => {
                write!(f, "invalid format spec '{}'", spec)
            }
            RenderError::MissingKey(key) => {
                write!(f, "no value bound for key '{}'", key)
            }
            RenderError::NonStringKey(repr) => {
                write!(f, "interpolation value is not a string key: {}", repr)
            }
        }
    }
}

impl std::error::Error for RenderError {}
