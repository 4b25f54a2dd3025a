use std::collections::HashMap;

use templatelib::{Interpolation, Template, TemplatePart, Value};

use crate::convert::convert;
use crate::error::RenderError;
use crate::format::format_value;

/// Format a template repeatedly with different values, `str.format` style.
///
/// Every interpolation value must be a string; the strings act as lookup
/// keys for the values supplied to `format`.
#[derive(Debug)]
pub struct Formatter {
    template: Template,
}

impl Formatter {
    pub fn new(template: Template) -> Result<Self, RenderError> {
        check_keys(&template)?;
        Ok(Formatter { template })
    }

    /// Render the template using the given values.
    pub fn format(&self, values: &HashMap<String, Value>) -> Result<String, RenderError> {
        let mut out = String::new();
        for part in self.template.parts() {
            match part {
                TemplatePart::Literal(text) => out.push_str(text),
                TemplatePart::Interpolation(record) => {
                    let key = key_of(record)?;
                    let value = values
                        .get(key)
                        .ok_or_else(|| RenderError::MissingKey(key.to_string()))?;
                    let value = convert(value, record.conversion);
                    out.push_str(&format_value(&value, &record.format_spec)?);
                }
            }
        }
        Ok(out)
    }
}

/// Bind values to a template at a later date, producing a new template.
///
/// Same key rule as `Formatter`. Where `Formatter` goes straight to text,
/// `bind` stays in the template domain: the result carries fresh records
/// holding the bound values with each original record's conversion and
/// format spec.
pub struct Binder {
    template: Template,
}

impl Binder {
    pub fn new(template: Template) -> Result<Self, RenderError> {
        check_keys(&template)?;
        Ok(Binder { template })
    }

    pub fn bind(&self, values: &HashMap<String, Value>) -> Result<Template, RenderError> {
        let mut parts = Vec::new();
        for part in self.template.parts() {
            match part {
                TemplatePart::Literal(text) => parts.push(TemplatePart::Literal(text.clone())),
                TemplatePart::Interpolation(record) => {
                    let key = key_of(record)?;
                    let value = values
                        .get(key)
                        .ok_or_else(|| RenderError::MissingKey(key.to_string()))?
                        .clone();
                    parts.push(TemplatePart::from(Interpolation {
                        value,
                        expression: key.to_string(),
                        conversion: record.conversion,
                        format_spec: record.format_spec.clone(),
                    }));
                }
            }
        }
        Ok(Template::from_parts(parts))
    }
}

fn check_keys(template: &Template) -> Result<(), RenderError> {
    for record in template.interpolations() {
        key_of(record)?;
    }
    Ok(())
}

fn key_of(record: &Interpolation) -> Result<&str, RenderError> {
    match &record.value {
        Value::Str(key) => Ok(key),
        other => Err(RenderError::NonStringKey(other.repr())),
    }
}
