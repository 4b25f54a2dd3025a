use templatelib::{Template, TemplatePart};

use crate::convert::convert;
use crate::error::RenderError;
use crate::format::format_value;

/// Render a template the way an eager string literal would have: literal
/// segments verbatim, each interpolation converted then formatted.
pub fn render(template: &Template) -> Result<String, RenderError> {
    let mut out = String::new();
    for part in template.parts() {
        match part {
            TemplatePart::Literal(text) => out.push_str(text),
            TemplatePart::Interpolation(record) => {
                let value = convert(&record.value, record.conversion);
                out.push_str(&format_value(&value, &record.format_spec)?);
            }
        }
    }
    Ok(out)
}
