use templatelib::{Template, TemplatePart, Value};

use crate::convert::convert;

/// Placeholder emitted for interpolations that are not selected.
pub const DEFAULT_PLACEHOLDER: &str = "***";

/// Render only the interpolations whose format spec matches `selector`;
/// the rest become `placeholder`.
///
/// A selected thunk value is forced before conversion. Unselected thunks are
/// never run, so expensive computations are skipped when they turn out to be
/// unnecessary (a logging pipeline filtering by level, for instance).
pub fn render_selected(template: &Template, selector: &str, placeholder: &str) -> String {
    let mut out = String::new();
    for part in template.parts() {
        match part {
            TemplatePart::Literal(text) => out.push_str(text),
            TemplatePart::Interpolation(record) => {
                if record.format_spec == selector {
                    let value = match &record.value {
                        Value::Thunk(thunk) => thunk.force(),
                        other => other.clone(),
                    };
                    out.push_str(&convert(&value, record.conversion).to_string());
                } else {
                    out.push_str(placeholder);
                }
            }
        }
    }
    out
}
