use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::sync::Arc;

use crate::interpolation::Interpolation;
use crate::value::UnhashableValue;

/// One element of a template's content: literal text or an interpolation.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Literal text content.
    Literal(String),
    /// An embedded expression's evaluated record. Shared across the templates
    /// that carry it; concatenation clones the handle, not the record.
    Interpolation(Arc<Interpolation>),
}

impl From<&str> for TemplatePart {
    fn from(text: &str) -> Self {
        TemplatePart::Literal(text.to_string())
    }
}

impl From<String> for TemplatePart {
    fn from(text: String) -> Self {
        TemplatePart::Literal(text)
    }
}

impl From<Interpolation> for TemplatePart {
    fn from(record: Interpolation) -> Self {
        TemplatePart::Interpolation(Arc::new(record))
    }
}

impl From<Arc<Interpolation>> for TemplatePart {
    fn from(record: Arc<Interpolation>) -> Self {
        TemplatePart::Interpolation(record)
    }
}

/// An immutable interleaving of literal text segments and interpolations.
///
/// The stored form is canonical: segments and interpolations strictly
/// alternate, starting and ending with a segment, so there is always exactly
/// one more string segment than there are interpolations (an empty template
/// holds a single empty segment). `from_parts` establishes the form; every
/// other constructor and operator goes through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    parts: Vec<TemplatePart>,
}

impl Default for Template {
    fn default() -> Self {
        Template::new()
    }
}

impl Template {
    /// The empty template: one empty string segment, no interpolations.
    pub fn new() -> Self {
        Template {
            parts: vec![TemplatePart::Literal(String::new())],
        }
    }

    /// Normalize an arbitrary piece sequence into canonical form.
    ///
    /// Adjacent literal pieces merge into one segment; a (possibly empty)
    /// segment is emitted before every interpolation and once at the end.
    pub fn from_parts<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TemplatePart>,
    {
        let mut normalized = Vec::new();
        let mut pending = String::new();
        for part in parts {
            match part.into() {
                TemplatePart::Literal(text) => pending.push_str(&text),
                TemplatePart::Interpolation(record) => {
                    normalized.push(TemplatePart::Literal(std::mem::take(&mut pending)));
                    normalized.push(TemplatePart::Interpolation(record));
                }
            }
        }
        normalized.push(TemplatePart::Literal(pending));
        Template { parts: normalized }
    }

    /// A template holding only literal text.
    pub fn literal(text: impl Into<String>) -> Self {
        Template {
            parts: vec![TemplatePart::Literal(text.into())],
        }
    }

    /// A template holding a single interpolation.
    pub fn from_interpolation(record: Interpolation) -> Self {
        Template::from_parts([TemplatePart::from(record)])
    }

    /// The canonical alternating content `[s0, i0, s1, ..., sn]`.
    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// The literal text segments, in order. Always one more than
    /// `interpolations`; never empty.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Literal(text) => Some(text.as_str()),
            TemplatePart::Interpolation(_) => None,
        })
    }

    /// The interpolation records, in order.
    pub fn interpolations(&self) -> impl Iterator<Item = &Arc<Interpolation>> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Interpolation(record) => Some(record),
            TemplatePart::Literal(_) => None,
        })
    }

    /// Ordered content with empty string segments omitted.
    pub fn iter(&self) -> impl Iterator<Item = &TemplatePart> {
        self.parts.iter().filter(|part| is_visible(part))
    }

    /// Hash over the canonical content; fails on unhashable values.
    /// Consistent with equality: structurally equal templates hash alike.
    pub fn try_hash(&self) -> Result<u64, UnhashableValue> {
        let mut state = DefaultHasher::new();
        for part in &self.parts {
            match part {
                TemplatePart::Literal(text) => {
                    state.write_u8(0);
                    text.hash(&mut state);
                }
                TemplatePart::Interpolation(record) => {
                    state.write_u8(1);
                    state.write_u64(record.try_hash()?);
                }
            }
        }
        Ok(state.finish())
    }

    fn concat(&self, other: &Template) -> Template {
        Template::from_parts(self.parts.iter().cloned().chain(other.parts.iter().cloned()))
    }
}

fn is_visible(part: &TemplatePart) -> bool {
    !matches!(part, TemplatePart::Literal(text) if text.is_empty())
}

fn is_visible_ref(part: &&TemplatePart) -> bool {
    is_visible(part)
}

impl<'a> IntoIterator for &'a Template {
    type Item = &'a TemplatePart;
    type IntoIter = std::iter::Filter<std::slice::Iter<'a, TemplatePart>, fn(&&'a TemplatePart) -> bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter().filter(is_visible_ref as fn(&&TemplatePart) -> bool)
    }
}

impl Add<&Template> for &Template {
    type Output = Template;

    /// Concatenate: boundary string segments merge into one, interpolation
    /// records stay shared with the operands.
    fn add(self, rhs: &Template) -> Template {
        self.concat(rhs)
    }
}

impl Add<Template> for Template {
    type Output = Template;

    fn add(self, rhs: Template) -> Template {
        self.concat(&rhs)
    }
}

impl Add<&Template> for Template {
    type Output = Template;

    fn add(self, rhs: &Template) -> Template {
        self.concat(rhs)
    }
}

impl Add<Template> for &Template {
    type Output = Template;

    fn add(self, rhs: Template) -> Template {
        self.concat(&rhs)
    }
}

impl Add<&str> for &Template {
    type Output = Template;

    fn add(self, rhs: &str) -> Template {
        Template::from_parts(self.parts.iter().cloned().chain([TemplatePart::from(rhs)]))
    }
}

impl Add<&str> for Template {
    type Output = Template;

    fn add(self, rhs: &str) -> Template {
        &self + rhs
    }
}

impl Add<&Template> for &str {
    type Output = Template;

    fn add(self, rhs: &Template) -> Template {
        Template::from_parts([TemplatePart::from(self)].into_iter().chain(rhs.parts.iter().cloned()))
    }
}

impl Add<Template> for &str {
    type Output = Template;

    fn add(self, rhs: Template) -> Template {
        self + &rhs
    }
}
