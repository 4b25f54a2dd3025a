pub mod error;

pub use error::ParseError;

use std::collections::HashMap;
use std::ops::Range;

use crate::interpolation::{Conversion, Interpolation};
use crate::template::{Template, TemplatePart};
use crate::value::Value;

/// Resolves interpolation expression source text to a value.
///
/// Expression evaluation is outside this crate's scope; implementors decide
/// what an expression may be. A bare `HashMap` resolves variable names; the
/// render crate's `Environment` also resolves simple literals.
pub trait Resolver {
    fn resolve(&self, expression: &str) -> Option<Value>;
}

impl Resolver for HashMap<String, Value> {
    fn resolve(&self, expression: &str) -> Option<Value> {
        self.get(expression).cloned()
    }
}

/// Parser entry point for template-literal source.
pub struct Parser {
    source: String,
    file_id: usize,
    raw: bool,
}

impl Parser {
    pub fn new(source: impl Into<String>, file_id: usize) -> Self {
        Parser {
            source: source.into(),
            file_id,
            raw: false,
        }
    }

    /// Treat the source as a raw literal: backslashes stay verbatim.
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Parse the source into a template, resolving each embedded expression
    /// through `resolver`.
    pub fn parse(&self, resolver: &dyn Resolver) -> Result<Template, ParseError> {
        let pieces = self.scan(resolver)?;
        Ok(Template::from_parts(pieces))
    }

    /// Scan the source into a raw piece stream: literal chunks, debug-marker
    /// prefixes, and interpolation records, in source order. Normalization
    /// (adjacent-literal merging, empty-segment insertion) is left to
    /// `Template::from_parts`.
    fn scan(&self, resolver: &dyn Resolver) -> Result<Vec<TemplatePart>, ParseError> {
        let chars: Vec<(usize, char)> = self.source.char_indices().collect();
        let len = chars.len();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < len {
            let (offset, c) = chars[i];
            match c {
                '{' => {
                    if i + 1 < len && chars[i + 1].1 == '{' {
                        literal.push('{');
                        i += 2;
                    } else {
                        if !literal.is_empty() {
                            pieces.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                        }
                        i = self.scan_interpolation(&chars, i, resolver, &mut pieces)?;
                    }
                }
                '}' => {
                    if i + 1 < len && chars[i + 1].1 == '}' {
                        literal.push('}');
                        i += 2;
                    } else {
                        return Err(ParseError::new(
                            "single '}' is not allowed",
                            offset..offset + 1,
                            self.file_id,
                        )
                        .with_note("escape a literal brace by doubling it: '}}'"));
                    }
                }
                '\\' if !self.raw => {
                    let (consumed, text) = resolve_escape(&chars, i);
                    literal.push_str(&text);
                    i += consumed;
                }
                _ => {
                    literal.push(c);
                    i += 1;
                }
            }
        }

        if !literal.is_empty() {
            pieces.push(TemplatePart::Literal(literal));
        }
        Ok(pieces)
    }

    /// Scan one `{...}` interpolation starting at the opening brace.
    /// Pushes the pieces it produces (a debug prefix, then the record) and
    /// returns the index just past the closing brace.
    fn scan_interpolation(
        &self,
        chars: &[(usize, char)],
        open: usize,
        resolver: &dyn Resolver,
        pieces: &mut Vec<TemplatePart>,
    ) -> Result<usize, ParseError> {
        let len = chars.len();
        let inner_start = open + 1;
        let mut depth = 1u32;
        let mut quote: Option<char> = None;
        let mut i = inner_start;

        while i < len {
            let c = chars[i].1;
            match quote {
                Some(q) => {
                    if c == q {
                        quote = None;
                    }
                }
                None => match c {
                    '\'' | '"' => quote = Some(c),
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                },
            }
            i += 1;
        }
        if i >= len {
            return Err(ParseError::new(
                "unterminated interpolation: expected '}'",
                chars[open].0..self.source.len(),
                self.file_id,
            ));
        }
        let close = i;
        let span = chars[open].0..chars[close].0 + 1;
        let inner: Vec<char> = chars[inner_start..close].iter().map(|&(_, c)| c).collect();

        // Split off the format spec at the first top-level ':'.
        let (expr_region, spec_src): (&[char], Option<String>) = match find_spec_colon(&inner) {
            Some(idx) => (&inner[..idx], Some(inner[idx + 1..].iter().collect())),
            None => (&inner[..], None),
        };

        // Split off a trailing `!c` conversion letter.
        let (expr_region, conversion) = match split_conversion(expr_region) {
            Some((head, letter)) => {
                let conversion = Conversion::try_from(letter)
                    .map_err(|err| ParseError::new(err.to_string(), span.clone(), self.file_id))?;
                (head, Some(conversion))
            }
            None => (expr_region, None),
        };

        // Debug marker: the expression text ends with `=` (comparison tails
        // like `==`, `<=`, `>=`, `!=` excluded).
        let trimmed = trim_end(expr_region);
        let is_debug = matches!(trimmed.last(), Some('='))
            && !matches!(
                trimmed.len().checked_sub(2).map(|k| trimmed[k]),
                Some('=' | '<' | '>' | '!')
            );

        let (expression, conversion) = if is_debug {
            // The raw source through the marker becomes literal text,
            // whitespace preserved verbatim.
            pieces.push(TemplatePart::Literal(expr_region.iter().collect()));
            let head = trim_end(&trimmed[..trimmed.len() - 1]);
            let expression: String = trim_start(head).iter().collect();
            // Debug form implies repr, unless a conversion or spec says otherwise.
            let conversion = match (conversion, &spec_src) {
                (None, None) => Some(Conversion::Repr),
                (explicit, _) => explicit,
            };
            (expression, conversion)
        } else {
            let expression: String = trim_start(trim_end(expr_region)).iter().collect();
            (expression, conversion)
        };

        if expression.is_empty() {
            let delimiter = if conversion.is_some() && !is_debug {
                "'!'"
            } else if spec_src.is_some() {
                "':'"
            } else {
                "'}'"
            };
            return Err(ParseError::new(
                format!("valid expression required before {}", delimiter),
                span,
                self.file_id,
            ));
        }

        let value = resolver.resolve(&expression).ok_or_else(|| {
            ParseError::new(
                format!("undefined name '{}'", expression),
                span.clone(),
                self.file_id,
            )
        })?;

        let format_spec = match spec_src {
            Some(src) => self.resolve_format_spec(&src, resolver, &span)?,
            None => String::new(),
        };

        pieces.push(TemplatePart::from(Interpolation {
            value,
            expression,
            conversion,
            format_spec,
        }));
        Ok(close + 1)
    }

    /// Substitute each nested `{expr}` in a format spec with the str form of
    /// its resolved value, producing the flat spec text stored on the record.
    fn resolve_format_spec(
        &self,
        src: &str,
        resolver: &dyn Resolver,
        span: &Range<usize>,
    ) -> Result<String, ParseError> {
        let chars: Vec<char> = src.chars().collect();
        let mut out = String::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '{' => {
                    let start = i + 1;
                    let mut j = start;
                    while j < chars.len() && chars[j] != '}' {
                        j += 1;
                    }
                    if j >= chars.len() {
                        return Err(ParseError::new(
                            "unterminated expression in format spec: expected '}'",
                            span.clone(),
                            self.file_id,
                        ));
                    }
                    let expression: String = chars[start..j].iter().collect();
                    let expression = expression.trim();
                    if expression.is_empty() {
                        return Err(ParseError::new(
                            "valid expression required before '}'",
                            span.clone(),
                            self.file_id,
                        ));
                    }
                    let value = resolver.resolve(expression).ok_or_else(|| {
                        ParseError::new(
                            format!("undefined name '{}'", expression),
                            span.clone(),
                            self.file_id,
                        )
                    })?;
                    out.push_str(&value.to_string());
                    i = j + 1;
                }
                '}' => {
                    return Err(ParseError::new(
                        "single '}' is not allowed in format spec",
                        span.clone(),
                        self.file_id,
                    ));
                }
                c => {
                    out.push(c);
                    i += 1;
                }
            }
        }
        Ok(out)
    }
}

/// Resolve a backslash escape starting at `i`; returns (chars consumed, text).
/// Unknown escapes keep the backslash verbatim.
fn resolve_escape(chars: &[(usize, char)], i: usize) -> (usize, String) {
    match chars.get(i + 1).map(|&(_, c)| c) {
        Some('n') => (2, "\n".to_string()),
        Some('t') => (2, "\t".to_string()),
        Some('r') => (2, "\r".to_string()),
        Some('\\') => (2, "\\".to_string()),
        Some('\'') => (2, "'".to_string()),
        Some('"') => (2, "\"".to_string()),
        Some('0') => (2, "\0".to_string()),
        Some(other) => (2, format!("\\{}", other)),
        None => (1, "\\".to_string()),
    }
}

/// Index of the first ':' at brace/bracket/paren depth zero, outside quotes.
fn find_spec_colon(chars: &[char]) -> Option<usize> {
    let mut depth = 0u32;
    let mut quote: Option<char> = None;
    for (i, &c) in chars.iter().enumerate() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => depth = depth.saturating_sub(1),
                ':' if depth == 0 => return Some(i),
                _ => {}
            },
        }
    }
    None
}

/// Split a trailing `!c` conversion letter off the expression region.
fn split_conversion(region: &[char]) -> Option<(&[char], char)> {
    let n = region.len();
    if n >= 2 && region[n - 2] == '!' && region[n - 1].is_ascii_alphabetic() {
        Some((&region[..n - 2], region[n - 1]))
    } else {
        None
    }
}

fn trim_end(region: &[char]) -> &[char] {
    let mut end = region.len();
    while end > 0 && region[end - 1].is_whitespace() {
        end -= 1;
    }
    &region[..end]
}

fn trim_start(region: &[char]) -> &[char] {
    let mut start = 0;
    while start < region.len() && region[start].is_whitespace() {
        start += 1;
    }
    &region[start..]
}
