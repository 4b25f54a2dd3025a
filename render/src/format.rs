use templatelib::Value;

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Right,
    Center,
    /// `=`: padding goes between the sign and the digits.
    AfterSign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sign {
    /// `-` (default): sign only on negative numbers.
    Minus,
    /// `+`: explicit sign on all numbers.
    Plus,
    /// ` `: leading space on non-negative numbers.
    Space,
}

/// A parsed format spec: `[[fill]align][sign][#][0][width][,][.precision][type]`.
#[derive(Debug, Clone)]
struct FormatSpec {
    fill: char,
    align: Option<Align>,
    sign: Sign,
    alternate: bool,
    width: Option<usize>,
    grouping: Option<char>,
    precision: Option<usize>,
    kind: Option<char>,
}

impl FormatSpec {
    fn parse(spec: &str) -> Result<FormatSpec, RenderError> {
        let chars: Vec<char> = spec.chars().collect();
        let mut i = 0;

        let mut fill = ' ';
        let mut align = None;
        if chars.len() >= 2
            && let Some(explicit) = align_of(chars[1])
        {
            fill = chars[0];
            align = Some(explicit);
            i = 2;
        }
        if align.is_none()
            && !chars.is_empty()
            && let Some(explicit) = align_of(chars[0])
        {
            align = Some(explicit);
            i = 1;
        }

        let mut sign = Sign::Minus;
        if i < chars.len() {
            match chars[i] {
                '+' => {
                    sign = Sign::Plus;
                    i += 1;
                }
                '-' => {
                    i += 1;
                }
                ' ' => {
                    sign = Sign::Space;
                    i += 1;
                }
                _ => {}
            }
        }

        let mut alternate = false;
        if i < chars.len() && chars[i] == '#' {
            alternate = true;
            i += 1;
        }

        if i < chars.len() && chars[i] == '0' {
            if align.is_none() {
                fill = '0';
                align = Some(Align::AfterSign);
            }
            i += 1;
        }

        let mut width = None;
        let digits_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i > digits_start {
            let text: String = chars[digits_start..i].iter().collect();
            width = Some(
                text.parse()
                    .map_err(|_| RenderError::InvalidFormatSpec(spec.to_string()))?,
            );
        }

        let mut grouping = None;
        if i < chars.len() && (chars[i] == ',' || chars[i] == '_') {
            grouping = Some(chars[i]);
            i += 1;
        }

        let mut precision = None;
        if i < chars.len() && chars[i] == '.' {
            i += 1;
            let digits_start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i == digits_start {
                return Err(RenderError::InvalidFormatSpec(spec.to_string()));
            }
            let text: String = chars[digits_start..i].iter().collect();
            precision = Some(
                text.parse()
                    .map_err(|_| RenderError::InvalidFormatSpec(spec.to_string()))?,
            );
        }

        let mut kind = None;
        if i < chars.len() {
            kind = Some(chars[i]);
            i += 1;
        }
        if i != chars.len() {
            return Err(RenderError::InvalidFormatSpec(spec.to_string()));
        }

        Ok(FormatSpec {
            fill,
            align,
            sign,
            alternate,
            width,
            grouping,
            precision,
            kind,
        })
    }
}

fn align_of(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

/// Format a value with a format-spec string. An empty spec yields the
/// value's display form.
pub fn format_value(value: &Value, spec: &str) -> Result<String, RenderError> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }
    let parsed = FormatSpec::parse(spec)?;

    match parsed.kind {
        Some('s') => {
            let Value::Str(text) = value else {
                return Err(type_error("string", value));
            };
            Ok(pad_text(apply_precision(text, parsed.precision), &parsed))
        }
        None => match value {
            Value::Number(n) => Ok(format_number_plain(*n, &parsed)),
            other => Ok(pad_text(
                apply_precision(&other.to_string(), parsed.precision),
                &parsed,
            )),
        },
        Some('d') => Ok(format_integer(int_value(value)?, 10, false, &parsed)),
        Some('b') => Ok(format_integer(int_value(value)?, 2, false, &parsed)),
        Some('o') => Ok(format_integer(int_value(value)?, 8, false, &parsed)),
        Some('x') => Ok(format_integer(int_value(value)?, 16, false, &parsed)),
        Some('X') => Ok(format_integer(int_value(value)?, 16, true, &parsed)),
        Some('f') | Some('F') => Ok(format_fixed(num_value(value)?, &parsed)),
        Some('e') => Ok(format_exp(num_value(value)?, false, &parsed)),
        Some('E') => Ok(format_exp(num_value(value)?, true, &parsed)),
        Some('%') => Ok(format_percent(num_value(value)?, &parsed)),
        Some(other) => Err(RenderError::UnknownFormatType(other)),
    }
}

fn type_error(expected: &str, value: &Value) -> RenderError {
    RenderError::TypeError {
        expected: expected.to_string(),
        got: value.type_name().to_string(),
    }
}

fn num_value(value: &Value) -> Result<f64, RenderError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(type_error("number", other)),
    }
}

fn int_value(value: &Value) -> Result<i64, RenderError> {
    match value {
        Value::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.0e18 => Ok(*n as i64),
        other => Err(type_error("integer", other)),
    }
}

fn format_integer(n: i64, radix: u32, upper: bool, spec: &FormatSpec) -> String {
    let magnitude = n.unsigned_abs();
    let mut digits = match radix {
        2 => format!("{:b}", magnitude),
        8 => format!("{:o}", magnitude),
        16 if upper => format!("{:X}", magnitude),
        16 => format!("{:x}", magnitude),
        _ => magnitude.to_string(),
    };
    if let Some(sep) = spec.grouping {
        let group = if radix == 10 { 3 } else { 4 };
        digits = group_digits(&digits, sep, group);
    }
    let prefix = if spec.alternate {
        match radix {
            2 => "0b",
            8 => "0o",
            16 if upper => "0X",
            16 => "0x",
            _ => "",
        }
    } else {
        ""
    };
    pad_number(sign_str(n < 0, spec.sign), &format!("{}{}", prefix, digits), spec)
}

fn format_number_plain(n: f64, spec: &FormatSpec) -> String {
    let body = match spec.precision {
        Some(precision) => format!("{:.*}", precision, n.abs()),
        None => Value::Number(n.abs()).to_string(),
    };
    let body = apply_grouping(&body, spec);
    pad_number(sign_str(n.is_sign_negative(), spec.sign), &body, spec)
}

fn format_fixed(n: f64, spec: &FormatSpec) -> String {
    let precision = spec.precision.unwrap_or(6);
    let body = format!("{:.*}", precision, n.abs());
    let body = apply_grouping(&body, spec);
    pad_number(sign_str(n.is_sign_negative(), spec.sign), &body, spec)
}

fn format_exp(n: f64, upper: bool, spec: &FormatSpec) -> String {
    let precision = spec.precision.unwrap_or(6);
    let mut body = format!("{:.*e}", precision, n.abs());
    // Rust prints `1.5e2`; the exponent gets an explicit sign and at least
    // two digits.
    if let Some((mantissa, exponent)) = body.split_once('e') {
        let (exp_sign, exp_digits) = match exponent.strip_prefix('-') {
            Some(digits) => ("-", digits),
            None => ("+", exponent),
        };
        let zero_pad = if exp_digits.len() < 2 { "0" } else { "" };
        body = format!("{}e{}{}{}", mantissa, exp_sign, zero_pad, exp_digits);
    }
    if upper {
        body = body.to_uppercase();
    }
    pad_number(sign_str(n.is_sign_negative(), spec.sign), &body, spec)
}

fn format_percent(n: f64, spec: &FormatSpec) -> String {
    let precision = spec.precision.unwrap_or(6);
    let body = format!("{:.*}%", precision, n.abs() * 100.0);
    pad_number(sign_str(n.is_sign_negative(), spec.sign), &body, spec)
}

fn sign_str(negative: bool, sign: Sign) -> &'static str {
    if negative {
        "-"
    } else {
        match sign {
            Sign::Plus => "+",
            Sign::Space => " ",
            Sign::Minus => "",
        }
    }
}

/// Group the integer digits of a decimal body by thousands.
fn apply_grouping(body: &str, spec: &FormatSpec) -> String {
    let Some(sep) = spec.grouping else {
        return body.to_string();
    };
    match body.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_digits(int_part, sep, 3), frac),
        None => group_digits(body, sep, 3),
    }
}

fn group_digits(digits: &str, sep: char, group: usize) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % group == 0 {
            out.push(sep);
        }
        out.push(*c);
    }
    out
}

fn pad_number(sign: &str, body: &str, spec: &FormatSpec) -> String {
    let content = sign.chars().count() + body.chars().count();
    let width = spec.width.unwrap_or(0);
    if content >= width {
        return format!("{}{}", sign, body);
    }
    let pad = width - content;
    match spec.align.unwrap_or(Align::Right) {
        Align::Right => format!("{}{}{}", fill_str(spec.fill, pad), sign, body),
        Align::Left => format!("{}{}{}", sign, body, fill_str(spec.fill, pad)),
        Align::Center => {
            let left = pad / 2;
            format!(
                "{}{}{}{}",
                fill_str(spec.fill, left),
                sign,
                body,
                fill_str(spec.fill, pad - left)
            )
        }
        Align::AfterSign => format!("{}{}{}", sign, fill_str(spec.fill, pad), body),
    }
}

fn pad_text(text: String, spec: &FormatSpec) -> String {
    let len = text.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        return text;
    }
    let pad = width - len;
    match spec.align.unwrap_or(Align::Left) {
        Align::Left => format!("{}{}", text, fill_str(spec.fill, pad)),
        Align::Right | Align::AfterSign => format!("{}{}", fill_str(spec.fill, pad), text),
        Align::Center => {
            let left = pad / 2;
            format!(
                "{}{}{}",
                fill_str(spec.fill, left),
                text,
                fill_str(spec.fill, pad - left)
            )
        }
    }
}

fn apply_precision(text: &str, precision: Option<usize>) -> String {
    match precision {
        Some(limit) => text.chars().take(limit).collect(),
        None => text.to_string(),
    }
}

fn fill_str(fill: char, n: usize) -> String {
    std::iter::repeat(fill).take(n).collect()
}
