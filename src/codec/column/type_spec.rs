use chrono_tz::Tz;

use crate::codec::column::descriptor::{ColumnDescriptor, EnumTable, IntervalUnit, TypeKind};
use crate::codec::errors::CodecError;

const MAX_DECIMAL_PRECISION: u32 = 76;
const MAX_DATETIME64_PRECISION: u32 = 9;

/// Parses a wire type spec such as `Array(LowCardinality(Nullable(String)))`.
pub fn parse_descriptor(name: &str, spec: &str) -> Result<ColumnDescriptor, CodecError> {
    let raw = spec.trim();
    let mut element = raw;
    let mut dimensions = 0;
    while let Some(inner) = unwrap_call(element, "Array") {
        element = inner;
        dimensions += 1;
    }

    let leaf = parse_element(name, element)?;
    if dimensions == 0 {
        return Ok(leaf);
    }
    Ok(ColumnDescriptor::array(name, raw, dimensions, leaf))
}

fn parse_element(name: &str, spec: &str) -> Result<ColumnDescriptor, CodecError> {
    let mut base = spec;
    let low_cardinality = match unwrap_call(base, "LowCardinality") {
        Some(inner) => {
            base = inner;
            true
        }
        None => false,
    };
    let nullable = match unwrap_call(base, "Nullable") {
        Some(inner) => {
            base = inner;
            true
        }
        None => false,
    };
    if unwrap_call(base, "Array").is_some() || unwrap_call(base, "Nullable").is_some() {
        return Err(unsupported(spec));
    }

    let kind = parse_base(base).ok_or_else(|| unsupported(spec))?;
    Ok(ColumnDescriptor::scalar(
        name,
        spec,
        base,
        kind,
        nullable,
        low_cardinality,
    ))
}

fn parse_base(spec: &str) -> Option<TypeKind> {
    let simple = match spec {
        "UInt8" => Some(TypeKind::UInt8),
        "Int8" => Some(TypeKind::Int8),
        "Bool" => Some(TypeKind::Bool),
        "UInt16" => Some(TypeKind::UInt16),
        "Int16" => Some(TypeKind::Int16),
        "UInt32" => Some(TypeKind::UInt32),
        "Int32" => Some(TypeKind::Int32),
        "UInt64" => Some(TypeKind::UInt64),
        "Int64" => Some(TypeKind::Int64),
        "Int128" => Some(TypeKind::Int128),
        "Float32" => Some(TypeKind::Float32),
        "Float64" => Some(TypeKind::Float64),
        "String" => Some(TypeKind::String),
        "Date" => Some(TypeKind::Date),
        "DateTime" => Some(TypeKind::DateTime { timezone: None }),
        "UUID" => Some(TypeKind::Uuid),
        "IPv4" => Some(TypeKind::Ipv4),
        "IPv6" => Some(TypeKind::Ipv6),
        "Nothing" => Some(TypeKind::Nothing),
        _ => None,
    };
    if simple.is_some() {
        return simple;
    }

    if let Some(unit) = spec.strip_prefix("Interval") {
        return IntervalUnit::parse(unit).map(TypeKind::Interval);
    }
    if let Some(args) = unwrap_call(spec, "FixedString") {
        let n: usize = args.parse().ok()?;
        return (n > 0).then_some(TypeKind::FixedString(n));
    }
    if let Some(args) = unwrap_call(spec, "DateTime") {
        let timezone = parse_timezone(args)?;
        return Some(TypeKind::DateTime {
            timezone: Some(timezone),
        });
    }
    if let Some(args) = unwrap_call(spec, "DateTime64") {
        let parts = split_args(args);
        let precision: u32 = parts.first()?.parse().ok()?;
        if precision > MAX_DATETIME64_PRECISION {
            return None;
        }
        let timezone = match parts.get(1) {
            Some(tz) => Some(parse_timezone(tz)?),
            None => None,
        };
        if parts.len() > 2 {
            return None;
        }
        return Some(TypeKind::DateTime64 {
            precision,
            timezone,
        });
    }
    if let Some(args) = unwrap_call(spec, "Decimal") {
        let parts = split_args(args);
        if parts.len() != 2 {
            return None;
        }
        let precision: u32 = parts[0].parse().ok()?;
        let scale: u32 = parts[1].parse().ok()?;
        return decimal(precision, scale);
    }
    for (prefix, precision) in [
        ("Decimal32", 9),
        ("Decimal64", 18),
        ("Decimal128", 38),
        ("Decimal256", 76),
    ] {
        if let Some(args) = unwrap_call(spec, prefix) {
            let scale: u32 = args.parse().ok()?;
            return decimal(precision, scale);
        }
    }
    if let Some(args) = unwrap_call(spec, "Enum8") {
        let table = parse_enum_table(args, i16::from(i8::MIN), i16::from(i8::MAX))?;
        return Some(TypeKind::Enum8(table));
    }
    if let Some(args) = unwrap_call(spec, "Enum16") {
        let table = parse_enum_table(args, i16::MIN, i16::MAX)?;
        return Some(TypeKind::Enum16(table));
    }
    None
}

fn decimal(precision: u32, scale: u32) -> Option<TypeKind> {
    if precision == 0 || precision > MAX_DECIMAL_PRECISION || scale > precision {
        return None;
    }
    Some(TypeKind::Decimal { precision, scale })
}

fn parse_timezone(arg: &str) -> Option<Tz> {
    let (name, rest) = parse_quoted(arg.trim())?;
    if !rest.trim().is_empty() {
        return None;
    }
    name.parse::<Tz>().ok()
}

fn parse_enum_table(args: &str, min: i16, max: i16) -> Option<EnumTable> {
    let mut entries = Vec::new();
    for part in split_args(args) {
        let (label, rest) = parse_quoted(part)?;
        let key: i16 = rest.trim().strip_prefix('=')?.trim().parse().ok()?;
        if key < min || key > max {
            return None;
        }
        entries.push((key, label));
    }
    if entries.is_empty() {
        return None;
    }
    Some(EnumTable::new(entries))
}

/// Returns the argument list of `Name(...)` when `spec` is exactly that call.
fn unwrap_call<'a>(spec: &'a str, name: &str) -> Option<&'a str> {
    let rest = spec.strip_prefix(name)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.trim())
}

/// Splits on top-level commas, ignoring commas inside quotes or parentheses.
fn split_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '\'' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' => in_quote = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = args[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

/// Reads a single-quoted literal with backslash escapes, returning it and the remaining text.
fn parse_quoted(s: &str) -> Option<(String, &str)> {
    let body = s.strip_prefix('\'')?;
    let mut out = String::new();
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '\'' {
            return Some((out, &body[i + 1..]));
        } else {
            out.push(c);
        }
    }
    None
}

fn unsupported(spec: &str) -> CodecError {
    CodecError::UnsupportedType(spec.to_string())
}
