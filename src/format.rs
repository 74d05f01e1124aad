//! Field formatter: renders one value into its fixed-width slot.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::ascii::to_ascii;
use crate::error::{Result, SintegraError};
use crate::field::{DatePattern, Field, Format, Value};

/// Render `field` into exactly `field.spec.format.width()` characters.
pub fn format_field(field: &Field) -> Result<String> {
    let name = field.spec.name;
    match field.spec.format {
        Format::Numeric { width, decimals } => numeric(name, &field.value, width, decimals),
        Format::Text { width } => Ok(text(&field.value, width)),
        Format::Date(pattern) => date(name, &field.value, pattern),
        Format::Aliquota { width } => aliquota(name, &field.value, width),
    }
}

/// Zero-padded digits with `decimals` implied fractional digits.
pub fn numeric(name: &str, value: &Value, width: usize, decimals: u32) -> Result<String> {
    let digits = match value {
        Value::Absent => String::new(),
        Value::Integer(i) => scaled_integer(i.unsigned_abs().to_string(), decimals),
        Value::Decimal(d) => decimal_digits(name, *d, decimals)?,
        Value::Text(s) => match s.trim().parse::<Decimal>() {
            Ok(d) if decimals > 0 => decimal_digits(name, d, decimals)?,
            _ => scaled_integer(s.chars().filter(char::is_ascii_digit).collect(), decimals),
        },
        Value::Date(_) => {
            return Err(SintegraError::FieldTypeMismatch {
                field: name.to_string(),
                expected: "numeric",
            })
        }
    };

    let digits = digits.trim_start_matches('0');
    if digits.len() > width {
        return Err(SintegraError::FormatOverflow {
            field: name.to_string(),
            width,
            rendered: digits.to_string(),
        });
    }
    Ok(format!("{digits:0>width$}"))
}

/// Half-away-from-zero rounding to `decimals` places, then the mantissa digits.
fn decimal_digits(name: &str, value: Decimal, decimals: u32) -> Result<String> {
    let mut rounded = value
        .abs()
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    if rounded.scale() != decimals {
        return Err(SintegraError::FormatOverflow {
            field: name.to_string(),
            width: decimals as usize,
            rendered: value.to_string(),
        });
    }
    Ok(rounded.mantissa().unsigned_abs().to_string())
}

fn scaled_integer(mut digits: String, decimals: u32) -> String {
    if !digits.is_empty() {
        digits.extend(std::iter::repeat('0').take(decimals as usize));
    }
    digits
}

/// ASCII, upper-case, space padded; longer input keeps its rightmost `width` characters.
pub fn text(value: &Value, width: usize) -> String {
    let ascii = to_ascii(&value.as_text()).to_uppercase();
    let padded = format!("{ascii:<width$}");
    let skip = padded.len() - width;
    padded[skip..].to_string()
}

pub fn date(name: &str, value: &Value, pattern: DatePattern) -> Result<String> {
    let width = pattern.width();
    let rendered = match value {
        Value::Date(d) => d.format(pattern.strftime()).to_string(),
        Value::Absent => return Ok(" ".repeat(width)),
        _ => {
            return Err(SintegraError::FieldTypeMismatch {
                field: name.to_string(),
                expected: "date",
            })
        }
    };

    // Years beyond 9999 render wider than the slot.
    if rendered.len() != width {
        return Err(SintegraError::FormatOverflow {
            field: name.to_string(),
            width,
            rendered,
        });
    }
    Ok(rendered)
}

/// Legacy two-stage rate: `"7"` becomes `"7000"`, `"07"` becomes `"0700"`.
pub fn aliquota(name: &str, value: &Value, width: usize) -> Result<String> {
    let raw = value.as_text();
    let raw = raw.trim();
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SintegraError::FieldTypeMismatch {
            field: name.to_string(),
            expected: "digits",
        });
    }
    let stage_one = format!("{raw:0<4}");
    if stage_one.len() > width {
        return Err(SintegraError::FormatOverflow {
            field: name.to_string(),
            width,
            rendered: stage_one,
        });
    }
    Ok(format!("{stage_one:0>width$}"))
}
