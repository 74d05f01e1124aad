//! Field values and field specifications.
//!
//! A layout is an ordered list of `Field`s. Each one pairs the caller's value with
//! the `FieldSpec` that says how wide the slot is, how to render into it and which
//! rules the value must satisfy.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::validation::Rule;

/// A raw field value as supplied by a record struct.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Absent,
}

impl Value {
    /// String form used by pattern and choice rules.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Date(d) => d.format("%Y%m%d").to_string(),
            Self::Absent => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Absent => true,
            _ => false,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Decimal(d) => Some(*d),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub const fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        i64::try_from(i).map_or_else(|_| Self::Text(i.to_string()), Self::Integer)
    }
}

impl From<u8> for Value {
    fn from(i: u8) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

/// Date rendering patterns used by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `YYYYMMDD`
    Full,
    /// `MMYYYY`, for period fields.
    MonthYear,
}

impl DatePattern {
    pub const fn strftime(self) -> &'static str {
        match self {
            Self::Full => "%Y%m%d",
            Self::MonthYear => "%m%Y",
        }
    }

    pub const fn width(self) -> usize {
        match self {
            Self::Full => 8,
            Self::MonthYear => 6,
        }
    }
}

/// How a value is rendered into its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Zero-padded digits; `decimals` digits are implied after the point.
    Numeric { width: usize, decimals: u32 },
    /// Upper-case ASCII, space padded on the right.
    Text { width: usize },
    Date(DatePattern),
    /// Legacy rate shape: right-fill to 4 with zeros, then left-fill to `width`.
    Aliquota { width: usize },
}

impl Format {
    pub const fn width(&self) -> usize {
        match *self {
            Self::Numeric { width, .. } | Self::Text { width } | Self::Aliquota { width } => width,
            Self::Date(pattern) => pattern.width(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub format: Format,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::NotBlank)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub spec: FieldSpec,
    pub value: Value,
}

impl Field {
    pub fn new(name: &'static str, format: Format, value: impl Into<Value>) -> Self {
        Self {
            spec: FieldSpec {
                name,
                format,
                rules: &[],
            },
            value: value.into(),
        }
    }

    pub fn numeric(name: &'static str, width: usize, value: impl Into<Value>) -> Self {
        Self::new(name, Format::Numeric { width, decimals: 0 }, value)
    }

    pub fn decimal(name: &'static str, width: usize, decimals: u32, value: impl Into<Value>) -> Self {
        Self::new(name, Format::Numeric { width, decimals }, value)
    }

    pub fn text(name: &'static str, width: usize, value: impl Into<Value>) -> Self {
        Self::new(name, Format::Text { width }, value)
    }

    pub fn date(name: &'static str, value: NaiveDate) -> Self {
        Self::new(name, Format::Date(DatePattern::Full), value)
    }

    pub fn period(name: &'static str, value: NaiveDate) -> Self {
        Self::new(name, Format::Date(DatePattern::MonthYear), value)
    }

    pub fn aliquota(name: &'static str, width: usize, value: impl Into<Value>) -> Self {
        Self::new(name, Format::Aliquota { width }, value)
    }

    /// Blank filler slot.
    pub fn filler(name: &'static str, width: usize) -> Self {
        Self::text(name, width, Value::Absent)
    }

    #[must_use]
    pub fn rules(mut self, rules: &'static [Rule]) -> Self {
        self.spec.rules = rules;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_maps_to_absent() {
        let none: Option<String> = None;
        assert_eq!(Value::from(none), Value::Absent);
        assert_eq!(Value::from(Some("X")), Value::Text("X".into()));
    }

    #[test]
    fn test_blankness() {
        assert!(Value::Text("   ".into()).is_blank());
        assert!(Value::Absent.is_blank());
        assert!(!Value::Integer(0).is_blank());
        assert!(!Value::Decimal(Decimal::ZERO).is_blank());
    }

    #[test]
    fn test_decimal_from_text() {
        let value = Value::Text(" 2.675 ".into());
        assert_eq!(value.as_decimal(), Some(Decimal::new(2675, 3)));
        assert_eq!(Value::Text("abc".into()).as_decimal(), None);
    }

    #[test]
    fn test_widths() {
        assert_eq!(Format::Date(DatePattern::MonthYear).width(), 6);
        assert_eq!(Field::decimal("v", 13, 2, Decimal::new(15, 1)).spec.format.width(), 13);
    }
}
