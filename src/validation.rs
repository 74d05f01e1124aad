//! Validation system: rules produce structured violations.
//!
//! Each field carries a static list of `Rule`s. The `Validator` runs every rule of
//! every field plus the record-level cross checks and collects all violations in a
//! single pass, so callers see every problem of an element at once.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::documents::{is_valid_gtin, is_valid_tax_id};
use crate::field::{Field, Value};

static PATTERNS: LazyLock<Mutex<HashMap<&'static str, Regex>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn pattern_matches(pattern: &'static str, text: &str) -> bool {
    let mut cache = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    cache
        .entry(pattern)
        .or_insert_with(|| Regex::new(pattern).expect("layout patterns are valid regex"))
        .is_match(text)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    NotBlank,
    Pattern(&'static str),
    Numeric,
    Positive,
    PositiveOrZero,
    Choice(&'static [&'static str]),
    TaxId,
    Gtin,
    FirstDayOfMonth,
    LastDayOfMonth,
}

impl Rule {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotBlank => "not_blank",
            Self::Pattern(_) => "pattern",
            Self::Numeric => "numeric",
            Self::Positive => "positive",
            Self::PositiveOrZero => "positive_or_zero",
            Self::Choice(_) => "choice",
            Self::TaxId => "tax_id",
            Self::Gtin => "gtin",
            Self::FirstDayOfMonth => "first_day_of_month",
            Self::LastDayOfMonth => "last_day_of_month",
        }
    }

    /// `None` when `value` satisfies the rule, otherwise the failure message.
    ///
    /// Only `NotBlank` looks at blank values; every other rule passes them so that
    /// optional fields validate when omitted.
    pub fn check(&self, value: &Value) -> Option<String> {
        if value.is_blank() {
            return (*self == Self::NotBlank).then(|| "value is required".to_string());
        }

        let text = value.as_text();
        let (ok, message) = match *self {
            Self::NotBlank => (true, String::new()),
            Self::Pattern(pattern) => (pattern_matches(pattern, &text), format!("does not match {pattern}")),
            Self::Numeric => (value.as_decimal().is_some(), "must be numeric".into()),
            Self::Positive => (
                value.as_decimal().is_some_and(|n| n > Decimal::ZERO),
                "must be greater than zero".into(),
            ),
            Self::PositiveOrZero => (
                value.as_decimal().is_some_and(|n| n >= Decimal::ZERO),
                "must be zero or greater".into(),
            ),
            Self::Choice(options) => (
                options.contains(&text.trim()),
                format!("must be one of [{}]", options.join(", ")),
            ),
            Self::TaxId => (is_valid_tax_id(&text), "is not a valid CPF/CNPJ".into()),
            Self::Gtin => (is_valid_gtin(&text), "is not a valid GTIN".into()),
            Self::FirstDayOfMonth => (
                value.as_date().is_some_and(|d| d.day() == 1),
                "must be the first day of a month".into(),
            ),
            Self::LastDayOfMonth => (
                value.as_date().is_some_and(is_last_day_of_month),
                "must be the last day of a month".into(),
            ),
        };
        (!ok).then_some(message)
    }
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub rule: &'static str,
    pub field: String,
    pub message: String,
    pub actual: Option<String>,
}

impl Violation {
    /// A record-level violation not tied to one field rule.
    pub fn record(field: &str, message: impl Into<String>) -> Self {
        Self {
            rule: "record",
            field: field.to_string(),
            message: message.into(),
            actual: None,
        }
    }
}

/// Every violation of one field, in rule order.
pub fn validate_field(field: &Field) -> Vec<Violation> {
    field
        .spec
        .rules
        .iter()
        .filter_map(|rule| {
            rule.check(&field.value).map(|message| Violation {
                rule: rule.name(),
                field: field.spec.name.to_string(),
                message,
                actual: (!field.value.is_blank()).then(|| field.value.as_text()),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

/// Runs field rules then record checks and reports all of them together.
#[derive(Debug, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, fields: &[Field], cross_checks: Vec<Violation>) -> ValidationResult {
        let mut violations: Vec<Violation> = fields.iter().flat_map(validate_field).collect();
        violations.extend(cross_checks);

        ValidationResult {
            valid: violations.is_empty(),
            violations,
        }
    }
}

/// Rule sets shared by many layouts.
pub mod common {
    use super::Rule;

    pub const REQUIRED: &[Rule] = &[Rule::NotBlank];
    pub const TAX_ID: &[Rule] = &[Rule::NotBlank, Rule::TaxId];
    pub const OPTIONAL_TAX_ID: &[Rule] = &[Rule::TaxId];
    pub const IE: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^(ISENTO|[0-9]{0,14})$")];
    pub const UF: &[Rule] = &[Rule::NotBlank, Rule::Choice(UFS)];
    pub const MODEL: &[Rule] = &[Rule::NotBlank, Rule::Choice(DOCUMENT_MODELS)];
    pub const SERIES: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{1,3}$")];
    pub const NUMBER6: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{1,6}$")];
    pub const CFOP: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^[123567][0-9]{3}$")];
    pub const CST: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^.{1,3}$")];
    pub const ITEM: &[Rule] = &[Rule::NotBlank, Rule::Positive];
    pub const SEQUENCE: &[Rule] = &[Rule::NotBlank, Rule::PositiveOrZero];
    pub const AMOUNT: &[Rule] = &[Rule::NotBlank, Rule::PositiveOrZero];
    pub const OPTIONAL_AMOUNT: &[Rule] = &[Rule::PositiveOrZero];
    pub const POSITIVE: &[Rule] = &[Rule::NotBlank, Rule::Positive];
    pub const SITUATION: &[Rule] = &[Rule::NotBlank, Rule::Choice(SITUATIONS)];
    pub const ISSUER: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["P", "T"])];
    pub const GTIN: &[Rule] = &[Rule::Gtin];

    pub const UFS: &[&str] = &[
        "AC", "AL", "AM", "AP", "BA", "CE", "DF", "ES", "EX", "GO", "MA", "MG", "MS", "MT", "PA",
        "PB", "PE", "PI", "PR", "RJ", "RN", "RO", "RR", "RS", "SC", "SE", "SP", "TO",
    ];

    pub const DOCUMENT_MODELS: &[&str] = &[
        "01", "02", "03", "04", "06", "07", "08", "09", "10", "11", "13", "14", "15", "16", "17",
        "18", "20", "21", "22", "24", "25", "26", "27", "55", "57", "60", "63", "65", "66", "67",
    ];

    /// `S` cancelled, `N` normal, `E`/`X` extemporaneous, `2` denied, `4` unused number.
    pub const SITUATIONS: &[&str] = &["S", "N", "E", "X", "2", "4"];

    pub const BILL_TYPES: &[&str] = &[
        "01", "02", "03", "04", "06", "07", "08", "09", "10", "11", "12", "13", "14", "16", "17",
        "18", "19", "20", "91", "92", "93", "99",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_blank_skips_everything_but_not_blank() {
        assert!(Rule::Gtin.check(&Value::Absent).is_none());
        assert!(Rule::Pattern(r"^\d+$").check(&Value::Text("  ".into())).is_none());
        assert!(Rule::NotBlank.check(&Value::Absent).is_some());
    }

    #[test]
    fn test_ie_pattern_is_anchored_on_both_alternatives() {
        let ie = common::IE[1];
        assert!(ie.check(&Value::Text("ISENTO".into())).is_none());
        assert!(ie.check(&Value::Text("126199884".into())).is_none());
        assert!(ie.check(&Value::Text("ISENTO123".into())).is_some());
        assert!(ie.check(&Value::Text("12A".into())).is_some());
    }

    #[test]
    fn test_cfop_pattern() {
        let cfop = common::CFOP[1];
        assert!(cfop.check(&Value::Integer(5102)).is_none());
        assert!(cfop.check(&Value::Integer(4102)).is_some());
        assert!(cfop.check(&Value::Integer(510)).is_some());
    }

    #[test]
    fn test_positive_rules() {
        assert!(Rule::Positive.check(&Value::Decimal(Decimal::ZERO)).is_some());
        assert!(Rule::Positive.check(&Value::Integer(1)).is_none());
        assert!(Rule::PositiveOrZero.check(&Value::Decimal(Decimal::ZERO)).is_none());
        assert!(Rule::PositiveOrZero.check(&Value::Decimal(Decimal::new(-1, 2))).is_some());
        assert!(Rule::PositiveOrZero.check(&Value::Text("-1".into())).is_some());
    }

    #[test]
    fn test_series_is_required() {
        let blank = Field::text("series", 3, "").rules(common::SERIES);
        let violations = validate_field(&blank);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "not_blank");

        let wide = Field::text("series", 3, "1234").rules(common::SERIES);
        assert_eq!(validate_field(&wide)[0].rule, "pattern");
    }

    #[test]
    fn test_month_boundaries() {
        assert!(Rule::FirstDayOfMonth.check(&Value::Date(date(2023, 3, 1))).is_none());
        assert!(Rule::FirstDayOfMonth.check(&Value::Date(date(2023, 3, 2))).is_some());
        assert!(is_last_day_of_month(date(2024, 2, 29)));
        assert!(!is_last_day_of_month(date(2024, 2, 28)));
        assert!(is_last_day_of_month(date(2023, 2, 28)));
        assert!(is_last_day_of_month(date(2023, 12, 31)));
    }

    #[test]
    fn test_validator_collects_every_violation() {
        let fields = vec![
            Field::numeric("cnpj", 14, "123").rules(common::TAX_ID),
            Field::text("uf", 2, "ZZ").rules(common::UF),
            Field::text("name", 35, "").rules(common::REQUIRED),
        ];
        let result = Validator::new().validate(&fields, vec![Violation::record("period", "bad")]);

        assert!(!result.valid);
        let names: Vec<_> = result.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(names, ["cnpj", "uf", "name", "period"]);
        assert_eq!(result.violations[0].actual.as_deref(), Some("123"));
    }

    #[test]
    fn test_violation_serializes() {
        let v = Violation::record("end_date", "before start");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["rule"], "record");
        assert_eq!(json["field"], "end_date");
    }
}
