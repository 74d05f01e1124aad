//! Block 6: fiscal coupons (ECF) and documents issued without an invoice.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::element::Layout;
use crate::field::Field;
use crate::records::RecordKind;
use crate::validation::{common, Rule};

const SERIAL: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^.{1,20}$")];
const COUNTER: &[Rule] = &[Rule::NotBlank, Rule::PositiveOrZero];

/// Registro 60M: ECF master, one per equipment per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record60M {
    pub date: NaiveDate,
    pub serial: String,
    /// Order number of the equipment in the establishment.
    pub sequence: u32,
    pub model: String,
    pub start_counter: u32,
    pub end_counter: u32,
    pub reduction_counter: u32,
    pub restart_counter: u32,
    pub gross_sales: Decimal,
    pub grand_total: Decimal,
}

impl Layout for Record60M {
    const KIND: RecordKind = RecordKind::R60M;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("serial", 20, &self.serial).rules(SERIAL),
            Field::numeric("sequence", 3, self.sequence).rules(common::SEQUENCE),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::numeric("start_counter", 6, self.start_counter).rules(COUNTER),
            Field::numeric("end_counter", 6, self.end_counter).rules(COUNTER),
            Field::numeric("reduction_counter", 6, self.reduction_counter).rules(COUNTER),
            Field::numeric("restart_counter", 3, self.restart_counter).rules(COUNTER),
            Field::decimal("gross_sales", 16, 2, self.gross_sales).rules(common::AMOUNT),
            Field::decimal("grand_total", 16, 2, self.grand_total).rules(common::AMOUNT),
            Field::filler("filler", 37),
        ]
    }
}

/// Registro 60A: ECF totals per tax rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record60A {
    pub date: NaiveDate,
    pub serial: String,
    pub rate: Decimal,
    pub value: Decimal,
}

impl Layout for Record60A {
    const KIND: RecordKind = RecordKind::R60A;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("serial", 20, &self.serial).rules(SERIAL),
            Field::decimal("rate", 4, 2, self.rate).rules(common::AMOUNT),
            Field::decimal("value", 12, 2, self.value).rules(common::AMOUNT),
            Field::filler("filler", 79),
        ]
    }
}

/// Registro 60D: ECF daily summary per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record60D {
    pub date: NaiveDate,
    pub serial: String,
    pub product: String,
    pub quantity: Decimal,
    pub value: Decimal,
    pub icms_base: Decimal,
    pub rate: Decimal,
    pub icms: Decimal,
}

impl Layout for Record60D {
    const KIND: RecordKind = RecordKind::R60D;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("serial", 20, &self.serial).rules(SERIAL),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::decimal("quantity", 13, 3, self.quantity).rules(common::AMOUNT),
            Field::decimal("value", 16, 2, self.value).rules(common::AMOUNT),
            Field::decimal("icms_base", 16, 2, self.icms_base).rules(common::AMOUNT),
            Field::decimal("rate", 4, 2, self.rate).rules(common::AMOUNT),
            Field::decimal("icms", 13, 2, self.icms).rules(common::AMOUNT),
            Field::filler("filler", 19),
        ]
    }
}

/// Registro 60I: ECF coupon item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record60I {
    pub date: NaiveDate,
    pub serial: String,
    pub model: String,
    /// Coupon order number (COO).
    pub number: u32,
    pub item: u32,
    pub product: String,
    pub quantity: Decimal,
    pub value: Decimal,
    pub icms_base: Decimal,
    pub rate: Decimal,
    pub icms: Decimal,
}

impl Layout for Record60I {
    const KIND: RecordKind = RecordKind::R60I;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("serial", 20, &self.serial).rules(SERIAL),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::numeric("item", 3, self.item).rules(common::ITEM),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::decimal("quantity", 13, 3, self.quantity).rules(common::AMOUNT),
            Field::decimal("value", 13, 2, self.value).rules(common::AMOUNT),
            Field::decimal("icms_base", 12, 2, self.icms_base).rules(common::AMOUNT),
            Field::decimal("rate", 4, 2, self.rate).rules(common::AMOUNT),
            Field::decimal("icms", 12, 2, self.icms).rules(common::AMOUNT),
            Field::filler("filler", 16),
        ]
    }
}

/// Registro 60R: monthly ECF summary per product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record60R {
    /// Month and year of reference.
    pub period: NaiveDate,
    pub product: String,
    pub quantity: Decimal,
    pub value: Decimal,
    pub icms_base: Decimal,
    pub rate: Decimal,
}

impl Layout for Record60R {
    const KIND: RecordKind = RecordKind::R60R;

    fn fields(&self) -> Vec<Field> {
        monthly_summary(
            self.period,
            &self.product,
            self.quantity,
            self.value,
            self.icms_base,
            self.rate,
        )
    }
}

/// Registro 61: documents issued without an invoice (bilhetes, cupons de venda).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record61 {
    pub date: NaiveDate,
    pub model: String,
    pub series: String,
    #[serde(default)]
    pub subseries: Option<String>,
    pub first_number: u32,
    pub last_number: u32,
    pub total: Decimal,
    pub icms_base: Decimal,
    pub icms: Decimal,
    pub exempt: Decimal,
    pub others: Decimal,
    pub rate: Decimal,
}

impl Layout for Record61 {
    const KIND: RecordKind = RecordKind::R61;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::filler("blank", 28),
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::text("subseries", 2, self.subseries.clone()),
            Field::numeric("first_number", 6, self.first_number).rules(common::NUMBER6),
            Field::numeric("last_number", 6, self.last_number).rules(common::NUMBER6),
            Field::decimal("total", 13, 2, self.total).rules(common::AMOUNT),
            Field::decimal("icms_base", 13, 2, self.icms_base).rules(common::AMOUNT),
            Field::decimal("icms", 12, 2, self.icms).rules(common::AMOUNT),
            Field::decimal("exempt", 13, 2, self.exempt).rules(common::AMOUNT),
            Field::decimal("others", 13, 2, self.others).rules(common::AMOUNT),
            Field::decimal("rate", 4, 2, self.rate).rules(common::AMOUNT),
            Field::filler("filler", 1),
        ]
    }
}

/// Registro 61R: monthly summary per product of registro 61 documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record61R {
    pub period: NaiveDate,
    pub product: String,
    pub quantity: Decimal,
    pub value: Decimal,
    pub icms_base: Decimal,
    pub rate: Decimal,
}

impl Layout for Record61R {
    const KIND: RecordKind = RecordKind::R61R;

    fn fields(&self) -> Vec<Field> {
        monthly_summary(
            self.period,
            &self.product,
            self.quantity,
            self.value,
            self.icms_base,
            self.rate,
        )
    }
}

fn monthly_summary(
    period: NaiveDate,
    product: &str,
    quantity: Decimal,
    value: Decimal,
    icms_base: Decimal,
    rate: Decimal,
) -> Vec<Field> {
    vec![
        Field::period("period", period).rules(common::REQUIRED),
        Field::text("product", 14, product).rules(common::REQUIRED),
        Field::decimal("quantity", 13, 3, quantity).rules(common::AMOUNT),
        Field::decimal("value", 16, 2, value).rules(common::AMOUNT),
        Field::decimal("icms_base", 16, 2, icms_base).rules(common::AMOUNT),
        Field::decimal("rate", 4, 2, rate).rules(common::AMOUNT),
        Field::filler("filler", 54),
    ]
}
