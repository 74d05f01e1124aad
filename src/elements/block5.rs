//! Block 5: invoices and their items.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::element::Layout;
use crate::field::Field;
use crate::records::RecordKind;
use crate::validation::{common, Rule};

use super::isento;

const ADVANCE_CODE: &[Rule] = &[Rule::Choice(&["1", "2", "3", "4", "5", "6"])];
const OPERATION_TYPE: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["1", "2", "3"])];
const CHASSIS: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^[A-Za-z0-9]{17}$")];

/// Registro 50: invoice totals (models 01, 1-A, 04, 06, 21, 22, 55).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record50 {
    pub cnpj: String,
    #[serde(default)]
    pub ie: Option<String>,
    pub date: NaiveDate,
    pub uf: String,
    pub model: String,
    pub series: String,
    pub number: u32,
    pub cfop: u32,
    /// `P` own issue, `T` third party.
    pub issuer: String,
    pub total: Decimal,
    pub icms_base: Decimal,
    pub icms: Decimal,
    pub exempt: Decimal,
    #[serde(default)]
    pub others: Option<Decimal>,
    pub icms_rate: Decimal,
    pub situation: String,
}

impl Layout for Record50 {
    const KIND: RecordKind = RecordKind::R50;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("ie", 14, isento(&self.ie)).rules(common::IE),
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("uf", 2, &self.uf).rules(common::UF),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::text("issuer", 1, &self.issuer).rules(common::ISSUER),
            Field::decimal("total", 13, 2, self.total).rules(common::AMOUNT),
            Field::decimal("icms_base", 13, 2, self.icms_base).rules(common::AMOUNT),
            Field::decimal("icms", 13, 2, self.icms).rules(common::AMOUNT),
            Field::decimal("exempt", 13, 2, self.exempt).rules(common::AMOUNT),
            Field::decimal("others", 13, 2, self.others.unwrap_or_default()).rules(common::AMOUNT),
            Field::decimal("icms_rate", 4, 2, self.icms_rate).rules(common::AMOUNT),
            Field::text("situation", 1, &self.situation).rules(common::SITUATION),
        ]
    }
}

/// Registro 51: IPI totals of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record51 {
    pub cnpj: String,
    #[serde(default)]
    pub ie: Option<String>,
    pub date: NaiveDate,
    pub uf: String,
    pub series: String,
    pub number: u32,
    pub cfop: u32,
    pub total: Decimal,
    pub ipi: Decimal,
    pub exempt: Decimal,
    #[serde(default)]
    pub others: Option<Decimal>,
    pub situation: String,
}

impl Layout for Record51 {
    const KIND: RecordKind = RecordKind::R51;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("ie", 14, isento(&self.ie)).rules(common::IE),
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("uf", 2, &self.uf).rules(common::UF),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::decimal("total", 13, 2, self.total).rules(common::AMOUNT),
            Field::decimal("ipi", 13, 2, self.ipi).rules(common::AMOUNT),
            Field::decimal("exempt", 13, 2, self.exempt).rules(common::AMOUNT),
            Field::decimal("others", 13, 2, self.others.unwrap_or_default()).rules(common::AMOUNT),
            Field::filler("filler", 20),
            Field::text("situation", 1, &self.situation).rules(common::SITUATION),
        ]
    }
}

/// Registro 53: tax substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record53 {
    pub cnpj: String,
    #[serde(default)]
    pub ie: Option<String>,
    pub date: NaiveDate,
    pub uf: String,
    pub model: String,
    pub series: String,
    pub number: u32,
    pub cfop: u32,
    pub issuer: String,
    pub st_base: Decimal,
    pub st_icms: Decimal,
    pub expenses: Decimal,
    pub situation: String,
    /// Advance payment code, blank when not applicable.
    #[serde(default)]
    pub advance_code: Option<String>,
}

impl Layout for Record53 {
    const KIND: RecordKind = RecordKind::R53;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("ie", 14, isento(&self.ie)).rules(common::IE),
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("uf", 2, &self.uf).rules(common::UF),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::text("issuer", 1, &self.issuer).rules(common::ISSUER),
            Field::decimal("st_base", 13, 2, self.st_base).rules(common::AMOUNT),
            Field::decimal("st_icms", 13, 2, self.st_icms).rules(common::AMOUNT),
            Field::decimal("expenses", 13, 2, self.expenses).rules(common::AMOUNT),
            Field::text("situation", 1, &self.situation).rules(common::SITUATION),
            Field::text("advance_code", 1, self.advance_code.clone()).rules(ADVANCE_CODE),
            Field::filler("filler", 29),
        ]
    }
}

/// Registro 54: invoice item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record54 {
    pub cnpj: String,
    pub model: String,
    pub series: String,
    pub number: u32,
    pub cfop: u32,
    pub cst: String,
    pub item: u32,
    pub product: String,
    pub quantity: Decimal,
    pub value: Decimal,
    pub discount: Decimal,
    pub icms_base: Decimal,
    pub st_base: Decimal,
    pub ipi: Decimal,
    pub icms_rate: Decimal,
}

impl Layout for Record54 {
    const KIND: RecordKind = RecordKind::R54;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::numeric("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::numeric("cst", 3, &self.cst).rules(common::CST),
            Field::numeric("item", 3, self.item).rules(common::ITEM),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::decimal("quantity", 11, 3, self.quantity).rules(common::POSITIVE),
            Field::decimal("value", 12, 2, self.value).rules(common::POSITIVE),
            Field::decimal("discount", 12, 2, self.discount).rules(common::AMOUNT),
            Field::decimal("icms_base", 12, 2, self.icms_base).rules(common::AMOUNT),
            Field::decimal("st_base", 12, 2, self.st_base).rules(common::AMOUNT),
            Field::decimal("ipi", 12, 2, self.ipi).rules(common::AMOUNT),
            Field::decimal("icms_rate", 4, 2, self.icms_rate).rules(common::AMOUNT),
        ]
    }
}

/// Registro 55: GNRE (guia nacional de recolhimento).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record55 {
    pub cnpj: String,
    #[serde(default)]
    pub ie: Option<String>,
    pub gnre_date: NaiveDate,
    pub uf_substitute: String,
    pub uf_favored: String,
    pub bank: u32,
    pub agency: u32,
    pub gnre_number: String,
    pub total: Decimal,
    pub due_date: NaiveDate,
    /// Month and year of reference; the day is ignored.
    pub period: NaiveDate,
    pub agreement: String,
}

impl Layout for Record55 {
    const KIND: RecordKind = RecordKind::R55;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("ie", 14, isento(&self.ie)).rules(common::IE),
            Field::date("gnre_date", self.gnre_date).rules(common::REQUIRED),
            Field::text("uf_substitute", 2, &self.uf_substitute).rules(common::UF),
            Field::text("uf_favored", 2, &self.uf_favored).rules(common::UF),
            Field::numeric("bank", 3, self.bank).rules(common::REQUIRED),
            Field::numeric("agency", 4, self.agency).rules(common::REQUIRED),
            Field::text("gnre_number", 20, &self.gnre_number).rules(common::REQUIRED),
            Field::decimal("total", 13, 2, self.total).rules(common::AMOUNT),
            Field::date("due_date", self.due_date).rules(common::REQUIRED),
            Field::period("period", self.period).rules(common::REQUIRED),
            Field::text("agreement", 30, &self.agreement).rules(common::REQUIRED),
        ]
    }
}

/// Registro 56: vehicle sales (official layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record56 {
    pub cnpj: String,
    pub model: String,
    pub series: String,
    pub number: u32,
    pub cfop: u32,
    pub cst: String,
    pub item: u32,
    pub product: String,
    /// 1 dealer sale, 2 direct billing, 3 direct sale.
    pub operation_type: u8,
    pub dealer_cnpj: String,
    pub ipi_rate: Decimal,
    pub chassis: String,
}

impl Layout for Record56 {
    const KIND: RecordKind = RecordKind::R56;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::numeric("cst", 3, &self.cst).rules(common::CST),
            Field::numeric("item", 3, self.item).rules(common::ITEM),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::text("operation_type", 1, self.operation_type).rules(OPERATION_TYPE),
            Field::numeric("dealer_cnpj", 14, &self.dealer_cnpj).rules(common::OPTIONAL_TAX_ID),
            Field::decimal("ipi_rate", 4, 2, self.ipi_rate).rules(common::AMOUNT),
            Field::text("chassis", 17, &self.chassis).rules(CHASSIS),
            Field::filler("filler", 39),
        ]
    }
}

/// Registro 57: product lot numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record57 {
    pub cnpj: String,
    #[serde(default)]
    pub ie: Option<String>,
    pub model: String,
    pub series: String,
    pub number: u32,
    pub cfop: u32,
    pub cst: String,
    pub item: u32,
    pub product: String,
    pub lot: String,
}

impl Layout for Record57 {
    const KIND: RecordKind = RecordKind::R57;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("ie", 14, isento(&self.ie)).rules(common::IE),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::numeric("cst", 3, &self.cst).rules(common::CST),
            Field::numeric("item", 3, self.item).rules(common::ITEM),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::text("lot", 20, &self.lot).rules(common::REQUIRED),
            Field::filler("filler", 41),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::fixtures::{date, dec};

    fn record50(number: u32) -> Record50 {
        Record50 {
            cnpj: "50795722052".into(),
            ie: None,
            date: date(2023, 3, 1),
            uf: "MG".into(),
            model: "55".into(),
            series: "1".into(),
            number,
            cfop: 1320,
            issuer: "P".into(),
            total: dec("100.0"),
            icms_base: dec("10.0"),
            icms: dec("10.0"),
            exempt: dec("0.0"),
            others: None,
            icms_rate: dec("0.0"),
            situation: "N".into(),
        }
    }

    #[test]
    fn test_record50_renders() {
        let element = record50(7).build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("total"), Some("0000000010000"));
        assert_eq!(element.field("number"), Some("000007"));
        assert_eq!(element.field("series"), Some("1  "));
        assert!(element.as_str().starts_with("5000050795722052ISENTO        20230301MG551  0000071320P"));
    }

    #[test]
    fn test_record50_rejects_bad_cfop_and_negative_total() {
        let mut record = record50(1);
        record.cfop = 4102;
        record.total = dec("-1.0");
        let err = record.build().unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["cfop", "total"]);
    }

    #[test]
    fn test_record51_renders() {
        let record = Record51 {
            cnpj: "66291561000103".into(),
            ie: Some("283305054".into()),
            date: date(2023, 3, 20),
            uf: "MG".into(),
            series: "123".into(),
            number: 612047,
            cfop: 6102,
            total: dec("300.2223"),
            ipi: dec("300.594"),
            exempt: dec("0.0"),
            others: Some(dec("0.0")),
            situation: "N".into(),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("ipi"), Some("0000000030059"));
    }

    #[test]
    fn test_record53_renders() {
        let record = Record53 {
            cnpj: "66291561000103".into(),
            ie: Some("283305054".into()),
            date: date(2023, 3, 20),
            uf: "MG".into(),
            model: "55".into(),
            series: "123".into(),
            number: 612047,
            cfop: 6102,
            issuer: "P".into(),
            st_base: dec("300.2223"),
            st_icms: dec("30.594"),
            expenses: dec("0.0"),
            situation: "N".into(),
            advance_code: None,
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("advance_code"), Some(" "));
    }

    #[test]
    fn test_record54_renders() {
        let record = Record54 {
            cnpj: "66291561000103".into(),
            model: "55".into(),
            series: "099".into(),
            number: 612047,
            cfop: 6102,
            cst: "010".into(),
            item: 1,
            product: "MG42321".into(),
            quantity: dec("1.0"),
            value: dec("5000.0"),
            discount: dec("5000.0"),
            icms_base: dec("0.0"),
            st_base: dec("10.0"),
            ipi: dec("0.0"),
            icms_rate: dec("10.0"),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("quantity"), Some("00000001000"));
        assert_eq!(element.field("icms_rate"), Some("1000"));
    }

    #[test]
    fn test_record54_item_must_be_positive() {
        let record = Record54 {
            cnpj: "66291561000103".into(),
            model: "55".into(),
            series: "1".into(),
            number: 1,
            cfop: 5102,
            cst: "000".into(),
            item: 0,
            product: "P1".into(),
            quantity: dec("1.0"),
            value: dec("1.0"),
            discount: dec("0.0"),
            icms_base: dec("0.0"),
            st_base: dec("0.0"),
            ipi: dec("0.0"),
            icms_rate: dec("0.0"),
        };
        let err = record.build().unwrap_err();
        assert_eq!(err.violations()[0].field, "item");
    }

    #[test]
    fn test_record55_renders_period_as_month_year() {
        let record = Record55 {
            cnpj: "66291561000103".into(),
            ie: Some("283305054".into()),
            gnre_date: date(2023, 3, 20),
            uf_substitute: "MG".into(),
            uf_favored: "MG".into(),
            bank: 1,
            agency: 123,
            gnre_number: "612047".into(),
            total: dec("100.0"),
            due_date: date(2023, 3, 20),
            period: date(2023, 3, 1),
            agreement: "200505".into(),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("period"), Some("032023"));
        assert_eq!(element.field("bank"), Some("001"));
    }

    #[test]
    fn test_record56_renders() {
        let record = Record56 {
            cnpj: "66291561000103".into(),
            model: "01".into(),
            series: "099".into(),
            number: 1354,
            cfop: 5643,
            cst: "101".into(),
            item: 1,
            product: "ff342".into(),
            operation_type: 2,
            dealer_cnpj: "99999090910270".into(),
            ipi_rate: dec("10.0"),
            chassis: "20050502200505021".into(),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("product"), Some("FF342         "));
    }

    #[test]
    fn test_record57_renders() {
        let record = Record57 {
            cnpj: "66291561000103".into(),
            ie: Some("283305054".into()),
            model: "01".into(),
            series: "099".into(),
            number: 1354,
            cfop: 5643,
            cst: "101".into(),
            item: 1,
            product: "ff342".into(),
            lot: "20050502200505021".into(),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.kind(), RecordKind::R57);
    }
}
