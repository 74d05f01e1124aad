//! Block 8: exports and state-specific registros 88.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::element::Layout;
use crate::field::Field;
use crate::records::RecordKind;
use crate::validation::{common, Rule};

use super::isento;

const EXPORT_NATURE: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["1", "2", "3", "4"])];
const SHIPMENT: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^(PROPRIO|.{1,16})$")];
const BILL_TYPE: &[Rule] = &[Rule::NotBlank, Rule::Choice(common::BILL_TYPES)];
const EXPORT_PROOF: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{1,8}$")];
const RELATIONSHIP: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["0", "1", "2", "3"])];
const EAN_VERSION: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["8", "12", "13", "14"])];
const BARCODE: &[Rule] = &[Rule::NotBlank, Rule::Gtin];
const NUMBER9: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{1,9}$")];
const NFE_KEY: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{1,44}$")];

/// Registro 85: export declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record85 {
    pub declaration: u64,
    pub declaration_date: NaiveDate,
    /// 1 direct export, 2 indirect, 3 direct under simplified regime, 4 indirect simplified.
    pub nature: u8,
    pub export_register: u64,
    pub register_date: NaiveDate,
    /// Bill of lading number, or `PROPRIO` for own transport.
    pub shipment: String,
    pub shipment_date: NaiveDate,
    pub bill_type: String,
    pub country: u32,
    pub export_proof: String,
    pub invoice_number: u32,
    pub invoice_date: NaiveDate,
    pub invoice_model: String,
    pub invoice_series: String,
}

impl Layout for Record85 {
    const KIND: RecordKind = RecordKind::R85;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("declaration", 11, self.declaration).rules(common::REQUIRED),
            Field::date("declaration_date", self.declaration_date).rules(common::REQUIRED),
            Field::text("nature", 1, self.nature).rules(EXPORT_NATURE),
            Field::numeric("export_register", 12, self.export_register).rules(common::REQUIRED),
            Field::date("register_date", self.register_date).rules(common::REQUIRED),
            Field::text("shipment", 16, &self.shipment).rules(SHIPMENT),
            Field::date("shipment_date", self.shipment_date).rules(common::REQUIRED),
            Field::text("bill_type", 2, &self.bill_type).rules(BILL_TYPE),
            Field::numeric("country", 4, self.country).rules(common::POSITIVE),
            Field::numeric("reserved", 8, None::<u32>),
            Field::text("export_proof", 8, &self.export_proof).rules(EXPORT_PROOF),
            Field::numeric("invoice_number", 6, self.invoice_number).rules(common::NUMBER6),
            Field::date("invoice_date", self.invoice_date).rules(common::REQUIRED),
            Field::text("invoice_model", 2, &self.invoice_model).rules(common::MODEL),
            Field::text("invoice_series", 3, &self.invoice_series).rules(common::SERIES),
            Field::filler("filler", 19),
        ]
    }
}

/// Registro 86: export registration detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record86 {
    pub export_register: u64,
    pub register_date: NaiveDate,
    pub sender_cnpj: String,
    #[serde(default)]
    pub sender_ie: Option<String>,
    pub uf: String,
    pub invoice_number: u32,
    pub invoice_date: NaiveDate,
    pub invoice_model: String,
    pub invoice_series: String,
    pub product: String,
    pub quantity: Decimal,
    pub unit_value: Decimal,
    pub value: Decimal,
    /// 0 no relationship, 1 to 3 relationship with registros 85.
    pub relationship: u8,
}

impl Layout for Record86 {
    const KIND: RecordKind = RecordKind::R86;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("export_register", 12, self.export_register).rules(common::REQUIRED),
            Field::date("register_date", self.register_date).rules(common::REQUIRED),
            Field::numeric("sender_cnpj", 14, &self.sender_cnpj).rules(common::TAX_ID),
            Field::text("sender_ie", 14, isento(&self.sender_ie)).rules(common::IE),
            Field::text("uf", 2, &self.uf).rules(common::UF),
            Field::numeric("invoice_number", 6, self.invoice_number).rules(common::NUMBER6),
            Field::date("invoice_date", self.invoice_date).rules(common::REQUIRED),
            Field::text("invoice_model", 2, &self.invoice_model).rules(common::MODEL),
            Field::text("invoice_series", 3, &self.invoice_series).rules(common::SERIES),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::decimal("quantity", 11, 3, self.quantity).rules(common::AMOUNT),
            Field::decimal("unit_value", 12, 2, self.unit_value).rules(common::AMOUNT),
            Field::decimal("value", 12, 2, self.value).rules(common::AMOUNT),
            Field::text("relationship", 1, self.relationship).rules(RELATIONSHIP),
            Field::filler("filler", 5),
        ]
    }
}

/// Registro 88DV: returns of goods sold through ECF coupons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record88Dv {
    pub date: NaiveDate,
    pub series: String,
    pub number: u32,
    /// Coupon order number of the original sale.
    pub coupon_coo: u32,
    pub coupon_date: NaiveDate,
    pub item: u32,
    pub product: String,
    pub quantity: Decimal,
    /// COO of the reduction Z that covered the sale.
    pub report_coo: u32,
    pub report_date: NaiveDate,
    pub serial: String,
    pub cnpj: String,
    pub unit_value: Decimal,
    pub icms_base: Decimal,
    pub icms: Decimal,
}

impl Layout for Record88Dv {
    const KIND: RecordKind = RecordKind::R88Dv;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::numeric("coupon_coo", 6, self.coupon_coo).rules(common::NUMBER6),
            Field::date("coupon_date", self.coupon_date).rules(common::REQUIRED),
            Field::numeric("item", 3, self.item).rules(common::ITEM),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::decimal("quantity", 13, 3, self.quantity).rules(common::POSITIVE),
            Field::numeric("report_coo", 6, self.report_coo).rules(common::NUMBER6),
            Field::date("report_date", self.report_date).rules(common::REQUIRED),
            Field::text("serial", 20, &self.serial).rules(common::REQUIRED),
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::decimal("unit_value", 12, 2, self.unit_value).rules(common::AMOUNT),
            Field::decimal("icms_base", 12, 2, self.icms_base).rules(common::AMOUNT),
            Field::decimal("icms", 12, 2, self.icms).rules(common::AMOUNT),
        ]
    }
}

/// Registro 88EAN: barcode of a catalogued product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record88Ean {
    pub ean_version: u8,
    pub product: String,
    pub description: String,
    pub unit: String,
    pub barcode: String,
}

impl Layout for Record88Ean {
    const KIND: RecordKind = RecordKind::R88Ean;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("ean_version", 2, self.ean_version).rules(EAN_VERSION),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::text("description", 53, &self.description).rules(common::REQUIRED),
            Field::text("unit", 6, &self.unit).rules(common::REQUIRED),
            Field::text("barcode", 14, &self.barcode).rules(BARCODE),
            Field::filler("filler", 32),
        ]
    }
}

/// Registro 88SME: no inbound movement in the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record88Sme {
    pub cnpj: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Layout for Record88Sme {
    const KIND: RecordKind = RecordKind::R88Sme;

    fn fields(&self) -> Vec<Field> {
        no_movement(&self.cnpj, &self.message, "SEM MOVIMENTO DE ENTRADAS")
    }
}

/// Registro 88SMS: no outbound movement in the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record88Sms {
    pub cnpj: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Layout for Record88Sms {
    const KIND: RecordKind = RecordKind::R88Sms;

    fn fields(&self) -> Vec<Field> {
        no_movement(&self.cnpj, &self.message, "SEM MOVIMENTO DE SAIDAS")
    }
}

fn no_movement(cnpj: &str, message: &Option<String>, default: &str) -> Vec<Field> {
    let message = message.as_deref().unwrap_or(default);
    vec![
        Field::numeric("cnpj", 14, cnpj).rules(common::TAX_ID),
        Field::text("message", 34, message).rules(common::REQUIRED),
        Field::filler("filler", 73),
    ]
}

/// Registro 88STES: stock of goods subject to tax substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record88Stes {
    pub cnpj: String,
    pub inventory_date: NaiveDate,
    pub product: String,
    pub quantity: Decimal,
    /// Unit ICMS withheld by substitution.
    pub st_value: Decimal,
    /// Unit ICMS of the own operation.
    pub op_value: Decimal,
}

impl Layout for Record88Stes {
    const KIND: RecordKind = RecordKind::R88Stes;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::date("inventory_date", self.inventory_date).rules(common::REQUIRED),
            Field::text("product", 60, &self.product).rules(common::REQUIRED),
            Field::decimal("quantity", 13, 3, self.quantity).rules(common::AMOUNT),
            Field::decimal("st_value", 12, 2, self.st_value).rules(common::AMOUNT),
            Field::decimal("op_value", 12, 2, self.op_value).rules(common::AMOUNT),
            Field::filler("filler", 1),
        ]
    }
}

/// Registro 88STITNF: invoice items of goods subject to tax substitution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record88Stitnf {
    pub cnpj: String,
    pub model: String,
    pub series: String,
    pub number: u32,
    pub cfop: u32,
    pub cst: String,
    pub item: u32,
    pub entry_date: NaiveDate,
    pub product: String,
    pub quantity: Decimal,
    pub value: Decimal,
    pub discount: Decimal,
    pub op_base: Decimal,
    pub st_base: Decimal,
    pub st_rate: Decimal,
    pub op_rate: Decimal,
    pub ipi: Decimal,
    pub nfe_key: String,
}

impl Layout for Record88Stitnf {
    const KIND: RecordKind = RecordKind::R88Stitnf;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 3, &self.series).rules(common::SERIES),
            Field::numeric("number", 9, self.number).rules(NUMBER9),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::numeric("cst", 3, &self.cst).rules(common::CST),
            Field::numeric("item", 3, self.item).rules(common::ITEM),
            Field::date("entry_date", self.entry_date).rules(common::REQUIRED),
            Field::text("product", 60, &self.product).rules(common::REQUIRED),
            Field::decimal("quantity", 11, 3, self.quantity).rules(common::POSITIVE),
            Field::decimal("value", 12, 2, self.value).rules(common::AMOUNT),
            Field::decimal("discount", 12, 2, self.discount).rules(common::AMOUNT),
            Field::decimal("op_base", 12, 2, self.op_base).rules(common::AMOUNT),
            Field::decimal("st_base", 12, 2, self.st_base).rules(common::AMOUNT),
            Field::decimal("st_rate", 4, 2, self.st_rate).rules(common::AMOUNT),
            Field::decimal("op_rate", 4, 2, self.op_rate).rules(common::AMOUNT),
            Field::decimal("ipi", 12, 2, self.ipi).rules(common::AMOUNT),
            Field::numeric("nfe_key", 44, &self.nfe_key).rules(NFE_KEY),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::fixtures::{date, dec};

    #[test]
    fn test_record85_renders() {
        let day = date(2023, 5, 26);
        let record = Record85 {
            declaration: 2341234132,
            declaration_date: day,
            nature: 1,
            export_register: 23421234,
            register_date: day,
            shipment: "3423141".into(),
            shipment_date: day,
            bill_type: "01".into(),
            country: 2635,
            export_proof: "1232323".into(),
            invoice_number: 452434,
            invoice_date: day,
            invoice_model: "01".into(),
            invoice_series: "1".into(),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("reserved"), Some("00000000"));
        assert_eq!(element.field("declaration"), Some("02341234132"));
    }

    #[test]
    fn test_record86_renders() {
        let day = date(2023, 5, 26);
        let record = Record86 {
            export_register: 13535132,
            register_date: day,
            sender_cnpj: "66291561000103".into(),
            sender_ie: None,
            uf: "MG".into(),
            invoice_number: 359815,
            invoice_date: day,
            invoice_model: "01".into(),
            invoice_series: "1".into(),
            product: "232".into(),
            quantity: dec("2.0"),
            unit_value: dec("200.0"),
            value: dec("400.0"),
            relationship: 3,
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("sender_ie"), Some("ISENTO        "));
    }

    #[test]
    fn test_record88dv_is_149_wide() {
        let day = date(2023, 5, 26);
        let record = Record88Dv {
            date: day,
            series: "1".into(),
            number: 543510,
            coupon_coo: 359815,
            coupon_date: day,
            item: 1,
            product: "3435134".into(),
            quantity: dec("1.0"),
            report_coo: 13213,
            report_date: day,
            serial: "3545132".into(),
            cnpj: "66291561000103".into(),
            unit_value: dec("200.0"),
            icms_base: dec("0.0"),
            icms: dec("0.0"),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 149);
        assert!(element.as_str().starts_with("88DV20230526"));
    }

    #[test]
    fn test_record88ean_checks_barcode() {
        let mut record = Record88Ean {
            ean_version: 13,
            product: "1".into(),
            description: "Bala Fini Morango".into(),
            unit: "UN".into(),
            barcode: "7891000315507".into(),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert_eq!(element.field("ean_version"), Some("13"));

        record.barcode = "7891000315508".into();
        let err = record.build().unwrap_err();
        assert_eq!(err.violations()[0].rule, "gtin");
    }

    #[test]
    fn test_no_movement_defaults() {
        let sme = Record88Sme {
            cnpj: "66291561000103".into(),
            message: None,
        }
        .build()
        .unwrap();
        let sms = Record88Sms {
            cnpj: "66291561000103".into(),
            message: None,
        }
        .build()
        .unwrap();

        assert_eq!(sme.len(), 126);
        assert_eq!(sms.len(), 126);
        assert_eq!(sme.field("message").map(str::trim_end), Some("SEM MOVIMENTO DE ENTRADAS"));
        assert_eq!(sms.field("message").map(str::trim_end), Some("SEM MOVIMENTO DE SAIDAS"));
    }

    #[test]
    fn test_record88stes_renders() {
        let record = Record88Stes {
            cnpj: "99999090910270".into(),
            inventory_date: date(2023, 5, 26),
            product: "1313531".into(),
            quantity: dec("1.0"),
            st_value: dec("0.0"),
            op_value: dec("0.0"),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 126);
        assert!(element.as_str().starts_with("88STES9999909091027020230526"));
    }

    #[test]
    fn test_record88stitnf_is_237_wide() {
        let record = Record88Stitnf {
            cnpj: "66291561000103".into(),
            model: "55".into(),
            series: "1".into(),
            number: 123456789,
            cfop: 1403,
            cst: "060".into(),
            item: 1,
            entry_date: date(2023, 5, 26),
            product: "1313531".into(),
            quantity: dec("2.0"),
            value: dec("100.0"),
            discount: dec("0.0"),
            op_base: dec("100.0"),
            st_base: dec("140.0"),
            st_rate: dec("18.0"),
            op_rate: dec("12.0"),
            ipi: dec("0.0"),
            nfe_key: "31230566291561000103550010001234561000000010".into(),
        };
        let element = record.build().unwrap();
        assert_eq!(element.len(), 237);
        assert!(element.as_str().ends_with(&record.nfe_key));
    }
}
