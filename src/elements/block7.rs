//! Block 7: transport, inventory, product catalogue and communication services.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::element::Layout;
use crate::field::Field;
use crate::records::RecordKind;
use crate::validation::{common, Rule};

use super::isento;

const FREIGHT: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["0", "1", "2"])];
const CT_SERIES: &[Rule] = &[Rule::Pattern(r"^\d{1}$")];
const SUBSERIES: &[Rule] = &[Rule::Pattern(r"^.{1,2}$")];
const OWNERSHIP: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["1", "2", "3"])];
const NCM: &[Rule] = &[Rule::Pattern(r"^.{1,8}$")];
const SERVICE_SERIES: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{1,2}$")];
const NUMBER10: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{1,10}$")];
const LEGACY_RATE: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{1,4}$")];
const REVENUE_TYPE: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["1", "2", "3"])];

/// Registro 70: freight documents (conhecimentos de transporte).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record70 {
    pub cnpj: String,
    #[serde(default)]
    pub ie: Option<String>,
    pub date: NaiveDate,
    pub uf: String,
    pub model: String,
    pub series: String,
    #[serde(default)]
    pub subseries: Option<String>,
    pub number: u32,
    pub cfop: u32,
    pub total: Decimal,
    pub icms_base: Decimal,
    pub icms: Decimal,
    pub exempt: Decimal,
    #[serde(default)]
    pub others: Option<Decimal>,
    /// 0 other, 1 CIF, 2 FOB.
    pub freight_mode: u8,
    pub situation: String,
}

impl Layout for Record70 {
    const KIND: RecordKind = RecordKind::R70;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("ie", 14, isento(&self.ie)).rules(common::IE),
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("uf", 2, &self.uf).rules(common::UF),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 1, &self.series).rules(CT_SERIES),
            Field::text("subseries", 2, self.subseries.clone()).rules(SUBSERIES),
            Field::numeric("number", 6, self.number).rules(common::NUMBER6),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::decimal("total", 13, 2, self.total).rules(common::AMOUNT),
            Field::decimal("icms_base", 14, 2, self.icms_base).rules(common::AMOUNT),
            Field::decimal("icms", 14, 2, self.icms).rules(common::AMOUNT),
            Field::decimal("exempt", 14, 2, self.exempt).rules(common::AMOUNT),
            Field::decimal("others", 14, 2, self.others.unwrap_or_default()).rules(common::AMOUNT),
            Field::text("freight_mode", 1, self.freight_mode).rules(FREIGHT),
            Field::text("situation", 1, &self.situation).rules(common::SITUATION),
        ]
    }
}

/// Registro 71: invoices carried by a freight document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record71 {
    pub taker_cnpj: String,
    #[serde(default)]
    pub taker_ie: Option<String>,
    pub ct_date: NaiveDate,
    pub taker_uf: String,
    pub ct_model: String,
    pub ct_series: String,
    #[serde(default)]
    pub ct_subseries: Option<String>,
    pub ct_number: u32,
    pub sender_uf: String,
    pub sender_cnpj: String,
    #[serde(default)]
    pub sender_ie: Option<String>,
    pub invoice_date: NaiveDate,
    pub invoice_model: String,
    pub invoice_series: String,
    pub invoice_number: u32,
    pub invoice_total: Decimal,
}

impl Layout for Record71 {
    const KIND: RecordKind = RecordKind::R71;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("taker_cnpj", 14, &self.taker_cnpj).rules(common::TAX_ID),
            Field::text("taker_ie", 14, isento(&self.taker_ie)).rules(common::IE),
            Field::date("ct_date", self.ct_date).rules(common::REQUIRED),
            Field::text("taker_uf", 2, &self.taker_uf).rules(common::UF),
            Field::text("ct_model", 2, &self.ct_model).rules(common::MODEL),
            Field::text("ct_series", 1, &self.ct_series).rules(CT_SERIES),
            Field::text("ct_subseries", 2, self.ct_subseries.clone()).rules(SUBSERIES),
            Field::numeric("ct_number", 6, self.ct_number).rules(common::NUMBER6),
            Field::text("sender_uf", 2, &self.sender_uf).rules(common::UF),
            Field::numeric("sender_cnpj", 14, &self.sender_cnpj).rules(common::TAX_ID),
            Field::text("sender_ie", 14, isento(&self.sender_ie)).rules(common::IE),
            Field::date("invoice_date", self.invoice_date).rules(common::REQUIRED),
            Field::text("invoice_model", 2, &self.invoice_model).rules(common::MODEL),
            Field::text("invoice_series", 3, &self.invoice_series).rules(common::SERIES),
            Field::numeric("invoice_number", 6, self.invoice_number).rules(common::NUMBER6),
            Field::decimal("invoice_total", 14, 2, self.invoice_total).rules(common::AMOUNT),
            Field::filler("filler", 12),
        ]
    }
}

/// Registro 74: inventory position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record74 {
    pub inventory_date: NaiveDate,
    pub product: String,
    pub quantity: Decimal,
    pub value: Decimal,
    /// 1 own goods in own possession, 2 own goods held by third parties,
    /// 3 third-party goods in own possession.
    pub ownership: u8,
    pub owner_cnpj: String,
    #[serde(default)]
    pub owner_ie: Option<String>,
    pub owner_uf: String,
}

impl Layout for Record74 {
    const KIND: RecordKind = RecordKind::R74;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::date("inventory_date", self.inventory_date).rules(common::REQUIRED),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::decimal("quantity", 13, 3, self.quantity).rules(common::AMOUNT),
            Field::decimal("value", 13, 2, self.value).rules(common::AMOUNT),
            Field::text("ownership", 1, self.ownership).rules(OWNERSHIP),
            Field::numeric("owner_cnpj", 14, &self.owner_cnpj).rules(common::TAX_ID),
            Field::text("owner_ie", 14, isento(&self.owner_ie)).rules(common::IE),
            Field::text("owner_uf", 2, &self.owner_uf).rules(common::UF),
            Field::filler("filler", 45),
        ]
    }
}

/// Registro 75: product and service catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record75 {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub product: String,
    pub ncm: String,
    pub description: String,
    pub unit: String,
    pub ipi_rate: Decimal,
    /// Rate as written by the taxpayer; `"07"` renders as `0700`.
    pub icms_rate: String,
    pub base_reduction: Decimal,
    pub st_base: Decimal,
}

impl Layout for Record75 {
    const KIND: RecordKind = RecordKind::R75;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::date("start_date", self.start_date).rules(common::REQUIRED),
            Field::date("end_date", self.end_date).rules(common::REQUIRED),
            Field::text("product", 14, &self.product).rules(common::REQUIRED),
            Field::text("ncm", 8, &self.ncm).rules(NCM),
            Field::text("description", 53, &self.description).rules(common::REQUIRED),
            Field::text("unit", 6, &self.unit).rules(common::REQUIRED),
            Field::decimal("ipi_rate", 5, 2, self.ipi_rate).rules(common::AMOUNT),
            Field::aliquota("icms_rate", 4, &self.icms_rate).rules(LEGACY_RATE),
            Field::decimal("base_reduction", 5, 2, self.base_reduction).rules(common::AMOUNT),
            Field::decimal("st_base", 13, 2, self.st_base).rules(common::AMOUNT),
        ]
    }
}

/// Registro 76: communication and telecommunication service invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record76 {
    pub cnpj: String,
    #[serde(default)]
    pub ie: Option<String>,
    pub model: String,
    pub series: String,
    #[serde(default)]
    pub subseries: Option<String>,
    pub number: u64,
    pub cfop: u32,
    pub revenue_type: u8,
    pub date: NaiveDate,
    pub uf: String,
    pub total: Decimal,
    pub icms_base: Decimal,
    pub icms: Decimal,
    pub exempt: Decimal,
    pub others: Decimal,
    pub rate: u32,
    pub situation: String,
}

impl Layout for Record76 {
    const KIND: RecordKind = RecordKind::R76;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("ie", 14, isento(&self.ie)).rules(common::IE),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 2, &self.series).rules(SERVICE_SERIES),
            Field::text("subseries", 2, self.subseries.clone()).rules(SUBSERIES),
            Field::numeric("number", 10, self.number).rules(NUMBER10),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::text("revenue_type", 1, self.revenue_type).rules(REVENUE_TYPE),
            Field::date("date", self.date).rules(common::REQUIRED),
            Field::text("uf", 2, &self.uf).rules(common::UF),
            Field::decimal("total", 13, 2, self.total).rules(common::AMOUNT),
            Field::decimal("icms_base", 13, 2, self.icms_base).rules(common::AMOUNT),
            Field::decimal("icms", 12, 2, self.icms).rules(common::AMOUNT),
            Field::decimal("exempt", 12, 2, self.exempt).rules(common::AMOUNT),
            Field::decimal("others", 12, 2, self.others).rules(common::AMOUNT),
            Field::numeric("rate", 2, self.rate).rules(common::REQUIRED),
            Field::text("situation", 1, &self.situation).rules(common::SITUATION),
        ]
    }
}

/// Registro 77: items of communication service invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record77 {
    pub cnpj: String,
    pub model: String,
    pub series: String,
    #[serde(default)]
    pub subseries: Option<String>,
    pub number: u64,
    pub cfop: u32,
    pub revenue_type: u8,
    pub item: u32,
    pub service_code: String,
    pub quantity: Decimal,
    pub service_value: Decimal,
    pub discount: Decimal,
    pub icms_base: Decimal,
    pub rate: u32,
    /// CNPJ of the telecom operator holding the terminal.
    pub mf_cnpj: String,
    #[serde(default)]
    pub terminal: Option<u64>,
}

impl Layout for Record77 {
    const KIND: RecordKind = RecordKind::R77;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("model", 2, &self.model).rules(common::MODEL),
            Field::text("series", 2, &self.series).rules(SERVICE_SERIES),
            Field::text("subseries", 2, self.subseries.clone()).rules(SUBSERIES),
            Field::numeric("number", 10, self.number).rules(NUMBER10),
            Field::text("cfop", 4, self.cfop).rules(common::CFOP),
            Field::text("revenue_type", 1, self.revenue_type).rules(REVENUE_TYPE),
            Field::numeric("item", 3, self.item).rules(common::ITEM),
            Field::text("service_code", 11, &self.service_code).rules(common::REQUIRED),
            Field::decimal("quantity", 13, 3, self.quantity).rules(common::AMOUNT),
            Field::decimal("service_value", 12, 2, self.service_value).rules(common::AMOUNT),
            Field::decimal("discount", 12, 2, self.discount).rules(common::AMOUNT),
            Field::decimal("icms_base", 12, 2, self.icms_base).rules(common::AMOUNT),
            Field::numeric("rate", 2, self.rate).rules(common::REQUIRED),
            Field::numeric("mf_cnpj", 14, &self.mf_cnpj).rules(common::TAX_ID),
            Field::numeric("terminal", 10, self.terminal),
        ]
    }
}
