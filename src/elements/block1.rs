//! Block 1: master record (registro 10) and its complement (registro 11).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::element::Layout;
use crate::field::Field;
use crate::records::RecordKind;
use crate::validation::{common, Rule, Violation};

use super::isento;

const NAME: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^.{2,35}$")];
const MUNICIPALITY: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^.{2,30}$")];
const FAX: &[Rule] = &[Rule::Pattern(r"^[0-9]{5,10}$")];
const START: &[Rule] = &[Rule::NotBlank, Rule::FirstDayOfMonth];
const END: &[Rule] = &[Rule::NotBlank, Rule::LastDayOfMonth];
const ONE_TO_THREE: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["1", "2", "3"])];
const PURPOSE: &[Rule] = &[Rule::NotBlank, Rule::Choice(&["1", "2", "3", "5"])];

const STREET: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^.{2,34}$")];
const CEP: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^\d{5}-?\d{3}$")];
const PHONE: &[Rule] = &[Rule::NotBlank, Rule::Pattern(r"^[0-9]{5,12}$")];

/// Registro 10: taxpayer identification and the period covered by the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record10 {
    pub cnpj: String,
    #[serde(default)]
    pub ie: Option<String>,
    pub name: String,
    pub municipality: String,
    pub uf: String,
    #[serde(default)]
    pub fax: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Magnetic file structure code.
    pub structure_code: u8,
    /// Nature of the operations reported.
    pub nature_code: u8,
    /// Purpose of the file (normal, rectification, ...).
    pub purpose_code: u8,
}

impl Layout for Record10 {
    const KIND: RecordKind = RecordKind::R10;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::numeric("cnpj", 14, &self.cnpj).rules(common::TAX_ID),
            Field::text("ie", 14, isento(&self.ie)).rules(common::IE),
            Field::text("name", 35, &self.name).rules(NAME),
            Field::text("municipality", 30, &self.municipality).rules(MUNICIPALITY),
            Field::text("uf", 2, &self.uf).rules(common::UF),
            Field::numeric("fax", 10, self.fax.clone()).rules(FAX),
            Field::date("start_date", self.start_date).rules(START),
            Field::date("end_date", self.end_date).rules(END),
            Field::text("structure_code", 1, self.structure_code).rules(ONE_TO_THREE),
            Field::text("nature_code", 1, self.nature_code).rules(ONE_TO_THREE),
            Field::text("purpose_code", 1, self.purpose_code).rules(PURPOSE),
        ]
    }

    fn cross_checks(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.end_date < self.start_date {
            violations.push(Violation::record("end_date", "must not be before start_date"));
        }
        let same_month = (self.end_date.year(), self.end_date.month())
            == (self.start_date.year(), self.start_date.month());
        if !same_month {
            violations.push(Violation::record(
                "end_date",
                "must fall in the month of start_date",
            ));
        }
        violations
    }
}

/// Registro 11: establishment address and contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record11 {
    pub street: String,
    pub number: u32,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    pub cep: String,
    #[serde(default)]
    pub contact: Option<String>,
    pub phone: String,
}

impl Layout for Record11 {
    const KIND: RecordKind = RecordKind::R11;

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::text("street", 34, &self.street).rules(STREET),
            Field::numeric("number", 5, self.number),
            Field::text("complement", 22, self.complement.clone()),
            Field::text("district", 15, self.district.clone()),
            Field::numeric("cep", 8, &self.cep).rules(CEP),
            Field::text("contact", 28, self.contact.clone()),
            Field::numeric("phone", 12, &self.phone).rules(PHONE),
        ]
    }
}
