//! Typed record layouts, grouped by the block that accepts them.

mod block1;
mod block5;
mod block6;
mod block7;
mod block8;

pub use block1::{Record10, Record11};
pub use block5::{Record50, Record51, Record53, Record54, Record55, Record56, Record57};
pub use block6::{Record60A, Record60D, Record60I, Record60M, Record60R, Record61, Record61R};
pub use block7::{Record70, Record71, Record74, Record75, Record76, Record77};
pub use block8::{
    Record85, Record86, Record88Dv, Record88Ean, Record88Sme, Record88Sms, Record88Stes,
    Record88Stitnf,
};

/// State registration, or `ISENTO` when the taxpayer has none.
pub(crate) fn isento(ie: &Option<String>) -> String {
    match ie.as_deref().map(str::trim) {
        Some(ie) if !ie.is_empty() => ie.to_string(),
        _ => "ISENTO".to_string(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }
}
