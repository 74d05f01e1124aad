//! Registration codes and record kinds.
//!
//! `RecordCode` is the two-digit code that opens every line of the file.
//! `RecordKind` is one concrete layout: a code plus an optional subtype and the
//! declared line length.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordCode {
    #[serde(rename = "10")]
    R10,
    #[serde(rename = "11")]
    R11,
    #[serde(rename = "50")]
    R50,
    #[serde(rename = "51")]
    R51,
    #[serde(rename = "53")]
    R53,
    #[serde(rename = "54")]
    R54,
    #[serde(rename = "55")]
    R55,
    #[serde(rename = "56")]
    R56,
    #[serde(rename = "57")]
    R57,
    #[serde(rename = "60")]
    R60,
    #[serde(rename = "61")]
    R61,
    #[serde(rename = "70")]
    R70,
    #[serde(rename = "71")]
    R71,
    #[serde(rename = "74")]
    R74,
    #[serde(rename = "75")]
    R75,
    #[serde(rename = "76")]
    R76,
    #[serde(rename = "77")]
    R77,
    #[serde(rename = "85")]
    R85,
    #[serde(rename = "86")]
    R86,
    #[serde(rename = "88")]
    R88,
    /// Totalizer line.
    #[serde(rename = "90")]
    R90,
    /// Grand total slot inside the last totalizer line.
    #[serde(rename = "99")]
    R99,
}

impl RecordCode {
    /// Codes counted by the totalizer, in slot order.
    pub const TOTALIZABLE: [Self; 20] = [
        Self::R10,
        Self::R11,
        Self::R50,
        Self::R51,
        Self::R53,
        Self::R54,
        Self::R55,
        Self::R56,
        Self::R57,
        Self::R60,
        Self::R61,
        Self::R70,
        Self::R71,
        Self::R74,
        Self::R75,
        Self::R76,
        Self::R77,
        Self::R85,
        Self::R86,
        Self::R88,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::R10 => "10",
            Self::R11 => "11",
            Self::R50 => "50",
            Self::R51 => "51",
            Self::R53 => "53",
            Self::R54 => "54",
            Self::R55 => "55",
            Self::R56 => "56",
            Self::R57 => "57",
            Self::R60 => "60",
            Self::R61 => "61",
            Self::R70 => "70",
            Self::R71 => "71",
            Self::R74 => "74",
            Self::R75 => "75",
            Self::R76 => "76",
            Self::R77 => "77",
            Self::R85 => "85",
            Self::R86 => "86",
            Self::R88 => "88",
            Self::R90 => "90",
            Self::R99 => "99",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::TOTALIZABLE
            .into_iter()
            .chain([Self::R90, Self::R99])
            .find(|c| c.as_str() == code)
    }
}

impl fmt::Display for RecordCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout identity of a record type: code, subtype and declared length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSpec {
    pub code: RecordCode,
    pub subtype: Option<&'static str>,
    pub length: usize,
}

impl RecordSpec {
    pub const STANDARD_LENGTH: usize = 126;

    /// Text that opens every line of this record type.
    pub fn line_start(&self) -> String {
        format!("{}{}", self.code, self.subtype.unwrap_or_default())
    }
}

/// The closed set of record layouts the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    R10,
    R11,
    R50,
    R51,
    R53,
    R54,
    R55,
    R56,
    R57,
    R60M,
    R60A,
    R60D,
    R60I,
    R60R,
    R61,
    R61R,
    R70,
    R71,
    R74,
    R75,
    R76,
    R77,
    R85,
    R86,
    R88Dv,
    R88Ean,
    R88Sme,
    R88Sms,
    R88Stes,
    R88Stitnf,
}

impl RecordKind {
    pub const fn spec(self) -> RecordSpec {
        use RecordCode as C;

        let (code, subtype, length) = match self {
            Self::R10 => (C::R10, None, 126),
            Self::R11 => (C::R11, None, 126),
            Self::R50 => (C::R50, None, 126),
            Self::R51 => (C::R51, None, 126),
            Self::R53 => (C::R53, None, 126),
            Self::R54 => (C::R54, None, 126),
            Self::R55 => (C::R55, None, 126),
            Self::R56 => (C::R56, None, 126),
            Self::R57 => (C::R57, None, 126),
            Self::R60M => (C::R60, Some("M"), 126),
            Self::R60A => (C::R60, Some("A"), 126),
            Self::R60D => (C::R60, Some("D"), 126),
            Self::R60I => (C::R60, Some("I"), 126),
            Self::R60R => (C::R60, Some("R"), 126),
            Self::R61 => (C::R61, None, 126),
            Self::R61R => (C::R61, Some("R"), 126),
            Self::R70 => (C::R70, None, 126),
            Self::R71 => (C::R71, None, 126),
            Self::R74 => (C::R74, None, 126),
            Self::R75 => (C::R75, None, 126),
            Self::R76 => (C::R76, None, 126),
            Self::R77 => (C::R77, None, 126),
            Self::R85 => (C::R85, None, 126),
            Self::R86 => (C::R86, None, 126),
            Self::R88Dv => (C::R88, Some("DV"), 149),
            Self::R88Ean => (C::R88, Some("EAN"), 126),
            Self::R88Sme => (C::R88, Some("SME"), 126),
            Self::R88Sms => (C::R88, Some("SMS"), 126),
            Self::R88Stes => (C::R88, Some("STES"), 126),
            Self::R88Stitnf => (C::R88, Some("STITNF"), 237),
        };

        RecordSpec {
            code,
            subtype,
            length,
        }
    }

    pub const fn code(self) -> RecordCode {
        self.spec().code
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec().line_start())
    }
}
