//! Totalizer: the registro 90 lines that close a file.
//!
//! Counts are read back from the rendered body, so the trailer always agrees with
//! what was actually written.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::element::Element;
use crate::error::{Result, SintegraError};
use crate::records::{RecordCode, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trailer {
    /// Unpadded trailer lines: prefix plus slots.
    pub slots: Vec<String>,
    /// Non-zero line counts per totalizable code.
    pub counts: BTreeMap<RecordCode, usize>,
    pub grand_total: usize,
}

impl Trailer {
    pub fn line_count(&self) -> usize {
        self.slots.len()
    }

    /// Lines right-filled with the trailer line count, each followed by the terminator.
    pub fn render(&self, config: &LayoutConfig) -> String {
        let count = self.line_count();
        let mut out = String::new();
        for line in &self.slots {
            let fill = config.line_width.saturating_sub(line.len());
            out.push_str(line);
            out.push_str(&format!("{count:>fill$}"));
            out.push_str(&config.line_terminator);
        }
        out
    }
}

/// `90` + CNPJ + IE of the registro 10 that opens the file.
pub fn trailer_prefix(master: Option<&Element>) -> Result<String> {
    let master = master
        .filter(|e| e.kind() == RecordKind::R10)
        .ok_or(SintegraError::MissingMasterRecord)?;

    let cnpj = master.field("cnpj").ok_or(SintegraError::MissingMasterRecord)?;
    let ie = master.field("ie").ok_or(SintegraError::MissingMasterRecord)?;
    Ok(format!("{}{cnpj}{ie}", RecordCode::R90))
}

/// Lines of `body` per totalizable code, matched on the first two characters.
pub fn count_records(body: &str, terminator: &str) -> BTreeMap<RecordCode, usize> {
    let mut counts = BTreeMap::new();
    for line in body.split(terminator) {
        let Some(code) = line.get(..2).and_then(RecordCode::from_code) else {
            continue;
        };
        if RecordCode::TOTALIZABLE.contains(&code) {
            *counts.entry(code).or_insert(0) += 1;
        }
    }
    counts
}

pub fn totalize(body: &str, prefix: &str, config: &LayoutConfig) -> Trailer {
    let counts = count_records(body, &config.line_terminator);
    let width = config.count_width;

    let merged: usize = [RecordCode::R10, RecordCode::R11]
        .iter()
        .filter_map(|code| counts.get(code))
        .sum();

    let packed: Vec<(RecordCode, usize)> = RecordCode::TOTALIZABLE
        .iter()
        .filter(|code| !matches!(code, RecordCode::R10 | RecordCode::R11))
        .filter_map(|code| counts.get(code).map(|&n| (*code, n)))
        .collect();

    let slots_per_line = config.slots_per_line().max(1);
    let mut slots: Vec<String> = packed
        .chunks(slots_per_line)
        .map(|chunk| {
            let mut line = prefix.to_string();
            for (code, count) in chunk {
                line.push_str(&format!("{code}{count:0>width$}"));
            }
            line
        })
        .collect();

    // Body records plus one for the registro 90 block itself.
    let grand_total = merged + packed.iter().map(|(_, n)| n).sum::<usize>() + 1;
    let closing = format!("{}{grand_total:0>width$}", RecordCode::R99);

    let fits = slots
        .last()
        .is_some_and(|last| last.len() + closing.len() <= config.trailer_budget);
    match slots.last_mut() {
        Some(last) if fits => last.push_str(&closing),
        _ => slots.push(format!("{prefix}{closing}")),
    }

    Trailer {
        slots,
        counts,
        grand_total,
    }
}
