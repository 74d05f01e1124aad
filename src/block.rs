//! Blocks: ordered collections of elements restricted to an allow-list.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::element::{Element, Layout};
use crate::error::{Result, SintegraError};
use crate::records::RecordKind;

pub const CRLF: &str = "\r\n";

/// Block kinds in canonical file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    One,
    Five,
    Six,
    Seven,
    Eight,
}

impl BlockKind {
    pub const ALL: [Self; 5] = [Self::One, Self::Five, Self::Six, Self::Seven, Self::Eight];

    /// Accepted record kinds; position in the slice is the sort key.
    pub const fn allowed(self) -> &'static [RecordKind] {
        use RecordKind as K;

        match self {
            Self::One => &[K::R10, K::R11],
            Self::Five => &[K::R50, K::R51, K::R53, K::R54, K::R55, K::R56, K::R57],
            Self::Six => &[K::R60M, K::R60A, K::R60D, K::R60I, K::R60R, K::R61, K::R61R],
            Self::Seven => &[K::R70, K::R71, K::R74, K::R75, K::R76, K::R77],
            Self::Eight => &[
                K::R85,
                K::R86,
                K::R88Dv,
                K::R88Ean,
                K::R88Sme,
                K::R88Sms,
                K::R88Stes,
                K::R88Stitnf,
            ],
        }
    }

    pub fn position_of(self, kind: RecordKind) -> Option<usize> {
        self.allowed().iter().position(|k| *k == kind)
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bloco {}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    kind: BlockKind,
    elements: Vec<Element>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Insert `element` and re-sort by allow-list position, keeping insertion
    /// order among elements of the same kind.
    pub fn add_element(&mut self, element: Element) -> Result<&mut Self> {
        if self.kind.position_of(element.kind()).is_none() {
            warn!(block = %self.kind, element = %element.kind(), "element not allowed");
            return Err(SintegraError::ElementNotAllowed {
                block: self.kind.to_string(),
                element: element.kind().to_string(),
            });
        }

        debug!(block = %self.kind, element = %element.kind(), "element added");
        self.elements.push(element);
        let kind = self.kind;
        self.elements
            .sort_by_key(|e| kind.position_of(e.kind()).unwrap_or(usize::MAX));
        Ok(self)
    }

    /// Build `record` and add it.
    pub fn add<L: Layout>(&mut self, record: &L) -> Result<&mut Self> {
        let element = record.build()?;
        self.add_element(element)
    }

    pub fn get_element(&self, index: usize) -> Result<&Element> {
        self.elements.get(index).ok_or(SintegraError::ElementNotFound {
            index,
            len: self.elements.len(),
        })
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements added so far.
    pub fn total(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Every element followed by `terminator`.
    pub fn render_with(&self, terminator: &str) -> String {
        let mut out = String::new();
        for element in &self.elements {
            out.push_str(element.as_str());
            out.push_str(terminator);
        }
        out
    }

    pub fn render(&self) -> String {
        self.render_with(CRLF)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
