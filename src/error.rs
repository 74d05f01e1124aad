//! Error types shared by elements, blocks and the file assembler.

use thiserror::Error;

use crate::validation::Violation;

#[derive(Debug, Error)]
pub enum SintegraError {
    /// Every violation found on one element, collected in a single pass.
    #[error("[Registro {code}] {} validation error(s): {}", violations.len(), summarize(violations))]
    ElementValidation {
        code: String,
        violations: Vec<Violation>,
    },

    #[error("Field {field} does not fit in {width} characters: {rendered:?}")]
    FormatOverflow {
        field: String,
        width: usize,
        rendered: String,
    },

    #[error("Field {field} expects a {expected} value")]
    FieldTypeMismatch {
        field: String,
        expected: &'static str,
    },

    /// The field widths of a layout do not add up to its declared length.
    #[error("[Registro {code}] record length mismatch: expected {expected}, generated {actual}")]
    RecordLengthMismatch {
        code: String,
        expected: usize,
        actual: usize,
    },

    #[error("Element of type [{element}] is not allowed in block [{block}]")]
    ElementNotAllowed { block: String, element: String },

    #[error("No element found at position {index} (block holds {len})")]
    ElementNotFound { index: usize, len: usize },

    #[error("Totalization requires a registro 10 as the first element of the first block")]
    MissingMasterRecord,

    #[error("Invalid layout configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SintegraError {
    /// False for schema defects that no change of input can fix.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::RecordLengthMismatch { .. })
    }

    /// Violations carried by an `ElementValidation`, empty for any other error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::ElementValidation { violations, .. } => violations,
            _ => &[],
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, SintegraError>;
