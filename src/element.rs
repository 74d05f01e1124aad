//! Element pipeline - single entry point for building records
//!
//! A record struct becomes an `Element` only by passing through
//! Draft -> Validated -> Formatted -> Element. Each stage consumes the previous one,
//! so formatting without validation is not expressible.

use std::fmt;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{Result, SintegraError};
use crate::field::Field;
use crate::format::format_field;
use crate::records::RecordKind;
use crate::validation::{Validator, Violation};

/// A typed record layout.
///
/// `fields` lists every slot after the code/subtype prefix in byte order, with
/// defaults for optional members already applied.
pub trait Layout {
    const KIND: RecordKind;

    fn fields(&self) -> Vec<Field>;

    /// Record-level checks spanning more than one field.
    fn cross_checks(&self) -> Vec<Violation> {
        Vec::new()
    }

    fn build(&self) -> Result<Element> {
        Draft::new(Self::KIND, self.fields(), self.cross_checks())
            .validate()?
            .format()?
            .render()
    }
}

#[derive(Debug)]
pub struct Draft {
    kind: RecordKind,
    fields: Vec<Field>,
    cross_checks: Vec<Violation>,
}

impl Draft {
    pub fn new(kind: RecordKind, fields: Vec<Field>, cross_checks: Vec<Violation>) -> Self {
        Self {
            kind,
            fields,
            cross_checks,
        }
    }

    pub fn validate(self) -> Result<Validated> {
        let result = Validator::new().validate(&self.fields, self.cross_checks);
        if !result.valid {
            warn!(
                code = %self.kind,
                violations = result.violations.len(),
                "element rejected"
            );
            return Err(SintegraError::ElementValidation {
                code: self.kind.to_string(),
                violations: result.violations,
            });
        }

        Ok(Validated {
            kind: self.kind,
            fields: self.fields,
        })
    }
}

#[derive(Debug)]
pub struct Validated {
    kind: RecordKind,
    fields: Vec<Field>,
}

impl Validated {
    pub fn format(self) -> Result<Formatted> {
        let fields = self
            .fields
            .iter()
            .map(|field| Ok((field.spec.name, format_field(field)?)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Formatted {
            kind: self.kind,
            fields,
        })
    }
}

#[derive(Debug)]
pub struct Formatted {
    kind: RecordKind,
    fields: Vec<(&'static str, String)>,
}

impl Formatted {
    pub fn render(self) -> Result<Element> {
        let spec = self.kind.spec();
        let mut line = spec.line_start();
        for (_, value) in &self.fields {
            line.push_str(value);
        }

        if line.len() != spec.length {
            error!(
                code = %self.kind,
                expected = spec.length,
                actual = line.len(),
                "record length mismatch"
            );
            return Err(SintegraError::RecordLengthMismatch {
                code: self.kind.to_string(),
                expected: spec.length,
                actual: line.len(),
            });
        }

        debug!(code = %self.kind, length = line.len(), "element rendered");
        Ok(Element {
            kind: self.kind,
            line,
            fields: self.fields,
        })
    }
}

/// An immutable, rendered record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    kind: RecordKind,
    line: String,
    fields: Vec<(&'static str, String)>,
}

impl Element {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Formatted value of a field, as it appears in the line.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::common;

    struct Probe {
        name: &'static str,
        width: usize,
    }

    impl Layout for Probe {
        const KIND: RecordKind = RecordKind::R88Sme;

        fn fields(&self) -> Vec<Field> {
            vec![
                Field::text("name", self.width, self.name).rules(common::REQUIRED),
                Field::filler("filler", 121 - self.width),
            ]
        }
    }

    #[test]
    fn test_pipeline_renders_declared_length() {
        let element = Probe { name: "abc", width: 10 }.build().unwrap();
        assert_eq!(element.len(), 126);
        assert!(element.as_str().starts_with("88SMEABC       "));
        assert_eq!(element.field("name"), Some("ABC       "));
        assert_eq!(element.field("missing"), None);
    }

    #[test]
    fn test_validation_blocks_formatting() {
        let err = Probe { name: "", width: 10 }.build().unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_length_mismatch_is_not_recoverable() {
        let fields = vec![Field::text("short", 3, "x")];
        let err = Draft::new(RecordKind::R50, fields, vec![])
            .validate()
            .and_then(Validated::format)
            .and_then(Formatted::render)
            .unwrap_err();

        assert!(matches!(
            err,
            SintegraError::RecordLengthMismatch { expected: 126, actual: 5, .. }
        ));
        assert!(!err.is_recoverable());
    }
}
