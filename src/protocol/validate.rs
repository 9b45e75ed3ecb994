//! Field-local validation
//!
//! Every included field is checked on its own; all problems are collected so
//! the operator can fix them in one pass.

use std::fmt;

use tracing::debug;

use super::{FieldSelection, Registry, TypeClass};

/// What is wrong with a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Value is empty once surrounding whitespace is ignored
    MissingValue,
    /// Value is longer than the field allows
    TooLong {
        /// Value length in characters
        len: usize,
        /// Field maximum
        max: usize,
    },
    /// Value contains characters its data class forbids
    TypeMismatch {
        /// Field data class
        expected: TypeClass,
    },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue => write!(f, "missing value"),
            Self::TooLong { len, max } => write!(f, "too long ({len} > {max})"),
            Self::TypeMismatch { expected } => {
                write!(f, "type mismatch (expected {})", expected.hint())
            }
        }
    }
}

/// One offending field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// Field number
    pub number: u8,
    /// Problem found
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}: {}", self.number, self.kind)
    }
}

/// Outcome of [`validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// No violations found
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Every violation, in ascending field order
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations for one field
    pub fn for_field(&self, number: u8) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.number == number)
    }

    /// Whether a field has any violation
    #[must_use]
    pub fn is_flagged(&self, number: u8) -> bool {
        self.for_field(number).next().is_some()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "valid");
        }
        let lines: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

/// Check every included field for missing values, excess length and type
/// mismatches.
///
/// Length and type checks apply to the raw value, which is exactly what the
/// encoder will emit.
#[must_use]
pub fn validate(selection: &FieldSelection, registry: &Registry) -> ValidationReport {
    let mut violations = Vec::new();

    for (number, value) in selection.included() {
        let Ok(field) = registry.lookup(number) else {
            continue;
        };

        if value.trim().is_empty() {
            violations.push(Violation {
                number,
                kind: ViolationKind::MissingValue,
            });
            continue;
        }

        let len = value.chars().count();
        if len > field.max_length() {
            violations.push(Violation {
                number,
                kind: ViolationKind::TooLong {
                    len,
                    max: field.max_length(),
                },
            });
        }

        if field.type_class() == TypeClass::Numeric && !value.chars().all(|c| c.is_ascii_digit()) {
            violations.push(Violation {
                number,
                kind: ViolationKind::TypeMismatch {
                    expected: TypeClass::Numeric,
                },
            });
        }
    }

    debug!(violations = violations.len(), "validated selection");
    ValidationReport { violations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn registry() -> Registry {
        Registry::at(datetime!(2025-06-14 09:05:07 UTC))
    }

    #[test]
    fn test_seeded_selection_is_valid() {
        let registry = registry();
        let report = validate(&FieldSelection::seeded(&registry), &registry);
        assert!(report.is_valid());
        assert_eq!(report.to_string(), "valid");
    }

    #[test]
    fn test_numeric_type_mismatch() {
        let registry = registry();
        let mut selection = FieldSelection::new();
        selection.insert(3, "12a4").unwrap();

        let report = validate(&selection, &registry);
        assert_eq!(
            report.violations(),
            &[Violation {
                number: 3,
                kind: ViolationKind::TypeMismatch {
                    expected: TypeClass::Numeric
                },
            }]
        );
    }

    #[test]
    fn test_collects_every_violation() {
        let registry = registry();
        let mut selection = FieldSelection::new();
        selection.insert(2, "   ").unwrap();
        selection.insert(4, "0000000100001").unwrap();
        selection.insert(11, "12345X7").unwrap();
        selection.insert(41, "TERM01").unwrap();

        let report = validate(&selection, &registry);
        assert!(!report.is_valid());
        assert_eq!(report.violations().len(), 4);
        assert!(report.for_field(2).all(|v| v.kind == ViolationKind::MissingValue));
        assert_eq!(
            report.for_field(4).next().unwrap().kind,
            ViolationKind::TooLong { len: 13, max: 12 }
        );
        // STAN is both too long and non-numeric
        assert_eq!(report.for_field(11).count(), 2);
        assert!(!report.is_flagged(41));
    }

    #[test]
    fn test_excluded_fields_are_ignored() {
        let registry = registry();
        let mut selection = FieldSelection::new();
        selection.insert(3, "bad!").unwrap();
        selection.exclude(3);

        assert!(validate(&selection, &registry).is_valid());
    }

    #[test]
    fn test_non_numeric_classes_skip_digit_check() {
        let registry = registry();
        let mut selection = FieldSelection::new();
        selection.insert(28, "C00000001").unwrap();
        selection.insert(37, "ABC123456789").unwrap();
        selection.insert(35, "4000001234567899=2612").unwrap();

        assert!(validate(&selection, &registry).is_valid());
    }

    #[test]
    fn test_report_display() {
        let registry = registry();
        let mut selection = FieldSelection::new();
        selection.insert(3, "").unwrap();
        selection.insert(39, "0000").unwrap();

        let report = validate(&selection, &registry);
        assert_eq!(report.to_string(), "F3: missing value\nF39: too long (4 > 2)");
    }
}
