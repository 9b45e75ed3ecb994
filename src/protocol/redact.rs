//! Masking of cardholder data for display

use super::{BreakdownEntry, Registry};

const VISIBLE_TAIL: usize = 4;

/// Mask all but the last four characters. Values of four characters or
/// fewer are masked entirely.
#[must_use]
pub fn mask_value(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_TAIL {
        return "*".repeat(len);
    }
    let tail: String = value.chars().skip(len - VISIBLE_TAIL).collect();
    format!("{}{tail}", "*".repeat(len - VISIBLE_TAIL))
}

/// Copy of `breakdown` with the values of sensitive fields masked.
/// Length prefixes are kept, so masked rows still show the real length.
#[must_use]
pub fn redact(breakdown: &[BreakdownEntry], registry: &Registry) -> Vec<BreakdownEntry> {
    breakdown
        .iter()
        .map(|entry| {
            let sensitive = registry
                .lookup(entry.number)
                .is_ok_and(|field| field.is_sensitive());
            if sensitive {
                BreakdownEntry {
                    value: mask_value(&entry.value),
                    ..entry.clone()
                }
            } else {
                entry.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{FieldSelection, Framing, build};
    use time::macros::datetime;

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value("4000001234567899"), "************7899");
        assert_eq!(mask_value("1234"), "****");
        assert_eq!(mask_value(""), "");
    }

    #[test]
    fn test_redact_only_sensitive_fields() {
        let registry = Registry::at(datetime!(2025-06-14 09:05:07 UTC));
        let mut selection = FieldSelection::new();
        selection.insert(2, "4000001234567899").unwrap();
        selection.insert(11, "123456").unwrap();
        selection.insert(35, "4000001234567899=2612").unwrap();

        let message = build(&selection, &registry, Framing::none()).unwrap();
        let redacted = redact(message.breakdown(), &registry);

        assert_eq!(redacted[0].value, "************7899");
        assert_eq!(redacted[0].prefix.as_deref(), Some("16"));
        assert_eq!(redacted[1].value, "123456");
        assert_eq!(redacted[2].value, "*****************2612");
        // the wire message itself is untouched
        assert!(message.payload().contains("4000001234567899"));
    }
}
