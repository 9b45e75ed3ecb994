//! Operator-owned field selection
//!
//! Maps field numbers `2..=64` to an inclusion flag and a raw value. Iteration
//! is always in ascending field order, whatever order fields were touched in.

use std::collections::BTreeMap;

use super::{Error, MAX_FIELD, Registry, Result};

/// State of one field in a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Field takes part in the message
    pub included: bool,
    /// Raw value as entered
    pub value: String,
}

/// Sparse selection of fields and values for one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    entries: BTreeMap<u8, FieldEntry>,
}

impl FieldSelection {
    /// Empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every selectable field at its default value, with the mandatory
    /// fields (2..=7) included and the rest excluded.
    #[must_use]
    pub fn seeded(registry: &Registry) -> Self {
        let entries = registry
            .all_fields()
            .iter()
            .filter(|field| !field.is_reserved())
            .map(|field| {
                let entry = FieldEntry {
                    included: field.is_mandatory(),
                    value: field.default_value().to_string(),
                };
                (field.number(), entry)
            })
            .collect();
        Self { entries }
    }

    /// Include a field with the given value
    pub fn insert(&mut self, number: u8, value: impl Into<String>) -> Result<()> {
        check_selectable(number)?;
        self.entries.insert(
            number,
            FieldEntry {
                included: true,
                value: value.into(),
            },
        );
        Ok(())
    }

    /// Replace a field's value without touching its inclusion flag.
    /// A field seen for the first time starts excluded.
    pub fn set_value(&mut self, number: u8, value: impl Into<String>) -> Result<()> {
        check_selectable(number)?;
        let value = value.into();
        self.entries
            .entry(number)
            .and_modify(|entry| entry.value.clone_from(&value))
            .or_insert(FieldEntry {
                included: false,
                value,
            });
        Ok(())
    }

    /// Include a field, seeding its value from the registry default if it has none
    pub fn include(&mut self, number: u8, registry: &Registry) -> Result<()> {
        check_selectable(number)?;
        let default = registry.lookup(number)?.default_value();
        self.entries
            .entry(number)
            .or_insert_with(|| FieldEntry {
                included: false,
                value: default.to_string(),
            })
            .included = true;
        Ok(())
    }

    /// Exclude a field, keeping its value. Returns whether the field was included.
    pub fn exclude(&mut self, number: u8) -> bool {
        self.entries
            .get_mut(&number)
            .is_some_and(|entry| std::mem::replace(&mut entry.included, false))
    }

    /// Entry for a field
    #[must_use]
    pub fn get(&self, number: u8) -> Option<&FieldEntry> {
        self.entries.get(&number)
    }

    /// Current value of a field, included or not
    #[must_use]
    pub fn value(&self, number: u8) -> Option<&str> {
        self.entries.get(&number).map(|entry| entry.value.as_str())
    }

    /// Field takes part in the message
    #[must_use]
    pub fn is_included(&self, number: u8) -> bool {
        self.entries.get(&number).is_some_and(|entry| entry.included)
    }

    /// Included fields and their values, ascending
    pub fn included(&self) -> impl Iterator<Item = (u8, &str)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.included)
            .map(|(&number, entry)| (number, entry.value.as_str()))
    }

    /// Included field numbers, ascending
    pub fn included_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.included().map(|(number, _)| number)
    }

    /// Every entry, ascending
    pub fn iter(&self) -> impl Iterator<Item = (u8, &FieldEntry)> {
        self.entries.iter().map(|(&number, entry)| (number, entry))
    }

    pub(crate) fn value_mut(&mut self, number: u8) -> Option<&mut String> {
        self.entries.get_mut(&number).map(|entry| &mut entry.value)
    }
}

fn check_selectable(number: u8) -> Result<()> {
    match number {
        1 => Err(Error::ReservedField { number }),
        2..=MAX_FIELD => Ok(()),
        _ => Err(Error::UnknownField { number }),
    }
}
