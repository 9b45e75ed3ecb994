//! Field templates
//!
//! A template is a JSON object mapping field numbers to raw values, e.g.
//! `{"2": "4000001234567899", "3": "000000"}`. Only values are stored; the
//! encoded message is always rebuilt from them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::protocol::{Error, FieldSelection, Result};

/// Saved field values
///
/// Keys are kept as written, so a file naming fields this profile does not
/// carry still loads; such entries are dropped by [`Template::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    fields: BTreeMap<u32, String>,
}

impl Template {
    /// Capture the included fields of a selection
    #[must_use]
    pub fn from_selection(selection: &FieldSelection) -> Self {
        let fields = selection
            .included()
            .map(|(number, value)| (u32::from(number), value.to_string()))
            .collect();
        Self { fields }
    }

    /// Stored values, ascending
    pub fn fields(&self) -> impl Iterator<Item = (u32, &str)> {
        self.fields.iter().map(|(&number, value)| (number, value.as_str()))
    }

    /// Number of stored fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// No stored fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Include every stored field in `selection` with its stored value.
    /// Numbers that cannot be selected (field 1, above 64) are skipped.
    /// Returns how many fields were applied.
    pub fn apply(&self, selection: &mut FieldSelection) -> usize {
        let mut applied = 0;
        for (&number, value) in &self.fields {
            let inserted = u8::try_from(number)
                .is_ok_and(|field| selection.insert(field, value.clone()).is_ok());
            if inserted {
                applied += 1;
            } else {
                debug!(field = number, "skipping unselectable template field");
            }
        }
        applied
    }

    /// Parse template JSON
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a template file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|err| match err {
            Error::Json(inner) => Error::Template(format!("{}: {inner}", path.display())),
            other => other,
        })
    }

    /// Write a template file, replacing any existing one
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), fields = self.len(), "template saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_included_only() {
        let mut selection = FieldSelection::new();
        selection.insert(2, "4000001234567899").unwrap();
        selection.insert(39, "00").unwrap();
        selection.set_value(41, "TERM01").unwrap();

        let template = Template::from_selection(&selection);
        assert_eq!(
            template.fields().collect::<Vec<_>>(),
            vec![(2, "4000001234567899"), (39, "00")]
        );
    }

    #[test]
    fn test_json_shape() {
        let mut selection = FieldSelection::new();
        selection.insert(11, "123456").unwrap();
        selection.insert(3, "000000").unwrap();

        let json = Template::from_selection(&selection).to_json().unwrap();
        assert_eq!(json, "{\n  \"3\": \"000000\",\n  \"11\": \"123456\"\n}");
    }

    #[test]
    fn test_apply_includes_fields_and_skips_unselectable() {
        let template = Template::from_json(r#"{"1": "x", "4": "000000000500", "70": "301"}"#).unwrap();
        let mut selection = FieldSelection::new();
        selection.set_value(4, "000000010000").unwrap();

        assert_eq!(template.apply(&mut selection), 1);
        assert!(selection.is_included(4));
        assert_eq!(selection.value(4), Some("000000000500"));
        assert!(selection.get(1).is_none());
    }

    #[test]
    fn test_out_of_range_keys_do_not_reject_the_file() {
        let template = Template::from_json(r#"{"2": "4000001234567899", "300": "x"}"#).unwrap();
        assert_eq!(template.len(), 2);

        let mut selection = FieldSelection::new();
        assert_eq!(template.apply(&mut selection), 1);
        assert_eq!(selection.value(2), Some("4000001234567899"));
        assert_eq!(selection.included_numbers().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_rejects_non_numeric_keys() {
        assert!(matches!(
            Template::from_json(r#"{"pan": "4000"}"#),
            Err(Error::Json(_))
        ));
    }
}
