//! ISO 8583:1987 field registry
//!
//! A fixed catalog of the 64 primary-bitmap fields. Field 1 is the internal
//! secondary-bitmap indicator and is never selected or serialized directly.

use std::sync::OnceLock;

use time::OffsetDateTime;

use super::{Error, MAX_FIELD, Result, TypeClass};

/// Seed value of a field, resolved once when a registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Constant text
    Static(&'static str),
    /// `MMDDhhmmss` of the registry clock
    TransmissionDateTime,
    /// `hhmmss` of the registry clock
    LocalTime,
    /// `MMDD` of the registry clock
    LocalDate,
}

impl DefaultValue {
    fn resolve(self, clock: OffsetDateTime) -> String {
        let month = u8::from(clock.month());
        match self {
            Self::Static(value) => value.to_string(),
            Self::TransmissionDateTime => format!(
                "{month:02}{:02}{:02}{:02}{:02}",
                clock.day(),
                clock.hour(),
                clock.minute(),
                clock.second()
            ),
            Self::LocalTime => format!(
                "{:02}{:02}{:02}",
                clock.hour(),
                clock.minute(),
                clock.second()
            ),
            Self::LocalDate => format!("{month:02}{:02}", clock.day()),
        }
    }
}

use DefaultValue::{LocalDate, LocalTime, Static, TransmissionDateTime};
use TypeClass::{
    Alphanumeric as AN, AlphanumericSpecial as ANS, Binary as B, Numeric as N,
    SignedNumeric as XN, TrackData as Z,
};

/// (number, label, default, max length, class, sensitive)
type FieldRow = (u8, &'static str, DefaultValue, usize, TypeClass, bool);

#[rustfmt::skip]
const FIELD_TABLE: [FieldRow; MAX_FIELD as usize] = [
    (1,  "Secondary Bitmap (internal)",            Static(""), 0, B, false),
    (2,  "Primary Account Number (PAN)",           Static("4000001234567899"), 19, N, true),
    (3,  "Processing Code",                        Static("000000"), 6, N, false),
    (4,  "Transaction Amount",                     Static("000000010000"), 12, N, false),
    (5,  "Settlement Amount",                      Static("000000010000"), 12, N, false),
    (6,  "Cardholder Billing Amount",              Static("000000010000"), 12, N, false),
    (7,  "Transmission Date & Time",               TransmissionDateTime, 10, N, false),
    (8,  "Billing Fee Amount",                     Static("00000001"), 8, N, false),
    (9,  "Settlement Conversion Rate",             Static("00001000"), 8, N, false),
    (10, "Billing Conversion Rate",                Static("00001000"), 8, N, false),
    (11, "System Trace Audit Number (STAN)",       Static("123456"), 6, N, false),
    (12, "Local Transaction Time",                 LocalTime, 6, N, false),
    (13, "Local Transaction Date",                 LocalDate, 4, N, false),
    (14, "Expiration Date",                        Static("2612"), 4, N, false),
    (15, "Settlement Date",                        Static("0710"), 4, N, false),
    (16, "Conversion Date",                        Static("0710"), 4, N, false),
    (17, "Capture Date",                           Static("0710"), 4, N, false),
    (18, "Merchant Type (MCC)",                    Static("6011"), 4, N, false),
    (19, "Acquiring Institution Country Code",     Static("356"), 3, N, false),
    (20, "PAN Extended Country Code",              Static("356"), 3, N, false),
    (21, "Forwarding Institution Country Code",    Static("356"), 3, N, false),
    (22, "Point of Service Entry Mode",            Static("051"), 3, N, false),
    (23, "Card Sequence Number",                   Static("001"), 3, N, false),
    (24, "Function Code (Network ID)",             Static("0001"), 4, N, false),
    (25, "POS Condition Code",                     Static("00"), 2, N, false),
    (26, "POS Capture Code",                       Static("12"), 2, N, false),
    (27, "Authorization ID Response Length",       Static("1"), 1, N, false),
    (28, "Amount, Transaction Fee",                Static("000000001"), 9, XN, false),
    (29, "Amount, Settlement Fee",                 Static("000000001"), 9, XN, false),
    (30, "Amount, Transaction Processing Fee",     Static("000000001"), 9, XN, false),
    (31, "Amount, Settlement Processing Fee",      Static("000000001"), 9, XN, false),
    (32, "Acquiring Institution ID",               Static("12345678901"), 11, N, false),
    (33, "Forwarding Institution ID",              Static("12345678901"), 11, N, false),
    (34, "PAN Extended",                           Static("12345678901234567890"), 20, Z, true),
    (35, "Track 2 Data",                           Static("4000001234567899=26122010000012345678"), 37, Z, true),
    (36, "Track 3 Data",                           Static("1234567890123456789012345678901234567890"), 104, Z, true),
    (37, "Retrieval Reference Number",             Static("ABC123456789"), 12, AN, false),
    (38, "Authorization ID Response",              Static("A1B2C3"), 6, AN, false),
    (39, "Response Code",                          Static("00"), 2, AN, false),
    (40, "Service Restriction Code",               Static("201"), 3, N, false),
    (41, "Card Acceptor Terminal ID",              Static("TERM01"), 8, ANS, false),
    (42, "Card Acceptor ID Code",                  Static("MERCH12345"), 15, ANS, false),
    (43, "Card Acceptor Name/Location",            Static("TEST MERCHANT     BLR     IN"), 40, ANS, false),
    (44, "Additional Response Data",               Static("OK"), 25, AN, false),
    (45, "Track 1 Data",                           Static("B4000001234567899^DOE/JOHN^26122010000000000000"), 76, ANS, true),
    (46, "Additional Data - ISO",                  Static("ISOEXTRA"), 999, AN, false),
    (47, "Additional Data - National",             Static("NATEXTRA"), 999, AN, false),
    (48, "Additional Data - Private",              Static("PRIVATEEXTRA"), 999, AN, false),
    (49, "Currency Code, Transaction",             Static("356"), 3, N, false),
    (50, "Currency Code, Settlement",              Static("356"), 3, N, false),
    (51, "Currency Code, Cardholder Billing",      Static("356"), 3, N, false),
    (52, "PIN / CVV (16 bytes)",                   Static("1234567890123456"), 16, B, true),
    (53, "Security Related Control Info",          Static("SECUREINFO"), 48, AN, false),
    (54, "Additional Amounts",                     Static("000000001"), 120, AN, false),
    (55, "Reserved ISO (EMV Data)",                Static("EMVDATA"), 255, B, true),
    (56, "Reserved National",                      Static("NATIONAL"), 255, AN, false),
    (57, "Reserved Private",                       Static("PRIVATE"), 255, AN, false),
    (58, "Authentication Code",                    Static("ABC123"), 6, AN, false),
    (59, "Response Indicator",                     Static("RESPIND"), 999, AN, false),
    (60, "Payment Information",                    Static("PAYINFO"), 999, AN, false),
    (61, "Reserved for POS",                       Static("POSDATA"), 999, AN, false),
    (62, "Reserved for Network",                   Static("NETDATA"), 999, AN, false),
    (63, "Reserved for Issuer",                    Static("ISSUERDATA"), 999, AN, false),
    (64, "Message Authentication Code (MAC)",      Static("ABCDEF1234567890"), 16, B, true),
];

/// The PAN is the only LLVAR field in this profile.
const VARIABLE_LENGTH_FIELD: u8 = 2;

/// Fields 2..=7 are always part of a seeded message.
const LAST_MANDATORY_FIELD: u8 = 7;

/// Immutable description of one numbered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    number: u8,
    label: &'static str,
    default_value: String,
    max_length: usize,
    type_class: TypeClass,
    sensitive: bool,
}

impl FieldDefinition {
    /// Field number (1..=64)
    #[must_use]
    pub const fn number(&self) -> u8 {
        self.number
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Seed value used when the field is selected without an override
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Maximum value length in characters
    #[must_use]
    pub const fn max_length(&self) -> usize {
        self.max_length
    }

    /// Data class
    #[must_use]
    pub const fn type_class(&self) -> TypeClass {
        self.type_class
    }

    /// Carries cardholder data (PAN, track data, PIN block, MAC)
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Encoded with a two-digit length prefix
    #[must_use]
    pub const fn is_variable_length(&self) -> bool {
        self.number == VARIABLE_LENGTH_FIELD
    }

    /// Always included in a seeded selection
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        self.number > 1 && self.number <= LAST_MANDATORY_FIELD
    }

    /// Field 1, derived from the selection rather than chosen
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        self.number == 1
    }

    /// Display title, e.g. `F2: Primary Account Number (PAN) 🔒`
    #[must_use]
    pub fn title(&self) -> String {
        let lock = if self.sensitive { " 🔒" } else { "" };
        format!("F{}: {}{lock}", self.number, self.label)
    }
}

/// Catalog of field definitions, indexed by field number.
#[derive(Debug, Clone)]
pub struct Registry {
    fields: Vec<FieldDefinition>,
}

impl Registry {
    /// Build the catalog, resolving clock-derived defaults against `clock`
    #[must_use]
    pub fn at(clock: OffsetDateTime) -> Self {
        let fields = FIELD_TABLE
            .iter()
            .map(
                |&(number, label, default, max_length, type_class, sensitive)| FieldDefinition {
                    number,
                    label,
                    default_value: default.resolve(clock),
                    max_length,
                    type_class,
                    sensitive,
                },
            )
            .collect();
        Self { fields }
    }

    /// Process-wide catalog, with clock defaults taken from the local time of first use
    #[must_use]
    pub fn standard() -> &'static Self {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let clock = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
            Self::at(clock)
        })
    }

    /// Look up a field by number
    pub fn lookup(&self, number: u8) -> Result<&FieldDefinition> {
        usize::from(number)
            .checked_sub(1)
            .and_then(|index| self.fields.get(index))
            .ok_or(Error::UnknownField { number })
    }

    /// Every definition in field-number order, 1..=64
    #[must_use]
    pub fn all_fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Fields always present in a seeded message (2..=7)
    pub fn mandatory(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|field| field.is_mandatory())
    }

    /// Fields the operator opts into (8..=64)
    pub fn optional(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields
            .iter()
            .filter(|field| !field.is_reserved() && !field.is_mandatory())
    }

    /// Optional fields whose number or label contains `query`, case-insensitively.
    /// An empty query matches every optional field.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&FieldDefinition> {
        let needle = query.trim().to_lowercase();
        self.optional()
            .filter(|field| {
                needle.is_empty()
                    || format!("f{} {}", field.number, field.label)
                        .to_lowercase()
                        .contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn registry() -> Registry {
        Registry::at(datetime!(2025-06-14 09:05:07 UTC))
    }

    #[test]
    fn test_catalog_is_dense_and_ordered() {
        let registry = registry();
        let numbers: Vec<u8> = registry.all_fields().iter().map(FieldDefinition::number).collect();
        assert_eq!(numbers, (1..=64).collect::<Vec<u8>>());
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let registry = registry();
        let pan = registry.lookup(2).unwrap();
        assert_eq!(pan.label(), "Primary Account Number (PAN)");
        assert_eq!(pan.max_length(), 19);
        assert!(pan.is_sensitive());
        assert!(pan.is_variable_length());

        assert!(matches!(registry.lookup(0), Err(Error::UnknownField { number: 0 })));
        assert!(matches!(registry.lookup(65), Err(Error::UnknownField { number: 65 })));
    }

    #[test]
    fn test_only_pan_is_variable_length() {
        let registry = registry();
        let llvar: Vec<u8> = registry
            .all_fields()
            .iter()
            .filter(|f| f.is_variable_length())
            .map(FieldDefinition::number)
            .collect();
        assert_eq!(llvar, vec![2]);
    }

    #[test]
    fn test_defaults_fit_their_fields() {
        let registry = registry();
        for field in registry.all_fields() {
            assert!(
                field.default_value().len() <= field.max_length(),
                "F{} default too long",
                field.number()
            );
            if field.type_class() == TypeClass::Numeric {
                assert!(field.default_value().chars().all(|c| c.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn test_clock_defaults() {
        let registry = registry();
        assert_eq!(registry.lookup(7).unwrap().default_value(), "0614090507");
        assert_eq!(registry.lookup(12).unwrap().default_value(), "090507");
        assert_eq!(registry.lookup(13).unwrap().default_value(), "0614");
    }

    #[test]
    fn test_mandatory_optional_split() {
        let registry = registry();
        let mandatory: Vec<u8> = registry.mandatory().map(FieldDefinition::number).collect();
        assert_eq!(mandatory, vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(registry.optional().count(), 57);
        assert!(registry.optional().all(|f| f.number() >= 8));
    }

    #[test]
    fn test_search() {
        let registry = registry();
        let hits: Vec<u8> = registry.search("currency").iter().map(|f| f.number()).collect();
        assert_eq!(hits, vec![49, 50, 51]);

        let by_number: Vec<u8> = registry.search("F41").iter().map(|f| f.number()).collect();
        assert_eq!(by_number, vec![41]);

        assert_eq!(registry.search("  ").len(), 57);
        assert!(registry.search("no such field").is_empty());
    }

    #[test]
    fn test_title_marks_sensitive_fields() {
        let registry = registry();
        assert_eq!(registry.lookup(3).unwrap().title(), "F3: Processing Code");
        assert!(registry.lookup(35).unwrap().title().ends_with('🔒'));
    }
}
