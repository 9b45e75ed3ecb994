//! Field data classes and framing options

use std::fmt;

/// Data class of a field, governing validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    /// Digits only (`n`)
    Numeric,
    /// Amount with a debit/credit indicator (`xn`)
    SignedNumeric,
    /// Letters and digits (`an`)
    Alphanumeric,
    /// Printable ASCII (`ans`)
    AlphanumericSpecial,
    /// Hex-rendered bytes (`b`)
    Binary,
    /// Magnetic stripe track data (`z`)
    TrackData,
}

impl TypeClass {
    /// ISO 8583 attribute code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Numeric => "n",
            Self::SignedNumeric => "xn",
            Self::Alphanumeric => "an",
            Self::AlphanumericSpecial => "ans",
            Self::Binary => "b",
            Self::TrackData => "z",
        }
    }

    /// Parse an attribute code
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "n" => Some(Self::Numeric),
            "xn" => Some(Self::SignedNumeric),
            "an" => Some(Self::Alphanumeric),
            "ans" => Some(Self::AlphanumericSpecial),
            "b" => Some(Self::Binary),
            "z" => Some(Self::TrackData),
            _ => None,
        }
    }

    /// Short hint for operators entering a value
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Numeric => "digits only",
            Self::SignedNumeric => "signed amount",
            Self::Alphanumeric => "alphanumeric",
            Self::AlphanumericSpecial => "ASCII printable",
            Self::Binary => "hex bytes",
            Self::TrackData => "track data",
        }
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Transport framing applied around the encoded message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Framing {
    /// Prepend the TPDU header
    pub include_tpdu: bool,
    /// Prepend the 2-byte length header (rendered as 4 hex digits)
    pub include_length_header: bool,
}

impl Framing {
    /// No framing
    #[must_use]
    pub const fn none() -> Self {
        Self {
            include_tpdu: false,
            include_length_header: false,
        }
    }

    /// Enable the TPDU header
    #[must_use]
    pub const fn with_tpdu(mut self) -> Self {
        self.include_tpdu = true;
        self
    }

    /// Enable the length header
    #[must_use]
    pub const fn with_length_header(mut self) -> Self {
        self.include_length_header = true;
        self
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.include_length_header {
            parts.push("LEN");
        }
        if self.include_tpdu {
            parts.push("TPDU");
        }
        if parts.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", parts.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_class_code_roundtrip() {
        let classes = [
            TypeClass::Numeric,
            TypeClass::SignedNumeric,
            TypeClass::Alphanumeric,
            TypeClass::AlphanumericSpecial,
            TypeClass::Binary,
            TypeClass::TrackData,
        ];

        for class in classes {
            assert_eq!(TypeClass::from_code(class.code()), Some(class));
        }
        assert_eq!(TypeClass::from_code("x"), None);
    }

    #[test]
    fn test_framing_builders() {
        let framing = Framing::none().with_tpdu().with_length_header();

        assert!(framing.include_tpdu);
        assert!(framing.include_length_header);
        assert_eq!(framing.to_string(), "LEN | TPDU");
        assert_eq!(Framing::default().to_string(), "NONE");
    }
}
