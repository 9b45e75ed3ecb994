//! ISO 8583 text codec
//!
//! Builds the wire message for a selection. This profile renders everything,
//! bitmap included, as ASCII text rather than packed binary.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

use super::{
    BITMAP_HEX_LEN, Bitmap, Error, FieldDefinition, FieldSelection, Framing, LLVAR_MAX, MAX_FRAME_BYTES, MTI,
    Registry, Result, TPDU,
};

/// One field as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedField {
    /// Two-digit length prefix, for variable-length fields only
    pub prefix: Option<String>,
    /// Value, verbatim
    pub value: String,
}

impl EncodedField {
    /// Prefix followed by value
    #[must_use]
    pub fn wire(&self) -> String {
        let mut out = self.prefix.clone().unwrap_or_default();
        out.push_str(&self.value);
        out
    }
}

/// Encode a single field value.
///
/// Variable-length fields get a zero-padded two-digit length prefix; lengths
/// above 99 cannot be expressed and fail with [`Error::EncodingOverflow`].
/// Fixed-length values are used as-is with no padding or truncation.
pub fn encode_field(definition: &FieldDefinition, value: &str) -> Result<EncodedField> {
    let prefix = if definition.is_variable_length() {
        let len = value.chars().count();
        if len > LLVAR_MAX {
            return Err(Error::EncodingOverflow {
                number: definition.number(),
                len,
                max: LLVAR_MAX,
            });
        }
        Some(format!("{len:02}"))
    } else {
        None
    };

    Ok(EncodedField {
        prefix,
        value: value.to_string(),
    })
}

/// Display row mirroring one encoded field. Never transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownEntry {
    /// Field number
    pub number: u8,
    /// Field label
    pub label: &'static str,
    /// Length prefix emitted ahead of the value
    pub prefix: Option<String>,
    /// Value as emitted
    pub value: String,
}

impl fmt::Display for BreakdownEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{} = {}", self.number, self.value)
    }
}

/// Result of one [`build`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMessage {
    bitmap: Bitmap,
    payload: String,
    framed: String,
    breakdown: Vec<BreakdownEntry>,
    framing: Framing,
}

impl EncodedMessage {
    /// Presence bitmap
    #[must_use]
    pub const fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Bitmap rendered as uppercase hex
    #[must_use]
    pub fn bitmap_hex(&self) -> String {
        self.bitmap.to_hex()
    }

    /// MTI, bitmap and fields, before framing
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Payload with the requested framing applied
    #[must_use]
    pub fn framed(&self) -> &str {
        &self.framed
    }

    /// Per-field rows in wire order
    #[must_use]
    pub fn breakdown(&self) -> &[BreakdownEntry] {
        &self.breakdown
    }

    /// Framing used for this message
    #[must_use]
    pub const fn framing(&self) -> Framing {
        self.framing
    }

    /// Framed message as bytes for a transport
    #[must_use]
    pub fn wire_bytes(&self) -> Bytes {
        Bytes::from(self.framed.clone())
    }
}

/// Build the wire message for every included field of `selection`.
///
/// The message is `MTI + bitmap + fields` in ascending field order, then
/// optionally wrapped in the TPDU header and, outside that, the length header
/// carrying half the character count as 4 hex digits.
///
/// Values are not validated here; run [`validate`](super::validate) first.
/// Any error aborts the build, so no partially framed message is ever returned.
pub fn build(
    selection: &FieldSelection,
    registry: &Registry,
    framing: Framing,
) -> Result<EncodedMessage> {
    let bitmap = Bitmap::from_fields(selection.included_numbers())?;

    let mut payload = String::with_capacity(MTI.len() + BITMAP_HEX_LEN + 64);
    payload.push_str(MTI);
    payload.push_str(&bitmap.to_hex());

    let mut breakdown = Vec::new();
    for (number, value) in selection.included() {
        let definition = registry.lookup(number)?;
        let encoded = encode_field(definition, value)?;
        trace!(field = number, len = encoded.value.len(), "encoded field");

        if let Some(prefix) = &encoded.prefix {
            payload.push_str(prefix);
        }
        payload.push_str(&encoded.value);
        breakdown.push(BreakdownEntry {
            number,
            label: definition.label(),
            prefix: encoded.prefix,
            value: encoded.value,
        });
    }

    let framed = frame(&payload, framing)?;
    debug!(
        fields = breakdown.len(),
        chars = framed.len(),
        framing = %framing,
        "built message"
    );

    Ok(EncodedMessage {
        bitmap,
        payload,
        framed,
        breakdown,
        framing,
    })
}

fn frame(payload: &str, framing: Framing) -> Result<String> {
    let mut message = String::new();
    if framing.include_tpdu {
        message.push_str(TPDU);
    }
    message.push_str(payload);

    if framing.include_length_header {
        let bytes = message.chars().count() / 2;
        if bytes > MAX_FRAME_BYTES {
            return Err(Error::FrameTooLong {
                bytes,
                max: MAX_FRAME_BYTES,
            });
        }
        message.insert_str(0, &format!("{bytes:04X}"));
    }

    Ok(message)
}
