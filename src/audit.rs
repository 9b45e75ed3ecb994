//! Request/response audit log

use std::fmt;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Kind of audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
    /// Message handed to a transport
    Request,
    /// Reply received from the switch
    Response,
    /// Transport failure, as opaque text
    Failure,
}

impl AuditKind {
    const fn marker(self) -> &'static str {
        match self {
            Self::Request => "→ ",
            Self::Response => "← ",
            Self::Failure => "ERROR: ",
        }
    }
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    exchange: Uuid,
    at: OffsetDateTime,
    kind: AuditKind,
    text: String,
}

impl AuditEntry {
    /// Exchange this record belongs to
    #[must_use]
    pub const fn exchange(&self) -> Uuid {
        self.exchange
    }

    /// When the record was made
    #[must_use]
    pub const fn at(&self) -> OffsetDateTime {
        self.at
    }

    /// Record kind
    #[must_use]
    pub const fn kind(&self) -> AuditKind {
        self.kind
    }

    /// Logged text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line prefixed with an RFC 3339 timestamp
    #[must_use]
    pub fn timestamped(&self) -> String {
        let stamp = self.at.format(&Rfc3339).unwrap_or_default();
        format!("[{stamp}] {self}")
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.marker(), self.text)
    }
}

/// Append-only log of single request/response exchanges
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an exchange by logging the outbound message
    pub fn request(&mut self, text: impl Into<String>) -> Uuid {
        let exchange = Uuid::new_v4();
        self.push(exchange, AuditKind::Request, text.into());
        exchange
    }

    /// Log the reply for an exchange
    pub fn response(&mut self, exchange: Uuid, text: impl Into<String>) {
        self.push(exchange, AuditKind::Response, text.into());
    }

    /// Log a transport failure for an exchange
    pub fn failure(&mut self, exchange: Uuid, text: impl Into<String>) {
        self.push(exchange, AuditKind::Failure, text.into());
    }

    /// Every record, oldest first
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Records belonging to one exchange
    pub fn exchange(&self, exchange: Uuid) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter().filter(move |entry| entry.exchange == exchange)
    }

    fn push(&mut self, exchange: Uuid, kind: AuditKind, text: String) {
        let at = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        self.entries.push(AuditEntry {
            exchange,
            at,
            kind,
            text,
        });
    }
}

impl fmt::Display for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let mut log = AuditLog::new();
        let ok = log.request("0200400000000000000016");
        log.response(ok, "0210");
        let failed = log.request("0200");
        log.failure(failed, "connection refused");

        assert_eq!(
            log.to_string(),
            "→ 0200400000000000000016\n← 0210\n→ 0200\nERROR: connection refused\n"
        );
        assert_ne!(ok, failed);
        assert_eq!(log.exchange(ok).count(), 2);
        assert_eq!(log.exchange(failed).last().unwrap().kind(), AuditKind::Failure);
    }

    #[test]
    fn test_timestamped_line() {
        let mut log = AuditLog::new();
        log.request("0200");
        let line = log.entries()[0].timestamped();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] → 0200"));
    }
}
