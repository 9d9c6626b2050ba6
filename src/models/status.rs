//! Modem status blob
//!
//! The modem answers `/GetWANDSLInfo.cgi` with a single line of
//! pipe-delimited fields. Only the field positions carry meaning, so the
//! status is kept as a flat list of trimmed strings.

use crate::core::constants::field;
use thiserror::Error;

/// Number of fields in a well-formed status blob
pub const FIELD_COUNT: usize = 55;

/// Field separator used by the modem
const SEPARATOR: char = '|';

/// Errors raised while parsing a status blob
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("Unexpected field count: expected {expected}, got {actual}")]
    FieldCount { expected: usize, actual: usize },
}

/// Parsed status blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModemStatus {
    fields: Vec<String>,
}

impl ModemStatus {
    /// Parse a raw response body
    ///
    /// # Errors
    ///
    /// Returns `StatusError::FieldCount` unless the body splits into exactly
    /// [`FIELD_COUNT`] fields. A login page or truncated response lands here.
    pub fn parse(raw: &str) -> Result<Self, StatusError> {
        let fields: Vec<String> = raw
            .split(SEPARATOR)
            .map(|value| value.trim().to_string())
            .collect();

        if fields.len() != FIELD_COUNT {
            return Err(StatusError::FieldCount {
                expected: FIELD_COUNT,
                actual: fields.len(),
            });
        }

        Ok(Self { fields })
    }

    /// Placeholder reported while the modem cannot be reached
    pub fn offline() -> Self {
        let mut fields = vec![String::new(); FIELD_COUNT];
        fields[field::INTERNET_STATUS] = "Down".to_string();
        fields[field::MODEM_IP] = "N/A".to_string();
        fields[field::REMOTE_IP] = "N/A".to_string();
        fields[field::IPV4_LINK_UPTIME] = "0".to_string();
        fields[field::DSL_STATUS] = "Down".to_string();
        fields[field::UPLOAD] = "0".to_string();
        fields[field::DOWNLOAD] = "0".to_string();
        Self { fields }
    }

    /// Value at a field position
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Body captured from a live modem
    pub(crate) const SAMPLE_BODY: &str = "CONNECTED||IPoE via DHCP||N/A||N/A|N/A|N/A|10M:40S||15354|15595||26M:54S||1500||1460||71.219.123.120||205.171.2.65||205.171.3.65||71.219.123.254||25M:42S||CONNECTED||0.604||1.792||255.255.255.0||Disabled||N/A||N/A||N/A||64||N/A||||||N/A\r\n";

    #[test]
    fn test_parse_sample_body() {
        let status = ModemStatus::parse(SAMPLE_BODY).unwrap();
        assert_eq!(status.len(), FIELD_COUNT);
        assert_eq!(status.field(field::INTERNET_STATUS), Some("CONNECTED"));
        assert_eq!(status.field(field::MODEM_IP), Some("71.219.123.120"));
        assert_eq!(status.field(field::REMOTE_IP), Some("71.219.123.254"));
        assert_eq!(status.field(field::IPV4_LINK_UPTIME), Some("25M:42S"));
        assert_eq!(status.field(field::DSL_STATUS), Some("CONNECTED"));
        assert_eq!(status.field(field::UPLOAD), Some("0.604"));
        assert_eq!(status.field(field::DOWNLOAD), Some("1.792"));
    }

    #[test]
    fn test_trailing_crlf_is_trimmed() {
        let status = ModemStatus::parse(SAMPLE_BODY).unwrap();
        assert_eq!(status.field(FIELD_COUNT - 1), Some("N/A"));
    }

    #[test]
    fn test_rejects_login_page() {
        let err = ModemStatus::parse("<html><body>Login</body></html>").unwrap_err();
        assert_eq!(
            err,
            StatusError::FieldCount {
                expected: FIELD_COUNT,
                actual: 1
            }
        );
    }

    #[test]
    fn test_rejects_extra_fields() {
        let body = format!("{}|extra", SAMPLE_BODY.trim_end());
        assert!(ModemStatus::parse(&body).is_err());
    }

    #[test]
    fn test_offline_placeholder() {
        let status = ModemStatus::offline();
        assert_eq!(status.len(), FIELD_COUNT);
        assert_eq!(status.field(field::INTERNET_STATUS), Some("Down"));
        assert_eq!(status.field(field::DSL_STATUS), Some("Down"));
        assert_eq!(status.field(field::MODEM_IP), Some("N/A"));
        assert_eq!(status.field(field::UPLOAD), Some("0"));
        assert_eq!(status.field(1), Some(""));
        assert_eq!(status.field(FIELD_COUNT), None);
    }

    #[test]
    fn test_offline_placeholder_matches_modem_format() {
        let raw = "Down||||||||||||||||||||N/A||||||N/A||0||Down||0||0||||||||||||||||||||";
        assert_eq!(ModemStatus::parse(raw).unwrap(), ModemStatus::offline());
    }
}
