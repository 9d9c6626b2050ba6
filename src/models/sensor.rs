//! Sensor definitions
//!
//! Each sensor maps one position of the status blob to a named value with
//! display metadata for the home-automation host.

use crate::core::constants::{SENSOR_PREFIX, field};
use crate::models::status::ModemStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The values exposed by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Upload,
    Download,
    DslStatus,
    InternetStatus,
    ModemIp,
    RemoteIp,
    Ipv4LinkUptime,
}

impl SensorKind {
    pub const ALL: [SensorKind; 7] = [
        SensorKind::Upload,
        SensorKind::Download,
        SensorKind::DslStatus,
        SensorKind::InternetStatus,
        SensorKind::ModemIp,
        SensorKind::RemoteIp,
        SensorKind::Ipv4LinkUptime,
    ];

    /// Configuration key
    pub fn key(self) -> &'static str {
        match self {
            SensorKind::Upload => "upload",
            SensorKind::Download => "download",
            SensorKind::DslStatus => "dsl_status",
            SensorKind::InternetStatus => "internet_status",
            SensorKind::ModemIp => "modem_ip",
            SensorKind::RemoteIp => "remote_ip",
            SensorKind::Ipv4LinkUptime => "ipv4_link_uptime",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Friendly name
    pub fn name(self) -> &'static str {
        match self {
            SensorKind::Upload => "Upload",
            SensorKind::Download => "Download",
            SensorKind::DslStatus => "DSL Status",
            SensorKind::InternetStatus => "Internet Status",
            SensorKind::ModemIp => "Modem IP Address",
            SensorKind::RemoteIp => "Remote IP Address",
            SensorKind::Ipv4LinkUptime => "IPv4 Link Uptime",
        }
    }

    pub fn unit(self) -> Option<&'static str> {
        match self {
            SensorKind::Upload | SensorKind::Download => Some("Mbps"),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SensorKind::Upload => "mdi:arrow-up",
            SensorKind::Download => "mdi:arrow-down",
            _ => "mdi:check",
        }
    }

    /// Position of this sensor's value in the status blob
    pub fn field_index(self) -> usize {
        match self {
            SensorKind::Upload => field::UPLOAD,
            SensorKind::Download => field::DOWNLOAD,
            SensorKind::DslStatus => field::DSL_STATUS,
            SensorKind::InternetStatus => field::INTERNET_STATUS,
            SensorKind::ModemIp => field::MODEM_IP,
            SensorKind::RemoteIp => field::REMOTE_IP,
            SensorKind::Ipv4LinkUptime => field::IPV4_LINK_UPTIME,
        }
    }

    /// Entity identifier, e.g. `sensor.pk5001z_upload`
    pub fn entity_id(self) -> String {
        format!("sensor.{}_{}", SENSOR_PREFIX, self.key())
    }

    pub fn read(self, status: &ModemStatus) -> Option<String> {
        status.field(self.field_index()).map(str::to_string)
    }
}

/// A sensor value as served to the host platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub entity_id: String,
    pub key: &'static str,
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub icon: &'static str,
    /// `None` until the first status has been fetched
    pub state: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl SensorReading {
    pub fn new(
        kind: SensorKind,
        status: Option<&ModemStatus>,
        last_updated: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            entity_id: kind.entity_id(),
            key: kind.key(),
            name: kind.name(),
            unit: kind.unit(),
            icon: kind.icon(),
            state: status.and_then(|status| kind.read(status)),
            last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::tests::SAMPLE_BODY;

    #[test]
    fn test_from_key() {
        assert_eq!(SensorKind::from_key("upload"), Some(SensorKind::Upload));
        assert_eq!(
            SensorKind::from_key("IPv4_Link_Uptime"),
            Some(SensorKind::Ipv4LinkUptime)
        );
        assert_eq!(SensorKind::from_key("signal_noise"), None);
    }

    #[test]
    fn test_keys_round_trip() {
        for kind in SensorKind::ALL {
            assert_eq!(SensorKind::from_key(kind.key()), Some(kind));
        }
    }

    #[test]
    fn test_entity_id() {
        assert_eq!(SensorKind::DslStatus.entity_id(), "sensor.pk5001z_dsl_status");
    }

    #[test]
    fn test_units() {
        assert_eq!(SensorKind::Download.unit(), Some("Mbps"));
        assert_eq!(SensorKind::RemoteIp.unit(), None);
    }

    #[test]
    fn test_read_sample() {
        let status = ModemStatus::parse(SAMPLE_BODY).unwrap();
        let expected = [
            (SensorKind::Upload, "0.604"),
            (SensorKind::Download, "1.792"),
            (SensorKind::DslStatus, "CONNECTED"),
            (SensorKind::InternetStatus, "CONNECTED"),
            (SensorKind::ModemIp, "71.219.123.120"),
            (SensorKind::RemoteIp, "71.219.123.254"),
            (SensorKind::Ipv4LinkUptime, "25M:42S"),
        ];
        for (kind, value) in expected {
            assert_eq!(kind.read(&status).as_deref(), Some(value), "{:?}", kind);
        }
    }

    #[test]
    fn test_reading_without_status() {
        let reading = SensorReading::new(SensorKind::ModemIp, None, None);
        assert_eq!(reading.state, None);
        assert_eq!(reading.name, "Modem IP Address");

        let json = serde_json::to_value(&reading).unwrap();
        assert!(json["state"].is_null());
        assert!(json["unit"].is_null());
        assert_eq!(json["entity_id"], "sensor.pk5001z_modem_ip");
    }
}
