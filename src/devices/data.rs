//! Data structures for router device records and the points built from them.

use crate::protocol::{format_line, Value};
use serde::{Deserialize, Serialize};

/// Measurement name every device point is written under.
pub const MEASUREMENT: &str = "devices";

/// One network-attached device as reported by the router.
///
/// Scalar attributes are kept as raw JSON so the mapper can decide how to
/// encode them; the router reports `connected` as a boolean and everything
/// else as strings, but nothing enforces that. A key that is missing is
/// treated like one that is `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Router API path of the device (e.g. "/2.2/networks/123/devices/abc")
    #[serde(default)]
    pub url: Option<serde_json::Value>,
    /// MAC address
    #[serde(default)]
    pub mac: Option<serde_json::Value>,
    /// Current IPv4 address
    #[serde(default)]
    pub ip: Option<serde_json::Value>,
    /// Manufacturer looked up from the MAC prefix
    #[serde(default)]
    pub manufacturer: Option<serde_json::Value>,
    /// Name set by the user in the router app
    #[serde(default)]
    pub nickname: Option<serde_json::Value>,
    /// Hostname announced by the device over DHCP
    #[serde(default)]
    pub hostname: Option<serde_json::Value>,
    /// Router's guess at the device kind (e.g. "phone")
    #[serde(default)]
    pub device_type: Option<serde_json::Value>,
    /// Whether the device is currently connected
    #[serde(default)]
    pub connected: Option<serde_json::Value>,
    /// "wireless" or "wired"
    #[serde(default)]
    pub connection_type: Option<serde_json::Value>,
    /// Current throughput; null while the device is disconnected
    #[serde(default)]
    pub usage: Option<Usage>,
    /// Radio the device is attached to
    #[serde(default)]
    pub interface: Option<Interface>,
    /// Access point the device is attached to
    #[serde(default)]
    pub source: Option<Source>,
}

/// Throughput of a device in megabits per second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub down_mbps: Option<serde_json::Value>,
    #[serde(default)]
    pub up_mbps: Option<serde_json::Value>,
}

/// Radio interface details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Band in GHz (e.g. "5"); null for wired devices
    #[serde(default)]
    pub frequency: Option<serde_json::Value>,
}

/// The access point a device is attached to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Room name of the access point (e.g. "Living Room")
    #[serde(default)]
    pub location: Option<serde_json::Value>,
}

impl DeviceRecord {
    /// The nine scalar attributes that become tags, keyed by tag name.
    pub fn scalar_tags(&self) -> [(&'static str, Option<&serde_json::Value>); 9] {
        [
            ("url", self.url.as_ref()),
            ("mac", self.mac.as_ref()),
            ("ip", self.ip.as_ref()),
            ("manufacturer", self.manufacturer.as_ref()),
            ("nickname", self.nickname.as_ref()),
            ("hostname", self.hostname.as_ref()),
            ("device_type", self.device_type.as_ref()),
            ("connected", self.connected.as_ref()),
            ("connection_type", self.connection_type.as_ref()),
        ]
    }

    /// Best identifier for log messages: MAC, then URL.
    pub fn display_id(&self) -> String {
        [&self.mac, &self.url]
            .into_iter()
            .flatten()
            .find_map(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "<unidentified device>".to_string())
    }
}

/// A metrics point ready for line protocol encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Measurement name
    pub measurement: String,
    /// Tag set; encoded sorted by key
    pub tags: Vec<(String, Value)>,
    /// Field set; encoded in this order
    pub fields: Vec<(String, Value)>,
}

impl Point {
    /// Look up a tag by key.
    pub fn tag(&self, key: &str) -> Option<&Value> {
        self.tags.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a field by key.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Encode as one line protocol record.
    pub fn to_line(&self, timestamp: Option<i64>) -> String {
        format_line(&self.measurement, &self.fields, &self.tags, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_deserialize_as_none() {
        let device: DeviceRecord =
            serde_json::from_value(json!({"source": {"location": "Office"}})).unwrap();
        assert!(device.mac.is_none());
        assert!(device.usage.is_none());
        assert!(device.interface.is_none());
        assert_eq!(device.source.unwrap().location, Some(json!("Office")));
    }

    #[test]
    fn test_null_usage_and_extra_keys() {
        let device: DeviceRecord = serde_json::from_value(json!({
            "mac": "aa:bb:cc:dd:ee:ff",
            "usage": null,
            "paused": false,
            "source": {"location": "Office", "serial_number": "X1"}
        }))
        .unwrap();
        assert!(device.usage.is_none());
        assert_eq!(device.display_id(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn test_display_id_falls_back() {
        let device = DeviceRecord {
            url: Some(json!("/2.2/devices/1")),
            ..Default::default()
        };
        assert_eq!(device.display_id(), "/2.2/devices/1");
        assert_eq!(DeviceRecord::default().display_id(), "<unidentified device>");
    }

    #[test]
    fn test_point_lookup_and_line() {
        let point = Point {
            measurement: MEASUREMENT.to_string(),
            tags: vec![
                ("name".to_string(), Value::from("tv")),
                ("connected".to_string(), Value::Bool(true)),
            ],
            fields: vec![("usage_down_mbps".to_string(), Value::Float(1.5))],
        };
        assert_eq!(point.tag("name"), Some(&Value::from("tv")));
        assert_eq!(point.field("usage_up_mbps"), None);
        assert_eq!(
            point.to_line(None),
            "devices,connected=true,name=tv usage_down_mbps=1.500000"
        );
    }
}
