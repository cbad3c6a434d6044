//! Device record to point mapping.
//!
//! Identity attributes become tags so they can be filtered and grouped on;
//! throughput becomes fields. See
//! <https://docs.influxdata.com/influxdb/v1.8/concepts/schema_and_data_layout/#encode-meta-data-in-tags>.

use crate::devices::data::{DeviceRecord, Point, MEASUREMENT};
use crate::error::{ForwardError, Result};
use crate::protocol::Value;

/// Name tag used when a device has no nickname, hostname or manufacturer.
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

/// Frequency tag used for devices without a radio interface.
pub const DEFAULT_FREQUENCY: &str = "0";

/// Build the point for one device.
///
/// Null attributes are left out of the tag set. Missing usage defaults to
/// zero. A device without `source.location` is a [`ForwardError::MalformedRecord`].
pub fn to_point(device: &DeviceRecord) -> Result<Point> {
    let mut tags: Vec<(String, Value)> = Vec::with_capacity(12);

    for (key, raw) in device.scalar_tags() {
        // Line protocol has no way to express a null or empty tag value
        if let Some(raw) = raw.filter(|v| !is_blank(v)) {
            tags.push((key.to_string(), scalar(key, raw)?));
        }
    }

    let location = device
        .source
        .as_ref()
        .and_then(|source| source.location.as_ref())
        .ok_or_else(|| {
            ForwardError::malformed_record(format!(
                "device {} has no source.location",
                device.display_id()
            ))
        })?;
    tags.push(("source_location".to_string(), scalar("source_location", location)?));

    let frequency = match device
        .interface
        .as_ref()
        .and_then(|interface| interface.frequency.as_ref())
        .filter(|v| !is_blank(v))
    {
        Some(raw) => scalar("interface_frequency", raw)?,
        None => Value::from(DEFAULT_FREQUENCY),
    };
    tags.push(("interface_frequency".to_string(), frequency));

    // Nickname is set by hand, hostname by the device itself
    let name = match [&device.nickname, &device.hostname, &device.manufacturer]
        .into_iter()
        .flatten()
        .find(|v| !is_blank(v))
    {
        Some(raw) => scalar("name", raw)?,
        None => Value::from(UNKNOWN_DEVICE_NAME),
    };
    tags.push(("name".to_string(), name));

    // Usage is null while a device is disconnected
    let usage = device.usage.as_ref();
    let fields = vec![
        (
            "usage_down_mbps".to_string(),
            usage_field("usage_down_mbps", usage.and_then(|u| u.down_mbps.as_ref()))?,
        ),
        (
            "usage_up_mbps".to_string(),
            usage_field("usage_up_mbps", usage.and_then(|u| u.up_mbps.as_ref()))?,
        ),
    ];

    Ok(Point {
        measurement: MEASUREMENT.to_string(),
        tags,
        fields,
    })
}

fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn scalar(key: &str, raw: &serde_json::Value) -> Result<Value> {
    Value::try_from(raw).map_err(|err| match err {
        ForwardError::InvalidValueType(kind) => {
            ForwardError::invalid_value_type(format!("`{}` cannot be a {}", key, kind))
        }
        other => other,
    })
}

fn usage_field(key: &str, raw: Option<&serde_json::Value>) -> Result<Value> {
    match raw {
        None | Some(serde_json::Value::Null) => Ok(Value::Int(0)),
        Some(raw) => {
            let value = scalar(key, raw)?;
            if value.is_numeric() {
                Ok(value)
            } else {
                Err(ForwardError::invalid_value_type(format!(
                    "`{}` must be numeric, got {}",
                    key,
                    value.type_name()
                )))
            }
        }
    }
}
