use lanflux::{
    encode_batch, format_line, to_point, DeviceRecord, EscapeContext, ForwardError, Value,
};
use serde_json::json;

const TS: i64 = 1465839830100400200;

/// Test the line protocol tutorial scenarios through the public API
#[test]
fn test_format_line_scenarios() {
    let location = vec![("location", Value::from("us-midwest"))];
    let no_tags: Vec<(&str, Value)> = Vec::new();

    assert_eq!(
        format_line("weather", &[("temperature", Value::Int(82))], &location, Some(TS)),
        "weather,location=us-midwest temperature=82 1465839830100400200"
    );
    assert_eq!(
        format_line("weather", &[("temperature", Value::Int(82))], &no_tags, Some(TS)),
        "weather temperature=82 1465839830100400200"
    );
    assert_eq!(
        format_line("weather", &[("too_hot", Value::Bool(true))], &location, Some(TS)),
        "weather,location=us-midwest too_hot=true 1465839830100400200"
    );
    assert_eq!(
        format_line(
            "weather",
            &[("temperature", Value::Int(82))],
            &[("location place", Value::from("us-midwest"))],
            Some(TS)
        ),
        "weather,location\\ place=us-midwest temperature=82 1465839830100400200"
    );
    assert_eq!(
        format_line(
            "weather",
            &[("temperature", Value::from("too\"hot\""))],
            &location,
            Some(TS)
        ),
        "weather,location=us-midwest temperature=\"too\\\"hot\\\"\" 1465839830100400200"
    );
}

/// Test that a float field renders with six fractional digits
#[test]
fn test_small_float_field() {
    assert_eq!(Value::Float(1.0e-5).encode(EscapeContext::FieldValue), "0.000010");
}

/// Test that booleans are never quoted, even as tag values
#[test]
fn test_boolean_never_quoted() {
    let line = format_line(
        "m",
        &[("ok", Value::Bool(false))],
        &[("flag", Value::Bool(true))],
        None,
    );
    assert_eq!(line, "m,flag=true ok=false");
    assert!(!line.contains('"'));
}

/// Test that tags with numeric and string values share one sort order
#[test]
fn test_mixed_tag_types_sorted() {
    let line = format_line(
        "m",
        &[("v", Value::Int(1))],
        &[
            ("zone", Value::Int(3)),
            ("area", Value::Float(0.5)),
            ("mode", Value::from("eco")),
        ],
        None,
    );
    assert_eq!(line, "m,area=0.500000,mode=eco,zone=3 v=1");
}

/// Test the disconnected device scenario
#[test]
fn test_device_with_null_usage() {
    let device: DeviceRecord = serde_json::from_value(json!({
        "url": "/2.2/networks/1/devices/3",
        "mac": "12:34:56:78:9a:bc",
        "ip": null,
        "manufacturer": "Espressif Inc.",
        "nickname": null,
        "hostname": null,
        "device_type": "iot",
        "connected": false,
        "connection_type": "wireless",
        "usage": null,
        "interface": {"frequency": "2.4"},
        "source": {"location": "Garage"}
    }))
    .unwrap();

    let point = to_point(&device).unwrap();
    assert_eq!(
        point.fields,
        vec![
            ("usage_down_mbps".to_string(), Value::Int(0)),
            ("usage_up_mbps".to_string(), Value::Int(0)),
        ]
    );
    assert_eq!(point.tag("ip"), None);
    assert_eq!(point.tag("name"), Some(&Value::from("Espressif Inc.")));
    assert_eq!(
        point.to_line(None),
        "devices,connected=false,connection_type=wireless,device_type=iot,\
         interface_frequency=2.4,mac=12:34:56:78:9a:bc,manufacturer=Espressif\\ Inc.,\
         name=Espressif\\ Inc.,source_location=Garage,url=/2.2/networks/1/devices/3 \
         usage_down_mbps=0,usage_up_mbps=0"
    );
}

/// Test that one device without a location aborts the batch
#[test]
fn test_batch_aborts_on_missing_location() {
    let devices: Vec<DeviceRecord> = serde_json::from_value(json!([
        {"mac": "aa", "source": {"location": "Den"}},
        {"mac": "bb", "source": null}
    ]))
    .unwrap();

    match encode_batch(&devices, false) {
        Err(ForwardError::MalformedRecord(msg)) => assert!(msg.contains("bb")),
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
}

/// Test ForwardError formatting
#[test]
fn test_error_messages() {
    let err = ForwardError::WriteFailed {
        status: 401,
        body: r#"{"code":"unauthorized"}"#.to_string(),
    };
    assert_eq!(
        err.to_string(),
        r#"Write failed with status 401: {"code":"unauthorized"}"#
    );

    assert!(ForwardError::config_error("missing URL")
        .to_string()
        .contains("missing URL"));
    assert!(ForwardError::malformed_record("no location")
        .to_string()
        .contains("no location"));
    assert!(ForwardError::source_error("exit 1")
        .to_string()
        .contains("exit 1"));
}

/// Test that a usage counter above i64::MAX keeps its exact digits
#[test]
fn test_large_usage_value_not_rounded() {
    let device: DeviceRecord = serde_json::from_value(json!({
        "usage": {"down_mbps": u64::MAX, "up_mbps": 2},
        "source": {"location": "Rack"}
    }))
    .unwrap();

    let line = to_point(&device).unwrap().to_line(None);
    assert!(line.ends_with(" usage_down_mbps=18446744073709551615,usage_up_mbps=2"));
}
