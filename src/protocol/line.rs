//! Line protocol record composition.
//!
//! ```text
//! measurement[,tag_key=tag_value...] field_key=field_value[,field_key=field_value...][ timestamp]
//! ```
//!
//! See: <https://docs.influxdata.com/influxdb/v1.8/write_protocols/line_protocol_tutorial/>

use super::value::{escape, EscapeContext, Value};

/// Compose one line protocol record.
///
/// Tags are sorted by their raw key before escaping; fields keep the order
/// they were given in. A measurement without tags gets no comma. The
/// timestamp is appended verbatim when present and non-zero; scaling it to
/// the write precision is the caller's job.
///
/// `fields` must not be empty.
pub fn format_line<F, T>(
    measurement: &str,
    fields: &[(F, Value)],
    tags: &[(T, Value)],
    timestamp: Option<i64>,
) -> String
where
    F: AsRef<str>,
    T: AsRef<str>,
{
    let mut line = escape(measurement, EscapeContext::Measurement);

    let mut sorted_tags: Vec<&(T, Value)> = tags.iter().collect();
    sorted_tags.sort_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()));
    for (key, value) in sorted_tags {
        line.push(',');
        line.push_str(&escape(key.as_ref(), EscapeContext::TagKey));
        line.push('=');
        line.push_str(&value.encode(EscapeContext::TagValue));
    }

    line.push(' ');

    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&escape(key.as_ref(), EscapeContext::FieldKey));
        line.push('=');
        line.push_str(&value.encode(EscapeContext::FieldValue));
    }

    if let Some(ts) = timestamp.filter(|ts| *ts != 0) {
        line.push(' ');
        line.push_str(&ts.to_string());
    }

    tracing::debug!(line = %line, "Line generated");
    line
}
