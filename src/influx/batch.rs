//! Encoding a device list into one write request body.

use crate::devices::{to_point, DeviceRecord};
use crate::error::{ForwardError, Result};
use tracing::warn;

/// Newline-joined line protocol for one write request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Request body
    pub body: String,
    /// Number of lines in `body`
    pub lines: usize,
    /// Devices left out because their record was unusable
    pub skipped: usize,
}

impl Batch {
    /// Whether there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }

    /// Iterate over the encoded lines.
    pub fn iter_lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines()
    }
}

/// Encode every device as one line, without timestamps.
///
/// Points carry no client timestamp: the whole batch goes out in one request
/// and the database stamps each point on arrival.
///
/// With `skip_malformed` unset the first device that cannot be mapped fails
/// the whole batch. With it set, such devices are logged and counted in
/// [`Batch::skipped`] instead.
pub fn encode_batch(devices: &[DeviceRecord], skip_malformed: bool) -> Result<Batch> {
    let mut lines = Vec::with_capacity(devices.len());
    let mut skipped = 0;

    for device in devices {
        match to_point(device) {
            Ok(point) => lines.push(point.to_line(None)),
            Err(err @ (ForwardError::MalformedRecord(_) | ForwardError::InvalidValueType(_)))
                if skip_malformed =>
            {
                warn!(device = %device.display_id(), error = %err, "Skipping device");
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(Batch {
        lines: lines.len(),
        body: lines.join("\n"),
        skipped,
    })
}
