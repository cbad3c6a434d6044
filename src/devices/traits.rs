//! Traits for retrieving device records.

use crate::devices::data::DeviceRecord;
use crate::error::Result;

/// Trait for anything that can produce the router's current device list.
///
/// Implementations are invoked once per forwarding run and should return
/// every device the router knows about, in the router's order. Failures are
/// fatal to the run.
pub trait DeviceSource {
    /// Fetch a fresh snapshot of all devices.
    fn fetch_devices(&self) -> impl std::future::Future<Output = Result<Vec<DeviceRecord>>> + Send;
}
