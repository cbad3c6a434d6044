//! Fetch, encode, write: the forwarding run and its periodic driver.

use crate::devices::DeviceSource;
use crate::error::{ForwardError, Result};
use crate::influx::{encode_batch, Batch, InfluxWriter};
use chrono::{DateTime, Utc};
use futures_util::stream::{self, BoxStream};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Outcome of one successful forwarding run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique ID, also attached to the run's log span
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Devices returned by the source
    pub devices: usize,
    /// Lines written
    pub lines: usize,
    /// Devices left out as malformed
    pub skipped: usize,
    /// Size of the request body in bytes
    pub bytes: usize,
}

/// Moves device snapshots from a [`DeviceSource`] into InfluxDB.
pub struct Forwarder<S> {
    source: S,
    writer: InfluxWriter,
}

impl<S: DeviceSource> Forwarder<S> {
    /// Create a forwarder reading from `source` and writing through `writer`.
    pub fn new(source: S, writer: InfluxWriter) -> Self {
        Self { source, writer }
    }

    /// Run a single fetch, encode and write cycle.
    pub async fn run_once(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        async {
            let devices = self.source.fetch_devices().await?;
            let batch = self.writer.write_batch(&devices).await?;

            let report = RunReport {
                run_id,
                started_at,
                devices: devices.len(),
                lines: batch.lines,
                skipped: batch.skipped,
                bytes: batch.body.len(),
            };
            info!(
                devices = report.devices,
                lines = report.lines,
                skipped = report.skipped,
                "Run complete"
            );
            Ok::<_, ForwardError>(report)
        }
        .instrument(info_span!("run", %run_id))
        .await
    }
}

impl<S> Forwarder<S>
where
    S: DeviceSource + Send + Sync + 'static,
{
    /// Run forever, once per `interval`, starting immediately.
    ///
    /// A failed run is yielded as an `Err` and the next tick runs again.
    /// Ticks missed while a slow run is in flight are not made up.
    pub fn start_stream(self, interval: Duration) -> BoxStream<'static, Result<RunReport>> {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let stream = stream::unfold((self, ticker), |(forwarder, mut ticker)| async move {
            ticker.tick().await;
            let result = forwarder.run_once().await;
            Some((result, (forwarder, ticker)))
        });

        Box::pin(stream)
    }
}

/// Fetch and encode without writing anything.
pub async fn preview<S: DeviceSource>(source: &S, skip_malformed: bool) -> Result<Batch> {
    let devices = source.fetch_devices().await?;
    encode_batch(&devices, skip_malformed)
}
