//! HTTP client for the InfluxDB v2 write API.
//!
//! See: <https://docs.influxdata.com/influxdb/v2.0/write-data/developer-tools/api/>

use crate::devices::DeviceRecord;
use crate::error::{ForwardError, Result};
use crate::influx::batch::{encode_batch, Batch};
use crate::influx::config::InfluxConfig;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, info};

/// Writes device batches to one InfluxDB bucket.
///
/// One request per batch, no retries. Any 2xx answer counts as success.
#[derive(Debug, Clone)]
pub struct InfluxWriter {
    client: Client,
    config: InfluxConfig,
    skip_malformed: bool,
}

impl InfluxWriter {
    /// Create a writer for a validated configuration.
    pub fn new(config: InfluxConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(concat!("lanflux/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            skip_malformed: false,
        })
    }

    /// Leave unusable device records out of the batch instead of failing it.
    pub fn with_skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    /// The endpoint configuration this writer posts to.
    pub fn config(&self) -> &InfluxConfig {
        &self.config
    }

    /// Encode `devices` the way [`write_batch`](Self::write_batch) would.
    pub fn encode_batch(&self, devices: &[DeviceRecord]) -> Result<Batch> {
        encode_batch(devices, self.skip_malformed)
    }

    /// Encode `devices` and write them in a single request.
    ///
    /// An empty batch is not sent.
    pub async fn write_batch(&self, devices: &[DeviceRecord]) -> Result<Batch> {
        let batch = self.encode_batch(devices)?;

        if batch.is_empty() {
            info!(skipped = batch.skipped, "No points to write");
            return Ok(batch);
        }

        self.write_body(&batch.body).await?;
        info!(
            lines = batch.lines,
            skipped = batch.skipped,
            bucket = %self.config.bucket,
            "Wrote batch"
        );
        Ok(batch)
    }

    /// POST an already encoded body to the write endpoint.
    pub async fn write_body(&self, body: &str) -> Result<()> {
        let url = self.config.write_url();
        debug!(url = %url, bytes = body.len(), "Posting line protocol");

        let response = self
            .client
            .post(&url)
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
            ])
            .header(AUTHORIZATION, self.config.authorization())
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForwardError::WriteFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
