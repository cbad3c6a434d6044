//! # lanflux - router device usage to InfluxDB
//!
//! Periodically asks the router for its list of attached devices, turns each
//! device into one InfluxDB line protocol point and writes the batch to an
//! InfluxDB v2 bucket. Useful for graphing per-device bandwidth on a home
//! network and spotting the device that is eating it.
//!
//! ## Features
//!
//! - **Line protocol encoder**: context-aware escaping, sorted tags, typed fields
//! - **Device mapping**: router attributes as tags, throughput as fields
//! - **Batch writer**: one write request per snapshot, newline-joined
//! - **Forwarder**: single runs or a fixed-interval stream of runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lanflux::{CommandSource, Forwarder, InfluxConfig, InfluxWriter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let writer = InfluxWriter::new(InfluxConfig::from_env()?)?;
//!     let forwarder = Forwarder::new(CommandSource::default(), writer);
//!
//!     let report = forwarder.run_once().await?;
//!     println!("wrote {} devices", report.lines);
//!     Ok(())
//! }
//! ```

pub mod devices;
pub mod error;
pub mod forwarder;
pub mod influx;
pub mod protocol;

// Re-export public API
pub use devices::{
    data::{DeviceRecord, Interface, Point, Source, Usage},
    mapper::to_point,
    source::{CommandSource, FileSource},
    traits::DeviceSource,
};
pub use error::{ForwardError, Result};
pub use forwarder::{preview, Forwarder, RunReport};
pub use influx::{encode_batch, Batch, InfluxConfig, InfluxWriter};
pub use protocol::{format_line, EscapeContext, Value};

/// The default interval between forwarding runs in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
