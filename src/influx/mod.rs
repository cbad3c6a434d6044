//! Shipping encoded device points to InfluxDB.

pub mod batch;
pub mod config;
pub mod writer;

// Re-export commonly used items
pub use batch::{encode_batch, Batch};
pub use config::InfluxConfig;
pub use writer::InfluxWriter;
