//! InfluxDB line protocol encoding.
//!
//! [`value`] turns one scalar into text for a given position in the line;
//! [`line`] assembles measurement, tags, fields and timestamp into a record.

pub mod line;
pub mod value;

// Re-export commonly used items
pub use line::format_line;
pub use value::{escape, EscapeContext, Value};
