//! Router device records and their mapping to metrics points.
//!
//! Device lists come from a [`DeviceSource`], usually a router client
//! command printing JSON. Each [`DeviceRecord`] is turned into one
//! [`Point`] by [`to_point`].

pub mod data;
pub mod mapper;
pub mod source;
pub mod traits;

// Re-export commonly used items
pub use data::{DeviceRecord, Point};
pub use mapper::to_point;
pub use source::{CommandSource, FileSource};
pub use traits::DeviceSource;
