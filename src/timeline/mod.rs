//! # Timeline
//!
//! Maps raw per-model execution rows for one project and day into a normalized,
//! classified, time-bounded view.
//!
//! - [`types`] - day ranges, extents, windows and the timeline payload
//! - [`builder`] - duration rounding, status classification, extent computation
//! - [`layout`] - percentage layout of windows over a visible range

pub mod builder;
pub mod layout;
pub mod types;

pub use builder::{compute_extent, duration_millis, duration_minutes, TimelineBuilder};
pub use layout::{layout_rows, TimelineRow};
pub use types::{DayRange, StatusThresholds, TimeExtent, TimelineData, TimelineWindow};
