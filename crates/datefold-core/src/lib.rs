//! Core calendar types for datefold.
//!
//! This crate provides the pure calendar domain the collapse engine is built
//! on: granularity periods, date slices, the slicing state machine and
//! datestamp extraction from directory names. Nothing in here touches the
//! filesystem.

mod config;
mod datestamp;
mod error;
mod period;
mod slice;
mod slicer;

pub use config::{AnchorPolicy, CollapseConfig, CollapseConfigBuilder};
pub use datestamp::{DatePattern, DatedName};
pub use error::{CollapseError, CollapseWarning, WarningKind};
pub use period::{Period, is_last_day_of_month};
pub use slice::CalendarSlice;
pub use slicer::{SliceConfig, SliceConfigBuilder, calendar_slices};
