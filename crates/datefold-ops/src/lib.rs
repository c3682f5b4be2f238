//! Collapse engine for datefold.
//!
//! This crate assigns datestamped directories to calendar slices and merges
//! each slice's members into a single destination directory, using
//! sequential blocking filesystem calls. The pure calendar math lives in
//! `datefold-core`; everything here has observable side effects unless the
//! pretend flag is set.

mod assign;
mod collapse;
mod merge;
mod plan;
mod workdir;

pub use assign::assign;
pub use collapse::Collapser;
pub use merge::DirectoryMerger;
pub use plan::{CollapsePlan, MergeAction, MergeReport, SliceBucket};
pub use workdir::WorkingDirGuard;
