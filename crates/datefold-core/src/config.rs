//! Collapse configuration.

use chrono::{Local, NaiveDate};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::slicer::SliceConfig;

/// How the newest end of the slicing range is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnchorPolicy {
    /// Anchor at the reference date, extended to the newest entry date when
    /// that lies in the future.
    #[default]
    NewestEntry,
    /// Anchor at the reference date unconditionally; future-dated entries
    /// are excluded from the collapse and reported.
    ReferenceDate,
}

/// Configuration for collapse runs.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct CollapseConfig {
    /// Perform every check and report every action without touching the
    /// filesystem.
    #[builder(default = "false")]
    #[serde(default)]
    pub pretend: bool,

    /// Reference date for anchoring (default: today).
    #[builder(default = "Local::now().date_naive()")]
    #[serde(default = "today")]
    pub reference_date: NaiveDate,

    /// How future-dated entries affect the slicing anchor.
    #[builder(default)]
    #[serde(default)]
    pub anchor: AnchorPolicy,

    /// Per-granularity minimum slice counts.
    #[builder(default)]
    #[serde(default)]
    pub slice: SliceConfig,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl CollapseConfig {
    /// Create a new collapse config builder.
    pub fn builder() -> CollapseConfigBuilder {
        CollapseConfigBuilder::default()
    }
}

impl Default for CollapseConfig {
    fn default() -> Self {
        Self {
            pretend: false,
            reference_date: today(),
            anchor: AnchorPolicy::default(),
            slice: SliceConfig::default(),
        }
    }
}
