//! Collapse orchestration.

use std::fs;
use std::path::Path;

use compact_str::CompactString;
use tracing::{debug, info};

use datefold_core::{CollapseConfig, CollapseError, DatePattern};

use crate::assign::assign;
use crate::merge::DirectoryMerger;
use crate::plan::{CollapsePlan, MergeReport};
use crate::workdir::WorkingDirGuard;

/// Collapses the datestamped children of a root directory into
/// progressively coarser calendar buckets.
///
/// The run owns the target tree: no other process is expected to touch it,
/// and the working directory is switched into the root (and restored on
/// every exit path) for the duration of a call. Re-running over an already
/// collapsed tree is safe and performs no mutations, because members whose
/// name equals their destination are left untouched.
#[derive(Debug, Default)]
pub struct Collapser {
    config: CollapseConfig,
    pattern: DatePattern,
}

impl Collapser {
    /// Create a collapser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collapser with custom configuration.
    pub fn with_config(config: CollapseConfig) -> Self {
        Self {
            config,
            pattern: DatePattern::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &CollapseConfig {
        &self.config
    }

    /// Compute the assignment for the immediate children of `root` without
    /// executing it.
    pub fn plan(&self, root: &Path) -> Result<CollapsePlan, CollapseError> {
        let _guard = self.enter(root)?;
        let names = read_child_names(Path::new("."))?;
        assign(&names, &self.pattern, &self.config)
    }

    /// Collapse the immediate children of `root`.
    ///
    /// There is no transactional guarantee across buckets: a failure partway
    /// through leaves earlier buckets collapsed and later ones untouched,
    /// and the error propagates immediately.
    pub fn collapse(&self, root: &Path) -> Result<MergeReport, CollapseError> {
        let _guard = self.enter(root)?;
        let names = read_child_names(Path::new("."))?;
        let plan = assign(&names, &self.pattern, &self.config)?;

        let merger = DirectoryMerger::new(self.config.pretend);
        let mut report = MergeReport::new(self.config.pretend);
        report.warnings.extend(plan.warnings.iter().cloned());

        for bucket in &plan.buckets {
            for member in bucket.pending_members() {
                debug!(member = %member, destination = %bucket.destination, "collapsing");
                merger.merge_into(
                    Path::new(member.as_str()),
                    Path::new(bucket.destination.as_str()),
                    &mut report,
                )?;
            }
        }

        info!(
            renames = report.renames(),
            removals = report.removals(),
            skips = report.skips(),
            pretend = report.pretend,
            "collapse finished"
        );
        Ok(report)
    }

    /// Validate the root and switch into it for the duration of the run.
    fn enter(&self, root: &Path) -> Result<WorkingDirGuard, CollapseError> {
        if !root.exists() {
            return Err(CollapseError::NotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(CollapseError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        WorkingDirGuard::change_to(root)
    }
}

/// Names of the immediate children of `dir`.
fn read_child_names(dir: &Path) -> Result<Vec<CompactString>, CollapseError> {
    let entries = fs::read_dir(dir).map_err(|e| CollapseError::io(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CollapseError::io(dir, e))?;
        names.push(CompactString::from(
            entry.file_name().to_string_lossy().as_ref(),
        ));
    }
    Ok(names)
}
