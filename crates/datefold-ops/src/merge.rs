//! Directory merge primitives.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use datefold_core::{CollapseError, CollapseWarning};

use crate::plan::{MergeAction, MergeReport};

/// Merges one source directory (or file) into a destination directory.
///
/// All operations are sequential blocking filesystem calls; nothing is
/// retried and nothing is rolled back. In pretend mode every existence and
/// kind check still runs against the real tree and every action is recorded
/// in the report, but the filesystem is never touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryMerger {
    /// Check and report without mutating.
    pub pretend: bool,
}

impl DirectoryMerger {
    /// Create a merger.
    pub fn new(pretend: bool) -> Self {
        Self { pretend }
    }

    /// Merge `source` into `destination`.
    ///
    /// - `source == destination`: no-op.
    /// - `destination` missing: single atomic rename.
    /// - `source` is a plain file: moved into `destination` as a child.
    /// - both directories: every entry of `source` migrates into
    ///   `destination`; a same-named directory at the target is recursed
    ///   into, a same-named file at the target leaves the source entry in
    ///   place and is reported as skipped. The emptied source is removed
    ///   afterwards, dropping any skipped entries with it.
    pub fn merge_into(
        &self,
        source: &Path,
        destination: &Path,
        report: &mut MergeReport,
    ) -> Result<(), CollapseError> {
        if !source.exists() {
            return Err(CollapseError::NotFound {
                path: source.to_path_buf(),
            });
        }

        if source == destination {
            debug!(path = %source.display(), "source equals destination; nothing to do");
            return Ok(());
        }

        if !destination.exists() {
            return self.rename(source, destination, report);
        }

        if !destination.is_dir() {
            return Err(CollapseError::NotADirectory {
                path: destination.to_path_buf(),
            });
        }

        if !source.is_dir() {
            // Plain file: becomes a child of the destination directory.
            let target = destination.join(source.file_name().unwrap_or_default());
            if target.exists() {
                info!(path = %source.display(), "skipped (exists at destination)");
                report.warnings.push(CollapseWarning::entry_collision(source));
                return Ok(());
            }
            return self.rename(source, &target, report);
        }

        self.merge_children(source, destination, report)?;
        self.remove_source(source, report)
    }

    /// Migrate every entry of `source` into `destination`.
    fn merge_children(
        &self,
        source: &Path,
        destination: &Path,
        report: &mut MergeReport,
    ) -> Result<(), CollapseError> {
        debug!(
            source = %source.display(),
            destination = %destination.display(),
            "merging directory contents"
        );

        // Worklist of source-relative paths; colliding directories push
        // their children back onto it instead of recursing on the stack.
        let mut queue: VecDeque<PathBuf> = VecDeque::from(list_children(source)?);
        while let Some(rel) = queue.pop_front() {
            let from = source.join(&rel);
            let to = destination.join(&rel);

            if !to.exists() {
                self.rename(&from, &to, report)?;
            } else if from.is_dir() && to.is_dir() {
                for child in list_children(&from)? {
                    queue.push_back(rel.join(child));
                }
            } else {
                info!(path = %from.display(), "skipped (exists at destination)");
                report.warnings.push(CollapseWarning::entry_collision(&from));
            }
        }
        Ok(())
    }

    /// Remove what is left of a merged-out source.
    fn remove_source(&self, source: &Path, report: &mut MergeReport) -> Result<(), CollapseError> {
        if !source.exists() {
            return Ok(());
        }
        if source.is_dir() {
            info!(path = %source.display(), "removing merged source directory");
            report.actions.push(MergeAction::remove_dir(source));
            if !self.pretend {
                fs::remove_dir_all(source).map_err(|e| CollapseError::io(source, e))?;
            }
        } else {
            info!(path = %source.display(), "removing merged source file");
            report.actions.push(MergeAction::remove_file(source));
            if !self.pretend {
                fs::remove_file(source).map_err(|e| CollapseError::io(source, e))?;
            }
        }
        Ok(())
    }

    /// Record and perform an atomic rename.
    fn rename(
        &self,
        source: &Path,
        destination: &Path,
        report: &mut MergeReport,
    ) -> Result<(), CollapseError> {
        debug_assert!(source.exists(), "rename source must exist");
        debug_assert!(!destination.exists(), "rename destination must be free");

        info!(source = %source.display(), destination = %destination.display(), "rename");
        report.actions.push(MergeAction::rename(source, destination));
        if !self.pretend {
            fs::rename(source, destination).map_err(|e| CollapseError::io(source, e))?;
        }
        Ok(())
    }
}

/// Immediate child names of a directory, as relative paths.
fn list_children(dir: &Path) -> Result<Vec<PathBuf>, CollapseError> {
    let entries = fs::read_dir(dir).map_err(|e| CollapseError::io(dir, e))?;
    let mut children = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CollapseError::io(dir, e))?;
        children.push(PathBuf::from(entry.file_name()));
    }
    Ok(children)
}
