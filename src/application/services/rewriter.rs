//! Citation rewriting service
//!
//! Walks root directories depth-first and rewrites every candidate file in
//! place. Each file is read completely, rewritten in memory and replaced
//! atomically; the first I/O failure aborts the run.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, trace};
use walkdir::WalkDir;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CitationRewriter, FileReport, RunSummary};
use crate::infrastructure::traits::FileSystem;

/// Rewrites `<name>.js, Line: <n>` citations under one or more roots.
pub struct RewriterService {
    fs: Arc<dyn FileSystem>,
    citations: CitationRewriter,
}

impl RewriterService {
    /// Create a new rewriter service.
    pub fn new(fs: Arc<dyn FileSystem>, citations: CitationRewriter) -> Self {
        Self { fs, citations }
    }

    /// Traverse every root in order, each as an independent full walk.
    ///
    /// `on_file` is called with the path of each candidate before it is
    /// rewritten.
    ///
    /// # Errors
    /// Fails on the first root that is missing or unreadable, or on the
    /// first file that cannot be read or written. Files processed before
    /// the failure stay rewritten.
    pub fn traverse_all<F>(&self, roots: &[PathBuf], mut on_file: F) -> ApplicationResult<RunSummary>
    where
        F: FnMut(&Path),
    {
        debug!("traverse_all: roots={:?}", roots);
        let mut summary = RunSummary::default();

        for root in roots {
            let reports = self.traverse(root, &mut on_file)?;
            summary.files.extend(reports);
        }

        info!(
            "traverse_all: processed={}, changed={}, lines_rewritten={}",
            summary.files_processed(),
            summary.files_changed(),
            summary.lines_rewritten()
        );
        Ok(summary)
    }

    /// Recursively visit `root` and rewrite every candidate file.
    ///
    /// Entries are visited depth-first, sorted by file name within each
    /// directory. Symbolic links are followed; a link cycle is reported as
    /// a walk error.
    ///
    /// # Returns
    /// Reports of processed files in visit order.
    #[instrument(skip(self, on_file), fields(root = %root.display()))]
    pub fn traverse<F>(&self, root: &Path, mut on_file: F) -> ApplicationResult<Vec<FileReport>>
    where
        F: FnMut(&Path),
    {
        if !self.fs.exists(root) {
            return Err(walk_error(root, io::ErrorKind::NotFound, "no such directory"));
        }
        if !self.fs.is_dir(root) {
            return Err(walk_error(root, io::ErrorKind::InvalidInput, "not a directory"));
        }

        let mut reports = Vec::new();

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.with_path_context("walk directory", root)?;

            if !entry.file_type().is_file() {
                continue;
            }

            // Non UTF-8 names cannot match the word-character pattern.
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            if !self.citations.is_candidate(file_name) {
                trace!("traverse: skipping {}", entry.path().display());
                continue;
            }

            on_file(entry.path());
            reports.push(self.rewrite_file(entry.path())?);
        }

        debug!("traverse: processed {} files", reports.len());
        Ok(reports)
    }

    /// Rewrite citations in a single file and write it back.
    ///
    /// The file is written even when no line changed. Content is handled as
    /// bytes, so files that are not valid UTF-8 are rewritten too.
    pub fn rewrite_file(&self, path: &Path) -> ApplicationResult<FileReport> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "file name is not valid UTF-8"))
            .with_path_context("rewrite file", path)?;

        let content = self
            .fs
            .read(path)
            .with_path_context("read file", path)?;

        let (buffer, rewritten) = self.citations.rewrite(&content, file_name);
        let rendered = buffer.render();

        self.fs
            .write_atomic(path, &rendered)
            .with_path_context("write file", path)?;

        let report = FileReport {
            path: path.to_path_buf(),
            file_name: file_name.to_string(),
            lines: buffer.len(),
            rewritten,
            changed: rendered != content,
        };
        debug!(
            "rewrite_file: {} lines={}, rewritten={}, changed={}",
            path.display(),
            report.lines,
            report.rewritten,
            report.changed
        );
        Ok(report)
    }
}

fn walk_error(root: &Path, kind: io::ErrorKind, message: &str) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: format!("walk directory: {}", root.display()),
        source: Box::new(io::Error::new(kind, message.to_string())),
    }
}
