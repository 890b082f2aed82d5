//! Two-root traversal and per-entry difference classification.
//!
//! The walker pops directories from an explicit stack, lists both sides
//! (sorted), and merges the listings with a two-pointer scan. Sub-directories
//! present on both sides are collected per directory and pushed so the stack
//! pops them in ascending name order, giving a strict pre-order depth-first
//! emission sequence with sorted siblings.

use std::cmp::Ordering;

use report::{EntryDifference, FileInfo, ReportEntry, Side};
use tracing::{debug, warn};
use walk::{DirEntry, FileType};

use crate::dispatch::Dispatcher;
use crate::Context;

/// Walks both trees and posts every differing entry to `dispatcher`.
pub fn run(ctx: &Context, dispatcher: &mut dyn Dispatcher) {
    DiffWalker {
        ctx,
        dispatcher,
        stack: vec![String::from(".")],
        subdirs: Vec::new(),
    }
    .run();
}

struct DiffWalker<'a> {
    ctx: &'a Context,
    dispatcher: &'a mut dyn Dispatcher,
    /// Directories still to compare.
    stack: Vec<String>,
    /// Sub-directories of the directory currently being compared.
    subdirs: Vec<String>,
}

/// Joins a directory path and a name, keeping root-level paths bare so
/// ignore rules and reports never see a leading `./`.
fn make_path(dir: &str, name: &str) -> String {
    if dir == "." {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

impl DiffWalker<'_> {
    fn run(mut self) {
        while let Some(dir) = self.stack.pop() {
            let left = self.ctx.roots[Side::Left.index()].sorted_dir_content(&dir);
            let right = self.ctx.roots[Side::Right.index()].sorted_dir_content(&dir);
            debug!(
                dir = %dir,
                left = left.len(),
                right = right.len(),
                "comparing directory"
            );
            self.compare_dir(&dir, &left, &right);

            // Collected ascending; push reversed so the stack pops them in
            // ascending order.
            while let Some(sub) = self.subdirs.pop() {
                self.stack.push(sub);
            }
        }
    }

    fn compare_dir(&mut self, dir: &str, left: &[DirEntry], right: &[DirEntry]) {
        let mut i = 0;
        let mut j = 0;
        while i < left.len() && j < right.len() {
            match left[i].name.cmp(&right[j].name) {
                Ordering::Less => {
                    self.handle_single_side(make_path(dir, &left[i].name), Side::Left, &left[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    self.handle_single_side(make_path(dir, &right[j].name), Side::Right, &right[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    self.compare_entry(dir, &left[i], &right[j]);
                    i += 1;
                    j += 1;
                }
            }
        }
        while i < left.len() {
            self.handle_single_side(make_path(dir, &left[i].name), Side::Left, &left[i]);
            i += 1;
        }
        while j < right.len() {
            self.handle_single_side(make_path(dir, &right[j].name), Side::Right, &right[j]);
            j += 1;
        }
    }

    fn is_ignored(&self, rel: &str) -> bool {
        self.ctx.ignore.as_ref().is_some_and(|f| f.is_ignored(rel))
    }

    fn handle_single_side(&mut self, rel: String, side: Side, listed: &DirEntry) {
        if self.is_ignored(&rel) {
            debug!(path = %rel, "ignoring single-sided entry");
            return;
        }
        let info = self.snapshot(side, &rel, listed.file_type);
        let (left, right) = match side {
            Side::Left => (info, FileInfo::absent()),
            Side::Right => (FileInfo::absent(), info),
        };
        self.dispatcher
            .post_filled(ReportEntry::with_type_mismatch(rel, left, right));
    }

    fn compare_entry(&mut self, dir: &str, left: &DirEntry, right: &DirEntry) {
        let rel = make_path(dir, &left.name);
        if self.is_ignored(&rel) {
            debug!(path = %rel, "ignoring entry");
            return;
        }

        if left.file_type != right.file_type {
            let left_info = self.snapshot(Side::Left, &rel, left.file_type);
            let right_info = self.snapshot(Side::Right, &rel, right.file_type);
            self.dispatcher
                .post_filled(ReportEntry::with_type_mismatch(rel, left_info, right_info));
            return;
        }

        let file_type = left.file_type;
        let left_info = self.snapshot(Side::Left, &rel, file_type);
        let right_info = self.snapshot(Side::Right, &rel, file_type);
        let mut entry = ReportEntry::with_matching_type(rel, left_info, right_info);

        let stat_left = entry.side(Side::Left).stat().copied();
        let stat_right = entry.side(Side::Right).stat().copied();

        if self.ctx.settings.check_metadata {
            if let (Some(l), Some(r)) = (stat_left, stat_right) {
                if l.uid != r.uid || l.gid != r.gid {
                    entry.record(EntryDifference::Ownership);
                }
                if l.mode != r.mode {
                    entry.record(EntryDifference::Permissions);
                }
            }
        }

        match file_type {
            FileType::Directory => {
                self.subdirs.push(entry.rel_path().to_string());
            }
            FileType::Regular => {
                if let (Some(l), Some(r)) = (stat_left, stat_right) {
                    if l.size != r.size {
                        entry.record(EntryDifference::Size);
                    } else if l.size > 0 && l.mtime != r.mtime {
                        // Same size, so only the bytes can tell; the verdict
                        // is attached downstream.
                        debug!(
                            path = %entry.rel_path(),
                            "same size but different mtime, checking content"
                        );
                        let size = l.size;
                        self.dispatcher.content_compare_then_post(entry, size);
                        return;
                    }
                }
            }
            FileType::Symlink => {
                let targets_differ = entry.side(Side::Left).symlink_target()
                    != entry.side(Side::Right).symlink_target();
                if targets_differ {
                    entry.record(EntryDifference::Content);
                }
            }
            _ => {}
        }

        if entry.is_different() {
            self.dispatcher.post_filled(entry);
        }
    }

    fn snapshot(&self, side: Side, rel: &str, file_type: FileType) -> FileInfo {
        let root = &self.ctx.roots[side.index()];
        let stat = match root.lstat(rel) {
            Ok(stat) => Some(stat),
            Err(error) => {
                warn!(path = %rel, side = side.index(), %error, "failed to stat entry");
                None
            }
        };
        let symlink_target = if file_type == FileType::Symlink {
            match root.read_symlink(rel, stat.map_or(0, |s| s.size)) {
                Ok(target) => Some(target),
                Err(error) => {
                    warn!(path = %rel, side = side.index(), %error, "failed to read symlink target");
                    None
                }
            }
        } else {
            None
        };
        FileInfo::new(file_type, stat, symlink_target)
    }
}
