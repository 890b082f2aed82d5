//! Delivery of walker emissions to the sink.
//!
//! Both dispatcher flavours expose the same two entry points. The
//! single-threaded one performs content comparison inline on the walker's
//! thread. The multi-threaded one overlaps comparison with walking: a
//! `file-comp` worker resolves content verdicts out of order while the
//! `report` worker replays completions to the sink in walker order, paired
//! through one-shot promises queued at emission time.
//!
//! With no sink configured the run is in status mode: the first observed
//! difference terminates the process with a failure exit, from whichever
//! thread sees it.

use std::io;
use std::process;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use report::{EntryDifference, ReportEntry, ReportSink};

use crate::compare::FileCompare;
use crate::oneshot;
use crate::queue::ClosableQueue;
use crate::Context;

/// Accepts entries from the walker and routes them to the sink.
pub trait Dispatcher {
    /// Forwards an entry whose differences are already final.
    fn post_filled(&mut self, entry: ReportEntry);

    /// Resolves the content verdict for a regular file of `file_size` bytes,
    /// then forwards the entry if it ended up different.
    fn content_compare_then_post(&mut self, entry: ReportEntry, file_size: u64);
}

/// In status mode a difference ends the run immediately: exit with failure,
/// skipping any remaining work.
fn check_status_mode(has_sink: bool, entry: &ReportEntry) {
    if !has_sink && entry.is_different() {
        process::exit(1);
    }
}

/// Dispatcher performing all work synchronously on the walker's thread.
pub struct MonoDispatcher {
    comparator: FileCompare,
    sink: Option<Box<dyn ReportSink + Send>>,
}

impl MonoDispatcher {
    /// Creates a synchronous dispatcher; `None` for the sink selects status
    /// mode.
    #[must_use]
    pub fn new(ctx: Arc<Context>, sink: Option<Box<dyn ReportSink + Send>>) -> Self {
        Self {
            comparator: FileCompare::new(ctx),
            sink,
        }
    }
}

impl Dispatcher for MonoDispatcher {
    fn post_filled(&mut self, entry: ReportEntry) {
        check_status_mode(self.sink.is_some(), &entry);
        if let Some(sink) = self.sink.as_mut() {
            sink.accept(entry);
        }
    }

    fn content_compare_then_post(&mut self, mut entry: ReportEntry, file_size: u64) {
        check_status_mode(self.sink.is_some(), &entry);
        if !self.comparator.equal_content(entry.rel_path(), file_size) {
            entry.record(EntryDifference::Content);
        }
        if entry.is_different() {
            self.post_filled(entry);
        }
    }
}

/// A comparison waiting for the `file-comp` worker.
struct CompareJob {
    entry: ReportEntry,
    promise: oneshot::Sender<ReportEntry>,
    file_size: u64,
}

/// Dispatcher overlapping content comparison with the walk.
///
/// Entries posted here keep the walker's order at the sink: each emission
/// pushes a promise handle onto the report queue while the walker thread
/// still holds the sequence, so completions reattach in order no matter how
/// the comparison worker interleaves.
pub struct MultiDispatcher {
    has_sink: bool,
    comp_queue: Arc<ClosableQueue<CompareJob>>,
    report_queue: Arc<ClosableQueue<oneshot::Receiver<ReportEntry>>>,
    comp_worker: Option<JoinHandle<()>>,
    report_worker: Option<JoinHandle<()>>,
}

impl MultiDispatcher {
    /// Spawns the worker threads; `None` for the sink selects status mode,
    /// in which the report worker is not started at all.
    ///
    /// # Errors
    ///
    /// Returns an error when a worker thread cannot be spawned.
    pub fn new(
        ctx: Arc<Context>,
        sink: Option<Box<dyn ReportSink + Send>>,
    ) -> io::Result<Self> {
        let comp_queue: Arc<ClosableQueue<CompareJob>> = Arc::new(ClosableQueue::new());
        let report_queue: Arc<ClosableQueue<oneshot::Receiver<ReportEntry>>> =
            Arc::new(ClosableQueue::new());
        let has_sink = sink.is_some();

        let comp_worker = thread::Builder::new().name("file-comp".into()).spawn({
            let queue = Arc::clone(&comp_queue);
            let mut comparator = FileCompare::new(ctx);
            move || {
                while let Some(mut job) = queue.recv() {
                    if !comparator.equal_content(job.entry.rel_path(), job.file_size) {
                        job.entry.record(EntryDifference::Content);
                        check_status_mode(has_sink, &job.entry);
                    }
                    job.promise.send(job.entry);
                }
            }
        })?;

        let report_worker = match sink {
            Some(mut sink) => Some(thread::Builder::new().name("report".into()).spawn({
                let queue = Arc::clone(&report_queue);
                move || {
                    while let Some(pending) = queue.recv() {
                        if let Some(entry) = pending.recv() {
                            if entry.is_different() {
                                sink.accept(entry);
                            }
                        }
                    }
                }
            })?),
            None => None,
        };

        Ok(Self {
            has_sink,
            comp_queue,
            report_queue,
            comp_worker: Some(comp_worker),
            report_worker,
        })
    }
}

impl Dispatcher for MultiDispatcher {
    fn post_filled(&mut self, entry: ReportEntry) {
        check_status_mode(self.has_sink, &entry);
        if self.has_sink {
            let (promise, pending) = oneshot::channel();
            promise.send(entry);
            self.report_queue.push(pending);
        }
    }

    fn content_compare_then_post(&mut self, entry: ReportEntry, file_size: u64) {
        check_status_mode(self.has_sink, &entry);
        let (promise, pending) = oneshot::channel();
        self.comp_queue.push(CompareJob {
            entry,
            promise,
            file_size,
        });
        // Queued in the same operation as the job so sink order matches
        // emission order regardless of comparison completion order.
        if self.has_sink {
            self.report_queue.push(pending);
        }
    }
}

impl Drop for MultiDispatcher {
    fn drop(&mut self) {
        self.comp_queue.close();
        self.report_queue.close();
        if let Some(worker) = self.comp_worker.take() {
            let _ = worker.join();
        }
        if let Some(worker) = self.report_worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{run_diff, Settings};
    use report::Side;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    /// Sink recording compact-style identities of everything it accepts.
    #[derive(Clone, Default)]
    struct CollectingSink {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl ReportSink for CollectingSink {
        fn accept(&mut self, entry: ReportEntry) {
            let mut line = format!(
                "{}{}",
                entry.side(Side::Left).file_type().repr(),
                entry.side(Side::Right).file_type().repr()
            );
            for (flag, ch) in [
                (EntryDifference::EntryType, 't'),
                (EntryDifference::Content, 'c'),
                (EntryDifference::Size, 's'),
                (EntryDifference::Ownership, 'o'),
                (EntryDifference::Permissions, 'p'),
            ] {
                if entry.has(flag) {
                    line.push(ch);
                }
            }
            line.push(' ');
            line.push_str(entry.rel_path());
            self.seen.lock().expect("sink mutex").push(line);
        }
    }

    fn build_context(left: &Path, right: &Path) -> Arc<Context> {
        Arc::new(Context {
            settings: Settings {
                debug: false,
                check_metadata: false,
                content_buffer_size: 8,
            },
            roots: [
                walk::PathRoot::open(left).expect("open left"),
                walk::PathRoot::open(right).expect("open right"),
            ],
            ignore: None,
        })
    }

    /// A tree pair with single-sided entries, slow content comparisons and
    /// inline differences interleaved, to exercise order preservation.
    fn populate_mixed_trees(left: &Path, right: &Path) {
        for base in [left, right] {
            fs::create_dir(base.join("sub")).expect("mkdir");
        }
        // Content-compare candidates: same size, different mtime.
        for (name, bytes_left, bytes_right) in [
            ("a_cmp", &b"0123456789abcdef0123"[..], &b"0123456789abcdef0124"[..]),
            ("m_same", b"equal-bytes-on-sides", b"equal-bytes-on-sides"),
            ("sub/z_cmp", b"xxxxxxxxxxyyyyyyyyyy", b"xxxxxxxxxxyyyyyyyyzz"),
        ] {
            fs::write(left.join(name), bytes_left).expect("write left");
            fs::write(right.join(name), bytes_right).expect("write right");
            let old =
                std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
            fs::File::options()
                .append(true)
                .open(right.join(name))
                .expect("open")
                .set_modified(old)
                .expect("set mtime");
        }
        // Inline differences.
        fs::write(left.join("b_only_left"), b"x").expect("write");
        fs::write(right.join("c_only_right"), b"x").expect("write");
        fs::write(left.join("d_sized"), b"123").expect("write");
        fs::write(right.join("d_sized"), b"12345").expect("write");
    }

    fn run_with_dispatcher(threaded: bool) -> Vec<String> {
        let left = tempfile::tempdir().expect("tempdir");
        let right = tempfile::tempdir().expect("tempdir");
        populate_mixed_trees(left.path(), right.path());

        let ctx = build_context(left.path(), right.path());
        let sink = CollectingSink::default();
        let seen = Arc::clone(&sink.seen);
        run_diff(&ctx, threaded, Some(Box::new(sink))).expect("run diff");
        let result = seen.lock().expect("sink mutex").clone();
        result
    }

    #[test]
    fn mono_reports_expected_sequence() {
        assert_eq!(
            run_with_dispatcher(false),
            vec![
                "ffc a_cmp",
                "f-t b_only_left",
                "-ft c_only_right",
                "ffs d_sized",
                "ffc sub/z_cmp",
            ]
        );
    }

    #[test]
    fn multi_matches_mono_order_exactly() {
        let mono = run_with_dispatcher(false);
        for _ in 0..5 {
            assert_eq!(run_with_dispatcher(true), mono);
        }
    }

    #[test]
    fn equal_content_entries_are_dropped_after_comparison() {
        let left = tempfile::tempdir().expect("tempdir");
        let right = tempfile::tempdir().expect("tempdir");
        fs::write(left.path().join("f"), b"same-bytes").expect("write");
        fs::write(right.path().join("f"), b"same-bytes").expect("write");
        let old = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        fs::File::options()
            .append(true)
            .open(right.path().join("f"))
            .expect("open")
            .set_modified(old)
            .expect("set mtime");

        for threaded in [false, true] {
            let ctx = build_context(left.path(), right.path());
            let sink = CollectingSink::default();
            let seen = Arc::clone(&sink.seen);
            run_diff(&ctx, threaded, Some(Box::new(sink))).expect("run diff");
            assert!(seen.lock().expect("sink mutex").is_empty());
        }
    }

    #[test]
    fn workers_exit_cleanly_with_no_work() {
        let left = tempfile::tempdir().expect("tempdir");
        let right = tempfile::tempdir().expect("tempdir");
        let ctx = build_context(left.path(), right.path());
        let dispatcher =
            MultiDispatcher::new(Arc::clone(&ctx), Some(Box::new(CollectingSink::default())))
                .expect("spawn workers");
        drop(dispatcher);
    }
}
