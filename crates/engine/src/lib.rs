#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` is the comparison core of diffdir. A [`Context`] anchors the two
//! [`PathRoot`]s, the run [`Settings`] and the optional ignore filter; the
//! walker traverses both trees in lock-step and posts every differing entry
//! to a dispatcher, which delivers it to the configured sink.
//!
//! # Design
//!
//! - The walker ([`walker`]) merges the sorted listings of each directory
//!   pair with a two-pointer scan and classifies every name into
//!   single-sided, type-mismatched or same-type, recording difference bits as
//!   it goes. Traversal is depth-first with sorted siblings, so emissions are
//!   strictly ordered.
//! - Content comparison ([`FileCompare`]) is a streamed byte-equal check and
//!   is only triggered for same-size regular files whose mtimes differ.
//! - Dispatchers ([`dispatch`]) come in two flavours: the single-threaded one
//!   compares inline; the multi-threaded one offloads comparisons to a
//!   worker while a promise-per-emission report queue preserves the walker's
//!   order at the sink.
//!
//! # Invariants
//!
//! - The sink receives only entries with at least one recorded difference,
//!   in walker emission order, for both dispatcher flavours.
//! - Ignored paths produce no entry and are never descended.
//! - In status mode (no sink) the process exits with failure on the first
//!   observed difference.

mod compare;
pub mod dispatch;
mod queue;
mod oneshot;
pub mod walker;

use std::io;
use std::sync::Arc;

use filters::IgnoreFilter;
use report::ReportSink;
use walk::PathRoot;

pub use compare::FileCompare;
pub use queue::ClosableQueue;

use dispatch::{Dispatcher, MonoDispatcher, MultiDispatcher};

/// Immutable settings of a comparison run.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    /// Emit verbose progress information.
    pub debug: bool,
    /// Compare ownership and permissions.
    pub check_metadata: bool,
    /// Per-side buffer size for content comparison, in bytes.
    pub content_buffer_size: usize,
}

/// Shared, read-only state of a comparison run.
#[derive(Debug)]
pub struct Context {
    /// Run settings.
    pub settings: Settings,
    /// The left and right roots.
    pub roots: [PathRoot; 2],
    /// Optional path exclusion filter.
    pub ignore: Option<IgnoreFilter>,
}

/// Runs a complete comparison.
///
/// Wires a walker to the dispatcher selected by `threaded` and to `sink`;
/// passing no sink selects status mode, in which the process exits with
/// failure on the first difference. Returns once the walk is finished and,
/// in threaded mode, the workers have drained and joined.
///
/// # Errors
///
/// Returns an error when the threaded dispatcher's workers cannot be
/// spawned.
pub fn run_diff(
    ctx: &Arc<Context>,
    threaded: bool,
    sink: Option<Box<dyn ReportSink + Send>>,
) -> io::Result<()> {
    let mut dispatcher: Box<dyn Dispatcher> = if threaded {
        Box::new(MultiDispatcher::new(Arc::clone(ctx), sink)?)
    } else {
        Box::new(MonoDispatcher::new(Arc::clone(ctx), sink))
    };
    walker::run(ctx, dispatcher.as_mut());
    Ok(())
}
