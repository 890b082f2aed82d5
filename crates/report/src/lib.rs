#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `report` defines what a difference looks like and how it reaches the user.
//! The walker produces one [`ReportEntry`] per differing path: the relative
//! path, a per-side [`FileInfo`] snapshot, and a bitmap of
//! [`EntryDifference`] kinds. Entries flow by move through the dispatcher to
//! a [`ReportSink`], which renders them.
//!
//! Two sinks are provided: [`CompactReport`] prints one line per difference
//! and [`DetailReport`] adds per-side metadata details for interactive use.
//!
//! # Invariants
//!
//! - A sink only ever sees entries whose bitmap is non-empty, in the exact
//!   order the walker emitted them.
//! - When [`EntryDifference::EntryType`] is set, the other bits carry no
//!   information.
//!
//! # Examples
//!
//! Render a single-sided entry through the compact sink:
//!
//! ```
//! use report::{CompactReport, FileInfo, ReportEntry, ReportSink};
//! use walk::FileType;
//!
//! let entry = ReportEntry::with_type_mismatch(
//!     "a".to_string(),
//!     FileInfo::new(FileType::Regular, None, None),
//!     FileInfo::absent(),
//! );
//! let mut sink = CompactReport::new(Vec::new(), false);
//! sink.accept(entry);
//! assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "f ! -  a\n");
//! ```

mod compact;
mod detail;
mod entry;
mod human;

pub use compact::CompactReport;
pub use detail::{DetailOptions, DetailReport};
pub use entry::{DiffFlags, EntryDifference, FileInfo, ReportEntry, Side};

/// Destination for finalized report entries.
///
/// `accept` is called once per differing path, in walker emission order, and
/// never with a non-different entry.
pub trait ReportSink: Send {
    /// Consumes one finalized entry.
    fn accept(&mut self, entry: ReportEntry);
}
