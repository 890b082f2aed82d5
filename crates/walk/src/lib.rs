#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` provides the filesystem primitives diffdir uses to inspect the two
//! sides of a comparison. Each side is anchored by a [`PathRoot`], an opened
//! directory handle through which every subsequent operation is performed with
//! `openat`-family syscalls. Paths handed to a root are always relative, so a
//! comparison is unaffected by the caller's working directory and the two
//! roots stay fully independent.
//!
//! # Design
//!
//! - [`PathRoot`] owns the directory file descriptor and offers sorted
//!   listings, non-following stats, symlink-target reads, and read-only opens.
//! - [`DirEntry`] pairs a file name with the best [`FileType`] hint the
//!   listing provides. Entries compare byte-wise by name so listings are
//!   deterministic across platforms and filesystems.
//! - [`FileStat`] is the trimmed metadata snapshot carried through the
//!   comparison: size, mtime, mode word, uid and gid.
//!
//! # Invariants
//!
//! - Listings exclude `.` and `..` and are sorted ascending by name.
//! - A listing never reports [`FileType::Unknown`]: entries the kernel does
//!   not classify are resolved with a fallback stat.
//! - Mid-walk I/O failures are recoverable by contract: a failed listing is
//!   logged and reported as empty; stat and readlink failures surface as
//!   [`std::io::Error`] for the caller to log and absorb.

mod entry;
mod root;

pub use entry::{DirEntry, FileStat, FileType, Mtime};
pub use root::PathRoot;
