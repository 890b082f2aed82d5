use std::io::Write;

use tracing::warn;
use walk::FileType;

use crate::entry::{EntryDifference, ReportEntry, Side};
use crate::ReportSink;

const NO_DIFF: char = '-';
const SEPARATOR: &str = "  ";

/// One-line-per-difference report on a writer.
///
/// Lines come in two shapes. A type mismatch prints both type characters:
///
/// ```text
/// f ! l  path/to/entry
/// ```
///
/// Everything else prints one type character and three indicator columns for
/// content/size, ownership and permissions:
///
/// ```text
/// f c-  path/to/entry
/// ```
///
/// Indicator columns degrade to spaces when they do not apply (metadata not
/// checked, directories without a content notion, symlink permissions).
#[derive(Debug)]
pub struct CompactReport<W> {
    writer: W,
    check_metadata: bool,
}

impl<W: Write> CompactReport<W> {
    /// Creates a compact report writing to `writer`.
    ///
    /// `check_metadata` mirrors the run's setting: when off, the ownership
    /// and permission columns are blank rather than `-`.
    #[must_use]
    pub fn new(writer: W, check_metadata: bool) -> Self {
        Self {
            writer,
            check_metadata,
        }
    }

    /// Consumes the report and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ReportSink for CompactReport<W> {
    fn accept(&mut self, entry: ReportEntry) {
        if let Err(error) = write_summary_line(&mut self.writer, &entry, self.check_metadata) {
            warn!(%error, "failed to write report line");
        }
    }
}

/// Writes the one-line summary for `entry`; shared by the compact and detail
/// faces.
pub(crate) fn write_summary_line<W: Write>(
    writer: &mut W,
    entry: &ReportEntry,
    check_metadata: bool,
) -> std::io::Result<()> {
    let left_type = entry.side(Side::Left).file_type();
    let right_type = entry.side(Side::Right).file_type();

    if entry.has(EntryDifference::EntryType) {
        return writeln!(
            writer,
            "{} ! {}{}{}",
            left_type.repr(),
            right_type.repr(),
            SEPARATOR,
            entry.rel_path()
        );
    }

    let content = if entry.has(EntryDifference::Content) {
        'c'
    } else if entry.has(EntryDifference::Size) {
        's'
    } else if left_type == FileType::Directory {
        ' '
    } else {
        NO_DIFF
    };
    let ownership = if check_metadata {
        if entry.has(EntryDifference::Ownership) {
            'o'
        } else {
            NO_DIFF
        }
    } else {
        ' '
    };
    let permissions = if check_metadata && left_type != FileType::Symlink {
        if entry.has(EntryDifference::Permissions) {
            'p'
        } else {
            NO_DIFF
        }
    } else {
        ' '
    };

    writeln!(
        writer,
        "{} {}{}{}{}{}",
        left_type.repr(),
        content,
        ownership,
        permissions,
        SEPARATOR,
        entry.rel_path()
    )
}
