use std::io::{self, Write};

use meta::NameCache;
use time::UtcOffset;
use tracing::warn;
use walk::FileType;

use crate::compact::write_summary_line;
use crate::entry::{FileInfo, ReportEntry, Side};
use crate::human::{mtime_string, permission_string, size_string};
use crate::ReportSink;

/// Rendering choices for the detail face, fed from the configuration tree.
#[derive(Clone, Copy, Debug)]
pub struct DetailOptions {
    /// Resolve uid/gid to names instead of printing raw ids.
    pub owner_names: bool,
    /// Scale sizes to binary units instead of raw byte counts.
    pub human_sizes: bool,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self {
            owner_names: true,
            human_sizes: true,
        }
    }
}

/// Per-difference report with side-by-side metadata details.
///
/// The default face when the tool runs on a terminal. Each entry prints its
/// compact summary line followed by one detail line per existing side: file
/// type, size, mtime in local time, owner and group, and permissions.
pub struct DetailReport<W> {
    writer: W,
    check_metadata: bool,
    options: DetailOptions,
    names: NameCache,
    offset: UtcOffset,
}

impl<W: Write> DetailReport<W> {
    /// Creates a detail report writing to `writer`.
    ///
    /// The local UTC offset is resolved here, on the constructing thread;
    /// sinks may later run on a worker where the offset cannot be queried.
    #[must_use]
    pub fn new(writer: W, check_metadata: bool, options: DetailOptions) -> Self {
        Self {
            writer,
            check_metadata,
            options,
            names: NameCache::new(),
            offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }

    /// Consumes the report and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_entry(&mut self, entry: &ReportEntry) -> io::Result<()> {
        write_summary_line(&mut self.writer, entry, self.check_metadata)?;
        for (label, side) in [("left ", Side::Left), ("right", Side::Right)] {
            self.write_side(label, entry.side(side))?;
        }
        Ok(())
    }

    fn write_side(&mut self, label: &str, info: &FileInfo) -> io::Result<()> {
        if !info.exists() {
            return writeln!(self.writer, "    {label}  absent");
        }

        write!(self.writer, "    {label}  {}", info.file_type().repr())?;
        if let Some(stat) = info.stat() {
            if info.file_type() == FileType::Regular {
                write!(
                    self.writer,
                    "  {:>10}",
                    size_string(stat.size, self.options.human_sizes)
                )?;
            }
            write!(self.writer, "  {}", mtime_string(stat.mtime.secs, self.offset))?;
            if self.options.owner_names {
                let user = self.names.user_name(stat.uid).to_string();
                let group = self.names.group_name(stat.gid);
                write!(self.writer, "  {user}:{group}")?;
            } else {
                write!(self.writer, "  {}:{}", stat.uid, stat.gid)?;
            }
            if info.file_type() != FileType::Symlink {
                write!(self.writer, "  {}", permission_string(stat.mode))?;
            }
        }
        if let Some(target) = info.symlink_target() {
            write!(self.writer, "  -> {target}")?;
        }
        writeln!(self.writer)
    }
}

impl<W: Write + Send> ReportSink for DetailReport<W> {
    fn accept(&mut self, entry: ReportEntry) {
        if let Err(error) = self.write_entry(&entry) {
            warn!(%error, "failed to write report details");
        }
    }
}
