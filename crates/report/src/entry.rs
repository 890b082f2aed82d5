use walk::{FileStat, FileType};

/// One side of the comparison, usable as an index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    /// The first directory argument.
    Left = 0,
    /// The second directory argument.
    Right = 1,
}

impl Side {
    /// Returns the array index of this side.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Kind of difference recorded for an entry.
///
/// `EntryType` stands alone: it is set exactly when the two sides have
/// different types (including absence on one side), and the remaining kinds
/// are only meaningful when both sides exist with the same type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryDifference {
    /// The file types differ.
    EntryType,
    /// Owner uid or gid differ.
    Ownership,
    /// The mode words differ.
    Permissions,
    /// Same size but different bytes (regular), or different target
    /// (symlink).
    Content,
    /// The sizes differ.
    Size,
}

impl EntryDifference {
    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Set of [`EntryDifference`] kinds recorded for an entry.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DiffFlags(u32);

impl DiffFlags {
    /// Records `difference` in the set.
    pub fn set(&mut self, difference: EntryDifference) {
        self.0 |= difference.bit();
    }

    /// Reports whether `difference` is recorded.
    #[must_use]
    pub const fn contains(self, difference: EntryDifference) -> bool {
        self.0 & difference.bit() != 0
    }

    /// Reports whether no difference is recorded.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Snapshot of one side of an entry.
#[derive(Clone, Debug)]
pub struct FileInfo {
    file_type: FileType,
    stat: Option<FileStat>,
    symlink_target: Option<String>,
}

impl FileInfo {
    /// Builds a snapshot for an existing side.
    #[must_use]
    pub fn new(
        file_type: FileType,
        stat: Option<FileStat>,
        symlink_target: Option<String>,
    ) -> Self {
        Self {
            file_type,
            stat,
            symlink_target,
        }
    }

    /// Builds the snapshot for a side on which the entry does not exist.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            file_type: FileType::None,
            stat: None,
            symlink_target: None,
        }
    }

    /// Returns the side's file type; [`FileType::None`] when absent.
    #[must_use]
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Returns the stat snapshot, when one could be taken.
    #[must_use]
    pub fn stat(&self) -> Option<&FileStat> {
        self.stat.as_ref()
    }

    /// Returns the symlink target, for symlink entries whose target was
    /// readable.
    #[must_use]
    pub fn symlink_target(&self) -> Option<&str> {
        self.symlink_target.as_deref()
    }

    /// Reports whether the entry exists on this side.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.file_type != FileType::None
    }
}

/// The per-path record flowing from the walker to a sink.
#[derive(Clone, Debug)]
pub struct ReportEntry {
    rel_path: String,
    sides: [FileInfo; 2],
    flags: DiffFlags,
}

impl ReportEntry {
    /// Builds an entry whose sides have different types (one possibly
    /// absent). [`EntryDifference::EntryType`] is recorded immediately.
    #[must_use]
    pub fn with_type_mismatch(rel_path: String, left: FileInfo, right: FileInfo) -> Self {
        let mut entry = Self {
            rel_path,
            sides: [left, right],
            flags: DiffFlags::default(),
        };
        entry.record(EntryDifference::EntryType);
        entry
    }

    /// Builds an entry whose sides share a type; no difference is recorded
    /// yet.
    #[must_use]
    pub fn with_matching_type(rel_path: String, left: FileInfo, right: FileInfo) -> Self {
        Self {
            rel_path,
            sides: [left, right],
            flags: DiffFlags::default(),
        }
    }

    /// Returns the relative path of the entry.
    #[must_use]
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    /// Returns the snapshot for `side`.
    #[must_use]
    pub fn side(&self, side: Side) -> &FileInfo {
        &self.sides[side.index()]
    }

    /// Records `difference` for the entry.
    pub fn record(&mut self, difference: EntryDifference) {
        self.flags.set(difference);
    }

    /// Reports whether `difference` is recorded.
    #[must_use]
    pub fn has(&self, difference: EntryDifference) -> bool {
        self.flags.contains(difference)
    }

    /// Reports whether any difference is recorded.
    #[must_use]
    pub fn is_different(&self) -> bool {
        !self.flags.is_empty()
    }
}
