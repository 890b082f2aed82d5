use rustix::fs as rfs;

/// Classification of a directory entry.
///
/// `None` denotes the absence of an entry on one side of the comparison; it
/// never appears in a listing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub enum FileType {
    /// No file exists on this side.
    None,
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Block device.
    Block,
    /// Character device.
    Character,
    /// Named pipe.
    Fifo,
    /// Symbolic link.
    Symlink,
    /// Unix domain socket.
    Socket,
    /// The filesystem did not classify the entry.
    Unknown,
}

impl FileType {
    /// Returns the one-character representation used by the report faces.
    #[must_use]
    pub const fn repr(self) -> char {
        match self {
            Self::None => '-',
            Self::Regular => 'f',
            Self::Directory => 'd',
            Self::Block => 'b',
            Self::Character => 'c',
            Self::Fifo => 'F',
            Self::Symlink => 'l',
            Self::Socket => 's',
            Self::Unknown => '?',
        }
    }

    pub(crate) fn from_raw(raw: rfs::FileType) -> Self {
        match raw {
            rfs::FileType::RegularFile => Self::Regular,
            rfs::FileType::Directory => Self::Directory,
            rfs::FileType::BlockDevice => Self::Block,
            rfs::FileType::CharacterDevice => Self::Character,
            rfs::FileType::Fifo => Self::Fifo,
            rfs::FileType::Symlink => Self::Symlink,
            rfs::FileType::Socket => Self::Socket,
            _ => Self::Unknown,
        }
    }

    pub(crate) fn from_mode(mode: u32) -> Self {
        Self::from_raw(rfs::FileType::from_raw_mode(mode))
    }
}

/// Modification time with nanosecond precision.
///
/// Two mtimes are equal only when both components are equal; a nanosecond
/// drift is enough to trigger a content comparison.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Mtime {
    /// Seconds since the Unix epoch.
    pub secs: i64,
    /// Nanosecond component.
    pub nanos: u32,
}

/// Metadata snapshot of one side of an entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileStat {
    /// File size in bytes.
    pub size: u64,
    /// Last modification time.
    pub mtime: Mtime,
    /// Full mode word: permission, setuid/setgid/sticky and type bits.
    pub mode: u32,
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
}

impl FileStat {
    pub(crate) fn from_stat(stat: &rfs::Stat) -> Self {
        Self {
            size: stat.st_size as u64,
            mtime: Mtime {
                secs: stat.st_mtime as i64,
                nanos: stat.st_mtime_nsec as u32,
            },
            mode: stat.st_mode as u32,
            uid: stat.st_uid,
            gid: stat.st_gid,
        }
    }
}

/// One entry of a directory listing: a name and the type hint that came with
/// it.
///
/// Ordering is derived field-wise, so entries sort byte-wise by name first;
/// this is the order the walker's merge relies on.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct DirEntry {
    /// File name, without any directory component.
    pub name: String,
    /// Type reported by the listing, resolved from a fallback stat when the
    /// filesystem leaves `d_type` unset.
    pub file_type: FileType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repr_covers_every_type() {
        let reprs: Vec<char> = [
            FileType::None,
            FileType::Regular,
            FileType::Directory,
            FileType::Block,
            FileType::Character,
            FileType::Fifo,
            FileType::Symlink,
            FileType::Socket,
            FileType::Unknown,
        ]
        .iter()
        .map(|t| t.repr())
        .collect();
        assert_eq!(reprs, vec!['-', 'f', 'd', 'b', 'c', 'F', 'l', 's', '?']);
    }

    #[test]
    fn entries_sort_bytewise_by_name() {
        let mut entries = vec![
            DirEntry {
                name: "b".into(),
                file_type: FileType::Regular,
            },
            DirEntry {
                name: "A".into(),
                file_type: FileType::Directory,
            },
            DirEntry {
                name: "a".into(),
                file_type: FileType::Regular,
            },
        ];
        entries.sort();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "a", "b"]);
    }

    #[test]
    fn mtime_differs_on_nanoseconds() {
        let a = Mtime { secs: 7, nanos: 0 };
        let b = Mtime { secs: 7, nanos: 1 };
        assert_ne!(a, b);
    }
}
