use std::fs::File;
use std::io;
use std::os::fd::OwnedFd;
use std::path::{Path, PathBuf};

use rustix::fs::{self as rfs, AtFlags, Mode, OFlags};
use tracing::warn;

use crate::entry::{DirEntry, FileStat, FileType};

/// Capacity used for symlink-target reads when no size hint is available.
const SYMLINK_CAPACITY: usize = 256;

/// An opened directory handle anchoring one side of the comparison.
///
/// Every operation takes a path relative to this handle and resolves it with
/// the `*at` family of syscalls, so the two sides of a diff never interfere
/// with each other or with the process working directory.
#[derive(Debug)]
pub struct PathRoot {
    fd: OwnedFd,
    path: PathBuf,
}

impl PathRoot {
    /// Opens the directory at `path` as a comparison root.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when `path` does not exist or is not an
    /// openable directory.
    pub fn open<P: Into<PathBuf>>(path: P) -> io::Result<Self> {
        let path = path.into();
        let fd = rfs::open(
            &path,
            OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(io::Error::from)?;
        Ok(Self { fd, path })
    }

    /// Returns the path the root was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lists the directory at `rel`, excluding `.` and `..`, sorted ascending
    /// byte-wise by name.
    ///
    /// Failures are logged and yield an empty listing; a directory that
    /// cannot be read contributes nothing to the comparison but does not
    /// abort it.
    #[must_use]
    pub fn sorted_dir_content(&self, rel: &str) -> Vec<DirEntry> {
        match self.read_dir_sorted(rel) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(path = %self.path.join(rel).display(), %error, "failed to list directory");
                Vec::new()
            }
        }
    }

    fn read_dir_sorted(&self, rel: &str) -> io::Result<Vec<DirEntry>> {
        let dir_fd = rfs::openat(
            &self.fd,
            rel,
            OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(io::Error::from)?;

        let mut entries = Vec::new();
        for entry in rfs::Dir::read_from(&dir_fd).map_err(io::Error::from)? {
            let entry = entry.map_err(io::Error::from)?;
            let name = entry.file_name();
            if name == c"." || name == c".." {
                continue;
            }
            let mut file_type = FileType::from_raw(entry.file_type());
            if file_type == FileType::Unknown {
                // d_type is optional on some filesystems; resolve with a stat.
                if let Ok(stat) = rfs::statat(&dir_fd, name, AtFlags::SYMLINK_NOFOLLOW) {
                    file_type = FileType::from_mode(stat.st_mode as u32);
                }
            }
            entries.push(DirEntry {
                name: name.to_string_lossy().into_owned(),
                file_type,
            });
        }
        entries.sort();
        Ok(entries)
    }

    /// Stats `rel` without following a terminal symlink.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the entry cannot be statted; callers
    /// log it and treat the snapshot as absent.
    pub fn lstat(&self, rel: &str) -> io::Result<FileStat> {
        let stat = rfs::statat(&self.fd, rel, AtFlags::SYMLINK_NOFOLLOW)
            .map_err(io::Error::from)?;
        Ok(FileStat::from_stat(&stat))
    }

    /// Reads the target of the symlink at `rel`.
    ///
    /// `size_hint` is typically the link's stat size; zero selects a default
    /// capacity.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the link cannot be read.
    pub fn read_symlink(&self, rel: &str, size_hint: u64) -> io::Result<String> {
        let capacity = match size_hint {
            0 => SYMLINK_CAPACITY,
            hint => hint as usize + 1,
        };
        let target = rfs::readlinkat(&self.fd, rel, Vec::with_capacity(capacity))
            .map_err(io::Error::from)?;
        Ok(target.to_string_lossy().into_owned())
    }

    /// Opens the regular file at `rel` read-only.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the file cannot be opened.
    pub fn open_file(&self, rel: &str) -> io::Result<File> {
        let fd = rfs::openat(
            &self.fd,
            rel,
            OFlags::RDONLY | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(io::Error::from)?;
        Ok(File::from(fd))
    }
}
