//! Fixture helpers for the end-to-end binary tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};

/// Temporary directory with relative-path file fixtures.
pub struct TestDir {
    dir: tempfile::TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create test dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn arg(&self) -> &str {
        self.path().to_str().expect("utf-8 temp path")
    }

    pub fn write_file(&self, rel: &str, bytes: &[u8]) -> &Self {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, bytes).expect("write fixture file");
        self
    }

    pub fn mkdir(&self, rel: &str) -> &Self {
        fs::create_dir_all(self.path().join(rel)).expect("create fixture dir");
        self
    }

    #[cfg(unix)]
    pub fn symlink(&self, target: &str, rel: &str) -> &Self {
        std::os::unix::fs::symlink(target, self.path().join(rel)).expect("create symlink");
        self
    }

    #[cfg(unix)]
    pub fn chmod(&self, rel: &str, mode: u32) -> &Self {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(self.path().join(rel), fs::Permissions::from_mode(mode))
            .expect("set permissions");
        self
    }

    /// Pins the mtime of `rel` to a fixed offset from the epoch.
    pub fn set_mtime(&self, rel: &str, secs: u64) -> &Self {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        fs::File::options()
            .write(true)
            .open(self.path().join(rel))
            .expect("open fixture file")
            .set_modified(time)
            .expect("set mtime");
        self
    }
}

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_diffdir"))
}

/// Runs the diffdir binary with `args` and returns the raw output.
pub fn run_diffdir(args: &[&str]) -> Output {
    Command::new(binary())
        .args(args)
        .output()
        .expect("run diffdir binary")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout utf-8")
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("stderr utf-8")
}
