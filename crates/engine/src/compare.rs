use std::io::Read;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::Context;

/// Streamed byte-for-byte comparison of a regular file present on both
/// sides.
///
/// The two buffers are allocated once, sized by the run settings, and reused
/// for every file the instance compares. Any open or read failure counts as
/// a difference: a file that cannot be compared is not known to be equal.
#[derive(Debug)]
pub struct FileCompare {
    ctx: Arc<Context>,
    buf_left: Vec<u8>,
    buf_right: Vec<u8>,
}

impl FileCompare {
    /// Creates a comparator with buffers sized from the context settings.
    #[must_use]
    pub fn new(ctx: Arc<Context>) -> Self {
        let size = ctx.settings.content_buffer_size;
        Self {
            ctx,
            buf_left: vec![0; size],
            buf_right: vec![0; size],
        }
    }

    /// Compares the declared `file_size` bytes of `rel_path` on both sides.
    ///
    /// Returns `true` only when every byte matches. Each round reads up to
    /// one buffer from the left, then exactly that many bytes from the
    /// right; a short or failed read on either side is a difference.
    pub fn equal_content(&mut self, rel_path: &str, file_size: u64) -> bool {
        let mut left = match self.ctx.roots[0].open_file(rel_path) {
            Ok(file) => file,
            Err(error) => {
                warn!(path = rel_path, %error, "cannot open left side");
                return false;
            }
        };
        let mut right = match self.ctx.roots[1].open_file(rel_path) {
            Ok(file) => file,
            Err(error) => {
                warn!(path = rel_path, %error, "cannot open right side");
                return false;
            }
        };

        let mut remaining = file_size;
        while remaining > 0 {
            let read_left = match left.read(&mut self.buf_left) {
                Ok(0) => {
                    debug!(path = rel_path, "left side shorter than declared size");
                    return false;
                }
                Ok(n) => n,
                Err(error) => {
                    warn!(path = rel_path, %error, "read failed on left side");
                    return false;
                }
            };
            let read_right = match right.read(&mut self.buf_right[..read_left]) {
                Ok(n) => n,
                Err(error) => {
                    warn!(path = rel_path, %error, "read failed on right side");
                    return false;
                }
            };
            if read_right != read_left {
                return false;
            }
            if self.buf_left[..read_left] != self.buf_right[..read_left] {
                return false;
            }
            remaining = remaining.saturating_sub(read_left as u64);
        }
        true
    }
}
