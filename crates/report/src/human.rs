//! Human-readable renderings of stat fields for the detail face.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Timestamp format used for mtime display.
const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]/[month padding:zero]/[day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero]"
);

/// Renders a mode word as the familiar nine-character permission string,
/// with setuid/setgid/sticky folded into the execute columns.
pub(crate) fn permission_string(mode: u32) -> String {
    const MASKS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];

    let mut symbols = ['-'; 9];
    for (index, (mask, ch)) in MASKS.iter().enumerate() {
        if mode & mask != 0 {
            symbols[index] = *ch;
        }
    }
    if mode & 0o4000 != 0 {
        symbols[2] = if mode & 0o100 != 0 { 's' } else { 'S' };
    }
    if mode & 0o2000 != 0 {
        symbols[5] = if mode & 0o010 != 0 { 's' } else { 'S' };
    }
    if mode & 0o1000 != 0 {
        symbols[8] = if mode & 0o001 != 0 { 't' } else { 'T' };
    }
    symbols.iter().collect()
}

/// Renders a byte count, scaled to binary units when `human` is set.
pub(crate) fn size_string(size: u64, human: bool) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if !human || size < 1024 {
        return format!("{size} B");
    }

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Renders an mtime in the given offset; `?` when out of representable
/// range.
pub(crate) fn mtime_string(secs: i64, offset: UtcOffset) -> String {
    OffsetDateTime::from_unix_timestamp(secs)
        .ok()
        .and_then(|dt| dt.to_offset(offset).format(TIMESTAMP_FORMAT).ok())
        .unwrap_or_else(|| "?".to_string())
}
