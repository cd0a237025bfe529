use crate::constants::{LIST_GROUP, LIST_LINK_COUNT, LIST_OWNER};
use chrono::{DateTime, Utc};
use filetime::FileTime;
use std::fs::Metadata;

/// Last modification time of a file, in UTC.
pub fn modification_time(metadata: &Metadata) -> DateTime<Utc> {
    let mtime = FileTime::from_last_modification_time(metadata);
    DateTime::from_timestamp(mtime.unix_seconds(), mtime.nanoseconds()).unwrap_or_default()
}

/// Formats a type character and mode bits the way `ls -l` does (e.g. `drwxr-xr-x`).
pub fn permission_string(file_type: char, mode: u32) -> String {
    let mut perms = String::with_capacity(10);
    perms.push(file_type);

    for (bit, flag) in [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ] {
        perms.push(if mode & bit != 0 { flag } else { '-' });
    }

    perms
}

pub fn format_unix_permissions(metadata: &Metadata) -> String {
    let file_type = if metadata.file_type().is_symlink() {
        'l'
    } else if metadata.is_dir() {
        'd'
    } else {
        '-'
    };

    #[cfg(unix)]
    let mode = {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode()
    };

    // Without POSIX modes only the read-only flag is known.
    #[cfg(not(unix))]
    let mode = match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, true) => 0o555,
        (true, false) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    };

    permission_string(file_type, mode)
}

/// One listing line: permissions, links, owner, group, size, `Mon DD HH:MM`
/// in UTC and the name, CRLF terminated.
pub fn format_list_line(metadata: &Metadata, name: &str) -> String {
    format!(
        "{} {} {} {} {} {} {}\r\n",
        format_unix_permissions(metadata),
        LIST_LINK_COUNT,
        LIST_OWNER,
        LIST_GROUP,
        metadata.len(),
        modification_time(metadata).format("%b %d %H:%M"),
        name
    )
}
