use crate::core_error::SessionError;

/// Joins `add` onto the virtual directory `base`.
///
/// An absolute `add` replaces `base`. Joining onto the root avoids a doubled
/// separator.
pub fn join_virtual(base: &str, add: &str) -> String {
    if add.starts_with('/') {
        add.to_string()
    } else if base == "/" {
        format!("/{}", add)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), add)
    }
}

/// Normalizes a virtual path: backslashes become separators, empty and `.`
/// segments are dropped and `..` removes the previous segment.
///
/// A `..` that would climb above the root is a traversal attempt and is
/// rejected rather than clamped. The result always starts with `/`.
pub fn normalize_virtual(path: &str) -> Result<String, SessionError> {
    let path = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(SessionError::AccessDenied);
                }
            }
            name => segments.push(name),
        }
    }

    Ok(format!("/{}", segments.join("/")))
}

/// Returns the parent of a normalized virtual path. The root is its own parent.
pub fn parent_virtual(path: &str) -> String {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) | None => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
    }
}
