use crate::core_error::SessionError;
use crate::core_fs::virtual_path::{join_virtual, normalize_virtual};
use log::{trace, warn};
use std::io;
use std::path::{Path, PathBuf};

/// A client path that passed the sandbox check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Normalized client-visible path, rooted at the sandbox.
    pub virtual_path: String,
    /// Canonical location on the real filesystem, always under the root.
    pub real_path: PathBuf,
}

/// Resolves `requested` against the session's `current_dir` and maps it onto
/// the real filesystem under `root`.
///
/// Every command that touches the filesystem goes through here. Traversal
/// above the virtual root is rejected before any filesystem access; symlinks
/// leading out of the root are rejected after canonicalization.
///
/// # Arguments
///
/// * `root` - The configured sandbox root.
/// * `current_dir` - The session's current virtual directory.
/// * `requested` - The path given by the client, absolute or relative.
///
/// # Returns
///
/// The resolved path, or `SessionError::AccessDenied` if it escapes the root.
pub fn resolve(
    root: &Path,
    current_dir: &str,
    requested: &str,
) -> Result<ResolvedPath, SessionError> {
    let requested = requested.replace('\\', "/");
    let virtual_path = normalize_virtual(&join_virtual(current_dir, &requested))?;

    let canonical_root = root.canonicalize().map_err(SessionError::Filesystem)?;
    let candidate = canonical_root.join(virtual_path.trim_start_matches('/'));
    let real_path =
        canonicalize_lenient(&candidate).map_err(|e| SessionError::from_fs(e, &virtual_path))?;

    if escapes_root(&canonical_root, &real_path) {
        warn!(
            "Path is outside of the allowed area: {} -> {:?}",
            virtual_path, real_path
        );
        return Err(SessionError::AccessDenied);
    }

    trace!("Resolved {} to {:?}", virtual_path, real_path);
    Ok(ResolvedPath {
        virtual_path,
        real_path,
    })
}

/// Both paths must be canonical.
fn escapes_root(canonical_root: &Path, canonical_path: &Path) -> bool {
    canonical_path.strip_prefix(canonical_root).is_err()
}

/// Canonicalizes `path`, tolerating a missing tail.
///
/// Missing components are appended to the canonical form of the deepest
/// existing ancestor, so upload targets can be checked before they exist.
/// A dangling symlink is not missing: it resolves to wherever it points, so
/// creating through it is checked against the root like any other path.
fn canonicalize_lenient(path: &Path) -> io::Result<PathBuf> {
    canonicalize_lenient_bounded(path, MAX_SYMLINK_HOPS)
}

// Matches the kernel's own limit before ELOOP.
const MAX_SYMLINK_HOPS: u32 = 40;

fn canonicalize_lenient_bounded(path: &Path, hops: u32) -> io::Result<PathBuf> {
    let not_found = match path.canonicalize() {
        Ok(canonical) => return Ok(canonical),
        Err(e) if e.kind() == io::ErrorKind::NotFound => e,
        Err(e) => return Err(e),
    };

    let (parent, name) = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => (parent, name),
        _ => return Err(not_found),
    };

    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            if hops == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    "too many levels of symbolic links",
                ));
            }
            let link = std::fs::read_link(path)?;
            // A relative link is relative to the directory holding it.
            let target = parent.join(link);
            canonicalize_lenient_bounded(&target, hops - 1)
        }
        Ok(_) => Err(not_found),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Ok(canonicalize_lenient_bounded(parent, hops)?.join(name))
        }
        Err(e) => Err(e),
    }
}
