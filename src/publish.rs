//! Static asset publishing.
//!
//! Mirrors a source tree (`static/`) into the output directory (`public/`),
//! preserving relative paths and permission bits. The whole tree is copied on
//! every run; there is no diffing against what is already there, so repeated
//! runs over the same input leave the same output. Read-only files and
//! directories left by a previous run are replaced, not written through.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("could not walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
    #[error("could not copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Recursively copy `src` into `dst`, creating directories as needed.
///
/// Returns the number of files copied. The first failure aborts the copy.
pub fn copy_static_assets(src: &Path, dst: &Path) -> Result<usize, PublishError> {
    let mut copied = 0;
    let mut dirs = Vec::new();

    for entry in WalkDir::new(src).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| PublishError::Walk {
            path: src.to_owned(),
            source,
        })?;
        // WalkDir yields paths rooted at `src`, so this cannot fail.
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        let io_err = |source| PublishError::Copy {
            from: entry.path().to_owned(),
            to: target.clone(),
            source,
        };

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_err)?;
            make_writable(&target).map_err(io_err)?;
            let metadata = entry.metadata().map_err(|source| PublishError::Walk {
                path: entry.path().to_owned(),
                source,
            })?;
            dirs.push((entry.path().to_owned(), target.clone(), metadata.permissions()));
        } else {
            // fs::copy carries the permission bits over, so the previous copy
            // may be read-only. Unlink it instead of opening it for writing.
            remove_if_present(&target).map_err(io_err)?;
            fs::copy(entry.path(), &target).map_err(io_err)?;
            copied += 1;
        }
    }

    // Directory modes go on last, deepest first, so a read-only source
    // directory does not block copying its own contents.
    for (from, to, permissions) in dirs.into_iter().rev() {
        fs::set_permissions(&to, permissions).map_err(|source| PublishError::Copy {
            from,
            to: to.clone(),
            source,
        })?;
    }

    Ok(copied)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        result => result,
    }
}

/// Give the owner write access to a directory mirrored read-only last run.
fn make_writable(dir: &Path) -> io::Result<()> {
    let mut permissions = fs::metadata(dir)?.permissions();
    if !permissions.readonly() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    fs::set_permissions(dir, permissions)
}
