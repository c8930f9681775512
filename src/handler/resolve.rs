//! Request path resolution
//!
//! Maps a URL path onto the filesystem under the served root. The path is
//! percent-decoded and cleaned lexically first (`.` dropped, `..` pops a
//! segment and stops at the root), so the joined path cannot climb out of the
//! root. Existing targets are then canonicalized and checked against the
//! canonical root, which also stops symlinks that point outside it.

use crate::error::ResolveError;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// What a request path points at
#[derive(Debug)]
pub enum Target {
    File { path: PathBuf, metadata: Metadata },
    Directory(PathBuf),
}

/// Decode and clean a URL path into a path relative to the served root
///
/// # Examples
/// ```
/// use dirlist::handler::clean_request_path;
/// use std::path::PathBuf;
///
/// assert_eq!(clean_request_path("/a/./b/../c%20d").unwrap(), PathBuf::from("a/c d"));
/// assert_eq!(clean_request_path("/../../etc/passwd").unwrap(), PathBuf::from("etc/passwd"));
/// ```
pub fn clean_request_path(raw: &str) -> Result<PathBuf, ResolveError> {
    let decoded = urlencoding::decode(raw).map_err(|_| ResolveError::BadPath(raw.to_string()))?;
    if decoded.contains('\0') {
        return Err(ResolveError::BadPath(raw.to_string()));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => {
                // Reject anything the platform would not treat as a plain name
                let mut components = Path::new(other).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(other),
                    _ => return Err(ResolveError::BadPath(raw.to_string())),
                }
            }
        }
    }

    Ok(segments.iter().collect())
}

/// Resolve `raw` under `root` and stat it
pub async fn resolve(
    root: &Path,
    canonical_root: &Path,
    raw: &str,
) -> Result<Target, ResolveError> {
    let path = root.join(clean_request_path(raw)?);

    let metadata = match fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if is_not_found(&e) => return Err(ResolveError::NotFound(path)),
        Err(source) => return Err(ResolveError::Stat { path, source }),
    };

    let canonical = match fs::canonicalize(&path).await {
        Ok(c) => c,
        Err(source) => return Err(ResolveError::Stat { path, source }),
    };
    if !canonical.starts_with(canonical_root) {
        return Err(ResolveError::Outside(canonical));
    }

    if metadata.is_dir() {
        Ok(Target::Directory(path))
    } else if metadata.is_file() {
        Ok(Target::File { path, metadata })
    } else {
        // FIFOs, sockets and devices are never served; opening a FIFO blocks
        Err(ResolveError::NotFound(path))
    }
}

/// `a.txt/b` fails with ENOTDIR; for a client that is the same as missing
fn is_not_found(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    #[test]
    fn test_clean_request_path() {
        assert_eq!(clean_request_path("/").unwrap(), PathBuf::new());
        assert_eq!(clean_request_path("").unwrap(), PathBuf::new());
        assert_eq!(clean_request_path("//a//b/").unwrap(), PathBuf::from("a/b"));
        assert_eq!(clean_request_path("/a/../..").unwrap(), PathBuf::new());
        assert_eq!(
            clean_request_path("/%2e%2e/%2e%2e/secret").unwrap(),
            PathBuf::from("secret")
        );
        assert_eq!(
            clean_request_path("/a/..%2f..%2fb").unwrap(),
            PathBuf::from("b")
        );
    }

    #[test]
    fn test_clean_rejects_bad_input() {
        assert!(matches!(
            clean_request_path("/%ff%fe"),
            Err(ResolveError::BadPath(_))
        ));
        assert!(matches!(
            clean_request_path("/a%00b"),
            Err(ResolveError::BadPath(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_kinds() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("a.txt"), "hi").unwrap();
        stdfs::create_dir(dir.path().join("b")).unwrap();
        let canonical = dir.path().canonicalize().unwrap();

        match resolve(dir.path(), &canonical, "/a.txt").await.unwrap() {
            Target::File { path, metadata } => {
                assert_eq!(path, dir.path().join("a.txt"));
                assert_eq!(metadata.len(), 2);
            }
            other => panic!("Expected file, got {other:?}"),
        }
        assert!(matches!(
            resolve(dir.path(), &canonical, "/b/").await.unwrap(),
            Target::Directory(_)
        ));
        assert!(matches!(
            resolve(dir.path(), &canonical, "/").await.unwrap(),
            Target::Directory(_)
        ));
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let dir = tempfile::tempdir().unwrap();
        stdfs::write(dir.path().join("a.txt"), "hi").unwrap();
        let canonical = dir.path().canonicalize().unwrap();

        let err = resolve(dir.path(), &canonical, "/nope").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
        let err = resolve(dir.path(), &canonical, "/a.txt/child").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_dotdot_is_clamped_to_root() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("served");
        stdfs::create_dir(&root).unwrap();
        stdfs::write(parent.path().join("outside.txt"), "secret").unwrap();
        stdfs::write(root.join("inside.txt"), "ok").unwrap();
        let canonical = root.canonicalize().unwrap();

        let err = resolve(&root, &canonical, "/../outside.txt").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
        assert!(matches!(
            resolve(&root, &canonical, "/../inside.txt").await.unwrap(),
            Target::File { .. }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_refused() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("served");
        stdfs::create_dir(&root).unwrap();
        stdfs::write(parent.path().join("outside.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(parent.path().join("outside.txt"), root.join("link")).unwrap();
        let canonical = root.canonicalize().unwrap();

        let err = resolve(&root, &canonical, "/link").await.unwrap_err();
        assert!(matches!(err, ResolveError::Outside(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fifo_is_not_served() {
        let dir = tempfile::tempdir().unwrap();
        let status = std::process::Command::new("mkfifo")
            .arg(dir.path().join("pipe"))
            .status()
            .unwrap();
        assert!(status.success());
        let canonical = dir.path().canonicalize().unwrap();

        let err = resolve(dir.path(), &canonical, "/pipe").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_overlong_name_is_stat_error() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().canonicalize().unwrap();
        let raw = format!("/{}", "n".repeat(300));

        let err = resolve(dir.path(), &canonical, &raw).await.unwrap_err();
        assert!(matches!(err, ResolveError::Stat { .. }), "{err:?}");
        assert_eq!(err.status(), hyper::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
