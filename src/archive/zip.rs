//! ZIP packaging of an export bundle.
//!
//! The staging tree is walked in sorted order so that two runs over the same
//! tree produce archives with the same entry order. Every entry sits under a
//! single top-level folder.

use crate::error::{Error, Result};

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const COMPRESSION_LEVEL: i32 = 9;

/// The archive written by [`package_bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInfo {
    pub path: PathBuf,
    /// Archive size in bytes.
    pub size: u64,
}

/// Archive member name: `/`-separated regardless of platform.
fn member_name(folder: &str, relative: &Path) -> String {
    let mut name = folder.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

fn write_archive(staging: &Path, archive_path: &Path, folder: &str) -> Result<u64> {
    if !staging.is_dir() {
        return Err(Error::Archive {
            message: format!("staging directory {} does not exist", staging.display()),
            cause: None,
        });
    }

    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    zip.add_directory(format!("{}/", folder), options)?;
    for entry in WalkDir::new(staging).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(staging)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let name = member_name(folder, relative);
        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
        } else {
            debug!(entry = %name, "Adding archive entry");
            zip.start_file(name, options)?;
            let data = fs::read(entry.path())?;
            zip.write_all(&data)?;
        }
    }
    zip.finish()?;

    Ok(fs::metadata(archive_path)?.len())
}

/// Archive `staging` into `archive_path` with every entry under `folder/`.
///
/// The staging directory is removed afterwards whether or not archiving
/// succeeded; an archiving error is returned after that cleanup.
pub fn package_bundle(staging: &Path, archive_path: &Path, folder: &str) -> Result<ArchiveInfo> {
    let written = write_archive(staging, archive_path, folder);

    if let Err(e) = fs::remove_dir_all(staging) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %staging.display(), error = %e, "Could not remove staging directory");
        }
    }

    match written {
        Ok(size) => {
            info!(path = %archive_path.display(), size, "Archive written");
            Ok(ArchiveInfo {
                path: archive_path.to_path_buf(),
                size,
            })
        }
        Err(e) => {
            // A partial archive is worse than none.
            let _ = fs::remove_file(archive_path);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_name_uses_forward_slashes() {
        let relative = Path::new("posts").join("markdown").join("a.md");
        assert_eq!(member_name("bundle", &relative), "bundle/posts/markdown/a.md");
    }

    #[test]
    fn test_missing_staging_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = package_bundle(
            &dir.path().join("missing"),
            &dir.path().join("out.zip"),
            "bundle",
        );
        assert!(matches!(result, Err(Error::Archive { .. })));
        assert!(!dir.path().join("out.zip").exists());
    }

    #[test]
    fn test_entries_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        fs::create_dir_all(staging.join("b")).unwrap();
        fs::write(staging.join("b").join("z.txt"), "z").unwrap();
        fs::write(staging.join("a.txt"), "a").unwrap();
        let target = dir.path().join("r.zip");

        package_bundle(&staging, &target, "r").unwrap();

        let mut archive = ::zip::ZipArchive::new(File::open(&target).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["r/", "r/a.txt", "r/b/", "r/b/z.txt"]);
    }
}
