//! Lambda layer zip construction
//!
//! Lambda extracts layers into `/opt`, and each runtime only looks at one
//! directory there: `/opt/python` for Python and `/opt/nodejs/node_modules`
//! for Node.js. Every entry in the archive is therefore rooted at
//! [`Runtime::layer_prefix`], and the finished zip is read back to check it.

use crate::core::error::{LayergenError, Result};
use crate::core::types::{LayerName, Runtime};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Largest zip the Lambda API accepts as a direct upload
pub const DIRECT_UPLOAD_LIMIT: u64 = 50 * 1024 * 1024;

/// A finished layer archive on disk
#[derive(Debug, Clone)]
pub struct ArchivedLayer {
    pub path: PathBuf,
    /// Size of the zip file in bytes
    pub size_bytes: u64,
    /// Number of regular files stored
    pub file_count: usize,
}

enum Entry {
    Directory { name: String },
    File { name: String, source: PathBuf, mode: u32 },
}

/// Zip the runtime's layer directory under `staging` into
/// `<staging>/<name>.zip`
pub fn build_archive(staging: &Path, runtime: Runtime, name: &LayerName) -> Result<ArchivedLayer> {
    let layer_root = staging.join(runtime.layer_prefix().trim_end_matches('/'));
    let entries = collect_entries(staging, &layer_root, runtime)?;

    let file_count = entries
        .iter()
        .filter(|e| matches!(e, Entry::File { .. }))
        .count();
    if file_count == 0 {
        return Err(LayergenError::EmptyLayer {
            layer_root: runtime.layer_prefix().to_string(),
        });
    }

    let zip_path = staging.join(format!("{}.zip", name));
    write_zip(&zip_path, &entries)?;

    let size_bytes = std::fs::metadata(&zip_path)
        .map_err(io_failure(&zip_path))?
        .len();
    verify_layout(&zip_path, runtime)?;

    if size_bytes > DIRECT_UPLOAD_LIMIT {
        warn!(
            size_bytes,
            limit = DIRECT_UPLOAD_LIMIT,
            "archive exceeds the direct upload limit, publishing will likely be rejected"
        );
    }
    info!(path = %zip_path.display(), file_count, size_bytes, "archive written");

    Ok(ArchivedLayer {
        path: zip_path,
        size_bytes,
        file_count,
    })
}

/// Names of all entries in a zip, in archive order
pub fn list_entries(zip_path: &Path) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(File::open(zip_path).map_err(io_failure(zip_path))?)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    Ok(names)
}

/// Check that every entry lives under the runtime's layer prefix
pub fn verify_layout(zip_path: &Path, runtime: Runtime) -> Result<()> {
    let prefix = runtime.layer_prefix();
    match list_entries(zip_path)?
        .into_iter()
        .find(|name| !name.starts_with(prefix))
    {
        Some(stray) => Err(LayergenError::packaging(format!(
            "archive entry '{}' is outside {}",
            stray, prefix
        ))),
        None => Ok(()),
    }
}

fn collect_entries(staging: &Path, layer_root: &Path, runtime: Runtime) -> Result<Vec<Entry>> {
    if !layer_root.is_dir() {
        return Err(LayergenError::EmptyLayer {
            layer_root: runtime.layer_prefix().to_string(),
        });
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(layer_root).sort_by_file_name() {
        let entry = entry?;
        let name = archive_name(staging, entry.path())?;

        // Follow symlinks to their target, npm links executables into .bin
        let metadata = std::fs::metadata(entry.path()).map_err(io_failure(entry.path()))?;
        if metadata.is_dir() {
            if entry.path_is_symlink() {
                debug!(path = %entry.path().display(), "skipping directory symlink");
                continue;
            }
            entries.push(Entry::Directory {
                name: format!("{}/", name),
            });
        } else if metadata.is_file() {
            entries.push(Entry::File {
                name,
                source: entry.path().to_path_buf(),
                mode: file_mode(&metadata),
            });
        }
    }

    Ok(entries)
}

fn write_zip(zip_path: &Path, entries: &[Entry]) -> Result<()> {
    let file = File::create(zip_path).map_err(io_failure(zip_path))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let mut buffer = Vec::new();

    for entry in entries {
        match entry {
            Entry::Directory { name } => {
                let options = FileOptions::default()
                    .compression_method(CompressionMethod::Stored)
                    .unix_permissions(0o755);
                zip.add_directory(name.as_str(), options)?;
            },
            Entry::File { name, source, mode } => {
                buffer.clear();
                File::open(source)
                    .and_then(|mut f| f.read_to_end(&mut buffer))
                    .map_err(io_failure(source))?;

                let options = FileOptions::default()
                    .compression_method(CompressionMethod::Deflated)
                    .unix_permissions(*mode)
                    .large_file(buffer.len() as u64 > u32::MAX as u64);
                zip.start_file(name.as_str(), options)?;
                zip.write_all(&buffer).map_err(io_failure(zip_path))?;
            },
        }
    }

    zip.finish()?.flush().map_err(io_failure(zip_path))?;
    Ok(())
}

/// Report an I/O failure on `path` as a packaging error
fn io_failure(path: &Path) -> impl FnOnce(std::io::Error) -> LayergenError + '_ {
    move |e| LayergenError::packaging(format!("{}: {}", path.display(), e))
}

/// Relative path from staging, with forward slashes as zip requires
fn archive_name(staging: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(staging).map_err(|_| {
        LayergenError::packaging(format!(
            "{} is not inside the staging directory",
            path.display()
        ))
    })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(unix)]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn file_mode(_metadata: &std::fs::Metadata) -> u32 {
    0o644
}
