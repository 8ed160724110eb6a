use crate::util::{ensure_dir, hash_file};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Entry options shared by every zip we write. The timestamp is pinned so the
/// same inputs always produce the same bytes.
pub fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

pub fn write_entries<'a, W, I>(sink: W, entries: I) -> Result<W>
where
    W: Write + Seek,
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut zip = ZipWriter::new(sink);
    for (name, bytes) in entries {
        zip.start_file(name, entry_options())
            .with_context(|| format!("start zip entry {name}"))?;
        zip.write_all(bytes)
            .with_context(|| format!("write zip entry {name}"))?;
    }
    let sink = zip.finish().with_context(|| "finish zip")?;
    Ok(sink)
}

/// Per-run working directory, removed when the guard goes out of scope.
///
/// A directory left over from a crashed run is cleared on acquisition.
#[derive(Debug)]
pub struct WorkingDir {
    path: PathBuf,
    removed: bool,
}

impl WorkingDir {
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            warn!("clearing stale working directory {}", path.display());
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("remove stale {}", path.display()))?;
        }
        ensure_dir(&path)?;
        debug!("working directory {}", path.display());
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now, reporting failure instead of only logging it.
    pub fn close(mut self) -> Result<()> {
        self.removed = true;
        std::fs::remove_dir_all(&self.path)
            .with_context(|| format!("remove working directory {}", self.path.display()))
    }
}

impl Drop for WorkingDir {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            warn!("failed to remove {}: {e}", self.path.display());
        }
    }
}

/// A finished archive: its entry names and SHA-256 digest.
#[derive(Debug, Clone)]
pub struct Packaged {
    pub entries: Vec<String>,
    pub sha256: String,
}

/// Zip every regular file in `dir` (sorted by name, flat) into `dest`.
///
/// The archive is built and hashed next to `dest` as `<dest>.part`, then
/// renamed into place, so a failure never leaves a partial archive behind.
pub fn package_dir(dir: &Path, dest: &Path) -> Result<Packaged> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read_dir {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut names = Vec::with_capacity(files.len());
    let mut contents = Vec::with_capacity(files.len());
    for path in &files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("non UTF-8 file name: {}", path.display()))?
            .to_string();
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        names.push(name);
        contents.push(bytes);
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    let written = File::create(&part)
        .with_context(|| format!("create {}", part.display()))
        .and_then(|file| {
            let entries = names
                .iter()
                .map(String::as_str)
                .zip(contents.iter().map(Vec::as_slice));
            write_entries(file, entries)
        })
        .and_then(|file| file.sync_all().with_context(|| "sync archive"))
        .and_then(|()| hash_file(&part))
        .and_then(|sha256| {
            std::fs::rename(&part, dest)
                .with_context(|| format!("rename {} -> {}", part.display(), dest.display()))?;
            Ok(sha256)
        });

    let sha256 = match written {
        Ok(sha256) => sha256,
        Err(e) => {
            let _ = std::fs::remove_file(&part);
            return Err(e);
        }
    };

    Ok(Packaged {
        entries: names,
        sha256,
    })
}
