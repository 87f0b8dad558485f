use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{PromoError, PromoResult};

/// Render count persisted as a single decimal integer in one file.
///
/// Increments hold an exclusive lock on the file for the whole read-modify-write, so
/// concurrent processes never lose an update.
#[derive(Clone, Debug)]
pub struct RenderCounter {
    path: PathBuf,
}

impl RenderCounter {
    /// Create the parent directory and a `0` file when missing.
    pub fn open(path: impl Into<PathBuf>) -> PromoResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create counter directory '{}'", parent.display()))?;
        }
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut f) => {
                f.lock()
                    .with_context(|| format!("lock counter '{}'", path.display()))?;
                // An increment may have slipped in between creation and locking.
                let len = f
                    .metadata()
                    .with_context(|| format!("stat counter '{}'", path.display()))?
                    .len();
                if len == 0 {
                    f.write_all(b"0")
                        .with_context(|| format!("initialize counter '{}'", path.display()))?;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("create counter '{}'", path.display()))
                    .into());
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> PromoResult<u64> {
        let mut f = File::open(&self.path)
            .with_context(|| format!("open counter '{}'", self.path.display()))?;
        f.lock_shared()
            .with_context(|| format!("lock counter '{}'", self.path.display()))?;
        read_count(&mut f, &self.path)
    }

    /// Add one and return the new value.
    pub fn increment(&self) -> PromoResult<u64> {
        let mut f = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .with_context(|| format!("open counter '{}'", self.path.display()))?;
        f.lock()
            .with_context(|| format!("lock counter '{}'", self.path.display()))?;

        let next = read_count(&mut f, &self.path)?
            .checked_add(1)
            .ok_or_else(|| PromoError::corrupt_source("render counter overflow"))?;

        f.seek(SeekFrom::Start(0)).context("rewind counter")?;
        f.set_len(0).context("truncate counter")?;
        f.write_all(next.to_string().as_bytes())
            .context("write counter")?;
        f.sync_all().context("sync counter")?;
        tracing::debug!(count = next, "render counter incremented");
        Ok(next)
    }
}

fn read_count(f: &mut File, path: &Path) -> PromoResult<u64> {
    let mut s = String::new();
    f.read_to_string(&mut s)
        .with_context(|| format!("read counter '{}'", path.display()))?;
    // A file another process has created but not yet initialized counts as zero.
    if s.trim().is_empty() {
        return Ok(0);
    }
    s.trim().parse::<u64>().map_err(|_| {
        PromoError::corrupt_source(format!(
            "counter '{}' does not hold a non-negative integer: {:?}",
            path.display(),
            s.trim()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/service/counter.rs"]
mod tests;
