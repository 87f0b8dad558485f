use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::assets::decode::lowercase_extension;
use crate::foundation::error::{PromoError, PromoResult};

/// Source of randomness for asset picks and output-name suffixes.
///
/// Injected so tests can pin every choice.
pub trait Selector {
    /// Index in `0..len`; `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
    /// Integer in `lo..=hi`.
    fn pick_in_range(&mut self, lo: u32, hi: u32) -> u32;
}

/// Uniform selection backed by [`StdRng`].
#[derive(Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Selector for RandomSelector {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn pick_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        self.rng.gen_range(lo..=hi)
    }
}

/// Deterministic selector: always the same index (clamped) and the same number (clamped).
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedSelector {
    pub index: usize,
    pub number: u32,
}

impl Selector for FixedSelector {
    fn pick_index(&mut self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }

    fn pick_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        self.number.clamp(lo, hi)
    }
}

/// Files in `dir` (non-recursive) whose extension is in `extensions`, sorted by name.
pub fn list_by_extension(dir: &Path, extensions: &[&str]) -> PromoResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PromoError::source_not_found(format!(
            "asset directory '{}'",
            dir.display()
        )));
    }
    let mut out = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("read entry in '{}'", dir.display()))?
            .path();
        if !path.is_file() {
            continue;
        }
        if lowercase_extension(&path).is_some_and(|e| extensions.contains(&e.as_str())) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Pick one matching file from `dir`.
pub fn pick_from_dir(
    dir: &Path,
    extensions: &[&str],
    selector: &mut dyn Selector,
) -> PromoResult<PathBuf> {
    let mut files = list_by_extension(dir, extensions)?;
    if files.is_empty() {
        return Err(PromoError::source_not_found(format!(
            "no {} files in '{}'",
            extensions.join("/"),
            dir.display()
        )));
    }
    let i = selector.pick_index(files.len());
    Ok(files.swap_remove(i))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/pool.rs"]
mod tests;
