use dashmap::DashMap;
use glob::Pattern;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// A discovered file: path plus the size the walk observed.
#[derive(Debug, Clone)]
pub struct ScanFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Parallel directory traversal. Builds a map of file_size → Vec<PathBuf>,
/// filtering by glob ignore patterns. Skips symlinks; unreadable
/// directories and entries are logged and skipped so one bad subtree never
/// aborts the walk.
pub fn build_size_to_files_map(
    root_paths: &[&str],
    ignore_globs: &[&str],
) -> io::Result<DashMap<u64, Vec<PathBuf>>> {
    let map: DashMap<u64, Vec<PathBuf>> = DashMap::new();

    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    root_paths
        .par_iter()
        .try_for_each(|root_dir| visit_dirs(Path::new(root_dir), &map, &ignore_patterns))?;

    Ok(map)
}

/// Flatten the size map into a path-sorted list so downstream stages see a
/// deterministic file order regardless of walk parallelism.
pub fn flatten_sorted(map: &DashMap<u64, Vec<PathBuf>>) -> Vec<ScanFile> {
    let mut files: Vec<ScanFile> = map
        .iter()
        .flat_map(|entry| {
            let size = *entry.key();
            entry
                .value()
                .iter()
                .map(move |path| ScanFile {
                    path: path.clone(),
                    size,
                })
                .collect::<Vec<_>>()
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn visit_dirs(
    dir: &Path,
    map: &DashMap<u64, Vec<PathBuf>>,
    ignore_patterns: &[Pattern],
) -> io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    if ignore_patterns
        .iter()
        .any(|pattern| pattern.matches_path(dir))
    {
        return Ok(());
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Skipping unreadable directory {}: {}", dir.display(), err);
            return Ok(());
        }
    };

    entries.par_bridge().try_for_each(|entry_result| {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                return Ok(());
            }
        };

        let path = entry.path();
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Skipping {}: {}", path.display(), err);
                return Ok(());
            }
        };

        if metadata.file_type().is_symlink() {
            return Ok(());
        }

        if path.is_dir() {
            visit_dirs(&path, map, ignore_patterns)?;
        } else if !ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(&path))
        {
            map.entry(metadata.len()).or_default().push(path);
        }
        Ok::<_, io::Error>(())
    })?;

    Ok(())
}
