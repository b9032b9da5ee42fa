use crate::classifier::{FileCategory, FileRecord};
use crate::progress::ProgressReporter;
use ahash::AHashMap;
use dashmap::DashMap;
use rayon::prelude::*;
use std::fs::File;
use std::hash::Hasher as _;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::warn;
use twox_hash::XxHash64;

/// Hex-encoded 256-bit BLAKE3 digest. Equal fingerprints mean exact
/// duplicates, across container formats.
pub type Fingerprint = String;

const BLOCK_SIZE: usize = 64 * 1024;
const PARTIAL_HASH_LENGTH: usize = 1024; // 1KB

#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    pub fingerprint: Fingerprint,
    /// Lexicographically sorted, length ≥ 2.
    pub members: Vec<PathBuf>,
}

/// Semantic hash: digest of the normalized text, independent of the
/// container the text came out of. A `.pdf` and a `.docx` with identical
/// prose collapse to one fingerprint.
pub fn semantic_fingerprint(normalized_text: &str) -> Fingerprint {
    blake3::hash(normalized_text.as_bytes()).to_hex().to_string()
}

/// Raw-byte hash, streamed in fixed-size blocks so memory stays bounded
/// regardless of file size.
pub fn binary_fingerprint(path: &Path) -> io::Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; BLOCK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

fn partial_hash(path: &Path) -> io::Result<u64> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0u8; PARTIAL_HASH_LENGTH];
    let bytes_read = file.read(&mut buffer)?;
    buffer.truncate(bytes_read);

    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&buffer);
    Ok(hasher.finish())
}

/// Fingerprint the given records and group equal fingerprints.
///
/// Text-eligible records hash their normalized text directly (no further
/// IO). Binary records go through a two-tier pyramid: bucket by file size,
/// prefilter by a 1KB partial hash, and only partial-hash collisions get a
/// full streamed digest — byte-identical files always share size and
/// prefix, so the observable groups are unchanged while unique files are
/// never fully read.
///
/// Returns the groups (≥ 2 members each) and the count of files dropped by
/// read failures.
pub fn build_fingerprint_groups(
    records: &[&FileRecord],
    cancel: &AtomicBool,
    reporter: &dyn ProgressReporter,
) -> (Vec<DuplicateGroup>, usize) {
    let map: DashMap<Fingerprint, Vec<PathBuf>> = DashMap::new();
    let read_failures = AtomicUsize::new(0);
    let done = AtomicUsize::new(0);
    let total = records.len();

    let tick = |count: usize| {
        let n = done.fetch_add(count, Ordering::Relaxed) + count;
        reporter.on_hash_progress(n, total);
    };

    let (text_records, binary_records): (Vec<&FileRecord>, Vec<&FileRecord>) = records
        .iter()
        .copied()
        .partition(|record| record.category == FileCategory::TextEligible);

    text_records.par_iter().for_each(|record| {
        if cancel.load(Ordering::Relaxed) {
            return;
        }
        if let Some(text) = &record.normalized_text {
            map.entry(semantic_fingerprint(text))
                .or_default()
                .push(record.path.clone());
        }
        tick(1);
    });

    let mut size_buckets: AHashMap<u64, Vec<&FileRecord>> = AHashMap::new();
    for record in binary_records {
        size_buckets.entry(record.raw_size).or_default().push(record);
    }

    let buckets: Vec<Vec<&FileRecord>> = size_buckets.into_values().collect();
    buckets.par_iter().for_each(|bucket| {
        if cancel.load(Ordering::Relaxed) {
            return;
        }
        // A file with a unique size cannot have an exact duplicate.
        if bucket.len() < 2 {
            tick(bucket.len());
            return;
        }

        let mut partial_buckets: AHashMap<u64, Vec<&FileRecord>> = AHashMap::new();
        for record in bucket.iter().copied() {
            match partial_hash(&record.path) {
                Ok(hash) => partial_buckets.entry(hash).or_default().push(record),
                Err(err) => {
                    warn!("Could not read {}: {}", record.path.display(), err);
                    read_failures.fetch_add(1, Ordering::Relaxed);
                    tick(1);
                }
            }
        }

        for group in partial_buckets.into_values() {
            if group.len() < 2 {
                tick(group.len());
                continue;
            }
            for record in group {
                match binary_fingerprint(&record.path) {
                    Ok(fingerprint) => {
                        map.entry(fingerprint).or_default().push(record.path.clone());
                    }
                    Err(err) => {
                        warn!("Could not read {}: {}", record.path.display(), err);
                        read_failures.fetch_add(1, Ordering::Relaxed);
                    }
                }
                tick(1);
            }
        }
    });

    let mut groups: Vec<DuplicateGroup> = map
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(fingerprint, mut members)| {
            members.sort();
            DuplicateGroup {
                fingerprint,
                members,
            }
        })
        .collect();
    groups.sort_by(|a, b| a.members.cmp(&b.members));

    (groups, read_failures.load(Ordering::Relaxed))
}
