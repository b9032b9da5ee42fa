use crate::normalize;
use crate::progress::ProgressReporter;
use ahash::{AHashMap, AHashSet};
use lazy_static::lazy_static;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Two documents whose cosine similarity exceeded the threshold.
/// `path_a < path_b` lexicographically, so a pair is never reported twice.
#[derive(Debug, Clone)]
pub struct SimilarityPair {
    pub path_a: PathBuf,
    pub path_b: PathBuf,
    pub score: f64,
}

/// English stop words, stripped from the vocabulary when
/// `strip_stop_words` is enabled. Off by default: with TF-IDF weighting,
/// corpus-wide terms carry little weight already, and stripping changes
/// scores near the threshold.
const ENGLISH_STOP_WORDS: [&str; 125] = [
    "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during",
    "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "if", "in", "into", "is",
    "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

lazy_static! {
    static ref STOP_WORDS: AHashSet<&'static str> =
        ENGLISH_STOP_WORDS.iter().copied().collect();
}

/// Score every unordered document pair and keep those strictly above the
/// threshold.
///
/// Weighting is term frequency × smoothed inverse document frequency
/// (idf = ln((1+n)/(1+df)) + 1), with L2-normalized vectors, so two
/// documents with identical term distributions score exactly 1.0. The
/// vocabulary and idf table are built over the whole corpus before any
/// pair is scored; the pairwise sweep is row-parallel over contiguous
/// sparse vectors.
///
/// Fewer than two documents is a normal condition and yields an empty
/// result. A document with no terms at all (all-symbol content) has a zero
/// vector; its similarity against anything is defined as 0.0.
pub fn find_similar(
    corpus: &[(PathBuf, String)],
    threshold: f64,
    strip_stop_words: bool,
    reporter: &dyn ProgressReporter,
) -> Vec<SimilarityPair> {
    let n = corpus.len();
    if n < 2 {
        return Vec::new();
    }
    reporter.on_similarity_start(n);

    let token_lists: Vec<Vec<String>> = corpus
        .par_iter()
        .map(|(_, text)| {
            let mut terms = normalize::tokenize(text);
            if strip_stop_words {
                terms.retain(|term| !STOP_WORDS.contains(term.as_str()));
            }
            terms
        })
        .collect();

    // Vocabulary and document frequency over the full corpus. This must
    // finish before any similarity score: idf needs every document.
    let mut vocabulary: AHashMap<String, u32> = AHashMap::new();
    let mut document_frequency: Vec<u32> = Vec::new();
    let mut doc_term_counts: Vec<AHashMap<u32, u32>> = Vec::with_capacity(n);

    for tokens in &token_lists {
        let mut counts: AHashMap<u32, u32> = AHashMap::new();
        for token in tokens {
            let next_id = vocabulary.len() as u32;
            let id = *vocabulary.entry(token.clone()).or_insert(next_id);
            if id as usize == document_frequency.len() {
                document_frequency.push(0);
            }
            *counts.entry(id).or_insert(0) += 1;
        }
        for &id in counts.keys() {
            document_frequency[id as usize] += 1;
        }
        doc_term_counts.push(counts);
    }

    let corpus_size = n as f64;
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| ((1.0 + corpus_size) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    let vectors: Vec<Vec<(u32, f64)>> = doc_term_counts
        .par_iter()
        .map(|counts| {
            let mut vector: Vec<(u32, f64)> = counts
                .iter()
                .map(|(&id, &tf)| (id, tf as f64 * idf[id as usize]))
                .collect();
            vector.sort_unstable_by_key(|&(id, _)| id);
            let norm = vector.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, weight) in &mut vector {
                    *weight /= norm;
                }
            } else {
                vector.clear();
            }
            vector
        })
        .collect();

    let rows_done = AtomicUsize::new(0);
    let mut pairs: Vec<SimilarityPair> = (0..n - 1)
        .into_par_iter()
        .flat_map_iter(|i| {
            let row: Vec<SimilarityPair> = (i + 1..n)
                .filter_map(|j| {
                    let score = sparse_dot(&vectors[i], &vectors[j]).min(1.0);
                    if score > threshold {
                        let (a, b) = if corpus[i].0 <= corpus[j].0 {
                            (i, j)
                        } else {
                            (j, i)
                        };
                        Some(SimilarityPair {
                            path_a: corpus[a].0.clone(),
                            path_b: corpus[b].0.clone(),
                            score,
                        })
                    } else {
                        None
                    }
                })
                .collect();
            let done = rows_done.fetch_add(1, AtomicOrdering::Relaxed) + 1;
            reporter.on_similarity_progress(done, n - 1);
            row.into_iter()
        })
        .collect();

    // Deterministic output regardless of row parallelism.
    pairs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path_a.cmp(&b.path_a))
            .then_with(|| a.path_b.cmp(&b.path_b))
    });

    pairs
}

/// Dot product of two sparse vectors sorted by term id (merge join).
/// Both sides are L2-normalized, so this is the cosine.
fn sparse_dot(a: &[(u32, f64)], b: &[(u32, f64)]) -> f64 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    dot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;

    fn doc(path: &str, text: &str) -> (PathBuf, String) {
        (PathBuf::from(path), text.to_string())
    }

    #[test]
    fn test_identical_documents_score_one() {
        let corpus = vec![
            doc("/a.txt", "hello world hello again"),
            doc("/b.txt", "hello world hello again"),
        ];
        let pairs = find_similar(&corpus, 0.5, false, &SilentReporter);
        assert_eq!(pairs.len(), 1);
        assert!((pairs[0].score - 1.0).abs() < 1e-9);
        assert_eq!(pairs[0].path_a, PathBuf::from("/a.txt"));
        assert_eq!(pairs[0].path_b, PathBuf::from("/b.txt"));
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let forward = vec![
            doc("/a.txt", "shared words plus alpha specific terms"),
            doc("/b.txt", "shared words plus beta specific terms"),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let p1 = find_similar(&forward, 0.1, false, &SilentReporter);
        let p2 = find_similar(&reversed, 0.1, false, &SilentReporter);
        assert_eq!(p1.len(), 1);
        assert_eq!(p2.len(), 1);
        assert!((p1[0].score - p2[0].score).abs() < 1e-12);
        // Ordered pair is the same no matter the corpus order.
        assert_eq!(p1[0].path_a, p2[0].path_a);
        assert_eq!(p1[0].path_b, p2[0].path_b);
    }

    #[test]
    fn test_single_document_corpus_is_empty() {
        let corpus = vec![doc("/only.txt", "one lonely document")];
        assert!(find_similar(&corpus, 0.9, false, &SilentReporter).is_empty());
        assert!(find_similar(&[], 0.9, false, &SilentReporter).is_empty());
    }

    #[test]
    fn test_score_equal_to_threshold_is_excluded() {
        // Identical documents score exactly 1.0; with the threshold at 1.0
        // the strictly-greater comparison must exclude them.
        let corpus = vec![
            doc("/a.txt", "hello world"),
            doc("/b.txt", "hello world"),
        ];
        assert!(find_similar(&corpus, 1.0, false, &SilentReporter).is_empty());
        assert_eq!(find_similar(&corpus, 0.99, false, &SilentReporter).len(), 1);
    }

    #[test]
    fn test_mostly_shared_vocabulary_exceeds_threshold() {
        let shared: Vec<String> = (0..39).map(|i| format!("term{}", i)).collect();
        let mut a_words = shared.clone();
        a_words.push("alphaonly".to_string());
        let mut b_words = shared;
        b_words.push("betaonly".to_string());

        let corpus = vec![
            doc("/a.txt", &a_words.join(" ")),
            doc("/b.txt", &b_words.join(" ")),
        ];
        let pairs = find_similar(&corpus, 0.90, false, &SilentReporter);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].score > 0.90 && pairs[0].score < 1.0);
    }

    #[test]
    fn test_stop_word_only_overlap_stays_below_threshold() {
        // Four docs all share the same function words; each has its own
        // content vocabulary. The shared words carry minimal idf weight.
        let stop = "the and of in to";
        let corpus = vec![
            doc("/a.txt", &format!("{} apple orchard harvest cider autumn crates", stop)),
            doc("/b.txt", &format!("{} engine piston torque manifold exhaust valves", stop)),
            doc("/c.txt", &format!("{} violin sonata tempo crescendo concerto strings", stop)),
            doc("/d.txt", &format!("{} glacier moraine erosion sediment bedrock fjord", stop)),
        ];
        let pairs = find_similar(&corpus, 0.90, false, &SilentReporter);
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_zero_vector_similarity_is_zero_not_error() {
        // All-symbol content tokenizes to nothing: zero vector, score 0.0.
        let corpus = vec![
            doc("/sym1.txt", "!!! ??? *** --- ..."),
            doc("/sym2.txt", "!!! ??? *** --- ..."),
            doc("/text.txt", "ordinary prose content here"),
        ];
        let pairs = find_similar(&corpus, 0.0, false, &SilentReporter);
        // Nothing scores above 0.0: the symbol docs have zero vectors and
        // the prose doc shares no terms with them.
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_strip_stop_words_changes_scores() {
        let corpus = vec![
            doc("/a.txt", "the and of in to alpha"),
            doc("/b.txt", "the and of in to beta"),
        ];
        // Without stripping, the five shared function words dominate.
        let kept = find_similar(&corpus, 0.5, false, &SilentReporter);
        assert_eq!(kept.len(), 1);
        // With stripping only alpha/beta remain: nothing shared.
        let stripped = find_similar(&corpus, 0.5, true, &SilentReporter);
        assert!(stripped.is_empty());
    }

    #[test]
    fn test_output_sorted_by_score_then_path() {
        let corpus = vec![
            doc("/a.txt", "one two three four five"),
            doc("/b.txt", "one two three four five"),
            doc("/c.txt", "one two three four six"),
        ];
        let pairs = find_similar(&corpus, 0.1, false, &SilentReporter);
        assert_eq!(pairs.len(), 3);
        for window in pairs.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
        // The identical pair ranks first.
        assert!((pairs[0].score - 1.0).abs() < 1e-9);
    }
}
