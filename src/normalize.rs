use unicode_normalization::UnicodeNormalization;

/// Canonicalize raw extracted text so container formatting never counts as
/// unique content: NFKD decomposition, lowercasing, and whitespace-run
/// collapsing. Idempotent — normalizing twice yields the same string.
pub fn normalize_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let decomposed: String = raw.nfkd().collect();
    let lowered = decomposed.to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into terms: lowercase alphanumeric runs of at
/// least two characters. Single-character runs and symbols are dropped, no
/// stemming.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            current.push(ch);
        } else if !current.is_empty() {
            if current.chars().count() >= 2 {
                terms.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    if current.chars().count() >= 2 {
        terms.push(current);
    }

    terms
}
