//! Text matching primitives shared by the validator, scorer, and
//! trigger matcher.

use std::collections::BTreeSet;

/// Words too common to carry signal in overlap comparisons.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
    "it", "its", "of", "on", "or", "that", "the", "their", "this", "to", "was", "we", "were",
    "which", "will", "with", "you", "your",
];

/// Lowercase alphanumeric tokens of `text`, stopwords included.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Token set of `text` for overlap comparisons.
pub(crate) fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// Token set with stopwords removed.
pub(crate) fn content_words(text: &str) -> BTreeSet<String> {
    token_set(text)
        .into_iter()
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Jaccard similarity of two token sets. Empty-vs-anything is 0.
pub(crate) fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    #[allow(clippy::cast_precision_loss)]
    {
        intersection as f64 / union as f64
    }
}

/// Fraction of `of`'s elements present in `within`. 0 when `of` is empty.
pub(crate) fn containment(of: &BTreeSet<String>, within: &BTreeSet<String>) -> f64 {
    if of.is_empty() {
        return 0.0;
    }
    let matched = of.iter().filter(|w| within.contains(*w)).count();
    #[allow(clippy::cast_precision_loss)]
    {
        matched as f64 / of.len() as f64
    }
}

/// Whether `keyword` matches trend text: exact substring containment in
/// the lowercased text, or at least 60% of the keyword's tokens present
/// in the text's token set.
pub(crate) fn keyword_matches(
    text_lower: &str,
    text_tokens: &BTreeSet<String>,
    keyword: &str,
) -> bool {
    let keyword_lower = keyword.to_lowercase();
    if text_lower.contains(&keyword_lower) {
        return true;
    }
    let keyword_tokens = token_set(&keyword_lower);
    containment(&keyword_tokens, text_tokens) >= 0.6
}
