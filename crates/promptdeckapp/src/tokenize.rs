//! Free-text tokenizer shared by indexing and querying.
//!
//! Pipeline: NFC normalization, lowercase, split on every run of
//! non-alphanumeric characters, drop empties and stopwords, deduplicate.
//! Output is a `BTreeSet` so iteration order is deterministic.

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};
use unicode_normalization::UnicodeNormalization;

/// Articles, prepositions, common pronouns and conjunctions.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // articles
        "a", "an", "the",
        // prepositions
        "about", "above", "across", "after", "against", "along", "among", "around", "at",
        "before", "behind", "below", "beneath", "beside", "between", "beyond", "by", "down",
        "during", "for", "from", "in", "inside", "into", "near", "of", "off", "on", "onto",
        "out", "outside", "over", "through", "to", "toward", "towards", "under", "up", "upon",
        "with", "within", "without",
        // pronouns
        "i", "me", "my", "mine", "you", "your", "yours", "he", "him", "his", "she", "her",
        "hers", "it", "its", "we", "us", "our", "ours", "they", "them", "their", "theirs",
        "this", "that", "these", "those", "who", "whom", "which", "what",
        // conjunctions
        "and", "or", "but", "nor", "so", "yet", "if", "then", "than", "as", "while",
        // auxiliaries
        "is", "are", "was", "were", "be", "been", "being",
    ]
    .into_iter()
    .collect()
});

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

pub fn tokenize(text: &str) -> BTreeSet<String> {
    let normalized: String = text.nfc().collect::<String>().to_lowercase();
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !is_stopword(t))
        .map(str::to_string)
        .collect()
}

/// Tokenizes several fields as one text.
pub fn tokenize_all<'a, I>(fields: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    fields.into_iter().flat_map(tokenize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_stopwords_and_punctuation() {
        assert_eq!(tokenize("A Cat, A Dog!!"), set(&["cat", "dog"]));
    }

    #[test]
    fn empty_input_yields_empty_set() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
        assert!(tokenize("the of and").is_empty());
    }

    #[test]
    fn deduplicates_tokens() {
        assert_eq!(tokenize("red RED red-red"), set(&["red"]));
    }

    #[test]
    fn splits_on_any_non_alphanumeric_run() {
        assert_eq!(
            tokenize("35mm/f1.8 -- bokeh_heavy"),
            set(&["35mm", "f1", "8", "bokeh", "heavy"])
        );
    }

    #[test]
    fn normalizes_composed_and_decomposed_forms() {
        let composed = tokenize("caf\u{e9}");
        let decomposed = tokenize("cafe\u{301}");
        assert_eq!(composed, decomposed);
        assert_eq!(composed, set(&["caf\u{e9}"]));
    }

    #[test]
    fn tokenize_all_merges_fields() {
        let tokens = tokenize_all(["a red car", "", "the red barn"]);
        assert_eq!(tokens, set(&["barn", "car", "red"]));
    }
}
