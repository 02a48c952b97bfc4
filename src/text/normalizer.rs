use std::borrow::Cow;
use std::fmt::{self, Debug};

use rust_stemmers::{Algorithm, Stemmer};

/// A stemming function mapping morphological variants to a common root.
pub trait Stem {
    fn stem<'a>(&self, word: &'a str) -> Cow<'a, str>;

    /// Stable name recorded in persisted indexes.
    fn name(&self) -> &str;
}

/// Snowball English (Porter2) stemmer.
///
/// Porter2 revises the original 1980 Porter algorithm, so a few stems differ
/// from classic Porter implementations such as NLTK's `PorterStemmer`
/// ("generously" gives "generous" here, "gener" there). An index must be
/// queried with the stemmer it was built with; see [`Stem::name`].
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    pub fn new() -> Self {
        Self {
            inner: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SnowballStemmer")
    }
}

impl Stem for SnowballStemmer {
    #[inline]
    fn stem<'a>(&self, word: &'a str) -> Cow<'a, str> {
        self.inner.stem(word)
    }

    fn name(&self) -> &str {
        "snowball"
    }
}

/// Leaves words untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStemmer;

impl Stem for NoStemmer {
    #[inline]
    fn stem<'a>(&self, word: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(word)
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Turns raw text into normalized tokens.
///
/// trim -> drop ASCII punctuation -> lowercase -> split on whitespace -> stem
///
/// An index owns exactly one `Normalizer` and runs both its paragraphs and
/// every query through it.
#[derive(Debug, Default)]
pub struct Normalizer<S = SnowballStemmer> {
    stemmer: S,
}

impl<S> Normalizer<S>
where
    S: Stem,
{
    pub fn new(stemmer: S) -> Self {
        Self { stemmer }
    }

    pub fn stemmer(&self) -> &S {
        &self.stemmer
    }

    /// Empty or punctuation-only text yields no tokens.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .trim()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();
        cleaned
            .to_lowercase()
            .split_whitespace()
            .map(|word| self.stemmer.stem(word).into_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_lowercases_and_stems() {
        let normalizer = Normalizer::new(SnowballStemmer::new());
        let tokens = normalizer.normalize("  How taxes influence Economics?  ");
        assert_eq!(tokens, vec!["how", "tax", "influenc", "econom"]);
    }

    #[test]
    fn snowball_stems_follow_porter2() {
        let stemmer = SnowballStemmer::new();
        assert_eq!(stemmer.name(), "snowball");
        assert_eq!(stemmer.stem("generously"), "generous");
        assert_eq!(stemmer.stem("taxes"), "tax");
    }

    #[test]
    fn normalization_is_deterministic() {
        let normalizer = Normalizer::new(SnowballStemmer::new());
        let text = "The Wealth of Nations, (1776): labour; wages & stock!";
        assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
    }

    #[test]
    fn empty_and_punctuation_only_yield_nothing() {
        let normalizer = Normalizer::new(NoStemmer);
        assert!(normalizer.normalize("").is_empty());
        assert!(normalizer.normalize("  ?!... --- ").is_empty());
    }

    #[test]
    fn repeated_whitespace_never_produces_empty_tokens() {
        let normalizer = Normalizer::new(NoStemmer);
        assert_eq!(normalizer.normalize("a  b\t\tc\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn punctuation_inside_words_is_removed() {
        let normalizer = Normalizer::new(NoStemmer);
        assert_eq!(normalizer.normalize("don't re-use"), vec!["dont", "reuse"]);
    }
}
