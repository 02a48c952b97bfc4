use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::utils::math::vector::SparseVec;

/// Term id -> occurrence count for one token sequence.
pub type BagOfWords = SparseVec<u32>;

/// Bidirectional token <-> id mapping.
///
/// Ids are the insertion positions in an `IndexSet`, so they are always
/// dense over `[0, len)`. Filtering removes entries and shifts the survivors
/// down while keeping their relative order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: IndexSet<Box<str>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self {
            tokens: IndexSet::new(),
        }
    }

    /// Assign ids to every distinct token in first-seen order.
    pub fn build<D, T>(documents: D) -> Self
    where
        D: IntoIterator,
        D::Item: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut vocabulary = Self::new();
        for document in documents {
            vocabulary.add_tokens(document);
        }
        vocabulary
    }

    /// Add unseen tokens, keeping existing ids.
    pub fn add_tokens<I, T>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for token in tokens {
            let token = token.as_ref();
            if !self.tokens.contains(token) {
                self.tokens.insert(token.into());
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.tokens.get_index_of(token).map(|idx| idx as u32)
    }

    #[inline]
    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.tokens.get_index(id as usize).map(|token| &**token)
    }

    /// `(id, token)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| (idx as u32, &**token))
    }

    /// Remove the given ids and compact the rest.
    /// Unknown ids are ignored. Returns how many entries were removed.
    pub fn filter_ids(&mut self, bad_ids: &[u32]) -> usize {
        let before = self.tokens.len();
        let mut keep = vec![true; before];
        for &id in bad_ids {
            if let Some(slot) = keep.get_mut(id as usize) {
                *slot = false;
            }
        }
        let mut idx = 0;
        self.tokens.retain(|_| {
            let kept = keep[idx];
            idx += 1;
            kept
        });
        before - self.tokens.len()
    }

    /// Remove every stopword that is present in the vocabulary.
    /// Stopwords are matched exactly as given; absent ones are ignored.
    pub fn filter_tokens<I, T>(&mut self, stopwords: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let bad_ids: Vec<u32> = stopwords
            .into_iter()
            .filter_map(|word| self.token_to_id(word.as_ref()))
            .collect();
        self.filter_ids(&bad_ids)
    }

    /// Count known tokens; unknown tokens contribute nothing.
    pub fn encode<T>(&self, tokens: &[T]) -> BagOfWords
    where
        T: AsRef<str>,
    {
        SparseVec::from_unsorted(
            tokens
                .iter()
                .filter_map(|token| self.token_to_id(token.as_ref()))
                .map(|id| (id, 1u32)),
        )
    }

    /// [`Vocabulary::encode`] that also reports the dropped tokens, in input order.
    pub fn encode_with_dropped<T>(&self, tokens: &[T]) -> (BagOfWords, Vec<String>)
    where
        T: AsRef<str>,
    {
        let mut ids = Vec::with_capacity(tokens.len());
        let mut dropped = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            match self.token_to_id(token) {
                Some(id) => ids.push((id, 1u32)),
                None => dropped.push(token.to_owned()),
            }
        }
        (SparseVec::from_unsorted(ids), dropped)
    }
}
