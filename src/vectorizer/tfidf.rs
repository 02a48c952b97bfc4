use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::utils::math::vector::SparseVec;
use crate::vectorizer::vocabulary::BagOfWords;

/// Sparse TF-IDF weights, indexed by vocabulary id.
pub type TfIdfVector = SparseVec<f64>;

/// Term weighting strategy plugged into [`TfIdfModel`].
pub trait TfIdfEngine {
    /// Weight of a raw in-document count.
    fn tf(count: u32) -> f64;
    /// Weight of a term seen in `doc_freq` of `doc_num` documents.
    fn idf(doc_num: u64, doc_freq: u64) -> f64;
}

/// Textbook weighting: raw count times `ln(N / df)`.
/// Terms found in every document weigh zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTfIdfEngine;

impl TfIdfEngine for DefaultTfIdfEngine {
    #[inline]
    fn tf(count: u32) -> f64 {
        count as f64
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        if doc_freq == 0 || doc_freq >= doc_num {
            return 0.0;
        }
        (doc_num as f64 / doc_freq as f64).ln()
    }
}

/// Corpus-wide document frequency statistics.
///
/// Fitted once on the whole corpus; `transform` only reads them, so corpus
/// documents and queries are always weighted against the same statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfModel<E = DefaultTfIdfEngine> {
    doc_num: u64,
    /// document frequency per vocabulary id
    doc_freqs: Vec<u64>,
    /// cached idf per vocabulary id
    idfs: Vec<f64>,
    normalize: bool,
    #[serde(skip)]
    _marker: PhantomData<E>,
}

impl<E> TfIdfModel<E>
where
    E: TfIdfEngine,
{
    /// Count, for every id below `vocab_size`, the documents that contain it.
    pub fn fit(corpus: &[BagOfWords], vocab_size: usize, normalize: bool) -> Self {
        let mut doc_freqs = vec![0u64; vocab_size];
        for bow in corpus {
            for (id, count) in bow.iter() {
                if count > 0 {
                    if let Some(df) = doc_freqs.get_mut(id as usize) {
                        *df += 1;
                    }
                }
            }
        }
        let doc_num = corpus.len() as u64;
        let idfs = doc_freqs.iter().map(|&df| E::idf(doc_num, df)).collect();
        Self {
            doc_num,
            doc_freqs,
            idfs,
            normalize,
            _marker: PhantomData,
        }
    }

    /// Weight a bag of words. Ids with zero idf or outside the fitted
    /// vocabulary are omitted.
    pub fn transform(&self, bow: &BagOfWords) -> TfIdfVector {
        let weighted = bow.filter_map_values(|id, count| {
            let idf = self.idf(id);
            if idf == 0.0 {
                0.0
            } else {
                E::tf(count) * idf
            }
        });
        if self.normalize {
            weighted.normalized()
        } else {
            weighted
        }
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    #[inline]
    pub fn doc_freq(&self, id: u32) -> u64 {
        self.doc_freqs.get(id as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn idf(&self, id: u32) -> f64 {
        self.idfs.get(id as usize).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.doc_freqs.len()
    }
}
