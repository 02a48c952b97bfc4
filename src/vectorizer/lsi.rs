use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{LsiConfig, TopicScaling};
use crate::utils::math::svd::{truncated_svd, SvdParams, SvdStrategy};
use crate::utils::math::vector::DenseVec;
use crate::utils::sort::by_magnitude_desc;
use crate::vectorizer::tfidf::TfIdfVector;

/// Coordinates of a document or query in topic space.
pub type TopicVector = DenseVec;

/// Rank-`k` latent semantic projection of the TF-IDF space.
///
/// Holds `U_k` (vocabulary x k) and `Σ_k` from a truncated SVD of the
/// term-document matrix. Folding in is `U_k^T v`, optionally rescaled by
/// `Σ_k^-1`; the same convention is applied to corpus documents and queries.
///
/// Singular vectors are sign-normalized so their largest component is positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsiProjector {
    basis: DMatrix<f64>,
    singular_values: DVector<f64>,
    /// Singular values at or below this are numerically zero.
    sigma_floor: f64,
    scaling: TopicScaling,
    strategy: SvdStrategy,
}

impl LsiProjector {
    /// Decompose the `vocab_size x corpus.len()` matrix whose columns are
    /// the corpus TF-IDF vectors.
    ///
    /// The rank is clamped to `min(num_topics, vocab_size, corpus.len())`.
    pub fn fit(corpus: &[TfIdfVector], vocab_size: usize, num_topics: usize, config: &LsiConfig) -> Self {
        let rank = num_topics.min(vocab_size).min(corpus.len());
        if rank < num_topics {
            warn!(
                requested = num_topics,
                effective = rank,
                vocab_size,
                doc_num = corpus.len(),
                "topic count clamped to matrix dimensions"
            );
        }

        let params = SvdParams {
            rank,
            oversample: config.oversample,
            power_iters: config.power_iters,
            seed: config.seed,
        };
        let svd = truncated_svd(corpus, vocab_size, &params);
        info!(
            num_topics = svd.singular_values.len(),
            strategy = ?svd.strategy,
            "latent semantic projection fitted"
        );

        let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
        let sigma_floor = sigma_max * vocab_size.max(corpus.len()) as f64 * f64::EPSILON;
        let null_topics = svd.singular_values.iter().filter(|&&s| s <= sigma_floor).count();
        if null_topics > 0 {
            debug!(null_topics, sigma_floor, "corpus matrix is rank deficient");
        }

        Self {
            basis: svd.u,
            singular_values: svd.singular_values,
            sigma_floor,
            scaling: config.scaling,
            strategy: svd.strategy,
        }
    }

    /// Number of retained topics.
    #[inline]
    pub fn num_topics(&self) -> usize {
        self.singular_values.len()
    }

    /// Singular values, descending.
    #[inline]
    pub fn singular_values(&self) -> &[f64] {
        self.singular_values.as_slice()
    }

    #[inline]
    pub fn strategy(&self) -> SvdStrategy {
        self.strategy
    }

    #[inline]
    pub fn scaling(&self) -> TopicScaling {
        self.scaling
    }

    /// Project a TF-IDF vector into topic space.
    /// Ids beyond the fitted vocabulary are ignored. Under
    /// [`TopicScaling::InverseSingular`], topics whose singular value is
    /// numerically zero (relative to the largest) get coordinate 0.
    pub fn fold_in(&self, vector: &TfIdfVector) -> TopicVector {
        let k = self.num_topics();
        let n_terms = self.basis.nrows();
        let mut topic = DenseVec::zeros(k);
        let coords = topic.as_mut_slice();
        for (id, weight) in vector.iter() {
            let row = id as usize;
            if row >= n_terms {
                continue;
            }
            for (t, coord) in coords.iter_mut().enumerate() {
                *coord += self.basis[(row, t)] * weight;
            }
        }
        if self.scaling == TopicScaling::InverseSingular {
            for (t, coord) in coords.iter_mut().enumerate() {
                let sigma = self.singular_values[t];
                *coord = if sigma > self.sigma_floor { *coord / sigma } else { 0.0 };
            }
        }
        topic
    }

    /// Fold in a batch of vectors, preserving order.
    pub fn fold_in_all(&self, vectors: &[TfIdfVector]) -> Vec<TopicVector> {
        vectors.par_iter().map(|v| self.fold_in(v)).collect()
    }

    /// The `num_terms` vocabulary ids weighing most on `topic`, by absolute
    /// weight. Empty for an unknown topic.
    pub fn show_topic(&self, topic: usize, num_terms: usize) -> Vec<(u32, f64)> {
        if topic >= self.num_topics() {
            return Vec::new();
        }
        let mut terms: Vec<(u32, f64)> = self
            .basis
            .column(topic)
            .iter()
            .enumerate()
            .map(|(id, &w)| (id as u32, w))
            .collect();
        terms.sort_by(by_magnitude_desc);
        terms.truncate(num_terms);
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::vector::SparseVec;

    fn tfidf(pairs: &[(u32, f64)]) -> TfIdfVector {
        SparseVec::from_unsorted(pairs.iter().copied())
    }

    fn corpus() -> Vec<TfIdfVector> {
        vec![
            tfidf(&[(0, 1.0), (1, 1.0)]),
            tfidf(&[(0, 2.0), (1, 1.5)]),
            tfidf(&[(2, 1.0), (3, 2.0)]),
            tfidf(&[(2, 1.0), (3, 1.0), (4, 0.5)]),
        ]
    }

    fn cosine(a: &TopicVector, b: &TopicVector) -> f64 {
        a.dot(b) / (a.norm() * b.norm())
    }

    #[test]
    fn rank_is_clamped_and_does_not_fail() {
        let lsi = LsiProjector::fit(&corpus(), 5, 100, &LsiConfig::default());
        assert_eq!(lsi.num_topics(), 4);
        let s = lsi.singular_values();
        assert!(s.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(lsi.fold_in(&corpus()[0]).len(), 4);
    }

    #[test]
    fn empty_vocabulary_gives_empty_topics() {
        let docs = vec![TfIdfVector::new(), TfIdfVector::new()];
        let lsi = LsiProjector::fit(&docs, 0, 10, &LsiConfig::default());
        assert_eq!(lsi.num_topics(), 0);
        assert!(lsi.fold_in(&docs[0]).is_empty());
        assert!(lsi.show_topic(0, 5).is_empty());
    }

    #[test]
    fn two_topics_separate_the_two_clusters() {
        let lsi = LsiProjector::fit(&corpus(), 5, 2, &LsiConfig::default());
        let topics = lsi.fold_in_all(&corpus());
        assert!(cosine(&topics[0], &topics[1]) > 0.99);
        assert!(cosine(&topics[2], &topics[3]) > 0.9);
        assert!(cosine(&topics[0], &topics[2]).abs() < 1e-9);
    }

    #[test]
    fn inverse_singular_scaling_divides_by_sigma() {
        let unscaled = LsiProjector::fit(&corpus(), 5, 2, &LsiConfig::default());
        let config = LsiConfig {
            scaling: TopicScaling::InverseSingular,
            ..LsiConfig::default()
        };
        let scaled = LsiProjector::fit(&corpus(), 5, 2, &config);
        let a = unscaled.fold_in(&corpus()[1]);
        let b = scaled.fold_in(&corpus()[1]);
        for t in 0..2 {
            assert!((a[t] / unscaled.singular_values()[t] - b[t]).abs() < 1e-12);
        }
    }

    #[test]
    fn inverse_singular_scaling_ignores_null_topics() {
        // every document three times: rank 4, but 5 topics survive the clamp
        let docs: Vec<TfIdfVector> = (0..3).flat_map(|_| corpus()).collect();
        let config = LsiConfig {
            scaling: TopicScaling::InverseSingular,
            ..LsiConfig::default()
        };
        let lsi = LsiProjector::fit(&docs, 5, 100, &config);
        assert_eq!(lsi.num_topics(), 5);
        assert!(lsi.singular_values()[4] < 1e-10);

        let topics = lsi.fold_in_all(&docs);
        for topic in &topics {
            assert_eq!(topic[4], 0.0);
        }
        assert!(cosine(&topics[0], &topics[4]) > 1.0 - 1e-9);
        assert!(cosine(&topics[0], &topics[2]).abs() < 1e-9);
        let query = lsi.fold_in(&tfidf(&[(0, 1.0), (4, 1.0)]));
        assert_eq!(query[4], 0.0);
    }

    #[test]
    fn show_topic_orders_by_absolute_weight() {
        let lsi = LsiProjector::fit(&corpus(), 5, 2, &LsiConfig::default());
        let terms = lsi.show_topic(0, 5);
        assert_eq!(terms.len(), 5);
        assert!(terms.windows(2).all(|w| w[0].1.abs() >= w[1].1.abs()));
        assert_eq!(lsi.show_topic(0, 2).len(), 2);
        assert!(lsi.show_topic(7, 2).is_empty());
    }

    #[test]
    fn out_of_range_ids_are_ignored_when_folding() {
        let lsi = LsiProjector::fit(&corpus(), 5, 2, &LsiConfig::default());
        let with_extra = tfidf(&[(0, 1.0), (1, 1.0), (99, 3.0)]);
        assert_eq!(lsi.fold_in(&with_extra), lsi.fold_in(&corpus()[0]));
    }
}
