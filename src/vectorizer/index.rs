use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::math::vector::math::cosine_from_parts;
use crate::utils::math::vector::{DenseVec, SparseVec};
use crate::vectorizer::evaluate::scoring::Hits;

/// A vector that can be compared by cosine similarity.
pub trait IndexVector: Send + Sync {
    fn dot(&self, other: &Self) -> f64;
    fn norm(&self) -> f64;
}

impl IndexVector for SparseVec<f64> {
    #[inline]
    fn dot(&self, other: &Self) -> f64 {
        SparseVec::dot(self, other)
    }

    #[inline]
    fn norm(&self) -> f64 {
        SparseVec::norm(self)
    }
}

impl IndexVector for DenseVec {
    #[inline]
    fn dot(&self, other: &Self) -> f64 {
        DenseVec::dot(self, other)
    }

    #[inline]
    fn norm(&self) -> f64 {
        DenseVec::norm(self)
    }
}

/// Cosine similarity of two vectors; 0.0 when either has zero norm.
#[inline]
pub fn cosine_similarity<V: IndexVector>(a: &V, b: &V) -> f64 {
    cosine_from_parts(a.dot(b), a.norm(), b.norm())
}

/// Brute-force cosine index over one vector per document.
///
/// Document norms are computed once at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityIndex<V> {
    vectors: Vec<V>,
    norms: Vec<f64>,
}

impl<V> SimilarityIndex<V>
where
    V: IndexVector,
{
    pub fn build(vectors: Vec<V>) -> Self {
        let norms = vectors.par_iter().map(|v| v.norm()).collect();
        Self { vectors, norms }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[inline]
    pub fn vector(&self, doc: usize) -> Option<&V> {
        self.vectors.get(doc)
    }

    pub fn vectors(&self) -> &[V] {
        &self.vectors
    }

    /// Score every document against `query`, in document order.
    /// No truncation or sorting is done here.
    pub fn query(&self, query: &V) -> Hits {
        let query_norm = query.norm();
        let list = self
            .vectors
            .par_iter()
            .zip(self.norms.par_iter())
            .enumerate()
            .map(|(doc, (vector, &norm))| {
                let score = if query_norm == 0.0 || norm == 0.0 {
                    0.0
                } else {
                    cosine_from_parts(query.dot(vector), query_norm, norm)
                };
                (doc, score)
            })
            .collect();
        Hits::new(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse(pairs: &[(u32, f64)]) -> SparseVec<f64> {
        SparseVec::from_unsorted(pairs.iter().copied())
    }

    #[test]
    fn scores_every_document_in_order() {
        let index = SimilarityIndex::build(vec![
            sparse(&[(0, 1.0)]),
            sparse(&[(1, 2.0)]),
            sparse(&[(0, 1.0), (1, 1.0)]),
        ]);
        let hits = index.query(&sparse(&[(0, 3.0)]));
        assert_eq!(hits.keys(), vec![0, 1, 2]);
        assert!((hits.list[0].1 - 1.0).abs() < 1e-12);
        assert_eq!(hits.list[1].1, 0.0);
        assert!((hits.list[2].1 - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn zero_norm_vectors_score_zero() {
        let index = SimilarityIndex::build(vec![sparse(&[]), sparse(&[(2, 1.0)])]);
        let hits = index.query(&sparse(&[(2, 1.0)]));
        assert_eq!(hits.list[0].1, 0.0);
        let empty = index.query(&sparse(&[]));
        assert!(empty.list.iter().all(|(_, s)| *s == 0.0));
        assert_eq!(empty.len(), 2);
    }

    #[test]
    fn cosine_is_symmetric() {
        let vectors = [
            DenseVec::from(vec![0.3, -1.2, 4.0]),
            DenseVec::from(vec![-2.0, 0.5, 0.1]),
            DenseVec::from(vec![0.0, 0.0, 0.0]),
            DenseVec::from(vec![1.0, 1.0, 1.0]),
        ];
        for a in &vectors {
            for b in &vectors {
                assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));
            }
        }
    }

    #[test]
    fn orthogonal_dense_hits_tie_by_document_order() {
        let index = SimilarityIndex::build(vec![
            DenseVec::from(vec![0.0, -1.0]),
            DenseVec::from(vec![0.0, 1.0]),
        ]);
        let mut hits = index.query(&DenseVec::from(vec![-1.0, 0.0]));
        assert!(hits.list.iter().all(|(_, s)| *s == 0.0 && s.is_sign_positive()));
        hits.sort_by_score_desc();
        assert_eq!(hits.keys(), vec![0, 1]);
    }

    #[test]
    fn dense_scores_stay_in_range() {
        let index = SimilarityIndex::build(vec![
            DenseVec::from(vec![1.0, 0.0]),
            DenseVec::from(vec![-1.0, 0.0]),
        ]);
        let hits = index.query(&DenseVec::from(vec![2.0, 0.0]));
        assert_eq!(hits.list, vec![(0, 1.0), (1, -1.0)]);
    }
}
