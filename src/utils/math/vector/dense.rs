use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Dense `f64` vector of fixed length, used for topic-space coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DenseVec {
    vals: Vec<f64>,
}

impl DenseVec {
    pub fn zeros(len: usize) -> Self {
        DenseVec { vals: vec![0.0; len] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.vals
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.vals
    }

    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.len(), other.len(), "dense vectors must share dimensionality");
        self.vals.iter().zip(&other.vals).map(|(a, b)| a * b).sum()
    }

    pub fn norm(&self) -> f64 {
        self.vals.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// The `n` strongest coordinates by absolute value, largest first.
    /// Ties keep the lower dimension first.
    pub fn dominant_topics(&self, n: usize) -> Vec<(usize, f64)> {
        let mut coords: Vec<(usize, f64)> = self.vals.iter().copied().enumerate().collect();
        coords.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then_with(|| a.0.cmp(&b.0)));
        coords.truncate(n);
        coords
    }
}

impl From<Vec<f64>> for DenseVec {
    fn from(vals: Vec<f64>) -> Self {
        DenseVec { vals }
    }
}

impl Index<usize> for DenseVec {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.vals[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_topics_orders_by_magnitude() {
        let v = DenseVec::from(vec![0.1, -0.9, 0.5, 0.9]);
        assert_eq!(v.dominant_topics(3), vec![(1, -0.9), (3, 0.9), (2, 0.5)]);
        assert!(DenseVec::zeros(0).dominant_topics(3).is_empty());
    }

    #[test]
    fn dot_and_norm() {
        let a = DenseVec::from(vec![1.0, 2.0, 2.0]);
        let b = DenseVec::from(vec![0.0, 1.0, -1.0]);
        assert_eq!(a.dot(&b), 0.0);
        assert_eq!(a.norm(), 3.0);
    }
}
