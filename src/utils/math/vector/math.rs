use std::cmp::Ordering;

use num::Num;

use super::SparseVec;

impl<N> SparseVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// Dot product over the shared indices.
    ///
    /// Both index lists are sorted, so this is a single merge pass.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        let (a_inds, a_vals) = (self.inds(), self.vals());
        let (b_inds, b_vals) = (other.inds(), other.vals());
        let mut result = 0.0;
        let mut i = 0;
        let mut j = 0;
        while i < a_inds.len() && j < b_inds.len() {
            match a_inds[i].cmp(&b_inds[j]) {
                Ordering::Equal => {
                    result += a_vals[i].into() * b_vals[j].into();
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.vals()
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .sum()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }
}

impl SparseVec<f64> {
    /// Scale to unit L2 norm. A zero vector stays zero.
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0.0 {
            return self.clone();
        }
        self.filter_map_values(|_, v| v / norm)
    }
}

/// Cosine of the angle between two vectors given their dot product and norms.
/// A zero-norm side yields 0.0. The result is clamped to `[-1, 1]` and
/// never `-0.0`.
#[inline]
pub fn cosine_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let cosine = (dot / (norm_a * norm_b)).clamp(-1.0, 1.0);
    if cosine == 0.0 {
        0.0
    } else {
        cosine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_only_counts_shared_indices() {
        let a = SparseVec::from_unsorted(vec![(0u32, 1.0f64), (2, 2.0), (5, 3.0)]);
        let b = SparseVec::from_unsorted(vec![(2u32, 4.0f64), (3, 1.0), (5, -1.0)]);
        assert_eq!(a.dot(&b), 8.0 - 3.0);
        assert_eq!(a.dot(&b), b.dot(&a));
    }

    #[test]
    fn norm_of_integer_vector() {
        let v = SparseVec::from_unsorted(vec![(1u32, 3u32), (9, 4)]);
        assert_eq!(v.norm(), 5.0);
    }

    #[test]
    fn cosine_handles_zero_norm() {
        assert_eq!(cosine_from_parts(0.0, 0.0, 1.0), 0.0);
        assert_eq!(cosine_from_parts(1.0, 1.0, 0.0), 0.0);
        assert_eq!(cosine_from_parts(2.0 + 1e-15, 1.0, 2.0), 1.0);
    }

    #[test]
    fn cosine_zero_is_positive_zero() {
        let c = cosine_from_parts(-0.0, 1.0, 1.0);
        assert_eq!(c, 0.0);
        assert!(c.is_sign_positive());
    }

    #[test]
    fn normalized_has_unit_norm() {
        let v = SparseVec::from_unsorted(vec![(0u32, 3.0f64), (1, 4.0)]);
        let n = v.normalized();
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!(SparseVec::<f64>::new().normalized().is_empty());
    }
}
