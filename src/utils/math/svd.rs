//! Truncated singular value decomposition of a sparse term-document matrix.
//!
//! The matrix is given column-wise: one sparse vector per document, indexed
//! by term id. Only the left singular vectors and the singular values are
//! produced; document coordinates are recovered by folding documents in.

use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::vector::SparseVec;

/// How the decomposition was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SvdStrategy {
    /// Dense SVD of the whole matrix.
    Exact,
    /// Randomized range finder followed by a dense SVD of the projection.
    Randomized,
}

#[derive(Debug, Clone, Copy)]
pub struct SvdParams {
    pub rank: usize,
    pub oversample: usize,
    pub power_iters: usize,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    /// `n_rows x rank`, orthonormal columns ordered by singular value.
    pub u: DMatrix<f64>,
    /// Length `rank`, descending.
    pub singular_values: DVector<f64>,
    pub strategy: SvdStrategy,
}

/// Rank-`params.rank` truncated SVD of the `n_rows x columns.len()` matrix.
///
/// The rank is clamped to `min(n_rows, columns.len())`; a rank of zero gives
/// an empty basis.
///
/// Singular vectors are only unique up to sign. Each returned column is
/// flipped so that its largest-magnitude entry is positive.
pub fn truncated_svd(columns: &[SparseVec<f64>], n_rows: usize, params: &SvdParams) -> TruncatedSvd {
    let n_cols = columns.len();
    let min_dim = n_rows.min(n_cols);
    let rank = params.rank.min(min_dim);
    if rank == 0 {
        return TruncatedSvd {
            u: DMatrix::zeros(n_rows, 0),
            singular_values: DVector::zeros(0),
            strategy: SvdStrategy::Exact,
        };
    }

    if rank + params.oversample >= min_dim {
        let dense = DMatrix::from_fn(n_rows, n_cols, |row, col| columns[col].get(row as u32));
        let (u, s) = dense_svd(dense);
        return finish(u, s, rank, SvdStrategy::Exact);
    }

    let width = rank + params.oversample;
    let mut rng = StdRng::seed_from_u64(params.seed);
    let omega = DMatrix::from_fn(n_cols, width, |_, _| rng.gen_range(-1.0..1.0));

    let mut q = orthonormalize(mul_columns(columns, n_rows, &omega));
    for _ in 0..params.power_iters {
        let z = orthonormalize(mul_columns_transposed(columns, &q));
        q = orthonormalize(mul_columns(columns, n_rows, &z));
    }

    // B = Q^T M is small (width x n_cols); its left singular vectors lift back through Q.
    let b = mul_columns_transposed(columns, &q).transpose();
    let (u_b, s) = dense_svd(b);
    let u = &q * u_b;
    finish(u, s, rank, SvdStrategy::Randomized)
}

fn dense_svd(m: DMatrix<f64>) -> (DMatrix<f64>, DVector<f64>) {
    let n_rows = m.nrows();
    let svd = m.svd(true, false);
    let s = svd.singular_values;
    let u = svd.u.unwrap_or_else(|| DMatrix::zeros(n_rows, s.len()));
    (u, s)
}

/// Keep the `rank` largest singular triplets and pin their signs.
fn finish(u: DMatrix<f64>, s: DVector<f64>, rank: usize, strategy: SvdStrategy) -> TruncatedSvd {
    let mut order: Vec<usize> = (0..s.len()).collect();
    order.sort_by(|&a, &b| s[b].total_cmp(&s[a]).then_with(|| a.cmp(&b)));
    order.truncate(rank);

    let mut u_k = DMatrix::zeros(u.nrows(), order.len());
    let mut s_k = DVector::zeros(order.len());
    for (dst, &src) in order.iter().enumerate() {
        let mut column = u.column(src).clone_owned();
        let pivot = column
            .iter()
            .copied()
            .fold(0.0_f64, |best, v| if v.abs() > best.abs() { v } else { best });
        if pivot < 0.0 {
            column.neg_mut();
        }
        u_k.set_column(dst, &column);
        s_k[dst] = s[src];
    }

    TruncatedSvd {
        u: u_k,
        singular_values: s_k,
        strategy,
    }
}

fn orthonormalize(m: DMatrix<f64>) -> DMatrix<f64> {
    m.qr().q()
}

/// `M * x` where `M` is given column-wise.
fn mul_columns(columns: &[SparseVec<f64>], n_rows: usize, x: &DMatrix<f64>) -> DMatrix<f64> {
    let width = x.ncols();
    let mut y = DMatrix::zeros(n_rows, width);
    for (doc, column) in columns.iter().enumerate() {
        for (term, weight) in column.iter() {
            for j in 0..width {
                y[(term as usize, j)] += weight * x[(doc, j)];
            }
        }
    }
    y
}

/// `M^T * q` where `M` is given column-wise.
fn mul_columns_transposed(columns: &[SparseVec<f64>], q: &DMatrix<f64>) -> DMatrix<f64> {
    let width = q.ncols();
    let rows: Vec<Vec<f64>> = columns
        .par_iter()
        .map(|column| {
            let mut row = vec![0.0; width];
            for (term, weight) in column.iter() {
                for (j, acc) in row.iter_mut().enumerate() {
                    *acc += weight * q[(term as usize, j)];
                }
            }
            row
        })
        .collect();
    DMatrix::from_fn(columns.len(), width, |doc, j| rows[doc][j])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(rank: usize, oversample: usize) -> SvdParams {
        SvdParams {
            rank,
            oversample,
            power_iters: 2,
            seed: 123,
        }
    }

    fn diag_columns() -> Vec<SparseVec<f64>> {
        vec![
            SparseVec::from_unsorted(vec![(0u32, 3.0)]),
            SparseVec::from_unsorted(vec![(1u32, -5.0)]),
            SparseVec::from_unsorted(vec![(2u32, 1.0)]),
        ]
    }

    #[test]
    fn exact_svd_of_diagonal_matrix() {
        let svd = truncated_svd(&diag_columns(), 3, &params(2, 1));
        assert_eq!(svd.strategy, SvdStrategy::Exact);
        assert_eq!(svd.singular_values.len(), 2);
        assert!((svd.singular_values[0] - 5.0).abs() < 1e-9);
        assert!((svd.singular_values[1] - 3.0).abs() < 1e-9);
        // sign pinned: largest component positive
        assert!((svd.u[(1, 0)] - 1.0).abs() < 1e-9);
        assert!((svd.u[(0, 1)] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rank_is_clamped_to_matrix_dimensions() {
        let svd = truncated_svd(&diag_columns(), 3, &params(100, 0));
        assert_eq!(svd.u.ncols(), 3);
        let empty = truncated_svd(&[], 4, &params(10, 0));
        assert_eq!(empty.u.shape(), (4, 0));
        assert!(empty.singular_values.is_empty());
    }

    #[test]
    fn randomized_matches_exact_on_low_rank_matrix() {
        // 40 terms x 30 docs, rank 2 by construction
        let columns: Vec<SparseVec<f64>> = (0..30u32)
            .map(|d| {
                let a = 1.0 + (d % 3) as f64;
                let b = 1.0 + (d % 5) as f64;
                SparseVec::from_unsorted((0..40u32).map(|t| {
                    let x = if t < 20 { a * (t + 1) as f64 } else { 0.0 };
                    let y = if t >= 10 { b * (40 - t) as f64 } else { 0.0 };
                    (t, x + y)
                }))
            })
            .collect();
        let exact = truncated_svd(&columns, 40, &params(2, 100));
        let randomized = truncated_svd(&columns, 40, &params(2, 5));
        assert_eq!(exact.strategy, SvdStrategy::Exact);
        assert_eq!(randomized.strategy, SvdStrategy::Randomized);
        for i in 0..2 {
            let rel = (exact.singular_values[i] - randomized.singular_values[i]).abs() / exact.singular_values[i];
            assert!(rel < 1e-6, "singular value {i} differs by {rel}");
            for t in 0..40 {
                assert!((exact.u[(t, i)] - randomized.u[(t, i)]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn columns_are_orthonormal() {
        let svd = truncated_svd(&diag_columns(), 3, &params(3, 0));
        let gram = svd.u.transpose() * &svd.u;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((gram[(i, j)] - expected).abs() < 1e-9);
            }
        }
    }
}
