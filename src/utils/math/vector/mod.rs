pub mod dense;
pub mod math;

use std::fmt::{self, Debug};

use num::Num;
use serde::{Deserialize, Serialize};

pub use dense::DenseVec;

/// SparseVec is a sparse vector that treats zero elements as absent.
/// It holds `inds` and `vals`:
/// `inds` keeps the dimension of each stored element,
/// `vals` keeps the value of each stored element.
///
/// Elements are guaranteed to be sorted by ascending index,
/// indices are unique, and no stored value is zero.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVec<N>
where
    N: Num + Copy,
{
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        SparseVec {
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        SparseVec {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    /// Build from `(index, value)` pairs in any order.
    /// Duplicate indices are summed, zero results are dropped.
    pub fn from_unsorted<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, N)>,
    {
        let mut pairs: Vec<(u32, N)> = pairs.into_iter().collect();
        pairs.sort_by_key(|(idx, _)| *idx);

        let mut out = Self::with_capacity(pairs.len());
        let mut iter = pairs.into_iter();
        let Some((mut cur_idx, mut cur_val)) = iter.next() else {
            return out;
        };
        for (idx, val) in iter {
            if idx == cur_idx {
                cur_val = cur_val + val;
            } else {
                out.push(cur_idx, cur_val);
                cur_idx = idx;
                cur_val = val;
            }
        }
        out.push(cur_idx, cur_val);
        out
    }

    /// Append an element.
    /// `index` must be greater than every stored index; zeros are skipped.
    #[inline]
    pub fn push(&mut self, index: u32, value: N) {
        debug_assert!(
            self.inds.last().map_or(true, |&last| last < index),
            "SparseVec::push requires strictly ascending indices"
        );
        if value != N::zero() {
            self.inds.push(index);
            self.vals.push(value);
        }
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inds.is_empty()
    }

    #[inline]
    pub fn inds(&self) -> &[u32] {
        &self.inds
    }

    #[inline]
    pub fn vals(&self) -> &[N] {
        &self.vals
    }

    /// Value at `index`, zero when absent.
    #[inline]
    pub fn get(&self, index: u32) -> N {
        match self.inds.binary_search(&index) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u32, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    /// Apply `f` to every stored element, dropping results that become zero.
    pub fn filter_map_values<M, F>(&self, mut f: F) -> SparseVec<M>
    where
        M: Num + Copy,
        F: FnMut(u32, N) -> M,
    {
        let mut out = SparseVec::with_capacity(self.nnz());
        for (idx, val) in self.iter() {
            out.push(idx, f(idx, val));
        }
        out
    }
}

impl<N> Default for SparseVec<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Debug for SparseVec<N>
where
    N: Num + Copy + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
