use std::cmp::Ordering;

/// Ordering for ranked `(key, score)` pairs:
/// score descending, then key ascending so equal scores rank deterministically.
/// `0.0` and `-0.0` are equal scores.
#[inline]
pub fn by_score_desc<K: Ord>(a: &(K, f64), b: &(K, f64)) -> Ordering {
    // adding +0.0 turns -0.0 into 0.0
    (b.1 + 0.0).total_cmp(&(a.1 + 0.0)).then_with(|| a.0.cmp(&b.0))
}

/// Ordering for `(key, weight)` pairs by magnitude:
/// |weight| descending, then key ascending.
#[inline]
pub fn by_magnitude_desc<K: Ord>(a: &(K, f64), b: &(K, f64)) -> Ordering {
    b.1.abs().total_cmp(&a.1.abs()).then_with(|| a.0.cmp(&b.0))
}

/// Sort by [`by_score_desc`] and keep the first `n`.
pub fn top_n_by_score<K: Ord>(items: &mut Vec<(K, f64)>, n: usize) {
    items.sort_by(by_score_desc);
    items.truncate(n);
}
