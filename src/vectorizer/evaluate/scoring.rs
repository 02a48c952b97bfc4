use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

use crate::utils::sort::{by_score_desc, top_n_by_score};

/// Structure to store ranked search results
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    /// (Paragraph index, Score)
    pub list: Vec<(usize, f64)>,
}

impl Hits {
    pub fn new(list: Vec<(usize, f64)>) -> Self {
        Hits { list }
    }

    /// Sort by descending score, ties by ascending paragraph index.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        self.list.sort_by(by_score_desc);
        self
    }

    /// Keep the best `n` hits.
    pub fn top(mut self, n: usize) -> Self {
        top_n_by_score(&mut self.list, n);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Paragraph indexes in list order.
    pub fn keys(&self) -> Vec<usize> {
        self.list.iter().map(|(key, _)| *key).collect()
    }

    /// Score of `key`, if present.
    pub fn score_of(&self, key: usize) -> Option<f64> {
        self.list.iter().find(|(k, _)| *k == key).map(|(_, s)| *s)
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each hit on a new line
            writeln!(f, "Hits [")?;
            for (key, score) in &self.list {
                writeln!(f, "    {:?}: {:.6}", key, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, (key, score)) in self.list.iter().enumerate() {
            writeln!(f, "Result {} - [Paragraph {}] - {:.4}", rank + 1, key, score)?;
        }
        Ok(())
    }
}
