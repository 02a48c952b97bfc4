use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Build parameters for a [`RetrievalIndex`](crate::RetrievalIndex).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// num_topics = 200
///
/// [lsi]
/// scaling = "inverse_singular"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Rank `k` of the latent semantic space.
    pub num_topics: usize,
    /// How many hits a caller shows by default.
    pub top_n: usize,
    pub tfidf: TfIdfConfig,
    pub lsi: LsiConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            num_topics: 100,
            top_n: 3,
            tfidf: TfIdfConfig::default(),
            lsi: LsiConfig::default(),
        }
    }
}

impl IndexConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: IndexConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_num_topics(mut self, num_topics: usize) -> Self {
        self.num_topics = num_topics;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            return Err(Error::InvalidRank(self.num_topics));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfIdfConfig {
    /// Scale every TF-IDF vector to unit length after weighting.
    pub normalize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsiConfig {
    /// Extra random dimensions sampled by the randomized SVD.
    pub oversample: usize,
    /// Subspace iterations of the randomized SVD.
    pub power_iters: usize,
    /// Seed for the random projection.
    pub seed: u64,
    pub scaling: TopicScaling,
}

impl Default for LsiConfig {
    fn default() -> Self {
        Self {
            oversample: 100,
            power_iters: 2,
            seed: 123,
            scaling: TopicScaling::Unscaled,
        }
    }
}

/// How folded-in vectors are scaled in topic space.
/// Corpus documents and queries always share the same convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicScaling {
    /// `U_k^T v`
    #[default]
    Unscaled,
    /// `Σ_k^-1 U_k^T v`
    InverseSingular,
}
