/// Errors raised while building, configuring or restoring an index.
///
/// Out-of-vocabulary tokens and zero-norm vectors are not errors: they are
/// absorbed where they occur and only lower the affected scores.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The requested number of latent topics was zero.
    #[error("invalid number of topics: {0} (must be at least 1)")]
    InvalidRank(usize),
    /// No paragraphs were supplied to the build.
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,
    /// The configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    /// Encoding or decoding a persisted index failed.
    #[error("index serialization failed: {0}")]
    Serialization(#[from] serde_cbor::Error),
    /// A persisted index was restored with a different stemming function.
    #[error("index was built with stemmer `{expected}` but `{found}` was supplied")]
    StemmerMismatch { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, Error>;
