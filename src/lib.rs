/// This crate is a paragraph retrieval engine over a static corpus,
/// ranking by cosine similarity in TF-IDF space and in latent semantic space.
pub mod config;
pub mod error;
pub mod text;
pub mod utils;
pub mod vectorizer;

/// Retrieval Index
/// The top-level struct of this crate.
/// It is built once from a sequence of paragraphs and then answers
/// free-text queries with two rankings of every paragraph.
///
/// Internally, it holds:
/// - The normalizer every paragraph and query goes through
/// - The paragraphs themselves, for display
/// - The vocabulary (token <-> id), after stopword filtering
/// - The fitted TF-IDF model (document frequencies)
/// - The fitted LSI projector (truncated SVD basis)
/// - A cosine similarity index over TF-IDF vectors
/// - A cosine similarity index over topic vectors
///
/// `RetrievalIndex<S, E>` has the following generic parameters:
/// - `S`: Stemming function (e.g., SnowballStemmer, NoStemmer)
/// - `E`: TF-IDF weighting engine (e.g., DefaultTfIdfEngine)
///
/// # Thread Safety
/// Queries take `&self` and never mutate the index, so a built index can be
/// shared between threads.
///
/// # Serialization
/// Supported.
/// The normalizer is not included; only the stemmer's name is recorded.
pub use vectorizer::RetrievalIndex;

/// Query Result
/// Both rankings for one query (`tfidf` and `lsi`), along with the query's
/// TF-IDF weights, its topic vector, and the tokens that were dropped because
/// the vocabulary does not know them.
pub use vectorizer::{QueryResult, Topic};

/// Retrieval Index Data Structure for Deserialization
/// This struct holds everything a `RetrievalIndex` holds except its normalizer.
/// You can convert it into `RetrievalIndex` by passing a `Normalizer` via
/// `into_retrieval_index`; the stemmer must match the one used at build time.
///
/// # Deserialization
/// Supported.
pub use vectorizer::serde::IndexData;

/// Vocabulary
/// Assigns dense integer ids to normalized tokens in first-seen order.
/// Supports stopword filtering (ids stay dense) and encoding token sequences
/// into bag-of-words vectors, silently dropping unknown tokens.
pub use vectorizer::vocabulary::{BagOfWords, Vocabulary};

/// TF-IDF Model and Engine Trait
/// `TfIdfModel` keeps corpus-wide document frequencies and weights any
/// bag-of-words vector against them.
///
/// By implementing `TfIdfEngine`, you can plug different weighting
/// strategies into `TfIdfModel<E>`.
/// A default implementation, `DefaultTfIdfEngine`, uses raw counts and
/// `ln(N / df)`.
pub use vectorizer::tfidf::{DefaultTfIdfEngine, TfIdfEngine, TfIdfModel, TfIdfVector};

/// Latent Semantic Projector
/// A rank-k truncated SVD of the TF-IDF term-document matrix.
/// Folds TF-IDF vectors into topic space and lists the terms behind each topic.
pub use vectorizer::lsi::{LsiProjector, TopicVector};

/// Similarity Index
/// Brute-force cosine similarity over one vector per document.
/// Works for sparse TF-IDF vectors and dense topic vectors alike.
pub use vectorizer::index::{cosine_similarity, IndexVector, SimilarityIndex};

/// Search Hits
/// `(paragraph index, score)` pairs with score-descending ordering
/// (ties by ascending index) and top-n truncation.
pub use vectorizer::evaluate::scoring::Hits;

/// Text Normalizer
/// trim, drop punctuation, lowercase, split on whitespace, stem.
pub use text::normalizer::{NoStemmer, Normalizer, SnowballStemmer, Stem};

/// Corpus helpers
/// Paragraph type, blank-line paragraph segmentation and stopword list parsing.
pub use text::corpus::{parse_stopwords, split_paragraphs, Paragraph};

pub use config::{IndexConfig, LsiConfig, TfIdfConfig, TopicScaling};
pub use error::{Error, Result};
