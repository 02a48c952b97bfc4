pub mod evaluate;
pub mod index;
pub mod lsi;
pub mod serde;
pub mod tfidf;
pub mod vocabulary;

use std::fmt::{self, Display};

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::text::corpus::Paragraph;
use crate::text::normalizer::{Normalizer, SnowballStemmer, Stem};
use crate::vectorizer::evaluate::scoring::Hits;
use crate::vectorizer::index::SimilarityIndex;
use crate::vectorizer::lsi::{LsiProjector, TopicVector};
use crate::vectorizer::tfidf::{DefaultTfIdfEngine, TfIdfEngine, TfIdfModel, TfIdfVector};
use crate::vectorizer::vocabulary::{BagOfWords, Vocabulary};

/// Paragraph index answering free-text queries in TF-IDF space and in
/// latent semantic (LSI) space.
///
/// Built once from a static corpus and read-only afterwards; `query` takes
/// `&self`, so one index can serve concurrent callers.
#[derive(Debug)]
pub struct RetrievalIndex<S = SnowballStemmer, E = DefaultTfIdfEngine> {
    pub(crate) normalizer: Normalizer<S>,
    pub(crate) paragraphs: Vec<Paragraph>,
    pub(crate) vocabulary: Vocabulary,
    pub(crate) tfidf: TfIdfModel<E>,
    pub(crate) lsi: LsiProjector,
    pub(crate) tfidf_index: SimilarityIndex<TfIdfVector>,
    pub(crate) lsi_index: SimilarityIndex<TopicVector>,
    pub(crate) config: IndexConfig,
}

/// Both rankings for one query plus what the query turned into.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Every paragraph ranked by cosine similarity in TF-IDF space.
    pub tfidf: Hits,
    /// Every paragraph ranked by cosine similarity in topic space.
    pub lsi: Hits,
    /// The query's TF-IDF weights, as `(token, weight)` in id order.
    pub weighted_terms: Vec<(String, f64)>,
    /// The query folded into topic space.
    pub topic_vector: TopicVector,
    /// Normalized query tokens that are not in the vocabulary.
    pub dropped_tokens: Vec<String>,
}

/// A latent topic described by its heaviest vocabulary terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub index: usize,
    pub terms: Vec<(String, f64)>,
}

impl Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (token, weight)) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{:.3}*\"{}\"", weight, token)?;
        }
        Ok(())
    }
}

impl<S, E> RetrievalIndex<S, E>
where
    S: Stem,
    E: TfIdfEngine + Sync,
{
    /// Build from raw paragraph strings, numbered in iteration order.
    pub fn build<I, T, W, U>(
        normalizer: Normalizer<S>,
        paragraphs: I,
        stopwords: W,
        config: IndexConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        W: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let paragraphs = paragraphs
            .into_iter()
            .enumerate()
            .map(|(idx, text)| Paragraph::from_text(idx, text.as_ref()))
            .collect();
        Self::build_from_paragraphs(normalizer, paragraphs, stopwords, config)
    }

    /// Build from segmented paragraphs.
    /// Paragraphs are renumbered by position; hits refer to that position.
    #[instrument(skip_all, fields(paragraphs = paragraphs.len(), num_topics = config.num_topics))]
    pub fn build_from_paragraphs<W, U>(
        normalizer: Normalizer<S>,
        paragraphs: Vec<Paragraph>,
        stopwords: W,
        config: IndexConfig,
    ) -> Result<Self>
    where
        W: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        config.validate()?;
        if paragraphs.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let paragraphs: Vec<Paragraph> = paragraphs
            .into_iter()
            .enumerate()
            .map(|(idx, p)| Paragraph::new(idx, p.into_lines()))
            .collect();

        let tokenized: Vec<Vec<String>> = paragraphs
            .iter()
            .map(|p| normalizer.normalize(&p.joined()))
            .collect();

        let mut vocabulary = Vocabulary::build(&tokenized);
        let seen = vocabulary.len();
        let removed = vocabulary.filter_tokens(stopwords);
        info!(tokens = seen, stopwords_removed = removed, vocab_size = vocabulary.len(), "vocabulary built");

        let corpus_bow: Vec<BagOfWords> = tokenized.iter().map(|tokens| vocabulary.encode(tokens)).collect();
        let tfidf = TfIdfModel::<E>::fit(&corpus_bow, vocabulary.len(), config.tfidf.normalize);
        let corpus_tfidf: Vec<TfIdfVector> = corpus_bow.par_iter().map(|bow| tfidf.transform(bow)).collect();
        info!(documents = corpus_tfidf.len(), "tf-idf model fitted");

        let lsi = LsiProjector::fit(&corpus_tfidf, vocabulary.len(), config.num_topics, &config.lsi);
        let corpus_lsi = lsi.fold_in_all(&corpus_tfidf);

        let tfidf_index = SimilarityIndex::build(corpus_tfidf);
        let lsi_index = SimilarityIndex::build(corpus_lsi);
        info!("similarity indexes built");

        Ok(Self {
            normalizer,
            paragraphs,
            vocabulary,
            tfidf,
            lsi,
            tfidf_index,
            lsi_index,
            config,
        })
    }

    /// Rank every paragraph against `text` in both spaces.
    ///
    /// The query goes through the index's own normalizer, vocabulary,
    /// TF-IDF model and projector. Unknown words are dropped and reported in
    /// [`QueryResult::dropped_tokens`]; a query with no known words scores 0
    /// against every paragraph.
    pub fn query(&self, text: &str) -> QueryResult {
        let tokens = self.normalizer.normalize(text);
        let (bow, dropped_tokens) = self.vocabulary.encode_with_dropped(&tokens);
        debug!(
            tokens = tokens.len(),
            dropped = dropped_tokens.len(),
            distinct_terms = bow.nnz(),
            "query encoded"
        );

        let query_tfidf = self.tfidf.transform(&bow);
        let mut tfidf = self.tfidf_index.query(&query_tfidf);
        tfidf.sort_by_score_desc();

        let topic_vector = self.lsi.fold_in(&query_tfidf);
        let mut lsi = self.lsi_index.query(&topic_vector);
        lsi.sort_by_score_desc();

        let weighted_terms = query_tfidf
            .iter()
            .filter_map(|(id, weight)| {
                self.vocabulary
                    .id_to_token(id)
                    .map(|token| (token.to_owned(), weight))
            })
            .collect();

        QueryResult {
            tfidf,
            lsi,
            weighted_terms,
            topic_vector,
            dropped_tokens,
        }
    }
}

impl<S, E> RetrievalIndex<S, E> {
    /// Number of indexed paragraphs.
    #[inline]
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    #[inline]
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn normalizer(&self) -> &Normalizer<S> {
        &self.normalizer
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn tfidf_model(&self) -> &TfIdfModel<E> {
        &self.tfidf
    }

    pub fn projector(&self) -> &LsiProjector {
        &self.lsi
    }

    pub fn tfidf_index(&self) -> &SimilarityIndex<TfIdfVector> {
        &self.tfidf_index
    }

    pub fn lsi_index(&self) -> &SimilarityIndex<TopicVector> {
        &self.lsi_index
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Describe one topic by its `num_terms` heaviest tokens.
    pub fn show_topic(&self, topic: usize, num_terms: usize) -> Option<Topic> {
        if topic >= self.lsi.num_topics() {
            return None;
        }
        let terms = self
            .lsi
            .show_topic(topic, num_terms)
            .into_iter()
            .filter_map(|(id, weight)| {
                self.vocabulary
                    .id_to_token(id)
                    .map(|token| (token.to_owned(), weight))
            })
            .collect();
        Some(Topic { index: topic, terms })
    }

    /// The first `num_topics` topics, strongest first.
    pub fn show_topics(&self, num_topics: usize, num_terms: usize) -> Vec<Topic> {
        (0..num_topics.min(self.lsi.num_topics()))
            .filter_map(|topic| self.show_topic(topic, num_terms))
            .collect()
    }
}
