use std::io::{Read, Write};

use serde::{ser::SerializeStruct, Deserialize, Serialize};

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::text::corpus::Paragraph;
use crate::text::normalizer::{Normalizer, Stem};
use crate::vectorizer::index::SimilarityIndex;
use crate::vectorizer::lsi::{LsiProjector, TopicVector};
use crate::vectorizer::tfidf::{DefaultTfIdfEngine, TfIdfModel, TfIdfVector};
use crate::vectorizer::vocabulary::Vocabulary;
use crate::vectorizer::RetrievalIndex;

/// Deserializable form of a [`RetrievalIndex`].
///
/// It carries no normalizer, only the name of the stemmer the index was
/// built with. Use [`IndexData::into_retrieval_index`] to attach one.
#[derive(Debug, Deserialize)]
#[serde(bound = "")]
pub struct IndexData<E = DefaultTfIdfEngine> {
    pub stemmer: String,
    pub paragraphs: Vec<Paragraph>,
    pub vocabulary: Vocabulary,
    pub tfidf: TfIdfModel<E>,
    pub lsi: LsiProjector,
    pub tfidf_index: SimilarityIndex<TfIdfVector>,
    pub lsi_index: SimilarityIndex<TopicVector>,
    pub config: IndexConfig,
}

impl<E> IndexData<E> {
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_cbor::from_reader(reader)?)
    }

    /// Attach `normalizer` and restore a queryable index.
    ///
    /// Fails if the normalizer's stemmer differs from the one used at build
    /// time, since queries would then be tokenized differently than the corpus.
    pub fn into_retrieval_index<S>(self, normalizer: Normalizer<S>) -> Result<RetrievalIndex<S, E>>
    where
        S: Stem,
    {
        let found = normalizer.stemmer().name();
        if found != self.stemmer {
            return Err(Error::StemmerMismatch {
                expected: self.stemmer,
                found: found.to_owned(),
            });
        }
        Ok(RetrievalIndex {
            normalizer,
            paragraphs: self.paragraphs,
            vocabulary: self.vocabulary,
            tfidf: self.tfidf,
            lsi: self.lsi,
            tfidf_index: self.tfidf_index,
            lsi_index: self.lsi_index,
            config: self.config,
        })
    }
}

impl<S, E> Serialize for RetrievalIndex<S, E>
where
    S: Stem,
{
    /// Serializes everything but the normalizer, which is replaced by the
    /// stemmer's name. Deserialize through [`IndexData`].
    fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("RetrievalIndex", 8)?;
        state.serialize_field("stemmer", self.normalizer.stemmer().name())?;
        state.serialize_field("paragraphs", &self.paragraphs)?;
        state.serialize_field("vocabulary", &self.vocabulary)?;
        state.serialize_field("tfidf", &self.tfidf)?;
        state.serialize_field("lsi", &self.lsi)?;
        state.serialize_field("tfidf_index", &self.tfidf_index)?;
        state.serialize_field("lsi_index", &self.lsi_index)?;
        state.serialize_field("config", &self.config)?;
        state.end()
    }
}

impl<S, E> RetrievalIndex<S, E>
where
    S: Stem,
{
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        Ok(serde_cbor::to_writer(writer, self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::normalizer::{NoStemmer, SnowballStemmer};

    fn index() -> RetrievalIndex {
        RetrievalIndex::build(
            Normalizer::default(),
            [
                "The division of labour increases productive powers.",
                "Money is the great wheel of circulation.",
                "The wages of labour rise with the demand for labour.",
            ],
            ["the", "of"],
            IndexConfig::default().with_num_topics(2),
        )
        .unwrap()
    }

    #[test]
    fn cbor_round_trip_answers_queries_identically() {
        let original = index();
        let bytes = original.to_cbor().unwrap();
        let restored: RetrievalIndex = IndexData::from_cbor(&bytes)
            .unwrap()
            .into_retrieval_index(Normalizer::new(SnowballStemmer::new()))
            .unwrap();

        assert_eq!(restored.vocabulary(), original.vocabulary());
        assert_eq!(restored.paragraphs(), original.paragraphs());
        let a = original.query("labour wages");
        let b = restored.query("labour wages");
        assert_eq!(a.tfidf, b.tfidf);
        assert_eq!(a.lsi, b.lsi);
    }

    #[test]
    fn writer_and_reader_agree() {
        let original = index();
        let mut buf = Vec::new();
        original.to_writer(&mut buf).unwrap();
        let data: IndexData = IndexData::from_reader(buf.as_slice()).unwrap();
        assert_eq!(data.stemmer, "snowball");
        assert_eq!(data.paragraphs.len(), 3);
    }

    #[test]
    fn restoring_with_another_stemmer_fails() {
        let bytes = index().to_cbor().unwrap();
        let data: IndexData = IndexData::from_cbor(&bytes).unwrap();
        let err = data.into_retrieval_index(Normalizer::new(NoStemmer)).unwrap_err();
        assert!(matches!(err, Error::StemmerMismatch { .. }));
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let err = IndexData::<DefaultTfIdfEngine>::from_cbor(&[0xff, 0x00, 0x13]).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
