pub mod corpus;
pub mod normalizer;
