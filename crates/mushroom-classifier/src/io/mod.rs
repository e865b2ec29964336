//! IO utilities for loading labeled training corpora.

pub mod corpus;

pub use corpus::{load_corpus, load_corpus_from_reader, CorpusReaderConfig};
