#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Tagprep
//!
//! Tagprep prepares part-of-speech annotated corpora for neural sequence-labeling models. It
//! segments raw text into `word/pos` lines, builds word, part-of-speech, and label
//! dictionaries, and initializes embedding matrices from pretrained word vectors.
//!
//! ## Examples
//!
//! ```no_run
//! use tagprep::{pipeline, PrepareConfig};
//!
//! let mut config = PrepareConfig::new("data");
//! config.seed = Some(42);
//! let report = pipeline::run(&config).unwrap();
//! println!("# of words: {}", report.word_vocab_size);
//! ```
//!
//! Segmentation with a Vaporetto model requires **crate feature** `vaporetto`. For more
//! details, see [`Segmenter`].

mod config;
mod corpus;
mod dictionary;
mod embedding;
mod errors;
mod segmenter;

pub mod pipeline;
pub mod storage;

pub use config::PrepareConfig;
pub use corpus::{Corpus, CorpusFormat};
pub use dictionary::{DictOptions, Dictionary};
pub use embedding::{
    init_pos_embedding, init_word_embedding, rng_from_seed, EmbeddingMatrix, OovPolicy,
    PretrainedFormat, PretrainedVectors, OOV_VECTOR_BOUND,
};
pub use errors::{Result, TagprepError};
pub use segmenter::{PosTagger, SegmentOptions, Segmenter, TaggedToken};
pub use storage::BuildStatus;

#[cfg(feature = "vaporetto")]
#[cfg_attr(docsrs, doc(cfg(feature = "vaporetto")))]
pub use segmenter::VaporettoTagger;
