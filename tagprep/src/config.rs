use std::path::{Path, PathBuf};

use crate::corpus::CorpusFormat;
use crate::dictionary::DictOptions;
use crate::embedding::{OovPolicy, PretrainedFormat};
use crate::errors::{Result, TagprepError};
use crate::storage::DEFAULT_COMPRESSION_LEVEL;

/// Settings of a full preparation run.
///
/// Use [`PrepareConfig::new()`] to get the standard output file names under a directory, then
/// override fields as needed.
#[derive(Clone, Debug)]
pub struct PrepareConfig {
    /// Segmented training corpora.
    pub train_paths: Vec<PathBuf>,

    /// Segmented test corpora. Their tokens are added to the dictionaries as well.
    pub test_paths: Vec<PathBuf>,

    pub format: CorpusFormat,

    /// Pretrained word vectors.
    pub w2v_path: PathBuf,
    pub w2v_format: PretrainedFormat,

    pub word_vocab_path: PathBuf,
    pub pos_vocab_path: PathBuf,
    pub label_vocab_path: PathBuf,
    pub word_emb_path: PathBuf,
    pub pos_emb_path: PathBuf,

    /// Number of reserved word indices.
    pub word_vocab_start: usize,

    /// Number of reserved part-of-speech indices.
    pub pos_vocab_start: usize,

    /// Words occurring fewer times are left out of the word dictionary.
    pub min_word_count: usize,

    /// Dimension of the part-of-speech embedding.
    pub pos_dim: usize,

    /// Labels are `"1"` to `n_labels`.
    pub n_labels: usize,

    pub oov_policy: OovPolicy,

    /// Seed of the embedding initializers. `None` uses a random seed.
    pub seed: Option<u64>,

    /// Recomputes embeddings even if their files exist.
    pub overwrite: bool,

    /// zstd compression level of the outputs.
    pub compression_level: i32,
}

impl PrepareConfig {
    /// Creates a configuration with default parameters and output files under `data_dir`.
    pub fn new<P>(data_dir: P) -> Self
    where
        P: AsRef<Path>,
    {
        let data_dir = data_dir.as_ref();
        Self {
            train_paths: vec![data_dir.join("train_seg.txt")],
            test_paths: vec![data_dir.join("test_seg.txt")],
            format: CorpusFormat::default(),
            w2v_path: data_dir.join("w2v.bin"),
            w2v_format: PretrainedFormat::Binary,
            word_vocab_path: data_dir.join("word_vocab.bin"),
            pos_vocab_path: data_dir.join("pos_vocab.bin"),
            label_vocab_path: data_dir.join("label_vocab.bin"),
            word_emb_path: data_dir.join("w2v_train.bin"),
            pos_emb_path: data_dir.join("p2v.bin"),
            word_vocab_start: 2,
            pos_vocab_start: 1,
            min_word_count: 5,
            pos_dim: 64,
            n_labels: 11,
            oov_policy: OovPolicy::default(),
            seed: None,
            overwrite: true,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Options of the word dictionary: frequency-sorted, lowercased, thresholded.
    pub const fn word_dict_options(&self) -> DictOptions {
        DictOptions::new(self.word_vocab_start)
            .min_count(self.min_word_count)
            .sort(true)
            .lower(true)
    }

    /// Options of the part-of-speech dictionary: frequency-sorted, case kept.
    pub const fn pos_dict_options(&self) -> DictOptions {
        DictOptions::new(self.pos_vocab_start).sort(true)
    }

    /// Checks values that would make the run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.train_paths.is_empty() && self.test_paths.is_empty() {
            return Err(TagprepError::invalid_argument(
                "train_paths",
                "no corpus is given",
            ));
        }
        if self.pos_dim == 0 {
            return Err(TagprepError::invalid_argument("pos_dim", "must be positive"));
        }
        let f = &self.format;
        if f.word_sep == f.pos_sep || f.word_sep == f.record_sep {
            return Err(TagprepError::invalid_argument(
                "format",
                "the word separator must differ from the other separators",
            ));
        }
        Ok(())
    }
}
