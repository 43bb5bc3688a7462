//! The full preparation run: corpora → dictionaries → embeddings.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use crate::config::PrepareConfig;
use crate::corpus::Corpus;
use crate::dictionary::Dictionary;
use crate::embedding::{
    init_pos_embedding, init_word_embedding, rng_from_seed, PretrainedFormat, PretrainedVectors,
};
use crate::errors::Result;
use crate::storage::{self, BuildStatus};

/// Word, part-of-speech, and label dictionaries of a corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabularies {
    pub word: Dictionary,
    pub pos: Dictionary,
    pub label: Dictionary,
}

impl Vocabularies {
    /// Builds the three dictionaries with the options of `config`.
    pub fn build(corpus: &Corpus, config: &PrepareConfig) -> Self {
        Self {
            word: Dictionary::build(&corpus.words, &config.word_dict_options()),
            pos: Dictionary::build(&corpus.tags, &config.pos_dict_options()),
            label: Dictionary::label_dictionary(config.n_labels),
        }
    }

    /// Writes the dictionaries to their configured paths, replacing existing files.
    pub fn save(&self, config: &PrepareConfig) -> Result<()> {
        for (dict, path) in [
            (&self.word, &config.word_vocab_path),
            (&self.pos, &config.pos_vocab_path),
            (&self.label, &config.label_vocab_path),
        ] {
            storage::create(path, config.compression_level, |wtr| dict.write(wtr))?;
            log::info!("save {path:?} ok. (# of entries: {})", dict.len());
        }
        Ok(())
    }
}

/// Reads a dictionary stored by [`Vocabularies::save()`].
pub fn load_dictionary<P>(path: P) -> Result<Dictionary>
where
    P: AsRef<Path>,
{
    Dictionary::read(&mut storage::open(path)?)
}

/// Reads pretrained vectors in the given format.
pub fn load_pretrained<P>(path: P, format: PretrainedFormat) -> Result<PretrainedVectors>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    log::info!("Loading {path:?} ...");
    let vectors = match format {
        PretrainedFormat::Binary => PretrainedVectors::read(&mut storage::open(path)?)?,
        PretrainedFormat::Text => PretrainedVectors::read_text(BufReader::new(File::open(path)?))?,
    };
    log::info!("# of vectors: {}, dim: {}", vectors.len(), vectors.dim());
    Ok(vectors)
}

/// Builds the word embedding from the stored word dictionary and the pretrained vectors.
///
/// Nothing is read or computed when the output exists and `overwrite` is false.
pub fn build_word_embedding(config: &PrepareConfig, overwrite: bool) -> Result<BuildStatus> {
    storage::build_cached(
        &config.word_emb_path,
        overwrite,
        config.compression_level,
        || {
            let pretrained = load_pretrained(&config.w2v_path, config.w2v_format)?;
            let dict = load_dictionary(&config.word_vocab_path)?;
            let mut rng = rng_from_seed(config.seed);
            Ok(init_word_embedding(
                &dict,
                &pretrained,
                config.oov_policy,
                &mut rng,
            ))
        },
        |emb, wtr| emb.write(wtr),
    )
}

/// Builds the part-of-speech embedding from the stored part-of-speech dictionary.
///
/// Nothing is read or computed when the output exists and `overwrite` is false.
pub fn build_pos_embedding(config: &PrepareConfig, overwrite: bool) -> Result<BuildStatus> {
    storage::build_cached(
        &config.pos_emb_path,
        overwrite,
        config.compression_level,
        || {
            let dict = load_dictionary(&config.pos_vocab_path)?;
            // Separate stream from the word embedding.
            let mut rng = rng_from_seed(config.seed.map(|seed| seed ^ 0x9e37_79b9_7f4a_7c15));
            Ok(init_pos_embedding(&dict, config.pos_dim, &mut rng))
        },
        |emb, wtr| emb.write(wtr),
    )
}

/// Summary of [`run()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineReport {
    pub n_tokens: usize,
    pub word_vocab_size: usize,
    pub pos_vocab_size: usize,
    pub label_vocab_size: usize,
    pub word_embedding: BuildStatus,
    pub pos_embedding: BuildStatus,
}

/// Runs every stage in order.
///
/// Dictionaries are always rewritten; embeddings follow `config.overwrite`.
pub fn run(config: &PrepareConfig) -> Result<PipelineReport> {
    config.validate()?;
    let start = Instant::now();

    log::info!("build train vocab...");
    let paths: Vec<_> = config
        .train_paths
        .iter()
        .chain(&config.test_paths)
        .collect();
    let corpus = Corpus::load(&paths, &config.format)?;
    let vocabs = Vocabularies::build(&corpus, config);
    vocabs.save(config)?;

    log::info!("build embedding...");
    let word_embedding = build_word_embedding(config, config.overwrite)?;
    let pos_embedding = build_pos_embedding(config, config.overwrite)?;

    log::info!("spend time: {} [sec]", start.elapsed().as_secs_f64());
    Ok(PipelineReport {
        n_tokens: corpus.len(),
        word_vocab_size: vocabs.word.len(),
        pos_vocab_size: vocabs.pos.len(),
        label_vocab_size: vocabs.label.len(),
        word_embedding,
        pos_embedding,
    })
}
