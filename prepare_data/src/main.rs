use std::path::PathBuf;

use clap::Parser;
use tagprep::{pipeline, CorpusFormat, OovPolicy, PrepareConfig, PretrainedFormat};
use tagprep_cli_util::LogArgs;

#[derive(Parser, Debug)]
#[command(
    name = "prepare_data",
    about = "A program to build dictionaries and embeddings from segmented corpora."
)]
struct Args {
    /// The directory where the dictionaries and embeddings are written
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// A segmented training corpus
    #[arg(long, required = true)]
    train: Vec<PathBuf>,

    /// A segmented test corpus
    #[arg(long)]
    test: Vec<PathBuf>,

    /// The pretrained word vectors
    #[arg(long)]
    w2v: PathBuf,

    /// The format of the pretrained word vectors: {bin, text}
    #[arg(long, default_value = "bin")]
    w2v_format: PretrainedFormat,

    /// The separator between the record identifier and the tokens
    #[arg(long, default_value = ",")]
    record_sep: char,

    /// The separator placed after each token
    #[arg(long, default_value = " ")]
    word_sep: char,

    /// The separator placed between a word and its part of speech
    #[arg(long, default_value = "/")]
    pos_sep: char,

    /// The number of reserved word indices
    #[arg(long, default_value = "2")]
    word_vocab_start: usize,

    /// The number of reserved part-of-speech indices
    #[arg(long, default_value = "1")]
    pos_vocab_start: usize,

    /// Words occurring fewer times are not added to the dictionary
    #[arg(long, default_value = "5")]
    min_count: usize,

    /// The dimension of the part-of-speech embedding
    #[arg(long, default_value = "64")]
    pos_dim: usize,

    /// The number of labels
    #[arg(long, default_value = "11")]
    n_labels: usize,

    /// How to fill rows of words without pretrained vectors: {random, zero}.
    /// zero: reproduces matrices of older versions.
    #[arg(long, default_value = "random")]
    oov: OovPolicy,

    /// The seed of the random initializers
    #[arg(long)]
    seed: Option<u64>,

    /// Keep existing embedding files instead of recomputing them
    #[arg(long)]
    no_overwrite: bool,

    /// The zstd compression level of the outputs
    #[arg(long, default_value = "19")]
    compression_level: i32,

    #[command(flatten)]
    log: LogArgs,
}

impl Args {
    fn into_config(self) -> PrepareConfig {
        let mut config = PrepareConfig::new(&self.data_dir);
        config.train_paths = self.train;
        config.test_paths = self.test;
        config.format = CorpusFormat {
            record_sep: self.record_sep,
            word_sep: self.word_sep,
            pos_sep: self.pos_sep,
        };
        config.w2v_path = self.w2v;
        config.w2v_format = self.w2v_format;
        config.word_vocab_start = self.word_vocab_start;
        config.pos_vocab_start = self.pos_vocab_start;
        config.min_word_count = self.min_count;
        config.pos_dim = self.pos_dim;
        config.n_labels = self.n_labels;
        config.oov_policy = self.oov;
        config.seed = self.seed;
        config.overwrite = !self.no_overwrite;
        config.compression_level = self.compression_level;
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.log.setup_logging(3)?;

    std::fs::create_dir_all(&args.data_dir)?;
    log::info!("Output directory: {:?}", args.data_dir);
    let config = args.into_config();
    let report = pipeline::run(&config)?;

    log::info!("# of tokens: {}", report.n_tokens);
    log::info!("# of words: {}", report.word_vocab_size);
    log::info!("# of parts of speech: {}", report.pos_vocab_size);
    log::info!("# of labels: {}", report.label_vocab_size);
    log::info!("word embedding: {:?}", report.word_embedding);
    log::info!("pos embedding: {:?}", report.pos_embedding);

    Ok(())
}
