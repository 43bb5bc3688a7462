use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use tagprep::{storage, PretrainedVectors};
use tagprep_cli_util::LogArgs;

#[derive(Parser, Debug)]
#[command(
    name = "convert_vectors",
    about = "A program to convert word2vec text vectors into the binary format of Tagprep."
)]
struct Args {
    /// Word vectors in the word2vec text format
    #[arg(long)]
    text_in: PathBuf,

    /// Output path of the binary vectors
    #[arg(long)]
    bin_out: PathBuf,

    /// The zstd compression level of the output
    #[arg(long, default_value = "19")]
    compression_level: i32,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.log.setup_logging(3)?;

    log::info!("Loading vector file...");
    let vectors = PretrainedVectors::read_text(BufReader::new(File::open(args.text_in)?))?;
    log::info!("# of vectors: {}, dim: {}", vectors.len(), vectors.dim());

    log::info!("Saving vector file...");
    storage::create(&args.bin_out, args.compression_level, |wtr| {
        vectors.write(wtr)
    })?;

    Ok(())
}
