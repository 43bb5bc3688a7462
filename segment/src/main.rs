use std::fs::File;
use std::io::{stdin, stdout, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tagprep::{SegmentOptions, Segmenter, VaporettoTagger};
use tagprep_cli_util::LogArgs;

#[derive(Parser, Debug)]
#[command(
    name = "segment",
    about = "A program to split raw text into word/part-of-speech tokens."
)]
struct Args {
    /// The Vaporetto model file (zstd-compressed) to use when analyzing text
    #[arg(long)]
    model: PathBuf,

    /// The raw text file. Reads stdin if not specified.
    #[arg(long)]
    input: Option<PathBuf>,

    /// The file to write the segmented text to. Writes stdout if not specified.
    #[arg(long)]
    output: Option<PathBuf>,

    /// The separator placed after each token
    #[arg(long, default_value = " ")]
    word_sep: char,

    /// The separator placed between a word and its part of speech
    #[arg(long, default_value = "/")]
    pos_sep: char,

    /// Copy the record identifier before the first occurrence of this character without tagging
    #[arg(long)]
    record_sep: Option<char>,

    /// The part of speech of tokens the model gives no tag
    #[arg(long, default_value = "x")]
    default_tag: String,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.log.setup_logging(3)?;

    log::info!("Loading model file...");
    let mut f = zstd::Decoder::new(File::open(&args.model)?)?;
    let tagger = VaporettoTagger::read(&mut f)?.default_tag(args.default_tag);

    let opts = SegmentOptions {
        word_sep: args.word_sep,
        pos_sep: args.pos_sep,
        record_sep: args.record_sep,
    };
    let mut segmenter = Segmenter::new(tagger, opts);

    log::info!("Start segmentation");
    let start = Instant::now();
    let n_lines = match (&args.input, &args.output) {
        (Some(input), Some(output)) => segmenter.segment_file(input, output)?,
        (Some(input), None) => {
            let rdr = BufReader::new(File::open(input)?);
            segmenter.segment(rdr, BufWriter::new(stdout().lock()))?
        }
        (None, Some(output)) => {
            segmenter.segment(stdin().lock(), BufWriter::new(File::create(output)?))?
        }
        (None, None) => segmenter.segment(stdin().lock(), BufWriter::new(stdout().lock()))?,
    };
    let duration = start.elapsed();
    log::info!("# of lines: {n_lines}");
    log::info!("Elapsed: {} [sec]", duration.as_secs_f64());

    Ok(())
}
