use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tagprep::{pipeline, Dictionary};
use tagprep_cli_util::LogArgs;

#[derive(Parser, Debug)]
#[command(
    name = "dump_vocab",
    about = "A program to export dictionaries built by prepare_data."
)]
struct Args {
    /// Input path of the dictionary file
    #[arg(long)]
    vocab: PathBuf,

    /// Output path of the CSV file. Writes stdout if not specified.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    log: LogArgs,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
struct VocabRecord {
    token: String,
    index: usize,
}

fn write_records<W>(dict: &Dictionary, wtr: W) -> Result<(), Box<dyn std::error::Error>>
where
    W: std::io::Write,
{
    let mut wtr = csv::Writer::from_writer(wtr);
    for (token, index) in dict.iter() {
        wtr.serialize(VocabRecord {
            token: token.to_string(),
            index,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    args.log.setup_logging(2)?;

    log::info!("Loading dictionary file...");
    let dict = pipeline::load_dictionary(&args.vocab)?;
    log::info!(
        "# of entries: {}, indices: {}..{}",
        dict.len(),
        dict.start(),
        dict.end()
    );

    match args.out {
        Some(path) => write_records(&dict, File::create(path)?)?,
        None => write_records(&dict, stdout().lock())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tagprep::DictOptions;

    #[test]
    fn test_write_records() {
        let dict = Dictionary::build(["b", "a", "b"], &DictOptions::new(2).sort(true));
        let mut buf = Vec::<u8>::new();
        write_records(&dict, &mut buf).unwrap();

        assert_eq!("token,index\nb,2\na,3\n", String::from_utf8(buf).unwrap());

        let mut rdr = csv::Reader::from_reader("token,index\nb,2\n".as_bytes());
        let record: VocabRecord = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(
            VocabRecord {
                token: "b".to_string(),
                index: 2
            },
            record
        );
    }
}
