use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::{Result, TagprepError};

/// Separators of a segmented corpus line: `<id><record_sep><word><pos_sep><tag><word_sep>...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorpusFormat {
    pub record_sep: char,
    pub word_sep: char,
    pub pos_sep: char,
}

impl Default for CorpusFormat {
    fn default() -> Self {
        Self {
            record_sep: ',',
            word_sep: ' ',
            pos_sep: '/',
        }
    }
}

impl CorpusFormat {
    /// Splits one segmented line into `(word, tag)` pairs.
    ///
    /// The record identifier before the first `record_sep` is discarded, and each chunk is split
    /// at the *last* `pos_sep` so that words may contain the separator themselves.
    ///
    /// # Errors
    ///
    /// Returns a message describing the violation when the line has no record separator, has
    /// an empty chunk, or has a chunk without a part-of-speech separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagprep::CorpusFormat;
    ///
    /// let tokens = CorpusFormat::default().parse_line("id1,foo/bar/N").unwrap();
    /// assert_eq!(vec![("foo/bar", "N")], tokens);
    /// ```
    pub fn parse_line<'a>(&self, line: &'a str) -> Result<Vec<(&'a str, &'a str)>, String> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let line = line.strip_suffix(self.word_sep).unwrap_or(line);
        let (_, sentence) = line
            .split_once(self.record_sep)
            .ok_or_else(|| format!("no record separator {:?}", self.record_sep))?;
        let mut tokens = vec![];
        for chunk in sentence.split(self.word_sep) {
            if chunk.is_empty() {
                return Err(format!("empty token after {} tokens", tokens.len()));
            }
            let (word, tag) = chunk.rsplit_once(self.pos_sep).ok_or_else(|| {
                format!(
                    "token {:?} has no part-of-speech separator {:?}",
                    chunk, self.pos_sep
                )
            })?;
            tokens.push((word, tag));
        }
        Ok(tokens)
    }
}

/// Words and tags of segmented corpora as parallel sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    pub words: Vec<String>,
    pub tags: Vec<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Appends every line of `rdr`.
    ///
    /// `name` is only used to report errors.
    ///
    /// # Returns
    ///
    /// The number of lines appended.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line; nothing after it is appended.
    pub fn extend_from_reader<R>(
        &mut self,
        rdr: R,
        name: &Path,
        format: &CorpusFormat,
    ) -> Result<usize>
    where
        R: BufRead,
    {
        let mut n_lines = 0;
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            let tokens = format
                .parse_line(&line)
                .map_err(|msg| TagprepError::malformed_corpus(name, i + 1, msg))?;
            for (word, tag) in tokens {
                self.words.push(word.to_string());
                self.tags.push(tag.to_string());
            }
            n_lines += 1;
        }
        Ok(n_lines)
    }

    /// Loads segmented files in the given order.
    ///
    /// # Errors
    ///
    /// A missing file or a malformed line fails the whole load.
    pub fn load<P>(paths: &[P], format: &CorpusFormat) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut corpus = Self::new();
        for path in paths {
            let path = path.as_ref();
            log::info!("Loading {path:?} ...");
            let rdr = BufReader::new(File::open(path)?);
            let n_lines = corpus.extend_from_reader(rdr, path, format)?;
            log::info!("# of lines: {n_lines}, # of tokens: {}", corpus.len());
        }
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempdir::TempDir;

    #[test]
    fn test_parse_line() {
        let tokens = CorpusFormat::default()
            .parse_line("id123,word1/N word2/V")
            .unwrap();

        assert_eq!(vec![("word1", "N"), ("word2", "V")], tokens);
    }

    #[test]
    fn test_parse_line_separator_in_word() {
        let tokens = CorpusFormat::default().parse_line("id1,foo/bar/N").unwrap();

        assert_eq!(vec![("foo/bar", "N")], tokens);
    }

    #[test]
    fn test_parse_line_comma_in_sentence() {
        let tokens = CorpusFormat::default().parse_line("7,a/x ,/w b/x").unwrap();

        assert_eq!(vec![("a", "x"), (",", "w"), ("b", "x")], tokens);
    }

    #[test]
    fn test_parse_line_trailing_separator() {
        let tokens = CorpusFormat::default()
            .parse_line("id,今天/t 天气/n \r\n")
            .unwrap();

        assert_eq!(vec![("今天", "t"), ("天气", "n")], tokens);
    }

    #[test]
    fn test_parse_line_empty_word() {
        let tokens = CorpusFormat::default().parse_line("id,/x").unwrap();

        assert_eq!(vec![("", "x")], tokens);
    }

    #[test]
    fn test_parse_line_no_record_separator() {
        let r = CorpusFormat::default().parse_line("word1/N word2/V");

        assert_eq!("no record separator ','", r.unwrap_err());
    }

    #[test]
    fn test_parse_line_no_pos_separator() {
        let r = CorpusFormat::default().parse_line("id,word1/N word2");

        assert_eq!(
            "token \"word2\" has no part-of-speech separator '/'",
            r.unwrap_err()
        );
    }

    #[test]
    fn test_parse_line_many_trailing_separators() {
        let r = CorpusFormat::default().parse_line("id,a/N   ");

        assert_eq!("empty token after 1 tokens", r.unwrap_err());
    }

    #[test]
    fn test_parse_line_empty_chunk() {
        let r = CorpusFormat::default().parse_line("id,a/N  b/V");

        assert_eq!("empty token after 1 tokens", r.unwrap_err());
    }

    #[test]
    fn test_parse_line_custom_format() {
        let format = CorpusFormat {
            record_sep: '\t',
            word_sep: '|',
            pos_sep: '_',
        };
        let tokens = format.parse_line("1\tnew_york_NNP|is_VBZ").unwrap();

        assert_eq!(vec![("new_york", "NNP"), ("is", "VBZ")], tokens);
    }

    #[test]
    fn test_extend_from_reader() {
        let data = "1,a/N b/V\n2,c/N\n";
        let mut corpus = Corpus::new();
        let n = corpus
            .extend_from_reader(data.as_bytes(), Path::new("mem"), &CorpusFormat::default())
            .unwrap();

        assert_eq!(2, n);
        assert_eq!(vec!["a", "b", "c"], corpus.words);
        assert_eq!(vec!["N", "V", "N"], corpus.tags);
    }

    #[test]
    fn test_extend_from_reader_reports_line() {
        let data = "1,a/N\n2,b\n";
        let mut corpus = Corpus::new();
        let r = corpus.extend_from_reader(
            data.as_bytes(),
            Path::new("train.txt"),
            &CorpusFormat::default(),
        );

        assert_eq!(
            "MalformedCorpusError: train.txt:2: token \"b\" has no part-of-speech separator '/'",
            r.unwrap_err().to_string()
        );
    }

    #[test]
    fn test_extend_from_reader_blank_line() {
        let data = "1,a/N\n   \n2,b/V\n";
        let mut corpus = Corpus::new();
        let r = corpus.extend_from_reader(
            data.as_bytes(),
            Path::new("train.txt"),
            &CorpusFormat::default(),
        );

        match r {
            Err(TagprepError::MalformedCorpus { line, msg, .. }) => {
                assert_eq!(2, line);
                assert_eq!("no record separator ','", msg);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_file_order() {
        let dir = TempDir::new("tagprep_corpus").unwrap();
        let train = dir.path().join("train.txt");
        let test = dir.path().join("test.txt");
        fs::write(&train, "1,x/A y/B\n2,z/C\n").unwrap();
        fs::write(&test, "3,w/D\n").unwrap();

        let corpus = Corpus::load(&[&train, &test], &CorpusFormat::default()).unwrap();

        assert_eq!(vec!["x", "y", "z", "w"], corpus.words);
        assert_eq!(vec!["A", "B", "C", "D"], corpus.tags);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new("tagprep_corpus").unwrap();
        let r = Corpus::load(&[dir.path().join("missing.txt")], &CorpusFormat::default());

        match r {
            Err(TagprepError::IOError(e)) => {
                assert_eq!(std::io::ErrorKind::NotFound, e.kind());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
