use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::errors::Result;

/// A word with its part-of-speech tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaggedToken {
    pub word: String,
    pub pos: String,
}

impl TaggedToken {
    pub fn new<W, P>(word: W, pos: P) -> Self
    where
        W: Into<String>,
        P: Into<String>,
    {
        Self {
            word: word.into(),
            pos: pos.into(),
        }
    }
}

/// Tokenizer and part-of-speech tagger used by [`Segmenter`].
pub trait PosTagger {
    /// Splits `text` into tagged tokens.
    ///
    /// # Errors
    ///
    /// Implementations return [`TagprepError::Tagger`](crate::TagprepError::Tagger) when the
    /// underlying tagger fails.
    fn tag(&mut self, text: &str) -> Result<Vec<TaggedToken>>;
}

/// Output format of [`Segmenter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentOptions {
    pub word_sep: char,
    pub pos_sep: char,

    /// If set, the part of each line up to and including the first occurrence of this
    /// character is copied to the output without tagging.
    pub record_sep: Option<char>,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            word_sep: ' ',
            pos_sep: '/',
            record_sep: None,
        }
    }
}

/// Converts raw text lines into `word/pos` annotated lines.
pub struct Segmenter<T> {
    tagger: T,
    opts: SegmentOptions,
}

impl<T> Segmenter<T>
where
    T: PosTagger,
{
    pub const fn new(tagger: T, opts: SegmentOptions) -> Self {
        Self { tagger, opts }
    }

    /// Segments a single line and appends the result to `buf` without a line break.
    ///
    /// Tokens that are whitespace-only or contain the word separator are dropped since they
    /// cannot be represented in the output format.
    pub fn segment_line(&mut self, line: &str, buf: &mut String) -> Result<()> {
        let mut text = line.trim();
        if let Some(sep) = self.opts.record_sep {
            if let Some((record_id, rest)) = text.split_once(sep) {
                buf.push_str(record_id);
                buf.push(sep);
                text = rest.trim_start();
            }
        }
        for token in self.tagger.tag(text)? {
            if token.word.trim().is_empty() || token.word.contains(self.opts.word_sep) {
                log::debug!("dropping token {:?}/{:?}", token.word, token.pos);
                continue;
            }
            buf.push_str(&token.word);
            buf.push(self.opts.pos_sep);
            buf.push_str(&token.pos);
            buf.push(self.opts.word_sep);
        }
        Ok(())
    }

    /// Segments every line of `rdr` into `wtr`, one output line per input line.
    ///
    /// # Returns
    ///
    /// The number of input lines.
    pub fn segment<R, W>(&mut self, rdr: R, mut wtr: W) -> Result<usize>
    where
        R: BufRead,
        W: Write,
    {
        let mut n_lines = 0;
        let mut buf = String::new();
        for line in rdr.lines() {
            buf.clear();
            self.segment_line(&line?, &mut buf)?;
            buf.push('\n');
            wtr.write_all(buf.as_bytes())?;
            n_lines += 1;
            if n_lines % 10000 == 0 {
                log::debug!("# of lines: {n_lines}");
            }
        }
        wtr.flush()?;
        Ok(n_lines)
    }

    /// Segments `in_path` into `out_path`.
    ///
    /// # Errors
    ///
    /// Fails when the input cannot be read or the output cannot be created.
    pub fn segment_file<P, Q>(&mut self, in_path: P, out_path: Q) -> Result<usize>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let rdr = BufReader::new(File::open(in_path.as_ref())?);
        let wtr = BufWriter::new(File::create(out_path.as_ref())?);
        let n_lines = self.segment(rdr, wtr)?;
        log::info!("input file size: {n_lines}");
        Ok(n_lines)
    }

    pub fn into_inner(self) -> T {
        self.tagger
    }
}

#[cfg(feature = "vaporetto")]
mod vaporetto_tagger {
    use std::io::Read;

    use vaporetto::{Model, Predictor, Sentence};

    use super::{PosTagger, TaggedToken};
    use crate::errors::{Result, TagprepError};

    /// [`PosTagger`] backed by a Vaporetto model with tag prediction.
    ///
    /// The first tag of each token is used as its part of speech.
    pub struct VaporettoTagger {
        predictor: Predictor,
        default_tag: String,
    }

    impl VaporettoTagger {
        /// Creates a tagger from a decompressed Vaporetto model.
        ///
        /// # Errors
        ///
        /// When the model cannot be read or does not support tag prediction, an error variant
        /// will be returned.
        pub fn read<R>(rdr: &mut R) -> Result<Self>
        where
            R: Read,
        {
            let model = Model::read(rdr).map_err(|e| TagprepError::Tagger(e.to_string()))?;
            let predictor =
                Predictor::new(model, true).map_err(|e| TagprepError::Tagger(e.to_string()))?;
            Ok(Self {
                predictor,
                default_tag: "x".to_string(),
            })
        }

        /// Sets the tag used for tokens without a predicted tag.
        pub fn default_tag<S>(mut self, tag: S) -> Self
        where
            S: Into<String>,
        {
            self.default_tag = tag.into();
            self
        }
    }

    impl PosTagger for VaporettoTagger {
        fn tag(&mut self, text: &str) -> Result<Vec<TaggedToken>> {
            if text.is_empty() {
                return Ok(vec![]);
            }
            let mut sentence =
                Sentence::from_raw(text).map_err(|e| TagprepError::Tagger(e.to_string()))?;
            self.predictor.predict(&mut sentence);
            sentence.fill_tags();
            Ok(tagged_tokens(&sentence, &self.default_tag))
        }
    }

    /// Takes the first tag of each token, or `default_tag` if it has none.
    fn tagged_tokens(sentence: &Sentence, default_tag: &str) -> Vec<TaggedToken> {
        sentence
            .iter_tokens()
            .map(|token| {
                let pos = token
                    .tags()
                    .first()
                    .and_then(|tag| tag.as_deref())
                    .unwrap_or(default_tag);
                TaggedToken::new(token.surface(), pos)
            })
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use vaporetto::{SolverType, Trainer};

        #[test]
        fn test_tagged_tokens() {
            let sentence = Sentence::from_tokenized("火星/名詞/カセー に 行き/動詞").unwrap();

            assert_eq!(
                vec![
                    TaggedToken::new("火星", "名詞"),
                    TaggedToken::new("に", "x"),
                    TaggedToken::new("行き", "動詞"),
                ],
                tagged_tokens(&sentence, "x")
            );
        }

        #[test]
        fn test_tagged_tokens_untagged_sentence() {
            let sentence = Sentence::from_tokenized("火星 に").unwrap();

            assert_eq!(
                vec![TaggedToken::new("火星", "w"), TaggedToken::new("に", "w")],
                tagged_tokens(&sentence, "w")
            );
        }

        fn trained_tagger() -> VaporettoTagger {
            let sentences: Vec<_> = [
                "火星/名詞 に/助詞 行き/動詞 まし/助動詞 た/助動詞",
                "火星/名詞 の/助詞 猫/名詞 だ/助動詞",
                "猫/名詞 に/助詞 行き/動詞 まし/助動詞 た/助動詞",
                "社長/名詞 の/助詞 猫/名詞 だ/助動詞",
            ]
            .iter()
            .map(|s| Sentence::from_tokenized(s).unwrap())
            .collect();
            let mut trainer = Trainer::new(3, 3, 3, 3, vec![], 0, &[]).unwrap();
            for s in &sentences {
                trainer.add_example(s);
            }
            let model = trainer
                .train(0.01, 1., SolverType::L1RegularizedL2LossSVC)
                .unwrap();

            let mut buf = vec![];
            model.write(&mut buf).unwrap();
            VaporettoTagger::read(&mut buf.as_slice()).unwrap()
        }

        #[test]
        fn test_vaporetto_tagger() {
            let mut tagger = trained_tagger().default_tag("UNK");
            let text = "火星の猫だ";
            let tokens = tagger.tag(text).unwrap();

            assert!(!tokens.is_empty());
            let surface: String = tokens.iter().map(|t| t.word.as_str()).collect();
            assert_eq!(text, surface);
            for token in &tokens {
                assert!(
                    ["名詞", "助詞", "動詞", "助動詞", "UNK"].contains(&token.pos.as_str()),
                    "unexpected tag {:?}",
                    token.pos
                );
            }
        }

        #[test]
        fn test_vaporetto_tagger_empty_text() {
            let mut tagger = trained_tagger();

            assert!(tagger.tag("").unwrap().is_empty());
        }
    }
}

#[cfg(feature = "vaporetto")]
pub use vaporetto_tagger::VaporettoTagger;

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempdir::TempDir;

    use crate::corpus::CorpusFormat;
    use crate::errors::TagprepError;

    /// Splits on whitespace and tags digits as `m` and everything else as `n`.
    struct WhitespaceTagger;

    impl PosTagger for WhitespaceTagger {
        fn tag(&mut self, text: &str) -> Result<Vec<TaggedToken>> {
            Ok(text
                .split_whitespace()
                .map(|w| {
                    let pos = if w.chars().all(|c| c.is_ascii_digit()) {
                        "m"
                    } else {
                        "n"
                    };
                    TaggedToken::new(w, pos)
                })
                .collect())
        }
    }

    struct FixedTagger(Vec<TaggedToken>);

    impl PosTagger for FixedTagger {
        fn tag(&mut self, _: &str) -> Result<Vec<TaggedToken>> {
            Ok(self.0.clone())
        }
    }

    struct FailingTagger;

    impl PosTagger for FailingTagger {
        fn tag(&mut self, _: &str) -> Result<Vec<TaggedToken>> {
            Err(TagprepError::Tagger("broken".to_string()))
        }
    }

    #[test]
    fn test_segment_line() {
        let mut segmenter = Segmenter::new(WhitespaceTagger, SegmentOptions::default());
        let mut buf = String::new();
        segmenter.segment_line("buy 3 apples\n", &mut buf).unwrap();

        assert_eq!("buy/n 3/m apples/n ", buf);
    }

    #[test]
    fn test_segment_line_custom_separators() {
        let opts = SegmentOptions {
            word_sep: '|',
            pos_sep: '_',
            record_sep: None,
        };
        let mut segmenter = Segmenter::new(WhitespaceTagger, opts);
        let mut buf = String::new();
        segmenter.segment_line("a b", &mut buf).unwrap();

        assert_eq!("a_n|b_n|", buf);
    }

    #[test]
    fn test_segment_line_record_id() {
        let opts = SegmentOptions {
            record_sep: Some(','),
            ..SegmentOptions::default()
        };
        let mut segmenter = Segmenter::new(WhitespaceTagger, opts);
        let mut buf = String::new();
        segmenter.segment_line("42, two words", &mut buf).unwrap();

        assert_eq!("42,two/n words/n ", buf);
    }

    #[test]
    fn test_segment_line_drops_unrepresentable_tokens() {
        let tagger = FixedTagger(vec![
            TaggedToken::new("a", "n"),
            TaggedToken::new(" ", "x"),
            TaggedToken::new("b c", "n"),
            TaggedToken::new("d/e", "n"),
        ]);
        let mut segmenter = Segmenter::new(tagger, SegmentOptions::default());
        let mut buf = String::new();
        segmenter.segment_line("ignored", &mut buf).unwrap();

        assert_eq!("a/n d/e/n ", buf);
    }

    #[test]
    fn test_segment_counts_lines() {
        let mut segmenter = Segmenter::new(WhitespaceTagger, SegmentOptions::default());
        let mut out = vec![];
        let n = segmenter.segment("x y\n\n7\n".as_bytes(), &mut out).unwrap();

        assert_eq!(3, n);
        assert_eq!("x/n y/n \n\n7/m \n", String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_segment_propagates_tagger_error() {
        let mut segmenter = Segmenter::new(FailingTagger, SegmentOptions::default());
        let r = segmenter.segment("text\n".as_bytes(), Vec::<u8>::new());

        assert_eq!("TaggerError: broken", r.unwrap_err().to_string());
    }

    #[test]
    fn test_segment_file_feeds_corpus_loader() {
        let dir = TempDir::new("tagprep_segment").unwrap();
        let raw = dir.path().join("raw.txt");
        let seg = dir.path().join("seg.txt");
        fs::write(&raw, "1,the 2 cats\n2,a dog\n").unwrap();

        let opts = SegmentOptions {
            record_sep: Some(','),
            ..SegmentOptions::default()
        };
        let n = Segmenter::new(WhitespaceTagger, opts)
            .segment_file(&raw, &seg)
            .unwrap();
        assert_eq!(2, n);

        let corpus = crate::corpus::Corpus::load(&[&seg], &CorpusFormat::default()).unwrap();
        assert_eq!(vec!["the", "2", "cats", "a", "dog"], corpus.words);
        assert_eq!(vec!["n", "m", "n", "n", "n"], corpus.tags);
    }

    #[test]
    fn test_segment_file_missing_input() {
        let dir = TempDir::new("tagprep_segment").unwrap();
        let r = Segmenter::new(WhitespaceTagger, SegmentOptions::default())
            .segment_file(dir.path().join("none.txt"), dir.path().join("out.txt"));

        assert!(matches!(r, Err(TagprepError::IOError(_))));
    }
}
