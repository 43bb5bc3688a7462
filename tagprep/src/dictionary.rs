use std::io::{Read, Write};

use hashbrown::HashMap;

use crate::errors::{Result, TagprepError};

/// Options for [`Dictionary::build`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DictOptions {
    /// The first index to assign. Indices below it are reserved for the caller.
    pub start: usize,

    /// Tokens that occur fewer times than this are dropped. `None` keeps every token.
    pub min_count: Option<usize>,

    /// Orders tokens by descending frequency instead of first-seen order.
    pub sort: bool,

    /// Lowercases tokens before counting.
    pub lower: bool,
}

impl DictOptions {
    /// Creates options that keep every token in first-seen order.
    pub const fn new(start: usize) -> Self {
        Self {
            start,
            min_count: None,
            sort: false,
            lower: false,
        }
    }

    pub const fn min_count(mut self, min_count: usize) -> Self {
        self.min_count = Some(min_count);
        self
    }

    pub const fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub const fn lower(mut self, lower: bool) -> Self {
        self.lower = lower;
        self
    }
}

/// Counts distinct tokens while remembering the order in which they first appeared.
struct FrequencyCounter {
    ids: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl FrequencyCounter {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            entries: vec![],
        }
    }

    fn add(&mut self, token: &str) {
        if let Some(&id) = self.ids.get(token) {
            self.entries[id].1 += 1;
        } else {
            let id = self.entries.len();
            self.ids.insert(token.to_string(), id);
            self.entries.push((token.to_string(), 1));
        }
    }

    fn into_entries(self) -> Vec<(String, usize)> {
        self.entries
    }
}

/// Immutable mapping from tokens to contiguous indices.
///
/// Indices start at [`Dictionary::start()`] and end right before [`Dictionary::end()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    start: usize,
    tokens: Vec<String>,
    ids: HashMap<String, usize>,
}

impl Dictionary {
    /// Builds a dictionary from a token sequence.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Tokens in corpus order.
    /// * `opts` - Offset, frequency threshold, ordering, and case options.
    ///
    /// # Returns
    ///
    /// A new [`Dictionary`]. An empty input yields an empty dictionary.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagprep::{DictOptions, Dictionary};
    ///
    /// let tokens = ["a", "a", "b", "c", "c", "c"];
    /// let opts = DictOptions::new(2).min_count(2).sort(true);
    /// let dict = Dictionary::build(tokens, &opts);
    ///
    /// assert_eq!(Some(2), dict.get("c"));
    /// assert_eq!(Some(3), dict.get("a"));
    /// assert_eq!(None, dict.get("b"));
    /// ```
    pub fn build<I, S>(tokens: I, opts: &DictOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counter = FrequencyCounter::new();
        for token in tokens {
            let token = token.as_ref();
            if opts.lower {
                counter.add(&token.to_lowercase());
            } else {
                counter.add(token);
            }
        }
        let min_count = opts.min_count.unwrap_or(1);
        let mut entries: Vec<_> = counter
            .into_entries()
            .into_iter()
            .filter(|(_, count)| *count >= min_count)
            .collect();
        if opts.sort {
            // Stable, so equal counts keep first-seen order.
            entries.sort_by(|(_, a), (_, b)| b.cmp(a));
        }
        let tokens = entries.into_iter().map(|(token, _)| token).collect();
        Self::from_parts(opts.start, tokens)
    }

    /// Creates a dictionary from tokens already in index order.
    ///
    /// # Errors
    ///
    /// If `tokens` contains the same token twice, an error variant will be returned.
    pub fn from_tokens(start: usize, tokens: Vec<String>) -> Result<Self> {
        let dict = Self::from_parts(start, tokens);
        if dict.ids.len() != dict.tokens.len() {
            return Err(TagprepError::invalid_argument(
                "tokens",
                "contains duplicate tokens",
            ));
        }
        Ok(dict)
    }

    fn from_parts(start: usize, tokens: Vec<String>) -> Self {
        let ids = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| (token.clone(), start + i))
            .collect();
        Self { start, tokens, ids }
    }

    /// Creates the label dictionary `"1" => 0, "2" => 1, ..., "n" => n - 1`.
    pub fn label_dictionary(n_labels: usize) -> Self {
        Self::build((1..=n_labels).map(|i| i.to_string()), &DictOptions::new(0))
    }

    /// Returns the index of `token`.
    #[inline]
    pub fn get(&self, token: &str) -> Option<usize> {
        self.ids.get(token).copied()
    }

    /// Returns the token stored at `index`.
    pub fn token(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(self.start)
            .and_then(|i| self.tokens.get(i))
            .map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    /// Number of tokens in the dictionary. Reserved indices are not counted.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The first assigned index.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// One past the last assigned index.
    pub fn end(&self) -> usize {
        self.start + self.tokens.len()
    }

    /// Iterates over `(token, index)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(move |(i, token)| (token.as_str(), self.start + i))
    }

    /// Exports the dictionary.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        bincode::encode_into_std_write(
            (self.start, &self.tokens),
            wtr,
            bincode::config::standard(),
        )?;
        Ok(())
    }

    /// Reads a dictionary written by [`Dictionary::write()`].
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error or the data contains duplicate tokens, an error variant
    /// will be returned.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let (start, tokens): (usize, Vec<String>) =
            bincode::decode_from_std_read(rdr, bincode::config::standard())?;
        Self::from_tokens(start, tokens)
    }
}
