use std::io::{BufRead, Read, Write};
use std::str::FromStr;

use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::dictionary::Dictionary;
use crate::errors::{Result, TagprepError};

/// Bound of the uniform distribution used for out-of-vocabulary word vectors.
pub const OOV_VECTOR_BOUND: f32 = 0.25;

/// Creates the random generator used by the initializers.
///
/// `None` draws a seed from the operating system.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Dense row-major `f32` matrix. Row `i` holds the vector of dictionary index `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingMatrix {
    n_rows: usize,
    dim: usize,
    data: Vec<f32>,
}

impl EmbeddingMatrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(n_rows: usize, dim: usize) -> Self {
        Self {
            n_rows,
            dim,
            data: vec![0.0; n_rows * dim],
        }
    }

    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub const fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Returns all values in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Exports the matrix.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        bincode::encode_into_std_write(
            (self.n_rows, self.dim, &self.data),
            wtr,
            bincode::config::standard(),
        )?;
        Ok(())
    }

    /// Reads a matrix written by [`EmbeddingMatrix::write()`].
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let (n_rows, dim, data): (usize, usize, Vec<f32>) =
            bincode::decode_from_std_read(rdr, bincode::config::standard())?;
        if n_rows.checked_mul(dim) != Some(data.len()) {
            return Err(TagprepError::invalid_argument(
                "rdr",
                format!("{} values do not form a {n_rows}x{dim} matrix", data.len()),
            ));
        }
        Ok(Self { n_rows, dim, data })
    }
}

/// Serialization format of a pretrained vector source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PretrainedFormat {
    /// Compressed binary written by [`PretrainedVectors::write()`].
    Binary,

    /// word2vec text format.
    Text,
}

impl FromStr for PretrainedFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bin" | "binary" => Ok(Self::Binary),
            "txt" | "text" => Ok(Self::Text),
            _ => Err("Could not parse a vector format. {bin, text}"),
        }
    }
}

/// Fixed-dimension word vectors indexed by token.
#[derive(Clone, Debug, PartialEq)]
pub struct PretrainedVectors {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl PretrainedVectors {
    /// Creates a table from `(token, vector)` pairs.
    ///
    /// If a token appears twice, the first vector is kept.
    ///
    /// # Errors
    ///
    /// When `entries` is empty or the vectors differ in length, an error variant will be
    /// returned.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut dim = None;
        let mut vectors = HashMap::new();
        for (token, vector) in entries {
            let d = *dim.get_or_insert(vector.len());
            if vector.len() != d {
                return Err(TagprepError::invalid_vectors(format!(
                    "vector of {token:?} has {} dimensions, expected {d}",
                    vector.len()
                )));
            }
            vectors.entry(token).or_insert(vector);
        }
        let dim = dim.ok_or_else(|| TagprepError::invalid_vectors("no vectors"))?;
        if dim == 0 {
            return Err(TagprepError::invalid_vectors("vectors have no dimensions"));
        }
        Ok(Self { dim, vectors })
    }

    /// Reads vectors in the word2vec text format.
    ///
    /// The first line may be a `<count> <dim>` header. Every other non-empty line is a token
    /// followed by its values, separated by whitespace.
    ///
    /// # Errors
    ///
    /// Fails on a value that is not a number, on inconsistent dimensions, on a header that
    /// disagrees with the vectors, and on an empty source.
    pub fn read_text<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut header = None;
        let mut entries = vec![];
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let token = match fields.next() {
                Some(token) => token,
                None => continue,
            };
            let values: Vec<&str> = fields.collect();
            if i == 0 && values.len() == 1 {
                if let Some(h) = parse_header(token, values[0]) {
                    header = Some(h);
                    continue;
                }
            }
            let vector = values
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    TagprepError::invalid_vectors(format!("line {}: {token:?}: {e}", i + 1))
                })?;
            entries.push((token.to_string(), vector));
        }
        let n_entries = entries.len();
        let vectors = Self::from_entries(entries)?;
        if let Some((count, dim)) = header {
            if count != n_entries || dim != vectors.dim {
                return Err(TagprepError::invalid_vectors(format!(
                    "header declares {count} vectors of {dim} dimensions, \
                     found {n_entries} vectors of {} dimensions",
                    vectors.dim
                )));
            }
        }
        Ok(vectors)
    }

    /// Exports the vectors in the binary format.
    ///
    /// Entries are written in token order so the output is reproducible.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        let mut entries: Vec<_> = self.vectors.iter().collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        bincode::encode_into_std_write(entries, wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Reads vectors written by [`PretrainedVectors::write()`].
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let entries: Vec<(String, Vec<f32>)> =
            bincode::decode_from_std_read(rdr, bincode::config::standard())?;
        Self::from_entries(entries)
    }

    pub const fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }
}

fn parse_header(count: &str, dim: &str) -> Option<(usize, usize)> {
    Some((count.parse().ok()?, dim.parse().ok()?))
}

/// How rows of words missing from the pretrained vectors are filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OovPolicy {
    /// Draws each value uniformly from `[-0.25, 0.25]`.
    #[default]
    Random,

    /// Leaves the row zero, matching matrices produced by older versions of this pipeline.
    Zero,
}

impl FromStr for OovPolicy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "zero" => Ok(Self::Zero),
            _ => Err("Could not parse an OOV policy. {random, zero}"),
        }
    }
}

/// Builds the word embedding matrix.
///
/// The matrix has `max(dict.len(), pretrained.len()) + dict.start()` rows and
/// `pretrained.dim()` columns. Rows of words found in `pretrained` are copies of their
/// vectors, other word rows follow `policy`, and every remaining row is zero. Words are visited
/// in index order, so a seeded `rng` gives a reproducible matrix.
pub fn init_word_embedding<R>(
    dict: &Dictionary,
    pretrained: &PretrainedVectors,
    policy: OovPolicy,
    rng: &mut R,
) -> EmbeddingMatrix
where
    R: Rng,
{
    let n_rows = dict.len().max(pretrained.len()) + dict.start();
    let mut emb = EmbeddingMatrix::zeros(n_rows, pretrained.dim());
    let mut n_oov = 0;
    for (word, index) in dict.iter() {
        let row = emb.row_mut(index);
        if let Some(vector) = pretrained.get(word) {
            row.copy_from_slice(vector);
        } else {
            n_oov += 1;
            if policy == OovPolicy::Random {
                for v in row {
                    *v = rng.random_range(-OOV_VECTOR_BOUND..=OOV_VECTOR_BOUND);
                }
            }
        }
    }
    log::info!(
        "word embedding: {n_rows}x{}, # of pretrained: {}, # of OOV: {n_oov} ({policy:?})",
        pretrained.dim(),
        dict.len() - n_oov,
    );
    emb
}

/// Builds the part-of-speech embedding matrix.
///
/// The matrix has `dict.end()` rows and `dim` columns. Rows below `dict.start()` are zero and
/// the others are drawn from the standard normal distribution.
pub fn init_pos_embedding<R>(dict: &Dictionary, dim: usize, rng: &mut R) -> EmbeddingMatrix
where
    R: Rng,
{
    let mut emb = EmbeddingMatrix::zeros(dict.end(), dim);
    for index in dict.start()..dict.end() {
        for v in emb.row_mut(index) {
            *v = rng.sample(StandardNormal);
        }
    }
    log::info!("pos embedding: {}x{dim}", dict.end());
    emb
}
