//! Compressed file storage for dictionaries, vectors, and matrices.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::errors::Result;

/// Default zstd compression level.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 19;

/// Outcome of [`build_cached()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStatus {
    /// The output was computed and written.
    Computed,

    /// The output already existed and was left untouched.
    SkippedExisting,
}

/// Opens a zstd-compressed file for reading.
pub fn open<P>(path: P) -> Result<zstd::Decoder<'static, BufReader<File>>>
where
    P: AsRef<Path>,
{
    Ok(zstd::Decoder::new(File::open(path)?)?)
}

/// Creates a file and writes zstd-compressed data into it through `f`.
pub fn create<P, F>(path: P, level: i32, f: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut zstd::Encoder<'static, BufWriter<File>>) -> Result<()>,
{
    let mut wtr = zstd::Encoder::new(BufWriter::new(File::create(path)?), level)?;
    f(&mut wtr)?;
    wtr.finish()?.flush()?;
    Ok(())
}

/// Computes and writes an output only when needed.
///
/// When `path` exists and `overwrite` is false, neither `compute` nor `write` is called.
///
/// # Arguments
///
/// * `path` - The output file.
/// * `overwrite` - Recomputes even if `path` exists.
/// * `level` - zstd compression level.
/// * `compute` - Produces the value.
/// * `write` - Serializes the value.
pub fn build_cached<T, P, C, W>(
    path: P,
    overwrite: bool,
    level: i32,
    compute: C,
    write: W,
) -> Result<BuildStatus>
where
    P: AsRef<Path>,
    C: FnOnce() -> Result<T>,
    W: FnOnce(&T, &mut zstd::Encoder<'static, BufWriter<File>>) -> Result<()>,
{
    let path = path.as_ref();
    if path.exists() && !overwrite {
        log::info!("{path:?} exists, skipped.");
        return Ok(BuildStatus::SkippedExisting);
    }
    let value = compute()?;
    create(path, level, |wtr| write(&value, wtr))?;
    log::info!("save {path:?} ok.");
    Ok(BuildStatus::Computed)
}
