//! Gzip framing for pathmap streams.

use crate::error::{BundleError, BundleResult};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Gzip-compresses `data`.
pub fn compress(data: &[u8]) -> BundleResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data).map_err(BundleError::Compression)?;
    encoder.finish().map_err(BundleError::Compression)
}

/// Inverse of [`compress`].
pub fn decompress(data: &[u8]) -> BundleResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(BundleError::Compression)?;
    Ok(out)
}
