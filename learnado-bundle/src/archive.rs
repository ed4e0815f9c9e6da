//! Pathmap encoding: a path → bytes map as one deterministic byte stream.
//!
//! ```text
//! magic   "LPMP"
//! version u8
//! count   u64 LE
//! entry*  key_len u32 LE | key (UTF-8) | value_len u64 LE | value
//! ```
//!
//! Entries are written in ascending key order so equal maps encode to equal
//! bytes. The decoder accepts any order but rejects duplicates.

use crate::error::{BundleError, BundleResult};
use std::collections::BTreeMap;

/// Rendered site content keyed by `/`-separated relative path.
/// Directories are present with empty values.
pub type PathMap = BTreeMap<String, Vec<u8>>;

pub const MAGIC: &[u8; 4] = b"LPMP";
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 1 + 8;

/// Encodes a map into a pathmap stream.
pub fn encode(map: &PathMap) -> Vec<u8> {
    let body: usize = map.iter().map(|(k, v)| 4 + k.len() + 8 + v.len()).sum();
    let mut out = Vec::with_capacity(HEADER_LEN + body);

    out.extend_from_slice(MAGIC);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&(map.len() as u64).to_le_bytes());

    for (key, value) in map {
        out.extend_from_slice(&(key.len() as u32).to_le_bytes());
        out.extend_from_slice(key.as_bytes());
        out.extend_from_slice(&(value.len() as u64).to_le_bytes());
        out.extend_from_slice(value);
    }
    out
}

/// Decodes a pathmap stream.
pub fn decode(bytes: &[u8]) -> BundleResult<PathMap> {
    let mut reader = Reader { buf: bytes, pos: 0 };

    if reader.take(MAGIC.len(), "magic")? != MAGIC {
        return Err(malformed("bad magic"));
    }
    let version = reader.take(1, "version")?[0];
    if version != FORMAT_VERSION {
        return Err(malformed(format!("unsupported version {version}")));
    }

    let count = reader.read_u64("entry count")?;
    let mut map = PathMap::new();
    for index in 0..count {
        let key_len = reader.read_u32("key length")? as usize;
        let key = std::str::from_utf8(reader.take(key_len, "key")?)
            .map_err(|e| malformed(format!("entry {index}: key is not UTF-8: {e}")))?
            .to_owned();

        let value_len = usize::try_from(reader.read_u64("value length")?)
            .map_err(|_| malformed(format!("entry {index}: value length overflows")))?;
        let value = reader.take(value_len, "value")?.to_vec();

        if map.insert(key, value).is_some() {
            return Err(malformed(format!("entry {index}: duplicate key")));
        }
    }

    if reader.remaining() != 0 {
        return Err(malformed(format!("{} trailing bytes", reader.remaining())));
    }
    Ok(map)
}

fn malformed(reason: impl Into<String>) -> BundleError {
    BundleError::Serialization(reason.into())
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &str) -> BundleResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(malformed(format!(
                "truncated {what}: need {len} bytes, {} left",
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_u32(&mut self, what: &str) -> BundleResult<u32> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.take(4, what)?);
        Ok(u32::from_le_bytes(raw))
    }

    fn read_u64(&mut self, what: &str) -> BundleResult<u64> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.take(8, what)?);
        Ok(u64::from_le_bytes(raw))
    }
}
