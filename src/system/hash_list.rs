use std::{ops::Index, slice, str};

use crate::chunks::Key;

use super::error::{Error, Result};

/// Ordered keys of the chunks a stream was split into.
///
/// Serialized as one lowercase hex key per line, each terminated by `\n`.
/// The serialized list is stored as a chunk itself and its key is the
/// stream's root hash.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HashList(Vec<Key>);

impl HashList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: Key) {
        self.0.push(key);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Key> {
        self.0.iter()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.0.len() * 65);
        for key in &self.0 {
            buf.extend_from_slice(key.to_string().as_bytes());
            buf.push(b'\n');
        }
        buf
    }

    /// Parses a serialized list. Blank lines are skipped; anything else that
    /// is not a key makes the whole list malformed.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = str::from_utf8(bytes).map_err(|e| Error::MalformedHashList {
            line: bytes[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count() + 1,
            reason: "not valid UTF-8".to_owned(),
        })?;

        let mut keys = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let key = line.parse::<Key>().map_err(|e| Error::MalformedHashList {
                line: i + 1,
                reason: format!("{e}"),
            })?;
            keys.push(key);
        }
        Ok(Self(keys))
    }
}

impl From<Vec<Key>> for HashList {
    fn from(keys: Vec<Key>) -> Self {
        Self(keys)
    }
}

impl FromIterator<Key> for HashList {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for HashList {
    type Output = Key;

    fn index(&self, index: usize) -> &Key {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a HashList {
    type Item = &'a Key;
    type IntoIter = slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
