//! Key/value annotations attached to transaction results for indexing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: Vec<u8>,
}

/// An ordered list of tags. Duplicate keys are allowed: a multi-send emits
/// one `sender` tag per input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a tag list with a single entry.
    pub fn single(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new().with(key, value)
    }

    /// Append a tag, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.0.push(Tag {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Append every tag of `other`, preserving order.
    pub fn append(&mut self, other: Tags) {
        self.0.extend(other.0);
    }

    /// First value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.0
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_slice())
    }

    /// Every value recorded under `key`, in emission order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.0
            .iter()
            .filter(move |t| t.key == key)
            .map(|t| t.value.as_slice())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let mut tags = Tags::single("sender", b"a".to_vec());
        tags.append(Tags::single("sender", b"b".to_vec()).with("recipient", b"c".to_vec()));

        assert_eq!(tags.len(), 3);
        assert_eq!(tags.get("sender"), Some(&b"a"[..]));
        let senders: Vec<&[u8]> = tags.get_all("sender").collect();
        assert_eq!(senders, vec![&b"a"[..], &b"b"[..]]);
        assert_eq!(tags.get("recipient"), Some(&b"c"[..]));
        assert_eq!(tags.get("missing"), None);
    }
}
