use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;
use std::ops::Index;

/// The decoded frames of a tag, keyed by their canonical frame ID.
///
/// Each ID holds a single value. When a tag contains the same frame more than once,
/// the frame that appears last wins. Iteration follows the order the frames were
/// first seen in the tag.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FrameMap {
    map: IndexMap<String, String>,
}

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, overwriting any previous value under the same ID.
    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.map.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.map.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub fn keys(&self) -> Keys<String, String> {
        self.map.keys()
    }

    pub fn values(&self) -> Values<String, String> {
        self.map.values()
    }

    pub fn iter(&self) -> Iter<String, String> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Index<&str> for FrameMap {
    type Output = str;

    fn index(&self, id: &str) -> &Self::Output {
        self.map[id].as_str()
    }
}

impl IntoIterator for FrameMap {
    type Item = (String, String);
    type IntoIter = IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a> IntoIterator for &'a FrameMap {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
