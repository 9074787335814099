use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ordered::OrderedSet;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaggedUnionError {
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Index {index} out of range [-1, {len})")]
    OutOfRange { index: isize, len: usize },
}

/// Key/value pair held by a [`TaggedUnion`].
#[derive(Debug, Clone, PartialEq)]
pub struct Element<K, V> {
    pub key: K,
    pub value: V,
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Element<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

/// Ordered option set with at most one selected element.
///
/// Two unions are equal when they hold the same elements in the same order
/// and select the same index.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedUnion<K, V> {
    elements: OrderedSet<Element<K, V>>,
    index: Option<usize>,
}

impl<K: PartialEq, V: PartialEq> TaggedUnion<K, V> {
    /// Index reported when nothing is selected.
    pub const NONE: isize = -1;

    /// Build a union from key/value pairs. Nothing is selected.
    pub fn new(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            elements: pairs
                .into_iter()
                .map(|(key, value)| Element { key, value })
                .collect(),
            index: None,
        }
    }

    pub fn elements(&self) -> &OrderedSet<Element<K, V>> {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Selected position, or [`Self::NONE`].
    pub fn index(&self) -> isize {
        self.index.map_or(Self::NONE, |i| i as isize)
    }

    pub fn set_index(&mut self, index: isize) -> Result<(), TaggedUnionError> {
        let len = self.elements.len();
        if index == Self::NONE {
            self.index = None;
            return Ok(());
        }
        if index < 0 || index as usize >= len {
            return Err(TaggedUnionError::OutOfRange { index, len });
        }
        self.index = Some(index as usize);
        Ok(())
    }

    /// Select the first element whose key equals `key`.
    pub fn set_selected_key(&mut self, key: &K) -> Result<(), TaggedUnionError>
    where
        K: fmt::Display,
    {
        match self.elements.iter().position(|e| &e.key == key) {
            Some(position) => {
                self.index = Some(position);
                Ok(())
            }
            None => Err(TaggedUnionError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    pub fn clear_selection(&mut self) {
        self.index = None;
    }

    pub fn selected(&self) -> Option<&Element<K, V>> {
        self.index.and_then(|i| self.elements.get(i))
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for TaggedUnion<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.index == Some(i) {
                write!(f, "*{}", element)?;
            } else {
                write!(f, "{}", element)?;
            }
        }
        f.write_str("]")
    }
}

struct ElementsRef<'a, K, V>(&'a OrderedSet<Element<K, V>>);

impl<K: Serialize, V: Serialize> Serialize for ElementsRef<'_, K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for element in self.0.iter() {
            map.serialize_entry(&element.key, &element.value)?;
        }
        map.end()
    }
}

impl<K, V> Serialize for TaggedUnion<K, V>
where
    K: Serialize + PartialEq,
    V: Serialize + PartialEq,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TaggedUnion", 2)?;
        state.serialize_field("index", &self.index())?;
        state.serialize_field("elements", &ElementsRef(&self.elements))?;
        state.end()
    }
}

/// Map entries in document order.
struct Entries<K, V>(Vec<(K, V)>);

impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Deserialize<'de> for Entries<K, V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<K, V> {
            type Value = Entries<K, V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of option keys to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
struct RawTaggedUnion<K, V> {
    #[serde(default = "none_index")]
    index: isize,
    elements: Entries<K, V>,
}

fn none_index() -> isize {
    -1
}

impl<'de, K, V> Deserialize<'de> for TaggedUnion<K, V>
where
    K: Deserialize<'de> + PartialEq,
    V: Deserialize<'de> + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTaggedUnion::<K, V>::deserialize(deserializer)?;
        let mut union = TaggedUnion::new(raw.elements.0);
        union.set_index(raw.index).map_err(de::Error::custom)?;
        Ok(union)
    }
}
