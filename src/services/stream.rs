//! Incremental JSON reading over response bodies.
//!
//! Catalog responses can be tens of megabytes. Instead of materializing a
//! `serde_json::Value`, the reader walks a key path through nested objects
//! and visits array elements one at a time; siblings are skipped with
//! [`IgnoredAny`]. After the document ends the remaining bytes of the body
//! are drained so the connection can be reused.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess,
    Visitor,
};
use std::fmt;
use std::io::{self, BufReader, Read};
use std::marker::PhantomData;
use std::ops::ControlFlow;

/// Calls `visit` for each element of the array found at `path`.
///
/// An empty path means the document itself is the array. Once `visit`
/// returns [`ControlFlow::Break`] the remaining elements are skipped without
/// being deserialized. Returns the number of elements visited, or `None`
/// when the path does not exist (or leads to `null`).
pub fn for_each_at<R, T, F>(reader: R, path: &[&str], visit: F) -> serde_json::Result<Option<usize>>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T) -> ControlFlow<()>,
{
    read_document(
        reader,
        AtPath {
            path,
            inner: EachElement {
                visit,
                marker: PhantomData,
            },
        },
    )
}

/// Reads the single value found at `path`, if any.
pub fn value_at<R, T>(reader: R, path: &[&str]) -> serde_json::Result<Option<T>>
where
    R: Read,
    T: DeserializeOwned,
{
    read_document(
        reader,
        AtPath {
            path,
            inner: PhantomData::<T>,
        },
    )
}

fn read_document<R, S, V>(reader: R, seed: S) -> serde_json::Result<V>
where
    R: Read,
    S: for<'de> DeserializeSeed<'de, Value = V>,
{
    let mut reader = BufReader::new(reader);
    let value = {
        let mut deserializer = serde_json::Deserializer::from_reader(&mut reader);
        let value = seed.deserialize(&mut deserializer)?;
        deserializer.end()?;
        value
    };
    drain(&mut reader).map_err(serde_json::Error::io)?;
    Ok(value)
}

/// Consumes whatever is left of a body.
pub fn drain<R: Read>(reader: &mut R) -> io::Result<u64> {
    io::copy(reader, &mut io::sink())
}

/// Descends through object keys in `path`, then hands off to `inner`.
struct AtPath<'p, S> {
    path: &'p [&'p str],
    inner: S,
}

impl<'de, S> DeserializeSeed<'de> for AtPath<'_, S>
where
    S: DeserializeSeed<'de>,
{
    type Value = Option<S::Value>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        match self.path.split_first() {
            None => self.inner.deserialize(deserializer).map(Some),
            Some((key, rest)) => deserializer.deserialize_any(KeyVisitor {
                key: *key,
                rest,
                inner: self.inner,
            }),
        }
    }
}

struct KeyVisitor<'p, S> {
    key: &'p str,
    rest: &'p [&'p str],
    inner: S,
}

impl<'de, S> Visitor<'de> for KeyVisitor<'_, S>
where
    S: DeserializeSeed<'de>,
{
    type Value = Option<S::Value>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an object with key `{}`", self.key)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut inner = Some(self.inner);
        let mut found = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == self.key {
                if let Some(seed) = inner.take() {
                    found = map.next_value_seed(AtPath {
                        path: self.rest,
                        inner: seed,
                    })?;
                    continue;
                }
            }
            map.next_value::<IgnoredAny>()?;
        }
        Ok(found)
    }
}

struct EachElement<F, T> {
    visit: F,
    marker: PhantomData<fn(T)>,
}

impl<'de, F, T> DeserializeSeed<'de> for EachElement<F, T>
where
    T: de::Deserialize<'de>,
    F: FnMut(T) -> ControlFlow<()>,
{
    type Value = usize;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, F, T> Visitor<'de> for EachElement<F, T>
where
    T: de::Deserialize<'de>,
    F: FnMut(T) -> ControlFlow<()>,
{
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array")
    }

    fn visit_seq<A>(mut self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut visited = 0;
        while let Some(item) = seq.next_element::<T>()? {
            visited += 1;
            if (self.visit)(item).is_break() {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                break;
            }
        }
        Ok(visited)
    }
}
