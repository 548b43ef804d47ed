//! Serde bridge for arkworks types: values travel as their canonical
//! compressed encoding, wrapped in a byte sequence.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub(crate) fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: CanonicalSerialize,
    S: Serializer,
{
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value
        .serialize_compressed(&mut bytes)
        .map_err(S::Error::custom)?;
    bytes.serialize(serializer)
}

pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: CanonicalDeserialize,
    D: Deserializer<'de>,
{
    let bytes = Vec::<u8>::deserialize(deserializer)?;
    let mut reader = bytes.as_slice();
    // Points are checked to be on the curve and in the prime order subgroup
    let value = T::deserialize_compressed(&mut reader).map_err(D::Error::custom)?;
    if !reader.is_empty() {
        return Err(D::Error::custom("trailing bytes after group elements"));
    }
    Ok(value)
}

/// Vectors of group elements, as a serde sequence of single elements.
///
/// The length prefix is never handed to arkworks: it would reserve room for
/// that many points before reading any of them.
pub(crate) mod vec {
    use super::*;
    use serde::ser::SerializeSeq;

    struct Compressed<'a, T>(&'a T);

    impl<T: CanonicalSerialize> Serialize for Compressed<'_, T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            super::serialize(self.0, serializer)
        }
    }

    struct Point<T>(T);

    impl<'de, T: CanonicalDeserialize> Deserialize<'de> for Point<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            super::deserialize(deserializer).map(Point)
        }
    }

    pub(crate) fn serialize<T, S>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: CanonicalSerialize,
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&Compressed(value))?;
        }
        seq.end()
    }

    pub(crate) fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        // serde caps the preallocation whatever the announced length
        let points = Vec::<Point<T>>::deserialize(deserializer)?;
        Ok(points.into_iter().map(|Point(value)| value).collect())
    }
}
