use core::fmt::{self, Display};

use serde::{
    Deserialize, Serialize,
    de::{self, DeserializeSeed, SeqAccess, Visitor},
};

use crate::{AllocError, Vector, alloc::Allocator};

impl<T: Serialize, A: Allocator> Serialize for Vector<T, A> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        <[T]>::serialize(self, serializer)
    }
}

const AN_ARRAY: &str = "an array";

struct AllocationFailed;

impl Display for AllocationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("allocation failed")
    }
}

fn map_alloc_error<E: de::Error>(result: Result<(), AllocError>) -> Result<(), E> {
    match result {
        Ok(()) => Ok(()),
        Err(AllocError) => Err(E::custom(&AllocationFailed)),
    }
}

/// Deserializes into a vector from a default constructed allocator.
impl<'de, T: Deserialize<'de>, A: Allocator + Default> Deserialize<'de> for Vector<T, A> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut vec = Self::new_in(A::default());
        deserializer.deserialize_seq(&mut vec)?;
        Ok(vec)
    }
}

/// Appends the deserialized elements to the vector.
impl<'de, T: Deserialize<'de>, A: Allocator> DeserializeSeed<'de> for &'_ mut Vector<T, A> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, T: Deserialize<'de>, A: Allocator> Visitor<'de> for &'_ mut Vector<T, A> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(AN_ARRAY)
    }

    fn visit_seq<Seq>(self, mut seq: Seq) -> Result<Self::Value, Seq::Error>
    where
        Seq: SeqAccess<'de>,
    {
        if let Some(size_hint) = seq.size_hint() {
            map_alloc_error(self.try_reserve(size_hint))?;
        }

        while let Some(elem) = seq.next_element()? {
            map_alloc_error(self.try_push(elem))?;
        }

        Ok(())
    }
}
