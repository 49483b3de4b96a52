//! Body serializer plugins.
//!
//! A `BodySerializer<T>` converts between a typed value and the raw bytes of a
//! request or response body. The client never assumes a wire format; callers
//! pick one per call.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::BoxError;

/// Two-way conversion between `T` and a byte payload.
pub trait BodySerializer<T>: Send + Sync {
    fn serialize(&self, value: &T) -> Result<Vec<u8>, BoxError>;

    fn deserialize(&self, bytes: &[u8]) -> Result<T, BoxError>;
}

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl<T> BodySerializer<T> for JsonSerializer
where
    T: Serialize + DeserializeOwned,
{
    fn serialize(&self, value: &T) -> Result<Vec<u8>, BoxError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, BoxError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// UTF-8 text. Decoding rejects invalid UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSerializer;

impl BodySerializer<String> for TextSerializer {
    fn serialize(&self, value: &String) -> Result<Vec<u8>, BoxError> {
        Ok(value.as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<String, BoxError> {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// Raw bytes, unchanged in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesSerializer;

impl BodySerializer<Vec<u8>> for BytesSerializer {
    fn serialize(&self, value: &Vec<u8>) -> Result<Vec<u8>, BoxError> {
        Ok(value.clone())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        Ok(bytes.to_vec())
    }
}

/// For endpoints whose body carries nothing of interest: encodes `()` as an
/// empty body and discards whatever comes back.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySerializer;

impl BodySerializer<()> for EmptySerializer {
    fn serialize(&self, _value: &()) -> Result<Vec<u8>, BoxError> {
        Ok(Vec::new())
    }

    fn deserialize(&self, _bytes: &[u8]) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Adapts a pair of closures into a serializer.
pub struct FnSerializer<T, S, D> {
    serialize: S,
    deserialize: D,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S, D> FnSerializer<T, S, D>
where
    S: Fn(&T) -> Result<Vec<u8>, BoxError> + Send + Sync,
    D: Fn(&[u8]) -> Result<T, BoxError> + Send + Sync,
{
    pub fn new(serialize: S, deserialize: D) -> Self {
        Self {
            serialize,
            deserialize,
            _marker: PhantomData,
        }
    }
}

impl<T, S, D> BodySerializer<T> for FnSerializer<T, S, D>
where
    S: Fn(&T) -> Result<Vec<u8>, BoxError> + Send + Sync,
    D: Fn(&[u8]) -> Result<T, BoxError> + Send + Sync,
{
    fn serialize(&self, value: &T) -> Result<Vec<u8>, BoxError> {
        (self.serialize)(value)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, BoxError> {
        (self.deserialize)(bytes)
    }
}
