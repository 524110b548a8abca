//! Elementary codecs backed by serde_json

use crate::codec::{Reader, Writer};
use crate::error::{ReadError, ReadErrors, ReadResult};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

/// Codec for any type serde already knows how to handle
///
/// Primitives and other leaf types are encoded this way; the derivation
/// engine only composes them.
pub struct SerdeCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeCodec<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SerdeCodec<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerdeCodec<{}>", type_name::<T>())
    }
}

impl<T: DeserializeOwned> Reader<T> for SerdeCodec<T> {
    fn read(&self, tree: &Value) -> ReadResult<T> {
        T::deserialize(tree).map_err(|e| ReadErrors::at_root(ReadError::from(e)))
    }
}

impl<T: Serialize> Writer<T> for SerdeCodec<T> {
    fn write(&self, value: &T) -> Value {
        match serde_json::to_value(value) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::error!(
                    type_name = type_name::<T>(),
                    error = %err,
                    "value cannot be represented as a tree"
                );
                Value::Null
            }
        }
    }
}
