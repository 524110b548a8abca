//! Reader, Writer and Format traits, plus their type-erased forms

use crate::error::{ReadError, ReadErrors, ReadResult};
use crate::types::AnyValue;
use serde_json::Value;
use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// Decodes a value from an external tree
pub trait Reader<T>: Send + Sync {
    /// Decode a value, reporting every failure found
    fn read(&self, tree: &Value) -> ReadResult<T>;

    /// Parse JSON text, then decode it
    fn read_str(&self, json: &str) -> ReadResult<T> {
        let tree: Value =
            serde_json::from_str(json).map_err(|e| ReadErrors::at_root(ReadError::from(e)))?;
        self.read(&tree)
    }

    /// Parse JSON bytes, then decode them
    fn read_slice(&self, json: &[u8]) -> ReadResult<T> {
        let tree: Value =
            serde_json::from_slice(json).map_err(|e| ReadErrors::at_root(ReadError::from(e)))?;
        self.read(&tree)
    }
}

/// Encodes a value into an external tree
///
/// Writing never fails: it walks a value that is already valid in memory.
pub trait Writer<T>: Send + Sync {
    fn write(&self, value: &T) -> Value;

    /// Encode, then render compact JSON text
    fn write_string(&self, value: &T) -> String {
        self.write(value).to_string()
    }
}

/// Both directions at once
pub trait Format<T>: Reader<T> + Writer<T> {}

impl<T, C: Reader<T> + Writer<T> + ?Sized> Format<T> for C {}

impl<T, R: Reader<T> + ?Sized> Reader<T> for Arc<R> {
    fn read(&self, tree: &Value) -> ReadResult<T> {
        (**self).read(tree)
    }
}

impl<T, W: Writer<T> + ?Sized> Writer<T> for Arc<W> {
    fn write(&self, value: &T) -> Value {
        (**self).write(value)
    }
}

/// Reader backed by a function
pub struct FnReader<F>(pub F);

impl<T, F> Reader<T> for FnReader<F>
where
    F: Fn(&Value) -> ReadResult<T> + Send + Sync,
{
    fn read(&self, tree: &Value) -> ReadResult<T> {
        (self.0)(tree)
    }
}

/// Writer backed by a function
pub struct FnWriter<F>(pub F);

impl<T, F> Writer<T> for FnWriter<F>
where
    F: Fn(&T) -> Value + Send + Sync,
{
    fn write(&self, value: &T) -> Value {
        (self.0)(value)
    }
}

/// Reader whose output type is known only to its consumer
pub type ErasedReader = Arc<dyn Fn(&Value) -> ReadResult<AnyValue> + Send + Sync>;

/// Writer whose input type is known only to its producer
pub type ErasedWriter = Arc<dyn Fn(&dyn Any) -> Value + Send + Sync>;

/// Which halves of a codec a derivation requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Need {
    Read,
    Write,
    Both,
}

impl Need {
    pub fn reads(&self) -> bool {
        matches!(self, Need::Read | Need::Both)
    }

    pub fn writes(&self) -> bool {
        matches!(self, Need::Write | Need::Both)
    }
}

/// A codec with either or both halves, erased to `Any`
#[derive(Clone, Default)]
pub struct ErasedCodec {
    reader: Option<ErasedReader>,
    writer: Option<ErasedWriter>,
}

impl ErasedCodec {
    pub fn new(reader: Option<ErasedReader>, writer: Option<ErasedWriter>) -> Self {
        Self { reader, writer }
    }

    pub fn from_reader<T, R>(reader: R) -> Self
    where
        T: 'static,
        R: Reader<T> + 'static,
    {
        Self {
            reader: Some(erase_reader(reader)),
            writer: None,
        }
    }

    pub fn from_writer<T, W>(writer: W) -> Self
    where
        T: 'static,
        W: Writer<T> + 'static,
    {
        Self {
            reader: None,
            writer: Some(erase_writer(writer)),
        }
    }

    pub fn from_format<T, F>(format: F) -> Self
    where
        T: 'static,
        F: Format<T> + 'static,
    {
        let format = Arc::new(format);
        Self {
            reader: Some(erase_reader::<T, _>(Arc::clone(&format))),
            writer: Some(erase_writer::<T, _>(format)),
        }
    }

    pub fn reader(&self) -> Option<&ErasedReader> {
        self.reader.as_ref()
    }

    pub fn writer(&self) -> Option<&ErasedWriter> {
        self.writer.as_ref()
    }

    /// Whether the halves required by `need` are present
    pub fn satisfies(&self, need: Need) -> bool {
        (!need.reads() || self.reader.is_some()) && (!need.writes() || self.writer.is_some())
    }

    /// Fill in the halves of `self` that `other` provides
    ///
    /// Halves present in `other` replace those in `self`.
    pub fn merge(self, other: ErasedCodec) -> Self {
        Self {
            reader: other.reader.or(self.reader),
            writer: other.writer.or(self.writer),
        }
    }
}

impl fmt::Debug for ErasedCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedCodec")
            .field("reader", &self.reader.is_some())
            .field("writer", &self.writer.is_some())
            .finish()
    }
}

fn erase_reader<T, R>(reader: R) -> ErasedReader
where
    T: 'static,
    R: Reader<T> + 'static,
{
    Arc::new(move |tree: &Value| reader.read(tree).map(|value| Box::new(value) as AnyValue))
}

fn erase_writer<T, W>(writer: W) -> ErasedWriter
where
    T: 'static,
    W: Writer<T> + 'static,
{
    Arc::new(move |value: &dyn Any| match value.downcast_ref::<T>() {
        Some(value) => writer.write(value),
        None => {
            tracing::error!(expected = type_name::<T>(), "erased writer received a foreign value");
            Value::Null
        }
    })
}
