//! Derivation entry points
//!
//! Each entry point derives one artifact for a type from its descriptor and
//! a registry. The artifacts share one [`CombinedCodec`] and differ only in
//! which halves they expose.

use crate::assemble::{CombinedCodec, assemble};
use crate::getters::assemble_from_getters;
use formative_core::{
    CodecRegistry, DeriveError, Getters, Need, Product, ProductDescriptor, ReadResult, Reader,
    Writer,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

macro_rules! artifact {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<T> {
            codec: Arc<CombinedCodec<T>>,
        }

        impl<T: 'static> $name<T> {
            /// The combined codec behind this artifact
            pub fn codec(&self) -> &CombinedCodec<T> {
                &self.codec
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                Self {
                    codec: Arc::clone(&self.codec),
                }
            }
        }

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.codec).finish()
            }
        }
    };
}

artifact!(
    /// Derived reader for a product type
    DerivedReader
);
artifact!(
    /// Derived writer for a product type
    DerivedWriter
);
artifact!(
    /// Derived reader and writer for a product type
    DerivedFormat
);

impl<T: 'static> Reader<T> for DerivedReader<T> {
    fn read(&self, tree: &Value) -> ReadResult<T> {
        self.codec.decode(tree)
    }
}

impl<T: 'static> Writer<T> for DerivedWriter<T> {
    fn write(&self, value: &T) -> Value {
        self.codec.encode(value)
    }
}

impl<T: 'static> Reader<T> for DerivedFormat<T> {
    fn read(&self, tree: &Value) -> ReadResult<T> {
        self.codec.decode(tree)
    }
}

impl<T: 'static> Writer<T> for DerivedFormat<T> {
    fn write(&self, value: &T) -> Value {
        self.codec.encode(value)
    }
}

fn logged<T: 'static>(
    artifact: &'static str,
    type_name: &str,
    result: Result<Arc<CombinedCodec<T>>, DeriveError>,
) -> Result<Arc<CombinedCodec<T>>, DeriveError> {
    match &result {
        Ok(codec) => tracing::debug!(type_name, artifact, fields = codec.fields().len(), "derived"),
        Err(err) => tracing::warn!(type_name, artifact, error = %err, "derivation failed"),
    }
    result
}

/// Derive a reader from an explicit descriptor
pub fn reader_for<T: 'static>(
    descriptor: &ProductDescriptor<T>,
    registry: &CodecRegistry,
) -> Result<DerivedReader<T>, DeriveError> {
    let codec = logged("reader", descriptor.type_name(), assemble(descriptor, registry, Need::Read))?;
    Ok(DerivedReader { codec })
}

/// Derive a writer from an explicit descriptor
pub fn writer_for<T: 'static>(
    descriptor: &ProductDescriptor<T>,
    registry: &CodecRegistry,
) -> Result<DerivedWriter<T>, DeriveError> {
    let codec = logged("writer", descriptor.type_name(), assemble(descriptor, registry, Need::Write))?;
    Ok(DerivedWriter { codec })
}

/// Derive a format from an explicit descriptor
pub fn format_for<T: 'static>(
    descriptor: &ProductDescriptor<T>,
    registry: &CodecRegistry,
) -> Result<DerivedFormat<T>, DeriveError> {
    let codec = logged("format", descriptor.type_name(), assemble(descriptor, registry, Need::Both))?;
    Ok(DerivedFormat { codec })
}

/// Derive a writer from the getters of an explicit descriptor
pub fn writer_from_getters_for<T: 'static>(
    descriptor: &ProductDescriptor<T>,
    registry: &CodecRegistry,
) -> Result<DerivedWriter<T>, DeriveError> {
    let codec = logged(
        "getter writer",
        descriptor.type_name(),
        assemble_from_getters(descriptor, registry),
    )?;
    Ok(DerivedWriter { codec })
}

pub fn reader<T: Product>(registry: &CodecRegistry) -> Result<DerivedReader<T>, DeriveError> {
    reader_for(&T::descriptor(), registry)
}

pub fn writer<T: Product>(registry: &CodecRegistry) -> Result<DerivedWriter<T>, DeriveError> {
    writer_for(&T::descriptor(), registry)
}

pub fn format<T: Product>(registry: &CodecRegistry) -> Result<DerivedFormat<T>, DeriveError> {
    format_for(&T::descriptor(), registry)
}

pub fn writer_from_getters<T: Getters>(
    registry: &CodecRegistry,
) -> Result<DerivedWriter<T>, DeriveError> {
    writer_from_getters_for(&ProductDescriptor::<T>::from_getters(), registry)
}

/// Derive a format for `T` and register it, so later derivations can use
/// `T` as a plain field type
pub fn register_derived<T: Product>(registry: &CodecRegistry) -> Result<(), DeriveError> {
    let format = format::<T>(registry)?;
    registry.register_format::<T, _>(format);
    Ok(())
}
