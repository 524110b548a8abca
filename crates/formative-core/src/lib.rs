//! formative-core - Core traits, types, and codec registry
//!
//! This crate provides the foundational types shared by the derivation engine
//! and the procedural macros:
//! - [`Reader`], [`Writer`] and [`Format`] traits over [`serde_json::Value`] trees
//! - [`Path`], [`ReadError`] and [`ReadErrors`] for path-tagged decode failures
//! - [`DeriveError`] for derivation-time failures
//! - [`TypeKey`] and [`FieldType`] describing declared field types
//! - [`ProductDescriptor`] describing constructors, deconstructors and getters
//! - [`CodecRegistry`] holding elementary and previously derived codecs

mod codec;
mod descriptor;
mod elementary;
mod error;
mod path;
mod registry;
mod types;

pub use codec::{ErasedCodec, ErasedReader, ErasedWriter, FnReader, FnWriter, Format, Need, Reader, Writer};
pub use descriptor::{
    Constructor, ConstructorArgs, Deconstructor, FieldDecl, FieldRef, Getter, Getters, Param,
    Product, ProductDescriptor, ResultShape,
};
pub use elementary::SerdeCodec;
pub use error::{DeriveError, ReadError, ReadErrors, ReadResult, value_kind, zip};
pub use path::{Path, PathSegment};
pub use registry::CodecRegistry;
pub use types::{
    AnyValue, BoxAdapter, Collected, ContainerAdapter, ContainerKind, FieldType, Members,
    OptionAdapter, Shape, TypeKey,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CodecRegistry, DeriveError, FieldType, Format, Getters, Path, Product, ProductDescriptor,
        ReadError, ReadErrors, ReadResult, Reader, Writer,
    };
}
