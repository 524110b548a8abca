//! # formative
//!
//! Derive JSON readers and writers from the shape of Rust product types.
//!
//! A product type describes how it is built and taken apart: which
//! constructor accepts its fields, and which fields a value consists of.
//! formative inspects that description, finds a codec for every field type,
//! and combines them into one codec for the whole type. Decoding reports
//! every failing field at once, each tagged with its path.
//!
//! ## Quick Start
//!
//! ```ignore
//! use formative::prelude::*;
//!
//! #[derive(Debug, PartialEq, Product)]
//! struct Person {
//!     name: String,
//!     age: Option<u32>,
//! }
//!
//! let format = formative::format::<Person>()?;
//!
//! let ann = Person { name: "Ann".into(), age: None };
//! let tree = format.write(&ann);
//! assert_eq!(tree.to_string(), r#"{"name":"Ann"}"#);
//! assert_eq!(format.read(&tree), Ok(ann));
//! ```
//!
//! ## Self-referential types
//!
//! A field whose type is the type being derived goes through a deferred
//! handle, bound once derivation finishes. `Vec<Self>` and `Option<Self>`
//! work the same way.
//!
//! ```ignore
//! #[derive(Product)]
//! struct Node {
//!     value: i32,
//!     children: Vec<Node>,
//! }
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`formative_core`] - Traits, descriptors, errors, and the codec registry
//! - [`formative_engine`] - The derivation engine
//! - [`formative_macros`] - `#[derive(Product)]` and `#[getters]`
//!
//! The functions at the crate root derive against the global registry,
//! [`CodecRegistry::global`]. Use [`derive`] to derive against a registry of
//! your own.

// Re-export core types
pub use formative_core::{
    AnyValue, CodecRegistry, ConstructorArgs, ContainerKind, DeriveError, ErasedCodec, FieldDecl,
    FieldRef, FieldType, FnReader, FnWriter, Format, Getter, Getters, Need, Param, Path,
    PathSegment, Product, ProductDescriptor, ReadError, ReadErrors, ReadResult, Reader,
    ResultShape, SerdeCodec, TypeKey, Writer,
};

// Re-export the engine
pub use formative_engine::{
    CombinedCodec, DerivedFormat, DerivedReader, DerivedWriter, FieldKind, derive,
};

// Re-export macros
pub use formative_macros::{Product, getters};

// Re-export common dependencies that product authors need
pub use serde_json;
pub use tracing;

/// Derive a reader for `T` against the global registry
pub fn reader<T: Product>() -> Result<DerivedReader<T>, DeriveError> {
    derive::reader::<T>(CodecRegistry::global())
}

/// Derive a writer for `T` against the global registry
pub fn writer<T: Product>() -> Result<DerivedWriter<T>, DeriveError> {
    derive::writer::<T>(CodecRegistry::global())
}

/// Derive a reader and writer for `T` against the global registry
pub fn format<T: Product>() -> Result<DerivedFormat<T>, DeriveError> {
    derive::format::<T>(CodecRegistry::global())
}

/// Derive a writer for `T` from its getters, against the global registry
pub fn writer_from_getters<T: Getters>() -> Result<DerivedWriter<T>, DeriveError> {
    derive::writer_from_getters::<T>(CodecRegistry::global())
}

/// Derive a format for `T` and add it to the global registry
///
/// Afterwards `T` can appear as a plain field of other products.
pub fn register_derived<T: Product>() -> Result<(), DeriveError> {
    derive::register_derived::<T>(CodecRegistry::global())
}

/// Prelude module for convenient imports.
///
/// Use `use formative::prelude::*;` to import commonly used types.
///
/// This includes:
/// - Traits: `Product`, `Getters`, `Reader`, `Writer`, `Format`
/// - Types: `CodecRegistry`, `DeriveError`, `ReadErrors`, `Path`
/// - Macros: `#[derive(Product)]`, `#[getters]`
pub mod prelude {
    pub use crate::{
        CodecRegistry, DeriveError, Format, Getters, Path, Product, ReadError, ReadErrors,
        ReadResult, Reader, Writer, getters,
    };
}
