//! formative-engine - Derives readers and writers for product types
//!
//! Derivation runs in four stages:
//! - [`resolve()`] finds the accessors and the matching constructor overload
//! - [`Classifier`] turns each accessor into a [`FieldPlan`]
//! - [`DeferredCodec`] lets a type refer to itself while it is being derived
//! - [`assemble()`] combines the plans into one [`CombinedCodec`]
//!
//! The [`derive`] module wraps these stages into the public entry points.

mod assemble;
mod binder;
mod classify;
pub mod derive;
mod getters;
mod resolve;

pub use assemble::{CombinedCodec, FieldCodec, FieldSource, assemble};
pub use binder::DeferredCodec;
pub use classify::{Classifier, ElementPlan, FieldKind, FieldPlan};
pub use derive::{DerivedFormat, DerivedReader, DerivedWriter};
pub use getters::assemble_from_getters;
pub use resolve::{Accessor, Resolution, resolve};
