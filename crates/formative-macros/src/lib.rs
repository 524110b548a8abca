//! formative-macros - Procedural macros for formative product types
//!
//! This crate provides:
//! - `#[derive(Product)]` - Describe a struct's constructor and fields
//! - `#[getters]` - Expose an impl block's accessor methods for writing

mod getters;
mod naming;
mod product;
mod shape;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemImpl, parse_macro_input};

/// Derive macro for product types
///
/// Emits a `Product` implementation whose descriptor has one constructor
/// taking every field in declaration order and one deconstructor returning
/// them in the same order. Member names default to the field names.
///
/// # Example
///
/// ```ignore
/// #[derive(Product)]
/// #[product(rename_all = "camelCase")]
/// struct Person {
///     first_name: String,
///     #[product(rename = "years")]
///     age: Option<u32>,
/// }
/// ```
#[proc_macro_derive(Product, attributes(product))]
pub fn derive_product(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match product::expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => TokenStream::from(e.write_errors()),
    }
}

/// Attribute for collecting accessor methods
///
/// Every public method taking only `&self`, without generics, becomes a
/// getter named after the method. `&str` and `&[T]` results are copied into
/// owned values; other references are borrowed.
///
/// # Example
///
/// ```ignore
/// #[getters]
/// impl Account {
///     pub fn owner(&self) -> &str {
///         &self.owner
///     }
///
///     #[getter(rename = "balance")]
///     pub fn balance_in_cents(&self) -> i64 {
///         self.cents
///     }
///
///     #[getter(skip)]
///     pub fn audit_log(&self) -> &[Entry] {
///         &self.log
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn getters(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);

    match getters::expand(attr.into(), input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => TokenStream::from(e.write_errors()),
    }
}
