//! Syntactic detection of optional and container field types
//!
//! Only the last path segment is inspected, so `Vec<T>`,
//! `std::vec::Vec<T>` and `alloc::vec::Vec<T>` are treated alike. Map types
//! count as containers only when their key is `String`; anything else is
//! left to the registry as a plain type. `Box<T>` is looked through for
//! sized `T`, so `Option<Box<Self>>` reaches the type itself.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

/// Structural category of a field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape<'a> {
    Plain,
    Optional(&'a Type),
    Boxed(&'a Type),
    List(&'a Type),
    Sequence(&'a Type),
    HashSet(&'a Type),
    BTreeSet(&'a Type),
    HashMap(&'a Type),
    BTreeMap(&'a Type),
}

/// Classify a type by its outermost constructor
pub fn type_shape(ty: &Type) -> TypeShape<'_> {
    let Some((name, args)) = last_segment(ty) else {
        return TypeShape::Plain;
    };
    match (name.as_str(), args.as_slice()) {
        ("Option", [inner]) => TypeShape::Optional(inner),
        ("Box", [inner]) if is_sized(inner) => TypeShape::Boxed(inner),
        ("Vec", [element]) => TypeShape::List(element),
        ("VecDeque", [element]) => TypeShape::Sequence(element),
        ("HashSet", [element]) => TypeShape::HashSet(element),
        ("BTreeSet", [element]) => TypeShape::BTreeSet(element),
        ("HashMap", [key, value]) if is_string(key) => TypeShape::HashMap(value),
        ("BTreeMap", [key, value]) if is_string(key) => TypeShape::BTreeMap(value),
        _ => TypeShape::Plain,
    }
}

fn last_segment(ty: &Type) -> Option<(String, Vec<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    let args = match &segment.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?,
        PathArguments::None => Vec::new(),
        PathArguments::Parenthesized(_) => return None,
    };
    Some((segment.ident.to_string(), args))
}

fn is_string(ty: &Type) -> bool {
    matches!(last_segment(ty), Some((name, args)) if name == "String" && args.is_empty())
}

/// Unsized pointees stay behind their box
fn is_sized(ty: &Type) -> bool {
    match ty {
        Type::TraitObject(_) | Type::Slice(_) => false,
        Type::Path(path) => !path.path.is_ident("str"),
        _ => true,
    }
}

/// Expression building the `FieldType` for `ty`
pub fn field_type(krate: &syn::Path, ty: &Type) -> TokenStream {
    match type_shape(ty) {
        TypeShape::Plain => quote! { #krate::FieldType::plain::<#ty>() },
        TypeShape::Optional(inner) => {
            let inner_type = field_type(krate, inner);
            quote! { #krate::FieldType::optional::<#inner>(#inner_type) }
        }
        TypeShape::Boxed(inner) => {
            let inner_type = field_type(krate, inner);
            quote! { #krate::FieldType::boxed::<#inner>(#inner_type) }
        }
        TypeShape::List(element) => container(krate, quote!(list), element),
        TypeShape::Sequence(element) => container(krate, quote!(sequence), element),
        TypeShape::HashSet(element) => container(krate, quote!(hash_set), element),
        TypeShape::BTreeSet(element) => container(krate, quote!(btree_set), element),
        TypeShape::HashMap(value) => container(krate, quote!(hash_map), value),
        TypeShape::BTreeMap(value) => container(krate, quote!(btree_map), value),
    }
}

/// Container constructor call; a boxed element is described in full
fn container(krate: &syn::Path, constructor: TokenStream, element: &Type) -> TokenStream {
    let base = quote! { #krate::FieldType::#constructor::<#element>() };
    match type_shape(element) {
        TypeShape::Boxed(_) => {
            let element_type = field_type(krate, element);
            quote! { #base.with_element(#element_type) }
        }
        _ => base,
    }
}
