//! `#[getters]` expansion
//!
//! Collects the public, zero-argument `&self` methods of an inherent impl
//! block into a `Getters` implementation. Other methods are left alone.

use crate::naming::RenameRule;
use crate::shape::field_type;
use darling::FromMeta;
use darling::ast::NestedMeta;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, PathArguments, ReturnType, Signature,
    Type, Visibility, parse_quote,
};

/// Options for the getters attribute macro
#[derive(Debug, Default, FromMeta)]
pub struct GettersArgs {
    #[darling(default)]
    rename_all: Option<RenameRule>,

    #[darling(default, rename = "crate")]
    krate: Option<syn::Path>,
}

/// Per-method `#[getter(...)]` options
#[derive(Debug, Default, FromMeta)]
struct GetterAttr {
    #[darling(default)]
    skip: bool,

    #[darling(default)]
    rename: Option<String>,
}

/// How a getter's return value reaches the writer
enum Access {
    /// `&U`, borrowed from the receiver
    Borrowed(Type),
    /// `&str`, copied into a `String`
    Str,
    /// `&[U]`, copied into a `Vec<U>`
    Slice(Type),
    /// Returned by value
    Owned(Type),
}

impl Access {
    fn of(ty: &Type) -> Self {
        match ty {
            Type::Reference(reference) if reference.mutability.is_none() => {
                match &*reference.elem {
                    Type::Path(path) if path.qself.is_none() && path.path.is_ident("str") => Access::Str,
                    Type::Slice(slice) => Access::Slice((*slice.elem).clone()),
                    elem => Access::Borrowed(elem.clone()),
                }
            }
            other => Access::Owned(other.clone()),
        }
    }

    /// Type carried by value, below any outer reference
    fn carried(&self) -> Option<&Type> {
        match self {
            Access::Borrowed(ty) | Access::Slice(ty) | Access::Owned(ty) => Some(ty),
            Access::Str => None,
        }
    }

    /// Type seen by the writer
    fn value_type(&self) -> Type {
        match self {
            Access::Borrowed(ty) | Access::Owned(ty) => ty.clone(),
            Access::Str => parse_quote!(::std::string::String),
            Access::Slice(elem) => parse_quote!(::std::vec::Vec<#elem>),
        }
    }
}

/// Whether `ty` holds a reference or a non-`'static` lifetime anywhere inside
fn holds_borrow(ty: &Type) -> bool {
    match ty {
        Type::Reference(_) => true,
        Type::Paren(inner) => holds_borrow(&inner.elem),
        Type::Group(inner) => holds_borrow(&inner.elem),
        Type::Slice(slice) => holds_borrow(&slice.elem),
        Type::Array(array) => holds_borrow(&array.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(holds_borrow),
        Type::Path(path) => path.path.segments.iter().any(|segment| match &segment.arguments {
            PathArguments::AngleBracketed(generic) => generic.args.iter().any(|arg| match arg {
                GenericArgument::Type(inner) => holds_borrow(inner),
                GenericArgument::Lifetime(lifetime) => lifetime.ident != "static",
                _ => false,
            }),
            _ => false,
        }),
        _ => false,
    }
}

/// Whether a method qualifies as a getter
fn is_getter(vis: &Visibility, sig: &Signature) -> bool {
    let by_shared_ref = matches!(
        sig.inputs.first(),
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() && receiver.mutability.is_none()
    );
    matches!(vis, Visibility::Public(_))
        && by_shared_ref
        && sig.inputs.len() == 1
        && sig.generics.params.is_empty()
        && sig.asyncness.is_none()
        && sig.unsafety.is_none()
        && matches!(sig.output, ReturnType::Type(..))
}

/// Remove `#[getter(...)]` helpers from a method, returning their options
fn take_getter_attr(method: &mut ImplItemFn) -> darling::Result<GetterAttr> {
    let mut found = GetterAttr::default();
    let mut errors = darling::Error::accumulator();
    method.attrs.retain(|attr| {
        if !attr.path().is_ident("getter") {
            return true;
        }
        if let Some(parsed) = errors.handle(GetterAttr::from_meta(&attr.meta)) {
            found = parsed;
        }
        false
    });
    errors.finish_with(found)
}

pub fn expand(args: TokenStream, mut item: ItemImpl) -> darling::Result<TokenStream> {
    let args = GettersArgs::from_list(&NestedMeta::parse_meta_list(args)?)?;
    if let Some((_, path, _)) = &item.trait_ {
        return Err(
            darling::Error::custom("#[getters] applies to inherent impl blocks only").with_span(path),
        );
    }
    let krate = args.krate.unwrap_or_else(|| parse_quote!(::formative));

    let mut errors = darling::Error::accumulator();
    let mut getters = Vec::new();
    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let Some(attr) = errors.handle(take_getter_attr(method)) else {
            continue;
        };
        if attr.skip || !is_getter(&method.vis, &method.sig) {
            continue;
        }
        let ReturnType::Type(_, output) = &method.sig.output else {
            continue;
        };

        let ident = &method.sig.ident;
        let member = match (attr.rename, args.rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply(&ident.to_string()),
            (None, None) => ident.to_string().trim_start_matches("r#").to_string(),
        };
        let access = Access::of(output);
        if access.carried().is_some_and(holds_borrow) {
            errors.push(
                darling::Error::custom(
                    "getters cannot return data borrowed inside another type; \
                     return an owned value or mark the method #[getter(skip)]",
                )
                .with_span(output),
            );
            continue;
        }
        let declared = field_type(&krate, &access.value_type());
        let value = match access {
            Access::Borrowed(_) => quote! { #krate::FieldRef::borrowed(value.#ident()) },
            Access::Str => {
                quote! { #krate::FieldRef::owned(::std::string::String::from(value.#ident())) }
            }
            Access::Slice(_) => quote! { #krate::FieldRef::owned(value.#ident().to_vec()) },
            Access::Owned(_) => quote! { #krate::FieldRef::owned(value.#ident()) },
        };
        getters.push(quote! {
            #krate::Getter::new(#member, #declared, |value: &Self| #value)
        });
    }
    errors.finish()?;

    let self_ty = &item.self_ty;
    let mut generics = item.generics.clone();
    let params: Vec<_> = generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote!(#param: 'static));
    }
    let (impl_generics, _, where_clause) = generics.split_for_impl();

    Ok(quote! {
        #item

        impl #impl_generics #krate::Getters for #self_ty #where_clause {
            fn getters() -> ::std::vec::Vec<#krate::Getter<Self>> {
                ::std::vec![#(#getters),*]
            }
        }
    })
}
