//! `#[derive(Product)]` expansion

use crate::naming::RenameRule;
use crate::shape::field_type;
use darling::{FromDeriveInput, FromField, ast};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_quote};

/// Options for the Product derive macro
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(product), supports(struct_named, struct_unit))]
pub struct ProductOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<(), ProductField>,

    /// Case convention applied to every field name
    #[darling(default)]
    rename_all: Option<RenameRule>,

    /// Path to the formative crate (default `::formative`)
    #[darling(default, rename = "crate")]
    krate: Option<syn::Path>,
}

#[derive(Debug, FromField)]
#[darling(attributes(product))]
pub struct ProductField {
    ident: Option<syn::Ident>,
    ty: syn::Type,

    /// External member name, used verbatim
    #[darling(default)]
    rename: Option<String>,
}

impl ProductField {
    fn member_name(&self, ident: &syn::Ident, rule: Option<RenameRule>) -> String {
        if let Some(rename) = &self.rename {
            return rename.clone();
        }
        let name = ident.to_string();
        match rule {
            Some(rule) => rule.apply(&name),
            None => name.trim_start_matches("r#").to_string(),
        }
    }
}

pub fn expand(input: &DeriveInput) -> darling::Result<TokenStream> {
    let opts = ProductOpts::from_derive_input(input)?;
    let krate = opts
        .krate
        .clone()
        .unwrap_or_else(|| parse_quote!(::formative));
    let name = &opts.ident;

    let mut generics = opts.generics.clone();
    let params: Vec<_> = generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote!(#param: 'static));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = opts
        .data
        .take_struct()
        .map(|fields| fields.fields)
        .unwrap_or_default();

    let mut idents = Vec::with_capacity(fields.len());
    let mut types = Vec::with_capacity(fields.len());
    let mut decls = Vec::with_capacity(fields.len());
    for field in &fields {
        let Some(ident) = &field.ident else {
            return Err(darling::Error::custom("Product fields must be named").with_span(&field.ty));
        };
        let member = field.member_name(ident, opts.rename_all);
        let ty = &field.ty;
        let declared = field_type(&krate, ty);
        idents.push(ident.clone());
        types.push(ty.clone());
        decls.push(quote! { #krate::FieldDecl::new(#member, #declared) });
    }

    let shape = match decls.as_slice() {
        [] => quote! { #krate::ResultShape::Unit },
        [only] => quote! { #krate::ResultShape::Single(#only) },
        decls => quote! { #krate::ResultShape::Tuple(::std::vec![#(#decls),*]) },
    };

    let (constructor, deconstructor) = if idents.is_empty() {
        (
            quote! { |_: #krate::ConstructorArgs| ::std::result::Result::Ok(Self {}) },
            quote! { |_: &Self| ::std::vec::Vec::new() },
        )
    } else {
        (
            quote! {
                |mut args: #krate::ConstructorArgs| {
                    ::std::result::Result::Ok(Self {
                        #( #idents: args.take::<#types>()? ),*
                    })
                }
            },
            quote! {
                |value: &Self| ::std::vec![#( #krate::FieldRef::borrowed(&value.#idents) ),*]
            },
        )
    };

    Ok(quote! {
        impl #impl_generics #krate::Product for #name #ty_generics #where_clause {
            fn descriptor() -> #krate::ProductDescriptor<Self> {
                #krate::ProductDescriptor::<Self>::new()
                    .constructor(
                        ::std::vec![#( #krate::Param::exact::<#types>() ),*],
                        #constructor,
                    )
                    .deconstructor(#shape, #deconstructor)
            }
        }
    })
}

#[cfg(test)]
#[path = "product/product_tests.rs"]
mod product_tests;
