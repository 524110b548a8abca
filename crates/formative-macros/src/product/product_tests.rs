#![allow(non_snake_case)]

use super::*;

fn expand_str(input: DeriveInput) -> String {
    expand(&input).unwrap().to_string()
}

fn compact(tokens: TokenStream) -> String {
    tokens.to_string()
}

#[test]
fn expand___named_struct___implements_product() {
    let output = expand_str(parse_quote! {
        struct Person {
            name: String,
            age: Option<u32>,
        }
    });

    assert!(output.contains(&compact(quote!(impl ::formative::Product for Person))));
    assert!(output.contains(&compact(quote!(::formative::ResultShape::Tuple))));
    assert!(output.contains(&compact(quote!(::formative::FieldType::optional::<u32>))));
    assert!(output.contains(&compact(quote!(::formative::FieldType::plain::<String>()))));
    assert!(output.contains("\"age\""));
}

#[test]
fn expand___single_field___single_shape() {
    let output = expand_str(parse_quote! {
        struct Meters {
            value: i64,
        }
    });

    assert!(output.contains(&compact(quote!(::formative::ResultShape::Single))));
}

#[test]
fn expand___unit_struct___unit_shape() {
    let output = expand_str(parse_quote! {
        struct Marker;
    });

    assert!(output.contains(&compact(quote!(::formative::ResultShape::Unit))));
    assert!(output.contains(&compact(quote!(Self {}))));
}

#[test]
fn expand___field_rename___used_verbatim() {
    let output = expand_str(parse_quote! {
        #[product(rename_all = "camelCase")]
        struct Event {
            created_at: u64,
            #[product(rename = "ID")]
            event_id: u64,
        }
    });

    assert!(output.contains("\"createdAt\""));
    assert!(output.contains("\"ID\""));
    assert!(!output.contains("\"eventId\""));
}

#[test]
fn expand___custom_crate_path___prefixes_items() {
    let output = expand_str(parse_quote! {
        #[product(crate = "crate::codec")]
        struct Local {
            id: u8,
        }
    });

    assert!(output.contains(&compact(quote!(impl crate::codec::Product for Local))));
}

#[test]
fn expand___generic_struct___requires_static_params() {
    let output = expand_str(parse_quote! {
        struct Envelope<T> {
            body: T,
        }
    });

    assert!(output.contains(&compact(quote!(where T: 'static))));
}

#[test]
fn expand___tuple_struct___rejected() {
    let input: DeriveInput = parse_quote! {
        struct Pair(u8, u8);
    };

    assert!(expand(&input).is_err());
}

#[test]
fn expand___enum___rejected() {
    let input: DeriveInput = parse_quote! {
        enum Choice { A, B }
    };

    assert!(expand(&input).is_err());
}

#[test]
fn expand___unknown_rename_rule___rejected() {
    let input: DeriveInput = parse_quote! {
        #[product(rename_all = "Train-Case")]
        struct Event {
            created_at: u64,
        }
    };

    assert!(expand(&input).is_err());
}
