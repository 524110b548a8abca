#![allow(non_snake_case)]

use super::*;
use crate::assemble::assemble;
use formative_core::{
    CodecRegistry, ConstructorArgs, FieldDecl, FieldRef, FieldType, Need, Param,
    ProductDescriptor, ResultShape,
};
use serde_json::json;

#[derive(Debug, PartialEq)]
struct Counter {
    count: u32,
}

fn counter_descriptor() -> ProductDescriptor<Counter> {
    ProductDescriptor::new()
        .constructor(vec![Param::exact::<u32>()], |mut args: ConstructorArgs| {
            Ok(Counter { count: args.take()? })
        })
        .deconstructor(
            ResultShape::Single(FieldDecl::new("count", FieldType::plain::<u32>())),
            |c: &Counter| vec![FieldRef::borrowed(&c.count)],
        )
}

fn counter_codec() -> Arc<CombinedCodec<Counter>> {
    assemble(&counter_descriptor(), &CodecRegistry::with_defaults(), Need::Both).unwrap()
}

#[test]
fn DeferredCodec___unbound_read___is_unresolved() {
    let deferred = DeferredCodec::<Counter>::new();

    let errors = deferred.read(&json!({"count": 1})).unwrap_err();

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors.entries()[0].1, ReadError::Unresolved(_)));
}

#[test]
fn DeferredCodec___unbound_write___writes_null() {
    let deferred = DeferredCodec::<Counter>::new();

    assert_eq!(deferred.write(&Counter { count: 1 }), Value::Null);
}

#[test]
fn DeferredCodec___bound___delegates_to_codec() {
    let codec = counter_codec();
    let deferred = DeferredCodec::<Counter>::new();

    assert!(deferred.bind(&codec));

    assert!(deferred.is_bound());
    assert_eq!(deferred.read(&json!({"count": 3})), Ok(Counter { count: 3 }));
    assert_eq!(deferred.write(&Counter { count: 4 }), json!({"count": 4}));
}

#[test]
fn DeferredCodec___second_bind___keeps_first() {
    let first = counter_codec();
    let second = counter_codec();
    let deferred = DeferredCodec::<Counter>::new();

    assert!(deferred.bind(&first));
    assert!(!deferred.bind(&second));

    drop(second);
    assert!(deferred.is_bound());
}

#[test]
fn DeferredCodec___clones___share_binding() {
    let codec = counter_codec();
    let deferred = DeferredCodec::<Counter>::new();
    let clone = deferred.clone();

    deferred.bind(&codec);

    assert!(clone.is_bound());
}

#[test]
fn DeferredCodec___codec_dropped___becomes_unresolved() {
    let codec = counter_codec();
    let deferred = DeferredCodec::<Counter>::new();
    deferred.bind(&codec);

    drop(codec);

    assert!(!deferred.is_bound());
    assert!(deferred.read(&json!({"count": 1})).is_err());
}

#[test]
fn DeferredCodec___erased___roundtrips_through_any() {
    let codec = counter_codec();
    let deferred = DeferredCodec::<Counter>::new();
    deferred.bind(&codec);
    let erased = deferred.erased();

    let value = (erased.reader().unwrap())(&json!({"count": 9})).unwrap();
    let tree = (erased.writer().unwrap())(&*value);

    assert_eq!(value.downcast_ref::<Counter>(), Some(&Counter { count: 9 }));
    assert_eq!(tree, json!({"count": 9}));
}

#[test]
fn DeferredCodec___erased_foreign_value___writes_null() {
    let erased = DeferredCodec::<Counter>::new().erased();

    assert_eq!((erased.writer().unwrap())(&5u32), Value::Null);
}
