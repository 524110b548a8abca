#![allow(non_snake_case)]

use super::*;
use crate::codec::{FnReader, FnWriter, Need};
use crate::error::ReadResult;
use serde_json::{Value, json};
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(Debug, PartialEq)]
struct Celsius(f64);

fn celsius_reader() -> FnReader<impl Fn(&Value) -> ReadResult<Celsius> + Send + Sync> {
    FnReader(|tree: &Value| SerdeCodec::<f64>::new().read(tree).map(Celsius))
}

fn celsius_writer() -> FnWriter<impl Fn(&Celsius) -> Value + Send + Sync> {
    FnWriter(|value: &Celsius| json!(value.0))
}

// CodecRegistry tests

#[test]
fn CodecRegistry___new___is_empty() {
    let registry = CodecRegistry::new();

    assert!(registry.is_empty());
    assert!(registry.lookup(TypeKey::of::<String>()).is_none());
}

#[test]
fn CodecRegistry___with_defaults___knows_primitives() {
    let registry = CodecRegistry::with_defaults();

    for key in [
        TypeKey::of::<String>(),
        TypeKey::of::<bool>(),
        TypeKey::of::<i32>(),
        TypeKey::of::<u64>(),
        TypeKey::of::<f64>(),
        TypeKey::of::<Value>(),
    ] {
        let codec = registry.lookup(key).unwrap();
        assert!(codec.satisfies(Need::Both), "{key} should have a full format");
    }
}

#[test]
fn CodecRegistry___with_defaults___does_not_know_containers() {
    let registry = CodecRegistry::with_defaults();

    assert!(!registry.contains(TypeKey::of::<Vec<i32>>()));
}

#[test]
fn CodecRegistry___reader_then_writer___merge_into_format() {
    let registry = CodecRegistry::new();

    registry.register_reader::<Celsius, _>(celsius_reader());
    assert!(!registry.lookup(TypeKey::of::<Celsius>()).unwrap().satisfies(Need::Both));

    registry.register_writer::<Celsius, _>(celsius_writer());
    assert!(registry.lookup(TypeKey::of::<Celsius>()).unwrap().satisfies(Need::Both));
    assert_eq!(registry.len(), 1);
}

#[test]
fn CodecRegistry___lookup___returns_working_codec() {
    let registry = CodecRegistry::new();
    registry.register_reader::<Celsius, _>(celsius_reader());

    let codec = registry.lookup(TypeKey::of::<Celsius>()).unwrap();
    let value = (codec.reader().unwrap())(&json!(21.5)).unwrap();

    assert_eq!(value.downcast_ref::<Celsius>(), Some(&Celsius(21.5)));
}

#[test]
fn CodecRegistry___remove___forgets_type() {
    let registry = CodecRegistry::with_defaults();

    assert!(registry.remove(TypeKey::of::<char>()).is_some());
    assert!(!registry.contains(TypeKey::of::<char>()));
}

#[test]
fn CodecRegistry___type_names___are_sorted() {
    let registry = CodecRegistry::new();
    registry.register_serde::<u8>();
    registry.register_serde::<bool>();

    assert_eq!(registry.type_names(), vec!["bool", "u8"]);
}

#[test]
fn CodecRegistry___global___is_shared() {
    let first = CodecRegistry::global() as *const CodecRegistry;
    let second = CodecRegistry::global() as *const CodecRegistry;

    assert_eq!(first, second);
    assert!(CodecRegistry::global().contains(TypeKey::of::<String>()));
}

#[test]
fn CodecRegistry___concurrent_registration___keeps_every_entry() {
    let registry = Arc::new(CodecRegistry::new());
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                match i {
                    0 => registry.register_serde::<u8>(),
                    1 => registry.register_serde::<u16>(),
                    2 => registry.register_serde::<u32>(),
                    _ => registry.register_serde::<u64>(),
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 4);
}
