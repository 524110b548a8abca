//! Elementary codec registry

use crate::codec::{ErasedCodec, Format, Reader, Writer};
use crate::elementary::SerdeCodec;
use crate::types::TypeKey;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use serde::{Serialize, de::DeserializeOwned};
use std::any::TypeId;

/// Global codec registry
static GLOBAL_REGISTRY: OnceCell<CodecRegistry> = OnceCell::new();

struct Entry {
    name: &'static str,
    codec: ErasedCodec,
}

/// Codecs known for individual types
///
/// The derivation engine consults the registry for every plain field type.
/// It holds elementary codecs for primitives and any codec derived earlier
/// and registered back. Registering a reader and a writer for the same type
/// separately yields a full format.
pub struct CodecRegistry {
    codecs: DashMap<TypeId, Entry>,
}

impl CodecRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            codecs: DashMap::new(),
        }
    }

    /// Create a registry holding codecs for strings, booleans, characters,
    /// every integer width, floats and raw `serde_json::Value` trees
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register_serde::<String>();
        registry.register_serde::<bool>();
        registry.register_serde::<char>();
        registry.register_serde::<i8>();
        registry.register_serde::<i16>();
        registry.register_serde::<i32>();
        registry.register_serde::<i64>();
        registry.register_serde::<isize>();
        registry.register_serde::<u8>();
        registry.register_serde::<u16>();
        registry.register_serde::<u32>();
        registry.register_serde::<u64>();
        registry.register_serde::<usize>();
        registry.register_serde::<f32>();
        registry.register_serde::<f64>();
        registry.register_serde::<serde_json::Value>();
        registry
    }

    /// Get the global registry, seeded with the defaults
    pub fn global() -> &'static CodecRegistry {
        GLOBAL_REGISTRY.get_or_init(CodecRegistry::with_defaults)
    }

    /// Register an elementary codec that delegates to serde_json
    pub fn register_serde<T>(&self)
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        self.register_format::<T, _>(SerdeCodec::<T>::new());
    }

    pub fn register_reader<T, R>(&self, reader: R)
    where
        T: 'static,
        R: Reader<T> + 'static,
    {
        self.register_erased(TypeKey::of::<T>(), ErasedCodec::from_reader::<T, R>(reader));
    }

    pub fn register_writer<T, W>(&self, writer: W)
    where
        T: 'static,
        W: Writer<T> + 'static,
    {
        self.register_erased(TypeKey::of::<T>(), ErasedCodec::from_writer::<T, W>(writer));
    }

    pub fn register_format<T, F>(&self, format: F)
    where
        T: 'static,
        F: Format<T> + 'static,
    {
        self.register_erased(TypeKey::of::<T>(), ErasedCodec::from_format::<T, F>(format));
    }

    /// Register an already erased codec, merging with any existing halves
    pub fn register_erased(&self, key: TypeKey, codec: ErasedCodec) {
        let mut entry = self.codecs.entry(key.id()).or_insert_with(|| Entry {
            name: key.name(),
            codec: ErasedCodec::default(),
        });
        entry.codec = std::mem::take(&mut entry.codec).merge(codec);
        tracing::debug!(type_name = key.name(), "registered codec");
    }

    /// Look up the codec for a type
    pub fn lookup(&self, key: TypeKey) -> Option<ErasedCodec> {
        self.codecs.get(&key.id()).map(|entry| entry.codec.clone())
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.codecs.contains_key(&key.id())
    }

    /// Remove the codec for a type
    pub fn remove(&self, key: TypeKey) -> Option<ErasedCodec> {
        self.codecs.remove(&key.id()).map(|(_, entry)| entry.codec)
    }

    /// Names of all registered types, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.codecs.iter().map(|entry| entry.name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry/registry_tests.rs"]
mod registry_tests;
