//! Deferred handles for self-referential types

use crate::assemble::CombinedCodec;
use formative_core::{AnyValue, ErasedCodec, ReadError, ReadErrors, ReadResult, TypeKey};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// Stand-in for a codec that is still being derived
///
/// Fields of the type under derivation are classified against this handle.
/// Once the combined codec exists it is bound here exactly once; clones share
/// the same cell. The handle holds the codec weakly, so a codec that refers
/// to itself is still freed when its last owner goes away.
pub struct DeferredCodec<T> {
    cell: Arc<OnceCell<Weak<CombinedCodec<T>>>>,
}

impl<T: 'static> DeferredCodec<T> {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Bind the handle to the finished codec
    ///
    /// Returns `false` if the handle was already bound; the first binding
    /// stays in place.
    pub fn bind(&self, codec: &Arc<CombinedCodec<T>>) -> bool {
        let bound = self.cell.set(Arc::downgrade(codec)).is_ok();
        if bound {
            tracing::debug!(type_name = codec.type_name(), "bound deferred codec");
        }
        bound
    }

    /// Whether the handle points at a live codec
    pub fn is_bound(&self) -> bool {
        self.target().is_some()
    }

    fn target(&self) -> Option<Arc<CombinedCodec<T>>> {
        self.cell.get().and_then(Weak::upgrade)
    }

    pub fn read(&self, tree: &Value) -> ReadResult<T> {
        match self.target() {
            Some(codec) => codec.decode(tree),
            None => Err(ReadErrors::at_root(ReadError::Unresolved(
                std::any::type_name::<T>().to_string(),
            ))),
        }
    }

    pub fn write(&self, value: &T) -> Value {
        match self.target() {
            Some(codec) => codec.encode(value),
            None => {
                tracing::error!(
                    type_name = std::any::type_name::<T>(),
                    "write through unbound deferred codec"
                );
                Value::Null
            }
        }
    }

    /// Both halves, erased for use inside field plans
    pub fn erased(&self) -> ErasedCodec {
        let reader = self.clone();
        let writer = self.clone();
        ErasedCodec::new(
            Some(Arc::new(move |tree: &Value| {
                reader.read(tree).map(|value| Box::new(value) as AnyValue)
            })),
            Some(Arc::new(move |value: &dyn Any| match value.downcast_ref::<T>() {
                Some(value) => writer.write(value),
                None => {
                    tracing::error!(
                        expected = TypeKey::of::<T>().name(),
                        "deferred codec received a foreign value"
                    );
                    Value::Null
                }
            })),
        )
    }
}

impl<T: 'static> Default for DeferredCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for DeferredCodec<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for DeferredCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredCodec")
            .field("type", &std::any::type_name::<T>())
            .field("set", &self.cell.get().is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "binder/binder_tests.rs"]
mod binder_tests;
