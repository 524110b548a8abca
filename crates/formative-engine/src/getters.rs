//! Writer derivation from public accessor methods
//!
//! Types that expose data only through getters can still be written. The
//! getters stand in for a deconstructor; constructors are never consulted.

use crate::assemble::{CombinedCodec, field_codecs, finish, getter_codec};
use crate::binder::DeferredCodec;
use crate::classify::Classifier;
use crate::resolve::Accessor;
use formative_core::{CodecRegistry, DeriveError, Need, ProductDescriptor};
use std::sync::Arc;

/// Derive a write-only combined codec from the getters of a descriptor
pub fn assemble_from_getters<T: 'static>(
    descriptor: &ProductDescriptor<T>,
    registry: &CodecRegistry,
) -> Result<Arc<CombinedCodec<T>>, DeriveError> {
    let getters = descriptor.getters();
    if getters.is_empty() {
        return Err(DeriveError::NoAccessors {
            type_name: descriptor.type_name().to_string(),
        });
    }

    let accessors: Vec<Accessor> = getters
        .iter()
        .enumerate()
        .map(|(position, getter)| Accessor::new(getter.name(), getter.declared().clone(), position))
        .collect();
    tracing::debug!(
        type_name = descriptor.type_name(),
        getters = accessors.len(),
        "using getters as deconstruction"
    );

    let deferred = DeferredCodec::<T>::new();
    let classifier = Classifier::new(registry, Need::Write, descriptor.key(), deferred.erased());
    let plans = classifier.classify_all(&accessors)?;

    let codec = getter_codec(
        descriptor.type_name(),
        field_codecs(&accessors, plans),
        getters.to_vec(),
    );
    Ok(finish(codec, &deferred))
}
