//! Field classification
//!
//! Decides, for every accessor, how its value is read and written: through a
//! registered codec, through the deferred handle of the type under
//! derivation, or through the optional and container wrappers around either.
//! `Box<U>` is transparent: it is resolved as `U` and boxed after reading.

use crate::resolve::Accessor;
use formative_core::{
    BoxAdapter, CodecRegistry, ContainerAdapter, ContainerKind, DeriveError, ErasedCodec,
    ErasedReader, ErasedWriter, FieldType, Need, OptionAdapter, ReadErrors, Shape, TypeKey,
};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Codec for a single, unwrapped value
#[derive(Debug, Clone)]
pub struct ElementPlan {
    key: TypeKey,
    codec: ErasedCodec,
    recursive: bool,
}

impl ElementPlan {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn codec(&self) -> &ErasedCodec {
        &self.codec
    }

    /// Whether this element goes through the deferred handle
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }
}

/// How one field is encoded and decoded
#[derive(Debug, Clone)]
pub enum FieldPlan {
    Element(ElementPlan),
    Optional {
        inner: Box<FieldPlan>,
        adapter: OptionAdapter,
    },
    Container {
        kind: ContainerKind,
        element: ElementPlan,
        adapter: ContainerAdapter,
    },
}

/// Classification summary of a [`FieldPlan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Plain,
    Recursive,
    Optional,
    Container(ContainerKind),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Plain => write!(f, "plain"),
            FieldKind::Recursive => write!(f, "recursive"),
            FieldKind::Optional => write!(f, "optional"),
            FieldKind::Container(kind) => write!(f, "{kind}"),
        }
    }
}

impl FieldPlan {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldPlan::Element(element) if element.recursive => FieldKind::Recursive,
            FieldPlan::Element(_) => FieldKind::Plain,
            FieldPlan::Optional { .. } => FieldKind::Optional,
            FieldPlan::Container { kind, .. } => FieldKind::Container(*kind),
        }
    }

    /// Whether the type under derivation appears anywhere in this plan
    pub fn is_recursive(&self) -> bool {
        match self {
            FieldPlan::Element(element) => element.recursive,
            FieldPlan::Optional { inner, .. } => inner.is_recursive(),
            FieldPlan::Container { element, .. } => element.recursive,
        }
    }
}

/// Classifies field types against a registry
///
/// `target` is the type under derivation and `deferred` the erased form of
/// its deferred handle; a field of exactly that type resolves to `deferred`
/// unless the registry already knows the type.
pub struct Classifier<'a> {
    registry: &'a CodecRegistry,
    need: Need,
    target: TypeKey,
    deferred: ErasedCodec,
}

impl<'a> Classifier<'a> {
    pub fn new(registry: &'a CodecRegistry, need: Need, target: TypeKey, deferred: ErasedCodec) -> Self {
        Self {
            registry,
            need,
            target,
            deferred,
        }
    }

    /// Classify one declared type
    ///
    /// On failure, returns the names of the types no codec could be found
    /// for.
    pub fn classify(&self, declared: &FieldType) -> Result<FieldPlan, Vec<&'static str>> {
        match declared.shape() {
            Shape::Optional { inner, adapter } => Ok(FieldPlan::Optional {
                inner: Box::new(self.classify(inner)?),
                adapter: *adapter,
            }),
            Shape::Container {
                kind,
                element,
                adapter,
            } => Ok(FieldPlan::Container {
                kind: *kind,
                element: self.element(element)?,
                adapter: *adapter,
            }),
            Shape::Plain | Shape::Boxed { .. } => self.element(declared).map(FieldPlan::Element),
        }
    }

    fn element(&self, declared: &FieldType) -> Result<ElementPlan, Vec<&'static str>> {
        let key = declared.key();
        if let Some(codec) = self.registry.lookup(key).filter(|c| c.satisfies(self.need)) {
            return Ok(ElementPlan {
                key,
                codec,
                recursive: false,
            });
        }
        if let Shape::Boxed { inner, adapter } = declared.shape() {
            let inner = self.element(inner)?;
            return Ok(ElementPlan {
                key,
                codec: boxed_codec(inner.codec, *adapter),
                recursive: inner.recursive,
            });
        }
        if key == self.target {
            return Ok(ElementPlan {
                key,
                codec: self.deferred.clone(),
                recursive: true,
            });
        }
        Err(vec![key.name()])
    }

    /// Classify every accessor, collecting all missing codecs into one error
    pub fn classify_all(&self, accessors: &[Accessor]) -> Result<Vec<FieldPlan>, DeriveError> {
        let mut plans = Vec::with_capacity(accessors.len());
        let mut missing: Vec<&'static str> = Vec::new();

        for accessor in accessors {
            match self.classify(accessor.declared()) {
                Ok(plan) => {
                    tracing::debug!(
                        type_name = self.target.name(),
                        field = accessor.name(),
                        kind = %plan.kind(),
                        "classified field"
                    );
                    plans.push(plan);
                }
                Err(names) => {
                    for name in names {
                        if !missing.contains(&name) {
                            missing.push(name);
                        }
                    }
                }
            }
        }

        if missing.is_empty() {
            Ok(plans)
        } else {
            Err(DeriveError::MissingCodecs {
                type_name: self.target.name().to_string(),
                types: missing.into_iter().map(str::to_string).collect(),
            })
        }
    }
}

/// Codec for `Box<U>` that reads and writes `U` through `inner`
fn boxed_codec(inner: ErasedCodec, adapter: BoxAdapter) -> ErasedCodec {
    let reader: Option<ErasedReader> = inner.reader().cloned().map(|read| {
        Arc::new(move |tree: &Value| {
            read(tree).and_then(|value| adapter.wrap(value).map_err(ReadErrors::at_root))
        }) as ErasedReader
    });
    let writer: Option<ErasedWriter> = inner.writer().cloned().map(|write| {
        Arc::new(move |value: &dyn Any| match adapter.unwrap(value) {
            Some(inner) => write(inner),
            None => {
                tracing::error!(adapter = ?adapter, "boxed field received a foreign value");
                Value::Null
            }
        }) as ErasedWriter
    });
    ErasedCodec::new(reader, writer)
}
