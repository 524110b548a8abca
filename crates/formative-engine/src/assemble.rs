//! Combinator assembly
//!
//! Puts the per-field plans together into one [`CombinedCodec`]. Reading
//! decodes every member and accumulates failures applicatively before the
//! selected constructor runs; writing deconstructs the value and encodes each
//! field under its name.

use crate::binder::DeferredCodec;
use crate::classify::{Classifier, ElementPlan, FieldKind, FieldPlan};
use crate::resolve::{Accessor, resolve};
use formative_core::{
    AnyValue, CodecRegistry, Collected, Constructor, ConstructorArgs, ContainerKind,
    Deconstructor, DeriveError, FieldRef, Getter, Members, Need, ProductDescriptor,
    ReadError, ReadErrors, ReadResult, zip,
};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One named field of a combined codec
#[derive(Debug, Clone)]
pub struct FieldCodec {
    name: String,
    plan: FieldPlan,
}

impl FieldCodec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plan(&self) -> &FieldPlan {
        &self.plan
    }
}

/// Where field values come from when writing
pub enum FieldSource<T> {
    Deconstructor(Deconstructor<T>),
    Getters(Vec<Getter<T>>),
}

/// Result of decoding one member
enum Decoded {
    Value(AnyValue),
    /// Elements of a variadic tail, not yet recombined
    Spread(Vec<AnyValue>),
}

/// Codec for a whole product type, built from its field plans
///
/// Immutable once assembled. Field values are exchanged with the product
/// type through the selected constructor and the field source.
pub struct CombinedCodec<T> {
    type_name: &'static str,
    fields: Vec<FieldCodec>,
    constructor: Option<Constructor<T>>,
    source: FieldSource<T>,
    has_var_args: bool,
}

impl<T: 'static> CombinedCodec<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldCodec] {
        &self.fields
    }

    /// External member names, in field order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(FieldCodec::name).collect()
    }

    pub fn field_kinds(&self) -> Vec<FieldKind> {
        self.fields.iter().map(|field| field.plan.kind()).collect()
    }

    pub fn has_var_args(&self) -> bool {
        self.has_var_args
    }

    pub(crate) fn decode(&self, tree: &Value) -> ReadResult<T> {
        let Value::Object(members) = tree else {
            return Err(ReadErrors::at_root(ReadError::invalid_type("object", tree)));
        };
        let Some(constructor) = &self.constructor else {
            return Err(ReadErrors::at_root(ReadError::Invalid(format!(
                "{} has no constructor",
                self.type_name
            ))));
        };

        let args = match self.fields.as_slice() {
            // A lone field is passed straight through
            [only] => match self.read_member(only, members, self.has_var_args)? {
                Decoded::Value(value) => ConstructorArgs::new(vec![value]),
                Decoded::Spread(rest) => ConstructorArgs::with_rest(Vec::new(), rest),
            },
            fields => {
                let last = fields.len() - 1;
                let decoded = fields.iter().enumerate().fold(
                    Ok::<_, ReadErrors>(Vec::with_capacity(fields.len())),
                    |acc, (index, field)| {
                        let spread = self.has_var_args && index == last;
                        zip(acc, self.read_member(field, members, spread)).map(
                            |(mut values, value)| {
                                values.push(value);
                                values
                            },
                        )
                    },
                )?;
                into_args(decoded)
            }
        };

        constructor.construct(args).map_err(ReadErrors::at_root)
    }

    fn read_member(
        &self,
        field: &FieldCodec,
        members: &Map<String, Value>,
        spread: bool,
    ) -> ReadResult<Decoded> {
        let name = field.name.as_str();
        let result = match (members.get(name), &field.plan) {
            (None | Some(Value::Null), FieldPlan::Optional { adapter, .. }) => adapter
                .wrap(None)
                .map(Decoded::Value)
                .map_err(ReadErrors::at_root),
            (None, _) => Err(ReadErrors::at_root(ReadError::MissingPath)),
            (Some(node), FieldPlan::Container { kind, element, .. }) if spread => {
                read_elements(*kind, element, node).map(|collected| match collected {
                    Collected::Items(items) => Decoded::Spread(items),
                    Collected::Entries(entries) => {
                        Decoded::Spread(entries.into_iter().map(|(_, value)| value).collect())
                    }
                })
            }
            (Some(node), plan) => read_plan(plan, node).map(Decoded::Value),
        };
        result.map_err(|errors| errors.prefixed(name))
    }

    pub(crate) fn encode(&self, value: &T) -> Value {
        let values: Vec<FieldRef<'_>> = match &self.source {
            FieldSource::Deconstructor(deconstructor) => deconstructor.deconstruct(value),
            FieldSource::Getters(getters) => match getters.as_slice() {
                [only] => vec![only.get(value)],
                getters => getters.iter().map(|getter| getter.get(value)).collect(),
            },
        };
        if values.len() != self.fields.len() {
            tracing::error!(
                type_name = self.type_name,
                expected = self.fields.len(),
                found = values.len(),
                "field source returned the wrong number of values"
            );
        }

        let mut object = Map::new();
        for (field, value) in self.fields.iter().zip(&values) {
            if let Some(node) = write_member(&field.plan, value) {
                object.insert(field.name.clone(), node);
            }
        }
        Value::Object(object)
    }
}

impl<T> fmt::Debug for CombinedCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedCodec")
            .field("type", &self.type_name)
            .field("fields", &self.fields)
            .field("has_var_args", &self.has_var_args)
            .finish_non_exhaustive()
    }
}

fn into_args(decoded: Vec<Decoded>) -> ConstructorArgs {
    let mut values = Vec::with_capacity(decoded.len());
    let mut rest = Vec::new();
    for item in decoded {
        match item {
            Decoded::Value(value) => values.push(value),
            Decoded::Spread(items) => rest = items,
        }
    }
    ConstructorArgs::with_rest(values, rest)
}

/// Decode one node; failure paths are relative to `node`
fn read_plan(plan: &FieldPlan, node: &Value) -> ReadResult<AnyValue> {
    match plan {
        FieldPlan::Element(element) => read_element(element, node),
        FieldPlan::Optional { inner, adapter } => {
            let inner = match node {
                Value::Null => None,
                node => Some(read_plan(inner, node)?),
            };
            adapter.wrap(inner).map_err(ReadErrors::at_root)
        }
        FieldPlan::Container {
            kind,
            element,
            adapter,
        } => {
            let collected = read_elements(*kind, element, node)?;
            adapter.collect(collected).map_err(ReadErrors::at_root)
        }
    }
}

fn read_element(element: &ElementPlan, node: &Value) -> ReadResult<AnyValue> {
    match element.codec().reader() {
        Some(reader) => reader(node),
        None => Err(ReadErrors::at_root(ReadError::Unresolved(
            element.key().name().to_string(),
        ))),
    }
}

/// Decode every element of a container node, accumulating failures
fn read_elements(kind: ContainerKind, element: &ElementPlan, node: &Value) -> ReadResult<Collected> {
    match (kind.is_sequential(), node) {
        (true, Value::Array(items)) => items
            .iter()
            .enumerate()
            .fold(Ok::<_, ReadErrors>(Vec::with_capacity(items.len())), |acc, (index, item)| {
                let item = read_element(element, item).map_err(|errors| errors.prefixed(index));
                zip(acc, item).map(|(mut items, item)| {
                    items.push(item);
                    items
                })
            })
            .map(Collected::Items),
        (false, Value::Object(entries)) => entries
            .iter()
            .fold(Ok::<_, ReadErrors>(Vec::with_capacity(entries.len())), |acc, (key, item)| {
                let item = read_element(element, item)
                    .map(|item| (key.clone(), item))
                    .map_err(|errors| errors.prefixed(key.as_str()));
                zip(acc, item).map(|(mut entries, entry)| {
                    entries.push(entry);
                    entries
                })
            })
            .map(Collected::Entries),
        (true, node) => Err(ReadErrors::at_root(ReadError::invalid_type("array", node))),
        (false, node) => Err(ReadErrors::at_root(ReadError::invalid_type("object", node))),
    }
}

/// Encode one field; `None` means the member is omitted
fn write_member(plan: &FieldPlan, value: &FieldRef<'_>) -> Option<Value> {
    match (plan, value) {
        (FieldPlan::Container { element, .. }, FieldRef::Spread(items)) => Some(Value::Array(
            items
                .iter()
                .map(|item| match item.as_any() {
                    Some(item) => write_element(element, item),
                    None => Value::Null,
                })
                .collect(),
        )),
        (_, FieldRef::Spread(_)) => {
            tracing::error!("spread value for a field that is not a container");
            Some(Value::Null)
        }
        (FieldPlan::Optional { inner, adapter }, value) => {
            let value = value.as_any()?;
            match adapter.unwrap(value) {
                Some(Some(inner_value)) => Some(write_plan(inner, inner_value)),
                Some(None) => None,
                None => {
                    tracing::error!(adapter = ?adapter, "optional field received a foreign value");
                    Some(Value::Null)
                }
            }
        }
        (plan, value) => value.as_any().map(|value| write_plan(plan, value)),
    }
}

fn write_plan(plan: &FieldPlan, value: &dyn Any) -> Value {
    match plan {
        FieldPlan::Element(element) => write_element(element, value),
        FieldPlan::Optional { inner, adapter } => match adapter.unwrap(value) {
            Some(Some(inner_value)) => write_plan(inner, inner_value),
            Some(None) => Value::Null,
            None => {
                tracing::error!(adapter = ?adapter, "optional value of a foreign type");
                Value::Null
            }
        },
        FieldPlan::Container {
            element, adapter, ..
        } => match adapter.members(value) {
            Some(Members::Items(items)) => Value::Array(
                items
                    .into_iter()
                    .map(|item| write_element(element, item))
                    .collect(),
            ),
            Some(Members::Entries(entries)) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, item)| (key.to_string(), write_element(element, item)))
                    .collect(),
            ),
            None => {
                tracing::error!(adapter = ?adapter, "container value of a foreign type");
                Value::Null
            }
        },
    }
}

fn write_element(element: &ElementPlan, value: &dyn Any) -> Value {
    match element.codec().writer() {
        Some(writer) => writer(value),
        None => {
            tracing::error!(type_name = element.key().name(), "no writer for field element");
            Value::Null
        }
    }
}

/// Build field codecs from accessors and their plans
pub(crate) fn field_codecs(accessors: &[Accessor], plans: Vec<FieldPlan>) -> Vec<FieldCodec> {
    accessors
        .iter()
        .zip(plans)
        .map(|(accessor, plan)| FieldCodec {
            name: accessor.name().to_string(),
            plan,
        })
        .collect()
}

/// Wire a combined codec to its deferred handle
pub(crate) fn finish<T: 'static>(
    codec: CombinedCodec<T>,
    deferred: &DeferredCodec<T>,
) -> Arc<CombinedCodec<T>> {
    let codec = Arc::new(codec);
    deferred.bind(&codec);
    tracing::debug!(
        type_name = codec.type_name,
        fields = codec.fields.len(),
        "assembled codec"
    );
    codec
}

/// Derive a combined codec from a descriptor
///
/// `need` decides which halves the registry must provide for every plain
/// field; the deferred handle always offers both.
pub fn assemble<T: 'static>(
    descriptor: &ProductDescriptor<T>,
    registry: &CodecRegistry,
    need: Need,
) -> Result<Arc<CombinedCodec<T>>, DeriveError> {
    let resolution = resolve(descriptor)?;

    let deferred = DeferredCodec::<T>::new();
    let classifier = Classifier::new(registry, need, descriptor.key(), deferred.erased());
    let plans = classifier.classify_all(resolution.accessors())?;

    let constructor = descriptor.constructors()[resolution.constructor()].clone();
    let deconstructor = descriptor.deconstructors()[resolution.deconstructor()].clone();

    let codec = CombinedCodec {
        type_name: descriptor.type_name(),
        fields: field_codecs(resolution.accessors(), plans),
        constructor: Some(constructor),
        source: FieldSource::Deconstructor(deconstructor),
        has_var_args: resolution.has_var_args(),
    };
    Ok(finish(codec, &deferred))
}

/// Combined codec that writes through getters and has no read half
pub(crate) fn getter_codec<T: 'static>(
    type_name: &'static str,
    fields: Vec<FieldCodec>,
    getters: Vec<Getter<T>>,
) -> CombinedCodec<T> {
    CombinedCodec {
        type_name,
        fields,
        constructor: None,
        source: FieldSource::Getters(getters),
        has_var_args: false,
    }
}
