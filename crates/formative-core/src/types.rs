//! Structural description of declared field types
//!
//! A [`FieldType`] records the identity of a declared type together with the
//! shape the derivation engine cares about: plain, optional, boxed, or a
//! homogeneous container. The non-plain shapes carry type-erased adapters that
//! wrap decoded values into the concrete Rust type and expose its contents
//! again for writing, so the engine never needs to name the type itself.

use crate::error::ReadError;
use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A decoded value whose concrete type is known only to its consumer
pub type AnyValue = Box<dyn Any>;

/// Identity of a type: its `TypeId` plus a name for diagnostics
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this is a tuple type, including `()`
    pub fn is_tuple_like(&self) -> bool {
        self.name.starts_with('(')
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Homogeneous container families
///
/// Each family needs its own recombination strategy: sequences decode from
/// and encode to arrays, maps from and to objects keyed by string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// `Vec<T>`
    List,
    /// `HashSet<T>`, `BTreeSet<T>`
    Set,
    /// `VecDeque<T>`
    Sequence,
    /// `HashMap<String, T>`, `BTreeMap<String, T>`
    Map,
}

impl ContainerKind {
    /// Whether the container is encoded as an array
    pub fn is_sequential(&self) -> bool {
        !matches!(self, ContainerKind::Map)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::List => write!(f, "list"),
            ContainerKind::Set => write!(f, "set"),
            ContainerKind::Sequence => write!(f, "sequence"),
            ContainerKind::Map => write!(f, "map"),
        }
    }
}

/// Decoded container contents, prior to recombination
pub enum Collected {
    Items(Vec<AnyValue>),
    Entries(Vec<(String, AnyValue)>),
}

/// Borrowed container contents, for encoding
pub enum Members<'a> {
    Items(Vec<&'a dyn Any>),
    Entries(Vec<(&'a str, &'a dyn Any)>),
}

/// Wraps and unwraps `Option<U>` without naming `U`
#[derive(Clone, Copy)]
pub struct OptionAdapter {
    element: &'static str,
    wrap: fn(Option<AnyValue>) -> Result<AnyValue, ReadError>,
    unwrap: fn(&dyn Any) -> Option<Option<&dyn Any>>,
}

impl OptionAdapter {
    pub fn of<U: 'static>() -> Self {
        Self {
            element: type_name::<U>(),
            wrap: wrap_option::<U>,
            unwrap: unwrap_option::<U>,
        }
    }

    /// Build `Option<U>` from an optionally decoded `U`
    pub fn wrap(&self, value: Option<AnyValue>) -> Result<AnyValue, ReadError> {
        (self.wrap)(value)
    }

    /// Borrow the `U` inside an `Option<U>`
    ///
    /// Returns `None` when `value` is not an `Option<U>` at all.
    pub fn unwrap<'a>(&self, value: &'a dyn Any) -> Option<Option<&'a dyn Any>> {
        (self.unwrap)(value)
    }
}

impl fmt::Debug for OptionAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionAdapter<{}>", self.element)
    }
}

fn wrap_option<U: 'static>(value: Option<AnyValue>) -> Result<AnyValue, ReadError> {
    match value {
        None => Ok(Box::new(Option::<U>::None)),
        Some(value) => value
            .downcast::<U>()
            .map(|inner| Box::new(Some(*inner)) as AnyValue)
            .map_err(|_| ReadError::ArgumentMismatch(type_name::<U>().to_string())),
    }
}

fn unwrap_option<U: 'static>(value: &dyn Any) -> Option<Option<&dyn Any>> {
    value
        .downcast_ref::<Option<U>>()
        .map(|option| option.as_ref().map(|inner| inner as &dyn Any))
}

/// Boxes and unboxes `Box<U>` without naming `U`
#[derive(Clone, Copy)]
pub struct BoxAdapter {
    element: &'static str,
    wrap: fn(AnyValue) -> Result<AnyValue, ReadError>,
    unwrap: fn(&dyn Any) -> Option<&dyn Any>,
}

impl BoxAdapter {
    pub fn of<U: 'static>() -> Self {
        Self {
            element: type_name::<U>(),
            wrap: wrap_box::<U>,
            unwrap: unwrap_box::<U>,
        }
    }

    /// Build `Box<U>` from a decoded `U`
    pub fn wrap(&self, value: AnyValue) -> Result<AnyValue, ReadError> {
        (self.wrap)(value)
    }

    /// Borrow the `U` inside a `Box<U>`
    ///
    /// Returns `None` when `value` is not a `Box<U>`.
    pub fn unwrap<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.unwrap)(value)
    }
}

impl fmt::Debug for BoxAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxAdapter<{}>", self.element)
    }
}

fn wrap_box<U: 'static>(value: AnyValue) -> Result<AnyValue, ReadError> {
    value
        .downcast::<U>()
        .map(|inner| Box::new(inner) as AnyValue)
        .map_err(|_| ReadError::ArgumentMismatch(type_name::<U>().to_string()))
}

fn unwrap_box<U: 'static>(value: &dyn Any) -> Option<&dyn Any> {
    value
        .downcast_ref::<Box<U>>()
        .map(|inner| &**inner as &dyn Any)
}

/// Recombines decoded elements into a concrete container and back
#[derive(Clone, Copy)]
pub struct ContainerAdapter {
    container: &'static str,
    collect: fn(Collected) -> Result<AnyValue, ReadError>,
    members: fn(&dyn Any) -> Option<Members<'_>>,
}

impl ContainerAdapter {
    fn items<U, C>() -> Self
    where
        U: 'static,
        C: FromIterator<U> + 'static,
        for<'x> &'x C: IntoIterator<Item = &'x U>,
    {
        Self {
            container: type_name::<C>(),
            collect: collect_items::<U, C>,
            members: item_members::<U, C>,
        }
    }

    fn entries<U, C>() -> Self
    where
        U: 'static,
        C: FromIterator<(String, U)> + 'static,
        for<'x> &'x C: IntoIterator<Item = (&'x String, &'x U)>,
    {
        Self {
            container: type_name::<C>(),
            collect: collect_entries::<U, C>,
            members: entry_members::<U, C>,
        }
    }

    /// Build the container from decoded contents
    pub fn collect(&self, contents: Collected) -> Result<AnyValue, ReadError> {
        (self.collect)(contents)
    }

    /// Borrow the contents of a container value, in iteration order
    ///
    /// Returns `None` when `value` is not this adapter's container type.
    pub fn members<'a>(&self, value: &'a dyn Any) -> Option<Members<'a>> {
        (self.members)(value)
    }
}

impl fmt::Debug for ContainerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerAdapter<{}>", self.container)
    }
}

fn downcast_value<U: 'static>(value: AnyValue) -> Result<U, ReadError> {
    value
        .downcast::<U>()
        .map(|inner| *inner)
        .map_err(|_| ReadError::ArgumentMismatch(type_name::<U>().to_string()))
}

fn collect_items<U, C>(contents: Collected) -> Result<AnyValue, ReadError>
where
    U: 'static,
    C: FromIterator<U> + 'static,
{
    match contents {
        Collected::Items(items) => {
            let container = items
                .into_iter()
                .map(downcast_value::<U>)
                .collect::<Result<C, _>>()?;
            Ok(Box::new(container))
        }
        Collected::Entries(_) => Err(ReadError::ArgumentMismatch(type_name::<C>().to_string())),
    }
}

fn collect_entries<U, C>(contents: Collected) -> Result<AnyValue, ReadError>
where
    U: 'static,
    C: FromIterator<(String, U)> + 'static,
{
    match contents {
        Collected::Entries(entries) => {
            let container = entries
                .into_iter()
                .map(|(key, value)| downcast_value::<U>(value).map(|value| (key, value)))
                .collect::<Result<C, _>>()?;
            Ok(Box::new(container))
        }
        Collected::Items(_) => Err(ReadError::ArgumentMismatch(type_name::<C>().to_string())),
    }
}

fn item_members<U, C>(value: &dyn Any) -> Option<Members<'_>>
where
    U: 'static,
    C: 'static,
    for<'x> &'x C: IntoIterator<Item = &'x U>,
{
    let container = value.downcast_ref::<C>()?;
    Some(Members::Items(
        container.into_iter().map(|item| item as &dyn Any).collect(),
    ))
}

fn entry_members<U, C>(value: &dyn Any) -> Option<Members<'_>>
where
    U: 'static,
    C: 'static,
    for<'x> &'x C: IntoIterator<Item = (&'x String, &'x U)>,
{
    let container = value.downcast_ref::<C>()?;
    Some(Members::Entries(
        container
            .into_iter()
            .map(|(key, item)| (key.as_str(), item as &dyn Any))
            .collect(),
    ))
}

/// Shape of a declared type
#[derive(Debug, Clone)]
pub enum Shape {
    /// Anything the engine does not look inside
    Plain,
    /// `Option<inner>`
    Optional {
        inner: Box<FieldType>,
        adapter: OptionAdapter,
    },
    /// `Box<inner>`, read and written as `inner` itself
    Boxed {
        inner: Box<FieldType>,
        adapter: BoxAdapter,
    },
    /// A homogeneous container of `element`
    Container {
        kind: ContainerKind,
        element: Box<FieldType>,
        adapter: ContainerAdapter,
    },
}

/// A declared field type: identity plus structural shape
#[derive(Debug, Clone)]
pub struct FieldType {
    key: TypeKey,
    shape: Shape,
}

impl FieldType {
    /// A type resolved as a whole through the codec registry
    pub fn plain<T: 'static>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            shape: Shape::Plain,
        }
    }

    /// `Option<U>`, where `inner` describes `U`
    pub fn optional<U: 'static>(inner: FieldType) -> Self {
        debug_assert_eq!(inner.key, TypeKey::of::<U>());
        Self {
            key: TypeKey::of::<Option<U>>(),
            shape: Shape::Optional {
                inner: Box::new(inner),
                adapter: OptionAdapter::of::<U>(),
            },
        }
    }

    /// `Box<U>`, where `inner` describes `U`
    pub fn boxed<U: 'static>(inner: FieldType) -> Self {
        debug_assert_eq!(inner.key, TypeKey::of::<U>());
        Self {
            key: TypeKey::of::<Box<U>>(),
            shape: Shape::Boxed {
                inner: Box::new(inner),
                adapter: BoxAdapter::of::<U>(),
            },
        }
    }

    /// `Vec<U>`
    pub fn list<U: 'static>() -> Self {
        Self::container::<Vec<U>, U>(ContainerKind::List, ContainerAdapter::items::<U, Vec<U>>())
    }

    /// `VecDeque<U>`
    pub fn sequence<U: 'static>() -> Self {
        Self::container::<VecDeque<U>, U>(
            ContainerKind::Sequence,
            ContainerAdapter::items::<U, VecDeque<U>>(),
        )
    }

    /// `HashSet<U>`
    pub fn hash_set<U: Eq + Hash + 'static>() -> Self {
        Self::container::<HashSet<U>, U>(
            ContainerKind::Set,
            ContainerAdapter::items::<U, HashSet<U>>(),
        )
    }

    /// `BTreeSet<U>`
    pub fn btree_set<U: Ord + 'static>() -> Self {
        Self::container::<BTreeSet<U>, U>(
            ContainerKind::Set,
            ContainerAdapter::items::<U, BTreeSet<U>>(),
        )
    }

    /// `HashMap<String, U>`
    pub fn hash_map<U: 'static>() -> Self {
        Self::container::<HashMap<String, U>, U>(
            ContainerKind::Map,
            ContainerAdapter::entries::<U, HashMap<String, U>>(),
        )
    }

    /// `BTreeMap<String, U>`
    pub fn btree_map<U: 'static>() -> Self {
        Self::container::<BTreeMap<String, U>, U>(
            ContainerKind::Map,
            ContainerAdapter::entries::<U, BTreeMap<String, U>>(),
        )
    }

    fn container<C: 'static, U: 'static>(kind: ContainerKind, adapter: ContainerAdapter) -> Self {
        Self {
            key: TypeKey::of::<C>(),
            shape: Shape::Container {
                kind,
                element: Box::new(FieldType::plain::<U>()),
                adapter,
            },
        }
    }

    /// Replace a container's element description
    ///
    /// Containers describe their element as plain by default. A boxed
    /// element such as the `Box<Node>` in `Vec<Box<Node>>` is described
    /// here so the engine can look through it. Has no effect on types that
    /// are not containers.
    pub fn with_element(mut self, described: FieldType) -> Self {
        if let Shape::Container { element, .. } = &mut self.shape {
            debug_assert_eq!(element.key, described.key);
            **element = described;
        }
        self
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Element type, for containers
    pub fn element(&self) -> Option<&FieldType> {
        match &self.shape {
            Shape::Container { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Container family, for containers
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match &self.shape {
            Shape::Container { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "types/types_tests.rs"]
mod types_tests;
