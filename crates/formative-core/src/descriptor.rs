//! Product type descriptors
//!
//! A [`ProductDescriptor`] is everything the derivation engine knows about a
//! product type: its identity, its candidate constructors, its
//! deconstructors, and optionally a set of getters. `#[derive(Product)]` and
//! `#[getters]` emit descriptors; they can also be written by hand, which is
//! how constructor overloads and variadic constructors are described.

use crate::error::ReadError;
use crate::types::{AnyValue, FieldType, TypeKey};
use std::any::{Any, type_name};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// A type the engine can derive codecs for
pub trait Product: Sized + 'static {
    fn descriptor() -> ProductDescriptor<Self>;
}

/// A type exposing public accessor methods for the getter-only writer path
pub trait Getters: Sized + 'static {
    fn getters() -> Vec<Getter<Self>>;
}

/// One field value produced by a deconstructor or getter
pub enum FieldRef<'a> {
    /// Borrowed from the value being written
    Borrowed(&'a dyn Any),
    /// Computed on the fly
    Owned(AnyValue),
    /// Trailing variadic elements, written as one array
    Spread(Vec<FieldRef<'a>>),
}

impl<'a> FieldRef<'a> {
    pub fn borrowed<U: 'static>(value: &'a U) -> Self {
        FieldRef::Borrowed(value)
    }

    pub fn owned<U: 'static>(value: U) -> Self {
        FieldRef::Owned(Box::new(value))
    }

    pub fn spread<U, I>(items: I) -> Self
    where
        U: 'static,
        I: IntoIterator<Item = &'a U>,
    {
        FieldRef::Spread(items.into_iter().map(FieldRef::borrowed).collect())
    }

    /// The value itself; `None` for a spread
    pub fn as_any(&self) -> Option<&dyn Any> {
        match self {
            FieldRef::Borrowed(value) => Some(*value),
            FieldRef::Owned(value) => Some(&**value),
            FieldRef::Spread(_) => None,
        }
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Borrowed(_) => write!(f, "Borrowed(..)"),
            FieldRef::Owned(_) => write!(f, "Owned(..)"),
            FieldRef::Spread(items) => write!(f, "Spread({} items)", items.len()),
        }
    }
}

/// A named field as declared by a deconstructor's result
#[derive(Debug, Clone)]
pub struct FieldDecl {
    name: String,
    declared: FieldType,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, declared: FieldType) -> Self {
        Self {
            name: name.into(),
            declared,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> &FieldType {
        &self.declared
    }
}

/// What a deconstructor returns
#[derive(Debug, Clone)]
pub enum ResultShape {
    /// No fields at all
    Unit,
    /// Exactly one field, returned directly
    Single(FieldDecl),
    /// A fixed-size aggregate of fields
    Tuple(Vec<FieldDecl>),
    /// A single value whose structure the descriptor does not spell out
    Opaque(FieldDecl),
}

type DeconstructFn<T> = Arc<dyn for<'a> Fn(&'a T) -> Vec<FieldRef<'a>> + Send + Sync>;

/// Splits a value into its fields, in declaration order
pub struct Deconstructor<T> {
    shape: ResultShape,
    variadic: bool,
    call: DeconstructFn<T>,
}

impl<T> Deconstructor<T> {
    pub fn new<F>(shape: ResultShape, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Vec<FieldRef<'a>> + Send + Sync + 'static,
    {
        Self {
            shape,
            variadic: false,
            call: Arc::new(f),
        }
    }

    /// A deconstructor whose last field is returned as [`FieldRef::Spread`]
    pub fn variadic<F>(shape: ResultShape, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Vec<FieldRef<'a>> + Send + Sync + 'static,
    {
        Self {
            shape,
            variadic: true,
            call: Arc::new(f),
        }
    }

    pub fn shape(&self) -> &ResultShape {
        &self.shape
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn deconstruct<'a>(&self, value: &'a T) -> Vec<FieldRef<'a>> {
        (self.call)(value)
    }
}

impl<T> Clone for Deconstructor<T> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            variadic: self.variadic,
            call: Arc::clone(&self.call),
        }
    }
}

impl<T> fmt::Debug for Deconstructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deconstructor")
            .field("shape", &self.shape)
            .field("variadic", &self.variadic)
            .finish_non_exhaustive()
    }
}

/// One constructor parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Exactly this type
    Exact(TypeKey),
    /// Any number of trailing arguments of this element type
    Variadic(TypeKey),
}

impl Param {
    pub fn exact<U: 'static>() -> Self {
        Param::Exact(TypeKey::of::<U>())
    }

    pub fn variadic<U: 'static>() -> Self {
        Param::Variadic(TypeKey::of::<U>())
    }
}

/// Decoded arguments handed to a constructor, in parameter order
pub struct ConstructorArgs {
    values: VecDeque<AnyValue>,
    rest: Vec<AnyValue>,
}

impl ConstructorArgs {
    pub fn new(values: Vec<AnyValue>) -> Self {
        Self {
            values: values.into(),
            rest: Vec::new(),
        }
    }

    /// Arguments whose variadic tail has been spread into `rest`
    pub fn with_rest(values: Vec<AnyValue>, rest: Vec<AnyValue>) -> Self {
        Self {
            values: values.into(),
            rest,
        }
    }

    /// Number of positional arguments not yet taken
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Take the next positional argument
    pub fn take<U: 'static>(&mut self) -> Result<U, ReadError> {
        let value = self
            .values
            .pop_front()
            .ok_or_else(|| ReadError::ArgumentMismatch(type_name::<U>().to_string()))?;
        value
            .downcast::<U>()
            .map(|value| *value)
            .map_err(|_| ReadError::ArgumentMismatch(type_name::<U>().to_string()))
    }

    /// Take the spread variadic tail
    pub fn rest<U: 'static>(&mut self) -> Result<Vec<U>, ReadError> {
        std::mem::take(&mut self.rest)
            .into_iter()
            .map(|value| {
                value
                    .downcast::<U>()
                    .map(|value| *value)
                    .map_err(|_| ReadError::ArgumentMismatch(type_name::<U>().to_string()))
            })
            .collect()
    }
}

type ConstructFn<T> = Arc<dyn Fn(ConstructorArgs) -> Result<T, ReadError> + Send + Sync>;

/// Rebuilds a value from its fields
pub struct Constructor<T> {
    params: Vec<Param>,
    call: ConstructFn<T>,
}

impl<T> Constructor<T> {
    pub fn new<F>(params: Vec<Param>, f: F) -> Self
    where
        F: Fn(ConstructorArgs) -> Result<T, ReadError> + Send + Sync + 'static,
    {
        Self {
            params,
            call: Arc::new(f),
        }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Whether the last parameter is variadic
    pub fn is_variadic(&self) -> bool {
        matches!(self.params.last(), Some(Param::Variadic(_)))
    }

    pub fn construct(&self, args: ConstructorArgs) -> Result<T, ReadError> {
        (self.call)(args)
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            call: Arc::clone(&self.call),
        }
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

type GetterFn<T> = Arc<dyn for<'a> Fn(&'a T) -> FieldRef<'a> + Send + Sync>;

/// A zero-argument, side-effect-free accessor
pub struct Getter<T> {
    name: String,
    declared: FieldType,
    call: GetterFn<T>,
}

impl<T> Getter<T> {
    pub fn new<F>(name: impl Into<String>, declared: FieldType, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> FieldRef<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            declared,
            call: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> &FieldType {
        &self.declared
    }

    pub fn get<'a>(&self, value: &'a T) -> FieldRef<'a> {
        (self.call)(value)
    }
}

impl<T> Clone for Getter<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            declared: self.declared.clone(),
            call: Arc::clone(&self.call),
        }
    }
}

impl<T> fmt::Debug for Getter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Getter")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}

/// Everything known about a product type
pub struct ProductDescriptor<T> {
    key: TypeKey,
    constructors: Vec<Constructor<T>>,
    deconstructors: Vec<Deconstructor<T>>,
    getters: Vec<Getter<T>>,
}

impl<T: 'static> ProductDescriptor<T> {
    pub fn new() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            constructors: Vec::new(),
            deconstructors: Vec::new(),
            getters: Vec::new(),
        }
    }

    /// Descriptor carrying only the getters of a [`Getters`] type
    pub fn from_getters() -> Self
    where
        T: Getters,
    {
        Self::new().with_getters(T::getters())
    }

    /// Add a constructor overload; earlier overloads are preferred
    pub fn constructor<F>(mut self, params: Vec<Param>, f: F) -> Self
    where
        F: Fn(ConstructorArgs) -> Result<T, ReadError> + Send + Sync + 'static,
    {
        self.constructors.push(Constructor::new(params, f));
        self
    }

    pub fn deconstructor<F>(mut self, shape: ResultShape, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Vec<FieldRef<'a>> + Send + Sync + 'static,
    {
        self.deconstructors.push(Deconstructor::new(shape, f));
        self
    }

    pub fn variadic_deconstructor<F>(mut self, shape: ResultShape, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Vec<FieldRef<'a>> + Send + Sync + 'static,
    {
        self.deconstructors.push(Deconstructor::variadic(shape, f));
        self
    }

    pub fn getter<F>(mut self, name: impl Into<String>, declared: FieldType, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> FieldRef<'a> + Send + Sync + 'static,
    {
        self.getters.push(Getter::new(name, declared, f));
        self
    }

    pub fn with_getters(mut self, getters: Vec<Getter<T>>) -> Self {
        self.getters.extend(getters);
        self
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn type_name(&self) -> &'static str {
        self.key.name()
    }

    pub fn constructors(&self) -> &[Constructor<T>] {
        &self.constructors
    }

    pub fn deconstructors(&self) -> &[Deconstructor<T>] {
        &self.deconstructors
    }

    pub fn getters(&self) -> &[Getter<T>] {
        &self.getters
    }
}

impl<T: 'static> Default for ProductDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ProductDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductDescriptor")
            .field("type", &self.key)
            .field("constructors", &self.constructors)
            .field("deconstructors", &self.deconstructors)
            .field("getters", &self.getters)
            .finish()
    }
}
