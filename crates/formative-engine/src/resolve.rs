//! Accessor resolution
//!
//! Turns a [`ProductDescriptor`] into the ordered list of accessors the rest
//! of the engine works from, after checking that some constructor can
//! rebuild what the deconstructor takes apart.

use formative_core::{
    DeriveError, FieldDecl, FieldType, Param, ProductDescriptor, ResultShape,
};

/// One field of a product type
#[derive(Debug, Clone)]
pub struct Accessor {
    name: String,
    declared: FieldType,
    position: usize,
}

impl Accessor {
    pub fn new(name: impl Into<String>, declared: FieldType, position: usize) -> Self {
        Self {
            name: name.into(),
            declared,
            position,
        }
    }

    /// External path segment, used verbatim
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> &FieldType {
        &self.declared
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Outcome of resolving a product type
#[derive(Debug, Clone)]
pub struct Resolution {
    accessors: Vec<Accessor>,
    constructor: usize,
    deconstructor: usize,
    has_var_args: bool,
}

impl Resolution {
    /// Accessors in deconstruction order
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// Index of the selected constructor overload
    pub fn constructor(&self) -> usize {
        self.constructor
    }

    /// Index of the selected deconstructor
    pub fn deconstructor(&self) -> usize {
        self.deconstructor
    }

    /// Whether the last field is spread into a variadic parameter
    pub fn has_var_args(&self) -> bool {
        self.has_var_args
    }
}

/// Resolve the accessors of a product type
///
/// Checks run in a fixed order: deconstructor presence, constructor
/// presence, result shape, then overload matching. The first failing check
/// decides the error.
pub fn resolve<T: 'static>(descriptor: &ProductDescriptor<T>) -> Result<Resolution, DeriveError> {
    let type_name = descriptor.type_name().to_string();
    let deconstructors = descriptor.deconstructors();

    // A variadic form is preferred whenever one exists
    let (deconstructor, has_var_args) = match deconstructors.iter().position(|d| d.is_variadic()) {
        Some(index) => (index, true),
        None if !deconstructors.is_empty() => (0, false),
        None => return Err(DeriveError::NoDeconstructor { type_name }),
    };

    if descriptor.constructors().is_empty() {
        return Err(DeriveError::NoConstructor { type_name });
    }

    let fields = result_fields(deconstructors[deconstructor].shape(), &type_name)?;

    let constructor = descriptor
        .constructors()
        .iter()
        .position(|c| signature_matches(c.params(), &fields, has_var_args))
        .ok_or_else(|| DeriveError::NoMatchingConstructor {
            type_name: type_name.clone(),
            fields: fields.iter().map(|f| f.declared().name().to_string()).collect(),
        })?;

    tracing::debug!(
        type_name = %type_name,
        constructor,
        deconstructor,
        has_var_args,
        fields = fields.len(),
        "resolved accessors"
    );

    let accessors = fields
        .into_iter()
        .enumerate()
        .map(|(position, field)| Accessor::new(field.name(), field.declared().clone(), position))
        .collect();

    Ok(Resolution {
        accessors,
        constructor,
        deconstructor,
        has_var_args,
    })
}

fn result_fields(shape: &ResultShape, type_name: &str) -> Result<Vec<FieldDecl>, DeriveError> {
    match shape {
        ResultShape::Unit => Err(DeriveError::EmptyProduct {
            type_name: type_name.to_string(),
        }),
        ResultShape::Tuple(fields) if fields.is_empty() => Err(DeriveError::EmptyProduct {
            type_name: type_name.to_string(),
        }),
        ResultShape::Tuple(fields) => Ok(fields.clone()),
        ResultShape::Single(field) => Ok(vec![field.clone()]),
        // An opaque aggregate hides its members, so nothing can be matched against it
        ResultShape::Opaque(field) if field.declared().key().is_tuple_like() => {
            Err(DeriveError::NoMatchingConstructor {
                type_name: type_name.to_string(),
                fields: vec![field.declared().name().to_string()],
            })
        }
        ResultShape::Opaque(field) => Ok(vec![field.clone()]),
    }
}

/// Structural match of a constructor signature against deconstructed fields
fn signature_matches(params: &[Param], fields: &[FieldDecl], has_var_args: bool) -> bool {
    if params.len() != fields.len() {
        return false;
    }
    let (Some((last_param, prefix_params)), Some((last_field, prefix_fields))) =
        (params.split_last(), fields.split_last())
    else {
        return false;
    };

    let prefix_matches = prefix_params
        .iter()
        .zip(prefix_fields)
        .all(|(param, field)| matches!(param, Param::Exact(key) if *key == field.declared().key()));
    if !prefix_matches {
        return false;
    }

    match (last_param, has_var_args) {
        (Param::Exact(key), false) => *key == last_field.declared().key(),
        (Param::Variadic(element), true) => {
            let declared = last_field.declared();
            declared.container_kind().is_some_and(|kind| kind.is_sequential())
                && declared.element().is_some_and(|e| e.key() == *element)
        }
        _ => false,
    }
}
