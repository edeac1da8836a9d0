//! Explicit per-type schemas.
//!
//! A [`StructSchema`] lists a record type's fields in order, each with its
//! rule string and the [`Shape`] of its value, so the walker knows where
//! nested records live without runtime reflection.

use indexmap::IndexMap;
use std::sync::Arc;

static PLAIN: Shape = Shape::Value;

/// Where nested records appear inside a field's value.
#[derive(Debug, Clone, Default)]
pub enum Shape {
    /// A scalar, or a container whose elements are not records.
    #[default]
    Value,
    /// A nested record validated against its own schema.
    Record(Arc<StructSchema>),
    /// A sequence whose elements have the inner shape.
    List(Box<Shape>),
    /// A map whose values have the inner shape.
    Map(Box<Shape>),
}

impl Shape {
    /// A nested record of the given schema.
    pub fn record(schema: impl Into<Arc<StructSchema>>) -> Self {
        Shape::Record(schema.into())
    }

    /// A sequence of elements of the given shape.
    pub fn list(inner: Shape) -> Self {
        Shape::List(Box::new(inner))
    }

    /// A map with values of the given shape.
    pub fn map(inner: Shape) -> Self {
        Shape::Map(Box::new(inner))
    }

    /// The shape of elements one `dive` below this one.
    pub(crate) fn element(&self) -> &Shape {
        match self {
            Shape::List(inner) | Shape::Map(inner) => inner,
            _ => &PLAIN,
        }
    }
}

/// Definition of a field within a struct schema.
#[derive(Debug, Clone)]
pub struct FieldDef {
    rules: String,
    shape: Shape,
}

impl FieldDef {
    /// Returns the raw rule string.
    pub fn rules(&self) -> &str {
        &self.rules
    }

    /// Returns the shape of the field's value.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// The validation schema of one record type.
///
/// Fields are validated, and failures reported, in the order they are added.
/// The schema name identifies the type for struct-level validators.
///
/// # Example
///
/// ```rust
/// use tagcheck::StructSchema;
///
/// let address = StructSchema::new("Address")
///     .field("City", "required")
///     .field("Country", "required");
///
/// let school = StructSchema::new("School").field("Name", "required");
///
/// let user = StructSchema::new("User")
///     .field("Id", "required")
///     .field("Name", "required")
///     .list("Addresses", "required,dive", address)
///     .field("Hobbies", "dive,required,min=3")
///     .map("Schools", "dive,keys,required,endkeys,dive", school)
///     .field("Wallets", "dive,keys,required,endkeys,required,gt=500");
///
/// assert_eq!(user.name(), "User");
/// assert_eq!(user.len(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct StructSchema {
    name: String,
    fields: IndexMap<String, FieldDef>,
}

impl StructSchema {
    /// Creates a schema with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Adds a field whose value contains no nested records.
    pub fn field(self, name: impl Into<String>, rules: impl Into<String>) -> Self {
        self.field_with(name, rules, Shape::Value)
    }

    /// Adds a field holding a nested record.
    ///
    /// The nested record is always validated against its schema, whatever the
    /// outcome of the field's own rules.
    pub fn nested(
        self,
        name: impl Into<String>,
        rules: impl Into<String>,
        schema: impl Into<Arc<StructSchema>>,
    ) -> Self {
        self.field_with(name, rules, Shape::record(schema))
    }

    /// Adds a field holding a sequence of records; pair it with `dive`.
    pub fn list(
        self,
        name: impl Into<String>,
        rules: impl Into<String>,
        schema: impl Into<Arc<StructSchema>>,
    ) -> Self {
        self.field_with(name, rules, Shape::list(Shape::record(schema)))
    }

    /// Adds a field holding a map of records; pair it with `dive`.
    pub fn map(
        self,
        name: impl Into<String>,
        rules: impl Into<String>,
        schema: impl Into<Arc<StructSchema>>,
    ) -> Self {
        self.field_with(name, rules, Shape::map(Shape::record(schema)))
    }

    /// Adds a field with an explicit shape.
    pub fn field_with(
        mut self,
        name: impl Into<String>,
        rules: impl Into<String>,
        shape: Shape,
    ) -> Self {
        self.fields.insert(
            name.into(),
            FieldDef {
                rules: rules.into(),
                shape,
            },
        );
        self
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a field definition by name.
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
