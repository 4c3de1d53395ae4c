use crate::error::{StitchError, StitchResult};
use crate::template::Arg;
use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};

/// Database-side type hint for a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbType {
    AnsiString,
    AnsiStringFixedLength,
    String,
    StringFixedLength,
    Binary,
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Currency,
    Date,
    Time,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Guid,
    Json,
    Xml,
    Object,
}

/// Direction of a bound parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

/// Binding metadata attached to a parameter.
///
/// All fields are optional; `None` leaves the decision to the database-access
/// layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ParamOptions {
    /// Overrides the kind derived from the value.
    pub kind: Option<ValueKind>,
    pub db_type: Option<DbType>,
    pub direction: Option<Direction>,
    pub size: Option<i32>,
    pub precision: Option<u8>,
    pub scale: Option<u8>,
}

impl ParamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_db_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// An explicit parameter wrapper.
///
/// Unlike a bare value, a descriptor is always eligible for reuse: formatting
/// two equal descriptors in one builder yields one placeholder and one bag
/// entry. Equality covers the value, its effective kind and every field of
/// [`ParamOptions`]. Descriptors wrapping a null value are never reused.
///
/// # Example
/// ```ignore
/// use sqlstitch::{DbType, ParamDescriptor};
///
/// let name = ParamDescriptor::new("John").with_db_type(DbType::AnsiString).with_size(100);
/// let mut b = sqlstitch::builder();
/// b.append(sqlstitch::sql!("WHERE Name = {name.clone()} OR Alias = {name}"));
/// assert_eq!(b.sql(), " WHERE Name = @p0 OR Alias = @p0");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    value: Value,
    options: ParamOptions,
    name: Option<String>,
}

impl ParamDescriptor {
    /// Wrap a value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            options: ParamOptions::default(),
            name: None,
        }
    }

    /// Wrap an already converted template argument.
    ///
    /// Fails with [`StitchError::NestedParameter`] when `arg` is itself a
    /// descriptor or a nested template.
    pub fn wrap(arg: Arg) -> StitchResult<Self> {
        match arg {
            Arg::Value(value) => Ok(Self::new(value)),
            Arg::Param(_) | Arg::Template(_) => Err(StitchError::NestedParameter),
        }
    }

    pub fn with_options(mut self, options: ParamOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.options.kind = Some(kind);
        self
    }

    pub fn with_db_type(mut self, db_type: DbType) -> Self {
        self.options.db_type = Some(db_type);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.options.direction = Some(direction);
        self
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.options.size = Some(size);
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.options.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: u8) -> Self {
        self.options.scale = Some(scale);
        self
    }

    /// Consuming form of [`set_name`](Self::set_name).
    pub fn named(mut self, name: impl Into<String>) -> StitchResult<Self> {
        self.set_name(name)?;
        Ok(self)
    }

    /// Assign the parameter name. A descriptor can be named only once.
    pub fn set_name(&mut self, name: impl Into<String>) -> StitchResult<()> {
        if let Some(existing) = &self.name {
            return Err(StitchError::AlreadyNamed {
                name: existing.clone(),
            });
        }
        self.name = Some(name.into());
        Ok(())
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared kind: the override if set, otherwise the value's own kind.
    pub fn kind(&self) -> ValueKind {
        self.options.kind.unwrap_or_else(|| self.value.kind())
    }

    pub fn options(&self) -> &ParamOptions {
        &self.options
    }

    /// Options with the kind resolved, as stored in the parameter bag.
    pub(crate) fn resolved_options(&self) -> ParamOptions {
        ParamOptions {
            kind: Some(self.kind()),
            ..self.options
        }
    }

    pub(crate) fn into_parts(self) -> (Value, ParamOptions, Option<String>) {
        let options = self.resolved_options();
        (self.value, options, self.name)
    }
}
