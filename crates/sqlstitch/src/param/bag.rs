use super::descriptor::{Direction, ParamOptions};
use crate::error::{StitchError, StitchResult};
use crate::value::{FromValue, Value, ValueKind};
use serde::Serialize;
use std::collections::HashMap;

/// One named entry of a [`Parameters`] bag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub value: Value,
    #[serde(flatten)]
    pub options: ParamOptions,
}

impl Parameter {
    /// The declared kind, falling back to the value's own kind.
    pub fn kind(&self) -> ValueKind {
        self.options.kind.unwrap_or_else(|| self.value.kind())
    }

    pub fn direction(&self) -> Direction {
        self.options.direction.unwrap_or_default()
    }
}

/// Named parameter collection produced by a builder.
///
/// Entries keep insertion order. Adding a name that already exists replaces
/// the stored entry in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters {
    entries: Vec<Parameter>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Parameters {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter with no binding metadata.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add_with(name, value, ParamOptions::default())
    }

    /// Add a parameter with binding metadata.
    pub fn add_with(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        options: ParamOptions,
    ) -> &mut Self {
        self.insert(Parameter {
            name: name.into(),
            value: value.into(),
            options,
        });
        self
    }

    fn insert(&mut self, param: Parameter) {
        match self.index.get(&param.name) {
            Some(&i) => self.entries[i] = param,
            None => {
                self.index.insert(param.name.clone(), self.entries.len());
                self.entries.push(param);
            }
        }
    }

    /// Copy every entry of `other` into this bag, replacing same-named entries.
    pub fn extend(&mut self, other: &Parameters) -> &mut Self {
        for param in &other.entries {
            self.insert(param.clone());
        }
        self
    }

    /// Read a parameter back as `T`.
    ///
    /// A stored null converts to `None` when `T` is an `Option`; any other
    /// target type yields [`StitchError::NullValue`].
    pub fn get<T: FromValue>(&self, name: &str) -> StitchResult<T> {
        let param = self
            .entry(name)
            .ok_or_else(|| StitchError::ParameterNotFound(name.to_string()))?;

        if param.value.is_null() {
            return T::from_null().ok_or_else(|| StitchError::NullValue(name.to_string()));
        }

        T::from_value(&param.value).ok_or_else(|| StitchError::TypeMismatch {
            name: name.to_string(),
            expected: T::type_name(),
            found: param.value.kind().as_str(),
        })
    }

    /// Overwrite the value of an existing parameter, keeping its metadata.
    ///
    /// Used by executors to store output and return values.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> StitchResult<()> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| StitchError::ParameterNotFound(name.to_string()))?;
        self.entries[i].value = value.into();
        Ok(())
    }

    pub fn entry(&self, name: &str) -> Option<&Parameter> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Parameter names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
