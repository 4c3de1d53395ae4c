//! SQL templates.
//!
//! A [`Template`] is an ordered list of segments: literal SQL text and
//! embedded values with an optional format directive. Templates are usually
//! produced by the [`sql!`](crate::sql) macro, which decomposes a format
//! string at compile time:
//!
//! ```ignore
//! use sqlstitch::sql;
//!
//! let id = 10;
//! let table = "Users";
//! let t = sql!("SELECT * FROM {table:raw} WHERE Id = {id}");
//! ```
//!
//! They can also be assembled by hand:
//!
//! ```ignore
//! let t = Template::new().literal("WHERE Id = ").value(10);
//! ```
//!
//! Builders consume templates through [`TemplateSink`], feeding every segment
//! exactly once and in order.

use crate::param::ParamDescriptor;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::borrow::Cow;
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// A value embedded in a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A bare value: bound as a fresh parameter (or reused in reuse mode).
    Value(Value),
    /// An explicit descriptor: always eligible for reuse.
    Param(ParamDescriptor),
    /// A nested template, expanded in place (subqueries).
    Template(Template),
}

/// One piece of a [`Template`].
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(Cow<'static, str>),
    Value {
        arg: Arg,
        format: Option<Cow<'static, str>>,
    },
}

/// Literal SQL text interleaved with embedded values.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct Template {
    segments: Vec<Segment>,
    values: usize,
}

impl Template {
    /// Create an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(segments: usize) -> Self {
        Self {
            segments: Vec::with_capacity(segments),
            values: 0,
        }
    }

    /// Append literal SQL text.
    pub fn literal(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.push_literal(text);
        self
    }

    /// Append a value to be bound as a parameter.
    pub fn value(mut self, value: impl IntoArg) -> Self {
        self.push_arg(value.into_arg(), None);
        self
    }

    /// Append a value to be inlined verbatim (never bound).
    pub fn raw(mut self, value: impl IntoArg) -> Self {
        self.push_arg(value.into_arg(), Some("raw".into()));
        self
    }

    /// Append a value with an explicit format directive.
    pub fn formatted(mut self, value: impl IntoArg, format: impl Into<Cow<'static, str>>) -> Self {
        self.push_arg(value.into_arg(), Some(format.into()));
        self
    }

    pub fn push_literal(&mut self, text: impl Into<Cow<'static, str>>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Literal(last)) => last.to_mut().push_str(&text),
            _ => self.segments.push(Segment::Literal(text)),
        }
    }

    pub fn push_arg(&mut self, arg: Arg, format: Option<Cow<'static, str>>) {
        self.values += 1;
        self.segments.push(Segment::Value { arg, format });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of embedded values.
    pub fn value_count(&self) -> usize {
        self.values
    }

    /// True when the template has no embedded values.
    pub fn is_literal(&self) -> bool {
        self.values == 0
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Feed every segment to `sink`, in order.
    pub fn write_to<S: TemplateSink + ?Sized>(self, sink: &mut S) {
        for segment in self.segments {
            match segment {
                Segment::Literal(text) => sink.write_literal(&text),
                Segment::Value { arg, format } => sink.write_value(arg, format.as_deref()),
            }
        }
    }
}

impl From<&'static str> for Template {
    fn from(text: &'static str) -> Self {
        Template::new().literal(text)
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Template::new().literal(text)
    }
}

/// Receiver of template segments.
///
/// The formatting engine behind every builder implements this; anything that
/// accepts a template takes the sink it writes to as a concrete argument.
pub trait TemplateSink {
    /// Append literal text unchanged.
    fn write_literal(&mut self, text: &str);

    /// Format one embedded value.
    fn write_value(&mut self, arg: Arg, format: Option<&str>);
}

/// Conversion into a template [`Arg`].
///
/// Implemented for every type convertible into [`Value`], for
/// [`ParamDescriptor`] and for nested [`Template`]s.
pub trait IntoArg {
    fn into_arg(self) -> Arg;
}

impl IntoArg for Arg {
    fn into_arg(self) -> Arg {
        self
    }
}

impl IntoArg for ParamDescriptor {
    fn into_arg(self) -> Arg {
        Arg::Param(self)
    }
}

impl IntoArg for &ParamDescriptor {
    fn into_arg(self) -> Arg {
        Arg::Param(self.clone())
    }
}

impl IntoArg for Template {
    fn into_arg(self) -> Arg {
        Arg::Template(self)
    }
}

impl IntoArg for &Template {
    fn into_arg(self) -> Arg {
        Arg::Template(self.clone())
    }
}

macro_rules! impl_into_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoArg for $ty {
                fn into_arg(self) -> Arg {
                    Arg::Value(self.into())
                }
            }

            impl IntoArg for &$ty {
                fn into_arg(self) -> Arg {
                    Arg::Value(self.into())
                }
            }
        )*
    };
}

impl_into_arg!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    Uuid,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<Utc>,
    serde_json::Value,
    Value,
);

#[cfg(feature = "rust_decimal")]
impl_into_arg!(rust_decimal::Decimal);

impl IntoArg for &str {
    fn into_arg(self) -> Arg {
        Arg::Value(self.into())
    }
}

impl IntoArg for char {
    fn into_arg(self) -> Arg {
        Arg::Value(self.into())
    }
}

impl IntoArg for isize {
    fn into_arg(self) -> Arg {
        Arg::Value(self.into())
    }
}

impl IntoArg for usize {
    fn into_arg(self) -> Arg {
        Arg::Value(self.into())
    }
}

impl<T: Into<Value>> IntoArg for Option<T> {
    fn into_arg(self) -> Arg {
        Arg::Value(self.into())
    }
}

impl<T: Into<Value>> IntoArg for Vec<T> {
    fn into_arg(self) -> Arg {
        Arg::Value(Value::list(self))
    }
}

impl<T: Into<Value> + Clone> IntoArg for &[T] {
    fn into_arg(self) -> Arg {
        Arg::Value(self.into())
    }
}

impl<T: Into<Value>, const N: usize> IntoArg for [T; N] {
    fn into_arg(self) -> Arg {
        Arg::Value(Value::list(self))
    }
}
