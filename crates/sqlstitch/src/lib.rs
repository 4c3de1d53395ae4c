//! # sqlstitch
//!
//! Compose SQL from string templates. Embedded values become named
//! parameters; the result is a SQL string plus a [`Parameters`] bag ready
//! for any database-access layer.
//!
//! ## Features
//!
//! - **Templates**: `sql!("... {value} ...")` binds values, `{value:raw}` inlines them
//! - **Two builders**: free-form [`TemplateBuilder`] and clause-aware [`FluentBuilder`]
//! - **Parameter reuse**: equal descriptors share one placeholder
//! - **Conditional clauses**: every method has an `*_if` form that skips its
//!   template (and its parameters) when the condition is false
//!
//! ## Template builder
//!
//! ```ignore
//! use sqlstitch::sql;
//!
//! let mut b = sqlstitch::builder();
//! b.append_intact("SELECT * FROM Users")
//!     .append(sql!("WHERE Id = {10}"));
//!
//! assert_eq!(b.sql(), "SELECT * FROM Users WHERE Id = @p0");
//! assert_eq!(b.get_value::<i32>("p0")?, 10);
//! ```
//!
//! ## Fluent builder
//!
//! ```ignore
//! let mut b = sqlstitch::fluent();
//! b.select("*")
//!     .from("Users")
//!     .where_clause(sql!("Name = {name}"))
//!     .order_by("Id");
//!
//! let (sql, params) = b.build()?;
//! ```
//!
//! ## Settings
//!
//! Placeholder prefix, generated names, reuse and keyword case come from
//! [`Settings`]: the installed process defaults, optionally overridden per
//! builder with [`BuilderOptions`].

extern crate self as sqlstitch;

pub mod builder;
pub mod error;
pub mod param;
pub mod prelude;
pub mod settings;
pub mod template;
pub mod value;

mod engine;
mod log;

pub use builder::{FilterGroup, FluentBuilder, LimitClause, OffsetRowsClause, TemplateBuilder};
pub use engine::ClauseAction;
pub use error::{StitchError, StitchResult};
pub use param::{DbType, Direction, ParamDescriptor, ParamOptions, Parameter, Parameters};
pub use settings::{BuilderOptions, Settings};
pub use template::{Arg, IntoArg, Segment, Template, TemplateSink};
pub use value::{FromValue, Value, ValueKind};

#[cfg(feature = "macros")]
pub use sqlstitch_macros::sql;

/// Create a [`TemplateBuilder`] with the installed default settings.
pub fn builder() -> TemplateBuilder {
    TemplateBuilder::new(Settings::current().clone())
}

/// Create a [`TemplateBuilder`] with per-builder overrides.
///
/// Fails with [`StitchError::Config`] if the merged settings are invalid.
pub fn builder_with(options: &BuilderOptions) -> StitchResult<TemplateBuilder> {
    let settings = Settings::current().apply(options);
    settings.validate()?;
    Ok(TemplateBuilder::new(settings))
}

/// Create a [`FluentBuilder`] with the installed default settings.
pub fn fluent() -> FluentBuilder {
    FluentBuilder::new(Settings::current().clone())
}

/// Create a [`FluentBuilder`] with per-builder overrides.
///
/// Fails with [`StitchError::Config`] if the merged settings are invalid.
pub fn fluent_with(options: &BuilderOptions) -> StitchResult<FluentBuilder> {
    let settings = Settings::current().apply(options);
    settings.validate()?;
    Ok(FluentBuilder::new(settings))
}
