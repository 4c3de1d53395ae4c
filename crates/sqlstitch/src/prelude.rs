//! Convenient imports for typical `sqlstitch` usage.
//!
//! ```ignore
//! use sqlstitch::prelude::*;
//! ```

pub use crate::{
    BuilderOptions, FluentBuilder, ParamDescriptor, ParamOptions, Parameters, Settings,
    StitchError, StitchResult, Template, TemplateBuilder, Value,
};

#[cfg(feature = "macros")]
pub use crate::sql;
