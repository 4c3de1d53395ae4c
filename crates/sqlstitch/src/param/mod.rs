//! Parameter metadata and the parameter bag.
//!
//! - [`ParamDescriptor`] wraps a value with optional binding metadata and
//!   opts it into reuse: equal descriptors share one placeholder.
//! - [`Parameters`] is the named collection a builder fills; it is what gets
//!   handed to the database-access layer.

mod bag;
mod descriptor;

#[cfg(test)]
mod tests;

pub use bag::{Parameter, Parameters};
pub use descriptor::{DbType, Direction, ParamDescriptor, ParamOptions};
