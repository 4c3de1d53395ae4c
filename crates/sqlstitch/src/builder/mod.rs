//! Builder facades over the shared formatting engine.
//!
//! - [`TemplateBuilder`]: free-form concatenation of templates.
//! - [`FluentBuilder`]: clause-by-clause statement construction.
//!
//! Both own an independent engine; nothing is shared between builders.

mod fluent;
mod template;


pub use fluent::{FilterGroup, FluentBuilder, LimitClause, OffsetRowsClause};
pub use template::TemplateBuilder;

/// Generate the accessors both builders share. Expects an `engine` field.
macro_rules! impl_builder_common {
    () => {
        /// The SQL text written so far.
        pub fn sql(&self) -> &str {
            self.engine.text()
        }

        /// The parameters registered so far.
        pub fn parameters(&self) -> &$crate::param::Parameters {
            self.engine.params()
        }

        /// Parameter names in registration order.
        pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
            self.engine.params().names()
        }

        /// Read a registered parameter back as `T`.
        pub fn get_value<T: $crate::value::FromValue>(
            &self,
            name: &str,
        ) -> $crate::error::StitchResult<T> {
            self.engine.params().get(name)
        }

        /// Register a named parameter without writing any SQL.
        ///
        /// An existing parameter with the same name is replaced.
        pub fn add_parameter(
            &mut self,
            name: impl Into<String>,
            value: impl Into<$crate::value::Value>,
            options: $crate::param::ParamOptions,
        ) -> &mut Self {
            self.engine.params_mut().add_with(name, value, options);
            self
        }

        /// Register every parameter of `params`, replacing same-named entries.
        pub fn add_parameters(&mut self, params: &$crate::param::Parameters) -> &mut Self {
            self.engine.params_mut().extend(params);
            self
        }

        /// Settings fixed at construction.
        pub fn settings(&self) -> &$crate::settings::Settings {
            self.engine.settings()
        }

        /// Clear text, parameters, counters, reuse index and clause state.
        /// Construction-time settings are kept.
        pub fn reset(&mut self) -> &mut Self {
            self.engine.reset();
            self
        }

        /// The first rejected clause call, if any.
        pub fn build_error(&self) -> Option<&$crate::error::StitchError> {
            self.engine.build_error()
        }

        /// Fail with the first rejected clause call, if any.
        pub fn validate(&self) -> $crate::error::StitchResult<()> {
            self.engine.validate()
        }

        /// Consume the builder into its SQL text and parameters.
        pub fn build(self) -> $crate::error::StitchResult<(String, $crate::param::Parameters)> {
            self.engine.validate()?;
            Ok(self.engine.into_parts())
        }
    };
}

pub(crate) use impl_builder_common;
