use super::impl_builder_common;
use crate::engine::Engine;
use crate::error::StitchResult;
use crate::settings::Settings;
use crate::template::Template;
use std::ops::AddAssign;

/// Free-form SQL builder.
///
/// Templates are concatenated as given; values are bound as parameters
/// unless marked `raw`.
///
/// # Example
/// ```ignore
/// use sqlstitch::sql;
///
/// let mut b = sqlstitch::builder();
/// b.append_intact("SELECT * FROM Users")
///     .append(sql!("WHERE Id = {10}"));
///
/// assert_eq!(b.sql(), "SELECT * FROM Users WHERE Id = @p0");
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct TemplateBuilder {
    engine: Engine,
}

impl TemplateBuilder {
    /// Create a builder with `settings` as given. Use
    /// [`try_new`](Self::try_new) for settings that were not validated.
    pub fn new(settings: Settings) -> Self {
        Self {
            engine: Engine::new(settings),
        }
    }

    /// Validate `settings`, then create the builder.
    pub fn try_new(settings: Settings) -> StitchResult<Self> {
        settings.validate()?;
        Ok(Self::new(settings))
    }

    /// Create a builder and write `template` as its initial content.
    pub fn with_template(settings: Settings, template: impl Into<Template>) -> Self {
        let mut builder = Self::new(settings);
        builder.append_intact(template);
        builder
    }

    /// Append a space followed by `template`.
    pub fn append(&mut self, template: impl Into<Template>) -> &mut Self {
        self.engine.push_char(' ');
        self.engine.write_template(template.into());
        self
    }

    /// Append `template` with no separator.
    pub fn append_intact(&mut self, template: impl Into<Template>) -> &mut Self {
        self.engine.write_template(template.into());
        self
    }

    /// Append a newline followed by `template`.
    pub fn append_new_line(&mut self, template: impl Into<Template>) -> &mut Self {
        self.engine.push_char('\n');
        self.engine.write_template(template.into());
        self
    }

    /// Append a bare newline.
    pub fn new_line(&mut self) -> &mut Self {
        self.engine.push_char('\n');
        self
    }

    /// [`append`](Self::append) when `condition` holds.
    ///
    /// `template` is not called otherwise, so it registers nothing.
    pub fn append_if<T: Into<Template>>(
        &mut self,
        condition: bool,
        template: impl FnOnce() -> T,
    ) -> &mut Self {
        if condition {
            self.append(template());
        }
        self
    }

    pub fn append_intact_if<T: Into<Template>>(
        &mut self,
        condition: bool,
        template: impl FnOnce() -> T,
    ) -> &mut Self {
        if condition {
            self.append_intact(template());
        }
        self
    }

    pub fn append_new_line_if<T: Into<Template>>(
        &mut self,
        condition: bool,
        template: impl FnOnce() -> T,
    ) -> &mut Self {
        if condition {
            self.append_new_line(template());
        }
        self
    }

    impl_builder_common!();
}

impl Default for TemplateBuilder {
    fn default() -> Self {
        Self::new(Settings::current().clone())
    }
}

impl<T: Into<Template>> AddAssign<T> for TemplateBuilder {
    fn add_assign(&mut self, template: T) {
        self.append_intact(template);
    }
}
