use super::impl_builder_common;
use crate::engine::{ClauseAction, Engine, Guard};
use crate::error::StitchResult;
use crate::settings::Settings;
use crate::template::Template;
use std::ops::{Deref, DerefMut};

/// Clause-by-clause SQL builder.
///
/// Every clause method writes the clause keyword the first time it is used
/// and the matching separator afterwards, so clauses can be added from
/// independent branches of application code:
///
/// ```ignore
/// use sqlstitch::sql;
///
/// let mut b = sqlstitch::fluent();
/// b.select("Id").select("Name").from("Users");
/// b.where_clause_if(only_active, || "Active = 1");
/// b.where_clause(sql!("Age > {min_age}"));
/// b.order_by("Name");
///
/// // SELECT Id, Name
/// // FROM Users
/// // WHERE Active = 1 AND Age > @p0
/// // ORDER BY Name
/// ```
///
/// Clauses that cannot follow what was already written are ignored. A
/// direct call additionally records the first such rejection, reported by
/// [`validate`](Self::validate) and [`build`](Self::build); the `*_if`
/// variants stay silent.
#[derive(Debug, Clone)]
#[must_use]
pub struct FluentBuilder {
    engine: Engine,
}

/// Generate a clause method and its guarded `*_if` variant.
macro_rules! clause_methods {
    ($(
        $(#[$doc:meta])*
        $name:ident, $name_if:ident => $action:ident;
    )*) => {
        $(
            $(#[$doc])*
            pub fn $name(&mut self, template: impl Into<Template>) -> &mut Self {
                let template = template.into();
                self.engine
                    .clause(ClauseAction::$action, Guard::Direct, || template);
                self
            }

            #[doc = concat!("[`", stringify!($name), "`](Self::", stringify!($name), ") when `condition` holds; `template` is not called otherwise.")]
            pub fn $name_if<T: Into<Template>>(
                &mut self,
                condition: bool,
                template: impl FnOnce() -> T,
            ) -> &mut Self {
                if condition {
                    self.engine
                        .clause(ClauseAction::$action, Guard::Conditional, || template().into());
                }
                self
            }
        )*
    };
}

impl FluentBuilder {
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

    clause_methods! {
        /// `SELECT <template>`, or `, <template>` on repeat calls.
        select, select_if => Select;
        /// `SELECT DISTINCT <template>`, or `, <template>` on repeat calls.
        select_distinct, select_distinct_if => SelectDistinct;
        /// `FROM <template>` on a new line.
        from, from_if => SelectFrom;
        /// `INSERT INTO <template>`.
        insert_into, insert_into_if => Insert;
        /// Add to the parenthesized INSERT column list.
        columns, columns_if => InsertColumn;
        /// Add to the `VALUES (...)` list.
        values, values_if => InsertValue;
        /// `UPDATE <template>`.
        update, update_if => Update;
        /// `SET <template>`, or `, <template>` on repeat calls.
        set, set_if => UpdateSet;
        /// `DELETE FROM <template>`.
        delete_from, delete_from_if => Delete;
        /// `WHERE <template>`, or ` AND <template>` once a WHERE exists.
        where_clause, where_clause_if => Where;
        /// ` OR <template>`, or `WHERE <template>` if no WHERE exists yet.
        or_where, or_where_if => WhereOr;
        inner_join, inner_join_if => InnerJoin;
        left_join, left_join_if => LeftJoin;
        right_join, right_join_if => RightJoin;
        /// `GROUP BY <template>`, or `, <template>` on repeat calls.
        /// Ignored after `delete_from` or `update`.
        group_by, group_by_if => GroupBy;
        /// `HAVING <template>`, or ` AND <template>` on repeat calls.
        /// Ignored after `delete_from` or `update`.
        having, having_if => Having;
        /// `ORDER BY <template>`, or `, <template>` on repeat calls.
        /// Ignored after `delete_from` or `update`.
        order_by, order_by_if => OrderBy;
    }

    // ==================== Filter groups ====================

    /// Open a parenthesized group joined to the WHERE clause with `AND`,
    /// writing `template` as its first member.
    ///
    /// ```ignore
    /// b.where_filter(sql!("A = {x}")).with_or_filter(sql!("B = {y}"));
    /// // WHERE (A = @p0 OR B = @p1)
    /// ```
    pub fn where_filter(&mut self, template: impl Into<Template>) -> FilterGroup<'_> {
        let template = template.into();
        self.engine
            .clause(ClauseAction::WhereFilter, Guard::Direct, || template);
        FilterGroup::new(self, true)
    }

    /// As [`where_filter`](Self::where_filter), joined with `OR`.
    pub fn or_where_filter(&mut self, template: impl Into<Template>) -> FilterGroup<'_> {
        let template = template.into();
        self.engine
            .clause(ClauseAction::WhereOrFilter, Guard::Direct, || template);
        FilterGroup::new(self, true)
    }

    pub fn where_filter_if<T: Into<Template>>(
        &mut self,
        condition: bool,
        template: impl FnOnce() -> T,
    ) -> FilterGroup<'_> {
        if condition {
            self.engine
                .clause(ClauseAction::WhereFilter, Guard::Conditional, || template().into());
        }
        FilterGroup::new(self, condition)
    }

    pub fn or_where_filter_if<T: Into<Template>>(
        &mut self,
        condition: bool,
        template: impl FnOnce() -> T,
    ) -> FilterGroup<'_> {
        if condition {
            self.engine
                .clause(ClauseAction::WhereOrFilter, Guard::Conditional, || template().into());
        }
        FilterGroup::new(self, condition)
    }

    /// Start an empty `AND` group; its first member opens the parenthesis.
    pub fn where_filter_group(&mut self) -> FilterGroup<'_> {
        self.engine.begin_filter_group(ClauseAction::WhereFilter);
        FilterGroup::new(self, true)
    }

    /// Start an empty `OR` group; its first member opens the parenthesis.
    pub fn or_where_filter_group(&mut self) -> FilterGroup<'_> {
        self.engine.begin_filter_group(ClauseAction::WhereOrFilter);
        FilterGroup::new(self, true)
    }

    // ==================== Pagination ====================

    /// `LIMIT n` on a new line. The count is written literally.
    pub fn limit(&mut self, n: u64) -> LimitClause<'_> {
        self.engine.numeric_clause(ClauseAction::Limit, Guard::Direct, n);
        LimitClause {
            builder: self,
            active: true,
        }
    }

    pub fn limit_if(&mut self, condition: bool, n: u64) -> LimitClause<'_> {
        if condition {
            self.engine
                .numeric_clause(ClauseAction::Limit, Guard::Conditional, n);
        }
        LimitClause {
            builder: self,
            active: condition,
        }
    }

    /// `OFFSET n ROWS` on a new line, for `OFFSET ... FETCH NEXT` paging.
    pub fn offset_rows(&mut self, n: u64) -> OffsetRowsClause<'_> {
        self.engine
            .numeric_clause(ClauseAction::OffsetRows, Guard::Direct, n);
        OffsetRowsClause {
            builder: self,
            active: true,
        }
    }

    pub fn offset_rows_if(&mut self, condition: bool, n: u64) -> OffsetRowsClause<'_> {
        if condition {
            self.engine
                .numeric_clause(ClauseAction::OffsetRows, Guard::Conditional, n);
        }
        OffsetRowsClause {
            builder: self,
            active: condition,
        }
    }

    impl_builder_common!();
}

impl Default for FluentBuilder {
    fn default() -> Self {
        Self::new(Settings::current().clone())
    }
}

/// Continuation returned by the filter-group methods.
///
/// Members added here join the group with `AND` / `OR` inside its
/// parentheses. The group derefs to its [`FluentBuilder`], so the chain can
/// continue with any other clause.
pub struct FilterGroup<'a> {
    builder: &'a mut FluentBuilder,
    active: bool,
}

impl<'a> FilterGroup<'a> {
    fn new(builder: &'a mut FluentBuilder, active: bool) -> Self {
        Self { builder, active }
    }

    /// Add `template` to the group with `AND`.
    pub fn with_filter(self, template: impl Into<Template>) -> Self {
        let template = template.into();
        self.member(ClauseAction::WhereWithFilter, Guard::Direct, || template)
    }

    /// Add `template` to the group with `OR`.
    pub fn with_or_filter(self, template: impl Into<Template>) -> Self {
        let template = template.into();
        self.member(ClauseAction::WhereWithOrFilter, Guard::Direct, || template)
    }

    pub fn with_filter_if<T: Into<Template>>(
        self,
        condition: bool,
        template: impl FnOnce() -> T,
    ) -> Self {
        if !condition {
            return self;
        }
        self.member(ClauseAction::WhereWithFilter, Guard::Conditional, || {
            template().into()
        })
    }

    pub fn with_or_filter_if<T: Into<Template>>(
        self,
        condition: bool,
        template: impl FnOnce() -> T,
    ) -> Self {
        if !condition {
            return self;
        }
        self.member(ClauseAction::WhereWithOrFilter, Guard::Conditional, || {
            template().into()
        })
    }

    /// Finish the group and return the builder.
    pub fn end(self) -> &'a mut FluentBuilder {
        self.builder
    }

    fn member(self, action: ClauseAction, guard: Guard, template: impl FnOnce() -> Template) -> Self {
        // Members of a group whose guard was false are dropped with it.
        if self.active {
            self.builder.engine.clause(action, guard, template);
        }
        self
    }
}

impl Deref for FilterGroup<'_> {
    type Target = FluentBuilder;

    fn deref(&self) -> &FluentBuilder {
        &*self.builder
    }
}

impl DerefMut for FilterGroup<'_> {
    fn deref_mut(&mut self) -> &mut FluentBuilder {
        &mut *self.builder
    }
}

/// Returned by [`FluentBuilder::limit`]; only `OFFSET` may follow directly.
///
/// When returned by a `limit_if` whose condition was false, the `OFFSET`
/// is dropped along with the `LIMIT`.
pub struct LimitClause<'a> {
    builder: &'a mut FluentBuilder,
    active: bool,
}

impl<'a> LimitClause<'a> {
    /// `OFFSET n` on a new line.
    pub fn offset(self, n: u64) -> &'a mut FluentBuilder {
        if self.active {
            self.builder
                .engine
                .numeric_clause(ClauseAction::Offset, Guard::Direct, n);
        }
        self.builder
    }

    pub fn offset_if(self, condition: bool, n: u64) -> &'a mut FluentBuilder {
        if self.active && condition {
            self.builder
                .engine
                .numeric_clause(ClauseAction::Offset, Guard::Conditional, n);
        }
        self.builder
    }

    pub fn end(self) -> &'a mut FluentBuilder {
        self.builder
    }
}

impl Deref for LimitClause<'_> {
    type Target = FluentBuilder;

    fn deref(&self) -> &FluentBuilder {
        &*self.builder
    }
}

impl DerefMut for LimitClause<'_> {
    fn deref_mut(&mut self) -> &mut FluentBuilder {
        &mut *self.builder
    }
}

/// Returned by [`FluentBuilder::offset_rows`]; only `FETCH NEXT` may follow
/// directly. Inactive after an `offset_rows_if` whose condition was false.
pub struct OffsetRowsClause<'a> {
    builder: &'a mut FluentBuilder,
    active: bool,
}

impl<'a> OffsetRowsClause<'a> {
    /// `FETCH NEXT n ROWS ONLY` on a new line.
    pub fn fetch_next(self, n: u64) -> &'a mut FluentBuilder {
        if self.active {
            self.builder
                .engine
                .numeric_clause(ClauseAction::FetchNext, Guard::Direct, n);
        }
        self.builder
    }

    pub fn fetch_next_if(self, condition: bool, n: u64) -> &'a mut FluentBuilder {
        if self.active && condition {
            self.builder
                .engine
                .numeric_clause(ClauseAction::FetchNext, Guard::Conditional, n);
        }
        self.builder
    }

    pub fn end(self) -> &'a mut FluentBuilder {
        self.builder
    }
}

impl Deref for OffsetRowsClause<'_> {
    type Target = FluentBuilder;

    fn deref(&self) -> &FluentBuilder {
        &*self.builder
    }
}

impl DerefMut for OffsetRowsClause<'_> {
    fn deref_mut(&mut self) -> &mut FluentBuilder {
        &mut *self.builder
    }
}
