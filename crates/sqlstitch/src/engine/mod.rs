//! The formatting engine shared by both builders.
//!
//! [`Engine`] owns the text buffer, the parameter bag, the naming counters,
//! the reuse index and the clause state. The template builder uses only the
//! text and formatting half; the fluent builder additionally drives the
//! clause state machine through [`Engine::clause`].

mod clause;
mod format;


pub use clause::{ClauseAction, Guard};

use crate::error::{StitchError, StitchResult};
use crate::log::stitch_debug;
use crate::param::Parameters;
use crate::settings::Settings;
use crate::template::{Arg, Segment, Template, TemplateSink};
use clause::{ClauseState, Permit};
use format::ReuseIndex;

/// Builder session state.
#[derive(Debug, Clone)]
pub struct Engine {
    settings: Settings,
    text: String,
    params: Parameters,
    counter: usize,
    collection_counter: usize,
    reuse: ReuseIndex,
    clauses: ClauseState,
    build_error: Option<StitchError>,
}

impl Engine {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            text: String::new(),
            params: Parameters::new(),
            counter: 0,
            collection_counter: 0,
            reuse: ReuseIndex::default(),
            clauses: ClauseState::default(),
            build_error: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    pub fn build_error(&self) -> Option<&StitchError> {
        self.build_error.as_ref()
    }

    pub fn validate(&self) -> StitchResult<()> {
        match &self.build_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub fn into_parts(self) -> (String, Parameters) {
        (self.text, self.params)
    }

    /// Clear everything except the settings.
    pub fn reset(&mut self) {
        stitch_debug!(
            sql_len = self.text.len(),
            params = self.params.len(),
            "builder reset"
        );
        self.text.clear();
        self.params.clear();
        self.counter = 0;
        self.collection_counter = 0;
        self.reuse.clear();
        self.clauses = ClauseState::default();
        self.build_error = None;
    }

    // ==================== Text accumulator ====================

    pub fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    /// Feed a template's segments in order.
    ///
    /// Templates without values skip the formatter entirely.
    pub fn write_template(&mut self, template: Template) {
        if template.is_literal() {
            for segment in template.segments() {
                if let Segment::Literal(text) = segment {
                    self.text.push_str(text);
                }
            }
            return;
        }
        template.write_to(self);
    }

    fn keyword(&mut self, keyword: &str) {
        if self.settings.lower_case_clauses {
            self.text
                .extend(keyword.chars().map(|c| c.to_ascii_lowercase()));
        } else {
            self.text.push_str(keyword);
        }
    }

    /// Start a new line unless nothing has been written yet.
    fn line_break(&mut self) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
    }

    // ==================== Clause state machine ====================

    /// Check whether `action` may be emitted now.
    ///
    /// Rejected direct calls record the first error on the builder.
    pub fn allow(&mut self, action: ClauseAction, guard: Guard) -> bool {
        match self.clauses.permit(action) {
            Permit::Allow => true,
            Permit::Skip {
                blocked_by: _blocked_by,
            } => {
                stitch_debug!(?action, blocked_by = ?_blocked_by, "clause skipped");
                false
            }
            Permit::Reject { blocked_by } => {
                stitch_debug!(?action, ?blocked_by, ?guard, "clause rejected");
                if guard == Guard::Direct && self.build_error.is_none() {
                    self.build_error = Some(StitchError::IllegalClause { action, blocked_by });
                }
                false
            }
        }
    }

    /// Emit one clause: keyword or separator, then the template, then the
    /// closing parenthesis of any group the clause opened.
    ///
    /// `template` is only invoked when the clause is allowed.
    pub fn clause(
        &mut self,
        action: ClauseAction,
        guard: Guard,
        template: impl FnOnce() -> Template,
    ) -> bool {
        self.drop_unused_group(action);
        if !self.allow(action, guard) {
            return false;
        }
        self.open(action);
        self.write_template(template());
        self.close_group(action);
        true
    }

    /// Emit a numeric clause (`LIMIT n`, `OFFSET n`, ...). Never parameterized.
    pub fn numeric_clause(&mut self, action: ClauseAction, guard: Guard, n: u64) -> bool {
        self.drop_unused_group(action);
        if !self.allow(action, guard) {
            return false;
        }
        self.line_break();
        match action {
            ClauseAction::Limit => self.keyword("LIMIT "),
            ClauseAction::Offset | ClauseAction::OffsetRows => self.keyword("OFFSET "),
            ClauseAction::FetchNext => self.keyword("FETCH NEXT "),
            _ => {}
        }
        self.text.push_str(&n.to_string());
        match action {
            ClauseAction::OffsetRows => self.keyword(" ROWS"),
            ClauseAction::FetchNext => self.keyword(" ROWS ONLY"),
            _ => {}
        }
        self.clauses.record(action);
        true
    }

    /// Defer opening a filter group until its first member is written.
    pub fn begin_filter_group(&mut self, action: ClauseAction) {
        self.clauses.pending_filter = Some(action);
    }

    /// A pending group only survives until the next clause; any clause
    /// other than a group member discards it unopened.
    fn drop_unused_group(&mut self, action: ClauseAction) {
        if !matches!(
            action,
            ClauseAction::WhereWithFilter | ClauseAction::WhereWithOrFilter
        ) {
            self.clauses.pending_filter = None;
        }
    }

    fn open(&mut self, action: ClauseAction) {
        use ClauseAction as A;

        match action {
            A::Delete => self.keyword("DELETE FROM "),
            A::Insert => self.keyword("INSERT INTO "),
            A::InsertColumn => {
                if !self.reopen_group(A::InsertColumn) {
                    self.text.push_str(" (");
                    self.clauses.open_paren = true;
                } else {
                    self.text.push_str(", ");
                }
            }
            A::InsertValue => {
                if !self.reopen_group(A::InsertValue) {
                    self.line_break();
                    self.keyword("VALUES (");
                    self.clauses.open_paren = true;
                } else {
                    self.text.push_str(", ");
                }
            }
            A::Select => self.list_or_keyword(A::Select, "SELECT "),
            A::SelectDistinct => self.list_or_keyword(A::SelectDistinct, "SELECT DISTINCT "),
            A::SelectFrom => {
                self.line_break();
                self.keyword("FROM ");
            }
            A::Update => self.keyword("UPDATE "),
            A::UpdateSet => self.list_or_line(A::UpdateSet, "SET "),
            A::Where => self.where_keyword("AND "),
            A::WhereOr => self.where_keyword("OR "),
            A::WhereFilter => self.open_filter("AND "),
            A::WhereOrFilter => self.open_filter("OR "),
            A::WhereWithFilter | A::WhereWithOrFilter => {
                let opening = match action {
                    A::WhereWithFilter => A::WhereFilter,
                    _ => A::WhereOrFilter,
                };
                match self.clauses.pending_filter.take() {
                    // First member of an argument-less group opens it.
                    Some(pending) => {
                        self.open(pending);
                        self.clauses.record(pending);
                    }
                    None if self.reopen_group(A::WhereFilter) => {
                        self.text.push(' ');
                        self.keyword(match action {
                            A::WhereWithFilter => "AND ",
                            _ => "OR ",
                        });
                    }
                    None => {
                        self.open(opening);
                        self.clauses.record(opening);
                    }
                }
            }
            A::InnerJoin => self.join_keyword("INNER JOIN "),
            A::LeftJoin => self.join_keyword("LEFT JOIN "),
            A::RightJoin => self.join_keyword("RIGHT JOIN "),
            A::GroupBy => self.list_or_line(A::GroupBy, "GROUP BY "),
            A::Having => {
                if self.clauses.has(A::Having) {
                    self.text.push(' ');
                    self.keyword("AND ");
                } else {
                    self.line_break();
                    self.keyword("HAVING ");
                }
            }
            A::OrderBy => self.list_or_line(A::OrderBy, "ORDER BY "),
            A::Limit | A::Offset | A::OffsetRows | A::FetchNext | A::None => {}
        }
        self.clauses.record(action);
    }

    /// `keyword` the first time, `, ` afterwards.
    fn list_or_keyword(&mut self, action: ClauseAction, keyword: &str) {
        if self.clauses.has(action) {
            self.text.push_str(", ");
        } else {
            self.keyword(keyword);
        }
    }

    /// New line plus `keyword` the first time, `, ` afterwards.
    fn list_or_line(&mut self, action: ClauseAction, keyword: &str) {
        if self.clauses.has(action) {
            self.text.push_str(", ");
        } else {
            self.line_break();
            self.keyword(keyword);
        }
    }

    fn where_keyword(&mut self, joiner: &str) {
        if self.clauses.has_where() {
            self.text.push(' ');
            self.keyword(joiner);
        } else {
            self.line_break();
            self.keyword("WHERE ");
        }
    }

    fn open_filter(&mut self, joiner: &str) {
        self.where_keyword(joiner);
        self.text.push('(');
        self.clauses.open_paren = true;
    }

    fn join_keyword(&mut self, keyword: &str) {
        self.line_break();
        self.keyword(keyword);
    }

    /// Reopen `group` if its closing `)` is still the last thing written.
    fn reopen_group(&mut self, group: ClauseAction) -> bool {
        match self.clauses.closed_group {
            Some((closed, len)) if closed == group && len == self.text.len() => {
                self.text.pop();
                self.clauses.closed_group = None;
                self.clauses.open_paren = true;
                true
            }
            _ => false,
        }
    }

    fn close_group(&mut self, action: ClauseAction) {
        if !self.clauses.open_paren {
            return;
        }
        self.text.push(')');
        self.clauses.open_paren = false;
        let group = if action.is_where() {
            ClauseAction::WhereFilter
        } else {
            action
        };
        self.clauses.closed_group = Some((group, self.text.len()));
    }
}

impl TemplateSink for Engine {
    fn write_literal(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn write_value(&mut self, arg: Arg, format: Option<&str>) {
        self.format_value(arg, format);
    }
}
