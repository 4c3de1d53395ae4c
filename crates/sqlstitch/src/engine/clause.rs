//! Clause bookkeeping for the fluent builder.
//!
//! [`ClauseState`] records which clause actions a builder has emitted and
//! answers whether a new action may follow. Keyword emission itself lives on
//! the engine since it writes into the text buffer.

use serde::Serialize;

/// Every distinct fluent-builder operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ClauseAction {
    None,
    Delete,
    Insert,
    InsertColumn,
    InsertValue,
    Select,
    SelectDistinct,
    SelectFrom,
    Update,
    UpdateSet,
    Where,
    WhereOr,
    WhereFilter,
    WhereOrFilter,
    WhereWithFilter,
    WhereWithOrFilter,
    InnerJoin,
    LeftJoin,
    RightJoin,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    OffsetRows,
    FetchNext,
}

impl ClauseAction {
    const fn bit(self) -> u32 {
        1 << self as u32
    }

    /// True for every action that writes into the WHERE clause.
    pub fn is_where(self) -> bool {
        WHERE_FAMILY.contains(self)
    }
}

/// A set of clause actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClauseSet(u32);

impl ClauseSet {
    pub const fn of(actions: &[ClauseAction]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < actions.len() {
            bits |= actions[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub fn insert(&mut self, action: ClauseAction) {
        if action != ClauseAction::None {
            self.0 |= action.bit();
        }
    }

    pub fn contains(self, action: ClauseAction) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn intersects(self, other: ClauseSet) -> bool {
        self.0 & other.0 != 0
    }

    /// First member of `candidates` (in the given order) present in this set.
    fn first_of(self, candidates: &[ClauseAction]) -> Option<ClauseAction> {
        candidates.iter().copied().find(|&a| self.contains(a))
    }
}

const WHERE_FAMILY: ClauseSet = ClauseSet::of(&[
    ClauseAction::Where,
    ClauseAction::WhereOr,
    ClauseAction::WhereFilter,
    ClauseAction::WhereOrFilter,
    ClauseAction::WhereWithFilter,
    ClauseAction::WhereWithOrFilter,
]);

const STATEMENT_HEADS: [ClauseAction; 5] = [
    ClauseAction::Delete,
    ClauseAction::Insert,
    ClauseAction::Update,
    ClauseAction::Select,
    ClauseAction::SelectDistinct,
];

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permit {
    Allow,
    /// Silently ignored on every path.
    Skip { blocked_by: ClauseAction },
    /// Ignored; direct calls also record an error.
    Reject { blocked_by: ClauseAction },
}

/// How a clause method was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Plain call: a rejected transition is recorded as an error.
    Direct,
    /// `*_if` call: a rejected transition is a silent no-op.
    Conditional,
}

/// Per-builder clause state.
#[derive(Debug, Clone, Default)]
pub struct ClauseState {
    pub emitted: ClauseSet,
    /// A group parenthesis has been written and not yet closed.
    pub open_paren: bool,
    /// Set by an argument-less filter group; the next member opens it.
    pub pending_filter: Option<ClauseAction>,
    /// Group whose closing `)` ends the buffer, with the buffer length at
    /// that point. A repeat member can reopen it only while nothing else
    /// has been written.
    pub closed_group: Option<(ClauseAction, usize)>,
}

impl ClauseState {
    pub fn has(&self, action: ClauseAction) -> bool {
        self.emitted.contains(action)
    }

    pub fn has_where(&self) -> bool {
        self.emitted.intersects(WHERE_FAMILY)
    }

    pub fn record(&mut self, action: ClauseAction) {
        self.emitted.insert(action);
    }

    pub fn permit(&self, action: ClauseAction) -> Permit {
        use ClauseAction as A;

        let reject = |candidates: &[ClauseAction]| match self.emitted.first_of(candidates) {
            Some(blocked_by) => Permit::Reject { blocked_by },
            None => Permit::Allow,
        };

        match action {
            // SELECT-only clauses make no sense after a mutation.
            A::GroupBy | A::Having | A::OrderBy => {
                match self.emitted.first_of(&[A::Delete, A::Update]) {
                    Some(blocked_by) => Permit::Skip { blocked_by },
                    None => Permit::Allow,
                }
            }
            // Single-target statements: any head blocks, including itself.
            A::Delete | A::Insert | A::Update => reject(&STATEMENT_HEADS),
            A::Select => reject(&[A::Delete, A::Insert, A::Update, A::SelectDistinct]),
            A::SelectDistinct => reject(&[A::Delete, A::Insert, A::Update, A::Select]),
            A::SelectFrom => reject(&[A::SelectFrom]),
            A::Limit => reject(&[A::Limit, A::OffsetRows, A::FetchNext]),
            A::Offset => reject(&[A::Offset, A::OffsetRows, A::FetchNext]),
            A::OffsetRows => reject(&[A::OffsetRows, A::Limit, A::Offset]),
            A::FetchNext => reject(&[A::FetchNext, A::Limit, A::Offset]),
            _ => Permit::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClauseAction::{
        Delete, FetchNext, GroupBy, Having, Insert, InsertColumn, Limit, Offset, OffsetRows,
        OrderBy, Select, SelectDistinct, Update, UpdateSet, Where, WhereOrFilter,
        WhereWithOrFilter,
    };

    fn state(actions: &[ClauseAction]) -> ClauseState {
        let mut s = ClauseState::default();
        for &a in actions {
            s.record(a);
        }
        s
    }

    #[test]
    fn select_only_clauses_skip_after_mutation() {
        let s = state(&[Delete]);
        assert_eq!(s.permit(GroupBy), Permit::Skip { blocked_by: Delete });
        assert_eq!(s.permit(Having), Permit::Skip { blocked_by: Delete });
        assert_eq!(s.permit(OrderBy), Permit::Skip { blocked_by: Delete });
        assert_eq!(s.permit(Where), Permit::Allow);

        let s = state(&[Update, UpdateSet]);
        assert_eq!(s.permit(OrderBy), Permit::Skip { blocked_by: Update });
    }

    #[test]
    fn heads_conflict() {
        let s = state(&[SelectDistinct]);
        assert_eq!(s.permit(Select), Permit::Reject { blocked_by: SelectDistinct });
        assert_eq!(s.permit(Delete), Permit::Reject { blocked_by: SelectDistinct });
        assert_eq!(s.permit(SelectDistinct), Permit::Allow);

        let s = state(&[Insert]);
        assert_eq!(s.permit(Insert), Permit::Reject { blocked_by: Insert });
        assert_eq!(s.permit(InsertColumn), Permit::Allow);
    }

    #[test]
    fn pagination_idioms_are_exclusive() {
        let s = state(&[Limit]);
        assert_eq!(s.permit(Offset), Permit::Allow);
        assert_eq!(s.permit(OffsetRows), Permit::Reject { blocked_by: Limit });

        let s = state(&[OffsetRows]);
        assert_eq!(s.permit(FetchNext), Permit::Allow);
        assert_eq!(s.permit(Limit), Permit::Reject { blocked_by: OffsetRows });
    }

    #[test]
    fn where_family_membership() {
        assert!(WhereWithOrFilter.is_where());
        assert!(!Having.is_where());
        assert!(state(&[WhereOrFilter]).has_where());
        assert!(!state(&[Select]).has_where());
    }

    #[test]
    fn none_is_never_recorded() {
        let s = state(&[ClauseAction::None]);
        assert_eq!(s.emitted, ClauseSet::default());
    }
}
