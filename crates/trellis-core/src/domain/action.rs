//! Named actions and the ordered, immutable list they are assembled into.
//!
//! An [`Action`] is a pure-looking step `(Structure, ScaffoldOpts) ->
//! (Structure, ScaffoldOpts)`. Side effects are allowed but every action must
//! branch on `opts.pretend` so that a pretend run yields the same values.
//!
//! [`ActionList`] is never edited in place: `register`, `unregister` and
//! `replace` borrow the list and return a new one.

use std::fmt;
use std::sync::Arc;

use crate::domain::{error::DomainError, options::ScaffoldOpts, structure::Structure};
use crate::error::TrellisResult;

/// State threaded through the pipeline.
pub type ActionParams = (Structure, ScaffoldOpts);

type ActionFn = dyn Fn(Structure, ScaffoldOpts) -> TrellisResult<ActionParams> + Send + Sync;

/// A named pipeline step. Cloning shares the underlying closure.
#[derive(Clone)]
pub struct Action {
    name: String,
    run: Arc<ActionFn>,
}

impl Action {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(Structure, ScaffoldOpts) -> TrellisResult<ActionParams> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(run),
        }
    }

    /// Action that hands its input back untouched.
    pub fn identity(name: impl Into<String>) -> Self {
        Self::new(name, |structure, opts| Ok((structure, opts)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self, structure: Structure, opts: ScaffoldOpts) -> TrellisResult<ActionParams> {
        (self.run)(structure, opts)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// Where a new action goes relative to the existing ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    Before(String),
    After(String),
    Append,
}

impl Anchor {
    pub fn before(name: impl Into<String>) -> Self {
        Self::Before(name.into())
    }

    pub fn after(name: impl Into<String>) -> Self {
        Self::After(name.into())
    }
}

// ── ActionList ──────────────────────────────────────────────────────────────

/// Ordered sequence of uniquely named actions.
#[derive(Debug, Clone, Default)]
pub struct ActionList {
    actions: Vec<Action>,
}

impl ActionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from actions in the given order.
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Result<Self, DomainError> {
        actions
            .into_iter()
            .try_fold(Self::new(), |list, action| list.register(action, Anchor::Append))
    }

    /// Return a new list with `action` inserted at `anchor`.
    ///
    /// Errors (the input list is never touched):
    /// - [`DomainError::ActionNotFound`] when the anchor names no action,
    /// - [`DomainError::DuplicateActionName`] when the name is already taken,
    /// - [`DomainError::InvalidActionName`] for an empty name.
    pub fn register(&self, action: Action, anchor: Anchor) -> Result<Self, DomainError> {
        let index = match &anchor {
            Anchor::Before(name) => self.require(name)?,
            Anchor::After(name) => self.require(name)? + 1,
            Anchor::Append => self.actions.len(),
        };

        if self.contains(action.name()) {
            return Err(DomainError::DuplicateActionName {
                name: action.name().to_string(),
            });
        }

        if action.name().trim().is_empty() {
            return Err(DomainError::InvalidActionName {
                name: action.name().to_string(),
                reason: "action names cannot be empty".into(),
            });
        }

        let mut actions = self.actions.clone();
        actions.insert(index, action);
        Ok(Self { actions })
    }

    /// Return a new list without the action called `name`.
    ///
    /// Removing an action that is not there is an error, the same way an
    /// unknown anchor is.
    pub fn unregister(&self, name: &str) -> Result<Self, DomainError> {
        let index = self.require(name)?;
        let mut actions = self.actions.clone();
        actions.remove(index);
        Ok(Self { actions })
    }

    /// Return a new list where the action called `name` is swapped for
    /// `action`, keeping its position.
    pub fn replace(&self, name: &str, action: Action) -> Result<Self, DomainError> {
        let index = self.require(name)?;
        if action.name() != name && self.contains(action.name()) {
            return Err(DomainError::DuplicateActionName {
                name: action.name().to_string(),
            });
        }

        let mut actions = self.actions.clone();
        actions[index] = action;
        Ok(Self { actions })
    }

    /// Concatenate two lists, failing on the first name clash.
    pub fn concat(&self, other: &ActionList) -> Result<Self, DomainError> {
        other
            .iter()
            .cloned()
            .try_fold(self.clone(), |list, action| list.register(action, Anchor::Append))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(Action::name).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn require(&self, name: &str) -> Result<usize, DomainError> {
        self.position(name).ok_or_else(|| DomainError::ActionNotFound {
            name: name.to_string(),
        })
    }
}

impl<'a> IntoIterator for &'a ActionList {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> ActionList {
        ActionList::from_actions(["a", "b", "c"].map(Action::identity)).unwrap()
    }

    // ---------------------------------------------------------------------
    // register
    // ---------------------------------------------------------------------

    #[test]
    fn register_after_places_action_right_behind_anchor() {
        for anchor in ["a", "b", "c"] {
            let list = base().register(Action::identity("x"), Anchor::after(anchor)).unwrap();
            let at = list.position(anchor).unwrap();
            assert_eq!(list.position("x"), Some(at + 1));
            assert_eq!(list.len(), 4);
        }
    }

    #[test]
    fn register_before_places_action_right_ahead_of_anchor() {
        for anchor in ["a", "b", "c"] {
            let list = base().register(Action::identity("x"), Anchor::before(anchor)).unwrap();
            let at = list.position(anchor).unwrap();
            assert_eq!(list.position("x").map(|p| p + 1), Some(at));
        }
    }

    #[test]
    fn register_keeps_relative_order_of_others() {
        let list = base().register(Action::identity("x"), Anchor::after("a")).unwrap();
        assert_eq!(list.names(), ["a", "x", "b", "c"]);
    }

    #[test]
    fn register_append_goes_last() {
        let list = base().register(Action::identity("z"), Anchor::Append).unwrap();
        assert_eq!(list.names(), ["a", "b", "c", "z"]);
    }

    #[test]
    fn register_does_not_touch_input() {
        let list = base();
        let _ = list.register(Action::identity("x"), Anchor::after("a")).unwrap();
        let _ = list.register(Action::identity("a"), Anchor::Append);
        let _ = list.register(Action::identity("x"), Anchor::after("missing"));
        assert_eq!(list.names(), ["a", "b", "c"]);
    }

    #[test]
    fn register_unknown_anchor_fails() {
        let err = base()
            .register(Action::identity("x"), Anchor::before("missing"))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::ActionNotFound {
                name: "missing".into()
            }
        );
    }

    #[test]
    fn register_duplicate_name_fails() {
        let err = base().register(Action::identity("b"), Anchor::after("a")).unwrap_err();
        assert_eq!(err, DomainError::DuplicateActionName { name: "b".into() });
    }

    #[test]
    fn register_empty_name_fails() {
        let err = base().register(Action::identity(""), Anchor::Append).unwrap_err();
        assert!(matches!(err, DomainError::InvalidActionName { .. }));
    }

    #[test]
    fn from_actions_rejects_duplicates() {
        let err = ActionList::from_actions(["a", "a"].map(Action::identity)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateActionName { name: "a".into() });
    }

    // ---------------------------------------------------------------------
    // unregister / replace
    // ---------------------------------------------------------------------

    #[test]
    fn unregister_removes_by_name() {
        let list = base().unregister("b").unwrap();
        assert_eq!(list.names(), ["a", "c"]);
    }

    #[test]
    fn unregister_missing_is_an_error() {
        let err = base().unregister("zzz").unwrap_err();
        assert_eq!(err, DomainError::ActionNotFound { name: "zzz".into() });
    }

    #[test]
    fn replace_keeps_position() {
        let list = base().replace("b", Action::identity("b2")).unwrap();
        assert_eq!(list.names(), ["a", "b2", "c"]);

        let same_name = base().replace("b", Action::identity("b")).unwrap();
        assert_eq!(same_name.names(), ["a", "b", "c"]);
    }

    #[test]
    fn replace_rejects_collision_with_other_entry() {
        let err = base().replace("b", Action::identity("c")).unwrap_err();
        assert_eq!(err, DomainError::DuplicateActionName { name: "c".into() });
    }

    #[test]
    fn concat_fails_on_clash() {
        let other = ActionList::from_actions(["d", "a"].map(Action::identity)).unwrap();
        assert!(base().concat(&other).is_err());

        let other = ActionList::from_actions(["d", "e"].map(Action::identity)).unwrap();
        assert_eq!(base().concat(&other).unwrap().names(), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn action_run_calls_closure() {
        let action = Action::new("rename", |s, mut o: ScaffoldOpts| {
            o.name = Some("renamed".into());
            Ok((s, o))
        });
        let (_, opts) = action.run(Structure::new(), ScaffoldOpts::new("p")).unwrap();
        assert_eq!(opts.name.as_deref(), Some("renamed"));
    }
}
