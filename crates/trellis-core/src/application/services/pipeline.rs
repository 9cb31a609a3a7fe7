//! Pipeline assembly and execution.
//!
//! Assembling (extension activation) and running are separate steps: every
//! assembly error surfaces before the first action runs.

use tracing::{debug, debug_span, instrument};

#[cfg(test)]
use mockall::automock;

use crate::{
    application::ApplicationError,
    domain::{ActionList, ActionParams, ExtensionHandle, ScaffoldOpts, Structure, deterministic_sort},
    error::{TrellisError, TrellisResult},
};

/// Something that can drive an [`ActionList`] over a state.
#[cfg_attr(test, automock)]
pub trait PipelineRunner: Send + Sync {
    fn run(
        &self,
        actions: &ActionList,
        structure: Structure,
        opts: ScaffoldOpts,
    ) -> TrellisResult<ActionParams>;
}

/// Strict left fold over the list. Stops at the first failing action; no
/// retry, no rollback.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl PipelineRunner for SequentialExecutor {
    #[instrument(skip_all, fields(actions = actions.len()))]
    fn run(
        &self,
        actions: &ActionList,
        structure: Structure,
        opts: ScaffoldOpts,
    ) -> TrellisResult<ActionParams> {
        debug!(pipeline = ?actions.names(), "Running pipeline");

        actions
            .iter()
            .enumerate()
            .try_fold((structure, opts), |(structure, opts), (position, action)| {
                let span = debug_span!("action", action = action.name(), position);
                let _guard = span.enter();
                debug!("Running action");

                action.run(structure, opts).map_err(|source| {
                    TrellisError::from(ApplicationError::ActionExecution {
                        action: action.name().to_string(),
                        position,
                        source: Box::new(source),
                    })
                })
            })
    }
}

/// Let each extension modify the list in turn, in the order given
/// (duplicates dropped). Nothing runs here.
#[instrument(skip_all, fields(extensions = extensions.len()))]
pub fn activate_extensions(
    base: ActionList,
    extensions: &[ExtensionHandle],
) -> TrellisResult<ActionList> {
    deterministic_sort(extensions)
        .iter()
        .try_fold(base, |actions, extension| {
            debug!(extension = extension.name(), "Activating extension");
            extension.activate(actions).map_err(|source| {
                TrellisError::from(ApplicationError::ExtensionActivation {
                    extension: extension.name().to_string(),
                    source: Box::new(source),
                })
            })
        })
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{Action, Anchor, DomainError, Extension};

    fn counting(name: &str, counter: &Arc<AtomicUsize>) -> Action {
        let counter = Arc::clone(counter);
        Action::new(name, move |s, o| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok((s, o))
        })
    }

    fn failing(name: &str) -> Action {
        Action::new(name, |_, _| {
            Err(DomainError::MissingRequiredField { field: "package" }.into())
        })
    }

    // ---------------------------------------------------------------------
    // executor
    // ---------------------------------------------------------------------

    #[test]
    fn executor_threads_state_in_order() {
        let tag = |name: &'static str| {
            Action::new(name, move |s: Structure, mut o: ScaffoldOpts| {
                o.build_deps.push(name.to_string());
                Ok((s.with_file(name, name), o))
            })
        };
        let list = ActionList::from_actions([tag("one"), tag("two"), tag("three")]).unwrap();

        let (structure, opts) = SequentialExecutor
            .run(&list, Structure::new(), ScaffoldOpts::new("p"))
            .unwrap();

        assert_eq!(opts.build_deps, ["one", "two", "three"]);
        assert_eq!(structure.len(), 3);
    }

    #[test]
    fn executor_stops_at_first_failure() {
        let counter = Arc::new(AtomicUsize::new(0));
        let list = ActionList::from_actions([
            counting("a", &counter),
            counting("b", &counter),
            failing("boom"),
            counting("c", &counter),
            counting("d", &counter),
        ])
        .unwrap();

        let err = SequentialExecutor
            .run(&list, Structure::new(), ScaffoldOpts::new("p"))
            .unwrap_err();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        match err {
            TrellisError::Application(ApplicationError::ActionExecution {
                action,
                position,
                source,
            }) => {
                assert_eq!(action, "boom");
                assert_eq!(position, 2);
                assert!(matches!(
                    *source,
                    TrellisError::Domain(DomainError::MissingRequiredField { .. })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_pipeline_returns_input() {
        let opts = ScaffoldOpts::new("p").pretend(true);
        let structure = Structure::new().with_file("a", "b");
        let (s, o) = SequentialExecutor
            .run(&ActionList::new(), structure.clone(), opts.clone())
            .unwrap();
        assert_eq!(s, structure);
        assert_eq!(o, opts);
    }

    // ---------------------------------------------------------------------
    // extension activation
    // ---------------------------------------------------------------------

    #[derive(Debug)]
    struct InsertAfter {
        name: &'static str,
        action: &'static str,
        anchor: &'static str,
    }

    impl Extension for InsertAfter {
        fn name(&self) -> &str {
            self.name
        }

        fn activate(&self, actions: ActionList) -> TrellisResult<ActionList> {
            Ok(actions.register(Action::identity(self.action), Anchor::after(self.anchor))?)
        }
    }

    fn base() -> ActionList {
        ActionList::from_actions(["start", "end"].map(Action::identity)).unwrap()
    }

    #[test]
    fn extensions_compose_in_order() {
        let first: ExtensionHandle = Arc::new(InsertAfter {
            name: "first",
            action: "x",
            anchor: "start",
        });
        let second: ExtensionHandle = Arc::new(InsertAfter {
            name: "second",
            action: "y",
            anchor: "x",
        });

        let list = activate_extensions(base(), &[first.clone(), second.clone()]).unwrap();
        assert_eq!(list.names(), ["start", "x", "y", "end"]);

        // the second one depends on the first one's action
        let err = activate_extensions(base(), &[second, first]).unwrap_err();
        match err {
            TrellisError::Application(ApplicationError::ExtensionActivation {
                extension,
                source,
            }) => {
                assert_eq!(extension, "second");
                assert!(matches!(
                    *source,
                    TrellisError::Domain(DomainError::ActionNotFound { ref name }) if name == "x"
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_extensions_activate_once() {
        let ext: ExtensionHandle = Arc::new(InsertAfter {
            name: "first",
            action: "x",
            anchor: "start",
        });
        let list = activate_extensions(base(), &[ext.clone(), ext]).unwrap();
        assert_eq!(list.names(), ["start", "x", "end"]);
    }

    #[test]
    fn activation_leaves_base_untouched() {
        let base = base();
        let ext: ExtensionHandle = Arc::new(InsertAfter {
            name: "first",
            action: "x",
            anchor: "start",
        });
        let _ = activate_extensions(base.clone(), &[ext]).unwrap();
        assert_eq!(base.names(), ["start", "end"]);
    }
}
