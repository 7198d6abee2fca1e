//! Pure state machine for the todo list lifecycle.
//!
//! The machine is a pure function:
//! `(ListState, ListEvent) -> (ListState, Vec<SideEffect>)`
//!
//! Invalid events return the current state with empty effects. The
//! controller executes the returned side effects; this module never
//! performs I/O or touches the clock beyond stamping new items.

use super::remote::SubmissionOutcome;
use super::types::{TodoItem, TodoListSnapshot};

/// List state owned by the controller.
///
/// `items` keeps insertion order; optimistic inserts are appended and
/// rollbacks remove by id without reordering the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub items: Vec<TodoItem>,
    in_flight: usize,
}

impl ListState {
    /// Returns true while at least one add submission is unsettled.
    pub fn pending_submission(&self) -> bool {
        self.in_flight > 0
    }

    /// Returns the item with the given id, if present.
    pub fn find(&self, id: &str) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn snapshot(&self) -> TodoListSnapshot {
        TodoListSnapshot {
            items: self.items.clone(),
            pending_submission: self.pending_submission(),
        }
    }
}

/// Events that can trigger state transitions.
#[derive(Debug, Clone)]
pub enum ListEvent {
    /// User asked to add an item with this raw text.
    AddRequested { text: String },

    /// User asked to flip completion on an item.
    ToggleRequested { id: String },

    /// User asked to remove an item.
    DeleteRequested { id: String },

    /// A spawned submission settled against the remote.
    SubmissionSettled {
        id: String,
        outcome: SubmissionOutcome,
    },
}

/// Side effects triggered by state transitions.
///
/// These are returned by `transition()` and executed by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// Spawn the remote submission for a freshly inserted item.
    Submit { item: TodoItem },

    /// Broadcast the current snapshot to subscribers.
    EmitListChanged,

    /// Broadcast one failure notification for a rolled-back insert.
    EmitSubmissionFailed { message: String },
}

/// Pure state transition function.
///
/// Returns the new state and any side effects to execute.
/// Invalid events return the current state with an empty effect list.
pub fn transition(mut state: ListState, event: ListEvent) -> (ListState, Vec<SideEffect>) {
    match event {
        // Optimistic insert: the item is visible before the remote settles
        ListEvent::AddRequested { text } => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                // Blank input is ignored, not an error
                return (state, vec![]);
            }
            let item = TodoItem::new(trimmed);
            state.items.push(item.clone());
            state.in_flight += 1;
            let effects = vec![SideEffect::Submit { item }, SideEffect::EmitListChanged];
            (state, effects)
        }

        // Flip completion in place; everything else about the item stays put
        ListEvent::ToggleRequested { id } => {
            match state.items.iter().position(|item| item.id == id) {
                Some(index) => {
                    let item = &mut state.items[index];
                    item.completed = !item.completed;
                    (state, vec![SideEffect::EmitListChanged])
                }
                None => (state, vec![]),
            }
        }

        ListEvent::DeleteRequested { id } => {
            let before = state.items.len();
            state.items.retain(|item| item.id != id);
            if state.items.len() == before {
                return (state, vec![]);
            }
            (state, vec![SideEffect::EmitListChanged])
        }

        // A settlement with nothing in flight cannot happen through the
        // controller; treat it as an invalid event
        ListEvent::SubmissionSettled { .. } if state.in_flight == 0 => (state, vec![]),

        ListEvent::SubmissionSettled { id, outcome } => {
            state.in_flight -= 1;
            match outcome {
                // The remote echoes the item unchanged, so the optimistic
                // copy already matches; only the pending flag moves
                SubmissionOutcome::Confirmed(_) => (state, vec![SideEffect::EmitListChanged]),

                // Roll back the optimistic insert. The retain is a no-op
                // if the item was deleted mid-flight, but the notification
                // still fires exactly once for the failed submission
                SubmissionOutcome::Failed(error) => {
                    state.items.retain(|item| item.id != id);
                    let effects = vec![
                        SideEffect::EmitListChanged,
                        SideEffect::EmitSubmissionFailed {
                            message: error.to_string(),
                        },
                    ];
                    (state, effects)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::errors::SubmitError;

    fn submitted_item(effects: &[SideEffect]) -> TodoItem {
        effects
            .iter()
            .find_map(|effect| match effect {
                SideEffect::Submit { item } => Some(item.clone()),
                _ => None,
            })
            .expect("Expected a Submit effect")
    }

    fn state_with_one_pending(text: &str) -> (ListState, TodoItem) {
        let (state, effects) = transition(
            ListState::default(),
            ListEvent::AddRequested {
                text: text.to_string(),
            },
        );
        let item = submitted_item(&effects);
        (state, item)
    }

    #[test]
    fn test_add_inserts_optimistically() {
        let (state, effects) = transition(
            ListState::default(),
            ListEvent::AddRequested {
                text: "Buy milk".to_string(),
            },
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].text, "Buy milk");
        assert!(!state.items[0].completed);
        assert!(state.pending_submission());
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[0], SideEffect::Submit { .. }));
        assert!(matches!(effects[1], SideEffect::EmitListChanged));
    }

    #[test]
    fn test_add_stores_trimmed_text() {
        let (state, _) = transition(
            ListState::default(),
            ListEvent::AddRequested {
                text: "  Walk dog  ".to_string(),
            },
        );

        assert_eq!(state.items[0].text, "Walk dog");
    }

    #[test]
    fn test_blank_add_is_noop() {
        for text in ["", "   ", "\t\n"] {
            let (state, effects) = transition(
                ListState::default(),
                ListEvent::AddRequested {
                    text: text.to_string(),
                },
            );

            assert!(state.items.is_empty());
            assert!(!state.pending_submission());
            assert!(effects.is_empty());
        }
    }

    #[test]
    fn test_adds_assign_unique_ids() {
        let (state, _) = transition(
            ListState::default(),
            ListEvent::AddRequested {
                text: "first".to_string(),
            },
        );
        let (state, _) = transition(
            state,
            ListEvent::AddRequested {
                text: "second".to_string(),
            },
        );

        assert_eq!(state.items.len(), 2);
        assert_ne!(state.items[0].id, state.items[1].id);
    }

    #[test]
    fn test_toggle_flips_completion() {
        let (state, item) = state_with_one_pending("Buy milk");

        let (state, effects) = transition(
            state,
            ListEvent::ToggleRequested {
                id: item.id.clone(),
            },
        );
        assert!(state.items[0].completed);
        assert_eq!(effects, vec![SideEffect::EmitListChanged]);

        let (state, _) = transition(state, ListEvent::ToggleRequested { id: item.id });
        assert!(!state.items[0].completed);
    }

    #[test]
    fn test_toggle_preserves_other_items() {
        let (state, first) = state_with_one_pending("first");
        let (state, _) = transition(
            state,
            ListEvent::AddRequested {
                text: "second".to_string(),
            },
        );
        let untouched = state.items[1].clone();

        let (state, _) = transition(state, ListEvent::ToggleRequested { id: first.id });

        assert_eq!(state.items[1], untouched);
        assert_eq!(state.items[0].text, "first");
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let (state, _) = state_with_one_pending("Buy milk");
        let before = state.clone();

        let (state, effects) = transition(
            state,
            ListEvent::ToggleRequested {
                id: "missing".to_string(),
            },
        );

        assert_eq!(state, before);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_delete_removes_item() {
        let (state, item) = state_with_one_pending("Buy milk");

        let (state, effects) = transition(state, ListEvent::DeleteRequested { id: item.id });

        assert!(state.items.is_empty());
        assert_eq!(effects, vec![SideEffect::EmitListChanged]);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let (state, _) = state_with_one_pending("Buy milk");
        let before = state.clone();

        let (state, effects) = transition(
            state,
            ListEvent::DeleteRequested {
                id: "missing".to_string(),
            },
        );

        assert_eq!(state, before);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_confirmed_settlement_keeps_item() {
        let (state, item) = state_with_one_pending("Buy milk");

        let (state, effects) = transition(
            state,
            ListEvent::SubmissionSettled {
                id: item.id.clone(),
                outcome: SubmissionOutcome::Confirmed(item.clone()),
            },
        );

        assert_eq!(state.items, vec![item]);
        assert!(!state.pending_submission());
        assert_eq!(effects, vec![SideEffect::EmitListChanged]);
    }

    #[test]
    fn test_failed_settlement_rolls_back() {
        let (state, item) = state_with_one_pending("Walk dog");

        let (state, effects) = transition(
            state,
            ListEvent::SubmissionSettled {
                id: item.id,
                outcome: SubmissionOutcome::Failed(SubmitError::Rejected),
            },
        );

        assert!(state.items.is_empty());
        assert!(!state.pending_submission());
        assert_eq!(
            effects,
            vec![
                SideEffect::EmitListChanged,
                SideEffect::EmitSubmissionFailed {
                    message: "Failed to add todo".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_failed_settlement_after_delete_is_safe() {
        let (state, item) = state_with_one_pending("Walk dog");
        let (state, _) = transition(
            state,
            ListEvent::DeleteRequested {
                id: item.id.clone(),
            },
        );
        assert!(state.pending_submission(), "delete must not settle anything");

        let (state, effects) = transition(
            state,
            ListEvent::SubmissionSettled {
                id: item.id,
                outcome: SubmissionOutcome::Failed(SubmitError::Rejected),
            },
        );

        assert!(state.items.is_empty());
        assert!(!state.pending_submission());
        assert!(effects
            .iter()
            .any(|e| matches!(e, SideEffect::EmitSubmissionFailed { .. })));
    }

    #[test]
    fn test_confirmed_settlement_after_delete_clears_pending() {
        let (state, item) = state_with_one_pending("Buy milk");
        let (state, _) = transition(
            state,
            ListEvent::DeleteRequested {
                id: item.id.clone(),
            },
        );
        assert!(state.pending_submission(), "delete must not settle anything");

        let (state, effects) = transition(
            state,
            ListEvent::SubmissionSettled {
                id: item.id.clone(),
                outcome: SubmissionOutcome::Confirmed(item),
            },
        );

        assert!(state.items.is_empty(), "confirmation must not revive the item");
        assert!(!state.pending_submission());
        assert_eq!(effects, vec![SideEffect::EmitListChanged]);
    }

    #[test]
    fn test_overlapping_adds_keep_pending_until_last() {
        let (state, first) = state_with_one_pending("first");
        let (state, effects) = transition(
            state,
            ListEvent::AddRequested {
                text: "second".to_string(),
            },
        );
        let second = submitted_item(&effects);

        let (state, _) = transition(
            state,
            ListEvent::SubmissionSettled {
                id: first.id.clone(),
                outcome: SubmissionOutcome::Confirmed(first),
            },
        );
        assert!(state.pending_submission());

        let (state, _) = transition(
            state,
            ListEvent::SubmissionSettled {
                id: second.id.clone(),
                outcome: SubmissionOutcome::Confirmed(second),
            },
        );
        assert!(!state.pending_submission());
        assert_eq!(state.items.len(), 2);
    }

    #[test]
    fn test_settlement_when_idle_is_noop() {
        let (state, effects) = transition(
            ListState::default(),
            ListEvent::SubmissionSettled {
                id: "stray".to_string(),
                outcome: SubmissionOutcome::Failed(SubmitError::Rejected),
            },
        );

        assert_eq!(state, ListState::default());
        assert!(effects.is_empty());
    }
}
