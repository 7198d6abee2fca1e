//! TodoListController - single owner actor for the todo list.
//!
//! The controller owns the list state and the in-flight submission count
//! and processes every mutation through the state machine. This keeps all
//! writes on one task and needs no shared mutexes.
//!
//! Architecture:
//! - `TodoListHandle` sends Commands to the controller via command_tx
//! - Spawned submission tasks send settlements back via settle_tx
//! - The controller executes SideEffects and broadcasts TodoEvents to
//!   subscribers

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::ControllerError;
use super::remote::{SubmissionOutcome, TodoRemote};
use super::state::{transition, ListEvent, ListState, SideEffect};
use super::types::{TodoEvent, TodoItem, TodoListSnapshot};

/// Commands sent from handles to the controller.
#[derive(Debug)]
pub enum Command {
    Add {
        text: String,
        response_tx: oneshot::Sender<Option<TodoItem>>,
    },
    Toggle {
        id: String,
        response_tx: oneshot::Sender<Option<TodoItem>>,
    },
    Delete {
        id: String,
        response_tx: oneshot::Sender<bool>,
    },
    Snapshot {
        response_tx: oneshot::Sender<TodoListSnapshot>,
    },
}

/// Events sent from spawned submission tasks to the controller.
#[derive(Debug)]
pub enum WorkerEvent {
    Settled {
        id: String,
        outcome: SubmissionOutcome,
    },
}

pub struct TodoListController {
    state: ListState,
    remote: Arc<dyn TodoRemote>,
    command_rx: mpsc::Receiver<Command>,
    settle_rx: mpsc::Receiver<WorkerEvent>,
    settle_tx: mpsc::Sender<WorkerEvent>,
    event_tx: broadcast::Sender<TodoEvent>,
}

impl TodoListController {
    pub fn new(remote: Arc<dyn TodoRemote>) -> (Self, TodoListHandle) {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (settle_tx, settle_rx) = mpsc::channel(64);
        let (event_tx, _) = broadcast::channel(64);

        let controller = Self {
            state: ListState::default(),
            remote,
            command_rx,
            settle_rx,
            settle_tx,
            event_tx: event_tx.clone(),
        };

        let handle = TodoListHandle {
            command_tx,
            event_tx,
        };

        (controller, handle)
    }

    /// Spawns the controller on the current runtime and returns its handle.
    pub fn spawn(remote: Arc<dyn TodoRemote>) -> TodoListHandle {
        let (controller, handle) = Self::new(remote);
        tokio::spawn(controller.run());
        handle
    }

    /// Main event loop. Run this as a tokio task.
    pub async fn run(mut self) {
        tracing::info!(target: "todo", "[CONTROLLER] Starting event loop");

        loop {
            tokio::select! {
                maybe_cmd = self.command_rx.recv() => {
                    match maybe_cmd {
                        Some(cmd) => self.handle_command(cmd),
                        // All handles dropped; stop accepting commands
                        None => break,
                    }
                }
                Some(event) = self.settle_rx.recv() => {
                    self.handle_settlement(event);
                }
            }
        }

        self.drain_settlements().await;
        tracing::info!(target: "todo", "[CONTROLLER] Event loop stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Add { text, response_tx } => {
                let effects = self.apply(ListEvent::AddRequested { text });
                let added = effects.iter().find_map(|effect| match effect {
                    SideEffect::Submit { item } => Some(item.clone()),
                    _ => None,
                });
                self.execute_effects(effects);
                let _ = response_tx.send(added);
            }
            Command::Toggle { id, response_tx } => {
                let effects = self.apply(ListEvent::ToggleRequested { id: id.clone() });
                let toggled = self.state.find(&id).cloned();
                self.execute_effects(effects);
                let _ = response_tx.send(toggled);
            }
            Command::Delete { id, response_tx } => {
                let removed = self.state.find(&id).is_some();
                let effects = self.apply(ListEvent::DeleteRequested { id });
                self.execute_effects(effects);
                let _ = response_tx.send(removed);
            }
            Command::Snapshot { response_tx } => {
                let _ = response_tx.send(self.state.snapshot());
            }
        }
    }

    fn handle_settlement(&mut self, event: WorkerEvent) {
        let WorkerEvent::Settled { id, outcome } = event;
        let effects = self.apply(ListEvent::SubmissionSettled { id, outcome });
        self.execute_effects(effects);
    }

    /// Runs one event through the state machine and keeps the new state.
    fn apply(&mut self, event: ListEvent) -> Vec<SideEffect> {
        let (new_state, effects) = transition(self.state.clone(), event);
        self.state = new_state;
        effects
    }

    fn execute_effects(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: SideEffect) {
        match effect {
            SideEffect::Submit { item } => {
                self.spawn_submission(item);
            }
            SideEffect::EmitListChanged => {
                self.emit_list_changed();
            }
            SideEffect::EmitSubmissionFailed { message } => {
                self.emit_submission_failed(message);
            }
        }
    }

    fn spawn_submission(&self, item: TodoItem) {
        let settle_tx = self.settle_tx.clone();
        let remote = self.remote.clone();
        let id = item.id.clone();

        tokio::spawn(async move {
            tracing::debug!(target: "todo", "[CONTROLLER] Submitting item: id={}", id);

            let outcome = match remote.submit(item).await {
                Ok(saved) => SubmissionOutcome::Confirmed(saved),
                Err(e) => {
                    tracing::warn!(target: "todo", "[CONTROLLER] Submission failed: id={}, error={}", id, e);
                    SubmissionOutcome::Failed(e)
                }
            };

            let _ = settle_tx.send(WorkerEvent::Settled { id, outcome }).await;
        });
    }

    fn emit_list_changed(&self) {
        let snapshot = self.state.snapshot();
        tracing::debug!(target: "todo",
            "[CONTROLLER] Emitting list change: {} items, pending={}",
            snapshot.items.len(), snapshot.pending_submission);

        // Err here only means nobody is subscribed right now
        let _ = self.event_tx.send(TodoEvent::ListChanged(snapshot));
    }

    fn emit_submission_failed(&self, message: String) {
        tracing::debug!(target: "todo", "[CONTROLLER] Emitting submission failure: {}", message);
        let _ = self.event_tx.send(TodoEvent::SubmissionFailed { message });
    }

    /// Waits out in-flight submissions after the command channel closes,
    /// so late rollbacks still reach subscribers that kept their receivers.
    async fn drain_settlements(&mut self) {
        while self.state.pending_submission() {
            match self.settle_rx.recv().await {
                Some(event) => self.handle_settlement(event),
                None => break,
            }
        }
    }
}

/// Handle to send commands to a spawned controller.
#[derive(Clone)]
pub struct TodoListHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<TodoEvent>,
}

impl TodoListHandle {
    /// Adds an item optimistically and returns it before its submission
    /// settles. Blank text is ignored and returns `Ok(None)`.
    pub async fn add(&self, text: &str) -> Result<Option<TodoItem>, ControllerError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Add {
                text: text.to_string(),
                response_tx,
            })
            .await
            .map_err(|_| ControllerError::Closed)?;

        response_rx.await.map_err(|_| ControllerError::Closed)
    }

    /// Flips completion on the matching item. Unknown ids return `Ok(None)`.
    pub async fn toggle(&self, id: &str) -> Result<Option<TodoItem>, ControllerError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Toggle {
                id: id.to_string(),
                response_tx,
            })
            .await
            .map_err(|_| ControllerError::Closed)?;

        response_rx.await.map_err(|_| ControllerError::Closed)
    }

    /// Removes the matching item. Returns whether anything was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, ControllerError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Delete {
                id: id.to_string(),
                response_tx,
            })
            .await
            .map_err(|_| ControllerError::Closed)?;

        response_rx.await.map_err(|_| ControllerError::Closed)
    }

    pub async fn snapshot(&self) -> Result<TodoListSnapshot, ControllerError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Snapshot { response_tx })
            .await
            .map_err(|_| ControllerError::Closed)?;

        response_rx.await.map_err(|_| ControllerError::Closed)
    }

    /// Subscribes to list changes and failure notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<TodoEvent> {
        self.event_tx.subscribe()
    }
}
