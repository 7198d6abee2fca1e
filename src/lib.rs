//! Optimistic todo list with simulated remote acknowledgment.
//!
//! Items appear in the list the moment they are added. Each add is
//! submitted to a remote that settles after a delay with a randomized
//! accept or reject; a rejected submission rolls the optimistic insert
//! back and broadcasts one failure notification.
//!
//! All list state lives in a single [`TodoListController`] task, driven
//! through a cloneable [`TodoListHandle`]. Subscribers receive a
//! [`TodoEvent`] for every visible change.

pub mod core;
pub mod todo;

pub use crate::core::logging::{init_file_logging, init_logging, LoggingGuards};
pub use crate::core::settings::{load_settings, save_settings, RemoteSettings, SettingsError};
pub use crate::todo::controller::{TodoListController, TodoListHandle};
pub use crate::todo::errors::{ControllerError, SubmitError};
pub use crate::todo::remote::{SimulatedRemote, SubmissionOutcome, TodoRemote};
pub use crate::todo::types::{TodoEvent, TodoItem, TodoListSnapshot};
