//! Remote acknowledgment for add submissions.
//!
//! The shipped implementation simulates an unreliable save endpoint:
//! a fixed delay followed by a probabilistic accept/reject. Tests swap
//! in scripted implementations through the same trait.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;

use super::errors::SubmitError;
use super::types::TodoItem;
use crate::core::settings::RemoteSettings;

/// Outcome of one settled submission.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// The remote accepted the item and echoed it back.
    Confirmed(TodoItem),

    /// The remote rejected the item; the optimistic insert must roll back.
    Failed(SubmitError),
}

/// Acknowledgment service the controller submits optimistic inserts to.
///
/// Implementations must always settle: resolve with the saved item or
/// fail with `SubmitError`. Submissions that hang forever would leave
/// the pending flag stuck.
#[async_trait]
pub trait TodoRemote: Send + Sync {
    async fn submit(&self, item: TodoItem) -> Result<TodoItem, SubmitError>;
}

/// Simulated remote: waits out the configured delay, then accepts with
/// the configured probability. Stateless; every call draws independently.
pub struct SimulatedRemote {
    delay: Duration,
    success_rate: f64,
}

impl SimulatedRemote {
    pub fn new(settings: &RemoteSettings) -> Self {
        // gen_bool panics outside 0..=1, and clamp passes NaN through,
        // so bad rates are pinned here before they reach the sampler
        let rate = settings.success_rate;
        let success_rate = if rate.is_nan() {
            RemoteSettings::default().success_rate
        } else {
            rate.clamp(0.0, 1.0)
        };
        Self {
            delay: Duration::from_millis(settings.submit_delay_ms),
            success_rate,
        }
    }
}

impl Default for SimulatedRemote {
    fn default() -> Self {
        Self::new(&RemoteSettings::default())
    }
}

#[async_trait]
impl TodoRemote for SimulatedRemote {
    async fn submit(&self, item: TodoItem) -> Result<TodoItem, SubmitError> {
        sleep(self.delay).await;
        if rand::thread_rng().gen_bool(self.success_rate) {
            Ok(item)
        } else {
            Err(SubmitError::Rejected)
        }
    }
}
