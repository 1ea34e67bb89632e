//! Delayed `pending -> ready` promotion.
//!
//! [`ReadySchedule`] remembers when each new order becomes due. It lives only
//! in memory: a restart forgets every entry, and those orders stay where they
//! are until someone changes them by hand. [`ReadyWorker`] drains due entries
//! on a fixed period; tests call [`ReadyWorker::tick`] after moving a manual
//! clock instead of sleeping.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{services::order_service, state::AppState};

#[derive(Debug)]
pub struct ReadySchedule {
    delay: Duration,
    due: DashMap<Uuid, DateTime<Utc>>,
}

impl ReadySchedule {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            due: DashMap::new(),
        }
    }

    /// Registers `order_id`, replacing any earlier entry. Returns the due instant.
    pub fn schedule(&self, order_id: Uuid, created_at: DateTime<Utc>) -> DateTime<Utc> {
        let due_at = created_at + self.delay;
        self.schedule_at(order_id, due_at);
        due_at
    }

    /// Registers `order_id` to come due at exactly `due_at`.
    pub fn schedule_at(&self, order_id: Uuid, due_at: DateTime<Utc>) {
        self.due.insert(order_id, due_at);
    }

    pub fn cancel(&self, order_id: Uuid) -> bool {
        self.due.remove(&order_id).is_some()
    }

    pub fn clear(&self) {
        self.due.clear();
    }

    pub fn due_at(&self, order_id: Uuid) -> Option<DateTime<Utc>> {
        self.due.get(&order_id).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.due.len()
    }

    pub fn is_empty(&self) -> bool {
        self.due.is_empty()
    }

    /// Removes and returns every order due at or before `now`.
    pub fn take_due(&self, now: DateTime<Utc>) -> Vec<Uuid> {
        let due: Vec<Uuid> = self
            .due
            .iter()
            .filter(|entry| *entry.value() <= now)
            .map(|entry| *entry.key())
            .collect();
        due.into_iter()
            .filter(|order_id| self.due.remove(order_id).is_some())
            .collect()
    }
}

pub struct ReadyWorker {
    state: AppState,
}

impl ReadyWorker {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Promotes every order whose timer has run out. Returns the promoted ids.
    pub async fn tick(&self) -> Vec<Uuid> {
        let now = self.state.clock.now();
        let due = self.state.ready_schedule.take_due(now);
        let mut promoted = Vec::with_capacity(due.len());
        for order_id in due {
            match order_service::promote_to_ready(&self.state, order_id).await {
                Ok(Some(_)) => promoted.push(order_id),
                Ok(None) => {
                    tracing::debug!(%order_id, "order moved on before its timer; left as is")
                }
                Err(err) => {
                    // Put it back so the next tick tries again.
                    self.state.ready_schedule.schedule_at(order_id, now);
                    tracing::warn!(%order_id, error = %err, "auto-ready failed; will retry")
                }
            }
        }
        promoted
    }

    pub async fn run(self, period: std::time::Duration, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(period_ms = period.as_millis() as u64, "ready worker started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(
                        dropped = self.state.ready_schedule.len(),
                        "ready worker stopped"
                    );
                    break;
                }
                _ = interval.tick() => {
                    let promoted = self.tick().await;
                    tracing::debug!(promoted = promoted.len(), "ready tick");
                }
            }
        }
    }
}
