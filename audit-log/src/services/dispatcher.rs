//! Hands audit events to the publisher without making the caller wait.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use crate::{
    models::AuditEvent,
    services::publisher::{Publisher, LOG_PRIORITY, LOG_ROUTING_KEY},
};

/// How events leave the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One detached task per event.
    Detached,
    /// A fixed-capacity queue drained by `workers` tasks. Events arriving
    /// while the queue is full are dropped.
    Bounded { capacity: usize, workers: usize },
}

impl Default for DispatchMode {
    fn default() -> Self {
        DispatchMode::Bounded {
            capacity: 1024,
            workers: 4,
        }
    }
}

#[derive(Clone)]
enum Sink {
    Detached(Arc<dyn Publisher>),
    Queue(mpsc::Sender<AuditEvent>),
}

/// Cheap to clone; every clone feeds the same publisher or queue.
#[derive(Clone)]
pub struct AuditDispatcher {
    sink: Sink,
}

impl AuditDispatcher {
    /// Must be called inside a Tokio runtime when `mode` is bounded, since
    /// the workers are spawned immediately.
    pub fn new(mode: DispatchMode, publisher: Arc<dyn Publisher>) -> Self {
        match mode {
            DispatchMode::Detached => Self::detached(publisher),
            DispatchMode::Bounded { capacity, workers } => {
                Self::bounded(publisher, capacity, workers)
            }
        }
    }

    pub fn detached(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            sink: Sink::Detached(publisher),
        }
    }

    pub fn bounded(publisher: Arc<dyn Publisher>, capacity: usize, workers: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        for worker in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            let publisher = Arc::clone(&publisher);
            tokio::spawn(async move {
                loop {
                    let next = rx.lock().await.recv().await;
                    let Some(event) = next else {
                        tracing::debug!(worker, "Audit dispatch queue closed");
                        break;
                    };
                    publish_event(publisher.as_ref(), event).await;
                }
            });
        }

        Self {
            sink: Sink::Queue(tx),
        }
    }

    /// Queues or spawns publication of `event` and returns immediately.
    pub fn dispatch(&self, event: AuditEvent) {
        match &self.sink {
            Sink::Detached(publisher) => {
                let publisher = Arc::clone(publisher);
                tokio::spawn(async move {
                    publish_event(publisher.as_ref(), event).await;
                });
            }
            Sink::Queue(tx) => match tx.try_send(event) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(event)) => {
                    tracing::warn!(
                        profile_id = event.profile_id,
                        resource_id = event.resource_id,
                        description = %event.description,
                        "Audit dispatch queue full, dropping event"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(event)) => {
                    tracing::warn!(
                        profile_id = event.profile_id,
                        description = %event.description,
                        "Audit dispatch queue closed, dropping event"
                    );
                }
            },
        }
    }
}

async fn publish_event(publisher: &dyn Publisher, event: AuditEvent) {
    if let Err(err) = publisher
        .publish(LOG_ROUTING_KEY, &event, LOG_PRIORITY)
        .await
    {
        tracing::warn!(
            error = %err,
            profile_id = event.profile_id,
            resource_id = event.resource_id,
            description = %event.description,
            "Failed to publish audit event"
        );
    }
}
