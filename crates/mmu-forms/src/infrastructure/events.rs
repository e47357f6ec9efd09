//! Event publisher adapters

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use crate::domain::DomainEvent;
use crate::ports::outbound::{EventPublisher, RepositoryError};

/// Writes each event to the tracing log
#[derive(Default)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        for event in events {
            info!(
                event_type = event.event_type(),
                aggregate_id = event.aggregate_id(),
                "domain event"
            );
        }
        Ok(())
    }
}

/// Keeps published events in memory, in publish order
#[derive(Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<DomainEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().clone()
    }

    /// Event type names, in publish order
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(DomainEvent::event_type).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventLog {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        self.events.lock().extend(events);
        Ok(())
    }
}
