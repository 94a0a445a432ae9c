//! Fan-out of [`DomainEvent`]s to GraphQL subscriptions.
//!
//! Each `eventCreated` / `userCreated` subscription holds its own receiver.
//! A subscription only sees events published after it subscribed; there is
//! no replay.

use tokio::sync::broadcast;

use super::DomainEvent;

/// Bounded broadcast of [`DomainEvent`]s.
///
/// Receivers that fall more than `capacity` events behind lose the oldest
/// ones and observe [`broadcast::error::RecvError::Lagged`].
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Creates a bus holding up to `capacity` undelivered events per
    /// receiver. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Hands `event` to every live subscription and returns how many there
    /// were. With no subscribers the event is dropped.
    pub fn publish(&self, event: DomainEvent) -> usize {
        let event_type = event.event_type_str();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event_type, delivered, "domain event published");
        delivered
    }

    /// Opens a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::sync::broadcast::error::RecvError;

    use super::*;
    use crate::domain::UserId;

    fn user_created(user_id: UserId) -> DomainEvent {
        DomainEvent::UserCreated {
            user_id,
            email: "a@x.com".to_string(),
            created_events: Vec::new(),
        }
    }

    #[test]
    fn nobody_listening_drops_the_event() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(user_created(UserId::new())), 0);
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::new(16);
        let mut early = bus.subscribe();
        let first = UserId::new();
        bus.publish(user_created(first));

        let mut late = bus.subscribe();
        let second = UserId::new();
        assert_eq!(bus.publish(user_created(second)), 2);

        let Ok(DomainEvent::UserCreated { user_id, .. }) = early.recv().await else {
            panic!("early subscriber should see the first event");
        };
        assert_eq!(user_id, first);
        let Ok(DomainEvent::UserCreated { user_id, .. }) = late.recv().await else {
            panic!("late subscriber should see the second event");
        };
        assert_eq!(user_id, second);
    }

    #[tokio::test]
    async fn slow_subscriber_lags_then_resumes() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        let ids: Vec<UserId> = (0..3).map(|_| UserId::new()).collect();
        for id in &ids {
            bus.publish(user_created(*id));
        }

        let Err(RecvError::Lagged(1)) = rx.recv().await else {
            panic!("expected one dropped event");
        };
        let Ok(DomainEvent::UserCreated { user_id, .. }) = rx.recv().await else {
            panic!("expected the next retained event");
        };
        assert_eq!(Some(&user_id), ids.get(1));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let bus = EventBus::new(0);
        let _rx = bus.subscribe();
        assert_eq!(bus.publish(user_created(UserId::new())), 1);
    }
}
